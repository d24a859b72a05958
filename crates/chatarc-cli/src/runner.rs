use std::collections::HashSet;
use std::time::Duration;

use anyhow::{Context, Result};

use chatarc_browser::session::{APP_SHELL_TIMEOUT, LOGIN_GRACE_TIMEOUT};
use chatarc_browser::{BrowserConfig, Session, resolve_user_data_dir};
use chatarc_harvest::{
    conversation_from_detail, discover_links, extract_turns, fetch_detail, list_conversations,
    page_title,
};
use chatarc_types::{Conversation, ExportDocument, Source, conversation::UNTITLED};

use crate::args::Cli;
use crate::config::ExportConfig;
use crate::writer;

/// Settle time after navigating to a conversation page in the DOM path.
const PAGE_SETTLE: Duration = Duration::from_secs(1);

/// Run one export end to end.
///
/// `Bootstrapping → Listing(API) → {Detail-Fetching(API) | DOM-Discovery →
/// DOM-Extraction} → Writing → Done`. Per-item failures degrade that item;
/// only never reaching an authenticated app shell fails the run.
pub async fn run(cli: Cli) -> Result<()> {
    let config = ExportConfig::resolve(&cli)?;

    let user_data_dir = resolve_user_data_dir(
        config.profile_dir.as_deref(),
        config.use_real_profile,
        &config.profile_dirs,
    );
    let browser_config = BrowserConfig {
        webdriver_url: config.webdriver_url.clone(),
        base_url: config.base_url.clone(),
        user_data_dir,
        profile_name: config.profile_name.clone(),
    };

    let session = Session::connect(&browser_config).await.with_context(|| {
        format!(
            "failed to open a browser session via {}",
            config.webdriver_url
        )
    })?;

    // Harvest first, then release the browser before touching the output
    // file; the session must be closed on the error path too.
    let outcome = harvest(&session, &config).await;
    let close_outcome = session.close().await;
    let conversations = outcome?;
    if let Err(err) = close_outcome {
        eprintln!("Warning: failed to close browser session: {}", err);
    }

    let document = ExportDocument::new(Source::new(&config.source_tag), conversations);
    writer::write_document(&config.output, &document)?;

    println!(
        "Exported {} conversations to {}",
        document.conversations.len(),
        config.output.display()
    );

    Ok(())
}

/// Acquire every conversation the session can see, API path first.
async fn harvest(session: &Session, config: &ExportConfig) -> Result<Vec<Conversation>> {
    ensure_logged_in(session).await?;

    println!("Listing conversations via in-page API…");
    let entries = list_conversations(session, config.page_size).await;
    println!("API listed {} conversations.", entries.len());

    let mut conversations = Vec::new();

    if !entries.is_empty() {
        let total = entries.len();
        // The lister trusts the service not to overlap pages; duplicates are
        // dropped here at the caller instead.
        let mut seen_ids: HashSet<String> = HashSet::new();
        for (index, entry) in entries.iter().enumerate() {
            let Some(id) = entry.id() else {
                continue;
            };
            if !seen_ids.insert(id.to_string()) {
                continue;
            }
            println!("[API {}/{}] fetching {}", index + 1, total, id);
            let detail = fetch_detail(session, id).await;
            if let Some(conversation) =
                conversation_from_detail(entry, detail.as_ref(), session.base_url())
            {
                conversations.push(conversation);
            }
        }
    }

    if conversations.is_empty() {
        println!("Falling back to DOM scraping…");
        let _ = session.goto(session.base_url().as_str()).await;
        let links = discover_links(session, &config.selectors).await;
        println!("Found {} conversation links in the sidebar.", links.len());

        let total = links.len();
        for (index, link) in links.iter().enumerate() {
            println!("[DOM {}/{}] opening {}", index + 1, total, link.id);

            let link_title = link.title.clone().unwrap_or_else(|| UNTITLED.to_string());
            if session.goto(&link.url).await.is_err() {
                // Navigation failure degrades this item to a header-only
                // record; the run keeps going.
                conversations.push(Conversation::header_only(
                    link.id.clone(),
                    link.url.clone(),
                    link_title,
                ));
                continue;
            }
            tokio::time::sleep(PAGE_SETTLE).await;

            let title = page_title(session, &config.selectors)
                .await
                .unwrap_or(link_title);
            let messages = extract_turns(session, &config.selectors).await;

            conversations.push(Conversation {
                id: link.id.clone(),
                url: link.url.clone(),
                title,
                messages,
            });
        }
    }

    Ok(conversations)
}

/// Wait for the authenticated app shell, extending the wait once to let a
/// human finish logging in. The only fatal failure in the whole run.
async fn ensure_logged_in(session: &Session) -> Result<()> {
    session
        .open_start_page()
        .await
        .context("failed to open the service start page")?;

    if session.wait_for_app_shell(APP_SHELL_TIMEOUT).await {
        return Ok(());
    }

    println!("Log in if needed; waiting for the app shell to load…");
    if session.wait_for_app_shell(LOGIN_GRACE_TIMEOUT).await {
        return Ok(());
    }

    Err(chatarc_browser::Error::LoginTimeout {
        waited_secs: (APP_SHELL_TIMEOUT + LOGIN_GRACE_TIMEOUT).as_secs(),
    }
    .into())
}
