use std::collections::HashSet;
use std::time::Duration;

use url::Url;

use chatarc_browser::Session;

use crate::selectors::Selectors;

/// Pause between sidebar scroll passes.
pub const SCROLL_PAUSE: Duration = Duration::from_millis(800);

/// Hard cap on sidebar scroll passes.
pub const MAX_SCROLL_PASSES: usize = 80;

/// Consecutive passes with an unchanged link count before settling.
pub const STABLE_PASSES: usize = 3;

/// Settle time after clicking a sidebar reveal button.
const REVEAL_SETTLE: Duration = Duration::from_millis(400);

/// One discovered conversation link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatLink {
    /// Trailing path segment of the link, assumed to be the conversation id.
    pub id: String,
    pub url: String,
    pub title: Option<String>,
}

/// Enumerate conversation links from the sidebar.
///
/// Reveals a collapsed panel if a known button is present, scrolls the first
/// matching container until the link count settles (or the pass cap hits),
/// then collects, absolutizes, and de-duplicates the links. Empty on any
/// structural failure; discovery never raises.
pub async fn discover_links(session: &Session, selectors: &Selectors) -> Vec<ChatLink> {
    reveal_sidebar(session, selectors).await;

    let Some((container_selector, _)) = session
        .first_matching_family(&selectors.sidebar_containers)
        .await
    else {
        return Vec::new();
    };

    let mut seen_count = 0usize;
    let mut stable = 0usize;
    for _ in 0..MAX_SCROLL_PASSES {
        if !session.scroll_container_bottom(&container_selector).await {
            break;
        }
        tokio::time::sleep(SCROLL_PAUSE).await;

        let mut total = 0usize;
        for selector in &selectors.chat_links {
            total += session.count_matches(selector).await;
        }
        if total == seen_count {
            stable += 1;
            if stable >= STABLE_PASSES {
                break;
            }
        } else {
            stable = 0;
            seen_count = total;
        }
    }

    let mut links = Vec::new();
    for selector in &selectors.chat_links {
        for element in session.find_all(selector).await {
            let mut element = element;
            let href = match element.attr("href").await {
                Ok(Some(href)) => href,
                _ => continue,
            };
            if !href.contains("/c/") {
                continue;
            }
            let title = match element.attr("title").await {
                Ok(Some(title)) if !title.trim().is_empty() => Some(title.trim().to_string()),
                _ => element
                    .text()
                    .await
                    .ok()
                    .map(|text| text.trim().to_string())
                    .filter(|text| !text.is_empty()),
            };
            let Some(url) = absolutize(session.base_url(), &href) else {
                continue;
            };
            let Some(id) = trailing_segment(&url) else {
                continue;
            };
            links.push(ChatLink { id, url, title });
        }
    }

    dedup_links(links)
}

/// Click any known reveal button; collapsed sidebars stay collapsed silently.
async fn reveal_sidebar(session: &Session, selectors: &Selectors) {
    for label in &selectors.reveal_labels {
        if session.click_button_labeled(label).await {
            tokio::time::sleep(REVEAL_SETTLE).await;
        }
    }
}

/// Resolve a possibly relative href against the service root.
fn absolutize(base: &Url, href: &str) -> Option<String> {
    if href.starts_with("http://") || href.starts_with("https://") {
        return Some(href.to_string());
    }
    base.join(href).ok().map(|url| url.to_string())
}

/// Trailing path segment of a URL, used as the de-duplication key.
/// Assumes the id always rides in the last segment; ids nested in query
/// parameters would silently break this (known limitation, left as is).
fn trailing_segment(url: &str) -> Option<String> {
    url.rsplit('/')
        .next()
        .map(|segment| segment.to_string())
        .filter(|segment| !segment.is_empty())
}

/// De-duplicate by id, keeping the first occurrence.
fn dedup_links(links: Vec<ChatLink>) -> Vec<ChatLink> {
    let mut seen = HashSet::new();
    links
        .into_iter()
        .filter(|link| seen.insert(link.id.clone()))
        .collect()
}
