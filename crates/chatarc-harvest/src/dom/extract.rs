use std::time::Duration;

use chatarc_browser::{Element, Locator, Session};
use chatarc_types::{Message, Role};

use crate::selectors::{GENERIC_TURN_SELECTOR, Selectors};

/// Hard cap on scroll-to-bottom passes while forcing full content load.
pub const MAX_HEIGHT_PASSES: usize = 60;

/// Pause between height probes.
const HEIGHT_SETTLE: Duration = Duration::from_millis(250);

/// Refine the conversation title from the rendered page.
/// `None` keeps whatever title the caller already has.
pub async fn page_title(session: &Session, selectors: &Selectors) -> Option<String> {
    for selector in &selectors.conversation_titles {
        for element in session.find_all(selector).await {
            let mut element = element;
            if let Ok(text) = element.text().await {
                let text = text.trim();
                if !text.is_empty() {
                    return Some(text.to_string());
                }
            }
        }
    }
    None
}

/// Extract ordered message turns from the current conversation page.
///
/// Loads the page fully first, then reads turns from the first candidate
/// selector family that matches anything (generic block containers as the
/// last resort). Per-element failures degrade to defaults; the result order
/// is the document order of the matched elements.
pub async fn extract_turns(session: &Session, selectors: &Selectors) -> Vec<Message> {
    load_full_page(session).await;

    let elements = match session.first_matching_family(&selectors.turns).await {
        Some((_, elements)) => elements,
        None => session.find_all(GENERIC_TURN_SELECTOR).await,
    };

    let role_selector = selectors.role_selector();
    let mut turns = Vec::with_capacity(elements.len());
    for element in &elements {
        let role = read_role(element, &selectors.role_attr, &role_selector).await;
        let (text, html) = read_content(element, &selectors.contents).await;
        turns.push(Message {
            role,
            text,
            html: Some(html),
        });
    }
    turns
}

/// Scroll until the document height stops growing or the pass cap hits.
async fn load_full_page(session: &Session) {
    session.scroll_window_top().await;
    let mut last_height = 0i64;
    for _ in 0..MAX_HEIGHT_PASSES {
        session.scroll_window_bottom().await;
        tokio::time::sleep(HEIGHT_SETTLE).await;
        let height = session.document_height().await;
        if height == last_height {
            break;
        }
        last_height = height;
    }
}

/// Role from the turn's own attribute, else from a role-bearing descendant,
/// else the default.
async fn read_role(element: &Element, attr: &str, role_selector: &str) -> Role {
    let mut own = element.clone();
    if let Ok(Some(role)) = own.attr(attr).await
        && !role.is_empty()
    {
        return Role::parse(&role);
    }

    let mut scope = element.clone();
    if let Ok(inner) = scope.find(Locator::Css(role_selector)).await {
        let mut inner = inner;
        if let Ok(Some(role)) = inner.attr(attr).await
            && !role.is_empty()
        {
            return Role::parse(&role);
        }
    }

    Role::default()
}

/// Text and markup from the first matching content candidate inside the
/// turn, falling back to the turn element itself. Read failures yield empty
/// strings for the affected field only.
async fn read_content(element: &Element, candidates: &[String]) -> (String, String) {
    for selector in candidates {
        let mut scope = element.clone();
        if let Ok(inner) = scope.find(Locator::Css(selector)).await {
            let mut inner = inner;
            let text = inner
                .text()
                .await
                .map(|t| t.trim().to_string())
                .unwrap_or_default();
            let html = inner.html(true).await.unwrap_or_default();
            return (text, html);
        }
    }

    let mut own = element.clone();
    let text = own
        .text()
        .await
        .map(|t| t.trim().to_string())
        .unwrap_or_default();
    let html = own.html(true).await.unwrap_or_default();
    (text, html)
}
