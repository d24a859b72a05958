//! Per-item assembly for the API path: listing entry + optional detail
//! payload → one canonical record with its service URL.

use serde_json::Value;
use url::Url;

use chatarc_types::{Conversation, conversation::UNTITLED};

use crate::api::ListEntry;
use crate::api::normalize::normalize_detail;

/// Canonical URL of a conversation on the service.
pub fn conversation_url(base: &Url, id: &str) -> String {
    base.join(&format!("c/{id}"))
        .map(|url| url.to_string())
        .unwrap_or_else(|_| format!("{}/c/{}", base.as_str().trim_end_matches('/'), id))
}

/// Build the record for one listed item.
///
/// With a detail payload the normalizer's output wins (falling back to the
/// listing id when the payload carries none); without one the listing header
/// becomes a header-only record. Entries with no usable id yield `None` and
/// are skipped by the caller.
pub fn conversation_from_detail(
    entry: &ListEntry,
    detail: Option<&Value>,
    base: &Url,
) -> Option<Conversation> {
    let listing_id = entry.id()?.to_string();
    let url = conversation_url(base, &listing_id);

    let conversation = match detail {
        Some(payload) => {
            let mut conversation = normalize_detail(payload);
            if conversation.id.is_empty() {
                conversation.id = listing_id;
            }
            conversation.url = url;
            conversation
        }
        None => Conversation::header_only(
            listing_id,
            url,
            entry.title().unwrap_or(UNTITLED).to_string(),
        ),
    };

    Some(conversation)
}
