use serde_json::Value;

use chatarc_browser::Session;

/// Detail endpoint path variants, tried in order; first success wins.
fn detail_paths(id: &str) -> [String; 2] {
    [
        format!("/backend-api/conversation/{id}"),
        format!("/api/conversation/{id}"),
    ]
}

/// Fetch the full detail payload for one conversation.
///
/// `None` means no endpoint variant responded successfully; the caller keeps
/// a header-only record for the item instead of failing the run.
pub async fn fetch_detail(session: &Session, id: &str) -> Option<Value> {
    for path in detail_paths(id) {
        if let Some(value) = session.get_json(&path).await {
            return Some(value);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_paths_order_is_fixed() {
        let paths = detail_paths("c-123");
        assert_eq!(paths[0], "/backend-api/conversation/c-123");
        assert_eq!(paths[1], "/api/conversation/c-123");
    }
}
