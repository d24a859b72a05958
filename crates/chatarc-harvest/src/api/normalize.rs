//! Pure conversion of one detail payload into a canonical conversation.
//!
//! Total by construction: every malformed or missing field degrades to a
//! documented default, so one bad payload can never fail an export run.

use serde_json::Value;

use chatarc_types::{Conversation, Message, Role, conversation::UNTITLED};

use super::schema::{ContentPart, DetailPayload, NodeContent, NodeWrapper};

/// Normalize a raw detail payload into a canonical `Conversation`.
///
/// Identity comes from `id` then `conversation_id`; the title falls back
/// `title` → `current_node` → `"Untitled"`. A payload without a
/// node-mapping is a bare listing header and yields an empty message list.
/// The URL is left empty; the caller owns canonical URL construction.
pub fn normalize_detail(payload: &Value) -> Conversation {
    let detail: DetailPayload = serde_json::from_value(payload.clone()).unwrap_or_default();

    let id = detail
        .id
        .filter(|s| !s.is_empty())
        .or(detail.conversation_id.filter(|s| !s.is_empty()))
        .unwrap_or_default();

    let title = detail
        .title
        .filter(|s| !s.is_empty())
        .or(detail.current_node.filter(|s| !s.is_empty()))
        .unwrap_or_else(|| UNTITLED.to_string());

    let messages = match detail.mapping {
        Some(mapping) => {
            // Every node yields one message, in payload order; the sort is
            // stable, so equal timestamps keep that order.
            let mut nodes: Vec<NodeWrapper> = mapping
                .into_iter()
                .map(|(_, node)| serde_json::from_value(node).unwrap_or_default())
                .collect();
            nodes.sort_by(|a, b| {
                create_time(a)
                    .partial_cmp(&create_time(b))
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
            nodes.iter().map(node_message).collect()
        }
        None => Vec::new(),
    };

    Conversation {
        id,
        url: String::new(),
        title,
        messages,
    }
}

/// Creation timestamp used for ordering; missing means the minimum (zero).
fn create_time(node: &NodeWrapper) -> f64 {
    node.message
        .as_ref()
        .and_then(|m| m.create_time)
        .unwrap_or(0.0)
}

fn node_message(node: &NodeWrapper) -> Message {
    let role = node
        .message
        .as_ref()
        .and_then(|m| m.author.as_ref())
        .and_then(|a| a.role.as_deref())
        .map(Role::parse)
        .unwrap_or_default();

    let text = node
        .message
        .as_ref()
        .and_then(|m| m.content.as_ref())
        .map(content_text)
        .unwrap_or_default();

    Message::new(role, text)
}

/// Text extraction precedence: non-empty `parts` list, then a plain `text`
/// field, then a bare string content, then empty.
pub(crate) fn content_text(content: &NodeContent) -> String {
    match content {
        NodeContent::Structured { parts, text } => {
            if let Some(parts) = parts
                && !parts.is_empty()
            {
                let chunks: Vec<&str> = parts
                    .iter()
                    .filter_map(|part| match part {
                        ContentPart::Text(s) => Some(s.as_str()),
                        ContentPart::Object { text } => text.as_deref(),
                        ContentPart::Other(_) => None,
                    })
                    .collect();
                chunks.join("\n").trim().to_string()
            } else if let Some(text) = text {
                text.trim().to_string()
            } else {
                String::new()
            }
        }
        NodeContent::Bare(s) => s.trim().to_string(),
        NodeContent::Other(_) => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn detail_with_mapping() -> Value {
        json!({
            "id": "conv-1",
            "title": "Greetings",
            "mapping": {
                "node-b": {
                    "message": {
                        "author": {"role": "assistant"},
                        "create_time": 1700000001.5,
                        "content": {"parts": ["Hello!"]}
                    }
                },
                "node-a": {
                    "message": {
                        "author": {"role": "user"},
                        "create_time": 1700000000.0,
                        "content": {"parts": ["Hi"]}
                    }
                }
            }
        })
    }

    #[test]
    fn test_messages_sorted_by_create_time() {
        let conv = normalize_detail(&detail_with_mapping());
        assert_eq!(conv.id, "conv-1");
        assert_eq!(conv.title, "Greetings");
        assert_eq!(conv.messages.len(), 2);
        assert_eq!(conv.messages[0].role, Role::User);
        assert_eq!(conv.messages[0].text, "Hi");
        assert_eq!(conv.messages[1].role, Role::Assistant);
        assert_eq!(conv.messages[1].text, "Hello!");
    }

    #[test]
    fn test_missing_create_time_sorts_first() {
        let payload = json!({
            "id": "conv-2",
            "mapping": {
                "late": {
                    "message": {
                        "author": {"role": "assistant"},
                        "create_time": 5.0,
                        "content": {"parts": ["second"]}
                    }
                },
                "root": {
                    "message": {
                        "author": {"role": "system"},
                        "content": {"parts": ["first"]}
                    }
                }
            }
        });
        let conv = normalize_detail(&payload);
        assert_eq!(conv.messages[0].text, "first");
        assert_eq!(conv.messages[1].text, "second");
    }

    #[test]
    fn test_equal_timestamps_keep_payload_order() {
        let payload = json!({
            "id": "conv-3",
            "mapping": {
                "n1": {"message": {"create_time": 1.0, "content": {"parts": ["one"]}}},
                "n2": {"message": {"create_time": 1.0, "content": {"parts": ["two"]}}},
                "n3": {"message": {"create_time": 1.0, "content": {"parts": ["three"]}}}
            }
        });
        let conv = normalize_detail(&payload);
        let texts: Vec<&str> = conv.messages.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, ["one", "two", "three"]);
    }

    #[test]
    fn test_no_mapping_yields_header_only() {
        let payload = json!({"id": "conv-4", "title": "Bare header"});
        let conv = normalize_detail(&payload);
        assert_eq!(conv.id, "conv-4");
        assert!(conv.messages.is_empty());
    }

    #[test]
    fn test_title_fallback_chain() {
        let via_current_node = json!({"id": "c", "current_node": "node-9"});
        assert_eq!(normalize_detail(&via_current_node).title, "node-9");

        let placeholder = json!({"id": "c"});
        assert_eq!(normalize_detail(&placeholder).title, "Untitled");

        let empty_title = json!({"id": "c", "title": "", "current_node": "node-9"});
        assert_eq!(normalize_detail(&empty_title).title, "node-9");
    }

    #[test]
    fn test_id_fallback_to_conversation_id() {
        let payload = json!({"conversation_id": "legacy-7"});
        assert_eq!(normalize_detail(&payload).id, "legacy-7");
    }

    #[test]
    fn test_text_extraction_precedence() {
        let parts: NodeContent =
            serde_json::from_value(json!({"parts": ["a", {"text": "b"}]})).unwrap();
        assert_eq!(content_text(&parts), "a\nb");

        let text_field: NodeContent = serde_json::from_value(json!({"text": "x"})).unwrap();
        assert_eq!(content_text(&text_field), "x");

        let bare: NodeContent = serde_json::from_value(json!("y")).unwrap();
        assert_eq!(content_text(&bare), "y");

        let none: NodeContent = serde_json::from_value(json!({})).unwrap();
        assert_eq!(content_text(&none), "");
    }

    #[test]
    fn test_empty_parts_falls_back_to_text_field() {
        let content: NodeContent =
            serde_json::from_value(json!({"parts": [], "text": "fallback"})).unwrap();
        assert_eq!(content_text(&content), "fallback");
    }

    #[test]
    fn test_non_text_parts_are_skipped() {
        let content: NodeContent = serde_json::from_value(
            json!({"parts": ["keep", {"asset_pointer": "file://x"}, {"text": "also"}]}),
        )
        .unwrap();
        assert_eq!(content_text(&content), "keep\nalso");
    }

    #[test]
    fn test_role_defaults_to_assistant() {
        let payload = json!({
            "id": "conv-5",
            "mapping": {
                "n": {"message": {"content": {"parts": ["anonymous"]}}}
            }
        });
        let conv = normalize_detail(&payload);
        assert_eq!(conv.messages[0].role, Role::Assistant);
    }

    #[test]
    fn test_messageless_node_degrades_to_empty_assistant_message() {
        let payload = json!({
            "id": "conv-6",
            "mapping": {"root": {}}
        });
        let conv = normalize_detail(&payload);
        assert_eq!(conv.messages.len(), 1);
        assert_eq!(conv.messages[0].role, Role::Assistant);
        assert_eq!(conv.messages[0].text, "");
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let payload = detail_with_mapping();
        assert_eq!(normalize_detail(&payload), normalize_detail(&payload));
    }

    #[test]
    fn test_non_object_payload_degrades_to_empty_header() {
        let conv = normalize_detail(&json!("not an object"));
        assert_eq!(conv.id, "");
        assert_eq!(conv.title, "Untitled");
        assert!(conv.messages.is_empty());
    }
}
