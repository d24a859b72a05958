use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Field-level tolerant deserialization: any value that does not match the
/// expected shape becomes `None` instead of failing the surrounding record.
/// The endpoints are an external contract we tolerate, not enforce.
pub(crate) fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// One page of the conversation listing.
///
/// Two known shapes: the current one carries `items`, the legacy one
/// `conversations`; both share `has_more` and echo the effective `limit`.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ListPage {
    #[serde(default, deserialize_with = "lenient")]
    pub items: Option<Vec<ListEntry>>,
    #[serde(default, deserialize_with = "lenient")]
    pub conversations: Option<Vec<ListEntry>>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default, deserialize_with = "lenient")]
    pub limit: Option<u64>,
}

/// Listing entry: identity plus an optional title. Newer payloads use `id`,
/// older ones `conversation_id`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListEntry {
    #[serde(default, deserialize_with = "lenient")]
    id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    conversation_id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    title: Option<String>,
}

impl ListEntry {
    /// Service-assigned identity, whichever field carries it. Empty strings
    /// count as absent.
    pub fn id(&self) -> Option<&str> {
        self.id
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| self.conversation_id.as_deref().filter(|s| !s.is_empty()))
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref().filter(|s| !s.is_empty())
    }
}

/// Full detail payload for one conversation. Only the fields the normalizer
/// consumes are modeled; everything else is ignored.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct DetailPayload {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub conversation_id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub current_node: Option<String>,
    /// Chat-tree nodes keyed by node id. Insertion order is preserved and
    /// serves as the tie-breaker when creation timestamps collide.
    #[serde(default, deserialize_with = "lenient")]
    pub mapping: Option<serde_json::Map<String, Value>>,
}

/// One node of the chat tree: a message wrapper. Parent/child pointers are
/// not needed; ordering comes from creation timestamps.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct NodeWrapper {
    #[serde(default, deserialize_with = "lenient")]
    pub message: Option<NodeMessage>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct NodeMessage {
    #[serde(default, deserialize_with = "lenient")]
    pub author: Option<NodeAuthor>,
    #[serde(default, deserialize_with = "lenient")]
    pub create_time: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub content: Option<NodeContent>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct NodeAuthor {
    #[serde(default, deserialize_with = "lenient")]
    pub role: Option<String>,
}

/// The content object comes in three known shapes: an object with a
/// `parts` list (and sometimes a `text` field), a bare string, or something
/// else entirely (multimodal payloads), which normalizes to empty text.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum NodeContent {
    Structured {
        #[serde(default, deserialize_with = "lenient")]
        parts: Option<Vec<ContentPart>>,
        #[serde(default, deserialize_with = "lenient")]
        text: Option<String>,
    },
    Bare(String),
    Other(Value),
}

/// Entries of a `parts` list: plain strings, objects with an embedded
/// `text` field, or opaque attachments that contribute nothing.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum ContentPart {
    Text(String),
    Object {
        #[serde(default, deserialize_with = "lenient")]
        text: Option<String>,
    },
    Other(Value),
}
