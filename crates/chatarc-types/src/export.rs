use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::conversation::Conversation;

/// Origin tag recorded in the export document (service host plus strategy).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Source(String);

impl Source {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Complete export artifact written at the end of a run.
///
/// Produced exactly once per run and rewritten wholesale; there are no
/// update or merge semantics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportDocument {
    /// Epoch seconds at assembly time.
    pub exported_at: i64,
    pub source: Source,
    pub conversations: Vec<Conversation>,
}

impl ExportDocument {
    pub fn new(source: Source, conversations: Vec<Conversation>) -> Self {
        Self {
            exported_at: Utc::now().timestamp(),
            source,
            conversations,
        }
    }
}
