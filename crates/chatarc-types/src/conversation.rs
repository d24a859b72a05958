use serde::{Deserialize, Serialize};

/// Author of a message.
///
/// The service reports roles as free-form strings; the four known values get
/// dedicated variants and anything else is preserved verbatim so an export
/// never loses information the page gave us.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    User,
    Assistant,
    System,
    Tool,
    Other(String),
}

impl Role {
    pub fn parse(s: &str) -> Self {
        match s {
            "user" => Role::User,
            "assistant" => Role::Assistant,
            "system" => Role::System,
            "tool" => Role::Tool,
            other => Role::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::System => "system",
            Role::Tool => "tool",
            Role::Other(s) => s,
        }
    }
}

/// Messages with an unreadable author attribute are attributed to the agent.
impl Default for Role {
    fn default() -> Self {
        Role::Assistant
    }
}

impl From<String> for Role {
    fn from(s: String) -> Self {
        Role::parse(&s)
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_str().to_string()
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Single message turn within a conversation.
///
/// `html` is only populated by the DOM scraping path; records acquired
/// through the API carry text only and serialize without the field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
}

impl Message {
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
            html: None,
        }
    }
}

/// Canonical conversation record.
///
/// Identity is the service-assigned id; `messages` is ordered by creation
/// time and may legitimately be empty when only the listing header could be
/// retrieved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    pub url: String,
    pub title: String,
    pub messages: Vec<Message>,
}

/// Title used when the service reports none.
pub const UNTITLED: &str = "Untitled";

impl Conversation {
    /// Header-only record: identity and title without any message content.
    pub fn header_only(
        id: impl Into<String>,
        url: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
            title: title.into(),
            messages: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parses_known_and_unknown_strings() {
        assert_eq!(Role::parse("user"), Role::User);
        assert_eq!(Role::parse("assistant"), Role::Assistant);
        assert_eq!(Role::parse("system"), Role::System);
        assert_eq!(Role::parse("tool"), Role::Tool);
        assert_eq!(
            Role::parse("critic"),
            Role::Other("critic".to_string())
        );
    }

    #[test]
    fn test_role_serde_round_trip_preserves_unknown() {
        let role: Role = serde_json::from_str("\"moderator\"").unwrap();
        assert_eq!(role, Role::Other("moderator".to_string()));
        assert_eq!(serde_json::to_string(&role).unwrap(), "\"moderator\"");
    }

    #[test]
    fn test_message_without_html_omits_field() {
        let msg = Message::new(Role::User, "Hi");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json.get("text").and_then(|v| v.as_str()), Some("Hi"));
        assert!(json.get("html").is_none());
    }

    #[test]
    fn test_header_only_has_no_messages() {
        let conv = Conversation::header_only("c1", "https://example.com/c/c1", UNTITLED);
        assert_eq!(conv.id, "c1");
        assert!(conv.messages.is_empty());
    }
}
