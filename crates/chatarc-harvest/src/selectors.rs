use serde::Deserialize;

/// Ordered selector candidate lists for the DOM fallback path.
///
/// Each list is a sequence of capability probes tried in order, first match
/// wins. The defaults track the service's known layout variants; every list
/// can be overridden from the configuration file when the UI shifts.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Selectors {
    /// Containers that hold the conversation sidebar.
    pub sidebar_containers: Vec<String>,
    /// Anchors pointing at individual conversations.
    pub chat_links: Vec<String>,
    /// Title elements on a conversation page.
    pub conversation_titles: Vec<String>,
    /// Message-turn elements, most stable variant first.
    pub turns: Vec<String>,
    /// Attribute naming the author role on (or inside) a turn.
    pub role_attr: String,
    /// Content elements inside a turn.
    pub contents: Vec<String>,
    /// Button labels that reveal a collapsed sidebar.
    pub reveal_labels: Vec<String>,
}

/// Last-resort turn container when no candidate family matches.
pub const GENERIC_TURN_SELECTOR: &str = "article";

impl Default for Selectors {
    fn default() -> Self {
        Self {
            sidebar_containers: vec![
                r#"[data-testid="sidebar"]"#.to_string(),
                r#"nav[role="navigation"]"#.to_string(),
                "aside".to_string(),
            ],
            chat_links: vec![
                r#"[data-testid="conversation-link"]"#.to_string(),
                r#"a[href^="/c/"]"#.to_string(),
                r#"a[href*="/c/"]"#.to_string(),
                r#"a[data-radix-collection-item][href*="/c/"]"#.to_string(),
            ],
            conversation_titles: vec![
                r#"[data-testid="conversation-title"]"#.to_string(),
                "header :is(h1,h2)".to_string(),
            ],
            turns: vec![
                "[data-message-author-role]".to_string(),
                r#"[data-testid="conversation-turn"]"#.to_string(),
                "article div:has([data-message-author-role])".to_string(),
            ],
            role_attr: "data-message-author-role".to_string(),
            contents: vec![
                "[data-message-content]".to_string(),
                ".markdown".to_string(),
                r#"[data-testid="model-viewer"]"#.to_string(),
                "article".to_string(),
            ],
            reveal_labels: vec![
                "Open sidebar".to_string(),
                "History".to_string(),
                "Show sidebar".to_string(),
            ],
        }
    }
}

impl Selectors {
    /// CSS selector form of the role attribute.
    pub fn role_selector(&self) -> String {
        format!("[{}]", self.role_attr)
    }

    /// Apply per-list overrides; untouched lists keep their defaults.
    pub fn apply(&mut self, overrides: &SelectorOverrides) {
        if let Some(list) = &overrides.sidebar_containers {
            self.sidebar_containers = list.clone();
        }
        if let Some(list) = &overrides.chat_links {
            self.chat_links = list.clone();
        }
        if let Some(list) = &overrides.conversation_titles {
            self.conversation_titles = list.clone();
        }
        if let Some(list) = &overrides.turns {
            self.turns = list.clone();
        }
        if let Some(attr) = &overrides.role_attr {
            self.role_attr = attr.clone();
        }
        if let Some(list) = &overrides.contents {
            self.contents = list.clone();
        }
        if let Some(list) = &overrides.reveal_labels {
            self.reveal_labels = list.clone();
        }
    }
}

/// Optional selector overrides, as read from the configuration file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SelectorOverrides {
    pub sidebar_containers: Option<Vec<String>>,
    pub chat_links: Option<Vec<String>>,
    pub conversation_titles: Option<Vec<String>>,
    pub turns: Option<Vec<String>>,
    pub role_attr: Option<String>,
    pub contents: Option<Vec<String>>,
    pub reveal_labels: Option<Vec<String>>,
}
