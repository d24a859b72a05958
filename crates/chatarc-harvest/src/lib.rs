//! Acquisition strategies and shape normalization.
//!
//! Two tiers: the API path (in-page listing + per-item detail fetch, then a
//! pure normalization of the node-mapping payload) and the DOM fallback
//! (sidebar link discovery + per-page turn extraction). Every public entry
//! point is best-effort by signature: listings come back possibly empty,
//! details possibly absent, element reads degrade to defaults. Nothing in
//! this crate aborts a run.

pub mod api;
pub mod convert;
pub mod dom;
pub mod selectors;

pub use api::{LIST_PAGE_SIZE, ListEntry, fetch_detail, list_conversations, normalize_detail};
pub use convert::{conversation_from_detail, conversation_url};
pub use dom::{ChatLink, discover_links, extract_turns, page_title};
pub use selectors::{SelectorOverrides, Selectors};
