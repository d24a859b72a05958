//! API acquisition path: list via the paginated listing endpoints, fetch
//! per-item detail payloads, and normalize them into canonical records.

mod fetch;
mod list;
pub(crate) mod schema;

pub mod normalize;

pub use fetch::fetch_detail;
pub use list::{LIST_PAGE_SIZE, list_conversations};
pub use normalize::normalize_detail;
pub use schema::ListEntry;
