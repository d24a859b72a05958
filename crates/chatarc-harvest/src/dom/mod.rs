//! DOM fallback path, active only when the API path yields zero records.
//!
//! Discovery walks the sidebar with a scroll-and-settle loop and collects
//! conversation links; extraction loads one conversation page fully and
//! reads ordered turns. Every selector lookup is a best-effort probe.

mod discovery;
mod extract;

pub use discovery::{ChatLink, MAX_SCROLL_PASSES, SCROLL_PAUSE, STABLE_PASSES, discover_links};
pub use extract::{MAX_HEIGHT_PASSES, extract_turns, page_title};
