//! Browser session layer.
//!
//! Owns the WebDriver connection for the whole run: profile resolution,
//! session capabilities, the login wait, and the page primitives (in-page
//! fetch, selector probing, scroll-and-settle) the harvest layer builds on.
//! One session is opened per run and closed at the end; nothing here is
//! shared across tasks.

pub mod error;
pub mod profile;
pub mod session;

pub use error::{Error, Result};
pub use profile::{ProfileDirs, resolve_user_data_dir};
pub use session::{BrowserConfig, Session};

// The harvest layer drives elements directly for per-turn extraction.
pub use fantoccini::{Locator, elements::Element};
