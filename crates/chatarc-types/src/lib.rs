pub mod conversation;
pub mod export;

pub use conversation::{Conversation, Message, Role};
pub use export::{ExportDocument, Source};
