// Handlers module

pub mod chat;
pub mod status;

pub use chat::chat_handler;
pub use status::{health_handler, root_handler, tools_status_handler};
