// Shared per-process state handed to every handler

use std::sync::Arc;

use crate::dispatch::Dispatcher;

pub struct AppState {
    /// Absent when no LLM provider could be created at startup
    pub dispatcher: Option<Dispatcher>,

    /// Whether a credentialed identity client backs the tools
    pub identity_active: bool,

    /// Tool names, in the order they are offered to the model
    pub tools: Vec<String>,
}

impl AppState {
    pub fn new(dispatcher: Option<Dispatcher>, identity_active: bool, tools: Vec<String>) -> Arc<Self> {
        Arc::new(Self {
            dispatcher,
            identity_active,
            tools,
        })
    }
}
