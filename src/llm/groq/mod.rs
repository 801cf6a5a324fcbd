//! Groq provider implementation
//!
//! This module provides a client for models served through Groq's
//! OpenAI-compatible chat completions API.

pub mod client;
pub mod mapper;
pub mod types;

// Re-export commonly used types
pub use client::{GroqClient, GroqModel};
