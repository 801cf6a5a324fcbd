//! Credentials for LLM providers that need more than a static key

pub mod adc;
