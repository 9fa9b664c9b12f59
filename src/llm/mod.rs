//! Model gateway

pub mod client;

pub use client::{Completion, CompletionRequest, LlmClient};
