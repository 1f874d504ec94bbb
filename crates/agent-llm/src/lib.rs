//! LLM provider abstraction layer for news-agent-rs
//!
//! This crate provides provider-agnostic abstractions for interacting with
//! Large Language Models (LLMs). It includes:
//!
//! - Message types for chat-style communication
//! - Completion request/response types
//! - The [`LLMProvider`] trait
//! - Backend selection from a model identifier ([`BackendKind`])
//! - An OpenAI-compatible provider used for both OpenAI and DeepSeek

pub mod backend;
pub mod completion;
pub mod error;
pub mod messages;
pub mod provider;
pub mod providers;

// Re-export main types
pub use backend::{BackendKind, BackendSettings};
pub use completion::{CompletionRequest, CompletionResponse, StopReason, TokenUsage};
pub use error::{LLMError, Result};
pub use messages::{Message, Role};
pub use provider::LLMProvider;
