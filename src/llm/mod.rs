// ABOUTME: Text-completion provider abstraction used by the recommendation normalizer
// ABOUTME: Role-based chat messages, request builder, and the async LlmProvider contract
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 NutriPlan Contributors

//! # Completion Providers
//!
//! The generative-language service is treated as an opaque text-completion
//! endpoint. [`LlmProvider`] is the seam the recommendation service talks to,
//! so tests can script completions without any network access.
//!
//! ```rust,no_run
//! use nutriplan::llm::{ChatMessage, ChatRequest, LlmProvider};
//!
//! async fn ask(provider: &dyn LlmProvider) {
//!     let request = ChatRequest::new(vec![ChatMessage::user("Is tempeh high in protein?")])
//!         .with_temperature(0.8)
//!         .with_max_tokens(300);
//!     let _response = provider.complete(&request).await;
//! }
//! ```

mod gemini;
pub mod prompts;

pub use gemini::GeminiProvider;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// Role of a message in the conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Instruction that frames the whole exchange
    System,
    /// End-user text
    User,
    /// Earlier model output
    Assistant,
}

impl MessageRole {
    /// Wire name of the role
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// A single message sent to the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Who wrote the message
    pub role: MessageRole,
    /// Message text
    pub content: String,
}

impl ChatMessage {
    /// Message with an explicit role
    #[must_use]
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// System instruction
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, content)
    }

    /// User prompt
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }
}

/// One completion request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Conversation messages, oldest first
    pub messages: Vec<ChatMessage>,
    /// Model override; the provider default is used when absent
    pub model: Option<String>,
    /// Sampling temperature
    pub temperature: Option<f32>,
    /// Upper bound on generated tokens
    pub max_tokens: Option<u32>,
}

impl ChatRequest {
    /// Request over the given messages with provider defaults
    #[must_use]
    pub const fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages,
            model: None,
            temperature: None,
            max_tokens: None,
        }
    }

    /// Single user prompt
    #[must_use]
    pub fn prompt(text: impl Into<String>) -> Self {
        Self::new(vec![ChatMessage::user(text)])
    }

    /// Override the model
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the temperature
    #[must_use]
    pub const fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the output token limit
    #[must_use]
    pub const fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

/// Text returned by a provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Text of the first candidate
    pub content: String,
    /// Model that produced it
    pub model: String,
    /// Token accounting, when reported
    pub usage: Option<TokenUsage>,
    /// Provider finish reason (`STOP`, `MAX_TOKENS`, ...)
    pub finish_reason: Option<String>,
}

/// Token accounting reported by the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Tokens in the prompt
    pub prompt_tokens: u32,
    /// Tokens generated
    pub completion_tokens: u32,
    /// Sum of both
    pub total_tokens: u32,
}

/// Text-completion backend
///
/// Implementations return `ExternalServiceUnavailable` when the request never
/// completes, `ExternalRateLimited` / `ExternalAuthFailed` /
/// `ExternalServiceError` for non-success statuses, and
/// `ExternalEmptyResponse` when no text candidate came back. The
/// recommendation normalizer classifies these codes.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Short provider identifier used in logs
    fn name(&self) -> &'static str;

    /// Model used when the request does not name one
    fn default_model(&self) -> &str;

    /// Run one completion
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError>;
}
