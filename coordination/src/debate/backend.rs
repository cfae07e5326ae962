//! Backend seams for the two debaters.
//!
//! Each provider is reduced to the one operation the debate needs:
//! structured messages in / text out for the primary, a single prompt in /
//! text out for the adversary. HTTP implementations live in the
//! `battleground` crate; tests substitute deterministic doubles.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use super::message::Message;

/// Errors surfaced by a backend call.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("backend returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("API key not configured for {0}")]
    MissingApiKey(String),
}

/// A chat-completion request for the primary backend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub temperature: f32,
    /// Wait budget for this call; `None` leaves it to the client default.
    #[serde(skip)]
    pub timeout: Option<Duration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub presence_penalty: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency_penalty: Option<f32>,
}

/// Chat-completion style backend (primary debater, fallback, judge).
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Submit the request and return the first reply's text.
    async fn complete(&self, request: &ChatRequest) -> Result<String, BackendError>;
}

/// Single-prompt style backend (adversarial debater).
#[async_trait]
pub trait PromptBackend: Send + Sync {
    /// Submit one prompt string to `model` and return the reply text.
    async fn generate(&self, model: &str, prompt: &str) -> Result<String, BackendError>;
}
