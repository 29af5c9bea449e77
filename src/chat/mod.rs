//! Prompt → reply proxy in front of the completion service.

pub mod canned;
pub mod groq;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

pub use groq::GroqProvider;

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("missing prompt")]
    BadRequest,
    #[error("upstream request failed: {0}")]
    Upstream(String),
    #[error("malformed upstream response: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for ChatError {
    fn from(e: reqwest::Error) -> Self {
        ChatError::Upstream(e.to_string())
    }
}

/// A completion service answering a single user message.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Reply text for `prompt`; empty when the service returned no content.
    async fn complete(&self, prompt: &str) -> Result<String, ChatError>;
    fn name(&self) -> &str;
}

#[derive(Clone)]
pub struct ChatProxy {
    provider: Arc<dyn ChatProvider>,
}

impl ChatProxy {
    pub fn new(provider: Arc<dyn ChatProvider>) -> Self {
        Self { provider }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// One round trip per call: no retries, no streaming.
    pub async fn reply(&self, prompt: Option<&str>) -> Result<String, ChatError> {
        let prompt = match prompt {
            Some(p) if !p.is_empty() => p,
            _ => return Err(ChatError::BadRequest),
        };

        if prompt == canned::PATIENT_DATA_PROMPT {
            debug!("serving canned patient history");
            return Ok(canned::PATIENT_HISTORY_HTML.to_string());
        }

        self.provider.complete(prompt).await
    }
}
