//! Groq chat completions (OpenAI-compatible API).

use async_trait::async_trait;
use serde_json::Value;

use super::{ChatError, ChatProvider};

pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_MODEL: &str = "llama3-8b-8192";

pub struct GroqProvider {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    client: reqwest::Client,
}

impl GroqProvider {
    pub fn new(api_key: &str, model: &str, base_url: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            model: model.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Single-turn request body: one user message, fixed model.
    pub fn request_body(&self, prompt: &str) -> Value {
        serde_json::json!({
            "model": self.model,
            "messages": [{"role": "user", "content": prompt}],
        })
    }

    /// First choice's message content, or an empty string when there is none.
    pub fn parse_response(json: &Value) -> String {
        json.pointer("/choices/0/message/content")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string()
    }
}

#[async_trait]
impl ChatProvider for GroqProvider {
    async fn complete(&self, prompt: &str) -> Result<String, ChatError> {
        let resp = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&self.request_body(prompt))
            .send()
            .await?
            .error_for_status()?;

        let json: Value = resp
            .json()
            .await
            .map_err(|e| ChatError::Parse(e.to_string()))?;
        Ok(Self::parse_response(&json))
    }

    fn name(&self) -> &str {
        "groq"
    }
}
