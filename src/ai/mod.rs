//! AI completion capability.
//!
//! One seam, `CompletionProvider`, consumed by the recommendation engine and
//! the chat assistant. The production impl talks to an OpenAI-compatible
//! chat-completions API with a hard timeout; callers treat every error as
//! recoverable (fallback rules, apology text) — an AI outage never fails a
//! user-visible request.

use async_trait::async_trait;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::debug;

use crate::config::AiConfig;

#[derive(Debug, Error)]
pub enum CompletionError {
    /// No API key configured — the service runs without an AI backend.
    #[error("AI backend disabled")]
    Disabled,
    /// Network failure, timeout, or non-success HTTP status.
    #[error("AI transport error: {0}")]
    Transport(String),
    /// 2xx response whose body doesn't carry a completion.
    #[error("AI response malformed: {0}")]
    BadResponse(String),
}

#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Run one completion: a system instruction plus a single user message.
    /// Returns the assistant's text verbatim.
    async fn complete(&self, system: &str, user: &str) -> Result<String, CompletionError>;
}

// ─── HTTP client ─────────────────────────────────────────────────────────────

pub struct HttpCompletionClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
}

impl HttpCompletionClient {
    pub fn new(config: &AiConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .expect("reqwest client");
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        }
    }
}

#[async_trait]
impl CompletionProvider for HttpCompletionClient {
    async fn complete(&self, system: &str, user: &str) -> Result<String, CompletionError> {
        let api_key = self.api_key.as_deref().ok_or(CompletionError::Disabled)?;

        let url = format!("{}/chat/completions", self.base_url);
        let body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": system },
                { "role": "user", "content": user },
            ],
            "temperature": 0.7,
        });

        let resp = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| CompletionError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(CompletionError::Transport(format!(
                "completion API returned {status}"
            )));
        }

        let payload: Value = resp
            .json()
            .await
            .map_err(|e| CompletionError::BadResponse(e.to_string()))?;

        let content = payload["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| CompletionError::BadResponse("missing choices[0].message.content".into()))?;

        debug!("completion returned {} chars", content.len());
        Ok(content.to_string())
    }
}
