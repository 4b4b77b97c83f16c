pub mod error;
pub mod types;

pub use error::{ChatError, Result};
pub use types::{candidate_models, ChatCompletion, Message, MOCK_MODEL};

use std::time::Duration;

use tracing::{debug, warn};
use types::{ChatRequest, ChatResponse};

/// Client for an OpenAI-compatible `/chat/completions` endpoint.
pub struct ChatClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl ChatClient {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Self {
        Self {
            http: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    /// One completion from one model.
    pub async fn complete(&self, model: &str, messages: &[Message]) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url);
        debug!(model, messages = messages.len(), "Chat completion request");

        let resp = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&ChatRequest { model, messages })
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(ChatError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = resp.text().await?;
        let parsed: ChatResponse = serde_json::from_str(&body)?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| ChatError::Empty(model.to_string()))
    }

    /// Try each model in order. A 403/404 moves on to the next model; any
    /// other failure stops the walk and is returned.
    pub async fn complete_with_fallback(
        &self,
        models: &[String],
        messages: &[Message],
    ) -> Result<ChatCompletion> {
        let mut last_err = ChatError::NoModels;

        for model in models {
            match self.complete(model, messages).await {
                Ok(content) => {
                    return Ok(ChatCompletion {
                        content,
                        model: model.clone(),
                    })
                }
                Err(e) if e.is_model_unavailable() => {
                    warn!(model = %model, error = %e, "Chat model unavailable, trying next");
                    last_err = e;
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_err)
    }
}
