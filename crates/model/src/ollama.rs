//! Ollama backend — the native `/api/generate` endpoint.
//!
//! The default backend: a locally running Ollama daemon with no key.
//! Single-prompt completions only; conversation state is the caller's
//! concern.

use async_trait::async_trait;
use groundcrew_core::LanguageModel;
use groundcrew_core::error::ModelError;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub struct OllamaModel {
    base_url: String,
    model: String,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

impl OllamaModel {
    pub fn new(base_url: &str, model: &str, timeout_secs: u64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            client,
        }
    }
}

#[async_trait]
impl LanguageModel for OllamaModel {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn generate(&self, prompt: &str) -> Result<String, ModelError> {
        let url = format!("{}/api/generate", self.base_url);

        debug!(model = %self.model, "Sending Ollama generate request");

        let response = self
            .client
            .post(&url)
            .json(&GenerateRequest {
                model: &self.model,
                prompt,
                stream: false,
            })
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ModelError::Timeout(e.to_string())
                } else {
                    ModelError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ModelError::ApiError {
                status_code: status.as_u16(),
                message,
            });
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| ModelError::Network(format!("invalid response body: {e}")))?;

        if body.response.trim().is_empty() {
            return Err(ModelError::EmptyResponse);
        }
        Ok(body.response)
    }
}
