//! OpenAI-compatible backend.
//!
//! Works with any endpoint exposing `/chat/completions`: OpenAI,
//! OpenRouter, vLLM, Together AI, and Ollama's compatibility layer.
//! The single prompt becomes a one-message conversation.

use async_trait::async_trait;
use groundcrew_core::LanguageModel;
use groundcrew_core::error::ModelError;
use serde::Serialize;
use tracing::debug;

pub struct OpenAiCompatModel {
    base_url: String,
    model: String,
    api_key: String,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

impl OpenAiCompatModel {
    pub fn new(
        base_url: &str,
        model: &str,
        api_key: impl Into<String>,
        timeout_secs: u64,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.into(),
            client,
        }
    }

    /// Pull the first choice's message content out of a response body.
    fn extract_content(body: &serde_json::Value) -> Result<String, ModelError> {
        let content = body["choices"][0]["message"]["content"]
            .as_str()
            .unwrap_or_default();
        if content.trim().is_empty() {
            Err(ModelError::EmptyResponse)
        } else {
            Ok(content.to_string())
        }
    }
}

#[async_trait]
impl LanguageModel for OpenAiCompatModel {
    fn name(&self) -> &str {
        "openai"
    }

    async fn generate(&self, prompt: &str) -> Result<String, ModelError> {
        let url = format!("{}/chat/completions", self.base_url);

        debug!(model = %self.model, "Sending chat completion request");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&ChatRequest {
                model: &self.model,
                messages: vec![ChatMessage {
                    role: "user",
                    content: prompt,
                }],
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

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ModelError::Network(format!("invalid response body: {e}")))?;

        Self::extract_content(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_content_reads_first_choice() {
        let body = serde_json::json!({
            "choices": [{"message": {"role": "assistant", "content": "Hello!"}}]
        });
        assert_eq!(OpenAiCompatModel::extract_content(&body).unwrap(), "Hello!");
    }

    #[test]
    fn empty_content_is_an_error() {
        let body = serde_json::json!({
            "choices": [{"message": {"role": "assistant", "content": ""}}]
        });
        assert!(matches!(
            OpenAiCompatModel::extract_content(&body),
            Err(ModelError::EmptyResponse)
        ));
    }

    #[test]
    fn missing_choices_is_an_error() {
        let body = serde_json::json!({"error": {"message": "overloaded"}});
        assert!(OpenAiCompatModel::extract_content(&body).is_err());
    }

    #[test]
    fn chat_request_shape() {
        let request = ChatRequest {
            model: "gpt-4o-mini",
            messages: vec![ChatMessage {
                role: "user",
                content: "Hi",
            }],
            stream: false,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "Hi");
    }
}
