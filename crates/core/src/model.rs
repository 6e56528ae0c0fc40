//! LanguageModel trait — the abstraction over LLM backends.
//!
//! A LanguageModel knows how to turn a single prompt string into a
//! completion string. Classifiers, the synthesizer, and the autonomous
//! reasoning loop all call `generate()` without knowing which backend is
//! in use — pure polymorphism.
//!
//! Implementations: Ollama (native API), OpenAI-compatible endpoints.

use crate::error::ModelError;
use async_trait::async_trait;

/// The core LanguageModel trait.
///
/// `generate` is the only required method. It may fail (connectivity,
/// bad status, empty completion); every caller in the core degrades to a
/// documented safe default or converts the failure into a user-facing
/// string — see the error handling design.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// A human-readable name for this backend (e.g., "ollama").
    fn name(&self) -> &str;

    /// Send a prompt and return the completion text.
    async fn generate(&self, prompt: &str) -> std::result::Result<String, ModelError>;

    /// Connectivity probe — can we reach the backend?
    ///
    /// Default implementation sends a one-word prompt and reports
    /// whether it produced any completion.
    async fn ping(&self) -> bool {
        matches!(self.generate("Hello").await, Ok(ref s) if !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedModel(&'static str);

    #[async_trait]
    impl LanguageModel for FixedModel {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn generate(&self, _prompt: &str) -> Result<String, ModelError> {
            if self.0.is_empty() {
                Err(ModelError::EmptyResponse)
            } else {
                Ok(self.0.to_string())
            }
        }
    }

    #[tokio::test]
    async fn ping_reports_reachable_backend() {
        assert!(FixedModel("hi").ping().await);
    }

    #[tokio::test]
    async fn ping_reports_failing_backend() {
        assert!(!FixedModel("").ping().await);
    }
}
