//! Context presence judge.
//!
//! Classifies a turn as `context_provided` or `context_missing` by
//! scanning the lowercased model output for the literal status words.
//! Ambiguous output and model failures default to `context_missing`:
//! triggering an unnecessary retrieval is cheaper than answering an
//! under-informed question.

use std::sync::Arc;

use groundcrew_core::prompt::{PromptLibrary, prompt_names};
use groundcrew_core::{ContextStatus, LanguageModel, PresenceVerdict};
use tracing::warn;

pub struct PresenceJudge {
    model: Arc<dyn LanguageModel>,
    prompts: Arc<PromptLibrary>,
}

impl PresenceJudge {
    pub fn new(model: Arc<dyn LanguageModel>, prompts: Arc<PromptLibrary>) -> Self {
        Self { model, prompts }
    }

    /// Judge whether the turn carries sufficient background context.
    pub async fn judge(&self, turn: &str) -> PresenceVerdict {
        if turn.trim().is_empty() {
            return PresenceVerdict::classified(ContextStatus::Missing);
        }

        let prompt = self
            .prompts
            .render(prompt_names::CONTEXT_JUDGE, &[("input", turn)]);

        match self.model.generate(&prompt).await {
            Ok(output) => {
                let lower = output.to_lowercase();
                if lower.contains("context_provided") {
                    PresenceVerdict::classified(ContextStatus::Provided)
                } else if lower.contains("context_missing") {
                    PresenceVerdict::classified(ContextStatus::Missing)
                } else {
                    warn!("Presence judge output ambiguous, defaulting to context_missing");
                    PresenceVerdict::defaulted(ContextStatus::Missing)
                }
            }
            Err(e) => {
                warn!(error = %e, "Presence judge model call failed, defaulting to context_missing");
                PresenceVerdict::defaulted(ContextStatus::Missing)
            }
        }
    }
}
