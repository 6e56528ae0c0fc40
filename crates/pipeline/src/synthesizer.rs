//! Answer synthesizer — the final model call of every strategy.
//!
//! With context, the prompt instructs the model to ground itself in the
//! supplied text and acknowledge gaps; without context, to answer from
//! general knowledge and name what additional information would help.
//! Failures propagate — the calling pipeline or adapter converts them
//! at its boundary.

use std::sync::Arc;

use groundcrew_core::error::ModelError;
use groundcrew_core::prompt::{PromptLibrary, prompt_names};
use groundcrew_core::LanguageModel;
use tracing::debug;

pub struct AnswerSynthesizer {
    model: Arc<dyn LanguageModel>,
    prompts: Arc<PromptLibrary>,
}

impl AnswerSynthesizer {
    pub fn new(model: Arc<dyn LanguageModel>, prompts: Arc<PromptLibrary>) -> Self {
        Self { model, prompts }
    }

    /// Generate the final answer for `question`, grounded in `context`
    /// when one is supplied.
    pub async fn synthesize(&self, question: &str, context: &str) -> Result<String, ModelError> {
        let prompt = if context.trim().is_empty() {
            debug!("Synthesizing from general knowledge");
            self.prompts
                .render(prompt_names::GENERAL_ANSWER, &[("question", question)])
        } else {
            debug!("Synthesizing grounded answer");
            self.prompts.render(
                prompt_names::GROUNDED_ANSWER,
                &[("context", context), ("question", question)],
            )
        };

        self.model.generate(&prompt).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{FailingModel, ScriptedModel};

    #[tokio::test]
    async fn returns_model_completion() {
        let synthesizer = AnswerSynthesizer::new(
            Arc::new(ScriptedModel::single("Supervised, unsupervised, reinforcement.")),
            Arc::new(PromptLibrary::builtin()),
        );

        let answer = synthesizer
            .synthesize("What are the main types?", "ML is a subset of AI.")
            .await
            .unwrap();
        assert_eq!(answer, "Supervised, unsupervised, reinforcement.");
    }

    #[tokio::test]
    async fn model_failure_propagates() {
        let synthesizer = AnswerSynthesizer::new(
            Arc::new(FailingModel),
            Arc::new(PromptLibrary::builtin()),
        );

        let result = synthesizer.synthesize("What is Rust?", "").await;
        assert!(result.is_err());
    }
}
