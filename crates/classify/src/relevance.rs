//! Context relevance checker.
//!
//! Given a context and a question, classifies the context as relevant
//! or irrelevant. The output scan has to respect that "irrelevant"
//! contains "relevant" as a substring, so the positive match requires
//! the negative to be absent. Ambiguity and failures default to
//! relevant: discarding information forces a retrieval round-trip, so
//! the permissive default is the cheaper mistake.
//!
//! The checker is reachable both with a typed pair and with the
//! marker-string payload shape produced by autonomous tool calls.

use std::sync::Arc;

use groundcrew_core::prompt::{PromptLibrary, prompt_names};
use groundcrew_core::{LanguageModel, RelevanceStatus, RelevanceVerdict, SplitTurn};
use tracing::warn;

pub struct RelevanceChecker {
    model: Arc<dyn LanguageModel>,
    prompts: Arc<PromptLibrary>,
}

impl RelevanceChecker {
    pub fn new(model: Arc<dyn LanguageModel>, prompts: Arc<PromptLibrary>) -> Self {
        Self { model, prompts }
    }

    /// Check whether `context` helps answer `question`.
    pub async fn check(&self, context: &str, question: &str) -> RelevanceVerdict {
        // No question: nothing to assess relevance against.
        if question.trim().is_empty() {
            return RelevanceVerdict::classified(RelevanceStatus::Irrelevant);
        }
        // No context: there is no claim to validate.
        if context.trim().is_empty() {
            return RelevanceVerdict::classified(RelevanceStatus::Relevant);
        }

        let prompt = self.prompts.render(
            prompt_names::CONTEXT_RELEVANCE,
            &[("context", context), ("question", question)],
        );

        match self.model.generate(&prompt).await {
            Ok(output) => {
                let lower = output.to_lowercase();
                if lower.contains("relevant") && !lower.contains("irrelevant") {
                    RelevanceVerdict::classified(RelevanceStatus::Relevant)
                } else if lower.contains("irrelevant") {
                    RelevanceVerdict::classified(RelevanceStatus::Irrelevant)
                } else {
                    warn!("Relevance checker output ambiguous, defaulting to relevant");
                    RelevanceVerdict::defaulted(RelevanceStatus::Relevant)
                }
            }
            Err(e) => {
                warn!(error = %e, "Relevance checker model call failed, defaulting to relevant");
                RelevanceVerdict::defaulted(RelevanceStatus::Relevant)
            }
        }
    }

    /// String-shaped entry point for the autonomous-loop boundary.
    ///
    /// Accepts a payload in `Context: ... Question: ...` form; a payload
    /// without both markers is treated as a bare question with no
    /// context.
    pub async fn check_payload(&self, payload: &str) -> RelevanceVerdict {
        let split = SplitTurn::from_marker_string(payload);
        self.check(&split.context, &split.question).await
    }
}
