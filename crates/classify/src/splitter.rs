//! Context splitter — separates a turn into context and question.
//!
//! A heuristic fast path answers the common case (a bare question with
//! no background) without touching the model. Everything else goes
//! through a structured extraction prompt whose output is parsed by
//! literal `CONTEXT:` / `QUESTION:` markers and then validated, so the
//! model cannot invent trivial or circular "context".
//!
//! The splitter never fails: any parse or model failure degrades to
//! "the whole turn is the question".

use std::sync::Arc;

use groundcrew_core::prompt::{PromptLibrary, prompt_names};
use groundcrew_core::{LanguageModel, SplitTurn};
use tracing::{debug, warn};

/// Lead words marking an obviously interrogative turn.
const QUESTION_LEADS: [&str; 11] = [
    "what is", "what are", "how do", "how does", "why", "when", "where", "is", "are", "do", "does",
];

/// Phrases that signal the turn carries background information.
const BACKGROUND_MARKERS: [&str; 10] = [
    "given that",
    "since",
    "because",
    "as we know",
    "considering that",
    "is a",
    "are a",
    "defined as",
    "refers to",
    "means that",
];

/// Proposed context shorter than this is suspect.
const MIN_CONTEXT_CHARS: usize = 15;

/// A suspect context survives only if it covers at least this share of
/// the original turn.
const MIN_CONTEXT_SHARE: f64 = 0.3;

pub struct ContextSplitter {
    model: Arc<dyn LanguageModel>,
    prompts: Arc<PromptLibrary>,
}

impl ContextSplitter {
    pub fn new(model: Arc<dyn LanguageModel>, prompts: Arc<PromptLibrary>) -> Self {
        Self { model, prompts }
    }

    /// Split a raw turn into `(context, question)`.
    ///
    /// Invariant: `question` is non-empty whenever the turn is non-empty
    /// after trimming.
    pub async fn split(&self, turn: &str) -> SplitTurn {
        let turn = turn.trim();
        if turn.is_empty() {
            return SplitTurn::question_only("");
        }

        if Self::is_plain_question(turn) {
            debug!("Splitter fast path: bare question, skipping model");
            return SplitTurn::question_only(turn);
        }

        let prompt = self
            .prompts
            .render(prompt_names::CONTEXT_SPLITTER, &[("input", turn)]);

        match self.model.generate(&prompt).await {
            Ok(output) => Self::parse_extraction(&output, turn),
            Err(e) => {
                warn!(error = %e, "Splitter model call failed, treating whole turn as question");
                SplitTurn::question_only(turn)
            }
        }
    }

    /// Fast-path test: interrogative lead word, no background markers,
    /// at most one sentence terminator.
    fn is_plain_question(turn: &str) -> bool {
        let lower = turn.to_lowercase();
        let leads_with_question = QUESTION_LEADS.iter().any(|lead| lower.starts_with(lead));
        let has_background = BACKGROUND_MARKERS.iter().any(|m| lower.contains(m));
        let terminators = turn
            .chars()
            .filter(|c| matches!(c, '.' | '!' | '?'))
            .count();

        leads_with_question && !has_background && terminators <= 1
    }

    /// Parse `CONTEXT: ... QUESTION: ...` from the model output and
    /// validate the proposed context.
    fn parse_extraction(output: &str, turn: &str) -> SplitTurn {
        let Some((_, after_context)) = output.split_once("CONTEXT:") else {
            return SplitTurn::question_only(turn);
        };
        let Some((context_part, question_part)) = after_context.split_once("QUESTION:") else {
            return SplitTurn::question_only(turn);
        };

        let mut context = context_part.trim().to_string();
        let question_part = question_part.trim();
        // The question may never come back empty; fall back to the turn.
        let question = if question_part.is_empty() {
            turn
        } else {
            question_part
        };

        if !context.is_empty() && Self::should_discard(&context, question, turn) {
            debug!("Splitter discarded trivial or circular context");
            context.clear();
        }

        SplitTurn::new(context, question)
    }

    /// A proposed context is discarded when it is suspect (too short, or
    /// a near-duplicate of the question in either direction) and covers
    /// less than 30% of the original turn.
    fn should_discard(context: &str, question: &str, turn: &str) -> bool {
        let context_lower = context.to_lowercase();
        let question_lower = question.to_lowercase();

        let suspect = context.chars().count() < MIN_CONTEXT_CHARS
            || context_lower.contains(&question_lower)
            || question_lower.contains(&context_lower);

        suspect
            && (context.chars().count() as f64)
                < (turn.chars().count() as f64) * MIN_CONTEXT_SHARE
    }
}
