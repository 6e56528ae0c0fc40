//! Deterministic context-resolution pipelines.
//!
//! The fixed workflow: split the turn, decide whether the extracted
//! context suffices, retrieve when it does not, validate relevance, and
//! synthesize. Two variants exist and both are kept selectable rather
//! than unified:
//!
//! - **Smart** — admits extracted context on a simple length heuristic
//!   and skips the extra classifier calls.
//! - **Strict** — admits any non-empty extracted context, consults the
//!   presence judge when nothing was extracted, and relevance-checks
//!   the final context (retrieved text included) before synthesis.
//!
//! `resolve` never fails: an internal error becomes a short generic
//! apology with no detail surfaced.

use std::sync::Arc;

use async_trait::async_trait;
use groundcrew_classify::{ContextSplitter, PresenceJudge, RelevanceChecker};
use groundcrew_core::{ContextStatus, Error, RelevanceStatus};
use groundcrew_retrieval::Retriever;
use tracing::{debug, info, warn};

use crate::controller::AnswerStrategy;
use crate::synthesizer::AnswerSynthesizer;

/// Returned when anything inside the pipeline fails.
pub const PIPELINE_FAILURE_REPLY: &str =
    "I encountered an error while processing your request. Please try again.";

/// The smart tier admits extracted context only above this length.
const SMART_MIN_CONTEXT_CHARS: usize = 10;

/// Which admission and validation rules the pipeline applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineMode {
    /// Length heuristic only.
    Smart,
    /// Presence judge on empty extraction plus relevance validation.
    Strict,
}

pub struct DeterministicPipeline {
    mode: PipelineMode,
    splitter: Arc<ContextSplitter>,
    judge: Arc<PresenceJudge>,
    relevance: Arc<RelevanceChecker>,
    retriever: Arc<Retriever>,
    synthesizer: Arc<AnswerSynthesizer>,
}

impl DeterministicPipeline {
    pub fn new(
        mode: PipelineMode,
        splitter: Arc<ContextSplitter>,
        judge: Arc<PresenceJudge>,
        relevance: Arc<RelevanceChecker>,
        retriever: Arc<Retriever>,
        synthesizer: Arc<AnswerSynthesizer>,
    ) -> Self {
        Self {
            mode,
            splitter,
            judge,
            relevance,
            retriever,
            synthesizer,
        }
    }

    /// Resolve a turn into an answer. Never fails.
    pub async fn resolve(&self, turn: &str) -> String {
        match self.run(turn).await {
            Ok(answer) => answer,
            Err(e) => {
                warn!(mode = ?self.mode, error = %e, "Pipeline failed, returning generic apology");
                PIPELINE_FAILURE_REPLY.to_string()
            }
        }
    }

    async fn run(&self, turn: &str) -> Result<String, Error> {
        // Step 1: split into context and question.
        let split = self.splitter.split(turn).await;
        let question = if split.question.trim().is_empty() {
            turn
        } else {
            split.question.as_str()
        };

        // Step 2: decide whether the extracted context suffices.
        let admitted = match self.mode {
            PipelineMode::Smart => split.context.chars().count() > SMART_MIN_CONTEXT_CHARS,
            PipelineMode::Strict => split.has_context(),
        };

        let (status, mut context) = if admitted {
            (ContextStatus::Provided, split.context.clone())
        } else {
            if self.mode == PipelineMode::Strict {
                // The judge's verdict is recorded for observability;
                // with nothing extracted, retrieval happens regardless.
                let verdict = self.judge.judge(turn).await;
                debug!(
                    status = %verdict.status,
                    defaulted = verdict.defaulted,
                    "Presence judge consulted on empty extraction"
                );
            }
            let query = if question.trim().is_empty() {
                turn
            } else {
                question
            };
            (
                ContextStatus::Missing,
                self.retriever.retrieve(query).await,
            )
        };

        info!(mode = ?self.mode, %status, "Context resolved");

        // Step 3 (strict only): an irrelevant context must never reach
        // the synthesizer.
        if self.mode == PipelineMode::Strict && !context.trim().is_empty() {
            let verdict = self.relevance.check(&context, question).await;
            if verdict.status == RelevanceStatus::Irrelevant {
                info!("Discarding irrelevant context before synthesis");
                context.clear();
            }
        }

        // Step 4: synthesize.
        let answer = self.synthesizer.synthesize(question, &context).await?;
        Ok(answer)
    }
}

#[async_trait]
impl AnswerStrategy for DeterministicPipeline {
    fn name(&self) -> &str {
        match self.mode {
            PipelineMode::Smart => "smart_pipeline",
            PipelineMode::Strict => "strict_pipeline",
        }
    }

    async fn answer(&self, turn: &str) -> Result<String, Error> {
        Ok(self.resolve(turn).await)
    }
}
