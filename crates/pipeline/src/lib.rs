//! Context resolution pipelines and fallback control.
//!
//! One turn flows through here on its way to an answer:
//!
//! 1. **AutonomousAdapter** — a reasoning loop that picks capabilities
//!    by name, bounded by iteration and parse-failure limits.
//! 2. **DeterministicPipeline** — the fixed split → judge → retrieve →
//!    validate → synthesize workflow, in a smart and a strict variant.
//! 3. **FallbackController** — tries the strategies in priority order
//!    and always produces an answer string, never an error.
//!
//! The controller holds no per-turn state; one instance serves
//! concurrent turns.

pub mod autonomous;
pub mod controller;
pub mod deterministic;
pub mod synthesizer;

pub use autonomous::AutonomousAdapter;
pub use controller::{AnswerStrategy, FallbackController};
pub use deterministic::{DeterministicPipeline, PipelineMode};
pub use synthesizer::AnswerSynthesizer;

use groundcrew_classify::{ContextSplitter, PresenceJudge, RelevanceChecker};
use groundcrew_config::AgentConfig;
use groundcrew_core::LanguageModel;
use groundcrew_core::prompt::PromptLibrary;
use groundcrew_retrieval::Retriever;
use std::sync::Arc;

/// Wire up the standard three-tier controller: autonomous first, then
/// the smart pipeline, then the strict pipeline as the last resort.
///
/// All strategies share the same component instances; everything is
/// stateless per turn, so the result can serve concurrent turns.
pub fn build_controller(
    model: Arc<dyn LanguageModel>,
    retriever: Arc<Retriever>,
    prompts: Arc<PromptLibrary>,
    agent: &AgentConfig,
) -> FallbackController {
    let splitter = Arc::new(ContextSplitter::new(model.clone(), prompts.clone()));
    let judge = Arc::new(PresenceJudge::new(model.clone(), prompts.clone()));
    let relevance = Arc::new(RelevanceChecker::new(model.clone(), prompts.clone()));
    let synthesizer = Arc::new(AnswerSynthesizer::new(model.clone(), prompts.clone()));

    let autonomous = AutonomousAdapter::new(
        model,
        splitter.clone(),
        judge.clone(),
        relevance.clone(),
        retriever.clone(),
        synthesizer.clone(),
        prompts,
    )
    .with_max_iterations(agent.max_iterations)
    .with_max_parse_failures(agent.max_parse_failures);

    let smart = DeterministicPipeline::new(
        PipelineMode::Smart,
        splitter.clone(),
        judge.clone(),
        relevance.clone(),
        retriever.clone(),
        synthesizer.clone(),
    );

    let strict = DeterministicPipeline::new(
        PipelineMode::Strict,
        splitter,
        judge,
        relevance,
        retriever,
        synthesizer,
    );

    FallbackController::new(Arc::new(autonomous), Arc::new(smart), Arc::new(strict))
}

#[cfg(test)]
pub(crate) mod test_helpers;
