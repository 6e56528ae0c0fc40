//! Autonomous strategy — a reasoning loop over the same capabilities.
//!
//! The model drives: each iteration it either names a capability to
//! invoke (`Action:` / `Action Input:`) or emits a `Final Answer:`. The
//! loop is bounded by an iteration limit and tolerates a bounded number
//! of malformed steps by feeding a corrective observation back.
//!
//! Two terminal conditions become user-facing strings instead of
//! errors: picking a tool outside the closed set, and running out of
//! iterations. Only a hard model failure escalates to the fallback
//! controller — the reasoning loop has no safe default for that.

use std::sync::Arc;

use async_trait::async_trait;
use groundcrew_classify::{ContextSplitter, PresenceJudge, RelevanceChecker};
use groundcrew_core::prompt::{PromptLibrary, prompt_names};
use groundcrew_core::{Capability, Error, LanguageModel};
use groundcrew_retrieval::Retriever;
use tracing::{debug, info, warn};

use crate::controller::AnswerStrategy;
use crate::synthesizer::AnswerSynthesizer;

/// Returned when the loop selects a tool outside the closed set.
pub const INVALID_TOOL_REPLY: &str = "I encountered a tool selection issue. Let me provide a \
     direct answer to your question. Please try asking again if you need more detail.";

/// Returned when the iteration limit is exhausted.
pub const ITERATION_LIMIT_REPLY: &str = "I was working on your question but reached my \
     processing limit. Please try rephrasing your question for a complete response.";

/// Returned when the loop produced no usable answer text.
pub const INCOMPLETE_REPLY: &str = "I processed your question but didn't generate a complete \
     response. Please try rephrasing your question.";

/// Final answers shorter than this fail the quality gate.
const MIN_ANSWER_CHARS: usize = 10;

/// Cleaned output shorter than this keeps the uncleaned text instead.
const MIN_CLEANED_CHARS: usize = 20;

/// Reasoning-trace line prefixes stripped from final output.
const TRACE_MARKERS: [&str; 4] = ["Action:", "Action Input:", "Observation:", "Thought:"];

pub struct AutonomousAdapter {
    model: Arc<dyn LanguageModel>,
    splitter: Arc<ContextSplitter>,
    judge: Arc<PresenceJudge>,
    relevance: Arc<RelevanceChecker>,
    retriever: Arc<Retriever>,
    synthesizer: Arc<AnswerSynthesizer>,
    prompts: Arc<PromptLibrary>,
    max_iterations: u32,
    max_parse_failures: u32,
}

/// One parsed reasoning step.
#[derive(Debug, PartialEq, Eq)]
enum LoopStep {
    Final(String),
    Invoke { name: String, input: String },
    Unparseable,
}

impl AutonomousAdapter {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        model: Arc<dyn LanguageModel>,
        splitter: Arc<ContextSplitter>,
        judge: Arc<PresenceJudge>,
        relevance: Arc<RelevanceChecker>,
        retriever: Arc<Retriever>,
        synthesizer: Arc<AnswerSynthesizer>,
        prompts: Arc<PromptLibrary>,
    ) -> Self {
        Self {
            model,
            splitter,
            judge,
            relevance,
            retriever,
            synthesizer,
            prompts,
            max_iterations: 5,
            max_parse_failures: 3,
        }
    }

    pub fn with_max_iterations(mut self, max: u32) -> Self {
        self.max_iterations = max;
        self
    }

    pub fn with_max_parse_failures(mut self, max: u32) -> Self {
        self.max_parse_failures = max;
        self
    }

    /// Run the reasoning loop for one turn.
    ///
    /// Returns `Err` only when the model itself fails — every other
    /// outcome is a string.
    pub async fn run(&self, turn: &str) -> Result<String, Error> {
        let tools = Self::tool_descriptions();
        let mut scratchpad = String::new();
        let mut parse_failures = 0u32;

        info!(max_iter = self.max_iterations, "Reasoning loop starting");

        for iteration in 1..=self.max_iterations {
            debug!(iteration, "Reasoning iteration");

            let prompt = self.prompts.render(
                prompt_names::REACT,
                &[
                    ("tools", tools.as_str()),
                    ("input", turn),
                    ("scratchpad", scratchpad.as_str()),
                ],
            );

            let output = self.model.generate(&prompt).await?;

            match parse_step(&output) {
                LoopStep::Final(answer) => {
                    info!(iteration, "Reasoning loop produced final answer");
                    return Ok(finalize(answer));
                }
                LoopStep::Invoke { name, input } => {
                    let Some(capability) = Capability::from_named(&name, &input) else {
                        warn!(tool = %name, "Reasoning loop selected an unknown tool");
                        return Ok(INVALID_TOOL_REPLY.to_string());
                    };

                    debug!(tool = capability.name(), "Dispatching capability");
                    let observation = self.dispatch(capability).await;

                    scratchpad.push_str(output.trim());
                    scratchpad.push_str(&format!("\nObservation: {observation}\nThought: "));
                }
                LoopStep::Unparseable => {
                    parse_failures += 1;
                    warn!(parse_failures, "Unparseable reasoning step");
                    if parse_failures > self.max_parse_failures {
                        return Ok(INCOMPLETE_REPLY.to_string());
                    }
                    scratchpad.push_str(
                        "\nObservation: Invalid response format. Use the exact \
                         Thought/Action/Action Input format, or give a Final Answer.\nThought: ",
                    );
                }
            }
        }

        warn!(max_iter = self.max_iterations, "Reasoning loop hit iteration limit");
        Ok(ITERATION_LIMIT_REPLY.to_string())
    }

    /// Exhaustive dispatch over the closed capability set.
    ///
    /// Infallible: a failing synthesize becomes an error observation,
    /// the way any tool failure is reported back to the loop.
    async fn dispatch(&self, capability: Capability) -> String {
        match capability {
            Capability::Split { turn } => self.splitter.split(&turn).await.to_marker_string(),
            Capability::JudgePresence { turn } => self.judge.judge(&turn).await.status.to_string(),
            Capability::CheckRelevance { payload } => {
                self.relevance.check_payload(&payload).await.status.to_string()
            }
            Capability::Retrieve { query } => self.retriever.retrieve(&query).await,
            Capability::Synthesize { question, context } => {
                match self.synthesizer.synthesize(&question, &context).await {
                    Ok(answer) => answer,
                    Err(e) => format!("Error: {e}"),
                }
            }
        }
    }

    /// Tool list for the reasoning prompt.
    fn tool_descriptions() -> String {
        [
            "- context_splitter: Separate background information from the actual question. \
             Returns 'Context: <context>' and 'Question: <question>' lines.",
            "- context_presence_judge: Determine if the user provided sufficient context. \
             Returns 'context_provided' or 'context_missing'.",
            "- context_relevance_checker: Check if context is relevant to the question. Pass \
             both as 'Context: ... Question: ...'. Returns 'relevant' or 'irrelevant'.",
            "- web_search: Search for information when you need external knowledge. Input is \
             the search query.",
            "- answer_synthesizer: Produce the final answer. Pass 'Context: ... Question: ...' \
             (context may be empty).",
        ]
        .join("\n")
    }
}

/// Parse one model output into a reasoning step.
fn parse_step(output: &str) -> LoopStep {
    if let Some((_, rest)) = output.split_once("Final Answer:") {
        return LoopStep::Final(rest.trim().to_string());
    }

    let mut name: Option<&str> = None;
    let mut input: Option<&str> = None;
    for line in output.lines() {
        let line = line.trim();
        // "Action Input:" must be tested first: its prefix overlaps "Action:".
        if let Some(rest) = line.strip_prefix("Action Input:") {
            input.get_or_insert(rest.trim());
        } else if let Some(rest) = line.strip_prefix("Action:") {
            name.get_or_insert(rest.trim());
        }
    }

    match name {
        Some(name) => LoopStep::Invoke {
            name: name.to_string(),
            input: input.unwrap_or_default().to_string(),
        },
        None => LoopStep::Unparseable,
    }
}

/// Strip leaked trace-marker lines and apply the minimum-length gate.
fn finalize(answer: String) -> String {
    let answer = strip_trace_markers(answer);
    if answer.trim().chars().count() < MIN_ANSWER_CHARS {
        INCOMPLETE_REPLY.to_string()
    } else {
        answer
    }
}

/// Remove reasoning-trace lines when present, keeping the original text
/// if too little survives the cleanup.
fn strip_trace_markers(text: String) -> String {
    if !text.contains("Action:") && !text.contains("Observation:") {
        return text;
    }

    let cleaned = text
        .lines()
        .filter(|line| {
            let trimmed = line.trim_start();
            !TRACE_MARKERS.iter().any(|marker| trimmed.starts_with(marker))
        })
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string();

    if cleaned.chars().count() > MIN_CLEANED_CHARS {
        cleaned
    } else {
        text
    }
}

#[async_trait]
impl AnswerStrategy for AutonomousAdapter {
    fn name(&self) -> &str {
        "autonomous"
    }

    async fn answer(&self, turn: &str) -> Result<String, Error> {
        self.run(turn).await
    }
}
