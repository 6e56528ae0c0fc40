//! The closed set of capabilities the reasoning loop can invoke.
//!
//! The autonomous strategy exposes the same components the deterministic
//! pipelines use, but behind names the model picks at runtime. Rather
//! than a stringly-typed tool lookup, the loop parses each step into one
//! of these tagged variants and the adapter matches exhaustively — an
//! unknown name surfaces as `None` exactly once, at the parse boundary.

use serde::{Deserialize, Serialize};

use crate::turn::SplitTurn;

/// One capability invocation requested by the reasoning loop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Capability {
    /// Separate a raw turn into context and question.
    Split { turn: String },
    /// Classify whether a turn carries background context.
    JudgePresence { turn: String },
    /// Classify whether a context helps answer a question.
    /// The payload is the marker-string shape tool calls arrive in.
    CheckRelevance { payload: String },
    /// Fetch external text for a query.
    Retrieve { query: String },
    /// Produce the final answer for a question with optional context.
    Synthesize { question: String, context: String },
}

impl Capability {
    /// The tool names advertised to the reasoning loop.
    pub const NAMES: [&'static str; 5] = [
        "context_splitter",
        "context_presence_judge",
        "context_relevance_checker",
        "web_search",
        "answer_synthesizer",
    ];

    /// Resolve a named tool call into a typed capability.
    ///
    /// Returns `None` for names outside the closed set — the adapter
    /// treats that as an invalid tool selection.
    pub fn from_named(name: &str, input: &str) -> Option<Self> {
        let input = input.trim();
        match name.trim() {
            "context_splitter" => Some(Self::Split { turn: input.into() }),
            "context_presence_judge" => Some(Self::JudgePresence { turn: input.into() }),
            "context_relevance_checker" => Some(Self::CheckRelevance {
                payload: input.into(),
            }),
            "web_search" => Some(Self::Retrieve {
                query: input.into(),
            }),
            "answer_synthesizer" => {
                let split = SplitTurn::from_marker_string(input);
                Some(Self::Synthesize {
                    question: split.question,
                    context: split.context,
                })
            }
            _ => None,
        }
    }

    /// The advertised name of this capability.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Split { .. } => "context_splitter",
            Self::JudgePresence { .. } => "context_presence_judge",
            Self::CheckRelevance { .. } => "context_relevance_checker",
            Self::Retrieve { .. } => "web_search",
            Self::Synthesize { .. } => "answer_synthesizer",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_every_advertised_name() {
        for name in Capability::NAMES {
            let cap = Capability::from_named(name, "some input").unwrap();
            assert_eq!(cap.name(), name);
        }
    }

    #[test]
    fn unknown_name_is_rejected() {
        assert!(Capability::from_named("None", "x").is_none());
        assert!(Capability::from_named("shell", "ls").is_none());
    }

    #[test]
    fn synthesize_parses_marker_payload() {
        let cap = Capability::from_named(
            "answer_synthesizer",
            "Context: ML is a subset of AI.\nQuestion: What are the main types?",
        )
        .unwrap();
        match cap {
            Capability::Synthesize { question, context } => {
                assert_eq!(question, "What are the main types?");
                assert_eq!(context, "ML is a subset of AI.");
            }
            other => panic!("Expected Synthesize, got {other:?}"),
        }
    }

    #[test]
    fn synthesize_without_markers_is_bare_question() {
        let cap = Capability::from_named("answer_synthesizer", "What is Rust?").unwrap();
        match cap {
            Capability::Synthesize { question, context } => {
                assert_eq!(question, "What is Rust?");
                assert!(context.is_empty());
            }
            other => panic!("Expected Synthesize, got {other:?}"),
        }
    }

    #[test]
    fn names_are_trimmed_before_lookup() {
        let cap = Capability::from_named("  web_search ", " rust ownership ").unwrap();
        assert_eq!(
            cap,
            Capability::Retrieve {
                query: "rust ownership".into()
            }
        );
    }
}
