//! Turn domain types.
//!
//! A turn is one raw user message. The splitter separates it into a
//! background-context segment and a question segment; the classifiers
//! attach presence and relevance verdicts. These are the value objects
//! that flow through every internal call as a typed pair — the legacy
//! `Context: ... Question: ...` marker string survives only at the
//! autonomous-loop boundary, and its round-trip lives here.

use serde::{Deserialize, Serialize};

/// The split of one turn into background context and the actual question.
///
/// Invariant: when the source turn is non-empty after trimming, `question`
/// is non-empty — a splitter that cannot find a question uses the whole
/// turn as the question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitTurn {
    /// Background text supplied by the user; may be empty.
    pub context: String,

    /// The question to answer.
    pub question: String,
}

impl SplitTurn {
    /// Create a split with context and question.
    pub fn new(context: impl Into<String>, question: impl Into<String>) -> Self {
        Self {
            context: context.into(),
            question: question.into(),
        }
    }

    /// A split with no context — the whole turn is the question.
    pub fn question_only(question: impl Into<String>) -> Self {
        Self::new("", question)
    }

    /// Whether any context was extracted.
    pub fn has_context(&self) -> bool {
        !self.context.trim().is_empty()
    }

    /// Parse the `Context: ... Question: ...` marker format.
    ///
    /// This is the string shape used at the autonomous-loop boundary,
    /// where tool arguments arrive as plain text. Without both markers
    /// the whole payload is treated as the question.
    pub fn from_marker_string(payload: &str) -> Self {
        if let Some(after_ctx) = payload.split_once("Context:").map(|(_, rest)| rest)
            && let Some((ctx, q)) = after_ctx.split_once("Question:")
        {
            return Self::new(ctx.trim(), q.trim());
        }
        Self::question_only(payload.trim())
    }

    /// Render the marker format for the autonomous-loop boundary.
    pub fn to_marker_string(&self) -> String {
        format!("Context: {}\nQuestion: {}", self.context, self.question)
    }
}

/// Whether a turn carries sufficient background context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextStatus {
    /// The turn includes background information.
    Provided,
    /// The turn is a bare question; retrieval should fill the gap.
    Missing,
}

impl std::fmt::Display for ContextStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContextStatus::Provided => write!(f, "context_provided"),
            ContextStatus::Missing => write!(f, "context_missing"),
        }
    }
}

/// Whether a context segment actually helps answer a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelevanceStatus {
    Relevant,
    Irrelevant,
}

impl std::fmt::Display for RelevanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RelevanceStatus::Relevant => write!(f, "relevant"),
            RelevanceStatus::Irrelevant => write!(f, "irrelevant"),
        }
    }
}

/// A presence classification together with how it was reached.
///
/// `defaulted` is true when the model output contained neither literal
/// status word (or the model call failed) and the judge fell back to its
/// conservative default. Tests use this to distinguish a confident
/// classification from a defaulted one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresenceVerdict {
    pub status: ContextStatus,
    pub defaulted: bool,
}

impl PresenceVerdict {
    /// A verdict read directly from model output.
    pub fn classified(status: ContextStatus) -> Self {
        Self {
            status,
            defaulted: false,
        }
    }

    /// The conservative default used on ambiguous or failed output.
    pub fn defaulted(status: ContextStatus) -> Self {
        Self {
            status,
            defaulted: true,
        }
    }
}

/// A relevance classification together with how it was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelevanceVerdict {
    pub status: RelevanceStatus,
    pub defaulted: bool,
}

impl RelevanceVerdict {
    pub fn classified(status: RelevanceStatus) -> Self {
        Self {
            status,
            defaulted: false,
        }
    }

    pub fn defaulted(status: RelevanceStatus) -> Self {
        Self {
            status,
            defaulted: true,
        }
    }
}
