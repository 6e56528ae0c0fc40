//! Prompt templates for the classifiers, synthesizer, and reasoning loop.
//!
//! Each template is a named text file with `{slot}` interpolation
//! markers. Operators can override any template by dropping a
//! `<name>.txt` file into the configured prompts directory; a missing or
//! unreadable file falls back to the built-in default with identical
//! slots. Startup never aborts over prompts.

use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, warn};

/// Template names known to the library.
pub mod prompt_names {
    pub const CONTEXT_SPLITTER: &str = "context_splitter";
    pub const CONTEXT_JUDGE: &str = "context_judge";
    pub const CONTEXT_RELEVANCE: &str = "context_relevance";
    pub const GROUNDED_ANSWER: &str = "grounded_answer";
    pub const GENERAL_ANSWER: &str = "general_answer";
    pub const REACT: &str = "react";

    pub const ALL: [&str; 6] = [
        CONTEXT_SPLITTER,
        CONTEXT_JUDGE,
        CONTEXT_RELEVANCE,
        GROUNDED_ANSWER,
        GENERAL_ANSWER,
        REACT,
    ];
}

const DEFAULT_CONTEXT_SPLITTER: &str = r#"You extract two fields from a user message: CONTEXT and QUESTION.

Rules:
- CONTEXT: only background details, definitions, examples, snippets the user provided.
- QUESTION: the actual question the user wants answered.
- If the message is just a question, CONTEXT should be empty.
- Output exactly in this format (no extra text):
CONTEXT:
<context here>

QUESTION:
<question here>

User Message:
{input}"#;

const DEFAULT_CONTEXT_JUDGE: &str = r#"You are a context analyzer. Determine if the user's message includes background context or is just a direct question.

Rules:
- If the message includes background information, output "context_provided"
- If the message is just a direct question without context, output "context_missing"

User Message: {input}

Decision:"#;

const DEFAULT_CONTEXT_RELEVANCE: &str = r#"You judge whether a piece of background context helps answer a question.

Context:
{context}

Question: {question}

If the context contains information useful for answering the question, output "relevant".
If the context is about a different topic and does not help, output "irrelevant".

Decision:"#;

const DEFAULT_GROUNDED_ANSWER: &str = r#"Based on the following context, provide a comprehensive and well-structured answer to the user's question.

Context:
{context}

Question: {question}

Instructions:
- Provide a clear, detailed answer that directly addresses the question
- Use the context information to give accurate and relevant details
- If the context doesn't fully address the question, acknowledge that and provide what information you can

Answer:"#;

const DEFAULT_GENERAL_ANSWER: &str = r#"Please answer the following question based on your knowledge:

Question: {question}

Provide a helpful and informative answer. If you need more specific context to give a better answer, please mention what additional information would be helpful.

Answer:"#;

const DEFAULT_REACT: &str = r#"You are an intelligent assistant that can make autonomous decisions about which tools to use to answer user questions.

You have access to these tools:
{tools}

Use the following format:

Thought: I need to think about what the user is asking and which tools might help.
Action: [tool name]
Action Input: [input to the tool]
Observation: [result from tool]
... (repeat Thought/Action/Action Input/Observation as needed)
Thought: I now have enough information to answer the question.
Final Answer: [your comprehensive answer to the user]

Begin!

Question: {input}
Thought: {scratchpad}"#;

/// A set of named templates, resolved once at startup.
#[derive(Debug, Clone)]
pub struct PromptLibrary {
    templates: HashMap<&'static str, String>,
}

impl PromptLibrary {
    /// Library containing only the built-in defaults.
    pub fn builtin() -> Self {
        let mut templates = HashMap::new();
        templates.insert(prompt_names::CONTEXT_SPLITTER, DEFAULT_CONTEXT_SPLITTER.into());
        templates.insert(prompt_names::CONTEXT_JUDGE, DEFAULT_CONTEXT_JUDGE.into());
        templates.insert(prompt_names::CONTEXT_RELEVANCE, DEFAULT_CONTEXT_RELEVANCE.into());
        templates.insert(prompt_names::GROUNDED_ANSWER, DEFAULT_GROUNDED_ANSWER.into());
        templates.insert(prompt_names::GENERAL_ANSWER, DEFAULT_GENERAL_ANSWER.into());
        templates.insert(prompt_names::REACT, DEFAULT_REACT.into());
        Self { templates }
    }

    /// Load templates from a directory, falling back per-file to the
    /// built-in defaults. A `None` directory yields the defaults.
    pub fn load(dir: Option<&Path>) -> Self {
        let mut library = Self::builtin();
        let Some(dir) = dir else {
            return library;
        };

        for name in prompt_names::ALL {
            let path = dir.join(format!("{name}.txt"));
            match std::fs::read_to_string(&path) {
                Ok(text) if !text.trim().is_empty() => {
                    debug!(template = name, path = %path.display(), "Loaded prompt override");
                    library.templates.insert(name, text.trim().to_string());
                }
                Ok(_) => {
                    warn!(template = name, "Prompt override is empty, keeping built-in default");
                }
                Err(_) => {
                    // Missing file: the built-in default stays in place.
                }
            }
        }
        library
    }

    /// Fetch a template's raw text. Unknown names fall back to the
    /// general-answer template rather than panicking.
    pub fn raw(&self, name: &str) -> &str {
        self.templates
            .get(name)
            .map(String::as_str)
            .unwrap_or(DEFAULT_GENERAL_ANSWER)
    }

    /// Render a template, substituting each `{slot}` with its value.
    pub fn render(&self, name: &str, vars: &[(&str, &str)]) -> String {
        let mut text = self.raw(name).to_string();
        for (slot, value) in vars {
            text = text.replace(&format!("{{{slot}}}"), value);
        }
        text
    }
}

impl Default for PromptLibrary {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_covers_every_name() {
        let lib = PromptLibrary::builtin();
        for name in prompt_names::ALL {
            assert!(!lib.raw(name).is_empty(), "missing default for {name}");
        }
    }

    #[test]
    fn render_fills_slots() {
        let lib = PromptLibrary::builtin();
        let text = lib.render(
            prompt_names::CONTEXT_RELEVANCE,
            &[
                ("context", "CSS selectors style web pages."),
                ("question", "What is LangChain?"),
            ],
        );
        assert!(text.contains("CSS selectors style web pages."));
        assert!(text.contains("What is LangChain?"));
        assert!(!text.contains("{context}"));
        assert!(!text.contains("{question}"));
    }

    #[test]
    fn missing_directory_yields_defaults() {
        let lib = PromptLibrary::load(Some(Path::new("/nonexistent/prompts")));
        assert_eq!(
            lib.raw(prompt_names::CONTEXT_JUDGE),
            PromptLibrary::builtin().raw(prompt_names::CONTEXT_JUDGE)
        );
    }

    #[test]
    fn file_overrides_builtin() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("context_judge.txt"),
            "Custom judge prompt: {input}",
        )
        .unwrap();

        let lib = PromptLibrary::load(Some(dir.path()));
        assert_eq!(lib.raw(prompt_names::CONTEXT_JUDGE), "Custom judge prompt: {input}");
        // Untouched templates keep their defaults.
        assert!(lib.raw(prompt_names::CONTEXT_SPLITTER).contains("CONTEXT"));
    }

    #[test]
    fn empty_override_keeps_default() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("general_answer.txt"), "   \n").unwrap();

        let lib = PromptLibrary::load(Some(dir.path()));
        assert!(lib.raw(prompt_names::GENERAL_ANSWER).contains("{question}"));
    }

    #[test]
    fn unknown_template_name_falls_back() {
        let lib = PromptLibrary::builtin();
        assert!(lib.raw("no_such_template").contains("{question}"));
    }
}
