//! # Groundcrew Core
//!
//! Domain types, traits, and error definitions for the groundcrew
//! context-resolving assistant. This crate has **zero framework
//! dependencies** — it defines the domain model that all other crates
//! implement against.
//!
//! ## Design Philosophy
//!
//! The two external capabilities the core consumes (language model
//! invocation and web search) are defined as traits here. Implementations
//! live in their respective crates. This enables:
//! - Swapping backends via configuration
//! - Easy testing with scripted mock implementations
//! - Clean dependency graph (all crates depend inward on core)

pub mod capability;
pub mod error;
pub mod model;
pub mod prompt;
pub mod search;
pub mod turn;

// Re-export key types at crate root for ergonomics
pub use capability::Capability;
pub use error::{Error, ModelError, Result};
pub use model::LanguageModel;
pub use prompt::{PromptLibrary, prompt_names};
pub use search::SearchBackend;
pub use turn::{ContextStatus, PresenceVerdict, RelevanceStatus, RelevanceVerdict, SplitTurn};
