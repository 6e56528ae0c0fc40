//! Error types for the groundcrew domain.
//!
//! Uses `thiserror` for ergonomic error definitions. The taxonomy is
//! deliberately small: almost every failure in this system is recovered
//! at the component that sees it and converted into a safe default or a
//! descriptive string. Only model invocation failures and configuration
//! problems travel as typed errors, and even those stop at the fallback
//! controller.

use thiserror::Error;

/// The top-level error type for all groundcrew operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Model errors ---
    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by language model backends.
///
/// These are the only errors allowed to cross a component boundary:
/// every consumer either degrades to a documented default or converts
/// the failure into a user-facing string.
#[derive(Debug, Clone, Error)]
pub enum ModelError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Model not configured: {0}")]
    NotConfigured(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Model returned an empty response")]
    EmptyResponse,
}
