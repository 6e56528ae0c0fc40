//! Language model backends for groundcrew.
//!
//! All backends implement the `groundcrew_core::LanguageModel` trait.
//! The factory selects the correct backend from configuration.

pub mod ollama;
pub mod openai_compat;

pub use ollama::OllamaModel;
pub use openai_compat::OpenAiCompatModel;

use groundcrew_config::ModelConfig;
use groundcrew_core::{Error, LanguageModel};
use std::sync::Arc;

/// Build the configured language model backend.
pub fn build_model(config: &ModelConfig) -> Result<Arc<dyn LanguageModel>, Error> {
    match config.backend.as_str() {
        "ollama" => Ok(Arc::new(OllamaModel::new(
            &config.base_url,
            &config.model,
            config.timeout_secs,
        ))),
        "openai" => Ok(Arc::new(OpenAiCompatModel::new(
            &config.base_url,
            &config.model,
            config.api_key.clone().unwrap_or_default(),
            config.timeout_secs,
        ))),
        other => Err(Error::Config {
            message: format!("unknown model backend '{other}'"),
        }),
    }
}
