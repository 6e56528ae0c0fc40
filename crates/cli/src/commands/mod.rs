//! CLI subcommand implementations.

pub mod ask;
pub mod chat;
pub mod serve;

use groundcrew_config::AppConfig;
use groundcrew_core::LanguageModel;
use groundcrew_core::prompt::PromptLibrary;
use groundcrew_model::build_model;
use groundcrew_pipeline::{FallbackController, build_controller};
use groundcrew_retrieval::Retriever;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

/// Load configuration and assemble the full answer engine.
pub(crate) async fn build_assistant(
    config_path: Option<PathBuf>,
) -> Result<(AppConfig, Arc<FallbackController>), Box<dyn std::error::Error>> {
    let config = match &config_path {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load()?,
    };

    let model = build_model(&config.model)?;
    if model.ping().await {
        info!(backend = model.name(), model = %config.model.model, "Model backend reachable");
    } else {
        warn!(
            backend = model.name(),
            "Model backend did not respond to the connectivity probe; \
             turns will rely on fallback handling"
        );
    }

    let prompts = Arc::new(PromptLibrary::load(config.prompts.dir.as_deref()));
    let retriever = Arc::new(Retriever::from_config(&config.search));
    let controller = Arc::new(build_controller(model, retriever, prompts, &config.agent));

    Ok((config, controller))
}
