//! HTTP gateway server command.

use groundcrew_gateway::GatewayState;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

pub async fn run(
    config_path: Option<PathBuf>,
    port_override: Option<u16>,
) -> Result<(), Box<dyn std::error::Error>> {
    let (config, controller) = super::build_assistant(config_path).await?;

    let port = port_override.unwrap_or(config.gateway.port);
    let state = Arc::new(GatewayState::new(controller));

    info!(host = %config.gateway.host, port, "Starting gateway");
    groundcrew_gateway::serve(state, &config.gateway.host, port).await
}
