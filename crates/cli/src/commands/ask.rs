//! One-shot question answering.

use std::path::PathBuf;

pub async fn run(
    config_path: Option<PathBuf>,
    question: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let (_config, controller) = super::build_assistant(config_path).await?;
    let answer = controller.handle(question).await;
    println!("{answer}");
    Ok(())
}
