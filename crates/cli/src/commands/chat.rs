//! Interactive chat loop.

use std::io::Write;
use std::path::PathBuf;

pub async fn run(config_path: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let (_config, controller) = super::build_assistant(config_path).await?;

    println!("Type 'quit' or 'exit' to stop the assistant");

    let stdin = std::io::stdin();
    loop {
        print!("\nYou: ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.read_line(&mut line)? == 0 {
            // EOF
            println!("\nGoodbye!");
            break;
        }

        let input = line.trim();
        if matches!(input.to_lowercase().as_str(), "quit" | "exit" | "q") {
            println!("Goodbye!");
            break;
        }
        if input.is_empty() {
            continue;
        }

        let response = controller.handle(input).await;
        println!("Assistant: {response}");
    }

    Ok(())
}
