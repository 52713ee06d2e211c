//! Chat command handler.
//!
//! Reads one question per line from stdin. Each line is answered on its
//! own; there is no conversation memory.

use cesantias_agent::SeveranceAgent;
use cesantias_core::AppResult;
use clap::Args;
use tokio::io::{AsyncBufReadExt, BufReader};

use super::{answer_json, print_json};

const EXIT_WORDS: [&str; 3] = ["exit", "salir", "quit"];

/// Answer questions read line by line from stdin
#[derive(Args, Debug)]
pub struct ChatCommand {
    /// Output each answer as JSON
    #[arg(long)]
    pub json: bool,
}

impl ChatCommand {
    pub async fn execute(&self, agent: &SeveranceAgent) -> AppResult<()> {
        tracing::info!("Executing chat command");

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut answered = 0usize;

        eprintln!("Escribe tu pregunta sobre cesantías (\"salir\" para terminar).");

        while let Some(line) = lines.next_line().await? {
            let question = line.trim();
            if question.is_empty() {
                continue;
            }
            if EXIT_WORDS.contains(&question.to_lowercase().as_str()) {
                break;
            }

            match agent.process_question(question).await {
                Ok(result) if self.json => print_json(&answer_json(question, &result))?,
                Ok(result) => {
                    println!("{}", result.answer);
                    eprintln!("[{}] {}", result.action, result.thinking());
                }
                Err(e) if e.is_client_error() => eprintln!("{}", e),
                Err(e) => return Err(e),
            }

            answered += 1;
        }

        tracing::info!("Chat finished after {} questions", answered);
        Ok(())
    }
}
