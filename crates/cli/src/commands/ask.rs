//! Ask command handler.
//!
//! Answers one question and prints the answer with its rationale.

use cesantias_agent::SeveranceAgent;
use cesantias_core::AppResult;
use clap::Args;

use super::{answer_json, print_json};

/// Answer a single question
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The question to ask
    pub question: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl AskCommand {
    pub async fn execute(&self, agent: &SeveranceAgent) -> AppResult<()> {
        tracing::info!("Executing ask command");
        tracing::debug!("Question: {}", self.question);

        let result = agent.process_question(&self.question).await?;

        if self.json {
            print_json(&answer_json(&self.question, &result))?;
        } else {
            println!("{}", result.answer);
            eprintln!("[{}] {}", result.action, result.thinking());
        }

        Ok(())
    }
}
