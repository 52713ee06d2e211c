//! Demo command handler.

use cesantias_agent::SeveranceAgent;
use cesantias_core::AppResult;
use clap::Args;

use super::{answer_json, print_json};

/// Reference questions covering lookup, count, knowledge and average.
const DEMO_QUESTIONS: [&str; 4] = [
    "¿Cuál es el monto de cesantías para el empleado con documento 124473?",
    "¿Cuántos empleados tienen cesantías causadas?",
    "¿Qué son las cesantías y cuándo se pagan?",
    "¿Cuál es el promedio de cesantías pagadas?",
];

/// Run the reference questions
#[derive(Args, Debug)]
pub struct DemoCommand {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl DemoCommand {
    pub async fn execute(&self, agent: &SeveranceAgent) -> AppResult<()> {
        tracing::info!("Executing demo command");

        let mut answers = Vec::with_capacity(DEMO_QUESTIONS.len());

        for (i, question) in DEMO_QUESTIONS.iter().enumerate() {
            let result = agent.process_question(question).await?;

            if self.json {
                answers.push(answer_json(question, &result));
                continue;
            }

            println!("{}. {}", i + 1, question);
            println!("   {}", result.answer);
            println!("   [{}] {}", result.action, result.thinking());
            println!();
        }

        if self.json {
            print_json(&serde_json::Value::Array(answers))?;
        }

        Ok(())
    }
}
