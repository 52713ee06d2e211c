//! Command handlers for the Cesantías Agent CLI.
//!
//! This module organizes all CLI commands into separate submodules.

pub mod ask;
pub mod chat;
pub mod demo;
pub mod stats;

// Re-export command types for convenience
pub use ask::AskCommand;
pub use chat::ChatCommand;
pub use demo::DemoCommand;
pub use stats::StatsCommand;

use cesantias_agent::AnswerResult;
use cesantias_core::{AppError, AppResult};

/// JSON envelope for one answered question.
pub(crate) fn answer_json(question: &str, result: &AnswerResult) -> serde_json::Value {
    let payload = result.to_payload();
    serde_json::json!({
        "success": true,
        "question": question,
        "answer": payload.answer,
        "action": payload.action,
        "thinking": payload.thinking,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    })
}

pub(crate) fn print_json(value: &serde_json::Value) -> AppResult<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| AppError::Serialization(e.to_string()))?;
    println!("{}", json);
    Ok(())
}
