//! Severance question-answering agent.
//!
//! Classifies each question as a knowledge question or a data query,
//! answers it from the static corpus or the record store, and attaches a
//! structured trace of how the answer was produced.

pub mod agent;
pub mod classifier;
pub mod executor;
pub mod format;
pub mod knowledge;
pub mod matcher;
pub mod trace;
pub mod types;


// Re-export commonly used types
pub use agent::SeveranceAgent;
pub use classifier::{ClassifiedIntent, Classifier};
pub use knowledge::KnowledgeBase;
pub use trace::Trace;
pub use types::{
    Action, AggregateQuery, AnswerPayload, AnswerResult, DataQuery, EngineConfig, Intent,
};
