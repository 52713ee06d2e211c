//! Agent type definitions.

use cesantias_core::config::{AppConfig, DEFAULT_MAX_QUESTION_CHARS, DEFAULT_MIN_DOCUMENT_DIGITS};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::trace::Trace;

/// Which subsystem produced an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Static domain knowledge
    Knowledge,
    /// Query over the severance records
    Excel,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Knowledge => "knowledge",
            Self::Excel => "excel",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a question asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Knowledge,
    Data(DataQuery),
}

/// A query over the severance records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataQuery {
    /// One employee's record by document identifier
    LookupById { document_id: String },
    /// Number of employees with accrued severance
    CountCausadas,
    /// Average severance amount
    AverageAmount,
    /// Other aggregate figures
    Aggregate(AggregateQuery),
}

/// Aggregate figures beyond count and average.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateQuery {
    TotalAmount,
    TotalEmployees,
    MonthRange,
}

impl Intent {
    pub fn action(&self) -> Action {
        match self {
            Self::Knowledge => Action::Knowledge,
            Self::Data(_) => Action::Excel,
        }
    }

    /// Operation name as shown in traces.
    pub fn operation(&self) -> &'static str {
        match self {
            Self::Knowledge => "knowledge",
            Self::Data(query) => query.operation(),
        }
    }

    /// Parameters extracted from the question text.
    pub fn parameters(&self) -> BTreeMap<String, String> {
        match self {
            Self::Knowledge => BTreeMap::new(),
            Self::Data(query) => query.parameters(),
        }
    }
}

impl DataQuery {
    pub fn operation(&self) -> &'static str {
        match self {
            Self::LookupById { .. } => "lookupById",
            Self::CountCausadas => "countCausadas",
            Self::AverageAmount => "averageAmount",
            Self::Aggregate(AggregateQuery::TotalAmount) => "totalAmount",
            Self::Aggregate(AggregateQuery::TotalEmployees) => "totalEmployees",
            Self::Aggregate(AggregateQuery::MonthRange) => "monthRange",
        }
    }

    pub fn parameters(&self) -> BTreeMap<String, String> {
        let mut parameters = BTreeMap::new();
        if let Self::LookupById { document_id } = self {
            parameters.insert("documentId".to_string(), document_id.clone());
        }
        parameters
    }
}

/// Answer to one question.
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerResult {
    /// Natural-language answer
    pub answer: String,

    /// Subsystem that produced the answer
    pub action: Action,

    /// Structured rationale; rendered to text by [`AnswerResult::thinking`]
    pub trace: Trace,
}

impl AnswerResult {
    pub fn new(answer: String, trace: Trace) -> Self {
        Self {
            answer,
            action: trace.action,
            trace,
        }
    }

    /// Human-readable rationale.
    pub fn thinking(&self) -> String {
        self.trace.to_string()
    }

    /// Shape handed to transports.
    pub fn to_payload(&self) -> AnswerPayload {
        AnswerPayload {
            answer: self.answer.clone(),
            action: self.action,
            thinking: self.thinking(),
        }
    }
}

/// Serialized answer: `{ answer, action, thinking }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerPayload {
    pub answer: String,
    pub action: Action,
    pub thinking: String,
}

/// Tunables of the question engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Minimum digits for a number to be read as a document identifier
    pub min_document_digits: usize,

    /// Questions longer than this are rejected
    pub max_question_chars: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_document_digits: DEFAULT_MIN_DOCUMENT_DIGITS,
            max_question_chars: DEFAULT_MAX_QUESTION_CHARS,
        }
    }
}

impl From<&AppConfig> for EngineConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            min_document_digits: config.min_document_digits,
            max_question_chars: config.max_question_chars,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intent_views() {
        let intent = Intent::Data(DataQuery::LookupById {
            document_id: "124473".to_string(),
        });

        assert_eq!(intent.action(), Action::Excel);
        assert_eq!(intent.operation(), "lookupById");
        assert_eq!(
            intent.parameters().get("documentId").map(String::as_str),
            Some("124473")
        );

        assert_eq!(Intent::Knowledge.action(), Action::Knowledge);
        assert!(Intent::Knowledge.parameters().is_empty());
    }

    #[test]
    fn test_aggregate_operation_names() {
        assert_eq!(
            DataQuery::Aggregate(AggregateQuery::MonthRange).operation(),
            "monthRange"
        );
        assert_eq!(DataQuery::CountCausadas.operation(), "countCausadas");
    }

    #[test]
    fn test_payload_json_shape() {
        let trace = Trace::new(Action::Excel, "countCausadas").with_outcome("count=3");
        let result = AnswerResult::new("3 empleados".to_string(), trace);

        let json = serde_json::to_value(result.to_payload()).unwrap();
        assert_eq!(json["action"], "excel");
        assert_eq!(json["answer"], "3 empleados");
        assert_eq!(json["thinking"], "excel/countCausadas -> count=3");
    }

    #[test]
    fn test_engine_config_from_app_config() {
        let mut app = AppConfig::default();
        app.min_document_digits = 6;
        let config = EngineConfig::from(&app);
        assert_eq!(config.min_document_digits, 6);
        assert_eq!(config.max_question_chars, DEFAULT_MAX_QUESTION_CHARS);
    }
}
