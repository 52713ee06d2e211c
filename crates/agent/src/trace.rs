//! Structured rationale attached to every answer.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use crate::types::Action;

/// Which path answered a question and with what inputs.
///
/// Rendered as `excel/lookupById documentId=124473 -> record found`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Trace {
    pub action: Action,
    pub operation: String,
    /// Classification rule that fired, `None` for the knowledge fallthrough
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule: Option<String>,
    pub parameters: BTreeMap<String, String>,
    pub outcome: String,
}

impl Trace {
    pub fn new(action: Action, operation: impl Into<String>) -> Self {
        Self {
            action,
            operation: operation.into(),
            rule: None,
            parameters: BTreeMap::new(),
            outcome: String::new(),
        }
    }

    pub fn with_rule(mut self, rule: impl Into<String>) -> Self {
        self.rule = Some(rule.into());
        self
    }

    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    pub fn with_parameters(mut self, parameters: BTreeMap<String, String>) -> Self {
        self.parameters.extend(parameters);
        self
    }

    pub fn with_outcome(mut self, outcome: impl Into<String>) -> Self {
        self.outcome = outcome.into();
        self
    }
}

impl fmt::Display for Trace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.action, self.operation)?;
        if let Some(rule) = &self.rule {
            write!(f, " [rule {}]", rule)?;
        }
        for (key, value) in &self.parameters {
            write!(f, " {}={}", key, value)?;
        }
        if !self.outcome.is_empty() {
            write!(f, " -> {}", self.outcome)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_full_trace() {
        let trace = Trace::new(Action::Excel, "lookupById")
            .with_rule("1")
            .with_parameter("documentId", "124473")
            .with_outcome("record found");

        assert_eq!(
            trace.to_string(),
            "excel/lookupById [rule 1] documentId=124473 -> record found"
        );
    }

    #[test]
    fn test_render_minimal_trace() {
        let trace = Trace::new(Action::Knowledge, "knowledge");
        assert_eq!(trace.to_string(), "knowledge/knowledge");
    }

    #[test]
    fn test_parameters_render_in_key_order() {
        let trace = Trace::new(Action::Excel, "lookupById")
            .with_parameter("status", "causada")
            .with_parameter("documentId", "7");
        assert_eq!(trace.to_string(), "excel/lookupById documentId=7 status=causada");
    }
}
