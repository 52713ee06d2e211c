//! Rule-based intent classification.
//!
//! Rules are evaluated in [`RULES`] order and the first match wins:
//!
//! 1. `lookupById`: a document-like number plus severance or identity words
//! 2. `countCausadas`: "cuántos" plus accrual words
//! 3. `averageAmount`: "promedio" plus amount words
//! 4. `totalAmount`: "total" plus amount words
//! 5. `totalEmployees`: "cuántos" plus employee words
//! 6. `monthRange`: "rango" plus period words
//!
//! Anything else is a knowledge question. A question that mentions both a
//! document number and an aggregate is a lookup.

use cesantias_records::text::fold_text;
use regex::Regex;
use std::sync::LazyLock;

use crate::matcher::Question;
use crate::types::{AggregateQuery, DataQuery, Intent};

/// A digit run, or digits grouped with `.` thousands separators (79.123.456).
static DOCUMENT_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{1,3}(?:\.\d{3})+|\d+").unwrap());

const LOOKUP_TERMS: &[&str] = &[
    "cesantia*",
    "monto*",
    "valor*",
    "saldo*",
    "cuanto",
    "documento*",
    "cedula*",
    "identificacion*",
    "empleado*",
    "trabajador*",
    "severance",
    "amount",
    "employee*",
    "document*",
];

const COUNT_TERMS: &[&str] = &[
    "cuantos",
    "cuantas",
    "how many",
    "numero de",
    "cantidad de",
    "count",
];

const STATUS_TERMS: &[&str] = &["causad*", "accrued"];

const AVERAGE_TERMS: &[&str] = &["promedio*", "average", "mean"];

const AMOUNT_TERMS: &[&str] = &[
    "cesantia*",
    "monto*",
    "valor*",
    "pag*",
    "dinero",
    "amount*",
    "severance",
];

const TOTAL_TERMS: &[&str] = &["total*", "suma*", "sum", "acumulad*"];

const EMPLOYEE_TERMS: &[&str] = &[
    "empleado*",
    "trabajador*",
    "registro*",
    "personas",
    "employee*",
];

const RANGE_TERMS: &[&str] = &["rango", "range"];

const PERIOD_TERMS: &[&str] = &["mes*", "periodo*", "fecha*", "month*", "dato*"];

/// Stems that turn a following number into a threshold amount.
const COMPARISON_STEMS: &[&str] = &[
    "mayor", "menor", "superior", "inferior", "encima", "debajo", "mas", "menos", "exced",
    "above", "below", "over", "under", "greater", "less", "more",
];

/// How many words before a number are checked for a comparison.
const COMPARISON_WINDOW: usize = 3;

/// Classification rules in precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    LookupById,
    CountCausadas,
    AverageAmount,
    TotalAmount,
    TotalEmployees,
    MonthRange,
}

/// The rule list, highest precedence first.
pub const RULES: [Rule; 6] = [
    Rule::LookupById,
    Rule::CountCausadas,
    Rule::AverageAmount,
    Rule::TotalAmount,
    Rule::TotalEmployees,
    Rule::MonthRange,
];

impl Rule {
    /// 1-based position in [`RULES`].
    pub fn precedence(&self) -> usize {
        RULES.iter().position(|r| r == self).map_or(0, |p| p + 1)
    }
}

/// Result of classifying one question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedIntent {
    pub intent: Intent,
    /// Rule that fired, `None` when the question fell through to knowledge
    pub rule: Option<Rule>,
}

/// Deterministic classifier over question text.
#[derive(Debug, Clone)]
pub struct Classifier {
    min_document_digits: usize,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(cesantias_core::config::DEFAULT_MIN_DOCUMENT_DIGITS)
    }
}

impl Classifier {
    pub fn new(min_document_digits: usize) -> Self {
        Self {
            min_document_digits: min_document_digits.max(1),
        }
    }

    /// Classify a question. Total: every input yields an intent.
    pub fn classify(&self, text: &str) -> ClassifiedIntent {
        let question = Question::new(text);

        for rule in RULES {
            if let Some(query) = self.apply(rule, &question) {
                return ClassifiedIntent {
                    intent: Intent::Data(query),
                    rule: Some(rule),
                };
            }
        }

        ClassifiedIntent {
            intent: Intent::Knowledge,
            rule: None,
        }
    }

    fn apply(&self, rule: Rule, q: &Question) -> Option<DataQuery> {
        match rule {
            Rule::LookupById => {
                if !q.has_any(LOOKUP_TERMS) {
                    return None;
                }
                self.extract_document_id(q.folded())
                    .map(|document_id| DataQuery::LookupById { document_id })
            }
            Rule::CountCausadas => (q.has_any(COUNT_TERMS) && q.has_any(STATUS_TERMS))
                .then_some(DataQuery::CountCausadas),
            Rule::AverageAmount => (q.has_any(AVERAGE_TERMS) && q.has_any(AMOUNT_TERMS))
                .then_some(DataQuery::AverageAmount),
            Rule::TotalAmount => (q.has_any(TOTAL_TERMS) && q.has_any(AMOUNT_TERMS))
                .then_some(DataQuery::Aggregate(AggregateQuery::TotalAmount)),
            Rule::TotalEmployees => (q.has_any(COUNT_TERMS) && q.has_any(EMPLOYEE_TERMS))
                .then_some(DataQuery::Aggregate(AggregateQuery::TotalEmployees)),
            Rule::MonthRange => (q.has_any(RANGE_TERMS) && q.has_any(PERIOD_TERMS))
                .then_some(DataQuery::Aggregate(AggregateQuery::MonthRange)),
        }
    }

    /// First number in the text that reads as a document identifier.
    ///
    /// Skips numbers shorter than the configured minimum, four-digit years,
    /// currency figures (preceded by `$`) and thresholds that follow a
    /// comparison word within a few words ("mayores a 2000000").
    pub fn extract_document_id(&self, text: &str) -> Option<String> {
        DOCUMENT_NUMBER.find_iter(text).find_map(|m| {
            let grouped = m.as_str().contains('.');
            let digits: String = m.as_str().chars().filter(char::is_ascii_digit).collect();

            if digits.len() < self.min_document_digits {
                return None;
            }

            if !grouped && is_year(&digits) {
                return None;
            }

            let before = &text[..m.start()];
            if before.trim_end().ends_with('$') || follows_comparison(before) {
                return None;
            }

            Some(digits)
        })
    }
}

fn follows_comparison(before: &str) -> bool {
    before
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .rev()
        .take(COMPARISON_WINDOW)
        .map(fold_text)
        .any(|word| COMPARISON_STEMS.iter().any(|stem| word.starts_with(stem)))
}

fn is_year(digits: &str) -> bool {
    digits.len() == 4
        && digits
            .parse::<u32>()
            .map(|y| (1900..=2099).contains(&y))
            .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Action;

    fn classify(text: &str) -> ClassifiedIntent {
        Classifier::default().classify(text)
    }

    #[test]
    fn test_lookup_question() {
        let result = classify("¿Cuál es el monto de cesantías para el empleado con documento 124473?");

        assert_eq!(result.intent.action(), Action::Excel);
        assert_eq!(result.intent.operation(), "lookupById");
        assert_eq!(
            result.intent.parameters().get("documentId").map(String::as_str),
            Some("124473")
        );
        assert_eq!(result.rule, Some(Rule::LookupById));
    }

    #[test]
    fn test_count_causadas_question() {
        let result = classify("¿Cuántos empleados tienen cesantías causadas?");
        assert_eq!(result.intent, Intent::Data(DataQuery::CountCausadas));
    }

    #[test]
    fn test_knowledge_question() {
        let result = classify("¿Qué son las cesantías y cuándo se pagan?");
        assert_eq!(result.intent, Intent::Knowledge);
        assert_eq!(result.intent.action(), Action::Knowledge);
        assert_eq!(result.rule, None);
    }

    #[test]
    fn test_average_question() {
        let result = classify("¿Cuál es el promedio de cesantías pagadas?");
        assert_eq!(result.intent, Intent::Data(DataQuery::AverageAmount));
        assert_eq!(result.intent.action(), Action::Excel);
    }

    #[test]
    fn test_aggregate_questions() {
        assert_eq!(
            classify("¿Cuál es el monto total de cesantías?").intent,
            Intent::Data(DataQuery::Aggregate(AggregateQuery::TotalAmount))
        );
        assert_eq!(
            classify("¿Cuántos empleados hay registrados?").intent,
            Intent::Data(DataQuery::Aggregate(AggregateQuery::TotalEmployees))
        );
        assert_eq!(
            classify("¿Qué rango de meses cubren los datos?").intent,
            Intent::Data(DataQuery::Aggregate(AggregateQuery::MonthRange))
        );
    }

    #[test]
    fn test_no_digits_no_vocabulary_is_knowledge() {
        assert_eq!(classify("Hola, ¿cómo estás?").intent, Intent::Knowledge);
        assert_eq!(classify("").intent, Intent::Knowledge);
    }

    #[test]
    fn test_digits_without_vocabulary_are_not_a_lookup() {
        assert_eq!(classify("¿Qué pasó el 15/03/2023?").intent, Intent::Knowledge);
        assert_eq!(classify("Llámame al 3001234567").intent, Intent::Knowledge);
    }

    #[test]
    fn test_years_are_not_document_ids() {
        let result = classify("¿Cuántos empleados tienen cesantías causadas en 2024?");
        assert_eq!(result.intent, Intent::Data(DataQuery::CountCausadas));

        assert_eq!(classify("Las cesantías de 2023").intent, Intent::Knowledge);
    }

    #[test]
    fn test_short_numbers_are_not_document_ids() {
        assert_eq!(classify("cesantías del empleado 123").intent, Intent::Knowledge);

        let strict = Classifier::new(7);
        assert_eq!(
            strict.classify("cesantías del documento 124473").intent,
            Intent::Knowledge
        );
    }

    #[test]
    fn test_grouped_document_number() {
        let result = classify("Valor de cesantías de la cédula 79.123.456");
        assert_eq!(
            result.intent,
            Intent::Data(DataQuery::LookupById {
                document_id: "79123456".to_string()
            })
        );
    }

    #[test]
    fn test_currency_figures_are_skipped() {
        let result = classify("¿Cuántos empleados tienen cesantías por encima de $ 2500000?");
        assert_eq!(result.intent, Intent::Data(DataQuery::Aggregate(AggregateQuery::TotalEmployees)));
    }

    #[test]
    fn test_decomposed_accents_classify_like_precomposed() {
        let result = classify("¿Cua\u{301}ntos empleados tienen cesanti\u{301}as causadas?");
        assert_eq!(result.intent, Intent::Data(DataQuery::CountCausadas));

        let result = classify("Monto de cesanti\u{301}as de la ce\u{301}dula 124473");
        assert_eq!(result.rule, Some(Rule::LookupById));
    }

    #[test]
    fn test_threshold_amounts_are_not_document_ids() {
        let result = classify("¿Cuántos empleados tienen cesantías mayores a 2000000?");
        assert_eq!(
            result.intent,
            Intent::Data(DataQuery::Aggregate(AggregateQuery::TotalEmployees))
        );

        let result = classify("Empleados con cesantías de MÁS de 1500000 por documento");
        assert_ne!(result.rule, Some(Rule::LookupById));
    }

    #[test]
    fn test_document_after_distant_comparison_is_still_a_lookup() {
        let result = classify("¿Es mayor el monto de cesantías del empleado con documento 124473?");
        assert_eq!(
            result.intent,
            Intent::Data(DataQuery::LookupById {
                document_id: "124473".to_string()
            })
        );
    }

    #[test]
    fn test_lookup_takes_precedence_over_aggregates() {
        let result = classify("¿Cuál es el promedio de cesantías del documento 124473?");
        assert_eq!(result.rule, Some(Rule::LookupById));
    }

    #[test]
    fn test_leading_zeros_are_kept_in_parameter() {
        let result = classify("Monto de cesantías del documento 000000");
        assert_eq!(
            result.intent.parameters().get("documentId").map(String::as_str),
            Some("000000")
        );
    }

    #[test]
    fn test_rule_precedence_numbers() {
        assert_eq!(Rule::LookupById.precedence(), 1);
        assert_eq!(Rule::MonthRange.precedence(), 6);
    }
}
