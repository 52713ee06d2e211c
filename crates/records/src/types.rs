//! Severance record type definitions.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::text::fold_text;

const MONTH_NAMES: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

/// Three-letter month prefixes accepted in text periods (Spanish and English).
const MONTH_PREFIXES: [(&str, u32); 16] = [
    ("ene", 1),
    ("jan", 1),
    ("feb", 2),
    ("mar", 3),
    ("abr", 4),
    ("apr", 4),
    ("may", 5),
    ("jun", 6),
    ("jul", 7),
    ("ago", 8),
    ("aug", 8),
    ("sep", 9),
    ("set", 9),
    ("oct", 10),
    ("nov", 11),
    ("dic", 12),
];

/// One row of the severance dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeveranceRecord {
    /// Employee document identifier as it appears in the source
    pub document_id: String,

    /// Employee name, when the source carries one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Accrued severance amount in Colombian pesos
    pub amount: f64,

    /// Whether the severance has accrued
    pub status: SeveranceStatus,

    /// Calendar month the record pertains to
    pub period: Period,
}

impl SeveranceRecord {
    /// Create a record without an employee name.
    pub fn new(
        document_id: impl Into<String>,
        amount: f64,
        status: SeveranceStatus,
        period: Period,
    ) -> Self {
        Self {
            document_id: document_id.into(),
            name: None,
            amount,
            status,
            period,
        }
    }

    /// Attach an employee name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Accrual status of a severance record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeveranceStatus {
    /// The amount has accrued and the employee is eligible
    Causada,
    /// Not accrued yet
    NoCausada,
}

impl SeveranceStatus {
    /// Parse a status cell. Returns `None` for values that are neither.
    pub fn parse(value: &str) -> Option<Self> {
        let folded = fold_text(value.trim());
        match folded.as_str() {
            "causada" | "causado" | "causadas" | "causados" | "si" | "s" | "true" | "1" | "x"
            | "yes" | "accrued" => Some(Self::Causada),
            "" | "no causada" | "no causado" | "no causadas" | "no_causada" | "pendiente"
            | "no" | "n" | "false" | "0" | "not accrued" => Some(Self::NoCausada),
            _ => None,
        }
    }

    /// Whether the severance has accrued.
    pub fn is_accrued(&self) -> bool {
        matches!(self, Self::Causada)
    }

    /// Spanish label used in answers.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Causada => "causadas",
            Self::NoCausada => "no causadas",
        }
    }
}

/// A calendar year and month.
///
/// Ordering is chronological, which is what the month range relies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Period {
    year: i32,
    month: u32,
}

impl Period {
    /// Create a period; `None` when the month is not in 1..=12.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        if (1..=12).contains(&month) && (1900..=2200).contains(&year) {
            Some(Self { year, month })
        } else {
            None
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Spanish label, e.g. `"marzo 2024"`.
    pub fn label(&self) -> String {
        format!("{} {}", MONTH_NAMES[(self.month - 1) as usize], self.year)
    }

    /// Parse the period formats found in payroll exports.
    ///
    /// Accepts `2024-03`, `2024/03`, `2024-03-15`, `03/2024`, `202403`,
    /// `15/03/2024`, `marzo 2024` and `mar-2024`.
    pub fn parse(value: &str) -> Option<Self> {
        let folded = fold_text(value.trim());
        if folded.is_empty() {
            return None;
        }

        if folded.chars().any(|c| c.is_alphabetic()) {
            return Self::parse_named(&folded);
        }

        let parts: Vec<&str> = folded
            .split(|c: char| !c.is_ascii_digit())
            .filter(|p| !p.is_empty())
            .collect();

        match parts.as_slice() {
            [compact] if compact.len() == 6 || compact.len() == 8 => {
                Self::from_parts(&compact[..4], &compact[4..6])
            }
            [first, second] if first.len() == 4 => Self::from_parts(first, second),
            [first, second] if second.len() == 4 => Self::from_parts(second, first),
            [first, second, _] if first.len() == 4 => Self::from_parts(first, second),
            [_, second, third] if third.len() == 4 => Self::from_parts(third, second),
            _ => None,
        }
    }

    fn parse_named(folded: &str) -> Option<Self> {
        let mut month = None;
        let mut year = None;

        for token in folded
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            if token.len() == 4 && token.chars().all(|c| c.is_ascii_digit()) {
                year = token.parse::<i32>().ok();
            } else if month.is_none() && token.len() >= 3 {
                month = MONTH_PREFIXES
                    .iter()
                    .find(|(prefix, _)| token.starts_with(prefix))
                    .map(|(_, m)| *m);
            }
        }

        Self::new(year?, month?)
    }

    fn from_parts(year: &str, month: &str) -> Option<Self> {
        Self::new(year.parse().ok()?, month.parse().ok()?)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl From<Period> for String {
    fn from(period: Period) -> Self {
        period.to_string()
    }
}

impl TryFrom<String> for Period {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Period::parse(&value).ok_or_else(|| format!("invalid period: {}", value))
    }
}
