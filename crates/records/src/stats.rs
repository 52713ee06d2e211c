//! Aggregate statistics over the severance records.
//!
//! Totals and averages cover every record regardless of accrual status.
//! Answers about a single employee report that record's own amount next to
//! its status, so a per-record figure is always part of the published total.

use serde::{Deserialize, Serialize};

use crate::types::{Period, SeveranceRecord};

/// Month range marker used when there are no records.
pub const EMPTY_RANGE: &str = "sin datos";

/// Summary statistics, recomputed on every request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateStats {
    /// Number of records
    pub total_employees: usize,

    /// Sum of all amounts
    pub total_amount: f64,

    /// `total_amount / total_employees`, zero when there are no records
    pub average_amount: f64,

    /// Earliest to latest period, or [`EMPTY_RANGE`]
    pub month_range: String,

    /// Records whose severance has accrued
    pub accrued_employees: usize,
}

impl AggregateStats {
    pub fn is_empty(&self) -> bool {
        self.total_employees == 0
    }
}

/// Compute the statistics in a single pass.
pub fn compute_stats<'a>(records: impl IntoIterator<Item = &'a SeveranceRecord>) -> AggregateStats {
    let mut count = 0usize;
    let mut accrued = 0usize;
    let mut total = 0.0f64;
    let mut bounds: Option<(Period, Period)> = None;

    for record in records {
        count += 1;
        total += record.amount;
        if record.status.is_accrued() {
            accrued += 1;
        }
        bounds = Some(match bounds {
            None => (record.period, record.period),
            Some((first, last)) => (first.min(record.period), last.max(record.period)),
        });
    }

    let average_amount = if count == 0 { 0.0 } else { total / count as f64 };

    AggregateStats {
        total_employees: count,
        total_amount: total,
        average_amount,
        month_range: format_range(bounds),
        accrued_employees: accrued,
    }
}

fn format_range(bounds: Option<(Period, Period)>) -> String {
    match bounds {
        None => EMPTY_RANGE.to_string(),
        Some((first, last)) if first == last => first.label(),
        Some((first, last)) => format!("{} - {}", first.label(), last.label()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SeveranceStatus;
    use proptest::prelude::*;

    fn record(id: &str, amount: f64, accrued: bool, year: i32, month: u32) -> SeveranceRecord {
        let status = if accrued {
            SeveranceStatus::Causada
        } else {
            SeveranceStatus::NoCausada
        };
        SeveranceRecord::new(id, amount, status, Period::new(year, month).unwrap())
    }

    #[test]
    fn test_empty_stats() {
        let records: Vec<SeveranceRecord> = Vec::new();
        let stats = compute_stats(&records);

        assert_eq!(stats.total_employees, 0);
        assert_eq!(stats.total_amount, 0.0);
        assert_eq!(stats.average_amount, 0.0);
        assert!(!stats.average_amount.is_nan());
        assert_eq!(stats.month_range, EMPTY_RANGE);
        assert!(stats.is_empty());
    }

    #[test]
    fn test_stats_over_all_records() {
        let records = vec![
            record("1", 1_000_000.0, true, 2024, 3),
            record("2", 3_000_000.0, false, 2023, 11),
            record("3", 2_000_000.0, true, 2024, 1),
        ];

        let stats = compute_stats(&records);
        assert_eq!(stats.total_employees, 3);
        assert_eq!(stats.accrued_employees, 2);
        assert_eq!(stats.total_amount, 6_000_000.0);
        assert_eq!(stats.average_amount, 2_000_000.0);
        assert_eq!(stats.month_range, "noviembre 2023 - marzo 2024");
    }

    #[test]
    fn test_single_period_range() {
        let records = vec![record("1", 10.0, true, 2024, 6), record("2", 20.0, true, 2024, 6)];
        assert_eq!(compute_stats(&records).month_range, "junio 2024");
    }

    #[test]
    fn test_stats_json_shape() {
        let stats = compute_stats(&[record("1", 10.0, true, 2024, 6)]);
        let json = serde_json::to_value(&stats).unwrap();

        for key in [
            "totalEmployees",
            "totalAmount",
            "averageAmount",
            "monthRange",
            "accruedEmployees",
        ] {
            assert!(json.get(key).is_some(), "missing {}", key);
        }
    }

    proptest! {
        #[test]
        fn prop_totals_are_consistent(amounts in proptest::collection::vec(0u64..100_000_000, 1..100)) {
            let records: Vec<SeveranceRecord> = amounts
                .iter()
                .enumerate()
                .map(|(i, amount)| record(&i.to_string(), *amount as f64, i % 2 == 0, 2024, 1))
                .collect();

            let stats = compute_stats(&records);
            let expected: f64 = records.iter().map(|r| r.amount).sum();

            prop_assert_eq!(stats.total_employees, records.len());
            prop_assert!((stats.total_amount - expected).abs() < 1e-6);
            let average = stats.total_amount / stats.total_employees as f64;
            prop_assert!((stats.average_amount - average).abs() < 1e-6);
        }
    }
}
