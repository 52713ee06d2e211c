//! Data query execution against the record store.

use cesantias_records::{compute_stats, AggregateStats, RecordStore, SeveranceRecord};

use crate::format::{format_currency, group_thousands};
use crate::trace::Trace;
use crate::types::{Action, AggregateQuery, DataQuery};

/// Answer text and rationale for one executed query.
#[derive(Debug, Clone, PartialEq)]
pub struct Execution {
    pub answer: String,
    pub trace: Trace,
}

/// Runs [`DataQuery`] values against a loaded store.
pub struct QueryExecutor<'a> {
    store: &'a RecordStore,
}

impl<'a> QueryExecutor<'a> {
    pub fn new(store: &'a RecordStore) -> Self {
        Self { store }
    }

    pub fn execute(&self, query: &DataQuery) -> Execution {
        let trace = Trace::new(Action::Excel, query.operation()).with_parameters(query.parameters());

        match query {
            DataQuery::LookupById { document_id } => self.lookup(document_id, trace),
            DataQuery::CountCausadas => self.count_causadas(trace),
            DataQuery::AverageAmount => self.average(trace),
            DataQuery::Aggregate(aggregate) => self.aggregate(*aggregate, trace),
        }
    }

    fn lookup(&self, document_id: &str, trace: Trace) -> Execution {
        match self.store.find_by_id(document_id) {
            Some(record) => Execution {
                answer: describe_record(document_id, record),
                trace: trace.with_outcome(format!(
                    "record found: amount={} status={} period={}",
                    format_currency(record.amount),
                    record.status.label(),
                    record.period
                )),
            },
            None => {
                tracing::debug!("No severance record for document {}", document_id);
                Execution {
                    answer: format!(
                        "No encontré registros de cesantías para el documento {}. \
                         Verifica el número e intenta de nuevo.",
                        document_id
                    ),
                    trace: trace.with_outcome(format!("no record among {}", self.store.len())),
                }
            }
        }
    }

    fn count_causadas(&self, trace: Trace) -> Execution {
        let accrued = self.store.count_accrued();
        let total = self.store.len();

        let answer = match accrued {
            1 => format!(
                "Hay 1 empleado con cesantías causadas, de un total de {} registrados.",
                group_thousands(total as u64)
            ),
            n => format!(
                "Hay {} empleados con cesantías causadas, de un total de {} registrados.",
                group_thousands(n as u64),
                group_thousands(total as u64)
            ),
        };

        Execution {
            answer,
            trace: trace.with_outcome(format!("count={} of {}", accrued, total)),
        }
    }

    fn average(&self, trace: Trace) -> Execution {
        let stats = self.stats();

        if stats.is_empty() {
            return Execution {
                answer: "No hay registros de cesantías cargados, el promedio es $0.".to_string(),
                trace: trace.with_outcome("no records"),
            };
        }

        Execution {
            answer: format!(
                "El promedio de cesantías es {} calculado sobre {} empleados.",
                format_currency(stats.average_amount),
                group_thousands(stats.total_employees as u64)
            ),
            trace: trace.with_outcome(format!(
                "average={} over {}",
                format_currency(stats.average_amount),
                stats.total_employees
            )),
        }
    }

    fn aggregate(&self, query: AggregateQuery, trace: Trace) -> Execution {
        let stats = self.stats();

        match query {
            AggregateQuery::TotalAmount => Execution {
                answer: format!(
                    "El monto total de cesantías es {} para {} empleados.",
                    format_currency(stats.total_amount),
                    group_thousands(stats.total_employees as u64)
                ),
                trace: trace.with_outcome(format!("total={}", format_currency(stats.total_amount))),
            },
            AggregateQuery::TotalEmployees => Execution {
                answer: format!(
                    "Hay {} empleados registrados, {} con cesantías causadas.",
                    group_thousands(stats.total_employees as u64),
                    group_thousands(stats.accrued_employees as u64)
                ),
                trace: trace.with_outcome(format!("employees={}", stats.total_employees)),
            },
            AggregateQuery::MonthRange if stats.is_empty() => Execution {
                answer: "No hay registros de cesantías cargados.".to_string(),
                trace: trace.with_outcome(format!("range={}", stats.month_range)),
            },
            AggregateQuery::MonthRange => Execution {
                answer: format!("Los datos cubren el periodo {}.", stats.month_range),
                trace: trace.with_outcome(format!("range={}", stats.month_range)),
            },
        }
    }

    fn stats(&self) -> AggregateStats {
        compute_stats(self.store.all())
    }
}

fn describe_record(document_id: &str, record: &SeveranceRecord) -> String {
    let who = match &record.name {
        Some(name) => format!("El empleado con documento {} ({})", document_id, name),
        None => format!("El empleado con documento {}", document_id),
    };

    format!(
        "{} tiene cesantías {} por {} correspondientes a {}.",
        who,
        record.status.label(),
        format_currency(record.amount),
        record.period.label()
    )
}
