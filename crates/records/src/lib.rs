//! Severance record store.
//!
//! Loads the severance dataset once from a [`RecordSource`], keeps it in
//! memory read-only, and computes aggregate statistics over it.

pub mod parser;
pub mod source;
pub mod stats;
pub mod store;
pub mod text;
pub mod types;

// Re-export commonly used types
pub use source::{CsvSource, MemorySource, RecordSource};
pub use stats::{compute_stats, AggregateStats, EMPTY_RANGE};
pub use store::RecordStore;
pub use types::{Period, SeveranceRecord, SeveranceStatus};
