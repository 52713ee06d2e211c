//! In-memory severance record store.

use cesantias_core::{AppError, AppResult};
use std::collections::HashMap;

use crate::parser::document_key;
use crate::source::RecordSource;
use crate::types::SeveranceRecord;

/// Read-only collection of severance records indexed by document identifier.
#[derive(Debug, Default)]
pub struct RecordStore {
    records: Vec<SeveranceRecord>,
    index: HashMap<String, usize>,
}

impl RecordStore {
    /// Build a store, enforcing the dataset invariants.
    ///
    /// Fails when an identifier is blank or duplicated (after normalization)
    /// or when an amount is negative or not finite.
    pub fn from_records(records: Vec<SeveranceRecord>) -> AppResult<Self> {
        let mut index = HashMap::with_capacity(records.len());

        for (position, record) in records.iter().enumerate() {
            let key = document_key(&record.document_id).ok_or_else(|| {
                AppError::DataLoad(format!("Record {} has no document identifier", position + 1))
            })?;

            if !record.amount.is_finite() || record.amount < 0.0 {
                return Err(AppError::DataLoad(format!(
                    "Record for document {} has an invalid amount: {}",
                    record.document_id, record.amount
                )));
            }

            if let Some(previous) = index.insert(key, position) {
                return Err(AppError::DataLoad(format!(
                    "Duplicate document identifier {} (records {} and {})",
                    record.document_id,
                    previous + 1,
                    position + 1
                )));
            }
        }

        Ok(Self { records, index })
    }

    /// Load all records from a source.
    pub async fn load(source: &dyn RecordSource) -> AppResult<Self> {
        tracing::info!("Loading severance records from {}", source.describe());

        let records = source.load().await?;
        let store = Self::from_records(records)?;

        tracing::info!(
            "Loaded {} severance records ({} accrued)",
            store.len(),
            store.count_accrued()
        );

        Ok(store)
    }

    /// Find the record for a document identifier.
    ///
    /// `"00124473"`, `"124473.0"` and `" 124473 "` all find document `124473`.
    pub fn find_by_id(&self, document_id: &str) -> Option<&SeveranceRecord> {
        let key = document_key(document_id)?;
        self.index.get(&key).map(|&position| &self.records[position])
    }

    pub fn all(&self) -> &[SeveranceRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of records whose severance has accrued.
    pub fn count_accrued(&self) -> usize {
        self.records.iter().filter(|r| r.status.is_accrued()).count()
    }
}
