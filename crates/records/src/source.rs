//! Data sources that yield severance records.

use async_trait::async_trait;
use cesantias_core::{AppError, AppResult};
use std::path::{Path, PathBuf};

use crate::parser::parse_csv;
use crate::types::SeveranceRecord;

/// A read-only tabular source of severance records.
#[async_trait]
pub trait RecordSource: Send + Sync + std::fmt::Debug {
    /// Human-readable description for logs (e.g., a file path)
    fn describe(&self) -> String;

    /// Read every record from the source.
    async fn load(&self) -> AppResult<Vec<SeveranceRecord>>;
}

/// CSV export of the severance spreadsheet.
#[derive(Debug, Clone)]
pub struct CsvSource {
    path: PathBuf,
    delimiter: Option<u8>,
}

impl CsvSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            delimiter: None,
        }
    }

    /// Use a fixed delimiter instead of detecting it from the header line.
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = Some(delimiter);
        self
    }
}

#[async_trait]
impl RecordSource for CsvSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn load(&self) -> AppResult<Vec<SeveranceRecord>> {
        if !self.path.exists() {
            return Err(AppError::DataLoad(format!(
                "Severance data file not found: {:?}",
                self.path
            )));
        }

        let bytes = tokio::fs::read(&self.path).await.map_err(|e| {
            AppError::DataLoad(format!("Failed to read {:?}: {}", self.path, e))
        })?;

        let text = decode(bytes, &self.path);
        parse_csv(&text, self.delimiter)
    }
}

/// Decode UTF-8, falling back to Latin-1 for spreadsheet exports saved
/// with a Windows code page.
fn decode(bytes: Vec<u8>, path: &Path) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => {
            tracing::warn!("{:?} is not valid UTF-8, decoding as Latin-1", path);
            err.into_bytes().iter().map(|&b| b as char).collect()
        }
    }
}

/// Records already held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    records: Vec<SeveranceRecord>,
}

impl MemorySource {
    pub fn new(records: Vec<SeveranceRecord>) -> Self {
        Self { records }
    }
}

#[async_trait]
impl RecordSource for MemorySource {
    fn describe(&self) -> String {
        format!("memory ({} records)", self.records.len())
    }

    async fn load(&self) -> AppResult<Vec<SeveranceRecord>> {
        Ok(self.records.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Period, SeveranceStatus};
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_csv_source_missing_file() {
        let temp = TempDir::new().unwrap();
        let source = CsvSource::new(temp.path().join("nope.csv"));

        let err = source.load().await.unwrap_err();
        assert!(matches!(err, AppError::DataLoad(_)));
        assert!(err.to_string().contains("not found"));
    }

    #[tokio::test]
    async fn test_csv_source_reads_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("cesantias.csv");
        std::fs::write(
            &path,
            "documento,monto,estado,mes\n124473,2500000,causada,2024-01\n555,0,no,2024-02\n",
        )
        .unwrap();

        let records = CsvSource::new(&path).load().await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].document_id, "124473");
        assert_eq!(records[1].status, SeveranceStatus::NoCausada);
    }

    #[tokio::test]
    async fn test_csv_source_latin1_fallback() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("latin1.csv");
        // "Cédula" with é encoded as 0xE9
        let mut bytes = b"C\xe9dula;Monto;Estado;Mes\n".to_vec();
        bytes.extend_from_slice(b"42;1000;causada;2024-05\n");
        std::fs::write(&path, bytes).unwrap();

        let records = CsvSource::new(&path).load().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].period, Period::new(2024, 5).unwrap());
    }

    #[tokio::test]
    async fn test_csv_source_fixed_delimiter() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("pipe.csv");
        std::fs::write(&path, "documento|monto|estado|mes\n7|10|si|2024-03\n").unwrap();

        let records = CsvSource::new(&path)
            .with_delimiter(b'|')
            .load()
            .await
            .unwrap();
        assert_eq!(records.len(), 1);
    }

    #[tokio::test]
    async fn test_memory_source() {
        let record = SeveranceRecord::new(
            "1",
            10.0,
            SeveranceStatus::Causada,
            Period::new(2024, 1).unwrap(),
        );
        let source = MemorySource::new(vec![record.clone()]);

        assert_eq!(source.load().await.unwrap(), vec![record]);
        assert_eq!(source.describe(), "memory (1 records)");
    }
}
