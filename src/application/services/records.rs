//! Patient record store service
//!
//! Appends encoded records to the text store and reads them back for summaries.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::FixedOffset;
use tracing::{debug, warn};

use crate::application::{ApplicationResult, IoResultExt};
use crate::domain::{
    decode_blocks, summarize, PatientRecord, RecordBlock, SummaryScope, SummaryStats,
};
use crate::infrastructure::traits::FileSystem;

/// Service for the append-only patient record store.
pub struct RecordStore {
    fs: Arc<dyn FileSystem>,
    path: PathBuf,
    offset: FixedOffset,
}

impl RecordStore {
    /// Create a store backed by `path`; timestamps are read in `offset`.
    pub fn new(fs: Arc<dyn FileSystem>, path: PathBuf, offset: FixedOffset) -> Self {
        Self { fs, path, offset }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.fs.exists(&self.path)
    }

    /// Append one record block.
    ///
    /// Failing to persist a diagnosis is an operational error and is
    /// returned to the caller.
    pub fn append(&self, record: &PatientRecord) -> ApplicationResult<()> {
        debug!("append: {}", self.path.display());
        self.fs
            .ensure_parent(&self.path)
            .with_path_context("create record directory", &self.path)?;
        self.fs
            .append(&self.path, &record.encode())
            .with_path_context("append patient record", &self.path)
    }

    /// Decode every block in the store; `None` if the store does not exist.
    pub fn load_blocks(&self) -> ApplicationResult<Option<Vec<RecordBlock>>> {
        if !self.exists() {
            debug!("load_blocks: no store at {}", self.path.display());
            return Ok(None);
        }
        let content = self
            .fs
            .read_to_string(&self.path)
            .with_path_context("read patient records", &self.path)?;
        Ok(Some(decode_blocks(&content)))
    }

    /// Records that convert cleanly; malformed blocks are logged and skipped.
    pub fn load_records(&self) -> ApplicationResult<Vec<PatientRecord>> {
        let blocks = self.load_blocks()?.unwrap_or_default();
        let records = blocks
            .iter()
            .enumerate()
            .filter_map(|(i, block)| match block.to_record(self.offset) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!("load_records: skipping block {}: {}", i + 1, e);
                    None
                }
            })
            .collect();
        Ok(records)
    }

    /// Summary of the store; `None` if the store does not exist.
    pub fn summary(&self, scope: SummaryScope) -> ApplicationResult<Option<SummaryStats>> {
        Ok(self
            .load_blocks()?
            .map(|blocks| summarize(&blocks, scope, self.offset)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Diagnosis, Gender, Severity};
    use crate::infrastructure::traits::RealFileSystem;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn pst() -> FixedOffset {
        FixedOffset::east_opt(5 * 3600).unwrap()
    }

    fn record(severity: Severity, feedback: Option<&str>) -> PatientRecord {
        PatientRecord {
            timestamp: pst().with_ymd_and_hms(2026, 10, 14, 9, 30, 0).unwrap(),
            zone_label: "PST".into(),
            name: "Bilal".into(),
            age: 41.0,
            gender: Gender::Male,
            answers: vec![],
            diagnosis: Diagnosis::new("msg").with_severity(severity),
            feedback: feedback.map(String::from),
        }
    }

    #[test]
    fn given_missing_store_when_summarizing_then_none() {
        let temp = TempDir::new().unwrap();
        let store = RecordStore::new(Arc::new(RealFileSystem), temp.path().join("none.txt"), pst());

        assert!(store.summary(SummaryScope::AllTime).unwrap().is_none());
        assert!(store.load_records().unwrap().is_empty());
    }

    #[test]
    fn given_appended_records_when_summarizing_then_counts_match() {
        let temp = TempDir::new().unwrap();
        let store = RecordStore::new(
            Arc::new(RealFileSystem),
            temp.path().join("nested").join("records.txt"),
            pst(),
        );

        store.append(&record(Severity::Medium, Some("yes"))).unwrap();
        store.append(&record(Severity::High, Some("no"))).unwrap();
        store.append(&record(Severity::Medium, None)).unwrap();

        let stats = store.summary(SummaryScope::AllTime).unwrap().unwrap();
        assert_eq!(stats.total_cases, 3);
        assert_eq!(stats.by_severity.get("Medium"), Some(&2));
        assert_eq!(stats.by_severity.get("High"), Some(&1));
        assert_eq!(stats.helpful_count, 1);
        assert_eq!(stats.feedback_total, 2);
        assert_eq!(store.load_records().unwrap().len(), 3);
    }

    #[test]
    fn given_malformed_block_when_loading_records_then_skipped() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("records.txt");
        std::fs::write(&path, "=== Patient Record ===\nSeverity: Low\n").unwrap();
        let store = RecordStore::new(Arc::new(RealFileSystem), path, pst());

        store.append(&record(Severity::Low, None)).unwrap();

        assert_eq!(store.load_records().unwrap().len(), 1);
        let stats = store.summary(SummaryScope::AllTime).unwrap().unwrap();
        assert_eq!(stats.total_cases, 1);
        assert_eq!(stats.by_severity.get("Low"), Some(&2));
    }
}
