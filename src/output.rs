use crate::cleaner::{DeleteSummary, DeletionOutcome};
use crate::scanner::{FileRecord, ScanSummary};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const REPORT_VERSION: &str = "1.0";

/// JSON shape written by `scan --format json` / `--out` and read back by
/// `delete --from`. Feeding a saved report into the deletion pipeline is
/// the only way records enter it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    pub version: String,
    pub roots: Vec<PathBuf>,
    pub threshold_bytes: u64,
    pub records: Vec<FileRecord>,
    pub record_count: usize,
    pub total_size_bytes: u64,
    pub scan_duration_ms: u64,
}

impl ScanReport {
    pub fn new(
        roots: Vec<PathBuf>,
        threshold_bytes: u64,
        records: Vec<FileRecord>,
        summary: &ScanSummary,
    ) -> Self {
        Self {
            version: REPORT_VERSION.to_string(),
            roots,
            threshold_bytes,
            record_count: records.len(),
            total_size_bytes: summary.total_bytes,
            scan_duration_ms: summary.duration.as_millis() as u64,
            records,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteReport {
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scan_file: Option<String>,
    pub outcomes: Vec<DeletionOutcome>,
    pub deleted_count: usize,
    pub skipped_count: usize,
    pub failed_count: usize,
    pub freed_bytes: u64,
    pub duration_ms: u64,
}

impl DeleteReport {
    pub fn new(
        scan_file: Option<String>,
        outcomes: Vec<DeletionOutcome>,
        summary: &DeleteSummary,
    ) -> Self {
        Self {
            version: REPORT_VERSION.to_string(),
            scan_file,
            outcomes,
            deleted_count: summary.deleted,
            skipped_count: summary.skipped,
            failed_count: summary.failed,
            freed_bytes: summary.bytes_freed,
            duration_ms: summary.duration.as_millis() as u64,
        }
    }
}
