pub mod coordinator;
pub mod filter;
pub mod walker;

pub use coordinator::{ScanCoordinator, ScanEvent, ScanProgress, ScanSession, ScanSummary};
pub use filter::SizeFilter;
pub use walker::TreeWalker;

use crate::volumes;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One discovered file at or above the size threshold. Immutable once
/// created; the consumer owns accumulation and selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    pub path: PathBuf,
    pub size_bytes: u64,
    pub volume: String,
}

impl FileRecord {
    pub fn new(path: PathBuf, size_bytes: u64) -> Self {
        let volume = volumes::volume_id(&path);
        Self {
            path,
            size_bytes,
            volume,
        }
    }
}
