use std::path::PathBuf;
use thiserror::Error;

/// Errors that can abort a scan before traversal begins.
///
/// Everything encountered mid-traversal (permission denied, vanished
/// entries, unreadable attributes) is absorbed at entry granularity by the
/// walker and never reaches the caller; only root resolution can fail.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("invalid scan root {}: not an existing directory", path.display())]
    InvalidRoot { path: PathBuf },
}
