use super::{FileRecord, SizeFilter, TreeWalker};
use crate::error::ScanError;
use crate::volumes::{self, ScanRoot};
use rayon::prelude::*;
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread;
use std::time::{Duration, Instant};

/// Incremental scan output, delivered over the session channel as the
/// walkers produce it.
#[derive(Debug, Clone)]
pub enum ScanEvent {
    /// A qualifying file was discovered.
    Found(FileRecord),
    /// One root's traversal finished in full.
    RootDone { root: PathBuf },
    /// The last root finished; no further events follow.
    Complete(ScanSummary),
}

#[derive(Debug, Clone)]
pub struct ScanSummary {
    pub record_count: usize,
    pub total_bytes: u64,
    pub duration: Duration,
}

/// Root-granularity progress. A root counts as done only when its entire
/// traversal has finished, so the fraction is coarse but monotone and
/// hits 100 exactly when the last root completes.
#[derive(Debug, Clone, Copy)]
pub struct ScanProgress {
    completed_roots: u32,
    total_roots: u32,
}

impl ScanProgress {
    pub fn new(total_roots: u32) -> Self {
        Self {
            completed_roots: 0,
            total_roots,
        }
    }

    pub fn root_done(&mut self) {
        self.completed_roots = (self.completed_roots + 1).min(self.total_roots);
    }

    pub fn percent(&self) -> u8 {
        if self.total_roots == 0 {
            100
        } else {
            (u64::from(self.completed_roots) * 100 / u64::from(self.total_roots)) as u8
        }
    }

    pub fn is_complete(&self) -> bool {
        self.completed_roots == self.total_roots
    }
}

/// A running scan: the resolved roots plus the live event stream. The
/// stream ends after `Complete`; dropping the session lets the worker
/// wind down on its own.
pub struct ScanSession {
    pub roots: Vec<PathBuf>,
    pub events: Receiver<ScanEvent>,
}

impl ScanSession {
    pub fn progress(&self) -> ScanProgress {
        ScanProgress::new(self.roots.len() as u32)
    }
}

/// Resolves a scan mode into concrete roots and drives one walker per
/// root on a background worker, streaming records as they are found.
pub struct ScanCoordinator {
    filter: SizeFilter,
}

impl ScanCoordinator {
    pub fn new(threshold: u64) -> Self {
        Self {
            filter: SizeFilter::new(threshold),
        }
    }

    /// Starts a scan for `mode`. Root resolution happens here, so an
    /// invalid root fails the call before any traversal or event.
    pub fn scan(&self, mode: &ScanRoot) -> Result<ScanSession, ScanError> {
        let roots = mode.resolve(volumes::list_volume_roots)?;
        Ok(self.scan_roots(roots))
    }

    /// Starts a scan over already-resolved roots.
    pub fn scan_roots(&self, roots: Vec<PathBuf>) -> ScanSession {
        let (tx, rx) = channel();
        let filter = self.filter;
        let worker_roots = roots.clone();

        thread::spawn(move || run_scan(worker_roots, filter, &tx));

        ScanSession { roots, events: rx }
    }
}

impl Default for ScanCoordinator {
    fn default() -> Self {
        Self {
            filter: SizeFilter::default(),
        }
    }
}

fn run_scan(roots: Vec<PathBuf>, filter: SizeFilter, tx: &Sender<ScanEvent>) {
    let start = Instant::now();
    let walker = TreeWalker::new(filter);

    // Roots walk in parallel; records from different roots may interleave
    // but each carries its own volume attribution, and RootDone fires once
    // per root regardless of finish order.
    let totals: Vec<(usize, u64)> = roots
        .par_iter()
        .map_with(tx.clone(), |tx, root| {
            let mut count = 0usize;
            let mut bytes = 0u64;
            for record in walker.walk(root) {
                count += 1;
                bytes += record.size_bytes;
                if tx.send(ScanEvent::Found(record)).is_err() {
                    break;
                }
            }
            let _ = tx.send(ScanEvent::RootDone { root: root.clone() });
            (count, bytes)
        })
        .collect();

    let record_count = totals.iter().map(|(count, _)| count).sum();
    let total_bytes = totals.iter().map(|(_, bytes)| bytes).sum();
    let _ = tx.send(ScanEvent::Complete(ScanSummary {
        record_count,
        total_bytes,
        duration: start.elapsed(),
    }));
}
