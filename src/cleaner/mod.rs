use crate::safety::PolicyGate;
use crate::scanner::FileRecord;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    Deleted,
    Skipped,
    Failed,
}

/// Terminal result for one selected record. Exactly one outcome is
/// emitted per input item, in input order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletionOutcome {
    pub path: PathBuf,
    pub status: OutcomeStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

#[derive(Debug, Clone)]
pub enum DeleteEvent {
    Outcome(DeletionOutcome),
    Complete(DeleteSummary),
}

#[derive(Debug, Clone, Default)]
pub struct DeleteSummary {
    pub deleted: usize,
    pub skipped: usize,
    pub failed: usize,
    pub bytes_freed: u64,
    pub duration: Duration,
}

/// Item-granularity progress; each finalized outcome (including skips
/// and failures) advances it by one.
#[derive(Debug, Clone, Copy)]
pub struct DeletionProgress {
    completed_items: u32,
    total_items: u32,
}

impl DeletionProgress {
    pub fn new(total_items: u32) -> Self {
        Self {
            completed_items: 0,
            total_items,
        }
    }

    pub fn item_done(&mut self) {
        self.completed_items = (self.completed_items + 1).min(self.total_items);
    }

    pub fn percent(&self) -> u8 {
        if self.total_items == 0 {
            100
        } else {
            (u64::from(self.completed_items) * 100 / u64::from(self.total_items)) as u8
        }
    }

    pub fn is_complete(&self) -> bool {
        self.completed_items == self.total_items
    }
}

/// A running deletion: total item count plus the live outcome stream.
pub struct DeleteSession {
    pub total_items: usize,
    pub events: Receiver<DeleteEvent>,
}

impl DeleteSession {
    pub fn progress(&self) -> DeletionProgress {
        DeletionProgress::new(self.total_items as u32)
    }
}

/// Deletes selected records one at a time on a background worker.
///
/// Per item: consult the policy gate (and the confirmation callback when
/// it fires), attempt the primary filesystem remove, fall back to the
/// platform remove command when the path is still present, and emit one
/// outcome. Nothing encountered mid-run aborts the remaining items, and
/// already-performed deletions are never rolled back.
pub struct DeletionPipeline {
    gate: PolicyGate,
    use_fallback: bool,
}

impl DeletionPipeline {
    pub fn new(gate: PolicyGate) -> Self {
        Self {
            gate,
            use_fallback: true,
        }
    }

    pub fn with_fallback(mut self, enabled: bool) -> Self {
        self.use_fallback = enabled;
        self
    }

    /// Starts deleting `items` in order. `confirm` is called synchronously
    /// from the worker for every gated path and blocks the pipeline until
    /// answered; a `false` answer skips the item without touching it.
    pub fn delete<F>(&self, items: Vec<FileRecord>, confirm: F) -> DeleteSession
    where
        F: Fn(&Path) -> bool + Send + 'static,
    {
        let (tx, rx) = channel();
        let total_items = items.len();
        let gate = self.gate.clone();
        let use_fallback = self.use_fallback;

        thread::spawn(move || run_delete(items, &gate, use_fallback, &confirm, &tx));

        DeleteSession {
            total_items,
            events: rx,
        }
    }
}

impl Default for DeletionPipeline {
    fn default() -> Self {
        Self::new(PolicyGate::default())
    }
}

fn run_delete<F>(
    items: Vec<FileRecord>,
    gate: &PolicyGate,
    use_fallback: bool,
    confirm: &F,
    tx: &Sender<DeleteEvent>,
) where
    F: Fn(&Path) -> bool,
{
    let start = Instant::now();
    let mut summary = DeleteSummary::default();

    for item in items {
        let outcome = if gate.requires_confirmation(&item.path) && !confirm(&item.path) {
            DeletionOutcome {
                path: item.path.clone(),
                status: OutcomeStatus::Skipped,
                detail: Some("user declined".to_string()),
            }
        } else {
            match remove_with_fallback(&item.path, use_fallback) {
                Ok(()) => DeletionOutcome {
                    path: item.path.clone(),
                    status: OutcomeStatus::Deleted,
                    detail: None,
                },
                Err(detail) => DeletionOutcome {
                    path: item.path.clone(),
                    status: OutcomeStatus::Failed,
                    detail: Some(detail),
                },
            }
        };

        match outcome.status {
            OutcomeStatus::Deleted => {
                summary.deleted += 1;
                summary.bytes_freed += item.size_bytes;
            }
            OutcomeStatus::Skipped => summary.skipped += 1,
            OutcomeStatus::Failed => summary.failed += 1,
        }

        // A detached consumer stops observing, but the run itself always
        // finishes; there is no cancellation mid-pipeline.
        let _ = tx.send(DeleteEvent::Outcome(outcome));
    }

    summary.duration = start.elapsed();
    let _ = tx.send(DeleteEvent::Complete(summary));
}

/// Removes one path, trusting success only once the path is really gone.
/// Any error from either attempt is reduced to a detail string for the
/// item's outcome; nothing propagates.
fn remove_with_fallback(path: &Path, use_fallback: bool) -> Result<(), String> {
    let primary = fs::remove_file(path);
    if !path.exists() {
        return Ok(());
    }

    let primary_detail = match primary {
        Ok(()) => "remove reported success but the file is still present".to_string(),
        Err(e) => e.to_string(),
    };

    if !use_fallback {
        return Err(primary_detail);
    }

    match native_remove(path) {
        Ok(status) => {
            if !path.exists() {
                Ok(())
            } else {
                Err(format!(
                    "{primary_detail}; fallback exited with {status} and the file is still present"
                ))
            }
        }
        Err(e) => Err(format!("{primary_detail}; fallback failed to launch: {e}")),
    }
}

#[cfg(unix)]
fn native_remove(path: &Path) -> std::io::Result<std::process::ExitStatus> {
    Command::new("rm").arg("-f").arg(path).status()
}

#[cfg(windows)]
fn native_remove(path: &Path) -> std::io::Result<std::process::ExitStatus> {
    Command::new("cmd")
        .args(["/c", "del", "/f", "/q"])
        .arg(path)
        .status()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tempfile::tempdir;

    fn record(path: &Path, size: u64) -> FileRecord {
        FileRecord::new(path.to_path_buf(), size)
    }

    fn make_file(path: &Path, size: u64) -> FileRecord {
        let file = std::fs::File::create(path).unwrap();
        file.set_len(size).unwrap();
        record(path, size)
    }

    fn drain(session: DeleteSession) -> (Vec<DeletionOutcome>, Vec<u8>, Option<DeleteSummary>) {
        let mut progress = session.progress();
        let mut outcomes = Vec::new();
        let mut percents = vec![progress.percent()];
        let mut summary = None;

        for event in session.events.iter() {
            match event {
                DeleteEvent::Outcome(outcome) => {
                    outcomes.push(outcome);
                    progress.item_done();
                    percents.push(progress.percent());
                }
                DeleteEvent::Complete(s) => summary = Some(s),
            }
        }

        (outcomes, percents, summary)
    }

    // Tempdirs live on the OS volume, so the default unix gate would fire
    // for every test path; an off-volume gate keeps items ungated.
    fn ungated() -> PolicyGate {
        PolicyGate::new("/Volumes/NotMounted")
    }

    #[test]
    fn one_outcome_per_item_in_input_order() {
        let dir = tempdir().unwrap();
        let a = make_file(&dir.path().join("a.bin"), 100);
        let b = make_file(&dir.path().join("b.bin"), 200);
        let c = make_file(&dir.path().join("c.bin"), 300);

        let asked = Arc::new(AtomicUsize::new(0));
        let asked_in_confirm = Arc::clone(&asked);
        let pipeline = DeletionPipeline::new(ungated());
        let session = pipeline.delete(vec![a.clone(), b.clone(), c.clone()], move |_| {
            asked_in_confirm.fetch_add(1, Ordering::SeqCst);
            true
        });
        let (outcomes, percents, summary) = drain(session);

        let paths: Vec<_> = outcomes.iter().map(|o| o.path.clone()).collect();
        assert_eq!(paths, vec![a.path, b.path, c.path]);
        assert!(outcomes.iter().all(|o| o.status == OutcomeStatus::Deleted));
        assert_eq!(asked.load(Ordering::SeqCst), 0);
        assert_eq!(percents, vec![0, 33, 66, 100]);

        let summary = summary.unwrap();
        assert_eq!(summary.deleted, 3);
        assert_eq!(summary.bytes_freed, 600);
    }

    #[cfg(unix)]
    #[test]
    fn declined_gated_items_are_skipped_untouched() {
        let dir = tempdir().unwrap();
        let a = make_file(&dir.path().join("a.bin"), 100);
        let b = make_file(&dir.path().join("b.bin"), 200);

        // Everything in the tempdir is on "/", so this gates both items.
        let pipeline = DeletionPipeline::new(PolicyGate::new("/"));
        let session = pipeline.delete(vec![a.clone(), b.clone()], |_| false);
        let (outcomes, _, summary) = drain(session);

        assert!(outcomes.iter().all(|o| o.status == OutcomeStatus::Skipped));
        assert_eq!(
            outcomes[0].detail.as_deref(),
            Some("user declined")
        );
        assert!(a.path.exists());
        assert!(b.path.exists());
        assert_eq!(summary.unwrap().skipped, 2);
    }

    #[cfg(unix)]
    #[test]
    fn confirmed_gated_item_is_deleted() {
        let dir = tempdir().unwrap();
        let a = make_file(&dir.path().join("a.bin"), 100);

        let pipeline = DeletionPipeline::new(PolicyGate::new("/"));
        let session = pipeline.delete(vec![a.clone()], |_| true);
        let (outcomes, _, _) = drain(session);

        assert_eq!(outcomes[0].status, OutcomeStatus::Deleted);
        assert!(!a.path.exists());
    }

    #[cfg(unix)]
    #[test]
    fn deleted_then_skipped_scenario() {
        let dir = tempdir().unwrap();
        let keep = dir.path().join("gated.bin");
        let first = make_file(&dir.path().join("plain.bin"), 100);
        let second = make_file(&keep, 200);

        let decline = keep.clone();
        let pipeline = DeletionPipeline::new(PolicyGate::new("/"));
        let session = pipeline.delete(vec![first, second], move |path| path != decline.as_path());
        let (outcomes, percents, _) = drain(session);

        let statuses: Vec<_> = outcomes.iter().map(|o| o.status).collect();
        assert_eq!(statuses, vec![OutcomeStatus::Deleted, OutcomeStatus::Skipped]);
        assert!(keep.exists());
        assert_eq!(percents, vec![0, 50, 100]);
    }

    #[test]
    fn primary_success_needs_no_fallback() {
        let dir = tempdir().unwrap();
        let a = make_file(&dir.path().join("a.bin"), 100);

        let pipeline = DeletionPipeline::new(ungated()).with_fallback(false);
        let session = pipeline.delete(vec![a.clone()], |_| true);
        let (outcomes, _, _) = drain(session);

        assert_eq!(outcomes[0].status, OutcomeStatus::Deleted);
        assert!(!a.path.exists());
    }

    #[test]
    fn already_absent_path_counts_as_deleted() {
        let dir = tempdir().unwrap();
        let ghost = record(&dir.path().join("ghost.bin"), 100);

        let pipeline = DeletionPipeline::new(ungated()).with_fallback(false);
        let session = pipeline.delete(vec![ghost], |_| true);
        let (outcomes, _, _) = drain(session);

        // Post-condition is what matters: the path no longer exists.
        assert_eq!(outcomes[0].status, OutcomeStatus::Deleted);
    }

    #[test]
    fn undeletable_path_fails_without_aborting_the_rest() {
        let dir = tempdir().unwrap();
        // A directory defeats both remove_file and the file fallback.
        let stubborn = dir.path().join("stubborn");
        std::fs::create_dir(&stubborn).unwrap();
        let bad = record(&stubborn, 0);
        let good = make_file(&dir.path().join("good.bin"), 100);

        let pipeline = DeletionPipeline::new(ungated());
        let session = pipeline.delete(vec![bad, good.clone()], |_| true);
        let (outcomes, _, summary) = drain(session);

        assert_eq!(outcomes[0].status, OutcomeStatus::Failed);
        assert!(outcomes[0].detail.is_some());
        assert_eq!(outcomes[1].status, OutcomeStatus::Deleted);
        assert!(!good.path.exists());

        let summary = summary.unwrap();
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.deleted, 1);
    }

    #[test]
    fn empty_selection_completes_immediately() {
        let pipeline = DeletionPipeline::new(ungated());
        let session = pipeline.delete(Vec::new(), |_| true);
        let progress = session.progress();
        let (outcomes, _, summary) = drain(session);

        assert!(outcomes.is_empty());
        assert_eq!(progress.percent(), 100);
        assert_eq!(summary.unwrap().deleted, 0);
    }
}
