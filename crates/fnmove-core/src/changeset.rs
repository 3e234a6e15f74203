//! ChangeSet: snapshot, render, preview and commit of one operation.
//!
//! A [`ChangeSet`] tracks one [`ChangeRecord`] per touched unit and walks a
//! validated state machine:
//!
//! ```text
//! Planning -> Rendering -> (Previewing -> Confirmed | Declined) -> Committing -> Done | RolledBack | Failed
//! ```
//!
//! Commit is all-or-nothing. Before the first write every file is re-read
//! and compared against the hash taken when it was tracked. Writes are then
//! issued in sorted path order; if one fails, every file whose write was
//! attempted (the failing one included) is restored to its original bytes.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::diff::FileDiff;
use crate::error::{FnMoveError, FnMoveResult};
use crate::hash::ContentHash;
use crate::interaction::{confirm, PreviewSink, Prompt};
use crate::store::FileStore;

/// Question asked after the preview.
pub const CONFIRM_QUESTION: &str = "Apply these changes? [y/n]";

// ============================================================================
// State
// ============================================================================

/// Lifecycle state of a [`ChangeSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeState {
    Planning,
    Rendering,
    Previewing,
    Confirmed,
    Declined,
    Committing,
    Done,
    RolledBack,
    Failed,
}

impl ChangeState {
    fn can_move_to(self, next: ChangeState) -> bool {
        use ChangeState::*;
        matches!(
            (self, next),
            (Planning, Rendering)
                | (Rendering, Previewing)
                | (Rendering, Confirmed)
                | (Rendering, Failed)
                | (Previewing, Confirmed)
                | (Previewing, Declined)
                | (Previewing, Failed)
                | (Confirmed, Committing)
                | (Committing, Done)
                | (Committing, RolledBack)
                | (Committing, Failed)
        )
    }

    /// Whether no further transitions are possible.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            ChangeState::Declined | ChangeState::Done | ChangeState::RolledBack | ChangeState::Failed
        )
    }
}

impl fmt::Display for ChangeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChangeState::Planning => "planning",
            ChangeState::Rendering => "rendering",
            ChangeState::Previewing => "previewing",
            ChangeState::Confirmed => "confirmed",
            ChangeState::Declined => "declined",
            ChangeState::Committing => "committing",
            ChangeState::Done => "done",
            ChangeState::RolledBack => "rolled_back",
            ChangeState::Failed => "failed",
        };
        f.write_str(name)
    }
}

// ============================================================================
// Records
// ============================================================================

/// Snapshot and pending text of one touched unit.
#[derive(Debug, Clone)]
pub struct ChangeRecord {
    /// Filesystem path written at commit.
    pub path: PathBuf,
    /// Path shown in previews and reports.
    pub display: String,
    /// Exact bytes read from disk, restored on rollback.
    pub original: Vec<u8>,
    /// SHA-256 of `original`.
    pub original_hash: ContentHash,
    /// Canonical rendering of the unit before mutation.
    pub baseline: String,
    /// Canonical rendering after mutation, set during rendering.
    pub rendered: Option<String>,
}

impl ChangeRecord {
    /// Whether committing would change the file on disk.
    pub fn is_changed(&self) -> bool {
        match &self.rendered {
            Some(text) => text.as_bytes() != self.original.as_slice(),
            None => false,
        }
    }

    /// Preview diff between the baseline and the rendered text.
    pub fn diff(&self) -> FileDiff {
        let rendered = self.rendered.as_deref().unwrap_or(&self.baseline);
        FileDiff::compute(self.display.clone(), &self.baseline, rendered)
    }
}

/// Result of a successful commit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CommitSummary {
    /// Display paths written, in write order.
    pub written: Vec<String>,
    /// Display paths whose rendered text matched the original.
    pub unchanged: Vec<String>,
}

// ============================================================================
// ChangeSet
// ============================================================================

/// In-flight collection of per-unit snapshots for one operation.
#[derive(Debug)]
pub struct ChangeSet {
    state: ChangeState,
    records: BTreeMap<PathBuf, ChangeRecord>,
}

impl Default for ChangeSet {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangeSet {
    /// Create an empty change set in the planning state.
    pub fn new() -> Self {
        ChangeSet {
            state: ChangeState::Planning,
            records: BTreeMap::new(),
        }
    }

    /// Current state.
    pub fn state(&self) -> ChangeState {
        self.state
    }

    /// Tracked records in path order.
    pub fn records(&self) -> impl Iterator<Item = &ChangeRecord> {
        self.records.values()
    }

    /// Number of tracked records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether nothing is tracked.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Whether `path` is tracked.
    pub fn is_tracked(&self, path: &Path) -> bool {
        self.records.contains_key(path)
    }

    fn transition(&mut self, next: ChangeState) -> FnMoveResult<()> {
        if !self.state.can_move_to(next) {
            return Err(FnMoveError::internal(format!(
                "illegal change set transition {} -> {}",
                self.state, next
            )));
        }
        debug!(from = %self.state, to = %next, "change set transition");
        self.state = next;
        Ok(())
    }

    /// Snapshot a unit. Tracking the same path twice keeps the first snapshot.
    pub fn track(
        &mut self,
        path: impl Into<PathBuf>,
        display: impl Into<String>,
        original: Vec<u8>,
        baseline: String,
    ) -> FnMoveResult<()> {
        if self.state != ChangeState::Planning {
            return Err(FnMoveError::internal(format!(
                "cannot track files while {}",
                self.state
            )));
        }
        let path = path.into();
        if self.records.contains_key(&path) {
            return Ok(());
        }
        let shown: String = display.into();
        debug!(path = %shown, bytes = original.len(), "tracking unit");
        let original_hash = ContentHash::compute(&original);
        self.records.insert(
            path.clone(),
            ChangeRecord {
                path,
                display: shown,
                original,
                original_hash,
                baseline,
                rendered: None,
            },
        );
        Ok(())
    }

    /// Render every record with `render`. The first failure is fatal.
    pub fn render<F>(&mut self, mut render: F) -> FnMoveResult<()>
    where
        F: FnMut(&ChangeRecord) -> FnMoveResult<String>,
    {
        self.transition(ChangeState::Rendering)?;
        for record in self.records.values_mut() {
            match render(record) {
                Ok(text) => record.rendered = Some(text),
                Err(err) => {
                    warn!(path = %record.display, error = %err, "rendering failed");
                    self.state = ChangeState::Failed;
                    return Err(err);
                }
            }
        }
        Ok(())
    }

    /// Preview diffs of all changed records.
    pub fn diffs(&self) -> Vec<FileDiff> {
        self.records
            .values()
            .map(ChangeRecord::diff)
            .filter(|d| !d.is_empty())
            .collect()
    }

    /// Emit the preview and ask for confirmation. Returns whether the
    /// operator confirmed.
    pub fn preview(
        &mut self,
        sink: &mut dyn PreviewSink,
        prompt: &mut dyn Prompt,
        max_attempts: u32,
    ) -> FnMoveResult<bool> {
        self.transition(ChangeState::Previewing)?;
        for diff in self.diffs() {
            if let Err(err) = sink.emit(&diff) {
                self.state = ChangeState::Failed;
                return Err(FnMoveError::Interaction {
                    message: format!("failed to write preview: {}", err),
                });
            }
        }
        if confirm(prompt, CONFIRM_QUESTION, max_attempts) {
            self.transition(ChangeState::Confirmed)?;
            Ok(true)
        } else {
            info!("changes declined");
            self.transition(ChangeState::Declined)?;
            Ok(false)
        }
    }

    /// Confirm without previewing.
    pub fn skip_preview(&mut self) -> FnMoveResult<()> {
        self.transition(ChangeState::Confirmed)
    }

    /// Persist every changed record through `store`.
    pub fn commit(&mut self, store: &mut dyn FileStore) -> FnMoveResult<CommitSummary> {
        self.transition(ChangeState::Committing)?;

        if let Err(err) = self.check_unmodified(store) {
            self.state = ChangeState::Failed;
            return Err(err);
        }

        let mut summary = CommitSummary::default();
        let mut attempted: Vec<&ChangeRecord> = Vec::new();
        let mut failure: Option<(String, String)> = None;

        for record in self.records.values() {
            let Some(rendered) = record.rendered.as_deref() else {
                continue;
            };
            if !record.is_changed() {
                debug!(path = %record.display, "unchanged, skipping write");
                summary.unchanged.push(record.display.clone());
                continue;
            }
            attempted.push(record);
            match store.write(&record.path, rendered.as_bytes()) {
                Ok(()) => {
                    debug!(path = %record.display, "written");
                    summary.written.push(record.display.clone());
                }
                Err(err) => {
                    warn!(path = %record.display, error = %err, "write failed, rolling back");
                    failure = Some((record.display.clone(), err.to_string()));
                    break;
                }
            }
        }

        let Some((path, message)) = failure else {
            info!(files = summary.written.len(), "commit complete");
            self.state = ChangeState::Done;
            return Ok(summary);
        };

        let rollback_failures = rollback(store, &attempted);
        self.state = if rollback_failures.is_empty() {
            ChangeState::RolledBack
        } else {
            ChangeState::Failed
        };
        Err(FnMoveError::Io {
            path,
            message,
            rollback_failures,
        })
    }

    fn check_unmodified(&self, store: &mut dyn FileStore) -> FnMoveResult<()> {
        for record in self.records.values() {
            if !record.is_changed() {
                continue;
            }
            let current = store.read(&record.path).map_err(|e| FnMoveError::Io {
                path: record.display.clone(),
                message: e.to_string(),
                rollback_failures: Vec::new(),
            })?;
            if ContentHash::compute(&current) != record.original_hash {
                warn!(path = %record.display, "file changed on disk since load");
                return Err(FnMoveError::ConcurrentModification {
                    path: record.display.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Restore original bytes of every attempted record. Best-effort: failures
/// are logged and returned, never retried.
fn rollback(store: &mut dyn FileStore, attempted: &[&ChangeRecord]) -> Vec<String> {
    let mut failures = Vec::new();
    for record in attempted {
        if let Err(err) = store.write(&record.path, &record.original) {
            warn!(path = %record.display, error = %err, "rollback write failed");
            failures.push(format!("{}: {}", record.display, err));
        } else {
            debug!(path = %record.display, "restored");
        }
    }
    failures
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interaction::{CollectingSink, ScriptedPrompt};
    use crate::store::MemoryFileStore;

    fn seeded(files: &[(&str, &str)]) -> (ChangeSet, MemoryFileStore) {
        let mut cs = ChangeSet::new();
        let mut store = MemoryFileStore::new();
        for (path, text) in files {
            store.insert(*path, *text);
            cs.track(*path, *path, text.as_bytes().to_vec(), text.to_string())
                .unwrap();
        }
        (cs, store)
    }

    fn upper(record: &ChangeRecord) -> FnMoveResult<String> {
        Ok(record.baseline.to_uppercase())
    }

    mod transitions {
        use super::*;

        #[test]
        fn commit_requires_confirmation() {
            let (mut cs, mut store) = seeded(&[("a", "x\n")]);
            cs.render(upper).unwrap();
            let err = cs.commit(&mut store).unwrap_err();
            assert!(matches!(err, FnMoveError::Internal { .. }));
        }

        #[test]
        fn track_after_render_rejected() {
            let (mut cs, _) = seeded(&[("a", "x\n")]);
            cs.render(upper).unwrap();
            assert!(cs.track("b", "b", Vec::new(), String::new()).is_err());
        }

        #[test]
        fn terminal_states() {
            assert!(ChangeState::Done.is_terminal());
            assert!(ChangeState::Declined.is_terminal());
            assert!(!ChangeState::Previewing.is_terminal());
        }

        #[test]
        fn double_track_keeps_first_snapshot() {
            let mut cs = ChangeSet::new();
            cs.track("a", "a", b"one".to_vec(), "one".into()).unwrap();
            cs.track("a", "a", b"two".to_vec(), "two".into()).unwrap();
            assert_eq!(cs.len(), 1);
            assert_eq!(cs.records().next().unwrap().original, b"one");
        }
    }

    mod rendering {
        use super::*;

        #[test]
        fn render_failure_is_fatal_and_writes_nothing() {
            let (mut cs, store) = seeded(&[("a", "x\n"), ("b", "y\n")]);
            let err = cs
                .render(|r| {
                    if r.display == "b" {
                        Err(FnMoveError::Structural {
                            path: "b".into(),
                            message: "bad".into(),
                        })
                    } else {
                        upper(r)
                    }
                })
                .unwrap_err();
            assert!(matches!(err, FnMoveError::Structural { .. }));
            assert_eq!(cs.state(), ChangeState::Failed);
            assert!(store.write_log().is_empty());
        }
    }

    mod preview {
        use super::*;

        #[test]
        fn confirmed_preview_emits_changed_diffs_only() {
            let (mut cs, _) = seeded(&[("a", "x\n"), ("b", "Y\n")]);
            cs.render(upper).unwrap();
            let mut sink = CollectingSink::default();
            let mut prompt = ScriptedPrompt::new(["yes"]);
            assert!(cs.preview(&mut sink, &mut prompt, 5).unwrap());
            assert_eq!(cs.state(), ChangeState::Confirmed);
            assert_eq!(sink.diffs.len(), 1);
            assert_eq!(sink.diffs[0].path, "a");
        }

        #[test]
        fn declined_preview() {
            let (mut cs, mut store) = seeded(&[("a", "x\n")]);
            cs.render(upper).unwrap();
            let mut prompt = ScriptedPrompt::new(["maybe", "n"]);
            let confirmed = cs
                .preview(&mut CollectingSink::default(), &mut prompt, 5)
                .unwrap();
            assert!(!confirmed);
            assert_eq!(cs.state(), ChangeState::Declined);
            assert!(cs.commit(&mut store).is_err());
            assert_eq!(store.get(Path::new("a")), Some(&b"x\n"[..]));
        }
    }

    mod commit {
        use super::*;

        #[test]
        fn writes_changed_records_in_path_order() {
            let (mut cs, mut store) = seeded(&[("b", "y\n"), ("a", "x\n"), ("c", "Z\n")]);
            cs.render(upper).unwrap();
            cs.skip_preview().unwrap();
            let summary = cs.commit(&mut store).unwrap();

            assert_eq!(summary.written, vec!["a", "b"]);
            assert_eq!(summary.unchanged, vec!["c"]);
            assert_eq!(store.get(Path::new("a")), Some(&b"X\n"[..]));
            assert_eq!(cs.state(), ChangeState::Done);
        }

        #[test]
        fn failed_write_restores_every_attempted_file() {
            let (mut cs, store) = seeded(&[("a", "x\n"), ("b", "y\n"), ("c", "z\n")]);
            let mut store = store.fail_on_write(2);
            cs.render(upper).unwrap();
            cs.skip_preview().unwrap();

            let err = cs.commit(&mut store).unwrap_err();
            match err {
                FnMoveError::Io {
                    path,
                    rollback_failures,
                    ..
                } => {
                    assert_eq!(path, "b");
                    assert!(rollback_failures.is_empty());
                }
                other => panic!("unexpected error: {other}"),
            }
            assert_eq!(store.get(Path::new("a")), Some(&b"x\n"[..]));
            assert_eq!(store.get(Path::new("b")), Some(&b"y\n"[..]));
            assert_eq!(store.get(Path::new("c")), Some(&b"z\n"[..]));
            assert_eq!(cs.state(), ChangeState::RolledBack);
        }

        #[test]
        fn concurrent_modification_writes_nothing() {
            let (mut cs, mut store) = seeded(&[("a", "x\n"), ("b", "y\n")]);
            store.insert("b", "edited\n");
            cs.render(upper).unwrap();
            cs.skip_preview().unwrap();

            let err = cs.commit(&mut store).unwrap_err();
            assert!(matches!(err, FnMoveError::ConcurrentModification { ref path } if path == "b"));
            assert!(store.write_log().is_empty());
            assert_eq!(cs.state(), ChangeState::Failed);
        }

        #[test]
        fn rollback_restores_original_bytes_not_baseline() {
            let mut cs = ChangeSet::new();
            let mut store = MemoryFileStore::new().fail_on_write(1);
            store.insert("a", "x  \n");
            cs.track("a", "a", b"x  \n".to_vec(), "x\n".to_string())
                .unwrap();
            cs.render(upper).unwrap();
            cs.skip_preview().unwrap();
            assert!(cs.commit(&mut store).is_err());
            assert_eq!(store.get(Path::new("a")), Some(&b"x  \n"[..]));
        }
    }
}
