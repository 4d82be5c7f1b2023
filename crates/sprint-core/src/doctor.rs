//! Drift detection and repair between a sprint's two status encodings.
//!
//! The marker file is the single source of truth; the folder name is a
//! denormalized cache that can drift (manual renames, an interrupted
//! marker-then-rename sequence). Detection is strictly read-only; repair is
//! a best-effort per-item sweep in lexicographic order.

use crate::cancel::CancelToken;
use crate::error::{Result, SprintError};
use crate::types::SprintStatus;
use crate::{encoding, paths, sprint, store};
use serde::Serialize;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Inconsistency
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct Inconsistency {
    pub path: PathBuf,
    pub folder_name: String,
    /// Status decoded from the folder name.
    pub folder_status: SprintStatus,
    /// Status from the marker file; `None` when the marker is missing or
    /// unreadable.
    pub marker_status: Option<SprintStatus>,
    /// Folder name that would restore agreement, derived from the marker.
    /// `None` when there is no readable marker to derive it from.
    pub expected_name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RepairFailure {
    pub path: PathBuf,
    pub attempted: String,
    pub reason: String,
}

#[derive(Debug, Default, Serialize)]
pub struct RepairResult {
    pub repaired: usize,
    pub failed: usize,
    pub failures: Vec<RepairFailure>,
}

impl RepairResult {
    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }

    /// Convert into the `PartialFailure` taxonomy error when any item
    /// failed, carrying the full per-item result.
    pub fn into_result(self) -> Result<RepairResult> {
        if self.is_clean() {
            Ok(self)
        } else {
            Err(SprintError::PartialFailure(self))
        }
    }
}

/// Validity of the workspace's current-sprint pointer. Reported alongside
/// the per-sprint list but never auto-repaired.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PointerReport {
    Absent,
    Valid { path: PathBuf },
    Dangling { path: PathBuf },
    NotActive {
        path: PathBuf,
        status: Option<SprintStatus>,
    },
}

// ---------------------------------------------------------------------------
// Detection
// ---------------------------------------------------------------------------

/// Scan every sprint directory and report name/marker disagreements.
/// Read-only; results come back in lexicographic folder order.
pub fn detect(root: &Path, cancel: &CancelToken) -> Result<Vec<Inconsistency>> {
    let sprints_dir = paths::sprints_dir(root);
    let mut found = Vec::new();

    for folder_name in sprint::list_folders(&sprints_dir)? {
        cancel.check()?;
        let decoded = encoding::decode(&folder_name)?;
        let path = sprints_dir.join(&folder_name);
        let marker = store::read_status(&path)?;

        if marker == Some(decoded.status) {
            continue;
        }

        let expected_name = match marker {
            Some(status) => Some(encoding::encode(
                status,
                &decoded.identifier,
                decoded.description.as_deref(),
            )?),
            None => None,
        };
        found.push(Inconsistency {
            path,
            folder_name,
            folder_status: decoded.status,
            marker_status: marker,
            expected_name,
        });
    }

    Ok(found)
}

/// Validate the current pointer against marker-derived status.
pub fn check_pointer(root: &Path) -> Result<PointerReport> {
    let Some(target) = store::read_current(root)? else {
        return Ok(PointerReport::Absent);
    };
    if !target.is_dir() {
        return Ok(PointerReport::Dangling { path: target });
    }
    match store::read_status(&target)? {
        Some(SprintStatus::Active) => Ok(PointerReport::Valid { path: target }),
        status => Ok(PointerReport::NotActive {
            path: target,
            status,
        }),
    }
}

// ---------------------------------------------------------------------------
// Repair
// ---------------------------------------------------------------------------

/// Repair detected inconsistencies one at a time. A failing item is
/// recorded and skipped, never aborting the sweep. With a readable marker
/// the folder is renamed to the marker-derived name; with no marker the
/// folder name is the only readable source, so a matching marker is
/// written instead. Running detect after a fully successful repair yields
/// an empty list.
pub fn repair(
    root: &Path,
    items: &[Inconsistency],
    cancel: &CancelToken,
) -> Result<RepairResult> {
    let sprints_dir = paths::sprints_dir(root);
    let mut result = RepairResult::default();

    // Stable order regardless of how the caller assembled the list.
    let mut ordered: Vec<&Inconsistency> = items.iter().collect();
    ordered.sort_by(|a, b| a.path.cmp(&b.path));

    for item in ordered {
        cancel.check()?;
        let outcome = repair_one(&sprints_dir, item);
        match outcome {
            Ok(()) => result.repaired += 1,
            Err(e) => {
                result.failed += 1;
                result.failures.push(RepairFailure {
                    path: item.path.clone(),
                    attempted: item
                        .expected_name
                        .clone()
                        .unwrap_or_else(|| format!("write marker '{}'", item.folder_status)),
                    reason: e.to_string(),
                });
            }
        }
    }

    Ok(result)
}

fn repair_one(sprints_dir: &Path, item: &Inconsistency) -> Result<()> {
    match &item.expected_name {
        Some(expected) => {
            let new_path = sprints_dir.join(expected);
            sprint::rename_dir(&item.path, &new_path, false)
        }
        None => store::write_status(&item.path, item.folder_status),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
