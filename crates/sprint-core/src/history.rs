//! Burndown reconstruction from version-control history.
//!
//! Commits touching a sprint directory are bucketed by UTC calendar day
//! (never host-local time, so output is reproducible across machines). For
//! each day the last commit's snapshot of every story file is re-parsed and
//! summarized; days with no commits carry the previous day's totals forward.

use crate::cancel::CancelToken;
use crate::error::{Result, SprintError};
use crate::story::{self, Story};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

// ---------------------------------------------------------------------------
// Commit log capability
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct CommitInfo {
    pub id: String,
    pub timestamp: DateTime<Utc>,
}

/// Read-only view of commit history, the seam between the analyzer and the
/// version-control adapter. Implemented by `git::GitLog` and by in-memory
/// fakes in tests.
pub trait CommitLog {
    /// Commits touching anything under `dir`, oldest to newest.
    fn commits_touching(&self, dir: &Path) -> Result<Vec<CommitInfo>>;

    /// Story file paths directly inside `dir` as they existed at `commit`,
    /// in a form `read_file_at_commit` accepts.
    fn files_at_commit(&self, commit: &str, dir: &Path) -> Result<Vec<String>>;

    /// File content at `commit`, `None` when absent there.
    fn read_file_at_commit(&self, commit: &str, file: &str) -> Result<Option<Vec<u8>>>;
}

// ---------------------------------------------------------------------------
// Data points
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BurndownDataPoint {
    pub date: NaiveDate,
    pub remaining_tasks: usize,
    pub total_tasks: usize,
    /// Absent when no story in the snapshot carries a point estimate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining_points: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_points: Option<u32>,
}

fn summarize(date: NaiveDate, stories: &[Story]) -> BurndownDataPoint {
    let any_points = stories.iter().any(|s| s.points.is_some());
    let remaining: Vec<&Story> = stories.iter().filter(|s| !s.is_terminal()).collect();
    BurndownDataPoint {
        date,
        remaining_tasks: remaining.len(),
        total_tasks: stories.len(),
        remaining_points: any_points
            .then(|| remaining.iter().map(|s| s.points.unwrap_or(0)).sum()),
        total_points: any_points.then(|| stories.iter().map(|s| s.points.unwrap_or(0)).sum()),
    }
}

// ---------------------------------------------------------------------------
// Analysis
// ---------------------------------------------------------------------------

/// Reconstruct one data point per calendar day spanned by the commit range,
/// plus a working-tree point dated `today` when it postdates the last
/// commit day. Fails with `InsufficientHistory` below two distinct days.
pub fn analyze(
    log: &dyn CommitLog,
    sprint_dir: &Path,
    today: NaiveDate,
    cancel: &CancelToken,
) -> Result<Vec<BurndownDataPoint>> {
    let commits = log.commits_touching(sprint_dir)?;

    // Last commit per UTC day wins.
    let mut by_day: BTreeMap<NaiveDate, String> = BTreeMap::new();
    for commit in &commits {
        by_day.insert(commit.timestamp.date_naive(), commit.id.clone());
    }

    if by_day.len() < 2 {
        return Err(SprintError::InsufficientHistory {
            days: by_day.len(),
        });
    }

    let first = *by_day.keys().next().unwrap();
    let last = *by_day.keys().next_back().unwrap();

    let mut points: Vec<BurndownDataPoint> = Vec::new();
    let mut date = first;
    while date <= last {
        cancel.check()?;
        match by_day.get(&date) {
            Some(commit) => {
                let stories = snapshot(log, commit, sprint_dir)?;
                points.push(summarize(date, &stories));
            }
            None => {
                // Carry-forward, never interpolation.
                let mut carried = points
                    .last()
                    .cloned()
                    .unwrap_or_else(|| summarize(date, &[]));
                carried.date = date;
                points.push(carried);
            }
        }
        match date.succ_opt() {
            Some(next) => date = next,
            None => break,
        }
    }

    if today > last {
        let stories = working_tree(sprint_dir)?;
        points.push(summarize(today, &stories));
    }

    Ok(points)
}

/// Parse every story file as it existed at `commit`, skipping snapshots
/// that no longer read or parse — malformed history degrades, it does not
/// abort the series.
fn snapshot(log: &dyn CommitLog, commit: &str, sprint_dir: &Path) -> Result<Vec<Story>> {
    let mut stories = Vec::new();
    for file in log.files_at_commit(commit, sprint_dir)? {
        let Some(bytes) = log.read_file_at_commit(commit, &file)? else {
            continue;
        };
        if let Ok(s) = story::parse(&bytes) {
            stories.push(s);
        }
    }
    Ok(stories)
}

fn working_tree(sprint_dir: &Path) -> Result<Vec<Story>> {
    let mut stories = Vec::new();
    for file in story::list_files(sprint_dir)? {
        if let Ok(s) = story::load(&file) {
            stories.push(s);
        }
    }
    Ok(stories)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
