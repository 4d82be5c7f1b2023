//! Burndown service: thin orchestration of sprint resolution and the
//! history analyzer.

use crate::cancel::CancelToken;
use crate::error::{Result, SprintError};
use crate::history::{self, BurndownDataPoint, CommitLog};
use crate::sprint::{self, Sprint};
use crate::{lifecycle, paths};
use chrono::NaiveDate;
use std::path::Path;

/// Generate the daily burndown for the named sprint, or for the current
/// one when `query` is omitted.
pub fn generate(
    root: &Path,
    query: Option<&str>,
    log: &dyn CommitLog,
    today: NaiveDate,
    cancel: &CancelToken,
) -> Result<(Sprint, Vec<BurndownDataPoint>)> {
    let target = match query {
        Some(q) => sprint::resolve(&paths::sprints_dir(root), q)?,
        None => lifecycle::current_active(root)?.ok_or(SprintError::NoActiveSprint)?,
    };
    let points = history::analyze(log, &target.path, today, cancel)?;
    Ok((target, points))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
