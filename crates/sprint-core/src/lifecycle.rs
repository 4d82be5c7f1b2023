//! Sprint lifecycle state machine.
//!
//! Legal transitions: Planning/Ready -> Active ("activate", which implicitly
//! archives any previously active sprint) and Active -> Archived ("close").
//! Archived is terminal; nothing transitions out of it.
//!
//! Every status change writes the marker first and renames the folder
//! second. The folder name is a denormalized cache, so a failure between the
//! two steps leaves drift that the doctor sweep detects and repairs.

use crate::error::{Result, SprintError};
use crate::sprint::{self, Sprint, SprintManifest};
use crate::types::SprintStatus;
use crate::{encoding, paths, store};
use chrono::{Days, NaiveDate};
use serde::Serialize;
use std::path::Path;

/// Both side effects of an activation, so callers can report the implicit
/// archive alongside the activation itself.
#[derive(Debug, Serialize)]
pub struct ActivationOutcome {
    pub activated: Sprint,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archived: Option<Sprint>,
}

/// Create a Planning sprint. Auto-names `Sprint_NN` when no identifier is
/// given, scanning numeric suffixes across every status prefix.
pub fn plan(root: &Path, identifier: Option<&str>, description: Option<&str>) -> Result<Sprint> {
    let sprints = paths::sprints_dir(root);
    let existing = sprint::load_all(&sprints)?;
    let identifier = match identifier {
        Some(id) => id.to_string(),
        None => encoding::next_identifier(existing.iter().map(|s| s.identifier.as_str())),
    };
    sprint::create(
        &sprints,
        SprintStatus::Planning,
        &identifier,
        description,
        SprintManifest::default(),
    )
}

/// Activate a sprint resolved by (partial) identifier.
///
/// Fails `InvalidTransition` unless the target is Planning or Ready. If
/// another sprint is currently Active it is archived first; the target then
/// gets its marker written, its folder renamed to the `!` encoding, dates
/// assigned if absent, and the current pointer updated.
pub fn activate(
    root: &Path,
    query: &str,
    today: NaiveDate,
    default_duration_days: u32,
) -> Result<ActivationOutcome> {
    let sprints = paths::sprints_dir(root);
    let target = sprint::resolve(&sprints, query)?;

    if !matches!(target.status, SprintStatus::Planning | SprintStatus::Ready) {
        return Err(SprintError::InvalidTransition {
            from: target.status.to_string(),
            to: SprintStatus::Active.to_string(),
            reason: "only planning or ready sprints can be activated".to_string(),
        });
    }

    let archived = match sprint::find_active(&sprints)? {
        Some(prev) => Some(archive(&sprints, &prev)?),
        None => None,
    };

    // Marker first, rename second.
    store::write_status(&target.path, SprintStatus::Active)?;
    let new_name = encoding::encode(
        SprintStatus::Active,
        &target.identifier,
        target.description.as_deref(),
    )?;
    let new_path = sprints.join(&new_name);
    if new_path != target.path {
        sprint::rename_dir(&target.path, &new_path, false)?;
    }

    let mut manifest = SprintManifest::load(&new_path)?;
    if manifest.start_date.is_none() {
        let duration = manifest.duration_days.unwrap_or(default_duration_days);
        manifest.start_date = Some(today);
        manifest.end_date = today.checked_add_days(Days::new(u64::from(duration)));
        manifest.duration_days = Some(duration);
        manifest.save(&new_path)?;
    }

    store::write_current(root, &new_name)?;

    Ok(ActivationOutcome {
        activated: sprint::load(&sprints, &new_name)?,
        archived,
    })
}

/// Activate an existing sprint by name, or create a dated sprint and
/// activate it in one step when the name is unknown or omitted.
pub fn start(
    root: &Path,
    name: Option<&str>,
    today: NaiveDate,
    duration_days: u32,
) -> Result<ActivationOutcome> {
    let sprints = paths::sprints_dir(root);

    let identifier = match name {
        Some(n) => match sprint::resolve(&sprints, n) {
            Ok(existing) => return activate(root, &existing.identifier, today, duration_days),
            Err(SprintError::SprintNotFound(_)) => n.to_string(),
            Err(e) => return Err(e),
        },
        None => {
            let existing = sprint::load_all(&sprints)?;
            encoding::next_identifier(existing.iter().map(|s| s.identifier.as_str()))
        }
    };

    sprint::create(
        &sprints,
        SprintStatus::Ready,
        &identifier,
        None,
        SprintManifest::default(),
    )?;
    activate(root, &identifier, today, duration_days)
}

/// Close the active sprint: Active -> Archived. Clears the current pointer
/// and deliberately does not pick a successor.
pub fn close(root: &Path) -> Result<Sprint> {
    let sprints = paths::sprints_dir(root);
    let active = current_active(root)?.ok_or(SprintError::NoActiveSprint)?;
    let archived = archive(&sprints, &active)?;
    store::clear_current(root)?;
    Ok(archived)
}

/// Resolve the active sprint: the pointer when it targets an existing
/// directory whose marker says Active, otherwise a full scan. A stale or
/// dangling pointer is ignored here, not an error.
pub fn current_active(root: &Path) -> Result<Option<Sprint>> {
    let sprints = paths::sprints_dir(root);
    if let Some(target) = store::read_current(root)? {
        if target.is_dir() && store::read_status(&target)? == Some(SprintStatus::Active) {
            if let Some(name) = target.file_name().and_then(|n| n.to_str()) {
                return Ok(Some(sprint::load(&sprints, name)?));
            }
        }
    }
    sprint::find_active(&sprints)
}

fn archive(sprints_dir: &Path, sprint_item: &Sprint) -> Result<Sprint> {
    store::write_status(&sprint_item.path, SprintStatus::Archived)?;
    let new_name = encoding::encode(
        SprintStatus::Archived,
        &sprint_item.identifier,
        sprint_item.description.as_deref(),
    )?;
    let new_path = sprints_dir.join(&new_name);
    if new_path != sprint_item.path {
        sprint::rename_dir(&sprint_item.path, &new_path, false)?;
    }
    sprint::load(sprints_dir, &new_name)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn init(dir: &TempDir) {
        std::fs::create_dir_all(dir.path().join("sprints")).unwrap();
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    #[test]
    fn plan_auto_names() {
        let dir = TempDir::new().unwrap();
        init(&dir);
        assert_eq!(plan(dir.path(), None, None).unwrap().identifier, "Sprint_01");
        assert_eq!(plan(dir.path(), None, None).unwrap().identifier, "Sprint_02");
    }

    #[test]
    fn activate_planning_sprint() {
        let dir = TempDir::new().unwrap();
        init(&dir);
        plan(dir.path(), Some("Sprint_01"), Some("Checkout")).unwrap();

        let outcome = activate(dir.path(), "Sprint_01", day(2), 14).unwrap();
        assert!(outcome.archived.is_none());
        let activated = &outcome.activated;
        assert_eq!(activated.status, SprintStatus::Active);
        assert_eq!(activated.folder_name, "!Sprint_01_Checkout");
        assert_eq!(activated.start_date, Some(day(2)));
        assert_eq!(activated.end_date, Some(day(16)));
        assert_eq!(activated.duration_days, Some(14));

        // Pointer resolves to the renamed directory.
        let pointer = store::read_current(dir.path()).unwrap().unwrap();
        assert_eq!(pointer, activated.path);
        assert!(pointer.is_dir());
    }

    #[test]
    fn activate_archives_previous_active() {
        let dir = TempDir::new().unwrap();
        init(&dir);
        start(dir.path(), Some("Sprint_01"), day(1), 14).unwrap();
        plan(dir.path(), Some("Sprint_02"), None).unwrap();

        let outcome = activate(dir.path(), "Sprint_02", day(15), 14).unwrap();
        let archived = outcome.archived.expect("previous sprint archived");
        assert_eq!(archived.identifier, "Sprint_01");
        assert_eq!(archived.status, SprintStatus::Archived);
        assert_eq!(archived.folder_name, "~Sprint_01");
        assert_eq!(outcome.activated.identifier, "Sprint_02");

        let pointer = store::read_current(dir.path()).unwrap().unwrap();
        assert_eq!(pointer, outcome.activated.path);
    }

    #[test]
    fn activate_active_sprint_fails_without_mutation() {
        let dir = TempDir::new().unwrap();
        init(&dir);
        start(dir.path(), Some("Sprint_01"), day(1), 14).unwrap();

        let err = activate(dir.path(), "Sprint_01", day(2), 14).unwrap_err();
        assert!(matches!(err, SprintError::InvalidTransition { .. }));
        // Still exactly one active sprint, untouched.
        let sprints = paths::sprints_dir(dir.path());
        let active = sprint::find_active(&sprints).unwrap().unwrap();
        assert_eq!(active.folder_name, "!Sprint_01");
        assert_eq!(active.start_date, Some(day(1)));
    }

    #[test]
    fn activate_archived_sprint_fails() {
        let dir = TempDir::new().unwrap();
        init(&dir);
        start(dir.path(), Some("Sprint_01"), day(1), 14).unwrap();
        close(dir.path()).unwrap();

        let err = activate(dir.path(), "Sprint_01", day(2), 14).unwrap_err();
        assert!(matches!(err, SprintError::InvalidTransition { .. }));
    }

    #[test]
    fn close_archives_and_clears_pointer() {
        let dir = TempDir::new().unwrap();
        init(&dir);
        start(dir.path(), Some("Sprint_01"), day(1), 14).unwrap();

        let archived = close(dir.path()).unwrap();
        assert_eq!(archived.status, SprintStatus::Archived);
        assert_eq!(archived.folder_name, "~Sprint_01");
        assert_eq!(store::read_current(dir.path()).unwrap(), None);
    }

    #[test]
    fn close_without_active_fails() {
        let dir = TempDir::new().unwrap();
        init(&dir);
        assert!(matches!(close(dir.path()), Err(SprintError::NoActiveSprint)));
    }

    #[test]
    fn close_survives_dangling_pointer() {
        let dir = TempDir::new().unwrap();
        init(&dir);
        start(dir.path(), Some("Sprint_01"), day(1), 14).unwrap();
        // Sabotage the pointer; close must fall back to the marker scan.
        store::write_current(dir.path(), "!Gone").unwrap();

        let archived = close(dir.path()).unwrap();
        assert_eq!(archived.identifier, "Sprint_01");
    }

    #[test]
    fn start_creates_dated_active_sprint() {
        let dir = TempDir::new().unwrap();
        init(&dir);
        let outcome = start(dir.path(), None, day(1), 10).unwrap();
        assert_eq!(outcome.activated.identifier, "Sprint_01");
        assert_eq!(outcome.activated.status, SprintStatus::Active);
        assert_eq!(outcome.activated.end_date, Some(day(11)));
    }

    #[test]
    fn start_resolves_existing_sprint() {
        let dir = TempDir::new().unwrap();
        init(&dir);
        plan(dir.path(), Some("Sprint_05"), None).unwrap();
        let outcome = start(dir.path(), Some("05"), day(1), 14).unwrap();
        assert_eq!(outcome.activated.identifier, "Sprint_05");
    }

    #[test]
    fn activation_preserves_existing_dates() {
        let dir = TempDir::new().unwrap();
        init(&dir);
        plan(dir.path(), Some("Sprint_01"), None).unwrap();
        let sprints = paths::sprints_dir(dir.path());
        let manifest = SprintManifest {
            start_date: Some(day(3)),
            end_date: Some(day(10)),
            duration_days: Some(7),
        };
        manifest.save(&sprints.join("@Sprint_01")).unwrap();

        let outcome = activate(dir.path(), "Sprint_01", day(20), 14).unwrap();
        assert_eq!(outcome.activated.start_date, Some(day(3)));
        assert_eq!(outcome.activated.end_date, Some(day(10)));
    }
}
