//! Status store: the authoritative marker file inside each sprint directory
//! and the workspace-level current-sprint pointer.

use crate::error::Result;
use crate::types::SprintStatus;
use crate::{io, paths};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Read the marker file for a sprint directory.
///
/// Returns `Ok(None)` when the marker is missing or holds an unrecognized
/// token — both mean "no authoritative status on disk" to callers (the
/// doctor treats either as drift). I/O failures other than not-found
/// propagate.
pub fn read_status(sprint_dir: &Path) -> Result<Option<SprintStatus>> {
    let path = paths::status_path(sprint_dir);
    let raw = match std::fs::read_to_string(&path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    Ok(SprintStatus::from_str(raw.trim()).ok())
}

/// Write the marker file atomically: either the new token lands fully or
/// the previous content is untouched.
pub fn write_status(sprint_dir: &Path, status: SprintStatus) -> Result<()> {
    let path = paths::status_path(sprint_dir);
    io::atomic_write(&path, format!("{}\n", status.as_str()).as_bytes())
}

// ---------------------------------------------------------------------------
// Current pointer
// ---------------------------------------------------------------------------

/// Read the current-sprint pointer. The pointer may be stale or dangling;
/// this only resolves the stored folder name to a path and never checks
/// existence — callers validate the target.
pub fn read_current(root: &Path) -> Result<Option<PathBuf>> {
    let path = paths::pointer_path(root);
    let raw = match std::fs::read_to_string(&path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let name = raw.trim();
    if name.is_empty() {
        return Ok(None);
    }
    Ok(Some(paths::sprints_dir(root).join(name)))
}

/// Point the workspace at `folder_name` as its active sprint.
pub fn write_current(root: &Path, folder_name: &str) -> Result<()> {
    io::atomic_write(
        &paths::pointer_path(root),
        format!("{folder_name}\n").as_bytes(),
    )
}

/// Remove the pointer if present.
pub fn clear_current(root: &Path) -> Result<()> {
    match std::fs::remove_file(paths::pointer_path(root)) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn status_roundtrip() {
        let dir = TempDir::new().unwrap();
        for status in SprintStatus::all() {
            write_status(dir.path(), *status).unwrap();
            assert_eq!(read_status(dir.path()).unwrap(), Some(*status));
        }
    }

    #[test]
    fn missing_marker_reads_none() {
        let dir = TempDir::new().unwrap();
        assert_eq!(read_status(dir.path()).unwrap(), None);
    }

    #[test]
    fn malformed_marker_reads_none() {
        let dir = TempDir::new().unwrap();
        std::fs::write(paths::status_path(dir.path()), "definitely-not-a-status").unwrap();
        assert_eq!(read_status(dir.path()).unwrap(), None);
    }

    #[test]
    fn marker_tolerates_whitespace() {
        let dir = TempDir::new().unwrap();
        std::fs::write(paths::status_path(dir.path()), "  active \n").unwrap();
        assert_eq!(read_status(dir.path()).unwrap(), Some(SprintStatus::Active));
    }

    #[test]
    fn pointer_roundtrip() {
        let dir = TempDir::new().unwrap();
        assert_eq!(read_current(dir.path()).unwrap(), None);

        write_current(dir.path(), "!Sprint_01").unwrap();
        assert_eq!(
            read_current(dir.path()).unwrap(),
            Some(dir.path().join("sprints/!Sprint_01"))
        );

        clear_current(dir.path()).unwrap();
        assert_eq!(read_current(dir.path()).unwrap(), None);
    }

    #[test]
    fn clear_pointer_idempotent() {
        let dir = TempDir::new().unwrap();
        clear_current(dir.path()).unwrap();
        clear_current(dir.path()).unwrap();
    }

    #[test]
    fn dangling_pointer_still_reads() {
        // The store never validates the target; a pointer at a removed
        // directory must not error.
        let dir = TempDir::new().unwrap();
        write_current(dir.path(), "!Gone").unwrap();
        let target = read_current(dir.path()).unwrap().unwrap();
        assert!(!target.exists());
    }
}
