use crate::encoding::{self, DecodedName};
use crate::error::{Result, SprintError};
use crate::types::SprintStatus;
use crate::{io, paths, store};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Manifest
// ---------------------------------------------------------------------------

/// Dates persisted in `sprint.yaml`. Absent for Planning sprints.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SprintManifest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_days: Option<u32>,
}

impl SprintManifest {
    pub fn load(sprint_dir: &Path) -> Result<Self> {
        let path = paths::manifest_path(sprint_dir);
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(&path)?;
        Ok(serde_yaml::from_str(&data)?)
    }

    pub fn save(&self, sprint_dir: &Path) -> Result<()> {
        let data = serde_yaml::to_string(self)?;
        io::atomic_write(&paths::manifest_path(sprint_dir), data.as_bytes())
    }
}

// ---------------------------------------------------------------------------
// Sprint
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct Sprint {
    pub path: PathBuf,
    pub folder_name: String,
    pub identifier: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Authoritative status: the marker value when readable, otherwise the
    /// status decoded from the folder name.
    pub status: SprintStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_days: Option<u32>,
}

// ---------------------------------------------------------------------------
// Repository
// ---------------------------------------------------------------------------

/// List sprint folder names under `sprints_dir`, lexicographically sorted.
/// Entries whose names do not decode are skipped (not sprints).
pub fn list_folders(sprints_dir: &Path) -> Result<Vec<String>> {
    if !sprints_dir.exists() {
        return Err(SprintError::NotInitialized);
    }
    let mut folders = Vec::new();
    for entry in std::fs::read_dir(sprints_dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if encoding::decode(&name).is_ok() {
            folders.push(name);
        }
    }
    folders.sort();
    Ok(folders)
}

/// Load one sprint by folder name.
pub fn load(sprints_dir: &Path, folder_name: &str) -> Result<Sprint> {
    let decoded = encoding::decode(folder_name)?;
    let path = sprints_dir.join(folder_name);
    if !path.is_dir() {
        return Err(SprintError::SprintNotFound(folder_name.to_string()));
    }
    let marker = store::read_status(&path)?;
    let manifest = SprintManifest::load(&path)?;
    let DecodedName {
        status: name_status,
        identifier,
        description,
    } = decoded;
    Ok(Sprint {
        path,
        folder_name: folder_name.to_string(),
        identifier,
        description,
        status: marker.unwrap_or(name_status),
        start_date: manifest.start_date,
        end_date: manifest.end_date,
        duration_days: manifest.duration_days,
    })
}

pub fn load_all(sprints_dir: &Path) -> Result<Vec<Sprint>> {
    list_folders(sprints_dir)?
        .iter()
        .map(|name| load(sprints_dir, name))
        .collect()
}

/// Resolve a sprint by full or partial identifier.
///
/// An exact identifier match wins outright; otherwise a case-sensitive
/// substring match over decoded identifiers. More than one hit is
/// `Ambiguous` — never a guess.
pub fn resolve(sprints_dir: &Path, query: &str) -> Result<Sprint> {
    let sprints = load_all(sprints_dir)?;

    if let Some(exact) = sprints.iter().find(|s| s.identifier == query) {
        return Ok(exact.clone());
    }

    let matches: Vec<&Sprint> = sprints
        .iter()
        .filter(|s| s.identifier.contains(query))
        .collect();
    match matches.as_slice() {
        [] => Err(SprintError::SprintNotFound(query.to_string())),
        [one] => Ok((*one).clone()),
        many => Err(SprintError::Ambiguous {
            query: query.to_string(),
            matches: many.iter().map(|s| s.identifier.clone()).collect(),
        }),
    }
}

/// Find the sprint whose authoritative status is Active, if any.
pub fn find_active(sprints_dir: &Path) -> Result<Option<Sprint>> {
    Ok(load_all(sprints_dir)?
        .into_iter()
        .find(|s| s.status == SprintStatus::Active))
}

/// Create a sprint directory with its marker (and manifest when dated).
/// Fails with `AlreadyExists` on a folder-name collision.
pub fn create(
    sprints_dir: &Path,
    status: SprintStatus,
    identifier: &str,
    description: Option<&str>,
    manifest: SprintManifest,
) -> Result<Sprint> {
    let folder_name = encoding::encode(status, identifier, description)?;
    let path = sprints_dir.join(&folder_name);
    if path.exists() {
        return Err(SprintError::AlreadyExists(path));
    }
    io::ensure_dir(&path)?;
    store::write_status(&path, status)?;
    if manifest.start_date.is_some() || manifest.duration_days.is_some() {
        manifest.save(&path)?;
    }
    load(sprints_dir, &folder_name)
}

/// Rename a sprint directory. Refuses to clobber an existing target unless
/// `force` is set; the underlying `fs::rename` is atomic on one filesystem.
pub fn rename_dir(old_path: &Path, new_path: &Path, force: bool) -> Result<()> {
    if new_path.exists() && !force {
        return Err(SprintError::AlreadyExists(new_path.to_path_buf()));
    }
    std::fs::rename(old_path, new_path)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
