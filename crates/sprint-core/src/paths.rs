use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Layout constants
// ---------------------------------------------------------------------------

pub const SPRINTS_DIR: &str = "sprints";
pub const STATUS_FILE: &str = ".sprint-status";
pub const CURRENT_POINTER: &str = ".current-sprint";
pub const MANIFEST_FILE: &str = "sprint.yaml";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn sprints_dir(root: &Path) -> PathBuf {
    root.join(SPRINTS_DIR)
}

pub fn status_path(sprint_dir: &Path) -> PathBuf {
    sprint_dir.join(STATUS_FILE)
}

pub fn pointer_path(root: &Path) -> PathBuf {
    sprints_dir(root).join(CURRENT_POINTER)
}

pub fn manifest_path(sprint_dir: &Path) -> PathBuf {
    sprint_dir.join(MANIFEST_FILE)
}

/// Story files are non-hidden `.md` files directly inside a sprint directory.
pub fn is_story_file(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    !name.starts_with('.') && name.ends_with(".md")
}
