//! Story files: YAML front matter between `---` fences, then markdown body.
//! Parsing is deliberately tolerant — every field may be absent except that
//! the front-matter block itself must exist.

use crate::error::{Result, SprintError};
use crate::paths;
use crate::types::{Priority, StoryStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize)]
pub struct Story {
    pub id: String,
    pub title: String,
    pub status: StoryStatus,
    pub priority: Priority,
    pub points: Option<u32>,
    pub assignee: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Story {
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

#[derive(Debug, Default, Deserialize)]
struct FrontMatter {
    #[serde(default)]
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    status: StoryStatus,
    #[serde(default)]
    priority: Priority,
    #[serde(default)]
    points: Option<u32>,
    #[serde(default)]
    assignee: Option<String>,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
}

/// Parse story bytes. Fails with `StoryParse` on invalid UTF-8, a missing
/// front-matter block, or YAML that does not fit the schema.
pub fn parse(bytes: &[u8]) -> Result<Story> {
    let text = std::str::from_utf8(bytes)
        .map_err(|_| SprintError::StoryParse("not valid UTF-8".to_string()))?;
    let yaml = front_matter(text)
        .ok_or_else(|| SprintError::StoryParse("missing front matter".to_string()))?;
    let fm: FrontMatter =
        serde_yaml::from_str(yaml).map_err(|e| SprintError::StoryParse(e.to_string()))?;
    Ok(Story {
        id: fm.id,
        title: fm.title,
        status: fm.status,
        priority: fm.priority,
        points: fm.points,
        assignee: fm.assignee,
        created_at: fm.created_at,
        updated_at: fm.updated_at,
    })
}

pub fn load(path: &Path) -> Result<Story> {
    parse(&std::fs::read(path)?)
}

/// List story file paths in a sprint directory, sorted by file name.
pub fn list_files(sprint_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(sprint_dir)? {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type()?.is_file() && paths::is_story_file(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn front_matter(text: &str) -> Option<&str> {
    let rest = text.strip_prefix("---")?;
    let rest = rest.strip_prefix('\n').or_else(|| rest.strip_prefix("\r\n"))?;
    let end = rest.find("\n---")?;
    Some(&rest[..end])
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_story() {
        let text = "---\n\
            id: S-042\n\
            title: Checkout flow\n\
            status: in_progress\n\
            priority: high\n\
            points: 5\n\
            assignee: dana\n\
            created_at: 2026-03-02T09:00:00Z\n\
            ---\n\
            \n\
            Implement the two-step checkout.\n";
        let story = parse(text.as_bytes()).unwrap();
        assert_eq!(story.id, "S-042");
        assert_eq!(story.title, "Checkout flow");
        assert_eq!(story.status, StoryStatus::InProgress);
        assert_eq!(story.priority, Priority::High);
        assert_eq!(story.points, Some(5));
        assert_eq!(story.assignee.as_deref(), Some("dana"));
        assert!(story.created_at.is_some());
        assert!(story.updated_at.is_none());
    }

    #[test]
    fn parse_tolerates_missing_optional_fields() {
        let story = parse(b"---\nid: S-1\ntitle: Tiny\n---\nbody\n").unwrap();
        assert_eq!(story.status, StoryStatus::Todo);
        assert_eq!(story.priority, Priority::Medium);
        assert_eq!(story.points, None);
        assert!(story.assignee.is_none());
        assert!(!story.is_terminal());
    }

    #[test]
    fn parse_terminal_statuses() {
        for (token, terminal) in [("done", true), ("dropped", true), ("review", false)] {
            let text = format!("---\nstatus: {token}\n---\n");
            let story = parse(text.as_bytes()).unwrap();
            assert_eq!(story.is_terminal(), terminal, "status {token}");
        }
    }

    #[test]
    fn parse_missing_front_matter_fails() {
        assert!(matches!(
            parse(b"# Just markdown\n"),
            Err(SprintError::StoryParse(_))
        ));
        assert!(parse(b"").is_err());
    }

    #[test]
    fn parse_invalid_utf8_fails() {
        assert!(matches!(
            parse(&[0xff, 0xfe, 0x00]),
            Err(SprintError::StoryParse(_))
        ));
    }

    #[test]
    fn parse_bad_yaml_fails() {
        assert!(parse(b"---\nstatus: [unclosed\n---\n").is_err());
    }

    #[test]
    fn list_files_sorted_stories_only() {
        let dir = tempfile::TempDir::new().unwrap();
        for name in ["b.md", "a.md", "sprint.yaml", ".sprint-status", "notes.txt"] {
            std::fs::write(dir.path().join(name), "x").unwrap();
        }
        let files = list_files(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, vec!["a.md", "b.md"]);
    }
}
