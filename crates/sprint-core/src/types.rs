use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// SprintStatus
// ---------------------------------------------------------------------------

/// Lifecycle state of a sprint. The marker file holds the token form
/// (`planning`, ...); the folder name carries the one-character prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SprintStatus {
    Planning,
    Ready,
    Active,
    Archived,
}

impl SprintStatus {
    pub fn all() -> &'static [SprintStatus] {
        &[
            SprintStatus::Planning,
            SprintStatus::Ready,
            SprintStatus::Active,
            SprintStatus::Archived,
        ]
    }

    pub fn prefix(self) -> char {
        match self {
            SprintStatus::Planning => '@',
            SprintStatus::Ready => '+',
            SprintStatus::Active => '!',
            SprintStatus::Archived => '~',
        }
    }

    pub fn from_prefix(c: char) -> Option<SprintStatus> {
        match c {
            '@' => Some(SprintStatus::Planning),
            '+' => Some(SprintStatus::Ready),
            '!' => Some(SprintStatus::Active),
            '~' => Some(SprintStatus::Archived),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SprintStatus::Planning => "planning",
            SprintStatus::Ready => "ready",
            SprintStatus::Active => "active",
            SprintStatus::Archived => "archived",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            SprintStatus::Planning => "Planning",
            SprintStatus::Ready => "Ready",
            SprintStatus::Active => "Active",
            SprintStatus::Archived => "Archived",
        }
    }
}

impl fmt::Display for SprintStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SprintStatus {
    type Err = crate::error::SprintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "planning" => Ok(SprintStatus::Planning),
            "ready" => Ok(SprintStatus::Ready),
            "active" => Ok(SprintStatus::Active),
            "archived" => Ok(SprintStatus::Archived),
            _ => Err(crate::error::SprintError::InvalidInput(format!(
                "unknown sprint status '{s}'"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// StoryStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StoryStatus {
    #[default]
    Todo,
    InProgress,
    Review,
    Done,
    Dropped,
}

impl StoryStatus {
    /// Terminal stories no longer count toward remaining work.
    pub fn is_terminal(self) -> bool {
        matches!(self, StoryStatus::Done | StoryStatus::Dropped)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StoryStatus::Todo => "todo",
            StoryStatus::InProgress => "in_progress",
            StoryStatus::Review => "review",
            StoryStatus::Done => "done",
            StoryStatus::Dropped => "dropped",
        }
    }
}

impl fmt::Display for StoryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Priority
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Critical => "critical",
        };
        f.write_str(s)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn status_prefix_roundtrip() {
        for status in SprintStatus::all() {
            assert_eq!(SprintStatus::from_prefix(status.prefix()), Some(*status));
        }
    }

    #[test]
    fn status_token_roundtrip() {
        for status in SprintStatus::all() {
            assert_eq!(SprintStatus::from_str(status.as_str()).unwrap(), *status);
        }
    }

    #[test]
    fn unknown_prefix_rejected() {
        assert_eq!(SprintStatus::from_prefix('#'), None);
        assert_eq!(SprintStatus::from_prefix('S'), None);
    }

    #[test]
    fn unknown_token_rejected() {
        assert!(SprintStatus::from_str("done").is_err());
        assert!(SprintStatus::from_str("").is_err());
    }

    #[test]
    fn terminal_story_statuses() {
        assert!(StoryStatus::Done.is_terminal());
        assert!(StoryStatus::Dropped.is_terminal());
        assert!(!StoryStatus::Todo.is_terminal());
        assert!(!StoryStatus::InProgress.is_terminal());
        assert!(!StoryStatus::Review.is_terminal());
    }
}
