use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SprintError {
    #[error("not initialized: run 'sprint init'")]
    NotInitialized,

    #[error("sprint not found: {0}")]
    SprintNotFound(String),

    #[error("no active sprint")]
    NoActiveSprint,

    #[error("ambiguous sprint '{query}': matches {}", .matches.join(", "))]
    Ambiguous { query: String, matches: Vec<String> },

    #[error("invalid transition from {from} to {to}: {reason}")]
    InvalidTransition {
        from: String,
        to: String,
        reason: String,
    },

    #[error("invalid sprint folder name: {0}")]
    InvalidName(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("already exists: {}", .0.display())]
    AlreadyExists(PathBuf),

    #[error("insufficient history: {days} day(s) of commits, need at least 2")]
    InsufficientHistory { days: usize },

    #[error("batch repair partially failed: {} repaired, {} failed", .0.repaired, .0.failed)]
    PartialFailure(crate::doctor::RepairResult),

    #[error("story parse error: {0}")]
    StoryParse(String),

    #[error("git error: {0}")]
    Git(String),

    #[error("operation cancelled")]
    Cancelled,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SprintError>;
