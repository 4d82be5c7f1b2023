//! Version-control adapter: a `CommitLog` backed by the `git` binary.

use crate::error::{Result, SprintError};
use crate::history::{CommitInfo, CommitLog};
use crate::paths;
use chrono::DateTime;
use std::path::{Path, PathBuf};
use std::process::Command;

pub struct GitLog {
    repo_root: PathBuf,
}

impl GitLog {
    /// Locate the repository containing `dir` via `git rev-parse`.
    pub fn discover(dir: &Path) -> Result<Self> {
        let output = Command::new("git")
            .arg("-C")
            .arg(dir)
            .args(["rev-parse", "--show-toplevel"])
            .output()
            .map_err(|e| SprintError::Git(format!("failed to run git: {e}")))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SprintError::Git(format!(
                "not a git repository: {}",
                stderr.trim()
            )));
        }
        let stdout = String::from_utf8_lossy(&output.stdout);
        let root = stdout.trim();
        if root.is_empty() {
            return Err(SprintError::Git("empty repository root".to_string()));
        }
        Ok(Self {
            repo_root: PathBuf::from(root),
        })
    }

    fn run(&self, args: &[&str]) -> Result<Vec<u8>> {
        let output = Command::new("git")
            .arg("-C")
            .arg(&self.repo_root)
            .args(args)
            .output()
            .map_err(|e| SprintError::Git(format!("failed to run git: {e}")))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SprintError::Git(format!(
                "git {} failed: {}",
                args.first().unwrap_or(&""),
                stderr.trim()
            )));
        }
        Ok(output.stdout)
    }

    /// Repo-relative form of `path` for use on git command lines.
    fn rel(&self, path: &Path) -> Result<String> {
        let canonical = if path.exists() {
            path.canonicalize()?
        } else {
            path.to_path_buf()
        };
        let root = self.repo_root.canonicalize()?;
        let rel = canonical.strip_prefix(&root).map_err(|_| {
            SprintError::Git(format!(
                "path '{}' is outside repository '{}'",
                path.display(),
                root.display()
            ))
        })?;
        Ok(rel.to_string_lossy().into_owned())
    }
}

impl CommitLog for GitLog {
    fn commits_touching(&self, dir: &Path) -> Result<Vec<CommitInfo>> {
        let rel = self.rel(dir)?;
        let stdout = self.run(&["log", "--reverse", "--format=%H %ct", "--", &rel])?;
        let text = String::from_utf8_lossy(&stdout);
        let mut commits = Vec::new();
        for line in text.lines() {
            let Some((id, secs)) = line.split_once(' ') else {
                continue;
            };
            let secs: i64 = secs
                .trim()
                .parse()
                .map_err(|_| SprintError::Git(format!("bad commit timestamp: {line}")))?;
            let timestamp = DateTime::from_timestamp(secs, 0)
                .ok_or_else(|| SprintError::Git(format!("bad commit timestamp: {line}")))?;
            commits.push(CommitInfo {
                id: id.to_string(),
                timestamp,
            });
        }
        Ok(commits)
    }

    fn files_at_commit(&self, commit: &str, dir: &Path) -> Result<Vec<String>> {
        let rel = self.rel(dir)?;
        let stdout = self.run(&["ls-tree", "-r", "--name-only", commit, "--", &rel])?;
        let text = String::from_utf8_lossy(&stdout);
        // Direct children only, mirroring the working-tree listing —
        // nested files are not stories.
        Ok(text
            .lines()
            .map(str::trim)
            .filter(|l| {
                let p = Path::new(l);
                p.parent() == Some(Path::new(&rel)) && paths::is_story_file(p)
            })
            .map(String::from)
            .collect())
    }

    fn read_file_at_commit(&self, commit: &str, file: &str) -> Result<Option<Vec<u8>>> {
        let output = Command::new("git")
            .arg("-C")
            .arg(&self.repo_root)
            .args(["show", &format!("{commit}:{file}")])
            .output()
            .map_err(|e| SprintError::Git(format!("failed to run git: {e}")))?;
        if !output.status.success() {
            // Path absent at that commit.
            return Ok(None);
        }
        Ok(Some(output.stdout))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
