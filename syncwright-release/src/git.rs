//! Local repository access through the `git` executable.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::{io_err, ReleaseError};

/// Tag operations on a repository and its remote.
pub trait TagStore {
    fn list_tags(&self) -> Result<Vec<String>, ReleaseError>;
    fn delete_local(&self, tag: &str) -> Result<(), ReleaseError>;
    fn delete_remote(&self, tag: &str) -> Result<(), ReleaseError>;
}

#[derive(Debug, Clone)]
pub struct GitRepo {
    root: PathBuf,
    remote: String,
}

impl GitRepo {
    pub fn new(root: impl Into<PathBuf>, remote: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            remote: remote.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn git(&self, args: &[&str]) -> Result<String, ReleaseError> {
        let output = Command::new("git")
            .arg("-C")
            .arg(&self.root)
            .args(args)
            .output()
            .map_err(|e| io_err("git", e))?;

        if !output.status.success() {
            return Err(ReleaseError::Git {
                args: args.join(" "),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl TagStore for GitRepo {
    fn list_tags(&self) -> Result<Vec<String>, ReleaseError> {
        let stdout = self.git(&["tag", "--list"])?;
        Ok(stdout
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_owned)
            .collect())
    }

    fn delete_local(&self, tag: &str) -> Result<(), ReleaseError> {
        self.git(&["tag", "-d", tag]).map(drop)
    }

    fn delete_remote(&self, tag: &str) -> Result<(), ReleaseError> {
        let refspec = format!(":refs/tags/{tag}");
        self.git(&["push", self.remote.as_str(), refspec.as_str()])
            .map(drop)
    }
}
