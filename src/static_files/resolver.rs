//! Maps request targets to files under the content root.
//!
//! The target is appended to the root as plain text. `..` segments and
//! percent-escapes are passed through untouched, so without `contain_paths`
//! a target can reach outside the root.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use thiserror::Error;
use tokio::fs;

use crate::http::mime::extension_of;

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("not found")]
    NotFound,
    #[error("forbidden")]
    Forbidden,
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A file that passed resolution, described as of the moment it was checked.
#[derive(Debug, Clone)]
pub struct FileResource {
    pub path: PathBuf,
    pub size: u64,
    pub modified: SystemTime,
    /// Extension with its leading dot, or empty.
    pub extension: String,
}

#[derive(Debug, Clone)]
pub struct PathResolver {
    root: PathBuf,
    forbidden_segment: String,
    contain_paths: bool,
}

impl PathResolver {
    pub fn new(root: impl Into<PathBuf>, forbidden_segment: impl Into<String>, contain_paths: bool) -> Self {
        Self {
            root: root.into(),
            forbidden_segment: forbidden_segment.into(),
            contain_paths,
        }
    }

    /// `<root>/<target>` without any normalization.
    pub fn join(&self, target: &str) -> String {
        format!("{}/{}", self.root.display(), target)
    }

    /// Resolves `target` (the request path minus its leading `/`).
    ///
    /// Existence is checked before the forbidden-segment rule, so a missing
    /// path is `NotFound` even when it names the forbidden segment.
    pub async fn resolve(&self, target: &str) -> Result<FileResource, ResolveError> {
        let joined = self.join(target);
        let path = PathBuf::from(&joined);

        let metadata = match fs::metadata(&path).await {
            Ok(m) => m,
            Err(e) if is_missing(&e) => return Err(ResolveError::NotFound),
            Err(e) => return Err(e.into()),
        };

        if !self.forbidden_segment.is_empty() && joined.contains(&self.forbidden_segment) {
            return Err(ResolveError::Forbidden);
        }

        if self.contain_paths && !self.is_contained(&path).await? {
            tracing::warn!(path = %joined, "Path escapes content root");
            return Err(ResolveError::Forbidden);
        }

        if !metadata.is_file() {
            return Err(ResolveError::NotFound);
        }

        Ok(FileResource {
            size: metadata.len(),
            modified: metadata.modified()?,
            extension: extension_of(&joined).to_string(),
            path,
        })
    }

    async fn is_contained(&self, path: &Path) -> Result<bool, ResolveError> {
        let root = fs::canonicalize(&self.root).await?;
        let path = fs::canonicalize(path).await?;
        Ok(path.starts_with(root))
    }
}

fn is_missing(e: &std::io::Error) -> bool {
    matches!(
        e.kind(),
        std::io::ErrorKind::NotFound | std::io::ErrorKind::NotADirectory
    )
}
