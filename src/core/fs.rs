//! File access capability used by the tree builder.
//!
//! The builder only needs to know whether a path exists and to read it as
//! text. Both are fallible, and their error messages travel up unchanged.

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;

use crate::core::error::DepError;

#[async_trait]
pub trait FileAccess: Send + Sync {
    /// Whether the absolute path exists.
    async fn path_exists(&self, path: &Path) -> Result<bool, DepError>;

    /// Full text content of the absolute path.
    async fn read_text(&self, path: &Path) -> Result<String, DepError>;

    /// Directory that relative entry paths are resolved against.
    fn base_dir(&self) -> Result<PathBuf, DepError> {
        std::env::current_dir()
            .map_err(|e| DepError::access(".", format!("cannot determine current directory: {}", e)))
    }
}

// ---------- Local filesystem ----------

/// [`FileAccess`] backed by `tokio::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

#[async_trait]
impl FileAccess for LocalFs {
    async fn path_exists(&self, path: &Path) -> Result<bool, DepError> {
        tokio::fs::try_exists(path)
            .await
            .map_err(|e| DepError::access(path, format!("cannot access {}: {}", path.display(), e)))
    }

    async fn read_text(&self, path: &Path) -> Result<String, DepError> {
        tokio::fs::read_to_string(path)
            .await
            .map_err(|e| DepError::access(path, format!("cannot read {}: {}", path.display(), e)))
    }
}

// ---------- In-memory ----------

/// [`FileAccess`] over an in-memory map of absolute paths to contents.
#[derive(Debug, Clone)]
pub struct MemoryFs {
    files: HashMap<PathBuf, String>,
    cwd: PathBuf,
}

impl MemoryFs {
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self {
            files: HashMap::new(),
            cwd: cwd.into(),
        }
    }

    /// Add a file, resolving relative paths against the configured cwd.
    pub fn insert(&mut self, path: impl AsRef<Path>, content: impl Into<String>) {
        let path = absolutize(path.as_ref(), &self.cwd);
        self.files.insert(path, content.into());
    }

    pub fn with_file(mut self, path: impl AsRef<Path>, content: impl Into<String>) -> Self {
        self.insert(path, content);
        self
    }
}

impl Default for MemoryFs {
    fn default() -> Self {
        Self::new("/")
    }
}

#[async_trait]
impl FileAccess for MemoryFs {
    async fn path_exists(&self, path: &Path) -> Result<bool, DepError> {
        Ok(self.files.contains_key(path))
    }

    async fn read_text(&self, path: &Path) -> Result<String, DepError> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| DepError::access(path, format!("cannot read {}: not found", path.display())))
    }

    fn base_dir(&self) -> Result<PathBuf, DepError> {
        Ok(self.cwd.clone())
    }
}

// ---------- Path helpers ----------

/// Join `path` onto `base` (unless already absolute) and fold `.` and `..`
/// lexically. Symlinks are not followed.
pub fn absolutize(path: &Path, base: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    };

    let mut out = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
