//! File storage behind the `/file/{name}` route.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors returned by a [`FileStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    /// No file with that name exists.
    #[error("File not found: {0}")]
    NotFound(String),

    /// The name would escape the storage root or is otherwise unusable.
    #[error("Invalid file name: {0:?}")]
    InvalidName(String),

    /// The file exists but could not be opened, read, created or written.
    #[error("Storage I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Read and write access to named files.
///
/// Calls are synchronous and run to completion on the caller's task.
pub trait FileStore: Send + Sync {
    /// Read the whole file.
    fn read(&self, name: &str) -> Result<Vec<u8>, StoreError>;

    /// Create or truncate the file and write `contents` into it.
    fn write(&self, name: &str, contents: &[u8]) -> Result<(), StoreError>;
}

/// A [`FileStore`] backed by a directory on disk.
#[derive(Debug, Clone)]
pub struct DiskStore {
    root: PathBuf,
}

impl DiskStore {
    /// Create a store rooted at `root`. The directory is not created.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The storage root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve `name` to a path directly under the root.
    fn resolve(&self, name: &str) -> Result<PathBuf, StoreError> {
        let unusable = name.is_empty()
            || name == "."
            || name == ".."
            || name.contains(['/', '\\', '\0']);
        if unusable {
            return Err(StoreError::InvalidName(name.to_string()));
        }
        Ok(self.root.join(name))
    }
}

impl FileStore for DiskStore {
    fn read(&self, name: &str) -> Result<Vec<u8>, StoreError> {
        let path = self.resolve(name)?;
        fs::read(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => StoreError::NotFound(path.display().to_string()),
            _ => StoreError::Io(e),
        })
    }

    fn write(&self, name: &str, contents: &[u8]) -> Result<(), StoreError> {
        let path = self.resolve(name)?;
        fs::write(path, contents)?;
        Ok(())
    }
}
