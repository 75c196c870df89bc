//! Scratch directory and temp-file lifecycle
//!
//! Both request flows pass their payload through a file under the uploads
//! directory. [`ScratchFile`] is a delete-on-drop guard, so a file created
//! for one request is removed whether the handler finishes or bails early.
//! Unlink failures are logged and never surfaced: by the time the guard
//! drops, the response is already on its way out.

use std::path::{Path, PathBuf};

use thiserror::Error;
use uuid::Uuid;

/// Errors from scratch-file operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid file name: {0}")]
    InvalidFileName(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Validate a caller-supplied file name before it is joined onto the
/// scratch directory or placed in a Content-Disposition header.
///
/// Rejects anything that could escape the directory (path separators,
/// `..`, `.`, empty names) and anything that cannot sit inside a quoted
/// header value (ASCII control characters, `"`). Returns the name
/// unchanged when it is safe to use as a single path component.
pub fn sanitize_file_name(name: &str) -> Result<&str, StoreError> {
    if name.is_empty() {
        return Err(StoreError::InvalidFileName("empty".to_string()));
    }
    if name.contains(['/', '\\', '"']) || name.bytes().any(|b| b.is_ascii_control()) {
        return Err(StoreError::InvalidFileName(name.to_string()));
    }
    if name == "." || name == ".." {
        return Err(StoreError::InvalidFileName(name.to_string()));
    }
    Ok(name)
}

/// The uploads directory holding transient files.
#[derive(Debug, Clone)]
pub struct ScratchDir {
    root: PathBuf,
}

impl ScratchDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the directory if it does not exist yet.
    pub async fn ensure(&self) -> Result<(), StoreError> {
        tokio::fs::create_dir_all(&self.root).await?;
        Ok(())
    }

    /// Write bytes to a fresh randomly-named file, as upload middleware
    /// would spool an incoming part.
    pub async fn spool(&self, bytes: &[u8]) -> Result<ScratchFile, StoreError> {
        self.ensure().await?;
        let path = self.root.join(Uuid::new_v4().simple().to_string());
        tokio::fs::write(&path, bytes).await?;
        Ok(ScratchFile { path })
    }

    /// Write bytes under a caller-supplied name. The name must have
    /// passed [`sanitize_file_name`]; it is validated again here so the
    /// check cannot be bypassed.
    pub async fn write_named(&self, name: &str, bytes: &[u8]) -> Result<ScratchFile, StoreError> {
        let name = sanitize_file_name(name)?;
        self.ensure().await?;
        let path = self.root.join(name);
        tokio::fs::write(&path, bytes).await?;
        Ok(ScratchFile { path })
    }
}

/// One transient file, removed on drop.
#[derive(Debug)]
pub struct ScratchFile {
    path: PathBuf,
}

impl ScratchFile {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the file back in full.
    pub async fn read(&self) -> Result<Vec<u8>, StoreError> {
        Ok(tokio::fs::read(&self.path).await?)
    }
}

impl Drop for ScratchFile {
    fn drop(&mut self) {
        // Drop runs on the async runtime; removal of a small local file
        // is quick enough to do synchronously here.
        if let Err(e) = std::fs::remove_file(&self.path) {
            tracing::warn!(path = %self.path.display(), error = %e, "failed to delete temp file");
        } else {
            tracing::debug!(path = %self.path.display(), "temp file deleted");
        }
    }
}
