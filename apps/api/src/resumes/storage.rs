//! Local upload store — résumé bytes on disk, addressed by a generated stored name.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

/// Used when sanitizing leaves nothing of the user-supplied filename.
const FALLBACK_FILENAME: &str = "document";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Stored file not found: {0}")]
    NotFound(String),

    #[error("Invalid stored name: {0}")]
    InvalidName(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone)]
pub struct UploadStore {
    root: PathBuf,
}

impl UploadStore {
    /// Opens the store, creating the root directory if needed.
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Writes `bytes` under a fresh, collision-resistant name and returns that name.
    pub async fn save(&self, filename: &str, bytes: &[u8]) -> Result<String, StorageError> {
        let stored_name = stored_name_for(filename);
        tokio::fs::write(self.path_for(&stored_name)?, bytes).await?;
        debug!("Stored {} bytes as {}", bytes.len(), stored_name);
        Ok(stored_name)
    }

    pub async fn read(&self, stored_name: &str) -> Result<Bytes, StorageError> {
        match tokio::fs::read(self.path_for(stored_name)?).await {
            Ok(data) => Ok(Bytes::from(data)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(StorageError::NotFound(stored_name.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Removes the stored bytes. Already-missing files are not an error.
    pub async fn remove(&self, stored_name: &str) -> Result<(), StorageError> {
        match tokio::fs::remove_file(self.path_for(stored_name)?).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn path_for(&self, stored_name: &str) -> Result<PathBuf, StorageError> {
        if stored_name.is_empty()
            || stored_name.starts_with('.')
            || stored_name.contains(['/', '\\'])
        {
            return Err(StorageError::InvalidName(stored_name.to_string()));
        }
        Ok(self.root.join(stored_name))
    }
}

/// `<uuid-v4>_<sanitized filename>`.
pub fn stored_name_for(filename: &str) -> String {
    format!("{}_{}", Uuid::new_v4(), sanitize_filename(filename))
}

/// Reduces a user-supplied filename to a safe ASCII name.
///
/// Path separators and whitespace become `_`; anything outside `[A-Za-z0-9._-]`
/// is dropped; leading and trailing dots and underscores are stripped.
pub fn sanitize_filename(filename: &str) -> String {
    let mut out = String::with_capacity(filename.len());
    for word in filename
        .split(|c: char| c.is_whitespace() || c == '/' || c == '\\')
        .filter(|w| !w.is_empty())
    {
        if !out.is_empty() {
            out.push('_');
        }
        out.extend(
            word.chars()
                .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_')),
        );
    }

    let trimmed = out.trim_matches(|c| c == '.' || c == '_');
    if trimmed.is_empty() {
        FALLBACK_FILENAME.to_string()
    } else {
        trimmed.to_string()
    }
}
