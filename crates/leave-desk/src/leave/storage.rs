use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use super::domain::LeaveData;

/// Durable home of the leave data so the store can be exercised in isolation.
pub trait LeaveStorage: Send + Sync {
    fn load(&self) -> Result<LeaveData, StorageError>;
    fn persist(&self, data: &LeaveData) -> Result<(), StorageError>;
}

/// Error enumeration for storage failures.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("unable to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("unable to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("malformed leave data: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("unable to encode leave data: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("leave data must be a JSON object")]
    NotAnObject,
    #[error("missing required key '{0}'")]
    MissingKey(&'static str),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Stores the whole dataset as pretty-printed JSON in a single file.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The file actually written: symlinks are followed so the link survives.
    fn write_target(&self) -> PathBuf {
        std::fs::canonicalize(&self.path).unwrap_or_else(|_| self.path.clone())
    }

    fn write_error(&self, source: std::io::Error) -> StorageError {
        StorageError::Write {
            path: self.path.clone(),
            source,
        }
    }
}

impl LeaveStorage for JsonFileStorage {
    fn load(&self) -> Result<LeaveData, StorageError> {
        let raw = std::fs::read_to_string(&self.path).map_err(|source| StorageError::Read {
            path: self.path.clone(),
            source,
        })?;
        let data = LeaveData::from_json(&raw)?;
        debug!(path = %self.path.display(), "loaded leave data");
        Ok(data)
    }

    /// Writes to a sibling temp file and renames it over the target, so readers
    /// only ever see the previous or the new contents. The existing file's
    /// permissions carry over to the replacement.
    fn persist(&self, data: &LeaveData) -> Result<(), StorageError> {
        let contents = serde_json::to_string_pretty(data).map_err(StorageError::Encode)?;

        let target = self.write_target();
        let staging_dir = match target.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut staged =
            NamedTempFile::new_in(staging_dir).map_err(|err| self.write_error(err))?;
        if let Ok(existing) = std::fs::metadata(&target) {
            staged
                .as_file()
                .set_permissions(existing.permissions())
                .map_err(|err| self.write_error(err))?;
        }
        staged
            .write_all(contents.as_bytes())
            .map_err(|err| self.write_error(err))?;
        staged
            .as_file()
            .sync_all()
            .map_err(|err| self.write_error(err))?;
        staged
            .persist(&target)
            .map_err(|err| self.write_error(err.error))?;

        debug!(path = %self.path.display(), "persisted leave data");
        Ok(())
    }
}
