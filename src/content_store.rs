//! Durable storage for raw document bytes, decoupled from metadata.
//!
//! Files land under a configured root directory with UUID names. Writes go
//! to a temp path first and are renamed into place, so a concurrent reader
//! never observes a partially written file. Content is immutable once
//! written; there is no update or delete.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use uuid::Uuid;

#[derive(Clone, Debug)]
pub struct ContentStore {
    root: PathBuf,
}

impl ContentStore {
    pub async fn new(root: impl Into<PathBuf>) -> Result<Self, ContentStoreError> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write `bytes` under a fresh UUID name and return the storage path.
    pub async fn write(&self, bytes: &[u8]) -> Result<String, ContentStoreError> {
        // The root may have been removed out from under us; recreating it
        // is idempotent.
        tokio::fs::create_dir_all(&self.root).await?;

        let path = self.root.join(Uuid::new_v4().to_string());
        self.write_atomic(&path, bytes).await?;
        Ok(path.to_string_lossy().into_owned())
    }

    /// Write a resized derivative next to its source, at `{source}_{width}`.
    pub async fn write_derivative(
        &self,
        source_path: &str,
        width: u32,
        bytes: &[u8],
    ) -> Result<String, ContentStoreError> {
        let path = PathBuf::from(format!("{source_path}_{width}"));
        self.write_atomic(&path, bytes).await?;
        Ok(path.to_string_lossy().into_owned())
    }

    pub async fn read(&self, path: &str) -> Result<Vec<u8>, ContentStoreError> {
        match tokio::fs::read(path).await {
            Ok(bytes) => Ok(bytes),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                Err(ContentStoreError::NotFound(path.to_string()))
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn write_atomic(&self, path: &Path, bytes: &[u8]) -> Result<(), ContentStoreError> {
        let tmp = self.root.join(format!(".tmp-{}", Uuid::new_v4()));
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, path).await?;
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ContentStoreError {
    #[error("content not found: {0}")]
    NotFound(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
