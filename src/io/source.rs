//! Record sources
//!
//! - `FileSource` reads the batch from the local filesystem through tokio
//! - `MemorySource` serves bytes already held in memory

use crate::core::traits::RecordSource;
use crate::types::SourceError;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Batch stored in a local file
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl RecordSource for FileSource {
    async fn fetch(&self) -> Result<Vec<u8>, SourceError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => {
                debug!(path = %self.path.display(), bytes = bytes.len(), "batch read");
                Ok(bytes)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(SourceError::not_found(self.path.display().to_string()))
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "batch could not be read");
                Err(e.into())
            }
        }
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Batch held in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    bytes: Vec<u8>,
}

impl MemorySource {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }
}

#[async_trait]
impl RecordSource for MemorySource {
    async fn fetch(&self) -> Result<Vec<u8>, SourceError> {
        Ok(self.bytes.clone())
    }

    fn describe(&self) -> String {
        format!("memory ({} bytes)", self.bytes.len())
    }
}
