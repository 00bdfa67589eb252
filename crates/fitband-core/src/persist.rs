//! The file-write boundary and a filesystem-backed implementation.

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::debug;

use fitband_types::ResourceRef;

use crate::error::{Error, Result};

/// Write-bytes-at-logical-path collaborator.
///
/// The core never performs the write itself; it hands serialized bytes
/// and a logical path (e.g. `/SLEEP/2024-01-01-sleep.json`) to the
/// sink and receives back an opaque reference to the written resource.
#[async_trait]
pub trait RecordingSink: Send + Sync {
    /// Persist `bytes` at the logical `path`.
    async fn save(&self, bytes: &[u8], path: &str) -> Result<ResourceRef>;
}

/// Recording sink rooted at a base directory on the local filesystem.
///
/// Logical paths are joined under the base directory; parents are
/// created as needed and the returned reference is a `file://` URI.
pub struct FsRecordingSink {
    base: PathBuf,
}

impl FsRecordingSink {
    /// Create a sink rooted at `base`.
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }
}

#[async_trait]
impl RecordingSink for FsRecordingSink {
    async fn save(&self, bytes: &[u8], path: &str) -> Result<ResourceRef> {
        let target = self.base.join(path.trim_start_matches('/'));

        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| Error::persist(path, e))?;
        }

        tokio::fs::write(&target, bytes)
            .await
            .map_err(|e| Error::persist(path, e))?;

        debug!(path, bytes = bytes.len(), "recording persisted");
        Ok(ResourceRef(format!("file://{}", target.display())))
    }
}
