// Filesystem-backed artifact store

use crate::cache::key::Fingerprint;
use crate::error::Result;
use bytes::Bytes;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Maps fingerprints to previously rendered artifacts, one file per key.
///
/// Entries are never expired or invalidated. Concurrent writers for the same
/// key are safe: content under a given fingerprint is deterministic, so the
/// last writer wins with identical bytes.
#[derive(Debug, Clone)]
pub struct FsArtifactStore {
    root: PathBuf,
}

impl FsArtifactStore {
    /// Open a store rooted at `root`, creating the directory if needed.
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &Fingerprint) -> PathBuf {
        self.root.join(key.as_str())
    }

    /// Return the stored bytes for `key`, or `None` on a miss.
    ///
    /// A read failure other than NotFound is logged and reported as a miss;
    /// the caller regenerates rather than failing the request.
    pub async fn read(&self, key: &Fingerprint) -> Option<Bytes> {
        match tokio::fs::read(self.path_for(key)).await {
            Ok(bytes) => {
                debug!(key = %key, len = bytes.len(), "artifact store hit");
                Some(Bytes::from(bytes))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                warn!(key = %key, error = %e, "artifact store read failed, treating as miss");
                None
            }
        }
    }

    /// Persist `bytes` under `key`. Overwriting an existing entry is
    /// acceptable (idempotent content).
    pub async fn write(&self, key: &Fingerprint, bytes: &[u8]) -> Result<()> {
        tokio::fs::write(self.path_for(key), bytes).await?;
        debug!(key = %key, len = bytes.len(), "artifact stored");
        Ok(())
    }
}
