//! File-backed artifact store
//!
//! One pretty-printed JSON file per participant under a storage root, named
//! `<sanitized-id>_data.json`. A later submission for the same identifier
//! replaces the earlier file.

use async_trait::async_trait;
use shared::{ParticipantId, ParticipantRecord};
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::error::{ServerError, ServerResult};
use crate::traits::ArtifactStore;

/// Suffix appended to the sanitized participant identifier
pub const ARTIFACT_SUFFIX: &str = "_data.json";

/// File name of the artifact for `participant`
pub fn artifact_file_name(participant: &ParticipantId) -> String {
    format!("{}{}", participant.sanitized(), ARTIFACT_SUFFIX)
}

/// Real artifact store writing to the local filesystem
#[derive(Clone, Debug)]
pub struct RealArtifactStore {
    root: PathBuf,
}

impl RealArtifactStore {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the storage root if it does not exist yet.
    ///
    /// Returns `true` when the directory had to be created.
    pub async fn ensure_root(&self) -> ServerResult<bool> {
        if fs::metadata(&self.root).await.is_ok_and(|meta| meta.is_dir()) {
            return Ok(false);
        }

        fs::create_dir_all(&self.root).await.map_err(|e| {
            ServerError::storage(format!("cannot create storage directory {}: {}", self.root.display(), e))
        })?;
        Ok(true)
    }
}

impl Default for RealArtifactStore {
    fn default() -> Self {
        Self::new("./data")
    }
}

#[async_trait]
impl ArtifactStore for RealArtifactStore {
    async fn save(&self, participant: &ParticipantId, record: &ParticipantRecord) -> ServerResult<PathBuf> {
        let path = self.artifact_path(participant);
        let content = serde_json::to_string_pretty(record)?;

        let storage_failed = |source: std::io::Error| ServerError::StorageFailed {
            participant: participant.to_string(),
            path: path.clone(),
            source,
        };

        fs::create_dir_all(&self.root).await.map_err(storage_failed)?;
        fs::write(&path, content).await.map_err(storage_failed)?;

        Ok(path)
    }

    fn artifact_path(&self, participant: &ParticipantId) -> PathBuf {
        self.root.join(artifact_file_name(participant))
    }
}
