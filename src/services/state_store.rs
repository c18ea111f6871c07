//! Flat `{ticker: lastState}` record persisted between scans

use crate::error::StateStoreError;
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Last known signal per ticker, serialized as a plain JSON object
pub type SignalSnapshot = BTreeMap<String, String>;

pub struct SignalStateStore {
    path: PathBuf,
}

impl SignalStateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the snapshot; a missing file is an empty snapshot
    pub async fn load(&self) -> Result<SignalSnapshot, StateStoreError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No saved signals yet");
                Ok(SignalSnapshot::new())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Replace the snapshot. Writes a sibling temp file, then renames it over
    /// the old one so readers never see a half-written file.
    pub async fn save(&self, snapshot: &SignalSnapshot) -> Result<(), StateStoreError> {
        let json = serde_json::to_vec_pretty(snapshot)?;
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        debug!(path = %self.path.display(), entries = snapshot.len(), "Saved signal snapshot");
        Ok(())
    }
}
