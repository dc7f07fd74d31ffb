//! Checkpoint Persistence
//!
//! The checkpoint is the only durable state of the system: a JSON object keyed
//! by species id whose values carry `localities`, `country_codes` and `parents`.
//!
//! Writes go to a sibling temp file which is flushed and then renamed over the
//! previous snapshot, so a crash mid-write leaves the last good checkpoint intact.

use super::store::TaxonomyStore;
use super::types::{SpeciesId, SpeciesRecord};
use crate::error::{Result, TaxaError};

use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

pub struct Checkpoint {
    path: PathBuf,
    /// Serializes writers; only one snapshot is ever in flight.
    write_lock: Mutex<()>,
}

impl Checkpoint {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the store from disk. A missing file yields an empty store so a
    /// first harvest can start from nothing.
    pub fn load(&self) -> Result<TaxonomyStore> {
        if !self.path.exists() {
            tracing::info!("No checkpoint at {}, starting empty", self.path.display());
            return Ok(TaxonomyStore::new());
        }
        let records: BTreeMap<SpeciesId, SpeciesRecord> = read_json(&self.path)?;
        tracing::info!(
            "Loaded {} species records from {}",
            records.len(),
            self.path.display()
        );
        Ok(TaxonomyStore::from_records(records))
    }

    /// Writes a full snapshot of `store`.
    ///
    /// The snapshot is serialized before any I/O starts, so it reflects exactly
    /// the records inserted before this call.
    pub async fn persist(&self, store: &TaxonomyStore) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        let snapshot = store.snapshot();
        let bytes = serde_json::to_vec_pretty(&snapshot)
            .map_err(|e| TaxaError::storage(self.path.display(), e))?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| TaxaError::storage(parent.display(), e))?;
        }

        let tmp_path = self.path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp_path)
            .await
            .map_err(|e| TaxaError::storage(tmp_path.display(), e))?;
        file.write_all(&bytes)
            .await
            .map_err(|e| TaxaError::storage(tmp_path.display(), e))?;
        file.sync_all()
            .await
            .map_err(|e| TaxaError::storage(tmp_path.display(), e))?;
        drop(file);

        tokio::fs::rename(&tmp_path, &self.path)
            .await
            .map_err(|e| TaxaError::storage(self.path.display(), e))?;

        tracing::debug!(
            "Checkpoint written: {} records -> {}",
            snapshot.len(),
            self.path.display()
        );
        Ok(())
    }
}

/// Reads and decodes a JSON file, reporting both I/O and decode errors as
/// storage failures.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = std::fs::read(path).map_err(|e| TaxaError::storage(path.display(), e))?;
    serde_json::from_slice(&raw).map_err(|e| TaxaError::storage(path.display(), e))
}
