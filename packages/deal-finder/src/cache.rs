//! Durable extraction cache.
//!
//! Maps candidate id to the raw extraction result so reruns never pay for
//! the same extraction twice. Every `store` rewrites the whole file, which
//! is what makes an interrupted run resumable.

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use crate::error::{DealFinderError, Result};
use crate::types::run::{latest_run_file, CACHE_PREFIX};
use crate::types::{ExtractionResult, OutputLayout, RunTimestamp};

#[derive(Debug)]
pub struct ExtractionCache {
    path: PathBuf,
    timestamp: RunTimestamp,
    entries: IndexMap<String, ExtractionResult>,
}

impl ExtractionCache {
    /// Load the newest cache in `dir`, or start an empty one under a fresh
    /// timestamp when there is none.
    pub fn discover(dir: &Path) -> Result<Self> {
        match latest_run_file(dir, CACHE_PREFIX)? {
            Some((path, timestamp)) => {
                let cache = Self::load(path, timestamp)?;
                tracing::info!(
                    path = %cache.path.display(),
                    entries = cache.len(),
                    "Loaded existing extraction cache"
                );
                Ok(cache)
            }
            None => {
                let cache = Self::create(dir, RunTimestamp::now());
                tracing::info!(path = %cache.path.display(), "No extraction cache found, starting fresh");
                Ok(cache)
            }
        }
    }

    /// Empty cache for `timestamp`. Nothing touches disk until the first store.
    pub fn create(dir: &Path, timestamp: RunTimestamp) -> Self {
        let path = OutputLayout::new(dir, timestamp.clone()).cache();
        Self {
            path,
            timestamp,
            entries: IndexMap::new(),
        }
    }

    /// Load a specific cache file.
    pub fn load(path: impl Into<PathBuf>, timestamp: RunTimestamp) -> Result<Self> {
        let path = path.into();
        let data = fs::read_to_string(&path).map_err(|e| DealFinderError::io(&path, e))?;
        let entries: IndexMap<String, ExtractionResult> =
            serde_json::from_str(&data).map_err(|e| DealFinderError::json(&path, e))?;
        Ok(Self {
            path,
            timestamp,
            entries,
        })
    }

    pub fn lookup(&self, candidate_id: &str) -> Option<&ExtractionResult> {
        self.entries.get(candidate_id)
    }

    /// Record a result and persist the full mapping before returning.
    pub fn store(&mut self, candidate_id: impl Into<String>, result: ExtractionResult) -> Result<()> {
        self.entries.insert(candidate_id.into(), result);
        self.persist()
    }

    fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| DealFinderError::io(parent, e))?;
        }
        let data = serde_json::to_string_pretty(&self.entries)?;

        // Write-then-rename keeps the previous file intact if we die mid-write.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, data).map_err(|e| DealFinderError::io(&tmp, e))?;
        fs::rename(&tmp, &self.path).map_err(|e| DealFinderError::io(&self.path, e))?;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn timestamp(&self) -> &RunTimestamp {
        &self.timestamp
    }
}
