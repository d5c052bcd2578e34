use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;

use super::loader::{self, SourceKey};
use super::model::LoadedData;

// ---------------------------------------------------------------------------
// Memoizing dataset lookup
// ---------------------------------------------------------------------------

/// Loaded datasets keyed by source identity.
///
/// A bundled source whose candidates are all missing is cached as `None`,
/// so it keeps reporting "missing" until [`DatasetCache::clear`]. Load errors
/// are never cached.
#[derive(Debug, Default)]
pub struct DatasetCache {
    entries: HashMap<SourceKey, Option<Arc<LoadedData>>>,
    loads: usize,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the dataset for `key`, reading storage only on a miss.
    pub fn get_or_load(
        &mut self,
        key: &SourceKey,
        candidates: &[String],
    ) -> Result<Option<Arc<LoadedData>>> {
        if let Some(hit) = self.entries.get(key) {
            log::debug!("Dataset cache hit for {}", describe(key));
            return Ok(hit.clone());
        }

        let loaded = match key {
            SourceKey::Bundled(dir) => loader::load_bundled(dir, candidates)?,
            SourceKey::Upload(upload) => Some(loader::prepare(
                upload.name.clone(),
                loader::load_bytes(&upload.name, &upload.bytes)?,
            )),
        }
        .map(Arc::new);

        self.loads += 1;
        self.entries.insert(key.clone(), loaded.clone());
        Ok(loaded)
    }

    /// Forget one source, e.g. an upload the user has replaced.
    pub fn remove(&mut self, key: &SourceKey) -> bool {
        let removed = self.entries.remove(key).is_some();
        if removed {
            log::debug!("Evicted {}", describe(key));
        }
        removed
    }

    /// Forget every cached dataset.
    pub fn clear(&mut self) {
        log::info!("Clearing dataset cache ({} entries)", self.entries.len());
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// How many times storage (or an upload) has been parsed.
    pub fn loads(&self) -> usize {
        self.loads
    }
}

fn describe(key: &SourceKey) -> String {
    match key {
        SourceKey::Bundled(dir) => format!("bundled data in {}", dir.display()),
        SourceKey::Upload(upload) => format!("upload {}", upload.name),
    }
}
