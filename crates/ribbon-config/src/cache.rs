//! Snapshots of built models, keyed by the sources they were built from.

use crate::model::RibbonModel;
use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;
use std::path::Path;
use std::sync::Arc;
use std::time::SystemTime;

/// Last modification time of every source a model was built from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Validity {
    sources: BTreeMap<String, SystemTime>,
}

impl Validity {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, source: impl Into<String>, modified: SystemTime) {
        self.sources.insert(source.into(), modified);
    }

    /// Read the modification time of each path.
    ///
    /// A path that cannot be read counts as modified at the epoch, so that a
    /// source appearing later changes the validity.
    pub fn from_paths<P: AsRef<Path>>(paths: impl IntoIterator<Item = P>) -> Self {
        let mut validity = Self::new();
        for path in paths {
            let path = path.as_ref();
            let modified = std::fs::metadata(path)
                .and_then(|m| m.modified())
                .unwrap_or(SystemTime::UNIX_EPOCH);
            validity.insert(path.display().to_string(), modified);
        }
        validity
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

#[derive(Debug)]
struct Entry {
    validity: Validity,
    model: Arc<RibbonModel>,
}

/// Built models, rebuilt when their sources change.
///
/// The cache is a plain value. Share it behind a lock if several threads
/// build through it.
#[derive(Debug)]
pub struct ModelCache<K> {
    entries: HashMap<K, Entry>,
}

impl<K> Default for ModelCache<K> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash> ModelCache<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Model cached under `key` if it was built from exactly `validity`,
    /// otherwise the result of `build`, which replaces the cached one.
    ///
    /// # Errors
    ///
    /// Returns the error of `build`. The previous snapshot stays cached.
    pub fn get_or_build<E, F>(&mut self, key: K, validity: Validity, build: F) -> Result<Arc<RibbonModel>, E>
    where
        F: FnOnce() -> Result<RibbonModel, E>,
    {
        if let Some(entry) = self.entries.get(&key) {
            if entry.validity == validity {
                tracing::debug!(sources = validity.len(), "ribbon cache hit");
                return Ok(Arc::clone(&entry.model));
            }
        }

        tracing::debug!(sources = validity.len(), "ribbon cache miss, building");
        let model = Arc::new(build()?);
        self.entries.insert(
            key,
            Entry {
                validity,
                model: Arc::clone(&model),
            },
        );
        Ok(model)
    }

    /// Drop the snapshot of `key`. Returns whether there was one.
    pub fn invalidate(&mut self, key: &K) -> bool {
        self.entries.remove(key).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
