//! Process-wide load-once cache keyed by file path
//!
//! A table is read and transformed on first access and shared afterwards.
//! There is no invalidation: if the file changes on disk during the session
//! the cached table goes stale until the process restarts. Failed loads are
//! not cached, so a missing file can be put in place and retried.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::Result;

/// Memoized tables of one kind, keyed by the path they were loaded from
#[derive(Debug)]
pub struct SessionCache<T> {
    entries: Mutex<HashMap<PathBuf, Arc<T>>>,
}

impl<T> Default for SessionCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SessionCache<T> {
    /// Create an empty cache
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<PathBuf, Arc<T>>> {
        // Entries are only ever inserted whole, so a poisoned map is still consistent
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Return the cached value for `path`, loading it with `load` on first access
    pub fn get_or_load<F>(&self, path: &Path, load: F) -> Result<Arc<T>>
    where
        F: FnOnce(&Path) -> Result<T>,
    {
        if let Some(hit) = self.lock().get(path) {
            log::debug!("Session cache hit for {}", path.display());
            return Ok(Arc::clone(hit));
        }

        // Load outside the lock; if two callers race, the first insert wins
        log::info!("Loading {}", path.display());
        let value = Arc::new(load(path)?);
        let mut entries = self.lock();
        let entry = entries.entry(path.to_path_buf()).or_insert(value);
        Ok(Arc::clone(entry))
    }

    /// Check whether `path` has been loaded
    pub fn contains(&self, path: &Path) -> bool {
        self.lock().contains_key(path)
    }

    /// Number of cached tables
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// True if nothing has been loaded yet
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
