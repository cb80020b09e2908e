use crate::error::Result;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use tracing::debug;

/// Load-once memoization of parsed tables, keyed by file path.
///
/// Entries are never invalidated: input files are static for the life of the
/// process. Loads happen under the write lock, so a path is read at most once
/// even with concurrent callers.
pub struct TableCache<R> {
    tables: RwLock<HashMap<PathBuf, Arc<Vec<R>>>>,
}

impl<R> TableCache<R> {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(HashMap::new()),
        }
    }

    pub fn get_or_load<F>(&self, path: &Path, load: F) -> Result<Arc<Vec<R>>>
    where
        F: FnOnce(&Path) -> Result<Vec<R>>,
    {
        if let Some(table) = self.get(path) {
            debug!(path = %path.display(), "table cache hit");
            return Ok(table);
        }

        let mut tables = self.tables.write().unwrap_or_else(|e| e.into_inner());
        if let Some(table) = tables.get(path) {
            return Ok(Arc::clone(table));
        }

        let table = Arc::new(load(path)?);
        tables.insert(path.to_path_buf(), Arc::clone(&table));
        Ok(table)
    }

    pub fn get(&self, path: &Path) -> Option<Arc<Vec<R>>> {
        let tables = self.tables.read().unwrap_or_else(|e| e.into_inner());
        tables.get(path).cloned()
    }

    pub fn len(&self) -> usize {
        self.tables.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<R> Default for TableCache<R> {
    fn default() -> Self {
        Self::new()
    }
}
