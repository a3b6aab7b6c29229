//! Path-keyed asset cache

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rustc_hash::FxHashMap;

/// Shared assets keyed by the path they were loaded from
///
/// Loading the same path twice decodes once; every caller gets the same `Arc`.
#[derive(Debug)]
pub struct AssetCache<T> {
    entries: FxHashMap<PathBuf, Arc<T>>,
}

impl<T> AssetCache<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: FxHashMap::default(),
        }
    }

    /// Return the cached asset for `path`, loading it on first use
    ///
    /// # Errors
    ///
    /// Returns the loader's error; failed loads are not cached
    pub fn get_or_load<E>(
        &mut self,
        path: impl AsRef<Path>,
        load: impl FnOnce(&Path) -> Result<T, E>,
    ) -> Result<Arc<T>, E> {
        let path = path.as_ref();
        if let Some(asset) = self.entries.get(path) {
            return Ok(Arc::clone(asset));
        }
        let asset = Arc::new(load(path)?);
        self.entries.insert(path.to_path_buf(), Arc::clone(&asset));
        Ok(asset)
    }

    /// Store an asset under a path, replacing any previous one
    pub fn insert(&mut self, path: impl Into<PathBuf>, asset: T) -> Arc<T> {
        let asset = Arc::new(asset);
        self.entries.insert(path.into(), Arc::clone(&asset));
        asset
    }

    #[must_use]
    pub fn get(&self, path: impl AsRef<Path>) -> Option<Arc<T>> {
        self.entries.get(path.as_ref()).cloned()
    }

    #[must_use]
    pub fn contains(&self, path: impl AsRef<Path>) -> bool {
        self.entries.contains_key(path.as_ref())
    }

    pub fn remove(&mut self, path: impl AsRef<Path>) -> Option<Arc<T>> {
        self.entries.remove(path.as_ref())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<T> Default for AssetCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loads_once() {
        let mut cache = AssetCache::<String>::new();
        let mut loads = 0;
        let first = cache
            .get_or_load("a.txt", |p| {
                loads += 1;
                Ok::<_, ()>(p.display().to_string())
            })
            .unwrap();
        let second = cache
            .get_or_load("a.txt", |_| {
                loads += 1;
                Ok::<_, ()>(String::from("other"))
            })
            .unwrap();
        assert_eq!(loads, 1);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(*second, "a.txt");
    }

    #[test]
    fn test_failed_load_not_cached() {
        let mut cache = AssetCache::<i32>::new();
        assert!(cache.get_or_load("x", |_| Err("broken")).is_err());
        assert!(!cache.contains("x"));
        assert_eq!(*cache.get_or_load("x", |_| Ok::<_, &str>(3)).unwrap(), 3);
    }

    #[test]
    fn test_insert_and_remove() {
        let mut cache = AssetCache::new();
        cache.insert("k", 1);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("k").as_deref(), Some(&1));
        assert!(cache.remove("k").is_some());
        assert!(cache.is_empty());
    }
}
