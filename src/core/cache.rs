use crate::utils::error::{ExtractorError, Result};
use lru::LruCache;
use std::hash::Hash;
use std::num::NonZeroUsize;
use std::sync::Mutex;

/// 容量固定的 LRU 快取，可在多個查詢間共用
pub struct BoundedCache<K: Hash + Eq, V> {
    inner: Mutex<LruCache<K, V>>,
}

impl<K: Hash + Eq, V: Clone> BoundedCache<K, V> {
    pub fn new(capacity: usize) -> Result<Self> {
        let cap = NonZeroUsize::new(capacity).ok_or_else(|| {
            ExtractorError::InvalidConfigValueError {
                field: "enrichment.cache_capacity".to_string(),
                value: capacity.to_string(),
                reason: "Cache capacity must be at least 1".to_string(),
            }
        })?;

        Ok(Self {
            inner: Mutex::new(LruCache::new(cap)),
        })
    }

    /// 命中時同時把項目標記為最近使用
    pub fn get(&self, key: &K) -> Option<V> {
        let mut cache = self.inner.lock().ok()?;
        cache.get(key).cloned()
    }

    pub fn insert(&self, key: K, value: V) {
        if let Ok(mut cache) = self.inner.lock() {
            cache.put(key, value);
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().map(|cache| cache.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
