//! Session-scoped memoisation of view results.
//!
//! A view result depends only on the view, the source kind and the query
//! parameters, so it is keyed by a SHA-256 digest of those. Entries expire
//! after a TTL and the oldest entry is evicted when the cache is full.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::any::Any;
use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

use crate::config::CacheSettings;

/// Hex SHA-256 of the view name, source kind and canonical query JSON.
///
/// Returns `None` when the query cannot be serialized.
pub fn cache_key(view: &str, source: &str, query: &impl Serialize) -> Option<String> {
    let query = serde_json::to_string(query).ok()?;
    let mut hasher = Sha256::new();
    hasher.update(view.as_bytes());
    hasher.update(b"\n");
    hasher.update(source.as_bytes());
    hasher.update(b"\n");
    hasher.update(query.as_bytes());
    Some(hex::encode(hasher.finalize()))
}

struct Entry {
    value: Arc<dyn Any + Send + Sync>,
    inserted: Instant,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
}

pub struct SeriesCache {
    enabled: bool,
    max_entries: usize,
    ttl: Duration,
    entries: RwLock<HashMap<String, Entry>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl SeriesCache {
    pub fn new(max_entries: usize, ttl: Duration) -> Self {
        Self {
            enabled: max_entries > 0,
            max_entries,
            ttl,
            entries: RwLock::new(HashMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// A cache that never stores anything.
    pub fn disabled() -> Self {
        Self::new(0, Duration::ZERO)
    }

    pub fn from_settings(settings: &CacheSettings) -> Self {
        if settings.enabled {
            Self::new(settings.max_entries, Duration::from_secs(settings.ttl_secs))
        } else {
            Self::disabled()
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Cached value for `key`, if present, fresh and of type `T`.
    pub fn get<T>(&self, key: &str) -> Option<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        if !self.enabled {
            return None;
        }
        {
            let entries = self.entries.read();
            match entries.get(key) {
                Some(entry) if entry.inserted.elapsed() < self.ttl => {
                    return entry.value.downcast_ref::<T>().cloned();
                }
                Some(_) => {}
                None => return None,
            }
        }
        self.entries.write().remove(key);
        None
    }

    pub fn insert<T>(&self, key: String, value: T)
    where
        T: Clone + Send + Sync + 'static,
    {
        if !self.enabled {
            return;
        }
        let mut entries = self.entries.write();
        let ttl = self.ttl;
        entries.retain(|_, e| e.inserted.elapsed() < ttl);
        if entries.len() >= self.max_entries && !entries.contains_key(&key) {
            let oldest = entries
                .iter()
                .min_by_key(|(_, e)| e.inserted)
                .map(|(k, _)| k.clone());
            if let Some(oldest) = oldest {
                entries.remove(&oldest);
            }
        }
        entries.insert(
            key,
            Entry {
                value: Arc::new(value),
                inserted: Instant::now(),
            },
        );
    }

    /// Return the cached result for (`view`, `source`, `query`) or compute,
    /// store and return it. Errors are never cached.
    pub async fn get_or_try_compute<T, E, F, Fut>(
        &self,
        view: &str,
        source: &str,
        query: &impl Serialize,
        compute: F,
    ) -> Result<T, E>
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let key = if self.enabled {
            cache_key(view, source, query)
        } else {
            None
        };

        if let Some(ref key) = key {
            if let Some(hit) = self.get::<T>(key) {
                self.hits.fetch_add(1, Ordering::Relaxed);
                debug!(view, "series cache hit");
                return Ok(hit);
            }
            self.misses.fetch_add(1, Ordering::Relaxed);
            debug!(view, "series cache miss");
        }

        let value = compute().await?;
        if let Some(key) = key {
            self.insert(key, value.clone());
        }
        Ok(value)
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.read().len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

impl std::fmt::Debug for SeriesCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeriesCache")
            .field("enabled", &self.enabled)
            .field("max_entries", &self.max_entries)
            .field("ttl", &self.ttl)
            .field("stats", &self.stats())
            .finish()
    }
}
