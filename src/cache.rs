//! Explicit cache for loaded game tables.
//!
//! Entries are keyed by file identity and sample size. File identity is the
//! canonical path together with the file's length and modification time,
//! so an edited file misses the cache. Lookups take a read lock and can run
//! concurrently; a miss computes outside any lock and then inserts. Each
//! insert first evicts expired entries and entries for an earlier version
//! of the same file. Two racing misses for the same key both compute, and
//! the last insert wins.

use crate::error::{ChessError, Result};

use polars::prelude::DataFrame;
use std::collections::HashMap;
use std::fmt::Debug;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::{Duration, Instant, SystemTime};
use tracing::debug;

/// Decides whether a cached entry may still be served
pub trait InvalidationPolicy: Debug + Send + Sync {
    fn is_expired(&self, age: Duration) -> bool;
}

/// Entries live until cleared or invalidated by hand
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverExpire;

impl InvalidationPolicy for NeverExpire {
    fn is_expired(&self, _age: Duration) -> bool {
        false
    }
}

/// Entries expire once older than the given lifetime
#[derive(Debug, Clone, Copy)]
pub struct TimeToLive(pub Duration);

impl InvalidationPolicy for TimeToLive {
    fn is_expired(&self, age: Duration) -> bool {
        age >= self.0
    }
}

/// Identity of a source file at the time it was read
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileIdentity {
    pub path: PathBuf,
    pub len: u64,
    pub modified: Option<SystemTime>,
}

impl FileIdentity {
    pub fn resolve(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ChessError::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        let canonical = path.canonicalize()?;
        let metadata = std::fs::metadata(&canonical)?;
        Ok(Self {
            path: canonical,
            len: metadata.len(),
            modified: metadata.modified().ok(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    file: FileIdentity,
    sample_size: Option<usize>,
}

#[derive(Debug, Clone)]
struct CachedFrame {
    frame: Arc<DataFrame>,
    inserted_at: Instant,
}

/// Cache of game tables keyed by `(file identity, sample size)`
#[derive(Debug)]
pub struct LoadCache {
    entries: RwLock<HashMap<CacheKey, CachedFrame>>,
    policy: Box<dyn InvalidationPolicy>,
}

impl Default for LoadCache {
    fn default() -> Self {
        Self::new(NeverExpire)
    }
}

impl LoadCache {
    pub fn new(policy: impl InvalidationPolicy + 'static) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            policy: Box::new(policy),
        }
    }

    /// Cache whose entries expire after `ttl`, or never when `ttl` is `None`
    pub fn with_ttl(ttl: Option<Duration>) -> Self {
        match ttl {
            Some(ttl) => Self::new(TimeToLive(ttl)),
            None => Self::new(NeverExpire),
        }
    }

    /// Cached entry for `(path, sample_size)`, computing it with `load` on a miss.
    ///
    /// A failed load is returned to the caller and nothing is cached.
    pub fn get_or_try_insert<F>(
        &self,
        path: &Path,
        sample_size: Option<usize>,
        load: F,
    ) -> Result<Arc<DataFrame>>
    where
        F: FnOnce(&Path, Option<usize>) -> Result<DataFrame>,
    {
        let key = CacheKey {
            file: FileIdentity::resolve(path)?,
            sample_size,
        };

        if let Some(frame) = self.lookup(&key) {
            debug!("Cache hit for {} ({:?})", path.display(), sample_size);
            return Ok(frame);
        }

        debug!("Cache miss for {} ({:?})", path.display(), sample_size);
        let frame = Arc::new(load(path, sample_size)?);

        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        self.evict_stale(&mut entries, &key.file);
        entries.insert(
            key,
            CachedFrame {
                frame: Arc::clone(&frame),
                inserted_at: Instant::now(),
            },
        );
        Ok(frame)
    }

    fn lookup(&self, key: &CacheKey) -> Option<Arc<DataFrame>> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries
            .get(key)
            .filter(|entry| !self.policy.is_expired(entry.inserted_at.elapsed()))
            .map(|entry| Arc::clone(&entry.frame))
    }

    /// Remove expired entries and entries for an older version of `current`
    fn evict_stale(&self, entries: &mut HashMap<CacheKey, CachedFrame>, current: &FileIdentity) {
        let before = entries.len();
        entries.retain(|key, entry| {
            let superseded = key.file.path == current.path && key.file != *current;
            !superseded && !self.policy.is_expired(entry.inserted_at.elapsed())
        });
        let evicted = before - entries.len();
        if evicted > 0 {
            debug!("Evicted {} stale cache entries", evicted);
        }
    }

    /// Drop every entry for `path`, whatever the sample size
    pub fn invalidate(&self, path: &Path) -> usize {
        let target = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let before = entries.len();
        entries.retain(|key, _| key.file.path != target);
        before - entries.len()
    }

    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Number of stored entries, expired ones included
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
