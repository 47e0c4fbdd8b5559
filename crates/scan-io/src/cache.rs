//! Decoded-stack cache with LRU eviction.
//!
//! Entries are keyed by file identity (path, modification time, length), so
//! a rewritten stack is decoded again on the next request. The cache is
//! bounded by the total sample bytes it holds; a budget of zero disables it
//! and every request decodes fresh.
//!
//! # Example
//!
//! ```ignore
//! use scan_io::cache::DecodeCache;
//!
//! let cache = DecodeCache::new(256 * 1024 * 1024);
//! let stack = cache.get_or_decode(&path, "0")?;
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Instant, SystemTime};

use tracing::{debug, trace};

use crate::error::{IoError, IoResult};
use crate::stack::{self, DecodedStack};

/// Default cache budget in bytes (256MB).
pub const DEFAULT_CACHE_SIZE: usize = 256 * 1024 * 1024;

/// File identity used as cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    /// Stack path.
    pub path: PathBuf,
    /// Modification time, if the platform reports one.
    pub modified: Option<SystemTime>,
    /// File length in bytes.
    pub len: u64,
}

impl CacheKey {
    /// Reads the identity of a file.
    pub fn for_file(path: &Path) -> IoResult<Self> {
        let meta = fs::metadata(path)
            .map_err(|e| IoError::Decode(format!("cannot open {}: {e}", path.display())))?;
        Ok(Self {
            path: path.to_path_buf(),
            modified: meta.modified().ok(),
            len: meta.len(),
        })
    }
}

/// Cache statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Cached stacks.
    pub entries: usize,
    /// Bytes held.
    pub bytes: usize,
    /// Lookups served from cache.
    pub hits: u64,
    /// Lookups that decoded.
    pub misses: u64,
}

impl CacheStats {
    /// Hit rate in `0.0..=1.0`.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

#[derive(Debug)]
struct Entry {
    stack: Arc<DecodedStack>,
    bytes: usize,
    last_access: Instant,
}

#[derive(Debug, Default)]
struct Inner {
    entries: HashMap<CacheKey, Entry>,
    stats: CacheStats,
}

/// Thread-safe decoded-stack cache.
#[derive(Debug)]
pub struct DecodeCache {
    max_bytes: usize,
    inner: Mutex<Inner>,
}

impl Default for DecodeCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_SIZE)
    }
}

impl DecodeCache {
    /// Cache holding at most `max_bytes` of samples.
    pub fn new(max_bytes: usize) -> Self {
        Self {
            max_bytes,
            inner: Mutex::new(Inner::default()),
        }
    }

    /// A cache that never stores anything.
    pub fn disabled() -> Self {
        Self::new(0)
    }

    /// Byte budget.
    #[inline]
    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// True if the budget is zero.
    #[inline]
    pub fn is_disabled(&self) -> bool {
        self.max_bytes == 0
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current statistics.
    pub fn stats(&self) -> CacheStats {
        self.lock().stats
    }

    /// Drops every entry.
    pub fn clear(&self) {
        let mut inner = self.lock();
        inner.entries.clear();
        inner.stats.entries = 0;
        inner.stats.bytes = 0;
    }

    /// Returns the cached decode of `path`, decoding on a miss.
    ///
    /// Decoding happens outside the lock; two concurrent misses on the same
    /// file both decode and the second insert wins.
    pub fn get_or_decode(&self, path: &Path, name: &str) -> IoResult<Arc<DecodedStack>> {
        if self.is_disabled() {
            return stack::read(path, name).map(Arc::new);
        }

        let key = CacheKey::for_file(path)?;
        {
            let mut inner = self.lock();
            if let Some(entry) = inner.entries.get_mut(&key) {
                entry.last_access = Instant::now();
                let hit = Arc::clone(&entry.stack);
                inner.stats.hits += 1;
                trace!(path = %path.display(), "decode cache hit");
                return Ok(hit);
            }
            inner.stats.misses += 1;
        }

        let decoded = Arc::new(stack::read(path, name)?);
        self.insert(key, Arc::clone(&decoded));
        Ok(decoded)
    }

    fn insert(&self, key: CacheKey, stack: Arc<DecodedStack>) {
        let bytes = stack.size_bytes();
        if bytes > self.max_bytes {
            debug!(path = %key.path.display(), bytes, budget = self.max_bytes, "stack exceeds cache budget");
            return;
        }

        let mut inner = self.lock();
        // Older versions of the same file can never hit again.
        inner.entries.retain(|k, _| k.path != key.path);

        let mut used: usize = inner.entries.values().map(|e| e.bytes).sum();
        while used + bytes > self.max_bytes {
            let Some(oldest) = inner
                .entries
                .iter()
                .min_by_key(|(_, e)| e.last_access)
                .map(|(k, _)| k.clone())
            else {
                break;
            };
            if let Some(evicted) = inner.entries.remove(&oldest) {
                used -= evicted.bytes;
                debug!(path = %oldest.path.display(), bytes = evicted.bytes, "evicted stack");
            }
        }

        inner.entries.insert(
            key,
            Entry {
                stack,
                bytes,
                last_access: Instant::now(),
            },
        );
        inner.stats.entries = inner.entries.len();
        inner.stats.bytes = used + bytes;
    }
}
