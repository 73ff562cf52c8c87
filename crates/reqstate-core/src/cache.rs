// ── Response cache service ──
//
// Memoizes successful payloads by caller-chosen key. Identity is the key
// alone: two controllers sharing a key share an entry even when their
// request parameters differ.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::{Duration, Instant};

use dashmap::DashMap;
use serde_json::Value;
use tracing::trace;

/// Identifies a cache slot.
///
/// `Name` keys compare by string. `Token` keys are minted by
/// [`CacheKey::unique`] and never collide with any other key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    Name(Arc<str>),
    Token(u64),
}

impl CacheKey {
    pub fn named(name: impl Into<Arc<str>>) -> Self {
        Self::Name(name.into())
    }

    /// A fresh process-unique key.
    pub fn unique() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self::Token(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl From<&str> for CacheKey {
    fn from(name: &str) -> Self {
        Self::named(name)
    }
}

impl From<String> for CacheKey {
    fn from(name: String) -> Self {
        Self::named(name)
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => f.write_str(name),
            Self::Token(id) => write!(f, "token#{id}"),
        }
    }
}

/// Get/set mapping shared between request controllers.
///
/// Values are stored as JSON so one cache can serve controllers with
/// different payload types.
pub trait ResponseCache: Send + Sync {
    fn get(&self, key: &CacheKey) -> Option<Value>;
    fn set(&self, key: CacheKey, value: Value);
    fn remove(&self, key: &CacheKey) -> Option<Value>;
    fn clear(&self);
}

struct CacheEntry {
    value: Value,
    stored_at: Instant,
}

/// In-memory [`ResponseCache`] with optional time-to-live.
///
/// Concurrent writers to one key are last-write-wins. Expired entries are
/// dropped lazily on read.
#[derive(Default)]
pub struct MemoryCache {
    entries: DashMap<CacheKey, CacheEntry>,
    ttl: Option<Duration>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl: Some(ttl),
        }
    }

    /// The process-wide cache used by controllers that are not given one.
    pub fn global() -> Arc<Self> {
        static GLOBAL: OnceLock<Arc<MemoryCache>> = OnceLock::new();
        Arc::clone(GLOBAL.get_or_init(|| Arc::new(MemoryCache::new())))
    }

    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn is_expired(&self, entry: &CacheEntry) -> bool {
        self.ttl.is_some_and(|ttl| entry.stored_at.elapsed() >= ttl)
    }
}

impl ResponseCache for MemoryCache {
    fn get(&self, key: &CacheKey) -> Option<Value> {
        {
            let entry = self.entries.get(key)?;
            if !self.is_expired(&entry) {
                return Some(entry.value.clone());
            }
        }

        // Shard guard is released above; removing under it would deadlock.
        self.entries.remove_if(key, |_, entry| self.is_expired(entry));
        trace!(%key, "cache entry expired");
        None
    }

    fn set(&self, key: CacheKey, value: Value) {
        self.entries.insert(
            key,
            CacheEntry {
                value,
                stored_at: Instant::now(),
            },
        );
    }

    fn remove(&self, key: &CacheKey) -> Option<Value> {
        self.entries.remove(key).map(|(_, entry)| entry.value)
    }

    fn clear(&self) {
        self.entries.clear();
    }
}

impl fmt::Debug for MemoryCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryCache")
            .field("entries", &self.entries.len())
            .field("ttl", &self.ttl)
            .finish()
    }
}
