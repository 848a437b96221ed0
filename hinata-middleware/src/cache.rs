//! In-process store of normalized series with per-entry TTL.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use hinata_core::{Series, SeriesKey};
use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;

/// Outcome of a cache lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum CacheLookup {
    /// A fresh entry.
    Hit(Arc<Series>),
    /// Absent or stale.
    Miss,
}

impl CacheLookup {
    /// The cached series, if this is a hit.
    #[must_use]
    pub fn into_hit(self) -> Option<Arc<Series>> {
        match self {
            Self::Hit(s) => Some(s),
            Self::Miss => None,
        }
    }

    /// True for [`CacheLookup::Hit`].
    #[must_use]
    pub const fn is_hit(&self) -> bool {
        matches!(self, Self::Hit(_))
    }
}

/// Metadata about a stored entry, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheEntryInfo {
    /// Wall-clock time the entry was written.
    pub fetched_at: DateTime<Utc>,
    /// Freshness window the entry was written with.
    pub ttl: Duration,
    /// Whether the entry is still fresh now.
    pub fresh: bool,
}

struct Entry {
    series: Arc<Series>,
    stored_at: Instant,
    fetched_at: DateTime<Utc>,
    ttl: Duration,
}

impl Entry {
    fn is_fresh(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.stored_at) < self.ttl
    }
}

/// Keyed store of normalized series.
///
/// Entries are immutable `Arc<Series>` values swapped under a lock, so a
/// reader sees either the old or the new series and never a partial one.
/// Stale entries are dropped lazily when looked up; nothing runs in the
/// background.
#[derive(Default)]
pub struct SeriesCache {
    entries: RwLock<HashMap<SeriesKey, Entry>>,
    gates: Mutex<HashMap<SeriesKey, Arc<Mutex<()>>>>,
}

impl std::fmt::Debug for SeriesCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeriesCache").finish_non_exhaustive()
    }
}

impl SeriesCache {
    /// Empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up `key`. Never returns stale data.
    pub async fn get(&self, key: &SeriesKey) -> CacheLookup {
        let now = Instant::now();
        {
            let guard = self.entries.read().await;
            match guard.get(key) {
                None => return CacheLookup::Miss,
                Some(e) if e.is_fresh(now) => return CacheLookup::Hit(Arc::clone(&e.series)),
                Some(_) => {}
            }
        }
        let mut guard = self.entries.write().await;
        // Another task may have refreshed the entry between the two locks.
        match guard.get(key) {
            Some(e) if e.is_fresh(Instant::now()) => CacheLookup::Hit(Arc::clone(&e.series)),
            Some(_) => {
                guard.remove(key);
                #[cfg(feature = "tracing")]
                tracing::debug!(target: "hinata::cache", %key, "evicted stale entry");
                CacheLookup::Miss
            }
            None => CacheLookup::Miss,
        }
    }

    /// Store `series` under `key`, replacing any previous entry.
    ///
    /// A zero `ttl` stores nothing.
    pub async fn put(&self, key: SeriesKey, series: Arc<Series>, ttl: Duration) {
        if ttl.is_zero() {
            return;
        }
        let entry = Entry {
            series,
            stored_at: Instant::now(),
            fetched_at: Utc::now(),
            ttl,
        };
        self.entries.write().await.insert(key, entry);
    }

    /// Remove `key`. Returns whether an entry existed.
    pub async fn invalidate(&self, key: &SeriesKey) -> bool {
        let removed = self.entries.write().await.remove(key).is_some();
        self.gates.lock().await.remove(key);
        removed
    }

    /// Remove everything.
    pub async fn clear(&self) {
        self.entries.write().await.clear();
        self.gates.lock().await.clear();
    }

    /// Stored entries, stale ones included until they are looked up.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// True when nothing is stored.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Metadata for `key` without evicting it.
    pub async fn entry_info(&self, key: &SeriesKey) -> Option<CacheEntryInfo> {
        let now = Instant::now();
        self.entries.read().await.get(key).map(|e| CacheEntryInfo {
            fetched_at: e.fetched_at,
            ttl: e.ttl,
            fresh: e.is_fresh(now),
        })
    }

    /// Per-key mutex for callers that want to collapse concurrent fetches of
    /// the same key. Holding it does not block readers or writers of the cache.
    ///
    /// Hand the gate back with [`release_gate`](Self::release_gate) once done.
    pub async fn gate(&self, key: &SeriesKey) -> Arc<Mutex<()>> {
        let mut gates = self.gates.lock().await;
        Arc::clone(gates.entry(key.clone()).or_default())
    }

    /// Return a gate obtained from [`gate`](Self::gate). The slot for `key` is
    /// dropped when no other caller still holds or waits on it.
    pub async fn release_gate(&self, key: &SeriesKey, gate: Arc<Mutex<()>>) {
        drop(gate);
        let mut gates = self.gates.lock().await;
        if gates.get(key).is_some_and(|g| Arc::strong_count(g) == 1) {
            gates.remove(key);
        }
    }

    /// Keys that currently have a gate.
    pub async fn gate_count(&self) -> usize {
        self.gates.lock().await.len()
    }
}
