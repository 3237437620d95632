//! Snapshot-scoped memo of derived data, backed by `DashMap` for concurrent access.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use dashmap::DashMap;

use crate::latest::LatestSelection;
use crate::snapshot::SnapshotVersion;
use crate::sponsor::SponsorResolution;

/// Thread-safe cache of resolved sponsor parties and the latest-vote set.
///
/// Everything stored is valid for exactly one [`SnapshotVersion`]. A lookup
/// stamped with a different version clears the cache before answering, so
/// cached data never outlives the ingestion run it was derived from.
#[derive(Debug, Default)]
pub struct SnapshotCache {
    version: Mutex<Option<SnapshotVersion>>,
    sponsors: DashMap<(SnapshotVersion, String), SponsorResolution>,
    latest: DashMap<SnapshotVersion, Arc<LatestSelection>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl SnapshotCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear everything if `version` differs from the stamped version.
    fn sync(&self, version: &SnapshotVersion) {
        let mut current = self.version.lock().unwrap_or_else(PoisonError::into_inner);
        if current.as_ref() != Some(version) {
            if let Some(previous) = current.as_ref() {
                tracing::debug!("Snapshot changed ({} -> {}), clearing cache", previous, version);
            }
            self.sponsors.clear();
            self.latest.clear();
            *current = Some(version.clone());
        }
    }

    /// Run `insert` only if `version` is still the stamped version. Holding the
    /// lock keeps a concurrent `sync` from clearing in between.
    fn insert_if_current(&self, version: &SnapshotVersion, insert: impl FnOnce()) {
        let current = self.version.lock().unwrap_or_else(PoisonError::into_inner);
        if current.as_ref() == Some(version) {
            insert();
        } else {
            tracing::debug!("Snapshot {} superseded, result not cached", version);
        }
    }

    /// The stamped version, if anything has been cached.
    pub fn version(&self) -> Option<SnapshotVersion> {
        self.version
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn sponsor_party<F>(&self, version: &SnapshotVersion, vote_id: &str, resolve: F) -> SponsorResolution
    where
        F: FnOnce() -> SponsorResolution,
    {
        self.sync(version);
        let key = (version.clone(), vote_id.to_string());
        if let Some(hit) = self.sponsors.get(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return hit.clone();
        }
        self.misses.fetch_add(1, Ordering::Relaxed);
        let resolution = resolve();
        self.insert_if_current(version, || {
            self.sponsors.insert(key, resolution.clone());
        });
        resolution
    }

    pub fn latest<F>(&self, version: &SnapshotVersion, select: F) -> Arc<LatestSelection>
    where
        F: FnOnce() -> LatestSelection,
    {
        self.sync(version);
        if let Some(hit) = self.latest.get(version) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            tracing::debug!("Cache hit: latest-vote set for {}", version);
            return Arc::clone(&hit);
        }
        self.misses.fetch_add(1, Ordering::Relaxed);
        tracing::debug!("Cache miss: latest-vote set for {}", version);
        let selection = Arc::new(select());
        self.insert_if_current(version, || {
            self.latest.insert(version.clone(), Arc::clone(&selection));
        });
        selection
    }

    /// Number of memoized sponsor resolutions.
    pub fn len(&self) -> usize {
        self.sponsors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sponsors.is_empty() && self.latest.is_empty()
    }

    /// (hits, misses) since creation.
    pub fn stats(&self) -> (u64, u64) {
        (
            self.hits.load(Ordering::Relaxed),
            self.misses.load(Ordering::Relaxed),
        )
    }

    /// Removes all entries from the cache.
    pub fn clear(&self) {
        self.sponsors.clear();
        self.latest.clear();
    }
}
