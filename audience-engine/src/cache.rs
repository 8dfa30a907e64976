//! Targeting result cache
//!
//! Two layers, so the storage side stays swappable: [`CacheStore`] is a
//! plain keyed store with per-entry TTL, and [`SingleFlightCache`] is the
//! get-or-compute wrapper that owns the concurrency discipline. The
//! wrapper holds a per-key mutex across the lookup-compute-store sequence,
//! so concurrent misses on one key collapse into a single computation and
//! an explicit delete is linearized against any in-flight computation for
//! that key.

use std::collections::HashMap;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::{Arc, Mutex as StdMutex, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use audience_core::{CacheError, TargetingResult};
use chrono::{DateTime, Utc};
use tokio::sync::Mutex as FlightMutex;
use tracing::debug;

// ============================================================================
// CACHE STORE
// ============================================================================

/// Keyed value store with per-entry time-to-live.
///
/// Expired entries read as absent; deleting an absent key is not an
/// error. Implementations must be safe for concurrent access.
#[async_trait]
pub trait CacheStore<V>: Send + Sync
where
    V: Clone + Send + Sync + 'static,
{
    /// Get the live value for a key, or `None` if absent or expired.
    async fn get(&self, key: &str) -> TargetingResult<Option<V>>;

    /// Store a value under a key with the given time-to-live.
    async fn put(&self, key: &str, value: V, ttl: Duration) -> TargetingResult<()>;

    /// Remove the entry for a key immediately, regardless of TTL.
    async fn delete(&self, key: &str) -> TargetingResult<()>;
}

/// Statistics about cache usage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of live-entry hits.
    pub hits: u64,
    /// Number of misses (absent or expired).
    pub misses: u64,
    /// Number of entries currently stored, expired included.
    pub entry_count: u64,
}

impl CacheStats {
    /// Calculate the hit rate (0.0 to 1.0).
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

struct StoredEntry<V> {
    value: V,
    expires_at: DateTime<Utc>,
}

/// In-memory [`CacheStore`] with passive expiry.
///
/// Entries are not reaped in the background; an expired entry simply
/// reads as absent until overwritten or deleted.
#[derive(Default)]
pub struct MemoryCacheStore<V> {
    entries: RwLock<HashMap<String, StoredEntry<V>>>,
    stats: RwLock<CacheStats>,
}

impl<V> MemoryCacheStore<V>
where
    V: Clone + Send + Sync + 'static,
{
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            stats: RwLock::new(CacheStats::default()),
        }
    }

    /// Current usage statistics.
    pub fn stats(&self) -> TargetingResult<CacheStats> {
        let entries = self
            .entries
            .read()
            .map_err(|_| CacheError::LockPoisoned)?;
        let mut stats = self
            .stats
            .read()
            .map_err(|_| CacheError::LockPoisoned)?
            .clone();
        stats.entry_count = entries.len() as u64;
        Ok(stats)
    }

    fn expiry_for(ttl: Duration) -> DateTime<Utc> {
        let ttl = chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::MAX);
        Utc::now().checked_add_signed(ttl).unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}

#[async_trait]
impl<V> CacheStore<V> for MemoryCacheStore<V>
where
    V: Clone + Send + Sync + 'static,
{
    async fn get(&self, key: &str) -> TargetingResult<Option<V>> {
        let entries = self
            .entries
            .read()
            .map_err(|_| CacheError::LockPoisoned)?;
        let live = entries
            .get(key)
            .filter(|entry| entry.expires_at > Utc::now())
            .map(|entry| entry.value.clone());
        drop(entries);

        let mut stats = self
            .stats
            .write()
            .map_err(|_| CacheError::LockPoisoned)?;
        if live.is_some() {
            stats.hits += 1;
        } else {
            stats.misses += 1;
        }
        Ok(live)
    }

    async fn put(&self, key: &str, value: V, ttl: Duration) -> TargetingResult<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| CacheError::LockPoisoned)?;
        entries.insert(
            key.to_string(),
            StoredEntry {
                value,
                expires_at: Self::expiry_for(ttl),
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> TargetingResult<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| CacheError::LockPoisoned)?;
        entries.remove(key);
        Ok(())
    }
}

// ============================================================================
// SINGLE-FLIGHT WRAPPER
// ============================================================================

/// Get-or-compute cache with per-key single-flight computation.
///
/// Each key owns a flight mutex held across the lookup-compute-store
/// sequence: concurrent requests for a missing key wait for the first
/// computation and then hit the stored value, so at most one fresh
/// computation runs per key per expiration window. `delete` and `clear`
/// acquire the same mutex, which linearizes invalidation against any
/// computation in flight - a read issued after an invalidation returns
/// always misses.
pub struct SingleFlightCache<V, S>
where
    V: Clone + Send + Sync + 'static,
    S: CacheStore<V>,
{
    store: Arc<S>,
    flights: StdMutex<HashMap<String, Arc<FlightMutex<()>>>>,
    _value: PhantomData<fn() -> V>,
}

impl<V, S> SingleFlightCache<V, S>
where
    V: Clone + Send + Sync + 'static,
    S: CacheStore<V>,
{
    /// Create a wrapper over the given store.
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            flights: StdMutex::new(HashMap::new()),
            _value: PhantomData,
        }
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    fn flight_lock(&self, key: &str) -> TargetingResult<Arc<FlightMutex<()>>> {
        let mut flights = self
            .flights
            .lock()
            .map_err(|_| CacheError::LockPoisoned)?;
        Ok(flights
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(FlightMutex::new(())))
            .clone())
    }

    fn known_keys(&self) -> TargetingResult<Vec<(String, Arc<FlightMutex<()>>)>> {
        let flights = self
            .flights
            .lock()
            .map_err(|_| CacheError::LockPoisoned)?;
        Ok(flights
            .iter()
            .map(|(key, lock)| (key.clone(), lock.clone()))
            .collect())
    }

    /// Return the cached value for `key`, computing and storing it on a
    /// miss.
    ///
    /// A computation failure is propagated and nothing is stored, so the
    /// next request recomputes.
    pub async fn get_or_compute<F, Fut>(
        &self,
        key: &str,
        ttl: Duration,
        compute: F,
    ) -> TargetingResult<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = TargetingResult<V>>,
    {
        let lock = self.flight_lock(key)?;
        let _flight = lock.lock().await;

        if let Some(value) = self.store.get(key).await? {
            debug!(key = %key, "cache hit");
            return Ok(value);
        }

        debug!(key = %key, "cache miss, computing");
        let value = compute().await?;
        self.store.put(key, value.clone(), ttl).await?;
        Ok(value)
    }

    /// Remove the entry for a key. Idempotent.
    pub async fn delete(&self, key: &str) -> TargetingResult<()> {
        let lock = self.flight_lock(key)?;
        let _flight = lock.lock().await;
        self.store.delete(key).await
    }

    /// Remove every entry this wrapper has ever served. Idempotent.
    pub async fn clear(&self) -> TargetingResult<()> {
        for (key, lock) in self.known_keys()? {
            let _flight = lock.lock().await;
            self.store.delete(&key).await?;
        }
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================
