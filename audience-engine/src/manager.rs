//! Targeting manager
//!
//! The public contract of the engine: bind a record source, then ask
//! which records a given viewer may see. The manager fetches the
//! candidate pool, resolves each record's criterion through the factory,
//! filters in source order, and memoizes the filtered list when caching
//! is enabled.

use std::sync::{Arc, RwLock};

use audience_core::{
    effective_criterion_name, CacheError, QueryParams, SourceError, Targetable, TargetingConfig,
    TargetingResult, Viewer,
};
use audience_criteria::CriterionFactory;
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::cache::{CacheStore, MemoryCacheStore, SingleFlightCache};
use crate::source::TargetSource;

/// Base cache key under which filtered targeting results are stored.
///
/// Non-empty query parameters are folded in as a sha256 discriminator,
/// so different query shapes occupy different entries.
pub const TARGETING_CACHE_KEY: &str = "targeted_entities";

/// Orchestrates record retrieval, criterion resolution and eligibility
/// filtering.
///
/// Generic over the record type and the cache store; the default store
/// is the in-memory one. The record source is bound after construction
/// via [`set_source`](Self::set_source) and may be rebound; calling
/// [`get_targeted_entities`](Self::get_targeted_entities) before any
/// source is bound fails with [`SourceError::NotConfigured`].
pub struct TargetingManager<R, S = MemoryCacheStore<Vec<R>>>
where
    R: Targetable + Clone + Send + Sync + 'static,
    S: CacheStore<Vec<R>>,
{
    factory: Arc<CriterionFactory>,
    config: TargetingConfig,
    cache: SingleFlightCache<Vec<R>, S>,
    source: RwLock<Option<Arc<dyn TargetSource<R>>>>,
}

impl<R> TargetingManager<R>
where
    R: Targetable + Clone + Send + Sync + 'static,
{
    /// Create a manager backed by an in-memory cache store.
    pub fn new(factory: Arc<CriterionFactory>, config: TargetingConfig) -> Self {
        Self::with_store(factory, config, Arc::new(MemoryCacheStore::new()))
    }
}

impl<R, S> TargetingManager<R, S>
where
    R: Targetable + Clone + Send + Sync + 'static,
    S: CacheStore<Vec<R>>,
{
    /// Create a manager over the given cache store.
    pub fn with_store(
        factory: Arc<CriterionFactory>,
        config: TargetingConfig,
        store: Arc<S>,
    ) -> Self {
        Self {
            factory,
            config,
            cache: SingleFlightCache::new(store),
            source: RwLock::new(None),
        }
    }

    /// The factory this manager resolves criteria through.
    pub fn factory(&self) -> &CriterionFactory {
        &self.factory
    }

    /// The active configuration.
    pub fn config(&self) -> &TargetingConfig {
        &self.config
    }

    /// The result cache.
    pub fn cache(&self) -> &SingleFlightCache<Vec<R>, S> {
        &self.cache
    }

    /// Bind (or rebind) the record source.
    pub fn set_source(&self, source: Arc<dyn TargetSource<R>>) -> TargetingResult<()> {
        let mut slot = self
            .source
            .write()
            .map_err(|_| SourceError::LockPoisoned)?;
        *slot = Some(source);
        Ok(())
    }

    fn current_source(&self) -> TargetingResult<Arc<dyn TargetSource<R>>> {
        let slot = self
            .source
            .read()
            .map_err(|_| SourceError::LockPoisoned)?;
        slot.clone()
            .ok_or_else(|| SourceError::NotConfigured.into())
    }

    fn cache_key(&self, params: &QueryParams) -> TargetingResult<String> {
        if params.is_empty() {
            return Ok(TARGETING_CACHE_KEY.to_string());
        }
        // serde_json maps are sorted, so the encoding is canonical.
        let encoded = serde_json::to_string(params).map_err(|e| CacheError::KeyEncoding {
            reason: e.to_string(),
        })?;
        let digest = Sha256::digest(encoded.as_bytes());
        Ok(format!("{}:{}", TARGETING_CACHE_KEY, hex::encode(digest)))
    }

    /// Return the records from the bound source that the given viewer is
    /// eligible to see, in source order.
    ///
    /// Records with no criterion name (or an empty one) are always kept.
    /// A record naming a criterion unknown to the registry aborts the
    /// whole pass with [`CriterionError::Unrecognized`] and no partial
    /// result.
    ///
    /// Cached results are keyed by the query parameters only - the viewer
    /// is NOT part of the key. With caching enabled, the first caller's
    /// filtered list is served to every viewer until the entry expires or
    /// is invalidated. Disable caching, or use one manager per audience,
    /// when callers do not share a viewer.
    ///
    /// [`CriterionError::Unrecognized`]: audience_core::CriterionError::Unrecognized
    pub async fn get_targeted_entities(
        &self,
        viewer: Option<&dyn Viewer>,
        params: &QueryParams,
    ) -> TargetingResult<Vec<R>> {
        let source = self.current_source()?;

        if !self.config.enable_cache {
            debug!("cache disabled, computing targeted entities directly");
            return self.compute(viewer, params, source.as_ref()).await;
        }

        let key = self.cache_key(params)?;
        self.cache
            .get_or_compute(&key, self.config.cache_expiration, || {
                self.compute(viewer, params, source.as_ref())
            })
            .await
    }

    /// Remove every cached targeting result this manager produced, across
    /// all query-parameter keys. Idempotent.
    pub async fn invalidate_cache(&self) -> TargetingResult<()> {
        info!("invalidating targeting cache");
        self.cache.clear().await
    }

    async fn compute(
        &self,
        viewer: Option<&dyn Viewer>,
        params: &QueryParams,
        source: &dyn TargetSource<R>,
    ) -> TargetingResult<Vec<R>> {
        let records = source.entities(params).await?;
        let fetched = records.len();

        let mut kept = Vec::with_capacity(records.len());
        for record in records {
            if self.is_targeted(viewer, &record)? {
                kept.push(record);
            }
        }
        debug!(fetched, kept = kept.len(), "targeting filter pass complete");
        Ok(kept)
    }

    fn is_targeted(&self, viewer: Option<&dyn Viewer>, record: &R) -> TargetingResult<bool> {
        let Some(name) = effective_criterion_name(record) else {
            return Ok(true);
        };
        let parameters = record.criterion_params().unwrap_or_default();
        let criterion = self.factory.create(name, &parameters)?;
        Ok(criterion.is_eligible(viewer, record))
    }
}

// ============================================================================
// TESTS
// ============================================================================
