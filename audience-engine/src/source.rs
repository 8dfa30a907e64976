//! Record-source abstraction
//!
//! The candidate pool comes from the host application through the
//! [`TargetSource`] capability; the engine passes query parameters through
//! unmodified and imposes no schema on them. An in-memory implementation
//! ships alongside the trait for tests and simple wirings.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;
use audience_core::{QueryParams, SourceError, Targetable, TargetingResult};

/// Capability supplying the candidate records for one targeting query.
#[async_trait]
pub trait TargetSource<R>: Send + Sync
where
    R: Targetable + Clone + Send + Sync + 'static,
{
    /// Retrieve the candidate records, in source order.
    async fn entities(&self, params: &QueryParams) -> TargetingResult<Vec<R>>;
}

/// In-memory record source.
///
/// Returns its records in insertion order and counts fetches, which makes
/// cache behavior observable in tests. Query parameters are accepted and
/// ignored.
#[derive(Debug, Default)]
pub struct MemoryTargetSource<R> {
    records: RwLock<Vec<R>>,
    fetch_count: AtomicUsize,
}

impl<R> MemoryTargetSource<R>
where
    R: Targetable + Clone + Send + Sync + 'static,
{
    /// Create an empty source.
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
            fetch_count: AtomicUsize::new(0),
        }
    }

    /// Create a source seeded with the given records.
    pub fn with_records(records: Vec<R>) -> Self {
        Self {
            records: RwLock::new(records),
            fetch_count: AtomicUsize::new(0),
        }
    }

    /// Append a record.
    pub fn push(&self, record: R) -> TargetingResult<()> {
        let mut records = self
            .records
            .write()
            .map_err(|_| SourceError::LockPoisoned)?;
        records.push(record);
        Ok(())
    }

    /// Remove all records.
    pub fn clear(&self) -> TargetingResult<()> {
        let mut records = self
            .records
            .write()
            .map_err(|_| SourceError::LockPoisoned)?;
        records.clear();
        Ok(())
    }

    /// Number of times `entities` has been called.
    pub fn fetch_count(&self) -> usize {
        self.fetch_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<R> TargetSource<R> for MemoryTargetSource<R>
where
    R: Targetable + Clone + Send + Sync + 'static,
{
    async fn entities(&self, _params: &QueryParams) -> TargetingResult<Vec<R>> {
        self.fetch_count.fetch_add(1, Ordering::SeqCst);
        let records = self
            .records
            .read()
            .map_err(|_| SourceError::LockPoisoned)?;
        Ok(records.clone())
    }
}
