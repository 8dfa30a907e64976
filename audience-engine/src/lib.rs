//! AUDIENCE Engine - Targeting Orchestration
//!
//! The record-source capability, the TTL result cache with single-flight
//! computation, and the targeting manager that ties them to the criterion
//! factory. Hosts bind a source, then ask which records a viewer may see.

pub mod cache;
pub mod manager;
pub mod source;

pub use cache::{CacheStats, CacheStore, MemoryCacheStore, SingleFlightCache};
pub use manager::{TargetingManager, TARGETING_CACHE_KEY};
pub use source::{MemoryTargetSource, TargetSource};
