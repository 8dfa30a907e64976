//! AUDIENCE Core - Targeting Contracts
//!
//! Capability traits and shared types for the AUDIENCE targeting engine.
//! All other crates depend on this. This crate contains only contracts -
//! no criterion logic, no orchestration.

pub mod config;
pub mod error;
pub mod record;
pub mod viewer;

pub use config::{TargetingConfig, DEFAULT_CACHE_EXPIRATION};
pub use error::{
    CacheError, ConfigError, CriterionError, SourceError, TargetingError, TargetingResult,
};
pub use record::{effective_criterion_name, CriterionParams, QueryParams, Targetable};
pub use viewer::{FlatRoleHierarchy, RoleHierarchy, Viewer};
