//! AUDIENCE Criteria - Targeting Strategies
//!
//! The criterion capability trait, the built-in criterion implementations,
//! and the registry/factory pair that resolves a criterion name to a
//! fresh, parameter-bound instance.

pub mod criterion;
pub mod factory;
pub mod guests_only;
pub mod registry;
pub mod user_roles;

pub use criterion::TargetCriterion;
pub use factory::CriterionFactory;
pub use guests_only::GuestsOnlyCriterion;
pub use registry::{CriterionInfo, CriterionRegistry};
pub use user_roles::{UserRolesCriterion, MODE_ALL, MODE_ANY};
