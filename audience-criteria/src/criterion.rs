//! The criterion capability
//!
//! A criterion is a named strategy deciding whether a viewer may see a
//! record. Instances are constructed fresh by the factory for every
//! evaluation, so a bound parameter set never outlives the record it was
//! bound for.

use audience_core::{CriterionParams, Targetable, Viewer};

/// A named eligibility strategy.
///
/// Implementations must be pure in `is_eligible`: no side effects, no
/// mutation of the viewer or the record. Parameter binding happens once,
/// immediately after construction, via `set_parameters`; a later rebind
/// must fully overwrite the previous one.
pub trait TargetCriterion: Send + Sync {
    /// Bind the parameters for the upcoming evaluation.
    ///
    /// Implementations must not keep residual state from a prior binding
    /// once overwritten.
    fn set_parameters(&mut self, parameters: &CriterionParams);

    /// Decide eligibility for a (viewer, record) pair.
    fn is_eligible(&self, viewer: Option<&dyn Viewer>, record: &dyn Targetable) -> bool;

    /// Whether this criterion answers to the given name.
    fn supports(&self, name: &str) -> bool {
        name == self.criterion_name()
    }

    /// Stable name, unique across the registry.
    fn criterion_name(&self) -> &'static str;

    /// Human-readable description, for introspection and listings only.
    fn criterion_description(&self) -> Option<&'static str> {
        None
    }
}
