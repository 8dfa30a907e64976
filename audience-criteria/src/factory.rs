//! Criteria factory
//!
//! Resolves a criterion name to a live, parameter-bound instance. Every
//! call constructs a fresh instance from the registry, so concurrent
//! evaluations of different records never share bound state.

use std::sync::Arc;

use audience_core::{CriterionError, CriterionParams, TargetingResult};

use crate::criterion::TargetCriterion;
use crate::registry::CriterionRegistry;

/// Factory producing parameter-bound criterion instances.
#[derive(Clone)]
pub struct CriterionFactory {
    registry: Arc<CriterionRegistry>,
}

impl CriterionFactory {
    /// Create a factory over the given registry.
    pub fn new(registry: Arc<CriterionRegistry>) -> Self {
        Self { registry }
    }

    /// The registry this factory resolves against.
    pub fn registry(&self) -> &CriterionRegistry {
        &self.registry
    }

    /// Construct the named criterion and bind the given parameters.
    ///
    /// Fails with [`CriterionError::Unrecognized`] if no registered
    /// criterion carries the name; the error names the offender so record
    /// data can be fixed.
    pub fn create(
        &self,
        name: &str,
        parameters: &CriterionParams,
    ) -> TargetingResult<Box<dyn TargetCriterion>> {
        let mut criterion =
            self.registry
                .construct(name)
                .ok_or_else(|| CriterionError::Unrecognized {
                    name: name.to_string(),
                })?;
        criterion.set_parameters(parameters);
        Ok(criterion)
    }
}
