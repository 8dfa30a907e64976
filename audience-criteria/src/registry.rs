//! Criterion registry
//!
//! The complete, statically known set of criteria available to the
//! process. Criteria are registered explicitly at wiring time - a mapping
//! from unique name to constructor - rather than discovered; lookup by
//! name is the only resolution mechanism and unknown names fail loudly at
//! the factory.

use std::collections::HashMap;
use std::sync::Arc;

use audience_core::{CriterionError, RoleHierarchy, TargetingResult};
use serde::Serialize;

use crate::criterion::TargetCriterion;
use crate::guests_only::GuestsOnlyCriterion;
use crate::user_roles::UserRolesCriterion;

type CriterionCtor = Box<dyn Fn() -> Box<dyn TargetCriterion> + Send + Sync>;

struct CriterionRegistration {
    type_name: &'static str,
    description: Option<&'static str>,
    ctor: CriterionCtor,
}

/// Introspection entry for one registered criterion.
///
/// For administrative/UI consumption (e.g. populating a criterion picker);
/// the engine itself never reads this.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CriterionInfo {
    /// Unique criterion name.
    pub name: String,
    /// Implementing Rust type.
    pub type_name: String,
    /// Human-readable description, if the criterion declares one.
    pub description: Option<String>,
}

/// Name-keyed collection of criterion constructors.
///
/// Constructing per use (rather than rebinding one shared instance per
/// record) is what lets the filter pass run without any locking around
/// the bind-then-decide pair.
#[derive(Default)]
pub struct CriterionRegistry {
    entries: HashMap<&'static str, CriterionRegistration>,
}

impl CriterionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the built-in criteria registered.
    pub fn with_builtins(role_hierarchy: Arc<dyn RoleHierarchy>) -> Self {
        let mut registry = Self::new();
        registry
            .register(|| GuestsOnlyCriterion)
            .expect("builtin criterion names are unique");
        registry
            .register(move || UserRolesCriterion::new(role_hierarchy.clone()))
            .expect("builtin criterion names are unique");
        registry
    }

    /// Register a criterion constructor.
    ///
    /// One probe instance is constructed to read the criterion's name and
    /// description. Registering a second criterion under an existing name
    /// fails with [`CriterionError::DuplicateName`]: lookup must stay
    /// unambiguous.
    pub fn register<C, F>(&mut self, ctor: F) -> TargetingResult<()>
    where
        C: TargetCriterion + 'static,
        F: Fn() -> C + Send + Sync + 'static,
    {
        let probe = ctor();
        let name = probe.criterion_name();
        if let Some(existing) = self.entries.get(name) {
            return Err(CriterionError::DuplicateName {
                name: name.to_string(),
                existing: existing.type_name.to_string(),
            }
            .into());
        }
        self.entries.insert(
            name,
            CriterionRegistration {
                type_name: std::any::type_name::<C>(),
                description: probe.criterion_description(),
                ctor: Box::new(move || Box::new(ctor())),
            },
        );
        Ok(())
    }

    /// Construct a fresh, unbound instance of the named criterion.
    pub fn construct(&self, name: &str) -> Option<Box<dyn TargetCriterion>> {
        self.entries.get(name).map(|entry| (entry.ctor)())
    }

    /// Whether a criterion with the given name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Number of registered criteria.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// List every registered criterion, sorted by name.
    pub fn list(&self) -> Vec<CriterionInfo> {
        let mut infos: Vec<CriterionInfo> = self
            .entries
            .iter()
            .map(|(name, entry)| CriterionInfo {
                name: name.to_string(),
                type_name: entry.type_name.to_string(),
                description: entry.description.map(str::to_string),
            })
            .collect();
        infos.sort_by(|a, b| a.name.cmp(&b.name));
        infos
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use audience_core::{CriterionParams, FlatRoleHierarchy, Targetable, TargetingError, Viewer};

    struct Stub;

    impl TargetCriterion for Stub {
        fn set_parameters(&mut self, _parameters: &CriterionParams) {}

        fn is_eligible(&self, _viewer: Option<&dyn Viewer>, _record: &dyn Targetable) -> bool {
            false
        }

        fn criterion_name(&self) -> &'static str {
            "stub"
        }
    }

    struct StubTwin;

    impl TargetCriterion for StubTwin {
        fn set_parameters(&mut self, _parameters: &CriterionParams) {}

        fn is_eligible(&self, _viewer: Option<&dyn Viewer>, _record: &dyn Targetable) -> bool {
            true
        }

        fn criterion_name(&self) -> &'static str {
            "stub"
        }
    }

    #[test]
    fn test_register_and_construct() {
        let mut registry = CriterionRegistry::new();
        registry.register(|| Stub).unwrap();

        assert!(registry.contains("stub"));
        assert_eq!(registry.len(), 1);
        let criterion = registry.construct("stub").unwrap();
        assert_eq!(criterion.criterion_name(), "stub");
    }

    #[test]
    fn test_construct_unknown_returns_none() {
        let registry = CriterionRegistry::new();
        assert!(registry.construct("stub").is_none());
    }

    #[test]
    fn test_duplicate_name_is_rejected() {
        let mut registry = CriterionRegistry::new();
        registry.register(|| Stub).unwrap();

        let result = registry.register(|| StubTwin);
        assert!(matches!(
            result,
            Err(TargetingError::Criterion(CriterionError::DuplicateName { name, .. })) if name == "stub"
        ));
        // The original registration stays in place.
        assert_eq!(registry.len(), 1);
        let criterion = registry.construct("stub").unwrap();
        assert!(!criterion.is_eligible(None, &NoRecord));
    }

    struct NoRecord;

    impl Targetable for NoRecord {
        fn criterion_name(&self) -> Option<&str> {
            None
        }

        fn criterion_params(&self) -> Option<CriterionParams> {
            None
        }
    }

    #[test]
    fn test_with_builtins_registers_both() {
        let registry = CriterionRegistry::with_builtins(Arc::new(FlatRoleHierarchy));
        assert!(registry.contains("guests_only"));
        assert!(registry.contains("user_roles"));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_list_is_sorted_and_complete() {
        let registry = CriterionRegistry::with_builtins(Arc::new(FlatRoleHierarchy));
        let infos = registry.list();

        assert_eq!(infos.len(), 2);
        assert_eq!(infos[0].name, "guests_only");
        assert_eq!(infos[0].description, None);
        assert!(infos[0].type_name.contains("GuestsOnlyCriterion"));
        assert_eq!(infos[1].name, "user_roles");
        assert_eq!(
            infos[1].description.as_deref(),
            Some("Targets authenticated users based on their roles")
        );
        assert!(infos[1].type_name.contains("UserRolesCriterion"));
    }

    #[test]
    fn test_list_serializes() {
        let registry = CriterionRegistry::with_builtins(Arc::new(FlatRoleHierarchy));
        let json = serde_json::to_string(&registry.list()).unwrap();
        assert!(json.contains("guests_only"));
        assert!(json.contains("user_roles"));
    }

    #[test]
    fn test_constructed_instances_are_independent() {
        let registry = CriterionRegistry::with_builtins(Arc::new(FlatRoleHierarchy));
        let mut first = registry.construct("user_roles").unwrap();
        let second = registry.construct("user_roles").unwrap();

        let params = serde_json::json!({ "roles": ["ROLE_ADMIN"] });
        first.set_parameters(params.as_object().unwrap());

        // Binding the first instance must not leak into the second.
        struct Admin;
        impl Viewer for Admin {
            fn identity(&self) -> Option<&str> {
                Some("admin")
            }
            fn roles(&self) -> Vec<String> {
                vec!["ROLE_ADMIN".to_string()]
            }
        }
        assert!(first.is_eligible(Some(&Admin), &NoRecord));
        assert!(!second.is_eligible(Some(&Admin), &NoRecord));
    }
}
