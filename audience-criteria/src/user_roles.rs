//! Built-in criterion targeting authenticated users by role

use std::collections::HashSet;
use std::sync::Arc;

use audience_core::{CriterionParams, RoleHierarchy, Targetable, Viewer};
use serde_json::Value;
use tracing::warn;

use crate::criterion::TargetCriterion;

/// Role-matching mode for [`UserRolesCriterion`].
pub const MODE_ANY: &str = "ANY";
/// Role-matching mode requiring every configured role.
pub const MODE_ALL: &str = "ALL";

/// Eligible for authenticated viewers holding the configured roles.
///
/// Parameters:
/// - `roles`: list of role names (non-string entries are skipped);
///   uppercased at bind time for case-insensitive comparison.
/// - `mode`: `"ANY"` (default) keeps the record if the viewer holds at
///   least one configured role; `"ALL"` requires every configured role.
///   The comparison is case-sensitive; an unrecognized mode makes the
///   record not eligible rather than failing the evaluation.
/// - `hierarchy`: when `true` (default), the viewer's roles are expanded
///   through the injected [`RoleHierarchy`] before matching.
pub struct UserRolesCriterion {
    roles: Vec<String>,
    mode: String,
    include_hierarchy: bool,
    role_hierarchy: Arc<dyn RoleHierarchy>,
}

impl UserRolesCriterion {
    /// Create an unbound criterion using the given role hierarchy.
    pub fn new(role_hierarchy: Arc<dyn RoleHierarchy>) -> Self {
        Self {
            roles: Vec::new(),
            mode: MODE_ANY.to_string(),
            include_hierarchy: true,
            role_hierarchy,
        }
    }

    fn effective_viewer_roles(&self, viewer: &dyn Viewer) -> HashSet<String> {
        let held = viewer.roles();
        let expanded = if self.include_hierarchy {
            self.role_hierarchy.reachable_roles(&held)
        } else {
            held
        };
        expanded.into_iter().map(|role| role.to_uppercase()).collect()
    }
}

impl TargetCriterion for UserRolesCriterion {
    fn set_parameters(&mut self, parameters: &CriterionParams) {
        self.roles = parameters
            .get("roles")
            .and_then(Value::as_array)
            .map(|roles| {
                roles
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_uppercase)
                    .collect()
            })
            .unwrap_or_default();
        self.mode = parameters
            .get("mode")
            .and_then(Value::as_str)
            .unwrap_or(MODE_ANY)
            .to_string();
        if self.mode != MODE_ANY && self.mode != MODE_ALL {
            warn!(mode = %self.mode, "unsupported role-matching mode, no viewer will be eligible");
        }
        self.include_hierarchy = parameters
            .get("hierarchy")
            .and_then(Value::as_bool)
            .unwrap_or(true);
    }

    fn is_eligible(&self, viewer: Option<&dyn Viewer>, _record: &dyn Targetable) -> bool {
        let Some(viewer) = viewer else {
            return false;
        };

        let viewer_roles = self.effective_viewer_roles(viewer);

        match self.mode.as_str() {
            MODE_ALL => self.roles.iter().all(|role| viewer_roles.contains(role)),
            MODE_ANY => self.roles.iter().any(|role| viewer_roles.contains(role)),
            _ => false,
        }
    }

    fn criterion_name(&self) -> &'static str {
        "user_roles"
    }

    fn criterion_description(&self) -> Option<&'static str> {
        Some("Targets authenticated users based on their roles")
    }
}


#[cfg(test)]
mod prop_tests {
    use super::*;
    use audience_core::FlatRoleHierarchy;
    use proptest::prelude::*;
    use serde_json::json;

    struct PropViewer {
        roles: Vec<String>,
    }

    impl Viewer for PropViewer {
        fn identity(&self) -> Option<&str> {
            Some("prop-user")
        }

        fn roles(&self) -> Vec<String> {
            self.roles.clone()
        }
    }

    struct PropRecord;

    impl Targetable for PropRecord {
        fn criterion_name(&self) -> Option<&str> {
            Some("user_roles")
        }

        fn criterion_params(&self) -> Option<CriterionParams> {
            None
        }
    }

    fn role_name() -> impl Strategy<Value = String> {
        "[a-zA-Z_]{1,12}"
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// ANY-mode eligibility equals case-folded intersection non-emptiness.
        #[test]
        fn prop_any_matches_iff_intersection(
            configured in prop::collection::vec(role_name(), 0..5),
            held in prop::collection::vec(role_name(), 0..5),
        ) {
            let mut criterion = UserRolesCriterion::new(Arc::new(FlatRoleHierarchy));
            let params = json!({ "roles": configured });
            criterion.set_parameters(params.as_object().unwrap());

            let viewer = PropViewer { roles: held.clone() };
            let eligible = criterion.is_eligible(Some(&viewer), &PropRecord);

            let held_upper: std::collections::HashSet<String> =
                held.iter().map(|r| r.to_uppercase()).collect();
            let expected = configured
                .iter()
                .any(|r| held_upper.contains(&r.to_uppercase()));
            prop_assert_eq!(eligible, expected);
        }

        /// Eligibility is unaffected by the casing of held roles.
        #[test]
        fn prop_case_of_held_roles_is_irrelevant(
            configured in prop::collection::vec(role_name(), 1..4),
            held in prop::collection::vec(role_name(), 0..4),
        ) {
            let mut criterion = UserRolesCriterion::new(Arc::new(FlatRoleHierarchy));
            let params = json!({ "roles": configured });
            criterion.set_parameters(params.as_object().unwrap());

            let lower = PropViewer { roles: held.iter().map(|r| r.to_lowercase()).collect() };
            let upper = PropViewer { roles: held.iter().map(|r| r.to_uppercase()).collect() };
            prop_assert_eq!(
                criterion.is_eligible(Some(&lower), &PropRecord),
                criterion.is_eligible(Some(&upper), &PropRecord)
            );
        }
    }
}
