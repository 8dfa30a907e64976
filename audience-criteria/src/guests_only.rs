//! Built-in criterion targeting guests only

use audience_core::{CriterionParams, Targetable, Viewer};

use crate::criterion::TargetCriterion;

/// Eligible only for viewers with no determinable identity.
///
/// An absent viewer is a guest; so is a present viewer whose `identity()`
/// is `None`. Parameters are ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct GuestsOnlyCriterion;

impl TargetCriterion for GuestsOnlyCriterion {
    fn set_parameters(&mut self, _parameters: &CriterionParams) {}

    fn is_eligible(&self, viewer: Option<&dyn Viewer>, _record: &dyn Targetable) -> bool {
        match viewer {
            None => true,
            Some(viewer) => viewer.identity().is_none(),
        }
    }

    fn criterion_name(&self) -> &'static str {
        "guests_only"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestViewer {
        identity: Option<String>,
    }

    impl Viewer for TestViewer {
        fn identity(&self) -> Option<&str> {
            self.identity.as_deref()
        }

        fn roles(&self) -> Vec<String> {
            Vec::new()
        }
    }

    struct TestRecord;

    impl Targetable for TestRecord {
        fn criterion_name(&self) -> Option<&str> {
            Some("guests_only")
        }

        fn criterion_params(&self) -> Option<CriterionParams> {
            None
        }
    }

    #[test]
    fn test_absent_viewer_is_eligible() {
        let criterion = GuestsOnlyCriterion;
        assert!(criterion.is_eligible(None, &TestRecord));
    }

    #[test]
    fn test_identified_viewer_is_not_eligible() {
        let criterion = GuestsOnlyCriterion;
        let viewer = TestViewer {
            identity: Some("alice".to_string()),
        };
        assert!(!criterion.is_eligible(Some(&viewer), &TestRecord));
    }

    #[test]
    fn test_identityless_viewer_is_eligible() {
        let criterion = GuestsOnlyCriterion;
        let viewer = TestViewer { identity: None };
        assert!(criterion.is_eligible(Some(&viewer), &TestRecord));
    }

    #[test]
    fn test_parameters_are_ignored() {
        let mut criterion = GuestsOnlyCriterion;
        let mut params = CriterionParams::new();
        params.insert("roles".to_string(), serde_json::json!(["ROLE_ADMIN"]));
        criterion.set_parameters(&params);
        assert!(criterion.is_eligible(None, &TestRecord));
    }

    #[test]
    fn test_name_and_description() {
        let criterion = GuestsOnlyCriterion;
        assert_eq!(criterion.criterion_name(), "guests_only");
        assert_eq!(criterion.criterion_description(), None);
        assert!(criterion.supports("guests_only"));
        assert!(!criterion.supports("user_roles"));
    }
}
