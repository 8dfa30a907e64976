//! Record-side contracts for targeting
//!
//! Records live in the host application; the engine only sees them through
//! the [`Targetable`] capability. A record names the criterion that gates
//! it and carries an opaque parameter bag for that criterion.

use serde_json::{Map, Value};

/// Opaque parameter bag bound to a criterion for one evaluation.
///
/// Stored however the host application likes (columns, a JSON blob); the
/// engine only requires that it decodes to a string-keyed map.
pub type CriterionParams = Map<String, Value>;

/// Query parameters forwarded verbatim to the record source.
///
/// The engine imposes no schema on these; they discriminate cache entries
/// and are otherwise passed through unmodified.
pub type QueryParams = Map<String, Value>;

/// Capability implemented by any record that can be targeted.
///
/// A record with no criterion name (or an empty one) is open: it is
/// eligible for every viewer. A record with a criterion name is gated by
/// that criterion, which must be known to the registry at evaluation time.
pub trait Targetable: Send + Sync {
    /// Name of the criterion gating this record, if any.
    fn criterion_name(&self) -> Option<&str>;

    /// Parameters for the gating criterion, if any.
    ///
    /// Returned by value so implementations backed by an encoded blob can
    /// decode per call.
    fn criterion_params(&self) -> Option<CriterionParams>;
}

/// Returns the effective criterion name of a record, treating an empty
/// string the same as an absent name.
pub fn effective_criterion_name(record: &dyn Targetable) -> Option<&str> {
    record.criterion_name().filter(|name| !name.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Plain {
        name: Option<String>,
    }

    impl Targetable for Plain {
        fn criterion_name(&self) -> Option<&str> {
            self.name.as_deref()
        }

        fn criterion_params(&self) -> Option<CriterionParams> {
            None
        }
    }

    #[test]
    fn test_effective_name_absent() {
        let record = Plain { name: None };
        assert_eq!(effective_criterion_name(&record), None);
    }

    #[test]
    fn test_effective_name_empty_is_absent() {
        let record = Plain {
            name: Some(String::new()),
        };
        assert_eq!(effective_criterion_name(&record), None);
    }

    #[test]
    fn test_effective_name_set() {
        let record = Plain {
            name: Some("guests_only".to_string()),
        };
        assert_eq!(effective_criterion_name(&record), Some("guests_only"));
    }
}
