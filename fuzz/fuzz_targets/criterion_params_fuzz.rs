//! Fuzz test for criterion parameter binding
//!
//! This fuzz target feeds arbitrary byte sequences through JSON decoding
//! into the built-in criteria to find:
//! - Panics or crashes in parameter binding
//! - Eligibility decisions that violate the criterion contracts
//!
//! Run with: cargo +nightly fuzz run criterion_params_fuzz -- -max_total_time=60

#![no_main]

use std::sync::Arc;

use audience_core::{CriterionParams, FlatRoleHierarchy, Targetable, Viewer};
use audience_criteria::{GuestsOnlyCriterion, TargetCriterion, UserRolesCriterion};
use libfuzzer_sys::fuzz_target;

struct FuzzRecord;

impl Targetable for FuzzRecord {
    fn criterion_name(&self) -> Option<&str> {
        Some("user_roles")
    }

    fn criterion_params(&self) -> Option<CriterionParams> {
        None
    }
}

struct FuzzViewer;

impl Viewer for FuzzViewer {
    fn identity(&self) -> Option<&str> {
        Some("fuzz")
    }

    fn roles(&self) -> Vec<String> {
        vec!["ROLE_USER".to_string()]
    }
}

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(value) = serde_json::from_str::<serde_json::Value>(input) else {
        return;
    };
    let Some(params) = value.as_object() else {
        return;
    };

    // Binding any parameter bag must never panic, for either builtin.
    let mut roles = UserRolesCriterion::new(Arc::new(FlatRoleHierarchy));
    roles.set_parameters(params);

    let mut guests = GuestsOnlyCriterion;
    guests.set_parameters(params);

    // Contract invariants that hold for every parameter bag:
    // 1. An absent viewer is never eligible for a role-based criterion
    assert!(!roles.is_eligible(None, &FuzzRecord));

    // 2. An absent viewer is always eligible for the guest criterion
    assert!(guests.is_eligible(None, &FuzzRecord));

    // 3. An identified viewer is never eligible for the guest criterion
    assert!(!guests.is_eligible(Some(&FuzzViewer), &FuzzRecord));

    // 4. A present viewer's decision is deterministic for one binding
    let first = roles.is_eligible(Some(&FuzzViewer), &FuzzRecord);
    let second = roles.is_eligible(Some(&FuzzViewer), &FuzzRecord);
    assert_eq!(first, second);
});
