//! Tests for lookup-method selection

use super::*;
use crate::codec::KeyFields;
use test_case::test_case;

// ============================================================================
// select_method
// ============================================================================

#[test]
fn test_select_id_over_listing() {
    let listing = vec![false, false];
    let by_id = vec![true];
    assert_eq!(select_method(&[listing, by_id]), 1);
}

#[test_case(&[&[false, false], &[false]], 0 ; "all false falls back to default")]
#[test_case(&[&[false], &[true], &[true]], 1 ; "earlier candidate wins")]
#[test_case(&[&[false], &[false], &[true]], 2 ; "only last is true")]
#[test_case(&[&[], &[false, true]], 1 ; "any true entry counts")]
#[test_case(&[&[true], &[true]], 0 ; "default wins when it has input")]
fn test_select_method(candidates: &[&[bool]], expected: usize) {
    assert_eq!(select_method(candidates), expected);
}

#[test]
fn test_select_method_empty() {
    let candidates: [Vec<bool>; 0] = [];
    assert_eq!(select_method(&candidates), 0);
}

#[test]
fn test_select_method_is_deterministic() {
    let candidates = [vec![false], vec![true, false], vec![true]];
    let first = select_method(&candidates);
    for _ in 0..10 {
        assert_eq!(select_method(&candidates), first);
    }
}

// ============================================================================
// LookupPlan
// ============================================================================

fn id_name_plan() -> LookupPlan {
    LookupPlan::new(
        vec![LookupMethod::List, LookupMethod::ById, LookupMethod::ByName],
        Vec::new(),
    )
}

#[test]
fn test_plan_prefers_id_over_name() {
    let keys = KeyFields::new().with("id", "abc").with("name", "Guest1");
    assert_eq!(id_name_plan().choose(&keys), LookupMethod::ById);
}

#[test]
fn test_plan_name_only() {
    let keys = KeyFields::new().with("id", "").with("name", "Guest1");
    assert_eq!(id_name_plan().choose(&keys), LookupMethod::ByName);
}

#[test]
fn test_plan_nothing_supplied_lists() {
    assert_eq!(id_name_plan().choose(&KeyFields::new()), LookupMethod::List);
    let blank = KeyFields::new().with("id", "").with("name", "");
    assert_eq!(id_name_plan().choose(&blank), LookupMethod::List);
}

#[test]
fn test_plan_without_name_lookup_lists_by_name() {
    let plan = LookupPlan::new(vec![LookupMethod::List, LookupMethod::ById], Vec::new());
    let keys = KeyFields::new().with("name", "SponsorA");
    assert_eq!(plan.choose(&keys), LookupMethod::List);
}

#[test]
fn test_plan_compound_key_needs_every_part() {
    let plan = LookupPlan::new(
        vec![LookupMethod::List, LookupMethod::ById, LookupMethod::ByCompoundKey],
        vec!["host_name".to_string(), "nad_ip".to_string()],
    );

    let partial = KeyFields::new().with("host_name", "ise-01");
    assert_eq!(plan.choose(&partial), LookupMethod::List);

    let full = partial.with("nad_ip", "10.0.0.1");
    assert_eq!(plan.choose(&full), LookupMethod::ByCompoundKey);

    let with_id = full.with("id", "x");
    assert_eq!(plan.choose(&with_id), LookupMethod::ById);
}

#[test]
fn test_plan_empty_defaults_to_list() {
    let plan = LookupPlan::new(Vec::new(), Vec::new());
    assert_eq!(plan.choose(&KeyFields::new().with("id", "1")), LookupMethod::List);
}

#[test]
fn test_lookup_method_display() {
    assert_eq!(LookupMethod::ByCompoundKey.to_string(), "by_compound_key");
    assert_eq!(LookupMethod::List.to_string(), "list");
}
