//! Tests for detail resolution

use super::*;
use crate::resource::mock::{Calls, MockApi};

fn listing() -> Vec<SummaryRecord> {
    vec![
        SummaryRecord::new("1", "Guest1"),
        SummaryRecord::new("2", "Guest2"),
        SummaryRecord::new("3", "Guest2"),
    ]
}

fn api() -> MockApi {
    MockApi::id_name()
        .with_named("1", "Guest1")
        .with_named("2", "Guest2")
        .with_named("3", "Guest2")
}

#[tokio::test]
async fn test_resolve_by_name_fetches_first_match_only() {
    let api = api();
    let resolution = DetailResolver::new(&api)
        .resolve(&listing(), &LookupTarget::new("", "Guest2"))
        .await;

    let record = resolution.into_option().unwrap();
    assert_eq!(record.id(), Some("2"));
    assert_eq!(record.field_string("description").as_deref(), Some("Guest2 detail"));
    assert_eq!(Calls::get(&api.calls.fetch_by_id), 1);
}

#[tokio::test]
async fn test_resolve_id_wins_over_name() {
    let api = api();
    let resolution = DetailResolver::new(&api)
        .resolve(&listing(), &LookupTarget::new("3", "Guest1"))
        .await;

    assert_eq!(resolution.into_option().unwrap().id(), Some("3"));
}

#[tokio::test]
async fn test_resolve_no_match_makes_no_fetch() {
    let api = api();
    let resolution = DetailResolver::new(&api)
        .resolve(&listing(), &LookupTarget::new("", "SponsorA"))
        .await;

    assert!(matches!(resolution, Resolution::NotFound));
    assert_eq!(Calls::get(&api.calls.fetch_by_id), 0);
}

#[tokio::test]
async fn test_resolve_empty_target_matches_nothing() {
    let api = api();
    let target = LookupTarget::default();
    assert!(target.is_empty());

    let resolution = DetailResolver::new(&api).resolve(&listing(), &target).await;
    assert!(!resolution.is_found());
    assert_eq!(Calls::get(&api.calls.fetch_by_id), 0);
}

#[tokio::test]
async fn test_resolve_vanished_detail_is_not_found() {
    // listed but no longer fetchable
    let api = MockApi::id_name();
    let resolution = DetailResolver::new(&api)
        .resolve(&listing(), &LookupTarget::new("1", ""))
        .await;

    assert!(matches!(resolution, Resolution::NotFound));
    assert_eq!(Calls::get(&api.calls.fetch_by_id), 1);
}

#[tokio::test]
async fn test_resolve_transport_failure_is_unavailable() {
    let mut api = api();
    api.fail_fetch_by_id = true;

    let resolution = DetailResolver::new(&api)
        .resolve(&listing(), &LookupTarget::new("1", ""))
        .await;

    assert!(matches!(resolution, Resolution::Unavailable(_)));
    assert!(resolution.into_option().is_none());
}

#[test]
fn test_lookup_target_from_keys() {
    let keys = KeyFields::new().with("id", "").with("name", "Guest1");
    let target = LookupTarget::from_keys(&keys);
    assert_eq!(target, LookupTarget::new("", "Guest1"));
    assert!(target.matches(&SummaryRecord::new("9", "Guest1")));
    assert!(!target.matches(&SummaryRecord::new("9", "guest1")));
}
