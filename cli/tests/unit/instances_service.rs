//! Tests for the `instances` application service: listing, lookup, and
//! termination only ever touch prefixed instances.

#![allow(clippy::expect_used)]

use cjob_cli::application::services::instances::{
    find, find_by_id, list_managed, pause_job, status, stop_all, stop_job,
};
use cjob_common::{InstanceState, NameError};

use crate::helpers::instance;
use crate::mocks::FakeProvider;

fn mixed_region() -> FakeProvider {
    FakeProvider::new()
        .with_instance(instance("i-1", Some("cjob-train"), InstanceState::Running, 2))
        .with_instance(instance("i-2", Some("cjob-eval"), InstanceState::Stopped, 30))
        .with_instance(instance("i-3", Some("web-prod"), InstanceState::Running, 900))
        .with_instance(instance("i-4", None, InstanceState::Running, 1))
        .with_instance(instance("i-5", Some("cjob-old"), InstanceState::Terminated, 50))
}

// ── Listing ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn list_managed_keeps_only_live_prefixed_instances() {
    let provider = mixed_region();
    let ids: Vec<String> = list_managed(&provider)
        .await
        .expect("list")
        .iter()
        .map(|i| i.id().to_string())
        .collect();
    assert_eq!(ids, ["i-1", "i-2"]);
}

#[tokio::test]
async fn status_reports_duplicate_names() {
    let provider = mixed_region().with_instance(instance(
        "i-6",
        Some("cjob-train"),
        InstanceState::Pending,
        0,
    ));
    let (instances, duplicates) = status(&provider).await.expect("status");
    assert_eq!(instances.len(), 3);
    assert_eq!(duplicates, ["cjob-train"]);
}

// ── Lookup ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn find_returns_none_for_unknown_job() {
    let provider = mixed_region();
    assert!(find(&provider, "cjob-missing").await.expect("find").is_none());
}

#[tokio::test]
async fn find_never_matches_unmanaged_names() {
    let provider = mixed_region();
    assert!(find(&provider, "web-prod").await.expect("find").is_none());
}

#[tokio::test]
async fn find_picks_first_of_duplicates() {
    let provider = mixed_region().with_instance(instance(
        "i-6",
        Some("cjob-train"),
        InstanceState::Pending,
        0,
    ));
    let found = find(&provider, "cjob-train").await.expect("find").expect("some");
    assert_eq!(found.id(), "i-1");
}

// ── Termination ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn stop_job_terminates_only_the_named_job() {
    let provider = mixed_region();
    let stopped = stop_job(&provider, "cjob-train").await.expect("stop");

    assert_eq!(stopped, ["i-1"]);
    assert_eq!(provider.state_of("i-1"), Some(InstanceState::Terminated));
    assert_eq!(provider.state_of("i-2"), Some(InstanceState::Stopped));
    assert_eq!(provider.state_of("i-3"), Some(InstanceState::Running));
}

#[tokio::test]
async fn stop_job_on_missing_job_issues_no_write() {
    let provider = mixed_region();
    let stopped = stop_job(&provider, "cjob-missing").await.expect("stop");
    assert!(stopped.is_empty());
    assert!(provider.writes().is_empty());
}

#[tokio::test]
async fn stop_job_rejects_unprefixed_name_before_listing() {
    let provider = mixed_region();
    let err = stop_job(&provider, "web-prod").await.expect_err("rejected");
    assert!(matches!(
        err.downcast_ref::<NameError>(),
        Some(NameError::MissingPrefix(_))
    ));
    assert!(provider.calls().is_empty());
}

#[tokio::test]
async fn stop_job_terminates_every_duplicate_in_one_request() {
    let provider = mixed_region().with_instance(instance(
        "i-6",
        Some("cjob-train"),
        InstanceState::Pending,
        0,
    ));
    stop_job(&provider, "cjob-train").await.expect("stop");
    assert_eq!(provider.writes(), ["terminate:i-1,i-6"]);
}

#[tokio::test]
async fn find_by_id_ignores_name_duplicates() {
    let provider = mixed_region().with_instance(instance(
        "i-6",
        Some("cjob-train"),
        InstanceState::Running,
        0,
    ));
    let found = find_by_id(&provider, "i-6").await.expect("find").expect("present");
    assert_eq!(found.id(), "i-6");
    assert!(find_by_id(&provider, "i-3").await.expect("find").is_none());
}

// ── Stop and keep ────────────────────────────────────────────────────────────

#[tokio::test]
async fn pause_job_stops_without_terminating() {
    let provider = mixed_region();
    let stopped = pause_job(&provider, "cjob-train").await.expect("pause");

    assert_eq!(stopped, ["i-1"]);
    assert_eq!(provider.writes(), ["stop:i-1"]);
    assert_eq!(provider.state_of("i-1"), Some(InstanceState::Stopped));
}

#[tokio::test]
async fn pause_job_skips_already_stopped_instances() {
    let provider = mixed_region();
    let stopped = pause_job(&provider, "cjob-eval").await.expect("pause");
    assert!(stopped.is_empty());
    assert!(provider.writes().is_empty());
}

#[tokio::test]
async fn pause_job_rejects_unprefixed_name() {
    let provider = mixed_region();
    let err = pause_job(&provider, "web-prod").await.expect_err("rejected");
    assert!(matches!(
        err.downcast_ref::<NameError>(),
        Some(NameError::MissingPrefix(_))
    ));
    assert_eq!(provider.state_of("i-3"), Some(InstanceState::Running));
}

#[tokio::test]
async fn stop_all_never_touches_unmanaged_instances() {
    let provider = mixed_region();
    let stopped = stop_all(&provider).await.expect("stop all");

    assert_eq!(stopped.len(), 2);
    assert_eq!(provider.writes(), ["terminate:i-1", "terminate:i-2"]);
    assert_eq!(provider.state_of("i-3"), Some(InstanceState::Running));
    assert_eq!(provider.state_of("i-4"), Some(InstanceState::Running));
}

#[tokio::test]
async fn stop_all_on_empty_region_is_a_no_op() {
    let provider = FakeProvider::new();
    assert!(stop_all(&provider).await.expect("stop all").is_empty());
    assert!(provider.writes().is_empty());
}

#[tokio::test]
async fn stop_job_surfaces_provider_failure() {
    let provider = mixed_region().failing_terminate();
    let err = stop_job(&provider, "cjob-train").await.expect_err("fails");
    assert!(format!("{err:#}").contains("UnauthorizedOperation"));
}
