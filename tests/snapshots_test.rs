//! Snapshots data source tests

use serde_json::{json, Value};
use std::sync::Arc;
use truenas_provider::datasources::SnapshotsDataSource;
use truenas_provider::error::ProviderError;
use truenas_provider::framework::{ConfigureRequest, DataSource, DiagnosticKind, ReadRequest};
use truenas_provider::services::mock::{MockServices, MockSnapshotService};
use truenas_provider::truenas::types::Snapshot;

fn data_source(mocks: &MockServices) -> SnapshotsDataSource {
    let mut ds = SnapshotsDataSource::new();
    assert!(ds
        .configure(ConfigureRequest::new(Arc::new(mocks.registry())))
        .is_empty());
    ds
}

fn with_snapshots(snapshots: Vec<Snapshot>) -> MockServices {
    MockServices::new()
        .with_snapshot(MockSnapshotService::new().with_snapshots(move || Ok(snapshots.clone())))
}

fn names(state: &Value) -> Vec<String> {
    state["snapshots"]
        .as_array()
        .expect("snapshots list")
        .iter()
        .map(|s| s["id"].as_str().unwrap().to_string())
        .collect()
}

fn tree() -> Vec<Snapshot> {
    vec![
        Snapshot::new("tank/data", "daily-1"),
        Snapshot::new("tank/data/child", "daily-1"),
        Snapshot::new("tank/other", "daily-1"),
        Snapshot::new("tank/datasets", "daily-1"),
    ]
}

#[tokio::test]
async fn test_recursive_excludes_sibling() {
    // Given: Snapshots on a dataset, its child, and unrelated siblings
    let mocks = with_snapshots(tree());
    let ds = data_source(&mocks);

    // When: Listing recursively
    let response = ds
        .read(ReadRequest::new(
            json!({"dataset_id": "tank/data", "recursive": true}),
        ))
        .await;

    // Then: Only the dataset and its descendant are included
    assert!(response.diagnostics.is_empty());
    assert_eq!(
        names(&response.state.unwrap()),
        vec!["tank/data@daily-1", "tank/data/child@daily-1"]
    );
}

#[tokio::test]
async fn test_non_recursive_is_exact() {
    let mocks = with_snapshots(tree());
    let ds = data_source(&mocks);

    let response = ds
        .read(ReadRequest::new(json!({"dataset_id": "tank/data"})))
        .await;

    assert_eq!(names(&response.state.unwrap()), vec!["tank/data@daily-1"]);
}

#[tokio::test]
async fn test_explicit_false_recursive_is_exact() {
    let mocks = with_snapshots(tree());
    let ds = data_source(&mocks);

    let response = ds
        .read(ReadRequest::new(
            json!({"dataset_id": "tank/data", "recursive": false}),
        ))
        .await;

    assert_eq!(names(&response.state.unwrap()), vec!["tank/data@daily-1"]);
}

#[tokio::test]
async fn test_glob_pattern() {
    // Given: Snapshots with upgrade-related names
    let mocks = with_snapshots(vec![
        Snapshot::new("tank/data", "pre-upgrade-1"),
        Snapshot::new("tank/data", "post-upgrade"),
        Snapshot::new("tank/data", "pre-upgrade-2"),
    ]);
    let ds = data_source(&mocks);

    // When: Filtering with pre-*
    let response = ds
        .read(ReadRequest::new(
            json!({"dataset_id": "tank/data", "name_pattern": "pre-*"}),
        ))
        .await;

    // Then: Matching snapshots are kept, in API order
    let state = response.state.unwrap();
    let kept: Vec<&str> = state["snapshots"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap())
        .collect();
    assert_eq!(kept, vec!["pre-upgrade-1", "pre-upgrade-2"]);
}

#[tokio::test]
async fn test_repeated_stars_match_like_one() {
    // Given: Two upgrade snapshots and one unrelated snapshot
    let mocks = with_snapshots(vec![
        Snapshot::new("tank/data", "pre-upgrade-1"),
        Snapshot::new("tank/data", "post"),
        Snapshot::new("tank/data", "pre-upgrade-2"),
    ]);
    let ds = data_source(&mocks);

    for pattern in ["pre-**", "pre***", "pre-*"] {
        // When: Filtering with a pattern that repeats the wildcard
        let response = ds
            .read(ReadRequest::new(
                json!({"dataset_id": "tank/data", "name_pattern": pattern}),
            ))
            .await;

        // Then: It matches exactly like a single star
        assert!(response.diagnostics.is_empty(), "{}: {:?}", pattern, response.diagnostics);
        assert_eq!(
            names(&response.state.unwrap()),
            vec!["tank/data@pre-upgrade-1", "tank/data@pre-upgrade-2"],
            "{}",
            pattern
        );
    }
}

#[tokio::test]
async fn test_leading_double_star() {
    let mocks = with_snapshots(vec![
        Snapshot::new("tank/data", "pre-upgrade-1"),
        Snapshot::new("tank/data", "post"),
    ]);
    let ds = data_source(&mocks);

    let response = ds
        .read(ReadRequest::new(
            json!({"dataset_id": "tank/data", "name_pattern": "**-1"}),
        ))
        .await;

    assert_eq!(names(&response.state.unwrap()), vec!["tank/data@pre-upgrade-1"]);
}

#[tokio::test]
async fn test_pattern_applies_after_scope() {
    let mocks = with_snapshots(vec![
        Snapshot::new("tank/data", "auto-1"),
        Snapshot::new("tank/data/child", "auto-2"),
        Snapshot::new("tank/data/child", "manual"),
        Snapshot::new("tank/other", "auto-3"),
    ]);
    let ds = data_source(&mocks);

    let response = ds
        .read(ReadRequest::new(json!({
            "dataset_id": "tank/data",
            "recursive": true,
            "name_pattern": "auto-?"
        })))
        .await;

    assert_eq!(
        names(&response.state.unwrap()),
        vec!["tank/data@auto-1", "tank/data/child@auto-2"]
    );
}

#[tokio::test]
async fn test_invalid_pattern_is_user_error() {
    // Given: A malformed glob
    let mocks = with_snapshots(tree());
    let ds = data_source(&mocks);

    // When: Reading with it
    let response = ds
        .read(ReadRequest::new(
            json!({"dataset_id": "tank/data", "name_pattern": "[oops"}),
        ))
        .await;

    // Then: InvalidPattern, no state, no upstream call
    assert!(response.state.is_none());
    assert_eq!(
        response.diagnostics.kinds(),
        vec![DiagnosticKind::InvalidPattern]
    );
    assert_eq!(mocks.snapshot.calls(), 0);
}

#[tokio::test]
async fn test_empty_result_is_success() {
    // Given: No snapshots for the dataset
    let mocks = with_snapshots(tree());
    let ds = data_source(&mocks);

    // When: Listing a dataset without snapshots
    let response = ds
        .read(ReadRequest::new(json!({"dataset_id": "pool2/empty"})))
        .await;

    // Then: A zero-length list is written
    assert!(response.diagnostics.is_empty());
    let state = response.state.unwrap();
    assert_eq!(state["snapshots"], json!([]));
    assert_eq!(state["dataset_id"], "pool2/empty");
    assert!(state["recursive"].is_null());
    assert!(state["name_pattern"].is_null());
}

#[tokio::test]
async fn test_snapshot_record_projection() {
    // Given: A snapshot with properties and a user hold
    let raw = json!({
        "id": "tank/data@keep",
        "name": "tank/data@keep",
        "snapshot_name": "keep",
        "dataset": "tank/data",
        "properties": {
            "used": {"value": "1M", "rawvalue": "1048576", "parsed": 1048576},
            "referenced": {"value": "2M", "rawvalue": "2097152", "parsed": 2097152},
            "userrefs": {"value": "1", "rawvalue": "1", "parsed": "1"}
        },
        "holds": {"replication": 1700000000}
    });
    let snapshot: Snapshot = serde_json::from_value(raw).unwrap();
    let mocks = with_snapshots(vec![snapshot]);
    let ds = data_source(&mocks);

    // When: Listing
    let response = ds
        .read(ReadRequest::new(json!({"dataset_id": "tank/data"})))
        .await;

    // Then: The record carries every field
    assert_eq!(
        response.state.unwrap()["snapshots"][0],
        json!({
            "id": "tank/data@keep",
            "name": "keep",
            "dataset_id": "tank/data",
            "used_bytes": 1048576,
            "referenced_bytes": 2097152,
            "hold": true
        })
    );
}

#[tokio::test]
async fn test_configured_snapshots_list_rejected() {
    let mocks = with_snapshots(tree());
    let ds = data_source(&mocks);

    let response = ds
        .read(ReadRequest::new(
            json!({"dataset_id": "tank/data", "snapshots": []}),
        ))
        .await;

    assert_eq!(
        response.diagnostics.kinds(),
        vec![DiagnosticKind::ConfigDecodeError]
    );
    assert_eq!(mocks.snapshot.calls(), 0);
}

#[tokio::test]
async fn test_upstream_failure() {
    let mocks = MockServices::new().with_snapshot(
        MockSnapshotService::new()
            .with_snapshots(|| Err(ProviderError::TrueNasApi("boom".to_string()))),
    );
    let ds = data_source(&mocks);

    let response = ds
        .read(ReadRequest::new(json!({"dataset_id": "tank/data"})))
        .await;

    assert!(response.state.is_none());
    assert_eq!(response.diagnostics.kinds(), vec![DiagnosticKind::UpstreamError]);
}
