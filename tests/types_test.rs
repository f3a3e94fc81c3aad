use serde_json::json;
use truenas_provider::truenas::types::*;

#[test]
fn test_deserialize_pool() {
    let json = json!({
        "id": 1,
        "name": "tank",
        "guid": "1234567890",
        "path": "/mnt/tank",
        "status": "ONLINE",
        "healthy": true,
        "size": 1000,
        "allocated": 400,
        "free": 600,
        "topology": {"data": [], "log": [], "cache": [], "spare": []}
    });

    let pool: Pool = serde_json::from_value(json).expect("Failed to parse Pool");
    assert_eq!(pool.id, 1);
    assert_eq!(pool.name, "tank");
    assert_eq!(pool.path, "/mnt/tank");
    assert_eq!(pool.allocated, 400);
    assert_eq!(pool.free, 600);
}

#[test]
fn test_deserialize_pool_without_capacity() {
    let json = json!({"id": 3, "name": "offline", "status": "OFFLINE"});

    let pool: Pool = serde_json::from_value(json).expect("Failed to parse Pool");
    assert_eq!(pool.size, 0);
    assert!(!pool.healthy);
}

#[test]
fn test_deserialize_dataset() {
    let json = json!({
        "id": "tank/data",
        "name": "tank/data",
        "pool": "tank",
        "mountpoint": null,
        "compression": {"value": "LZ4", "rawvalue": "lz4", "parsed": "lz4"},
        "used": {"parsed": 1024},
        "available": {"parsed": 2048},
        "encrypted": false
    });

    let dataset: Dataset = serde_json::from_value(json).expect("Failed to parse Dataset");
    assert_eq!(dataset.mountpoint, "");
    assert_eq!(dataset.compression(), "lz4");
    assert_eq!(dataset.used_bytes(), 1024);
    assert_eq!(dataset.available_bytes(), 2048);
}

#[test]
fn test_deserialize_credential_provider_forms() {
    // Older releases: bare tag
    let legacy: CloudSyncCredential = serde_json::from_value(json!({
        "id": 1,
        "name": "backup",
        "provider": "S3",
        "attributes": {"access_key_id": "AKIA"}
    }))
    .expect("Failed to parse legacy credential");

    // 25.x: tagged object
    let current: CloudSyncCredential = serde_json::from_value(json!({
        "id": 2,
        "name": "b2",
        "provider": {"type": "B2", "account": "x", "key": "y"}
    }))
    .expect("Failed to parse credential");

    assert_eq!(legacy.provider.tag(), "S3");
    assert_eq!(current.provider.tag(), "B2");
}

#[test]
fn test_deserialize_snapshot_user_refs() {
    let json = json!({
        "id": "tank/data@auto",
        "name": "tank/data@auto",
        "snapshot_name": "auto",
        "dataset": "tank/data",
        "properties": {
            "used": {"parsed": 10},
            "referenced": {"parsed": 20},
            "userrefs": {"parsed": 2}
        }
    });

    let snapshot: Snapshot = serde_json::from_value(json).expect("Failed to parse Snapshot");
    assert_eq!(snapshot.used_bytes(), 10);
    assert_eq!(snapshot.referenced_bytes(), 20);
    assert_eq!(snapshot.user_refs(), 2);
    assert!(snapshot.holds.is_empty());
}

#[test]
fn test_jsonrpc_error_message() {
    let response: JsonRpcResponse = serde_json::from_value(json!({
        "id": "7",
        "msg": "result",
        "error": {"error": 13, "errname": "ENOTAUTHENTICATED", "reason": "Not authenticated"}
    }))
    .unwrap();

    assert_eq!(
        response.error.unwrap().message(),
        "[ENOTAUTHENTICATED] Not authenticated"
    );
}
