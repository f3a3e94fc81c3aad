//! TrueNAS API Type Definitions
//!
//! Serde records for the TrueNAS Scale API responses the data sources consume.
//!
//! # Design Notes
//!
//! - **Optional Fields**: The API omits or nulls many fields depending on version;
//!   `#[serde(default)]` keeps deserialization tolerant.
//! - **ZFS Properties**: Dataset and snapshot properties arrive wrapped as
//!   `{"value": ..., "rawvalue": ..., "parsed": ...}`; only `parsed` is kept.
//!
//! # API Endpoints Covered
//!
//! - `pool.query` → [`Pool`]
//! - `pool.dataset.query` → [`Dataset`]
//! - `cloudsync.credentials.query` → [`CloudSyncCredential`]
//! - `virt.global.config` → [`VirtGlobalConfig`]
//! - `pool.snapshot.query` → [`Snapshot`]
//!
//! # JSON-RPC Protocol
//!
//! - [`JsonRpcRequest`] - Outgoing method calls
//! - [`JsonRpcResponse`] - Incoming responses
//! - [`DdpConnect`] - Initial handshake message

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// JSON-RPC 2.0 request
#[derive(Debug, Serialize)]
pub struct JsonRpcRequest {
    pub id: String,
    pub msg: String,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 response
#[derive(Debug, Deserialize)]
pub struct JsonRpcResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default)]
    pub result: Option<serde_json::Value>,
    #[serde(default)]
    pub error: Option<JsonRpcError>,
}

#[derive(Debug, Deserialize)]
pub struct JsonRpcError {
    #[serde(default)]
    pub error: Option<i32>,
    #[serde(default)]
    pub errname: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
}

impl JsonRpcError {
    pub fn message(&self) -> String {
        match (&self.errname, &self.reason) {
            (Some(name), Some(reason)) => format!("[{}] {}", name, reason),
            (None, Some(reason)) => reason.clone(),
            (Some(name), None) => name.clone(),
            (None, None) => "Unknown error".to_string(),
        }
    }
}

/// DDP Connect message
#[derive(Debug, Serialize)]
pub struct DdpConnect {
    pub msg: String,
    pub version: String,
    pub support: Vec<String>,
}

impl Default for DdpConnect {
    fn default() -> Self {
        Self {
            msg: "connect".to_string(),
            version: "1".to_string(),
            support: vec!["1".to_string()],
        }
    }
}

/// Pool information from pool.query
#[derive(Debug, Clone, Deserialize)]
pub struct Pool {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub path: String,
    pub status: String,
    #[serde(default)]
    pub healthy: bool,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub allocated: u64,
    #[serde(default)]
    pub free: u64,
}

/// Dataset information from pool.dataset.query
#[derive(Debug, Clone, Deserialize)]
pub struct Dataset {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub pool: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub mountpoint: String,
    #[serde(default)]
    pub compression: Option<DatasetValue<String>>,
    #[serde(default)]
    pub used: Option<DatasetValue<u64>>,
    #[serde(default)]
    pub available: Option<DatasetValue<u64>>,
}

impl Dataset {
    pub fn compression(&self) -> &str {
        self.compression
            .as_ref()
            .map(|c| c.parsed.as_str())
            .unwrap_or_default()
    }

    pub fn used_bytes(&self) -> u64 {
        self.used.as_ref().map(|v| v.parsed).unwrap_or_default()
    }

    pub fn available_bytes(&self) -> u64 {
        self.available.as_ref().map(|v| v.parsed).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatasetValue<T> {
    pub parsed: T,
}

impl<T> DatasetValue<T> {
    pub fn new(parsed: T) -> Self {
        Self { parsed }
    }
}

/// Cloud credential from cloudsync.credentials.query
#[derive(Debug, Clone, Deserialize)]
pub struct CloudSyncCredential {
    pub id: u64,
    pub name: String,
    pub provider: CredentialProvider,
}

/// Provider of a cloud credential
///
/// Older releases send the bare tag (`"S3"`), 25.x sends an object carrying
/// the tag under `type` alongside the provider's attributes.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CredentialProvider {
    Tag(String),
    Object {
        #[serde(rename = "type")]
        kind: String,
    },
}

impl CredentialProvider {
    pub fn tag(&self) -> &str {
        match self {
            Self::Tag(tag) => tag,
            Self::Object { kind } => kind,
        }
    }
}

impl From<&str> for CredentialProvider {
    fn from(tag: &str) -> Self {
        Self::Tag(tag.to_string())
    }
}

/// Global virtualization settings from virt.global.config
///
/// Unset fields are reported as empty strings (or null on some releases,
/// which is folded into the empty string here).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VirtGlobalConfig {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub bridge: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub v4_network: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub v6_network: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub pool: String,
}

/// Snapshot from pool.snapshot.query
#[derive(Debug, Clone, Deserialize)]
pub struct Snapshot {
    /// Full name, `<dataset>@<snapshot_name>`
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub snapshot_name: String,
    pub dataset: String,
    #[serde(default)]
    pub properties: SnapshotProperties,
    #[serde(default)]
    pub holds: HashMap<String, serde_json::Value>,
}

impl Snapshot {
    /// Build a snapshot record the way the API reports it
    pub fn new(dataset: &str, snapshot_name: &str) -> Self {
        let id = format!("{}@{}", dataset, snapshot_name);
        Self {
            name: id.clone(),
            id,
            snapshot_name: snapshot_name.to_string(),
            dataset: dataset.to_string(),
            properties: SnapshotProperties::default(),
            holds: HashMap::new(),
        }
    }

    pub fn used_bytes(&self) -> u64 {
        self.properties.used.as_ref().map(|v| v.parsed).unwrap_or_default()
    }

    pub fn referenced_bytes(&self) -> u64 {
        self.properties
            .referenced
            .as_ref()
            .map(|v| v.parsed)
            .unwrap_or_default()
    }

    pub fn user_refs(&self) -> u64 {
        self.properties
            .userrefs
            .as_ref()
            .and_then(|v| match &v.parsed {
                serde_json::Value::Number(n) => n.as_u64(),
                serde_json::Value::String(s) => s.parse().ok(),
                _ => None,
            })
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SnapshotProperties {
    #[serde(default)]
    pub used: Option<DatasetValue<u64>>,
    #[serde(default)]
    pub referenced: Option<DatasetValue<u64>>,
    #[serde(default)]
    pub userrefs: Option<DatasetValue<serde_json::Value>>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
