//! TrueNAS WebSocket API Client
//!
//! Typed wrappers over the JSON-RPC methods the data sources need. All calls
//! share one persistent session owned by a [`ConnectionManager`].
//!
//! # Example
//!
//! ```no_run
//! use truenas_provider::config::TrueNasConfig;
//! use truenas_provider::truenas::TrueNasClient;
//! use secrecy::SecretString;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = TrueNasConfig {
//!     host: "truenas.local:443".to_string(),
//!     api_key: SecretString::from("your-api-key"),
//!     use_tls: true,
//!     verify_ssl: false,
//! };
//!
//! let client = TrueNasClient::new(config);
//! let pools = client.query_pools().await?;
//! # Ok(())
//! # }
//! ```

use crate::config::TrueNasConfig;
use crate::error::Result;
use crate::truenas::connection::ConnectionManager;
use crate::truenas::types::*;
use serde_json::json;
use std::sync::Arc;

/// Client for TrueNAS Scale WebSocket API
///
/// `Send` and `Sync`; share it behind an `Arc`.
pub struct TrueNasClient {
    connection_manager: ConnectionManager,
}

impl TrueNasClient {
    pub fn new(config: TrueNasConfig) -> Self {
        Self {
            connection_manager: ConnectionManager::new(Arc::new(config)),
        }
    }

    async fn execute_query<T>(&self, method: &str, params: Option<serde_json::Value>) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.connection_manager.execute_query(method, params).await
    }

    pub async fn query_pools(&self) -> Result<Vec<Pool>> {
        self.execute_query("pool.query", Some(json!([]))).await
    }

    /// Fetch a single dataset by id; `None` when no dataset has that id
    pub async fn get_dataset(&self, id: &str) -> Result<Option<Dataset>> {
        let params = json!([
            [["id", "=", id]],
            {"extra": {"retrieve_children": false, "flat": true}}
        ]);
        let datasets: Vec<Dataset> = self.execute_query("pool.dataset.query", Some(params)).await?;
        Ok(datasets.into_iter().next())
    }

    pub async fn query_cloudsync_credentials(&self) -> Result<Vec<CloudSyncCredential>> {
        self.execute_query("cloudsync.credentials.query", Some(json!([])))
            .await
    }

    pub async fn virt_global_config(&self) -> Result<VirtGlobalConfig> {
        self.execute_query("virt.global.config", None).await
    }

    pub async fn query_snapshots(&self) -> Result<Vec<Snapshot>> {
        let params = json!([
            [],
            {"extra": {"holds": true, "retrieve_properties": true}}
        ]);
        self.execute_query("pool.snapshot.query", Some(params)).await
    }
}
