//! Service Facades
//!
//! One minimal trait per TrueNAS API namespace, exposing only the calls the
//! data sources make. [`TrueNasClient`] implements all of them against the
//! live appliance; [`mock`] provides fixture implementations whose behavior
//! is injected by tests.
//!
//! The [`ServiceRegistry`] bundles one facade per namespace and is the value
//! the host hands to every data source at Configure time.

pub mod mock;

use crate::error::Result;
use crate::truenas::types::{CloudSyncCredential, Dataset, Pool, Snapshot, VirtGlobalConfig};
use crate::truenas::TrueNasClient;
use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait DatasetService: Send + Sync {
    async fn list_pools(&self) -> Result<Vec<Pool>>;

    /// `Ok(None)` when no dataset has `id`; errors are reserved for transport failures
    async fn get_dataset(&self, id: &str) -> Result<Option<Dataset>>;
}

#[async_trait]
pub trait CloudSyncService: Send + Sync {
    async fn list_credentials(&self) -> Result<Vec<CloudSyncCredential>>;
}

#[async_trait]
pub trait VirtService: Send + Sync {
    async fn get_global_config(&self) -> Result<VirtGlobalConfig>;
}

#[async_trait]
pub trait SnapshotService: Send + Sync {
    /// Every snapshot on the appliance, in API order
    async fn list(&self) -> Result<Vec<Snapshot>>;
}

/// Immutable bundle of facades shared by all data sources
#[derive(Clone)]
pub struct ServiceRegistry {
    pub dataset: Arc<dyn DatasetService>,
    pub cloudsync: Arc<dyn CloudSyncService>,
    pub virt: Arc<dyn VirtService>,
    pub snapshot: Arc<dyn SnapshotService>,
}

impl ServiceRegistry {
    /// Route every namespace through one live client
    pub fn from_client(client: Arc<TrueNasClient>) -> Self {
        Self {
            dataset: client.clone(),
            cloudsync: client.clone(),
            virt: client.clone(),
            snapshot: client,
        }
    }
}

#[async_trait]
impl DatasetService for TrueNasClient {
    async fn list_pools(&self) -> Result<Vec<Pool>> {
        self.query_pools().await
    }

    async fn get_dataset(&self, id: &str) -> Result<Option<Dataset>> {
        TrueNasClient::get_dataset(self, id).await
    }
}

#[async_trait]
impl CloudSyncService for TrueNasClient {
    async fn list_credentials(&self) -> Result<Vec<CloudSyncCredential>> {
        self.query_cloudsync_credentials().await
    }
}

#[async_trait]
impl VirtService for TrueNasClient {
    async fn get_global_config(&self) -> Result<VirtGlobalConfig> {
        self.virt_global_config().await
    }
}

#[async_trait]
impl SnapshotService for TrueNasClient {
    async fn list(&self) -> Result<Vec<Snapshot>> {
        self.query_snapshots().await
    }
}
