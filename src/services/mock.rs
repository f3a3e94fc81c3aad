//! Fixture Facades
//!
//! Test doubles for every service facade. Behavior is injected per operation
//! as a closure; an operation without injected behavior fails with a
//! `TrueNasApi` error naming the missing fixture. Each mock counts its calls
//! and can simulate a slow appliance with [`latency`](MockDatasetService::with_latency).
//!
//! ```
//! use truenas_provider::services::mock::{MockServices, MockVirtService};
//! use truenas_provider::truenas::types::VirtGlobalConfig;
//!
//! let mocks = MockServices::new().with_virt(
//!     MockVirtService::new().with_global_config(|| Ok(VirtGlobalConfig::default())),
//! );
//! let registry = mocks.registry();
//! # let _ = registry;
//! ```

use super::{CloudSyncService, DatasetService, ServiceRegistry, SnapshotService, VirtService};
use crate::error::{ProviderError, Result};
use crate::truenas::types::{CloudSyncCredential, Dataset, Pool, Snapshot, VirtGlobalConfig};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

type Behavior<T> = Box<dyn Fn() -> Result<T> + Send + Sync>;
type LookupBehavior<T> = Box<dyn Fn(&str) -> Result<T> + Send + Sync>;

/// Call bookkeeping shared by all mocks
#[derive(Default)]
struct CallStats {
    calls: AtomicUsize,
    latency: Option<Duration>,
}

impl CallStats {
    async fn enter(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }
}

fn unmocked<T>(operation: &str) -> Result<T> {
    Err(ProviderError::TrueNasApi(format!(
        "no fixture behavior for {}",
        operation
    )))
}

macro_rules! stats_accessors {
    ($ty:ty) => {
        impl $ty {
            /// Delay every call by `latency` before the injected behavior runs
            pub fn with_latency(mut self, latency: Duration) -> Self {
                self.stats.latency = Some(latency);
                self
            }

            pub fn calls(&self) -> usize {
                self.stats.calls.load(Ordering::SeqCst)
            }
        }
    };
}

#[derive(Default)]
pub struct MockDatasetService {
    list_pools: Option<Behavior<Vec<Pool>>>,
    get_dataset: Option<LookupBehavior<Option<Dataset>>>,
    stats: CallStats,
}

impl MockDatasetService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pools<F>(mut self, f: F) -> Self
    where
        F: Fn() -> Result<Vec<Pool>> + Send + Sync + 'static,
    {
        self.list_pools = Some(Box::new(f));
        self
    }

    pub fn with_dataset<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) -> Result<Option<Dataset>> + Send + Sync + 'static,
    {
        self.get_dataset = Some(Box::new(f));
        self
    }
}

stats_accessors!(MockDatasetService);

#[async_trait]
impl DatasetService for MockDatasetService {
    async fn list_pools(&self) -> Result<Vec<Pool>> {
        self.stats.enter().await;
        match &self.list_pools {
            Some(f) => f(),
            None => unmocked("Dataset.list_pools"),
        }
    }

    async fn get_dataset(&self, id: &str) -> Result<Option<Dataset>> {
        self.stats.enter().await;
        match &self.get_dataset {
            Some(f) => f(id),
            None => unmocked("Dataset.get_dataset"),
        }
    }
}

#[derive(Default)]
pub struct MockCloudSyncService {
    list_credentials: Option<Behavior<Vec<CloudSyncCredential>>>,
    stats: CallStats,
}

impl MockCloudSyncService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credentials<F>(mut self, f: F) -> Self
    where
        F: Fn() -> Result<Vec<CloudSyncCredential>> + Send + Sync + 'static,
    {
        self.list_credentials = Some(Box::new(f));
        self
    }
}

stats_accessors!(MockCloudSyncService);

#[async_trait]
impl CloudSyncService for MockCloudSyncService {
    async fn list_credentials(&self) -> Result<Vec<CloudSyncCredential>> {
        self.stats.enter().await;
        match &self.list_credentials {
            Some(f) => f(),
            None => unmocked("CloudSync.list_credentials"),
        }
    }
}

#[derive(Default)]
pub struct MockVirtService {
    global_config: Option<Behavior<VirtGlobalConfig>>,
    stats: CallStats,
}

impl MockVirtService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_global_config<F>(mut self, f: F) -> Self
    where
        F: Fn() -> Result<VirtGlobalConfig> + Send + Sync + 'static,
    {
        self.global_config = Some(Box::new(f));
        self
    }
}

stats_accessors!(MockVirtService);

#[async_trait]
impl VirtService for MockVirtService {
    async fn get_global_config(&self) -> Result<VirtGlobalConfig> {
        self.stats.enter().await;
        match &self.global_config {
            Some(f) => f(),
            None => unmocked("Virt.get_global_config"),
        }
    }
}

#[derive(Default)]
pub struct MockSnapshotService {
    list: Option<Behavior<Vec<Snapshot>>>,
    stats: CallStats,
}

impl MockSnapshotService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshots<F>(mut self, f: F) -> Self
    where
        F: Fn() -> Result<Vec<Snapshot>> + Send + Sync + 'static,
    {
        self.list = Some(Box::new(f));
        self
    }
}

stats_accessors!(MockSnapshotService);

#[async_trait]
impl SnapshotService for MockSnapshotService {
    async fn list(&self) -> Result<Vec<Snapshot>> {
        self.stats.enter().await;
        match &self.list {
            Some(f) => f(),
            None => unmocked("Snapshot.list"),
        }
    }
}

/// One mock per namespace; hands out registries that share them
#[derive(Clone, Default)]
pub struct MockServices {
    pub dataset: Arc<MockDatasetService>,
    pub cloudsync: Arc<MockCloudSyncService>,
    pub virt: Arc<MockVirtService>,
    pub snapshot: Arc<MockSnapshotService>,
}

impl MockServices {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dataset(mut self, mock: MockDatasetService) -> Self {
        self.dataset = Arc::new(mock);
        self
    }

    pub fn with_cloudsync(mut self, mock: MockCloudSyncService) -> Self {
        self.cloudsync = Arc::new(mock);
        self
    }

    pub fn with_virt(mut self, mock: MockVirtService) -> Self {
        self.virt = Arc::new(mock);
        self
    }

    pub fn with_snapshot(mut self, mock: MockSnapshotService) -> Self {
        self.snapshot = Arc::new(mock);
        self
    }

    pub fn registry(&self) -> ServiceRegistry {
        ServiceRegistry {
            dataset: self.dataset.clone(),
            cloudsync: self.cloudsync.clone(),
            virt: self.virt.clone(),
            snapshot: self.snapshot.clone(),
        }
    }

    /// Calls made across every facade
    pub fn total_calls(&self) -> usize {
        self.dataset.calls() + self.cloudsync.calls() + self.virt.calls() + self.snapshot.calls()
    }
}
