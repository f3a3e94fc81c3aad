//! Provider Catalogue
//!
//! Lists the data sources this provider serves and builds the live
//! [`ServiceRegistry`] the host passes to each of them at Configure time.

use crate::config::TrueNasConfig;
use crate::datasources::{
    CloudSyncCredentialsDataSource, DatasetDataSource, PoolDataSource, SnapshotsDataSource,
    VirtConfigDataSource,
};
use crate::framework::{DataSource, MetadataRequest};
use crate::services::ServiceRegistry;
use crate::truenas::TrueNasClient;
use std::sync::Arc;

pub struct TrueNasProvider {
    type_name: String,
}

impl Default for TrueNasProvider {
    fn default() -> Self {
        Self::new("truenas")
    }
}

impl TrueNasProvider {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
        }
    }

    pub fn metadata_request(&self) -> MetadataRequest {
        MetadataRequest {
            provider_type_name: self.type_name.clone(),
        }
    }

    /// Fresh, unconfigured instances of every data source
    pub fn data_sources(&self) -> Vec<Box<dyn DataSource>> {
        vec![
            Box::new(PoolDataSource::new()),
            Box::new(DatasetDataSource::new()),
            Box::new(CloudSyncCredentialsDataSource::new()),
            Box::new(VirtConfigDataSource::new()),
            Box::new(SnapshotsDataSource::new()),
        ]
    }

    /// Full type names of every data source, e.g. `truenas_pool`
    pub fn data_source_names(&self) -> Vec<String> {
        let req = self.metadata_request();
        self.data_sources()
            .iter()
            .map(|ds| ds.metadata(&req).type_name)
            .collect()
    }

    /// Look up a data source by full type name
    pub fn data_source(&self, type_name: &str) -> Option<Box<dyn DataSource>> {
        let req = self.metadata_request();
        self.data_sources()
            .into_iter()
            .find(|ds| ds.metadata(&req).type_name == type_name)
    }

    /// Registry backed by a live TrueNAS connection
    pub fn connect(&self, config: &TrueNasConfig) -> ServiceRegistry {
        ServiceRegistry::from_client(Arc::new(TrueNasClient::new(config.clone())))
    }
}
