//! Pool Data Source
//!
//! Looks up a ZFS pool by exact name.
//!
//! # Attributes
//! - `name` (required) - pool name to match
//! - `id` - stringified numeric pool id
//! - `path` - mount point, e.g. `/mnt/tank`
//! - `status` - vendor status, e.g. `ONLINE`, `DEGRADED`
//! - `available_bytes` / `used_bytes` - free and allocated space

use super::{call_upstream, configure_services, finish, require_services, type_name};
use crate::error::DataSourceError;
use crate::framework::{
    decode_config, ConfigureRequest, DataSource, Diagnostics, MetadataRequest, MetadataResponse,
    ReadRequest, ReadResponse, Schema,
};
use crate::model;
use crate::projection::{bytes, numeric_id};
use crate::services::ServiceRegistry;
use async_trait::async_trait;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

const KIND: &str = "pool";

model! {
    /// State of the `pool` data source
    pub struct PoolModel {
        id: Option<String> => Computed,
        name: String => Required,
        path: Option<String> => Computed,
        status: Option<String> => Computed,
        available_bytes: Option<i64> => Computed,
        used_bytes: Option<i64> => Computed,
    }
}

#[derive(Default)]
pub struct PoolDataSource {
    services: Option<Arc<ServiceRegistry>>,
}

impl PoolDataSource {
    pub fn new() -> Self {
        Self::default()
    }

    async fn lookup(
        &self,
        config: PoolModel,
        cancel: &CancellationToken,
    ) -> Result<PoolModel, DataSourceError> {
        let services = require_services(&self.services, KIND)?;
        let pools = call_upstream(cancel, "list pools", services.dataset.list_pools()).await?;

        // Names are not guaranteed unique upstream; the first listed pool wins
        let pool = pools
            .into_iter()
            .find(|p| p.name == config.name)
            .ok_or_else(|| DataSourceError::not_found("Pool", format!("name {:?}", config.name)))?;

        Ok(PoolModel {
            id: Some(numeric_id(pool.id)),
            name: pool.name,
            path: Some(pool.path),
            status: Some(pool.status),
            available_bytes: Some(bytes(pool.free)),
            used_bytes: Some(bytes(pool.allocated)),
        })
    }
}

#[async_trait]
impl DataSource for PoolDataSource {
    fn metadata(&self, req: &MetadataRequest) -> MetadataResponse {
        type_name(req, KIND)
    }

    fn schema(&self) -> Schema {
        Schema::for_model::<PoolModel>("Retrieves information about a ZFS pool.")
    }

    fn configure(&mut self, req: ConfigureRequest) -> Diagnostics {
        configure_services(&mut self.services, req)
    }

    async fn read(&self, req: ReadRequest) -> ReadResponse {
        let config: PoolModel = match decode_config(&self.schema(), &req.config) {
            Ok(config) => config,
            Err(diags) => return ReadResponse::from_diagnostics(diags),
        };
        finish(KIND, self.lookup(config, &req.cancel).await)
    }
}
