//! Dataset Data Source
//!
//! Fetches a single dataset by `pool` and `path`. The dataset id handed to the
//! appliance is `pool/path` verbatim, so nested paths such as
//! `data/apps/myapp` work without further escaping.

use super::{call_upstream, configure_services, finish, require_services, type_name};
use crate::error::DataSourceError;
use crate::framework::{
    decode_config, ConfigureRequest, DataSource, Diagnostics, MetadataRequest, MetadataResponse,
    ReadRequest, ReadResponse, Schema,
};
use crate::model;
use crate::projection::{bytes, dataset_id};
use crate::services::ServiceRegistry;
use async_trait::async_trait;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

const KIND: &str = "dataset";

model! {
    pub struct DatasetModel {
        id: Option<String> => Computed,
        pool: String => Required,
        path: String => Required,
        mount_path: Option<String> => Computed,
        compression: Option<String> => Computed,
        used_bytes: Option<i64> => Computed,
        available_bytes: Option<i64> => Computed,
    }
}

#[derive(Default)]
pub struct DatasetDataSource {
    services: Option<Arc<ServiceRegistry>>,
}

impl DatasetDataSource {
    pub fn new() -> Self {
        Self::default()
    }

    async fn lookup(
        &self,
        config: DatasetModel,
        cancel: &CancellationToken,
    ) -> Result<DatasetModel, DataSourceError> {
        let services = require_services(&self.services, KIND)?;
        let id = dataset_id(&config.pool, &config.path);

        let dataset = call_upstream(cancel, "read dataset", services.dataset.get_dataset(&id))
            .await?
            .ok_or_else(|| DataSourceError::not_found("Dataset", format!("id {:?}", id)))?;

        Ok(DatasetModel {
            mount_path: Some(dataset.mountpoint.clone()),
            compression: Some(dataset.compression().to_string()),
            used_bytes: Some(bytes(dataset.used_bytes())),
            available_bytes: Some(bytes(dataset.available_bytes())),
            id: Some(dataset.id),
            pool: config.pool,
            path: config.path,
        })
    }
}

#[async_trait]
impl DataSource for DatasetDataSource {
    fn metadata(&self, req: &MetadataRequest) -> MetadataResponse {
        type_name(req, KIND)
    }

    fn schema(&self) -> Schema {
        Schema::for_model::<DatasetModel>("Retrieves information about a dataset.")
    }

    fn configure(&mut self, req: ConfigureRequest) -> Diagnostics {
        configure_services(&mut self.services, req)
    }

    async fn read(&self, req: ReadRequest) -> ReadResponse {
        let config: DatasetModel = match decode_config(&self.schema(), &req.config) {
            Ok(config) => config,
            Err(diags) => return ReadResponse::from_diagnostics(diags),
        };
        finish(KIND, self.lookup(config, &req.cancel).await)
    }
}
