//! Cloud Sync Credentials Data Source
//!
//! Looks up a cloud credential by exact name and reports its provider as a
//! normalized lowercase tag (`s3`, `b2`, `gcs`, `azure`, or the lowercased
//! vendor tag for anything else).

use super::{call_upstream, configure_services, finish, require_services, type_name};
use crate::error::DataSourceError;
use crate::framework::{
    decode_config, ConfigureRequest, DataSource, Diagnostics, MetadataRequest, MetadataResponse,
    ReadRequest, ReadResponse, Schema,
};
use crate::model;
use crate::projection::{normalize_provider_type, numeric_id};
use crate::services::ServiceRegistry;
use async_trait::async_trait;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

const KIND: &str = "cloudsync_credentials";

model! {
    pub struct CloudSyncCredentialsModel {
        id: Option<String> => Computed,
        name: String => Required,
        provider_type: Option<String> => Computed,
    }
}

#[derive(Default)]
pub struct CloudSyncCredentialsDataSource {
    services: Option<Arc<ServiceRegistry>>,
}

impl CloudSyncCredentialsDataSource {
    pub fn new() -> Self {
        Self::default()
    }

    async fn lookup(
        &self,
        config: CloudSyncCredentialsModel,
        cancel: &CancellationToken,
    ) -> Result<CloudSyncCredentialsModel, DataSourceError> {
        let services = require_services(&self.services, KIND)?;
        let credentials = call_upstream(
            cancel,
            "list cloud sync credentials",
            services.cloudsync.list_credentials(),
        )
        .await?;

        let credential = credentials
            .into_iter()
            .find(|c| c.name == config.name)
            .ok_or_else(|| {
                DataSourceError::not_found(
                    "Cloud Sync Credentials",
                    format!("name {:?}", config.name),
                )
            })?;

        Ok(CloudSyncCredentialsModel {
            id: Some(numeric_id(credential.id)),
            provider_type: Some(normalize_provider_type(credential.provider.tag())),
            name: credential.name,
        })
    }
}

#[async_trait]
impl DataSource for CloudSyncCredentialsDataSource {
    fn metadata(&self, req: &MetadataRequest) -> MetadataResponse {
        type_name(req, KIND)
    }

    fn schema(&self) -> Schema {
        Schema::for_model::<CloudSyncCredentialsModel>(
            "Retrieves information about cloud sync credentials.",
        )
    }

    fn configure(&mut self, req: ConfigureRequest) -> Diagnostics {
        configure_services(&mut self.services, req)
    }

    async fn read(&self, req: ReadRequest) -> ReadResponse {
        let config: CloudSyncCredentialsModel = match decode_config(&self.schema(), &req.config) {
            Ok(config) => config,
            Err(diags) => return ReadResponse::from_diagnostics(diags),
        };
        finish(KIND, self.lookup(config, &req.cancel).await)
    }
}
