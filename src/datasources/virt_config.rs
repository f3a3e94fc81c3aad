//! Virtualization Config Data Source
//!
//! Reads the singleton global virtualization settings. Fields the appliance
//! leaves unset come back as empty strings and are reported as null.

use super::{call_upstream, configure_services, finish, require_services, type_name};
use crate::error::DataSourceError;
use crate::framework::{
    decode_config, ConfigureRequest, DataSource, Diagnostics, MetadataRequest, MetadataResponse,
    ReadRequest, ReadResponse, Schema,
};
use crate::model;
use crate::projection::empty_to_null;
use crate::services::ServiceRegistry;
use async_trait::async_trait;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

const KIND: &str = "virt_config";

model! {
    pub struct VirtConfigModel {
        bridge: Option<String> => Computed,
        v4_network: Option<String> => Computed,
        v6_network: Option<String> => Computed,
        pool: Option<String> => Computed,
    }
}

#[derive(Default)]
pub struct VirtConfigDataSource {
    services: Option<Arc<ServiceRegistry>>,
}

impl VirtConfigDataSource {
    pub fn new() -> Self {
        Self::default()
    }

    async fn lookup(&self, cancel: &CancellationToken) -> Result<VirtConfigModel, DataSourceError> {
        let services = require_services(&self.services, KIND)?;
        let config = call_upstream(
            cancel,
            "read virt global config",
            services.virt.get_global_config(),
        )
        .await?;

        Ok(VirtConfigModel {
            bridge: empty_to_null(&config.bridge),
            v4_network: empty_to_null(&config.v4_network),
            v6_network: empty_to_null(&config.v6_network),
            pool: empty_to_null(&config.pool),
        })
    }
}

#[async_trait]
impl DataSource for VirtConfigDataSource {
    fn metadata(&self, req: &MetadataRequest) -> MetadataResponse {
        type_name(req, KIND)
    }

    fn schema(&self) -> Schema {
        Schema::for_model::<VirtConfigModel>(
            "Retrieves the global virtualization configuration.",
        )
    }

    fn configure(&mut self, req: ConfigureRequest) -> Diagnostics {
        configure_services(&mut self.services, req)
    }

    async fn read(&self, req: ReadRequest) -> ReadResponse {
        // No selectors; decoding only rejects stray attributes
        if let Err(diags) = decode_config::<VirtConfigModel>(&self.schema(), &req.config) {
            return ReadResponse::from_diagnostics(diags);
        }
        finish(KIND, self.lookup(&req.cancel).await)
    }
}
