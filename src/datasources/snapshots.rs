//! Snapshots Data Source
//!
//! Lists the snapshots of a dataset, optionally including its descendants and
//! optionally restricted to snapshot names matching a shell-style glob.
//!
//! The appliance returns every snapshot; scoping and name matching happen
//! here, in that order, and the API's ordering is preserved. An empty result
//! is a successful read.

use super::{call_upstream, configure_services, finish, require_services, type_name};
use crate::error::DataSourceError;
use crate::framework::{
    decode_config, ConfigureRequest, DataSource, Diagnostics, MetadataRequest, MetadataResponse,
    ReadRequest, ReadResponse, Schema,
};
use crate::model;
use crate::projection::{bytes, compile_name_pattern, in_dataset_scope, snapshot_hold};
use crate::services::ServiceRegistry;
use crate::truenas::types::Snapshot;
use async_trait::async_trait;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

const KIND: &str = "snapshots";

model! {
    pub struct SnapshotsModel {
        dataset_id: String => Required,
        recursive: Option<bool> => Optional,
        name_pattern: Option<String> => Optional,
        snapshots: Option<Vec<SnapshotModel>> => Computed,
    }
}

model! {
    /// One entry of `snapshots`
    pub struct SnapshotModel {
        id: String => Computed,
        name: String => Computed,
        dataset_id: String => Computed,
        used_bytes: i64 => Computed,
        referenced_bytes: i64 => Computed,
        hold: bool => Computed,
    }
}

impl From<Snapshot> for SnapshotModel {
    fn from(snapshot: Snapshot) -> Self {
        Self {
            used_bytes: bytes(snapshot.used_bytes()),
            referenced_bytes: bytes(snapshot.referenced_bytes()),
            hold: snapshot_hold(&snapshot),
            id: snapshot.id,
            name: snapshot.snapshot_name,
            dataset_id: snapshot.dataset,
        }
    }
}

#[derive(Default)]
pub struct SnapshotsDataSource {
    services: Option<Arc<ServiceRegistry>>,
}

impl SnapshotsDataSource {
    pub fn new() -> Self {
        Self::default()
    }

    async fn list(
        &self,
        config: SnapshotsModel,
        cancel: &CancellationToken,
    ) -> Result<SnapshotsModel, DataSourceError> {
        let services = require_services(&self.services, KIND)?;

        // Reject a malformed pattern before touching the appliance
        let pattern = config
            .name_pattern
            .as_deref()
            .map(compile_name_pattern)
            .transpose()?;
        let recursive = config.recursive.unwrap_or(false);

        let all = call_upstream(cancel, "list snapshots", services.snapshot.list()).await?;
        let total = all.len();

        let snapshots: Vec<SnapshotModel> = all
            .into_iter()
            .filter(|s| in_dataset_scope(&s.dataset, &config.dataset_id, recursive))
            .filter(|s| {
                pattern
                    .as_ref()
                    .map_or(true, |p| p.matches(&s.snapshot_name))
            })
            .map(SnapshotModel::from)
            .collect();

        debug!(
            "Selected {} of {} snapshots for {}",
            snapshots.len(),
            total,
            config.dataset_id
        );

        Ok(SnapshotsModel {
            snapshots: Some(snapshots),
            ..config
        })
    }
}

#[async_trait]
impl DataSource for SnapshotsDataSource {
    fn metadata(&self, req: &MetadataRequest) -> MetadataResponse {
        type_name(req, KIND)
    }

    fn schema(&self) -> Schema {
        Schema::for_model::<SnapshotsModel>("Retrieves the snapshots of a dataset.")
    }

    fn configure(&mut self, req: ConfigureRequest) -> Diagnostics {
        configure_services(&mut self.services, req)
    }

    async fn read(&self, req: ReadRequest) -> ReadResponse {
        let config: SnapshotsModel = match decode_config(&self.schema(), &req.config) {
            Ok(config) => config,
            Err(diags) => return ReadResponse::from_diagnostics(diags),
        };
        finish(KIND, self.list(config, &req.cancel).await)
    }
}
