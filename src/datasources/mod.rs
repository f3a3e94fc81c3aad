//! Data Sources
//!
//! Each data source binds one public schema to one facade call.
//!
//! # Architecture
//!
//! Every Read follows the same pipeline:
//! - Decode the configuration payload against the schema ([`decode_config`])
//! - Invoke exactly one facade operation inside the caller's cancellation
//!   scope ([`call_upstream`])
//! - Select, filter and project the vendor records
//! - Emit the complete record as state, or a single error diagnostic ([`finish`])
//!
//! # Error Handling
//!
//! Failures terminate the Read: nothing is retried and no partial state is
//! written. Data sources hold only an immutable registry after Configure, so
//! concurrent Reads need no locking.
//!
//! [`decode_config`]: crate::framework::decode_config

use crate::error::{DataSourceError, ProviderError};
use crate::framework::{
    ConfigureRequest, Diagnostics, MetadataRequest, MetadataResponse, Model, ReadResponse,
};
use crate::services::ServiceRegistry;
use std::future::Future;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

pub mod cloudsync_credentials;
pub mod dataset;
pub mod pool;
pub mod snapshots;
pub mod virt_config;

pub use cloudsync_credentials::CloudSyncCredentialsDataSource;
pub use dataset::DatasetDataSource;
pub use pool::PoolDataSource;
pub use snapshots::SnapshotsDataSource;
pub use virt_config::VirtConfigDataSource;

/// `<provider prefix>_<kind>`
pub fn type_name(req: &MetadataRequest, kind: &str) -> MetadataResponse {
    MetadataResponse {
        type_name: format!("{}_{}", req.provider_type_name, kind),
    }
}

/// Attach the registry handed over by the host
///
/// A missing value is the host's validation pass and leaves `slot` untouched.
pub fn configure_services(
    slot: &mut Option<Arc<ServiceRegistry>>,
    req: ConfigureRequest,
) -> Diagnostics {
    let mut diags = Diagnostics::new();
    let Some(data) = req.provider_data else {
        return diags;
    };

    match data.downcast::<ServiceRegistry>() {
        Ok(registry) => *slot = Some(registry),
        Err(_) => diags.push(DataSourceError::UnexpectedConfigureType),
    }
    diags
}

pub fn require_services<'a>(
    slot: &'a Option<Arc<ServiceRegistry>>,
    kind: &str,
) -> Result<&'a ServiceRegistry, DataSourceError> {
    slot.as_deref()
        .ok_or_else(|| DataSourceError::NotConfigured(kind.to_string()))
}

/// Run one facade call, aborting it when `cancel` fires
///
/// Dropping the facade future aborts the underlying request; the abort is
/// reported as an upstream failure, never as not-found.
pub async fn call_upstream<T, F>(
    cancel: &CancellationToken,
    operation: &'static str,
    call: F,
) -> Result<T, DataSourceError>
where
    F: Future<Output = crate::error::Result<T>>,
{
    debug!("Calling upstream to {}", operation);
    tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            Err(DataSourceError::upstream(operation, ProviderError::Cancelled))
        }
        result = call => result.map_err(|e| DataSourceError::upstream(operation, e)),
    }
}

/// Turn the outcome of a Read into the host response, logging it
pub fn finish<M: Model>(kind: &str, outcome: Result<M, DataSourceError>) -> ReadResponse {
    match outcome {
        Ok(model) => {
            info!("Read {} data source", kind);
            ReadResponse::from_state(&model)
        }
        Err(e) => {
            warn!("Failed to read {} data source: {}", kind, e);
            ReadResponse::from_diagnostics(e)
        }
    }
}
