//! Host Boundary
//!
//! The plugin host drives every data source through four operations:
//!
//! 1. **Metadata** - report the type name `<provider prefix>_<kind>`
//! 2. **Schema** - report the attribute contract
//! 3. **Configure** - receive the opaque provider value (a
//!    [`ServiceRegistry`](crate::services::ServiceRegistry) once configured)
//! 4. **Read** - decode config, call the appliance, project, write state
//!
//! This module holds the request/response shapes of those operations and the
//! [`DataSource`] trait adapters implement.

pub mod decode;
pub mod diag;
pub mod schema;

pub use decode::decode_config;
pub use diag::{Diagnostic, DiagnosticKind, Diagnostics, Severity};
pub use schema::{Attribute, AttributeKind, Model, Role, Schema};

use crate::error::DataSourceError;
use async_trait::async_trait;
use std::any::Any;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone)]
pub struct MetadataRequest {
    pub provider_type_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataResponse {
    pub type_name: String,
}

/// Opaque value the host passes at Configure time
///
/// `None` during the host's pre-configuration validation pass.
#[derive(Clone, Default)]
pub struct ConfigureRequest {
    pub provider_data: Option<Arc<dyn Any + Send + Sync>>,
}

impl ConfigureRequest {
    pub fn new<T: Any + Send + Sync>(data: Arc<T>) -> Self {
        Self {
            provider_data: Some(data),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReadRequest {
    /// Configured attribute values as a JSON object
    pub config: serde_json::Value,
    /// Cancellation scope of the caller; the adapter imposes no deadline of its own
    pub cancel: CancellationToken,
}

impl ReadRequest {
    pub fn new(config: serde_json::Value) -> Self {
        Self {
            config,
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }
}

/// Outcome of a Read: either a complete state record or error diagnostics
#[derive(Debug, Clone, Default)]
pub struct ReadResponse {
    pub state: Option<serde_json::Value>,
    pub diagnostics: Diagnostics,
}

impl ReadResponse {
    pub fn from_state<M: Model>(model: &M) -> Self {
        match serde_json::to_value(model) {
            Ok(state) => Self {
                state: Some(state),
                diagnostics: Diagnostics::new(),
            },
            Err(e) => Self::from_diagnostics(DataSourceError::EncodeState(e)),
        }
    }

    pub fn from_diagnostics(diagnostics: impl Into<Diagnostics>) -> Self {
        Self {
            state: None,
            diagnostics: diagnostics.into(),
        }
    }
}

/// A read-only binding between one public schema and one upstream call
#[async_trait]
pub trait DataSource: Send + Sync {
    fn metadata(&self, req: &MetadataRequest) -> MetadataResponse;

    fn schema(&self) -> Schema;

    fn configure(&mut self, req: ConfigureRequest) -> Diagnostics;

    async fn read(&self, req: ReadRequest) -> ReadResponse;
}
