//! Error Types
//!
//! Two layers of errors live here:
//!
//! - [`ProviderError`] - failures of the TrueNAS client and the ambient layers
//!   (transport, JSON, configuration, authentication)
//! - [`DataSourceError`] - terminal outcomes of a data source operation, one
//!   variant per diagnostic kind reported to the host

use crate::framework::diag::{Diagnostic, DiagnosticKind, Diagnostics};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("TrueNAS API error: {0}")]
    TrueNasApi(String),

    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tungstenite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Request aborted: operation was cancelled")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, ProviderError>;

/// Failure of a single data source operation
///
/// Each variant terminates the current operation and is reported to the host
/// as exactly one [`Diagnostic`]. No state is written when one is produced.
#[derive(Debug, Error)]
pub enum DataSourceError {
    #[error("Unexpected data source configure type: expected ServiceRegistry")]
    UnexpectedConfigureType,

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Invalid configuration: {0}")]
    ConfigDecode(String),

    #[error("Unable to {operation}: {source}")]
    Upstream {
        operation: &'static str,
        #[source]
        source: ProviderError,
    },

    #[error("{entity} not found: {selector}")]
    NotFound {
        entity: &'static str,
        selector: String,
    },

    #[error("Invalid name pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("Unable to encode state: {0}")]
    EncodeState(#[source] serde_json::Error),
}

impl DataSourceError {
    pub fn upstream(operation: &'static str, source: ProviderError) -> Self {
        Self::Upstream { operation, source }
    }

    pub fn not_found(entity: &'static str, selector: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            selector: selector.into(),
        }
    }

    pub fn kind(&self) -> DiagnosticKind {
        match self {
            Self::UnexpectedConfigureType => DiagnosticKind::UnexpectedConfigureType,
            Self::NotConfigured(_) => DiagnosticKind::NotConfigured,
            Self::ConfigDecode(_) => DiagnosticKind::ConfigDecodeError,
            Self::Upstream { .. } => DiagnosticKind::UpstreamError,
            Self::NotFound { .. } => DiagnosticKind::NotFound,
            Self::InvalidPattern { .. } => DiagnosticKind::InvalidPattern,
            Self::EncodeState(_) => DiagnosticKind::Internal,
        }
    }

    /// True when the upstream call was aborted by the caller's cancellation scope
    pub fn is_cancelled(&self) -> bool {
        matches!(
            self,
            Self::Upstream {
                source: ProviderError::Cancelled,
                ..
            }
        )
    }

    fn summary(&self) -> String {
        match self {
            Self::UnexpectedConfigureType => "Unexpected Data Source Configure Type".to_string(),
            Self::NotConfigured(_) => "Provider Not Configured".to_string(),
            Self::ConfigDecode(_) => "Invalid Data Source Configuration".to_string(),
            Self::Upstream { operation, .. } => format!("Unable to {}", operation),
            Self::NotFound { entity, .. } => format!("{} Not Found", entity),
            Self::InvalidPattern { .. } => "Invalid Name Pattern".to_string(),
            Self::EncodeState(_) => "Unable to Encode State".to_string(),
        }
    }

    fn detail(&self) -> String {
        match self {
            Self::UnexpectedConfigureType => "Expected ServiceRegistry, got an unrecognized \
                 provider data type. Please report this issue to the provider developers."
                .to_string(),
            Self::NotConfigured(name) => format!(
                "The {} data source was read before the provider was configured.",
                name
            ),
            Self::ConfigDecode(detail) => detail.clone(),
            Self::Upstream { source, .. } => source.to_string(),
            Self::NotFound { entity, selector } => {
                format!("No {} matched {}", entity.to_lowercase(), selector)
            }
            Self::InvalidPattern { pattern, source } => {
                format!("name_pattern {:?} is not a valid glob: {}", pattern, source)
            }
            Self::EncodeState(source) => format!(
                "{}. Please report this issue to the provider developers.",
                source
            ),
        }
    }
}

impl From<&DataSourceError> for Diagnostic {
    fn from(err: &DataSourceError) -> Self {
        Diagnostic::error(err.kind(), err.summary(), err.detail())
    }
}

impl From<DataSourceError> for Diagnostic {
    fn from(err: DataSourceError) -> Self {
        Diagnostic::from(&err)
    }
}

impl From<DataSourceError> for Diagnostics {
    fn from(err: DataSourceError) -> Self {
        Diagnostics::from(Diagnostic::from(&err))
    }
}
