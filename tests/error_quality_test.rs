//! Error message quality tests
//!
//! Tests that verify error messages are helpful and distinguishable, and that
//! data source failures turn into the diagnostics the host expects.

use truenas_provider::error::{DataSourceError, ProviderError};
use truenas_provider::framework::{Diagnostic, DiagnosticKind, Diagnostics};

#[test]
fn test_auth_error_message_clarity() {
    // Given: An authentication error
    let error = ProviderError::Auth("Invalid API key".to_string());

    // When: Converting to string
    let message = format!("{}", error);

    // Then: Message should clearly indicate authentication issue
    assert!(message.contains("Authentication failed"));
    assert!(message.contains("Invalid API key"));
}

#[test]
fn test_websocket_error_message_clarity() {
    use tungstenite::error::Error as WsError;
    use tungstenite::error::ProtocolError;

    let ws_err = WsError::Protocol(ProtocolError::ResetWithoutClosingHandshake);
    let error = ProviderError::WebSocket(ws_err);

    assert!(format!("{}", error).contains("WebSocket error"));
}

#[test]
fn test_provider_error_messages_are_distinguishable() {
    // Given: Different error types
    let auth_err = format!("{}", ProviderError::Auth("test".to_string()));
    let api_err = format!("{}", ProviderError::TrueNasApi("test".to_string()));
    let config_err = format!("{}", ProviderError::Config("test".to_string()));
    let cancelled = format!("{}", ProviderError::Cancelled);

    // Then: Each should have a unique prefix
    assert!(auth_err.starts_with("Authentication failed"));
    assert!(api_err.starts_with("TrueNAS API error"));
    assert!(config_err.starts_with("Configuration error"));
    assert!(cancelled.contains("cancelled"));
}

#[test]
fn test_upstream_diagnostic_keeps_context() {
    // Given: A facade failure while listing pools
    let error = DataSourceError::upstream(
        "list pools",
        ProviderError::TrueNasApi("[EFAULT] pool.query timed out after 30s".to_string()),
    );

    // When: Converting to a diagnostic
    let diag = Diagnostic::from(&error);

    // Then: Summary names the operation, detail carries the cause
    assert_eq!(diag.kind, DiagnosticKind::UpstreamError);
    assert!(diag.is_error());
    assert_eq!(diag.summary, "Unable to list pools");
    assert!(diag.detail.contains("pool.query"));
    assert!(diag.detail.contains("30s"));
}

#[test]
fn test_not_found_diagnostic_names_selector() {
    let diag = Diagnostic::from(DataSourceError::not_found("Dataset", "tank/missing"));

    assert_eq!(diag.kind, DiagnosticKind::NotFound);
    assert_eq!(diag.summary, "Dataset Not Found");
    assert!(diag.detail.contains("tank/missing"));
}

#[test]
fn test_invalid_pattern_diagnostic() {
    // Given: A glob that fails to compile
    let source = glob::Pattern::new("[oops").unwrap_err();
    let error = DataSourceError::InvalidPattern {
        pattern: "[oops".to_string(),
        source,
    };

    // When: Converting to a diagnostic
    let diag = Diagnostic::from(&error);

    // Then: The user's pattern is echoed back
    assert_eq!(diag.kind, DiagnosticKind::InvalidPattern);
    assert!(diag.detail.contains("[oops"));
}

#[test]
fn test_unexpected_configure_type_asks_for_report() {
    let diag = Diagnostic::from(DataSourceError::UnexpectedConfigureType);

    assert_eq!(diag.kind, DiagnosticKind::UnexpectedConfigureType);
    assert!(diag.detail.contains("ServiceRegistry"));
    assert!(diag.detail.contains("report this issue"));
}

#[test]
fn test_cancellation_is_detected() {
    let cancelled = DataSourceError::upstream("list snapshots", ProviderError::Cancelled);
    let failed = DataSourceError::upstream(
        "list snapshots",
        ProviderError::TrueNasApi("boom".to_string()),
    );

    assert!(cancelled.is_cancelled());
    assert!(!failed.is_cancelled());
    assert_eq!(cancelled.kind(), DiagnosticKind::UpstreamError);
}

#[test]
fn test_error_becomes_single_diagnostic() {
    // Given: Any terminal data source error
    let diags = Diagnostics::from(DataSourceError::NotConfigured("truenas_pool".to_string()));

    // Then: Exactly one error diagnostic is produced
    assert_eq!(diags.len(), 1);
    assert!(diags.has_error());
    assert_eq!(diags.kinds(), vec![DiagnosticKind::NotConfigured]);
}

#[test]
fn test_error_debug_format() {
    let error = ProviderError::Auth("Invalid credentials".to_string());

    let debug_message = format!("{:?}", error);

    assert!(debug_message.contains("Auth"));
    assert!(debug_message.contains("Invalid credentials"));
}

#[test]
fn test_state_encoding_failure_is_internal() {
    // Given: A serialization failure while producing state
    let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let error = DataSourceError::EncodeState(source);

    // When: Converting to a diagnostic
    let diag = Diagnostic::from(&error);

    // Then: It is reported as a provider fault, not a configuration problem
    assert_eq!(diag.kind, DiagnosticKind::Internal);
    assert_eq!(diag.summary, "Unable to Encode State");
    assert!(diag.detail.contains("report this issue"));
}
