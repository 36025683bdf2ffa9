//! Error types for the MWS integration.
//!
//! Errors are categorized by their source: configuration problems are caught
//! eagerly at construction, transport failures are distinguished from errors
//! the service itself reported, and parse failures on success payloads are
//! always surfaced rather than defaulted.

use std::time::Duration;
use thiserror::Error;

/// Top-level error type for the MWS integration.
#[derive(Debug, Error)]
pub enum MwsError {
    /// Configuration-related errors, detected at client construction.
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// The requested operation is not present in the endpoint registry.
    ///
    /// This is a programmer error: operation names are static.
    #[error("Unknown operation '{operation}'")]
    UnknownOperation {
        /// The operation name that failed to resolve.
        operation: String,
    },

    /// Caller-supplied input that the service would reject outright, caught
    /// before a request is built (e.g. identifier-list size limits).
    #[error("Invalid request: {message}")]
    InvalidRequest {
        /// Details about the rejected input.
        message: String,
    },

    /// Network or HTTP-layer failure without a parseable service error body.
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// The service answered with a non-success status.
    ///
    /// When the body carried a recognizable error envelope, `message` is the
    /// human-readable text extracted from it; otherwise it is the raw body.
    #[error("Remote service error (HTTP {status}): {message}")]
    RemoteService {
        /// HTTP status code of the failed response.
        status: u16,
        /// Error text reported by the service.
        message: String,
    },

    /// A success-status payload could not be parsed as XML.
    #[error("Malformed response: {message}")]
    MalformedResponse {
        /// Details about the parse failure.
        message: String,
    },

    /// A fetched report payload could not be parsed as tab-delimited rows.
    #[error("Malformed report: {message}")]
    MalformedReport {
        /// Details about the parse failure.
        message: String,
    },

    /// Report creation succeeded at the transport level but the response
    /// lacked the expected request identifier.
    #[error("Report request rejected: {message}")]
    ReportRequestRejected {
        /// Details about the missing identifier.
        message: String,
    },
}

impl MwsError {
    /// Returns true if the error is worth retrying from the caller side.
    ///
    /// Only transport failures are classified. The service reports transient
    /// and validation failures through the same error envelope, so retry
    /// decisions on [`MwsError::RemoteService`] stay with the caller.
    pub fn is_retryable(&self) -> bool {
        match self {
            MwsError::Transport(e) => e.is_retryable(),
            _ => false,
        }
    }
}

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// A required credential or identifier was not provided.
    #[error("Missing required field '{field}'")]
    MissingField {
        /// The configuration field name.
        field: String,
    },

    /// The configured marketplace id is not in the routing table.
    #[error("Unknown marketplace id '{marketplace_id}'")]
    UnknownMarketplace {
        /// The unrecognized marketplace id.
        marketplace_id: String,
    },

    /// A configuration value failed validation.
    #[error("Invalid configuration: {field} - {message}")]
    InvalidValue {
        /// The configuration field name.
        field: String,
        /// Error message.
        message: String,
    },
}

/// Network and transport errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection could not be established or was dropped mid-request.
    #[error("Connection failed: {message}")]
    ConnectionFailed {
        /// Error message.
        message: String,
    },

    /// Request timed out.
    #[error("Request timed out after {duration:?}")]
    Timeout {
        /// The timeout duration.
        duration: Duration,
    },

    /// TLS setup or handshake error.
    #[error("TLS error: {message}")]
    Tls {
        /// Error message.
        message: String,
    },
}

impl TransportError {
    /// Returns true if the error is retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            TransportError::ConnectionFailed { .. } | TransportError::Timeout { .. }
        )
    }
}
