use std::result;

use thiserror::Error;

/// Error types for reference-set operations
#[derive(Error, Debug)]
pub enum PubMedError {
    /// HTTP request failed (service unreachable, timed out, connection reset)
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    /// NCBI answered with a non-success status or reported an error in the body
    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    /// Response body did not match the schema expected for the operation
    #[error("Malformed {operation} response: {message}")]
    MalformedResponse {
        operation: &'static str,
        message: String,
    },

    /// EPost response carried no WebEnv/QueryKey pair
    #[error("History server did not return a WebEnv/QueryKey pair")]
    WebEnvNotAvailable,

    /// Invalid PMID format
    #[error("Invalid PMID format: {pmid}")]
    InvalidPmid { pmid: String },

    /// Invalid query structure or parameters
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// Configuration value could not be interpreted
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = result::Result<T, PubMedError>;

impl PubMedError {
    pub(crate) fn malformed(operation: &'static str, message: impl Into<String>) -> Self {
        PubMedError::MalformedResponse {
            operation,
            message: message.into(),
        }
    }

    /// Whether the error originates from the remote service: unreachable,
    /// failing, or answering with something that cannot be parsed.
    pub fn is_remote_service_error(&self) -> bool {
        matches!(
            self,
            PubMedError::RequestError(_)
                | PubMedError::ApiError { .. }
                | PubMedError::MalformedResponse { .. }
                | PubMedError::WebEnvNotAvailable
        )
    }

    /// Whether the caller supplied a value that was rejected before any request was made
    pub fn is_malformed_input(&self) -> bool {
        matches!(
            self,
            PubMedError::InvalidPmid { .. } | PubMedError::InvalidQuery(_)
        )
    }
}
