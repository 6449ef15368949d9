//! Error types for the relay.

use thiserror::Error;

use crate::gateway::GatewayError;

/// Top-level relay error type.
#[derive(Debug, Error)]
pub enum RelayError {
    /// A required environment variable is not set.
    #[error("missing required environment variable {0}")]
    MissingEnv(&'static str),
    /// Invalid configuration or unsupported values.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// URL parse error.
    #[error("url parse error: {0}")]
    Url(#[from] url::ParseError),
    /// Provider gateway error.
    #[error("gateway error: {0}")]
    Gateway(#[from] GatewayError),
    /// I/O error (bind, serve, runtime).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result alias for relay operations.
pub type RelayResult<T> = Result<T, RelayError>;
