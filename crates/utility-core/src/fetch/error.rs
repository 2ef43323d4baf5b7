//! Fetch failure type.

use thiserror::Error;

/// Why a single fetch did not produce a body.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Method, URL or header rejected before any I/O.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    /// DNS, TLS, connection or timeout failure reported by libcurl.
    #[error(transparent)]
    Transport(#[from] curl::Error),
    /// Server answered with anything other than 200.
    #[error("failed to download file: {status}")]
    Status { code: u32, status: String },
}
