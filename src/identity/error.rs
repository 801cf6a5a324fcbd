use thiserror::Error;

/// Failures below the operation boundary of the identity client
///
/// These never reach tool callers: `SailPointApi` folds them into failure
/// `OperationResult`s.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// Connection, TLS or timeout failure talking to IdentityIQ
    #[error("Transport error: {0}")]
    Transport(String),

    /// The configured base URL (or a derived endpoint) is not a valid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The HTTP client could not be constructed
    #[error("HTTP client error: {0}")]
    Client(String),
}

impl From<reqwest::Error> for IdentityError {
    fn from(err: reqwest::Error) -> Self {
        IdentityError::Transport(err.to_string())
    }
}

