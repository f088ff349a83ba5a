// Error types for kickstart.
// Splits network, storage and configuration failures and decides which ones are fatal.

use reqwest::StatusCode;
use thiserror::Error;

/// Failures from the remote agencies API.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Host could not be reached (DNS or connect failure).
    #[error("Unable to reach {host}: {reason}")]
    NetworkUnavailable { host: String, reason: String },

    #[error("HTTP request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Invalid request URL: {0}")]
    InvalidUrl(String),

    #[error("HTTP {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("Invalid agencies payload: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    pub fn is_network_unavailable(&self) -> bool {
        matches!(self, ApiError::NetworkUnavailable { .. })
    }
}

/// Failures from the local agency database.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database schema version {found} is newer than supported version {supported}")]
    UnsupportedSchema { found: i32, supported: i32 },

    #[error("Database connection lock poisoned")]
    Poisoned,

    #[error("Database worker failed: {0}")]
    Worker(String),
}

#[derive(Error, Debug)]
pub enum KickstartError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

/// How a failure is surfaced to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Show a transient notification and keep running.
    Notify,
    /// Tear down and terminate the process.
    Fatal,
}

impl KickstartError {
    /// Only connectivity failures are recoverable. Everything else fails fast
    /// until real crash reporting exists.
    pub fn disposition(&self) -> Disposition {
        match self {
            KickstartError::Api(err) if err.is_network_unavailable() => Disposition::Notify,
            _ => Disposition::Fatal,
        }
    }
}

pub type Result<T> = std::result::Result<T, KickstartError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_unavailable_is_recoverable() {
        let err = KickstartError::from(ApiError::NetworkUnavailable {
            host: "api.metro.net".to_string(),
            reason: "dns error".to_string(),
        });
        assert_eq!(err.disposition(), Disposition::Notify);
    }

    #[test]
    fn test_other_failures_are_fatal() {
        let decode = serde_json::from_str::<Vec<u32>>("{").unwrap_err();
        assert_eq!(
            KickstartError::from(ApiError::Decode(decode)).disposition(),
            Disposition::Fatal
        );
        assert_eq!(
            KickstartError::from(StoreError::Poisoned).disposition(),
            Disposition::Fatal
        );
        assert_eq!(
            KickstartError::Config("bad".to_string()).disposition(),
            Disposition::Fatal
        );
    }
}
