use thiserror::Error;

/// Unified error type for release-actions operations
#[derive(Error, Debug)]
pub enum ReleaseActionError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Version parsing error: {0}")]
    Version(String),

    #[error("GitHub API {method} {url} failed with status {status}")]
    Api {
        method: &'static str,
        url: String,
        status: u16,
    },

    #[error("HTTP request failed: {0}")]
    Http(#[from] ureq::Error),

    #[error("npm install failed with {0}")]
    Npm(String),

    #[error("semantic-release failed: {0}")]
    SemanticRelease(String),

    #[error("Action output error: {0}")]
    Output(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience type alias for Results in release-actions
pub type Result<T> = std::result::Result<T, ReleaseActionError>;

impl ReleaseActionError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        ReleaseActionError::Config(msg.into())
    }

    /// Create a version error with context
    pub fn version(msg: impl Into<String>) -> Self {
        ReleaseActionError::Version(msg.into())
    }

    /// Create an API status error for a request that completed with a non-2xx status
    pub fn api(method: &'static str, url: impl Into<String>, status: u16) -> Self {
        ReleaseActionError::Api {
            method,
            url: url.into(),
            status,
        }
    }

    pub fn semantic_release(msg: impl Into<String>) -> Self {
        ReleaseActionError::SemanticRelease(msg.into())
    }

    pub fn output(msg: impl Into<String>) -> Self {
        ReleaseActionError::Output(msg.into())
    }
}
