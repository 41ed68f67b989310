/// Error taxonomy for comment fetching and analysis.
///
/// Every variant is recoverable from the caller's point of view: the CLI
/// prints the message and the user may retry. Nothing here is retried
/// automatically.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExplorerError {
    /// Missing or malformed video identifier / URL, rejected before any network call
    #[error("{0}")]
    Validation(String),

    /// The upstream API has no such video
    #[error("{0}")]
    UpstreamNotFound(String),

    /// Credentials for the upstream API are not configured
    #[error("{0}")]
    UpstreamConfig(String),

    /// Network, quota or unexpected upstream failure
    #[error("Failed to fetch comments: {0}")]
    UpstreamFetch(String),

    /// Toxicity classifier call failed (non-fatal for the analysis as a whole)
    #[error("Analysis unavailable: {0}")]
    Analysis(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ExplorerError {
    /// HTTP-style status associated with the error, mirroring the comment endpoint.
    pub fn status_code(&self) -> u16 {
        match self {
            ExplorerError::Validation(_) => 400,
            ExplorerError::UpstreamNotFound(_) => 404,
            ExplorerError::UpstreamConfig(_)
            | ExplorerError::UpstreamFetch(_)
            | ExplorerError::Analysis(_)
            | ExplorerError::Io(_)
            | ExplorerError::Json(_) => 500,
        }
    }
}

impl From<reqwest::Error> for ExplorerError {
    fn from(err: reqwest::Error) -> Self {
        ExplorerError::UpstreamFetch(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ExplorerError>;
