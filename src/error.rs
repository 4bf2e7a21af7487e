//! Error types shared by every module of the crate.

use std::path::PathBuf;

/// Failure kinds of the plain HTTP fetches (link resolution and evidence
/// downloads). Kept separate from [`Error`] so callers that treat a download
/// as best-effort can absorb exactly these and nothing else.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("connection to {url} failed: {message}")]
    Connect { url: String, message: String },
    #[error("request to {url} timed out")]
    Timeout { url: String },
    #[error("request to {url} returned status {status}")]
    Status { url: String, status: u16 },
    #[error("request to {url} failed: {message}")]
    Request { url: String, message: String },
}

impl FetchError {
    /// Classifies a transport error from `reqwest` for the given URL.
    pub fn from_reqwest(url: &str, err: reqwest::Error) -> Self {
        let url = url.to_string();
        if err.is_timeout() {
            FetchError::Timeout { url }
        } else if err.is_connect() {
            FetchError::Connect {
                url,
                message: err.to_string(),
            }
        } else if let Some(status) = err.status() {
            FetchError::Status {
                url,
                status: status.as_u16(),
            }
        } else {
            FetchError::Request {
                url,
                message: err.to_string(),
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The reimbursement has no registered Twitter handle.
    #[error("congressperson does not have a registered Twitter account (document {document_id})")]
    MissingProfile { document_id: i64 },
    /// The API reported that the requested account does not exist.
    #[error("Twitter profile not found: {screen_name}")]
    NotFound { screen_name: String },
    #[error("Twitter API error for operation '{operation}' ({status}): {message}")]
    Api {
        operation: String,
        status: u16,
        codes: Vec<i64>,
        message: String,
    },
    #[error("unexpected Twitter API response for operation '{operation}': {message}")]
    UnexpectedResponse { operation: String, message: String },
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Database(#[from] mongodb::error::Error),
    #[error("failed to read {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("timestamp {0} is out of range")]
    InvalidTimestamp(i64),
    #[error("status id {0} does not fit a stored integer")]
    StatusIdOutOfRange(u64),
}

pub type Result<T> = std::result::Result<T, Error>;
