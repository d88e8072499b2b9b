//! Error handling for reqhelper

use thiserror::Error;

/// Main error type for reqhelper operations
#[derive(Error, Debug)]
pub enum ReqHelperError {
    /// Method, URL, header or multipart body could not be turned into a request.
    #[error("Invalid request: {0}")]
    RequestConstruction(String),

    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Failed to decode {encoding} body: {source}")]
    Decode {
        encoding: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for reqhelper operations
pub type Result<T> = std::result::Result<T, ReqHelperError>;
