use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContentError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid {collection} payload: {source}")]
    InvalidPayload {
        collection: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("storage error: {message}")]
    Storage { message: String },

    #[error("configuration error: {message}")]
    Config { message: String },

    #[error("invalid value for {field} ({value}): {reason}")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },

    /// Outcome shared with callers that attached to an in-flight load.
    #[error("{0}")]
    Load(Arc<ContentError>),

    #[error("load ended without reporting an outcome")]
    LoadInterrupted,
}

pub type Result<T> = std::result::Result<T, ContentError>;
