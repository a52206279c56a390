//! Encoder error types

use thiserror::Error;

/// Encoder construction failure
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProvisionError {
    /// The serializer for this encoder could not be built
    #[error("{encoder} encoder: {reason}")]
    Serializer {
        encoder: &'static str,
        reason: String,
    },
}

/// Failure while encoding a single entry
#[derive(Debug, Error)]
pub enum EncodeError {
    /// `provision` was never called
    #[error("encoder has not been provisioned")]
    NotProvisioned,
    /// A nested JSON value failed to serialize
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
    /// Writing into the entry buffer failed
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
