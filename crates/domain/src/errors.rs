//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for MemberLink
#[derive(Error, Debug, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum MemberLinkError {
    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("HTTP error {status}")]
    Http { status: u16, body: String },

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for MemberLink operations
pub type Result<T> = std::result::Result<T, MemberLinkError>;
