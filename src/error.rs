//! Error types for the sysmon client
//!
//! Provides a unified error type for all operations.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using SysmonError
pub type Result<T> = std::result::Result<T, SysmonError>;

/// Unified error type for sysmon client operations
#[derive(Debug, Error)]
pub enum SysmonError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Connection Errors
    // -------------------------------------------------------------------------
    #[error("Connection to {} failed: {source}", .path.display())]
    Connection {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Handshake failed: {0}")]
    Handshake(String),

    #[error("Connection closed: expected {expected} bytes, received {received}")]
    ConnectionClosed { expected: usize, received: usize },

    #[error("Timed out during {0}")]
    Timeout(&'static str),

    // -------------------------------------------------------------------------
    // Protocol Errors
    // -------------------------------------------------------------------------
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    #[error("Unknown field name: {0}")]
    UnknownField(String),

    #[error("Field overflow: {field} holds at most {max}, got {len}")]
    FieldOverflow {
        field: &'static str,
        len: usize,
        max: usize,
    },

    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("Payload too large: {len} bytes (max {max})")]
    PayloadTooLarge { len: usize, max: usize },

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}
