//! Error types for device session operations

use thiserror::Error;

pub type Result<T> = std::result::Result<T, GatewayError>;

/// Session or transmission failure. Opaque to callers and never retried.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Failed to start ssh client: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("Session I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Device session failed ({status}): {stderr}")]
    SessionFailed {
        status: std::process::ExitStatus,
        stderr: String,
    },
}
