//! Error types for configuration and access planning

use std::path::PathBuf;
use thiserror::Error;

/// Failure to load a configuration document. Fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Configuration document {path} defines no networks or projects")]
    Empty { path: PathBuf },
}

/// Failure to plan a change for a request. Reported to the caller; the
/// process survives. The user-facing message stays generic; the variant
/// detail is for debug logging only.
#[derive(Debug, Error)]
pub enum AccessError {
    #[error("Unknown project: {project}")]
    UnknownProject { project: String },

    #[error("Network not within any permitted range: {network}")]
    NotPermitted { network: String },
}
