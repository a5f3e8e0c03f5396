//! Object-group access planning for ASA-class firewalls
//!
//! Loads the policy and credentials documents, validates requested networks
//! against the permitted ranges, and synthesizes the configuration-line
//! batches the device gateway transmits. Pure: no network I/O happens here.

pub mod access;
pub mod config;
pub mod error;
pub mod store;

// Re-export commonly used types
pub use access::{plan_add, plan_purge, plan_remove, validate, RangeMatch};
pub use config::{ConfigLoader, DeviceCredentials, PolicyConfig};
pub use error::{AccessError, ConfigError};
pub use store::Store;
