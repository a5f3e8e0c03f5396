//! Configuration document schema types

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Policy document: named permitted networks and project-to-group assignments
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PolicyConfig {
    /// Logical name -> network/prefix string, in declaration order.
    /// Order matters: the first matching range wins during validation.
    #[serde(default)]
    pub networks: IndexMap<String, String>,
    /// Project name -> device object-group identifier
    #[serde(default)]
    pub projects: IndexMap<String, String>,
}

impl PolicyConfig {
    /// A document that defines neither networks nor projects is treated as
    /// absent by the loader.
    pub fn is_empty(&self) -> bool {
        self.networks.is_empty() && self.projects.is_empty()
    }
}

/// Credentials document: connection parameters for the device session.
/// Opaque to the planning core; handed to the gateway untouched.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeviceCredentials {
    /// Device management address
    pub host: String,
    #[serde(default = "default_ssh_port")]
    pub port: u16,
    pub username: String,
    #[serde(default)]
    pub password: Option<String>,
    /// Secret for privileged (enable) mode; the gateway falls back to the
    /// login password when unset
    #[serde(default)]
    pub enable_secret: Option<String>,
    #[serde(default = "default_device_type")]
    pub device_type: String,
    /// Shared secret required by the guarded HTTP endpoints; unset means
    /// unguarded
    #[serde(default)]
    pub api_key: Option<String>,
}

fn default_ssh_port() -> u16 {
    22
}

fn default_device_type() -> String {
    "cisco_asa".to_string()
}
