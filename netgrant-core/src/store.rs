//! Loaded, immutable view over the configuration documents

use crate::access::validator::parse_network;
use crate::config::{ConfigLoader, DeviceCredentials, PolicyConfig};
use crate::error::ConfigError;
use indexmap::IndexMap;
use ipnet::IpNet;
use std::path::PathBuf;
use tracing::warn;

/// One-time-loaded configuration. Read-only after construction, so it can be
/// shared across request-handling tasks without locking.
#[derive(Debug, Clone)]
pub struct Store {
    projects: IndexMap<String, String>,
    ranges: Vec<IpNet>,
    credentials: DeviceCredentials,
}

impl Store {
    /// Load both documents and build the store, falling back to the default
    /// path for any not given explicitly.
    pub fn load(
        policy: Option<PathBuf>,
        credentials: Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        let (policy, credentials) = ConfigLoader::load(policy, credentials)?;
        Ok(Self::new(policy, credentials))
    }

    /// Build the store from the two loaded documents. Every `networks` entry
    /// is parsed into a network range; entries that are not a valid
    /// network/prefix are dropped with a diagnostic. An empty resulting
    /// range set is not an error, but every later validation fails closed.
    pub fn new(policy: PolicyConfig, credentials: DeviceCredentials) -> Self {
        let mut ranges = Vec::with_capacity(policy.networks.len());

        for (name, value) in &policy.networks {
            match parse_network(value) {
                Some(net) => ranges.push(net),
                None => warn!("Dropping network {name}: {value} is not a valid network/prefix"),
            }
        }

        Self {
            projects: policy.projects,
            ranges,
            credentials,
        }
    }

    /// Resolve a project name to its device object-group identifier.
    /// Exact key match only.
    pub fn lookup_policy_group(&self, project: &str) -> Option<&str> {
        self.projects.get(project).map(String::as_str)
    }

    /// The permitted ranges in declaration order. The first matching entry
    /// wins during validation.
    pub fn permitted_ranges(&self) -> &[IpNet] {
        &self.ranges
    }

    pub fn credentials(&self) -> &DeviceCredentials {
        &self.credentials
    }
}
