//! Configuration file loading

use super::schema::{DeviceCredentials, PolicyConfig};
use crate::error::ConfigError;
use serde::de::DeserializeOwned;
use std::env;
use std::path::{Path, PathBuf};

pub struct ConfigLoader;

impl ConfigLoader {
    /// Get the default policy document path
    pub fn default_policy_path() -> PathBuf {
        // Priority order:
        // 1. $NETGRANT_POLICY
        // 2. $XDG_CONFIG_HOME/netgrant/policy.toml
        // 3. ~/.config/netgrant/policy.toml
        Self::default_path("NETGRANT_POLICY", "policy.toml")
    }

    /// Get the default credentials document path
    pub fn default_credentials_path() -> PathBuf {
        Self::default_path("NETGRANT_CREDENTIALS", "credentials.toml")
    }

    fn default_path(env_var: &str, file_name: &str) -> PathBuf {
        if let Ok(path) = env::var(env_var) {
            return PathBuf::from(path);
        }

        if let Ok(xdg) = env::var("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join("netgrant").join(file_name);
        }

        if let Ok(home) = env::var("HOME") {
            return PathBuf::from(home).join(".config/netgrant").join(file_name);
        }

        PathBuf::from(file_name)
    }

    /// Load the policy document from a file. A document defining neither
    /// networks nor projects is an error, same as an unreadable one.
    pub fn load_policy<P: AsRef<Path>>(path: P) -> Result<PolicyConfig, ConfigError> {
        let path = path.as_ref();
        let policy: PolicyConfig = Self::load_document(path)?;

        if policy.is_empty() {
            return Err(ConfigError::Empty {
                path: path.to_path_buf(),
            });
        }

        Ok(policy)
    }

    /// Load the credentials document from a file. Required connection fields
    /// are enforced by the schema, so an empty document fails to parse.
    pub fn load_credentials<P: AsRef<Path>>(path: P) -> Result<DeviceCredentials, ConfigError> {
        Self::load_document(path.as_ref())
    }

    /// Load both documents, falling back to the default path for any not
    /// given explicitly.
    pub fn load(
        policy: Option<PathBuf>,
        credentials: Option<PathBuf>,
    ) -> Result<(PolicyConfig, DeviceCredentials), ConfigError> {
        let policy_path = policy.unwrap_or_else(Self::default_policy_path);
        let credentials_path = credentials.unwrap_or_else(Self::default_credentials_path);

        let policy = Self::load_policy(policy_path)?;
        let credentials = Self::load_credentials(credentials_path)?;
        Ok((policy, credentials))
    }

    fn load_document<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }
}
