//! Device session gateway trait

use crate::error::Result;
use async_trait::async_trait;

/// A management session to the firewall device.
///
/// `apply` opens a session, elevates privilege, enters configuration mode,
/// transmits the lines verbatim and in order as a single batch, optionally
/// persists the running configuration, and closes the session. Failures are
/// opaque to callers and never retried here; retry policy belongs to whoever
/// owns the request.
#[async_trait]
pub trait DeviceGateway: Send + Sync {
    async fn apply(&self, lines: &[String], persist: bool) -> Result<()>;
}
