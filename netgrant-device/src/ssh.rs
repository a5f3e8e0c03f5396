//! SSH-driven gateway implementation
//!
//! Drives the device through a spawned ssh client process, feeding the
//! privileged-mode command script to the session's stdin. Password
//! authentication goes through sshpass; key-based sessions call ssh
//! directly.

use crate::error::{GatewayError, Result};
use crate::gateway::DeviceGateway;
use async_trait::async_trait;
use netgrant_core::DeviceCredentials;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, warn};

pub struct SshGateway {
    credentials: DeviceCredentials,
}

impl SshGateway {
    pub fn new(credentials: DeviceCredentials) -> Self {
        if !credentials.device_type.starts_with("cisco") {
            warn!(
                "Unrecognized device type {}; driving with the generic enable/configure dialect",
                credentials.device_type
            );
        }
        Self { credentials }
    }
}

#[async_trait]
impl DeviceGateway for SshGateway {
    async fn apply(&self, lines: &[String], persist: bool) -> Result<()> {
        let argv = ssh_invocation(&self.credentials);
        let script = session_script(lines, enable_secret(&self.credentials), persist);

        debug!("Opening session to {}", self.credentials.host);

        let mut child = Command::new(&argv[0])
            .args(&argv[1..])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(GatewayError::Spawn)?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(script.as_bytes()).await?;
            // Dropping stdin sends EOF and ends the session
        }

        let output = child.wait_with_output().await?;

        if !output.status.success() {
            return Err(GatewayError::SessionFailed {
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        debug!(
            "Session to {} closed cleanly ({} lines sent)",
            self.credentials.host,
            lines.len()
        );
        Ok(())
    }
}

/// The full argv for the client process. Separated from spawning so the
/// invocation is testable.
fn ssh_invocation(credentials: &DeviceCredentials) -> Vec<String> {
    let mut argv = Vec::new();

    if let Some(password) = &credentials.password {
        argv.extend([
            "sshpass".to_string(),
            "-p".to_string(),
            password.clone(),
        ]);
    }

    argv.extend([
        "ssh".to_string(),
        "-T".to_string(),
        "-p".to_string(),
        credentials.port.to_string(),
        "-o".to_string(),
        "StrictHostKeyChecking=accept-new".to_string(),
        "-o".to_string(),
        "ConnectTimeout=10".to_string(),
        format!("{}@{}", credentials.username, credentials.host),
    ]);

    argv
}

/// Secret sent to the enable prompt: the enable secret when configured,
/// the login password otherwise.
fn enable_secret(credentials: &DeviceCredentials) -> &str {
    credentials
        .enable_secret
        .as_deref()
        .or(credentials.password.as_deref())
        .unwrap_or_default()
}

/// The command script for one session: elevate, enter configuration mode,
/// transmit the batch verbatim and in order, optionally persist, close.
fn session_script(lines: &[String], enable_secret: &str, persist: bool) -> String {
    let mut script = String::new();
    script.push_str("enable\n");
    script.push_str(enable_secret);
    script.push('\n');
    script.push_str("configure terminal\n");

    for line in lines {
        script.push_str(line);
        script.push('\n');
    }

    script.push_str("end\n");
    if persist {
        script.push_str("write memory\n");
    }
    script.push_str("exit\n");

    script
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_credentials(extra: &str) -> DeviceCredentials {
        let base = r#"
host = "198.51.100.1"
username = "admin"
"#;
        toml::from_str(&format!("{base}{extra}")).unwrap()
    }

    #[test]
    fn test_invocation_with_password_uses_sshpass() {
        let creds = test_credentials("password = \"secret\"\n");
        let argv = ssh_invocation(&creds);

        assert_eq!(&argv[..4], ["sshpass", "-p", "secret", "ssh"]);
        assert_eq!(argv.last().unwrap(), "admin@198.51.100.1");
    }

    #[test]
    fn test_invocation_without_password_calls_ssh_directly() {
        let creds = test_credentials("");
        let argv = ssh_invocation(&creds);

        assert_eq!(argv[0], "ssh");
        assert!(argv.contains(&"22".to_string()));
    }

    #[test]
    fn test_invocation_honors_configured_port() {
        let creds = test_credentials("port = 2222\n");
        let argv = ssh_invocation(&creds);
        assert!(argv.contains(&"2222".to_string()));
    }

    #[test]
    fn test_enable_secret_falls_back_to_password() {
        let creds = test_credentials("password = \"secret\"\n");
        assert_eq!(enable_secret(&creds), "secret");

        let creds = test_credentials("password = \"secret\"\nenable_secret = \"higher\"\n");
        assert_eq!(enable_secret(&creds), "higher");

        let creds = test_credentials("");
        assert_eq!(enable_secret(&creds), "");
    }

    #[test]
    fn test_script_carries_batch_verbatim_in_order() {
        let lines = vec![
            "object-group network WEB_GRP".to_string(),
            "network-object host 10.0.0.5".to_string(),
        ];
        let script = session_script(&lines, "higher", false);

        let expected = "enable\n\
                        higher\n\
                        configure terminal\n\
                        object-group network WEB_GRP\n\
                        network-object host 10.0.0.5\n\
                        end\n\
                        exit\n";
        assert_eq!(script, expected);
    }

    #[test]
    fn test_script_persists_only_when_requested() {
        let lines = vec!["object-group network GRP".to_string()];

        let unsaved = session_script(&lines, "s", false);
        assert!(!unsaved.contains("write memory"));

        let saved = session_script(&lines, "s", true);
        let end = saved.find("end\n").unwrap();
        let write = saved.find("write memory\n").unwrap();
        assert!(write > end);
    }
}
