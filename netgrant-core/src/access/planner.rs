//! Change planning: resolve the project, validate the network, synthesize
//! the batch. No lines are produced unless every step succeeds.

use super::synthesizer::synthesize;
use super::validator::validate;
use crate::error::AccessError;
use crate::store::Store;
use tracing::debug;

/// Plan adding one network to a project's object group.
pub fn plan_add(store: &Store, project: &str, network: &str) -> Result<Vec<String>, AccessError> {
    plan_member_change(store, project, network, false)
}

/// Plan removing one network from a project's object group.
pub fn plan_remove(store: &Store, project: &str, network: &str) -> Result<Vec<String>, AccessError> {
    plan_member_change(store, project, network, true)
}

fn plan_member_change(
    store: &Store,
    project: &str,
    network: &str,
    removal: bool,
) -> Result<Vec<String>, AccessError> {
    let group = store
        .lookup_policy_group(project)
        .ok_or_else(|| AccessError::UnknownProject {
            project: project.to_string(),
        })?;

    let matched =
        validate(network, store.permitted_ranges()).ok_or_else(|| AccessError::NotPermitted {
            network: network.to_string(),
        })?;

    debug!(
        "Accepted {network} for project {project} via permitted range {}",
        matched.permitted
    );
    Ok(synthesize(group, &[matched.requested], removal))
}

/// Plan removing every configured network from a project's object group.
/// Invalid configuration entries were already dropped at load time, so the
/// batch covers the whole permitted list in declaration order.
pub fn plan_purge(store: &Store, project: &str) -> Result<Vec<String>, AccessError> {
    let group = store
        .lookup_policy_group(project)
        .ok_or_else(|| AccessError::UnknownProject {
            project: project.to_string(),
        })?;

    debug!(
        "Purging {} configured networks from project {project}",
        store.permitted_ranges().len()
    );
    Ok(synthesize(group, store.permitted_ranges(), true))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DeviceCredentials, PolicyConfig};

    fn test_store() -> Store {
        let policy: PolicyConfig = toml::from_str(
            r#"
[networks]
lab = "10.0.0.0/24"
dmz = "192.0.2.0/25"

[projects]
web = "WEB_GRP"
"#,
        )
        .unwrap();
        let credentials: DeviceCredentials = toml::from_str(
            r#"
host = "198.51.100.1"
username = "admin"
password = "secret"
"#,
        )
        .unwrap();
        Store::new(policy, credentials)
    }

    #[test]
    fn test_plan_add_host() {
        let lines = plan_add(&test_store(), "web", "10.0.0.5/32").unwrap();
        assert_eq!(
            lines,
            ["object-group network WEB_GRP", "network-object host 10.0.0.5"]
        );
    }

    #[test]
    fn test_plan_remove_range() {
        let lines = plan_remove(&test_store(), "web", "10.0.0.0/24").unwrap();
        assert_eq!(
            lines,
            [
                "object-group network WEB_GRP",
                "no network-object 10.0.0.0 255.255.255.0"
            ]
        );
    }

    #[test]
    fn test_unknown_project_produces_no_lines() {
        let result = plan_add(&test_store(), "nonexistent", "10.0.0.5");
        assert!(matches!(result, Err(AccessError::UnknownProject { .. })));
    }

    #[test]
    fn test_network_outside_ranges_produces_no_lines() {
        let result = plan_add(&test_store(), "web", "192.168.1.1");
        assert!(matches!(result, Err(AccessError::NotPermitted { .. })));
    }

    #[test]
    fn test_malformed_network_produces_no_lines() {
        let result = plan_add(&test_store(), "web", "10.0.0./24");
        assert!(matches!(result, Err(AccessError::NotPermitted { .. })));
    }

    #[test]
    fn test_plan_purge_covers_all_networks_in_order() {
        let lines = plan_purge(&test_store(), "web").unwrap();
        assert_eq!(
            lines,
            [
                "object-group network WEB_GRP",
                "no network-object 10.0.0.0 255.255.255.0",
                "no network-object 192.0.2.0 255.255.255.128",
            ]
        );
    }

    #[test]
    fn test_plan_purge_unknown_project() {
        let result = plan_purge(&test_store(), "nonexistent");
        assert!(matches!(result, Err(AccessError::UnknownProject { .. })));
    }
}
