//! Inventory group resolution.
//!
//! Resolves a group name to its hosts, each paired with its effective
//! variables: the group's own variables overlaid by the host's variables,
//! host winning on conflict.
//!
//! # Example
//!
//! ```ini
//! [web]
//! h1 ansible_user=deploy
//! h2 ansible_host=10.0.0.2
//!
//! [web:vars]
//! ansible_user=ops
//! ```
//!
//! Resolving `web` yields `h1` with `ansible_user=deploy` and `h2` with
//! `ansible_user=ops, ansible_host=10.0.0.2`.

use crate::error::{AnsimuxError, Result};
use crate::inventory::{Inventory, Vars};
use crate::ssh::SshTarget;

/// A host of the requested group with its effective variables.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedHost {
    /// Inventory host name.
    pub name: String,
    /// Group variables overlaid by host variables.
    pub vars: Vars,
}

impl ResolvedHost {
    /// Where to connect to this host.
    pub fn ssh_target(&self) -> SshTarget {
        SshTarget::from_vars(&self.name, &self.vars)
    }
}

/// Overlay `host` variables on a copy of `group` variables.
pub fn merge_vars(group: &Vars, host: &Vars) -> Vars {
    let mut merged = group.clone();
    merged.extend(host.iter().map(|(k, v)| (k.clone(), v.clone())));
    merged
}

/// Resolve every host of `group_name`, in inventory order.
///
/// `source` names the inventory in errors.
///
/// # Errors
///
/// Returns [`AnsimuxError::GroupNotFound`] if the group is not in the inventory.
pub fn resolve(inventory: &Inventory, source: &str, group_name: &str) -> Result<Vec<ResolvedHost>> {
    let not_found = || AnsimuxError::GroupNotFound {
        group: group_name.to_string(),
        inventory: source.to_string(),
    };
    let group = inventory.group(group_name).ok_or_else(not_found)?;
    let hosts = inventory.hosts_of(group_name).ok_or_else(not_found)?;

    let resolved: Vec<ResolvedHost> = hosts
        .into_iter()
        .map(|host| {
            let vars = merge_vars(&group.vars, &host.vars);
            log::trace!("{}: {:?}", host.name, vars);
            ResolvedHost {
                name: host.name.clone(),
                vars,
            }
        })
        .collect();

    log::debug!("Group '{}' resolved to {} hosts", group_name, resolved.len());
    Ok(resolved)
}
