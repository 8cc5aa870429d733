//! Inventory data model.
//!
//! An [`Inventory`] holds named groups and hosts, each with their own variable
//! mapping. Groups keep their member hosts and child groups in declaration
//! order, so everything derived from an inventory is reproducible across runs.
//!
//! Every inventory carries the two implicit groups Ansible defines:
//!
//! - `all`: parent of every top-level group
//! - `ungrouped`: hosts that belong to no other group
//!
//! The parsers in [`ini`] and [`yaml`] build an inventory through the
//! `add_*` methods and call [`Inventory::reconcile`] once they are done.

pub mod ini;
pub mod yaml;

use crate::error::{AnsimuxError, Result};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Variable mapping at group or host scope.
pub type Vars = BTreeMap<String, String>;

/// Name of the implicit group containing every host.
pub const ALL: &str = "all";

/// Name of the implicit group for hosts without any other group.
pub const UNGROUPED: &str = "ungrouped";

/// A named collection of hosts sharing group-scope variables.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Group {
    /// Group name, unique within the inventory.
    pub name: String,
    /// Directly assigned hosts, in declaration order.
    pub hosts: Vec<String>,
    /// Child group names, in declaration order.
    pub children: Vec<String>,
    /// Group-scope variables.
    pub vars: Vars,
}

/// A managed host and its host-scope variables.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Host {
    /// Host name, unique within the inventory.
    pub name: String,
    /// Host-scope variables.
    pub vars: Vars,
}

/// A parsed inventory.
#[derive(Debug, Clone)]
pub struct Inventory {
    groups: Vec<Group>,
    group_index: HashMap<String, usize>,
    hosts: Vec<Host>,
    host_index: HashMap<String, usize>,
}

impl Default for Inventory {
    fn default() -> Self {
        Self::new()
    }
}

impl Inventory {
    /// Create an inventory holding only the implicit `all` and `ungrouped` groups.
    pub fn new() -> Self {
        let mut inventory = Inventory {
            groups: Vec::new(),
            group_index: HashMap::new(),
            hosts: Vec::new(),
            host_index: HashMap::new(),
        };
        inventory.add_group(ALL);
        inventory.add_group(UNGROUPED);
        inventory
    }

    /// Get a group by name, creating it if it doesn't exist yet.
    pub fn add_group(&mut self, name: &str) -> &mut Group {
        let idx = match self.group_index.get(name) {
            Some(&idx) => idx,
            None => {
                self.groups.push(Group {
                    name: name.to_string(),
                    ..Group::default()
                });
                let idx = self.groups.len() - 1;
                self.group_index.insert(name.to_string(), idx);
                idx
            }
        };
        &mut self.groups[idx]
    }

    /// Get a host by name, creating it if it doesn't exist yet.
    pub fn add_host(&mut self, name: &str) -> &mut Host {
        let idx = match self.host_index.get(name) {
            Some(&idx) => idx,
            None => {
                self.hosts.push(Host {
                    name: name.to_string(),
                    ..Host::default()
                });
                let idx = self.hosts.len() - 1;
                self.host_index.insert(name.to_string(), idx);
                idx
            }
        };
        &mut self.hosts[idx]
    }

    /// Declare `host` as a member of `group`, creating either as needed.
    ///
    /// Re-adding an existing member keeps its original position.
    pub fn add_host_to_group(&mut self, group: &str, host: &str) {
        self.add_host(host);
        let group = self.add_group(group);
        if !group.hosts.iter().any(|h| h.as_str() == host) {
            group.hosts.push(host.to_string());
        }
    }

    /// Declare `child` as a child group of `parent`.
    ///
    /// # Errors
    ///
    /// Returns [`AnsimuxError::CircularGroup`] if `parent` is already a
    /// descendant of `child` (or the two are the same group).
    pub fn add_child(&mut self, parent: &str, child: &str) -> Result<()> {
        self.add_group(child);
        if parent == child || self.is_descendant(parent, child) {
            return Err(AnsimuxError::CircularGroup(format!("{} -> {}", parent, child)));
        }
        let group = self.add_group(parent);
        if !group.children.iter().any(|c| c.as_str() == child) {
            group.children.push(child.to_string());
        }
        Ok(())
    }

    /// Whether `name` is reachable from `ancestor` through child links.
    fn is_descendant(&self, name: &str, ancestor: &str) -> bool {
        let mut stack = vec![ancestor];
        let mut seen = HashSet::new();
        while let Some(current) = stack.pop() {
            if !seen.insert(current) {
                continue;
            }
            if let Some(group) = self.group(current) {
                for child in &group.children {
                    if child.as_str() == name {
                        return true;
                    }
                    stack.push(child.as_str());
                }
            }
        }
        false
    }

    /// Wire up the implicit groups once parsing is complete.
    ///
    /// Hosts with no group besides `all`/`ungrouped` become members of
    /// `ungrouped`. `ungrouped` and every group that is nobody's child
    /// become children of `all`, in declaration order.
    pub fn reconcile(&mut self) {
        let mut grouped = HashSet::new();
        let mut nested = HashSet::new();
        for group in &self.groups {
            if group.name != ALL && group.name != UNGROUPED {
                grouped.extend(group.hosts.iter().cloned());
            }
            if group.name != ALL {
                nested.extend(group.children.iter().cloned());
            }
        }

        let lonely: Vec<String> = self
            .hosts
            .iter()
            .filter(|h| !grouped.contains(&h.name))
            .map(|h| h.name.clone())
            .collect();
        for host in lonely {
            self.add_host_to_group(UNGROUPED, &host);
        }

        let top_level: Vec<String> = self
            .groups
            .iter()
            .filter(|g| g.name != ALL && !nested.contains(&g.name))
            .map(|g| g.name.clone())
            .collect();
        let all = self.add_group(ALL);
        for name in top_level {
            if !all.children.contains(&name) {
                all.children.push(name);
            }
        }
    }

    /// Look up a group by name.
    pub fn group(&self, name: &str) -> Option<&Group> {
        self.group_index.get(name).map(|&idx| &self.groups[idx])
    }

    /// Look up a host by name.
    pub fn host(&self, name: &str) -> Option<&Host> {
        self.host_index.get(name).map(|&idx| &self.hosts[idx])
    }

    /// All groups, in declaration order (`all` and `ungrouped` first).
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// All hosts, in declaration order.
    pub fn hosts(&self) -> &[Host] {
        &self.hosts
    }

    /// Every host of a group, including those of its descendants.
    ///
    /// The group's own hosts come first, followed by the hosts of each child
    /// group depth-first. A host reachable through several paths is listed
    /// once, at its first position. Returns `None` for an unknown group.
    pub fn hosts_of(&self, name: &str) -> Option<Vec<&Host>> {
        let group = self.group(name)?;
        let mut seen_hosts = HashSet::new();
        let mut seen_groups = HashSet::new();
        let mut result = Vec::new();
        self.collect_hosts(&group.name, &mut seen_groups, &mut seen_hosts, &mut result);
        Some(result)
    }

    fn collect_hosts<'a>(
        &'a self,
        name: &'a str,
        seen_groups: &mut HashSet<&'a str>,
        seen_hosts: &mut HashSet<&'a str>,
        result: &mut Vec<&'a Host>,
    ) {
        if !seen_groups.insert(name) {
            return;
        }
        let Some(group) = self.group(name) else {
            return;
        };
        for host_name in &group.hosts {
            if seen_hosts.insert(host_name.as_str()) {
                if let Some(host) = self.host(host_name) {
                    result.push(host);
                }
            }
        }
        for child in &group.children {
            self.collect_hosts(child, seen_groups, seen_hosts, result);
        }
    }
}
