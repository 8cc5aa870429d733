//! SSH connection targets.
//!
//! Turns a host's effective inventory variables into the `ssh` invocation
//! that each tmux window runs.

use crate::inventory::Vars;

/// Legacy user key, checked first.
pub const SSH_USER_KEY: &str = "ansible_ssh_user";
/// Current user key, used when the legacy key is absent or empty.
pub const USER_KEY: &str = "ansible_user";
/// Connection address key. Defaults to the host name.
pub const HOST_KEY: &str = "ansible_host";

/// Where and as whom to connect.
#[derive(Debug, Clone, PartialEq)]
pub struct SshTarget {
    /// Login user, empty when the inventory doesn't set one.
    pub user: String,
    /// Host name or IP address, never empty for a named host.
    pub address: String,
}

impl SshTarget {
    /// Resolve the target of `host_name` from its effective variables.
    ///
    /// # Examples
    ///
    /// ```
    /// use ansimux::inventory::Vars;
    /// use ansimux::ssh::SshTarget;
    ///
    /// let mut vars = Vars::new();
    /// vars.insert("ansible_user".into(), "deploy".into());
    ///
    /// let target = SshTarget::from_vars("h1", &vars);
    /// assert_eq!(target.command(), "ssh deploy@h1");
    /// ```
    pub fn from_vars(host_name: &str, vars: &Vars) -> Self {
        let user = non_empty(vars, SSH_USER_KEY)
            .or_else(|| non_empty(vars, USER_KEY))
            .unwrap_or_default();
        let address = non_empty(vars, HOST_KEY).unwrap_or(host_name);
        SshTarget {
            user: user.to_string(),
            address: address.to_string(),
        }
    }

    /// The `ssh` invocation: `ssh user@address`, or `ssh address` without a user.
    pub fn command(&self) -> String {
        if self.user.is_empty() {
            format!("ssh {}", self.address)
        } else {
            format!("ssh {}@{}", self.user, self.address)
        }
    }
}

fn non_empty<'a>(vars: &'a Vars, key: &str) -> Option<&'a str> {
    vars.get(key).map(String::as_str).filter(|v| !v.is_empty())
}
