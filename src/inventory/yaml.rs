//! Ansible YAML inventory parsing.
//!
//! ```yaml
//! all:
//!   vars:
//!     ansible_user: ops
//!   children:
//!     web:
//!       hosts:
//!         h1:
//!           ansible_host: 10.0.0.1
//!         h2:
//! ```
//!
//! Mappings keep document order, so host order follows the file.

use super::{Inventory, Vars};
use crate::error::{AnsimuxError, Result};
use serde_yaml::{Mapping, Value};

/// Parse a YAML inventory.
///
/// # Errors
///
/// - [`AnsimuxError::YamlError`] if the document is not valid YAML
/// - [`AnsimuxError::InvalidYaml`] if it is not shaped like an inventory
/// - [`AnsimuxError::CircularGroup`] if `children` form a cycle
pub fn parse(contents: &str) -> Result<Inventory> {
    let mut inventory = Inventory::new();
    if contents.trim().is_empty() {
        inventory.reconcile();
        return Ok(inventory);
    }
    let doc: Value = serde_yaml::from_str(contents)?;

    match doc {
        Value::Null => {}
        Value::Mapping(groups) => {
            for (name, body) in &groups {
                let name = key_str(name)?;
                parse_group(&mut inventory, &name, body)?;
            }
        }
        _ => {
            return Err(AnsimuxError::InvalidYaml(
                "top level must be a mapping of groups".into(),
            ));
        }
    }

    inventory.reconcile();
    Ok(inventory)
}

fn parse_group(inventory: &mut Inventory, name: &str, body: &Value) -> Result<()> {
    inventory.add_group(name);
    let body = match body {
        Value::Null => return Ok(()),
        Value::Mapping(m) => m,
        _ => {
            return Err(AnsimuxError::InvalidYaml(format!(
                "group '{}' must be a mapping",
                name
            )));
        }
    };

    for (key, value) in body {
        match key_str(key)?.as_str() {
            "hosts" => {
                for (host, vars) in section(name, "hosts", value)? {
                    let host = key_str(host)?;
                    inventory.add_host_to_group(name, &host);
                    let parsed = to_vars(&format!("host '{}'", host), vars)?;
                    inventory.add_host(&host).vars.extend(parsed);
                }
            }
            "vars" => {
                let parsed = to_vars(&format!("vars of group '{}'", name), value)?;
                inventory.add_group(name).vars.extend(parsed);
            }
            "children" => {
                for (child, child_body) in section(name, "children", value)? {
                    let child = key_str(child)?;
                    inventory.add_child(name, &child)?;
                    parse_group(inventory, &child, child_body)?;
                }
            }
            other => {
                return Err(AnsimuxError::InvalidYaml(format!(
                    "unexpected key '{}' in group '{}'",
                    other, name
                )));
            }
        }
    }
    Ok(())
}

/// Borrow a `hosts`/`children` mapping. A null section is treated as empty.
fn section<'a>(group: &str, key: &str, value: &'a Value) -> Result<Vec<(&'a Value, &'a Value)>> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Mapping(m) => Ok(m.iter().collect()),
        _ => Err(AnsimuxError::InvalidYaml(format!(
            "'{}' of group '{}' must be a mapping",
            key, group
        ))),
    }
}

fn to_vars(what: &str, value: &Value) -> Result<Vars> {
    match value {
        Value::Null => Ok(Vars::new()),
        Value::Mapping(m) => mapping_to_vars(what, m),
        _ => Err(AnsimuxError::InvalidYaml(format!("{} must be a mapping", what))),
    }
}

fn mapping_to_vars(what: &str, mapping: &Mapping) -> Result<Vars> {
    let mut vars = Vars::new();
    for (key, value) in mapping {
        let key = key_str(key)?;
        let value = scalar_str(value).ok_or_else(|| {
            AnsimuxError::InvalidYaml(format!("{}: '{}' is not a scalar value", what, key))
        })?;
        vars.insert(key, value);
    }
    Ok(vars)
}

/// Render a scalar as text. Sequences and mappings have no textual form here.
fn scalar_str(value: &Value) -> Option<String> {
    match value {
        Value::Null => Some(String::new()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.clone()),
        Value::Tagged(tagged) => scalar_str(&tagged.value),
        Value::Sequence(_) | Value::Mapping(_) => None,
    }
}

fn key_str(key: &Value) -> Result<String> {
    match key {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        _ => Err(AnsimuxError::InvalidYaml(format!(
            "mapping keys must be scalars, got {:?}",
            key
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn host_names(inv: &Inventory, group: &str) -> Vec<String> {
        inv.hosts_of(group)
            .unwrap()
            .iter()
            .map(|h| h.name.clone())
            .collect()
    }

    #[test]
    fn test_parse_nested_children() {
        let inv = parse(
            "
all:
  vars:
    ansible_user: ops
  hosts:
    bastion:
  children:
    web:
      hosts:
        w2:
          ansible_host: 10.0.0.2
          ansible_port: 2222
        w1:
    db:
      vars:
        ansible_ssh_user: postgres
      hosts:
        d1:
",
        )
        .unwrap();

        assert_eq!(host_names(&inv, "web"), vec!["w2", "w1"]);
        assert_eq!(host_names(&inv, "all"), vec!["bastion", "w2", "w1", "d1"]);
        assert_eq!(inv.group("all").unwrap().vars.get("ansible_user").unwrap(), "ops");
        assert_eq!(
            inv.group("db").unwrap().vars.get("ansible_ssh_user").unwrap(),
            "postgres"
        );

        let w2 = inv.host("w2").unwrap();
        assert_eq!(w2.vars.get("ansible_host").unwrap(), "10.0.0.2");
        assert_eq!(w2.vars.get("ansible_port").unwrap(), "2222");
    }

    #[test]
    fn test_top_level_groups_join_all() {
        let inv = parse("web:\n  hosts:\n    h1:\nlonely:\n").unwrap();
        assert_eq!(
            inv.group("all").unwrap().children,
            vec!["ungrouped", "web", "lonely"]
        );
        assert!(inv.hosts_of("lonely").unwrap().is_empty());
    }

    #[test]
    fn test_empty_document() {
        let inv = parse("").unwrap();
        assert!(inv.hosts_of("all").unwrap().is_empty());
    }

    #[test]
    fn test_rejects_non_mapping_group() {
        let err = parse("web: [h1, h2]\n").unwrap_err();
        assert!(matches!(err, AnsimuxError::InvalidYaml(_)));
    }

    #[test]
    fn test_rejects_nested_var_values() {
        let err = parse("web:\n  hosts:\n    h1:\n      ports: [1, 2]\n").unwrap_err();
        assert!(matches!(err, AnsimuxError::InvalidYaml(_)));
    }

    #[test]
    fn test_rejects_unknown_group_key() {
        let err = parse("web:\n  host:\n    h1:\n").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid YAML inventory: unexpected key 'host' in group 'web'"
        );
    }
}
