//! Ansible INI inventory parsing.
//!
//! # Format
//!
//! ```ini
//! # hosts before any section are ungrouped
//! bastion.example.com
//!
//! [web]
//! web[01:03].example.com ansible_user=deploy
//! db.example.com:2222 ansible_host=10.0.0.5
//!
//! [web:vars]
//! ansible_ssh_user="admin"
//!
//! [prod:children]
//! web
//! ```

use super::{Inventory, UNGROUPED};
use crate::error::{AnsimuxError, Result};
use std::collections::HashMap;

/// The kind of section a line belongs to.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Section {
    Hosts,
    Vars,
    Children,
}

/// Parse an INI inventory.
///
/// `source` is only used to label errors.
///
/// # Errors
///
/// Returns [`AnsimuxError::InventoryParse`] for malformed lines or sections,
/// `:vars` sections of groups that are never declared, and `:children`
/// entries that would form a cycle.
pub fn parse(source: &str, contents: &str) -> Result<Inventory> {
    let mut inventory = Inventory::new();
    let mut group = UNGROUPED.to_string();
    let mut section = Section::Hosts;
    // Groups only seen in a `:vars` header, with the line it appeared on.
    let mut pending: HashMap<String, usize> = HashMap::new();

    let err = |line: usize, message: String| AnsimuxError::InventoryParse {
        path: source.to_string(),
        line,
        message,
    };

    for (idx, raw) in contents.lines().enumerate() {
        let lineno = idx + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        if line.starts_with('[') {
            let (name, kind) = parse_section(line).map_err(|m| err(lineno, m))?;
            match kind {
                Section::Vars => {
                    if inventory.group(&name).is_none() {
                        pending.entry(name.clone()).or_insert(lineno);
                    }
                }
                Section::Hosts | Section::Children => {
                    pending.remove(&name);
                }
            }
            inventory.add_group(&name);
            group = name;
            section = kind;
            continue;
        }

        match section {
            Section::Hosts => parse_host_line(&mut inventory, &group, line)
                .map_err(|m| err(lineno, m))?,
            Section::Vars => {
                let (key, value) = split_var(line)
                    .ok_or_else(|| err(lineno, format!("expected key=value, got '{}'", line)))?;
                inventory.add_group(&group).vars.insert(key, value);
            }
            Section::Children => {
                let child = strip_comment(line);
                pending.remove(child);
                inventory
                    .add_child(&group, child)
                    .map_err(|e| err(lineno, e.to_string()))?;
            }
        }
    }

    if let Some((name, line)) = pending.into_iter().min_by_key(|(_, line)| *line) {
        return Err(err(
            line,
            format!("section [{}:vars] refers to undefined group", name),
        ));
    }

    inventory.reconcile();
    Ok(inventory)
}

/// Parse a `[name]`, `[name:vars]` or `[name:children]` header.
fn parse_section(line: &str) -> std::result::Result<(String, Section), String> {
    let inner = strip_comment(line)
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .ok_or_else(|| format!("malformed section header '{}'", line))?;

    let (name, kind) = match inner.split_once(':') {
        Some((name, "vars")) => (name, Section::Vars),
        Some((name, "children")) => (name, Section::Children),
        Some((_, other)) => return Err(format!("unknown section type ':{}'", other)),
        None => (inner, Section::Hosts),
    };

    if name.is_empty() || name.chars().any(char::is_whitespace) {
        return Err(format!("invalid group name '{}'", name));
    }
    Ok((name.to_string(), kind))
}

/// Parse `pattern [key=value ...]` and add the expanded hosts to `group`.
fn parse_host_line(
    inventory: &mut Inventory,
    group: &str,
    line: &str,
) -> std::result::Result<(), String> {
    let tokens = shlex::split(line).ok_or_else(|| format!("unbalanced quotes in '{}'", line))?;
    let mut tokens = tokens.into_iter().take_while(|t| !t.starts_with('#'));
    let pattern = tokens
        .next()
        .ok_or_else(|| format!("missing host name in '{}'", line))?;

    let mut vars = Vec::new();
    for token in tokens {
        let (key, value) = token
            .split_once('=')
            .ok_or_else(|| format!("expected key=value, got '{}'", token))?;
        vars.push((key.to_string(), value.to_string()));
    }

    let (pattern, port) = split_port(&pattern);
    for name in expand_hosts(pattern)? {
        inventory.add_host_to_group(group, &name);
        let host = inventory.add_host(&name);
        if let Some(port) = port {
            host.vars.insert("ansible_port".to_string(), port.to_string());
        }
        for (key, value) in &vars {
            host.vars.insert(key.clone(), value.clone());
        }
    }
    Ok(())
}

/// Split `host:port` into its parts. IPv6 addresses and range brackets are left alone.
fn split_port(pattern: &str) -> (&str, Option<&str>) {
    if let Some((host, port)) = pattern.rsplit_once(':') {
        let host_has_colon = {
            let mut depth = 0usize;
            host.chars().any(|c| {
                match c {
                    '[' => depth += 1,
                    ']' => depth = depth.saturating_sub(1),
                    ':' if depth == 0 => return true,
                    _ => {}
                }
                false
            })
        };
        if !port.is_empty() && port.chars().all(|c| c.is_ascii_digit()) && !host_has_colon {
            return (host, Some(port));
        }
    }
    (pattern, None)
}

/// Expand `[start:end]` / `[start:end:stride]` ranges in a host pattern.
///
/// Numeric ranges keep the zero padding of `start`; alphabetic ranges take
/// single letters. Several ranges in one pattern expand as a cross product.
///
/// ```
/// use ansimux::inventory::ini::expand_hosts;
///
/// assert_eq!(
///     expand_hosts("web[01:03]").unwrap(),
///     vec!["web01", "web02", "web03"]
/// );
/// assert_eq!(expand_hosts("db-[a:c]").unwrap(), vec!["db-a", "db-b", "db-c"]);
/// ```
pub fn expand_hosts(pattern: &str) -> std::result::Result<Vec<String>, String> {
    let Some(open) = pattern.find('[') else {
        return Ok(vec![pattern.to_string()]);
    };
    let close = pattern[open..]
        .find(']')
        .map(|i| open + i)
        .ok_or_else(|| format!("unterminated range in '{}'", pattern))?;

    let head = &pattern[..open];
    let range = &pattern[open + 1..close];
    let tails = expand_hosts(&pattern[close + 1..])?;

    let parts: Vec<&str> = range.split(':').collect();
    let (start, end, stride) = match parts.as_slice() {
        [start, end] => (*start, *end, "1"),
        [start, end, stride] => (*start, *end, *stride),
        _ => return Err(format!("invalid range '[{}]'", range)),
    };
    let stride: usize = stride
        .parse()
        .ok()
        .filter(|&s| s > 0)
        .ok_or_else(|| format!("invalid stride in '[{}]'", range))?;

    let values = expand_range(if start.is_empty() { "0" } else { start }, end, stride)
        .ok_or_else(|| format!("invalid range '[{}]'", range))?;

    let mut result = Vec::with_capacity(values.len() * tails.len());
    for value in &values {
        for tail in &tails {
            result.push(format!("{}{}{}", head, value, tail));
        }
    }
    Ok(result)
}

fn expand_range(start: &str, end: &str, stride: usize) -> Option<Vec<String>> {
    if let (Ok(first), Ok(last)) = (start.parse::<u64>(), end.parse::<u64>()) {
        if first > last {
            return None;
        }
        let width = if start.len() > 1 && start.starts_with('0') {
            start.len()
        } else {
            0
        };
        return Some(
            (first..=last)
                .step_by(stride)
                .map(|n| format!("{:0width$}", n, width = width))
                .collect(),
        );
    }

    let mut first = start.chars();
    let mut last = end.chars();
    match (first.next(), first.next(), last.next(), last.next()) {
        (Some(a), None, Some(b), None) if a.is_ascii_alphabetic() && b.is_ascii_alphabetic() => {
            if a > b {
                return None;
            }
            Some((a..=b).step_by(stride).map(String::from).collect())
        }
        _ => None,
    }
}

/// Split a `key=value` variable line, trimming both sides and unquoting the value.
fn split_var(line: &str) -> Option<(String, String)> {
    let (key, value) = line.split_once('=')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    Some((key.to_string(), unquote(value.trim()).to_string()))
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

fn strip_comment(line: &str) -> &str {
    match line.find(" #").or_else(|| line.find(" ;")) {
        Some(idx) => line[..idx].trim_end(),
        None => line,
    }
}
