//! End-to-end tests: inventory file on disk to tmux directives.

use ansimux::{AnsimuxError, loader, resolver, tmux};
use std::fs;
use tempfile::TempDir;

fn directives_for(
    path: &std::path::Path,
    group: &str,
    session: &str,
) -> ansimux::Result<Vec<String>> {
    let inventory = loader::load_inventory(path)?;
    let hosts = resolver::resolve(&inventory, &path.display().to_string(), group)?;
    Ok(tmux::build(session, &hosts))
}

#[test]
fn test_ini_web_group() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("hosts");
    fs::write(&path, "[web]\nh1 ansible_user=deploy\nh2 ansible_host=10.0.0.2\n")
        .expect("Failed to write inventory");

    let directives = directives_for(&path, "web", "myproject").unwrap();

    assert_eq!(directives.len(), 2);
    assert_eq!(
        directives[0],
        tmux::Directive::Bootstrap.render("myproject", "h1", "ssh deploy@h1")
    );
    assert_eq!(
        directives[1],
        tmux::Directive::SteadyState.render("myproject", "h2", "ssh 10.0.0.2")
    );
    assert_eq!(
        tmux::display(&directives),
        format!("{} && {}", directives[0], directives[1])
    );
}

#[test]
fn test_yaml_group_vars_and_children() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("inventory.yml");
    fs::write(
        &path,
        "\
prod:
  vars:
    ansible_ssh_user: admin
  hosts:
    p1:
  children:
    db:
      hosts:
        d1:
          ansible_host: 10.1.0.1
          ansible_ssh_user: postgres
",
    )
    .expect("Failed to write inventory");

    let directives = directives_for(&path, "prod", "ops").unwrap();

    assert_eq!(
        directives,
        vec![
            tmux::Directive::Bootstrap.render("ops", "p1", "ssh admin@p1"),
            tmux::Directive::SteadyState.render("ops", "d1", "ssh postgres@10.1.0.1"),
        ]
    );
}

#[test]
fn test_unknown_group_names_inventory() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("hosts");
    fs::write(&path, "[web]\nh1\n").expect("Failed to write inventory");

    let err = directives_for(&path, "db", "s").unwrap_err();
    assert!(matches!(err, AnsimuxError::GroupNotFound { .. }));
    let message = err.to_string();
    assert!(message.contains("'db'"));
    assert!(message.contains(&path.display().to_string()));
}

#[test]
fn test_missing_inventory_file() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let err = directives_for(&dir.path().join("absent"), "all", "s").unwrap_err();
    assert!(matches!(err, AnsimuxError::InventoryNotFound(_)));
}

#[test]
fn test_all_group_covers_every_host() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("hosts");
    fs::write(&path, "lonely\n[web]\nweb[1:2]\n[db]\ndb1:2222\n")
        .expect("Failed to write inventory");

    let directives = directives_for(&path, "all", "s").unwrap();

    assert_eq!(
        directives,
        vec![
            tmux::Directive::Bootstrap.render("s", "lonely", "ssh lonely"),
            tmux::Directive::SteadyState.render("s", "web1", "ssh web1"),
            tmux::Directive::SteadyState.render("s", "web2", "ssh web2"),
            tmux::Directive::SteadyState.render("s", "db1", "ssh db1"),
        ]
    );
}
