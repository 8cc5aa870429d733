//! Tmux directive generation and execution.
//!
//! Each host gets one directive: a shell command that opens a tmux window
//! running its SSH session. The first directive of a run is the bootstrap
//! form, which creates the session when it doesn't exist yet; every later
//! directive just adds a window to it.
//!
//! The session name is normalized and shell-quoted before substitution.
//! Host names and variables are substituted verbatim, so an inventory can
//! inject shell syntax.

use crate::error::{AnsimuxError, Result};
use crate::interpolate::render;
use crate::resolver::ResolvedHost;
use std::borrow::Cow;
use std::io::Write;
use std::path::Path;
use std::process::{Command, ExitStatus};

/// Adds a window to an existing session, or creates the session with that window.
pub const BOOTSTRAP_TEMPLATE: &str = "tmux has-session -t {session} 2> /dev/null \
    && tmux new-window -t {session}: -n {name} '{ssh}' \
    || tmux new-session -d -s {session} -n {name} '{ssh}'";

/// Adds a window to a session that already exists.
pub const STEADY_STATE_TEMPLATE: &str = "tmux new-window -t {session}: -n {name} '{ssh}'";

/// Separator used when printing all directives on one line.
pub const DISPLAY_SEPARATOR: &str = " && ";

/// Session name used when the working directory has no final component.
pub const FALLBACK_SESSION: &str = "ansimux";

/// The two directive forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    /// First directive of a run: create-or-attach.
    Bootstrap,
    /// Every later directive: new window.
    SteadyState,
}

impl Directive {
    /// The directive used at `position` in a run.
    pub fn at(position: usize) -> Self {
        if position == 0 {
            Directive::Bootstrap
        } else {
            Directive::SteadyState
        }
    }

    /// The shell template for this directive.
    pub fn template(&self) -> &'static str {
        match self {
            Directive::Bootstrap => BOOTSTRAP_TEMPLATE,
            Directive::SteadyState => STEADY_STATE_TEMPLATE,
        }
    }

    /// Fill in the template for one host.
    pub fn render(&self, session: &str, name: &str, ssh: &str) -> String {
        render(
            self.template(),
            &[("session", session), ("name", name), ("ssh", ssh)],
        )
    }
}

/// Positional directive selection: `Bootstrap` once, then `SteadyState` forever.
///
/// The iterator never returns `None`.
#[derive(Debug, Clone, Default)]
pub struct DirectiveSequence {
    position: usize,
}

impl DirectiveSequence {
    /// Start a fresh sequence.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Iterator for DirectiveSequence {
    type Item = Directive;

    fn next(&mut self) -> Option<Directive> {
        let directive = Directive::at(self.position);
        self.position = self.position.saturating_add(1);
        Some(directive)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}

/// Build one directive per host, in host order.
///
/// `session` goes through [`session_name`] and is shell-quoted, so every
/// directive targets the name tmux actually gives the session.
pub fn build(session: &str, hosts: &[ResolvedHost]) -> Vec<String> {
    let session = quote(&session_name(session));
    hosts
        .iter()
        .zip(DirectiveSequence::new())
        .map(|(host, directive)| {
            let ssh = host.ssh_target().command();
            directive.render(&session, &host.name, &ssh)
        })
        .collect()
}

/// Normalize a session name the way tmux does when creating a session:
/// `.` and `:` become `_`.
pub fn session_name(name: &str) -> String {
    name.chars()
        .filter(|&c| c != '\0')
        .map(|c| if c == '.' || c == ':' { '_' } else { c })
        .collect()
}

fn quote(word: &str) -> String {
    shlex::try_quote(word)
        .map(Cow::into_owned)
        .unwrap_or_else(|_| word.to_string())
}

/// Join directives for display.
///
/// The `&&` chaining is only how the summary reads; [`run_all`] runs each
/// directive in its own shell and does not stop on failure.
pub fn display(directives: &[String]) -> String {
    directives.join(DISPLAY_SEPARATOR)
}

/// Session name derived from a directory: its final path component,
/// normalized with [`session_name`].
pub fn session_name_for(dir: &Path) -> String {
    dir.file_name()
        .map(|n| session_name(&n.to_string_lossy()))
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| FALLBACK_SESSION.to_string())
}

/// Session name derived from the absolute current working directory.
///
/// # Errors
///
/// Returns [`AnsimuxError::IoError`] if the working directory can't be read.
pub fn default_session_name() -> Result<String> {
    let cwd = std::env::current_dir()?;
    Ok(session_name_for(&cwd))
}

/// Run a directive in a fresh `sh -c` and wait for it.
///
/// # Errors
///
/// Returns [`AnsimuxError::Spawn`] only if the shell can't be started. A
/// non-zero exit status is returned, not treated as an error.
pub fn run(directive: &str) -> Result<ExitStatus> {
    Command::new("sh")
        .args(["-c", directive])
        .status()
        .map_err(|source| AnsimuxError::Spawn {
            command: directive.to_string(),
            source,
        })
}

/// Run every directive in order, one shell each.
///
/// Failing directives are logged and do not stop the remaining ones.
pub fn run_all(directives: &[String]) -> Result<()> {
    for directive in directives {
        let status = run(directive)?;
        if !status.success() {
            log::warn!("Directive exited with {}: {}", status, directive);
        }
    }
    Ok(())
}

/// Print the directive summary and, unless `dry_run`, run the directives.
///
/// Writes the `&&`-joined summary line to `out`. Outside a dry run it also
/// writes a `running [...]` line and then runs each directive with
/// [`run_all`].
///
/// # Errors
///
/// Returns [`AnsimuxError::IoError`] if writing to `out` fails, or whatever
/// [`run_all`] returns.
pub fn launch(directives: &[String], dry_run: bool, out: &mut impl Write) -> Result<()> {
    writeln!(out, "{}", display(directives))?;
    if dry_run {
        log::debug!("Dry run, not running {} directives", directives.len());
        return Ok(());
    }
    writeln!(out, "running {:?}", directives)?;
    out.flush()?;
    run_all(directives)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::Vars;
    use std::path::PathBuf;

    fn host(name: &str, pairs: &[(&str, &str)]) -> ResolvedHost {
        ResolvedHost {
            name: name.to_string(),
            vars: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<Vars>(),
        }
    }

    #[test]
    fn test_sequence_bootstrap_once() {
        let seq: Vec<_> = DirectiveSequence::new().take(4).collect();
        assert_eq!(
            seq,
            vec![
                Directive::Bootstrap,
                Directive::SteadyState,
                Directive::SteadyState,
                Directive::SteadyState,
            ]
        );
    }

    #[test]
    fn test_sequence_is_unbounded() {
        let mut seq = DirectiveSequence::new();
        assert_eq!(seq.nth(10_000), Some(Directive::SteadyState));
        assert_eq!(seq.next(), Some(Directive::SteadyState));
    }

    #[test]
    fn test_build_web_group() {
        let hosts = vec![
            host("h1", &[("ansible_user", "deploy")]),
            host("h2", &[("ansible_host", "10.0.0.2")]),
        ];
        let directives = build("myproject", &hosts);
        assert_eq!(
            directives,
            vec![
                "tmux has-session -t myproject 2> /dev/null \
                 && tmux new-window -t myproject: -n h1 'ssh deploy@h1' \
                 || tmux new-session -d -s myproject -n h1 'ssh deploy@h1'"
                    .to_string(),
                "tmux new-window -t myproject: -n h2 'ssh 10.0.0.2'".to_string(),
            ]
        );
    }

    #[test]
    fn test_build_single_host_is_bootstrap() {
        let directives = build("s", &[host("only", &[])]);
        assert_eq!(directives.len(), 1);
        assert_eq!(
            directives[0],
            Directive::Bootstrap.render("s", "only", "ssh only")
        );
    }

    #[test]
    fn test_build_one_directive_per_host() {
        let hosts: Vec<_> = (0..5).map(|i| host(&format!("h{}", i), &[])).collect();
        let directives = build("s", &hosts);
        assert_eq!(directives.len(), 5);
        assert!(directives[0].starts_with("tmux has-session"));
        for (i, d) in directives.iter().enumerate().skip(1) {
            assert_eq!(*d, format!("tmux new-window -t s: -n h{} 'ssh h{}'", i, i));
        }
    }

    #[test]
    fn test_build_no_hosts() {
        assert!(build("s", &[]).is_empty());
    }

    #[test]
    fn test_display_joins_with_and() {
        let directives = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        assert_eq!(display(&directives), "a && b && c");
    }

    #[test]
    fn test_session_name_for() {
        assert_eq!(
            session_name_for(&PathBuf::from("/home/user/myproject")),
            "myproject"
        );
        assert_eq!(session_name_for(&PathBuf::from("/")), FALLBACK_SESSION);
        assert_eq!(
            session_name_for(&PathBuf::from("/home/u/infra.example.com")),
            "infra_example_com"
        );
    }

    #[test]
    fn test_session_name_matches_tmux() {
        assert_eq!(session_name("ops"), "ops");
        assert_eq!(session_name("a.b:c"), "a_b_c");
    }

    #[test]
    fn test_build_targets_normalized_session() {
        let hosts = vec![host("h1", &[]), host("h2", &[])];
        let directives = build("infra.example.com", &hosts);
        assert_eq!(
            directives[0],
            "tmux has-session -t infra_example_com 2> /dev/null \
             && tmux new-window -t infra_example_com: -n h1 'ssh h1' \
             || tmux new-session -d -s infra_example_com -n h1 'ssh h1'"
        );
        assert_eq!(
            directives[1],
            "tmux new-window -t infra_example_com: -n h2 'ssh h2'"
        );
    }

    #[test]
    fn test_build_quotes_session_with_spaces() {
        let directives = build("my project", &[host("h1", &[]), host("h2", &[])]);
        assert!(directives[0].starts_with("tmux has-session -t 'my project' 2> /dev/null"));
        assert!(directives[0].ends_with("tmux new-session -d -s 'my project' -n h1 'ssh h1'"));
        assert_eq!(
            directives[1],
            "tmux new-window -t 'my project': -n h2 'ssh h2'"
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_launch_dry_run_only_prints() {
        let dir = tempfile::TempDir::new().unwrap();
        let marker = dir.path().join("ran");
        let directives = vec![format!("touch '{}'", marker.display())];
        let mut out = Vec::new();

        launch(&directives, true, &mut out).unwrap();

        let printed = String::from_utf8(out).unwrap();
        assert_eq!(printed, format!("{}\n", directives[0]));
        assert!(!marker.exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_launch_runs_each_directive() {
        let dir = tempfile::TempDir::new().unwrap();
        let first = dir.path().join("first");
        let second = dir.path().join("second");
        let directives = vec![
            format!("touch '{}'", first.display()),
            format!("touch '{}'", second.display()),
        ];
        let mut out = Vec::new();

        launch(&directives, false, &mut out).unwrap();

        let printed = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = printed.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], display(&directives));
        assert_eq!(lines[1], format!("running {:?}", directives));
        assert!(first.exists());
        assert!(second.exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_run_reports_exit_status() {
        assert!(run("true").unwrap().success());
        assert!(!run("exit 3").unwrap().success());
    }

    #[cfg(unix)]
    #[test]
    fn test_run_all_continues_after_failure() {
        let dir = tempfile::TempDir::new().unwrap();
        let marker = dir.path().join("ran");
        let directives = vec![
            "false".to_string(),
            format!("touch '{}'", marker.display()),
        ];
        run_all(&directives).unwrap();
        assert!(marker.exists());
    }
}
