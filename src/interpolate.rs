//! Placeholder substitution for directive templates.
//!
//! Templates reference values as `{key}`. Substitution is a single pass over
//! the template, so a substituted value containing `{...}` is left as is.
//!
//! # Example
//!
//! ```
//! use ansimux::interpolate::render;
//!
//! let cmd = render("tmux new-window -n {name} '{ssh}'", &[
//!     ("name", "web1"),
//!     ("ssh", "ssh deploy@web1"),
//! ]);
//! assert_eq!(cmd, "tmux new-window -n web1 'ssh deploy@web1'");
//! ```

/// Replace every `{key}` in `template` with its value from `values`.
///
/// Unknown placeholders and unmatched braces are copied through unchanged.
pub fn render(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let replacement = after.find('}').and_then(|close| {
            let key = &after[..close];
            values
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| (*v, close))
        });
        match replacement {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}
