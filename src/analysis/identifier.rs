//! Module identifier resolution.
//!
//! Relative identifiers (`./x`, `../x`) are resolved against the location of
//! the script that mentions them; everything else is already absolute. The
//! package of an absolute identifier is its first path segment.

use super::ScriptContext;

/// Whether an identifier is relative to its script.
#[must_use]
pub fn is_relative(raw_id: &str) -> bool {
    raw_id.starts_with("./") || raw_id.starts_with("../")
}

/// Turn a raw identifier into an absolute module identifier.
///
/// Relative identifiers are joined onto the directory of the script's
/// [`location`](ScriptContext::location); `.` segments are dropped and `..`
/// segments pop one directory, never going above the root. Scripts without a
/// location resolve against the empty base. Absolute identifiers are returned
/// unchanged.
///
/// # Examples
///
/// ```rust
/// use dtk_build::analysis::ScriptContext;
/// use dtk_build::analysis::identifier::resolve_absolute;
///
/// let script = ScriptContext::external("app/run.js");
/// assert_eq!(resolve_absolute("./main", &script), "app/main");
/// assert_eq!(resolve_absolute("../lib/util", &script), "lib/util");
/// assert_eq!(resolve_absolute("dojo/dom", &script), "dojo/dom");
/// ```
#[must_use]
pub fn resolve_absolute(raw_id: &str, script: &ScriptContext) -> String {
    if !is_relative(raw_id) {
        return raw_id.to_string();
    }

    let location = script.location().unwrap_or_default();
    let mut segments: Vec<&str> = location.split('/').filter(|s| !s.is_empty()).collect();
    // The last segment names the script itself, not a directory.
    segments.pop();

    for segment in raw_id.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }

    segments.join("/")
}

/// Package (top-level namespace) of an absolute identifier.
///
/// Slash-separated identifiers use their first segment. Legacy dotted
/// identifiers (`dijit.form.Button`) contain no slash and use their first
/// dot-separated segment.
///
/// # Examples
///
/// ```rust
/// use dtk_build::analysis::identifier::derive_package;
///
/// assert_eq!(derive_package("app/widgets/Grid"), "app");
/// assert_eq!(derive_package("dijit.form.Button"), "dijit");
/// assert_eq!(derive_package("dojo"), "dojo");
/// ```
#[must_use]
pub fn derive_package(absolute_id: &str) -> String {
    let separator = if absolute_id.contains('/') { '/' } else { '.' };
    absolute_id.split(separator).next().unwrap_or(absolute_id).to_string()
}
