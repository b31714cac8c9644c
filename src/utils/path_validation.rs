//! Path validation for values that end up joined onto a trusted root.
//!
//! Package names, versions and layer names come from build requests; script
//! `src` attributes come from pages. None of them may reach outside the
//! directory they are joined onto.

use anyhow::{Result, bail};
use std::path::{Component, Path};

/// Reject paths with parent directory references (`..`).
///
/// # Errors
///
/// Returns an error naming the path if any component is `..`.
pub fn validate_no_traversal(path: &Path) -> Result<()> {
    if path.components().any(|component| component == Component::ParentDir) {
        bail!("Path contains parent directory reference (..): {}", path.display());
    }
    Ok(())
}

/// Require `value` to be exactly one normal path component.
///
/// Empty values, `.`, `..`, absolute paths and anything containing a
/// separator are rejected. `kind` names the value in the error message.
///
/// # Errors
///
/// Returns an error describing the rejected value.
pub fn validate_path_segment(kind: &str, value: &str) -> Result<()> {
    let mut components = Path::new(value).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) if !value.contains(['/', '\\']) => Ok(()),
        _ => bail!("Invalid {kind} '{value}': must be a single path segment"),
    }
}
