//! Build reference computation.
//!
//! A build reference is the cache key for a build request: requests with the
//! same parameters always map to the same reference, and the reference is safe
//! to use as a single path component.
//!
//! The hashed byte stream is, in order:
//!
//! 1. `layers` as compact JSON
//! 2. `packages` as compact JSON
//! 3. `cdn`, `themes`, `optimise`, `cssOptimise`, `platforms`, each preceded
//!    by a NUL byte
//!
//! The stream is hashed with SHA-1, encoded as standard base-64, and then
//! `+` becomes `~` while `/` and `=` become `_`.
//!
//! Ordering matters everywhere: two requests listing the same packages,
//! layers or modules in a different order get different references. Module
//! order decides the concatenation order of a built layer, so such requests
//! are not interchangeable.

use base64::Engine;
use base64::prelude::BASE64_STANDARD;
use serde::Serialize;
use sha1::{Digest, Sha1};
use std::fmt;
use std::path::Path;

use super::BuildParameters;
use crate::core::{DtkError, Result};

const FIELD_SEPARATOR: u8 = 0;

/// Deterministic, path-safe cache key of a build request.
///
/// Always 28 characters drawn from `A-Z a-z 0-9 ~ _`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct BuildReference(String);

impl BuildReference {
    fn from_digest(digest: &[u8]) -> Self {
        Self(path_safe(&BASE64_STANDARD.encode(digest)))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BuildReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for BuildReference {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl AsRef<Path> for BuildReference {
    fn as_ref(&self) -> &Path {
        Path::new(&self.0)
    }
}

/// Replace the base-64 characters that are unsafe in paths and URLs.
fn path_safe(encoded: &str) -> String {
    encoded
        .chars()
        .map(|c| match c {
            '+' => '~',
            '/' | '=' => '_',
            other => other,
        })
        .collect()
}

fn canonical_json<T: Serialize + ?Sized>(what: &str, value: &T) -> Result<Vec<u8>> {
    serde_json::to_vec(value).map_err(|err| DtkError::DigestFailed {
        reason: format!("cannot serialize {what}: {err}"),
    })
}

/// Compute the build reference of `params`.
///
/// # Errors
///
/// Returns [`DtkError::DigestFailed`] if the layers or packages cannot be
/// serialized.
///
/// # Examples
///
/// ```rust
/// use dtk_build::build::{BuildParameters, compute_digest};
///
/// let params = BuildParameters::default();
/// let reference = compute_digest(&params).unwrap();
/// assert_eq!(reference, compute_digest(&params.clone()).unwrap());
/// assert_eq!(reference.as_str().len(), 28);
/// ```
pub fn compute_digest(params: &BuildParameters) -> Result<BuildReference> {
    let layers = canonical_json("layers", &params.layers)?;
    let packages = canonical_json("packages", &params.packages)?;

    let mut hasher = Sha1::new();
    hasher.update(&layers);
    hasher.update(&packages);
    for field in [&params.cdn, &params.themes, &params.optimise, &params.css_optimise, &params.platforms] {
        hasher.update([FIELD_SEPARATOR]);
        hasher.update(field.as_bytes());
    }

    let reference = BuildReference::from_digest(&hasher.finalize());
    tracing::debug!("Computed build reference {reference}");
    Ok(reference)
}
