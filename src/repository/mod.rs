//! Collaborators the build engine is wired to.
//!
//! The engine never reaches for global state. Package locations come from a
//! [`PackageRepository`] and the build result cache root from a
//! [`BuildStatus`], both passed in explicitly. This module defines the two
//! traits and ships filesystem-backed defaults configured from
//! [`ServiceConfig`].
//!
//! # Layout
//!
//! ```text
//! <packages_dir>/
//! ├── dojo/
//! │   ├── 1.6/
//! │   └── 1.9/
//! └── dijit/
//!     └── 1.9/
//!
//! <cache_dir>/
//! └── <build reference>/
//!     ├── dojo.zip
//!     └── dojo/dojo/<layer name>
//! ```

use anyhow::{Context, Result, bail};
use std::path::{Path, PathBuf};

use crate::config::ServiceConfig;
use crate::utils::validate_path_segment;

/// Maps a package name and version to its installed location.
pub trait PackageRepository {
    /// Filesystem location of `name` at `version`.
    ///
    /// # Errors
    ///
    /// Fails when the package version is not installed.
    fn package_location(&self, name: &str, version: &str) -> Result<PathBuf>;
}

/// Provides the root directory of the build result cache.
pub trait BuildStatus {
    fn cache_root(&self) -> PathBuf;
}

/// A package repository laid out as `<root>/<name>/<version>`.
#[derive(Debug, Clone)]
pub struct FsPackageRepository {
    root: PathBuf,
}

impl FsPackageRepository {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
        }
    }

    /// Repository rooted at the configured `packages_dir`.
    ///
    /// # Errors
    ///
    /// Fails if `packages_dir` cannot be expanded.
    pub fn from_config(config: &ServiceConfig) -> Result<Self> {
        Ok(Self::new(config.packages_dir()?))
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl PackageRepository for FsPackageRepository {
    fn package_location(&self, name: &str, version: &str) -> Result<PathBuf> {
        validate_path_segment("package name", name)?;
        validate_path_segment("package version", version)?;

        let location = self.root.join(name).join(version);
        if !location.is_dir() {
            bail!("{} is not an installed package directory", location.display());
        }

        let location = std::path::absolute(&location)
            .with_context(|| format!("Failed to make {} absolute", location.display()))?;
        tracing::trace!("Package {name}@{version} at {}", location.display());
        Ok(location)
    }
}

/// A build result cache at a fixed directory.
#[derive(Debug, Clone)]
pub struct CacheDirectory {
    root: PathBuf,
}

impl CacheDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
        }
    }

    /// Cache rooted at the configured `cache_dir`.
    ///
    /// # Errors
    ///
    /// Fails if `cache_dir` cannot be expanded.
    pub fn from_config(config: &ServiceConfig) -> Result<Self> {
        Ok(Self::new(config.cache_dir()?))
    }
}

impl BuildStatus for CacheDirectory {
    fn cache_root(&self) -> PathBuf {
        self.root.clone()
    }
}
