//! Test fixtures for pages, package repositories and build requests
//!
//! Filesystem fixtures own a [`TempDir`] and clean up on drop.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;

use crate::analysis::LocalPage;
use crate::repository::{CacheDirectory, FsPackageRepository, PackageRepository};

/// A directory of page assets that external `src` attributes resolve against.
#[derive(Debug)]
pub struct SiteFixture {
    temp_dir: TempDir,
}

impl SiteFixture {
    pub fn new() -> Result<Self> {
        Ok(Self {
            temp_dir: TempDir::new().context("Failed to create site directory")?,
        })
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Write a script file at `relative`, creating parent directories.
    pub fn write_script(&self, relative: &str, content: &str) -> Result<PathBuf> {
        let path = self.root().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }

    /// An empty page resolving external scripts against this site.
    pub fn page(&self) -> LocalPage {
        LocalPage::new().with_base_dir(self.root())
    }
}

/// An on-disk package repository plus a build cache directory.
#[derive(Debug)]
pub struct PackagesFixture {
    temp_dir: TempDir,
}

impl PackagesFixture {
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new().context("Failed to create packages directory")?;
        fs::create_dir_all(temp_dir.path().join("packages"))?;
        fs::create_dir_all(temp_dir.path().join("cache"))?;
        Ok(Self {
            temp_dir,
        })
    }

    pub fn packages_dir(&self) -> PathBuf {
        self.temp_dir.path().join("packages")
    }

    pub fn cache_dir(&self) -> PathBuf {
        self.temp_dir.path().join("cache")
    }

    /// Create `<packages>/<name>/<version>` and return it.
    pub fn install(&self, name: &str, version: &str) -> Result<PathBuf> {
        let dir = self.packages_dir().join(name).join(version);
        fs::create_dir_all(&dir).with_context(|| format!("Failed to create {}", dir.display()))?;
        Ok(dir)
    }

    pub fn repository(&self) -> FsPackageRepository {
        FsPackageRepository::new(self.packages_dir())
    }

    pub fn cache(&self) -> CacheDirectory {
        CacheDirectory::new(self.cache_dir())
    }
}

/// In-memory [`PackageRepository`] that counts lookups.
#[derive(Debug, Default)]
pub struct StaticRepository {
    locations: HashMap<(String, String), PathBuf>,
    lookups: AtomicUsize,
}

impl StaticRepository {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_package(mut self, name: &str, version: &str, location: impl Into<PathBuf>) -> Self {
        self.locations.insert((name.to_string(), version.to_string()), location.into());
        self
    }

    /// Number of `package_location` calls so far.
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

impl PackageRepository for StaticRepository {
    fn package_location(&self, name: &str, version: &str) -> Result<PathBuf> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.locations
            .get(&(name.to_string(), version.to_string()))
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("{name}@{version} is not registered"))
    }
}

/// The single-layer request used throughout the build tests.
pub const TOOLKIT_REQUEST_JSON: &str = r#"{
    "packages": [{"name": "dojo", "version": "1.9"}],
    "cdn": "none",
    "optimise": "closure",
    "cssOptimise": "comments",
    "platforms": "",
    "themes": "",
    "layers": [{"name": "dojo.js", "modules": [{"name": "dojo.parser", "package": "dojo"}]}]
}"#;
