//! The build request facade: parameters plus their build reference.

use std::fmt;
use std::path::PathBuf;

use super::{
    BuildParameters, BuildReference, BuildResultLocation, Layer, ModulePrefix, PackageRef, compute_digest,
    render_profile_with, resolve_prefixes,
};
use crate::constants::TOOLKIT_PACKAGE;
use crate::core::{DtkError, Result};
use crate::repository::{BuildStatus, PackageRepository};

/// An immutable build request with its build reference.
///
/// The reference is computed once at construction; a request that cannot be
/// given a reference is never created.
///
/// # Examples
///
/// ```rust,no_run
/// use dtk_build::build::BuildRequest;
/// use dtk_build::repository::{CacheDirectory, FsPackageRepository};
///
/// # fn example() -> anyhow::Result<()> {
/// let request = BuildRequest::from_json(
///     r#"{"packages":[{"name":"dojo","version":"1.9"}],
///        "optimise":"closure",
///        "layers":[{"name":"dojo.js","modules":[{"name":"dojo.parser","package":"dojo"}]}]}"#,
/// )?;
///
/// let repository = FsPackageRepository::new("/srv/dtk/packages");
/// let cache = CacheDirectory::new("/var/cache/dtk");
///
/// println!("{}", request.profile_text(&repository)?);
/// println!("archive at {}", request.result_archive_path(&cache).display());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildRequest {
    params: BuildParameters,
    reference: BuildReference,
}

impl BuildRequest {
    /// Validate `params` and compute their build reference.
    ///
    /// # Errors
    ///
    /// Returns [`DtkError::InvalidRequest`] if the parameters fail
    /// [`BuildParameters::validate`], or [`DtkError::DigestFailed`] if the
    /// reference cannot be computed.
    pub fn new(params: BuildParameters) -> Result<Self> {
        params.validate()?;
        let reference = compute_digest(&params)?;
        tracing::info!(
            "Build request {reference}: {} package(s), {} layer(s)",
            params.packages.len(),
            params.layers.len()
        );
        Ok(Self {
            params,
            reference,
        })
    }

    /// Parse the service's JSON request shape and build the request.
    ///
    /// # Errors
    ///
    /// [`DtkError::InvalidRequest`] for a malformed or invalid request, or
    /// [`DtkError::DigestFailed`].
    pub fn from_json(json: &str) -> Result<Self> {
        Self::new(BuildParameters::from_json(json)?)
    }

    pub fn reference(&self) -> &BuildReference {
        &self.reference
    }

    pub fn parameters(&self) -> &BuildParameters {
        &self.params
    }

    pub fn packages(&self) -> &[PackageRef] {
        &self.params.packages
    }

    pub fn layers(&self) -> &[Layer] {
        &self.params.layers
    }

    pub fn cdn(&self) -> &str {
        &self.params.cdn
    }

    pub fn optimise(&self) -> &str {
        &self.params.optimise
    }

    pub fn css_optimise(&self) -> &str {
        &self.params.css_optimise
    }

    pub fn platforms(&self) -> &str {
        &self.params.platforms
    }

    pub fn themes(&self) -> &str {
        &self.params.themes
    }

    /// The declared toolkit package, if the request includes it.
    pub fn toolkit_package(&self) -> Option<&PackageRef> {
        self.params.package(TOOLKIT_PACKAGE)
    }

    pub fn toolkit_version(&self) -> Option<&str> {
        self.toolkit_package().map(|package| package.version.as_str())
    }

    /// Installed location of the declared toolkit package.
    ///
    /// Returns `Ok(None)` when the request does not declare the toolkit.
    ///
    /// # Errors
    ///
    /// [`DtkError::PackageNotFound`] if the repository cannot locate it.
    pub fn toolkit_location(&self, repository: &dyn PackageRepository) -> Result<Option<PathBuf>> {
        let Some(package) = self.toolkit_package() else {
            return Ok(None);
        };
        repository
            .package_location(&package.name, &package.version)
            .map(Some)
            .map_err(|err| DtkError::PackageNotFound {
                name: package.name.clone(),
                version: package.version.clone(),
                reason: format!("{err:#}"),
            })
    }

    /// See [`resolve_prefixes`].
    ///
    /// # Errors
    ///
    /// [`DtkError::UndeclaredPackage`] or [`DtkError::PackageNotFound`].
    pub fn module_prefixes(&self, repository: &dyn PackageRepository) -> Result<Vec<ModulePrefix>> {
        resolve_prefixes(&self.params, repository)
    }

    /// The bundler profile for this request.
    ///
    /// # Errors
    ///
    /// Prefix resolution errors, or [`DtkError::ProfileRender`].
    pub fn profile_text(&self, repository: &dyn PackageRepository) -> Result<String> {
        let prefixes = self.module_prefixes(repository)?;
        render_profile_with(&self.params, &prefixes)
    }

    pub fn result_location(&self, status: &dyn BuildStatus) -> BuildResultLocation {
        BuildResultLocation::for_reference(status, &self.reference)
    }

    pub fn result_dir(&self, status: &dyn BuildStatus) -> PathBuf {
        self.result_location(status).dir().to_path_buf()
    }

    pub fn result_archive_path(&self, status: &dyn BuildStatus) -> PathBuf {
        self.result_location(status).archive_path()
    }

    pub fn layer_output_paths(&self, status: &dyn BuildStatus) -> Vec<PathBuf> {
        self.result_location(status).layer_outputs(&self.params.layers)
    }
}

impl fmt::Display for BuildRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let packages = serde_json::to_string(&self.params.packages).map_err(|_| fmt::Error)?;
        let layers = serde_json::to_string(&self.params.layers).map_err(|_| fmt::Error)?;
        write!(
            f,
            "BuildRequest {}: packages={packages}, cdn={}, optimise={}, cssOptimise={}, platforms={}, themes={}, layers={layers}",
            self.reference,
            self.params.cdn,
            self.params.optimise,
            self.params.css_optimise,
            self.params.platforms,
            self.params.themes,
        )
    }
}
