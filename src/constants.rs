//! Fixed names and patterns shared across the crate.
//!
//! Path conventions here are part of the contract with the build-job executor
//! and the downstream bundler; changing them orphans existing cache entries.

/// File name of the packaged build result inside a result directory.
pub const ARCHIVE_FILE_NAME: &str = "dojo.zip";

/// Subpath of a result directory where the bundler writes layer files.
pub const LAYER_ARTIFACT_SUBPATH: &str = "dojo/dojo";

/// Template wrapping the serialized profile object for the bundler.
///
/// The bundler evaluates the profile as script, so the object is assigned to
/// a `dependencies` variable.
pub const PROFILE_PREFIX: &str = "dependencies = ";

/// Trailing text of the profile template.
pub const PROFILE_SUFFIX: &str = ";";

/// Name of the toolkit's own package in build requests.
pub const TOOLKIT_PACKAGE: &str = "dojo";

/// Default pattern identifying the loader script by its `src`.
///
/// Matches `dojo.js`, `dojo.xd.js`, `dojo/dojo.js` and the extension-less
/// forms some CDNs serve.
pub const DEFAULT_LOADER_PATTERN: &str = r"(^|/)dojo(\.xd)?(\.js)?(\?.*)?$";

/// Attributes the loader reads its configuration from.
pub const LOADER_CONFIG_ATTRIBUTES: &[&str] = &["data-dojo-config", "djconfig"];

/// Environment variable overriding the build result cache directory.
pub const CACHE_DIR_ENV: &str = "DTK_CACHE_DIR";

/// Environment variable overriding the package repository directory.
pub const PACKAGES_DIR_ENV: &str = "DTK_PACKAGES_DIR";

/// Environment variable pointing at an alternate configuration file.
pub const CONFIG_PATH_ENV: &str = "DTK_CONFIG_PATH";
