//! Build request parameters as submitted by a client.
//!
//! The wire shape is the JSON object the build service accepts:
//!
//! ```json
//! {
//!   "packages": [{"name": "dojo", "version": "1.9"}],
//!   "cdn": "none",
//!   "optimise": "closure",
//!   "cssOptimise": "comments",
//!   "platforms": "",
//!   "themes": "",
//!   "layers": [
//!     {"name": "dojo.js", "modules": [{"name": "dojo.parser", "package": "dojo"}]}
//!   ]
//! }
//! ```
//!
//! `packages` and `layers` are required. Scalar options default to the empty
//! string. Layer names become file names in the build cache, so each must be
//! a single path segment, and every module name must start with a namespace.
//! Field order inside each struct is fixed by declaration order and is part
//! of the build reference, so do not reorder fields.

use serde::{Deserialize, Serialize};

use super::module_prefix;
use crate::core::{DtkError, Result};
use crate::utils::validate_path_segment;

/// A package declared by the request, pinned to a version.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PackageRef {
    pub name: String,
    pub version: String,
}

impl PackageRef {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

/// A module listed in a layer, with the package that owns it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LayerModule {
    pub name: String,
    pub package: String,
}

impl LayerModule {
    pub fn new(name: impl Into<String>, package: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            package: package.into(),
        }
    }
}

/// One bundled output file and the modules it contains, in order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Layer {
    pub name: String,
    pub modules: Vec<LayerModule>,
}

impl Layer {
    pub fn new(name: impl Into<String>, modules: Vec<LayerModule>) -> Self {
        Self {
            name: name.into(),
            modules,
        }
    }

    /// Module names in layer order.
    pub fn module_names(&self) -> impl Iterator<Item = &str> {
        self.modules.iter().map(|module| module.name.as_str())
    }
}

/// Everything a client supplies for one build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildParameters {
    /// Declared packages. When a name repeats, the first entry is used for
    /// lookups but every entry still contributes to the build reference.
    pub packages: Vec<PackageRef>,

    /// CDN mode for the built loader.
    #[serde(default)]
    pub cdn: String,

    /// JavaScript optimiser.
    #[serde(default)]
    pub optimise: String,

    /// CSS optimiser.
    #[serde(default)]
    pub css_optimise: String,

    /// Target platforms.
    #[serde(default)]
    pub platforms: String,

    /// Themes to include.
    #[serde(default)]
    pub themes: String,

    pub layers: Vec<Layer>,
}

impl BuildParameters {
    /// Parse the service's JSON request shape and [`validate`](Self::validate) it.
    ///
    /// # Errors
    ///
    /// Returns [`DtkError::InvalidRequest`] for malformed JSON, missing
    /// `packages`/`layers`, values of the wrong type, or content rejected by
    /// validation.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use dtk_build::build::BuildParameters;
    ///
    /// let params = BuildParameters::from_json(
    ///     r#"{"packages":[{"name":"dojo","version":"1.9"}],"layers":[]}"#,
    /// ).unwrap();
    /// assert_eq!(params.packages[0].version, "1.9");
    /// assert_eq!(params.cdn, "");
    /// ```
    pub fn from_json(json: &str) -> Result<Self> {
        let params: Self = serde_json::from_str(json).map_err(|err| DtkError::InvalidRequest {
            reason: err.to_string(),
        })?;
        params.validate()?;
        Ok(params)
    }

    /// Check the parts of the request that become paths.
    ///
    /// # Errors
    ///
    /// Returns [`DtkError::InvalidRequest`] if a layer name is not a single
    /// path segment or a module name has an empty namespace prefix.
    pub fn validate(&self) -> Result<()> {
        for layer in &self.layers {
            validate_path_segment("layer name", &layer.name).map_err(|err| DtkError::InvalidRequest {
                reason: err.to_string(),
            })?;
            for module in &layer.modules {
                if module_prefix(&module.name).is_empty() {
                    return Err(DtkError::InvalidRequest {
                        reason: format!("module '{}' in layer '{}' has no namespace prefix", module.name, layer.name),
                    });
                }
            }
        }
        Ok(())
    }

    /// The first declaration of `name`, if any.
    #[must_use]
    pub fn package(&self, name: &str) -> Option<&PackageRef> {
        self.packages.iter().find(|package| package.name == name)
    }
}
