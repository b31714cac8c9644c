//! Build profile rendering.
//!
//! The profile is the configuration handed to the bundler. It is a single
//! JavaScript statement assigning one object:
//!
//! ```text
//! dependencies = {"layers":[{"dependencies":["dojo.parser"],"name":"dojo.js"}],"layerOptimize":"closure","prefixes":[["dojo","/x/dojo/1.9/dojo"]],"cssOptimize":"comments"};
//! ```

use serde::Serialize;

use super::{BuildParameters, Layer, ModulePrefix, resolve_prefixes};
use crate::constants::{PROFILE_PREFIX, PROFILE_SUFFIX};
use crate::core::{DtkError, Result};
use crate::repository::PackageRepository;

#[derive(Serialize)]
struct ProfileLayer<'a> {
    dependencies: Vec<&'a str>,
    name: &'a str,
}

impl<'a> From<&'a Layer> for ProfileLayer<'a> {
    fn from(layer: &'a Layer) -> Self {
        Self {
            dependencies: layer.module_names().collect(),
            name: &layer.name,
        }
    }
}

// Field order is the rendered order.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Profile<'a> {
    layers: Vec<ProfileLayer<'a>>,
    layer_optimize: &'a str,
    prefixes: &'a [ModulePrefix],
    css_optimize: &'a str,
}

/// Render the profile using prefixes already resolved for `params`.
///
/// # Errors
///
/// Returns [`DtkError::ProfileRender`] if serialization fails, for example
/// when a prefix location is not valid UTF-8.
pub fn render_profile_with(params: &BuildParameters, prefixes: &[ModulePrefix]) -> Result<String> {
    let profile = Profile {
        layers: params.layers.iter().map(ProfileLayer::from).collect(),
        layer_optimize: &params.optimise,
        prefixes,
        css_optimize: &params.css_optimise,
    };

    let json = serde_json::to_string(&profile).map_err(|err| DtkError::ProfileRender {
        reason: err.to_string(),
    })?;
    Ok(format!("{PROFILE_PREFIX}{json}{PROFILE_SUFFIX}"))
}

/// Resolve prefixes through `repository` and render the profile.
///
/// # Errors
///
/// Any error from [`resolve_prefixes`], or [`DtkError::ProfileRender`].
pub fn render_profile(params: &BuildParameters, repository: &dyn PackageRepository) -> Result<String> {
    let prefixes = resolve_prefixes(params, repository)?;
    render_profile_with(params, &prefixes)
}
