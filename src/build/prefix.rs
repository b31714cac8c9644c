//! Namespace prefix resolution.
//!
//! The bundler locates modules by their top-level namespace. Every distinct
//! prefix used by a layer module is mapped to `<package location>/<prefix>`,
//! where the package location comes from the [`PackageRepository`].

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeTuple, Serializer};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use super::{BuildParameters, LayerModule};
use crate::core::{DtkError, Result};
use crate::repository::PackageRepository;

/// A namespace prefix and the directory the bundler reads it from.
///
/// Serializes as a two-element array `[prefix, path]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModulePrefix {
    prefix: String,
    location: PathBuf,
}

impl ModulePrefix {
    pub fn new(prefix: impl Into<String>, location: impl Into<PathBuf>) -> Self {
        Self {
            prefix: prefix.into(),
            location: location.into(),
        }
    }

    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    #[must_use]
    pub fn location(&self) -> &Path {
        &self.location
    }
}

impl Serialize for ModulePrefix {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut tuple = serializer.serialize_tuple(2)?;
        tuple.serialize_element(&self.prefix)?;
        tuple.serialize_element(&self.location)?;
        tuple.end()
    }
}

/// Top-level namespace of a module name: everything before the first `.` or `/`.
///
/// ```rust
/// use dtk_build::build::module_prefix;
///
/// assert_eq!(module_prefix("dojo.parser"), "dojo");
/// assert_eq!(module_prefix("dijit/form/Button"), "dijit");
/// assert_eq!(module_prefix("standalone"), "standalone");
/// ```
#[must_use]
pub fn module_prefix(module_name: &str) -> &str {
    module_name.split(['.', '/']).next().unwrap_or(module_name)
}

/// Package locations for one resolution pass.
///
/// Versions come from the request's declarations, first declaration winning.
/// Each package is resolved through the repository at most once.
struct PackageLocationLookup<'a> {
    declared: IndexMap<&'a str, &'a str>,
    resolved: HashMap<&'a str, PathBuf>,
    repository: &'a dyn PackageRepository,
}

impl<'a> PackageLocationLookup<'a> {
    fn new(params: &'a BuildParameters, repository: &'a dyn PackageRepository) -> Self {
        let mut declared = IndexMap::new();
        for package in &params.packages {
            declared.entry(package.name.as_str()).or_insert(package.version.as_str());
        }
        Self {
            declared,
            resolved: HashMap::new(),
            repository,
        }
    }

    fn location(&mut self, module: &'a LayerModule) -> Result<&Path> {
        let package = module.package.as_str();
        if !self.resolved.contains_key(package) {
            let version = self.declared.get(package).ok_or_else(|| DtkError::UndeclaredPackage {
                module: module.name.clone(),
                package: package.to_string(),
            })?;
            let location = self.repository.package_location(package, version).map_err(|err| {
                DtkError::PackageNotFound {
                    name: package.to_string(),
                    version: (*version).to_string(),
                    reason: format!("{err:#}"),
                }
            })?;
            self.resolved.insert(package, location);
        }
        Ok(self.resolved[package].as_path())
    }
}

/// Map every distinct namespace prefix in the request's layers to a directory.
///
/// Layers and their modules are walked in order; the first module using a
/// prefix decides which package supplies it.
///
/// # Errors
///
/// - [`DtkError::InvalidRequest`] if a module name has no namespace prefix,
///   such as `.parser` or `/abs`
/// - [`DtkError::UndeclaredPackage`] if a module names a package the request
///   does not declare
/// - [`DtkError::PackageNotFound`] if the repository cannot locate a declared
///   package
pub fn resolve_prefixes(params: &BuildParameters, repository: &dyn PackageRepository) -> Result<Vec<ModulePrefix>> {
    let mut lookup = PackageLocationLookup::new(params, repository);
    let mut seen = HashSet::new();
    let mut prefixes = Vec::new();

    for module in params.layers.iter().flat_map(|layer| &layer.modules) {
        let prefix = module_prefix(&module.name);
        if prefix.is_empty() {
            return Err(DtkError::InvalidRequest {
                reason: format!("module '{}' has no namespace prefix", module.name),
            });
        }
        if seen.contains(prefix) {
            continue;
        }
        let location = lookup.location(module)?.join(prefix);
        tracing::trace!("Prefix {prefix} -> {}", location.display());
        seen.insert(prefix);
        prefixes.push(ModulePrefix::new(prefix, location));
    }

    Ok(prefixes)
}
