//! Per-package registry of discovered module identifiers.
//!
//! Each package maps to an [`IndexSet`], which pairs a hash index with an
//! insertion-ordered sequence: membership checks are constant time and the
//! first-occurrence order of identifiers is preserved. Packages are likewise
//! kept in the order they were first seen.

use indexmap::{IndexMap, IndexSet};
use serde::Serialize;

/// Mutable registry filled during one analysis pass.
#[derive(Debug, Default)]
pub struct ModuleRegistry {
    packages: IndexMap<String, IndexSet<String>>,
}

impl ModuleRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `module_id` under `package`.
    ///
    /// Returns `true` when the identifier was new for that package. A repeated
    /// identifier keeps its original position.
    pub fn register(&mut self, package: &str, module_id: &str) -> bool {
        if let Some(modules) = self.packages.get_mut(package) {
            if modules.contains(module_id) {
                return false;
            }
            return modules.insert(module_id.to_string());
        }

        let mut modules = IndexSet::new();
        modules.insert(module_id.to_string());
        self.packages.insert(package.to_string(), modules);
        true
    }

    /// Freeze into the read-only result type.
    #[must_use]
    pub fn into_discovered(self) -> DiscoveredModules {
        DiscoveredModules {
            packages: self.packages,
        }
    }
}

/// Modules a page depends on, grouped by package.
///
/// Serializes as a JSON object whose keys and arrays keep discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DiscoveredModules {
    packages: IndexMap<String, IndexSet<String>>,
}

impl DiscoveredModules {
    /// Modules of one package in first-occurrence order.
    #[must_use]
    pub fn get(&self, package: &str) -> Option<&IndexSet<String>> {
        self.packages.get(package)
    }

    /// Whether `module_id` was discovered under `package`.
    #[must_use]
    pub fn contains(&self, package: &str, module_id: &str) -> bool {
        self.packages.get(package).is_some_and(|modules| modules.contains(module_id))
    }

    /// Package names in first-seen order.
    pub fn packages(&self) -> impl Iterator<Item = &str> {
        self.packages.keys().map(String::as_str)
    }

    /// Iterate `(package, modules)` pairs in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &IndexSet<String>)> {
        self.packages.iter().map(|(package, modules)| (package.as_str(), modules))
    }

    /// Number of packages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.packages.len()
    }

    /// Whether nothing was discovered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// Number of module identifiers across all packages.
    #[must_use]
    pub fn total_modules(&self) -> usize {
        self.packages.values().map(IndexSet::len).sum()
    }

    /// Order-preserving owned copy, convenient for exact comparisons.
    ///
    /// `PartialEq` on this type ignores ordering, like the underlying
    /// `IndexMap`; compare these lists when order matters.
    #[must_use]
    pub fn to_lists(&self) -> Vec<(String, Vec<String>)> {
        self.packages
            .iter()
            .map(|(package, modules)| (package.clone(), modules.iter().cloned().collect()))
            .collect()
    }
}
