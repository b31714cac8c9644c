//! Service configuration (`~/.dtk/config.toml`).
//!
//! # File Format
//!
//! ```toml
//! # Root of the build result cache; one directory per build reference
//! cache_dir = "~/.dtk/cache"
//!
//! # Root of the package repository; packages live at <packages_dir>/<name>/<version>
//! packages_dir = "$DTK_HOME/packages"
//!
//! # Patterns matched against script `src` to find the module loader
//! loader_patterns = ["(^|/)dojo(\\.xd)?(\\.js)?(\\?.*)?$"]
//!
//! # Module format assumed until page configuration says otherwise
//! default_module_format = "non-amd"
//! ```
//!
//! # Location
//!
//! - **Unix/macOS**: `~/.dtk/config.toml`
//! - **Windows**: `%LOCALAPPDATA%\dtk\config.toml`
//! - **Override**: `DTK_CONFIG_PATH`
//!
//! `DTK_CACHE_DIR` and `DTK_PACKAGES_DIR` override the directory settings
//! after the file is loaded.

use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::analysis::ModuleFormat;
use crate::constants::{CACHE_DIR_ENV, CONFIG_PATH_ENV, DEFAULT_LOADER_PATTERN, PACKAGES_DIR_ENV};
use crate::core::DtkError;

fn default_cache_dir() -> String {
    "~/.dtk/cache".to_string()
}

fn default_packages_dir() -> String {
    "~/.dtk/packages".to_string()
}

fn default_loader_patterns() -> Vec<String> {
    vec![DEFAULT_LOADER_PATTERN.to_string()]
}

/// Settings for the collaborators the core is wired to.
///
/// # Examples
///
/// ```rust,no_run
/// use dtk_build::config::ServiceConfig;
///
/// # fn example() -> anyhow::Result<()> {
/// let mut config = ServiceConfig::load()?;
/// config.apply_env_overrides();
/// println!("Build results cached under {}", config.cache_dir()?.display());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Build result cache root. `~` and `$VAR` are expanded on use.
    #[serde(default = "default_cache_dir")]
    pub cache_dir: String,

    /// Package repository root. `~` and `$VAR` are expanded on use.
    #[serde(default = "default_packages_dir")]
    pub packages_dir: String,

    /// Regular expressions identifying the loader script by its `src`.
    #[serde(default = "default_loader_patterns")]
    pub loader_patterns: Vec<String>,

    /// Module format assumed before any page configuration is seen.
    #[serde(default)]
    pub default_module_format: ModuleFormat,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            cache_dir: default_cache_dir(),
            packages_dir: default_packages_dir(),
            loader_patterns: default_loader_patterns(),
            default_module_format: ModuleFormat::default(),
        }
    }
}

impl ServiceConfig {
    /// Load from `DTK_CONFIG_PATH` or the default location.
    ///
    /// A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        let path = match std::env::var_os(CONFIG_PATH_ENV) {
            Some(path) => PathBuf::from(path),
            None => Self::default_path()?,
        };
        Self::load_with_optional(Some(path))
    }

    /// Load from `path` if given, otherwise from the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_with_optional(path: Option<PathBuf>) -> Result<Self> {
        let path = match path {
            Some(path) => path,
            None => Self::default_path()?,
        };
        if path.exists() {
            Self::load_from(&path)
        } else {
            tracing::debug!("No configuration at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Load from a specific file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid TOML for
    /// this structure.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration from {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .map_err(DtkError::from)
            .with_context(|| format!("Failed to parse configuration from {}", path.display()))?;

        tracing::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Write as pretty TOML, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if directories cannot be created, serialization fails
    /// or the file cannot be written.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create configuration directory: {}", parent.display())
            })?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write configuration to {}", path.display()))
    }

    /// Platform default location of the configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the home (or, on Windows, local data) directory
    /// cannot be determined.
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = if cfg!(target_os = "windows") {
            dirs::data_local_dir()
                .ok_or_else(|| anyhow::anyhow!("Unable to determine local data directory"))?
                .join("dtk")
        } else {
            dirs::home_dir()
                .ok_or_else(|| anyhow::anyhow!("Unable to determine home directory"))?
                .join(".dtk")
        };

        Ok(config_dir.join("config.toml"))
    }

    /// Apply `DTK_CACHE_DIR` and `DTK_PACKAGES_DIR` from the process environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|name| std::env::var(name).ok());
    }

    /// Apply directory overrides from an arbitrary variable lookup.
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup(CACHE_DIR_ENV).filter(|d| !d.is_empty()) {
            tracing::debug!("{CACHE_DIR_ENV} overrides cache directory: {dir}");
            self.cache_dir = dir;
        }
        if let Some(dir) = lookup(PACKAGES_DIR_ENV).filter(|d| !d.is_empty()) {
            tracing::debug!("{PACKAGES_DIR_ENV} overrides packages directory: {dir}");
            self.packages_dir = dir;
        }
    }

    /// Expanded build result cache root.
    ///
    /// # Errors
    ///
    /// Returns an error if the setting references an undefined variable.
    pub fn cache_dir(&self) -> Result<PathBuf> {
        expand_dir(&self.cache_dir).context("Invalid cache_dir setting")
    }

    /// Expanded package repository root.
    ///
    /// # Errors
    ///
    /// Returns an error if the setting references an undefined variable.
    pub fn packages_dir(&self) -> Result<PathBuf> {
        expand_dir(&self.packages_dir).context("Invalid packages_dir setting")
    }

    /// Compile the loader patterns.
    ///
    /// # Errors
    ///
    /// Returns [`DtkError::ConfigError`] naming the first invalid pattern.
    pub fn loader_regexes(&self) -> Result<Vec<Regex>> {
        self.loader_patterns
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|err| {
                    anyhow::Error::from(DtkError::ConfigError {
                        message: format!("invalid loader pattern '{pattern}': {err}"),
                    })
                })
            })
            .collect()
    }
}

fn expand_dir(value: &str) -> Result<PathBuf> {
    let expanded = shellexpand::full(value)
        .with_context(|| format!("Failed to expand '{value}'"))?;
    Ok(PathBuf::from(expanded.into_owned()))
}
