//! A page flavor for pages whose scripts are known locally.
//!
//! [`LocalPage`] holds an already-extracted list of script elements. Inline
//! scripts carry their own text; external scripts are read from disk relative
//! to an optional base directory. Remote scripts (`http://`, `//host/...`) are
//! treated as unavailable and skipped by the analyzer.
//!
//! The loader script is recognised by matching its `src` against a set of
//! patterns, by default [`DEFAULT_LOADER_PATTERN`]. The module format switches
//! to AMD when pre-loader configuration says `async: true`, either in a
//! `data-dojo-config`/`djConfig` attribute or in an inline
//! `dojoConfig = { ... }` assignment.

use anyhow::Result as AnyResult;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use super::{ModuleFormat, PageFlavor, ScriptContext};
use crate::config::ServiceConfig;
use crate::constants::{DEFAULT_LOADER_PATTERN, LOADER_CONFIG_ATTRIBUTES};
use crate::utils::validate_no_traversal;

static DEFAULT_LOADER: OnceLock<Regex> = OnceLock::new();
static ASYNC_FLAG: OnceLock<Regex> = OnceLock::new();
static INLINE_CONFIG: OnceLock<Regex> = OnceLock::new();

fn default_loader() -> &'static Regex {
    DEFAULT_LOADER.get_or_init(|| Regex::new(DEFAULT_LOADER_PATTERN).expect("default loader pattern is valid"))
}

fn async_flag() -> &'static Regex {
    ASYNC_FLAG.get_or_init(|| {
        Regex::new(r#"["']?\basync["']?\s*:\s*(true|1|false|0)\b"#).expect("async flag pattern is valid")
    })
}

fn inline_config() -> &'static Regex {
    INLINE_CONFIG.get_or_init(|| {
        Regex::new(r"\b(?:dojoConfig|djConfig)\s*=\s*\{([^}]*)\}").expect("inline config pattern is valid")
    })
}

/// Read the loader's `async` flag from a configuration snippet.
fn format_from_config(config: &str) -> Option<ModuleFormat> {
    let flag = async_flag().captures(config)?.get(1)?;
    match flag.as_str() {
        "true" | "1" => Some(ModuleFormat::Amd),
        _ => Some(ModuleFormat::NonAmd),
    }
}

fn is_remote(src: &str) -> bool {
    src.contains("://") || src.starts_with("//")
}

/// A page whose script elements are supplied by the caller.
///
/// # Examples
///
/// ```rust,no_run
/// use dtk_build::analysis::{LocalPage, PageAnalyzer, ScriptContext};
///
/// let page = LocalPage::new()
///     .with_base_dir("/srv/site")
///     .script(ScriptContext::external("js/dojo/dojo.js").with_attribute("data-dojo-config", "async: 1"))
///     .script(ScriptContext::external("js/app/run.js"));
///
/// let analyzer = PageAnalyzer::analyze(&page);
/// ```
#[derive(Debug, Clone)]
pub struct LocalPage {
    scripts: Vec<ScriptContext>,
    base_dir: Option<PathBuf>,
    loader_patterns: Vec<Regex>,
    initial_format: ModuleFormat,
}

impl Default for LocalPage {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalPage {
    /// An empty page using the default loader pattern.
    #[must_use]
    pub fn new() -> Self {
        Self {
            scripts: Vec::new(),
            base_dir: None,
            loader_patterns: vec![default_loader().clone()],
            initial_format: ModuleFormat::default(),
        }
    }

    /// An empty page using the loader patterns and default module format
    /// from the service configuration.
    ///
    /// # Errors
    ///
    /// Fails if a configured loader pattern is not a valid regular expression.
    pub fn from_config(config: &ServiceConfig) -> AnyResult<Self> {
        Ok(Self {
            loader_patterns: config.loader_regexes()?,
            initial_format: config.default_module_format,
            ..Self::new()
        })
    }

    /// Append a script element; its position is its index on the page.
    #[must_use]
    pub fn script(mut self, script: ScriptContext) -> Self {
        let position = self.scripts.len();
        self.scripts.push(script.at(position));
        self
    }

    /// Append several script elements in order.
    #[must_use]
    pub fn scripts_from(self, scripts: impl IntoIterator<Item = ScriptContext>) -> Self {
        scripts.into_iter().fold(self, Self::script)
    }

    /// Directory external `src` paths are resolved against.
    #[must_use]
    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    /// Replace the loader patterns.
    #[must_use]
    pub fn with_loader_patterns(mut self, patterns: Vec<Regex>) -> Self {
        self.loader_patterns = patterns;
        self
    }

    /// Module format assumed before any configuration is seen.
    #[must_use]
    pub const fn with_module_format(mut self, format: ModuleFormat) -> Self {
        self.initial_format = format;
        self
    }

    /// Filesystem path of a local `src`, or `None` if it would leave the base
    /// directory.
    fn local_path(&self, src: &str) -> Option<PathBuf> {
        let path = Path::new(src.split(['?', '#']).next().unwrap_or(src).trim_start_matches(['/', '\\']));
        if let Err(err) = validate_no_traversal(path) {
            tracing::debug!("Not reading script outside the site: {err}");
            return None;
        }
        if path.has_root() || path.is_absolute() {
            tracing::debug!("Not reading script with absolute path {}", path.display());
            return None;
        }
        Some(match &self.base_dir {
            Some(base) => base.join(path),
            None => path.to_path_buf(),
        })
    }
}

impl PageFlavor for LocalPage {
    fn scripts(&self) -> AnyResult<Vec<ScriptContext>> {
        Ok(self.scripts.clone())
    }

    fn script_text(&self, script: &ScriptContext) -> Option<String> {
        let Some(src) = script.src() else {
            return script.inline_text().map(str::to_string);
        };

        if is_remote(src) {
            tracing::debug!("Not fetching remote script {src}");
            return None;
        }

        let path = self.local_path(src)?;
        match fs::read_to_string(&path) {
            Ok(text) => Some(text),
            Err(err) => {
                tracing::debug!("Cannot read script {}: {err}", path.display());
                None
            }
        }
    }

    fn is_loader_script(&self, script: &ScriptContext) -> bool {
        script
            .src()
            .is_some_and(|src| self.loader_patterns.iter().any(|pattern| pattern.is_match(src)))
    }

    fn initial_module_format(&self) -> ModuleFormat {
        self.initial_format
    }

    fn module_format_signal(&self, script: &ScriptContext) -> Option<ModuleFormat> {
        for attribute in LOADER_CONFIG_ATTRIBUTES {
            if let Some(format) = script.attribute(attribute).and_then(format_from_config) {
                return Some(format);
            }
        }

        if script.src().is_some() {
            return None;
        }

        let text = script.inline_text()?;
        let config = inline_config().captures(text)?.get(1)?;
        format_from_config(config.as_str())
    }
}
