//! The page analyzer state machine.
//!
//! A [`PageAnalyzer`] makes one pass over a page's script elements in
//! document order:
//!
//! 1. **Pre-loader**: each script is offered to the flavor as a possible
//!    source of module-format configuration, then tested as the loader
//!    script. Nothing is scanned for dependencies in this phase, and the
//!    loader script itself is never scanned.
//! 2. **Post-loader**: each script's text is fetched and parsed with the
//!    parser for the current [`ModuleFormat`]. Identifiers are made absolute,
//!    assigned to a package and registered. Scripts whose text cannot be
//!    fetched are skipped.
//!
//! If the page's scripts cannot be enumerated at all the pass enters the
//! terminal error phase and [`PageAnalyzer::modules`] fails.
//!
//! Page-specific behaviour comes from an injected [`PageFlavor`]; one
//! analyzer serves every kind of page.

use anyhow::Result as AnyResult;

use super::identifier;
use super::registry::{DiscoveredModules, ModuleRegistry};
use super::{ModuleFormat, ParsePhase, ScriptContext, ScriptParser};
use crate::core::{DtkError, Result};

/// Capabilities the analyzer needs from a kind of page.
///
/// Only [`scripts`](Self::scripts), [`script_text`](Self::script_text) and
/// [`is_loader_script`](Self::is_loader_script) are required; the remaining
/// hooks default to the standard identifier rules and to no module-format
/// signals.
pub trait PageFlavor {
    /// All script elements of the page in document order.
    ///
    /// An error here is fatal for the analysis pass.
    fn scripts(&self) -> AnyResult<Vec<ScriptContext>>;

    /// Source text of a script, or `None` when it cannot be retrieved.
    fn script_text(&self, script: &ScriptContext) -> Option<String>;

    /// Whether this script bootstraps the module loader.
    fn is_loader_script(&self, script: &ScriptContext) -> bool;

    /// Module format the page starts out with.
    fn initial_module_format(&self) -> ModuleFormat {
        ModuleFormat::NonAmd
    }

    /// Module format configured by a pre-loader script, if any.
    ///
    /// Consulted for every pre-loader script, the loader script included,
    /// since loader configuration often sits on the loader tag itself.
    fn module_format_signal(&self, _script: &ScriptContext) -> Option<ModuleFormat> {
        None
    }

    /// Absolute identifier for a raw identifier found in `script`.
    fn absolute_module_id(&self, raw_id: &str, script: &ScriptContext) -> String {
        identifier::resolve_absolute(raw_id, script)
    }

    /// Package an absolute identifier belongs to.
    fn package_name(&self, absolute_id: &str) -> String {
        identifier::derive_package(absolute_id)
    }
}

/// Result of analysing one page.
///
/// The whole pass runs inside [`PageAnalyzer::analyze`]; afterwards the value
/// is read-only and can be shared between threads.
#[derive(Debug, Clone)]
pub struct PageAnalyzer {
    phase: ParsePhase,
    module_format: ModuleFormat,
    modules: DiscoveredModules,
    failure: Option<String>,
    scanned_scripts: usize,
    skipped_scripts: usize,
}

impl PageAnalyzer {
    /// Analyse the page described by `flavor`.
    pub fn analyze<F>(flavor: &F) -> Self
    where
        F: PageFlavor + ?Sized,
    {
        let mut pass = AnalysisPass::new(flavor.initial_module_format());

        match flavor.scripts() {
            Ok(scripts) => {
                for script in &scripts {
                    pass.visit(flavor, script);
                }
            }
            Err(err) => pass.fail(format!("{err:#}")),
        }

        pass.finish()
    }

    /// Modules the page depends on, grouped by package.
    ///
    /// # Errors
    ///
    /// Returns [`DtkError::FatalAnalysis`] if the pass ended in the error
    /// phase, regardless of what was discovered before the failure.
    pub fn modules(&self) -> Result<&DiscoveredModules> {
        if self.phase == ParsePhase::Error {
            return Err(DtkError::FatalAnalysis {
                reason: self.failure.clone().unwrap_or_else(|| "unknown failure".to_string()),
            });
        }
        Ok(&self.modules)
    }

    /// Phase the pass finished in.
    ///
    /// `PreLoader` means no loader script was found.
    #[must_use]
    pub const fn phase(&self) -> ParsePhase {
        self.phase
    }

    /// Module format in effect when the pass finished.
    #[must_use]
    pub const fn module_format(&self) -> ModuleFormat {
        self.module_format
    }

    /// Whether a loader script was found.
    #[must_use]
    pub fn found_loader(&self) -> bool {
        self.phase == ParsePhase::PostLoader
    }

    /// Post-loader scripts whose text was parsed.
    #[must_use]
    pub const fn scanned_scripts(&self) -> usize {
        self.scanned_scripts
    }

    /// Post-loader scripts skipped because their text was unavailable.
    #[must_use]
    pub const fn skipped_scripts(&self) -> usize {
        self.skipped_scripts
    }
}

/// Mutable state of one pass; only touched from `PageAnalyzer::analyze`.
struct AnalysisPass {
    phase: ParsePhase,
    module_format: ModuleFormat,
    registry: ModuleRegistry,
    failure: Option<String>,
    scanned_scripts: usize,
    skipped_scripts: usize,
}

impl AnalysisPass {
    fn new(module_format: ModuleFormat) -> Self {
        Self {
            phase: ParsePhase::PreLoader,
            module_format,
            registry: ModuleRegistry::new(),
            failure: None,
            scanned_scripts: 0,
            skipped_scripts: 0,
        }
    }

    fn visit<F>(&mut self, flavor: &F, script: &ScriptContext)
    where
        F: PageFlavor + ?Sized,
    {
        match self.phase {
            ParsePhase::PreLoader => self.visit_pre_loader(flavor, script),
            ParsePhase::PostLoader => self.visit_post_loader(flavor, script),
            ParsePhase::Error => {}
        }
    }

    fn visit_pre_loader<F>(&mut self, flavor: &F, script: &ScriptContext)
    where
        F: PageFlavor + ?Sized,
    {
        if let Some(format) = flavor.module_format_signal(script) {
            if format != self.module_format {
                tracing::debug!(
                    "Script #{} switches module format from {} to {}",
                    script.position(),
                    self.module_format,
                    format
                );
            }
            self.module_format = format;
        }

        if flavor.is_loader_script(script) {
            tracing::debug!(
                "Loader script found at #{} ({}), scanning later scripts as {}",
                script.position(),
                script.src().unwrap_or("inline"),
                self.module_format
            );
            self.phase = self.phase.advance(ParsePhase::PostLoader);
        }
    }

    fn visit_post_loader<F>(&mut self, flavor: &F, script: &ScriptContext)
    where
        F: PageFlavor + ?Sized,
    {
        let Some(text) = flavor.script_text(script) else {
            tracing::debug!(
                "Skipping script #{} ({}): source unavailable",
                script.position(),
                script.src().unwrap_or("inline")
            );
            self.skipped_scripts += 1;
            return;
        };

        self.scanned_scripts += 1;
        let parser = ScriptParser::for_format(self.module_format);

        for raw_id in parser.dependencies(&text) {
            let absolute_id = flavor.absolute_module_id(&raw_id, script);
            let package = flavor.package_name(&absolute_id);
            if self.registry.register(&package, &absolute_id) {
                tracing::trace!("Discovered {absolute_id} in package {package}");
            }
        }
    }

    fn fail(&mut self, reason: String) {
        tracing::warn!("Page analysis failed: {reason}");
        self.phase = self.phase.advance(ParsePhase::Error);
        self.failure = Some(reason);
    }

    fn finish(self) -> PageAnalyzer {
        let modules = self.registry.into_discovered();
        if self.phase != ParsePhase::Error {
            tracing::info!(
                "Page analysis finished: {} module(s) in {} package(s), {} script(s) scanned, {} skipped",
                modules.total_modules(),
                modules.len(),
                self.scanned_scripts,
                self.skipped_scripts
            );
        }

        PageAnalyzer {
            phase: self.phase,
            module_format: self.module_format,
            modules,
            failure: self.failure,
            scanned_scripts: self.scanned_scripts,
            skipped_scripts: self.skipped_scripts,
        }
    }
}
