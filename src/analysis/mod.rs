//! Page module-dependency analysis
//!
//! Given a web page, determine which modules it really depends on once its
//! module loader has initialized. Scripts that run before the loader usually
//! hold path or loader configuration rather than dependencies, so they are
//! never scanned; scripts after it are parsed for dependency identifiers.
//!
//! # Components
//!
//! - [`script`] - extracts raw identifiers from one script's text ([`ScriptParser`])
//! - [`identifier`] - makes identifiers absolute and derives their package
//! - [`registry`] - per-package, insertion-ordered, duplicate-free module sets
//! - [`page`] - the two-phase [`PageAnalyzer`] and the [`PageFlavor`] capability
//! - [`local`] - [`LocalPage`], a flavor for pages whose scripts are in memory or on disk
//!
//! # Example
//!
//! ```rust,no_run
//! use dtk_build::analysis::{LocalPage, PageAnalyzer, ScriptContext};
//!
//! # fn example() -> dtk_build::core::Result<()> {
//! let page = LocalPage::new()
//!     .script(ScriptContext::inline("var dojoConfig = { async: true };"))
//!     .script(ScriptContext::external("dojo/dojo.js"))
//!     .script(ScriptContext::inline(r#"require(["app/main"], function (main) {});"#));
//!
//! let analyzer = PageAnalyzer::analyze(&page);
//! for (package, modules) in analyzer.modules()?.iter() {
//!     println!("{package}: {modules:?}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod context;
pub mod identifier;
pub mod local;
pub mod page;
pub mod registry;
pub mod script;

pub use context::ScriptContext;
pub use local::LocalPage;
pub use page::{PageAnalyzer, PageFlavor};
pub use registry::{DiscoveredModules, ModuleRegistry};
pub use script::ScriptParser;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Phase of a page analysis pass.
///
/// `PreLoader` → `PostLoader` is the only forward transition. `Error` is
/// terminal and reachable from either state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ParsePhase {
    /// The loader script has not been seen yet.
    #[default]
    PreLoader,
    /// The loader script has been seen; later scripts are scanned.
    PostLoader,
    /// A fatal condition occurred; no results are available.
    Error,
}

impl ParsePhase {
    /// Return the phase after attempting a move to `next`.
    ///
    /// Moves that would regress (`PostLoader` → `PreLoader`, anything out of
    /// `Error`) leave the phase unchanged.
    #[must_use]
    pub const fn advance(self, next: Self) -> Self {
        match (self, next) {
            (Self::Error, _) => Self::Error,
            (_, Self::Error) => Self::Error,
            (Self::PreLoader, Self::PostLoader) => Self::PostLoader,
            (current, _) => current,
        }
    }

    /// Whether scripts in this phase are scanned for dependencies.
    #[must_use]
    pub const fn is_scanning(self) -> bool {
        matches!(self, Self::PostLoader)
    }
}

impl fmt::Display for ParsePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PreLoader => write!(f, "pre-loader"),
            Self::PostLoader => write!(f, "post-loader"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Module format used by a page's scripts.
///
/// Picks which [`ScriptParser`] variant scans post-loader scripts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModuleFormat {
    /// Legacy per-statement `dojo.require("x.y")` modules.
    #[default]
    NonAmd,
    /// Asynchronous module definitions: `require([...])` / `define([...])`.
    Amd,
}

impl fmt::Display for ModuleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonAmd => write!(f, "non-amd"),
            Self::Amd => write!(f, "amd"),
        }
    }
}
