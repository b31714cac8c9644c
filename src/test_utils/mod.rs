//! Test utilities for dtk-build
//!
//! Available to unit tests and, through the `test-utils` feature, to the
//! integration suite.
//!
//! - [`init_test_logging`] - route `tracing` output to the test harness
//! - [`SiteFixture`] - a temporary directory of page scripts
//! - [`PackagesFixture`] - a temporary package repository and build cache
//! - [`StaticRepository`] - an in-memory package repository
//!
//! # Example
//!
//! ```rust,ignore
//! use dtk_build::analysis::{PageAnalyzer, ScriptContext};
//! use dtk_build::test_utils::{SiteFixture, init_test_logging};
//!
//! init_test_logging(None);
//! let site = SiteFixture::new().unwrap();
//! site.write_script("js/app/run.js", "require(['app/main']);").unwrap();
//!
//! let page = site
//!     .page()
//!     .script(ScriptContext::external("js/dojo/dojo.js"))
//!     .script(ScriptContext::external("js/app/run.js"));
//! let analyzer = PageAnalyzer::analyze(&page);
//! assert!(analyzer.modules().unwrap().contains("app", "app/main"));
//! ```

pub mod fixtures;

pub use fixtures::{PackagesFixture, SiteFixture, StaticRepository, TOOLKIT_REQUEST_JSON};

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Installs a subscriber once per process. With `Some(level)` that level is
/// used; otherwise `RUST_LOG` decides, and without it nothing is installed.
///
/// ```bash
/// RUST_LOG=dtk_build=trace cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .try_init();
    });
}
