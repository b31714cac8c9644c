//! dtk-build - page dependency analysis and build-request core
//!
//! The core of a build service for a JavaScript toolkit. Clients either point
//! it at a web page to learn which modules the page actually uses, or submit a
//! build request describing packages and layers to bundle. The service caches
//! build results under a deterministic key derived from the request.
//!
//! # Architecture Overview
//!
//! - Page analysis walks a page's script elements in order. Scripts before the
//!   module loader are configuration and are not scanned; every script after it
//!   is parsed for module identifiers, which are made absolute and grouped by
//!   package.
//! - A build request is reduced to a path-safe build reference (SHA-1 over a
//!   canonical serialization), rendered into the bundler's profile, and mapped
//!   onto result paths in the build cache.
//!
//! Fetching pages, running the bundler and serving results are left to the
//! embedding service. Everything here is synchronous and free of global state:
//! package locations and the cache root come from collaborators passed in by
//! the caller.
//!
//! # Core Modules
//!
//! - [`analysis`] - two-phase page analyzer, script parsers and the page flavor trait
//! - [`build`] - build parameters, reference digest, prefix resolution, profile and result paths
//! - [`repository`] - package repository and build cache collaborators
//! - [`config`] - service configuration (`~/.dtk/config.toml`)
//! - [`core`] - error types and user-facing error reporting
//! - [`constants`] - artifact names and defaults shared across modules
//! - [`utils`] - path validation for client and page supplied values
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use dtk_build::build::BuildRequest;
//! use dtk_build::config::ServiceConfig;
//! use dtk_build::repository::{CacheDirectory, FsPackageRepository};
//!
//! # fn example() -> anyhow::Result<()> {
//! let mut config = ServiceConfig::load()?;
//! config.apply_env_overrides();
//!
//! let repository = FsPackageRepository::from_config(&config)?;
//! let cache = CacheDirectory::from_config(&config)?;
//!
//! let request = BuildRequest::from_json(&std::fs::read_to_string("request.json")?)?;
//! if !request.result_archive_path(&cache).exists() {
//!     std::fs::write("profile.js", request.profile_text(&repository)?)?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod analysis;
pub mod build;
pub mod config;
pub mod constants;
pub mod core;
pub mod repository;
pub mod utils;

// test_utils module is available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
