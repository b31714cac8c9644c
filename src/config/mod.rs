//! Configuration management for dtk-build
//!
//! The core itself is configuration-free: every collaborator is passed in
//! explicitly. This module describes how the default collaborators
//! ([`FsPackageRepository`](crate::repository::FsPackageRepository),
//! [`CacheDirectory`](crate::repository::CacheDirectory),
//! [`LocalPage`](crate::analysis::LocalPage)) are set up.
//!
//! # Configuration Priority
//!
//! 1. Environment variables (`DTK_CACHE_DIR`, `DTK_PACKAGES_DIR`)
//! 2. Configuration file (`~/.dtk/config.toml` or `DTK_CONFIG_PATH`)
//! 3. Default values

pub mod service;

pub use service::ServiceConfig;
