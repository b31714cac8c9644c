//! Integration test suite for dtk-build
//!
//! End-to-end tests of the public API against real files in temporary
//! directories.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **page_analysis**: loader detection, module formats and discovered modules
//! - **build_request**: request parsing, profile rendering and result paths
//! - **determinism**: build reference stability and ordering policy
//! - **config**: wiring collaborators from the service configuration

mod build_request;
mod config;
mod determinism;
mod page_analysis;
