//! Shared helpers
//!
//! - [`path_validation`] - checks for paths built from client or page input

pub mod path_validation;

pub use path_validation::{validate_no_traversal, validate_path_segment};
