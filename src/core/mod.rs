//! Core types shared by the analysis and build halves of the crate.
//!
//! ## `error` - Error Handling
//!
//! - [`DtkError`] - Enumerated error types covering every failure mode
//! - [`ErrorClass`] - Client-facing vs internal classification
//! - [`ErrorContext`] - User-friendly error wrapper with suggestions and details
//! - [`user_friendly_error`] - Convert any error to user-friendly format

pub mod error;

pub use error::{DtkError, ErrorClass, ErrorContext, user_friendly_error};

/// Result alias used by the core's public operations.
pub type Result<T, E = DtkError> = std::result::Result<T, E>;
