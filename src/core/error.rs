//! Error handling for dtk-build
//!
//! This module provides the error types shared by the page analyzer and the
//! build-request engine, plus user-friendly error reporting for front ends that
//! embed the crate. The error system follows two principles:
//! 1. **Strongly-typed errors** for precise error handling in code
//! 2. **User-friendly messages** with actionable suggestions
//!
//! # Architecture
//!
//! - [`DtkError`] - Enumerated error types for every failure case in the core
//! - [`ErrorClass`] - Whether an error was caused by the caller's input or by
//!   the service itself
//! - [`ErrorContext`] - Wrapper that adds user-friendly messages and suggestions
//!
//! # Error Classes
//!
//! Callers that expose the core over some request/response surface must keep
//! client mistakes and internal failures apart:
//! - **Client**: [`DtkError::InvalidRequest`], [`DtkError::UndeclaredPackage`]
//! - **Internal**: everything else, e.g. [`DtkError::DigestFailed`],
//!   [`DtkError::ProfileRender`], [`DtkError::FatalAnalysis`]
//!
//! # Examples
//!
//! ```rust,no_run
//! use dtk_build::core::{DtkError, ErrorClass, user_friendly_error};
//!
//! let error = DtkError::InvalidRequest {
//!     reason: "missing field `layers`".to_string(),
//! };
//! assert_eq!(error.class(), ErrorClass::Client);
//!
//! let ctx = user_friendly_error(anyhow::Error::from(error));
//! ctx.display();
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for dtk-build operations.
///
/// # Error Categories
///
/// ## Page Analysis
/// - [`FatalAnalysis`] - The analysis pass hit a fatal condition; no results exist
///
/// ## Build Requests
/// - [`InvalidRequest`] - The submitted request is malformed or names unsafe paths
/// - [`UndeclaredPackage`] - A layer module names a package the request never declared
/// - [`DigestFailed`] - Canonicalization or hashing of the parameters failed
/// - [`ProfileRender`] - The build profile could not be serialized
/// - [`PackageNotFound`] - The package repository has no location for a package
///
/// ## Configuration
/// - [`ConfigError`], [`TomlError`]
///
/// [`FatalAnalysis`]: DtkError::FatalAnalysis
/// [`InvalidRequest`]: DtkError::InvalidRequest
/// [`UndeclaredPackage`]: DtkError::UndeclaredPackage
/// [`DigestFailed`]: DtkError::DigestFailed
/// [`ProfileRender`]: DtkError::ProfileRender
/// [`PackageNotFound`]: DtkError::PackageNotFound
/// [`ConfigError`]: DtkError::ConfigError
/// [`TomlError`]: DtkError::TomlError
#[derive(Error, Debug)]
pub enum DtkError {
    /// Page analysis entered its terminal error phase.
    ///
    /// Raised only when discovered modules are queried. Modules found before
    /// the failure are never exposed.
    #[error("Page analysis failed: {reason}")]
    FatalAnalysis {
        /// What made the analysis pass fatal
        reason: String,
    },

    /// The build request is malformed or fails validation.
    #[error("Invalid build request: {reason}")]
    InvalidRequest {
        /// Description of the malformed input
        reason: String,
    },

    /// A layer module references a package missing from the request's package list.
    #[error("Module '{module}' belongs to package '{package}', which the build request does not declare")]
    UndeclaredPackage {
        /// The module name as listed in the layer
        module: String,
        /// The package the module claims to belong to
        package: String,
    },

    /// Build reference generation failed.
    ///
    /// A request without a reference is never usable or cacheable, so this
    /// aborts request construction.
    #[error("Failed to compute build reference: {reason}")]
    DigestFailed {
        /// The underlying canonicalization or hashing failure
        reason: String,
    },

    /// Build profile rendering failed.
    #[error("Failed to render build profile: {reason}")]
    ProfileRender {
        /// The underlying serialization failure
        reason: String,
    },

    /// The package repository could not locate a package.
    #[error("Package '{name}' version '{version}' is not available: {reason}")]
    PackageNotFound {
        /// Package name
        name: String,
        /// Requested version
        version: String,
        /// The repository's explanation
        reason: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the configuration error
        message: String,
    },

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// Other error
    #[error("{message}")]
    Other {
        /// Generic error message
        message: String,
    },
}

/// Which side of a request/response boundary an error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    /// The caller supplied input that cannot be processed; resubmitting the
    /// same input will fail the same way.
    Client,
    /// The service failed while processing valid input.
    Internal,
}

impl DtkError {
    /// Classify this error as caller-caused or service-caused.
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::InvalidRequest {
                ..
            }
            | Self::UndeclaredPackage {
                ..
            } => ErrorClass::Client,
            _ => ErrorClass::Internal,
        }
    }

    /// Shorthand for `self.class() == ErrorClass::Client`.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(self.class(), ErrorClass::Client)
    }
}

impl Clone for DtkError {
    fn clone(&self) -> Self {
        match self {
            Self::FatalAnalysis {
                reason,
            } => Self::FatalAnalysis {
                reason: reason.clone(),
            },
            Self::InvalidRequest {
                reason,
            } => Self::InvalidRequest {
                reason: reason.clone(),
            },
            Self::UndeclaredPackage {
                module,
                package,
            } => Self::UndeclaredPackage {
                module: module.clone(),
                package: package.clone(),
            },
            Self::DigestFailed {
                reason,
            } => Self::DigestFailed {
                reason: reason.clone(),
            },
            Self::ProfileRender {
                reason,
            } => Self::ProfileRender {
                reason: reason.clone(),
            },
            Self::PackageNotFound {
                name,
                version,
                reason,
            } => Self::PackageNotFound {
                name: name.clone(),
                version: version.clone(),
                reason: reason.clone(),
            },
            Self::ConfigError {
                message,
            } => Self::ConfigError {
                message: message.clone(),
            },
            Self::TomlError(e) => Self::Other {
                message: format!("TOML parsing error: {e}"),
            },
            Self::Other {
                message,
            } => Self::Other {
                message: message.clone(),
            },
        }
    }
}

/// Error context wrapper that provides user-friendly error information.
///
/// # Examples
///
/// ```rust,no_run
/// use dtk_build::core::{DtkError, ErrorContext};
///
/// let context = ErrorContext::new(DtkError::FatalAnalysis {
///     reason: "page has no readable script list".to_string(),
/// })
/// .with_suggestion("Check that the page HTML is well formed")
/// .with_details("No partial module list is returned after a fatal analysis error");
///
/// eprintln!("{context}");
/// ```
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: DtkError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context with no suggestion or details.
    #[must_use]
    pub const fn new(error: DtkError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error, details and suggestion to stderr with terminal colors.
    ///
    /// - Error message: red and bold
    /// - Details: yellow
    /// - Suggestion: green
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error into an [`ErrorContext`] with suggestions where the
/// failure is recognised.
///
/// Known [`DtkError`]s are matched first, then common I/O and parse errors.
/// Anything else becomes [`DtkError::Other`] carrying the full error chain.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(dtk_error) = error.downcast_ref::<DtkError>() {
        return create_error_context(dtk_error.clone());
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        match io_error.kind() {
            std::io::ErrorKind::PermissionDenied => {
                return ErrorContext::new(DtkError::Other {
                    message: format!("Permission denied: {io_error}"),
                })
                .with_suggestion("Check ownership and permissions of the cache and package directories")
                .with_details("The service could not read or write a file it needs");
            }
            std::io::ErrorKind::NotFound => {
                return ErrorContext::new(DtkError::Other {
                    message: format!("File not found: {io_error}"),
                })
                .with_suggestion("Check that the file or directory exists and the path is correct");
            }
            _ => {}
        }
    }

    if let Some(toml_error) = error.downcast_ref::<toml::de::Error>() {
        return ErrorContext::new(DtkError::ConfigError {
            message: toml_error.to_string(),
        })
        .with_suggestion("Check the TOML syntax of the service configuration file")
        .with_details("TOML parsing errors are usually caused by missing quotes or mismatched brackets");
    }

    let chain: Vec<String> = error.chain().map(ToString::to_string).collect();
    ErrorContext::new(DtkError::Other {
        message: chain.join(": "),
    })
}

fn create_error_context(error: DtkError) -> ErrorContext {
    match &error {
        DtkError::FatalAnalysis {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Check that the page is well formed and that its script elements can be enumerated")
            .with_details("No partial module list is returned after a fatal analysis error"),

        DtkError::InvalidRequest {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Submit packages as [{name, version}] and layers as [{name, modules: [{name, package}]}]"),

        DtkError::UndeclaredPackage {
            package,
            ..
        } => {
            let suggestion = format!("Add package '{package}' with a version to the request's package list");
            ErrorContext::new(error).with_suggestion(suggestion)
        }

        DtkError::DigestFailed {
            ..
        } => ErrorContext::new(error)
            .with_details("A build request without a reference cannot be cached or executed"),

        DtkError::ProfileRender {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Correct the request parameters and resubmit; rendering is not retried"),

        DtkError::PackageNotFound {
            name,
            version,
            ..
        } => {
            let suggestion =
                format!("Install '{name}' {version} into the package repository or request an available version");
            ErrorContext::new(error).with_suggestion(suggestion)
        }

        DtkError::ConfigError {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Check the service configuration file (~/.dtk/config.toml by default)"),

        _ => ErrorContext::new(error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = DtkError::UndeclaredPackage {
            module: "dijit.form.Button".to_string(),
            package: "dijit".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Module 'dijit.form.Button' belongs to package 'dijit', which the build request does not declare"
        );

        let error = DtkError::FatalAnalysis {
            reason: "no script list".to_string(),
        };
        assert_eq!(error.to_string(), "Page analysis failed: no script list");
    }

    #[test]
    fn test_error_classes_do_not_overlap() {
        let client = [
            DtkError::InvalidRequest {
                reason: "x".to_string(),
            },
            DtkError::UndeclaredPackage {
                module: "a.b".to_string(),
                package: "a".to_string(),
            },
        ];
        let internal = [
            DtkError::DigestFailed {
                reason: "x".to_string(),
            },
            DtkError::ProfileRender {
                reason: "x".to_string(),
            },
            DtkError::FatalAnalysis {
                reason: "x".to_string(),
            },
            DtkError::PackageNotFound {
                name: "dojo".to_string(),
                version: "1.9".to_string(),
                reason: "missing".to_string(),
            },
        ];

        assert!(client.iter().all(DtkError::is_client_error));
        assert!(internal.iter().all(|e| e.class() == ErrorClass::Internal));
    }

    #[test]
    fn test_error_context_display() {
        let ctx = ErrorContext::new(DtkError::ConfigError {
            message: "bad".to_string(),
        })
        .with_suggestion("fix it")
        .with_details("because");

        let display = format!("{ctx}");
        assert!(display.contains("Configuration error: bad"));
        assert!(display.contains("Details: because"));
        assert!(display.contains("Suggestion: fix it"));
    }

    #[test]
    fn test_user_friendly_error_downcasts_known_errors() {
        let err = anyhow::Error::from(DtkError::UndeclaredPackage {
            module: "dijit.Dialog".to_string(),
            package: "dijit".to_string(),
        });
        let ctx = user_friendly_error(err);
        assert!(matches!(ctx.error, DtkError::UndeclaredPackage { .. }));
        assert!(ctx.suggestion.unwrap().contains("dijit"));
    }

    #[test]
    fn test_user_friendly_error_io_not_found() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let ctx = user_friendly_error(anyhow::Error::from(io_error));
        assert!(matches!(ctx.error, DtkError::Other { .. }));
        assert!(ctx.suggestion.is_some());
    }

    #[test]
    fn test_user_friendly_error_keeps_chain() {
        let err = anyhow::anyhow!("root cause").context("outer");
        let ctx = user_friendly_error(err);
        assert_eq!(ctx.error.to_string(), "outer: root cause");
    }

    #[test]
    fn test_clone_toml_error_becomes_other() {
        let error = DtkError::from(toml::from_str::<toml::Value>("cache_dir = [").unwrap_err());
        match error.clone() {
            DtkError::Other {
                message,
            } => assert!(message.starts_with("TOML parsing error")),
            other => panic!("Expected Other, got {other:?}"),
        }
    }
}
