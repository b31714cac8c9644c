//! Build request engine.
//!
//! A [`BuildRequest`] wraps the client's [`BuildParameters`] together with
//! their [`BuildReference`], the deterministic cache key. From a request the
//! engine derives:
//!
//! - the bundler profile ([`render_profile`]), which needs a
//!   [`PackageRepository`](crate::repository::PackageRepository) to place each
//!   namespace prefix
//! - the result paths in the build cache ([`BuildResultLocation`]), which need
//!   a [`BuildStatus`](crate::repository::BuildStatus)
//!
//! Running the bundler, packaging the archive and coordinating concurrent
//! builds of the same reference are left to the caller.
//!
//! # Examples
//!
//! ```rust,no_run
//! use dtk_build::build::{BuildParameters, BuildRequest, Layer, LayerModule, PackageRef};
//!
//! let request = BuildRequest::new(BuildParameters {
//!     packages: vec![PackageRef::new("dojo", "1.9")],
//!     optimise: "closure".to_string(),
//!     layers: vec![Layer::new("dojo.js", vec![LayerModule::new("dojo.parser", "dojo")])],
//!     ..BuildParameters::default()
//! })?;
//! println!("{}", request.reference());
//! # Ok::<(), dtk_build::core::DtkError>(())
//! ```

mod digest;
mod location;
mod params;
mod prefix;
mod profile;
mod request;

pub use digest::{BuildReference, compute_digest};
pub use location::BuildResultLocation;
pub use params::{BuildParameters, Layer, LayerModule, PackageRef};
pub use prefix::{ModulePrefix, module_prefix, resolve_prefixes};
pub use profile::{render_profile, render_profile_with};
pub use request::BuildRequest;
