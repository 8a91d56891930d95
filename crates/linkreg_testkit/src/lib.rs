//! # linkreg Testkit
//!
//! Test utilities for linkreg.
//!
//! This crate provides:
//! - Temp-file fixtures and sample documents
//! - Property-based test generators using proptest
//! - A model-checked integration harness for the registry
//!
//! ## Usage
//!
//! ```rust,ignore
//! use linkreg_testkit::prelude::*;
//!
//! #[test]
//! fn test_with_files() {
//!     with_sample_registry(|registry, files| {
//!         registry.delete_asset("m5").unwrap();
//!         registry.save_assets(&files.assets_path()).unwrap();
//!     });
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod integration;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::integration::*;
}

pub use fixtures::*;
pub use generators::*;
pub use integration::*;
