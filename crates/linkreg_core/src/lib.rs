//! # linkreg Core
//!
//! Ordered record stores linked by non-owning references.
//!
//! This crate provides:
//! - Pluggable key comparators (byte-exact and case-insensitive)
//! - A generational arena and singly/doubly linked lists built on it
//! - The asset store, the user store, and per-user reference lists
//! - The [`Registry`], which keeps references consistent across deletes
//! - All-or-nothing loading and replacing saves
//! - Named asset flags and fleet status bits
//! - A battle history with fleet status operations
//!
//! ## Example
//!
//! ```
//! use linkreg_core::Registry;
//!
//! let mut registry = Registry::new();
//! registry.load_assets_str("a1 100 1\nz9 50 2\nm5 75 0\n").unwrap();
//! registry.load_users_str("Bob 1 a1 m5\n").unwrap();
//!
//! registry.delete_asset("m5").unwrap();
//! let bob = registry.find_user("bob").unwrap();
//! assert_eq!(bob.owned().collect::<Vec<_>>(), vec!["a1"]);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod arena;
mod asset;
mod compare;
mod config;
mod error;
mod flags;
mod galaxy;
pub mod list;
mod persist;
mod refs;
mod registry;
mod user;

pub use asset::{Asset, AssetHandle, AssetStore};
pub use compare::{Bytewise, CaseInsensitive, KeyComparator, KeyOrder};
pub use config::{BattleMerge, Config, ReferencePolicy};
pub use error::{CoreError, CoreResult};
pub use flags::{
    count_01_pairs, count_01_pairs_in_str, decode_names, AssetFlags, FleetStatus, StatusOp,
    ASSET_FLAG_NAMES, FLEET_STATUS_KEYWORDS, STATUS_TEXT_SEPARATOR,
};
pub use galaxy::{Battle, BattleHandle, Fleet, GalaxyHistory, EMPTY_STATUS_TEXT};
pub use refs::RefList;
pub use registry::Registry;
pub use user::{User, UserHandle, UserStore};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
