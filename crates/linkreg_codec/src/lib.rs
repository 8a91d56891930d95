//! # linkreg Codec
//!
//! Line-oriented text formats for linkreg.
//!
//! This crate only turns text into typed lines and back. It performs no I/O
//! and knows nothing about stores, ordering or cross-references.
//!
//! ## Formats
//!
//! - Asset files: `<hash> <size_bytes:u32> <flags:u8>` per line
//! - User files: `<username> <user_id:u32> <hash>*` per line
//! - Battle histories: `BATTLE:` / `DATE:` / `FLEET:` blocks
//!
//! In every format `;` starts a comment that runs to the end of the line,
//! and blank lines are ignored. Decoding is strict: the first malformed line
//! fails the whole document.
//!
//! ## Usage
//!
//! ```
//! use linkreg_codec::{decode_assets, AssetLine};
//!
//! let lines = decode_assets("a1 100 1 ; first\n\nz9 50 2\n").unwrap();
//! assert_eq!(lines[1], AssetLine::new("z9", 50, 2));
//! assert_eq!(lines[0].to_string(), "a1 100 1");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod asset;
mod battle;
mod error;
mod lines;
mod user;

pub use asset::{decode_assets, AssetLine};
pub use battle::{
    decode_history, is_valid_fleet_field, BattleBlock, Directive, FleetLine, BATTLE_PREFIX,
    DATE_PREFIX, FLEET_PREFIX, FLEET_SEPARATOR,
};
pub use error::{CodecError, CodecResult};
pub use lines::{
    is_valid_text_field, is_valid_token, logical_lines, strip_comment, LogicalLine, COMMENT_CHAR,
};
pub use user::{decode_users, UserLine};
