//! Error types for linkreg core.

use linkreg_codec::CodecError;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in linkreg core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Caller passed a key or value the stores cannot hold.
    #[error("invalid argument: {message}")]
    InvalidArgument {
        /// Why the argument was rejected.
        message: String,
    },

    /// A store ran out of addressable slots.
    #[error("allocation failed: {what}")]
    AllocationFailure {
        /// What could not be allocated.
        what: &'static str,
    },

    /// No record or owner with this key exists.
    #[error("not found: {key}")]
    NotFound {
        /// The key that was looked up.
        key: String,
    },

    /// A record or owner with an equal key already exists.
    #[error("duplicate key: {key}")]
    DuplicateKey {
        /// The rejected key.
        key: String,
    },

    /// The owner already references this record.
    #[error("duplicate reference: {owner} already holds {key}")]
    DuplicateReference {
        /// The owner's key.
        owner: String,
        /// The referenced record's key.
        key: String,
    },

    /// The operation needs at least one element.
    #[error("collection is empty")]
    EmptyCollection,

    /// A handle outlived the element it pointed to.
    #[error("stale handle: slot {index} generation {generation}")]
    StaleHandle {
        /// Slot index of the handle.
        index: u32,
        /// Generation recorded in the handle.
        generation: u32,
    },

    /// A file violated its line format.
    #[error("corrupted file: {0}")]
    FileCorrupted(#[source] CodecError),

    /// The file to load does not exist.
    #[error("file not found: {}", path.display())]
    FileNotFound {
        /// Path that was opened.
        path: PathBuf,
    },

    /// Any other I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl CoreError {
    /// Creates an invalid argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(key: impl Into<String>) -> Self {
        Self::NotFound { key: key.into() }
    }

    /// Creates a duplicate key error.
    pub fn duplicate_key(key: impl Into<String>) -> Self {
        Self::DuplicateKey { key: key.into() }
    }

    /// Creates a duplicate reference error.
    pub fn duplicate_reference(owner: impl Into<String>, key: impl Into<String>) -> Self {
        Self::DuplicateReference {
            owner: owner.into(),
            key: key.into(),
        }
    }

    /// Maps an I/O error from opening `path`, turning `NotFound` into
    /// [`CoreError::FileNotFound`].
    pub fn open_failed(path: &Path, err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::NotFound {
            Self::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            Self::Io(err)
        }
    }

    /// Returns true for [`CoreError::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<CodecError> for CoreError {
    fn from(err: CodecError) -> Self {
        Self::FileCorrupted(err)
    }
}
