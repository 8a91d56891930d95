//! User file lines: `<username> <user_id> <hash>*`.

use crate::error::{CodecError, CodecResult};
use crate::lines::{decode_document, parse_field};
use std::fmt;

/// One decoded line of a user file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserLine {
    /// Login name.
    pub username: String,
    /// Numeric user identifier.
    pub user_id: u32,
    /// Hashes of owned assets, in file order.
    pub hashes: Vec<String>,
}

impl UserLine {
    /// Creates a user line.
    pub fn new<I, S>(username: impl Into<String>, user_id: u32, hashes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            username: username.into(),
            user_id,
            hashes: hashes.into_iter().map(Into::into).collect(),
        }
    }

    /// Decodes a single logical line.
    ///
    /// # Errors
    ///
    /// Returns an error if the username or id is missing or the id is not
    /// a `u32`.
    pub fn decode(line: &str) -> CodecResult<Self> {
        let mut fields = line.split_whitespace();
        let username = fields
            .next()
            .ok_or(CodecError::MissingField { field: "username" })?;
        let user_id = parse_field(fields.next(), "user_id")?;
        Ok(Self::new(username, user_id, fields))
    }
}

impl fmt::Display for UserLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.username, self.user_id)?;
        for hash in &self.hashes {
            write!(f, " {hash}")?;
        }
        Ok(())
    }
}

/// Decodes a whole user document, failing on the first malformed line.
///
/// # Errors
///
/// Returns the first line error, located with [`CodecError::AtLine`].
pub fn decode_users(input: &str) -> CodecResult<Vec<UserLine>> {
    decode_document(input, UserLine::decode)
}
