//! Asset file lines: `<hash> <size_bytes> <flags>`.

use crate::error::{CodecError, CodecResult};
use crate::lines::{decode_document, parse_field};
use std::fmt;

/// One decoded line of an asset file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetLine {
    /// Content hash, the asset's unique key.
    pub hash: String,
    /// File size in bytes.
    pub size_bytes: u32,
    /// Raw flag byte.
    pub flags: u8,
}

impl AssetLine {
    /// Creates an asset line.
    pub fn new(hash: impl Into<String>, size_bytes: u32, flags: u8) -> Self {
        Self {
            hash: hash.into(),
            size_bytes,
            flags,
        }
    }

    /// Decodes a single logical line. Exactly three fields are required.
    ///
    /// # Errors
    ///
    /// Returns an error if a field is missing, surplus, or not a number
    /// of the right width.
    pub fn decode(line: &str) -> CodecResult<Self> {
        let mut fields = line.split_whitespace();
        let hash = fields
            .next()
            .ok_or(CodecError::MissingField { field: "hash" })?;
        let size_bytes = parse_field(fields.next(), "size_bytes")?;
        let flags = parse_field(fields.next(), "flags")?;
        if let Some(extra) = fields.next() {
            return Err(CodecError::unexpected_field(extra));
        }
        Ok(Self::new(hash, size_bytes, flags))
    }
}

impl fmt::Display for AssetLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.hash, self.size_bytes, self.flags)
    }
}

/// Decodes a whole asset document, failing on the first malformed line.
///
/// # Errors
///
/// Returns the first line error, located with [`CodecError::AtLine`].
pub fn decode_assets(input: &str) -> CodecResult<Vec<AssetLine>> {
    decode_document(input, AssetLine::decode)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_valid_line() {
        let line = AssetLine::decode("a1b2c3 1024 5").unwrap();
        assert_eq!(line, AssetLine::new("a1b2c3", 1024, 5));
    }

    #[test]
    fn decode_tolerates_extra_whitespace() {
        let line = AssetLine::decode("  a1 \t 100    1 ").unwrap();
        assert_eq!(line, AssetLine::new("a1", 100, 1));
    }

    #[test]
    fn decode_rejects_two_fields() {
        assert_eq!(
            AssetLine::decode("a1 100"),
            Err(CodecError::MissingField { field: "flags" })
        );
    }

    #[test]
    fn decode_rejects_four_fields() {
        assert_eq!(
            AssetLine::decode("a1 100 1 extra"),
            Err(CodecError::unexpected_field("extra"))
        );
    }

    #[test]
    fn decode_rejects_flag_overflow() {
        assert_eq!(
            AssetLine::decode("a1 100 256"),
            Err(CodecError::invalid_number("flags", "256"))
        );
    }

    #[test]
    fn decode_rejects_negative_size() {
        assert!(matches!(
            AssetLine::decode("a1 -5 1"),
            Err(CodecError::InvalidNumber {
                field: "size_bytes",
                ..
            })
        ));
    }

    #[test]
    fn display_matches_file_format() {
        assert_eq!(AssetLine::new("z9", 50, 2).to_string(), "z9 50 2");
    }

    #[test]
    fn document_keeps_file_order() {
        let lines = decode_assets("a1 100 1\nz9 50 2 ; big one\n\nm5 75 0\n").unwrap();
        let hashes: Vec<_> = lines.iter().map(|l| l.hash.as_str()).collect();
        assert_eq!(hashes, vec!["a1", "z9", "m5"]);
    }

    #[test]
    fn document_error_names_the_line() {
        let err = decode_assets("a1 100 1\n\nbroken\nz9 50 2\n").unwrap_err();
        assert_eq!(err.line(), Some(3));
        assert_eq!(err.root(), &CodecError::MissingField { field: "size_bytes" });
    }
}
