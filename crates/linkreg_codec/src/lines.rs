//! Logical line splitting shared by every format.
//!
//! A logical line is a physical line with everything from the first `;`
//! removed and surrounding whitespace trimmed. Lines that end up empty are
//! skipped, but numbering always refers to the physical line.

use crate::error::{CodecError, CodecResult};
use std::str::FromStr;

/// Character that starts a trailing comment.
pub const COMMENT_CHAR: char = ';';

/// A non-blank line with its comment removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogicalLine<'a> {
    /// 1-based physical line number.
    pub number: usize,
    /// Trimmed content. Never empty.
    pub text: &'a str,
}

/// Iterates over the logical lines of `input`.
pub fn logical_lines(input: &str) -> impl Iterator<Item = LogicalLine<'_>> {
    input.lines().enumerate().filter_map(|(idx, raw)| {
        let text = strip_comment(raw).trim();
        (!text.is_empty()).then_some(LogicalLine {
            number: idx + 1,
            text,
        })
    })
}

/// Returns `line` up to (not including) the first comment character.
pub fn strip_comment(line: &str) -> &str {
    match line.find(COMMENT_CHAR) {
        Some(pos) => &line[..pos],
        None => line,
    }
}

/// Checks that `token` can be written as a single whitespace-separated field
/// and read back unchanged.
pub fn is_valid_token(token: &str) -> bool {
    !token.is_empty()
        && !token
            .chars()
            .any(|c| c.is_whitespace() || c == COMMENT_CHAR)
}

/// Checks that `text` can be written as the payload of a line that allows
/// inner spaces, such as a battle name, and read back unchanged.
pub fn is_valid_text_field(text: &str) -> bool {
    !text.is_empty()
        && text.trim() == text
        && !text.chars().any(|c| matches!(c, '\n' | '\r' | COMMENT_CHAR))
}

/// Parses an optional numeric field.
pub(crate) fn parse_field<T: FromStr>(value: Option<&str>, field: &'static str) -> CodecResult<T> {
    let raw = value.ok_or(CodecError::MissingField { field })?;
    raw.parse()
        .map_err(|_| CodecError::invalid_number(field, raw))
}

/// Decodes every logical line with `decode_line`, stopping at the first
/// failure and tagging it with its line number.
pub(crate) fn decode_document<T>(
    input: &str,
    decode_line: impl Fn(&str) -> CodecResult<T>,
) -> CodecResult<Vec<T>> {
    logical_lines(input)
        .map(|line| decode_line(line.text).map_err(|e| e.at_line(line.number)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_blank_and_comment_lines() {
        let input = "a 1 2\n\n   \n; full comment\nb 3 4 ; trailing\n";
        let lines: Vec<_> = logical_lines(input).collect();

        assert_eq!(
            lines,
            vec![
                LogicalLine {
                    number: 1,
                    text: "a 1 2"
                },
                LogicalLine {
                    number: 5,
                    text: "b 3 4"
                },
            ]
        );
    }

    #[test]
    fn handles_crlf() {
        let lines: Vec<_> = logical_lines("x 1 1\r\ny 2 2\r\n").collect();
        assert_eq!(lines[0].text, "x 1 1");
        assert_eq!(lines[1].text, "y 2 2");
    }

    #[test]
    fn token_validity() {
        assert!(is_valid_token("abc123"));
        assert!(!is_valid_token(""));
        assert!(!is_valid_token("two words"));
        assert!(!is_valid_token("semi;colon"));
        assert!(!is_valid_token("tab\there"));
    }

    #[test]
    fn text_field_validity() {
        assert!(is_valid_text_field("Battle of Yavin"));
        assert!(!is_valid_text_field(""));
        assert!(!is_valid_text_field(" padded"));
        assert!(!is_valid_text_field("padded "));
        assert!(!is_valid_text_field("Hoth; IV"));
        assert!(!is_valid_text_field("two\nlines"));
    }

    #[test]
    fn parse_field_reports_missing_and_invalid() {
        assert_eq!(
            parse_field::<u32>(None, "size_bytes"),
            Err(CodecError::MissingField { field: "size_bytes" })
        );
        assert_eq!(
            parse_field::<u8>(Some("300"), "flags"),
            Err(CodecError::invalid_number("flags", "300"))
        );
        assert_eq!(parse_field::<u8>(Some("7"), "flags"), Ok(7));
    }
}
