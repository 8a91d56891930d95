//! Error types for the codec crate.

use thiserror::Error;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur while decoding a text line or document.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// A required field was absent.
    #[error("missing field: {field}")]
    MissingField {
        /// Name of the missing field.
        field: &'static str,
    },

    /// A field was present but empty after trimming.
    #[error("empty field: {field}")]
    EmptyField {
        /// Name of the empty field.
        field: &'static str,
    },

    /// The line carried more fields than the format allows.
    #[error("unexpected field: {value:?}")]
    UnexpectedField {
        /// The first surplus field.
        value: String,
    },

    /// A numeric field did not parse or did not fit its width.
    #[error("invalid number for {field}: {value:?}")]
    InvalidNumber {
        /// Name of the numeric field.
        field: &'static str,
        /// The raw text that failed to parse.
        value: String,
    },

    /// A battle-history line did not start with a known directive.
    #[error("unknown directive: {text:?}")]
    UnknownDirective {
        /// The offending line.
        text: String,
    },

    /// Directives appeared in an order the block grammar forbids.
    #[error("out of order: {message}")]
    OutOfOrder {
        /// Description of the ordering violation.
        message: String,
    },

    /// Wraps another error with the 1-based source line it came from.
    #[error("line {line}: {source}")]
    AtLine {
        /// 1-based line number.
        line: usize,
        /// The underlying error.
        #[source]
        source: Box<CodecError>,
    },
}

impl CodecError {
    /// Create an unexpected field error.
    pub fn unexpected_field(value: impl Into<String>) -> Self {
        Self::UnexpectedField {
            value: value.into(),
        }
    }

    /// Create an invalid number error.
    pub fn invalid_number(field: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidNumber {
            field,
            value: value.into(),
        }
    }

    /// Create an unknown directive error.
    pub fn unknown_directive(text: impl Into<String>) -> Self {
        Self::UnknownDirective { text: text.into() }
    }

    /// Create an out of order error.
    pub fn out_of_order(message: impl Into<String>) -> Self {
        Self::OutOfOrder {
            message: message.into(),
        }
    }

    /// Attaches a source line number. Already located errors keep their line.
    #[must_use]
    pub fn at_line(self, line: usize) -> Self {
        match self {
            located @ Self::AtLine { .. } => located,
            other => Self::AtLine {
                line,
                source: Box::new(other),
            },
        }
    }

    /// Returns the source line, if known.
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::AtLine { line, .. } => Some(*line),
            _ => None,
        }
    }

    /// Returns the innermost error with location stripped.
    pub fn root(&self) -> &CodecError {
        match self {
            Self::AtLine { source, .. } => source.root(),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn at_line_wraps_once() {
        let err = CodecError::MissingField { field: "hash" }.at_line(3).at_line(9);
        assert_eq!(err.line(), Some(3));
        assert_eq!(err.root(), &CodecError::MissingField { field: "hash" });
    }

    #[test]
    fn display_includes_line() {
        let err = CodecError::invalid_number("size_bytes", "12x").at_line(4);
        assert_eq!(
            err.to_string(),
            "line 4: invalid number for size_bytes: \"12x\""
        );
    }
}
