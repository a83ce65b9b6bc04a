use thiserror::Error;

use crate::cursor::LineInfo;
use crate::token::TokenKind;

/// Raised when the input is malformed and no alternative parser could help.
///
/// An ordinary non-match is never an error, it is `Ok(None)` from
/// [`Parser::parse`](crate::Parser::parse) with the cursor rewound. A `ParseError`
/// leaves the cursor wherever the failure was detected; callers are expected to
/// abort rather than retry.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Missing terminating {quote:?} at {line_info}")]
    UnterminatedQuote { quote: char, line_info: LineInfo },

    #[error("Invalid escape character {found:?} at {line_info}")]
    InvalidEscape { found: char, line_info: LineInfo },

    #[error("Invalid unicode escape, expected hex digit but got {found:?} at {line_info}")]
    InvalidUnicodeEscape { found: char, line_info: LineInfo },

    #[error("Number overflow {text:?} at {line_info}")]
    NumericOverflow { text: String, line_info: LineInfo },

    #[error("Invalid date/time {text:?} at {line_info}: {reason}")]
    InvalidDateTime {
        text: String,
        reason: String,
        line_info: LineInfo,
    },

    /// Produced by a [`ParserReporter`](crate::ParserReporter).
    #[error("{message}")]
    Reported { message: String, line_info: LineInfo },
}

impl ParseError {
    pub fn line_info(&self) -> &LineInfo {
        match self {
            Self::UnterminatedQuote { line_info, .. }
            | Self::InvalidEscape { line_info, .. }
            | Self::InvalidUnicodeEscape { line_info, .. }
            | Self::NumericOverflow { line_info, .. }
            | Self::InvalidDateTime { line_info, .. }
            | Self::Reported { line_info, .. } => line_info,
        }
    }
}

/// A token factory rejected its arguments.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("{kind} requires at least one child token")]
    EmptyChildren { kind: TokenKind },

    #[error("{kind} is a leaf and cannot have children")]
    LeafChildren { kind: TokenKind },

    #[error("Text {text:?} is not enclosed in {quote}")]
    NotQuoted { text: String, quote: char },

    #[error("Whitespace text {text:?} must be non empty whitespace")]
    NotWhitespace { text: String },

    #[error("Unknown attribute {name:?}, only \"text\" may be set")]
    UnknownAttribute { name: String },
}

/// A date/time pattern could not be compiled.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    #[error("Unsupported pattern letter {letter:?} x{count} in {pattern:?}")]
    UnsupportedLetter {
        letter: char,
        count: usize,
        pattern: String,
    },

    #[error("Unterminated quoted literal in {pattern:?}")]
    UnterminatedLiteral { pattern: String },

    #[error("Pattern {pattern:?} has no {field} field")]
    MissingField {
        field: &'static str,
        pattern: String,
    },

    #[error("Empty pattern")]
    Empty,
}
