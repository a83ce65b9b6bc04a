//! Factory functions for every parser, the usual way of building a grammar.
//!
//! ```
//! use tokenchain::prelude::*;
//!
//! let ctx = BasicParserContext::default();
//! let list = parsers::sequence()
//!     .required(parsers::long(10))
//!     .required(
//!         parsers::sequence()
//!             .required(parsers::string(",", CaseSensitivity::Sensitive))
//!             .required(parsers::long(10))
//!             .build()
//!             .repeating(),
//!     )
//!     .build()
//!     .and_empty_text_cursor();
//!
//! let token = list.parse_text("1,2,3", &ctx).unwrap().unwrap();
//! assert_eq!(token.text(), "1,2,3");
//! assert!(list.parse_text("1,2,", &ctx).unwrap().is_none());
//! ```

use std::sync::Arc;

use crate::char_predicate::CharPredicate;
use crate::date_time_parser::{DateTimeKind, DateTimeParser};
use crate::error::PatternError;
use crate::number_parser::{BigDecimalParser, BigIntegerParser, DoubleParser, LongParser};
use crate::parser::SharedParser;
use crate::text_parser::{
    CaseSensitivity, CharacterParser, EndOfTextParser, InitialAndPartParser, QuotedParser,
    StringCharsParser, StringParser, SurroundParser, UnicodeEscapeCharacterParser,
};

pub use crate::combo::{
    alternatives, and_not, custom_to_string, fixed, optional, repeated, transform,
    ParserReference, SequenceParserBuilder,
};
pub use crate::report::report;

pub fn string(literal: &str, case_sensitivity: CaseSensitivity) -> SharedParser {
    Arc::new(StringParser::new(literal, case_sensitivity))
}

pub fn character(predicate: CharPredicate) -> SharedParser {
    Arc::new(CharacterParser::new(predicate))
}

/// # Panics
///
/// If `min` is zero or greater than `max`.
pub fn string_chars(predicate: CharPredicate, min: usize, max: usize) -> SharedParser {
    Arc::new(StringCharsParser::new(predicate, min, max))
}

/// # Panics
///
/// If `min` is zero or greater than `max`.
pub fn string_initial_and_part_chars(
    initial: CharPredicate,
    part: CharPredicate,
    min: usize,
    max: usize,
) -> SharedParser {
    Arc::new(InitialAndPartParser::new(initial, part, min, max))
}

pub fn single_quoted() -> SharedParser {
    Arc::new(QuotedParser::single())
}

pub fn double_quoted() -> SharedParser {
    Arc::new(QuotedParser::double())
}

pub fn surround(open: &str, close: &str) -> SharedParser {
    Arc::new(SurroundParser::new(open, close))
}

pub fn unicode_escape_character() -> SharedParser {
    Arc::new(UnicodeEscapeCharacterParser)
}

pub fn end_of_text() -> SharedParser {
    Arc::new(EndOfTextParser)
}

/// # Panics
///
/// If `radix` is outside `2..=36`.
pub fn long(radix: u32) -> SharedParser {
    Arc::new(LongParser::new(radix))
}

/// # Panics
///
/// If `radix` is outside `2..=36`.
pub fn big_integer(radix: u32) -> SharedParser {
    Arc::new(BigIntegerParser::new(radix))
}

pub fn big_decimal() -> SharedParser {
    Arc::new(BigDecimalParser)
}

pub fn double() -> SharedParser {
    Arc::new(DoubleParser)
}

fn date_time(kind: DateTimeKind, pattern: &str) -> Result<SharedParser, PatternError> {
    Ok(Arc::new(DateTimeParser::new(kind, pattern)?))
}

pub fn local_date(pattern: &str) -> Result<SharedParser, PatternError> {
    date_time(DateTimeKind::LocalDate, pattern)
}

pub fn local_time(pattern: &str) -> Result<SharedParser, PatternError> {
    date_time(DateTimeKind::LocalTime, pattern)
}

pub fn local_date_time(pattern: &str) -> Result<SharedParser, PatternError> {
    date_time(DateTimeKind::LocalDateTime, pattern)
}

pub fn offset_date_time(pattern: &str) -> Result<SharedParser, PatternError> {
    date_time(DateTimeKind::OffsetDateTime, pattern)
}

pub fn sequence() -> SequenceParserBuilder {
    SequenceParserBuilder::default()
}
