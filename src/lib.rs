#![warn(clippy::all)]
#![warn(clippy::correctness)]
#![warn(clippy::style)]
#![warn(clippy::complexity)]
#![warn(clippy::perf)]

//! A parser combinator engine.
//!
//! Grammars are built by composing small [`Parser`]s (literals, character
//! predicates, quoted strings, numbers, dates and times) with alternatives,
//! sequences and repetition. A successful parse yields an immutable
//! [`ParserToken`] tree that keeps the exact text consumed, can be walked with a
//! [`ParserTokenVisitor`], regrouped by operator priority with
//! [`ParentToken::binary_operators`], and queried as a tree of [`TokenNode`]s.
//!
//! A parser that does not match returns `Ok(None)` with the cursor where it started.
//! Malformed input that no alternative could accept, such as an unterminated quote,
//! is a [`ParseError`].
//!
//! ```
//! use tokenchain::prelude::*;
//!
//! let ctx = BasicParserContext::default();
//! let token = contrib::expression()
//!     .parse_text("2 * (3 + 4) - 5", &ctx)
//!     .unwrap()
//!     .unwrap();
//! assert_eq!(contrib::evaluate(&token), Some(9.0));
//! ```

mod char_predicate;
mod combo;
mod context;
mod cursor;
mod date_time_parser;
mod error;
mod logging;
mod number_parser;
mod operator;
mod parser;
mod report;
mod text_parser;
mod token;
mod token_node;
mod util;
mod visitor;

pub mod contrib;
pub mod parsers;
pub mod prelude;

pub(crate) const LOG_TARGET: &str = "tc";

pub use crate::char_predicate::CharPredicate;
pub use crate::combo::{
    AlternativesParser, AndEmptyTextCursorParser, AndNotParser, CustomToStringParser,
    FixedParser, OptionalParser, ParserReference, RepeatedParser, SequenceParser,
    SequenceParserBuilder, SequenceParserComponent, TransformParser,
};
pub use crate::context::{
    BasicParserContext, BasicParserContextBuilder, DateTimeFormatCache, ParserContext,
};
pub use crate::cursor::{LineInfo, SavePoint, StringCursor, TextCursor};
pub use crate::date_time_parser::{DateTimeKind, DateTimeParser, DateTimePattern};
pub use crate::error::{ParseError, PatternError, TokenError};
pub use crate::number_parser::{BigDecimalParser, BigIntegerParser, DoubleParser, LongParser};
pub use crate::operator::BinaryOperatorTransformer;
pub use crate::parser::{
    parse_text, DynParserEq, ParseResult, Parser, ParserExt, SharedParser, TokenTransformer,
};
pub use crate::report::{BasicParserReporter, ParserReporter, ReportCondition, ReportParser};
pub use crate::text_parser::{
    CaseSensitivity, CharacterParser, EndOfTextParser, InitialAndPartParser, QuotedParser,
    StringCharsParser, StringParser, SurroundParser, UnicodeEscapeCharacterParser,
};
pub use crate::token::{NodeToken, ParentToken, ParserToken, TokenKind, TokenValue, ValueToken};
pub use crate::token_node::TokenNode;
pub use crate::visitor::{ParserTokenVisitor, Visiting};

pub mod attributes {
    //! Attribute names of a [`TokenNode`](crate::TokenNode).
    pub use crate::token_node::{KIND, TEXT};
}
