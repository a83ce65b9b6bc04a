use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::context::ParserContext;
use crate::cursor::{SavePoint, StringCursor, TextCursor};
use crate::error::ParseError;
use crate::logging::Loggable;
use crate::report::{ParserReporter, ReportCondition};
use crate::token::ParserToken;
use crate::{combo, report};

/// `Ok(Some(token))` on a match, `Ok(None)` on an ordinary non-match (cursor
/// restored), `Err` when the input is malformed beyond recovery.
pub type ParseResult = Result<Option<ParserToken>, ParseError>;

/// Supports `PartialEq` between parser trait objects. Implemented for every
/// `PartialEq + 'static` type.
#[doc(hidden)]
pub trait DynParserEq {
    fn as_any(&self) -> &dyn Any;
    fn dyn_eq(&self, other: &dyn Any) -> bool;
}

impl<T: PartialEq + Any> DynParserEq for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn dyn_eq(&self, other: &dyn Any) -> bool {
        other.downcast_ref::<T>().map_or(false, |other| self == other)
    }
}

/// Attempts to consume a prefix of the cursor's remaining text.
///
/// Parsers hold no per-call state, so one instance may be shared between threads
/// and used against any number of cursors. The `Display` form describes what the
/// parser expects and is used in error messages.
pub trait Parser: DynParserEq + fmt::Display + fmt::Debug + Send + Sync {
    fn parse(&self, cursor: &mut dyn TextCursor, context: &dyn ParserContext) -> ParseResult;
}

impl PartialEq for dyn Parser {
    fn eq(&self, other: &Self) -> bool {
        self.dyn_eq(other.as_any())
    }
}

pub type SharedParser = Arc<dyn Parser>;

/// Maps a successful token to another, eg decoding a sequence into a node.
pub type TokenTransformer = Arc<dyn Fn(ParserToken, &dyn ParserContext) -> ParserToken + Send + Sync>;

/// Restores `save` and traces the miss, the common tail of every failing parse.
pub(crate) fn no_match(
    cursor: &mut dyn TextCursor,
    save: &SavePoint,
    parser: &dyn fmt::Display,
) -> ParseResult {
    cursor.restore(save);
    cursor.log_failure("no match", parser, &"");
    Ok(None)
}

pub(crate) fn matched(cursor: &dyn TextCursor, parser: &dyn fmt::Display, token: ParserToken) -> ParseResult {
    cursor.log_success_with_result("matched", parser, &token);
    Ok(Some(token))
}

/// Runs `parser` over the whole of `text`, which need not be consumed entirely.
pub fn parse_text(parser: &dyn Parser, text: &str, context: &dyn ParserContext) -> ParseResult {
    let mut cursor = StringCursor::new(text);
    parser.parse(&mut cursor, context)
}

/// Combinator methods for [`SharedParser`].
pub trait ParserExt {
    fn or(self, other: SharedParser) -> SharedParser;
    fn and_not(self, not: SharedParser) -> SharedParser;
    fn optional(self) -> SharedParser;
    fn repeating(self) -> SharedParser;
    fn transform<F>(self, f: F) -> SharedParser
    where
        F: Fn(ParserToken, &dyn ParserContext) -> ParserToken + Send + Sync + 'static;
    fn set_to_string(self, name: impl Into<String>) -> SharedParser;
    fn or_report(self, reporter: Arc<dyn ParserReporter>) -> SharedParser;
    fn or_fail_if_cursor_not_empty(self, reporter: Arc<dyn ParserReporter>) -> SharedParser;
    fn and_empty_text_cursor(self) -> SharedParser;
    fn parse_text(&self, text: &str, context: &dyn ParserContext) -> ParseResult;
}

impl ParserExt for SharedParser {
    fn or(self, other: SharedParser) -> SharedParser {
        combo::alternatives(vec![self, other])
    }

    fn and_not(self, not: SharedParser) -> SharedParser {
        combo::and_not(self, not)
    }

    fn optional(self) -> SharedParser {
        combo::optional(self)
    }

    fn repeating(self) -> SharedParser {
        combo::repeated(self)
    }

    fn transform<F>(self, f: F) -> SharedParser
    where
        F: Fn(ParserToken, &dyn ParserContext) -> ParserToken + Send + Sync + 'static,
    {
        combo::transform(self, Arc::new(f))
    }

    fn set_to_string(self, name: impl Into<String>) -> SharedParser {
        combo::custom_to_string(self, name)
    }

    fn or_report(self, reporter: Arc<dyn ParserReporter>) -> SharedParser {
        report::report(self, ReportCondition::Always, reporter)
    }

    fn or_fail_if_cursor_not_empty(self, reporter: Arc<dyn ParserReporter>) -> SharedParser {
        report::report(self, ReportCondition::CursorNotEmpty, reporter)
    }

    fn and_empty_text_cursor(self) -> SharedParser {
        combo::and_empty_text_cursor(self)
    }

    fn parse_text(&self, text: &str, context: &dyn ParserContext) -> ParseResult {
        parse_text(self.as_ref(), text, context)
    }
}
