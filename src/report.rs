use std::fmt;
use std::sync::Arc;

use log::debug;

use crate::context::ParserContext;
use crate::cursor::TextCursor;
use crate::error::ParseError;
use crate::parser::{ParseResult, Parser, SharedParser};
use crate::{util, LOG_TARGET};

/// Turns a parse failure into a fatal error describing it.
pub trait ParserReporter: fmt::Debug + Send + Sync {
    fn report(
        &self,
        cursor: &dyn TextCursor,
        context: &dyn ParserContext,
        parser: &dyn Parser,
    ) -> ParseError;
}

/// Reports the unexpected character, its position and line, and what the parser
/// expected:
///
/// `Unrecognized character 'x' at (3,1) "12x" expected Long`
///
/// or `End of text at (3,1)` when the input ran out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BasicParserReporter;

impl ParserReporter for BasicParserReporter {
    fn report(
        &self,
        cursor: &dyn TextCursor,
        _context: &dyn ParserContext,
        parser: &dyn Parser,
    ) -> ParseError {
        let line_info = cursor.line_info();
        let message = match cursor.at() {
            None => format!("End of text at {}", line_info.summary()),
            Some(c) => format!(
                "Unrecognized character {} at {} {} expected {}",
                util::quote_char(c),
                line_info.summary(),
                util::quote_and_escape(line_info.text()),
                parser
            ),
        };
        debug!(target: LOG_TARGET, "{message}");
        ParseError::Reported { message, line_info }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportCondition {
    Always,
    CursorNotEmpty,
}

/// Escalates a failure of the wrapped parser to an error built by a reporter.
#[derive(Debug, Clone)]
pub struct ReportParser {
    parser: SharedParser,
    condition: ReportCondition,
    reporter: Arc<dyn ParserReporter>,
}

pub fn report(
    parser: SharedParser,
    condition: ReportCondition,
    reporter: Arc<dyn ParserReporter>,
) -> SharedParser {
    Arc::new(ReportParser {
        parser,
        condition,
        reporter,
    })
}

impl PartialEq for ReportParser {
    fn eq(&self, other: &Self) -> bool {
        *self.parser == *other.parser
            && self.condition == other.condition
            && Arc::ptr_eq(&self.reporter, &other.reporter)
    }
}

impl Parser for ReportParser {
    fn parse(&self, cursor: &mut dyn TextCursor, context: &dyn ParserContext) -> ParseResult {
        if let Some(token) = self.parser.parse(cursor, context)? {
            return Ok(Some(token));
        }
        match self.condition {
            ReportCondition::CursorNotEmpty if cursor.is_empty() => Ok(None),
            _ => Err(self.reporter.report(&*cursor, context, self.parser.as_ref())),
        }
    }
}

impl fmt::Display for ReportParser {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.parser)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::BasicParserContext;
    use crate::cursor::StringCursor;
    use crate::parser::ParserExt;
    use crate::parsers;
    use crate::token::ParserToken;
    use test_log::test;

    fn run(p: &dyn Parser, s: &str) -> ParseResult {
        let ctx = BasicParserContext::default();
        p.parse(&mut StringCursor::new(s), &ctx)
    }

    fn long_then_end() -> SharedParser {
        parsers::sequence()
            .required(parsers::long(10))
            .required(parsers::end_of_text().or_report(Arc::new(BasicParserReporter)))
            .build()
    }

    #[test]
    fn test_unrecognized_character() {
        let err = run(&*long_then_end(), "12x").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unrecognized character 'x' at (3,1) \"12x\" expected end of text"
        );
        assert_eq!(err.line_info().column_number(), 3);
    }

    #[test]
    fn test_end_of_text() {
        let p = parsers::long(10).or_report(Arc::new(BasicParserReporter));
        let err = run(&*p, "").unwrap_err();
        assert_eq!(err.to_string(), "End of text at (1,1)");
    }

    #[test]
    fn test_report_on_second_line() {
        let p = parsers::sequence()
            .required(parsers::string_chars(
                crate::char_predicate::CharPredicate::any_of("a\n"),
                1,
                usize::MAX,
            ))
            .required(parsers::long(10).or_report(Arc::new(BasicParserReporter)))
            .build();
        let err = run(&*p, "a\naa\tb").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unrecognized character '\\t' at (3,2) \"aa\\tb\" expected Long"
        );
    }

    #[test]
    fn test_cursor_not_empty() {
        let p = parsers::long(10).or_fail_if_cursor_not_empty(Arc::new(BasicParserReporter));
        assert_eq!(run(&*p, "").unwrap(), None);
        assert!(run(&*p, "x").is_err());
        assert_eq!(run(&*p, "5").unwrap(), Some(ParserToken::long(5, "5")));
    }
}
