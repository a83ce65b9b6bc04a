use std::fmt;

use crate::char_predicate::CharPredicate;
use crate::context::ParserContext;
use crate::cursor::TextCursor;
use crate::error::ParseError;
use crate::logging::Loggable;
use crate::parser::{matched, no_match, ParseResult, Parser};
use crate::token::ParserToken;
use crate::util;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CaseSensitivity {
    #[default]
    Sensitive,
    Insensitive,
}

impl CaseSensitivity {
    #[inline]
    pub fn matches(self, a: char, b: char) -> bool {
        match self {
            Self::Sensitive => a == b,
            Self::Insensitive => a == b || a.to_lowercase().eq(b.to_lowercase()),
        }
    }
}

/// Matches a fixed literal, producing a string token of the text as written.
#[derive(Debug, Clone, PartialEq)]
pub struct StringParser {
    literal: String,
    case_sensitivity: CaseSensitivity,
}

impl StringParser {
    pub fn new(literal: impl Into<String>, case_sensitivity: CaseSensitivity) -> Self {
        Self {
            literal: literal.into(),
            case_sensitivity,
        }
    }

    pub fn literal(&self) -> &str {
        &self.literal
    }
}

impl Parser for StringParser {
    fn parse(&self, cursor: &mut dyn TextCursor, _context: &dyn ParserContext) -> ParseResult {
        cursor.log_inputs("string", self);
        let save = cursor.save();
        for expected in self.literal.chars() {
            match cursor.at() {
                Some(c) if self.case_sensitivity.matches(c, expected) => cursor.advance(),
                _ => return no_match(cursor, &save, self),
            }
        }
        let text = cursor.text_between(&save).to_string();
        matched(cursor, self, ParserToken::string(text.clone(), text))
    }
}

impl fmt::Display for StringParser {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&util::quote_and_escape(&self.literal))
    }
}

/// A single character satisfying a predicate.
#[derive(Debug, Clone, PartialEq)]
pub struct CharacterParser {
    predicate: CharPredicate,
}

impl CharacterParser {
    pub fn new(predicate: CharPredicate) -> Self {
        Self { predicate }
    }
}

impl Parser for CharacterParser {
    fn parse(&self, cursor: &mut dyn TextCursor, _context: &dyn ParserContext) -> ParseResult {
        cursor.log_inputs("character", self);
        let save = cursor.save();
        match cursor.at() {
            Some(c) if self.predicate.test(c) => {
                cursor.advance();
                matched(cursor, self, ParserToken::character(c, c.to_string()))
            }
            _ => no_match(cursor, &save, self),
        }
    }
}

impl fmt::Display for CharacterParser {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.predicate)
    }
}

fn write_bounds(f: &mut fmt::Formatter, min: usize, max: usize) -> fmt::Result {
    if max == usize::MAX {
        write!(f, "{{{min},}}")
    } else {
        write!(f, "{{{min},{max}}}")
    }
}

/// A run of characters all satisfying one predicate. Scanning stops after `max`
/// characters, so a longer run is truncated rather than rejected.
#[derive(Debug, Clone, PartialEq)]
pub struct StringCharsParser {
    predicate: CharPredicate,
    min: usize,
    max: usize,
}

impl StringCharsParser {
    /// # Panics
    ///
    /// If `min` is zero or greater than `max`.
    pub fn new(predicate: CharPredicate, min: usize, max: usize) -> Self {
        assert!(min > 0, "min length {min} must be greater than 0");
        assert!(min <= max, "min length {min} must be <= max length {max}");
        Self { predicate, min, max }
    }
}

impl Parser for StringCharsParser {
    fn parse(&self, cursor: &mut dyn TextCursor, _context: &dyn ParserContext) -> ParseResult {
        cursor.log_inputs("string chars", self);
        let save = cursor.save();
        let mut count = 0;
        while count < self.max {
            match cursor.at() {
                Some(c) if self.predicate.test(c) => {
                    cursor.advance();
                    count += 1;
                }
                _ => break,
            }
        }
        if count < self.min {
            return no_match(cursor, &save, self);
        }
        let text = cursor.text_between(&save).to_string();
        matched(cursor, self, ParserToken::string(text.clone(), text))
    }
}

impl fmt::Display for StringCharsParser {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.predicate)?;
        write_bounds(f, self.min, self.max)
    }
}

/// One `initial` character followed by any number of `part` characters, eg an
/// identifier. Unlike [`StringCharsParser`] the whole run is consumed and a run
/// longer than `max` fails.
#[derive(Debug, Clone, PartialEq)]
pub struct InitialAndPartParser {
    initial: CharPredicate,
    part: CharPredicate,
    min: usize,
    max: usize,
}

impl InitialAndPartParser {
    /// # Panics
    ///
    /// If `min` is zero or greater than `max`.
    pub fn new(initial: CharPredicate, part: CharPredicate, min: usize, max: usize) -> Self {
        assert!(min > 0, "min length {min} must be greater than 0");
        assert!(min <= max, "min length {min} must be <= max length {max}");
        Self {
            initial,
            part,
            min,
            max,
        }
    }
}

impl Parser for InitialAndPartParser {
    fn parse(&self, cursor: &mut dyn TextCursor, _context: &dyn ParserContext) -> ParseResult {
        cursor.log_inputs("initial+part", self);
        let save = cursor.save();
        match cursor.at() {
            Some(c) if self.initial.test(c) => cursor.advance(),
            _ => return no_match(cursor, &save, self),
        }
        let mut count = 1;
        while let Some(c) = cursor.at() {
            if !self.part.test(c) {
                break;
            }
            cursor.advance();
            count += 1;
        }
        if count < self.min || count > self.max {
            return no_match(cursor, &save, self);
        }
        let text = cursor.text_between(&save).to_string();
        matched(cursor, self, ParserToken::string(text.clone(), text))
    }
}

impl fmt::Display for InitialAndPartParser {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {}*", self.initial, self.part)
    }
}

/// Decodes pending `\uXXXX` code units, pairing surrogates. Lone surrogates become
/// U+FFFD.
fn flush_utf16(units: &mut Vec<u16>, out: &mut String) {
    if !units.is_empty() {
        out.extend(
            char::decode_utf16(units.drain(..)).map(|r| r.unwrap_or(char::REPLACEMENT_CHARACTER)),
        );
    }
}

/// Either a single or double quoted string with backslash escapes. Once the opening
/// quote has matched, malformed content is an error rather than a non-match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotedParser {
    quote: char,
}

impl QuotedParser {
    pub fn single() -> Self {
        Self { quote: '\'' }
    }

    pub fn double() -> Self {
        Self { quote: '"' }
    }

    fn unterminated(&self, cursor: &dyn TextCursor) -> ParseError {
        ParseError::UnterminatedQuote {
            quote: self.quote,
            line_info: cursor.line_info(),
        }
    }

    fn read_hex4(&self, cursor: &mut dyn TextCursor) -> Result<u16, ParseError> {
        let mut code = 0_u16;
        for _ in 0..4 {
            let c = cursor.at().ok_or_else(|| self.unterminated(cursor))?;
            let digit = c.to_digit(16).ok_or_else(|| ParseError::InvalidUnicodeEscape {
                found: c,
                line_info: cursor.line_info(),
            })?;
            code = code * 16 + digit as u16;
            cursor.advance();
        }
        Ok(code)
    }

    fn escaped(&self, c: char, cursor: &dyn TextCursor) -> Result<char, ParseError> {
        Ok(match c {
            '0' => '\0',
            'b' => '\u{8}',
            't' => '\t',
            'n' => '\n',
            'f' => '\u{c}',
            'r' => '\r',
            '\'' | '"' | '\\' => c,
            _ => {
                return Err(ParseError::InvalidEscape {
                    found: c,
                    line_info: cursor.line_info(),
                })
            }
        })
    }
}

impl Parser for QuotedParser {
    fn parse(&self, cursor: &mut dyn TextCursor, _context: &dyn ParserContext) -> ParseResult {
        cursor.log_inputs("quoted", self);
        let save = cursor.save();
        if cursor.at() != Some(self.quote) {
            return no_match(cursor, &save, self);
        }
        cursor.advance();

        let mut value = String::new();
        let mut units = Vec::new();
        loop {
            match cursor.at() {
                None => return Err(self.unterminated(cursor)),
                Some(c) if c == self.quote => {
                    cursor.advance();
                    break;
                }
                Some('\\') => {
                    cursor.advance();
                    let c = cursor.at().ok_or_else(|| self.unterminated(cursor))?;
                    if c == 'u' {
                        cursor.advance();
                        units.push(self.read_hex4(cursor)?);
                        continue;
                    }
                    let unescaped = self.escaped(c, cursor)?;
                    flush_utf16(&mut units, &mut value);
                    value.push(unescaped);
                    cursor.advance();
                }
                Some(c) => {
                    flush_utf16(&mut units, &mut value);
                    value.push(c);
                    cursor.advance();
                }
            }
        }
        flush_utf16(&mut units, &mut value);

        let text = cursor.text_between(&save).to_string();
        let token = if self.quote == '"' {
            ParserToken::double_quoted(value, text)
        } else {
            ParserToken::single_quoted(value, text)
        };
        match token {
            Ok(token) => matched(cursor, self, token),
            // the text is always delimited by the quote
            Err(_) => no_match(cursor, &save, self),
        }
    }
}

impl fmt::Display for QuotedParser {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.quote == '"' {
            f.write_str("double quoted string")
        } else {
            f.write_str("single quoted string")
        }
    }
}

/// Text from `open` up to and including the first following `close`, eg a block
/// comment. Nesting is not recognised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurroundParser {
    open: String,
    close: String,
}

impl SurroundParser {
    pub fn new(open: impl Into<String>, close: impl Into<String>) -> Self {
        Self {
            open: open.into(),
            close: close.into(),
        }
    }
}

/// Consumes `literal` exactly, or nothing.
pub(crate) fn consume_literal(cursor: &mut dyn TextCursor, literal: &str) -> bool {
    let save = cursor.save();
    for expected in literal.chars() {
        if cursor.at() != Some(expected) {
            cursor.restore(&save);
            return false;
        }
        cursor.advance();
    }
    true
}

impl Parser for SurroundParser {
    fn parse(&self, cursor: &mut dyn TextCursor, _context: &dyn ParserContext) -> ParseResult {
        cursor.log_inputs("surround", self);
        let save = cursor.save();
        if !consume_literal(cursor, &self.open) {
            return no_match(cursor, &save, self);
        }
        loop {
            if consume_literal(cursor, &self.close) {
                let text = cursor.text_between(&save).to_string();
                return matched(cursor, self, ParserToken::string(text.clone(), text));
            }
            if cursor.is_empty() {
                return no_match(cursor, &save, self);
            }
            cursor.advance();
        }
    }
}

impl fmt::Display for SurroundParser {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}...{}", self.open, self.close)
    }
}

/// `\uXXXX` outside of a quoted string, producing a character token. Anything else,
/// including a lone surrogate, is a non-match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UnicodeEscapeCharacterParser;

impl Parser for UnicodeEscapeCharacterParser {
    fn parse(&self, cursor: &mut dyn TextCursor, _context: &dyn ParserContext) -> ParseResult {
        cursor.log_inputs("unicode escape", self);
        let save = cursor.save();
        if !consume_literal(cursor, "\\u") {
            return no_match(cursor, &save, self);
        }
        let mut code = 0_u32;
        for _ in 0..4 {
            match cursor.at().and_then(|c| c.to_digit(16)) {
                Some(digit) => {
                    code = code * 16 + digit;
                    cursor.advance();
                }
                None => return no_match(cursor, &save, self),
            }
        }
        match char::from_u32(code) {
            Some(c) => {
                let text = cursor.text_between(&save).to_string();
                matched(cursor, self, ParserToken::character(c, text))
            }
            None => no_match(cursor, &save, self),
        }
    }
}

impl fmt::Display for UnicodeEscapeCharacterParser {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("unicode escape")
    }
}

/// Matches only an empty cursor, producing a zero width string token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EndOfTextParser;

impl Parser for EndOfTextParser {
    fn parse(&self, cursor: &mut dyn TextCursor, _context: &dyn ParserContext) -> ParseResult {
        cursor.log_inputs("end of text", self);
        let save = cursor.save();
        if cursor.is_empty() {
            matched(cursor, self, ParserToken::string("", ""))
        } else {
            no_match(cursor, &save, self)
        }
    }
}

impl fmt::Display for EndOfTextParser {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("end of text")
    }
}
