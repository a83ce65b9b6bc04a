use std::fmt;
use std::iter;
use std::str::Chars;

use chrono::format::ParseErrorKind;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};

use crate::context::ParserContext;
use crate::cursor::TextCursor;
use crate::error::{ParseError, PatternError};
use crate::logging::Loggable;
use crate::parser::{matched, no_match, ParseResult, Parser};
use crate::token::ParserToken;

/// Width assumed for month and day names and am/pm markers.
const TEXT_FIELD_ESTIMATE: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    /// `min..=max` ASCII digits.
    Digits { min: usize, max: usize },
    Letters,
    /// `+hh:mm` or `+hhmm`.
    Offset { colon: bool },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Item {
    Literal(char),
    Field { letter: char, shape: Shape },
}

/// How much of a window a pattern covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Fit {
    /// The pattern matches this many bytes.
    Whole(usize),
    /// The window ends inside a field, or where a field could continue.
    Short,
    Mismatch,
}

/// Walks a window item by item. `complete` is set when the window reaches the end of
/// input, so running out of text is a mismatch rather than a reason to widen.
struct Fitter<'a> {
    chars: iter::Peekable<Chars<'a>>,
    consumed: usize,
    complete: bool,
}

impl<'a> Fitter<'a> {
    fn exhausted(&self) -> Fit {
        if self.complete {
            Fit::Mismatch
        } else {
            Fit::Short
        }
    }

    fn next_if(&mut self, f: impl Fn(char) -> bool) -> Result<(), Fit> {
        match self.chars.peek() {
            None => Err(self.exhausted()),
            Some(&c) if f(c) => {
                self.consumed += c.len_utf8();
                self.chars.next();
                Ok(())
            }
            Some(_) => Err(Fit::Mismatch),
        }
    }

    /// Takes up to `max` characters satisfying `f`, at least `min` of them.
    fn run(&mut self, min: usize, max: usize, f: impl Fn(char) -> bool) -> Result<(), Fit> {
        let mut count = 0;
        while count < max {
            match self.chars.peek() {
                Some(&c) if f(c) => {
                    self.consumed += c.len_utf8();
                    self.chars.next();
                    count += 1;
                }
                Some(_) => break,
                None if self.complete => break,
                None => return Err(Fit::Short),
            }
        }
        if count < min {
            return Err(Fit::Mismatch);
        }
        Ok(())
    }

    fn item(&mut self, item: &Item) -> Result<(), Fit> {
        match *item {
            Item::Literal(literal) => self.next_if(|c| c == literal),
            Item::Field { shape, .. } => match shape {
                Shape::Digits { min, max } => self.run(min, max, |c| c.is_ascii_digit()),
                Shape::Letters => self.run(1, usize::MAX, char::is_alphabetic),
                Shape::Offset { colon } => {
                    self.next_if(|c| c == '+' || c == '-')?;
                    self.run(2, 2, |c| c.is_ascii_digit())?;
                    if colon {
                        self.next_if(|c| c == ':')?;
                    }
                    self.run(2, 2, |c| c.is_ascii_digit())
                }
            },
        }
    }
}

/// A date/time pattern such as `yyyy-MM-dd'T'HH:mm`, translated to a chrono format
/// string together with an estimate of how much text it matches.
///
/// Two letter numeric fields take exactly two digits, one letter fields one or two.
/// Literals, spaces included, must appear as written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateTimePattern {
    pattern: String,
    format: String,
    items: Vec<Item>,
    estimate: usize,
}

impl DateTimePattern {
    pub fn compile(pattern: &str) -> Result<Self, PatternError> {
        if pattern.is_empty() {
            return Err(PatternError::Empty);
        }
        let mut compiled = Self {
            pattern: pattern.to_string(),
            format: String::new(),
            items: vec![],
            estimate: 0,
        };
        let chars: Vec<char> = pattern.chars().collect();
        let mut i = 0;
        while i < chars.len() {
            let c = chars[i];
            if c == '\'' {
                if chars.get(i + 1) == Some(&'\'') {
                    compiled.push_literal('\'');
                    i += 2;
                    continue;
                }
                i += 1;
                loop {
                    match chars.get(i) {
                        None => {
                            return Err(PatternError::UnterminatedLiteral {
                                pattern: pattern.to_string(),
                            })
                        }
                        Some('\'') if chars.get(i + 1) == Some(&'\'') => {
                            compiled.push_literal('\'');
                            i += 2;
                        }
                        Some('\'') => {
                            i += 1;
                            break;
                        }
                        Some(&literal) => {
                            compiled.push_literal(literal);
                            i += 1;
                        }
                    }
                }
            } else if c.is_ascii_alphabetic() {
                let count = chars[i..].iter().take_while(|&&x| x == c).count();
                let (spec, shape, width) =
                    Self::field(c, count).ok_or_else(|| PatternError::UnsupportedLetter {
                        letter: c,
                        count,
                        pattern: pattern.to_string(),
                    })?;
                compiled.format.push_str(spec);
                compiled.items.push(Item::Field { letter: c, shape });
                compiled.estimate += width;
                i += count;
            } else {
                compiled.push_literal(c);
                i += 1;
            }
        }
        Ok(compiled)
    }

    fn push_literal(&mut self, c: char) {
        if c == '%' {
            self.format.push_str("%%");
        } else {
            self.format.push(c);
        }
        self.items.push(Item::Literal(c));
        self.estimate += 1;
    }

    /// chrono specifier, accepted text and estimated width for a run of `count`
    /// pattern letters.
    fn field(letter: char, count: usize) -> Option<(&'static str, Shape, usize)> {
        let digits = |min, max| Shape::Digits { min, max };
        Some(match (letter, count) {
            ('y', 2) => ("%y", digits(2, 2), 2),
            ('y', _) => ("%Y", digits(4, 4), 4),
            ('M', 1) => ("%m", digits(1, 2), 2),
            ('M', 2) => ("%m", digits(2, 2), 2),
            ('M', 3) => ("%b", Shape::Letters, TEXT_FIELD_ESTIMATE),
            ('M', _) => ("%B", Shape::Letters, TEXT_FIELD_ESTIMATE),
            ('d', 1) => ("%d", digits(1, 2), 2),
            ('d', 2) => ("%d", digits(2, 2), 2),
            ('H', 1) => ("%H", digits(1, 2), 2),
            ('H', 2) => ("%H", digits(2, 2), 2),
            ('h', 1) => ("%I", digits(1, 2), 2),
            ('h', 2) => ("%I", digits(2, 2), 2),
            ('m', 1) => ("%M", digits(1, 2), 2),
            ('m', 2) => ("%M", digits(2, 2), 2),
            ('s', 1) => ("%S", digits(1, 2), 2),
            ('s', 2) => ("%S", digits(2, 2), 2),
            ('S', 3) => ("%3f", digits(3, 3), 3),
            ('S', 6) => ("%6f", digits(6, 6), 6),
            ('S', 9) => ("%9f", digits(9, 9), 9),
            ('a', 1) => ("%p", Shape::Letters, TEXT_FIELD_ESTIMATE),
            ('E', 1..=3) => ("%a", Shape::Letters, TEXT_FIELD_ESTIMATE),
            ('E', _) => ("%A", Shape::Letters, TEXT_FIELD_ESTIMATE),
            ('X' | 'x', 3) => ("%:z", Shape::Offset { colon: true }, 6),
            ('X' | 'x' | 'Z', 1 | 2) => ("%z", Shape::Offset { colon: false }, 5),
            _ => return None,
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn format(&self) -> &str {
        &self.format
    }

    /// Characters to try first when scanning.
    pub fn estimate(&self) -> usize {
        self.estimate
    }

    fn has(&self, letters: &[char]) -> bool {
        self.items
            .iter()
            .any(|item| matches!(item, Item::Field { letter, .. } if letters.contains(letter)))
    }

    fn fit(&self, window: &str, complete: bool) -> Fit {
        let mut fitter = Fitter {
            chars: window.chars().peekable(),
            consumed: 0,
            complete,
        };
        for item in &self.items {
            if let Err(fit) = fitter.item(item) {
                return fit;
            }
        }
        Fit::Whole(fitter.consumed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateTimeKind {
    LocalDate,
    LocalTime,
    LocalDateTime,
    OffsetDateTime,
}

enum DateTimeValue {
    Date(NaiveDate),
    Time(NaiveTime),
    DateTime(NaiveDateTime),
    Offset(DateTime<FixedOffset>),
}

impl DateTimeValue {
    fn into_token(self, text: String) -> ParserToken {
        match self {
            Self::Date(v) => ParserToken::local_date(v, text),
            Self::Time(v) => ParserToken::local_time(v, text),
            Self::DateTime(v) => ParserToken::local_date_time(v, text),
            Self::Offset(v) => ParserToken::offset_date_time(v, text),
        }
    }
}

impl DateTimeKind {
    fn decode(self, s: &str, format: &str) -> chrono::ParseResult<DateTimeValue> {
        match self {
            Self::LocalDate => NaiveDate::parse_from_str(s, format).map(DateTimeValue::Date),
            Self::LocalTime => NaiveTime::parse_from_str(s, format).map(DateTimeValue::Time),
            Self::LocalDateTime => {
                NaiveDateTime::parse_from_str(s, format).map(DateTimeValue::DateTime)
            }
            Self::OffsetDateTime => {
                DateTime::<FixedOffset>::parse_from_str(s, format).map(DateTimeValue::Offset)
            }
        }
    }

    fn has_date(self) -> bool {
        !matches!(self, Self::LocalTime)
    }

    fn has_time(self) -> bool {
        !matches!(self, Self::LocalDate)
    }

    /// The first field `pattern` lacks for a value of this kind.
    fn missing_field(self, pattern: &DateTimePattern) -> Option<&'static str> {
        let mut required: Vec<(&'static str, bool)> = vec![];
        if self.has_date() {
            required.push(("year", pattern.has(&['y'])));
            required.push(("month", pattern.has(&['M'])));
            required.push(("day", pattern.has(&['d'])));
        }
        if self.has_time() {
            required.push(("hour", pattern.has(&['H', 'h'])));
            if !pattern.has(&['H']) {
                required.push(("am/pm", pattern.has(&['a'])));
            }
            required.push(("minute", pattern.has(&['m'])));
        }
        if self == Self::OffsetDateTime {
            required.push(("offset", pattern.has(&['X', 'x', 'Z'])));
        }
        required
            .into_iter()
            .find(|&(_, present)| !present)
            .map(|(field, _)| field)
    }
}

enum Scan {
    Matched(DateTimeValue, usize),
    NoMatch,
    Invalid { text: String, reason: String },
}

/// Scans a date, time, date-time or offset date-time with a pattern.
///
/// The compiled pattern comes from the context's cache. Scanning starts with a
/// window of the estimated width and widens it one character at a time while the
/// window ends inside a field, or where a variable width field could go on. The text
/// the pattern covers is then decoded. Out of range or impossible fields are errors;
/// any other failure is a non-match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateTimeParser {
    kind: DateTimeKind,
    pattern: String,
}

impl DateTimeParser {
    /// Fails if the pattern does not compile or lacks a field `kind` needs, eg a
    /// local date-time pattern with no hour.
    pub fn new(kind: DateTimeKind, pattern: &str) -> Result<Self, PatternError> {
        let compiled = DateTimePattern::compile(pattern)?;
        if let Some(field) = kind.missing_field(&compiled) {
            return Err(PatternError::MissingField {
                field,
                pattern: pattern.to_string(),
            });
        }
        Ok(Self {
            kind,
            pattern: pattern.to_string(),
        })
    }

    pub fn kind(&self) -> DateTimeKind {
        self.kind
    }

    fn scan(&self, remaining: &str, compiled: &DateTimePattern) -> Scan {
        // ends[n - 1] is the byte length of the first n characters
        let ends: Vec<usize> = remaining
            .char_indices()
            .map(|(i, _)| i)
            .skip(1)
            .chain(iter::once(remaining.len()))
            .collect();
        if remaining.is_empty() {
            return Scan::NoMatch;
        }
        let mut width = compiled.estimate().clamp(1, ends.len());
        loop {
            let window = &remaining[..ends[width - 1]];
            let len = match compiled.fit(window, width == ends.len()) {
                Fit::Whole(len) => len,
                Fit::Short => {
                    width += 1;
                    continue;
                }
                Fit::Mismatch => return Scan::NoMatch,
            };
            let text = &window[..len];
            return match self.kind.decode(text, compiled.format()) {
                Ok(value) => Scan::Matched(value, text.chars().count()),
                Err(e) => match e.kind() {
                    ParseErrorKind::OutOfRange | ParseErrorKind::Impossible => Scan::Invalid {
                        text: text.to_string(),
                        reason: e.to_string(),
                    },
                    _ => Scan::NoMatch,
                },
            };
        }
    }
}

impl Parser for DateTimeParser {
    fn parse(&self, cursor: &mut dyn TextCursor, context: &dyn ParserContext) -> ParseResult {
        cursor.log_inputs("date/time", self);
        let save = cursor.save();
        let compiled = context
            .date_time_formats()
            .get_or_compile(&self.pattern, context.locale())
            .map_err(|e| ParseError::InvalidDateTime {
                text: String::new(),
                reason: e.to_string(),
                line_info: cursor.line_info(),
            })?;
        match self.scan(cursor.remaining(), &compiled) {
            Scan::Matched(value, consumed) => {
                for _ in 0..consumed {
                    cursor.advance();
                }
                let text = cursor.text_between(&save).to_string();
                matched(cursor, self, value.into_token(text))
            }
            Scan::NoMatch => no_match(cursor, &save, self),
            Scan::Invalid { text, reason } => Err(ParseError::InvalidDateTime {
                text,
                reason,
                line_info: cursor.line_info(),
            }),
        }
    }
}

impl fmt::Display for DateTimeParser {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.pattern)
    }
}
