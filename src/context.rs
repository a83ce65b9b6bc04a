use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use log::debug;

use crate::date_time_parser::DateTimePattern;
use crate::error::PatternError;
use crate::LOG_TARGET;

/// Locale sensitive symbols and settings consulted by the numeric and date/time
/// scanners.
pub trait ParserContext {
    fn decimal_separator(&self) -> char;

    /// Matched case insensitively.
    fn exponent_symbol(&self) -> char;

    fn negative_sign(&self) -> char;

    fn positive_sign(&self) -> char;

    /// Significant digits kept by big decimal parsing, 0 keeps every digit.
    fn precision(&self) -> u64;

    fn locale(&self) -> &str;

    fn date_time_formats(&self) -> &DateTimeFormatCache;
}

/// Compiled date/time patterns keyed by pattern and locale.
///
/// Owned by the context rather than the parser so that parsers stay immutable and
/// shareable. Like a cursor, a context (and so its cache) belongs to one thread.
#[derive(Debug, Clone, Default)]
pub struct DateTimeFormatCache {
    entries: RefCell<HashMap<(String, String), Rc<DateTimePattern>>>,
}

impl DateTimeFormatCache {
    pub fn get_or_compile(
        &self,
        pattern: &str,
        locale: &str,
    ) -> Result<Rc<DateTimePattern>, PatternError> {
        let key = (pattern.to_string(), locale.to_string());
        if let Some(compiled) = self.entries.borrow().get(&key) {
            return Ok(Rc::clone(compiled));
        }
        debug!(target: LOG_TARGET, "compiling date/time pattern {pattern:?} for locale {locale:?}");
        let compiled = Rc::new(DateTimePattern::compile(pattern)?);
        self.entries.borrow_mut().insert(key, Rc::clone(&compiled));
        Ok(compiled)
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct BasicParserContext {
    decimal_separator: char,
    exponent_symbol: char,
    negative_sign: char,
    positive_sign: char,
    precision: u64,
    locale: String,
    date_time_formats: DateTimeFormatCache,
}

impl Default for BasicParserContext {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl BasicParserContext {
    pub fn builder() -> BasicParserContextBuilder {
        BasicParserContextBuilder::default()
    }
}

impl ParserContext for BasicParserContext {
    fn decimal_separator(&self) -> char {
        self.decimal_separator
    }

    fn exponent_symbol(&self) -> char {
        self.exponent_symbol
    }

    fn negative_sign(&self) -> char {
        self.negative_sign
    }

    fn positive_sign(&self) -> char {
        self.positive_sign
    }

    fn precision(&self) -> u64 {
        self.precision
    }

    fn locale(&self) -> &str {
        &self.locale
    }

    fn date_time_formats(&self) -> &DateTimeFormatCache {
        &self.date_time_formats
    }
}

#[derive(Debug, Clone)]
pub struct BasicParserContextBuilder {
    decimal_separator: char,
    exponent_symbol: char,
    negative_sign: char,
    positive_sign: char,
    precision: u64,
    locale: String,
}

impl Default for BasicParserContextBuilder {
    fn default() -> Self {
        Self {
            decimal_separator: '.',
            exponent_symbol: 'E',
            negative_sign: '-',
            positive_sign: '+',
            precision: 0,
            locale: "en".to_string(),
        }
    }
}

impl BasicParserContextBuilder {
    pub fn decimal_separator(mut self, c: char) -> Self {
        self.decimal_separator = c;
        self
    }

    pub fn exponent_symbol(mut self, c: char) -> Self {
        self.exponent_symbol = c;
        self
    }

    pub fn negative_sign(mut self, c: char) -> Self {
        self.negative_sign = c;
        self
    }

    pub fn positive_sign(mut self, c: char) -> Self {
        self.positive_sign = c;
        self
    }

    pub fn precision(mut self, digits: u64) -> Self {
        self.precision = digits;
        self
    }

    pub fn locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    pub fn build(self) -> BasicParserContext {
        BasicParserContext {
            decimal_separator: self.decimal_separator,
            exponent_symbol: self.exponent_symbol,
            negative_sign: self.negative_sign,
            positive_sign: self.positive_sign,
            precision: self.precision,
            locale: self.locale,
            date_time_formats: DateTimeFormatCache::default(),
        }
    }
}
