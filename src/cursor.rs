use std::fmt;

use crate::logging::Loggable;

/// A position captured by [`TextCursor::save`]. Restoring it rewinds the cursor;
/// restoring the same save point twice is harmless.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SavePoint {
    pub(crate) offset: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LineInfo {
    line_number: usize,
    column_number: usize,
    text: String,
}

impl LineInfo {
    pub fn new(line_number: usize, column_number: usize, text: impl Into<String>) -> Self {
        Self {
            line_number,
            column_number,
            text: text.into(),
        }
    }

    pub fn line_number(&self) -> usize {
        self.line_number
    }

    pub fn column_number(&self) -> usize {
        self.column_number
    }

    /// The full text of the current line, without its line ending.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn summary(&self) -> String {
        format!("({},{})", self.column_number, self.line_number)
    }
}

impl fmt::Display for LineInfo {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({},{})", self.column_number, self.line_number)
    }
}

/// A bounded, rewindable source of characters.
///
/// Parsers only ever move a cursor forward with [`advance`](TextCursor::advance) and
/// backwards with [`restore`](TextCursor::restore), in strict stack order within one
/// call.
pub trait TextCursor {
    fn is_empty(&self) -> bool;

    /// The current character, `None` at the end of text.
    fn at(&self) -> Option<char>;

    /// Moves past the current character. Does nothing at the end of text.
    fn advance(&mut self);

    fn save(&self) -> SavePoint;

    fn restore(&mut self, save: &SavePoint);

    fn text_between(&self, save: &SavePoint) -> &str;

    fn line_info(&self) -> LineInfo;

    fn remaining(&self) -> &str;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringCursor<'a> {
    text: &'a str,
    offset: usize,
}

impl<'a> StringCursor<'a> {
    pub fn new(text: &'a str) -> Self {
        let cursor = Self { text, offset: 0 };
        cursor.log_inputs("StringCursor::new", "");
        cursor
    }

    /// Byte offset into the original text.
    pub fn offset(&self) -> usize {
        self.offset
    }
}

impl<'a> From<&'a str> for StringCursor<'a> {
    #[inline]
    fn from(s: &'a str) -> Self {
        Self::new(s)
    }
}

impl<'a> TextCursor for StringCursor<'a> {
    #[inline]
    fn is_empty(&self) -> bool {
        self.offset >= self.text.len()
    }

    #[inline]
    fn at(&self) -> Option<char> {
        self.text[self.offset..].chars().next()
    }

    #[inline]
    fn advance(&mut self) {
        if let Some(c) = self.at() {
            self.offset += c.len_utf8();
        }
    }

    #[inline]
    fn save(&self) -> SavePoint {
        SavePoint {
            offset: self.offset,
        }
    }

    #[inline]
    fn restore(&mut self, save: &SavePoint) {
        self.offset = save.offset.min(self.text.len());
    }

    fn text_between(&self, save: &SavePoint) -> &str {
        let (start, end) = if save.offset <= self.offset {
            (save.offset, self.offset)
        } else {
            (self.offset, save.offset)
        };
        &self.text[start..end.min(self.text.len())]
    }

    fn line_info(&self) -> LineInfo {
        let before = &self.text[..self.offset];
        let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
        let line_end = self.text[self.offset..]
            .find(['\r', '\n'])
            .map(|i| self.offset + i)
            .unwrap_or(self.text.len());
        let line_number = before.matches('\n').count() + 1;
        let column_number = self.text[line_start..self.offset].chars().count() + 1;
        let line = self.text[line_start..line_end].trim_end_matches('\r');
        LineInfo::new(line_number, column_number, line)
    }

    #[inline]
    fn remaining(&self) -> &str {
        &self.text[self.offset..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn test_cursor() {
        let mut c = StringCursor::from("Héllo");
        assert_eq!(c.at(), Some('H'));
        let save = c.save();
        c.advance();
        c.advance();
        assert_eq!(c.at(), Some('l'));
        assert_eq!(c.text_between(&save), "Hé");
        c.restore(&save);
        c.restore(&save);
        assert_eq!(c.at(), Some('H'));
        for _ in 0..10 {
            c.advance();
        }
        assert!(c.is_empty());
        assert_eq!(c.at(), None);
        assert_eq!(c.remaining(), "");
    }

    #[test]
    fn test_line_info() {
        let mut c = StringCursor::new("ab\r\ncde\nf");
        assert_eq!(c.line_info(), LineInfo::new(1, 1, "ab"));
        for _ in 0..6 {
            c.advance();
        }
        let info = c.line_info();
        assert_eq!(info.line_number(), 2);
        assert_eq!(info.column_number(), 3);
        assert_eq!(info.text(), "cde");
        assert_eq!(info.summary(), "(3,2)");
        assert_eq!(info.to_string(), "(3,2)");
    }
}
