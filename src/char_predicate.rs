use std::fmt;
use std::sync::Arc;

use crate::util;

type CharFn = Arc<dyn Fn(char) -> bool + Send + Sync>;

#[derive(Clone)]
enum Test {
    Any,
    Is(char),
    AnyOf(String),
    Range(char, char),
    Digit,
    HexDigit,
    Letter,
    LetterOrDigit,
    Whitespace,
    Not(Box<CharPredicate>),
    Or(Box<CharPredicate>, Box<CharPredicate>),
    And(Box<CharPredicate>, Box<CharPredicate>),
    Custom(CharFn),
}

impl PartialEq for Test {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Any, Self::Any)
            | (Self::Digit, Self::Digit)
            | (Self::HexDigit, Self::HexDigit)
            | (Self::Letter, Self::Letter)
            | (Self::LetterOrDigit, Self::LetterOrDigit)
            | (Self::Whitespace, Self::Whitespace) => true,
            (Self::Is(a), Self::Is(b)) => a == b,
            (Self::AnyOf(a), Self::AnyOf(b)) => a == b,
            (Self::Range(a1, a2), Self::Range(b1, b2)) => a1 == b1 && a2 == b2,
            (Self::Not(a), Self::Not(b)) => a == b,
            (Self::Or(a1, a2), Self::Or(b1, b2)) | (Self::And(a1, a2), Self::And(b1, b2)) => {
                a1 == b1 && a2 == b2
            }
            (Self::Custom(a), Self::Custom(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// A named test over a single character, used by the character and string
/// scanning parsers. The name appears in parser descriptions and error messages.
#[derive(Clone, PartialEq)]
pub struct CharPredicate {
    test: Test,
    name: Option<String>,
}

impl CharPredicate {
    fn of(test: Test) -> Self {
        Self { test, name: None }
    }

    /// Wraps an arbitrary test. Two custom predicates are equal only when they share
    /// the same closure.
    pub fn new<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(char) -> bool + Send + Sync + 'static,
    {
        Self {
            test: Test::Custom(Arc::new(f)),
            name: Some(name.into()),
        }
    }

    pub fn any() -> Self {
        Self::of(Test::Any)
    }

    pub fn is(c: char) -> Self {
        Self::of(Test::Is(c))
    }

    pub fn any_of(chars: &str) -> Self {
        Self::of(Test::AnyOf(chars.to_string()))
    }

    /// Inclusive of both ends.
    pub fn range(from: char, to: char) -> Self {
        Self::of(Test::Range(from.min(to), from.max(to)))
    }

    pub fn digit() -> Self {
        Self::of(Test::Digit)
    }

    pub fn hex_digit() -> Self {
        Self::of(Test::HexDigit)
    }

    pub fn letter() -> Self {
        Self::of(Test::Letter)
    }

    pub fn letter_or_digit() -> Self {
        Self::of(Test::LetterOrDigit)
    }

    pub fn whitespace() -> Self {
        Self::of(Test::Whitespace)
    }

    pub fn negate(self) -> Self {
        match self {
            Self {
                test: Test::Not(inner),
                name: None,
            } => *inner,
            other => Self::of(Test::Not(Box::new(other))),
        }
    }

    pub fn or(self, other: CharPredicate) -> Self {
        Self::of(Test::Or(Box::new(self), Box::new(other)))
    }

    pub fn and(self, other: CharPredicate) -> Self {
        Self::of(Test::And(Box::new(self), Box::new(other)))
    }

    pub fn set_to_string(self, name: impl Into<String>) -> Self {
        Self {
            test: self.test,
            name: Some(name.into()),
        }
    }

    #[inline]
    pub fn test(&self, c: char) -> bool {
        match &self.test {
            Test::Any => true,
            Test::Is(x) => c == *x,
            Test::AnyOf(chars) => chars.contains(c),
            Test::Range(from, to) => (*from..=*to).contains(&c),
            Test::Digit => c.is_ascii_digit(),
            Test::HexDigit => c.is_ascii_hexdigit(),
            Test::Letter => c.is_alphabetic(),
            Test::LetterOrDigit => c.is_alphanumeric(),
            Test::Whitespace => c.is_whitespace(),
            Test::Not(p) => !p.test(c),
            Test::Or(a, b) => a.test(c) || b.test(c),
            Test::And(a, b) => a.test(c) && b.test(c),
            Test::Custom(f) => f(c),
        }
    }
}

impl fmt::Display for CharPredicate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if let Some(name) = &self.name {
            return f.write_str(name);
        }
        match &self.test {
            Test::Any => f.write_str("*"),
            Test::Is(c) => f.write_str(&util::quote_char(*c)),
            Test::AnyOf(chars) => f.write_str(&util::quote_and_escape(chars)),
            Test::Range(from, to) => {
                write!(f, "{}..{}", util::quote_char(*from), util::quote_char(*to))
            }
            Test::Digit => f.write_str("digit"),
            Test::HexDigit => f.write_str("hex digit"),
            Test::Letter => f.write_str("letter"),
            Test::LetterOrDigit => f.write_str("letter or digit"),
            Test::Whitespace => f.write_str("whitespace"),
            Test::Not(p) => write!(f, "!{p}"),
            Test::Or(a, b) => write!(f, "{a} | {b}"),
            Test::And(a, b) => write!(f, "{a} & {b}"),
            Test::Custom(_) => f.write_str("custom"),
        }
    }
}

impl fmt::Debug for CharPredicate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "CharPredicate({self})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn test_predicates() {
        assert!(CharPredicate::digit().test('7'));
        assert!(!CharPredicate::digit().test('x'));
        assert!(CharPredicate::any_of("+-").test('-'));
        assert!(CharPredicate::range('z', 'a').test('m'));
        assert!(CharPredicate::letter().or(CharPredicate::is('_')).test('_'));
        assert!(!CharPredicate::letter().and(CharPredicate::is('_')).test('_'));
        assert!(CharPredicate::whitespace().negate().test('x'));
        assert!(CharPredicate::new("vowel", |c| "aeiou".contains(c)).test('e'));
    }

    #[test]
    fn test_display() {
        assert_eq!(CharPredicate::is('a').to_string(), "'a'");
        assert_eq!(CharPredicate::range('a', 'z').to_string(), "'a'..'z'");
        assert_eq!(
            CharPredicate::letter().or(CharPredicate::is('_')).to_string(),
            "letter | '_'"
        );
        assert_eq!(CharPredicate::digit().negate().to_string(), "!digit");
        assert_eq!(
            CharPredicate::digit().set_to_string("DIGIT").to_string(),
            "DIGIT"
        );
    }

    #[test]
    fn test_equality() {
        assert_eq!(CharPredicate::digit(), CharPredicate::digit());
        assert_eq!(CharPredicate::any_of("ab"), CharPredicate::any_of("ab"));
        assert_ne!(CharPredicate::any_of("ab"), CharPredicate::any_of("ba"));
        assert_eq!(CharPredicate::digit().negate().negate(), CharPredicate::digit());

        let custom = CharPredicate::new("x", |c| c == 'x');
        assert_eq!(custom.clone(), custom);
        assert_ne!(custom, CharPredicate::new("x", |c| c == 'x'));
    }
}
