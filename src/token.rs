use std::fmt;

use bigdecimal::BigDecimal;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use num_bigint::BigInt;
use strum_macros::{Display, EnumDiscriminants, EnumIter, IntoStaticStr};

use crate::error::TokenError;

pub trait TokenValue: Clone + fmt::Debug {
    fn same_value(&self, other: &Self) -> bool;
}

macro_rules! token_value_by_eq {
    ($($t:ty),*) => {
        $(
            impl TokenValue for $t {
                #[inline]
                fn same_value(&self, other: &Self) -> bool {
                    self == other
                }
            }
        )*
    };
}

token_value_by_eq!(char, String, i64, BigInt, BigDecimal, NaiveDate, NaiveTime, NaiveDateTime);

impl TokenValue for f64 {
    fn same_value(&self, other: &Self) -> bool {
        self == other || (self.is_nan() && other.is_nan())
    }
}

// chrono compares instants only
impl TokenValue for DateTime<FixedOffset> {
    fn same_value(&self, other: &Self) -> bool {
        self == other && self.offset() == other.offset()
    }
}

/// A decoded value plus the exact text it was decoded from.
#[derive(Clone, Debug)]
pub struct ValueToken<V> {
    value: V,
    text: String,
}

impl<V> ValueToken<V> {
    pub(crate) fn new(value: V, text: impl Into<String>) -> Self {
        Self {
            value,
            text: text.into(),
        }
    }

    pub fn value(&self) -> &V {
        &self.value
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_value(self) -> V {
        self.value
    }
}

impl<V: TokenValue> PartialEq for ValueToken<V> {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text && self.value.same_value(&other.value)
    }
}

/// An ordered, non empty list of child tokens plus the text they span.
#[derive(Clone, Debug, PartialEq)]
pub struct ParentToken {
    children: Vec<ParserToken>,
    text: String,
}

impl ParentToken {
    pub(crate) fn new(
        kind: TokenKind,
        children: Vec<ParserToken>,
        text: impl Into<String>,
    ) -> Result<Self, TokenError> {
        if children.is_empty() {
            return Err(TokenError::EmptyChildren { kind });
        }
        Ok(Self::with_children(children, text))
    }

    /// Callers guarantee `children` is non empty.
    pub(crate) fn with_children(children: Vec<ParserToken>, text: impl Into<String>) -> Self {
        debug_assert!(!children.is_empty(), "parent tokens need children");
        Self {
            children,
            text: text.into(),
        }
    }

    pub fn children(&self) -> &[ParserToken] {
        &self.children
    }

    pub fn into_children(self) -> Vec<ParserToken> {
        self.children
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Children that are not whitespace, comments, symbols or missing markers.
    pub fn non_noise(&self) -> impl Iterator<Item = &ParserToken> {
        self.children.iter().filter(|t| !t.is_noise())
    }

    pub(crate) fn flatten(self) -> Self {
        let mut children = Vec::with_capacity(self.children.len());
        for child in self.children {
            push_flat(child, &mut children);
        }
        Self {
            children,
            text: self.text,
        }
    }
}

fn push_flat(token: ParserToken, out: &mut Vec<ParserToken>) {
    match token {
        ParserToken::Repeated(p) | ParserToken::Sequence(p) => {
            for child in p.children {
                push_flat(child, out);
            }
        }
        other => out.push(other),
    }
}

/// A labelled parent, the extension point for grammars that build their own
/// structures (an addition, a function call) on top of the built in kinds.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeToken {
    label: String,
    parent: ParentToken,
}

impl NodeToken {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn parent(&self) -> &ParentToken {
        &self.parent
    }

    pub fn children(&self) -> &[ParserToken] {
        self.parent.children()
    }

    pub fn text(&self) -> &str {
        self.parent.text()
    }
}

/// The result of every successful parse.
///
/// Leaf variants hold a [`ValueToken`], parent variants a [`ParentToken`]; no token is
/// both. Tokens are immutable, "setters" consume and return a new token.
#[derive(Clone, Debug, PartialEq, EnumDiscriminants)]
#[strum_discriminants(name(TokenKind), derive(Display, EnumIter, IntoStaticStr, Hash))]
pub enum ParserToken {
    BigDecimal(ValueToken<BigDecimal>),
    BigInteger(ValueToken<BigInt>),
    Character(ValueToken<char>),
    Comment(ValueToken<String>),
    Double(ValueToken<f64>),
    DoubleQuoted(ValueToken<String>),
    LocalDate(ValueToken<NaiveDate>),
    LocalDateTime(ValueToken<NaiveDateTime>),
    LocalTime(ValueToken<NaiveTime>),
    Long(ValueToken<i64>),
    /// Zero width stand-in for an optional parser that did not match. The value
    /// describes what was missing.
    Missing(ValueToken<String>),
    OffsetDateTime(ValueToken<DateTime<FixedOffset>>),
    SingleQuoted(ValueToken<String>),
    String(ValueToken<String>),
    Symbol(ValueToken<String>),
    Whitespace(ValueToken<String>),

    Node(NodeToken),
    Repeated(ParentToken),
    Sequence(ParentToken),
}

macro_rules! match_token {
    ($token:expr, $leaf:ident => $leaf_body:expr, $parent:ident => $parent_body:expr) => {
        match $token {
            ParserToken::BigDecimal($leaf) => $leaf_body,
            ParserToken::BigInteger($leaf) => $leaf_body,
            ParserToken::Character($leaf) => $leaf_body,
            ParserToken::Comment($leaf) => $leaf_body,
            ParserToken::Double($leaf) => $leaf_body,
            ParserToken::DoubleQuoted($leaf) => $leaf_body,
            ParserToken::LocalDate($leaf) => $leaf_body,
            ParserToken::LocalDateTime($leaf) => $leaf_body,
            ParserToken::LocalTime($leaf) => $leaf_body,
            ParserToken::Long($leaf) => $leaf_body,
            ParserToken::Missing($leaf) => $leaf_body,
            ParserToken::OffsetDateTime($leaf) => $leaf_body,
            ParserToken::SingleQuoted($leaf) => $leaf_body,
            ParserToken::String($leaf) => $leaf_body,
            ParserToken::Symbol($leaf) => $leaf_body,
            ParserToken::Whitespace($leaf) => $leaf_body,
            ParserToken::Node(NodeToken { parent: $parent, .. }) => $parent_body,
            ParserToken::Repeated($parent) | ParserToken::Sequence($parent) => $parent_body,
        }
    };
}

fn check_quoted(text: &str, quote: char) -> Result<(), TokenError> {
    let mut chars = text.chars();
    let delimited = text.chars().count() >= 2
        && chars.next() == Some(quote)
        && chars.next_back() == Some(quote);
    if delimited {
        Ok(())
    } else {
        Err(TokenError::NotQuoted {
            text: text.to_string(),
            quote,
        })
    }
}

// factories
impl ParserToken {
    pub fn big_decimal(value: BigDecimal, text: impl Into<String>) -> Self {
        Self::BigDecimal(ValueToken::new(value, text))
    }

    pub fn big_integer(value: BigInt, text: impl Into<String>) -> Self {
        Self::BigInteger(ValueToken::new(value, text))
    }

    pub fn character(value: char, text: impl Into<String>) -> Self {
        Self::Character(ValueToken::new(value, text))
    }

    pub fn comment(value: impl Into<String>, text: impl Into<String>) -> Self {
        Self::Comment(ValueToken::new(value.into(), text))
    }

    pub fn double(value: f64, text: impl Into<String>) -> Self {
        Self::Double(ValueToken::new(value, text))
    }

    /// `text` must begin and end with `"`.
    pub fn double_quoted(
        value: impl Into<String>,
        text: impl Into<String>,
    ) -> Result<Self, TokenError> {
        let text = text.into();
        check_quoted(&text, '"')?;
        Ok(Self::DoubleQuoted(ValueToken::new(value.into(), text)))
    }

    pub fn local_date(value: NaiveDate, text: impl Into<String>) -> Self {
        Self::LocalDate(ValueToken::new(value, text))
    }

    pub fn local_date_time(value: NaiveDateTime, text: impl Into<String>) -> Self {
        Self::LocalDateTime(ValueToken::new(value, text))
    }

    pub fn local_time(value: NaiveTime, text: impl Into<String>) -> Self {
        Self::LocalTime(ValueToken::new(value, text))
    }

    pub fn long(value: i64, text: impl Into<String>) -> Self {
        Self::Long(ValueToken::new(value, text))
    }

    pub fn missing(description: impl Into<String>) -> Self {
        Self::Missing(ValueToken::new(description.into(), ""))
    }

    pub fn offset_date_time(value: DateTime<FixedOffset>, text: impl Into<String>) -> Self {
        Self::OffsetDateTime(ValueToken::new(value, text))
    }

    /// `text` must begin and end with `'`.
    pub fn single_quoted(
        value: impl Into<String>,
        text: impl Into<String>,
    ) -> Result<Self, TokenError> {
        let text = text.into();
        check_quoted(&text, '\'')?;
        Ok(Self::SingleQuoted(ValueToken::new(value.into(), text)))
    }

    pub fn string(value: impl Into<String>, text: impl Into<String>) -> Self {
        Self::String(ValueToken::new(value.into(), text))
    }

    pub fn symbol(text: impl Into<String>) -> Self {
        let text = text.into();
        Self::Symbol(ValueToken::new(text.clone(), text))
    }

    pub fn whitespace(text: impl Into<String>) -> Result<Self, TokenError> {
        let text = text.into();
        if text.is_empty() || !text.chars().all(char::is_whitespace) {
            return Err(TokenError::NotWhitespace { text });
        }
        Ok(Self::Whitespace(ValueToken::new(text.clone(), text)))
    }

    pub fn node(
        label: impl Into<String>,
        children: Vec<ParserToken>,
        text: impl Into<String>,
    ) -> Result<Self, TokenError> {
        Ok(Self::Node(NodeToken {
            label: label.into(),
            parent: ParentToken::new(TokenKind::Node, children, text)?,
        }))
    }

    pub fn repeated(children: Vec<ParserToken>, text: impl Into<String>) -> Result<Self, TokenError> {
        ParentToken::new(TokenKind::Repeated, children, text).map(Self::Repeated)
    }

    pub fn sequence(children: Vec<ParserToken>, text: impl Into<String>) -> Result<Self, TokenError> {
        ParentToken::new(TokenKind::Sequence, children, text).map(Self::Sequence)
    }

    /// A node whose text is the concatenation of its children's text.
    pub fn node_of(label: impl Into<String>, children: Vec<ParserToken>) -> Result<Self, TokenError> {
        let text = concat_text(&children);
        Self::node(label, children, text)
    }
}

pub(crate) fn concat_text(tokens: &[ParserToken]) -> String {
    tokens.iter().map(ParserToken::text).collect()
}

impl ParserToken {
    pub fn kind(&self) -> TokenKind {
        TokenKind::from(self)
    }

    /// The exact text consumed when this token was parsed.
    pub fn text(&self) -> &str {
        match_token!(self, t => &t.text, p => &p.text)
    }

    fn text_mut(&mut self) -> &mut String {
        match_token!(self, t => &mut t.text, p => &mut p.text)
    }

    pub fn is_leaf(&self) -> bool {
        !self.is_parent()
    }

    pub fn is_parent(&self) -> bool {
        matches!(self, Self::Node(_) | Self::Repeated(_) | Self::Sequence(_))
    }

    pub fn parent(&self) -> Option<&ParentToken> {
        match self {
            Self::Node(node) => Some(&node.parent),
            Self::Repeated(p) | Self::Sequence(p) => Some(p),
            _ => None,
        }
    }

    pub fn children(&self) -> &[ParserToken] {
        self.parent().map(ParentToken::children).unwrap_or_default()
    }

    pub fn is_noise(&self) -> bool {
        matches!(
            self,
            Self::Comment(_) | Self::Missing(_) | Self::Symbol(_) | Self::Whitespace(_)
        )
    }

    pub fn is_whitespace(&self) -> bool {
        matches!(self, Self::Whitespace(_))
    }

    pub fn is_symbol(&self) -> bool {
        matches!(self, Self::Symbol(_))
    }

    /// Replaces the text, keeping kind and value (or children). Unchanged text returns
    /// the token as it is.
    pub fn set_text(self, text: impl Into<String>) -> Self {
        let text = text.into();
        if self.text() == text {
            return self;
        }
        let mut token = self;
        *token.text_mut() = text;
        token
    }

    /// Replaces the children of a parent, recomputing its text from theirs.
    /// Leaves accept only an empty list.
    pub fn set_children(self, children: Vec<ParserToken>) -> Result<Self, TokenError> {
        let kind = self.kind();
        if self.is_leaf() {
            return if children.is_empty() {
                Ok(self)
            } else {
                Err(TokenError::LeafChildren { kind })
            };
        }
        if self.children() == children.as_slice() {
            return Ok(self);
        }
        let text = concat_text(&children);
        let parent = ParentToken::new(kind, children, text)?;
        Ok(match self {
            Self::Node(node) => Self::Node(NodeToken {
                label: node.label,
                parent,
            }),
            Self::Repeated(_) => Self::Repeated(parent),
            _ => Self::Sequence(parent),
        })
    }

    /// Inlines nested repeated and sequence tokens into one level. Other kinds are
    /// returned unchanged.
    pub fn flat(self) -> Self {
        match self {
            Self::Repeated(p) => Self::Repeated(p.flatten()),
            Self::Sequence(p) => Self::Sequence(p.flatten()),
            other => other,
        }
    }
}

impl fmt::Display for ParserToken {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.text())
    }
}
