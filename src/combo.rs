use std::fmt;
use std::sync::{Arc, Weak};

use once_cell::sync::OnceCell;

use crate::context::ParserContext;
use crate::cursor::TextCursor;
use crate::logging::Loggable;
use crate::parser::{matched, no_match, ParseResult, Parser, SharedParser, TokenTransformer};
use crate::token::{ParentToken, ParserToken};
use crate::util::write_list;

#[derive(Debug, Clone, PartialEq)]
pub struct AlternativesParser {
    parsers: Vec<SharedParser>,
}

/// Nested alternatives are spliced into one list. A single parser is returned as it
/// is; an empty list never matches.
pub fn alternatives(parsers: Vec<SharedParser>) -> SharedParser {
    let mut flat = Vec::with_capacity(parsers.len());
    for p in parsers {
        match p.as_ref().as_any().downcast_ref::<AlternativesParser>() {
            Some(nested) => flat.extend(nested.parsers.iter().cloned()),
            None => flat.push(p),
        }
    }
    if flat.len() == 1 {
        if let Some(only) = flat.pop() {
            return only;
        }
    }
    Arc::new(AlternativesParser { parsers: flat })
}

impl Parser for AlternativesParser {
    fn parse(&self, cursor: &mut dyn TextCursor, context: &dyn ParserContext) -> ParseResult {
        cursor.log_inputs("alternatives", self);
        let save = cursor.save();
        for p in &self.parsers {
            if let Some(token) = p.parse(cursor, context)? {
                return matched(cursor, self, token);
            }
        }
        no_match(cursor, &save, self)
    }
}

impl fmt::Display for AlternativesParser {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write_list(f, self.parsers.iter().map(|p| p.to_string()), " | ")
    }
}

#[derive(Debug, Clone)]
pub struct SequenceParserComponent {
    parser: SharedParser,
    required: bool,
}

impl SequenceParserComponent {
    pub fn parser(&self) -> &SharedParser {
        &self.parser
    }

    pub fn is_required(&self) -> bool {
        self.required
    }
}

impl PartialEq for SequenceParserComponent {
    fn eq(&self, other: &Self) -> bool {
        *self.parser == *other.parser && self.required == other.required
    }
}

impl fmt::Display for SequenceParserComponent {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.required {
            write!(f, "{}", self.parser)
        } else {
            write!(f, "[{}]", self.parser)
        }
    }
}

/// Collects the components of a [`SequenceParser`].
///
/// ```
/// use tokenchain::prelude::*;
///
/// let assignment = parsers::sequence()
///     .required(parsers::string_initial_and_part_chars(
///         CharPredicate::letter(),
///         CharPredicate::letter_or_digit(),
///         1,
///         usize::MAX,
///     ))
///     .optional(parsers::string_chars(CharPredicate::whitespace(), 1, usize::MAX))
///     .required(parsers::string("=", CaseSensitivity::Sensitive))
///     .required(parsers::long(10))
///     .build();
/// assert_eq!(assignment.to_string(), "(letter letter or digit*, [whitespace{1,}], \"=\", Long)");
/// ```
#[derive(Debug, Clone, Default)]
pub struct SequenceParserBuilder {
    components: Vec<SequenceParserComponent>,
}

impl SequenceParserBuilder {
    pub fn required(mut self, parser: SharedParser) -> Self {
        self.components.push(SequenceParserComponent {
            parser,
            required: true,
        });
        self
    }

    pub fn optional(mut self, parser: SharedParser) -> Self {
        self.components.push(SequenceParserComponent {
            parser,
            required: false,
        });
        self
    }

    pub fn build(self) -> SharedParser {
        Arc::new(SequenceParser {
            components: self.components,
        })
    }
}

/// Matches its components in order. Optional components that do not match are left
/// out of the result; a required one that does not match fails the sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceParser {
    components: Vec<SequenceParserComponent>,
}

impl SequenceParser {
    pub fn components(&self) -> &[SequenceParserComponent] {
        &self.components
    }
}

impl Parser for SequenceParser {
    fn parse(&self, cursor: &mut dyn TextCursor, context: &dyn ParserContext) -> ParseResult {
        cursor.log_inputs("sequence", self);
        let save = cursor.save();
        let mut children = Vec::with_capacity(self.components.len());
        for component in &self.components {
            match component.parser.parse(cursor, context)? {
                Some(token) => children.push(token),
                None if component.required => return no_match(cursor, &save, self),
                None => {}
            }
        }
        if children.is_empty() {
            return no_match(cursor, &save, self);
        }
        let text = cursor.text_between(&save).to_string();
        let token = ParserToken::Sequence(ParentToken::with_children(children, text));
        matched(cursor, self, token)
    }
}

impl fmt::Display for SequenceParser {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write_list(f, self.components.iter().map(|c| c.to_string()), ", ")
    }
}

#[derive(Debug, Clone)]
pub struct RepeatedParser {
    parser: SharedParser,
}

pub fn repeated(parser: SharedParser) -> SharedParser {
    Arc::new(RepeatedParser { parser })
}

impl PartialEq for RepeatedParser {
    fn eq(&self, other: &Self) -> bool {
        *self.parser == *other.parser
    }
}

impl Parser for RepeatedParser {
    fn parse(&self, cursor: &mut dyn TextCursor, context: &dyn ParserContext) -> ParseResult {
        cursor.log_inputs("repeated", self);
        let save = cursor.save();
        let mut children = vec![];
        loop {
            let before = cursor.save();
            let Some(token) = self.parser.parse(cursor, context)? else {
                break;
            };
            children.push(token);
            if cursor.save() == before {
                break;
            }
        }
        if children.is_empty() {
            return no_match(cursor, &save, self);
        }
        let text = cursor.text_between(&save).to_string();
        let token = ParserToken::Repeated(ParentToken::with_children(children, text));
        matched(cursor, self, token)
    }
}

impl fmt::Display for RepeatedParser {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{{{}}}", self.parser)
    }
}

/// Matches `parser` only when `not` does not match immediately after it.
#[derive(Debug, Clone)]
pub struct AndNotParser {
    parser: SharedParser,
    not: SharedParser,
}

pub fn and_not(parser: SharedParser, not: SharedParser) -> SharedParser {
    Arc::new(AndNotParser { parser, not })
}

impl PartialEq for AndNotParser {
    fn eq(&self, other: &Self) -> bool {
        *self.parser == *other.parser && *self.not == *other.not
    }
}

impl Parser for AndNotParser {
    fn parse(&self, cursor: &mut dyn TextCursor, context: &dyn ParserContext) -> ParseResult {
        cursor.log_inputs("and not", self);
        let save = cursor.save();
        let Some(token) = self.parser.parse(cursor, context)? else {
            return no_match(cursor, &save, self);
        };
        if self.not.parse(cursor, context)?.is_some() {
            return no_match(cursor, &save, self);
        }
        matched(cursor, self, token)
    }
}

impl fmt::Display for AndNotParser {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}&&!{}", self.parser, self.not)
    }
}

/// Never fails, standing in a [`ParserToken::Missing`] for a parser that did not
/// match.
#[derive(Debug, Clone)]
pub struct OptionalParser {
    parser: SharedParser,
}

pub fn optional(parser: SharedParser) -> SharedParser {
    Arc::new(OptionalParser { parser })
}

impl PartialEq for OptionalParser {
    fn eq(&self, other: &Self) -> bool {
        *self.parser == *other.parser
    }
}

impl Parser for OptionalParser {
    fn parse(&self, cursor: &mut dyn TextCursor, context: &dyn ParserContext) -> ParseResult {
        match self.parser.parse(cursor, context)? {
            Some(token) => Ok(Some(token)),
            None => matched(cursor, self, ParserToken::missing(self.parser.to_string())),
        }
    }
}

impl fmt::Display for OptionalParser {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[{}]", self.parser)
    }
}

#[derive(Clone)]
pub struct TransformParser {
    parser: SharedParser,
    transformer: TokenTransformer,
}

pub fn transform(parser: SharedParser, transformer: TokenTransformer) -> SharedParser {
    Arc::new(TransformParser {
        parser,
        transformer,
    })
}

impl PartialEq for TransformParser {
    fn eq(&self, other: &Self) -> bool {
        *self.parser == *other.parser && Arc::ptr_eq(&self.transformer, &other.transformer)
    }
}

impl fmt::Debug for TransformParser {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("TransformParser")
            .field("parser", &self.parser)
            .finish_non_exhaustive()
    }
}

impl Parser for TransformParser {
    fn parse(&self, cursor: &mut dyn TextCursor, context: &dyn ParserContext) -> ParseResult {
        Ok(self
            .parser
            .parse(cursor, context)?
            .map(|token| (self.transformer)(token, context)))
    }
}

impl fmt::Display for TransformParser {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.parser)
    }
}

/// Gives a parser a different description, eg a grammar rule name.
#[derive(Debug, Clone)]
pub struct CustomToStringParser {
    parser: SharedParser,
    name: String,
}

/// Renaming an already renamed parser replaces the old name rather than wrapping
/// twice. A name equal to the current description changes nothing.
pub fn custom_to_string(parser: SharedParser, name: impl Into<String>) -> SharedParser {
    let name = name.into();
    if parser.to_string() == name {
        return parser;
    }
    let parser = match parser.as_ref().as_any().downcast_ref::<CustomToStringParser>() {
        Some(wrapper) => Arc::clone(&wrapper.parser),
        None => parser,
    };
    if parser.to_string() == name {
        return parser;
    }
    Arc::new(CustomToStringParser { parser, name })
}

impl PartialEq for CustomToStringParser {
    fn eq(&self, other: &Self) -> bool {
        *self.parser == *other.parser && self.name == other.name
    }
}

impl Parser for CustomToStringParser {
    fn parse(&self, cursor: &mut dyn TextCursor, context: &dyn ParserContext) -> ParseResult {
        self.parser.parse(cursor, context)
    }
}

impl fmt::Display for CustomToStringParser {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Always matches, consuming nothing and returning a copy of its token.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedParser {
    token: ParserToken,
}

/// The token's text is cleared, as it matches no input.
pub fn fixed(token: ParserToken) -> SharedParser {
    Arc::new(FixedParser {
        token: token.set_text(""),
    })
}

impl Parser for FixedParser {
    fn parse(&self, cursor: &mut dyn TextCursor, _context: &dyn ParserContext) -> ParseResult {
        matched(cursor, self, self.token.clone())
    }
}

impl fmt::Display for FixedParser {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.token.kind())
    }
}

/// Succeeds only if the wrapped parser leaves nothing unconsumed.
#[derive(Debug, Clone)]
pub struct AndEmptyTextCursorParser {
    parser: SharedParser,
}

pub fn and_empty_text_cursor(parser: SharedParser) -> SharedParser {
    Arc::new(AndEmptyTextCursorParser { parser })
}

impl PartialEq for AndEmptyTextCursorParser {
    fn eq(&self, other: &Self) -> bool {
        *self.parser == *other.parser
    }
}

impl Parser for AndEmptyTextCursorParser {
    fn parse(&self, cursor: &mut dyn TextCursor, context: &dyn ParserContext) -> ParseResult {
        let save = cursor.save();
        match self.parser.parse(cursor, context)? {
            Some(token) if cursor.is_empty() => Ok(Some(token)),
            Some(_) => no_match(cursor, &save, self),
            None => Ok(None),
        }
    }
}

impl fmt::Display for AndEmptyTextCursorParser {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.parser)
    }
}

/// A named placeholder for a parser defined later, so that a grammar rule can refer
/// to itself.
///
/// The reference holds its target weakly; whoever builds the grammar keeps the
/// strong handle. Parsing through a reference that was never set, or whose target
/// has been dropped, does not match.
pub struct ParserReference {
    name: String,
    target: OnceCell<Weak<dyn Parser>>,
}

impl ParserReference {
    pub fn new(name: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            target: OnceCell::new(),
        })
    }

    /// Returns `false` if the target was already set.
    pub fn set(&self, target: &SharedParser) -> bool {
        self.target.set(Arc::downgrade(target)).is_ok()
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl PartialEq for ParserReference {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl fmt::Debug for ParserReference {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "ParserReference({})", self.name)
    }
}

impl Parser for ParserReference {
    fn parse(&self, cursor: &mut dyn TextCursor, context: &dyn ParserContext) -> ParseResult {
        match self.target.get().and_then(Weak::upgrade) {
            Some(target) => target.parse(cursor, context),
            None => {
                let save = cursor.save();
                no_match(cursor, &save, self)
            }
        }
    }
}

impl fmt::Display for ParserReference {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "<{}>", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::char_predicate::CharPredicate;
    use crate::context::BasicParserContext;
    use crate::cursor::StringCursor;
    use crate::parser::ParserExt;
    use crate::parsers;
    use crate::text_parser::CaseSensitivity;
    use crate::token::TokenKind;
    use pretty_assertions::assert_eq;
    use test_log::test;

    fn run(p: &dyn Parser, s: &str) -> (ParseResult, usize) {
        let ctx = BasicParserContext::default();
        let mut cur = StringCursor::new(s);
        let res = p.parse(&mut cur, &ctx);
        (res, cur.offset())
    }

    fn lit(s: &str) -> SharedParser {
        parsers::string(s, CaseSensitivity::Sensitive)
    }

    fn s(text: &str) -> ParserToken {
        ParserToken::string(text, text)
    }

    #[test]
    fn test_alternatives() {
        let p = alternatives(vec![lit("ab"), lit("a"), lit("abc")]);
        assert_eq!(run(&*p, "abc"), (Ok(Some(s("ab"))), 2), "first match wins");
        assert_eq!(run(&*p, "ax"), (Ok(Some(s("a"))), 1));
        assert_eq!(run(&*p, "x"), (Ok(None), 0));
        assert_eq!(p.to_string(), "(\"ab\" | \"a\" | \"abc\")");
    }

    #[test]
    fn test_alternatives_collapse() {
        let a = lit("a");
        assert!(*alternatives(vec![a.clone()]) == *a);
        assert_eq!(run(&*alternatives(vec![]), "a"), (Ok(None), 0));

        let abc = lit("a").or(lit("b")).or(lit("c"));
        assert_eq!(abc.to_string(), "(\"a\" | \"b\" | \"c\")");
        assert!(*abc == *alternatives(vec![lit("a"), lit("b"), lit("c")]));
    }

    #[test]
    fn test_sequence() {
        let p = parsers::sequence()
            .required(lit("a"))
            .optional(lit("b"))
            .required(lit("c"))
            .build();
        assert_eq!(
            run(&*p, "abcd"),
            (
                Ok(Some(
                    ParserToken::sequence(vec![s("a"), s("b"), s("c")], "abc").unwrap()
                )),
                3
            )
        );
        assert_eq!(
            run(&*p, "ac").0,
            Ok(Some(ParserToken::sequence(vec![s("a"), s("c")], "ac").unwrap()))
        );
        assert_eq!(run(&*p, "abx"), (Ok(None), 0), "cursor restored");
        assert_eq!(p.to_string(), "(\"a\", [\"b\"], \"c\")");
    }

    #[test]
    fn test_sequence_all_optional() {
        let p = parsers::sequence().optional(lit("a")).optional(lit("b")).build();
        assert_eq!(run(&*p, "x"), (Ok(None), 0));
        assert_eq!(run(&*p, "b").0.unwrap().unwrap().children(), &[s("b")]);
    }

    #[test]
    fn test_repeated() {
        let p = lit("ab").repeating();
        let (res, offset) = run(&*p, "ababa");
        assert_eq!(
            res,
            Ok(Some(ParserToken::repeated(vec![s("ab"), s("ab")], "abab").unwrap()))
        );
        assert_eq!(offset, 4);
        assert_eq!(run(&*p, "ba"), (Ok(None), 0));
        assert_eq!(p.to_string(), "{\"ab\"}");
    }

    #[test]
    fn test_repeated_stops_on_empty_match() {
        let p = lit("a").optional().repeating();
        let (res, offset) = run(&*p, "aab");
        let token = res.unwrap().unwrap();
        assert_eq!(offset, 2);
        assert_eq!(token.text(), "aa");
        assert_eq!(token.children().len(), 3);
        assert_eq!(token.children()[2].kind(), TokenKind::Missing);
    }

    #[test]
    fn test_and_not() {
        let digits = parsers::string_chars(CharPredicate::digit(), 1, usize::MAX);
        let p = digits.and_not(lit("."));
        assert_eq!(run(&*p, "12+"), (Ok(Some(s("12"))), 2));
        assert_eq!(run(&*p, "12.5"), (Ok(None), 0));
        assert_eq!(p.to_string(), "digit{1,}&&!\".\"");
    }

    #[test]
    fn test_optional() {
        let p = lit("a").optional();
        assert_eq!(run(&*p, "a"), (Ok(Some(s("a"))), 1));
        assert_eq!(run(&*p, "b"), (Ok(Some(ParserToken::missing("\"a\""))), 0));
        assert_eq!(p.to_string(), "[\"a\"]");
    }

    #[test]
    fn test_transform() {
        let p = lit("a").transform(|t, _ctx| ParserToken::symbol(t.text()));
        assert_eq!(run(&*p, "a"), (Ok(Some(ParserToken::symbol("a"))), 1));
        assert_eq!(run(&*p, "b"), (Ok(None), 0));
        assert_eq!(p.to_string(), "\"a\"");
    }

    #[test]
    fn test_custom_to_string() {
        let a = lit("a");
        assert!(*a.clone().set_to_string("\"a\"") == *a, "same name is a no-op");

        let named = a.clone().set_to_string("A");
        assert_eq!(named.to_string(), "A");
        let renamed = named.set_to_string("B");
        assert_eq!(renamed.to_string(), "B");
        assert!(*renamed == *custom_to_string(a.clone(), "B"), "previous wrapper unwrapped");
        assert!(*renamed.clone().set_to_string("\"a\"") == *a);
        assert_eq!(run(&*renamed, "a"), (Ok(Some(s("a"))), 1));
    }

    #[test]
    fn test_fixed() {
        let token = ParserToken::long(42, "");
        let p = fixed(token.clone());
        assert_eq!(run(&*p, "xyz"), (Ok(Some(token.clone())), 0));
        assert_eq!(p.to_string(), "Long");

        let p = fixed(ParserToken::long(42, "42"));
        let (result, offset) = run(&*p, "42");
        assert_eq!(result, Ok(Some(token)));
        assert_eq!(offset, 0);
        assert!(*p == *fixed(ParserToken::long(42, "")));
    }

    #[test]
    fn test_and_empty_text_cursor() {
        let p = lit("ab").and_empty_text_cursor();
        assert_eq!(run(&*p, "ab"), (Ok(Some(s("ab"))), 2));
        assert_eq!(run(&*p, "abc"), (Ok(None), 0));
    }

    #[test]
    fn test_reference() {
        // list := "(" [list] ")"
        let reference = ParserReference::new("list");
        let list = parsers::sequence()
            .required(lit("("))
            .optional(reference.clone())
            .required(lit(")"))
            .build();
        assert!(reference.set(&list));
        assert!(!reference.set(&list));
        assert_eq!(run(&*list, "(())x").1, 4);
        assert_eq!(run(&*list, "(()").0, Ok(None));
        assert_eq!(list.to_string(), "(\"(\", [<list>], \")\")");
        assert_eq!(run(&*ParserReference::new("unset"), "x"), (Ok(None), 0));
    }

    #[test]
    fn test_fatal_errors_propagate() {
        let p = parsers::sequence()
            .required(lit("x"))
            .required(parsers::double_quoted())
            .build()
            .or(lit("x"));
        let (res, offset) = run(&*p, "x\"open");
        assert!(res.is_err());
        assert_eq!(offset, 6, "cursor is left where the error was found");
    }
}
