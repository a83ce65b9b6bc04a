pub use crate::{
    contrib, parsers, BasicParserContext, BasicParserReporter, BinaryOperatorTransformer,
    CaseSensitivity, CharPredicate, NodeToken, ParentToken, ParseError, ParseResult, Parser,
    ParserContext, ParserExt, ParserReference, ParserToken, ParserTokenVisitor, SharedParser,
    StringCursor, TextCursor, TokenKind, TokenNode, ValueToken, Visiting,
};
