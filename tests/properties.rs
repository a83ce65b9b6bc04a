use std::str::FromStr;

use bigdecimal::BigDecimal;
use pretty_assertions::assert_eq;
use test_log::test;
use tokenchain::prelude::*;

fn lit(s: &str) -> SharedParser {
    parsers::string(s, CaseSensitivity::Sensitive)
}

fn digits() -> SharedParser {
    parsers::string_chars(CharPredicate::digit(), 1, usize::MAX)
}

/// Parses from the start of `text`, returning the result and the offset reached.
fn run(parser: &SharedParser, text: &str) -> (ParseResult, usize) {
    let ctx = BasicParserContext::default();
    let mut cursor = StringCursor::new(text);
    let result = parser.parse(&mut cursor, &ctx);
    (result, cursor.offset())
}

fn composites() -> Vec<SharedParser> {
    let ab = parsers::sequence().required(lit("a")).required(lit("b")).build();
    let reference = ParserReference::new("ab");
    reference.set(&ab);
    let reference: SharedParser = reference;
    vec![
        parsers::alternatives(vec![lit("ax"), lit("ay")]),
        ab.clone(),
        parsers::sequence().optional(lit("a")).required(lit("c")).build(),
        ab.clone().repeating(),
        lit("a").and_not(lit("b")),
        ab.clone().and_empty_text_cursor(),
        ab.clone().transform(|t, _| t.flat()),
        ab.clone().set_to_string("a then b"),
        reference,
        // keeps the target alive for the reference above
        ab,
    ]
}

#[test]
fn test_composites_restore_cursor_on_no_match() {
    for parser in composites() {
        for text in ["", "a", "ab!", "abc", "x", "az"] {
            let (result, offset) = run(&parser, text);
            if result.as_ref().map_or(false, Option::is_none) {
                assert_eq!(offset, 0, "{parser} on {text:?}");
            }
        }
    }
}

#[test]
fn test_token_text_is_consumed_text() {
    let parser = parsers::sequence()
        .required(digits())
        .optional(contrib::whitespace())
        .required(parsers::alternatives(vec![lit("+"), lit("-")]))
        .optional(contrib::whitespace())
        .required(parsers::double_quoted())
        .build();
    let text = "12 + \"x\\ty\" tail";
    let (result, offset) = run(&parser, text);
    let token = result.unwrap().unwrap();
    assert_eq!(token.text(), &text[..offset]);
    assert_eq!(token.text(), "12 + \"x\\ty\"");
    for child in token.children() {
        assert!(token.text().contains(child.text()));
    }
}

#[test]
fn test_set_text_identities() {
    let ctx = BasicParserContext::default();
    let tokens = vec![
        ParserToken::long(7, "0x7"),
        parsers::single_quoted().parse_text("'a\\nb'", &ctx).unwrap().unwrap(),
        contrib::expression().parse_text("1 + 2", &ctx).unwrap().unwrap(),
    ];
    for t in tokens {
        assert_eq!(t.clone().set_text(t.text()), t);
        assert_eq!(t.clone().set_text("other").set_text(t.text()), t);
        assert_ne!(t.clone().set_text("other"), t);
    }
}

#[test]
fn test_leaf_parent_exclusive() {
    let ctx = BasicParserContext::default();
    let token = contrib::expression().parse_text("(1+2)*3", &ctx).unwrap().unwrap();
    let node = TokenNode::new(token);
    let mut all = node.descendants();
    all.push(node);
    for n in all {
        let t = n.token();
        assert_ne!(t.is_leaf(), t.is_parent(), "{t}");
        if t.is_leaf() {
            assert!(t.children().is_empty());
        } else {
            assert!(!t.children().is_empty());
        }
    }
}

#[test]
fn test_alternatives_prefer_first_match() {
    let p = parsers::alternatives(vec![lit("a"), lit("ab")]);
    let (result, offset) = run(&p, "abc");
    assert_eq!(result, Ok(Some(ParserToken::string("a", "a"))));
    assert_eq!(offset, 1);

    let p = parsers::alternatives(vec![lit("ab"), lit("a")]);
    assert_eq!(run(&p, "abc").1, 2);
}

#[test]
fn test_and_not_cursor() {
    let p = digits().and_not(lit("."));
    assert_eq!(run(&p, "12;"), (Ok(Some(ParserToken::string("12", "12"))), 2));
    assert_eq!(run(&p, "12.5"), (Ok(None), 0));
}

#[test]
fn test_repetition_needs_one_match() {
    let p = lit("ab").repeating();
    assert_eq!(run(&p, "x"), (Ok(None), 0));
    let (result, offset) = run(&p, "ababa");
    assert_eq!(result.unwrap().unwrap().children().len(), 2);
    assert_eq!(offset, 4);
}

#[test]
fn test_numbers() {
    let ctx = BasicParserContext::default();
    assert_eq!(
        parsers::long(10).parse_text("123", &ctx),
        Ok(Some(ParserToken::long(123, "123")))
    );

    let token = parsers::big_decimal().parse_text("-45.6e2", &ctx).unwrap().unwrap();
    let ParserToken::BigDecimal(value) = &token else {
        panic!("not a big decimal: {token:?}");
    };
    assert_eq!(value.value(), &BigDecimal::from_str("-4560").unwrap());
    assert_eq!(value.text(), "-45.6e2");

    let nan = parsers::double().parse_text("NaN", &ctx).unwrap().unwrap();
    assert!(matches!(&nan, ParserToken::Double(v) if v.value().is_nan()));
    assert_eq!(
        parsers::double().parse_text("Infinity", &ctx),
        Ok(Some(ParserToken::double(f64::INFINITY, "Infinity")))
    );
    assert_eq!(
        parsers::double().parse_text("-Infinity", &ctx),
        Ok(Some(ParserToken::double(f64::NEG_INFINITY, "-Infinity")))
    );
}

#[test]
fn test_quoted_strings() {
    let ctx = BasicParserContext::default();
    let token = parsers::single_quoted().parse_text(r"'a\nb'", &ctx).unwrap().unwrap();
    assert_eq!(token, ParserToken::single_quoted("a\nb", r"'a\nb'").unwrap());

    let err = parsers::single_quoted().parse_text("'abc", &ctx).unwrap_err();
    assert!(matches!(err, ParseError::UnterminatedQuote { quote: '\'', .. }));
    assert!(err.to_string().starts_with("Missing terminating"), "{err}");
}

#[test]
fn test_operator_priority() {
    let d = |v: f64| ParserToken::double(v, v.to_string());
    let plus = ParserToken::symbol("+");
    let times = ParserToken::symbol("*");
    let flat = ParserToken::sequence(vec![d(1.0), plus.clone(), d(2.0), times.clone(), d(3.0)], "1+2*3")
        .unwrap();
    let ParserToken::Sequence(parent) = flat else {
        unreachable!()
    };

    let product = ParserToken::node_of("*", vec![d(2.0), times, d(3.0)]).unwrap();
    let sum = ParserToken::node_of("+", vec![d(1.0), plus, product]).unwrap();
    assert_eq!(parent.binary_operators(&contrib::ArithmeticOperators), sum);
}

#[test]
fn test_flat_is_idempotent() {
    let ctx = BasicParserContext::default();
    let p = parsers::sequence()
        .required(lit("a"))
        .required(parsers::sequence().required(lit("b")).required(lit("c")).build().repeating())
        .build();
    let token = p.parse_text("abcbc", &ctx).unwrap().unwrap();
    let flat = token.clone().flat();
    assert_eq!(flat.children().len(), 5);
    assert_eq!(flat.text(), token.text());
    assert_eq!(flat.clone().flat(), flat);
}
