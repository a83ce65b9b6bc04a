// email is approximately \b[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,}\b

use once_cell::sync::Lazy;

use crate::prelude::*;

static WHITESPACE: Lazy<SharedParser> = Lazy::new(|| {
    parsers::string_chars(CharPredicate::whitespace(), 1, usize::MAX)
        .transform(|t, _| ParserToken::whitespace(t.text()).unwrap_or(t))
        .set_to_string("whitespace")
});

static IDENTIFIER: Lazy<SharedParser> = Lazy::new(|| {
    parsers::string_initial_and_part_chars(
        CharPredicate::letter().or(CharPredicate::is('_')),
        CharPredicate::letter_or_digit().or(CharPredicate::is('_')),
        1,
        usize::MAX,
    )
    .set_to_string("identifier")
});

static BLOCK_COMMENT: Lazy<SharedParser> = Lazy::new(|| {
    parsers::surround("/*", "*/")
        .transform(|t, _| {
            let text = t.text();
            let body = text
                .strip_prefix("/*")
                .and_then(|s| s.strip_suffix("*/"))
                .unwrap_or(text);
            ParserToken::comment(body, text)
        })
        .set_to_string("comment")
});

static EMAIL: Lazy<SharedParser> = Lazy::new(|| {
    let name = CharPredicate::new("name char", |c| {
        c.is_ascii_alphanumeric() || "._%+-".contains(c)
    });
    let domain = CharPredicate::new("domain char", |c| c.is_ascii_alphanumeric() || c == '-');
    let label = parsers::string_chars(domain, 1, usize::MAX);
    let dot_label = parsers::sequence()
        .required(parsers::string(".", CaseSensitivity::Sensitive))
        .required(label.clone())
        .build();
    parsers::sequence()
        .required(parsers::string_chars(name, 1, usize::MAX))
        .required(parsers::string("@", CaseSensitivity::Sensitive))
        .required(label)
        .required(dot_label.repeating())
        .build()
        .transform(|t, _| ParserToken::string(t.text(), t.text()))
        .set_to_string("email address")
});

pub fn whitespace() -> SharedParser {
    WHITESPACE.clone()
}

/// A letter or underscore followed by letters, digits and underscores.
pub fn identifier() -> SharedParser {
    IDENTIFIER.clone()
}

/// `/* ... */` as a [`ParserToken::Comment`] whose value excludes the delimiters.
pub fn block_comment() -> SharedParser {
    BLOCK_COMMENT.clone()
}

/// A simple e-mail address, `name@domain.tld`, as a string token.
pub fn email() -> SharedParser {
    EMAIL.clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    fn parse(p: &SharedParser, s: &str) -> Option<ParserToken> {
        p.parse_text(s, &BasicParserContext::default()).unwrap()
    }

    #[test]
    fn test_whitespace() {
        assert_eq!(
            parse(&whitespace(), " \t\nx"),
            Some(ParserToken::whitespace(" \t\n").unwrap())
        );
        assert_eq!(parse(&whitespace(), "x"), None);
        assert!(parse(&whitespace(), "  ").unwrap().is_noise());
    }

    #[test]
    fn test_identifier() {
        assert_eq!(parse(&identifier(), "_ab1 = 2").unwrap().text(), "_ab1");
        assert_eq!(parse(&identifier(), "1ab"), None);
        assert_eq!(identifier().to_string(), "identifier");
    }

    #[test]
    fn test_block_comment() {
        assert_eq!(
            parse(&block_comment(), "/* note */ x"),
            Some(ParserToken::comment(" note ", "/* note */"))
        );
        assert_eq!(parse(&block_comment(), "/* open"), None);
    }

    #[test]
    fn test_email() {
        let addr = parse(&email(), "andy@google.com").unwrap();
        assert_eq!(addr, ParserToken::string("andy@google.com", "andy@google.com"));
        assert_eq!(parse(&email(), "first.last+tag@mail.example.org;").unwrap().text(), "first.last+tag@mail.example.org");
        assert_eq!(parse(&email(), "google.com"), None);
        assert_eq!(parse(&email(), "andy@localhost"), None);
    }
}
