use tokenchain::prelude::*;

pub fn tokenchain_parser(s: &str) -> f64 {
    let ctx = BasicParserContext::default();
    let token = contrib::expression()
        .parse_text(s.trim(), &ctx)
        .unwrap()
        .unwrap();
    contrib::evaluate(&token).unwrap()
}
