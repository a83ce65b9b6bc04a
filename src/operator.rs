use crate::token::{concat_text, ParentToken, ParserToken};

/// Describes the binary operators of a grammar to
/// [`ParentToken::binary_operators`].
///
/// Priorities are integers where a larger number binds tighter. Tokens that are
/// not operators report a priority below [`lowest_priority`](Self::lowest_priority).
pub trait BinaryOperatorTransformer {
    fn highest_priority(&self) -> i32;

    fn lowest_priority(&self) -> i32;

    fn priority(&self, token: &ParserToken) -> i32;

    /// Builds the token standing for `tokens`, the left operand, the operator and
    /// the right operand together with any whitespace between them. `text` is their
    /// combined text.
    fn binary_operand(
        &self,
        tokens: Vec<ParserToken>,
        text: String,
        operator: &ParserToken,
    ) -> ParserToken;
}

impl ParentToken {
    /// Regroups a flat run of operands and operators by priority, folding each
    /// operator with its nearest non whitespace neighbours. Operators of equal
    /// priority associate to the left.
    ///
    /// The token is returned unchanged, as a sequence, if it starts with a symbol or
    /// has at most one non whitespace child. If regrouping leaves a single token
    /// that token is returned, otherwise a sequence of what is left with the
    /// original text.
    pub fn binary_operators(&self, transformer: &dyn BinaryOperatorTransformer) -> ParserToken {
        let flat = self.clone().flatten();
        let mut non_whitespace = flat.children().iter().filter(|t| !t.is_whitespace());
        let starts_with_symbol = non_whitespace.next().map_or(false, ParserToken::is_symbol);
        if starts_with_symbol || non_whitespace.next().is_none() {
            return ParserToken::Sequence(self.clone());
        }

        let text = flat.text().to_string();
        let mut tokens = flat.into_children();
        for priority in (transformer.lowest_priority()..=transformer.highest_priority()).rev() {
            while let Some((left, op, right)) = find_operator(&tokens, transformer, priority) {
                let span: Vec<ParserToken> = tokens.drain(left..=right).collect();
                let operator = span[op - left].clone();
                let span_text = concat_text(&span);
                let operand = transformer.binary_operand(span, span_text, &operator);
                tokens.insert(left, operand);
            }
        }

        if tokens.len() == 1 {
            if let Some(only) = tokens.pop() {
                return only;
            }
        }
        ParserToken::Sequence(ParentToken::with_children(tokens, text))
    }
}

/// The first operator of `priority` after the first token that has an operand on
/// both sides, as `(left, operator, right)` indices.
fn find_operator(
    tokens: &[ParserToken],
    transformer: &dyn BinaryOperatorTransformer,
    priority: i32,
) -> Option<(usize, usize, usize)> {
    (1..tokens.len())
        .filter(|&i| transformer.priority(&tokens[i]) == priority)
        .find_map(|i| {
            let left = (0..i).rev().find(|&j| !tokens[j].is_whitespace())?;
            let right = (i + 1..tokens.len()).find(|&j| !tokens[j].is_whitespace())?;
            Some((left, i, right))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_log::test;

    struct Arithmetic;

    impl BinaryOperatorTransformer for Arithmetic {
        fn highest_priority(&self) -> i32 {
            2
        }

        fn lowest_priority(&self) -> i32 {
            1
        }

        fn priority(&self, token: &ParserToken) -> i32 {
            match token {
                ParserToken::Symbol(s) if s.value() == "*" || s.value() == "/" => 2,
                ParserToken::Symbol(s) if s.value() == "+" || s.value() == "-" => 1,
                _ => 0,
            }
        }

        fn binary_operand(
            &self,
            tokens: Vec<ParserToken>,
            text: String,
            operator: &ParserToken,
        ) -> ParserToken {
            ParserToken::node(operator.text(), tokens, text).unwrap()
        }
    }

    fn n(v: i64) -> ParserToken {
        ParserToken::long(v, v.to_string())
    }

    fn op(s: &str) -> ParserToken {
        ParserToken::symbol(s)
    }

    fn ws() -> ParserToken {
        ParserToken::whitespace(" ").unwrap()
    }

    fn seq(children: Vec<ParserToken>) -> ParentToken {
        let text = concat_text(&children);
        ParentToken::new(crate::token::TokenKind::Sequence, children, text).unwrap()
    }

    #[test]
    fn test_precedence() {
        let tokens = seq(vec![n(1), op("+"), n(2), op("*"), n(3)]);
        let expected = ParserToken::node_of(
            "+",
            vec![
                n(1),
                op("+"),
                ParserToken::node_of("*", vec![n(2), op("*"), n(3)]).unwrap(),
            ],
        )
        .unwrap();
        let result = tokens.binary_operators(&Arithmetic);
        assert_eq!(result, expected);
        assert_eq!(result.text(), "1+2*3");
    }

    #[test]
    fn test_left_associative() {
        let tokens = seq(vec![n(1), op("-"), n(2), op("-"), n(3)]);
        let inner = ParserToken::node_of("-", vec![n(1), op("-"), n(2)]).unwrap();
        assert_eq!(
            tokens.binary_operators(&Arithmetic),
            ParserToken::node_of("-", vec![inner, op("-"), n(3)]).unwrap()
        );
    }

    #[test]
    fn test_whitespace_is_kept_in_operand() {
        let tokens = seq(vec![n(1), ws(), op("*"), ws(), n(2)]);
        let result = tokens.binary_operators(&Arithmetic);
        assert_eq!(
            result,
            ParserToken::node_of("*", vec![n(1), ws(), op("*"), ws(), n(2)]).unwrap()
        );
        assert_eq!(result.text(), "1 * 2");
    }

    #[test]
    fn test_nested_sequences_are_flattened() {
        let inner = ParserToken::Sequence(seq(vec![op("*"), n(3)]));
        let tokens = seq(vec![n(2), inner]);
        assert_eq!(
            tokens.binary_operators(&Arithmetic),
            ParserToken::node_of("*", vec![n(2), op("*"), n(3)]).unwrap()
        );
    }

    #[test]
    fn test_unchanged() {
        let leading_symbol = seq(vec![op("-"), n(1), op("+"), n(2)]);
        assert_eq!(
            leading_symbol.binary_operators(&Arithmetic),
            ParserToken::Sequence(leading_symbol.clone())
        );

        let single = seq(vec![ws(), n(1), ws()]);
        assert_eq!(
            single.binary_operators(&Arithmetic),
            ParserToken::Sequence(single.clone())
        );
    }

    #[test]
    fn test_dangling_operator_is_left() {
        let tokens = seq(vec![n(1), op("+"), n(2), op("*")]);
        let result = tokens.binary_operators(&Arithmetic);
        let sum = ParserToken::node_of("+", vec![n(1), op("+"), n(2)]).unwrap();
        assert_eq!(
            result,
            ParserToken::sequence(vec![sum, op("*")], "1+2*").unwrap()
        );
    }

    struct Extreme;

    impl BinaryOperatorTransformer for Extreme {
        fn highest_priority(&self) -> i32 {
            i32::MIN + 1
        }

        fn lowest_priority(&self) -> i32 {
            i32::MIN
        }

        fn priority(&self, token: &ParserToken) -> i32 {
            match Arithmetic.priority(token) {
                0 => i32::MAX,
                p => i32::MIN + (p - 1),
            }
        }

        fn binary_operand(
            &self,
            tokens: Vec<ParserToken>,
            text: String,
            operator: &ParserToken,
        ) -> ParserToken {
            Arithmetic.binary_operand(tokens, text, operator)
        }
    }

    #[test]
    fn test_priorities_at_i32_min() {
        let tokens = seq(vec![n(1), op("+"), n(2), op("*"), n(3)]);
        assert_eq!(
            tokens.binary_operators(&Extreme),
            tokens.binary_operators(&Arithmetic)
        );
    }
}
