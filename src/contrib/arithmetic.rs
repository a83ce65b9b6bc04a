use once_cell::sync::Lazy;

use crate::contrib::whitespace;
use crate::prelude::*;

/// `*` and `/` bind tighter than `+` and `-`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArithmeticOperators;

impl BinaryOperatorTransformer for ArithmeticOperators {
    fn highest_priority(&self) -> i32 {
        2
    }

    fn lowest_priority(&self) -> i32 {
        1
    }

    fn priority(&self, token: &ParserToken) -> i32 {
        if !token.is_symbol() {
            return 0;
        }
        match token.text() {
            "*" | "/" => 2,
            "+" | "-" => 1,
            _ => 0,
        }
    }

    fn binary_operand(
        &self,
        tokens: Vec<ParserToken>,
        text: String,
        operator: &ParserToken,
    ) -> ParserToken {
        // tokens always holds both operands and the operator
        ParserToken::node(operator.text(), tokens, text).unwrap_or_else(|_| operator.clone())
    }
}

/// Label of the node wrapping a parenthesised expression.
pub const GROUP: &str = "()";

fn symbol(s: &str) -> SharedParser {
    parsers::string(s, CaseSensitivity::Sensitive).transform(|t, _| ParserToken::symbol(t.text()))
}

fn fold_operators(token: ParserToken) -> ParserToken {
    let ParserToken::Sequence(parent) = token else {
        return token;
    };
    match parent.binary_operators(&ArithmeticOperators) {
        ParserToken::Sequence(p) if p.children().len() == 1 => {
            p.into_children().pop().unwrap_or_else(|| ParserToken::missing("operand"))
        }
        other => other,
    }
}

// expression := operand {[ws] operator [ws] operand}
// operand    := double | "(" [ws] expression [ws] ")"
static EXPRESSION: Lazy<SharedParser> = Lazy::new(|| {
    let reference = ParserReference::new("expression");

    let group = parsers::sequence()
        .required(symbol("("))
        .optional(whitespace())
        .required(reference.clone())
        .optional(whitespace())
        .required(symbol(")"))
        .build()
        .transform(|t, _| {
            let children = t.children().to_vec();
            ParserToken::node_of(GROUP, children).unwrap_or(t)
        });
    let operand = parsers::double().or(group).set_to_string("operand");
    let operator = parsers::alternatives(vec![symbol("+"), symbol("-"), symbol("*"), symbol("/")])
        .set_to_string("operator");

    let tail = parsers::sequence()
        .optional(whitespace())
        .required(operator)
        .optional(whitespace())
        .required(operand.clone())
        .build();

    let expression = parsers::sequence()
        .required(operand)
        .optional(tail.repeating())
        .build()
        .transform(|t, _| fold_operators(t))
        .set_to_string("expression");
    reference.set(&expression);
    expression
});

/// Arithmetic over doubles with `+ - * /` and parentheses, for example
/// `2 * (3 + 4) - 5`.
///
/// A successful parse is a tree of nodes labelled by their operator, with [`GROUP`]
/// nodes for parentheses and double tokens for numbers.
pub fn expression() -> SharedParser {
    EXPRESSION.clone()
}

#[derive(Debug, Default)]
struct Evaluator {
    stack: Vec<f64>,
    failed: bool,
}

impl ParserTokenVisitor for Evaluator {
    fn visit_double(&mut self, token: &ValueToken<f64>) {
        self.stack.push(*token.value());
    }

    fn end_visit_node(&mut self, node: &NodeToken) {
        let op: fn(f64, f64) -> f64 = match node.label() {
            GROUP => return,
            "+" => |l, r| l + r,
            "-" => |l, r| l - r,
            "*" => |l, r| l * r,
            "/" => |l, r| l / r,
            _ => {
                self.failed = true;
                return;
            }
        };
        match (self.stack.pop(), self.stack.pop()) {
            (Some(r), Some(l)) => self.stack.push(op(l, r)),
            _ => self.failed = true,
        }
    }
}

/// Evaluates a token produced by [`expression`]. `None` if the tree is not one.
pub fn evaluate(token: &ParserToken) -> Option<f64> {
    let mut evaluator = Evaluator::default();
    token.accept(&mut evaluator);
    match evaluator.stack.as_slice() {
        [value] if !evaluator.failed => Some(*value),
        _ => None,
    }
}
