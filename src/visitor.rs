use bigdecimal::BigDecimal;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use num_bigint::BigInt;

use crate::token::{NodeToken, ParentToken, ParserToken, ValueToken};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visiting {
    Continue,
    Skip,
}

/// Read only traversal of a token tree.
///
/// Every method has an empty default so implementations override only what they
/// need. [`start_visit`](Self::start_visit) and [`end_visit`](Self::end_visit) wrap
/// every token; parents additionally get their own start/end pair.
#[allow(unused_variables)]
pub trait ParserTokenVisitor {
    fn start_visit(&mut self, token: &ParserToken) -> Visiting {
        Visiting::Continue
    }

    fn end_visit(&mut self, token: &ParserToken) {}

    fn start_visit_node(&mut self, token: &NodeToken) -> Visiting {
        Visiting::Continue
    }

    fn end_visit_node(&mut self, token: &NodeToken) {}

    fn start_visit_repeated(&mut self, token: &ParentToken) -> Visiting {
        Visiting::Continue
    }

    fn end_visit_repeated(&mut self, token: &ParentToken) {}

    fn start_visit_sequence(&mut self, token: &ParentToken) -> Visiting {
        Visiting::Continue
    }

    fn end_visit_sequence(&mut self, token: &ParentToken) {}

    fn visit_big_decimal(&mut self, token: &ValueToken<BigDecimal>) {}
    fn visit_big_integer(&mut self, token: &ValueToken<BigInt>) {}
    fn visit_character(&mut self, token: &ValueToken<char>) {}
    fn visit_comment(&mut self, token: &ValueToken<String>) {}
    fn visit_double(&mut self, token: &ValueToken<f64>) {}
    fn visit_double_quoted(&mut self, token: &ValueToken<String>) {}
    fn visit_local_date(&mut self, token: &ValueToken<NaiveDate>) {}
    fn visit_local_date_time(&mut self, token: &ValueToken<NaiveDateTime>) {}
    fn visit_local_time(&mut self, token: &ValueToken<NaiveTime>) {}
    fn visit_long(&mut self, token: &ValueToken<i64>) {}
    fn visit_missing(&mut self, token: &ValueToken<String>) {}
    fn visit_offset_date_time(&mut self, token: &ValueToken<DateTime<FixedOffset>>) {}
    fn visit_single_quoted(&mut self, token: &ValueToken<String>) {}
    fn visit_string(&mut self, token: &ValueToken<String>) {}
    fn visit_symbol(&mut self, token: &ValueToken<String>) {}
    fn visit_whitespace(&mut self, token: &ValueToken<String>) {}
}

fn visit_children<V: ParserTokenVisitor + ?Sized>(children: &[ParserToken], visitor: &mut V) {
    for child in children {
        child.accept(visitor);
    }
}

impl ParserToken {
    pub fn accept<V: ParserTokenVisitor + ?Sized>(&self, visitor: &mut V) {
        if visitor.start_visit(self) == Visiting::Continue {
            match self {
                Self::BigDecimal(t) => visitor.visit_big_decimal(t),
                Self::BigInteger(t) => visitor.visit_big_integer(t),
                Self::Character(t) => visitor.visit_character(t),
                Self::Comment(t) => visitor.visit_comment(t),
                Self::Double(t) => visitor.visit_double(t),
                Self::DoubleQuoted(t) => visitor.visit_double_quoted(t),
                Self::LocalDate(t) => visitor.visit_local_date(t),
                Self::LocalDateTime(t) => visitor.visit_local_date_time(t),
                Self::LocalTime(t) => visitor.visit_local_time(t),
                Self::Long(t) => visitor.visit_long(t),
                Self::Missing(t) => visitor.visit_missing(t),
                Self::OffsetDateTime(t) => visitor.visit_offset_date_time(t),
                Self::SingleQuoted(t) => visitor.visit_single_quoted(t),
                Self::String(t) => visitor.visit_string(t),
                Self::Symbol(t) => visitor.visit_symbol(t),
                Self::Whitespace(t) => visitor.visit_whitespace(t),
                Self::Node(node) => {
                    if visitor.start_visit_node(node) == Visiting::Continue {
                        visit_children(node.children(), visitor);
                    }
                    visitor.end_visit_node(node);
                }
                Self::Repeated(p) => {
                    if visitor.start_visit_repeated(p) == Visiting::Continue {
                        visit_children(p.children(), visitor);
                    }
                    visitor.end_visit_repeated(p);
                }
                Self::Sequence(p) => {
                    if visitor.start_visit_sequence(p) == Visiting::Continue {
                        visit_children(p.children(), visitor);
                    }
                    visitor.end_visit_sequence(p);
                }
            }
        }
        visitor.end_visit(self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_log::test;

    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
        skip_repeated: bool,
    }

    impl ParserTokenVisitor for Recorder {
        fn start_visit_sequence(&mut self, token: &ParentToken) -> Visiting {
            self.events.push(format!("start sequence {}", token.text()));
            Visiting::Continue
        }

        fn end_visit_sequence(&mut self, token: &ParentToken) {
            self.events.push(format!("end sequence {}", token.text()));
        }

        fn start_visit_repeated(&mut self, _token: &ParentToken) -> Visiting {
            self.events.push("start repeated".into());
            if self.skip_repeated {
                Visiting::Skip
            } else {
                Visiting::Continue
            }
        }

        fn end_visit_repeated(&mut self, _token: &ParentToken) {
            self.events.push("end repeated".into());
        }

        fn visit_long(&mut self, token: &ValueToken<i64>) {
            self.events.push(format!("long {}", token.value()));
        }

        fn visit_symbol(&mut self, token: &ValueToken<String>) {
            self.events.push(format!("symbol {}", token.value()));
        }
    }

    fn tokens() -> ParserToken {
        ParserToken::sequence(
            vec![
                ParserToken::long(1, "1"),
                ParserToken::symbol("+"),
                ParserToken::repeated(vec![ParserToken::long(2, "2")], "2").unwrap(),
            ],
            "1+2",
        )
        .unwrap()
    }

    #[test]
    fn test_visit_order() {
        let mut v = Recorder::default();
        tokens().accept(&mut v);
        assert_eq!(
            v.events,
            vec![
                "start sequence 1+2",
                "long 1",
                "symbol +",
                "start repeated",
                "long 2",
                "end repeated",
                "end sequence 1+2",
            ]
        );
    }

    #[test]
    fn test_skip() {
        let mut v = Recorder {
            skip_repeated: true,
            ..Recorder::default()
        };
        tokens().accept(&mut v);
        assert_eq!(
            v.events,
            vec![
                "start sequence 1+2",
                "long 1",
                "symbol +",
                "start repeated",
                "end repeated",
                "end sequence 1+2",
            ]
        );
    }

    #[test]
    fn test_start_visit_skip_all() {
        struct Counter(usize);
        impl ParserTokenVisitor for Counter {
            fn start_visit(&mut self, _token: &ParserToken) -> Visiting {
                self.0 += 1;
                Visiting::Skip
            }
        }
        let mut c = Counter(0);
        tokens().accept(&mut c);
        assert_eq!(c.0, 1);
    }
}
