use std::fmt;

use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use num_traits::Zero;

use crate::context::ParserContext;
use crate::cursor::{SavePoint, TextCursor};
use crate::error::ParseError;
use crate::logging::Loggable;
use crate::parser::{matched, no_match, ParseResult, Parser};
use crate::text_parser::consume_literal;
use crate::token::ParserToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IntegerState {
    Start,
    Sign,
    Digits,
}

/// Sign handling shared by the integer scanners. Returns `true` for a negative
/// sign; a sign is only consumed for radix 10.
fn scan_sign(cursor: &mut dyn TextCursor, context: &dyn ParserContext, radix: u32) -> Option<bool> {
    if radix != 10 {
        return None;
    }
    match cursor.at() {
        Some(c) if c == context.negative_sign() => {
            cursor.advance();
            Some(true)
        }
        Some(c) if c == context.positive_sign() => {
            cursor.advance();
            Some(false)
        }
        _ => None,
    }
}

fn check_radix(radix: u32) {
    assert!(
        (2..=36).contains(&radix),
        "radix {radix} must be between 2 and 36"
    );
}

fn write_radix(f: &mut fmt::Formatter, name: &str, radix: u32) -> fmt::Result {
    if radix == 10 {
        f.write_str(name)
    } else {
        write!(f, "{name}({radix})")
    }
}

/// A signed 64 bit integer in the given radix. Overflow is an error, not a
/// shorter match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LongParser {
    radix: u32,
}

impl LongParser {
    /// # Panics
    ///
    /// If `radix` is outside `2..=36`.
    pub fn new(radix: u32) -> Self {
        check_radix(radix);
        Self { radix }
    }
}

impl Parser for LongParser {
    fn parse(&self, cursor: &mut dyn TextCursor, context: &dyn ParserContext) -> ParseResult {
        cursor.log_inputs("long", self);
        let save = cursor.save();
        let radix = i64::from(self.radix);
        let mut state = IntegerState::Start;
        let mut negative = false;
        let mut value = 0_i64;
        loop {
            state = match state {
                IntegerState::Start => {
                    negative = scan_sign(cursor, context, self.radix).unwrap_or(false);
                    IntegerState::Sign
                }
                IntegerState::Sign | IntegerState::Digits => {
                    let Some(digit) = cursor.at().and_then(|c| c.to_digit(self.radix)) else {
                        break;
                    };
                    let digit = i64::from(digit);
                    // accumulate negatives directly so that i64::MIN is reachable
                    let next = value.checked_mul(radix).and_then(|v| {
                        if negative {
                            v.checked_sub(digit)
                        } else {
                            v.checked_add(digit)
                        }
                    });
                    cursor.advance();
                    value = next.ok_or_else(|| ParseError::NumericOverflow {
                        text: cursor.text_between(&save).to_string(),
                        line_info: cursor.line_info(),
                    })?;
                    IntegerState::Digits
                }
            };
        }
        if state != IntegerState::Digits {
            return no_match(cursor, &save, self);
        }
        let text = cursor.text_between(&save).to_string();
        matched(cursor, self, ParserToken::long(value, text))
    }
}

impl fmt::Display for LongParser {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write_radix(f, "Long", self.radix)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BigIntegerParser {
    radix: u32,
}

impl BigIntegerParser {
    /// # Panics
    ///
    /// If `radix` is outside `2..=36`.
    pub fn new(radix: u32) -> Self {
        check_radix(radix);
        Self { radix }
    }
}

impl Parser for BigIntegerParser {
    fn parse(&self, cursor: &mut dyn TextCursor, context: &dyn ParserContext) -> ParseResult {
        cursor.log_inputs("big integer", self);
        let save = cursor.save();
        let mut state = IntegerState::Start;
        let mut negative = false;
        let mut value = BigInt::zero();
        loop {
            state = match state {
                IntegerState::Start => {
                    negative = scan_sign(cursor, context, self.radix).unwrap_or(false);
                    IntegerState::Sign
                }
                IntegerState::Sign | IntegerState::Digits => {
                    let Some(digit) = cursor.at().and_then(|c| c.to_digit(self.radix)) else {
                        break;
                    };
                    value = value * self.radix + digit;
                    cursor.advance();
                    IntegerState::Digits
                }
            };
        }
        if state != IntegerState::Digits {
            return no_match(cursor, &save, self);
        }
        if negative {
            value = -value;
        }
        let text = cursor.text_between(&save).to_string();
        matched(cursor, self, ParserToken::big_integer(value, text))
    }
}

impl fmt::Display for BigIntegerParser {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write_radix(f, "BigInteger", self.radix)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DecimalState {
    Start,
    Sign,
    Zero,
    Integer,
    Separator,
    Fraction,
    Exponent,
    ExponentSign,
    ExponentDigits,
}

impl DecimalState {
    fn is_accepting(self) -> bool {
        matches!(
            self,
            Self::Zero | Self::Integer | Self::Fraction | Self::ExponentDigits
        )
    }
}

/// A decimal literal broken into its parts, `digits` holding the integer and
/// fraction digits together.
#[derive(Debug, Clone, PartialEq)]
enum Decimal {
    Finite {
        negative: bool,
        digits: String,
        fraction_digits: usize,
        exponent: i64,
    },
    NaN,
    Infinity {
        negative: bool,
    },
}

/// Scans the longest decimal literal at the cursor, leaving the cursor after it.
/// `special` additionally accepts `NaN` and an optionally signed `Infinity`.
/// Returns `None` with the cursor restored if there is no literal.
fn scan_decimal(
    cursor: &mut dyn TextCursor,
    context: &dyn ParserContext,
    special: bool,
) -> Option<Decimal> {
    use DecimalState::*;

    let start = cursor.save();
    let separator = context.decimal_separator();
    let exponent_symbol = context.exponent_symbol();
    let mut state = Start;
    let mut accepted: Option<SavePoint> = None;

    let mut negative = false;
    let mut digits = String::new();
    let mut fraction_digits = 0_usize;
    let mut exponent_negative = false;
    let mut exponent = 0_i64;

    while let Some(c) = cursor.at() {
        let is_digit = c.is_ascii_digit();
        state = match state {
            Start if c == context.negative_sign() => {
                negative = true;
                Sign
            }
            Start if c == context.positive_sign() => Sign,
            Start | Sign if special && c == 'I' => {
                return if consume_literal(cursor, "Infinity") {
                    Some(Decimal::Infinity { negative })
                } else {
                    cursor.restore(&start);
                    None
                };
            }
            Start if special && c == 'N' => {
                return if consume_literal(cursor, "NaN") {
                    Some(Decimal::NaN)
                } else {
                    cursor.restore(&start);
                    None
                };
            }
            Start | Sign if c == '0' => {
                digits.push(c);
                Zero
            }
            Start | Sign | Integer if is_digit => {
                digits.push(c);
                Integer
            }
            Zero | Integer if c == separator => Separator,
            Separator | Fraction if is_digit => {
                digits.push(c);
                fraction_digits += 1;
                Fraction
            }
            Zero | Integer | Fraction if c.to_lowercase().eq(exponent_symbol.to_lowercase()) => {
                Exponent
            }
            Exponent if c == context.negative_sign() => {
                exponent_negative = true;
                ExponentSign
            }
            Exponent if c == context.positive_sign() => ExponentSign,
            Exponent | ExponentSign | ExponentDigits if is_digit => {
                let digit = i64::from(u32::from(c) - u32::from('0'));
                exponent = exponent.saturating_mul(10).saturating_add(digit);
                ExponentDigits
            }
            _ => break,
        };
        cursor.advance();
        if state.is_accepting() {
            accepted = Some(cursor.save());
        }
    }

    match accepted {
        // digits seen after the last accepting state are always part of an
        // unfinished fraction or exponent, which leave the parts untouched
        Some(end) => {
            cursor.restore(&end);
            Some(Decimal::Finite {
                negative,
                digits,
                fraction_digits,
                exponent: if exponent_negative { -exponent } else { exponent },
            })
        }
        None => {
            cursor.restore(&start);
            None
        }
    }
}

/// An exact decimal, rounded to the context's precision when that is non zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BigDecimalParser;

impl Parser for BigDecimalParser {
    fn parse(&self, cursor: &mut dyn TextCursor, context: &dyn ParserContext) -> ParseResult {
        cursor.log_inputs("big decimal", self);
        let save = cursor.save();
        let Some(Decimal::Finite {
            negative,
            digits,
            fraction_digits,
            exponent,
        }) = scan_decimal(cursor, context, false)
        else {
            return no_match(cursor, &save, self);
        };
        let mantissa = digits
            .bytes()
            .fold(BigInt::zero(), |acc, b| acc * 10_u32 + u32::from(b - b'0'));
        let mantissa = if negative { -mantissa } else { mantissa };
        let scale = i64::try_from(fraction_digits)
            .unwrap_or(i64::MAX)
            .saturating_sub(exponent);
        let mut value = BigDecimal::new(mantissa, scale);
        if context.precision() > 0 {
            value = value.with_prec(context.precision());
        }
        let text = cursor.text_between(&save).to_string();
        matched(cursor, self, ParserToken::big_decimal(value, text))
    }
}

impl fmt::Display for BigDecimalParser {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("BigDecimal")
    }
}

/// A double, including `NaN`, `Infinity` and `-Infinity`.
///
/// Digits accumulate as `value * 10 + digit` and the fraction is scaled down
/// afterwards, so the result can differ from the correctly rounded value in the
/// last place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DoubleParser;

fn pow10(n: i64) -> f64 {
    10_f64.powi(n.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32)
}

impl Parser for DoubleParser {
    fn parse(&self, cursor: &mut dyn TextCursor, context: &dyn ParserContext) -> ParseResult {
        cursor.log_inputs("double", self);
        let save = cursor.save();
        let value = match scan_decimal(cursor, context, true) {
            None => return no_match(cursor, &save, self),
            Some(Decimal::NaN) => f64::NAN,
            Some(Decimal::Infinity { negative: false }) => f64::INFINITY,
            Some(Decimal::Infinity { negative: true }) => f64::NEG_INFINITY,
            Some(Decimal::Finite {
                negative,
                digits,
                fraction_digits,
                exponent,
            }) => {
                let mut value = digits
                    .bytes()
                    .fold(0_f64, |acc, b| acc * 10.0 + f64::from(b - b'0'));
                if fraction_digits > 0 {
                    value /= pow10(i64::try_from(fraction_digits).unwrap_or(i64::MAX));
                }
                if exponent != 0 {
                    value *= pow10(exponent);
                }
                if negative {
                    -value
                } else {
                    value
                }
            }
        };
        let text = cursor.text_between(&save).to_string();
        matched(cursor, self, ParserToken::double(value, text))
    }
}

impl fmt::Display for DoubleParser {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("Double")
    }
}
