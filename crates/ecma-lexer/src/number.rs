//! Numeric literal scanning: decimal, radix-prefixed, exponent, legacy
//! octal, numeric separators, and the `n` BigInt suffix.

use ecma_common::TokenKind;
use num_bigint::BigInt;

use crate::{LexedToken, Lexer, Value};

pub(crate) fn read_number(lexer: &mut Lexer<'_>, start: u32, starts_with_dot: bool) -> LexedToken {
    let mut is_float = starts_with_dot;
    let mut legacy_octal = false;
    let mut bad_separator = false;

    if !starts_with_dot && lexer.cursor().peek() == Some('0') {
        match lexer.cursor().peek_next() {
            Some('x') | Some('X') => {
                lexer.cursor_mut().advance();
                lexer.cursor_mut().advance();
                return read_radix(lexer, start, 16);
            }
            Some('o') | Some('O') => {
                lexer.cursor_mut().advance();
                lexer.cursor_mut().advance();
                return read_radix(lexer, start, 8);
            }
            Some('b') | Some('B') => {
                lexer.cursor_mut().advance();
                lexer.cursor_mut().advance();
                return read_radix(lexer, start, 2);
            }
            Some(c) if c.is_ascii_digit() => {
                // Leading zero followed by digits: legacy octal if all digits
                // are 0-7, otherwise a legacy non-octal decimal (both only
                // legal in sloppy mode; the parser enforces that).
                legacy_octal = true;
            }
            _ => {}
        }
    }

    if !starts_with_dot {
        bad_separator |= eat_digits(lexer);
    }
    if !is_float && lexer.cursor().peek() == Some('.') {
        is_float = true;
        legacy_octal = false;
        lexer.cursor_mut().advance();
        bad_separator |= eat_digits(lexer);
    } else if starts_with_dot {
        lexer.cursor_mut().advance();
        bad_separator |= eat_digits(lexer);
    }

    if matches!(lexer.cursor().peek(), Some('e') | Some('E')) {
        is_float = true;
        legacy_octal = false;
        lexer.cursor_mut().advance();
        if matches!(lexer.cursor().peek(), Some('+') | Some('-')) {
            lexer.cursor_mut().advance();
        }
        bad_separator |= eat_digits(lexer);
    }

    // A numeric separator has no meaning inside a legacy octal literal at all.
    if legacy_octal && lexer.cursor().slice(start, lexer.cursor().pos()).contains('_') {
        bad_separator = true;
    }

    if !is_float && lexer.cursor().peek() == Some('n') {
        let digits_end = lexer.cursor().pos();
        lexer.cursor_mut().advance();
        let raw = lexer.cursor().slice(start, digits_end).replace('_', "");
        let value = raw.parse::<BigInt>().unwrap_or_default();
        return LexedToken {
            token: ecma_common::Token::new(TokenKind::BigInt, start, lexer.cursor().pos()),
            value: Value::BigInt(value),
            legacy_octal: false,
            invalid_escape: false,
            bad_numeric_separator: bad_separator,
        };
    }

    if let Some(c) = lexer.cursor().peek() {
        if crate::is_ident_start(c) {
            let bad_start = lexer.cursor().pos();
            lexer.cursor_mut().advance();
            lexer.push_error("Identifier directly after number", bad_start, lexer.cursor().pos());
        }
    }

    let end = lexer.cursor().pos();
    let raw = lexer.cursor().slice(start, end).replace('_', "");
    let num = raw.parse::<f64>().unwrap_or(f64::NAN);

    LexedToken {
        token: ecma_common::Token::new(TokenKind::Num, start, end),
        value: Value::Num(num),
        legacy_octal,
        invalid_escape: false,
        bad_numeric_separator: bad_separator,
    }
}

fn read_radix(lexer: &mut Lexer<'_>, start: u32, radix: u32) -> LexedToken {
    let digits_start = lexer.cursor().pos();
    lexer.cursor_mut().eat_while(|c| c.is_digit(radix) || c == '_');
    let digits_end = lexer.cursor().pos();
    let group = lexer.cursor().slice(digits_start, digits_end);
    let bad_separator = !valid_separator_placement(group);
    let is_bigint = lexer.cursor().peek() == Some('n');
    if is_bigint {
        lexer.cursor_mut().advance();
    }
    let digits = group.replace('_', "");
    if digits.is_empty() {
        lexer.push_error("Expected number in radix literal", start, lexer.cursor().pos());
    }

    if let Some(c) = lexer.cursor().peek() {
        if crate::is_ident_start(c) {
            let bad_start = lexer.cursor().pos();
            lexer.cursor_mut().advance();
            lexer.push_error("Identifier directly after number", bad_start, lexer.cursor().pos());
        }
    }

    let end = lexer.cursor().pos();
    if is_bigint {
        let value = BigInt::parse_bytes(digits.as_bytes(), radix).unwrap_or_default();
        return LexedToken {
            token: ecma_common::Token::new(TokenKind::BigInt, start, end),
            value: Value::BigInt(value),
            legacy_octal: false,
            invalid_escape: false,
            bad_numeric_separator: bad_separator,
        };
    }
    let num = u128::from_str_radix(&digits, radix).map(|v| v as f64).unwrap_or(f64::NAN);
    LexedToken {
        token: ecma_common::Token::new(TokenKind::Num, start, end),
        value: Value::Num(num),
        legacy_octal: false,
        invalid_escape: false,
        bad_numeric_separator: bad_separator,
    }
}

/// A digit group is well-formed w.r.t. numeric separators if `_` never
/// leads, trails, or doubles up — it must sit strictly between two digits.
fn valid_separator_placement(group: &str) -> bool {
    if group.starts_with('_') || group.ends_with('_') || group.contains("__") {
        return false;
    }
    true
}

/// Consumes a run of ASCII digits and `_` separators, returning whether the
/// separator placement within this single group was invalid.
fn eat_digits(lexer: &mut Lexer<'_>) -> bool {
    let group_start = lexer.cursor().pos();
    lexer.cursor_mut().eat_while(|c| c.is_ascii_digit() || c == '_');
    let group = lexer.cursor().slice(group_start, lexer.cursor().pos());
    !valid_separator_placement(group)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LexerOptions;

    fn lex_one(src: &str) -> LexedToken {
        let mut lexer = Lexer::new(src, LexerOptions::default());
        lexer.next()
    }

    #[test]
    fn integer_literal() {
        let t = lex_one("42");
        assert_eq!(t.value, Value::Num(42.0));
    }

    #[test]
    fn float_literal() {
        let t = lex_one("3.14");
        assert_eq!(t.value, Value::Num(3.14));
    }

    #[test]
    fn hex_literal() {
        let t = lex_one("0xFF");
        assert_eq!(t.value, Value::Num(255.0));
    }

    #[test]
    fn numeric_separator() {
        let t = lex_one("1_000");
        assert_eq!(t.value, Value::Num(1000.0));
    }

    #[test]
    fn bigint_suffix() {
        let t = lex_one("10n");
        assert_eq!(t.token.kind, TokenKind::BigInt);
        assert_eq!(t.value, Value::BigInt(BigInt::from(10)));
    }

    #[test]
    fn legacy_octal_flagged() {
        let t = lex_one("0755");
        assert!(t.legacy_octal);
    }

    #[test]
    fn starts_with_dot() {
        let t = lex_one(".5");
        assert_eq!(t.value, Value::Num(0.5));
    }
}
