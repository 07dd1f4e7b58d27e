//! String and template literal scanning, including escape-sequence
//! decoding shared between the two.

use ecma_common::{Token, TokenKind};

use crate::{LexedToken, Lexer, Value};

pub(crate) fn read_string(lexer: &mut Lexer<'_>, start: u32, quote: char) -> LexedToken {
    lexer.cursor_mut().advance(); // opening quote
    let mut cooked = String::new();
    let mut invalid_escape = false;

    loop {
        match lexer.cursor().peek() {
            None => {
                lexer.push_error("Unterminated string constant", start, lexer.cursor().pos());
                break;
            }
            Some(c) if c == quote => {
                lexer.cursor_mut().advance();
                break;
            }
            Some('\n') | Some('\r') | Some('\u{2028}') | Some('\u{2029}') => {
                lexer.push_error("Unterminated string constant", start, lexer.cursor().pos());
                break;
            }
            Some('\\') => {
                lexer.cursor_mut().advance();
                match read_escaped_char(lexer) {
                    Escape::Char(ch) => cooked.push(ch),
                    Escape::Empty => {}
                    Escape::Invalid => invalid_escape = true,
                }
            }
            Some(c) => {
                cooked.push(c);
                lexer.cursor_mut().advance();
            }
        }
    }

    if invalid_escape {
        lexer.push_error("Invalid escape sequence", start, lexer.cursor().pos());
    }

    LexedToken {
        token: Token::new(TokenKind::String, start, lexer.cursor().pos()),
        value: Value::Str(cooked),
        legacy_octal: false,
        invalid_escape,
        bad_numeric_separator: false,
    }
}

/// Read one template chunk: a quasi, the opening `${`, or the closing
/// back-tick. The caller (`Lexer::next`) only reaches here while the
/// template context is on top of the context stack.
pub(crate) fn read_template_token(lexer: &mut Lexer<'_>, start: u32) -> LexedToken {
    if lexer.cursor().peek() == Some('`') {
        lexer.cursor_mut().advance();
        return LexedToken::plain(Token::new(TokenKind::BackQuote, start, lexer.cursor().pos()));
    }
    if lexer.cursor().rest_starts_with("${") {
        lexer.cursor_mut().advance();
        lexer.cursor_mut().advance();
        return LexedToken::plain(Token::new(TokenKind::DollarBraceL, start, lexer.cursor().pos()));
    }

    let mut cooked = String::new();
    let mut invalid_escape = false;

    loop {
        match lexer.cursor().peek() {
            None => {
                lexer.push_error("Unterminated template literal", start, lexer.cursor().pos());
                break;
            }
            Some('`') => break,
            Some('$') if lexer.cursor().peek_next() == Some('{') => break,
            Some('\\') => {
                lexer.cursor_mut().advance();
                match read_escaped_char(lexer) {
                    Escape::Char(ch) => cooked.push(ch),
                    Escape::Empty => {}
                    Escape::Invalid => invalid_escape = true,
                }
            }
            Some('\r') => {
                // \r and \r\n both normalise to \n inside templates.
                lexer.cursor_mut().advance();
                if lexer.cursor().peek() == Some('\n') {
                    lexer.cursor_mut().advance();
                }
                cooked.push('\n');
            }
            Some(c) => {
                cooked.push(c);
                lexer.cursor_mut().advance();
            }
        }
    }

    let kind = if invalid_escape { TokenKind::InvalidTemplate } else { TokenKind::TemplateString };
    LexedToken {
        token: Token::new(kind, start, lexer.cursor().pos()),
        value: Value::Str(cooked),
        legacy_octal: false,
        invalid_escape,
        bad_numeric_separator: false,
    }
}

/// Result of decoding one escape sequence.
enum Escape {
    /// Decoded to a single character.
    Char(char),
    /// A line continuation (`\` followed by a line terminator): valid, but
    /// contributes no character to the cooked value.
    Empty,
    /// Could not be decoded (bad hex digits, truncated `\u{...}`, ...).
    Invalid,
}

/// Decode the character(s) after a consumed `\`. `Escape::Invalid` leaves the
/// cursor past the bad escape; callers turn that into a hard error for plain
/// strings and into the `cooked = null` downgrade for tagged-template quasis.
fn read_escaped_char(lexer: &mut Lexer<'_>) -> Escape {
    match lexer.cursor().peek() {
        None => Escape::Invalid,
        Some('n') => { lexer.cursor_mut().advance(); Escape::Char('\n') }
        Some('t') => { lexer.cursor_mut().advance(); Escape::Char('\t') }
        Some('r') => { lexer.cursor_mut().advance(); Escape::Char('\r') }
        Some('b') => { lexer.cursor_mut().advance(); Escape::Char('\u{0008}') }
        Some('f') => { lexer.cursor_mut().advance(); Escape::Char('\u{000C}') }
        Some('v') => { lexer.cursor_mut().advance(); Escape::Char('\u{000B}') }
        Some('0') if !lexer.cursor().peek_next().map(|c| c.is_ascii_digit()).unwrap_or(false) => {
            lexer.cursor_mut().advance();
            Escape::Char('\u{0000}')
        }
        Some('\n') | Some('\u{2028}') | Some('\u{2029}') => {
            lexer.cursor_mut().advance();
            Escape::Empty
        }
        Some('\r') => {
            lexer.cursor_mut().advance();
            if lexer.cursor().peek() == Some('\n') {
                lexer.cursor_mut().advance();
            }
            Escape::Empty
        }
        Some('x') => {
            lexer.cursor_mut().advance();
            match read_hex_char(lexer, 2) {
                Some(c) => Escape::Char(c),
                None => Escape::Invalid,
            }
        }
        Some('u') => {
            lexer.cursor_mut().advance();
            match lexer.read_unicode_escape_pub() {
                Some(c) => Escape::Char(c),
                None => Escape::Invalid,
            }
        }
        Some(c) => {
            lexer.cursor_mut().advance();
            Escape::Char(c)
        }
    }
}

fn read_hex_char(lexer: &mut Lexer<'_>, len: usize) -> Option<char> {
    let mut code: u32 = 0;
    for _ in 0..len {
        match lexer.cursor().peek().and_then(|c| c.to_digit(16)) {
            Some(d) => {
                code = code * 16 + d;
                lexer.cursor_mut().advance();
            }
            None => return None,
        }
    }
    char::from_u32(code)
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
    fn simple_string() {
        let t = lex_one("\"hello\"");
        assert_eq!(t.value, Value::Str("hello".to_string()));
    }

    #[test]
    fn escaped_newline_in_string() {
        let t = lex_one("\"a\\nb\"");
        assert_eq!(t.value, Value::Str("a\nb".to_string()));
    }

    #[test]
    fn string_interpolation_tokens() {
        let mut lexer = Lexer::new("`a${b}c`", LexerOptions::default());
        let open = lexer.next();
        assert_eq!(open.token.kind, TokenKind::BackQuote);
        let quasi1 = lexer.next();
        assert_eq!(quasi1.token.kind, TokenKind::TemplateString);
        assert_eq!(quasi1.value, Value::Str("a".to_string()));
        let dollar = lexer.next();
        assert_eq!(dollar.token.kind, TokenKind::DollarBraceL);
        let name = lexer.next();
        assert_eq!(name.token.kind, TokenKind::Name);
        let close_brace = lexer.next();
        assert_eq!(close_brace.token.kind, TokenKind::BraceR);
        let quasi2 = lexer.next();
        assert_eq!(quasi2.token.kind, TokenKind::TemplateString);
        assert_eq!(quasi2.value, Value::Str("c".to_string()));
        let close = lexer.next();
        assert_eq!(close.token.kind, TokenKind::BackQuote);
    }
}
