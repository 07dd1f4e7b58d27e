//! Tokenizer acceptance tests (spec §4.1): tokenize a source string and
//! assert directly on the decoded kind/text/value sequence.

use ecma_common::{Keyword, TokenKind};
use ecma_lexer::{Lexer, LexerOptions, LexedToken, Value};

fn tokenize(source: &str, opts: LexerOptions) -> Vec<LexedToken> {
    let mut lexer = Lexer::new(source, opts);
    let mut out = Vec::new();
    loop {
        let tok = lexer.next();
        let is_eof = matches!(tok.token.kind, TokenKind::Eof);
        out.push(tok);
        if is_eof {
            break;
        }
    }
    out
}

fn tokenize_script(source: &str) -> Vec<LexedToken> {
    tokenize(source, LexerOptions { ecma_version: 13, source_type_module: false, allow_hash_bang: false })
}

fn tokenize_module(source: &str) -> Vec<LexedToken> {
    tokenize(source, LexerOptions { ecma_version: 13, source_type_module: true, allow_hash_bang: false })
}

fn text<'a>(source: &'a str, tok: &LexedToken) -> &'a str {
    &source[tok.token.span.start as usize..tok.token.span.end as usize]
}

#[test]
fn keywords_and_punctuation() {
    let src = "if (x) { return; } else { throw y; }";
    let toks = tokenize_script(src);
    let kinds: Vec<&TokenKind> = toks.iter().map(|t| &t.token.kind).collect();
    assert!(matches!(kinds[0], TokenKind::Keyword(Keyword::If)));
    assert!(matches!(kinds[1], TokenKind::ParenL));
    assert!(matches!(kinds[2], TokenKind::Name));
    assert!(matches!(kinds[3], TokenKind::ParenR));
    assert!(matches!(kinds[4], TokenKind::BraceL));
    assert!(matches!(kinds[5], TokenKind::Keyword(Keyword::Return)));
    assert!(matches!(kinds[6], TokenKind::Semi));
    assert!(matches!(kinds[7], TokenKind::BraceR));
    assert!(matches!(kinds[8], TokenKind::Keyword(Keyword::Else)));
    assert!(matches!(kinds[9], TokenKind::BraceL));
    assert!(matches!(kinds[10], TokenKind::Keyword(Keyword::Throw)));
    assert!(matches!(kinds[11], TokenKind::Name));
    assert!(matches!(kinds[12], TokenKind::Semi));
    assert!(matches!(kinds[13], TokenKind::BraceR));
    assert!(matches!(toks.last().unwrap().token.kind, TokenKind::Eof));
}

#[test]
fn operators_cover_precedence_table() {
    let toks = tokenize_script("a ?? b ** c ?. d instanceof e");
    let kinds: Vec<&TokenKind> = toks.iter().map(|t| &t.token.kind).collect();
    assert!(matches!(kinds[1], TokenKind::Nullish));
    assert!(matches!(kinds[3], TokenKind::StarStar));
    assert!(matches!(kinds[5], TokenKind::QuestionDot));
    assert!(matches!(kinds[7], TokenKind::Keyword(Keyword::Instanceof)));
}

#[test]
fn numbers_cover_every_radix_and_bigint() {
    let src = "0x1F 0o17 0b101 1_000 3.14 1e10 10n";
    let toks = tokenize_script(src);
    assert_eq!(toks[0].value, Value::Num(31.0));
    assert_eq!(toks[1].value, Value::Num(15.0));
    assert_eq!(toks[2].value, Value::Num(5.0));
    assert_eq!(toks[3].value, Value::Num(1000.0));
    assert_eq!(toks[4].value, Value::Num(3.14));
    assert_eq!(toks[5].value, Value::Num(1e10));
    assert_eq!(toks[6].token.kind, TokenKind::BigInt);
    assert_eq!(toks[6].value, Value::BigInt(num_bigint::BigInt::from(10)));
}

#[test]
fn identifiers_including_unicode_escape() {
    let src = r"café _x $y \u{1F600}";
    let toks = tokenize_script(src);
    assert_eq!(toks[0].token.kind, TokenKind::Name);
    assert_eq!(toks[0].value, Value::Str("café".to_string()));
    assert_eq!(toks[1].value, Value::Str("_x".to_string()));
    assert_eq!(toks[2].value, Value::Str("$y".to_string()));
    assert_eq!(toks[3].token.kind, TokenKind::Name);
    assert!(toks[3].token.contains_esc);
}

#[test]
fn private_identifier() {
    let toks = tokenize_script("#field");
    assert_eq!(toks[0].token.kind, TokenKind::PrivateId);
    assert_eq!(toks[0].value, Value::Str("field".to_string()));
}

#[test]
fn simple_double_quoted_string() {
    let toks = tokenize_script(r#""hello world""#);
    assert_eq!(toks[0].token.kind, TokenKind::String);
    assert_eq!(toks[0].value, Value::Str("hello world".to_string()));
}

#[test]
fn string_with_escapes() {
    let toks = tokenize_script(r#""a\nb\tcA""#);
    assert_eq!(toks[0].value, Value::Str("a\nb\tcA".to_string()));
}

#[test]
fn line_comment_is_skipped() {
    let src = "x // trailing comment\ny";
    let toks = tokenize_script(src);
    assert_eq!(toks[0].value, Value::Str("x".to_string()));
    assert_eq!(toks[1].value, Value::Str("y".to_string()));
    assert!(toks[1].token.newline_before);
}

#[test]
fn block_comment_spanning_lines_counts_newline() {
    let src = "x /* line one\nline two */ y";
    let toks = tokenize_script(src);
    assert_eq!(toks[0].value, Value::Str("x".to_string()));
    assert_eq!(toks[1].value, Value::Str("y".to_string()));
    assert!(toks[1].token.newline_before);
}

#[test]
fn template_literal_with_interpolation() {
    let src = "`a${1 + 2}b`";
    let toks = tokenize_script(src);
    let kinds: Vec<&TokenKind> = toks.iter().map(|t| &t.token.kind).collect();
    assert!(matches!(kinds[0], TokenKind::BackQuote));
    assert!(matches!(kinds[1], TokenKind::TemplateString));
    assert!(matches!(kinds[2], TokenKind::DollarBraceL));
    assert_eq!(toks[3].value, Value::Num(1.0));
    assert_eq!(toks[5].value, Value::Num(2.0));
    assert!(matches!(kinds[6], TokenKind::BraceR));
    assert!(matches!(kinds[7], TokenKind::TemplateString));
    assert!(matches!(kinds[8], TokenKind::BackQuote));
}

#[test]
fn nested_template_in_interpolation() {
    let src = "`outer ${`inner ${x}`} end`";
    let toks = tokenize_script(src);
    let back_quotes = toks.iter().filter(|t| matches!(t.token.kind, TokenKind::BackQuote)).count();
    assert_eq!(back_quotes, 4);
}

#[test]
fn regexp_after_operator_position() {
    // `/` following `=` (a `beforeExpr` token) reads as a regexp literal,
    // not a division operator.
    let toks = tokenize_script("x = /ab+c/gi");
    let kinds: Vec<&TokenKind> = toks.iter().map(|t| &t.token.kind).collect();
    assert!(matches!(kinds[2], TokenKind::Regexp));
    assert_eq!(toks[2].value, Value::Regex { pattern: "ab+c".to_string(), flags: "gi".to_string() });
}

#[test]
fn division_after_identifier_position() {
    // `/` following a `Name` (not `beforeExpr`) is division.
    let toks = tokenize_script("a / b");
    assert!(matches!(toks[1].token.kind, TokenKind::Slash));
}

#[test]
fn legacy_octal_numeric_literal_is_flagged() {
    let toks = tokenize_script("0777");
    assert!(toks[0].legacy_octal);
    assert_eq!(toks[0].token.kind, TokenKind::Num);
}

#[test]
fn bad_numeric_separator_is_flagged_not_fatal() {
    let toks = tokenize_script("1_");
    assert!(toks[0].bad_numeric_separator);
}

#[test]
fn crlf_counts_as_one_line() {
    let mut lexer = Lexer::new(
        "x\r\ny",
        LexerOptions { ecma_version: 13, source_type_module: false, allow_hash_bang: false },
    );
    let _x = lexer.next();
    let y = lexer.next();
    assert!(y.token.newline_before);
}

#[test]
fn empty_source_yields_only_eof() {
    let toks = tokenize_script("");
    assert_eq!(toks.len(), 1);
    assert_eq!(toks[0].token.kind, TokenKind::Eof);
}

#[test]
fn await_is_a_plain_name_outside_a_module() {
    let toks = tokenize_script("await");
    assert_eq!(toks[0].token.kind, TokenKind::Name);
}

#[test]
fn module_source_type_does_not_change_keyword_lexing() {
    // sourceType only affects the parser's reserved-word checks; the
    // tokenizer lexes `await` identically either way.
    let toks = tokenize_module("await");
    assert_eq!(toks[0].token.kind, TokenKind::Name);
}

#[test]
fn numeric_literal_decodes_value() {
    let mut lexer = Lexer::new(
        "42",
        LexerOptions { ecma_version: 13, source_type_module: false, allow_hash_bang: false },
    );
    let tok = lexer.next();
    assert_eq!(tok.value, Value::Num(42.0));
}

#[test]
fn token_spans_cover_their_own_text_only() {
    let src = "foo bar";
    let toks = tokenize_script(src);
    assert_eq!(text(src, &toks[0]), "foo");
    assert_eq!(text(src, &toks[1]), "bar");
}
