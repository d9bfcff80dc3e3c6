#![expect(clippy::unwrap_used, reason = "tests unwrap lexer results")]

use pretty_assertions::assert_eq;
use proptest::prelude::*;

use super::*;

fn kinds(src: &str) -> Vec<(TokenKind, &str)> {
    let mut cursor = Cursor::new(src);
    let mut out = Vec::new();
    while !cursor.is_eof() {
        let token = next_token(&mut cursor).unwrap();
        if token.kind != TokenKind::Space {
            out.push((token.kind, token.text));
        }
    }
    out
}

#[test]
fn classifies_names_and_literals() {
    assert_eq!(
        kinds(r#"user.name 12 3.5e+2 "a\"b" 'c'"#),
        vec![
            (TokenKind::Name, "user"),
            (TokenKind::Dot, "."),
            (TokenKind::Name, "name"),
            (TokenKind::Number, "12"),
            (TokenKind::Number, "3.5e+2"),
            (TokenKind::Quoted, r#""a\"b""#),
            (TokenKind::Quoted, "'c'"),
        ]
    );
}

#[test]
fn dot_runs_are_single_tokens() {
    assert_eq!(
        kinds("...v"),
        vec![(TokenKind::Dot, "..."), (TokenKind::Name, "v")]
    );
}

#[test]
fn longest_operator_wins() {
    assert_eq!(
        kinds("a ?: b ?? c << d <= e !== f ++"),
        vec![
            (TokenKind::Name, "a"),
            (TokenKind::Elvis, "?:"),
            (TokenKind::Name, "b"),
            (TokenKind::Elvis, "??"),
            (TokenKind::Name, "c"),
            (TokenKind::ArithOrBit, "<<"),
            (TokenKind::Name, "d"),
            (TokenKind::Comparison, "<="),
            (TokenKind::Name, "e"),
            (TokenKind::Comparison, "!=="),
            (TokenKind::Name, "f"),
            (TokenKind::Crement, "++"),
        ]
    );
}

#[test]
fn delimiters_and_brackets() {
    assert_eq!(
        kinds("f(a, {k: [1]}) ? x : y"),
        vec![
            (TokenKind::Name, "f"),
            (TokenKind::Open(Delim::Paren), "("),
            (TokenKind::Name, "a"),
            (TokenKind::Comma, ","),
            (TokenKind::Open(Delim::Brace), "{"),
            (TokenKind::Name, "k"),
            (TokenKind::Colon, ":"),
            (TokenKind::Open(Delim::Bracket), "["),
            (TokenKind::Number, "1"),
            (TokenKind::Close(Delim::Bracket), "]"),
            (TokenKind::Close(Delim::Brace), "}"),
            (TokenKind::Close(Delim::Paren), ")"),
            (TokenKind::TernaryIf, "?"),
            (TokenKind::Name, "x"),
            (TokenKind::Colon, ":"),
            (TokenKind::Name, "y"),
        ]
    );
}

#[test]
fn unicode_names() {
    assert_eq!(kinds("이름_1"), vec![(TokenKind::Name, "이름_1")]);
}

#[test]
fn plus_minus_reclassify_by_previous_group() {
    let minus = Token::new(TokenKind::Minus, "-");
    assert_eq!(minus.group, TokenGroup::BI_UNARY);
    assert_eq!(
        minus.reclassified(TokenGroup::OPERAND).group,
        TokenGroup::OPERATOR
    );
    assert_eq!(
        minus.reclassified(TokenGroup::CLOSE).group,
        TokenGroup::OPERATOR
    );
    assert_eq!(
        minus.reclassified(TokenGroup::OPERATOR).group,
        TokenGroup::UNARY
    );
    assert_eq!(
        minus.reclassified(Token::start().group).group,
        TokenGroup::UNARY
    );
    let name = Token::new(TokenKind::Name, "a");
    assert_eq!(name.reclassified(TokenGroup::OPERAND).group, TokenGroup::OPERAND);
}

#[test]
fn invalid_character_is_reported() {
    let mut cursor = Cursor::new("#abcdefghijklmn");
    let err = next_token(&mut cursor).unwrap_err();
    assert_eq!(err.code(), ErrorCode::E1001);
    assert_eq!(err.message(), "Invalid expression: #abcdefghi ...");
}

#[test]
fn eof_is_an_unterminated_tag() {
    let mut cursor = Cursor::new("");
    let err = next_token(&mut cursor).unwrap_err();
    assert_eq!(err.code(), ErrorCode::E0003);
}

#[test]
fn multiline_string_advances_lines() {
    let mut cursor = Cursor::new("'a\nb' x");
    let token = next_token(&mut cursor).unwrap();
    assert_eq!(token.kind, TokenKind::Quoted);
    assert_eq!(cursor.line(), 2);
}

proptest! {
    /// Lexing a sequence of valid tokens consumes the input exactly.
    #[test]
    fn tokens_cover_input(parts in proptest::collection::vec(
        prop_oneof![
            Just("a"), Just("b1"), Just("12"), Just("'s'"), Just("\"t\""),
            Just("+"), Just("-"), Just("*"), Just("=="), Just("("), Just(")"),
            Just("["), Just("]"), Just("{"), Just("}"), Just(","), Just(":"),
            Just("?"), Just("."), Just("!"),
        ],
        0..24,
    )) {
        let src = parts.join(" ");
        let mut cursor = Cursor::new(&src);
        let mut rebuilt = String::new();
        while !cursor.is_eof() {
            let token = next_token(&mut cursor).unwrap();
            rebuilt.push_str(token.text);
        }
        prop_assert_eq!(rebuilt, src);
    }
}
