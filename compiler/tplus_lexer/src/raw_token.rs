//! Raw Token Definition
//!
//! The `RawToken` enum is the logos-derived DFA that classifies the next
//! slice of tag text. Longest match wins, which reproduces the ordered
//! pattern groups of the expression grammar (`?:` beats `?`, `<<` beats
//! `<`, `++` beats `+`).

use logos::Logos;

use crate::{Delim, TokenKind};

/// Raw token from logos. Whitespace is a real token here: the expression
/// parser needs to see it to keep the line counter and lookahead honest.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RawToken {
    #[regex(r"\s+")]
    Space,

    #[regex(r"\.+")]
    Dot,

    #[regex(r"[\p{L}_][\p{L}\p{N}_]*")]
    Name,
    #[regex(r"[0-9]+(\.[0-9]*)?([eE][+-][0-9]+)?")]
    Number,
    #[regex(r#""([^"\\]|\\(.|\n))*""#)]
    #[regex(r"'([^'\\]|\\(.|\n))*'")]
    Quoted,

    #[token("++")]
    #[token("--")]
    Crement,
    #[token("===")]
    #[token("==")]
    #[token("!==")]
    #[token("!=")]
    #[token("<=")]
    #[token("<")]
    #[token(">=")]
    #[token(">")]
    Comparison,
    #[token("&&")]
    #[token("||")]
    Logic,
    #[token("?:")]
    #[token("??")]
    Elvis,
    #[token("%")]
    #[token("*")]
    #[token("/")]
    #[token("&")]
    #[token("|")]
    #[token("^")]
    #[token("<<")]
    #[token(">>")]
    ArithOrBit,

    #[token("?")]
    Question,
    #[token(":")]
    Colon,
    #[token(",")]
    Comma,

    #[token("(")]
    ParenOpen,
    #[token("{")]
    BraceOpen,
    #[token("[")]
    BracketOpen,
    #[token(")")]
    ParenClose,
    #[token("}")]
    BraceClose,
    #[token("]")]
    BracketClose,

    #[token("!")]
    #[token("~")]
    Unary,

    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
}

impl From<RawToken> for TokenKind {
    fn from(raw: RawToken) -> Self {
        match raw {
            RawToken::Space => TokenKind::Space,
            RawToken::Dot => TokenKind::Dot,
            RawToken::Name => TokenKind::Name,
            RawToken::Number => TokenKind::Number,
            RawToken::Quoted => TokenKind::Quoted,
            RawToken::Crement => TokenKind::Crement,
            RawToken::Comparison => TokenKind::Comparison,
            RawToken::Logic => TokenKind::Logic,
            RawToken::Elvis => TokenKind::Elvis,
            RawToken::ArithOrBit => TokenKind::ArithOrBit,
            RawToken::Question => TokenKind::TernaryIf,
            RawToken::Colon => TokenKind::Colon,
            RawToken::Comma => TokenKind::Comma,
            RawToken::ParenOpen => TokenKind::Open(Delim::Paren),
            RawToken::BraceOpen => TokenKind::Open(Delim::Brace),
            RawToken::BracketOpen => TokenKind::Open(Delim::Bracket),
            RawToken::ParenClose => TokenKind::Close(Delim::Paren),
            RawToken::BraceClose => TokenKind::Close(Delim::Brace),
            RawToken::BracketClose => TokenKind::Close(Delim::Bracket),
            RawToken::Unary => TokenKind::Unary,
            RawToken::Plus => TokenKind::Plus,
            RawToken::Minus => TokenKind::Minus,
        }
    }
}
