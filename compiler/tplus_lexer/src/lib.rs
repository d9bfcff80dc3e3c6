//! Tokenizer for Tplus tag expressions.
//!
//! The lexer is pulled one token at a time by the expression parser, which
//! interleaves lexing with raw lookahead (is the next character a `.`, a `(`,
//! a terminator?). [`next_token`] therefore works directly on a [`Cursor`]
//! instead of producing a token list up front.

mod raw_token;
mod source;
mod token;

use logos::Logos;
use tplus_diagnostic::{CompileError, ErrorCode};

use raw_token::RawToken;

pub use source::{normalize_source, Cursor};
pub use token::{Delim, Token, TokenGroup, TokenKind};

/// How much of the offending input an "invalid expression" error quotes.
const PREVIEW_CHARS: usize = 10;

/// Classify and consume the next token at the cursor.
///
/// Whitespace is returned as a [`TokenKind::Space`] token; callers skip it.
pub fn next_token<'src>(cursor: &mut Cursor<'src>) -> Result<Token<'src>, CompileError> {
    let rest = cursor.rest();
    if rest.is_empty() {
        return Err(CompileError::new(
            ErrorCode::E0003,
            "Template ends without closing tag `]`",
        ));
    }

    let mut lexer = RawToken::lexer(rest);
    match lexer.next() {
        Some(Ok(raw)) => {
            let text = cursor.advance(lexer.span().end);
            Ok(Token::new(raw.into(), text))
        }
        _ => Err(CompileError::new(
            ErrorCode::E1001,
            format!("Invalid expression: {} ...", preview(rest)),
        )),
    }
}

fn preview(rest: &str) -> String {
    rest.chars().take(PREVIEW_CHARS).collect()
}

#[cfg(test)]
mod tests;
