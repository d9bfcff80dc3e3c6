//! Nesting contexts and their terminator tables.
//!
//! Every expression is parsed inside exactly one context. The context is
//! picked by the token that opened the expression (an opener, `?`, or a `,`
//! / `:` inside an open group) and decides which lookahead characters end
//! the expression.

use tplus_diagnostic::{CompileError, ErrorCode};
use tplus_lexer::{Delim, Token, TokenGroup, TokenKind};

/// The kind of sub-expression being parsed.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub(crate) enum Context {
    /// Top level of a tag, ended by the right tag `]`.
    Tag,
    /// First argument of `name(`.
    FunctionArgs,
    FunctionArgsAfterComma,
    /// `(` that is not a call.
    Paren,
    /// `name{` indexer.
    BraceIndex,
    /// `name[` indexer.
    BracketIndex,
    /// `{` literal, first key or value.
    ObjectLiteral,
    ObjectAfterComma,
    ObjectAfterColon,
    /// `[` literal, first key or value.
    ArrayLiteral,
    ArrayAfterComma,
    ArrayAfterColon,
    /// Between `?` and `:`.
    TernaryThen,
    /// After the ternary `:`.
    TernaryElse,
}

/// How a lookahead character relates to the current context.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub(crate) enum Terminator {
    /// Not a terminator here.
    No,
    /// Ends this expression; the enclosing expression continues with it.
    Soft,
    /// Closes the group this expression belongs to.
    Hard,
}

/// Characters that can never start a token inside an expression.
pub(crate) const STOP_CHARS: &[char] = &[')', '}', ']', ':', ','];

impl Context {
    /// Context for the group opened by `delim` after `prev`.
    ///
    /// Right after a name the opener is a call or an indexer, otherwise it
    /// starts a parenthesized expression or a literal. After any other
    /// complete value `{` and `[` index that value and `(` is an error.
    pub(crate) fn enter(prev: &Token<'_>, delim: Delim) -> Result<Self, CompileError> {
        let after_name = prev.kind == TokenKind::Name;
        let after_value = prev.is(TokenGroup::VALUE_END);
        Ok(match delim {
            Delim::Paren if after_name => Context::FunctionArgs,
            Delim::Paren if after_value => {
                return Err(CompileError::unexpected(format!("{} (", prev.text)));
            }
            Delim::Paren => Context::Paren,
            Delim::Brace if after_value => Context::BraceIndex,
            Delim::Brace => Context::ObjectLiteral,
            Delim::Bracket if after_value => Context::BracketIndex,
            Delim::Bracket => Context::ArrayLiteral,
        })
    }

    /// Context for the consequent of a `?` seen in `self`.
    ///
    /// A ternary may not be nested directly inside another ternary branch,
    /// and only one ternary may appear per expression.
    pub(crate) fn enter_ternary(self, ternary_done: bool) -> Result<Self, CompileError> {
        if ternary_done || self.is_ternary() {
            return Err(CompileError::new(
                ErrorCode::E1002,
                "Unexpected `?`: nested ternary needs parentheses",
            ));
        }
        Ok(Context::TernaryThen)
    }

    /// Refinement of a group context after a `,` or `:`.
    pub(crate) fn after_delimiter(self, delim: char) -> Result<Self, CompileError> {
        use Context::{
            ArrayAfterColon, ArrayAfterComma, ArrayLiteral, FunctionArgs, FunctionArgsAfterComma,
            ObjectAfterColon, ObjectAfterComma, ObjectLiteral, TernaryElse, TernaryThen,
        };
        Ok(match (self, delim) {
            (FunctionArgs | FunctionArgsAfterComma, ',') => FunctionArgsAfterComma,
            (ObjectLiteral | ObjectAfterComma | ObjectAfterColon, ',') => ObjectAfterComma,
            (ArrayLiteral | ArrayAfterComma | ArrayAfterColon, ',') => ArrayAfterComma,
            (ObjectLiteral | ObjectAfterComma, ':') => ObjectAfterColon,
            (ArrayLiteral | ArrayAfterComma, ':') => ArrayAfterColon,
            (TernaryThen, ':') => TernaryElse,
            _ => {
                return Err(CompileError::new(
                    ErrorCode::E1005,
                    format!("`{delim}` is not allowed here"),
                ));
            }
        })
    }

    pub(crate) fn terminator(self, c: char) -> Terminator {
        use Context::{
            ArrayAfterColon, ArrayAfterComma, ArrayLiteral, BraceIndex, BracketIndex,
            FunctionArgs, FunctionArgsAfterComma, ObjectAfterColon, ObjectAfterComma,
            ObjectLiteral, Paren, Tag, TernaryElse, TernaryThen,
        };
        match (self, c) {
            (Tag | BracketIndex, ']')
            | (FunctionArgs | FunctionArgsAfterComma | Paren, ')')
            | (BraceIndex | ObjectLiteral | ObjectAfterComma | ObjectAfterColon, '}')
            | (ArrayLiteral | ArrayAfterComma | ArrayAfterColon, ']') => Terminator::Hard,

            (FunctionArgs | FunctionArgsAfterComma, ',')
            | (ObjectLiteral | ObjectAfterComma | ArrayLiteral | ArrayAfterComma, ':' | ',')
            | (ObjectAfterColon | ArrayAfterColon, ',')
            | (TernaryThen, ':')
            | (TernaryElse, ',' | ')' | ']' | '}' | ':') => Terminator::Soft,

            _ => Terminator::No,
        }
    }

    /// Whether an empty expression may precede `c`.
    ///
    /// Only the closer of a group that has not seen a delimiter yet, so
    /// `f()`, `{}` and `[]` are fine while `f(a,)` and `[1,]` are not.
    pub(crate) fn allows_empty_before(self, c: char) -> bool {
        matches!(
            (self, c),
            (Context::FunctionArgs, ')') | (Context::ObjectLiteral, '}') | (Context::ArrayLiteral, ']')
        )
    }

    /// The group delimiter whose closer ends this context, if any.
    pub(crate) fn group(self) -> Option<Delim> {
        use Context::{
            ArrayAfterColon, ArrayAfterComma, ArrayLiteral, BraceIndex, BracketIndex,
            FunctionArgs, FunctionArgsAfterComma, ObjectAfterColon, ObjectAfterComma,
            ObjectLiteral, Paren,
        };
        match self {
            FunctionArgs | FunctionArgsAfterComma | Paren => Some(Delim::Paren),
            BraceIndex | ObjectLiteral | ObjectAfterComma | ObjectAfterColon => Some(Delim::Brace),
            BracketIndex | ArrayLiteral | ArrayAfterComma | ArrayAfterColon => Some(Delim::Bracket),
            Context::Tag | Context::TernaryThen | Context::TernaryElse => None,
        }
    }

    pub(crate) fn is_ternary(self) -> bool {
        matches!(self, Context::TernaryThen | Context::TernaryElse)
    }

    /// Whether `:` separates a key from a value here.
    pub(crate) fn is_key_value(self) -> bool {
        matches!(
            self,
            Context::ObjectLiteral
                | Context::ObjectAfterComma
                | Context::ArrayLiteral
                | Context::ArrayAfterComma
        )
    }

    /// Error for a stop character that does not end this context.
    pub(crate) fn misplaced(self, c: char) -> CompileError {
        if self == Context::TernaryThen {
            return CompileError::new(
                ErrorCode::E1007,
                format!("Unexpected `{c}`: missing `:` in ternary operator"),
            );
        }
        match self.group() {
            Some(delim) if matches!(c, ')' | '}' | ']') => CompileError::new(
                ErrorCode::E1006,
                format!("`{c}` does not close `{}`", delim.open_char()),
            ),
            _ => CompileError::unexpected(c.to_string()),
        }
    }
}

/// Generated code for a group opener.
///
/// Brace groups become host arrays, so both `{` and `}` map to brackets.
pub(crate) fn open_code(delim: Delim) -> &'static str {
    match delim {
        Delim::Paren => "(",
        Delim::Brace | Delim::Bracket => "[",
    }
}

pub(crate) fn close_code(delim: Delim) -> &'static str {
    match delim {
        Delim::Paren => ")",
        Delim::Brace | Delim::Bracket => "]",
    }
}

#[cfg(test)]
mod tests;
