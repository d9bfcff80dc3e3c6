//! Expression parsing.
//!
//! One call to [`Parser::tag_expression`] consumes the expression of a tag
//! up to, but not including, the right tag `]` and returns generated code.
//! Groups (`(`, `{`, `[`, ternary branches, and every `,` / `:` separated
//! part of a group) are parsed by recursing with a new [`Context`]; the
//! enclosing expression then consumes the closer or the delimiter itself.

use tplus_diagnostic::{CompileError, ErrorCode};
use tplus_lexer::{next_token, Delim, Token, TokenGroup, TokenKind};
use tracing::trace;

use crate::context::{close_code, open_code, Context, Terminator, STOP_CHARS};
use crate::name_chain::{missing_wrapper_method, Lookahead, NameChain, Scope};
use crate::stack::ensure_sufficient_stack;
use crate::Parser;

/// Maximum number of nested groups in one tag.
pub(crate) const MAX_NESTING: usize = 128;

/// Per-expression state. Each recursion level owns one.
struct ExprState<'src> {
    ctx: Context,
    prev: Token<'src>,
    out: String,
    /// Tokens consumed at this level, including group openers.
    tokens: usize,
    /// Start of the wrapper-eligible span in `out`.
    wrap_start: Option<usize>,
    /// A `.` after a closer or literal: the next name is a wrapper method.
    wrapper_method_next: bool,
    /// Position of the last emitted ` + `, for the concatenation rewrite.
    plus_at: Option<usize>,
    /// Group whose closer or delimiter must come next.
    pending: Option<Context>,
    ternary_done: bool,
    chain: NameChain<'src>,
}

impl ExprState<'_> {
    fn new(ctx: Context) -> Self {
        ExprState {
            ctx,
            prev: Token::start(),
            out: String::new(),
            tokens: 0,
            wrap_start: None,
            wrapper_method_next: false,
            plus_at: None,
            pending: None,
            ternary_done: false,
            chain: NameChain::default(),
        }
    }
}

impl<'src> Parser<'src, '_> {
    /// Parse a tag's expression, leaving the cursor before the `]`.
    pub(crate) fn tag_expression(&mut self) -> Result<String, CompileError> {
        self.expression(Context::Tag)
    }

    /// Whether anything but the right tag follows.
    pub(crate) fn expression_exists(&self) -> bool {
        self.cursor.peek_non_space() != Some(']')
    }

    fn nested_expression(&mut self, ctx: Context) -> Result<String, CompileError> {
        if self.nesting >= MAX_NESTING {
            return Err(CompileError::new(
                ErrorCode::E1009,
                format!("Expression nesting deeper than {MAX_NESTING} levels"),
            ));
        }
        self.nesting += 1;
        let result = ensure_sufficient_stack(|| self.expression(ctx));
        self.nesting -= 1;
        result
    }

    fn expression(&mut self, ctx: Context) -> Result<String, CompileError> {
        let mut state = ExprState::new(ctx);
        loop {
            self.cursor.skip_space();
            if let Some(group) = state.pending.take() {
                self.close_or_continue(&mut state, group)?;
                continue;
            }

            let Some(c) = self.cursor.rest().chars().next() else {
                return Err(unterminated());
            };
            if STOP_CHARS.contains(&c) {
                let terminator = ctx.terminator(c);
                if terminator == Terminator::No {
                    return Err(ctx.misplaced(c));
                }
                trace!(?ctx, ?terminator, stop = %c, "expression ends");
                finish(&state, c)?;
                return Ok(state.out);
            }

            let token = next_token(&mut self.cursor)?.reclassified(state.prev.group);
            state.tokens += 1;
            check_sequence(&state.prev, &token)?;
            self.emit(&mut state, token)?;
            state.prev = token;
        }
    }

    /// Consume what must follow a completed child expression: the group's
    /// closer, or a `,` / `:` that starts the next part of the group.
    fn close_or_continue(
        &mut self,
        state: &mut ExprState<'src>,
        group: Context,
    ) -> Result<(), CompileError> {
        let Some(c) = self.cursor.rest().chars().next() else {
            return Err(unterminated());
        };

        if let Some(delim) = group.group() {
            if c == delim.close_char() {
                let text = self.cursor.advance(1);
                state.out.push_str(close_code(delim));
                state.prev = Token::new(TokenKind::Close(delim), text);
                return Ok(());
            }
        }

        if c != ',' && c != ':' {
            return Err(group.misplaced(c));
        }
        let next = group.after_delimiter(c)?;
        self.cursor.advance(1);

        if next == Context::TernaryElse {
            state.out.push_str(" : (");
            let branch = self.nested_expression(next)?;
            state.out.push_str(&branch);
            state.out.push(')');
            state.ternary_done = true;
            state.prev = Token::nested();
        } else {
            state
                .out
                .push_str(if group.is_key_value() && c == ':' { " => " } else { ", " });
            let part = self.nested_expression(next)?;
            state.out.push_str(&part);
            state.pending = Some(next);
        }
        Ok(())
    }

    fn emit(&mut self, state: &mut ExprState<'src>, token: Token<'src>) -> Result<(), CompileError> {
        if token.is(TokenGroup::OPERATOR) {
            state.wrap_start = None;
        } else if state.wrap_start.is_none() && token.is(TokenGroup::WRAP_START) {
            state.wrap_start = Some(state.out.len());
        }

        match token.kind {
            TokenKind::Name => self.emit_name(state, token.text),
            TokenKind::Dot => {
                if state.prev.kind != TokenKind::Name && state.prev.is(TokenGroup::VALUE_END) {
                    if token.text.len() > 1 {
                        return Err(CompileError::unexpected(format!(
                            "{}{}",
                            state.prev.text, token.text
                        )));
                    }
                    state.wrapper_method_next = true;
                    Ok(())
                } else {
                    state.chain.add_dot(token.text)
                }
            }
            TokenKind::Number => {
                state.out.push_str(token.text);
                Ok(())
            }
            TokenKind::Quoted => {
                if state.prev.kind == TokenKind::Plus && state.prev.is(TokenGroup::OPERATOR) {
                    if let Some(at) = state.plus_at {
                        state.out.replace_range(at..at + 3, " . ");
                    }
                }
                push_quoted(&mut state.out, token.text);
                Ok(())
            }
            TokenKind::Plus | TokenKind::Minus if token.is(TokenGroup::UNARY) => {
                state.out.push_str(token.text);
                Ok(())
            }
            TokenKind::Plus => {
                if state.prev.kind == TokenKind::Quoted {
                    state.plus_at = None;
                    state.out.push_str(" . ");
                } else {
                    state.plus_at = Some(state.out.len());
                    state.out.push_str(" + ");
                }
                Ok(())
            }
            TokenKind::Minus
            | TokenKind::Comparison
            | TokenKind::Logic
            | TokenKind::Elvis
            | TokenKind::ArithOrBit => {
                state.out.push(' ');
                state.out.push_str(token.text);
                state.out.push(' ');
                Ok(())
            }
            TokenKind::Unary => {
                state.out.push_str(token.text);
                Ok(())
            }
            TokenKind::Open(delim) => self.emit_group(state, delim),
            TokenKind::TernaryIf => {
                let ctx = state.ctx.enter_ternary(state.ternary_done)?;
                state.out.push_str(" ? ");
                let branch = self.nested_expression(ctx)?;
                state.out.push_str(&branch);
                state.pending = Some(ctx);
                Ok(())
            }
            TokenKind::Crement
            | TokenKind::Colon
            | TokenKind::Comma
            | TokenKind::Close(_)
            | TokenKind::Space
            | TokenKind::Nested
            | TokenKind::Start => Err(CompileError::new(
                ErrorCode::E9001,
                format!("Internal error: token `{}` reached emission", token.text),
            )),
        }
    }

    fn emit_name(&mut self, state: &mut ExprState<'src>, name: &'src str) -> Result<(), CompileError> {
        let next = self.lookahead();

        if state.wrapper_method_next {
            if next != Lookahead::Call {
                return Err(CompileError::new(
                    ErrorCode::E2007,
                    format!("Unexpected `{name}`: a method after a value must be called"),
                ));
            }
            if !self.registry.wrapper.contains(name) {
                return Err(missing_wrapper_method(name, name, self.registry));
            }
            self.insert_wrapper(state)?;
            state.out.push_str(")->");
            state.out.push_str(name);
            state.wrapper_method_next = false;
            return Ok(());
        }

        let scope = Scope {
            registry: self.registry,
            loop_depth: self.loop_depth(),
        };
        if let Some(resolved) = state.chain.add_name(name, next, scope)? {
            if resolved.wrapped {
                self.insert_wrapper(state)?;
            }
            state.out.push_str(&resolved.code);
        }
        Ok(())
    }

    fn emit_group(&mut self, state: &mut ExprState<'src>, delim: Delim) -> Result<(), CompileError> {
        let ctx = Context::enter(&state.prev, delim)?;
        state.out.push_str(open_code(delim));
        let inner = self.nested_expression(ctx)?;
        state.out.push_str(&inner);
        state.pending = Some(ctx);
        Ok(())
    }

    /// Splice the wrapper opener in at the start of the eligible span.
    fn insert_wrapper(&self, state: &mut ExprState<'src>) -> Result<(), CompileError> {
        let Some(at) = state.wrap_start else {
            return Err(CompileError::new(
                ErrorCode::E9001,
                "Internal error: no value to attach a wrapper method to",
            ));
        };
        state.out.insert_str(at, &self.registry.wrapper.opener());
        Ok(())
    }

    fn lookahead(&self) -> Lookahead {
        match self.cursor.peek_non_space() {
            Some('.') => Lookahead::Dot,
            Some('(') => Lookahead::Call,
            _ => Lookahead::Other,
        }
    }
}

/// Reject token pairs that can never be adjacent.
fn check_sequence(prev: &Token<'_>, token: &Token<'_>) -> Result<(), CompileError> {
    let pair = || format!("{} {}", prev.text, token.text).trim().to_owned();

    if token.kind == TokenKind::Crement {
        return Err(CompileError::new(
            ErrorCode::E1004,
            "Increment `++` and decrement `--` operators are not allowed",
        ));
    }
    if prev.is(TokenGroup::VALUE_END) && token.is(TokenGroup::OPERAND | TokenGroup::UNARY) {
        return Err(CompileError::unexpected(pair()));
    }
    let expects_value = prev.group.is_empty()
        || prev.is(TokenGroup::DOT | TokenGroup::OPERATOR | TokenGroup::DELIMITER | TokenGroup::UNARY);
    if expects_value && token.is(TokenGroup::OPERATOR | TokenGroup::DELIMITER | TokenGroup::CLOSE) {
        return Err(CompileError::unexpected(pair()));
    }
    if prev.is(TokenGroup::DOT) && token.kind != TokenKind::Name {
        return Err(CompileError::unexpected(pair()));
    }
    if prev.is(TokenGroup::UNARY) {
        if token.is(TokenGroup::UNARY) {
            return Err(CompileError::new(
                ErrorCode::E1008,
                format!(
                    "Unexpected `{}{}`: unary operator chaining is not allowed",
                    prev.text, token.text
                ),
            ));
        }
        if token.kind == TokenKind::Quoted {
            return Err(CompileError::unexpected(pair()));
        }
    }
    Ok(())
}

/// Validate the end of an expression at stop character `c`.
fn finish(state: &ExprState<'_>, c: char) -> Result<(), CompileError> {
    if state.tokens == 0 {
        if state.ctx.allows_empty_before(c) {
            return Ok(());
        }
        return Err(CompileError::new(
            ErrorCode::E1003,
            format!("Unexpected `{c}`: missing expression before `{c}`"),
        ));
    }
    if state
        .prev
        .is(TokenGroup::OPERATOR | TokenGroup::UNARY | TokenGroup::DOT)
    {
        return Err(CompileError::new(
            ErrorCode::E1010,
            format!("Expression ends with `{}`", state.prev.text),
        ));
    }
    Ok(())
}

/// Copy a quoted literal. In double quotes `$` is escaped so the host
/// never interpolates variables.
fn push_quoted(out: &mut String, literal: &str) {
    if !literal.starts_with('"') {
        out.push_str(literal);
        return;
    }
    let mut chars = literal.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                out.push(c);
                if let Some(escaped) = chars.next() {
                    out.push(escaped);
                }
            }
            '$' => out.push_str("\\$"),
            _ => out.push(c),
        }
    }
}

fn unterminated() -> CompileError {
    CompileError::new(
        ErrorCode::E0003,
        "Template ends without closing tag `]`",
    )
}
