#![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use pretty_assertions::assert_eq;
use tplus_lexer::{Delim, Token, TokenKind};

use super::*;

#[test]
fn opener_after_name_is_call_or_index() {
    let name = Token::new(TokenKind::Name, "f");
    assert_eq!(Context::enter(&name, Delim::Paren).unwrap(), Context::FunctionArgs);
    assert_eq!(Context::enter(&name, Delim::Brace).unwrap(), Context::BraceIndex);
    assert_eq!(Context::enter(&name, Delim::Bracket).unwrap(), Context::BracketIndex);
}

#[test]
fn opener_elsewhere_is_group_or_literal() {
    let start = Token::start();
    assert_eq!(Context::enter(&start, Delim::Paren).unwrap(), Context::Paren);
    assert_eq!(Context::enter(&start, Delim::Brace).unwrap(), Context::ObjectLiteral);
    assert_eq!(Context::enter(&start, Delim::Bracket).unwrap(), Context::ArrayLiteral);

    let close = Token::new(TokenKind::Close(Delim::Paren), ")");
    assert_eq!(Context::enter(&close, Delim::Bracket).unwrap(), Context::BracketIndex);
    let err = Context::enter(&close, Delim::Paren).unwrap_err();
    assert_eq!(err.code(), ErrorCode::E1002);
}

#[test]
fn delimiters_refine_group_contexts() {
    assert_eq!(
        Context::FunctionArgs.after_delimiter(',').unwrap(),
        Context::FunctionArgsAfterComma
    );
    assert_eq!(
        Context::ObjectLiteral.after_delimiter(':').unwrap(),
        Context::ObjectAfterColon
    );
    assert_eq!(
        Context::ObjectAfterColon.after_delimiter(',').unwrap(),
        Context::ObjectAfterComma
    );
    assert_eq!(
        Context::ArrayAfterComma.after_delimiter(':').unwrap(),
        Context::ArrayAfterColon
    );
    assert_eq!(
        Context::TernaryThen.after_delimiter(':').unwrap(),
        Context::TernaryElse
    );
}

#[test]
fn delimiters_rejected_outside_their_groups() {
    for (ctx, c) in [
        (Context::Paren, ','),
        (Context::FunctionArgs, ':'),
        (Context::ObjectAfterColon, ':'),
        (Context::BracketIndex, ','),
        (Context::Tag, ':'),
    ] {
        let err = ctx.after_delimiter(c).unwrap_err();
        assert_eq!(err.code(), ErrorCode::E1005, "{ctx:?} {c}");
    }
}

#[test]
fn terminator_table() {
    use Terminator::{Hard, No, Soft};
    let cases = [
        (Context::Tag, ']', Hard),
        (Context::Tag, ')', No),
        (Context::FunctionArgs, ')', Hard),
        (Context::FunctionArgs, ',', Soft),
        (Context::Paren, ',', No),
        (Context::BraceIndex, '}', Hard),
        (Context::BracketIndex, ']', Hard),
        (Context::ObjectLiteral, ':', Soft),
        (Context::ObjectAfterColon, ':', No),
        (Context::ObjectAfterColon, ',', Soft),
        (Context::ArrayAfterComma, ']', Hard),
        (Context::TernaryThen, ':', Soft),
        (Context::TernaryThen, ')', No),
        (Context::TernaryElse, ')', Soft),
        (Context::TernaryElse, ']', Soft),
    ];
    for (ctx, c, expected) in cases {
        assert_eq!(ctx.terminator(c), expected, "{ctx:?} {c}");
    }
}

#[test]
fn empty_only_before_first_closer() {
    assert!(Context::FunctionArgs.allows_empty_before(')'));
    assert!(!Context::FunctionArgs.allows_empty_before(','));
    assert!(!Context::FunctionArgsAfterComma.allows_empty_before(')'));
    assert!(Context::ObjectLiteral.allows_empty_before('}'));
    assert!(Context::ArrayLiteral.allows_empty_before(']'));
    assert!(!Context::BracketIndex.allows_empty_before(']'));
    assert!(!Context::Paren.allows_empty_before(')'));
}

#[test]
fn ternary_cannot_nest_in_branch() {
    assert_eq!(Context::Tag.enter_ternary(false).unwrap(), Context::TernaryThen);
    assert!(Context::Tag.enter_ternary(true).is_err());
    assert!(Context::TernaryThen.enter_ternary(false).is_err());
    assert!(Context::TernaryElse.enter_ternary(false).is_err());
    assert_eq!(Context::Paren.enter_ternary(false).unwrap(), Context::TernaryThen);
}

#[test]
fn misplaced_stop_chars() {
    assert_eq!(Context::TernaryThen.misplaced(')').code(), ErrorCode::E1007);
    assert_eq!(Context::Paren.misplaced(']').code(), ErrorCode::E1006);
    assert_eq!(Context::Paren.misplaced(':').code(), ErrorCode::E1002);
    assert_eq!(Context::Tag.misplaced(')').code(), ErrorCode::E1002);
}
