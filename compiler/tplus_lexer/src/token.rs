//! Token kinds and token groups.

use bitflags::bitflags;

/// Bracket family shared by openers and closers.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Delim {
    Paren,
    Brace,
    Bracket,
}

impl Delim {
    pub fn open_char(self) -> char {
        match self {
            Delim::Paren => '(',
            Delim::Brace => '{',
            Delim::Bracket => '[',
        }
    }

    pub fn close_char(self) -> char {
        match self {
            Delim::Paren => ')',
            Delim::Brace => '}',
            Delim::Bracket => ']',
        }
    }
}

/// What a token is.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum TokenKind {
    Space,
    /// A run of one or more dots. Leading runs address loop depth.
    Dot,
    Name,
    Number,
    Quoted,
    /// `++` / `--`, lexed only to be rejected.
    Crement,
    Comparison,
    Logic,
    Elvis,
    ArithOrBit,
    TernaryIf,
    /// Ternary else or key/value separator.
    Colon,
    Comma,
    Open(Delim),
    Close(Delim),
    Unary,
    Plus,
    Minus,
    /// A completed sub-expression. Never produced by the lexer.
    Nested,
    /// Nothing parsed yet. Never produced by the lexer.
    Start,
}

bitflags! {
    /// Token groups, used for adjacency rules.
    ///
    /// The empty set stands for "no previous token" (start of expression).
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
    pub struct TokenGroup: u16 {
        const SPACE = 1 << 0;
        const DOT = 1 << 1;
        const OPERAND = 1 << 2;
        const OPERATOR = 1 << 3;
        const DELIMITER = 1 << 4;
        const OPEN = 1 << 5;
        const CLOSE = 1 << 6;
        const UNARY = 1 << 7;
        const BI_UNARY = 1 << 8;

        /// Tokens that make the parser descend into a child expression.
        const ENTERS_CONTEXT = Self::OPEN.bits() | Self::DELIMITER.bits();
        /// Tokens that start a wrapper-eligible span.
        const WRAP_START = Self::OPEN.bits() | Self::DOT.bits() | Self::OPERAND.bits();
        /// Tokens after which a value is complete.
        const VALUE_END = Self::OPERAND.bits() | Self::CLOSE.bits();
    }
}

impl TokenKind {
    /// Group before `+`/`-` reclassification.
    pub fn group(self) -> TokenGroup {
        match self {
            TokenKind::Space => TokenGroup::SPACE,
            TokenKind::Dot => TokenGroup::DOT,
            TokenKind::Name | TokenKind::Number | TokenKind::Quoted | TokenKind::Nested => {
                TokenGroup::OPERAND
            }
            TokenKind::Crement
            | TokenKind::Comparison
            | TokenKind::Logic
            | TokenKind::Elvis
            | TokenKind::ArithOrBit => TokenGroup::OPERATOR,
            TokenKind::TernaryIf | TokenKind::Colon | TokenKind::Comma => TokenGroup::DELIMITER,
            TokenKind::Open(_) => TokenGroup::OPEN,
            TokenKind::Close(_) => TokenGroup::CLOSE,
            TokenKind::Unary => TokenGroup::UNARY,
            TokenKind::Plus | TokenKind::Minus => TokenGroup::BI_UNARY,
            TokenKind::Start => TokenGroup::empty(),
        }
    }
}

/// A classified slice of tag text.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct Token<'src> {
    pub kind: TokenKind,
    pub group: TokenGroup,
    pub text: &'src str,
}

impl<'src> Token<'src> {
    pub fn new(kind: TokenKind, text: &'src str) -> Self {
        Token {
            kind,
            group: kind.group(),
            text,
        }
    }

    /// The "previous token" of an expression that has not consumed anything.
    pub fn start() -> Self {
        Token::new(TokenKind::Start, "")
    }

    /// Stand-in for a completed child expression.
    pub fn nested() -> Self {
        Token::new(TokenKind::Nested, "")
    }

    /// Resolve `+`/`-`: binary after a value, unary otherwise.
    #[must_use]
    pub fn reclassified(mut self, prev: TokenGroup) -> Self {
        if self.group == TokenGroup::BI_UNARY {
            self.group = if prev.intersects(TokenGroup::VALUE_END) {
                TokenGroup::OPERATOR
            } else {
                TokenGroup::UNARY
            };
        }
        self
    }

    pub fn is(&self, group: TokenGroup) -> bool {
        self.group.intersects(group)
    }
}
