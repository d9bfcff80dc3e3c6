use std::fmt;
use std::str::FromStr;

/// Which of the two error families a code belongs to.
///
/// Both abort the compile of the current template. They differ in who has to
/// act: a syntax error is a template-authoring mistake, a fatal error is a
/// mismatch with the environment (symbol table, adapters, filesystem).
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorKind {
    Syntax,
    Fatal,
}

impl ErrorKind {
    /// Title used in operator-facing log lines.
    pub fn title(self) -> &'static str {
        match self {
            ErrorKind::Syntax => "Tplus Syntax Error",
            ErrorKind::Fatal => "Tplus Scripter Fatal Error",
        }
    }
}

/// Error codes for all compiler diagnostics.
///
/// Format: E#### where the first digit indicates the phase:
/// - E0xxx: tag scanning
/// - E1xxx: expression syntax
/// - E2xxx: name resolution syntax
/// - E3xxx: block structure
/// - E5xxx: environment (fatal)
/// - E9xxx: internal compiler errors (fatal)
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // Tag scanning (E0xxx)
    /// Host script delimiter inside a template
    E0001,
    /// Tag not closed by `]`
    E0002,
    /// Template ends inside a tag
    E0003,

    // Expression syntax (E1xxx)
    /// No token matches the input
    E1001,
    /// Unexpected token
    E1002,
    /// Missing expression before a delimiter
    E1003,
    /// Increment/decrement operator
    E1004,
    /// Delimiter not accepted in this context
    E1005,
    /// Closer does not match the open group
    E1006,
    /// Ternary without `:`
    E1007,
    /// Chained unary operators
    E1008,
    /// Expression nesting too deep
    E1009,
    /// Expression ends after an operator, unary or dot
    E1010,

    // Name resolution syntax (E2xxx)
    /// Reserved word misuse
    E2001,
    /// Invalid use of `this`
    E2002,
    /// Invalid superglobal access
    E2003,
    /// Loop depth out of range
    E2004,
    /// Invalid loop member access
    E2005,
    /// Invalid constant chain
    E2006,
    /// Method name after a literal or closer is not called
    E2007,

    // Block structure (E3xxx)
    /// Unexpected else command
    E3001,
    /// Unclosed loop or branch
    E3002,

    // Environment (E5xxx)
    /// Undefined function
    E5001,
    /// Undefined class
    E5002,
    /// Undefined static method
    E5003,
    /// Undefined constant
    E5004,
    /// Wrapper method not registered
    E5005,
    /// Loop helper method not registered
    E5006,
    /// Artifact root missing or not accessible
    E5007,
    /// Reading the template or writing the artifact failed
    E5008,
    /// Template file not found
    E5009,

    // Internal (E9xxx)
    /// Internal compiler error
    E9001,
}

/// Every code, in declaration order.
pub const ALL_CODES: &[ErrorCode] = &[
    ErrorCode::E0001,
    ErrorCode::E0002,
    ErrorCode::E0003,
    ErrorCode::E1001,
    ErrorCode::E1002,
    ErrorCode::E1003,
    ErrorCode::E1004,
    ErrorCode::E1005,
    ErrorCode::E1006,
    ErrorCode::E1007,
    ErrorCode::E1008,
    ErrorCode::E1009,
    ErrorCode::E1010,
    ErrorCode::E2001,
    ErrorCode::E2002,
    ErrorCode::E2003,
    ErrorCode::E2004,
    ErrorCode::E2005,
    ErrorCode::E2006,
    ErrorCode::E2007,
    ErrorCode::E3001,
    ErrorCode::E3002,
    ErrorCode::E5001,
    ErrorCode::E5002,
    ErrorCode::E5003,
    ErrorCode::E5004,
    ErrorCode::E5005,
    ErrorCode::E5006,
    ErrorCode::E5007,
    ErrorCode::E5008,
    ErrorCode::E5009,
    ErrorCode::E9001,
];

impl ErrorCode {
    /// Get the code as a string (e.g., "E1002").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E0001 => "E0001",
            ErrorCode::E0002 => "E0002",
            ErrorCode::E0003 => "E0003",
            ErrorCode::E1001 => "E1001",
            ErrorCode::E1002 => "E1002",
            ErrorCode::E1003 => "E1003",
            ErrorCode::E1004 => "E1004",
            ErrorCode::E1005 => "E1005",
            ErrorCode::E1006 => "E1006",
            ErrorCode::E1007 => "E1007",
            ErrorCode::E1008 => "E1008",
            ErrorCode::E1009 => "E1009",
            ErrorCode::E1010 => "E1010",
            ErrorCode::E2001 => "E2001",
            ErrorCode::E2002 => "E2002",
            ErrorCode::E2003 => "E2003",
            ErrorCode::E2004 => "E2004",
            ErrorCode::E2005 => "E2005",
            ErrorCode::E2006 => "E2006",
            ErrorCode::E2007 => "E2007",
            ErrorCode::E3001 => "E3001",
            ErrorCode::E3002 => "E3002",
            ErrorCode::E5001 => "E5001",
            ErrorCode::E5002 => "E5002",
            ErrorCode::E5003 => "E5003",
            ErrorCode::E5004 => "E5004",
            ErrorCode::E5005 => "E5005",
            ErrorCode::E5006 => "E5006",
            ErrorCode::E5007 => "E5007",
            ErrorCode::E5008 => "E5008",
            ErrorCode::E5009 => "E5009",
            ErrorCode::E9001 => "E9001",
        }
    }

    /// Syntax or fatal. E5xxx and E9xxx are fatal, everything else is syntax.
    pub fn kind(&self) -> ErrorKind {
        if self.as_str().starts_with("E5") || self.as_str().starts_with("E9") {
            ErrorKind::Fatal
        } else {
            ErrorKind::Syntax
        }
    }

    /// One-paragraph explanation for `tplus explain`.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E0001 => {
                "Templates may not embed host script. Remove `<?php`, `<?=` (and `<?` when \
                 short open tags are enabled) from the template."
            }
            ErrorCode::E0002 => "A tag must end with `]`, optionally followed by `-->`.",
            ErrorCode::E0003 => "The template ended before the open tag was closed by `]`.",
            ErrorCode::E1001 => {
                "The expression contains a character sequence that is not a name, number, \
                 quoted string, operator or bracket."
            }
            ErrorCode::E1002 => {
                "Two tokens appear in an order the expression grammar does not allow, \
                 e.g. two operands in a row or an operator right after `(`."
            }
            ErrorCode::E1003 => {
                "An expression is required before this delimiter, e.g. `f(a,)` or `(`)`."
            }
            ErrorCode::E1004 => "`++` and `--` are not supported in template expressions.",
            ErrorCode::E1005 => {
                "`,` is only valid inside call arguments and literals; `:` only inside \
                 literals and after a ternary `?`."
            }
            ErrorCode::E1006 => "The closing bracket does not match the bracket it closes.",
            ErrorCode::E1007 => "A ternary `?` must be followed by `:`.",
            ErrorCode::E1008 => "Unary operators cannot be chained, e.g. `!!a` or `-!a`.",
            ErrorCode::E1009 => "The expression is nested deeper than the compiler allows.",
            ErrorCode::E1010 => "The expression ends right after an operator, unary or `.`.",
            ErrorCode::E2001 => {
                "`true`, `false`, `null` and `this` are reserved and cannot appear inside a \
                 dotted chain or be called."
            }
            ErrorCode::E2002 => "`this` may only be used bare or as `this.method()`.",
            ErrorCode::E2003 => {
                "`GET`, `SERVER`, `COOKIE` and `SESSION` take exactly one key; `GLOBALS` \
                 takes at least one."
            }
            ErrorCode::E2004 => {
                "A loop reference uses more leading dots than there are open loops."
            }
            ErrorCode::E2005 => {
                "Loop members `i`, `s` and `k` are scalars and `h` needs a helper method call."
            }
            ErrorCode::E2006 => "A constant chain may contain only one ALL-CAPS segment.",
            ErrorCode::E2007 => "A method after a literal or closing bracket must be called.",
            ErrorCode::E3001 => "`[:]` cannot follow another `[:]` in the same block.",
            ErrorCode::E3002 => "A `[@ ]` or `[? ]` block is not closed by `[/]`.",
            ErrorCode::E5001 => "The function is not defined in the host symbol table.",
            ErrorCode::E5002 => "The class is not defined in the host symbol table.",
            ErrorCode::E5003 => "The class exists but does not define this static method.",
            ErrorCode::E5004 => "The constant is not defined in the host symbol table.",
            ErrorCode::E5005 => "The method is not registered on the value wrapper.",
            ErrorCode::E5006 => "The method is not registered on the loop helper.",
            ErrorCode::E5007 => {
                "The artifact root must exist, be readable and (on POSIX) writable."
            }
            ErrorCode::E5008 => "Reading the template or writing the artifact failed.",
            ErrorCode::E5009 => "The template file does not exist under the template root.",
            ErrorCode::E9001 => "Internal compiler error; please report it.",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ErrorCode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_uppercase();
        ALL_CODES
            .iter()
            .copied()
            .find(|code| code.as_str() == wanted)
            .ok_or(())
    }
}
