//! Name-dot chain resolution.
//!
//! A chain such as `..item.price` or `App.Money.of` is accumulated one
//! segment at a time. Once the lookahead shows the chain is complete it is
//! resolved, first match wins:
//!
//! 1. reserved words (`true`, `false`, `null`, `this`)
//! 2. loop-relative references (leading dot run)
//! 3. `this`
//! 4. superglobal maps (`GET`, `SERVER`, `COOKIE`, `SESSION`, `GLOBALS`)
//! 5. static references (function, constant, static method, namespaced
//!    function), decided by capitalization
//! 6. the template data map `$V`

use smallvec::SmallVec;
use tplus_diagnostic::{CompileError, ErrorCode};
use tracing::trace;

use crate::registry::{Registry, SymbolTable};

const RESERVED: &[&str] = &["true", "false", "null", "this"];
const SINGLE_KEY_GLOBALS: &[&str] = &["GET", "SERVER", "COOKIE", "SESSION"];

/// What follows the segment just added.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub(crate) enum Lookahead {
    /// Another `.`: the chain continues.
    Dot,
    /// A `(`: the last segment is called.
    Call,
    Other,
}

/// Code for a resolved chain.
#[derive(Clone, Eq, PartialEq, Debug)]
pub(crate) struct Resolved {
    pub(crate) code: String,
    /// The value-wrapper opener must be spliced in at the start of the
    /// wrapper-eligible span.
    pub(crate) wrapped: bool,
}

impl Resolved {
    fn plain(code: String) -> Self {
        Resolved {
            code,
            wrapped: false,
        }
    }

    fn wrapped(code: String) -> Self {
        Resolved {
            code,
            wrapped: true,
        }
    }
}

/// Resolution environment.
#[derive(Copy, Clone)]
pub(crate) struct Scope<'r> {
    pub(crate) registry: &'r Registry,
    /// Number of loops enclosing the tag.
    pub(crate) loop_depth: usize,
}

#[derive(Default, Debug)]
pub(crate) struct NameChain<'src> {
    /// Length of the leading dot run, 0 when absent.
    depth: usize,
    names: SmallVec<[&'src str; 4]>,
    raw: String,
}

impl<'src> NameChain<'src> {
    fn is_empty(&self) -> bool {
        self.depth == 0 && self.names.is_empty()
    }

    fn clear(&mut self) {
        self.depth = 0;
        self.names.clear();
        self.raw.clear();
    }

    /// Add a dot run. Only a leading run may be longer than one dot.
    pub(crate) fn add_dot(&mut self, run: &str) -> Result<(), CompileError> {
        if self.is_empty() {
            self.depth = run.len();
        } else if run.len() > 1 {
            return Err(CompileError::unexpected(format!("{}{run}", self.raw)));
        }
        self.raw.push_str(run);
        Ok(())
    }

    /// Add a name segment. Returns the generated code once the chain ends.
    pub(crate) fn add_name(
        &mut self,
        name: &'src str,
        next: Lookahead,
        scope: Scope<'_>,
    ) -> Result<Option<Resolved>, CompileError> {
        if RESERVED.contains(&name) {
            if !self.is_empty() || next == Lookahead::Call {
                return Err(reserved(name));
            }
            if name != "this" {
                if next == Lookahead::Dot {
                    return Err(reserved(name));
                }
                return Ok(Some(Resolved::plain(name.to_owned())));
            }
        }

        self.names.push(name);
        self.raw.push_str(name);
        if next == Lookahead::Dot {
            return Ok(None);
        }

        let call = next == Lookahead::Call;
        let resolved = if self.depth > 0 {
            self.loop_member(call, scope)
        } else if self.names[0] == "this" {
            self.this(call)
        } else if self.names[0] == "GLOBALS" || SINGLE_KEY_GLOBALS.contains(&self.names[0]) {
            self.superglobal(call, scope)
        } else {
            self.static_or_data(call, scope)
        };
        if let Ok(r) = &resolved {
            trace!(chain = %self.raw, code = %r.code, wrapped = r.wrapped, "resolved name chain");
        }
        self.clear();
        resolved.map(Some)
    }

    fn loop_member(&self, call: bool, scope: Scope<'_>) -> Result<Resolved, CompileError> {
        let depth = self.depth;
        if depth > scope.loop_depth {
            return Err(CompileError::new(
                ErrorCode::E2004,
                format!(
                    "Loop depth of `{}` is not correct: {} loop(s) open",
                    self.raw, scope.loop_depth
                ),
            ));
        }
        let frame = LoopFrame(depth);
        let names = self.names.as_slice();

        match names {
            [member @ ("i" | "s" | "k")] if !call => Ok(Resolved::plain(frame.member(member))),
            [member @ ("i" | "s" | "k"), method] if call => {
                self.wrapper_call(frame.member(member), method, scope)
            }
            [first, ..] if matches!(*first, "i" | "s" | "k") => Err(self.bad_loop_member()),
            ["h", method] if call => {
                if !scope.registry.loop_helper.contains(method) {
                    return Err(CompileError::new(
                        ErrorCode::E5006,
                        format!(
                            "Loop helper method `{method}()` is not defined in `{}`",
                            scope.registry.loop_helper.class()
                        ),
                    ));
                }
                Ok(Resolved::plain(format!(
                    "\\{}::o({},{},{},{})->{method}",
                    scope.registry.loop_helper.class(),
                    frame.member("i"),
                    frame.member("s"),
                    frame.member("k"),
                    frame.member("v"),
                )))
            }
            ["h", ..] => Err(self.bad_loop_member()),
            _ => {
                let keys = match names {
                    ["v", rest @ ..] => rest,
                    all => all,
                };
                let (keys, method) = split_method(keys, call);
                if call && method.is_none() {
                    return Err(self.bad_loop_member());
                }
                let code = frame.member("v") + &index_keys(keys);
                Ok(match method {
                    Some(m) if scope.registry.wrapper.contains(m) => {
                        Resolved::wrapped(format!("{code})->{m}"))
                    }
                    Some(m) => Resolved::plain(format!("{code}->{m}")),
                    None => Resolved::plain(code),
                })
            }
        }
    }

    fn bad_loop_member(&self) -> CompileError {
        CompileError::new(
            ErrorCode::E2005,
            format!("Unexpected loop member usage `{}`", self.raw),
        )
    }

    fn this(&self, call: bool) -> Result<Resolved, CompileError> {
        match (self.names.as_slice(), call) {
            (["this"], false) => Ok(Resolved::plain("$this".to_owned())),
            (["this", method], true) => Ok(Resolved::plain(format!("$this->{method}"))),
            _ => Err(CompileError::new(
                ErrorCode::E2002,
                format!(
                    "`{}`: only `this` or `this.method()` is allowed",
                    self.raw
                ),
            )),
        }
    }

    fn superglobal(&self, call: bool, scope: Scope<'_>) -> Result<Resolved, CompileError> {
        let global = self.names[0];
        let (keys, method) = split_method(&self.names[1..], call);
        let valid = if global == "GLOBALS" {
            !keys.is_empty()
        } else {
            keys.len() == 1
        };
        if !valid || (call && method.is_none()) {
            return Err(CompileError::new(
                ErrorCode::E2003,
                format!("Unexpected auto-global usage `{}`", self.raw),
            ));
        }
        let base = if global == "GLOBALS" {
            "$GLOBALS".to_owned()
        } else {
            format!("$_{global}")
        };
        let code = base + &index_keys(keys);
        match method {
            Some(m) => self.wrapper_call(code, m, scope),
            None => Ok(Resolved::plain(code)),
        }
    }

    fn static_or_data(&self, call: bool, scope: Scope<'_>) -> Result<Resolved, CompileError> {
        let symbols = &scope.registry.symbols;
        if !call {
            if let Some(code) = self.constant(&self.names, symbols)? {
                return Ok(Resolved::plain(code));
            }
            return Ok(Resolved::plain(data_map(&self.names)));
        }

        if let [function] = self.names.as_slice() {
            if SymbolTable::is_construct(function) {
                return Ok(Resolved::plain((*function).to_owned()));
            }
            if !symbols.has_function(function) {
                return Err(CompileError::new(
                    ErrorCode::E5001,
                    format!("Function `\\{function}()` is not defined"),
                ));
            }
            return Ok(Resolved::plain(format!("\\{function}")));
        }

        let (prefix, method) = self.names.split_at(self.names.len() - 1);
        let method = method[0];

        if let Some(code) = self.constant(prefix, symbols)? {
            return self.wrapper_call(code, method, scope);
        }

        let path = prefix.join("\\");
        if let Some(class) = symbols.class(&path) {
            if !class.has_method(method) {
                return Err(CompileError::new(
                    ErrorCode::E5003,
                    format!("Static method `\\{path}::{method}()` not found"),
                ));
            }
            return Ok(Resolved::plain(format!("\\{path}::{method}")));
        }

        let function = format!("{path}\\{method}");
        if symbols.has_function(&function) {
            return Ok(Resolved::plain(format!("\\{function}")));
        }

        if prefix.last().is_some_and(|last| is_class_name(last)) {
            return Err(CompileError::new(
                ErrorCode::E5002,
                format!("Class `\\{path}` not found"),
            ));
        }

        self.wrapper_call(data_map(prefix), method, scope)
    }

    /// Resolve the first ALL-CAPS segment of `names` as a constant.
    ///
    /// Segments before it form the namespace or class, segments after it
    /// index into the constant's value.
    fn constant(
        &self,
        names: &[&str],
        symbols: &SymbolTable,
    ) -> Result<Option<String>, CompileError> {
        let Some(pos) = names.iter().position(|n| is_constant_name(n)) else {
            return Ok(None);
        };
        let (prefix, rest) = (&names[..pos], &names[pos + 1..]);
        let constant = names[pos];
        if rest.iter().any(|n| is_constant_name(n)) {
            return Err(CompileError::new(
                ErrorCode::E2006,
                format!("Unexpected constant usage `{}`", self.raw),
            ));
        }

        let base = if prefix.is_empty() {
            symbols
                .has_constant(constant)
                .then(|| format!("\\{constant}"))
        } else {
            let ns = prefix.join("\\");
            let namespaced = format!("{ns}\\{constant}");
            if symbols.has_constant(&namespaced) {
                Some(format!("\\{namespaced}"))
            } else {
                symbols
                    .class(&ns)
                    .filter(|class| class.has_constant(constant))
                    .map(|_| format!("\\{ns}::{constant}"))
            }
        };

        match base {
            Some(code) => Ok(Some(code + &index_keys(rest))),
            None => Err(CompileError::new(
                ErrorCode::E5004,
                format!("Constant `{}` not found", self.raw),
            )),
        }
    }

    /// `code` followed by a call to a registered wrapper method.
    fn wrapper_call(
        &self,
        code: String,
        method: &str,
        scope: Scope<'_>,
    ) -> Result<Resolved, CompileError> {
        if !scope.registry.wrapper.contains(method) {
            return Err(missing_wrapper_method(method, &self.raw, scope.registry));
        }
        Ok(Resolved::wrapped(format!("{code})->{method}")))
    }
}

pub(crate) fn missing_wrapper_method(method: &str, near: &str, registry: &Registry) -> CompileError {
    CompileError::new(
        ErrorCode::E5005,
        format!(
            "Wrapper method `{method}()` not found in `{}` for `{near}`",
            registry.wrapper.class()
        ),
    )
}

fn reserved(name: &str) -> CompileError {
    CompileError::new(ErrorCode::E2001, format!("`{name}` is a reserved word"))
}

/// Loop frame variables for one depth: `$L1`, `$L1i`, `$L1s`, `$L1k`, `$L1v`.
#[derive(Copy, Clone, Debug)]
pub(crate) struct LoopFrame(pub(crate) usize);

impl LoopFrame {
    pub(crate) fn array(self) -> String {
        format!("$L{}", self.0)
    }

    pub(crate) fn member(self, member: &str) -> String {
        format!("$L{}{member}", self.0)
    }
}

fn split_method<'a, 'src>(names: &'a [&'src str], call: bool) -> (&'a [&'src str], Option<&'src str>) {
    match names.split_last() {
        Some((last, keys)) if call => (keys, Some(*last)),
        _ => (names, None),
    }
}

fn index_keys(keys: &[&str]) -> String {
    keys.iter().map(|k| format!("[\"{k}\"]")).collect()
}

fn data_map(keys: &[&str]) -> String {
    format!("$V{}", index_keys(keys))
}

/// `^[A-Z][A-Z0-9_]*$`
fn is_constant_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(|c| c.is_ascii_uppercase())
        && chars.all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

/// Capitalized with at least one lowercase letter, like `Money` or `DateTime`.
fn is_class_name(name: &str) -> bool {
    name.chars().next().is_some_and(|c| c.is_ascii_uppercase())
        && name.chars().any(|c| c.is_ascii_lowercase())
}
