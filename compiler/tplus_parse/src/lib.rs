//! Tplus template compiler front end.
//!
//! [`Compiler::compile`] turns template text into the body of a compiled
//! artifact: literal text is copied verbatim and every tag becomes a host
//! script statement followed by a metadata comment ([`TagMeta`]) naming the
//! template line and raw tag it came from.
//!
//! Pipeline, outermost first:
//!
//! - `scanner`: finds tag openers, handles escapes and comments
//! - `statement`: the five commands and the open-block stack
//! - `expr`: context-sensitive expression parsing
//! - `name_chain`: dotted-name resolution against the [`Registry`]
//! - `context`: nesting contexts and their terminators

mod context;
mod expr;
mod name_chain;
mod registry;
mod scanner;
mod stack;
mod statement;

use tplus_diagnostic::CompileError;
use tplus_lexer::{normalize_source, Cursor};
use tracing::debug;

pub use registry::{
    ClassInfo, MethodRegistry, Registry, SymbolTable, DEFAULT_LOOP_HELPER_CLASS,
    DEFAULT_LOOP_HELPER_METHODS, DEFAULT_WRAPPER_CLASS, DEFAULT_WRAPPER_METHODS,
};
pub use statement::TagMeta;

use statement::Block;

/// Compiles templates against one registry.
///
/// Holds no per-compile state, so one compiler can be shared across threads.
#[derive(Clone, Copy, Debug)]
pub struct Compiler<'r> {
    registry: &'r Registry,
    short_open_tag: bool,
}

impl<'r> Compiler<'r> {
    pub fn new(registry: &'r Registry) -> Self {
        Compiler {
            registry,
            short_open_tag: false,
        }
    }

    /// Treat every `<?` as a host script tag, not only `<?php` and `<?=`.
    #[must_use]
    pub fn short_open_tag(mut self, enabled: bool) -> Self {
        self.short_open_tag = enabled;
        self
    }

    /// Compile template text into an artifact body (without header).
    pub fn compile(&self, source: &str) -> Result<String, CompileError> {
        let text = normalize_source(source);
        debug!(bytes = text.len(), "compiling template");
        let body = Parser::new(&text, self.registry, self.short_open_tag).run()?;
        debug!(bytes = body.len(), "compiled template");
        Ok(body)
    }
}

/// State of one compile: cursor, block stack and nesting depth.
pub(crate) struct Parser<'src, 'r> {
    cursor: Cursor<'src>,
    registry: &'r Registry,
    blocks: Vec<Block>,
    nesting: usize,
    short_open_tag: bool,
}

impl<'src, 'r> Parser<'src, 'r> {
    fn new(text: &'src str, registry: &'r Registry, short_open_tag: bool) -> Self {
        Parser {
            cursor: Cursor::new(text),
            registry,
            blocks: Vec::new(),
            nesting: 0,
            short_open_tag,
        }
    }
}
