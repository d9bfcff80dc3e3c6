//! The single error type every compiler layer returns.

use std::path::{Path, PathBuf};

use crate::{ErrorCode, ErrorKind};

/// A syntax or fatal error that aborted the compile of one template.
///
/// Created deep in the parser with only a code and a message; the statement
/// compiler attaches the line and raw tag, and the engine attaches the file.
/// The `with_*` builders never overwrite a location that is already set, so
/// the innermost (most precise) location wins.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("[{code}] {message}")]
pub struct CompileError {
    code: ErrorCode,
    message: String,
    line: Option<u32>,
    tag: Option<String>,
    file: Option<PathBuf>,
}

impl CompileError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        CompileError {
            code,
            message: message.into(),
            line: None,
            tag: None,
            file: None,
        }
    }

    /// Shorthand for a "found X where it is not allowed" syntax error.
    pub fn unexpected(found: impl AsRef<str>) -> Self {
        Self::new(
            ErrorCode::E1002,
            format!("Unexpected `{}`", found.as_ref()),
        )
    }

    #[must_use]
    pub fn with_line(mut self, line: u32) -> Self {
        self.line.get_or_insert(line);
        self
    }

    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        if self.tag.is_none() {
            self.tag = Some(tag.into());
        }
        self
    }

    #[must_use]
    pub fn with_file(mut self, file: impl Into<PathBuf>) -> Self {
        if self.file.is_none() {
            self.file = Some(file.into());
        }
        self
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn kind(&self) -> ErrorKind {
        self.code.kind()
    }

    pub fn is_syntax(&self) -> bool {
        self.kind() == ErrorKind::Syntax
    }

    pub fn is_fatal(&self) -> bool {
        self.kind() == ErrorKind::Fatal
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn line(&self) -> Option<u32> {
        self.line
    }

    /// Raw text of the offending tag, when the error happened inside one.
    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }
}
