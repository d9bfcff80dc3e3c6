//! Operator-facing renderings of a [`CompileError`].
//!
//! Two outputs exist: a single log line for the operator channel and an
//! escaped HTML fragment for the optional inline report. Both carry the same
//! facts (title, message, file, line, raw tag).

use std::fmt::Write as _;

use crate::CompileError;

/// Borrowing view that renders an error for humans.
pub struct Report<'a> {
    error: &'a CompileError,
}

impl<'a> Report<'a> {
    pub fn new(error: &'a CompileError) -> Self {
        Report { error }
    }

    /// `Tplus Syntax Error: [E1002] Unexpected `)` in /t/a.html on line 3`
    pub fn log_line(&self) -> String {
        let mut out = format!("{}: {}", self.error.kind().title(), self.error);
        if let Some(file) = self.error.file() {
            let _ = write!(out, " in {}", file.display());
        }
        if let Some(line) = self.error.line() {
            let _ = write!(out, " on line {line}");
        }
        if let Some(tag) = self.error.tag() {
            let _ = write!(out, " near `{}`", tag.trim());
        }
        out
    }

    /// Inline HTML report. Every interpolated value is escaped.
    pub fn html(&self) -> String {
        let mut out = format!(
            "<b>{}</b> {}",
            self.error.kind().title(),
            escape_html(&self.error.to_string())
        );
        if let Some(file) = self.error.file() {
            let _ = write!(
                out,
                " in <b>{}</b>",
                escape_html(&file.display().to_string())
            );
        }
        if let Some(line) = self.error.line() {
            let _ = write!(out, " on line <b>{line}</b>");
        }
        if let Some(tag) = self.error.tag() {
            let _ = write!(out, "<br><code>{}</code>", escape_html(tag.trim()));
        }
        out
    }
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests;
