//! Tag scanning: splits literal text from tags and assembles the artifact body.

use tplus_diagnostic::{CompileError, ErrorCode};
use tracing::trace;

use crate::statement::Command;
use crate::Parser;

const COMMAND_CHARS: &[u8] = b"=@?:/*";
const HTML_COMMENT_OPEN: &str = "<!--";
const HTML_COMMENT_CLOSE: &str = "-->";

/// A tag opener found in the remaining text.
///
/// `literal` bytes of plain text precede it; the opener itself spans an
/// optional `<!--\s*`, the `[`, any backslashes and the command character.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct Opener {
    literal: usize,
    html_comment: usize,
    backslashes: usize,
    command: u8,
}

impl Opener {
    fn len(self) -> usize {
        self.html_comment + 1 + self.backslashes + 1
    }
}

fn find_opener(rest: &str) -> Option<Opener> {
    let bytes = rest.as_bytes();
    memchr::memchr_iter(b'[', bytes).find_map(|pos| {
        let after = &bytes[pos + 1..];
        let backslashes = after.iter().take_while(|&&b| b == b'\\').count();
        let command = *after.get(backslashes)?;
        if !COMMAND_CHARS.contains(&command) {
            return None;
        }
        let before = rest[..pos].trim_end();
        let literal = if before.ends_with(HTML_COMMENT_OPEN) {
            before.len() - HTML_COMMENT_OPEN.len()
        } else {
            pos
        };
        Some(Opener {
            literal,
            html_comment: pos - literal,
            backslashes,
            command,
        })
    })
}

impl Parser<'_, '_> {
    /// Compile the whole template.
    pub(crate) fn run(mut self) -> Result<String, CompileError> {
        self.reject_host_tags()?;

        let mut out = String::with_capacity(self.cursor.rest().len() * 2);
        let mut tags = 0usize;
        while let Some(opener) = find_opener(self.cursor.rest()) {
            out.push_str(self.cursor.advance(opener.literal));
            let tag_start = self.cursor.offset();
            let line = self.cursor.line();
            let opener_text = self.cursor.advance(opener.len());

            if opener.backslashes > 0 {
                let escape_at = opener.html_comment + 1;
                out.push_str(&opener_text[..escape_at]);
                out.push_str(&opener_text[escape_at + 1..]);
                continue;
            }

            if opener.command == b'*' {
                self.skip_comment();
                continue;
            }

            let Some(command) = Command::from_char(char::from(opener.command)) else {
                continue;
            };
            trace!(line, ?command, "tag");
            match self.statement(command, line) {
                Ok(Some(statement)) => {
                    let raw = self.cursor.slice(tag_start, self.cursor.offset());
                    out.push_str(&statement.render(line, raw));
                    tags += 1;
                }
                Ok(None) => out.push_str(opener_text),
                Err(e) => return Err(self.locate(e, tag_start)),
            }
        }
        out.push_str(self.cursor.advance(self.cursor.rest().len()));

        self.check_blocks_closed()?;
        trace!(tags, "template scanned");
        Ok(out)
    }

    /// Attach the current line and the offending tag text to an error.
    fn locate(&self, error: CompileError, tag_start: usize) -> CompileError {
        let rest = self.cursor.rest();
        let end = match memchr::memchr2(b']', b'\n', rest.as_bytes()) {
            Some(i) if rest.as_bytes()[i] == b']' => i + 1,
            Some(i) => i,
            None => rest.len(),
        };
        let tag = self.cursor.slice(tag_start, self.cursor.offset() + end);
        error.with_line(self.cursor.line()).with_tag(tag)
    }

    /// `[* ... *]` with an optional trailing `-->`. An unterminated comment
    /// swallows the rest of the template.
    fn skip_comment(&mut self) {
        let rest = self.cursor.rest();
        match memchr::memmem::find(rest.as_bytes(), b"*]") {
            Some(end) => {
                self.cursor.advance(end + 2);
                self.skip_html_comment_close();
            }
            None => {
                self.cursor.advance(rest.len());
            }
        }
    }

    /// Consume `\s*-->` if it follows.
    pub(crate) fn skip_html_comment_close(&mut self) {
        let rest = self.cursor.rest();
        let trimmed = rest.trim_start();
        if trimmed.starts_with(HTML_COMMENT_CLOSE) {
            self.cursor
                .advance(rest.len() - trimmed.len() + HTML_COMMENT_CLOSE.len());
        }
    }

    /// Templates may not embed host script.
    fn reject_host_tags(&self) -> Result<(), CompileError> {
        let text = self.cursor.rest();
        for pos in memchr::memmem::find_iter(text.as_bytes(), b"<?") {
            let after = &text[pos + 2..];
            let found = if self.short_open_tag {
                Some("<?")
            } else if after.starts_with('=') {
                Some("<?=")
            } else if after.get(..3).is_some_and(|p| p.eq_ignore_ascii_case("php"))
                && after[3..].starts_with(char::is_whitespace)
            {
                Some("<?php")
            } else {
                None
            };
            if let Some(tag) = found {
                let newlines = memchr::memchr_iter(b'\n', &text.as_bytes()[..pos]).count();
                let line = u32::try_from(newlines).map_or(u32::MAX, |n| n.saturating_add(1));
                return Err(CompileError::new(
                    ErrorCode::E0001,
                    format!("Host script tag `{tag}` is not allowed in templates"),
                )
                .with_line(line));
            }
        }
        Ok(())
    }
}
