//! Normalized template text and the cursor that walks it.
//!
//! Templates are normalized once before scanning: every UTF-8 BOM is
//! removed and all line endings become `\n`. The cursor then only ever
//! moves forward, counting the newlines it consumes so that every error can
//! name the template line it happened on.

/// Byte-order mark as it appears in decoded text.
const BOM: char = '\u{FEFF}';

/// Strip BOMs and convert `\r\n` / `\r` line endings to `\n`.
pub fn normalize_source(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            BOM => {}
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                out.push('\n');
            }
            _ => out.push(c),
        }
    }
    out
}

/// Forward-only cursor over normalized template text.
///
/// Lines are 1-based. The cursor is [`Copy`] so callers can look ahead by
/// copying it and advancing the copy.
#[derive(Clone, Copy, Debug)]
pub struct Cursor<'src> {
    text: &'src str,
    pos: usize,
    line: u32,
}

impl<'src> Cursor<'src> {
    pub fn new(text: &'src str) -> Self {
        Cursor {
            text,
            pos: 0,
            line: 1,
        }
    }

    /// Unconsumed text.
    #[inline]
    pub fn rest(&self) -> &'src str {
        &self.text[self.pos..]
    }

    #[inline]
    pub fn is_eof(&self) -> bool {
        self.pos >= self.text.len()
    }

    /// Byte offset into the normalized text.
    #[inline]
    pub fn offset(&self) -> usize {
        self.pos
    }

    /// Current 1-based line.
    #[inline]
    pub fn line(&self) -> u32 {
        self.line
    }

    /// Text between two offsets previously returned by [`offset`](Self::offset).
    pub fn slice(&self, start: usize, end: usize) -> &'src str {
        &self.text[start..end]
    }

    /// Consume `len` bytes and return them. `len` must end on a char boundary.
    pub fn advance(&mut self, len: usize) -> &'src str {
        let end = (self.pos + len).min(self.text.len());
        let consumed = &self.text[self.pos..end];
        self.line += count_newlines(consumed);
        self.pos = end;
        consumed
    }

    /// Consume leading whitespace.
    pub fn skip_space(&mut self) {
        let rest = self.rest();
        let trimmed = rest.trim_start();
        self.advance(rest.len() - trimmed.len());
    }

    /// First non-whitespace character of the unconsumed text.
    pub fn peek_non_space(&self) -> Option<char> {
        self.rest().trim_start().chars().next()
    }
}

fn count_newlines(s: &str) -> u32 {
    let count = memchr::memchr_iter(b'\n', s.as_bytes()).count();
    u32::try_from(count).unwrap_or(u32::MAX)
}
