//! Tag commands and the open-block stack.
//!
//! | Command | Meaning |
//! |---|---|
//! | `[= expr ]` | echo |
//! | `[@ expr ]` | loop over an array |
//! | `[? expr ]` | branch |
//! | `[: expr? ]` | loop-else, else-if or else |
//! | `[/]` | close the innermost loop or branch |

use serde::{Deserialize, Serialize};
use tplus_diagnostic::{CompileError, ErrorCode};

use crate::name_chain::LoopFrame;
use crate::Parser;

/// The five tag commands.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub(crate) enum Command {
    Echo,
    Loop,
    Branch,
    Else,
    End,
}

impl Command {
    pub(crate) fn from_char(c: char) -> Option<Self> {
        Some(match c {
            '=' => Command::Echo,
            '@' => Command::Loop,
            '?' => Command::Branch,
            ':' => Command::Else,
            '/' => Command::End,
            _ => return None,
        })
    }
}

/// Marker on the open-block stack.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub(crate) enum BlockKind {
    Loop,
    LoopElse,
    Branch,
    Else,
}

impl BlockKind {
    fn symbol(self) -> &'static str {
        match self {
            BlockKind::Loop => "@",
            BlockKind::LoopElse => "@:",
            BlockKind::Branch => "?",
            BlockKind::Else => ":",
        }
    }

    fn opens_block(self) -> bool {
        matches!(self, BlockKind::Loop | BlockKind::Branch)
    }
}

#[derive(Copy, Clone, Debug)]
pub(crate) struct Block {
    pub(crate) kind: BlockKind,
    /// Template line of the tag that pushed this marker.
    pub(crate) line: u32,
}

/// Generated code of one tag, before it is wrapped in host delimiters.
#[derive(Debug)]
pub(crate) struct Statement {
    echo: bool,
    body: String,
}

impl Statement {
    /// `<?= body META ?>` or `<?php body META ?>`.
    pub(crate) fn render(&self, line: u32, raw_tag: &str) -> String {
        let meta = TagMeta {
            line,
            code: raw_tag.to_owned(),
        }
        .to_comment();
        if self.echo {
            format!("<?= {} {meta} ?>", self.body)
        } else {
            format!("<?php {} {meta} ?>", self.body)
        }
    }
}

/// Source location embedded after every generated statement.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagMeta {
    /// Template line the tag starts on.
    pub line: u32,
    /// Raw tag text.
    pub code: String,
}

impl TagMeta {
    pub const COMMENT_OPEN: &'static str = "/* ";
    pub const COMMENT_CLOSE: &'static str = " */";

    /// `/* {"line":3,"code":"[= a ]"} */`. A `*/` inside the code is written
    /// as `*\/`, which JSON reads back as `*/`.
    pub fn to_comment(&self) -> String {
        let json = serde_json::to_string(self)
            .unwrap_or_else(|_| format!("{{\"line\":{}}}", self.line));
        format!(
            "{}{}{}",
            Self::COMMENT_OPEN,
            json.replace("*/", "*\\/"),
            Self::COMMENT_CLOSE
        )
    }

    /// Parse the first metadata comment found in `text`.
    pub fn find(text: &str) -> Option<Self> {
        let mut rest = text;
        while let Some(start) = rest.find("/* {") {
            let candidate = &rest[start + Self::COMMENT_OPEN.len()..];
            if let Some(end) = candidate.find(Self::COMMENT_CLOSE) {
                if let Ok(meta) = serde_json::from_str(&candidate[..end]) {
                    return Some(meta);
                }
            }
            rest = &rest[start + 1..];
        }
        None
    }
}

impl Parser<'_, '_> {
    /// Compile the rest of a tag after its command character.
    ///
    /// Returns `None` when an `[:` or `[/` appears outside any block: the
    /// caller then emits the opener as literal text.
    pub(crate) fn statement(
        &mut self,
        command: Command,
        line: u32,
    ) -> Result<Option<Statement>, CompileError> {
        let (echo, body) = match command {
            Command::Echo => (true, self.tag_expression()?),
            Command::Loop => (false, self.open_loop(line)?),
            Command::Branch => {
                let condition = self.tag_expression()?;
                self.push_block(BlockKind::Branch, line);
                (false, format!("if ({condition}) {{"))
            }
            Command::Else => match self.else_branch(line)? {
                Some(body) => (false, body),
                None => return Ok(None),
            },
            Command::End => match self.close_block() {
                Some(body) => (false, body),
                None => return Ok(None),
            },
        };
        self.right_tag()?;
        Ok(Some(Statement { echo, body }))
    }

    /// Number of loops enclosing the cursor.
    pub(crate) fn loop_depth(&self) -> usize {
        self.blocks
            .iter()
            .filter(|b| b.kind == BlockKind::Loop)
            .count()
    }

    /// Fail if a loop or branch is still open at the end of the template.
    pub(crate) fn check_blocks_closed(&self) -> Result<(), CompileError> {
        match self.blocks.iter().rev().find(|b| b.kind.opens_block()) {
            Some(block) => Err(CompileError::new(
                ErrorCode::E3002,
                format!("[{}...] is not closed by [/]", block.kind.symbol()),
            )
            .with_line(block.line)),
            None => Ok(()),
        }
    }

    fn push_block(&mut self, kind: BlockKind, line: u32) {
        self.blocks.push(Block { kind, line });
    }

    /// The loop expression only sees the loops around the tag; the new
    /// frame becomes addressable inside the loop body.
    fn open_loop(&mut self, line: u32) -> Result<String, CompileError> {
        let array = self.tag_expression()?;
        self.push_block(BlockKind::Loop, line);
        let frame = LoopFrame(self.loop_depth());
        let (a, i, s, k, v) = (
            frame.array(),
            frame.member("i"),
            frame.member("s"),
            frame.member("k"),
            frame.member("v"),
        );
        Ok(format!(
            "{a}={array};if (is_array({a}) and !empty({a})) {{{s}=count({a});{i}=-1;foreach({a} as {k}=>{v}) {{ ++{i};"
        ))
    }

    fn else_branch(&mut self, line: u32) -> Result<Option<String>, CompileError> {
        let Some(top) = self.blocks.last().copied() else {
            return Ok(None);
        };
        match top.kind {
            BlockKind::LoopElse | BlockKind::Else => Err(CompileError::new(
                ErrorCode::E3001,
                format!("Unexpected `:` command after `[{}]`", top.kind.symbol()),
            )),
            BlockKind::Loop => {
                self.push_block(BlockKind::LoopElse, line);
                Ok(Some("}} else {".to_owned()))
            }
            BlockKind::Branch if self.expression_exists() => {
                let condition = self.tag_expression()?;
                Ok(Some(format!("}} else if ({condition}) {{")))
            }
            BlockKind::Branch => {
                self.push_block(BlockKind::Else, line);
                Ok(Some("} else {".to_owned()))
            }
        }
    }

    /// Close the innermost loop or branch, discarding any else marker above
    /// it. A loop needs two braces: its `foreach` and its guard.
    fn close_block(&mut self) -> Option<String> {
        let top = self.blocks.last()?;
        let body = if top.kind == BlockKind::Loop { "}}" } else { "}" };
        while let Some(block) = self.blocks.pop() {
            if block.kind.opens_block() {
                break;
            }
        }
        Some(body.to_owned())
    }

    /// Consume `\s*]` and an optional `\s*-->`.
    fn right_tag(&mut self) -> Result<(), CompileError> {
        self.cursor.skip_space();
        match self.cursor.rest().chars().next() {
            Some(']') => {
                self.cursor.advance(1);
                self.skip_html_comment_close();
                Ok(())
            }
            Some(c) => Err(CompileError::new(
                ErrorCode::E0002,
                format!("Unexpected `{c}`: tag is not closed by `]`"),
            )),
            None => Err(CompileError::new(
                ErrorCode::E0003,
                "Template ends without closing tag `]`",
            )),
        }
    }
}

#[cfg(test)]
mod tests;
