//! Map a line of a compiled artifact back to its template.
//!
//! Runtime errors raised while the renderer executes an artifact point at
//! artifact lines. The header names the template and every generated
//! statement carries a [`TagMeta`] comment with the template line and raw
//! tag, which is enough to report the error against the template.

use std::path::PathBuf;

use tplus_parse::TagMeta;

use crate::header::ParsedHeader;

/// Where an artifact line came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceLocation {
    pub template: PathBuf,
    pub line: u32,
    /// Raw tag text, e.g. `[= user.name ]`.
    pub code: String,
}

/// Locate 1-based `artifact_line` of `artifact` in its template.
///
/// Returns `None` for artifacts without a valid header and for lines that
/// hold no generated statement.
pub fn locate(artifact: &str, artifact_line: usize) -> Option<SourceLocation> {
    let mut lines = artifact.lines();
    let header = ParsedHeader::parse(lines.next()?)?;
    // Line 1 is the header itself.
    let text = lines.nth(artifact_line.checked_sub(2)?)?;
    let meta = TagMeta::find(text)?;
    Some(SourceLocation {
        template: header.source,
        line: meta.line,
        code: meta.code,
    })
}

#[cfg(test)]
mod tests;
