//! The self-describing artifact header.
//!
//! ```text
//! <?php /* Tplus 1.1.2 2024-05-01 09:30:00 /srv/tpl/index.html 000000731 */ ?>
//! ```
//!
//! Everything up to and including the space before the size field is the
//! *prefix*: it depends only on the compiler version and the template's
//! modification time and canonical path. The size field is the byte length
//! of the whole artifact, zero-padded to [`SIZE_PAD`] digits, so a torn or
//! truncated artifact never looks fresh.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Local};
use tplus_diagnostic::{CompileError, ErrorCode};

/// Compiler version written into every header.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Width of the zero-padded size field.
pub const SIZE_PAD: usize = 9;

const PREFIX_OPEN: &str = "<?php /* Tplus ";
const CLOSE: &str = " */ ?>\n";
const MTIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const MAX_SIZE: usize = 999_999_999;

/// Expected header of the artifact compiled from one template.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Header {
    prefix: String,
}

impl Header {
    /// Header for `source` as it is on disk right now.
    pub fn for_source(source: &Path) -> Result<Self, CompileError> {
        let canonical = fs::canonicalize(source).map_err(|e| missing_source(source, &e))?;
        let modified = fs::metadata(&canonical)
            .and_then(|m| m.modified())
            .map_err(|e| missing_source(source, &e))?;
        Ok(Self::new(VERSION, modified, &canonical))
    }

    pub fn new(version: &str, modified: SystemTime, canonical: &Path) -> Self {
        let mtime: DateTime<Local> = modified.into();
        Header {
            prefix: format!(
                "{PREFIX_OPEN}{version} {} {} ",
                mtime.format(MTIME_FORMAT),
                canonical.display()
            ),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Number of bytes a freshness check reads from the artifact.
    pub fn check_len(&self) -> usize {
        self.prefix.len() + SIZE_PAD
    }

    /// Full artifact text: header, size field and body.
    pub fn stamp(&self, body: &str) -> Result<String, CompileError> {
        let total = self.check_len() + CLOSE.len() + body.len();
        if total > MAX_SIZE {
            return Err(CompileError::new(
                ErrorCode::E5008,
                format!("compiled artifact of {total} bytes does not fit the size field"),
            ));
        }
        let mut out = String::with_capacity(total);
        out.push_str(&self.prefix);
        let _ = write!(out, "{total:0width$}", width = SIZE_PAD);
        out.push_str(CLOSE);
        out.push_str(body);
        Ok(out)
    }

    /// Whether the first [`Header::check_len`] bytes of an artifact match
    /// this header and declare `actual_size`.
    pub fn matches(&self, head: &[u8], actual_size: u64) -> bool {
        if head.len() != self.check_len() {
            return false;
        }
        let (prefix, size) = head.split_at(self.prefix.len());
        prefix == self.prefix.as_bytes()
            && std::str::from_utf8(size)
                .ok()
                .and_then(|s| s.parse::<u64>().ok())
                .is_some_and(|declared| declared == actual_size)
    }
}

/// Fields of a header read back from an artifact's first line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedHeader {
    pub version: String,
    pub mtime: String,
    pub source: PathBuf,
    pub size: u64,
}

impl ParsedHeader {
    /// Parse the first line of an artifact. The source path may contain
    /// spaces; the size field is the last word.
    pub fn parse(first_line: &str) -> Option<Self> {
        let rest = first_line.strip_prefix(PREFIX_OPEN)?;
        let rest = rest.strip_suffix(CLOSE.trim_end_matches('\n'))?;
        let (version, rest) = rest.split_once(' ')?;
        let (date, rest) = rest.split_once(' ')?;
        let (time, rest) = rest.split_once(' ')?;
        let (source, size) = rest.rsplit_once(' ')?;
        if size.len() != SIZE_PAD {
            return None;
        }
        Some(ParsedHeader {
            version: version.to_owned(),
            mtime: format!("{date} {time}"),
            source: PathBuf::from(source),
            size: size.parse().ok()?,
        })
    }
}

fn missing_source(source: &Path, error: &std::io::Error) -> CompileError {
    CompileError::new(
        ErrorCode::E5009,
        format!("cannot find template `{}`: {error}", source.display()),
    )
    .with_file(source)
}

#[cfg(test)]
mod tests;
