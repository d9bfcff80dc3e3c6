//! Compiled-artifact cache for Tplus templates.
//!
//! An artifact is the compiled template body behind a one-line [`Header`]
//! recording the compiler version, template mtime, canonical template path
//! and the artifact's own size. [`ArtifactCache::refresh`] recompiles only
//! when that header no longer matches the template on disk.

mod cache;
mod header;
mod source_map;

pub use cache::ArtifactCache;
pub use header::{Header, ParsedHeader, SIZE_PAD, VERSION};
pub use source_map::{locate, SourceLocation};
