//! Artifact storage: freshness checks and atomic, locked writes.
//!
//! Artifacts live under one root directory, mirroring the template tree:
//! `views/a/b.html` compiles to `<root>/a/b.html.php`. A write goes to a
//! temporary file in the destination directory and is renamed into place,
//! so concurrent readers see either the previous artifact or the complete
//! new one. Writers of the same artifact are serialized by a per-path lock.

use std::fs::{self, File, Permissions};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::Mutex;
use tempfile::NamedTempFile;
use tplus_diagnostic::{CompileError, ErrorCode};
use tracing::{debug, trace};

use crate::header::Header;

const ARTIFACT_EXTENSION: &str = "php";

/// Compiled artifacts under one root directory.
#[derive(Debug)]
pub struct ArtifactCache {
    root: PathBuf,
    locks: DashMap<PathBuf, Arc<Mutex<()>>>,
}

impl ArtifactCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        ArtifactCache {
            root: root.into(),
            locks: DashMap::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Artifact path for a template path relative to the template root.
    pub fn artifact_path(&self, relative: &Path) -> PathBuf {
        let mut name = relative.as_os_str().to_owned();
        name.push(".");
        name.push(ARTIFACT_EXTENSION);
        self.root.join(name)
    }

    /// Whether `artifact` exists and its header matches `source` as it is
    /// on disk now.
    pub fn is_fresh(&self, source: &Path, artifact: &Path) -> Result<bool, CompileError> {
        let header = Header::for_source(source)?;
        let fresh = read_head(artifact, header.check_len())
            .map_err(|e| io_error("read", artifact, &e))?
            .is_some_and(|(head, size)| header.matches(&head, size));
        trace!(artifact = %artifact.display(), fresh, "checked artifact");
        Ok(fresh)
    }

    /// Stamp `body` with `header` and store it at `artifact`.
    pub fn write(&self, artifact: &Path, header: &Header, body: &str) -> Result<(), CompileError> {
        let lock = self.lock_for(artifact);
        let _guard = lock.lock();
        self.write_locked(artifact, header, body)
    }

    /// Recompile `source` into `artifact` unless the artifact is fresh.
    ///
    /// Holds the artifact's lock across the check and the write, so of
    /// several callers racing on one stale artifact only the first
    /// compiles. Returns whether a compile happened.
    pub fn refresh<F>(&self, source: &Path, artifact: &Path, compile: F) -> Result<bool, CompileError>
    where
        F: FnOnce(&str) -> Result<String, CompileError>,
    {
        let lock = self.lock_for(artifact);
        let _guard = lock.lock();
        if self.is_fresh(source, artifact)? {
            return Ok(false);
        }
        // Taken before reading so an edit during the compile leaves the
        // artifact stale rather than falsely fresh.
        let header = Header::for_source(source)?;
        let text = fs::read_to_string(source).map_err(|e| io_error("read", source, &e))?;
        let body = compile(&text)?;
        self.write_locked(artifact, &header, &body)?;
        Ok(true)
    }

    fn lock_for(&self, artifact: &Path) -> Arc<Mutex<()>> {
        Arc::clone(&self.locks.entry(artifact.to_path_buf()).or_default())
    }

    fn write_locked(&self, artifact: &Path, header: &Header, body: &str) -> Result<(), CompileError> {
        let permissions = self.check_root()?;
        let dir = self.create_parent_dirs(artifact, &permissions)?;
        let text = header.stamp(body)?;

        let mut file = NamedTempFile::new_in(&dir).map_err(|e| io_error("create", &dir, &e))?;
        file.write_all(text.as_bytes())
            .and_then(|()| file.as_file().sync_all())
            .map_err(|e| io_error("write", file.path(), &e))?;
        fs::set_permissions(file.path(), permissions)
            .map_err(|e| io_error("set permissions of", file.path(), &e))?;
        file.persist(artifact)
            .map_err(|e| io_error("write", artifact, &e.error))?;

        debug!(artifact = %artifact.display(), bytes = text.len(), "wrote artifact");
        Ok(())
    }

    /// The root must be an existing, readable and (on unix) writable
    /// directory. Returns its permissions, which new directories and
    /// artifacts inherit.
    fn check_root(&self) -> Result<Permissions, CompileError> {
        let root = &self.root;
        let metadata = fs::metadata(root)
            .map_err(|_| root_error(root, "does not exist"))?;
        if !metadata.is_dir() {
            return Err(root_error(root, "is not a directory"));
        }
        if fs::read_dir(root).is_err() {
            return Err(root_error(
                root,
                "is not readable; check the read permission of the server",
            ));
        }
        #[cfg(unix)]
        if metadata.permissions().readonly() {
            return Err(root_error(
                root,
                "is not writable; check the write permission of the server",
            ));
        }
        Ok(metadata.permissions())
    }

    /// Create the directories between the root and `artifact` one level at
    /// a time, each with the root's permissions.
    fn create_parent_dirs(
        &self,
        artifact: &Path,
        permissions: &Permissions,
    ) -> Result<PathBuf, CompileError> {
        let relative = artifact.strip_prefix(&self.root).map_err(|_| {
            root_error(
                &self.root,
                &format!("does not contain artifact `{}`", artifact.display()),
            )
        })?;
        let mut dir = self.root.clone();
        if let Some(parent) = relative.parent() {
            for component in parent.components() {
                dir.push(component);
                if dir.is_dir() {
                    continue;
                }
                match fs::create_dir(&dir) {
                    Ok(()) => fs::set_permissions(&dir, permissions.clone())
                        .map_err(|e| io_error("set permissions of", &dir, &e))?,
                    Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {}
                    Err(e) => return Err(io_error("create directory", &dir, &e)),
                }
            }
        }
        Ok(dir)
    }
}

/// First `len` bytes of a file and its size, or `None` if it does not exist.
fn read_head(path: &Path, len: usize) -> io::Result<Option<(Vec<u8>, u64)>> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e),
    };
    let size = file.metadata()?.len();
    let mut head = Vec::with_capacity(len);
    file.take(u64::try_from(len).unwrap_or(u64::MAX))
        .read_to_end(&mut head)?;
    Ok(Some((head, size)))
}

fn root_error(root: &Path, problem: &str) -> CompileError {
    CompileError::new(
        ErrorCode::E5007,
        format!("artifact root `{}` {problem}", root.display()),
    )
}

fn io_error(action: &str, path: &Path, error: &io::Error) -> CompileError {
    CompileError::new(
        ErrorCode::E5008,
        format!("failed to {action} `{}`: {error}", path.display()),
    )
}
