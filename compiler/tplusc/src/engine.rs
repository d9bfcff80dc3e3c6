//! The engine: configuration, registry and artifact cache behind one call.
//!
//! [`Engine::ensure_compiled`] is what a renderer calls before executing an
//! artifact. It recompiles the template only when the artifact header no
//! longer matches it, and reports failures to the operator log.

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tplus_cache::ArtifactCache;
use tplus_diagnostic::{CompileError, ErrorCode, Report};
use tplus_parse::{Compiler, Registry};
use tracing::{error, info};

use crate::config::Config;
use crate::discovery::discover_templates;

/// What [`Engine::ensure_compiled`] did.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The artifact was up to date (or checks are disabled).
    Fresh,
    Compiled,
}

pub struct Engine {
    config: Config,
    registry: Registry,
    cache: ArtifactCache,
}

impl Engine {
    pub fn new(config: Config) -> Self {
        let registry = config.registry();
        let cache = ArtifactCache::new(config.artifact_root.clone());
        Engine {
            config,
            registry,
            cache,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn compiler(&self) -> Compiler<'_> {
        Compiler::new(&self.registry).short_open_tag(self.config.short_open_tag)
    }

    /// A template argument relative to the template root. Paths that already
    /// start with the root are accepted too.
    pub fn relative(&self, template: &Path) -> PathBuf {
        template
            .strip_prefix(&self.config.template_root)
            .unwrap_or(template)
            .to_path_buf()
    }

    pub fn template_path(&self, relative: &Path) -> PathBuf {
        self.config.template_root.join(relative)
    }

    pub fn artifact_path(&self, relative: &Path) -> PathBuf {
        self.cache.artifact_path(relative)
    }

    /// Compile template text into an artifact body without touching disk.
    pub fn compile_source(&self, text: &str) -> Result<String, CompileError> {
        self.compiler().compile(text)
    }

    /// Compile the template at `relative` without writing an artifact.
    pub fn check(&self, relative: &Path) -> Result<(), CompileError> {
        let source = self.template_path(relative);
        let result = fs::read_to_string(&source)
            .map_err(|e| {
                CompileError::new(
                    ErrorCode::E5009,
                    format!("cannot read template `{}`: {e}", source.display()),
                )
            })
            .and_then(|text| self.compile_source(&text))
            .map(|_| ());
        result.map_err(|e| report(e, &source))
    }

    /// Make sure the artifact of `relative` exists and is current.
    pub fn ensure_compiled(&self, relative: &Path) -> Result<Outcome, CompileError> {
        let source = self.template_path(relative);
        let artifact = self.artifact_path(relative);

        if !self.config.script_check {
            if artifact.is_file() {
                return Ok(Outcome::Fresh);
            }
            let e = CompileError::new(
                ErrorCode::E5009,
                format!(
                    "script checks are off but artifact `{}` does not exist",
                    artifact.display()
                ),
            );
            return Err(report(e, &source));
        }

        match self
            .cache
            .refresh(&source, &artifact, |text| self.compile_source(text))
        {
            Ok(true) => {
                info!(template = %relative.display(), "recompiled template");
                Ok(Outcome::Compiled)
            }
            Ok(false) => Ok(Outcome::Fresh),
            Err(e) => Err(report(e, &source)),
        }
    }

    /// Bring every template under the template root up to date, in parallel.
    pub fn build_all(&self) -> Vec<(PathBuf, Result<Outcome, CompileError>)> {
        discover_templates(&self.config.template_root)
            .into_par_iter()
            .map(|relative| {
                let outcome = self.ensure_compiled(&relative);
                (relative, outcome)
            })
            .collect()
    }
}

/// Attach the template path and log the error for the operator.
fn report(error: CompileError, source: &Path) -> CompileError {
    let file = fs::canonicalize(source).unwrap_or_else(|_| source.to_path_buf());
    let error = error.with_file(file);
    error!("{}", Report::new(&error).log_line());
    error
}

#[cfg(test)]
mod tests;
