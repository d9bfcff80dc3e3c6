//! Engine configuration, read from a JSON file.
//!
//! Every field is optional:
//!
//! ```json
//! {
//!     "template_root": "views",
//!     "artifact_root": "views_compiled",
//!     "wrapper_class": "App\\TplValWrapper",
//!     "wrapper_methods": ["esc", "money"],
//!     "functions": ["App\\url"],
//!     "classes": { "App\\Money": { "methods": ["of"], "constants": ["ZERO"] } }
//! }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tplus_parse::{
    ClassInfo, MethodRegistry, Registry, SymbolTable, DEFAULT_LOOP_HELPER_CLASS,
    DEFAULT_LOOP_HELPER_METHODS, DEFAULT_WRAPPER_CLASS, DEFAULT_WRAPPER_METHODS,
};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config `{path}`: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config `{path}`: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("{name} `{path}` is not a directory")]
    NotADirectory { name: &'static str, path: PathBuf },
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Directory holding the templates.
    pub template_root: PathBuf,
    /// Directory compiled artifacts are written under. Must exist.
    pub artifact_root: PathBuf,
    pub wrapper_class: String,
    pub wrapper_methods: Vec<String>,
    pub loop_helper_class: String,
    pub loop_helper_methods: Vec<String>,
    /// Compare artifact headers with the templates before rendering. When
    /// off, artifacts are used as they are and templates are never read.
    pub script_check: bool,
    /// Reject every `<?` in templates, not only `<?php` and `<?=`.
    pub short_open_tag: bool,
    /// Host functions beyond the builtins, e.g. `App\\url`.
    pub functions: Vec<String>,
    pub constants: Vec<String>,
    pub classes: BTreeMap<String, ClassConfig>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClassConfig {
    pub methods: Vec<String>,
    pub constants: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            template_root: PathBuf::from("templates"),
            artifact_root: PathBuf::from("artifacts"),
            wrapper_class: DEFAULT_WRAPPER_CLASS.to_owned(),
            wrapper_methods: owned(DEFAULT_WRAPPER_METHODS),
            loop_helper_class: DEFAULT_LOOP_HELPER_CLASS.to_owned(),
            loop_helper_methods: owned(DEFAULT_LOOP_HELPER_METHODS),
            script_check: true,
            short_open_tag: false,
            functions: Vec::new(),
            constants: Vec::new(),
            classes: BTreeMap::new(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Both roots must be existing directories.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, path) in [
            ("template_root", &self.template_root),
            ("artifact_root", &self.artifact_root),
        ] {
            if !path.is_dir() {
                return Err(ConfigError::NotADirectory {
                    name,
                    path: path.clone(),
                });
            }
        }
        Ok(())
    }

    /// Adapter and symbol registry for the compiler.
    pub fn registry(&self) -> Registry {
        let mut symbols = SymbolTable::with_builtins();
        for function in &self.functions {
            symbols.define_function(function);
        }
        for constant in &self.constants {
            symbols.define_constant(constant);
        }
        for (name, class) in &self.classes {
            symbols.define_class(name, ClassInfo::new(&class.methods, &class.constants));
        }
        Registry {
            wrapper: MethodRegistry::new(&self.wrapper_class, &self.wrapper_methods),
            loop_helper: MethodRegistry::new(&self.loop_helper_class, &self.loop_helper_methods),
            symbols,
        }
    }
}

fn owned(names: &[&str]) -> Vec<String> {
    names.iter().map(|&n| n.to_owned()).collect()
}
