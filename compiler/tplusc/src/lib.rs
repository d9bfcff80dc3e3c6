//! The Tplus template compiler driver.
//!
//! [`Engine`] ties a [`Config`] to the compiler and the artifact cache; the
//! `commands` module implements the `tplus` command line on top of it.

pub mod commands;
mod config;
mod discovery;
mod engine;

use std::sync::Once;

pub use config::{ClassConfig, Config, ConfigError};
pub use discovery::discover_templates;
pub use engine::{Engine, Outcome};

static TRACING_INIT: Once = Once::new();

/// Install a `tracing` subscriber filtered by `RUST_LOG`.
///
/// Does nothing unless `RUST_LOG` is set, and only the first call counts.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
