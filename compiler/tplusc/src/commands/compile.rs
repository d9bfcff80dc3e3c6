//! The `compile` command: bring one artifact up to date.

use std::path::Path;

use crate::{Engine, Outcome};

use super::print_error;

pub fn compile_template(engine: &Engine, template: &str, html: bool) {
    let relative = engine.relative(Path::new(template));
    match engine.ensure_compiled(&relative) {
        Ok(outcome) => {
            let state = match outcome {
                Outcome::Compiled => "compiled",
                Outcome::Fresh => "fresh",
            };
            println!("{state} {}", engine.artifact_path(&relative).display());
        }
        Err(e) => {
            print_error(&e, html);
            std::process::exit(1);
        }
    }
}
