//! The `check` command: compile a template without writing its artifact.

use std::path::Path;

use crate::Engine;

use super::print_error;

pub fn check_template(engine: &Engine, template: &str, html: bool) {
    let relative = engine.relative(Path::new(template));
    if let Err(e) = engine.check(&relative) {
        print_error(&e, html);
        std::process::exit(1);
    }
    println!("ok {}", relative.display());
}
