//! The `build` command: compile every stale template under the root.

use crate::{Engine, Outcome};

use super::print_error;

pub fn build_templates(engine: &Engine) {
    let results = engine.build_all();
    let mut compiled = 0usize;
    let mut fresh = 0usize;
    let mut failed = 0usize;

    for (relative, result) in &results {
        match result {
            Ok(Outcome::Compiled) => {
                compiled += 1;
                println!("compiled {}", relative.display());
            }
            Ok(Outcome::Fresh) => fresh += 1,
            Err(e) => {
                failed += 1;
                print_error(e, false);
            }
        }
    }

    println!();
    println!("{compiled} compiled, {fresh} fresh, {failed} failed");
    if failed > 0 {
        std::process::exit(1);
    }
}
