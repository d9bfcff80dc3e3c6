//! The `locate` command: map an artifact line back to its template.

use std::fs;

pub fn locate_line(artifact: &str, line: &str) {
    let Ok(line) = line.parse::<usize>() else {
        eprintln!("error: `{line}` is not a line number");
        std::process::exit(1);
    };
    let text = match fs::read_to_string(artifact) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("error: cannot read `{artifact}`: {e}");
            std::process::exit(1);
        }
    };
    match tplus_cache::locate(&text, line) {
        Some(location) => println!(
            "{}:{} {}",
            location.template.display(),
            location.line,
            location.code
        ),
        None => {
            eprintln!("{artifact}:{line} has no template location");
            std::process::exit(1);
        }
    }
}
