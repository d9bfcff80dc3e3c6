//! Tplus template compiler CLI.

use std::path::Path;

use tplusc::commands::{
    build_templates, check_template, compile_template, explain_error, locate_line,
};
use tplusc::{init_tracing, Config, Engine};

fn main() {
    init_tracing();

    let mut args: Vec<String> = std::env::args().collect();
    let config_path = take_option(&mut args, "--config");
    let html = take_flag(&mut args, "--html");

    if args.len() < 2 {
        print_usage();
        return;
    }

    let command = args[1].clone();
    match command.as_str() {
        "compile" => {
            if args.len() < 3 {
                eprintln!("Usage: tplus compile <template> [--config <file>] [--html]");
                std::process::exit(1);
            }
            compile_template(&engine(config_path.as_deref()), &args[2], html);
        }
        "check" => {
            if args.len() < 3 {
                eprintln!("Usage: tplus check <template> [--config <file>] [--html]");
                std::process::exit(1);
            }
            check_template(&engine(config_path.as_deref()), &args[2], html);
        }
        "build" => {
            build_templates(&engine(config_path.as_deref()));
        }
        "locate" => {
            if args.len() < 4 {
                eprintln!("Usage: tplus locate <artifact> <line>");
                eprintln!("Example: tplus locate artifacts/index.html.php 12");
                std::process::exit(1);
            }
            locate_line(&args[2], &args[3]);
        }
        "explain" | "--explain" => {
            if args.len() < 3 {
                eprintln!("Usage: tplus explain <ERROR_CODE>");
                eprintln!("Example: tplus explain E1002");
                std::process::exit(1);
            }
            explain_error(&args[2]);
        }
        "help" | "--help" | "-h" => {
            print_usage();
        }
        "version" | "--version" | "-v" => {
            println!("Tplus {}", env!("CARGO_PKG_VERSION"));
        }
        _ => {
            eprintln!("Unknown command: {command}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    }
}

/// Load the configuration (or the defaults) and check its roots.
fn engine(config_path: Option<&str>) -> Engine {
    let config = match config_path {
        Some(path) => Config::load(Path::new(path)).unwrap_or_else(|e| {
            eprintln!("error: {e}");
            std::process::exit(1);
        }),
        None => Config::default(),
    };
    if let Err(e) = config.validate() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
    Engine::new(config)
}

/// Remove `name <value>` from `args`, returning the value.
fn take_option(args: &mut Vec<String>, name: &str) -> Option<String> {
    let i = args.iter().position(|a| a == name)?;
    if i + 1 >= args.len() {
        eprintln!("error: {name} needs a value");
        std::process::exit(1);
    }
    let value = args.remove(i + 1);
    args.remove(i);
    Some(value)
}

fn take_flag(args: &mut Vec<String>, name: &str) -> bool {
    match args.iter().position(|a| a == name) {
        Some(i) => {
            args.remove(i);
            true
        }
        None => false,
    }
}

fn print_usage() {
    println!("Tplus template compiler");
    println!();
    println!("Usage: tplus <command> [options]");
    println!();
    println!("Commands:");
    println!("  compile <template>       Compile a template if its artifact is stale");
    println!("  check <template>         Compile a template without writing the artifact");
    println!("  build                    Compile every stale template (in parallel)");
    println!("  locate <artifact> <n>    Map an artifact line back to its template tag");
    println!("  explain <code>           Explain an error code (e.g., E1002)");
    println!("  help                     Show this help message");
    println!("  version                  Show version information");
    println!();
    println!("Options:");
    println!("  --config <file.json>     Configuration file (default: built-in defaults)");
    println!("  --html                   Print errors as an inline HTML report");
    println!();
    println!("Template paths are relative to the template root.");
    println!("Set RUST_LOG (e.g. RUST_LOG=tplus_cache=debug) for tracing output.");
    println!();
    println!("Examples:");
    println!("  tplus compile index.html --config tplus.json");
    println!("  tplus build --config tplus.json");
    println!("  tplus locate artifacts/index.html.php 12");
    println!("  tplus explain E5005");
}
