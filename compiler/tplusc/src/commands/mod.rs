//! Command handlers for the `tplus` CLI.
//!
//! Each handler prints its result and exits with status 1 on failure.

mod build;
mod check;
mod compile;
mod explain;
mod locate;

pub use build::build_templates;
pub use check::check_template;
pub use compile::compile_template;
pub use explain::explain_error;
pub use locate::locate_line;

use tplus_diagnostic::{CompileError, Report};

/// Print a compile error to stderr, or as an inline HTML report to stdout.
fn print_error(error: &CompileError, html: bool) {
    let report = Report::new(error);
    if html {
        println!("{}", report.html());
    } else {
        eprintln!("{}", report.log_line());
    }
}
