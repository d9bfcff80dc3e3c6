use pretty_assertions::assert_eq;

use super::*;
use crate::ErrorCode;

#[test]
fn log_line_with_full_location() {
    let err = CompileError::new(ErrorCode::E1002, "Unexpected `)`")
        .with_line(3)
        .with_tag("[= a) ]")
        .with_file("/t/a.html");
    assert_eq!(
        Report::new(&err).log_line(),
        "Tplus Syntax Error: [E1002] Unexpected `)` in /t/a.html on line 3 near `[= a) ]`"
    );
}

#[test]
fn log_line_for_fatal_without_location() {
    let err = CompileError::new(ErrorCode::E5007, "artifact root /x does not exist");
    assert_eq!(
        Report::new(&err).log_line(),
        "Tplus Scripter Fatal Error: [E5007] artifact root /x does not exist"
    );
}

#[test]
fn html_escapes_everything() {
    let err = CompileError::new(ErrorCode::E0001, "host tag <?php not allowed")
        .with_line(1)
        .with_tag("<?php ");
    let html = Report::new(&err).html();
    assert!(html.contains("host tag &lt;?php not allowed"));
    assert!(html.contains("<code>&lt;?php</code>"));
    assert!(!html.contains("<?php"));
}

#[test]
fn innermost_location_wins() {
    let err = CompileError::new(ErrorCode::E1003, "missing expression")
        .with_line(7)
        .with_line(9)
        .with_tag("[= f(,) ]")
        .with_tag("ignored");
    assert_eq!(err.line(), Some(7));
    assert_eq!(err.tag(), Some("[= f(,) ]"));
    assert!(err.is_syntax());
}
