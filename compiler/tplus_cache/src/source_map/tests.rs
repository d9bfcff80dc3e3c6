#![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use std::path::Path;
use std::time::SystemTime;

use pretty_assertions::assert_eq;
use tplus_parse::{Compiler, Registry};

use super::*;
use crate::Header;

fn artifact(template: &str) -> String {
    let registry = Registry::default();
    let body = Compiler::new(&registry).compile(template).unwrap();
    Header::new("1.1.2", SystemTime::now(), Path::new("/srv/my views/page.html"))
        .stamp(&body)
        .unwrap()
}

#[test]
fn statements_map_back_to_their_tags() {
    let text = artifact("<h1>\n[= title.esc() ]\n</h1>\n[? user ]hi[/]");

    assert_eq!(
        locate(&text, 3),
        Some(SourceLocation {
            template: PathBuf::from("/srv/my views/page.html"),
            line: 2,
            code: "[= title.esc() ]".to_owned(),
        })
    );
    // Several statements on one line: the first one wins.
    assert_eq!(locate(&text, 5).unwrap().code, "[? user ]");
}

#[test]
fn literal_lines_and_header_have_no_location() {
    let text = artifact("<h1>\n[= title ]\n</h1>");
    assert_eq!(locate(&text, 0), None);
    assert_eq!(locate(&text, 1), None);
    assert_eq!(locate(&text, 2), None);
    assert_eq!(locate(&text, 40), None);
}

#[test]
fn foreign_files_have_no_location() {
    assert_eq!(locate("<?php echo 1; /* {\"line\":1,\"code\":\"x\"} */ ?>", 1), None);
    assert_eq!(locate("", 1), None);
}
