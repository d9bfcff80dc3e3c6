#![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use pretty_assertions::assert_eq;

use super::*;

#[test]
fn finds_nested_templates_and_skips_hidden() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    for file in ["index.html", "shop/item.html", "shop/cart/list.tpl", ".hidden.html", ".git/x"] {
        let path = root.join(file);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    assert_eq!(
        discover_templates(root),
        vec![
            PathBuf::from("index.html"),
            PathBuf::from("shop/cart/list.tpl"),
            PathBuf::from("shop/item.html"),
        ]
    );
}

#[test]
fn missing_root_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    assert!(discover_templates(&dir.path().join("nope")).is_empty());
}
