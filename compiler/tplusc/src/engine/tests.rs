#![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use pretty_assertions::assert_eq;

use super::*;

fn engine() -> Engine {
    Engine::new(Config {
        template_root: PathBuf::from("/srv/views"),
        artifact_root: PathBuf::from("/srv/compiled"),
        ..Config::default()
    })
}

#[test]
fn template_arguments_are_relative_to_the_root() {
    let engine = engine();
    assert_eq!(
        engine.relative(Path::new("/srv/views/shop/item.html")),
        PathBuf::from("shop/item.html")
    );
    assert_eq!(
        engine.relative(Path::new("shop/item.html")),
        PathBuf::from("shop/item.html")
    );
    assert_eq!(
        engine.template_path(Path::new("shop/item.html")),
        PathBuf::from("/srv/views/shop/item.html")
    );
    assert_eq!(
        engine.artifact_path(Path::new("shop/item.html")),
        PathBuf::from("/srv/compiled/shop/item.html.php")
    );
}

#[test]
fn compile_source_uses_the_configured_registry() {
    let engine = Engine::new(Config {
        wrapper_class: "My\\Wrap".to_owned(),
        wrapper_methods: vec!["money".to_owned()],
        short_open_tag: true,
        ..Config::default()
    });
    let body = engine.compile_source("[= price.money() ]").unwrap();
    assert!(body.starts_with("<?= \\My\\Wrap::o($V[\"price\"])->money() /* "));

    let err = engine.compile_source("<?xml version=\"1.0\"?>").unwrap_err();
    assert_eq!(err.code(), ErrorCode::E0001);
}
