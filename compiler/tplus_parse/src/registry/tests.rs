use super::*;

#[test]
fn method_lookup_ignores_case() {
    let wrapper = MethodRegistry::value_wrapper();
    assert!(wrapper.contains("esc"));
    assert!(wrapper.contains("TOUPPER"));
    assert!(wrapper.contains("toupper"));
    assert!(!wrapper.contains("bogus"));
    assert_eq!(wrapper.opener(), "\\TplValWrapper::o(");
}

#[test]
fn class_name_loses_leading_separator() {
    let helper = MethodRegistry::new("\\App\\Loop", ["isOdd"]);
    assert_eq!(helper.class(), "App\\Loop");
    assert_eq!(helper.opener(), "\\App\\Loop::o(");
    assert!(helper.contains("ISODD"));
}

#[test]
fn symbols_resolve_with_or_without_leading_separator() {
    let mut table = SymbolTable::empty();
    table.define_function("\\App\\format");
    table.define_constant("App\\LIMIT");
    table.define_class("App\\Money", ClassInfo::new(["of"], ["ZERO"]));

    assert!(table.has_function("App\\Format"));
    assert!(table.has_function("\\app\\format"));
    assert!(table.has_constant("\\App\\LIMIT"));
    assert!(!table.has_constant("App\\limit"));

    let money = table.class("\\app\\money");
    assert!(money.is_some_and(|c| c.has_method("OF") && c.has_constant("ZERO")));
    assert!(table.class("App\\Missing").is_none());
}

#[test]
fn builtins_are_seeded() {
    let table = SymbolTable::with_builtins();
    assert!(table.has_function("count"));
    assert!(table.has_constant("PHP_EOL"));
    assert!(table.class("DateTime").is_some());
    assert!(SymbolTable::is_construct("isset"));
    assert!(SymbolTable::is_construct("EMPTY"));
    assert!(!SymbolTable::is_construct("count"));
}
