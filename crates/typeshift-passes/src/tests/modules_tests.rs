use typeshift_parser::parser::ParserState;

use crate::modules::{ModuleKind, SymbolIndex, collect_module};

fn collect(file: &str, src: &str) -> Option<crate::modules::ModuleRecord> {
    let mut parser = ParserState::new(file, src);
    let root = parser.parse_script().expect("source should parse");
    collect_module(file, &parser.arena, root)
}

#[test]
fn goog_module_provides_its_namespace() {
    let record = collect("t.js", "goog.module('ns.T');").expect("module record");
    assert_eq!(record.kind, ModuleKind::GoogModule);
    assert_eq!(record.provides.get("ns.T").map(String::as_str), Some("T"));
}

#[test]
fn goog_provide_is_legacy_module() {
    let record = collect("t.js", "goog.provide('ns.util');").expect("module record");
    assert_eq!(record.kind, ModuleKind::GoogModule);
    assert_eq!(
        record.provides.get("ns.util").map(String::as_str),
        Some("util")
    );
}

#[test]
fn goog_module_exports_register_nested_namespaces() {
    let src = "goog.module('ns');\nclass Widget {}\nexports.Widget = Widget;";
    let record = collect("w.js", src).expect("module record");
    assert_eq!(
        record.provides.get("ns.Widget").map(String::as_str),
        Some("Widget")
    );
}

#[test]
fn es_module_exports_register_bare_names() {
    let src = "export class Widget {}\nexport const SIZE = 4;";
    let record = collect("w.js", src).expect("module record");
    assert_eq!(record.kind, ModuleKind::EsModule);
    assert_eq!(
        record.provides.get("Widget").map(String::as_str),
        Some("Widget")
    );
    assert_eq!(record.provides.get("SIZE").map(String::as_str), Some("SIZE"));
}

#[test]
fn plain_script_provides_nothing() {
    assert!(collect("s.js", "var x = 1;").is_none());
}

#[test]
fn index_resolves_namespaces_in_insertion_order() {
    let mut index = SymbolIndex::new();
    let record = collect("t.js", "goog.module('ns.T');").expect("module record");
    index.add(record);
    assert!(index.lookup("ns.T").is_some());
    assert!(index.lookup("ns.Other").is_none());
    let namespaces: Vec<&str> = index.namespaces().collect();
    assert_eq!(namespaces, vec!["ns.T"]);
}
