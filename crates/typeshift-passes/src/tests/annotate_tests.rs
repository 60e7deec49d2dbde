use typeshift_emitter::print;
use typeshift_parser::node::{DocInfo, NodeArena};
use typeshift_parser::parser::ParserState;
use typeshift_parser::token::Token;

use crate::annotate::{AnnotationPass, inject_imports};
use crate::externs::ExternsMap;
use crate::modules::{ModuleKind, ModuleRecord, SymbolIndex};
use crate::rewrite::TypeRewriteTable;

/// Run the annotation pass (and import injection) over one file.
fn annotate(file: &str, src: &str, index: &SymbolIndex, externs: &ExternsMap) -> String {
    let mut parser = ParserState::new(file, src);
    let root = parser.parse_script().expect("source should parse");
    let mut rewrite = TypeRewriteTable::new();
    let mut pending = Vec::new();
    AnnotationPass::run(
        file,
        &mut parser.arena,
        &mut parser.comments,
        root,
        index,
        externs,
        &mut rewrite,
        &mut pending,
    )
    .expect("annotation should succeed");
    inject_imports(&mut parser.arena, root, pending);
    print(&parser.arena, &parser.comments, root)
}

fn annotate_simple(src: &str) -> String {
    annotate("test.js", src, &SymbolIndex::new(), &ExternsMap::new())
}

fn goog_index(namespace: &str, symbol: &str) -> SymbolIndex {
    let mut index = SymbolIndex::new();
    let mut provides = indexmap::IndexMap::new();
    provides.insert(namespace.to_string(), symbol.to_string());
    index.add(ModuleRecord {
        file: "lib.js".to_string(),
        kind: ModuleKind::GoogModule,
        provides,
    });
    index
}

#[test]
fn attaches_doc_type_to_var() {
    assert_eq!(
        annotate_simple("/** @type {number} */ var x = 4;"),
        "var x: number = 4;\n"
    );
}

#[test]
fn typed_const_keeps_binding_kind() {
    assert_eq!(
        annotate_simple("/** @const {string} */ var y = \"hello\";"),
        "var y: string = \"hello\";\n"
    );
}

#[test]
fn bare_const_promotes_binding() {
    assert_eq!(annotate_simple("/** @const */ var z = 4;"), "const z = 4;\n");
    assert_eq!(annotate_simple("/** @const */ let w = 4;"), "const w = 4;\n");
}

#[test]
fn nullable_lowers_to_null_union() {
    assert_eq!(
        annotate_simple("/** @type {?string} */ var a;"),
        "var a: null | string;\n"
    );
}

#[test]
fn nested_nullable_keeps_single_null() {
    assert_eq!(
        annotate_simple("/** @type {(?string|?number)} */ var a;"),
        "var a: null | string | number;\n"
    );
}

#[test]
fn union_flattening_dedupes_by_first_occurrence() {
    assert_eq!(
        annotate_simple("/** @type {(number|(string|number))} */ var a;"),
        "var a: number | string;\n"
    );
}

#[test]
fn non_null_marker_is_stripped() {
    assert_eq!(
        annotate_simple("/** @type {!Object} */ var o;"),
        "var o: Object;\n"
    );
}

#[test]
fn star_is_any() {
    assert_eq!(annotate_simple("/** @type {*} */ var a;"), "var a: any;\n");
}

#[test]
fn void_in_return_position() {
    assert_eq!(
        annotate_simple("/** @return {void} */ function f() {}"),
        "function f(): void {}\n"
    );
    assert_eq!(
        annotate_simple("/** @return {undefined} */ function f() {}"),
        "function f(): void {}\n"
    );
}

#[test]
fn undefined_outside_return_position() {
    assert_eq!(
        annotate_simple("/** @param {undefined} x */ function f(x) {}"),
        "function f(x: undefined) {}\n"
    );
    assert_eq!(
        annotate_simple("/** @type {void} */ var u;"),
        "var u: undefined;\n"
    );
}

#[test]
fn member_without_doc_defaults_to_any() {
    assert_eq!(
        annotate_simple("class C {\n  x;\n}"),
        "class C {\n  x: any;\n}\n"
    );
}

#[test]
fn member_doc_type_and_visibility() {
    let src = "class C {\n  /** @private @type {number} */\n  count = 0;\n}";
    assert_eq!(
        annotate_simple(src),
        "class C {\n  private count: number = 0;\n}\n"
    );
}

#[test]
fn method_return_and_params() {
    let src = "class C {\n  /** @param {string} s @return {number} */\n  size(s) { return 0; }\n}";
    assert_eq!(
        annotate_simple(src),
        "class C {\n  size(s: string): number {\n    return 0;\n  }\n}\n"
    );
}

#[test]
fn cast_gets_declared_type() {
    assert_eq!(
        annotate_simple("var z = /** @type {number} */ (v);"),
        "var z = (v as number);\n"
    );
}

#[test]
fn variadic_param_promotes_to_rest() {
    let src = "/** @param {number} x @param {...string} rest @return {number} */\nfunction f(x, rest) { return x; }";
    assert_eq!(
        annotate_simple(src),
        "function f(x: number, ...rest: string[]): number {\n  return x;\n}\n"
    );
}

#[test]
fn variadic_doc_on_source_rest_param() {
    let src = "/** @param {...string} rest */ function f(...rest) {}";
    assert_eq!(annotate_simple(src), "function f(...rest: string[]) {}\n");
}

#[test]
fn optional_param_gets_marker() {
    assert_eq!(
        annotate_simple("/** @param {number=} x */ function f(x) {}"),
        "function f(x?: number) {}\n"
    );
}

#[test]
fn record_type_with_untyped_field() {
    assert_eq!(
        annotate_simple("/** @type {{a: number, b}} */ var r;"),
        "var r: {a: number, b};\n"
    );
}

#[test]
fn array_generic_becomes_array_suffix() {
    assert_eq!(
        annotate_simple("/** @type {Array<string>} */ var a;"),
        "var a: string[];\n"
    );
    assert_eq!(
        annotate_simple("/** @type {Array.<string>} */ var a;"),
        "var a: string[];\n"
    );
}

#[test]
fn generic_type_keeps_arguments() {
    assert_eq!(
        annotate_simple("/** @type {Map<string, number>} */ var m;"),
        "var m: Map<string, number>;\n"
    );
}

#[test]
fn function_type_numbers_params() {
    assert_eq!(
        annotate_simple("/** @type {function(number, string=): string} */ var f;"),
        "var f: (p1: number, p2?: string) => string;\n"
    );
}

#[test]
fn function_type_defaults_return_to_any() {
    assert_eq!(
        annotate_simple("/** @type {function(number)} */ var f;"),
        "var f: (p1: number) => any;\n"
    );
}

#[test]
fn function_type_discards_context_markers() {
    assert_eq!(
        annotate_simple("/** @type {function(new:C, number)} */ var f;"),
        "var f: (p1: number) => any;\n"
    );
}

// ==================== Cross-file rewriting ====================

#[test]
fn goog_namespace_reference_imports_symbol() {
    let index = goog_index("ns.T", "T");
    assert_eq!(
        annotate("a.js", "/** @type {ns.T} */ var a;", &index, &ExternsMap::new()),
        "import {T} from 'goog:ns.T';\nvar a: T;\n"
    );
}

#[test]
fn repeated_references_share_one_import() {
    let index = goog_index("ns.T", "T");
    let src = "/** @type {ns.T} */ var a;\n/** @type {ns.T} */ var b;";
    assert_eq!(
        annotate("a.js", src, &index, &ExternsMap::new()),
        "import {T} from 'goog:ns.T';\nvar a: T;\nvar b: T;\n"
    );
}

#[test]
fn es_module_reference_uses_relative_path() {
    let mut index = SymbolIndex::new();
    let mut provides = indexmap::IndexMap::new();
    provides.insert("Widget".to_string(), "Widget".to_string());
    index.add(ModuleRecord {
        file: "ui/widget.js".to_string(),
        kind: ModuleKind::EsModule,
        provides,
    });
    assert_eq!(
        annotate(
            "app/main.js",
            "/** @type {Widget} */ var w;",
            &index,
            &ExternsMap::new()
        ),
        "import {Widget} from '../ui/widget';\nvar w: Widget;\n"
    );
}

#[test]
fn longest_prefix_wins_over_shorter() {
    let mut index = SymbolIndex::new();
    let mut provides = indexmap::IndexMap::new();
    provides.insert("ns".to_string(), "ns".to_string());
    index.add(ModuleRecord {
        file: "ns.js".to_string(),
        kind: ModuleKind::GoogModule,
        provides,
    });
    let mut provides = indexmap::IndexMap::new();
    provides.insert("ns.sub".to_string(), "sub".to_string());
    index.add(ModuleRecord {
        file: "sub.js".to_string(),
        kind: ModuleKind::GoogModule,
        provides,
    });
    assert_eq!(
        annotate(
            "a.js",
            "/** @type {ns.sub.Type} */ var t;",
            &index,
            &ExternsMap::new()
        ),
        "import {sub} from 'goog:ns.sub';\nvar t: sub.Type;\n"
    );
}

#[test]
fn unknown_namespace_is_left_alone() {
    assert_eq!(
        annotate_simple("/** @type {unknown.Thing} */ var t;"),
        "var t: unknown.Thing;\n"
    );
}

#[test]
fn externs_map_substitutes_unprefixed_names() {
    let mut externs = ExternsMap::new();
    externs.insert("MyExternType".to_string(), "MyTsType".to_string());
    assert_eq!(
        annotate("foo.js", "/** @type {MyExternType} */ var z;", &SymbolIndex::new(), &externs),
        "var z: MyTsType;\n"
    );
}

#[test]
fn imports_prepend_before_existing_imports() {
    let index = goog_index("ns.T", "T");
    let src = "import {Other} from './other';\n/** @type {ns.T} */ var a;";
    assert_eq!(
        annotate("a.js", src, &index, &ExternsMap::new()),
        "import {T} from 'goog:ns.T';\nimport {Other} from './other';\nvar a: T;\n"
    );
}

// ==================== Failure paths ====================

#[test]
fn unsupported_doc_token_fails_loudly() {
    let mut arena = NodeArena::new();
    let bogus = arena.alloc(Token::ObjectLit);
    let name = arena.alloc_string(Token::Name, "x");
    let var = arena.alloc_with_children(Token::Var, vec![name]);
    arena.get_mut(var).doc = Some(DocInfo {
        ty: Some(bogus),
        ..Default::default()
    });
    let script = arena.alloc_with_children(Token::Script, vec![var]);

    let mut comments = typeshift_parser::CommentRegistry::new();
    let mut rewrite = TypeRewriteTable::new();
    let mut pending = Vec::new();
    let index = SymbolIndex::new();
    let externs = ExternsMap::new();
    let err = AnnotationPass::run(
        "bad.js",
        &mut arena,
        &mut comments,
        script,
        &index,
        &externs,
        &mut rewrite,
        &mut pending,
    )
    .expect_err("unknown doc token must fail");
    assert!(err.message_text.contains("unsupported type construct"));
    assert_eq!(err.file, "bad.js");
}
