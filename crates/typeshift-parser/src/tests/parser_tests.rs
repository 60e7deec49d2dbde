use crate::node::NodeProps;
use crate::parser::ParserState;
use crate::token::Token;

fn parse(src: &str) -> (ParserState<'_>, crate::node::NodeIndex) {
    let mut parser = ParserState::new("test.js", src);
    let root = parser.parse_script().expect("script should parse");
    (parser, root)
}

#[test]
fn parses_var_with_initializer() {
    let (parser, root) = parse("var x = 4;");
    let arena = &parser.arena;
    let stmts = arena.children(root);
    assert_eq!(stmts.len(), 1);
    let var = stmts[0];
    assert_eq!(arena.token(var), Token::Var);
    let name = arena.children(var)[0];
    assert_eq!(arena.string(name), "x");
    let init = arena.children(name)[0];
    assert_eq!(arena.token(init), Token::Number);
    assert_eq!(arena.string(init), "4");
}

#[test]
fn parses_multiple_declarators() {
    let (parser, root) = parse("let a = 1, b;");
    let arena = &parser.arena;
    let decl = arena.children(root)[0];
    assert_eq!(arena.token(decl), Token::Let);
    assert_eq!(arena.children(decl).len(), 2);
}

#[test]
fn doc_block_attaches_to_statement() {
    let (parser, root) = parse("/** @type {number} */ var x = 4;");
    let arena = &parser.arena;
    let var = arena.children(root)[0];
    let doc = arena.get(var).doc.as_ref().expect("doc should attach");
    assert!(doc.ty.is_some());
}

#[test]
fn line_comment_goes_to_registry() {
    let (parser, root) = parse("// hello\nvar x;");
    let var = parser.arena.children(root)[0];
    assert_eq!(parser.comments.get(var), Some("// hello"));
}

#[test]
fn parses_function_declaration() {
    let (parser, root) = parse("function add(a, b) { return a + b; }");
    let arena = &parser.arena;
    let func = arena.children(root)[0];
    assert_eq!(arena.token(func), Token::Function);
    let children = arena.children(func);
    assert_eq!(arena.string(children[0]), "add");
    assert_eq!(arena.token(children[1]), Token::ParamList);
    assert_eq!(arena.children(children[1]).len(), 2);
    assert_eq!(arena.token(children[2]), Token::Block);
}

#[test]
fn parses_rest_parameter() {
    let (parser, root) = parse("function f(x, ...rest) {}");
    let arena = &parser.arena;
    let func = arena.children(root)[0];
    let params = arena.children(func)[1];
    let rest = arena.children(params)[1];
    assert_eq!(arena.token(rest), Token::Rest);
    assert_eq!(arena.string(rest), "rest");
}

#[test]
fn parses_class_with_members() {
    let src = "class Point extends Base {\n  x;\n  y = 0;\n  static origin() { return null; }\n}";
    let (parser, root) = parse(src);
    let arena = &parser.arena;
    let class = arena.children(root)[0];
    assert_eq!(arena.token(class), Token::Class);
    let children = arena.children(class);
    assert_eq!(arena.string(children[0]), "Point");
    assert_eq!(arena.token(children[1]), Token::Name);
    assert_eq!(arena.string(children[1]), "Base");
    let members = arena.children(children[2]);
    assert_eq!(members.len(), 3);
    assert_eq!(arena.token(members[0]), Token::MemberVariableDef);
    assert!(arena.children(members[0]).is_empty());
    assert_eq!(arena.children(members[1]).len(), 1);
    assert_eq!(arena.token(members[2]), Token::MemberFunctionDef);
    assert!(arena.get(members[2]).props.contains(NodeProps::STATIC));
}

#[test]
fn member_doc_attaches_to_member() {
    let src = "class C {\n  /** @type {number} */\n  count;\n}";
    let (parser, root) = parse(src);
    let arena = &parser.arena;
    let class = arena.children(root)[0];
    let member = arena.children(arena.children(class)[2])[0];
    assert!(arena.get(member).doc.as_ref().is_some_and(|d| d.ty.is_some()));
}

#[test]
fn parses_import_statement() {
    let (parser, root) = parse("import {A, B as C} from './mod';");
    let arena = &parser.arena;
    // Import syntax promotes the script to a module body.
    let body = arena.children(root)[0];
    assert_eq!(arena.token(body), Token::ModuleBody);
    let import = arena.children(body)[0];
    assert_eq!(arena.token(import), Token::Import);
    let children = arena.children(import);
    assert_eq!(arena.token(children[0]), Token::Empty);
    let specs = arena.children(children[1]);
    assert_eq!(specs.len(), 2);
    assert_eq!(arena.children(specs[1]).len(), 2);
    assert_eq!(arena.string(children[2]), "./mod");
}

#[test]
fn export_marks_declaration() {
    let (parser, root) = parse("export class A {}");
    let arena = &parser.arena;
    let body = arena.children(root)[0];
    assert_eq!(arena.token(body), Token::ModuleBody);
    let class = arena.children(body)[0];
    assert!(arena.get(class).props.contains(NodeProps::EXPORT));
}

#[test]
fn plain_script_has_no_module_body() {
    let (parser, root) = parse("var x;");
    assert_eq!(parser.arena.token(parser.arena.children(root)[0]), Token::Var);
}

#[test]
fn parses_cast_in_initializer() {
    let (parser, root) = parse("var z = /** @type {number} */ (value);");
    let arena = &parser.arena;
    let name = arena.children(arena.children(root)[0])[0];
    let cast = arena.children(name)[0];
    assert_eq!(arena.token(cast), Token::Cast);
    assert!(arena.get(cast).doc.as_ref().is_some_and(|d| d.ty.is_some()));
    let inner = arena.children(cast)[0];
    assert_eq!(arena.string(inner), "value");
}

#[test]
fn parses_new_with_and_without_parens() {
    let (parser, root) = parse("var a = new Foo(); var b = new Bar;");
    let arena = &parser.arena;
    let stmts = arena.children(root);
    let a_init = arena.children(arena.children(stmts[0])[0])[0];
    assert_eq!(arena.token(a_init), Token::New);
    assert_eq!(arena.children(a_init).len(), 1);
    let b_init = arena.children(arena.children(stmts[1])[0])[0];
    assert_eq!(arena.token(b_init), Token::New);
    assert_eq!(arena.children(b_init).len(), 1);
}

#[test]
fn parses_goog_module_call() {
    let (parser, root) = parse("goog.module('ns.T');");
    let arena = &parser.arena;
    let stmt = arena.children(root)[0];
    assert_eq!(arena.token(stmt), Token::ExprResult);
    let call = arena.children(stmt)[0];
    assert_eq!(arena.token(call), Token::Call);
    let callee = arena.children(call)[0];
    assert_eq!(arena.token(callee), Token::GetProp);
    assert_eq!(arena.string(callee), "module");
    assert_eq!(arena.string(arena.children(call)[1]), "ns.T");
}

#[test]
fn externs_doc_marks_file() {
    let (parser, _) = parse("/** @externs */\n/** @const {string} */ var y = 'hello';");
    assert!(parser.is_externs);
}

#[test]
fn parse_error_names_file() {
    let mut parser = ParserState::new("broken.js", "var = ;");
    let err = parser.parse_script().expect_err("should fail");
    assert_eq!(err.file, "broken.js");
}

#[test]
fn binary_precedence_shapes_tree() {
    let (parser, root) = parse("var x = a + b * c;");
    let arena = &parser.arena;
    let init = arena.children(arena.children(arena.children(root)[0])[0])[0];
    assert_eq!(arena.token(init), Token::Binary);
    assert_eq!(arena.string(init), "+");
    let rhs = arena.children(init)[1];
    assert_eq!(arena.string(rhs), "*");
}
