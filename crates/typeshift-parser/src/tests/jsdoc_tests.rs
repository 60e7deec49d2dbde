use crate::jsdoc;
use crate::node::{NodeArena, Visibility};
use crate::token::Token;

fn parse(text: &str) -> (crate::node::DocInfo, NodeArena) {
    let mut arena = NodeArena::new();
    let info = jsdoc::parse(text, "test.js", &mut arena).expect("doc block should parse");
    (info, arena)
}

#[test]
fn parses_overall_type() {
    let (info, arena) = parse("/** @type {number} */");
    let ty = info.ty.expect("@type should set the overall type");
    assert_eq!(arena.token(ty), Token::String);
    assert_eq!(arena.string(ty), "number");
}

#[test]
fn parses_params_in_order() {
    let (info, arena) = parse("/** @param {number} x @param {string} y */");
    let keys: Vec<&String> = info.params.keys().collect();
    assert_eq!(keys, vec!["x", "y"]);
    let x = info.params["x"];
    assert_eq!(arena.string(x), "number");
}

#[test]
fn parses_return_type() {
    let (info, arena) = parse("/** @return {boolean} */");
    let ret = info.return_ty.expect("@return should set the return type");
    assert_eq!(arena.string(ret), "boolean");
}

#[test]
fn parses_returns_alias() {
    let (info, _) = parse("/** @returns {boolean} */");
    assert!(info.return_ty.is_some());
}

#[test]
fn bare_const_sets_flag() {
    let (info, _) = parse("/** @const */");
    assert!(info.is_const);
    assert!(info.ty.is_none());
}

#[test]
fn typed_const_sets_type_only() {
    let (info, _) = parse("/** @const {string} */");
    assert!(!info.is_const);
    assert!(info.ty.is_some());
}

#[test]
fn parses_visibility() {
    let (info, _) = parse("/** @private */");
    assert_eq!(info.visibility, Some(Visibility::Private));
    let (info, _) = parse("/** @protected */");
    assert_eq!(info.visibility, Some(Visibility::Protected));
}

#[test]
fn parses_externs_flag() {
    let (info, _) = parse("/** @externs */");
    assert!(info.is_externs);
}

#[test]
fn parses_variadic_param() {
    let (info, arena) = parse("/** @param {...string} rest */");
    let rest = info.params["rest"];
    assert_eq!(arena.token(rest), Token::Ellipsis);
    let inner = arena.children(rest)[0];
    assert_eq!(arena.string(inner), "string");
}

#[test]
fn parses_optional_param() {
    let (info, arena) = parse("/** @param {number=} x */");
    let x = info.params["x"];
    assert_eq!(arena.token(x), Token::Equals);
    assert_eq!(arena.string(arena.children(x)[0]), "number");
}

#[test]
fn parses_nullable_and_non_null() {
    let (info, arena) = parse("/** @type {?string} */");
    let ty = info.ty.expect("type");
    assert_eq!(arena.token(ty), Token::Qmark);
    assert_eq!(arena.string(arena.children(ty)[0]), "string");

    let (info, arena) = parse("/** @type {!Object} */");
    let ty = info.ty.expect("type");
    assert_eq!(arena.token(ty), Token::Bang);
    assert_eq!(arena.string(arena.children(ty)[0]), "Object");
}

#[test]
fn bare_question_mark_is_unknown() {
    let (info, arena) = parse("/** @type {?} */");
    let ty = info.ty.expect("type");
    assert_eq!(arena.token(ty), Token::Qmark);
    assert!(arena.children(ty).is_empty());
}

#[test]
fn parses_union() {
    let (info, arena) = parse("/** @type {(number|string)} */");
    let ty = info.ty.expect("type");
    assert_eq!(arena.token(ty), Token::Pipe);
    assert_eq!(arena.children(ty).len(), 2);
}

#[test]
fn parses_bare_union() {
    let (info, arena) = parse("/** @type {number|string} */");
    let ty = info.ty.expect("type");
    assert_eq!(arena.token(ty), Token::Pipe);
}

#[test]
fn parses_record() {
    let (info, arena) = parse("/** @type {{a: number, b}} */");
    let ty = info.ty.expect("type");
    assert_eq!(arena.token(ty), Token::Lc);
    let fields = arena.children(ty);
    assert_eq!(fields.len(), 2);
    assert_eq!(arena.string(fields[0]), "a");
    assert_eq!(arena.children(fields[0]).len(), 1);
    assert_eq!(arena.string(fields[1]), "b");
    assert!(arena.children(fields[1]).is_empty());
}

#[test]
fn record_keys_lose_quotes() {
    let (info, arena) = parse("/** @type {{'quoted': string}} */");
    let ty = info.ty.expect("type");
    assert_eq!(arena.string(arena.children(ty)[0]), "quoted");
}

#[test]
fn parses_generics_both_spellings() {
    for src in ["/** @type {Array<string>} */", "/** @type {Array.<string>} */"] {
        let (info, arena) = parse(src);
        let ty = info.ty.expect("type");
        assert_eq!(arena.token(ty), Token::String);
        assert_eq!(arena.string(ty), "Array");
        let block = arena.children(ty)[0];
        assert_eq!(arena.token(block), Token::Block);
        assert_eq!(arena.children(block).len(), 1);
    }
}

#[test]
fn parses_function_type() {
    let (info, arena) = parse("/** @type {function(new:C, number=, ...string): boolean} */");
    let ty = info.ty.expect("type");
    assert_eq!(arena.token(ty), Token::Function);
    let children = arena.children(ty);
    let params = children[0];
    assert_eq!(arena.token(params), Token::ParamList);
    let param_tokens: Vec<Token> = arena
        .children(params)
        .iter()
        .map(|&p| arena.token(p))
        .collect();
    assert_eq!(param_tokens, vec![Token::New, Token::Equals, Token::Ellipsis]);
    let ret = children[1];
    assert_eq!(arena.string(ret), "boolean");
}

#[test]
fn function_type_without_return() {
    let (info, arena) = parse("/** @type {function(number)} */");
    let ty = info.ty.expect("type");
    assert_eq!(arena.children(ty).len(), 1);
}

#[test]
fn unknown_tags_are_ignored() {
    let (info, _) = parse("/** Says hello. @deprecated use other @see foo */");
    assert!(info.is_empty());
}

#[test]
fn rejects_garbage_type() {
    let mut arena = NodeArena::new();
    let err = jsdoc::parse("/** @type {#%} */", "bad.js", &mut arena);
    assert!(err.is_err());
}

#[test]
fn dotted_names_stay_whole() {
    let (info, arena) = parse("/** @type {ns.sub.Type} */");
    let ty = info.ty.expect("type");
    assert_eq!(arena.string(ty), "ns.sub.Type");
}
