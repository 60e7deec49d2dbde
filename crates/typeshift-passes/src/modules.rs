//! Module metadata collection.
//!
//! A post-parse scan classifies each file as a legacy goog module (addressed
//! by dotted namespace) or an ECMAScript module (addressed by relative
//! path), and records the symbols it provides. The resulting symbol index
//! is consumed read-only by the type-annotation pass.

use indexmap::IndexMap;

use typeshift_parser::node::{NodeArena, NodeIndex, NodeProps};
use typeshift_parser::token::Token;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ModuleKind {
    /// `goog.module('ns')` / `goog.provide('ns')` form.
    GoogModule,
    /// Import/export form.
    EsModule,
}

#[derive(Debug, Clone)]
pub struct ModuleRecord {
    /// Canonical path of the file, as given to the driver.
    pub file: String,
    pub kind: ModuleKind,
    /// Namespace string to local symbol name.
    pub provides: IndexMap<String, String>,
}

/// Namespace-to-module index over every file in the compilation.
#[derive(Debug, Default)]
pub struct SymbolIndex {
    records: Vec<ModuleRecord>,
    by_namespace: IndexMap<String, usize>,
}

impl SymbolIndex {
    pub fn new() -> Self {
        SymbolIndex::default()
    }

    pub fn add(&mut self, record: ModuleRecord) {
        let slot = self.records.len();
        for namespace in record.provides.keys() {
            self.by_namespace.entry(namespace.clone()).or_insert(slot);
        }
        self.records.push(record);
    }

    pub fn lookup(&self, namespace: &str) -> Option<&ModuleRecord> {
        self.by_namespace
            .get(namespace)
            .map(|&slot| &self.records[slot])
    }

    pub fn namespaces(&self) -> impl Iterator<Item = &str> {
        self.by_namespace.keys().map(String::as_str)
    }
}

/// Scan a parsed file for the module metadata it declares.
///
/// Returns `None` for plain scripts that provide nothing.
pub fn collect_module(file: &str, arena: &NodeArena, root: NodeIndex) -> Option<ModuleRecord> {
    let stmts = script_statements(arena, root);

    // goog.module / goog.provide namespaces.
    let mut namespaces = Vec::new();
    for &stmt in stmts {
        if let Some(namespace) = goog_call_namespace(arena, stmt) {
            namespaces.push(namespace);
        }
    }

    if !namespaces.is_empty() {
        let mut provides = IndexMap::new();
        for namespace in &namespaces {
            provides.insert(namespace.clone(), last_component(namespace).to_string());
        }
        for &stmt in stmts {
            if let Some(symbol) = exports_property_name(arena, stmt) {
                for namespace in &namespaces {
                    provides.insert(format!("{namespace}.{symbol}"), symbol.clone());
                }
            }
        }
        return Some(ModuleRecord {
            file: file.to_string(),
            kind: ModuleKind::GoogModule,
            provides,
        });
    }

    // ECMAScript module: exported declarations are indexed by bare name.
    let mut provides = IndexMap::new();
    for &stmt in stmts {
        if !arena.get(stmt).props.contains(NodeProps::EXPORT) {
            continue;
        }
        for name in declared_names(arena, stmt) {
            provides.insert(name.clone(), name);
        }
    }
    if provides.is_empty() {
        return None;
    }
    Some(ModuleRecord {
        file: file.to_string(),
        kind: ModuleKind::EsModule,
        provides,
    })
}

/// The top-level statement list, looking through a `ModuleBody` wrapper.
pub fn script_statements(arena: &NodeArena, root: NodeIndex) -> &[NodeIndex] {
    let children = arena.children(root);
    if children.len() == 1 && arena.token(children[0]) == Token::ModuleBody {
        arena.children(children[0])
    } else {
        children
    }
}

/// `goog.module('ns')` or `goog.provide('ns')` at statement level.
fn goog_call_namespace(arena: &NodeArena, stmt: NodeIndex) -> Option<String> {
    if arena.token(stmt) != Token::ExprResult {
        return None;
    }
    let call = *arena.children(stmt).first()?;
    if arena.token(call) != Token::Call {
        return None;
    }
    let callee = *arena.children(call).first()?;
    if arena.token(callee) != Token::GetProp {
        return None;
    }
    let prop = arena.string(callee);
    if prop != "module" && prop != "provide" {
        return None;
    }
    let base = *arena.children(callee).first()?;
    if arena.token(base) != Token::Name || arena.string(base) != "goog" {
        return None;
    }
    let arg = *arena.children(call).get(1)?;
    if arena.token(arg) != Token::String {
        return None;
    }
    Some(arena.string(arg).to_string())
}

/// `exports.X = …` at statement level.
fn exports_property_name(arena: &NodeArena, stmt: NodeIndex) -> Option<String> {
    if arena.token(stmt) != Token::ExprResult {
        return None;
    }
    let assign = *arena.children(stmt).first()?;
    if arena.token(assign) != Token::Assign {
        return None;
    }
    let lhs = *arena.children(assign).first()?;
    if arena.token(lhs) != Token::GetProp {
        return None;
    }
    let base = *arena.children(lhs).first()?;
    if arena.token(base) != Token::Name || arena.string(base) != "exports" {
        return None;
    }
    Some(arena.string(lhs).to_string())
}

/// The names a declaration statement binds.
fn declared_names(arena: &NodeArena, stmt: NodeIndex) -> Vec<String> {
    match arena.token(stmt) {
        Token::Var | Token::Let | Token::Const => arena
            .children(stmt)
            .iter()
            .map(|&name| arena.string(name).to_string())
            .collect(),
        Token::Function | Token::Class => {
            let name = arena.string(arena.children(stmt)[0]);
            if name.is_empty() {
                Vec::new()
            } else {
                vec![name.to_string()]
            }
        }
        _ => Vec::new(),
    }
}

pub(crate) fn last_component(namespace: &str) -> &str {
    namespace.rsplit('.').next().unwrap_or(namespace)
}
