//! Cross-file type-name rewriting.
//!
//! A dotted type name whose longest dotted prefix names a known module is
//! rewritten to that module's local symbol, and a matching import is queued
//! once per (file, namespace) pair. Names with no module prefix fall back
//! to the externs map.

use indexmap::IndexMap;
use typeshift_common::paths::{longest_dotted_prefix, relative_import, replace_prefix};
use typeshift_parser::node::NodeIndex;
use typeshift_parser::token::Token;

use crate::annotate::AnnotationPass;
use crate::modules::{ModuleKind, last_component};

/// Per-file memo of namespace-to-local-symbol substitutions already
/// committed. Every entry corresponds to exactly one queued import.
#[derive(Debug, Default)]
pub struct TypeRewriteTable {
    entries: IndexMap<String, String>,
}

impl TypeRewriteTable {
    pub fn new() -> Self {
        TypeRewriteTable::default()
    }

    pub fn get(&self, namespace: &str) -> Option<&str> {
        self.entries.get(namespace).map(String::as_str)
    }

    pub fn insert(&mut self, namespace: String, local: String) {
        self.entries.insert(namespace, local);
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> AnnotationPass<'a> {
    /// Rewrite a dotted type name into its module-local form, queueing the
    /// justifying import on first use.
    pub(crate) fn rewrite_name(&mut self, name: &str) -> String {
        let prefix = {
            let candidates = self.rewrite.keys().chain(self.index.namespaces());
            longest_dotted_prefix(name, candidates).map(str::to_string)
        };
        let Some(prefix) = prefix else {
            // No module prefix: externs substitution or the name unchanged.
            return self
                .externs
                .get(name)
                .cloned()
                .unwrap_or_else(|| name.to_string());
        };

        if let Some(local) = self.rewrite.get(&prefix) {
            return replace_prefix(name, &prefix, local);
        }

        let Some(record) = self.index.lookup(&prefix) else {
            return name.to_string();
        };
        let local = record
            .provides
            .get(&prefix)
            .cloned()
            .unwrap_or_else(|| last_component(&prefix).to_string());
        let module = match record.kind {
            ModuleKind::GoogModule => format!("goog:{prefix}"),
            ModuleKind::EsModule => relative_import(self.file, &record.file),
        };
        tracing::debug!(
            file = %self.file,
            namespace = %prefix,
            symbol = %local,
            %module,
            "queueing import for type reference"
        );
        let import = build_import(self, &local, &module);
        self.pending_imports.push(import);
        self.rewrite.insert(prefix.clone(), local.clone());
        replace_prefix(name, &prefix, &local)
    }
}

fn build_import(pass: &mut AnnotationPass<'_>, symbol: &str, module: &str) -> NodeIndex {
    let arena = &mut *pass.arena;
    let local = arena.alloc_string(Token::Name, symbol);
    let spec = arena.alloc_with_children(Token::ImportSpec, vec![local]);
    let specs = arena.alloc_with_children(Token::ImportSpecs, vec![spec]);
    let default_slot = arena.alloc(Token::Empty);
    let module_node = arena.alloc_string(Token::String, module);
    arena.alloc_with_children(Token::Import, vec![default_slot, specs, module_node])
}
