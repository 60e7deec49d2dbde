//! Compiler passes for the typeshift transpiler.
//!
//! The passes run per file in a fixed order: the type-annotation pass
//! (doc-type conversion, cross-file name rewriting, access modifiers), the
//! style-fix pass (binding relaxation and class/function lifting), then
//! import injection just before emission. Pass state - the type-rewrite
//! table and pending-imports queue - is owned by the driver and passed in
//! by `&mut` borrow.

pub mod annotate;
pub mod externs;
pub mod modules;
pub mod rewrite;
pub mod stylefix;
mod types;

pub use annotate::{AnnotationPass, inject_imports};
pub use externs::{ExternsMap, load_externs_map};
pub use modules::{ModuleKind, ModuleRecord, SymbolIndex, collect_module};
pub use rewrite::TypeRewriteTable;
pub use stylefix::StyleFixPass;

/// Pass-level configuration.
#[derive(Debug, Clone)]
pub struct TranspileOptions {
    /// Relax `var` bindings to `let` when lifting applies. This is an
    /// intentional semantic change for idiomatic output.
    pub var_to_let: bool,
}

impl Default for TranspileOptions {
    fn default() -> Self {
        TranspileOptions { var_to_let: true }
    }
}

#[cfg(test)]
#[path = "tests/annotate_tests.rs"]
mod annotate_tests;

#[cfg(test)]
#[path = "tests/modules_tests.rs"]
mod modules_tests;

#[cfg(test)]
#[path = "tests/externs_tests.rs"]
mod externs_tests;

#[cfg(test)]
#[path = "tests/stylefix_tests.rs"]
mod stylefix_tests;
