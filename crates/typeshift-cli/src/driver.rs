//! The transpile driver.
//!
//! Orders the passes per file - parse, module metadata collection, type
//! annotation, style fix, import injection, emission - and returns the
//! emitted text keyed by input basename. One bad input never corrupts a
//! sibling file: failures are logged and the file is skipped.

use indexmap::IndexMap;
use rustc_hash::FxHashSet;

use typeshift_common::paths::basename_without_extension;
use typeshift_emitter::print;
use typeshift_parser::node::{CommentRegistry, NodeArena, NodeIndex};
use typeshift_parser::parser::ParserState;
use typeshift_passes::{
    AnnotationPass, ExternsMap, StyleFixPass, SymbolIndex, TranspileOptions, TypeRewriteTable,
    collect_module, inject_imports,
};

struct ParsedFile {
    name: String,
    arena: NodeArena,
    comments: CommentRegistry,
    root: NodeIndex,
    is_externs: bool,
}

pub struct Transpiler {
    options: TranspileOptions,
    externs_map: ExternsMap,
}

impl Transpiler {
    pub fn new(options: TranspileOptions, externs_map: ExternsMap) -> Self {
        Transpiler {
            options,
            externs_map,
        }
    }

    /// Transpile `sources`, emitting the files named in `files_to_emit`.
    ///
    /// Externs inputs (and sources doc-flagged as externs) contribute to the
    /// symbol index but produce no output. Returns emitted text keyed by
    /// basename without extension.
    pub fn transpile(
        &self,
        files_to_emit: &FxHashSet<String>,
        sources: &[(String, String)],
        externs: &[(String, String)],
    ) -> IndexMap<String, String> {
        let mut parsed = Vec::new();
        for (name, text) in externs {
            if let Some(mut file) = parse_file(name, text) {
                file.is_externs = true;
                parsed.push(file);
            }
        }
        for (name, text) in sources {
            if let Some(file) = parse_file(name, text) {
                parsed.push(file);
            }
        }

        let mut index = SymbolIndex::new();
        for file in &parsed {
            if let Some(record) = collect_module(&file.name, &file.arena, file.root) {
                index.add(record);
            }
        }

        let mut outputs = IndexMap::new();
        for file in &mut parsed {
            if file.is_externs {
                tracing::debug!(file = %file.name, "externs input; not emitted");
                continue;
            }
            if !files_to_emit.contains(&file.name) {
                continue;
            }

            // Pass state is owned here and lent to the passes per file.
            let mut rewrite = TypeRewriteTable::new();
            let mut pending = Vec::new();
            if let Err(diag) = AnnotationPass::run(
                &file.name,
                &mut file.arena,
                &mut file.comments,
                file.root,
                &index,
                &self.externs_map,
                &mut rewrite,
                &mut pending,
            ) {
                tracing::error!(%diag, "type annotation failed; skipping file");
                continue;
            }
            debug_assert_eq!(rewrite.len(), pending.len());
            StyleFixPass::run(&mut file.arena, &mut file.comments, &self.options, file.root);
            inject_imports(&mut file.arena, file.root, pending);

            let text = print(&file.arena, &file.comments, file.root);
            outputs.insert(basename_without_extension(&file.name).to_string(), text);
        }
        outputs
    }
}

/// Transpile with default options and no externs map.
pub fn transpile(
    files_to_emit: &FxHashSet<String>,
    sources: &[(String, String)],
    externs: &[(String, String)],
) -> IndexMap<String, String> {
    Transpiler::new(TranspileOptions::default(), ExternsMap::new())
        .transpile(files_to_emit, sources, externs)
}

fn parse_file(name: &str, text: &str) -> Option<ParsedFile> {
    let mut parser = ParserState::new(name, text);
    match parser.parse_script() {
        Ok(root) => Some(ParsedFile {
            name: name.to_string(),
            arena: parser.arena,
            comments: parser.comments,
            root,
            is_externs: parser.is_externs,
        }),
        Err(diag) => {
            tracing::error!(%diag, "parse failure; skipping file");
            None
        }
    }
}
