//! `Printer` - the typed TypeScript emitter.
//!
//! Emission runs pre-hook, base rule, post-hook per node. The pre-hook
//! prints registry comments verbatim and short-circuits casts; the
//! post-hooks restore what the base forms drop (class-field initializers,
//! empty constructor-call parens).

use typeshift_parser::node::{CommentRegistry, NodeArena, NodeIndex};
use typeshift_parser::token::Token;

use crate::source_writer::SourceWriter;

/// Print a script (or any statement subtree) to TypeScript source.
pub fn print(arena: &NodeArena, comments: &CommentRegistry, root: NodeIndex) -> String {
    let mut printer = Printer::new(arena, comments);
    printer.emit_script(root);
    printer.finish()
}

pub struct Printer<'a> {
    pub(crate) arena: &'a NodeArena,
    comments: &'a CommentRegistry,
    pub(crate) writer: SourceWriter,
}

impl<'a> Printer<'a> {
    pub fn new(arena: &'a NodeArena, comments: &'a CommentRegistry) -> Self {
        Printer {
            arena,
            comments,
            writer: SourceWriter::new(),
        }
    }

    pub fn finish(self) -> String {
        self.writer.finish()
    }

    pub fn emit_script(&mut self, root: NodeIndex) {
        tracing::debug!(nodes = self.arena.len(), "emitting script");
        let children = self.arena.children(root);
        // A module script holds its statements in a single ModuleBody child.
        let stmts: &[NodeIndex] =
            if children.len() == 1 && self.arena.token(children[0]) == Token::ModuleBody {
                self.arena.children(children[0])
            } else {
                children
            };
        for &stmt in stmts {
            self.emit_statement(stmt);
        }
    }

    // ==================== Hooks ====================

    /// Pre-hook: emit any registry comment for this node, verbatim, line by
    /// line.
    pub(crate) fn emit_leading_comment(&mut self, idx: NodeIndex) {
        if let Some(text) = self.comments.get(idx) {
            for line in text.lines() {
                self.write(line);
                self.writer.write_line();
            }
        }
    }

    // ==================== Output helpers ====================

    pub(crate) fn write(&mut self, text: &str) {
        self.writer.write(text);
    }

    pub(crate) fn write_line(&mut self) {
        self.writer.write_line();
    }

    pub(crate) fn write_space(&mut self) {
        self.writer.write_space();
    }
}
