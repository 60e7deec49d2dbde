//! JavaScript parsing for the typeshift transpiler.
//!
//! This crate provides:
//! - The token tag set (`Token`) shared by syntax, doc-type, and
//!   typed-declaration trees
//! - The arena-backed syntax tree (`NodeArena`, `Node`, `NodeIndex`) and the
//!   comment registry side table
//! - A scanner with comment capture
//! - A recursive-descent parser for the annotated-JavaScript subset the
//!   conversion domain uses
//! - A doc-comment parser covering the Closure type-expression grammar

pub mod jsdoc;
pub mod node;
pub mod parser;
pub mod scanner;
pub mod token;

pub use node::{CommentRegistry, DocInfo, Node, NodeArena, NodeIndex, NodeProps, Visibility};
pub use parser::ParserState;
pub use token::Token;

#[cfg(test)]
#[path = "tests/scanner_tests.rs"]
mod scanner_tests;

#[cfg(test)]
#[path = "tests/jsdoc_tests.rs"]
mod jsdoc_tests;

#[cfg(test)]
#[path = "tests/parser_tests.rs"]
mod parser_tests;
