//! Common types and utilities for the typeshift transpiler.
//!
//! This crate provides foundational types used across all typeshift crates:
//! - Diagnostics (`Diagnostic`, `DiagnosticCategory`)
//! - Comment ranges and doc-comment text utilities
//! - Path and dotted-name utilities for import rewriting

pub mod comments;
pub use comments::CommentRange;

pub mod diagnostics;
pub use diagnostics::{Diagnostic, DiagnosticCategory};

pub mod paths;
