//! TypeScript code emission for the typeshift transpiler.
//!
//! `Printer` walks the annotated arena tree and prints TypeScript source:
//! the base JavaScript forms plus the typed extensions (declared-type
//! annotations, casts, class-field initializers, access modifiers,
//! optional and rest parameters, constructor-call parens).

pub mod printer;
pub mod source_writer;

mod expressions;
mod statements;
mod types;

pub use printer::{Printer, print};
pub use source_writer::SourceWriter;
