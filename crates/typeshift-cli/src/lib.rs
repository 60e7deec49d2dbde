//! CLI support for the typeshift transpiler.
//!
//! This crate provides the `typeshift` binary and the compilation driver
//! that orders the passes and routes each input file to one output file.

pub mod args;
pub mod driver;

#[cfg(test)]
#[path = "tests/args_tests.rs"]
mod args_tests;

#[cfg(test)]
#[path = "tests/driver_tests.rs"]
mod driver_tests;
