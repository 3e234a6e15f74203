//! Go-dialect support for fnmove.
//!
//! This crate provides everything needed to relocate a function in a Go
//! source tree:
//! - A lexer and recursive-descent parser producing a span-carrying AST
//! - A loader grouping units into packages by directory
//! - Name resolution over block, package, import and universe scopes
//! - A canonical printer that keeps comments and blank lines
//! - The relocation operation itself

pub mod ast;
pub mod loader;
pub mod ops;
pub mod parser;
pub mod printer;
pub mod program;
pub mod resolve;
pub mod visit;

#[cfg(test)]
mod test_helpers;

pub use loader::{GoLoader, LoadError, SemanticModel};
pub use printer::{CanonicalPrinter, PrintError, Printer};
pub use program::Program;
