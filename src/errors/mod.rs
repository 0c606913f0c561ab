//! Error types and error handling for the lexer.
//!
//! This module defines the error types produced while tokenizing and while
//! compiling a grammar. It includes:
//!
//! - Lexical errors carrying the exact line/column of the offending text
//! - Configuration errors raised when a grammar cannot be built
//! - Helpful error names and suggestions for callers rendering diagnostics

pub mod errors;

#[cfg(test)]
mod tests;
