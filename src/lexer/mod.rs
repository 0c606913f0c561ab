//! Lexical analysis module.
//!
//! This module contains the tokenizer that converts source text into a
//! stream of classified tokens for a parser. It handles:
//!
//! - Caller-supplied grammar tables (keywords, operators, groupings)
//! - Recognition of literals, keywords, identifiers, operators and groupings
//!   with a fixed priority and longest-match operators
//! - Line/column tracking with configurable tab width
//! - Comments and whitespace handling
//! - Abort-on-first or collect-all error recovery

pub mod config;
mod cursor;
pub mod lexer;
pub mod tokens;
