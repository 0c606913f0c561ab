#![allow(clippy::module_inception)]

use std::fmt::Display;

use serde::Serialize;

pub mod errors;
pub mod lexer;
pub mod macros;

/// A 1-based line/column location in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Position { line, column }
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Byte range of a lexeme in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Returns the text of the given 1-based line, without its line terminator.
pub fn get_line_at_position<'a>(source: &'a str, position: &Position) -> Option<&'a str> {
    source
        .split('\n')
        .nth(position.line.checked_sub(1)?)
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
}
