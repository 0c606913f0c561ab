use std::fmt::Display;

use serde::Serialize;

use crate::{Position, Span};

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize)]
pub enum TokenKind {
    Keyword,
    Literal,
    Operator,
    Identifier,
    Grouping,
    EndOfInput,
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    /// Exact source text of the token. Empty only for `EndOfInput`.
    pub lexeme: String,
    pub line: usize,
    pub column: usize,
    pub span: Span,
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}({:?}) @ {}:{}",
            self.kind, self.lexeme, self.line, self.column
        )
    }
}

impl Token {
    pub fn position(&self) -> Position {
        Position::new(self.line, self.column)
    }

    /// Decoded value of a literal token.
    ///
    /// String and character literals lose their quotes and have their escape
    /// sequences resolved; numbers and literal words come back unchanged.
    /// Returns `None` for every other kind of token.
    pub fn literal_value(&self) -> Option<String> {
        if self.kind != TokenKind::Literal {
            return None;
        }

        let body = self
            .lexeme
            .strip_prefix('"')
            .and_then(|rest| rest.strip_suffix('"'))
            .or_else(|| {
                self.lexeme
                    .strip_prefix('\'')
                    .and_then(|rest| rest.strip_suffix('\''))
            });

        match body {
            Some(body) => Some(unescape(body)),
            None => Some(self.lexeme.clone()),
        }
    }
}

fn unescape(body: &str) -> String {
    let mut result = String::with_capacity(body.len());
    let mut chars = body.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            result.push(ch);
            continue;
        }

        match chars.peek() {
            Some('n') => {
                result.push('\n');
                chars.next();
            }
            Some('t') => {
                result.push('\t');
                chars.next();
            }
            Some('r') => {
                result.push('\r');
                chars.next();
            }
            Some('\\') => {
                result.push('\\');
                chars.next();
            }
            Some('"') => {
                result.push('"');
                chars.next();
            }
            Some('\'') => {
                result.push('\'');
                chars.next();
            }
            Some('0') => {
                result.push('\0');
                chars.next();
            }
            Some('x') => {
                let mut hex = String::new();
                chars.next();

                while hex.len() < 2 {
                    match chars.peek() {
                        Some(ch) if ch.is_ascii_hexdigit() => {
                            hex.push(*ch);
                            chars.next();
                        }
                        _ => break,
                    }
                }

                match u8::from_str_radix(&hex, 16) {
                    Ok(byte) => result.push(byte as char),
                    // `\x` without digits stays as written
                    Err(_) => result.push_str("\\x"),
                }
            }
            _ => {
                result.push(ch); // Keep the backslash
            }
        }
    }

    result
}
