//! Utility macros for the lexer.
//!
//! - `MK_TOKEN!` - Creates a Token instance between two cursor snapshots
//!
//! This keeps position bookkeeping in one place inside the tokenizer.

/// Creates a Token instance.
///
/// # Arguments
///
/// * `$kind` - The TokenKind
/// * `$lexeme` - The exact source text of the token
/// * `$start` - Cursor snapshot taken before the token's first character
/// * `$end` - Cursor snapshot taken after the token's last character
///
/// # Example
///
/// ```ignore
/// let token = MK_TOKEN!(TokenKind::Literal, String::from("42"), start, self.cursor);
/// ```
#[macro_export]
macro_rules! MK_TOKEN {
    ($kind:expr, $lexeme:expr, $start:expr, $end:expr) => {
        Token {
            kind: $kind,
            lexeme: $lexeme,
            line: $start.line,
            column: $start.column,
            span: Span {
                start: $start.offset,
                end: $end.offset,
            },
        }
    };
}
