use crate::Position;

/// Scan position of a tokenizer.
///
/// `offset` is a byte offset into the source, `line` and `column` are 1-based
/// and count characters. Only ever moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl Default for Cursor {
    fn default() -> Self {
        Cursor {
            offset: 0,
            line: 1,
            column: 1,
        }
    }
}

impl Cursor {
    pub fn position(&self) -> Position {
        Position::new(self.line, self.column)
    }

    /// Moves past `ch`, which must be the character at `offset`.
    pub fn advance(&mut self, ch: char, tab_width: usize) {
        self.offset += ch.len_utf8();

        match ch {
            '\n' => {
                self.line += 1;
                self.column = 1;
            }
            '\t' => self.column += tab_width,
            _ => self.column += 1,
        }
    }
}
