use std::iter::FusedIterator;

use rayon::prelude::*;
use tracing::{debug, trace, warn};

use crate::{
    errors::errors::{Error, ErrorImpl, LiteralFault},
    Position, Span, MK_TOKEN,
};

use super::{
    config::{Grammar, RecoveryPolicy},
    cursor::Cursor,
    tokens::{Token, TokenKind},
};

/// Output of a full tokenization run.
///
/// `tokens` always ends with exactly one `EndOfInput` token. `errors` is only
/// ever non-empty under `RecoveryPolicy::Collect`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tokenized {
    pub tokens: Vec<Token>,
    pub errors: Vec<Error>,
}

impl Tokenized {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

pub struct Tokenizer<'s, 'g> {
    source: &'s str,
    grammar: &'g Grammar,
    cursor: Cursor,
    finished: bool,
}

impl<'s, 'g> Tokenizer<'s, 'g> {
    pub fn new(source: &'s str, grammar: &'g Grammar) -> Tokenizer<'s, 'g> {
        Tokenizer {
            source,
            grammar,
            cursor: Cursor::default(),
            finished: false,
        }
    }

    pub fn position(&self) -> Position {
        self.cursor.position()
    }

    pub fn remainder(&self) -> &'s str {
        &self.source[self.cursor.offset..]
    }

    pub fn at(&self) -> Option<char> {
        self.remainder().chars().next()
    }

    pub fn at_eof(&self) -> bool {
        self.cursor.offset >= self.source.len()
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.remainder().chars().nth(n)
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.at()?;
        self.cursor.advance(ch, self.grammar.tab_width());
        Some(ch)
    }

    fn advance_n(&mut self, bytes: usize) {
        let end = self.cursor.offset + bytes;
        while self.cursor.offset < end && self.advance().is_some() {}
    }

    fn eat_while(&mut self, predicate: impl Fn(char) -> bool) {
        while let Some(ch) = self.at() {
            if !predicate(ch) {
                break;
            }
            self.advance();
        }
    }

    fn lexeme_from(&self, start: &Cursor) -> String {
        String::from(&self.source[start.offset..self.cursor.offset])
    }

    fn token_from(&self, kind: TokenKind, start: Cursor) -> Token {
        MK_TOKEN!(kind, self.lexeme_from(&start), start, self.cursor)
    }

    fn malformed(&self, fault: LiteralFault, start: Cursor) -> Error {
        Error::new(
            ErrorImpl::MalformedLiteral {
                lexeme: self.lexeme_from(&start),
                fault,
            },
            start.position(),
        )
    }

    fn at_line_comment(&self) -> bool {
        self.grammar
            .line_comment()
            .is_some_and(|prefix| self.remainder().starts_with(prefix))
    }

    /// Skips whitespace and line comments. A comment stops before its `\n`,
    /// which is then consumed as whitespace.
    fn skip_trivia(&mut self) {
        loop {
            match self.at() {
                Some(ch) if ch.is_whitespace() => {
                    self.advance();
                }
                Some(_) if self.at_line_comment() => self.eat_while(|ch| ch != '\n'),
                _ => break,
            }
        }
    }

    /// Scans exactly one token at the cursor.
    ///
    /// At end of input this returns `EndOfInput` and keeps returning it on
    /// every later call. On failure the cursor has already moved past the
    /// offending text, so calling again resumes scanning after it.
    pub fn next_token(&mut self) -> Result<Token, Error> {
        self.skip_trivia();

        let start = self.cursor;
        let grammar = self.grammar;

        let Some(current) = self.at() else {
            return Ok(MK_TOKEN!(TokenKind::EndOfInput, String::new(), start, start));
        };

        if let Some(literal) = self.scan_literal(current, start) {
            return literal;
        }

        if is_identifier_start(current) {
            return Ok(self.scan_word(start));
        }

        if let Some(operator) = grammar.match_operator(self.remainder()) {
            self.advance_n(operator.len());
            return Ok(self.token_from(TokenKind::Operator, start));
        }

        if grammar.is_grouping(current) {
            self.advance();
            return Ok(self.token_from(TokenKind::Grouping, start));
        }

        self.advance();
        Err(Error::new(
            ErrorImpl::IllegalCharacter { character: current },
            start.position(),
        ))
    }

    fn scan_literal(&mut self, current: char, start: Cursor) -> Option<Result<Token, Error>> {
        if let Some(number) = self.grammar.match_number(self.remainder()) {
            self.advance_n(number.len());
            return Some(self.finish_number(start));
        }

        match current {
            '"' if self.grammar.string_literals() => Some(self.scan_string(start)),
            '\'' if self.grammar.char_literals() => Some(self.scan_character(start)),
            _ => None,
        }
    }

    // `12ab` and `1.2.3` are one bad literal, not a number followed by more tokens.
    fn finish_number(&mut self, start: Cursor) -> Result<Token, Error> {
        let glued = match self.at() {
            Some(ch) if is_identifier_continue(ch) => true,
            Some('.') => self.peek_nth(1).is_some_and(|ch| ch.is_ascii_digit()),
            _ => false,
        };

        if glued {
            self.eat_while(|ch| is_identifier_continue(ch) || ch == '.');
            return Err(self.malformed(LiteralFault::InvalidNumber, start));
        }

        Ok(self.token_from(TokenKind::Literal, start))
    }

    fn scan_string(&mut self, start: Cursor) -> Result<Token, Error> {
        self.advance();

        loop {
            match self.at() {
                None | Some('\n') => {
                    return Err(self.malformed(LiteralFault::UnterminatedString, start))
                }
                Some('"') => {
                    self.advance();
                    return Ok(self.token_from(TokenKind::Literal, start));
                }
                Some('\\') => {
                    self.advance();
                    self.skip_escaped();
                }
                Some(_) => {
                    self.advance();
                }
            }
        }
    }

    fn scan_character(&mut self, start: Cursor) -> Result<Token, Error> {
        self.advance();

        match self.at() {
            Some('\'') => {
                self.advance();
                return Err(self.malformed(LiteralFault::EmptyCharacter, start));
            }
            None | Some('\n') => {
                return Err(self.malformed(LiteralFault::UnterminatedCharacter, start))
            }
            Some('\\') => {
                self.advance();
                self.skip_escaped();
            }
            Some(_) => {
                self.advance();
            }
        }

        if self.at() == Some('\'') {
            self.advance();
            Ok(self.token_from(TokenKind::Literal, start))
        } else {
            Err(self.malformed(LiteralFault::UnterminatedCharacter, start))
        }
    }

    // The character after a backslash, unless the line ends there.
    fn skip_escaped(&mut self) {
        if self.at().is_some_and(|ch| ch != '\n') {
            self.advance();
        }
    }

    fn scan_word(&mut self, start: Cursor) -> Token {
        self.eat_while(is_identifier_continue);

        let lexeme = self.lexeme_from(&start);
        let kind = self.grammar.classify_word(&lexeme);

        MK_TOKEN!(kind, lexeme, start, self.cursor)
    }

    /// Drains the tokenizer using the grammar's recovery policy.
    pub fn tokenize(&mut self) -> Result<Tokenized, Error> {
        self.tokenize_with(self.grammar.recovery())
    }

    pub fn tokenize_with(&mut self, policy: RecoveryPolicy) -> Result<Tokenized, Error> {
        debug!(bytes = self.source.len(), ?policy, "tokenizing");

        let mut output = Tokenized::default();

        loop {
            match self.next_token() {
                Ok(token) => {
                    trace!(%token, "token");

                    let done = token.kind == TokenKind::EndOfInput;
                    output.tokens.push(token);

                    if done {
                        break;
                    }
                }
                Err(error) => match policy {
                    RecoveryPolicy::Abort => {
                        debug!(%error, "aborting tokenization");
                        return Err(error);
                    }
                    RecoveryPolicy::Collect => {
                        warn!(%error, "lexical error");
                        output.errors.push(error);
                    }
                },
            }
        }

        self.finished = true;

        debug!(
            tokens = output.tokens.len(),
            errors = output.errors.len(),
            "tokenized"
        );

        Ok(output)
    }
}

impl Iterator for Tokenizer<'_, '_> {
    type Item = Result<Token, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let result = self.next_token();

        if matches!(&result, Ok(token) if token.kind == TokenKind::EndOfInput) {
            self.finished = true;
        }

        Some(result)
    }
}

impl FusedIterator for Tokenizer<'_, '_> {}

pub(crate) fn is_identifier_start(ch: char) -> bool {
    ch.is_alphabetic() || ch == '_'
}

pub(crate) fn is_identifier_continue(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

pub fn tokenize(source: &str, grammar: &Grammar) -> Result<Tokenized, Error> {
    Tokenizer::new(source, grammar).tokenize()
}

/// Tokenizes independent sources in parallel. Results keep the input order.
pub fn tokenize_many<S>(sources: &[S], grammar: &Grammar) -> Vec<Result<Tokenized, Error>>
where
    S: AsRef<str> + Sync,
{
    sources
        .par_iter()
        .map(|source| tokenize(source.as_ref(), grammar))
        .collect()
}
