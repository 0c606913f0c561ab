use std::fmt::Display;

use thiserror::Error;

use crate::Position;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{internal_error} at {position}")]
pub struct Error {
    internal_error: ErrorImpl,
    position: Position,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Position) -> Self {
        Error {
            internal_error: error_impl,
            position,
        }
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    pub fn line(&self) -> usize {
        self.position.line
    }

    pub fn column(&self) -> usize {
        self.position.column
    }

    pub fn kind(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::IllegalCharacter { .. } => "IllegalCharacter",
            ErrorImpl::MalformedLiteral { .. } => "MalformedLiteral",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::IllegalCharacter { character } => ErrorTip::Suggestion(format!(
                "`{}` is not part of any keyword, literal, operator or grouping",
                character.escape_debug()
            )),
            ErrorImpl::MalformedLiteral { lexeme, fault } => match fault {
                LiteralFault::UnterminatedString => ErrorTip::Suggestion(format!(
                    "String literal `{}` is missing its closing `\"`",
                    lexeme
                )),
                LiteralFault::UnterminatedCharacter => ErrorTip::Suggestion(format!(
                    "Character literal `{}` is missing its closing `'`",
                    lexeme
                )),
                LiteralFault::EmptyCharacter => ErrorTip::None,
                LiteralFault::InvalidNumber => ErrorTip::Suggestion(format!(
                    "Invalid number: `{}`, separate it from what follows",
                    lexeme
                )),
            },
        }
    }
}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ErrorImpl {
    #[error("illegal character {character:?}")]
    IllegalCharacter { character: char },
    #[error("malformed literal {lexeme:?}: {fault}")]
    MalformedLiteral { lexeme: String, fault: LiteralFault },
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralFault {
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("unterminated character literal")]
    UnterminatedCharacter,
    #[error("empty character literal")]
    EmptyCharacter,
    #[error("invalid numeric literal")]
    InvalidNumber,
}

/// Raised while compiling a `LexerConfig` into a `Grammar`.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid number pattern {pattern:?}")]
    InvalidNumberPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("operator table contains an empty operator")]
    EmptyOperator,
    #[error("tab width must be at least 1")]
    ZeroTabWidth,
    #[error("tab width {tab_width} is larger than {max}")]
    TabWidthTooLarge { tab_width: usize, max: usize },
    #[error("operator {operator:?} can never match, it starts like a word or with whitespace")]
    UnreachableOperator { operator: String },
    #[error("{word:?} is not a word, so it can never be scanned as one")]
    NotAWord { word: String },
    #[error("grouping {grouping:?} can never match, it is part of a word or whitespace")]
    UnreachableGrouping { grouping: char },
    #[error("{word:?} is both a keyword and a literal word")]
    AmbiguousWord { word: String },
    #[error("failed to parse lexer config")]
    Json(#[from] serde_json::Error),
}
