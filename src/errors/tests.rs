//! Unit tests for error handling.
//!
//! This module contains tests for error types and error reporting.

use crate::errors::errors::{ConfigError, Error, ErrorImpl, ErrorTip, LiteralFault};
use crate::Position;

#[test]
fn test_error_creation() {
    let error = Error::new(
        ErrorImpl::IllegalCharacter { character: '@' },
        Position::new(1, 10),
    );

    assert_eq!(error.get_error_name(), "IllegalCharacter");
}

#[test]
fn test_error_position() {
    let error = Error::new(
        ErrorImpl::IllegalCharacter { character: '$' },
        Position::new(3, 42),
    );

    assert_eq!(error.get_position(), &Position::new(3, 42));
    assert_eq!(error.line(), 3);
    assert_eq!(error.column(), 42);
}

#[test]
fn test_malformed_literal_error() {
    let error = Error::new(
        ErrorImpl::MalformedLiteral {
            lexeme: "\"abc".to_string(),
            fault: LiteralFault::UnterminatedString,
        },
        Position::new(1, 1),
    );

    assert_eq!(error.get_error_name(), "MalformedLiteral");
    assert!(matches!(
        error.kind(),
        ErrorImpl::MalformedLiteral {
            fault: LiteralFault::UnterminatedString,
            ..
        }
    ));
}

#[test]
fn test_error_display() {
    let error = Error::new(
        ErrorImpl::IllegalCharacter { character: '@' },
        Position::new(2, 7),
    );
    assert_eq!(error.to_string(), "illegal character '@' at 2:7");

    let error = Error::new(
        ErrorImpl::MalformedLiteral {
            lexeme: "12ab".to_string(),
            fault: LiteralFault::InvalidNumber,
        },
        Position::new(1, 1),
    );
    assert_eq!(
        error.to_string(),
        "malformed literal \"12ab\": invalid numeric literal at 1:1"
    );
}

#[test]
fn test_error_tip_suggestion() {
    let error = Error::new(
        ErrorImpl::IllegalCharacter { character: '\t' },
        Position::new(1, 1),
    );

    match error.get_tip() {
        ErrorTip::Suggestion(tip) => assert!(tip.starts_with("`\\t`")),
        _ => panic!("Expected suggestion tip"),
    }
}

#[test]
fn test_literal_fault_tips() {
    for fault in [
        LiteralFault::UnterminatedString,
        LiteralFault::UnterminatedCharacter,
        LiteralFault::InvalidNumber,
    ] {
        let error = Error::new(
            ErrorImpl::MalformedLiteral {
                lexeme: "'".to_string(),
                fault,
            },
            Position::new(1, 1),
        );

        assert!(!error.get_tip().to_string().is_empty(), "{:?}", fault);
    }

    // The message already says everything there is to say
    let error = Error::new(
        ErrorImpl::MalformedLiteral {
            lexeme: "''".to_string(),
            fault: LiteralFault::EmptyCharacter,
        },
        Position::new(1, 1),
    );
    assert!(matches!(error.get_tip(), ErrorTip::None));
}

#[test]
fn test_error_tip_display() {
    let tip = ErrorTip::Suggestion("Try this instead".to_string());
    assert_eq!(tip.to_string(), "Try this instead");

    let tip = ErrorTip::None;
    assert_eq!(tip.to_string(), "");
}

#[test]
fn test_config_error_display() {
    assert_eq!(
        ConfigError::ZeroTabWidth.to_string(),
        "tab width must be at least 1"
    );
    assert_eq!(
        ConfigError::AmbiguousWord {
            word: "null".to_string()
        }
        .to_string(),
        "\"null\" is both a keyword and a literal word"
    );
    assert_eq!(
        ConfigError::TabWidthTooLarge {
            tab_width: 100,
            max: 64
        }
        .to_string(),
        "tab width 100 is larger than 64"
    );
    assert_eq!(
        ConfigError::UnreachableGrouping { grouping: 'a' }.to_string(),
        "grouping 'a' can never match, it is part of a word or whitespace"
    );
}
