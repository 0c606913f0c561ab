//! Grammar tables handed to a tokenizer.
//!
//! `LexerConfig` is the plain, serializable description of a language's
//! lexical surface. `Grammar` is the compiled, read-only form a `Tokenizer`
//! borrows; one grammar can back any number of tokenizers, including ones
//! running on other threads.

use std::collections::{BTreeSet, HashSet};

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::errors::ConfigError;

use super::{
    lexer::{is_identifier_continue, is_identifier_start},
    tokens::TokenKind,
};

pub const DEFAULT_NUMBER_PATTERN: &str = "[0-9]+(\\.[0-9]+)?";
pub const DEFAULT_TAB_WIDTH: usize = 4;
pub const MAX_TAB_WIDTH: usize = 64;

lazy_static! {
    static ref STANDARD_GRAMMAR: Grammar =
        Grammar::new(&LexerConfig::standard()).expect("standard lexer config is valid");
}

/// What the stream driver does when `next_token` fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecoveryPolicy {
    /// Stop at the first error and return it.
    #[default]
    Abort,
    /// Record every error, skip the offending character and keep going.
    Collect,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LexerConfig {
    pub keywords: BTreeSet<String>,
    /// Identifier-shaped words that are literals, such as `true`.
    pub literal_words: BTreeSet<String>,
    pub operators: Vec<String>,
    pub groupings: BTreeSet<char>,
    pub tab_width: usize,
    /// Prefix of a comment running to the end of the line. An empty prefix
    /// disables comments.
    pub line_comment: Option<String>,
    pub number_pattern: String,
    pub string_literals: bool,
    pub char_literals: bool,
    pub recovery: RecoveryPolicy,
}

impl Default for LexerConfig {
    fn default() -> Self {
        LexerConfig {
            keywords: BTreeSet::new(),
            literal_words: BTreeSet::new(),
            operators: vec![],
            groupings: BTreeSet::new(),
            tab_width: DEFAULT_TAB_WIDTH,
            line_comment: Some(String::from("//")),
            number_pattern: String::from(DEFAULT_NUMBER_PATTERN),
            string_literals: true,
            char_literals: true,
            recovery: RecoveryPolicy::default(),
        }
    }
}

impl LexerConfig {
    pub fn from_json(json: &str) -> Result<LexerConfig, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Tables for a small C-like language.
    pub fn standard() -> LexerConfig {
        LexerConfig::default()
            .with_keywords([
                "let", "func", "if", "else", "for", "while", "return", "break", "switch", "case",
                "default", "continue", "static", "const", "null", "int", "char", "bool", "enum",
                "float", "union", "string", "struct", "import",
            ])
            .with_literal_words(["true", "false"])
            .with_operators([
                "+", "-", "*", "**", "/", "%", "=", "+=", "-=", "*=", "/=", "%=", "++", "--", "<",
                ">", "<=", ">=", "==", "!=", "&&", "||", "!", "&", "|", "^", "~", "&=", "|=", "^=",
                "<<", ">>", "<<=", ">>=", "->", ".", ",", ":", ";", "?", "#",
            ])
            .with_groupings(['(', ')', '{', '}', '[', ']'])
    }

    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords.extend(keywords.into_iter().map(Into::into));
        self
    }

    pub fn with_literal_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.literal_words.extend(words.into_iter().map(Into::into));
        self
    }

    pub fn with_operators<I, S>(mut self, operators: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.operators.extend(operators.into_iter().map(Into::into));
        self
    }

    pub fn with_groupings<I>(mut self, groupings: I) -> Self
    where
        I: IntoIterator<Item = char>,
    {
        self.groupings.extend(groupings);
        self
    }

    pub fn with_tab_width(mut self, tab_width: usize) -> Self {
        self.tab_width = tab_width;
        self
    }

    pub fn with_line_comment(mut self, prefix: Option<&str>) -> Self {
        self.line_comment = prefix.map(String::from);
        self
    }

    pub fn with_recovery(mut self, recovery: RecoveryPolicy) -> Self {
        self.recovery = recovery;
        self
    }
}

/// Compiled, immutable lookup tables.
#[derive(Debug, Clone)]
pub struct Grammar {
    keywords: HashSet<String>,
    literal_words: HashSet<String>,
    // Longest first, so the first prefix hit is the longest match.
    operators: Vec<String>,
    groupings: HashSet<char>,
    tab_width: usize,
    line_comment: Option<String>,
    number: Regex,
    string_literals: bool,
    char_literals: bool,
    recovery: RecoveryPolicy,
}

impl Grammar {
    pub fn new(config: &LexerConfig) -> Result<Grammar, ConfigError> {
        if config.tab_width == 0 {
            return Err(ConfigError::ZeroTabWidth);
        }

        if config.tab_width > MAX_TAB_WIDTH {
            return Err(ConfigError::TabWidthTooLarge {
                tab_width: config.tab_width,
                max: MAX_TAB_WIDTH,
            });
        }

        for operator in &config.operators {
            match operator.chars().next() {
                None => return Err(ConfigError::EmptyOperator),
                // Words and trivia are consumed before operators are tried
                Some(ch) if is_identifier_start(ch) || ch.is_whitespace() => {
                    return Err(ConfigError::UnreachableOperator {
                        operator: operator.clone(),
                    });
                }
                Some(_) => {}
            }
        }

        if let Some(word) = config
            .keywords
            .iter()
            .chain(&config.literal_words)
            .find(|word| !is_word(word))
        {
            return Err(ConfigError::NotAWord { word: word.clone() });
        }

        if let Some(word) = config.keywords.intersection(&config.literal_words).next() {
            return Err(ConfigError::AmbiguousWord { word: word.clone() });
        }

        if let Some(&grouping) = config
            .groupings
            .iter()
            .find(|ch| is_identifier_continue(**ch) || ch.is_whitespace())
        {
            return Err(ConfigError::UnreachableGrouping { grouping });
        }

        let number = Regex::new(&format!("^(?:{})", config.number_pattern)).map_err(|source| {
            ConfigError::InvalidNumberPattern {
                pattern: config.number_pattern.clone(),
                source,
            }
        })?;

        let mut operators = config.operators.clone();
        operators.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        operators.dedup();

        debug!(
            keywords = config.keywords.len(),
            literal_words = config.literal_words.len(),
            operators = operators.len(),
            groupings = config.groupings.len(),
            "compiled grammar"
        );

        Ok(Grammar {
            keywords: config.keywords.iter().cloned().collect(),
            literal_words: config.literal_words.iter().cloned().collect(),
            operators,
            groupings: config.groupings.iter().copied().collect(),
            tab_width: config.tab_width,
            line_comment: config.line_comment.clone().filter(|prefix| !prefix.is_empty()),
            number,
            string_literals: config.string_literals,
            char_literals: config.char_literals,
            recovery: config.recovery,
        })
    }

    /// Shared grammar built from `LexerConfig::standard()`.
    pub fn standard() -> &'static Grammar {
        &STANDARD_GRAMMAR
    }

    /// Classifies an already scanned identifier-shaped word.
    pub fn classify_word(&self, word: &str) -> TokenKind {
        if self.literal_words.contains(word) {
            TokenKind::Literal
        } else if self.keywords.contains(word) {
            TokenKind::Keyword
        } else {
            TokenKind::Identifier
        }
    }

    /// Longest configured operator that prefixes `rest`.
    pub fn match_operator(&self, rest: &str) -> Option<&str> {
        self.operators
            .iter()
            .find(|operator| rest.starts_with(operator.as_str()))
            .map(String::as_str)
    }

    /// Numeric literal at the very start of `rest`, if any.
    pub fn match_number<'r>(&self, rest: &'r str) -> Option<&'r str> {
        self.number
            .find(rest)
            .filter(|found| found.start() == 0 && !found.is_empty())
            .map(|found| found.as_str())
    }

    pub fn is_grouping(&self, ch: char) -> bool {
        self.groupings.contains(&ch)
    }

    pub fn tab_width(&self) -> usize {
        self.tab_width
    }

    pub fn line_comment(&self) -> Option<&str> {
        self.line_comment.as_deref()
    }

    pub fn string_literals(&self) -> bool {
        self.string_literals
    }

    pub fn char_literals(&self) -> bool {
        self.char_literals
    }

    pub fn recovery(&self) -> RecoveryPolicy {
        self.recovery
    }
}

fn is_word(word: &str) -> bool {
    let mut chars = word.chars();
    chars.next().is_some_and(is_identifier_start) && chars.all(is_identifier_continue)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_grammar_tables() {
        let grammar = Grammar::standard();

        assert_eq!(grammar.classify_word("while"), TokenKind::Keyword);
        assert_eq!(grammar.classify_word("true"), TokenKind::Literal);
        assert_eq!(grammar.classify_word("whilst"), TokenKind::Identifier);
        assert!(grammar.is_grouping('['));
        assert!(!grammar.is_grouping('<'));
        assert_eq!(grammar.tab_width(), 4);
        assert_eq!(grammar.recovery(), RecoveryPolicy::Abort);
    }

    #[test]
    fn test_match_operator_prefers_longest() {
        let grammar = Grammar::standard();

        assert_eq!(grammar.match_operator("<<= 1"), Some("<<="));
        assert_eq!(grammar.match_operator("<< 1"), Some("<<"));
        assert_eq!(grammar.match_operator("<x"), Some("<"));
        assert_eq!(grammar.match_operator("@"), None);
    }

    #[test]
    fn test_match_number_is_anchored() {
        let grammar = Grammar::standard();

        assert_eq!(grammar.match_number("3.14 + x"), Some("3.14"));
        assert_eq!(grammar.match_number("42;"), Some("42"));
        assert_eq!(grammar.match_number("x42"), None);
    }

    #[test]
    fn test_empty_number_match_is_ignored() {
        let config = LexerConfig {
            number_pattern: String::from("[0-9]*"),
            ..Default::default()
        };
        let grammar = Grammar::new(&config).unwrap();

        assert_eq!(grammar.match_number("abc"), None);
        assert_eq!(grammar.match_number("12abc"), Some("12"));
    }

    #[test]
    fn test_rejects_zero_tab_width() {
        let config = LexerConfig::default().with_tab_width(0);
        assert!(matches!(Grammar::new(&config), Err(ConfigError::ZeroTabWidth)));
    }

    #[test]
    fn test_rejects_huge_tab_width() {
        let config = LexerConfig::default().with_tab_width(usize::MAX);
        match Grammar::new(&config) {
            Err(ConfigError::TabWidthTooLarge { tab_width, max }) => {
                assert_eq!((tab_width, max), (usize::MAX, MAX_TAB_WIDTH))
            }
            other => panic!("expected TabWidthTooLarge, got {:?}", other),
        }

        let config = LexerConfig::default().with_tab_width(MAX_TAB_WIDTH);
        assert_eq!(Grammar::new(&config).unwrap().tab_width(), MAX_TAB_WIDTH);
    }

    #[test]
    fn test_rejects_word_shaped_operator() {
        for operator in ["and", "_x", " +"] {
            let config = LexerConfig::default().with_operators(["+", operator]);

            match Grammar::new(&config) {
                Err(ConfigError::UnreachableOperator { operator: found }) => {
                    assert_eq!(found, operator)
                }
                other => panic!("expected UnreachableOperator, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_rejects_keyword_that_is_not_a_word() {
        let config = LexerConfig::default().with_keywords(["if", "c++"]);
        assert!(matches!(
            Grammar::new(&config),
            Err(ConfigError::NotAWord { word }) if word == "c++"
        ));

        let config = LexerConfig::default().with_literal_words(["1st"]);
        assert!(matches!(
            Grammar::new(&config),
            Err(ConfigError::NotAWord { word }) if word == "1st"
        ));
    }

    #[test]
    fn test_rejects_unreachable_grouping() {
        for grouping in ['a', '7', '_', ' ', '\n'] {
            let config = LexerConfig::default().with_groupings(['(', grouping]);
            assert!(matches!(
                Grammar::new(&config),
                Err(ConfigError::UnreachableGrouping { grouping: found }) if found == grouping
            ));
        }
    }

    #[test]
    fn test_rejects_empty_operator() {
        let config = LexerConfig::default().with_operators(["+", ""]);
        assert!(matches!(Grammar::new(&config), Err(ConfigError::EmptyOperator)));
    }

    #[test]
    fn test_rejects_keyword_that_is_also_literal_word() {
        let config = LexerConfig::default()
            .with_keywords(["null"])
            .with_literal_words(["null"]);

        match Grammar::new(&config) {
            Err(ConfigError::AmbiguousWord { word }) => assert_eq!(word, "null"),
            other => panic!("expected AmbiguousWord, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_invalid_number_pattern() {
        let config = LexerConfig {
            number_pattern: String::from("[0-9"),
            ..Default::default()
        };

        assert!(matches!(
            Grammar::new(&config),
            Err(ConfigError::InvalidNumberPattern { .. })
        ));
    }

    #[test]
    fn test_empty_comment_prefix_disables_comments() {
        let grammar = Grammar::new(&LexerConfig::default().with_line_comment(Some(""))).unwrap();
        assert_eq!(grammar.line_comment(), None);
    }

    #[test]
    fn test_config_from_partial_json() {
        let config = LexerConfig::from_json(
            r#"{
                "keywords": ["if"],
                "operators": ["==", "="],
                "groupings": ["{", "}"],
                "recovery": "collect"
            }"#,
        )
        .unwrap();

        assert!(config.keywords.contains("if"));
        assert_eq!(config.operators, vec!["==", "="]);
        assert!(config.groupings.contains(&'{'));
        assert_eq!(config.recovery, RecoveryPolicy::Collect);
        assert_eq!(config.tab_width, DEFAULT_TAB_WIDTH);
        assert_eq!(config.line_comment.as_deref(), Some("//"));
    }

    #[test]
    fn test_config_from_bad_json() {
        assert!(matches!(
            LexerConfig::from_json("{ \"tab_width\": -1 }"),
            Err(ConfigError::Json(_))
        ));
    }
}
