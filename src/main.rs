use std::{
    fs,
    path::{Path, PathBuf},
    process::ExitCode,
    time::Instant,
};

use anyhow::{Context, Result};
use clap::Parser;
use lexer::{
    errors::errors::{Error, ErrorTip},
    get_line_at_position,
    lexer::{
        config::{Grammar, LexerConfig, RecoveryPolicy},
        lexer::Tokenizer,
    },
};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Tokenize a source file and print its tokens.
#[derive(Parser, Debug)]
#[command(name = "lexer", version)]
struct Cli {
    /// Source file to tokenize
    file: PathBuf,

    /// JSON lexer config; the built-in standard tables are used when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Report every lexical error instead of stopping at the first one
    #[arg(long)]
    collect: bool,

    /// Columns a tab advances by
    #[arg(long)]
    tab_width: Option<usize>,

    /// Print tokens as JSON lines
    #[arg(long)]
    json: bool,
}

fn main() -> Result<ExitCode> {
    init_tracing();

    let cli = Cli::parse();

    let source = fs::read_to_string(&cli.file)
        .with_context(|| format!("failed to read {}", cli.file.display()))?;

    let mut config = match &cli.config {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            LexerConfig::from_json(&json)?
        }
        None => LexerConfig::standard(),
    };

    if let Some(tab_width) = cli.tab_width {
        config.tab_width = tab_width;
    }
    if cli.collect {
        config.recovery = RecoveryPolicy::Collect;
    }

    let grammar = Grammar::new(&config)?;

    let start = Instant::now();
    let output = match Tokenizer::new(&source, &grammar).tokenize() {
        Ok(output) => output,
        Err(error) => {
            display_error(&error, &cli.file, &source, grammar.tab_width());
            return Ok(ExitCode::FAILURE);
        }
    };
    info!(elapsed = ?start.elapsed(), tokens = output.tokens.len(), "tokenized");

    for token in &output.tokens {
        if cli.json {
            println!("{}", serde_json::to_string(token)?);
        } else {
            println!("{}", token);
        }
    }

    for error in &output.errors {
        display_error(error, &cli.file, &source, grammar.tab_width());
    }

    Ok(if output.is_clean() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Installs a stderr subscriber when `LEXER_LOG` or `RUST_LOG` is set.
fn init_tracing() {
    let filter = match std::env::var("LEXER_LOG") {
        Ok(directives) => EnvFilter::builder().parse_lossy(directives),
        Err(_) if std::env::var("RUST_LOG").is_ok() => EnvFilter::from_default_env(),
        Err(_) => return,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn display_error(error: &Error, file: &Path, source: &str, tab_width: usize) {
    /*
        Error: IllegalCharacter (`@` is not part of any ...)
        -> main.src:20:9
           |
        20 | let a = @;
           | --------^
    */

    let position = error.get_position();

    let line_str = position.line.to_string();
    let padding = line_str.len() + 2;

    if let ErrorTip::None = error.get_tip() {
        eprintln!("Error: {}", error.get_error_name());
    } else {
        eprintln!("Error: {} ({})", error.get_error_name(), error.get_tip());
    }
    eprintln!("-> {}:{}", file.display(), position);
    eprintln!("{:>padding$}", "|");

    let Some(line_text) = get_line_at_position(source, position) else {
        return;
    };

    // Columns count a tab as `tab_width`, so the printed line must too
    let expanded = expand_tabs(line_text, tab_width);
    let (line_text_removed, removed_columns) = remove_starting_whitespace(&expanded);
    eprintln!("{} | {}", line_str, line_text_removed.trim_end());

    let arrows = position.column.saturating_sub(removed_columns).max(1);

    eprintln!("{:>padding$} {:->arrows$}", "|", "^");
}

fn expand_tabs(line: &str, tab_width: usize) -> String {
    let mut expanded = String::with_capacity(line.len());
    for c in line.chars() {
        if c == '\t' {
            expanded.extend(std::iter::repeat(' ').take(tab_width));
        } else {
            expanded.push(c);
        }
    }

    expanded
}

fn remove_starting_whitespace(string: &str) -> (&str, usize) {
    let trimmed = string.trim_start_matches(' ');
    (trimmed, string.len() - trimmed.len())
}

#[cfg(test)]
mod tests {
    use super::{expand_tabs, remove_starting_whitespace};

    #[test]
    fn test_caret_column_matches_printed_line_with_inner_tab() {
        // `@` sits after a tab that is not leading whitespace
        let expanded = expand_tabs("\tx\t@", 4);
        assert_eq!(expanded, "    x    @");

        let (printed, removed) = remove_starting_whitespace(&expanded);
        assert_eq!((printed, removed), ("x    @", 4));

        // Tokenizer column of `@` is 1 + 4 + 1 + 4 = 10
        let arrows = 10 - removed;
        assert_eq!(printed.chars().nth(arrows - 1), Some('@'));
    }

    #[test]
    fn test_expand_tabs_keeps_other_characters() {
        assert_eq!(expand_tabs("a\tb", 2), "a  b");
        assert_eq!(expand_tabs("héllo", 8), "héllo");
    }
}
