//! Lexer for documentation comments.
//!
//! Splits a `/** ... */` block into tags, variables, words and line breaks
//! using the logos library. Leading `*` decoration and horizontal
//! whitespace are dropped.

use std::ops::Range;

use logos::Logos;

/// Token produced by the doc comment lexer
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\x0C]+")]
pub enum DocToken {
    /// `/**`
    #[token("/**")]
    Open,

    /// `*/`
    #[token("*/")]
    Close,

    /// Line decoration
    #[token("*", logos::skip)]
    Star,

    /// End of a line
    #[token("\n")]
    Newline,

    /// `@name`, e.g. `@property-read`
    #[regex(r"@[A-Za-z][A-Za-z0-9_\-]*", slice, priority = 5)]
    Tag(String),

    /// `$name`
    #[regex(r"\$[A-Za-z_][A-Za-z0-9_]*", slice, priority = 5)]
    Variable(String),

    /// Anything else up to whitespace
    #[regex(r"[^\s*]+", slice, priority = 1)]
    Word(String),
}

fn slice(lex: &mut logos::Lexer<'_, DocToken>) -> Option<String> {
    Some(lex.slice().to_string())
}

/// Tokenize a doc comment, returning tokens with their byte ranges.
///
/// Characters no rule accepts (stray control characters) are dropped.
pub fn tokenize(source: &str) -> Vec<(DocToken, Range<usize>)> {
    let mut lexer = DocToken::lexer(source);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        if let Ok(token) = result {
            tokens.push((token, lexer.span()));
        }
    }

    tokens
}
