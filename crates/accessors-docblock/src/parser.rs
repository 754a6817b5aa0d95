//! Property tag parser
//!
//! Recognizes, case-insensitively:
//!
//! ```text
//! @property        Type $name [description]   readable and writable
//! @property-read   Type $name [description]   readable
//! @property-write  Type $name [description]   writable
//! ```
//!
//! A tag whose line has no `$variable` after the type is ignored, as are
//! all other tags. When a property is tagged more than once the last tag
//! wins.

use thiserror::Error;

use accessors_engine::{PolicyKind, PolicySet};

use crate::lexer::{tokenize, DocToken};

/// Doc comment errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DocBlockError {
    /// Comment does not start with `/**`
    #[error("not a doc comment: expected it to start with \"/**\"")]
    NotDocBlock,

    /// `/**` never closed
    #[error("unterminated doc comment")]
    Unterminated,
}

/// Access granted by a property tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    /// `@property`
    ReadWrite,
    /// `@property-read`
    Read,
    /// `@property-write`
    Write,
}

impl TagKind {
    fn from_tag(tag: &str) -> Option<Self> {
        match tag.to_ascii_lowercase().as_str() {
            "@property" => Some(TagKind::ReadWrite),
            "@property-read" => Some(TagKind::Read),
            "@property-write" => Some(TagKind::Write),
            _ => None,
        }
    }

    /// Policy switches this tag declares; only `get` and `set` are touched
    pub fn policy(self) -> PolicySet {
        match self {
            TagKind::ReadWrite => PolicySet::new()
                .with_flag(PolicyKind::Get, true)
                .with_flag(PolicyKind::Set, true),
            TagKind::Read => PolicySet::new().with_flag(PolicyKind::Get, true),
            TagKind::Write => PolicySet::new().with_flag(PolicyKind::Set, true),
        }
    }
}

/// A parsed property tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyTag {
    /// Tag kind
    pub kind: TagKind,
    /// Type annotation as written
    pub type_hint: String,
    /// Property name without the leading `$`
    pub name: String,
    /// Free text after the variable
    pub description: Option<String>,
}

/// Parsed doc comment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocBlock {
    tags: Vec<PropertyTag>,
}

impl DocBlock {
    /// Parse a `/** ... */` comment
    pub fn parse(comment: &str) -> Result<Self, DocBlockError> {
        let trimmed = comment.trim();
        if !trimmed.starts_with("/**") {
            return Err(DocBlockError::NotDocBlock);
        }
        if trimmed.len() < 5 || !trimmed.ends_with("*/") {
            return Err(DocBlockError::Unterminated);
        }

        let tokens = tokenize(trimmed);
        let mut tags = Vec::new();

        // split into lines; a tag only reads to the end of its line
        for line in tokens.split(|(t, _)| *t == DocToken::Newline) {
            let mut words = line.iter().map(|(t, _)| t).skip_while(|t| {
                matches!(t, DocToken::Open)
            });

            let Some(DocToken::Tag(tag)) = words.next() else {
                continue;
            };
            let Some(kind) = TagKind::from_tag(tag) else {
                continue;
            };

            let mut type_parts = Vec::new();
            let mut name = None;
            for token in words.by_ref() {
                match token {
                    DocToken::Variable(var) if !type_parts.is_empty() => {
                        name = Some(var[1..].to_string());
                        break;
                    }
                    DocToken::Word(word) => type_parts.push(word.as_str()),
                    _ => break,
                }
            }

            let Some(name) = name else {
                continue;
            };

            let description: Vec<&str> = words
                .filter_map(|t| match t {
                    DocToken::Word(w) | DocToken::Tag(w) | DocToken::Variable(w) => Some(w.as_str()),
                    _ => None,
                })
                .collect();

            tags.push(PropertyTag {
                kind,
                type_hint: type_parts.join(" "),
                name,
                description: (!description.is_empty()).then(|| description.join(" ")),
            });
        }

        Ok(Self { tags })
    }

    /// All recognized tags in order
    pub fn tags(&self) -> &[PropertyTag] {
        &self.tags
    }

    /// Last tag naming `property` (exact case)
    pub fn property(&self, property: &str) -> Option<&PropertyTag> {
        self.tags.iter().rev().find(|tag| tag.name == property)
    }

    /// Check if no property tags were found
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}
