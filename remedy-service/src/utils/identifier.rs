//! Normalization and validation of user-supplied identifiers (disease names).
//!
//! A raw path segment such as `Common_Cold` is turned into the canonical
//! lookup key `common cold` before it reaches the record store, the summary
//! prompt, or anything else downstream. Normalization is a pure function of
//! the input and the [`ValidationConfig`].

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Unicode word characters, whitespace and hyphens.
static UNICODE_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\w\s-]+$").expect("Failed to compile identifier pattern"));

/// Default separator characters collapsed to a single space.
pub const DEFAULT_SEPARATORS: [char; 2] = ['_', '-'];

/// Default maximum length, in characters, of a normalized identifier.
pub const DEFAULT_MAX_LENGTH: usize = 50;

/// Why a raw identifier was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum IdentifierError {
    #[error("Name is empty")]
    Empty,

    #[error("Invalid characters in name")]
    InvalidCharacters,

    #[error("Name too long (max {max} chars)")]
    TooLong { max: usize },
}

/// Which characters may remain after normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CharacterPolicy {
    /// `[\w\s-]` with Unicode semantics: accented and non-Latin letters pass.
    #[default]
    UnicodeWord,
    /// ASCII letters, ASCII digits and the space character only.
    AsciiAlphanumeric,
}

impl CharacterPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            CharacterPolicy::UnicodeWord => "unicode_word",
            CharacterPolicy::AsciiAlphanumeric => "ascii_alphanumeric",
        }
    }

    fn permits(&self, value: &str) -> bool {
        match self {
            CharacterPolicy::UnicodeWord => UNICODE_WORD.is_match(value),
            CharacterPolicy::AsciiAlphanumeric => value
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == ' '),
        }
    }
}

impl FromStr for CharacterPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "unicode_word" => Ok(CharacterPolicy::UnicodeWord),
            "ascii_alphanumeric" => Ok(CharacterPolicy::AsciiAlphanumeric),
            other => Err(format!(
                "unknown character policy '{}' (expected unicode_word or ascii_alphanumeric)",
                other
            )),
        }
    }
}

/// How the record store compares a normalized identifier against stored names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMode {
    /// Case-insensitive equality with the whole stored name.
    #[default]
    Exact,
    /// Case-insensitive substring match: `cold` also finds `common cold`.
    Contains,
}

impl MatchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchMode::Exact => "exact",
            MatchMode::Contains => "contains",
        }
    }

    /// Build an `ILIKE ... ESCAPE '\'` pattern for `identifier`.
    ///
    /// LIKE metacharacters in the identifier are escaped so they always match
    /// literally; only `Contains` adds wildcards.
    pub fn like_pattern(&self, identifier: &NormalizedIdentifier) -> String {
        let escaped = escape_like(identifier.as_str());
        match self {
            MatchMode::Exact => escaped,
            MatchMode::Contains => format!("%{}%", escaped),
        }
    }
}

impl FromStr for MatchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "exact" => Ok(MatchMode::Exact),
            "contains" => Ok(MatchMode::Contains),
            other => Err(format!(
                "unknown match mode '{}' (expected exact or contains)",
                other
            )),
        }
    }
}

fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Options controlling [`normalize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationConfig {
    pub separator_chars: Vec<char>,
    pub character_policy: CharacterPolicy,
    pub max_length: usize,
    pub match_mode: MatchMode,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            separator_chars: DEFAULT_SEPARATORS.to_vec(),
            character_policy: CharacterPolicy::default(),
            max_length: DEFAULT_MAX_LENGTH,
            match_mode: MatchMode::default(),
        }
    }
}

/// A lowercase, trimmed, separator-free identifier that passed validation.
///
/// Only [`normalize`] constructs one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct NormalizedIdentifier(String);

impl NormalizedIdentifier {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for NormalizedIdentifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NormalizedIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Normalize and validate a raw identifier.
///
/// Every separator character becomes one space, surrounding whitespace is
/// trimmed, and the result is lowercased. The result is then rejected if it
/// is empty, contains characters the active [`CharacterPolicy`] forbids, or is
/// longer than `max_length` characters, in that order.
pub fn normalize(
    raw: &str,
    config: &ValidationConfig,
) -> Result<NormalizedIdentifier, IdentifierError> {
    let replaced: String = raw
        .chars()
        .map(|c| {
            if config.separator_chars.contains(&c) {
                ' '
            } else {
                c
            }
        })
        .collect();
    let cleaned = replaced.trim().to_lowercase();

    if cleaned.is_empty() {
        return Err(IdentifierError::Empty);
    }
    if !config.character_policy.permits(&cleaned) {
        return Err(IdentifierError::InvalidCharacters);
    }
    if cleaned.chars().count() > config.max_length {
        return Err(IdentifierError::TooLong {
            max: config.max_length,
        });
    }

    Ok(NormalizedIdentifier(cleaned))
}
