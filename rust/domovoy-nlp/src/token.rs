//! Normalization layer — turning any title or phrase into stemmed tokens.
//!
//! Device titles, location titles, command triggers and incoming phrases all
//! go through the same pipeline so that they can be compared token by token:
//!
//! 1. every character that is not a letter or a space becomes a space;
//! 2. the text is lowercased and `ё` is folded into `е`;
//! 3. the text is split on spaces;
//! 4. each word is reduced by the Snowball Russian stemmer until it stops
//!    changing, and stems of one character or less are dropped.
//!
//! ```
//! use domovoy_nlp::token::normalize;
//!
//! let tokens = normalize("Включи лампу в кухне!");
//! assert_eq!(tokens.to_string(), "включ ламп кухн");
//! ```

use std::fmt;
use std::sync::OnceLock;

use rust_stemmers::{Algorithm, Stemmer};

fn stemmer() -> &'static Stemmer {
    static STEMMER: OnceLock<Stemmer> = OnceLock::new();
    STEMMER.get_or_init(|| Stemmer::create(Algorithm::Russian))
}

/// An ordered sequence of normalized word stems.
///
/// Order is kept for display, but matching treats the sequence as a multiset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Tokens(Vec<String>);

impl Tokens {
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, token: &str) -> bool {
        self.0.iter().any(|t| t == token)
    }

    /// Drop every token for which `keep` returns false.
    pub fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.0.retain(|t| keep(t));
    }
}

impl From<Vec<String>> for Tokens {
    fn from(tokens: Vec<String>) -> Self {
        Tokens(tokens)
    }
}

impl fmt::Display for Tokens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, token) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{token}")?;
        }
        Ok(())
    }
}

/// Fold case and the composed `ё` so that spelling variants compare equal.
fn fold(c: char) -> impl Iterator<Item = char> {
    c.to_lowercase().map(|c| if c == 'ё' { 'е' } else { c })
}

/// Stem a single, already cleaned word.
pub fn stem(word: &str) -> String {
    let lowered: String = word.chars().flat_map(fold).collect();
    stem_fully(&lowered)
}

/// Snowball is not idempotent on every word ("сделай" → "сдела" → "сдел"),
/// so stem until the word stops changing. Each pass only removes characters.
fn stem_fully(word: &str) -> String {
    let mut current = word.to_string();
    loop {
        let next = stemmer().stem(&current);
        if next == current {
            return current;
        }
        current = next.into_owned();
    }
}

/// Normalize arbitrary text into stemmed tokens.
///
/// Pure and deterministic; empty or symbol-only input yields empty tokens.
pub fn normalize(text: &str) -> Tokens {
    let cleaned: String = text
        .chars()
        .flat_map(|c| {
            let c = if c.is_alphabetic() || c == ' ' { c } else { ' ' };
            fold(c)
        })
        .collect();

    cleaned
        .split(' ')
        .filter(|word| !word.is_empty())
        .map(stem_fully)
        .filter(|stem| stem.chars().count() > 1)
        .collect::<Vec<_>>()
        .into()
}
