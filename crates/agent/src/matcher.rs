//! Vocabulary matching over normalized question text.
//!
//! Terms come in three shapes:
//! - a word (`"promedio"`) matches that whole word,
//! - a stem ending in `*` (`"causad*"`) matches any word starting with it,
//! - several words (`"how many"`, `"para que sirv*"`) match as a phrase.
//!
//! Matching is accent- and case-insensitive.

use cesantias_records::text::fold_text;

/// A question prepared for vocabulary matching.
#[derive(Debug, Clone)]
pub struct Question {
    /// Folded text with punctuation intact (used for number extraction)
    folded: String,
    /// Folded words separated by single spaces, padded with a leading and
    /// trailing space so that every word is delimited on both sides
    padded: String,
}

impl Question {
    pub fn new(raw: &str) -> Self {
        let folded = fold_text(raw);
        let words: Vec<&str> = folded
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect();
        let padded = format!(" {} ", words.join(" "));

        Self { folded, padded }
    }

    /// Folded text including punctuation.
    pub fn folded(&self) -> &str {
        &self.folded
    }

    /// Whether a single vocabulary term occurs.
    pub fn has_term(&self, term: &str) -> bool {
        let term = fold_text(term);
        match term.strip_suffix('*') {
            Some(stem) => self.padded.contains(&format!(" {}", stem)),
            None => self.padded.contains(&format!(" {} ", term)),
        }
    }

    /// Whether any of the terms occurs.
    pub fn has_any<S: AsRef<str>>(&self, terms: &[S]) -> bool {
        terms.iter().any(|t| self.has_term(t.as_ref()))
    }

    /// Number of distinct terms that occur.
    pub fn count_matches<S: AsRef<str>>(&self, terms: &[S]) -> usize {
        terms.iter().filter(|t| self.has_term(t.as_ref())).count()
    }
}
