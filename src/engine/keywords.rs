// src/engine/keywords.rs

use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Tokens this short or shorter never become terms.
const MIN_TERM_LEN: usize = 3;

static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "the", "and", "for", "are", "what", "who", "when", "where", "why", "how", "did", "was",
        "is", "of", "in", "to", "a", "an", "be", "by", "do", "it", "or", "as",
    ]
    .into_iter()
    .collect()
});

/// The significant terms of one question.
///
/// Duplicates collapse on insertion; first-seen order is kept so that
/// scoring and logging are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Terms(Vec<String>);

impl Terms {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    fn insert(&mut self, term: &str) {
        if !self.0.iter().any(|t| t == term) {
            self.0.push(term.to_string());
        }
    }
}

impl<'a> FromIterator<&'a str> for Terms {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut terms = Terms::default();
        for term in iter {
            terms.insert(term);
        }
        terms
    }
}

/// Keeps alphanumeric and whitespace characters, dropping everything else
/// without inserting a separator ("don't" becomes "dont").
pub fn strip_punctuation(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect()
}

/// Lowercases the question, drops one trailing `?`, trims, then strips
/// punctuation. Stop words are kept; this is the form compared against
/// section headers.
pub fn clean_question(question: &str) -> String {
    let lower = question.to_lowercase();
    let without_mark = lower.strip_suffix('?').unwrap_or(&lower);
    strip_punctuation(without_mark.trim())
}

/// Extracts the scorable terms of a question.
///
/// An empty result is not an error: it means the question had nothing
/// worth matching (only stop words or very short tokens).
pub fn extract_terms(question: &str) -> Terms {
    let cleaned = clean_question(question);
    let terms: Terms = cleaned
        .split_whitespace()
        .filter(|token| token.chars().count() >= MIN_TERM_LEN)
        .filter(|token| !STOP_WORDS.contains(token))
        .collect();

    tracing::debug!("Extracted {} term(s) from question: {:?}", terms.len(), terms);
    terms
}
