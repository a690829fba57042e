// src/engine/excerpt.rs
use crate::engine::keywords::Terms;

/// Sections shorter than this many characters are returned whole.
pub const WHOLE_SECTION_LIMIT: usize = 1000;

/// Picks the part of a section that goes into the answer.
///
/// Short sections come back whole. Longer ones are split on `.` and the first
/// sentence with the highest term count wins. An empty string means no
/// sentence mentions any term.
///
/// Splitting is deliberately naive: abbreviations and decimals break
/// sentences too.
pub fn select_excerpt(clean_text: &str, terms: &Terms) -> String {
    if clean_text.chars().count() < WHOLE_SECTION_LIMIT {
        return clean_text.to_string();
    }

    let mut best_sentence = "";
    let mut best_score = 0;
    for sentence in clean_text.split('.') {
        let lower = sentence.to_lowercase();
        let score: usize = terms.iter().map(|t| lower.matches(t).count()).sum();
        if score > best_score {
            best_score = score;
            best_sentence = sentence;
        }
    }

    best_sentence.trim().to_string()
}
