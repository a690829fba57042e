// src/engine/mod.rs
//! Lexical question answering over one loaded document.
//!
//! A query runs keywords -> section scores -> excerpts. Nothing here mutates
//! the `Document`, so one `Engine` can serve any number of queries, from any
//! number of threads.

pub mod excerpt;
pub mod keywords;
pub mod scorer;

use serde::Serialize;
use std::collections::BTreeSet;

use crate::config::Settings;
use crate::document::Document;
use excerpt::select_excerpt;
use keywords::{clean_question, extract_terms};
use scorer::{rank, score_sections};

pub const NO_DOCUMENT_MESSAGE: &str = "No document loaded. Please load a PDF or text file first.";
pub const NO_MATCH_MESSAGE: &str = "I couldn't find relevant information about that in the document.";
pub const NO_DIRECT_ANSWER_MESSAGE: &str =
    "I couldn't find a direct answer, but these sections might help.";

/// Result of one question. `sources` is ascending and duplicate-free.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Answer {
    pub answer: String,
    pub sources: Vec<usize>,
}

impl Answer {
    fn fallback(message: &str) -> Self {
        Self { answer: message.to_string(), sources: Vec::new() }
    }
}

/// How an answer came about, for callers that should not match on message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerStatus {
    Answered,
    NoDocument,
    NoTerms,
    NoMatch,
    NoExcerpt,
}

#[derive(Debug, Clone)]
pub struct Engine {
    num_results: usize,
}

impl Engine {
    /// `num_results` is how many top sections feed one answer (1 for concise,
    /// 3 for broad). Zero is treated as one.
    pub fn new(num_results: usize) -> Self {
        Self { num_results: num_results.max(1) }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.num_results)
    }

    pub fn num_results(&self) -> usize {
        self.num_results
    }

    pub fn answer_question(&self, document: &Document, question: &str) -> Answer {
        self.answer_with_status(document, question).0
    }

    pub fn answer_with_status(&self, document: &Document, question: &str) -> (Answer, AnswerStatus) {
        if !document.is_loaded() {
            tracing::warn!("Question asked before any document was loaded");
            return (Answer::fallback(NO_DOCUMENT_MESSAGE), AnswerStatus::NoDocument);
        }

        let terms = extract_terms(question);
        if terms.is_empty() {
            tracing::debug!("No scorable terms in question '{}'", question);
            return (Answer::fallback(NO_MATCH_MESSAGE), AnswerStatus::NoTerms);
        }

        let cleaned = clean_question(question);
        let candidates = score_sections(document.sections(), &terms, &cleaned);
        tracing::debug!("{} of {} sections scored above zero", candidates.len(), document.sections().len());
        if candidates.is_empty() {
            return (Answer::fallback(NO_MATCH_MESSAGE), AnswerStatus::NoMatch);
        }

        let mut excerpts = Vec::new();
        let mut cited = BTreeSet::new();
        let mut retained = BTreeSet::new();
        for candidate in rank(candidates).into_iter().take(self.num_results) {
            tracing::debug!("Selected section {} (score {})", candidate.ordinal, candidate.score);
            retained.insert(candidate.ordinal);
            let excerpt = select_excerpt(&candidate.clean_text, &terms);
            // A section with no usable excerpt is dropped from the answer
            if !excerpt.is_empty() {
                cited.insert(candidate.ordinal);
                excerpts.push(excerpt);
            }
        }

        if excerpts.is_empty() {
            let sources: Vec<usize> = retained.into_iter().collect();
            tracing::debug!("No excerpt survived for sections {:?}", sources);
            return (
                Answer { answer: NO_DIRECT_ANSWER_MESSAGE.to_string(), sources },
                AnswerStatus::NoExcerpt,
            );
        }

        let sources: Vec<usize> = cited.into_iter().collect();
        (Answer { answer: excerpts.join(" "), sources }, AnswerStatus::Answered)
    }
}
