// src/engine/scorer.rs

// --- Imports ---
use crate::document::Section;
use crate::engine::keywords::{strip_punctuation, Terms};

// --- Constants ---
// Header weights sit two orders of magnitude above body weights: headers in
// the source documents read like questions ("What is X?").
pub const EXACT_HEADER_SCORE: u32 = 1000;
const HEADER_NEAR_MATCH_BASE: u32 = 100;
const HEADER_NEAR_MATCH_PER_HIT: u32 = 50;
const HEADER_PARTIAL_PER_HIT: u32 = 30;
/// A term counts at most this many times towards the body score.
pub const BODY_HITS_CAP: u32 = 2;

// --- Data Structures ---
/// A section that scored above zero for the current query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredSection {
    pub ordinal: usize,
    pub clean_text: String, // whitespace-collapsed, original case
    pub score: u32,
}

/// Views of one section that every rule reads from.
#[derive(Debug, Clone)]
pub struct SectionView {
    pub clean_text: String,
    pub page_lower: String,
    pub header: String,
}

impl SectionView {
    pub fn new(text: &str) -> Self {
        let clean_text = collapse_whitespace(text);
        let page_lower = clean_text.to_lowercase();
        let header = section_header(&page_lower);
        Self { clean_text, page_lower, header }
    }
}

/// What a rule contributes, and whether later rules still run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleOutcome {
    Continue(u32),
    Stop(u32),
}

/// One row of the scoring decision table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreRule {
    /// Cleaned header equals the cleaned question: fixed bonus, nothing else counts.
    ExactHeader,
    /// Tiered bonus for terms found in the header.
    HeaderOverlap,
    /// Capped per-term occurrence count over the whole section.
    BodyFrequency,
}

/// Rules in evaluation order.
pub const SCORE_RULES: [ScoreRule; 3] = [
    ScoreRule::ExactHeader,
    ScoreRule::HeaderOverlap,
    ScoreRule::BodyFrequency,
];

impl ScoreRule {
    pub fn apply(&self, view: &SectionView, terms: &Terms, cleaned_question: &str) -> RuleOutcome {
        match self {
            ScoreRule::ExactHeader => {
                if view.header == cleaned_question {
                    RuleOutcome::Stop(EXACT_HEADER_SCORE)
                } else {
                    RuleOutcome::Continue(0)
                }
            }
            ScoreRule::HeaderOverlap => {
                let hits = terms.iter().filter(|t| view.header.contains(*t)).count() as u32;
                // At most one term missing. With zero or one term this always holds.
                if hits as usize + 1 >= terms.len() {
                    RuleOutcome::Continue(HEADER_NEAR_MATCH_BASE + HEADER_NEAR_MATCH_PER_HIT * hits)
                } else if hits > 0 {
                    RuleOutcome::Continue(HEADER_PARTIAL_PER_HIT * hits)
                } else {
                    RuleOutcome::Continue(0)
                }
            }
            ScoreRule::BodyFrequency => {
                let body: u32 = terms
                    .iter()
                    .map(|t| (view.page_lower.matches(t).count() as u32).min(BODY_HITS_CAP))
                    .sum();
                RuleOutcome::Continue(body)
            }
        }
    }
}

// --- Functions ---

/// Collapses every whitespace run into a single space and trims the ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// The leading clause of a section: text before the first `?`, or before the
/// first `.` when there is no `?`. Trimmed, then stripped to alphanumerics
/// and spaces.
pub fn section_header(page_lower: &str) -> String {
    let delimiter = if page_lower.contains('?') { '?' } else { '.' };
    let head = page_lower.split(delimiter).next().unwrap_or_default();
    strip_punctuation(head.trim())
}

/// Runs the rule table over one section.
pub fn score_section(view: &SectionView, terms: &Terms, cleaned_question: &str) -> u32 {
    let mut score = 0;
    for rule in SCORE_RULES {
        match rule.apply(view, terms, cleaned_question) {
            RuleOutcome::Continue(points) => score += points,
            RuleOutcome::Stop(points) => {
                score += points;
                break;
            }
        }
    }
    score
}

/// Scores every section and keeps those above zero, in document order.
pub fn score_sections(sections: &[Section], terms: &Terms, cleaned_question: &str) -> Vec<ScoredSection> {
    sections
        .iter()
        .filter_map(|section| {
            let view = SectionView::new(&section.text);
            let score = score_section(&view, terms, cleaned_question);
            tracing::trace!("Section {} scored {} (header: '{}')", section.ordinal, score, view.header);
            (score > 0).then(|| ScoredSection {
                ordinal: section.ordinal,
                clean_text: view.clean_text,
                score,
            })
        })
        .collect()
}

/// Orders candidates by descending score. The sort is stable, so equal
/// scores keep document order.
pub fn rank(mut candidates: Vec<ScoredSection>) -> Vec<ScoredSection> {
    candidates.sort_by(|a, b| b.score.cmp(&a.score));
    candidates
}

// --- Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::keywords::{clean_question, extract_terms};

    fn section(ordinal: usize, text: &str) -> Section {
        Section { ordinal, text: text.to_string() }
    }

    fn score_for(text: &str, question: &str) -> u32 {
        let view = SectionView::new(text);
        score_section(&view, &extract_terms(question), &clean_question(question))
    }

    #[test]
    fn test_header_prefers_question_mark() {
        assert_eq!(section_header("what is foo? foo is a club. it began."), "what is foo");
        assert_eq!(section_header("foo roomie is a tool. launched 2021."), "foo roomie is a tool");
        assert_eq!(section_header("no delimiter here"), "no delimiter here");
        assert_eq!(section_header("  what's foo, really? yes"), "whats foo really");
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  a\n\tb   c \r\n"), "a b c");
    }

    #[test]
    fn test_exact_header_stops_further_rules() {
        let view = SectionView::new("What is Foo? Foo foo foo foo is a student club.");
        let terms = extract_terms("What is Foo?");
        assert_eq!(
            ScoreRule::ExactHeader.apply(&view, &terms, "what is foo"),
            RuleOutcome::Stop(EXACT_HEADER_SCORE)
        );
        assert_eq!(score_for("What is Foo? Foo foo foo foo is a student club.", "What is Foo?"), 1000);
    }

    #[test]
    fn test_header_overlap_near_match_tier() {
        // Terms: srm, insider, founded. Header holds two of three.
        let view = SectionView::new("SRM Insider history. Nothing else.");
        let terms = extract_terms("When was SRM Insider founded?");
        assert_eq!(
            ScoreRule::HeaderOverlap.apply(&view, &terms, "when was srm insider founded"),
            RuleOutcome::Continue(100 + 50 * 2)
        );
    }

    #[test]
    fn test_header_overlap_partial_tier() {
        // Terms: srm, insider, domains, services. Header holds one of four.
        let view = SectionView::new("Insider notes. Nothing else.");
        let terms = extract_terms("SRM Insider domains services?");
        assert_eq!(
            ScoreRule::HeaderOverlap.apply(&view, &terms, "srm insider domains services"),
            RuleOutcome::Continue(30)
        );
    }

    #[test]
    fn test_single_term_always_takes_near_match_tier() {
        // With one term, zero header hits still satisfies hits >= len - 1.
        let view = SectionView::new("Unrelated heading. Body without the word.");
        let terms = extract_terms("roomie?");
        assert_eq!(
            ScoreRule::HeaderOverlap.apply(&view, &terms, "roomie"),
            RuleOutcome::Continue(100)
        );
    }

    #[test]
    fn test_body_frequency_caps_each_term() {
        let repeated = format!("Heading. {}", "club ".repeat(50));
        let twice = "Heading. club club";
        let terms = extract_terms("club membership rules?");
        let many = ScoreRule::BodyFrequency.apply(&SectionView::new(&repeated), &terms, "");
        let two = ScoreRule::BodyFrequency.apply(&SectionView::new(twice), &terms, "");
        assert_eq!(many, RuleOutcome::Continue(BODY_HITS_CAP));
        assert_eq!(many, two);
    }

    #[test]
    fn test_zero_score_sections_are_dropped() {
        let sections = vec![
            section(1, "Alpha beta gamma. Delta epsilon."),
            section(2, "Membership. The club meets weekly."),
            section(3, "Zeta eta theta. Iota kappa."),
        ];
        let terms = extract_terms("Which club membership options exist?");
        let scored = score_sections(&sections, &terms, &clean_question("Which club membership options exist?"));
        assert_eq!(scored.len(), 1);
        assert_eq!(scored[0].ordinal, 2);
        assert_eq!(scored[0].clean_text, "Membership. The club meets weekly.");
    }

    #[test]
    fn test_exact_header_outranks_dense_body() {
        let dense = format!("Foo facts. {}", "foo club founded ".repeat(40));
        let sections = vec![
            section(1, &dense),
            section(2, "What is Foo club? A small group."),
        ];
        let question = "What is Foo club?";
        let ranked = rank(score_sections(&sections, &extract_terms(question), &clean_question(question)));
        assert_eq!(ranked[0].ordinal, 2);
        assert!(ranked[0].score >= EXACT_HEADER_SCORE);
    }

    #[test]
    fn test_rank_is_stable_for_equal_scores() {
        let candidates = vec![
            ScoredSection { ordinal: 1, clean_text: "a".into(), score: 5 },
            ScoredSection { ordinal: 2, clean_text: "b".into(), score: 9 },
            ScoredSection { ordinal: 3, clean_text: "c".into(), score: 5 },
            ScoredSection { ordinal: 4, clean_text: "d".into(), score: 9 },
        ];
        let order: Vec<usize> = rank(candidates).iter().map(|c| c.ordinal).collect();
        assert_eq!(order, vec![2, 4, 1, 3]);
    }
}
