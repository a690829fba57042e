// src/document/mod.rs
pub mod loader;
pub mod scanner;

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Where a document's text came from. Decides how it is split into sections
/// and how section numbers are labelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    Pdf,
    Text,
    Html,
}

impl SourceFormat {
    /// Label printed in front of source numbers, e.g. "Page(s) 1, 3".
    pub fn source_label(&self) -> &'static str {
        match self {
            SourceFormat::Pdf => "Page(s)",
            SourceFormat::Text | SourceFormat::Html => "Section(s)",
        }
    }
}

/// One addressable block: a PDF page or a paragraph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub ordinal: usize, // 1-based
    pub text: String,   // trimmed, never empty
}

/// A loaded document. Immutable once built.
#[derive(Debug, Clone)]
pub struct Document {
    source: PathBuf,
    format: SourceFormat,
    sections: Vec<Section>,
    block_count: usize, // blocks seen before blank ones were dropped
    full_text: String,
    loaded_at: DateTime<Utc>,
}

impl Document {
    /// Builds a document from already numbered blocks, dropping blank ones.
    pub fn new(
        source: impl Into<PathBuf>,
        format: SourceFormat,
        blocks: impl IntoIterator<Item = (usize, String)>,
    ) -> Self {
        let mut block_count = 0;
        let sections: Vec<Section> = blocks
            .into_iter()
            .inspect(|_| block_count += 1)
            .filter_map(|(ordinal, text)| {
                let trimmed = text.trim();
                (!trimmed.is_empty()).then(|| Section { ordinal, text: trimmed.to_string() })
            })
            .collect();
        let full_text = sections
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");

        Self {
            source: source.into(),
            format,
            sections,
            block_count,
            full_text,
            loaded_at: Utc::now(),
        }
    }

    /// Numbers blocks 1, 2, 3... after blank ones are dropped (paragraphs).
    pub fn from_blocks<S: Into<String>>(
        source: impl Into<PathBuf>,
        format: SourceFormat,
        blocks: impl IntoIterator<Item = S>,
    ) -> Self {
        let kept = blocks
            .into_iter()
            .map(|block| -> String { block.into() })
            .filter(|text| !text.trim().is_empty())
            .enumerate()
            .map(|(i, text)| (i + 1, text));
        Self::new(source, format, kept)
    }

    /// Numbers blocks by position before blank ones are dropped, so a page
    /// keeps its real page number.
    pub fn from_pages<S: Into<String>>(
        source: impl Into<PathBuf>,
        format: SourceFormat,
        pages: impl IntoIterator<Item = S>,
    ) -> Self {
        let numbered = pages
            .into_iter()
            .enumerate()
            .map(|(i, text)| -> (usize, String) { (i + 1, text.into()) });
        Self::new(source, format, numbered)
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn format(&self) -> SourceFormat {
        self.format
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Pages the loader produced, blank ones included. Paragraph-based
    /// documents drop blanks before numbering, so this equals the section count.
    pub fn block_count(&self) -> usize {
        self.block_count
    }

    pub fn full_text(&self) -> &str {
        &self.full_text
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    /// False when nothing but whitespace was loaded.
    pub fn is_loaded(&self) -> bool {
        !self.full_text.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_blocks_drops_blank_and_renumbers() {
        let doc = Document::from_blocks("a.txt", SourceFormat::Text, vec!["  First. ", "", "  \n ", "Second."]);
        let ordinals: Vec<usize> = doc.sections().iter().map(|s| s.ordinal).collect();
        assert_eq!(ordinals, vec![1, 2]);
        assert_eq!(doc.sections()[0].text, "First.");
        assert_eq!(doc.full_text(), "First.\n\nSecond.");
        assert!(doc.is_loaded());
    }

    #[test]
    fn test_from_pages_keeps_page_numbers() {
        let doc = Document::from_pages("a.pdf", SourceFormat::Pdf, vec!["Cover", "   ", "Body"]);
        let ordinals: Vec<usize> = doc.sections().iter().map(|s| s.ordinal).collect();
        assert_eq!(ordinals, vec![1, 3]);
        assert_eq!(doc.block_count(), 3);
        assert_eq!(doc.format().source_label(), "Page(s)");
    }

    #[test]
    fn test_blank_document_is_not_loaded() {
        let doc = Document::from_blocks("a.txt", SourceFormat::Text, Vec::<String>::new());
        assert!(doc.sections().is_empty());
        assert!(!doc.is_loaded());
    }

    #[test]
    fn test_document_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Document>();
    }
}
