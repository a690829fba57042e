// src/document/loader.rs

// --- Imports ---
use crate::document::{Document, SourceFormat};
use crate::utils::error::LoadError;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::fs;
use std::path::Path;

// --- CSS Selectors (Lazy Static) ---
// Block elements that carry readable text, in document order
static BLOCK_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("h1, h2, h3, h4, h5, h6, p, li")
        .expect("Failed to compile BLOCK_SELECTOR")
});

// --- Regex Patterns (Lazy Static) ---
// One or more blank (or whitespace-only) lines separate paragraphs
static PARAGRAPH_BREAK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\n\s*\n").expect("Failed to compile PARAGRAPH_BREAK_RE")
});

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\s+").expect("Failed to compile WHITESPACE_RE")
});

const HEADING_TAGS: [&str; 6] = ["h1", "h2", "h3", "h4", "h5", "h6"];

/// Works out the format from the file extension (case-insensitive).
pub fn detect_format(path: &Path) -> Result<SourceFormat, LoadError> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    match extension.as_deref() {
        Some("pdf") => Ok(SourceFormat::Pdf),
        Some("txt") | Some("md") => Ok(SourceFormat::Text),
        Some("html") | Some("htm") => Ok(SourceFormat::Html),
        _ => Err(LoadError::UnsupportedFormat(path.to_path_buf())),
    }
}

/// Loads a document and splits it into sections according to its format.
pub fn load_document(path: &Path) -> Result<Document, LoadError> {
    if !path.is_file() {
        return Err(LoadError::NotFound(path.to_path_buf()));
    }
    let format = detect_format(path)?;
    tracing::info!("Loading {:?} document: {}", format, path.display());

    let document = match format {
        SourceFormat::Pdf => {
            let bytes = fs::read(path)?;
            let pages = pdf_pages(&bytes)?;
            Document::from_pages(path, format, pages)
        }
        SourceFormat::Text => {
            let bytes = fs::read(path)?;
            let text = String::from_utf8_lossy(&bytes);
            Document::from_blocks(path, format, split_paragraphs(&text))
        }
        SourceFormat::Html => {
            let bytes = fs::read(path)?;
            let html = String::from_utf8_lossy(&bytes);
            Document::from_blocks(path, format, html_blocks(&html))
        }
    };

    if document.is_loaded() {
        tracing::info!("Loaded {} section(s) from {}", document.sections().len(), path.display());
    } else {
        tracing::warn!("No text found in {}", path.display());
    }
    Ok(document)
}

/// Extracts the text of every PDF page, blank pages included, so positions
/// still match page numbers.
pub fn pdf_pages(bytes: &[u8]) -> Result<Vec<String>, LoadError> {
    pdf_extract::extract_text_from_mem_by_pages(bytes).map_err(|e| LoadError::Pdf(e.to_string()))
}

/// Splits plain text into paragraphs on blank lines.
pub fn split_paragraphs(text: &str) -> Vec<String> {
    PARAGRAPH_BREAK_RE
        .split(text)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

/// Turns HTML into text blocks. A heading opens a block and the paragraphs
/// and list items after it are appended to that block; anything before the
/// first heading becomes a block of its own.
pub fn html_blocks(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut blocks: Vec<String> = Vec::new();
    let mut under_heading = false;

    for element in document.select(&BLOCK_SELECTOR) {
        // Nested blocks (a <p> inside an <li>) are already part of the outer text
        if has_block_ancestor(element) {
            continue;
        }
        let raw = element.text().collect::<String>();
        let text = WHITESPACE_RE.replace_all(raw.trim(), " ").into_owned();
        if text.is_empty() {
            continue;
        }

        if HEADING_TAGS.contains(&element.value().name()) {
            blocks.push(text);
            under_heading = true;
        } else if under_heading {
            if let Some(current) = blocks.last_mut() {
                current.push(' ');
                current.push_str(&text);
            }
        } else {
            blocks.push(text);
        }
    }

    tracing::debug!("Collected {} HTML block(s)", blocks.len());
    blocks
}

fn has_block_ancestor(element: ElementRef) -> bool {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .any(|ancestor| BLOCK_SELECTOR.matches(&ancestor))
}

// --- Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_detect_format_by_extension() {
        assert_eq!(detect_format(Path::new("a/b/Guide.PDF")).unwrap(), SourceFormat::Pdf);
        assert_eq!(detect_format(Path::new("notes.txt")).unwrap(), SourceFormat::Text);
        assert_eq!(detect_format(Path::new("index.htm")).unwrap(), SourceFormat::Html);
        assert!(matches!(
            detect_format(Path::new("slides.pptx")),
            Err(LoadError::UnsupportedFormat(_))
        ));
        assert!(detect_format(Path::new("README")).is_err());
    }

    #[test]
    fn test_split_paragraphs_on_blank_lines() {
        let text = "What is Foo?\nFoo is a club.\n\n  \n\nFoo Roomie is a tool.\r\n\r\nEnd.\n";
        assert_eq!(
            split_paragraphs(text),
            vec!["What is Foo?\nFoo is a club.", "Foo Roomie is a tool.", "End."]
        );
    }

    #[test]
    fn test_html_blocks_group_under_headings() {
        let html = r#"
            <html><body>
            <p>Welcome to the guide.</p>
            <h2>What is Foo?</h2>
            <p>Foo is a <b>student</b> club.</p>
            <ul><li><p>Founded in 2020.</p></li></ul>
            <h2>Roomie</h2>
            <p>A housing tool.</p>
            </body></html>
        "#;
        assert_eq!(
            html_blocks(html),
            vec![
                "Welcome to the guide.",
                "What is Foo? Foo is a student club. Founded in 2020.",
                "Roomie A housing tool.",
            ]
        );
    }

    #[test]
    fn test_load_text_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("content.txt");
        fs::write(&path, "What is Foo? Foo is a club.\n\n\n\nFoo Roomie is a tool.").unwrap();

        let doc = load_document(&path).unwrap();
        assert_eq!(doc.format(), SourceFormat::Text);
        assert_eq!(doc.sections().len(), 2);
        assert_eq!(doc.sections()[1].ordinal, 2);
        assert_eq!(doc.sections()[1].text, "Foo Roomie is a tool.");
    }

    #[test]
    fn test_load_html_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.html");
        fs::write(&path, "<h1>What is Foo?</h1><p>A club.</p>").unwrap();

        let doc = load_document(&path).unwrap();
        assert_eq!(doc.sections().len(), 1);
        assert_eq!(doc.sections()[0].text, "What is Foo? A club.");
    }

    #[test]
    fn test_non_utf8_html_is_decoded_lossily() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("latin1.html");
        fs::write(&path, b"<h1>Caf\xe9 hours?</h1><p>Open daily.</p>").unwrap();

        let doc = load_document(&path).unwrap();
        assert_eq!(doc.sections().len(), 1);
        assert!(doc.sections()[0].text.ends_with("hours? Open daily."));
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let err = load_document(&PathBuf::from("/definitely/not/here.txt")).unwrap_err();
        assert!(matches!(err, LoadError::NotFound(_)));
    }

    #[test]
    fn test_invalid_pdf_reports_extraction_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.pdf");
        fs::write(&path, b"not a pdf at all").unwrap();
        assert!(matches!(load_document(&path), Err(LoadError::Pdf(_))));
    }
}
