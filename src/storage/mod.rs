// src/storage/mod.rs
use std::fs;
use std::path::{Path, PathBuf};
use crate::document::Document;
use crate::utils::error::{LoadError, StorageError};
use std::io::Write;

/// Outcome of converting a batch of files.
#[derive(Debug, Default)]
pub struct ConversionReport {
    pub converted: Vec<PathBuf>, // text files written
    pub failed: Vec<(PathBuf, String)>,
}

/// Writes extracted document text (and a metadata sidecar) to disk.
pub struct TextStore {
    base_dir: Option<PathBuf>,
}

impl TextStore {
    /// Creates a store writing into `base_dir`, or next to each source file
    /// when no directory is given.
    pub fn new<P: AsRef<Path>>(base_dir: Option<P>) -> Result<Self, StorageError> {
        let base_dir = base_dir.map(|dir| dir.as_ref().to_path_buf());

        // Create the base directory if it doesn't exist
        if let Some(dir) = &base_dir {
            if !dir.exists() {
                fs::create_dir_all(dir).map_err(StorageError::IoError)?;
            }
        }

        Ok(Self { base_dir })
    }

    fn target_path(&self, document: &Document, suffix: &str) -> PathBuf {
        let source = document.source();
        let dir = match &self.base_dir {
            Some(dir) => dir.clone(),
            None => source.parent().map(Path::to_path_buf).unwrap_or_default(),
        };
        let stem = source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document".to_string());
        dir.join(format!("{}{}", stem, suffix))
    }

    /// Saves the document text as `<stem>.txt`, sections separated by blank lines.
    pub fn save_text(&self, document: &Document) -> Result<PathBuf, StorageError> {
        if !document.is_loaded() {
            return Err(StorageError::NoText(document.source().to_path_buf()));
        }

        let file_path = self.target_path(document, ".txt");
        if file_path == document.source() {
            return Err(StorageError::FileExists(file_path));
        }

        let mut file = fs::File::create(&file_path).map_err(StorageError::IoError)?;
        file.write_all(document.full_text().as_bytes())
            .and_then(|_| file.write_all(b"\n"))
            .map_err(StorageError::IoError)?;

        tracing::info!("Saved text to {}", file_path.display());

        Ok(file_path)
    }

    /// Saves metadata about the conversion in JSON format
    pub fn save_metadata(&self, document: &Document) -> Result<PathBuf, StorageError> {
        let file_path = self.target_path(document, "_meta.json");

        let metadata = serde_json::json!({
            "source": document.source().display().to_string(),
            "format": document.format(),
            "section_count": document.sections().len(),
            "ordinals": document.sections().iter().map(|s| s.ordinal).collect::<Vec<_>>(),
            "char_count": document.full_text().chars().count(),
            "loaded_at": document.loaded_at().to_rfc3339(),
            "converted_at": chrono::Utc::now().to_rfc3339(),
        });

        let metadata_str = serde_json::to_string_pretty(&metadata)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;

        fs::write(&file_path, metadata_str).map_err(StorageError::IoError)?;

        tracing::info!("Saved metadata to {}", file_path.display());

        Ok(file_path)
    }

    /// Loads and saves each file in turn. A file that fails to load or save is
    /// logged and skipped; the rest are still converted.
    pub fn convert_all<F>(&self, sources: &[PathBuf], load: F) -> ConversionReport
    where
        F: Fn(&Path) -> Result<Document, LoadError>,
    {
        let mut report = ConversionReport::default();

        for source in sources {
            let saved = load(source)
                .map_err(|e| e.to_string())
                .and_then(|document| {
                    let text_path = self.save_text(&document).map_err(|e| e.to_string())?;
                    self.save_metadata(&document).map_err(|e| e.to_string())?;
                    Ok(text_path)
                });

            match saved {
                Ok(text_path) => report.converted.push(text_path),
                Err(e) => {
                    tracing::error!("Failed to convert {}: {}", source.display(), e);
                    report.failed.push((source.clone(), e));
                }
            }
        }

        tracing::info!(
            "Converted {} of {} file(s)",
            report.converted.len(),
            sources.len()
        );
        report
    }
}
