// src/document/scanner.rs
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use crate::document::loader::detect_format;
use crate::document::SourceFormat;
use crate::utils::error::LoadError;

/// Lists loadable documents in `dir`, sorted by file name.
///
/// A missing folder is created so the user has somewhere to drop files; that
/// case, like a folder with nothing loadable, is reported as `EmptyFolder`.
pub fn scan_folder(dir: &Path) -> Result<Vec<PathBuf>, LoadError> {
    if !dir.exists() {
        fs::create_dir_all(dir)?;
        tracing::info!("Created documents folder at {}", dir.display());
        return Err(LoadError::EmptyFolder(dir.to_path_buf()));
    }

    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && detect_format(path).is_ok())
        .collect();
    files.sort();

    tracing::debug!("Found {} supported document(s) in {}", files.len(), dir.display());
    if files.is_empty() {
        return Err(LoadError::EmptyFolder(dir.to_path_buf()));
    }
    Ok(files)
}

/// Every PDF in `dir`, sorted by file name. Other documents are ignored;
/// a folder without any PDF is reported as `EmptyFolder`.
pub fn pdf_files(dir: &Path) -> Result<Vec<PathBuf>, LoadError> {
    let pdfs: Vec<PathBuf> = scan_folder(dir)?
        .into_iter()
        .filter(|file| matches!(detect_format(file), Ok(SourceFormat::Pdf)))
        .collect();
    if pdfs.is_empty() {
        return Err(LoadError::EmptyFolder(dir.to_path_buf()));
    }
    Ok(pdfs)
}

/// Picks one file. A single candidate is used as-is; otherwise `selection`
/// must be a 1-based index into `files`.
pub fn choose_file(files: &[PathBuf], selection: Option<&str>) -> Result<PathBuf, LoadError> {
    match files {
        [] => Err(LoadError::InvalidSelection("no files to choose from".to_string())),
        [only] => Ok(only.clone()),
        _ => {
            let raw = selection.unwrap_or_default().trim();
            raw.parse::<usize>()
                .ok()
                .filter(|n| (1..=files.len()).contains(n))
                .map(|n| files[n - 1].clone())
                .ok_or_else(|| LoadError::InvalidSelection(raw.to_string()))
        }
    }
}

/// Lists `files` as a numbered menu on `output` and reads the answer from
/// `input`. Callers pass stderr as `output` so the menu never mixes with answers.
pub fn prompt_choice<R: BufRead, W: Write>(
    files: &[PathBuf],
    mut input: R,
    output: &mut W,
) -> io::Result<String> {
    writeln!(output, "Available documents:")?;
    for (i, file) in files.iter().enumerate() {
        let name = file.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
        writeln!(output, "  {}. {}", i + 1, name)?;
    }
    write!(output, "\nSelect document (enter number): ")?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line)
}
