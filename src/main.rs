// src/main.rs
mod chat;
mod config;
mod document;
mod engine;
mod storage;
mod utils;

use clap::Parser;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use config::Settings;
use document::{loader, scanner, SourceFormat};
use engine::Engine;
use storage::TextStore;
use utils::AppError;

/// Answer questions about a PDF, text or HTML document by lexical matching
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Document to load, or a folder to pick one from (default: $QA_DOCS_DIR or ./pdfs)
    path: Option<PathBuf>,

    /// Ask this question and exit; may be given several times
    #[arg(short, long)]
    question: Vec<String>,

    /// Number of top sections combined into one answer (1 = concise, 3 = broad)
    #[arg(short, long)]
    num_results: Option<usize>,

    /// 1-based document number when the folder holds several documents
    #[arg(long)]
    select: Option<String>,

    /// Print answers as JSON, one object per line
    #[arg(long)]
    json: bool,

    /// Convert the PDF (or every PDF in the folder) to plain text plus metadata and exit
    #[arg(long)]
    convert: bool,

    /// Output directory for converted text (default: next to the PDF)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,
}

fn main() -> Result<(), AppError> {
    // 1. Setup Logging (reads RUST_LOG env var)
    utils::logging::setup_logging();

    // 2. Parse CLI Arguments, layered over environment settings
    let args = Args::parse();
    tracing::info!("Starting with args: {:?}", args);

    let mut settings = Settings::from_env()?;
    if let Some(n) = args.num_results {
        settings.set_num_results(n)?;
    }

    // 3. Conversion mode: write the text out and stop
    if args.convert {
        return convert(&args, &settings);
    }

    // 4. Work out which document to load
    let path = match &args.path {
        Some(path) if !path.is_dir() => path.clone(),
        Some(dir) => pick_from_folder(dir, args.select.as_deref())?,
        None => pick_from_folder(&settings.docs_dir, args.select.as_deref())?,
    };

    // 5. Load it once; it stays read-only for the rest of the session
    let document = loader::load_document(&path)?;

    let engine = Engine::from_settings(&settings);
    tracing::info!(
        "Ready: {} section(s) from {}, {} result(s) per answer",
        document.sections().len(),
        path.display(),
        engine.num_results()
    );

    // 6. One-shot questions, or the interactive loop
    let stdout = io::stdout();
    let mut out = stdout.lock();
    if !args.question.is_empty() {
        for question in &args.question {
            if !args.json {
                writeln!(out, "Q: {}", question)?;
            }
            chat::reply(&engine, &document, question, args.json, &mut out)?;
        }
    } else {
        let stdin = io::stdin();
        chat::run(&engine, &document, stdin.lock(), &mut out, args.json)?;
    }

    Ok(())
}

/// Converts one PDF, or every PDF in a folder (the docs folder when no path
/// is given). In a folder a failing file is logged and skipped.
fn convert(args: &Args, settings: &Settings) -> Result<(), AppError> {
    let store = TextStore::new(args.output_dir.as_ref())?;

    let dir = match &args.path {
        Some(dir) if dir.is_dir() => dir,
        Some(file) => return convert_file(&store, file),
        None => &settings.docs_dir,
    };

    let pdfs = scanner::pdf_files(dir)?;
    let report = store.convert_all(&pdfs, loader::load_document);
    for text_path in &report.converted {
        println!("Converted: {}", text_path.display());
    }
    for (source, reason) in &report.failed {
        println!("Failed: {} ({})", source.display(), reason);
    }
    println!("Converted {} of {} PDF file(s)", report.converted.len(), pdfs.len());

    if report.converted.is_empty() {
        return Err(AppError::Processing(format!("No PDF in {} could be converted", dir.display())));
    }
    Ok(())
}

fn convert_file(store: &TextStore, path: &Path) -> Result<(), AppError> {
    let document = loader::load_document(path)?;
    if document.format() != SourceFormat::Pdf {
        return Err(AppError::Config(format!("--convert expects a PDF, got {}", path.display())));
    }
    let text_path = store.save_text(&document)?;
    let meta_path = store.save_metadata(&document)?;
    println!(
        "Converted {} page(s) ({} with text) to {}",
        document.block_count(),
        document.sections().len(),
        text_path.display()
    );
    println!("Metadata: {}", meta_path.display());
    Ok(())
}

/// Scans a folder and picks a document, prompting when there is more than one
/// and no `--select` was given. The prompt goes to stderr so stdout only
/// carries answers.
fn pick_from_folder(dir: &Path, selection: Option<&str>) -> Result<PathBuf, AppError> {
    let files = scanner::scan_folder(dir)?;

    let prompted;
    let selection = match selection {
        Some(choice) => Some(choice),
        None if files.len() > 1 => {
            let stderr = io::stderr();
            prompted = scanner::prompt_choice(&files, io::stdin().lock(), &mut stderr.lock())?;
            Some(prompted.as_str())
        }
        None => None,
    };

    let chosen = scanner::choose_file(&files, selection)?;
    tracing::info!("Selected document: {}", chosen.display());
    Ok(chosen)
}
