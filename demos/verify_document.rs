//! Document Verification Example
//!
//! This example runs the verification pipeline on one or more document images
//! and prints the verdict for each, optionally with the full stage report.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example verify_document -- [OPTIONS] --doc-type <TYPE> <IMAGES>...
//! ```
//!
//! # Arguments
//!
//! * `-t, --doc-type` - Declared document type (invoice, prescription, lab_report)
//! * `-c, --config` - JSON configuration file (optional)
//! * `--corpus-root` - Root of the template corpora, overrides the config
//! * `--ocr-text` - File with the OCR text to use instead of running tesseract
//! * `--json` - Print the full report as JSON
//! * `<IMAGES>...` - Paths to the document images to verify
//!
//! # Example
//!
//! ```bash
//! cargo run --example verify_document -- \
//!     --doc-type invoice --corpus-root templates \
//!     scan1.jpg scan2.png
//! ```

use clap::Parser;
use oar_verify::prelude::*;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{error, info};

/// Command-line arguments for the document verification example
#[derive(Parser)]
#[command(name = "verify_document")]
#[command(about = "Document Verification Example - accepts or rejects a declared document")]
struct Args {
    /// Declared document type
    #[arg(short = 't', long)]
    doc_type: String,

    /// Paths to the document images to verify
    #[arg(required = true)]
    images: Vec<PathBuf>,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Root directory of the template corpora
    #[arg(long)]
    corpus_root: Option<PathBuf>,

    /// File holding the OCR text; tesseract is used when absent
    #[arg(long)]
    ocr_text: Option<PathBuf>,

    /// Language passed to tesseract
    #[arg(long)]
    language: Option<String>,

    /// Print the full report as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing for logging
    oar_verify::utils::init_tracing();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => VerifierConfig::from_json_file(path)?,
        None => VerifierConfig::default(),
    };
    if let Some(root) = &args.corpus_root {
        config.corpus_root = root.clone();
    }
    info!("Template corpus root: {}", config.corpus_root.display());

    let verifier = match &args.ocr_text {
        Some(path) => DocumentVerifier::new(config, StaticText::from_file(path)?)?,
        None => {
            let mut tesseract = TesseractCli::new();
            if let Some(language) = &args.language {
                tesseract = tesseract.with_language(language);
            }
            DocumentVerifier::new(config, tesseract)?
        }
    };

    let mut rejected = 0;
    for image in &args.images {
        let start = Instant::now();
        let report = verifier.verify_path(&args.doc_type, image);
        info!(
            "{}: {} ({:.2?})",
            image.display(),
            report.message(),
            start.elapsed()
        );

        if args.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            println!("{}\t{}", image.display(), report.message());
            if let Some(angle) = report.skew_angle {
                println!("  skew angle: {angle} degrees");
            }
            for trace in &report.stages {
                println!(
                    "  {:<20} {:<8} {:?}",
                    trace.stage,
                    if trace.result.accepted { "pass" } else { "reject" },
                    trace.metrics
                );
            }
        }

        if !report.accepted() {
            rejected += 1;
        }
    }

    if rejected > 0 {
        error!("{} of {} documents rejected", rejected, args.images.len());
    }
    Ok(())
}
