//! CLI tool for converting a batch of HTML slides into one PowerPoint file.
//!
//! Usage: `html2pptx <config.json>` where the job file names the HTML inputs
//! in slide order and the `.pptx` file to write.

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::Parser;
use deck_core::{CallerFrame, Error, JobDescription, ProgressReporter, RunSummary};
use deck_html::HtmlSlideConverter;
use deck_pptx::PptxWriter;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

const PROGRAM: &str = "html2pptx";

/// Convert HTML slides into a single PowerPoint presentation.
#[derive(Parser, Debug)]
#[command(name = "html2pptx")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Job file: {"html_files": [...], "output_file": "...", "config": {...}}
    config: Option<PathBuf>,

    /// Ignored
    #[arg(hide = true)]
    extra: Vec<String>,

    /// Re-open the written file and check it holds every slide
    #[arg(long)]
    verify: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    // Relative job paths resolve against this, whatever happens to the
    // process's working directory later.
    let caller_frame = CallerFrame::capture();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => {
            let _ = e.print();
            return ExitCode::FAILURE;
        }
    };

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    let Some(config_path) = args.config.as_deref() else {
        eprintln!(
            "{}",
            Error::Usage {
                program: PROGRAM.to_string()
            }
        );
        return ExitCode::FAILURE;
    };

    match run(config_path, caller_frame, args.verify) {
        Ok(summary) => {
            log::debug!(
                "Wrote {} slide(s) to {}",
                summary.slide_count,
                summary.output.display()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Load the job, convert every slide, and write the presentation.
fn run(
    config_path: &Path,
    caller_frame: std::io::Result<CallerFrame>,
    verify: bool,
) -> Result<RunSummary> {
    let frame = caller_frame.context("Failed to determine the current directory")?;
    log::debug!("Caller frame: {}", frame.base().display());

    let job = JobDescription::load(&frame.resolve(config_path))?;
    let resolved = job.resolve(&frame);

    let converter = HtmlSlideConverter::new();
    let writer = PptxWriter::new()
        .with_application(PROGRAM)
        .with_verification(verify);
    let mut reporter = ConsoleReporter;

    let summary = deck_core::run(&resolved, &converter, &writer, &mut reporter)?;
    Ok(summary)
}

/// Prints progress lines to stdout and per-slide failures to stderr.
#[derive(Debug, Default)]
struct ConsoleReporter;

impl ProgressReporter for ConsoleReporter {
    fn conversion_started(&mut self, total: usize) {
        println!("Converting {} HTML slides to PowerPoint...", total);
    }

    fn slide_started(&mut self, position: usize, total: usize, input: &Path) {
        println!(
            "  Processing slide {}/{}: {}",
            position,
            total,
            file_name(input)
        );
    }

    fn placeholders_found(&mut self, _position: usize, count: usize) {
        println!("    Found {} placeholder(s)", count);
    }

    fn slide_failed(&mut self, input: &Path, error: &Error) {
        eprintln!("    Error processing {}: {}", input.display(), error);
    }

    fn saving(&mut self, output: &Path) {
        println!("Saving presentation to: {}", file_name(output));
    }

    fn saved(&mut self, output: &Path, slide_count: usize) {
        println!("\u{2713} Successfully created {}", output.display());
        println!("  Total slides: {}", slide_count);
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
