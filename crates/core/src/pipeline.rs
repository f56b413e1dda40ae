//! The batch conversion pipeline.
//!
//! Inputs are converted strictly one at a time, in job order, into a single
//! shared [`Presentation`]. The first failure aborts the run; the document is
//! only written once every input has converted.

use crate::error::{Error, Result};
use crate::job::{Options, ResolvedJob};
use crate::types::{ConvertedSlide, Layout, Presentation};
use std::path::{Path, PathBuf};

/// Turns one input file into one slide of the shared document.
pub trait SlideConverter {
    /// Convert `input`, appending exactly one slide to `document` on success.
    fn convert(
        &self,
        input: &Path,
        document: &mut Presentation,
        options: &Options,
    ) -> Result<ConvertedSlide>;
}

/// Serializes a finished document to disk.
pub trait DocumentWriter {
    fn write(&self, document: &Presentation, output: &Path) -> Result<()>;
}

/// Receives progress events from the pipeline.
///
/// All methods default to no-ops so implementations only override what they need.
pub trait ProgressReporter {
    /// Called once before the first input is converted.
    fn conversion_started(&mut self, total: usize) {
        let _ = total;
    }

    /// Called before each input; `position` is 1-based.
    fn slide_started(&mut self, position: usize, total: usize, input: &Path) {
        let _ = (position, total, input);
    }

    /// Called after a successful conversion that found placeholders.
    fn placeholders_found(&mut self, position: usize, count: usize) {
        let _ = (position, count);
    }

    /// Called when an input fails, just before the run is aborted.
    fn slide_failed(&mut self, input: &Path, error: &Error) {
        let _ = (input, error);
    }

    /// Called before the document is written.
    fn saving(&mut self, output: &Path) {
        let _ = output;
    }

    /// Called after the document has been written.
    fn saved(&mut self, output: &Path, slide_count: usize) {
        let _ = (output, slide_count);
    }
}

/// Reporter that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {}

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub output: PathBuf,
    pub slide_count: usize,
}

/// Convert every input, in order, into a fresh widescreen document.
///
/// Stops at the first failing input and returns it as [`Error::Conversion`].
pub fn convert_all<C, R>(
    inputs: &[PathBuf],
    converter: &C,
    options: &Options,
    reporter: &mut R,
) -> Result<Presentation>
where
    C: SlideConverter + ?Sized,
    R: ProgressReporter + ?Sized,
{
    let mut document = Presentation::new(Layout::Widescreen16x9);
    let total = inputs.len();

    reporter.conversion_started(total);

    for (i, input) in inputs.iter().enumerate() {
        let position = i + 1;
        reporter.slide_started(position, total, input);
        log::debug!("Converting slide {}/{}: {}", position, total, input.display());

        match converter.convert(input, &mut document, options) {
            Ok(converted) => {
                log::debug!(
                    "Slide {} appended at index {} with {} placeholder(s)",
                    position,
                    converted.index,
                    converted.placeholders.len()
                );
                if !converted.placeholders.is_empty() {
                    reporter.placeholders_found(position, converted.placeholders.len());
                }
            }
            Err(e) => {
                reporter.slide_failed(input, &e);
                return Err(Error::conversion(input, e));
            }
        }
    }

    Ok(document)
}

/// Write the assembled document and report the slide count.
pub fn finalize<W, R>(
    document: &Presentation,
    output: &Path,
    writer: &W,
    reporter: &mut R,
) -> Result<usize>
where
    W: DocumentWriter + ?Sized,
    R: ProgressReporter + ?Sized,
{
    reporter.saving(output);

    writer
        .write(document, output)
        .map_err(|e| Error::write(output, e))?;

    let slide_count = document.slide_count();
    reporter.saved(output, slide_count);

    Ok(slide_count)
}

/// Run a resolved job end to end: convert every input, then write the output.
pub fn run<C, W, R>(
    job: &ResolvedJob,
    converter: &C,
    writer: &W,
    reporter: &mut R,
) -> Result<RunSummary>
where
    C: SlideConverter + ?Sized,
    W: DocumentWriter + ?Sized,
    R: ProgressReporter + ?Sized,
{
    let document = convert_all(&job.inputs, converter, &job.options, reporter)?;
    let slide_count = finalize(&document, &job.output, writer, reporter)?;

    Ok(RunSummary {
        output: job.output.clone(),
        slide_count,
    })
}
