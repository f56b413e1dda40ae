//! Error types for HTML-to-presentation batch conversion.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading a job, converting slides, or saving.
#[derive(Error, Debug)]
pub enum Error {
    /// The command line did not name a job file.
    #[error("Usage: {program} <config.json>")]
    Usage { program: String },

    /// The job file could not be read.
    #[error("Failed to read config {}: {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The job file is not valid JSON, or its top level is not an object.
    #[error("{source}")]
    MalformedConfig {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The job file parsed but is structurally invalid.
    #[error("{0}")]
    Validation(String),

    /// A single input file failed to convert; the whole run is aborted.
    #[error("Failed to convert {}: {source}", input.display())]
    Conversion {
        input: PathBuf,
        #[source]
        source: Box<Error>,
    },

    /// The assembled document could not be written to its output path.
    #[error("Failed to write {}: {source}", output.display())]
    Write {
        output: PathBuf,
        #[source]
        source: Box<Error>,
    },

    /// Failed to open, read, or create a file.
    #[error("{0}")]
    IoError(#[from] std::io::Error),

    /// The HTML input could not be turned into a slide.
    #[error("HTML parsing error: {0}")]
    HtmlParseError(String),

    /// The HTML body size disagrees with the presentation layout.
    #[error("Layout mismatch: {0}")]
    LayoutMismatch(String),

    /// ZIP archive error (for PPTX).
    #[error("ZIP error: {0}")]
    ZipError(String),

    /// XML generation or parsing error (for PPTX).
    #[error("XML error: {0}")]
    XmlError(String),
}

impl Error {
    /// Wrap a converter failure with the input file it came from.
    pub fn conversion(input: impl Into<PathBuf>, source: Error) -> Self {
        Self::Conversion {
            input: input.into(),
            source: Box::new(source),
        }
    }

    /// Wrap a serializer failure with the output file it was writing.
    pub fn write(output: impl Into<PathBuf>, source: Error) -> Self {
        Self::Write {
            output: output.into(),
            source: Box::new(source),
        }
    }
}
