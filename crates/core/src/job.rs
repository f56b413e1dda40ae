//! Loading and validating a batch job description.
//!
//! A job file is a single JSON object:
//!
//! ```json
//! {
//!   "html_files": ["slide1.html", "slide2.html"],
//!   "output_file": "deck.pptx",
//!   "config": {}
//! }
//! ```
//!
//! The file is parsed into an untyped value first so that a field with the
//! wrong type is reported with the same message as a missing one.

use crate::error::{Error, Result};
use crate::paths::CallerFrame;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// Converter options, handed to the converter verbatim.
pub type Options = Map<String, Value>;

/// A validated job description.
#[derive(Debug, Clone, PartialEq)]
pub struct JobDescription {
    /// Input files in slide order, exactly as written in the job file.
    pub html_files: Vec<String>,

    /// Output path, exactly as written in the job file.
    pub output_file: String,

    /// Opaque converter options (empty when absent).
    pub config: Options,
}

impl JobDescription {
    /// Read and validate a job file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;

        let job = Self::from_json(&content).map_err(|e| match e {
            Error::MalformedConfig { source, .. } => Error::MalformedConfig {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })?;

        log::debug!(
            "Loaded job from {}: {} input(s) -> {}",
            path.display(),
            job.html_files.len(),
            job.output_file
        );

        Ok(job)
    }

    /// Parse and validate a job description from JSON text.
    pub fn from_json(content: &str) -> Result<Self> {
        // A top-level array or scalar fails here, not in field validation.
        let mut raw: Map<String, Value> =
            serde_json::from_str(content).map_err(|source| Error::MalformedConfig {
                path: PathBuf::new(),
                source,
            })?;

        let html_files = match raw.remove("html_files") {
            Some(Value::Array(items)) if !items.is_empty() => items
                .into_iter()
                .map(|item| match item {
                    Value::String(s) => Ok(s),
                    _ => Err(non_empty_array()),
                })
                .collect::<Result<Vec<_>>>()?,
            _ => return Err(non_empty_array()),
        };

        let output_file = match raw.remove("output_file") {
            Some(Value::String(s)) if !s.is_empty() => s,
            _ => return Err(Error::Validation("output_file is required".to_string())),
        };

        let config = match raw.remove("config") {
            None | Some(Value::Null) => Options::new(),
            Some(Value::Object(map)) => map,
            Some(_) => return Err(Error::Validation("config must be an object".to_string())),
        };

        Ok(Self {
            html_files,
            output_file,
            config,
        })
    }

    /// Turn every user-supplied path into an absolute one.
    ///
    /// Relative paths are joined onto the caller frame, never onto the
    /// process's current directory at the time of the call.
    pub fn resolve(&self, frame: &CallerFrame) -> ResolvedJob {
        ResolvedJob {
            inputs: self.html_files.iter().map(|f| frame.resolve(f)).collect(),
            output: frame.resolve(&self.output_file),
            options: self.config.clone(),
        }
    }
}

fn non_empty_array() -> Error {
    Error::Validation("html_files must be a non-empty array".to_string())
}

/// A job whose paths have all been made absolute.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedJob {
    pub inputs: Vec<PathBuf>,
    pub output: PathBuf,
    pub options: Options,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn validation_message(json: &str) -> String {
        match JobDescription::from_json(json) {
            Err(Error::Validation(msg)) => msg,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_minimal_job() {
        let job = JobDescription::from_json(
            r#"{"html_files": ["a.html", "b.html"], "output_file": "out.pptx"}"#,
        )
        .unwrap();

        assert_eq!(job.html_files, vec!["a.html", "b.html"]);
        assert_eq!(job.output_file, "out.pptx");
        assert!(job.config.is_empty());
    }

    #[test]
    fn test_config_passes_through() {
        let job = JobDescription::from_json(
            r#"{"html_files": ["a.html"], "output_file": "o.pptx",
                "config": {"font_face": "Georgia", "nested": {"k": [1, 2]}}}"#,
        )
        .unwrap();

        assert_eq!(job.config["font_face"], "Georgia");
        assert_eq!(job.config["nested"]["k"][1], 2);
    }

    #[test]
    fn test_null_config_is_empty() {
        let job = JobDescription::from_json(
            r#"{"html_files": ["a.html"], "output_file": "o.pptx", "config": null}"#,
        )
        .unwrap();
        assert!(job.config.is_empty());
    }

    #[test]
    fn test_missing_html_files() {
        assert_eq!(
            validation_message(r#"{"output_file": "o.pptx"}"#),
            "html_files must be a non-empty array"
        );
    }

    #[test]
    fn test_empty_html_files() {
        assert_eq!(
            validation_message(r#"{"html_files": [], "output_file": "o.pptx"}"#),
            "html_files must be a non-empty array"
        );
    }

    #[test]
    fn test_html_files_wrong_type() {
        assert_eq!(
            validation_message(r#"{"html_files": "a.html", "output_file": "o.pptx"}"#),
            "html_files must be a non-empty array"
        );
        assert_eq!(
            validation_message(r#"{"html_files": ["a.html", 3], "output_file": "o.pptx"}"#),
            "html_files must be a non-empty array"
        );
    }

    #[test]
    fn test_html_files_checked_before_output_file() {
        assert_eq!(
            validation_message(r#"{}"#),
            "html_files must be a non-empty array"
        );
    }

    #[test]
    fn test_missing_output_file() {
        assert_eq!(
            validation_message(r#"{"html_files": ["a.html"]}"#),
            "output_file is required"
        );
        assert_eq!(
            validation_message(r#"{"html_files": ["a.html"], "output_file": ""}"#),
            "output_file is required"
        );
    }

    #[test]
    fn test_config_must_be_object() {
        assert_eq!(
            validation_message(
                r#"{"html_files": ["a.html"], "output_file": "o.pptx", "config": [1]}"#
            ),
            "config must be an object"
        );
    }

    #[test]
    fn test_malformed_json() {
        let err = JobDescription::from_json(r#"{"html_files": ["#).unwrap_err();
        assert!(matches!(err, Error::MalformedConfig { .. }));

        let err = JobDescription::from_json(r#"["a.html"]"#).unwrap_err();
        assert!(matches!(err, Error::MalformedConfig { .. }));
    }

    #[test]
    fn test_positional_array_rejected() {
        let err = JobDescription::from_json(
            r#"[["a.html", "b.html"], "out.pptx", {"font_face": "X"}]"#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::MalformedConfig { .. }));

        for scalar in ["42", r#""job.json""#, "null", "true"] {
            let err = JobDescription::from_json(scalar).unwrap_err();
            assert!(
                matches!(err, Error::MalformedConfig { .. }),
                "{} should be malformed, got {:?}",
                scalar,
                err
            );
        }
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let job = JobDescription::from_json(
            r#"{"html_files": ["a.html"], "output_file": "o.pptx", "title": "Talk"}"#,
        )
        .unwrap();
        assert_eq!(job.output_file, "o.pptx");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"html_files": ["x.html"], "output_file": "x.pptx"}}"#
        )
        .unwrap();

        let job = JobDescription::load(file.path()).unwrap();
        assert_eq!(job.html_files, vec!["x.html"]);
    }

    #[test]
    fn test_load_keeps_path_on_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        match JobDescription::load(file.path()) {
            Err(Error::MalformedConfig { path, .. }) => assert_eq!(path, file.path()),
            other => panic!("expected malformed config, got {:?}", other),
        }
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = JobDescription::load(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, Error::ConfigRead { .. }));
    }

    #[test]
    fn test_resolve_against_caller_frame() {
        let job = JobDescription::from_json(
            r#"{"html_files": ["slides/a.html", "/abs/b.html"], "output_file": "out.pptx"}"#,
        )
        .unwrap();
        let frame = CallerFrame::new("/home/user/talk");

        let resolved = job.resolve(&frame);
        assert_eq!(
            resolved.inputs,
            vec![
                PathBuf::from("/home/user/talk/slides/a.html"),
                PathBuf::from("/abs/b.html"),
            ]
        );
        assert_eq!(resolved.output, PathBuf::from("/home/user/talk/out.pptx"));
    }
}
