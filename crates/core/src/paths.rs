//! Resolution of user-supplied paths.
//!
//! The directory the tool was launched from is captured once, at startup,
//! into a [`CallerFrame`]. Every relative path in a job is joined onto that
//! frame, so the process may change its own working directory afterwards
//! without affecting where inputs are read from or the output is written to.

use std::path::{Path, PathBuf};

/// The working directory active when the process was launched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerFrame {
    base: PathBuf,
}

impl CallerFrame {
    /// Use an explicit directory as the frame.
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    /// Capture the process's current directory.
    ///
    /// Call this before anything changes the working directory.
    pub fn capture() -> std::io::Result<Self> {
        std::env::current_dir().map(Self::new)
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Absolute paths are returned unchanged; relative ones are joined onto the frame.
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base.join(path)
        }
    }
}
