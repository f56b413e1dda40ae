//! Core domain types, job loading, path resolution, and the sequential
//! conversion pipeline for turning HTML slides into one presentation.

pub mod error;
pub mod job;
pub mod normalize;
pub mod paths;
pub mod pipeline;
pub mod types;

pub use error::{Error, Result};
pub use job::{JobDescription, Options, ResolvedJob};
pub use normalize::TextNormalizer;
pub use paths::CallerFrame;
pub use pipeline::{
    convert_all, finalize, run, DocumentWriter, ProgressReporter, RunSummary, SilentReporter,
    SlideConverter,
};
pub use types::{
    Bullet, ConvertedSlide, Frame, Layout, Paragraph, Placeholder, Presentation, Shape, Slide,
    TextStyle, EMU_PER_INCH, EMU_PER_PIXEL, EMU_PER_POINT,
};
