//! PPTX (Office Open XML) backend: writes assembled presentations as `.pptx`
//! packages and reads written packages back for verification.

pub mod inspector;
pub mod parts;
pub mod writer;

pub use inspector::{PackageSummary, PptxInspector, SlideSummary};
pub use writer::PptxWriter;
