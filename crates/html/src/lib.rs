//! HTML slide converter backend.
//!
//! Turns one HTML file into one slide: text blocks become text boxes, and
//! elements with the `placeholder` class are reported back as fillable
//! regions instead of being drawn.

pub mod layout;
pub mod parser;
pub mod style;

pub use layout::{check_body_size, SlideLayout};
pub use parser::{parse_slide, ParsedSlide};

use deck_core::{ConvertedSlide, Options, Presentation, Result, SlideConverter};
use std::path::Path;

/// Font used when the job does not set `font_face`.
pub const DEFAULT_FONT_FACE: &str = "Arial";

/// Converter for HTML slide files.
#[derive(Debug, Clone, Default)]
pub struct HtmlSlideConverter;

impl HtmlSlideConverter {
    /// Create a new HTML converter.
    pub fn new() -> Self {
        Self
    }

    /// Convert HTML text into a new slide appended to `document`.
    ///
    /// Nothing is appended if the markup is rejected.
    pub fn convert_str(
        &self,
        html: &str,
        document: &mut Presentation,
        options: &Options,
    ) -> Result<ConvertedSlide> {
        let parsed = parse_slide(html)?;
        check_body_size(&parsed.body_style, document.layout())?;

        let layout = SlideLayout::new(document.layout(), font_face(options));
        let (shapes, placeholders) = layout.place(&parsed);

        let index = document.slide_count();
        let slide = document.add_slide();
        for shape in shapes {
            slide.add_shape(shape);
        }

        Ok(ConvertedSlide {
            index,
            placeholders,
        })
    }
}

impl SlideConverter for HtmlSlideConverter {
    fn convert(
        &self,
        input: &Path,
        document: &mut Presentation,
        options: &Options,
    ) -> Result<ConvertedSlide> {
        let html = std::fs::read_to_string(input)?;
        log::debug!("Read {} bytes from {}", html.len(), input.display());
        self.convert_str(&html, document, options)
    }
}

fn font_face(options: &Options) -> &str {
    match options.get("font_face") {
        None => DEFAULT_FONT_FACE,
        Some(value) => match value.as_str() {
            Some(face) if !face.trim().is_empty() => face,
            _ => {
                log::warn!("Ignoring font_face option {}: expected a font name", value);
                DEFAULT_FONT_FACE
            }
        },
    }
}
