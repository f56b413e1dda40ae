//! Placement of parsed blocks on a slide.
//!
//! Blocks with inline `left`/`top` keep their declared position. Everything
//! else flows top to bottom inside the slide margins, with a height estimated
//! from font size and text length.

use crate::parser::{Block, BlockKind, Element, ParsedSlide, RawPlaceholder};
use crate::style::{InlineStyle, MAX_COORDINATE};
use deck_core::{
    Bullet, Error, Frame, Layout, Placeholder, Result, Shape, TextNormalizer, TextStyle,
    EMU_PER_INCH, EMU_PER_POINT,
};

/// Left/right text inset PowerPoint applies to a text box.
const H_INSET: i64 = 91_440;
/// Top/bottom text inset.
const V_INSET: i64 = 45_720;
const LINE_SPACING: f64 = 1.2;
/// Average glyph width as a fraction of the font size.
const AVG_CHAR_WIDTH: f64 = 0.5;
/// Allowed disagreement between body size and layout.
const SIZE_TOLERANCE: i64 = EMU_PER_POINT;
/// Height given to a flowed placeholder with no declared height.
const DEFAULT_PLACEHOLDER_HEIGHT: i64 = EMU_PER_INCH;

/// Lays out one slide's elements for a given presentation layout.
#[derive(Debug, Clone)]
pub struct SlideLayout {
    width: i64,
    height: i64,
    margin: i64,
    gap: i64,
    font_face: String,
}

impl SlideLayout {
    pub fn new(layout: Layout, font_face: impl Into<String>) -> Self {
        let (width, height) = layout.dimensions();
        Self {
            width,
            height,
            margin: EMU_PER_INCH / 2,
            gap: EMU_PER_POINT * 6,
            font_face: font_face.into(),
        }
    }

    /// Width available to flowed content.
    fn content_width(&self) -> i64 {
        (self.width - 2 * self.margin).max(EMU_PER_POINT)
    }

    /// Turn parsed elements into shapes and placeholders.
    pub fn place(&self, parsed: &ParsedSlide) -> (Vec<Shape>, Vec<Placeholder>) {
        let mut shapes = Vec::new();
        let mut placeholders = Vec::new();
        let mut cursor = self.margin;

        for element in &parsed.elements {
            match element {
                Element::Block(block) => {
                    if let Some(shape) = self.place_block(block, shapes.len() + 1, &mut cursor) {
                        shapes.push(shape);
                    }
                }
                Element::Placeholder(raw) => {
                    let placeholder = self.place_placeholder(raw, placeholders.len() + 1, &mut cursor);
                    placeholders.push(placeholder);
                }
            }
        }

        let flowed_bottom = cursor.saturating_sub(self.gap);
        if flowed_bottom > self.height {
            log::warn!(
                "Flowed content is {:.1}pt tall and overflows the {:.1}pt slide",
                to_points(flowed_bottom),
                to_points(self.height)
            );
        }

        (shapes, placeholders)
    }

    fn place_block(&self, block: &Block, number: usize, cursor: &mut i64) -> Option<Shape> {
        let paragraphs = normalize_paragraphs(block);
        if paragraphs.is_empty() {
            return None;
        }

        let font_size = block
            .style
            .font_size()
            .unwrap_or_else(|| default_font_size(block.kind));
        let bold = block
            .style
            .bold()
            .unwrap_or(matches!(block.kind, BlockKind::Heading(_)) || block.all_bold);
        let font_face = match block.kind {
            BlockKind::Preformatted => "Courier New".to_string(),
            _ => self.font_face.clone(),
        };

        let texts: Vec<&str> = paragraphs.iter().map(|(t, _)| t.as_str()).collect();
        let frame = self.frame_for(&block.style, cursor, |width| {
            estimate_height(&texts, font_size, width)
        });

        let mut shape = Shape::new(
            format!("{} {}", shape_label(block.kind), number),
            frame,
            TextStyle {
                font_size,
                bold,
                font_face,
            },
        );
        for (text, bullet) in paragraphs {
            shape.add_paragraph(text, bullet);
        }

        Some(shape)
    }

    fn place_placeholder(&self, raw: &RawPlaceholder, number: usize, cursor: &mut i64) -> Placeholder {
        let frame = self.frame_for(&raw.style, cursor, |_| DEFAULT_PLACEHOLDER_HEIGHT);
        Placeholder {
            id: raw
                .id
                .clone()
                .unwrap_or_else(|| format!("placeholder-{}", number)),
            frame,
        }
    }

    /// Declared position if the style has one, otherwise the next flow slot.
    fn frame_for(
        &self,
        style: &InlineStyle,
        cursor: &mut i64,
        estimate: impl Fn(i64) -> i64,
    ) -> Frame {
        match (style.length("left"), style.length("top")) {
            (None, None) => {
                let width = style
                    .length("width")
                    .unwrap_or_else(|| self.content_width())
                    .max(0);
                let height = style.length("height").unwrap_or_else(|| estimate(width)).max(0);
                let frame = Frame::new(self.margin, *cursor, width, height);
                *cursor = frame.bottom().saturating_add(self.gap).min(MAX_COORDINATE);
                frame
            }
            (left, top) => {
                let x = left.unwrap_or(self.margin);
                let y = top.unwrap_or(*cursor);
                let width = style
                    .length("width")
                    .unwrap_or_else(|| (self.width - x - self.margin).max(EMU_PER_POINT))
                    .max(0);
                let height = style.length("height").unwrap_or_else(|| estimate(width)).max(0);
                Frame::new(x, y, width, height)
            }
        }
    }
}

/// Fail if the body declares a size that disagrees with the layout.
pub fn check_body_size(body_style: &InlineStyle, layout: Layout) -> Result<()> {
    let (width, height) = layout.dimensions();
    let body_width = body_style.length("width");
    let body_height = body_style.length("height");

    let off = |declared: Option<i64>, expected: i64| {
        declared.is_some_and(|d| d.abs_diff(expected) > SIZE_TOLERANCE.unsigned_abs())
    };

    if off(body_width, width) || off(body_height, height) {
        return Err(Error::LayoutMismatch(format!(
            "HTML body is {}pt x {}pt but layout {} is {}pt x {}pt",
            format_points(body_width.unwrap_or(width)),
            format_points(body_height.unwrap_or(height)),
            layout.name(),
            format_points(width),
            format_points(height)
        )));
    }

    Ok(())
}

fn normalize_paragraphs(block: &Block) -> Vec<(String, Bullet)> {
    if block.kind == BlockKind::Preformatted {
        let normalizer = TextNormalizer::new().with_preserve_line_breaks(true);
        block
            .paragraphs
            .iter()
            .flat_map(|(text, bullet)| {
                normalizer
                    .normalize(text)
                    .lines()
                    .map(|line| (line.to_string(), *bullet))
                    .collect::<Vec<_>>()
            })
            .collect()
    } else {
        let normalizer = TextNormalizer::new();
        block
            .paragraphs
            .iter()
            .map(|(text, bullet)| (normalizer.normalize(text), *bullet))
            .filter(|(text, _)| !text.is_empty())
            .collect()
    }
}

fn default_font_size(kind: BlockKind) -> f64 {
    match kind {
        BlockKind::Heading(1) => 36.0,
        BlockKind::Heading(2) => 28.0,
        BlockKind::Heading(3) => 24.0,
        BlockKind::Heading(4) => 20.0,
        BlockKind::Heading(5) => 18.0,
        _ => 16.0,
    }
}

fn shape_label(kind: BlockKind) -> String {
    match kind {
        BlockKind::Heading(level) => format!("Heading {}", level),
        BlockKind::Paragraph => "Text".to_string(),
        BlockKind::Preformatted => "Code".to_string(),
        BlockKind::Quote => "Quote".to_string(),
        BlockKind::List { .. } => "List".to_string(),
    }
}

/// Rough text-box height for the given paragraphs wrapped at `width`.
fn estimate_height(paragraphs: &[&str], font_size: f64, width: i64) -> i64 {
    let char_width = font_size * AVG_CHAR_WIDTH * EMU_PER_POINT as f64;
    let chars_per_line = ((width - 2 * H_INSET) as f64 / char_width).max(1.0);

    let lines: f64 = paragraphs
        .iter()
        .map(|p| (p.chars().count() as f64 / chars_per_line).ceil().max(1.0))
        .sum();

    let text_height = (lines * font_size * LINE_SPACING * EMU_PER_POINT as f64).round();
    (text_height.min(MAX_COORDINATE as f64) as i64).saturating_add(2 * V_INSET)
}

fn to_points(emu: i64) -> f64 {
    emu as f64 / EMU_PER_POINT as f64
}

/// Points with at most one decimal, e.g. "720" or "405.5".
fn format_points(emu: i64) -> String {
    let tenths = (to_points(emu) * 10.0).round() / 10.0;
    format!("{}", tenths)
}
