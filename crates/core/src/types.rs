//! Domain types for representing an assembled presentation.

/// English Metric Units per inch.
pub const EMU_PER_INCH: i64 = 914_400;

/// English Metric Units per typographic point.
pub const EMU_PER_POINT: i64 = 12_700;

/// English Metric Units per CSS pixel (96 per inch).
pub const EMU_PER_PIXEL: i64 = 9_525;

/// Slide size of a presentation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Layout {
    /// 10 x 5.625 inches.
    #[default]
    Widescreen16x9,
    /// 10 x 6.25 inches.
    Widescreen16x10,
    /// 10 x 7.5 inches.
    Standard4x3,
    /// 13.333 x 7.5 inches.
    Wide,
}

impl Layout {
    /// Slide width and height in EMUs.
    pub fn dimensions(&self) -> (i64, i64) {
        match self {
            Self::Widescreen16x9 => (9_144_000, 5_143_500),
            Self::Widescreen16x10 => (9_144_000, 5_715_000),
            Self::Standard4x3 => (9_144_000, 6_858_000),
            Self::Wide => (12_192_000, 6_858_000),
        }
    }

    /// Identifier used in configuration and logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Widescreen16x9 => "LAYOUT_16x9",
            Self::Widescreen16x10 => "LAYOUT_16x10",
            Self::Standard4x3 => "LAYOUT_4x3",
            Self::Wide => "LAYOUT_WIDE",
        }
    }
}

/// Position and size of something on a slide, in EMUs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Frame {
    pub x: i64,
    pub y: i64,
    pub cx: i64,
    pub cy: i64,
}

impl Frame {
    pub fn new(x: i64, y: i64, cx: i64, cy: i64) -> Self {
        Self { x, y, cx, cy }
    }

    /// Bottom edge of the frame.
    pub fn bottom(&self) -> i64 {
        self.y.saturating_add(self.cy)
    }
}

/// The document being assembled: one slide per converted input file.
#[derive(Debug, Clone)]
pub struct Presentation {
    /// Slide size, fixed at creation.
    layout: Layout,

    /// Slides in presentation order.
    slides: Vec<Slide>,
}

impl Presentation {
    /// Create an empty presentation with the given layout.
    pub fn new(layout: Layout) -> Self {
        Self {
            layout,
            slides: Vec::new(),
        }
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// Append a new, empty slide and return it for filling in.
    pub fn add_slide(&mut self) -> &mut Slide {
        let index = self.slides.len();
        self.slides.push(Slide::new(index + 1));
        &mut self.slides[index]
    }

    /// Slides in presentation order.
    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }
}

/// A single slide.
#[derive(Debug, Clone)]
pub struct Slide {
    /// 1-based slide number.
    pub number: usize,

    /// Shapes in z-order (first is bottom-most).
    pub shapes: Vec<Shape>,
}

impl Slide {
    /// Create a new slide with the given number.
    pub fn new(number: usize) -> Self {
        Self {
            number,
            shapes: Vec::new(),
        }
    }

    /// Add a shape on top of the existing ones.
    pub fn add_shape(&mut self, shape: Shape) {
        self.shapes.push(shape);
    }

    /// All paragraph text on the slide, in shape order.
    pub fn texts(&self) -> Vec<&str> {
        self.shapes
            .iter()
            .flat_map(|s| s.paragraphs.iter().map(|p| p.text.as_str()))
            .collect()
    }
}

/// A text box on a slide.
#[derive(Debug, Clone)]
pub struct Shape {
    /// Display name, e.g. "Heading 1".
    pub name: String,

    pub frame: Frame,

    pub paragraphs: Vec<Paragraph>,

    pub style: TextStyle,
}

impl Shape {
    pub fn new(name: impl Into<String>, frame: Frame, style: TextStyle) -> Self {
        Self {
            name: name.into(),
            frame,
            paragraphs: Vec::new(),
            style,
        }
    }

    /// Add a paragraph of plain text.
    pub fn add_paragraph(&mut self, text: impl Into<String>, bullet: Bullet) {
        self.paragraphs.push(Paragraph {
            text: text.into(),
            bullet,
        });
    }
}

/// One paragraph inside a text box.
#[derive(Debug, Clone, PartialEq)]
pub struct Paragraph {
    pub text: String,
    pub bullet: Bullet,
}

/// List marker for a paragraph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Bullet {
    #[default]
    None,
    /// Unordered list item.
    Disc,
    /// Ordered list item, numbered automatically.
    Numbered,
}

/// Character formatting applied to a whole text box.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    /// Font size in points.
    pub font_size: f64,
    pub bold: bool,
    pub font_face: String,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_size: 16.0,
            bold: false,
            font_face: "Arial".to_string(),
        }
    }
}

/// A fillable region found in a slide's source markup.
#[derive(Debug, Clone, PartialEq)]
pub struct Placeholder {
    pub id: String,
    pub frame: Frame,
}

/// What a converter hands back for one input file.
#[derive(Debug, Clone, Default)]
pub struct ConvertedSlide {
    /// 0-based index of the slide the converter appended.
    pub index: usize,

    /// Placeholders found in the source, in document order.
    pub placeholders: Vec<Placeholder>,
}
