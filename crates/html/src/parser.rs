//! Lenient markup parser that reduces a slide's HTML to text blocks and placeholders.
//!
//! Slide HTML is hand-written and rarely well-formed XML, so the reader runs
//! with end-name checking off and the parser keeps its own element stack:
//! void elements never open a scope, and an end tag closes everything opened
//! after its matching start tag.

use crate::style::InlineStyle;
use deck_core::normalize::has_visible_text;
use deck_core::{Bullet, Error, Result};
use quick_xml::escape::unescape_with;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// Elements that never have content or an end tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Elements whose content never reaches the slide.
const SKIPPED_ELEMENTS: &[&str] = &[
    "head", "title", "style", "script", "noscript", "template", "svg",
];

/// What kind of text block an element starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Heading(u8),
    Paragraph,
    Preformatted,
    Quote,
    List { ordered: bool },
}

impl BlockKind {
    fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "h1" => Some(Self::Heading(1)),
            "h2" => Some(Self::Heading(2)),
            "h3" => Some(Self::Heading(3)),
            "h4" => Some(Self::Heading(4)),
            "h5" => Some(Self::Heading(5)),
            "h6" => Some(Self::Heading(6)),
            "p" => Some(Self::Paragraph),
            "pre" => Some(Self::Preformatted),
            "blockquote" => Some(Self::Quote),
            "ul" => Some(Self::List { ordered: false }),
            "ol" => Some(Self::List { ordered: true }),
            // A stray <li> still renders as a bulleted item.
            "li" => Some(Self::List { ordered: false }),
            _ => None,
        }
    }

    fn bullet(&self) -> Bullet {
        match self {
            Self::List { ordered: true } => Bullet::Numbered,
            Self::List { ordered: false } => Bullet::Disc,
            _ => Bullet::None,
        }
    }
}

/// A run of text that becomes one text box.
#[derive(Debug, Clone)]
pub struct Block {
    pub kind: BlockKind,
    pub style: InlineStyle,
    /// Raw (unnormalized) paragraph text with its list marker.
    pub paragraphs: Vec<(String, Bullet)>,
    /// Every visible character sat inside `<b>` or `<strong>`.
    pub all_bold: bool,
}

/// An element marked as a fillable region.
#[derive(Debug, Clone)]
pub struct RawPlaceholder {
    pub id: Option<String>,
    pub style: InlineStyle,
}

/// Slide content in document order.
#[derive(Debug, Clone)]
pub enum Element {
    Block(Block),
    Placeholder(RawPlaceholder),
}

/// Everything the layout step needs from one HTML file.
#[derive(Debug, Clone, Default)]
pub struct ParsedSlide {
    pub body_style: InlineStyle,
    pub elements: Vec<Element>,
}

/// Parse one slide's HTML.
pub fn parse_slide(html: &str) -> Result<ParsedSlide> {
    let mut reader = Reader::from_str(html);
    reader.check_end_names(false);

    let mut parser = SlideParser::default();

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                let tag = lower_name(e.name().as_ref());
                if VOID_ELEMENTS.contains(&tag.as_str()) {
                    parser.empty(&tag, e);
                } else {
                    parser.start(tag, e);
                }
            }
            Ok(Event::Empty(ref e)) => {
                let tag = lower_name(e.name().as_ref());
                parser.empty(&tag, e);
            }
            Ok(Event::End(ref e)) => {
                parser.end(&lower_name(e.name().as_ref()));
            }
            Ok(Event::Text(ref e)) => {
                let raw = String::from_utf8_lossy(e);
                let text = unescape_with(&raw, html_entity)
                    .map(|t| t.into_owned())
                    .unwrap_or_else(|_| raw.to_string());
                parser.text(&text)?;
            }
            Ok(Event::CData(ref e)) => {
                parser.text(&String::from_utf8_lossy(e))?;
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::HtmlParseError(format!(
                    "{} (near byte {})",
                    e,
                    reader.buffer_position()
                )));
            }
            _ => {}
        }
    }

    parser.finish()
}

/// How an open element affects parsing when it closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    Other,
    Skip,
    Block,
    /// Nested block or list item: paragraph boundary on open and close.
    Break,
    Bold,
}

#[derive(Debug)]
struct OpenElement {
    tag: String,
    role: Role,
}

#[derive(Debug)]
struct BlockBuilder {
    kind: BlockKind,
    style: InlineStyle,
    paragraphs: Vec<(String, Bullet)>,
    text: String,
    visible_chars: usize,
    bold_chars: usize,
}

impl BlockBuilder {
    fn new(kind: BlockKind, style: InlineStyle) -> Self {
        Self {
            kind,
            style,
            paragraphs: Vec::new(),
            text: String::new(),
            visible_chars: 0,
            bold_chars: 0,
        }
    }

    fn push_text(&mut self, text: &str, bold: bool) {
        self.text.push_str(text);
        let visible = text.chars().filter(|c| !c.is_whitespace()).count();
        self.visible_chars += visible;
        if bold {
            self.bold_chars += visible;
        }
    }

    fn break_paragraph(&mut self) {
        let text = std::mem::take(&mut self.text);
        if has_visible_text(&text) {
            self.paragraphs.push((text, self.kind.bullet()));
        }
    }

    fn line_break(&mut self) {
        if self.kind == BlockKind::Preformatted {
            self.text.push('\n');
        } else {
            self.break_paragraph();
        }
    }

    fn finish(mut self) -> Option<Block> {
        self.break_paragraph();
        if self.paragraphs.is_empty() {
            return None;
        }
        Some(Block {
            kind: self.kind,
            style: self.style,
            paragraphs: self.paragraphs,
            all_bold: self.visible_chars > 0 && self.bold_chars == self.visible_chars,
        })
    }
}

#[derive(Debug, Default)]
struct SlideParser {
    stack: Vec<OpenElement>,
    skip_depth: usize,
    bold_depth: usize,
    seen_body: bool,
    body_style: InlineStyle,
    current: Option<BlockBuilder>,
    elements: Vec<Element>,
    placeholder_count: usize,
}

impl SlideParser {
    fn start(&mut self, tag: String, e: &BytesStart) {
        let role = if self.skip_depth > 0 || SKIPPED_ELEMENTS.contains(&tag.as_str()) {
            Role::Skip
        } else {
            let attrs = ElementAttrs::read(e);
            if attrs.is_placeholder() {
                self.push_placeholder(attrs);
                Role::Skip
            } else {
                self.open(&tag, attrs)
            }
        };

        if role == Role::Skip {
            self.skip_depth += 1;
        }
        self.stack.push(OpenElement { tag, role });
    }

    fn open(&mut self, tag: &str, attrs: ElementAttrs) -> Role {
        match tag {
            "body" => {
                self.seen_body = true;
                self.body_style = attrs.style;
                Role::Other
            }
            "b" | "strong" => {
                self.bold_depth += 1;
                Role::Bold
            }
            _ => match (BlockKind::from_tag(tag), self.current.as_mut()) {
                (Some(_), Some(current)) => {
                    current.break_paragraph();
                    Role::Break
                }
                (Some(kind), None) => {
                    self.current = Some(BlockBuilder::new(kind, attrs.style));
                    Role::Block
                }
                (None, _) => Role::Other,
            },
        }
    }

    fn empty(&mut self, tag: &str, e: &BytesStart) {
        if self.skip_depth > 0 {
            return;
        }

        let attrs = ElementAttrs::read(e);
        if attrs.is_placeholder() {
            self.push_placeholder(attrs);
            return;
        }

        match tag {
            "br" => {
                if let Some(current) = self.current.as_mut() {
                    current.line_break();
                }
            }
            "body" => {
                self.seen_body = true;
                self.body_style = attrs.style;
            }
            "img" | "svg" | "canvas" | "video" => {
                log::warn!("<{}> elements are not converted", tag);
            }
            _ => {}
        }
    }

    fn end(&mut self, tag: &str) {
        let Some(pos) = self.stack.iter().rposition(|open| open.tag == tag) else {
            log::debug!("Ignoring unmatched </{}>", tag);
            return;
        };

        while self.stack.len() > pos {
            if let Some(open) = self.stack.pop() {
                self.close(open.role);
            }
        }
    }

    fn close(&mut self, role: Role) {
        match role {
            Role::Skip => self.skip_depth = self.skip_depth.saturating_sub(1),
            Role::Bold => self.bold_depth = self.bold_depth.saturating_sub(1),
            Role::Block => self.close_block(),
            Role::Break => {
                if let Some(current) = self.current.as_mut() {
                    current.break_paragraph();
                }
            }
            Role::Other => {}
        }
    }

    fn text(&mut self, text: &str) -> Result<()> {
        if self.skip_depth > 0 {
            return Ok(());
        }

        if let Some(current) = self.current.as_mut() {
            current.push_text(text, self.bold_depth > 0);
            return Ok(());
        }

        if !self.seen_body || !has_visible_text(text) {
            return Ok(());
        }

        let parent = self
            .stack
            .last()
            .map(|open| open.tag.as_str())
            .unwrap_or("body");
        Err(Error::HtmlParseError(format!(
            "text \"{}\" inside <{}> is not wrapped in <p>, <h1>-<h6>, <ul> or <ol>",
            snippet(text),
            parent
        )))
    }

    fn close_block(&mut self) {
        if let Some(builder) = self.current.take() {
            if let Some(block) = builder.finish() {
                self.elements.push(Element::Block(block));
            }
        }
    }

    fn push_placeholder(&mut self, attrs: ElementAttrs) {
        self.placeholder_count += 1;
        log::debug!(
            "Found placeholder {} ({})",
            self.placeholder_count,
            attrs.id.as_deref().unwrap_or("no id")
        );
        self.elements.push(Element::Placeholder(RawPlaceholder {
            id: attrs.id,
            style: attrs.style,
        }));
    }

    fn finish(mut self) -> Result<ParsedSlide> {
        self.close_block();

        if !self.seen_body {
            return Err(Error::HtmlParseError("no <body> element found".to_string()));
        }

        Ok(ParsedSlide {
            body_style: self.body_style,
            elements: self.elements,
        })
    }
}

/// The attributes the converter cares about.
#[derive(Debug, Default)]
struct ElementAttrs {
    id: Option<String>,
    classes: Vec<String>,
    style: InlineStyle,
}

impl ElementAttrs {
    fn read(e: &BytesStart) -> Self {
        let mut attrs = Self::default();

        for attr in e.html_attributes().flatten() {
            let value = String::from_utf8_lossy(&attr.value).to_string();
            match lower_name(attr.key.as_ref()).as_str() {
                "id" if !value.trim().is_empty() => attrs.id = Some(value.trim().to_string()),
                "class" => {
                    attrs.classes = value.split_whitespace().map(str::to_string).collect();
                }
                "style" => attrs.style = InlineStyle::parse(&value),
                _ => {}
            }
        }

        attrs
    }

    fn is_placeholder(&self) -> bool {
        self.classes.iter().any(|c| c == "placeholder")
    }
}

/// Lowercased local name of a potentially namespaced element or attribute.
fn lower_name(name: &[u8]) -> String {
    let local = match name.iter().position(|&b| b == b':') {
        Some(pos) => &name[pos + 1..],
        None => name,
    };
    String::from_utf8_lossy(local).to_ascii_lowercase()
}

/// Short, single-line excerpt of some text for error messages.
fn snippet(text: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() > 40 {
        format!("{}...", collapsed.chars().take(40).collect::<String>())
    } else {
        collapsed
    }
}

/// Named character references commonly found in slide text.
fn html_entity(name: &str) -> Option<&'static str> {
    let value = match name {
        "amp" => "&",
        "lt" => "<",
        "gt" => ">",
        "quot" => "\"",
        "apos" => "'",
        "nbsp" => "\u{A0}",
        "copy" => "\u{A9}",
        "reg" => "\u{AE}",
        "trade" => "\u{2122}",
        "mdash" => "\u{2014}",
        "ndash" => "\u{2013}",
        "hellip" => "\u{2026}",
        "lsquo" => "\u{2018}",
        "rsquo" => "\u{2019}",
        "ldquo" => "\u{201C}",
        "rdquo" => "\u{201D}",
        "laquo" => "\u{AB}",
        "raquo" => "\u{BB}",
        "bull" => "\u{2022}",
        "middot" => "\u{B7}",
        "times" => "\u{D7}",
        "divide" => "\u{F7}",
        "deg" => "\u{B0}",
        "plusmn" => "\u{B1}",
        "euro" => "\u{20AC}",
        "pound" => "\u{A3}",
        "yen" => "\u{A5}",
        "cent" => "\u{A2}",
        "sect" => "\u{A7}",
        "para" => "\u{B6}",
        "larr" => "\u{2190}",
        "uarr" => "\u{2191}",
        "rarr" => "\u{2192}",
        "darr" => "\u{2193}",
        "le" => "\u{2264}",
        "ge" => "\u{2265}",
        _ => return None,
    };
    Some(value)
}
