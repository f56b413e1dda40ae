//! Text normalization for slide content taken from markup.
//!
//! Markup whitespace is insignificant: runs of spaces, tabs, and newlines
//! collapse to one space. Non-breaking spaces survive as ordinary spaces and
//! text is brought to Unicode NFC so composed and decomposed input render alike.

use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

/// Regex to collapse markup whitespace into one space.
static WHITESPACE_COLLAPSE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t\r\n\x0C]+").unwrap());

/// Zero-width characters that should never reach a slide.
const INVISIBLE_CHARS: &[char] = &['\u{200B}', '\u{200C}', '\u{200D}', '\u{FEFF}'];

/// Text normalizer for markup-derived slide text.
#[derive(Debug, Clone, Default)]
pub struct TextNormalizer {
    /// Whether to keep line breaks (as in `<pre>`).
    preserve_line_breaks: bool,
}

impl TextNormalizer {
    /// Create a normalizer that collapses all whitespace.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether to preserve original line breaks.
    pub fn with_preserve_line_breaks(mut self, preserve: bool) -> Self {
        self.preserve_line_breaks = preserve;
        self
    }

    /// Normalize a run of text for display.
    pub fn normalize(&self, text: &str) -> String {
        let cleaned: String = text
            .nfc()
            .filter(|c| !INVISIBLE_CHARS.contains(c))
            .map(|c| if c == '\u{A0}' { ' ' } else { c })
            .collect();

        if self.preserve_line_breaks {
            cleaned
                .replace("\r\n", "\n")
                .replace('\r', "\n")
                .lines()
                .map(|line| line.trim_end().to_string())
                .collect::<Vec<_>>()
                .join("\n")
                .trim_matches('\n')
                .to_string()
        } else {
            WHITESPACE_COLLAPSE_REGEX
                .replace_all(&cleaned, " ")
                .trim()
                .to_string()
        }
    }

    /// Normalize text and split it into non-empty lines.
    pub fn normalize_to_lines(&self, text: &str) -> Vec<String> {
        self.normalize(text)
            .lines()
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty())
            .collect()
    }
}

/// True if the text has anything besides markup whitespace.
pub fn has_visible_text(text: &str) -> bool {
    text.chars()
        .any(|c| !c.is_whitespace() && !INVISIBLE_CHARS.contains(&c))
}
