//! Inline `style="..."` attribute handling.

use deck_core::{EMU_PER_INCH, EMU_PER_PIXEL, EMU_PER_POINT};
use regex::Regex;
use std::sync::LazyLock;

/// A CSS length: number plus optional unit.
static LENGTH_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(-?\d*\.?\d+)\s*(px|pt|in|cm|mm)?\s*$").unwrap()
});

/// Largest coordinate a DrawingML shape may carry, in EMUs.
pub const MAX_COORDINATE: i64 = 27_273_042_316_900;

/// Largest font size PowerPoint accepts, in points.
const MAX_FONT_SIZE: f64 = 4000.0;

/// Declarations from one `style` attribute, in source order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InlineStyle {
    declarations: Vec<(String, String)>,
}

impl InlineStyle {
    /// Parse the contents of a `style` attribute. Malformed declarations are skipped.
    pub fn parse(style: &str) -> Self {
        let declarations = style
            .split(';')
            .filter_map(|decl| decl.split_once(':'))
            .map(|(prop, value)| {
                (
                    prop.trim().to_ascii_lowercase(),
                    value.trim().trim_end_matches("!important").trim().to_string(),
                )
            })
            .filter(|(prop, value)| !prop.is_empty() && !value.is_empty())
            .collect();

        Self { declarations }
    }

    /// Value of a property; later declarations win.
    pub fn get(&self, property: &str) -> Option<&str> {
        self.declarations
            .iter()
            .rev()
            .find(|(p, _)| p == property)
            .map(|(_, v)| v.as_str())
    }

    /// A length property converted to EMUs.
    pub fn length(&self, property: &str) -> Option<i64> {
        self.get(property).and_then(parse_length)
    }

    /// `font-size` in points.
    pub fn font_size(&self) -> Option<f64> {
        self.length("font-size")
            .map(|emu| emu as f64 / EMU_PER_POINT as f64)
            .filter(|pt| *pt > 0.0)
            .map(|pt| pt.min(MAX_FONT_SIZE))
    }

    /// `font-weight` as bold or not, if declared.
    pub fn bold(&self) -> Option<bool> {
        let weight = self.get("font-weight")?.to_ascii_lowercase();
        match weight.as_str() {
            "bold" | "bolder" => Some(true),
            "normal" | "lighter" => Some(false),
            numeric => numeric.parse::<u32>().ok().map(|w| w >= 600),
        }
    }
}

/// Convert a CSS length to EMUs. Unitless numbers are pixels.
///
/// Results are clamped to `±MAX_COORDINATE`, so sums of a handful of lengths
/// stay well inside `i64`.
pub fn parse_length(value: &str) -> Option<i64> {
    let caps = LENGTH_REGEX.captures(value)?;
    let number: f64 = caps.get(1)?.as_str().parse().ok()?;
    let unit = caps
        .get(2)
        .map(|m| m.as_str().to_ascii_lowercase())
        .unwrap_or_else(|| "px".to_string());

    let per_unit = match unit.as_str() {
        "pt" => EMU_PER_POINT as f64,
        "in" => EMU_PER_INCH as f64,
        "cm" => 360_000.0,
        "mm" => 36_000.0,
        _ => EMU_PER_PIXEL as f64,
    };

    let bound = MAX_COORDINATE as f64;
    Some((number * per_unit).round().clamp(-bound, bound) as i64)
}
