use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::color::Color;
use crate::error::PaletteError;
use crate::parse;

/// A validated color in the exact notation the user's text was wrapped into.
///
/// Equality is by string: `#f00` and `rgb(255 0 0)` are different entries.
#[derive(Debug, Clone)]
pub struct CanonicalColor {
    text: String,
    color: Color,
}

impl CanonicalColor {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// The numeric color this notation denotes.
    pub fn color(&self) -> Color {
        self.color
    }
}

impl PartialEq for CanonicalColor {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

impl Eq for CanonicalColor {}

impl PartialEq<str> for CanonicalColor {
    fn eq(&self, other: &str) -> bool {
        self.text == other
    }
}

impl PartialEq<&str> for CanonicalColor {
    fn eq(&self, other: &&str) -> bool {
        self.text == *other
    }
}

impl AsRef<str> for CanonicalColor {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for CanonicalColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Which shorthand a raw input was recognized as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Oklch,
    Hsl,
    Rgb,
    Hex,
    /// Already a full notation (or garbage); left for the parser to judge.
    Verbatim,
}

struct ShapeMatcher {
    shape: Shape,
    matches: fn(&str) -> bool,
    wrap: fn(&str) -> String,
}

static OKLCH_TRIPLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d*\.?\d+\s+\d*\.?\d+\s+\d*\.?\d+$").expect("static regex"));

static HSL_TRIPLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d+(?:\.\d+)?(deg|turn|rad|grad)?\s+\d+(?:\.\d+)?(%)?\s+\d+(?:\.\d+)?(%)?$")
        .expect("static regex")
});

static RGB_TRIPLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+\s*[,\s]\s*\d+\s*[,\s]\s*\d+$").expect("static regex"));

static HEX_BODY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9a-fA-F]{3,8}$").expect("static regex"));

// Order matters: integer triples without units also fit the HSL pattern, and
// any decimal triple would fit the HSL pattern without its unit check.
static SHAPES: [ShapeMatcher; 4] = [
    ShapeMatcher {
        shape: Shape::Oklch,
        matches: |s| OKLCH_TRIPLE.is_match(s) && s.contains('.'),
        wrap: |s| format!("oklch({s})"),
    },
    ShapeMatcher {
        shape: Shape::Hsl,
        matches: |s| {
            HSL_TRIPLE
                .captures(s)
                .is_some_and(|caps| (1..=3).any(|i| caps.get(i).is_some()))
        },
        wrap: |s| format!("hsl({s})"),
    },
    ShapeMatcher {
        shape: Shape::Rgb,
        matches: |s| RGB_TRIPLE.is_match(s),
        wrap: |s| {
            let channels: Vec<&str> = s
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|t| !t.is_empty())
                .collect();
            format!("rgb({})", channels.join(" "))
        },
    },
    ShapeMatcher {
        shape: Shape::Hex,
        matches: |s| HEX_BODY.is_match(s),
        wrap: |s| format!("#{s}"),
    },
];

/// Classify trimmed input and wrap it into a full notation.
///
/// The first matching shape wins; unmatched text is returned unchanged.
pub fn classify(input: &str) -> (Shape, String) {
    let text = input.trim();
    SHAPES
        .iter()
        .find(|m| (m.matches)(text))
        .map(|m| (m.shape, (m.wrap)(text)))
        .unwrap_or_else(|| (Shape::Verbatim, text.to_string()))
}

/// Turn raw user text into a canonical color, or reject it.
pub fn normalize(input: &str) -> Result<CanonicalColor, PaletteError> {
    let (shape, text) = classify(input);
    match parse::parse(&text) {
        Ok(color) => {
            debug!(input, canonical = %text, ?shape, "normalized color");
            Ok(CanonicalColor { text, color })
        }
        Err(source) => {
            debug!(input, candidate = %text, ?shape, error = %source, "rejected color");
            Err(PaletteError::InvalidInput {
                input: input.to_string(),
                source,
            })
        }
    }
}
