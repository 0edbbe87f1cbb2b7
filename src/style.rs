//! Series styling vocabulary: colors, marker shapes, line dashes.
//!
//! This module has no plotters dependency; `viz::marker` adapts these values to
//! plotters styles and elements. Format strings follow the short notation used
//! by the original figure scripts (`"-o"`, `"-d"`, `"--s"`, `"o"`).

use std::fmt;
use std::str::FromStr;

use palette::Srgb;
use serde::{Deserialize, Serialize};

use crate::error::{FigureError, Result};

/// Marker drawn at every vertex of a series.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MarkerShape {
    Circle,
    Square,
    Triangle,
    Diamond,
    Pentagon,
    Cross,
    X,
}

impl MarkerShape {
    fn from_code(c: char) -> Option<Self> {
        Some(match c {
            'o' => MarkerShape::Circle,
            's' => MarkerShape::Square,
            '^' => MarkerShape::Triangle,
            'd' | 'D' => MarkerShape::Diamond,
            'p' => MarkerShape::Pentagon,
            '+' => MarkerShape::Cross,
            'x' => MarkerShape::X,
            _ => return None,
        })
    }
}

/// Stroke pattern of a series line or of the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LineDash {
    Solid,
    Dash,
    Dot,
    DashDot,
}

impl LineDash {
    /// On/off lengths in multiples of the line width. Empty for a solid stroke.
    pub fn pattern(self) -> &'static [f64] {
        match self {
            LineDash::Solid => &[],
            LineDash::Dash => &[3.7, 1.6],
            LineDash::Dot => &[1.0, 1.65],
            LineDash::DashDot => &[6.4, 1.6, 1.0, 1.6],
        }
    }
}

/// Whether markers are painted solid or drawn as outlines.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MarkerFill {
    #[default]
    Filled,
    Hollow,
}

/// Opaque 8-bit RGB color, written as `#RRGGBB` when serialized.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Look up an SVG/CSS color keyword (case-insensitive).
    pub fn named(name: &str) -> Option<Self> {
        palette::named::from_str(&name.trim().to_ascii_lowercase()).map(Self::from)
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl From<Srgb<u8>> for Color {
    fn from(c: Srgb<u8>) -> Self {
        Color::rgb(c.red, c.green, c.blue)
    }
}

impl FromStr for Color {
    type Err = FigureError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || FigureError::InvalidColor(s.to_string());
        let trimmed = s.trim();
        match trimmed.strip_prefix('#') {
            Some(hex) if hex.len() == 6 => trimmed
                .parse::<Srgb<u8>>()
                .map(Color::from)
                .map_err(|_| invalid()),
            Some(_) => Err(invalid()),
            None => Color::named(trimmed).ok_or_else(invalid),
        }
    }
}

impl TryFrom<String> for Color {
    type Error = FigureError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<Color> for String {
    fn from(c: Color) -> String {
        c.to_hex()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Full visual description of one series.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SeriesStyle {
    pub color: Color,
    /// `None` draws markers only.
    pub line: Option<LineDash>,
    pub marker: Option<MarkerShape>,
    #[serde(default)]
    pub marker_fill: MarkerFill,
    /// Marker diameter in points.
    pub marker_size: f64,
    /// Line width in points.
    pub line_width: f64,
    pub alpha: f64,
}

impl SeriesStyle {
    /// Plain line-plot style: filled markers, slightly translucent.
    pub fn plot(format: &str, color: &str) -> Result<Self> {
        let (line, marker) = parse_format(format)?;
        Ok(Self {
            color: color.parse()?,
            line,
            marker,
            marker_fill: MarkerFill::Filled,
            marker_size: 6.0,
            line_width: 1.5,
            alpha: 0.8,
        })
    }

    /// Error-bar style: hollow markers, opaque.
    pub fn errorbar(format: &str, color: &str) -> Result<Self> {
        Ok(Self {
            marker_fill: MarkerFill::Hollow,
            alpha: 1.0,
            ..Self::plot(format, color)?
        })
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_marker_size(mut self, size: f64) -> Self {
        self.marker_size = size;
        self
    }
}

/// Split a short format string into its line dash and marker parts.
///
/// A format with a marker but no line token draws markers only; an empty
/// format draws a solid line without markers.
pub fn parse_format(format: &str) -> Result<(Option<LineDash>, Option<MarkerShape>)> {
    let invalid = || FigureError::InvalidFormat(format.to_string());
    let mut rest = format.trim().to_string();

    let mut line = None;
    for (token, dash) in [
        ("--", LineDash::Dash),
        ("-.", LineDash::DashDot),
        ("-", LineDash::Solid),
        (":", LineDash::Dot),
    ] {
        if let Some(pos) = rest.find(token) {
            line = Some(dash);
            rest.replace_range(pos..pos + token.len(), "");
            break;
        }
    }

    let mut marker = None;
    for c in rest.chars() {
        let shape = MarkerShape::from_code(c).ok_or_else(invalid)?;
        if marker.replace(shape).is_some() {
            return Err(invalid());
        }
    }

    if line.is_none() && marker.is_none() {
        line = Some(LineDash::Solid);
    }
    Ok((line, marker))
}
