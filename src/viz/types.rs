//! Public types for the renderer: options, output formats, and layout introspection.

use std::path::Path;

use serde::Serialize;

use crate::error::{FigureError, Result};
use crate::models::{LegendPosition, Tick};

/// Dots per inch used when no other value is given; matches the figure scripts' default.
pub const DEFAULT_DPI: f64 = 100.0;

/// Per-render settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderOptions {
    pub dpi: f64,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { dpi: DEFAULT_DPI }
    }
}

impl RenderOptions {
    /// Convert a size in points to whole pixels at this DPI.
    pub fn px(&self, points: f64) -> u32 {
        (points * self.dpi / 72.0).round().max(1.0) as u32
    }
}

/// Image formats the renderer can write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
    Png,
}

impl OutputFormat {
    /// Pick the format from the file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        match ext.as_str() {
            "svg" => Ok(OutputFormat::Svg),
            "png" => Ok(OutputFormat::Png),
            _ => Err(FigureError::UnsupportedFormat(ext)),
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Svg => "svg",
            OutputFormat::Png => "png",
        }
    }
}

/// Which y axis a series is plotted against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AxisSide {
    Primary,
    Secondary,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ErrorBar {
    pub x: f64,
    pub low: f64,
    pub high: f64,
}

/// What one series ended up as on the axes, in data coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesLayout {
    pub name: String,
    pub axis: AxisSide,
    pub vertices: Vec<(f64, f64)>,
    pub error_bars: Vec<ErrorBar>,
}

/// Resolved geometry of one panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelLayout {
    pub x_range: (f64, f64),
    pub y_range: (f64, f64),
    pub secondary_y_range: Option<(f64, f64)>,
    pub x_ticks: Vec<Tick>,
    pub y_ticks: Vec<Tick>,
    pub secondary_y_ticks: Vec<Tick>,
    /// Final legend placement (`Best` resolved to a concrete corner); `None` without series.
    pub legend: Option<LegendPosition>,
    pub secondary_legend: Option<LegendPosition>,
    pub series: Vec<SeriesLayout>,
}

impl PanelLayout {
    pub fn series_named(&self, name: &str) -> Option<&SeriesLayout> {
        self.series.iter().find(|s| s.name == name)
    }
}

/// Returned by every render; one entry per panel, top to bottom.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartLayout {
    pub width: u32,
    pub height: u32,
    pub panels: Vec<PanelLayout>,
}
