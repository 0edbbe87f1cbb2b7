use serde::{Deserialize, Serialize};

use crate::style::{LineDash, SeriesStyle};

/// One measurement: a plain value, or a low/high pair drawn as an error bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Sample {
    Value { x: f64, y: f64 },
    Range { x: f64, low: f64, high: f64 },
}

impl Sample {
    pub fn x(&self) -> f64 {
        match *self {
            Sample::Value { x, .. } | Sample::Range { x, .. } => x,
        }
    }

    /// Plotted vertex height. Ranges are drawn at the midpoint of the pair.
    pub fn center(&self) -> f64 {
        match *self {
            Sample::Value { y, .. } => y,
            Sample::Range { low, high, .. } => (low + high) / 2.0,
        }
    }

    /// Half-height of the error bar: the full spread of the pair, or 0 for plain values.
    pub fn error(&self) -> f64 {
        match *self {
            Sample::Value { .. } => 0.0,
            Sample::Range { low, high, .. } => (low - high).abs(),
        }
    }

    /// Vertical extent covered by the sample including its error bar.
    pub fn extent(&self) -> (f64, f64) {
        let (c, e) = (self.center(), self.error());
        (c - e, c + e)
    }
}

/// A named, styled sequence of samples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub name: String,
    pub points: Vec<Sample>,
    pub style: SeriesStyle,
}

impl Series {
    pub fn new(name: impl Into<String>, style: SeriesStyle) -> Self {
        Self {
            name: name.into(),
            points: Vec::new(),
            style,
        }
    }

    /// Plain `(x, y)` samples.
    pub fn with_values<I: IntoIterator<Item = (f64, f64)>>(mut self, values: I) -> Self {
        self.points
            .extend(values.into_iter().map(|(x, y)| Sample::Value { x, y }));
        self
    }

    /// `(x, (low, high))` samples.
    pub fn with_ranges<I: IntoIterator<Item = (f64, (f64, f64))>>(mut self, ranges: I) -> Self {
        self.points.extend(
            ranges
                .into_iter()
                .map(|(x, (low, high))| Sample::Range { x, low, high }),
        );
        self
    }

    /// Pair y values with x positions by index; surplus values on either side are dropped.
    pub fn with_ys(self, xs: &[f64], ys: &[f64]) -> Self {
        self.with_values(xs.iter().copied().zip(ys.iter().copied()))
    }
}

/// Where a legend box goes, relative to the axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LegendPosition {
    #[default]
    Best,
    UpperRight,
    UpperLeft,
    UpperCenter,
    LowerLeft,
    LowerRight,
    LowerCenter,
    CenterLeft,
    CenterRight,
    Center,
    /// Separate column to the right of the axes.
    OutsideRight,
}

impl LegendPosition {
    /// Candidates tried by `Best`, in preference order.
    pub const BEST_CANDIDATES: [LegendPosition; 9] = [
        LegendPosition::UpperRight,
        LegendPosition::UpperLeft,
        LegendPosition::LowerLeft,
        LegendPosition::LowerRight,
        LegendPosition::CenterRight,
        LegendPosition::CenterLeft,
        LegendPosition::LowerCenter,
        LegendPosition::UpperCenter,
        LegendPosition::Center,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LegendSpec {
    pub position: LegendPosition,
    pub columns: usize,
    /// Draw a border and background behind the entries.
    pub frame: bool,
}

impl Default for LegendSpec {
    fn default() -> Self {
        Self {
            position: LegendPosition::Best,
            columns: 1,
            frame: true,
        }
    }
}

impl LegendSpec {
    pub fn at(position: LegendPosition) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    pub fn frameless(mut self) -> Self {
        self.frame = false;
        self
    }

    pub fn columns(mut self, columns: usize) -> Self {
        self.columns = columns.max(1);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridStyle {
    pub dash: LineDash,
    pub alpha: f64,
    /// Line width in points.
    pub width: f64,
}

impl Default for GridStyle {
    fn default() -> Self {
        Self {
            dash: LineDash::Dash,
            alpha: 0.3,
            width: 0.8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    pub value: f64,
    pub label: String,
}

impl Tick {
    /// Ticks at integer positions labelled with the integer itself.
    pub fn integers<I: IntoIterator<Item = i64>>(values: I) -> Vec<Tick> {
        values
            .into_iter()
            .map(|v| Tick {
                value: v as f64,
                label: v.to_string(),
            })
            .collect()
    }
}

/// Right-hand y axis sharing the x axis of its panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecondaryAxis {
    pub label: Option<String>,
    pub y_range: Option<(f64, f64)>,
    pub series: Vec<Series>,
    #[serde(default)]
    pub legend: LegendSpec,
}

/// One set of axes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Panel {
    pub series: Vec<Series>,
    pub x_label: Option<String>,
    pub y_label: Option<String>,
    pub x_range: Option<(f64, f64)>,
    pub y_range: Option<(f64, f64)>,
    /// Explicit x ticks; automatic ticks when `None`.
    pub x_ticks: Option<Vec<Tick>>,
    /// `false` keeps the ticks but blanks their labels (upper panel of a stack).
    #[serde(default = "default_true")]
    pub x_tick_labels: bool,
    #[serde(default)]
    pub legend: LegendSpec,
    pub grid: Option<GridStyle>,
    pub secondary: Option<SecondaryAxis>,
}

fn default_true() -> bool {
    true
}

impl Panel {
    pub fn new() -> Self {
        Self {
            x_tick_labels: true,
            ..Self::default()
        }
    }

    pub fn series(mut self, series: Series) -> Self {
        self.series.push(series);
        self
    }

    pub fn x_label(mut self, label: impl Into<String>) -> Self {
        self.x_label = Some(label.into());
        self
    }

    pub fn y_label(mut self, label: impl Into<String>) -> Self {
        self.y_label = Some(label.into());
        self
    }

    pub fn x_range(mut self, lo: f64, hi: f64) -> Self {
        self.x_range = Some((lo, hi));
        self
    }

    pub fn y_range(mut self, lo: f64, hi: f64) -> Self {
        self.y_range = Some((lo, hi));
        self
    }

    pub fn x_ticks(mut self, ticks: Vec<Tick>) -> Self {
        self.x_ticks = Some(ticks);
        self
    }

    pub fn hide_x_tick_labels(mut self) -> Self {
        self.x_tick_labels = false;
        self
    }

    pub fn legend(mut self, legend: LegendSpec) -> Self {
        self.legend = legend;
        self
    }

    pub fn grid(mut self, grid: GridStyle) -> Self {
        self.grid = Some(grid);
        self
    }

    pub fn secondary(mut self, secondary: SecondaryAxis) -> Self {
        self.secondary = Some(secondary);
        self
    }

    /// Every series of the panel, primary axis first.
    pub fn all_series(&self) -> impl Iterator<Item = &Series> {
        self.series
            .iter()
            .chain(self.secondary.iter().flat_map(|s| s.series.iter()))
    }
}

/// Figure size in inches; pixels are inches times the render DPI.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FigureSize {
    pub width: f64,
    pub height: f64,
}

impl FigureSize {
    pub const fn inches(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn pixels(&self, dpi: f64) -> (u32, u32) {
        let px = |inches: f64| (inches * dpi).round().max(1.0) as u32;
        (px(self.width), px(self.height))
    }
}

/// A complete figure: vertically stacked panels written to one image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chart {
    /// Output file stem.
    pub name: String,
    pub size: FigureSize,
    pub title: Option<String>,
    /// Centered footer text, used as the shared x label of stacked panels.
    pub caption: Option<String>,
    pub panels: Vec<Panel>,
}

impl Chart {
    pub fn new(name: impl Into<String>, size: FigureSize) -> Self {
        Self {
            name: name.into(),
            size,
            title: None,
            caption: None,
            panels: Vec::new(),
        }
    }

    /// Chart with a single panel.
    pub fn single(name: impl Into<String>, size: FigureSize, panel: Panel) -> Self {
        Self::new(name, size).panel(panel)
    }

    pub fn panel(mut self, panel: Panel) -> Self {
        self.panels.push(panel);
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    pub fn series_count(&self) -> usize {
        self.panels.iter().map(|p| p.all_series().count()).sum()
    }

    pub fn sample_count(&self) -> usize {
        self.panels
            .iter()
            .flat_map(|p| p.all_series())
            .map(|s| s.points.len())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_samples_center_and_spread() {
        let s = Sample::Range {
            x: 3.0,
            low: 4.8,
            high: 7.64,
        };
        assert!((s.center() - 6.22).abs() < 1e-9);
        assert!((s.error() - 2.84).abs() < 1e-9);
        let (lo, hi) = s.extent();
        assert!((lo - 3.38).abs() < 1e-9);
        assert!((hi - 9.06).abs() < 1e-9);
    }

    #[test]
    fn figure_size_scales_with_dpi() {
        let size = FigureSize::inches(8.0, 4.0);
        assert_eq!(size.pixels(100.0), (800, 400));
        assert_eq!(size.pixels(150.0), (1200, 600));
    }

    #[test]
    fn with_ys_zips_to_shortest() {
        let style = SeriesStyle::plot("-o", "coral").unwrap();
        let s = Series::new("Block Rate", style).with_ys(&[4.0, 5.0, 6.0], &[1.0, 2.0]);
        assert_eq!(s.points.len(), 2);
    }
}
