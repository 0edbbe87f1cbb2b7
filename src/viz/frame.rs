//! Panel axes on the plotters chart layer: a coordinate whose key points are
//! the resolved ticks, label areas sized from those ticks, and the dashed grid.
//!
//! Tick positions come from the resolved [`PanelLayout`], so what is drawn is
//! exactly what the layout reports.

use std::ops::Range;

use plotters::chart::DualCoordChartContext;
use plotters::coord::Shift;
use plotters::coord::ranged1d::{KeyPointHint, NoDefaultFormatting, Ranged, ValueFormatter};
use plotters::coord::types::RangedCoordf64;
use plotters::element::{BackendCoordOnly, Drawable, PointCollection};
use plotters::prelude::*;
use plotters::style::FontFamily;

use super::marker::{Canvas, stroke};
use super::text::text_width_px;
use super::types::{PanelLayout, RenderOptions};
use crate::error::{Result, backend_err};
use crate::models::{GridStyle, Panel, Tick};

/// matplotlib's default grid gray.
const GRID_GRAY: (u8, u8, u8) = (176, 176, 176);

/// Font sizes in pixels for one render.
#[derive(Debug, Clone, Copy)]
pub struct Fonts {
    pub tick: u32,
    pub label: u32,
    pub legend: u32,
    pub title: u32,
}

impl Fonts {
    pub fn new(opts: &RenderOptions) -> Self {
        Self {
            tick: opts.px(10.0),
            label: opts.px(10.0),
            legend: opts.px(10.0),
            title: opts.px(12.0),
        }
    }

    pub fn pad(&self) -> i32 {
        (self.tick as i32 / 3).max(2)
    }

    /// Outward tick mark length. Tick labels sit twice this far from the spine.
    pub fn tick_len(&self) -> i32 {
        (self.tick as f64 * 0.35).round().max(2.0) as i32
    }
}

/// Space around the plotting rectangle inside a panel, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Margins {
    pub top: i32,
    pub bottom: i32,
    pub left: i32,
    pub right: i32,
}

impl Margins {
    /// Scale the margins down so at least one pixel of plotting rectangle
    /// remains inside an area of `size` pixels.
    pub fn fit(self, (w, h): (u32, u32)) -> Self {
        let (left, right) = squeeze(self.left, self.right, w);
        let (top, bottom) = squeeze(self.top, self.bottom, h);
        Self {
            top,
            bottom,
            left,
            right,
        }
    }
}

fn squeeze(a: i32, b: i32, room: u32) -> (i32, i32) {
    let avail = (room as i64 - 1).max(0);
    let total = (a + b) as i64;
    if total <= avail {
        return (a, b);
    }
    let a = (a as i64 * avail / total) as i32;
    (a, avail as i32 - a)
}

fn widest_label(ticks: &[Tick], font_px: u32) -> i32 {
    ticks
        .iter()
        .map(|t| text_width_px(&t.label, font_px) as i32)
        .max()
        .unwrap_or(0)
}

pub fn margins(panel: &Panel, layout: &PanelLayout, fonts: &Fonts) -> Margins {
    let pad = fonts.pad();
    let label_dist = 2 * fonts.tick_len();
    let title_w = |label: &Option<String>| {
        if label.is_some() {
            fonts.label as i32 + pad
        } else {
            0
        }
    };

    let left =
        pad + title_w(&panel.y_label) + widest_label(&layout.y_ticks, fonts.tick) + label_dist;

    let right = match &panel.secondary {
        Some(sec) => {
            label_dist
                + widest_label(&layout.secondary_y_ticks, fonts.tick)
                + pad
                + title_w(&sec.label)
        }
        None => {
            let last = layout
                .x_ticks
                .last()
                .map(|t| text_width_px(&t.label, fonts.tick) as i32 / 2)
                .unwrap_or(0);
            (last + pad).max(pad * 3)
        }
    };

    let x_labels_shown = layout.x_ticks.iter().any(|t| !t.label.is_empty());
    let bottom = label_dist
        + if x_labels_shown { fonts.tick as i32 + pad } else { 0 }
        + if panel.x_label.is_some() { fonts.label as i32 + pad } else { 0 };

    Margins {
        top: fonts.tick as i32 / 2 + pad,
        bottom,
        left,
        right,
    }
}

fn in_range(v: f64, (a, b): (f64, f64)) -> bool {
    let (lo, hi) = (a.min(b), a.max(b));
    let tol = (hi - lo).abs() * 1e-9;
    v >= lo - tol && v <= hi + tol
}

/// Linear axis whose key points are exactly the resolved ticks, formatted with their labels.
#[derive(Clone)]
pub struct TickAxis {
    linear: RangedCoordf64,
    ticks: Vec<Tick>,
}

impl TickAxis {
    pub fn new((lo, hi): (f64, f64), ticks: &[Tick]) -> Self {
        Self {
            linear: (lo..hi).into(),
            ticks: ticks
                .iter()
                .filter(|t| in_range(t.value, (lo, hi)))
                .cloned()
                .collect(),
        }
    }
}

impl Ranged for TickAxis {
    type FormatOption = NoDefaultFormatting;
    type ValueType = f64;

    fn map(&self, value: &f64, limit: (i32, i32)) -> i32 {
        self.linear.map(value, limit)
    }

    fn key_points<Hint: KeyPointHint>(&self, hint: Hint) -> Vec<f64> {
        if hint.weight().allow_light_points() {
            return Vec::new();
        }
        self.ticks.iter().map(|t| t.value).collect()
    }

    fn range(&self) -> Range<f64> {
        self.linear.range()
    }
}

impl ValueFormatter<f64> for TickAxis {
    fn format(value: &f64) -> String {
        value.to_string()
    }

    fn format_ext(&self, value: &f64) -> String {
        self.ticks
            .iter()
            .find(|t| t.value == *value)
            .map(|t| t.label.clone())
            .unwrap_or_default()
    }
}

pub type PanelCoord = Cartesian2d<TickAxis, TickAxis>;
pub type PanelChart<'a, DB> = ChartContext<'a, DB, PanelCoord>;
pub type TwinChart<'a, DB> = DualCoordChartContext<'a, DB, PanelCoord, PanelCoord>;

/// Series on the primary axes take data coordinates.
impl<DB: DrawingBackend> Canvas<DB, (f64, f64)> for PanelChart<'_, DB> {
    fn put<E, S>(&mut self, elements: S) -> Result<()>
    where
        for<'b> &'b E: PointCollection<'b, (f64, f64)>,
        E: Drawable<DB>,
        S: IntoIterator<Item = E>,
    {
        self.draw_series::<BackendCoordOnly, E, E, S>(elements)
            .map(|_| ())
            .map_err(backend_err)
    }
}

/// Draws onto the right-hand y axis of a twin chart.
pub struct SecondaryCanvas<'c, 'a, DB: DrawingBackend>(pub &'c mut TwinChart<'a, DB>);

impl<DB: DrawingBackend> Canvas<DB, (f64, f64)> for SecondaryCanvas<'_, '_, DB> {
    fn put<E, S>(&mut self, elements: S) -> Result<()>
    where
        for<'b> &'b E: PointCollection<'b, (f64, f64)>,
        E: Drawable<DB>,
        S: IntoIterator<Item = E>,
    {
        self.0
            .draw_secondary_series::<E, E, S>(elements)
            .map(|_| ())
            .map_err(backend_err)
    }
}

fn axis_line() -> ShapeStyle {
    ShapeStyle {
        color: BLACK.to_rgba(),
        filled: false,
        stroke_width: 1,
    }
}

/// Reserve the label areas given by `m` inside `area` and set up the data coordinates.
///
/// With a secondary axis the right margin becomes a label area for it.
pub fn build_chart<'a, DB: DrawingBackend>(
    area: &'a DrawingArea<DB, Shift>,
    layout: &PanelLayout,
    m: Margins,
) -> Result<PanelChart<'a, DB>> {
    let twin = layout.secondary_y_range.is_some();
    let (right_margin, right_area) = if twin { (0, m.right) } else { (m.right, 0) };
    ChartBuilder::on(area)
        .margin_top(m.top)
        .margin_right(right_margin)
        .set_label_area_size(LabelAreaPosition::Left, m.left)
        .set_label_area_size(LabelAreaPosition::Bottom, m.bottom)
        .set_label_area_size(LabelAreaPosition::Right, right_area)
        .build_cartesian_2d(
            TickAxis::new(layout.x_range, &layout.x_ticks),
            TickAxis::new(layout.y_range, &layout.y_ticks),
        )
        .map_err(backend_err)
}

/// Move the right label area over to a secondary y coordinate spanning `range`.
pub fn add_secondary<'a, DB: DrawingBackend>(
    chart: PanelChart<'a, DB>,
    layout: &PanelLayout,
    range: (f64, f64),
) -> TwinChart<'a, DB> {
    chart.set_secondary_coord(
        TickAxis::new(layout.x_range, &layout.x_ticks),
        TickAxis::new(range, &layout.secondary_y_ticks),
    )
}

/// Bottom and left spines with outward ticks, tick labels and axis titles,
/// plus the closing top and right spines.
pub fn draw_primary_axes<DB: DrawingBackend>(
    chart: &mut PanelChart<'_, DB>,
    panel: &Panel,
    layout: &PanelLayout,
    fonts: &Fonts,
) -> Result<()> {
    {
        let mut mesh = chart.configure_mesh();
        mesh.disable_mesh()
            .axis_style(axis_line())
            .set_all_tick_mark_size(fonts.tick_len())
            .label_style((FontFamily::SansSerif, fonts.tick))
            .axis_desc_style((FontFamily::SansSerif, fonts.label));
        if let Some(label) = &panel.x_label {
            mesh.x_desc(label.as_str());
        }
        if let Some(label) = &panel.y_label {
            mesh.y_desc(label.as_str());
        }
        mesh.draw().map_err(backend_err)?;
    }

    let (x0, x1) = layout.x_range;
    let (y0, y1) = layout.y_range;
    chart.put([Rectangle::new([(x0, y1), (x1, y0)], axis_line())])
}

/// Ticks, tick labels and title of the right-hand y axis.
pub fn draw_secondary_axis<DB: DrawingBackend>(
    twin: &mut TwinChart<'_, DB>,
    label: Option<&str>,
    fonts: &Fonts,
) -> Result<()> {
    let mut axes = twin.configure_secondary_axes();
    axes.axis_style(axis_line())
        .set_all_tick_mark_size(fonts.tick_len())
        .label_style((FontFamily::SansSerif, fonts.tick))
        .axis_desc_style((FontFamily::SansSerif, fonts.label));
    if let Some(label) = label {
        axes.y_desc(label);
    }
    axes.draw().map_err(backend_err)
}

/// Dashed grid lines at every tick of the x axis and the primary y axis.
pub fn draw_grid<DB: DrawingBackend>(
    chart: &mut PanelChart<'_, DB>,
    layout: &PanelLayout,
    grid: &GridStyle,
    opts: &RenderOptions,
) -> Result<()> {
    let style = ShapeStyle {
        color: RGBAColor(GRID_GRAY.0, GRID_GRAY.1, GRID_GRAY.2, grid.alpha.clamp(0.0, 1.0)),
        filled: false,
        stroke_width: (grid.width * opts.dpi / 72.0).round().max(1.0) as u32,
    };
    let (x0, x1) = layout.x_range;
    let (y0, y1) = layout.y_range;

    for t in layout.x_ticks.iter().filter(|t| in_range(t.value, layout.x_range)) {
        stroke(chart, vec![(t.value, y0), (t.value, y1)], grid.dash, style)?;
    }
    for t in layout.y_ticks.iter().filter(|t| in_range(t.value, layout.y_range)) {
        stroke(chart, vec![(x0, t.value), (x1, t.value)], grid.dash, style)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SecondaryAxis;
    use crate::viz::axis::resolve_panel;
    use plotters::coord::ranged1d::{BoldPoints, LightPoints};

    fn fonts() -> Fonts {
        Fonts::new(&RenderOptions::default())
    }

    #[test]
    fn fonts_follow_points_at_dpi() {
        let f = fonts();
        assert_eq!(f.tick, 14);
        assert_eq!(f.title, 17);
        let big = Fonts::new(&RenderOptions { dpi: 200.0 });
        assert_eq!(big.tick, 28);
    }

    #[test]
    fn axis_titles_and_secondary_axis_take_room() {
        let bare = Panel::new().y_range(0.0, 100.0);
        let titled = bare.clone().x_label("Replica Number").y_label("Rate (%)");
        let m_bare = margins(&bare, &resolve_panel(&bare), &fonts());
        let m_titled = margins(&titled, &resolve_panel(&titled), &fonts());
        assert!(m_titled.left > m_bare.left);
        assert!(m_titled.bottom > m_bare.bottom);

        let twin = bare.clone().secondary(SecondaryAxis {
            label: Some("blocks per HS-commit".into()),
            y_range: Some((0.0, 6.0)),
            series: Vec::new(),
            legend: Default::default(),
        });
        let m_twin = margins(&twin, &resolve_panel(&twin), &fonts());
        assert!(m_twin.right > m_bare.right);
    }

    #[test]
    fn hidden_x_labels_shrink_the_bottom_margin() {
        let shown = Panel::new().x_ticks(Tick::integers([4, 8, 12]));
        let hidden = shown.clone().hide_x_tick_labels();
        let a = margins(&shown, &resolve_panel(&shown), &fonts());
        let b = margins(&hidden, &resolve_panel(&hidden), &fonts());
        assert!(b.bottom < a.bottom);
    }

    #[test]
    fn fit_leaves_a_plotting_pixel_in_tiny_areas() {
        let m = Margins {
            top: 12,
            bottom: 40,
            left: 60,
            right: 20,
        };
        assert_eq!(m.fit((800, 600)), m);

        let small = m.fit((40, 13));
        assert!(small.left + small.right <= 39);
        assert!(small.top + small.bottom <= 12);
        assert!(small.left > small.right && small.bottom > small.top);

        let none = m.fit((0, 1));
        assert_eq!((none.left, none.right, none.top, none.bottom), (0, 0, 0, 0));
    }

    #[test]
    fn tick_axis_keys_are_the_ticks_in_range() {
        let ticks = Tick::integers([0, 5, 10, 15]);
        let axis = TickAxis::new((0.0, 12.0), &ticks);
        assert_eq!(axis.key_points(BoldPoints(3)), vec![0.0, 5.0, 10.0]);
        assert!(axis.key_points(LightPoints::new(3, 10)).is_empty());
        assert_eq!(axis.format_ext(&10.0), "10");
        assert_eq!(axis.format_ext(&2.5), "");
        assert_eq!(axis.map(&12.0, (0, 120)), 120);
    }
}
