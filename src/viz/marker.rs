//! Series strokes, dash patterns, and marker shapes as plotters elements.
//!
//! The builders here are generic over the coordinate type, so the same code
//! draws data-space series through a chart and pixel-space legend handles.

use plotters::coord::Shift;
use plotters::element::{BackendCoordOnly, Drawable, PointCollection};
use plotters::prelude::*;

use super::types::RenderOptions;
use crate::error::{Result, backend_err};
use crate::style::{Color as StyleColor, LineDash, MarkerFill, MarkerShape, SeriesStyle};

/// Marker edge width in points for hollow markers.
const MARKER_EDGE_PT: f64 = 1.0;

pub fn rgba(color: StyleColor, alpha: f64) -> RGBAColor {
    RGBAColor(color.r, color.g, color.b, alpha.clamp(0.0, 1.0))
}

/// Anything series elements can be drawn on in coordinates `C`.
pub trait Canvas<DB: DrawingBackend, C> {
    fn put<E, S>(&mut self, elements: S) -> Result<()>
    where
        for<'b> &'b E: PointCollection<'b, C>,
        E: Drawable<DB>,
        S: IntoIterator<Item = E>;
}

/// A plain drawing area takes elements in its own pixel coordinates.
impl<DB: DrawingBackend> Canvas<DB, (i32, i32)> for DrawingArea<DB, Shift> {
    fn put<E, S>(&mut self, elements: S) -> Result<()>
    where
        for<'b> &'b E: PointCollection<'b, (i32, i32)>,
        E: Drawable<DB>,
        S: IntoIterator<Item = E>,
    {
        for element in elements {
            self.draw::<E, BackendCoordOnly>(&element)
                .map_err(backend_err)?;
        }
        Ok(())
    }
}

/// Series style resolved to pixel sizes and a plotters color.
#[derive(Debug, Clone, Copy)]
pub struct PixelStyle {
    pub color: RGBAColor,
    pub line: Option<LineDash>,
    pub line_px: f64,
    pub marker: Option<MarkerShape>,
    pub fill: MarkerFill,
    pub radius: i32,
    pub edge_px: u32,
}

impl PixelStyle {
    pub fn new(style: &SeriesStyle, opts: &RenderOptions) -> Self {
        let scale = opts.dpi / 72.0;
        Self {
            color: rgba(style.color, style.alpha),
            line: style.line,
            line_px: (style.line_width * scale).max(1.0),
            marker: style.marker,
            fill: style.marker_fill,
            radius: ((style.marker_size * scale) / 2.0).round().max(1.0) as i32,
            edge_px: opts.px(MARKER_EDGE_PT),
        }
    }

    pub fn stroke(&self) -> ShapeStyle {
        ShapeStyle {
            color: self.color,
            filled: false,
            stroke_width: self.line_px.round().max(1.0) as u32,
        }
    }

    fn edge(&self) -> ShapeStyle {
        ShapeStyle {
            color: self.color,
            filled: false,
            stroke_width: self.edge_px.max(1),
        }
    }

    fn solid(&self) -> ShapeStyle {
        ShapeStyle {
            color: self.color,
            filled: true,
            stroke_width: 0,
        }
    }
}

/// Dash pattern lengths in whole pixels for a stroke `width` pixels wide.
///
/// Solid lines have no pattern. Dash and dot give `[on, off]`; dash-dot gives
/// `[dash, gap, dot, gap]`.
pub fn dash_lengths(dash: LineDash, width: u32) -> Vec<i32> {
    let unit = width.max(1) as f64;
    dash.pattern()
        .iter()
        .map(|l| (l * unit).round().max(1.0) as i32)
        .collect()
}

/// Stroke the polyline `points` with `dash`.
///
/// Dash-dot is a dashed series whose gaps each hold one dot; both walk the
/// polyline continuously, so they stay in phase across vertices.
pub fn stroke<DB, C, T>(
    canvas: &mut T,
    points: Vec<C>,
    dash: LineDash,
    style: ShapeStyle,
) -> Result<()>
where
    DB: DrawingBackend,
    C: Clone + 'static,
    T: Canvas<DB, C>,
{
    if points.len() < 2 {
        return Ok(());
    }
    let lengths = dash_lengths(dash, style.stroke_width);
    match (dash, lengths.as_slice()) {
        (LineDash::DashDot, &[on, gap, dot, _]) => {
            let period = on + 2 * gap + dot;
            let radius = (dot / 2).max(1);
            let color = style.color;
            canvas.put(DashedLineSeries::new(points.clone(), on, period - on, style))?;
            canvas.put(DottedLineSeries::new(
                points,
                on + gap + dot / 2,
                period,
                move |c: (i32, i32)| Circle::new(c, radius, color.filled()),
            ))
        }
        (_, &[on, off, ..]) => canvas.put(DashedLineSeries::new(points, on, off, style)),
        _ => canvas.put(LineSeries::new(points, style)),
    }
}

/// Vertices of a regular polygon around the origin, first vertex straight up.
fn regular_polygon(radius: i32, sides: usize) -> Vec<(i32, i32)> {
    let r = radius as f64;
    let step = std::f64::consts::TAU / sides as f64;
    (0..sides)
        .map(|k| {
            let angle = -std::f64::consts::FRAC_PI_2 + k as f64 * step;
            ((r * angle.cos()).round() as i32, (r * angle.sin()).round() as i32)
        })
        .collect()
}

/// Draw one `shape` marker at each of `points`.
pub fn markers<DB, C, T>(
    canvas: &mut T,
    points: &[C],
    shape: MarkerShape,
    style: &PixelStyle,
) -> Result<()>
where
    DB: DrawingBackend,
    C: Clone,
    T: Canvas<DB, C>,
{
    let r = style.radius;
    let filled = style.fill == MarkerFill::Filled;
    let (edge, solid) = (style.edge(), style.solid());
    let paint = if filled { solid } else { edge };
    let at = |p: &C| -> EmptyElement<C, DB> { EmptyElement::at(p.clone()) };

    let outline = match shape {
        MarkerShape::Triangle => regular_polygon(r, 3),
        MarkerShape::Pentagon => regular_polygon(r, 5),
        MarkerShape::Diamond => {
            let w = ((r as f64) * 0.6).round() as i32;
            vec![(0, -r), (-w, 0), (0, r), (w, 0)]
        }
        MarkerShape::Circle => {
            return canvas.put(points.iter().map(|p| at(p) + Circle::new((0, 0), r, paint)));
        }
        MarkerShape::Square => {
            let h = ((r as f64) * 0.85).round() as i32;
            return canvas.put(
                points
                    .iter()
                    .map(|p| at(p) + Rectangle::new([(-h, -h), (h, h)], paint)),
            );
        }
        MarkerShape::Cross => {
            return canvas.put(points.iter().map(|p| {
                at(p)
                    + PathElement::new(vec![(-r, 0), (r, 0)], edge)
                    + PathElement::new(vec![(0, -r), (0, r)], edge)
            }));
        }
        MarkerShape::X => {
            return canvas.put(points.iter().map(|p| {
                at(p)
                    + PathElement::new(vec![(-r, -r), (r, r)], edge)
                    + PathElement::new(vec![(-r, r), (r, -r)], edge)
            }));
        }
    };

    if filled {
        canvas.put(points.iter().map(|p| at(p) + Polygon::new(outline.clone(), solid)))
    } else {
        let mut ring = outline;
        ring.push(ring[0]);
        canvas.put(points.iter().map(|p| at(p) + PathElement::new(ring.clone(), edge)))
    }
}

/// Legend handle: a short stroke in the series dash with the marker at its center.
pub fn draw_handle<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    left: i32,
    center_y: i32,
    width: i32,
    style: &PixelStyle,
) -> Result<()> {
    let mut canvas = area.clone();
    if let Some(dash) = style.line {
        let ends = vec![(left, center_y), (left + width, center_y)];
        stroke(&mut canvas, ends, dash, style.stroke())?;
    }
    if let Some(shape) = style.marker {
        markers(&mut canvas, &[(left + width / 2, center_y)], shape, style)?;
    }
    Ok(())
}
