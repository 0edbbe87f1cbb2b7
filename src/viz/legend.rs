//! Legend measurement, placement, and drawing.
//!
//! Inside legends sit in one of nine anchor spots within the axes, with
//! entries laid out column-major across `columns`. `Best` picks the anchor
//! covering the fewest series vertices and line segments. Outside legends get
//! their own column to the right of the axes and wrap long labels.

use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::FontFamily;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use super::marker::{PixelStyle, draw_handle};
use super::text::{text_width_px, wrap_to_width};
use crate::error::{Result, backend_err};
use crate::models::{LegendPosition, LegendSpec};

/// One legend row: the series name and how its handle is drawn.
#[derive(Debug, Clone)]
pub struct LegendEntry<'a> {
    pub label: &'a str,
    pub style: PixelStyle,
}

/// Spacing derived from the legend font size.
#[derive(Debug, Clone, Copy)]
struct Metrics {
    font_px: u32,
    pad: i32,
    row_h: i32,
    handle_w: i32,
    handle_gap: i32,
    col_gap: i32,
}

impl Metrics {
    fn new(font_px: u32) -> Self {
        let f = font_px as f64;
        Self {
            font_px,
            pad: (f * 0.5).round() as i32,
            row_h: (f * 1.5).round() as i32,
            handle_w: (f * 2.0).round() as i32,
            handle_gap: (f * 0.8).round() as i32,
            col_gap: (f * 2.0).round() as i32,
        }
    }

    fn entry_w(&self, label: &str) -> i32 {
        self.handle_w + self.handle_gap + text_width_px(label, self.font_px) as i32
    }
}

fn rows_for(count: usize, columns: usize) -> usize {
    count.div_ceil(columns.max(1))
}

/// Column index of every entry; entries fill the first column top to bottom, then the next.
fn column_major(count: usize, columns: usize) -> Vec<(usize, usize)> {
    let rows = rows_for(count, columns).max(1);
    (0..count).map(|i| (i / rows, i % rows)).collect()
}

fn column_widths(labels: &[&str], columns: usize, m: &Metrics) -> Vec<i32> {
    let rows = rows_for(labels.len(), columns).max(1);
    let cols = labels.len().div_ceil(rows).max(1);
    let mut widths = vec![0; cols];
    for (label, (col, _)) in labels.iter().zip(column_major(labels.len(), cols)) {
        widths[col] = widths[col].max(m.entry_w(label));
    }
    widths
}

/// Pixel size `(width, height)` of an inside legend box.
pub fn measure(labels: &[&str], columns: usize, font_px: u32) -> (i32, i32) {
    if labels.is_empty() {
        return (0, 0);
    }
    let m = Metrics::new(font_px);
    let widths = column_widths(labels, columns, &m);
    let w = 2 * m.pad + widths.iter().sum::<i32>() + m.col_gap * (widths.len() as i32 - 1);
    let h = 2 * m.pad + rows_for(labels.len(), widths.len()) as i32 * m.row_h;
    (w, h)
}

/// Top-left corner of a `size` box placed at `position` inside `area`,
/// `inset` pixels from the edges.
pub fn anchor(
    position: LegendPosition,
    size: (i32, i32),
    area: (i32, i32),
    inset: i32,
) -> (i32, i32) {
    use LegendPosition::*;
    let (w, h) = size;
    let (aw, ah) = area;
    let left = inset;
    let right = aw - w - inset;
    let mid_x = (aw - w) / 2;
    let top = inset;
    let bottom = ah - h - inset;
    let mid_y = (ah - h) / 2;
    match position {
        UpperLeft => (left, top),
        UpperCenter => (mid_x, top),
        UpperRight | Best | OutsideRight => (right, top),
        CenterLeft => (left, mid_y),
        Center => (mid_x, mid_y),
        CenterRight => (right, mid_y),
        LowerLeft => (left, bottom),
        LowerCenter => (mid_x, bottom),
        LowerRight => (right, bottom),
    }
}

/// Whether the segment `a`-`b` passes through the box `[x0, x1] x [y0, y1]`.
///
/// Clips the segment's parameter range against each slab in turn.
fn crosses(a: (f64, f64), b: (f64, f64), (x0, y0): (f64, f64), (x1, y1): (f64, f64)) -> bool {
    let (dx, dy) = (b.0 - a.0, b.1 - a.1);
    let mut t = (0.0_f64, 1.0_f64);
    for (p, q) in [
        (-dx, a.0 - x0),
        (dx, x1 - a.0),
        (-dy, a.1 - y0),
        (dy, y1 - a.1),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return false;
            }
        } else {
            let r = q / p;
            if p < 0.0 {
                t.0 = t.0.max(r);
            } else {
                t.1 = t.1.min(r);
            }
            if t.0 > t.1 {
                return false;
            }
        }
    }
    true
}

/// Candidate position whose box covers the fewest `vertices` plus crossing
/// `segments` (pixel coordinates). Ties go to the earlier candidate in
/// [`LegendPosition::BEST_CANDIDATES`].
pub fn best_position(
    size: (i32, i32),
    area: (i32, i32),
    inset: i32,
    vertices: &[(f64, f64)],
    segments: &[((f64, f64), (f64, f64))],
) -> LegendPosition {
    let mut best = LegendPosition::BEST_CANDIDATES[0];
    let mut best_hits = usize::MAX;
    for candidate in LegendPosition::BEST_CANDIDATES {
        let (x0, y0) = anchor(candidate, size, area, inset);
        let lo = (x0 as f64, y0 as f64);
        let hi = ((x0 + size.0) as f64, (y0 + size.1) as f64);
        let covered = vertices
            .iter()
            .filter(|(x, y)| *x >= lo.0 && *x <= hi.0 && *y >= lo.1 && *y <= hi.1)
            .count();
        let crossed = segments.iter().filter(|(a, b)| crosses(*a, *b, lo, hi)).count();
        let hits = covered + crossed;
        if hits < best_hits {
            best = candidate;
            best_hits = hits;
        }
    }
    best
}

fn label_style(font_px: u32) -> TextStyle<'static> {
    TextStyle::from((FontFamily::SansSerif, font_px)).pos(Pos::new(HPos::Left, VPos::Center))
}

fn draw_frame<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    top_left: (i32, i32),
    size: (i32, i32),
) -> Result<()> {
    let corners = [top_left, (top_left.0 + size.0, top_left.1 + size.1)];
    area.draw(&Rectangle::new(corners, WHITE.mix(0.8).filled()))
        .map_err(backend_err)?;
    let edge = ShapeStyle {
        color: RGBAColor(204, 204, 204, 0.8),
        filled: false,
        stroke_width: 1,
    };
    area.draw(&Rectangle::new(corners, edge))
        .map_err(backend_err)
}

/// Draw an inside legend at an already resolved (non-`Best`) position.
pub fn draw_inside<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    entries: &[LegendEntry<'_>],
    legend: &LegendSpec,
    position: LegendPosition,
    font_px: u32,
) -> Result<()> {
    if entries.is_empty() {
        return Ok(());
    }
    let m = Metrics::new(font_px);
    let labels: Vec<&str> = entries.iter().map(|e| e.label).collect();
    let size = measure(&labels, legend.columns, font_px);
    let (aw, ah) = area.dim_in_pixel();
    let origin = anchor(position, size, (aw as i32, ah as i32), m.pad);

    if legend.frame {
        draw_frame(area, origin, size)?;
    }

    let widths = column_widths(&labels, legend.columns, &m);
    let mut col_x = Vec::with_capacity(widths.len());
    let mut x = origin.0 + m.pad;
    for w in &widths {
        col_x.push(x);
        x += w + m.col_gap;
    }

    let style = label_style(font_px);
    for (entry, (col, row)) in entries.iter().zip(column_major(entries.len(), widths.len())) {
        let left = col_x[col];
        let cy = origin.1 + m.pad + row as i32 * m.row_h + m.row_h / 2;
        draw_handle(area, left, cy, m.handle_w, &entry.style)?;
        area.draw(&Text::new(
            entry.label,
            (left + m.handle_w + m.handle_gap, cy),
            style.clone(),
        ))
        .map_err(backend_err)?;
    }
    Ok(())
}

/// Width of the column reserved for an outside legend, capped at `max_px`.
pub fn side_width(labels: &[&str], font_px: u32, max_px: i32) -> i32 {
    let m = Metrics::new(font_px);
    let widest = labels.iter().map(|l| m.entry_w(l)).max().unwrap_or(0);
    // Leading gap between the axes and the box, then the box itself.
    (m.pad * 2 + widest + m.pad * 2).min(max_px).max(0)
}

/// Draw an outside legend filling `area` from the top, wrapping labels to the available width.
pub fn draw_side<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    entries: &[LegendEntry<'_>],
    legend: &LegendSpec,
    font_px: u32,
) -> Result<()> {
    if entries.is_empty() {
        return Ok(());
    }
    let m = Metrics::new(font_px);
    let (aw, _) = area.dim_in_pixel();
    let box_left = m.pad * 2;
    let text_x = box_left + m.pad + m.handle_w + m.handle_gap;
    let text_cap = (aw as i32 - text_x - m.pad).max(font_px as i32) as u32;
    let line_h = (font_px as f64 * 1.2).round() as i32;

    let wrapped: Vec<Vec<String>> = entries
        .iter()
        .map(|e| wrap_to_width(e.label, font_px, text_cap))
        .collect();
    let block_h = |lines: &Vec<String>| (m.row_h - line_h).max(0) + lines.len() as i32 * line_h;
    let box_h = 2 * m.pad + wrapped.iter().map(|l| block_h(l)).sum::<i32>();
    let box_w = aw as i32 - box_left - 1;

    if legend.frame {
        draw_frame(area, (box_left, 0), (box_w, box_h))?;
    }

    let style = label_style(font_px);
    let mut y = m.pad;
    for (entry, lines) in entries.iter().zip(&wrapped) {
        let h = block_h(lines);
        let first_cy = y + (m.row_h - line_h).max(0) / 2 + line_h / 2;
        draw_handle(area, box_left + m.pad, first_cy, m.handle_w, &entry.style)?;
        for (i, line) in lines.iter().enumerate() {
            area.draw(&Text::new(
                line.as_str(),
                (text_x, first_cy + i as i32 * line_h),
                style.clone(),
            ))
            .map_err(backend_err)?;
        }
        y += h;
    }
    Ok(())
}
