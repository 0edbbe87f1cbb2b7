//! Chart rendering to **SVG** or **PNG**.
//!
//! - Vertically stacked panels sharing the figure width
//! - Optional right-hand secondary y axis per panel
//! - Line dashes, filled or hollow markers, and vertical error bars
//! - Inside legends at fixed anchors or `Best`; outside legends in their own column
//! - Computed "nice" ticks, reported back through [`ChartLayout`]

pub mod axis;
pub mod frame;
pub mod legend;
pub mod marker;
pub mod text;
pub mod types;

pub use types::{
    AxisSide, ChartLayout, DEFAULT_DPI, ErrorBar, OutputFormat, PanelLayout, RenderOptions,
    SeriesLayout,
};

use std::fs;
use std::io::Cursor;
use std::path::Path;
use std::sync::Once;

use log::{debug, info, warn};
use plotters::backend::DrawingBackend;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::FontFamily;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters_bitmap::BitMapBackend;
use plotters_svg::SVGBackend;

use crate::error::{FigureError, Result, backend_err};
use crate::models::{Chart, LegendPosition, Panel, Sample, Series};
use frame::{
    Fonts, SecondaryCanvas, add_secondary, build_chart, draw_grid, draw_primary_axes,
    draw_secondary_axis, margins,
};
use legend::{LegendEntry, best_position, draw_inside, draw_side, measure, side_width};
use marker::{Canvas, PixelStyle, markers, stroke};

/// One-time registration of the bundled "sans-serif" face for the `ab_glyph` text path,
/// which does not discover OS fonts.
static INIT_FONTS: Once = Once::new();

fn ensure_fonts_registered() {
    INIT_FONTS.call_once(|| {
        if plotters::style::register_font(
            "sans-serif",
            plotters::style::FontStyle::Normal,
            include_bytes!("../../assets/DejaVuSans.ttf"),
        )
        .is_err()
        {
            warn!("bundled DejaVuSans.ttf could not be registered; text will be missing");
        }
    });
}

/// Raw RGB pixels of a rendered chart, row-major, three bytes per pixel.
#[derive(Debug, Clone)]
pub struct RgbFrame {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
    pub layout: ChartLayout,
}

/// Render `chart` to `out_path` at the default DPI. The extension selects SVG or PNG.
pub fn render_chart<P: AsRef<Path>>(chart: &Chart, out_path: P) -> Result<ChartLayout> {
    render_chart_with(chart, out_path, &RenderOptions::default())
}

/// Render `chart` to `out_path` with explicit options.
///
/// The image is produced in memory and written in one go, so an unwritable
/// path fails with [`FigureError::Io`] and leaves nothing behind.
pub fn render_chart_with<P: AsRef<Path>>(
    chart: &Chart,
    out_path: P,
    opts: &RenderOptions,
) -> Result<ChartLayout> {
    let out_path = out_path.as_ref();
    let format = OutputFormat::from_path(out_path)?;
    let (bytes, layout) = match format {
        OutputFormat::Svg => {
            let (svg, layout) = render_svg_string(chart, opts)?;
            (svg.into_bytes(), layout)
        }
        OutputFormat::Png => {
            let frame = render_rgb(chart, opts)?;
            (encode_png(&frame)?, frame.layout)
        }
    };
    fs::write(out_path, bytes).map_err(|e| FigureError::io(out_path, e))?;
    info!(
        "wrote {} ({}x{} px, {} panel(s))",
        out_path.display(),
        layout.width,
        layout.height,
        layout.panels.len()
    );
    Ok(layout)
}

/// Render `chart` as an SVG document.
pub fn render_svg_string(chart: &Chart, opts: &RenderOptions) -> Result<(String, ChartLayout)> {
    ensure_fonts_registered();
    let size = chart.size.pixels(opts.dpi);
    let mut svg = String::new();
    let layout = {
        let root = SVGBackend::with_string(&mut svg, size).into_drawing_area();
        let layout = draw_chart(&root, chart, opts)?;
        root.present().map_err(backend_err)?;
        layout
    };
    Ok((svg, layout))
}

/// Render `chart` into an RGB pixel buffer.
pub fn render_rgb(chart: &Chart, opts: &RenderOptions) -> Result<RgbFrame> {
    ensure_fonts_registered();
    let (width, height) = chart.size.pixels(opts.dpi);
    let mut pixels = vec![0u8; width as usize * height as usize * 3];
    let layout = {
        let root = BitMapBackend::with_buffer(&mut pixels, (width, height)).into_drawing_area();
        let layout = draw_chart(&root, chart, opts)?;
        root.present().map_err(backend_err)?;
        layout
    };
    Ok(RgbFrame {
        width,
        height,
        pixels,
        layout,
    })
}

/// PNG-encode a rendered frame.
pub fn encode_png(frame: &RgbFrame) -> Result<Vec<u8>> {
    let image = image::RgbImage::from_raw(frame.width, frame.height, frame.pixels.clone())
        .ok_or_else(|| FigureError::Backend("pixel buffer does not match frame size".into()))?;
    let mut out = Cursor::new(Vec::new());
    image.write_to(&mut out, image::ImageFormat::Png)?;
    Ok(out.into_inner())
}

fn draw_chart<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    chart: &Chart,
    opts: &RenderOptions,
) -> Result<ChartLayout> {
    root.fill(&WHITE).map_err(backend_err)?;
    let fonts = Fonts::new(opts);
    let (width, height) = root.dim_in_pixel();
    debug!(
        "rendering `{}` at {}x{} px ({} panel(s), {} series)",
        chart.name,
        width,
        height,
        chart.panels.len(),
        chart.series_count()
    );

    let body = match &chart.title {
        Some(title) if height >= 3 * fonts.title => root
            .titled(title, (FontFamily::SansSerif, fonts.title))
            .map_err(backend_err)?,
        Some(_) => {
            debug!("`{}` is too short for its title; title skipped", chart.name);
            root.margin(0, 0, 0, 0)
        }
        None => root.margin(0, 0, 0, 0),
    };

    let footer_h = (fonts.label as f64 * 2.0).round() as i32;
    let (_, body_h) = body.dim_in_pixel();
    let panels_area = match &chart.caption {
        Some(caption) if body_h as i32 > 2 * footer_h => {
            let (upper, footer) = body.split_vertically(body_h as i32 - footer_h);
            let (fw, fh) = footer.dim_in_pixel();
            let style = TextStyle::from((FontFamily::SansSerif, fonts.label))
                .pos(Pos::new(HPos::Center, VPos::Center));
            footer
                .draw(&Text::new(caption.as_str(), (fw as i32 / 2, fh as i32 / 2), style))
                .map_err(backend_err)?;
            upper
        }
        Some(_) => {
            debug!("`{}` is too short for its caption; caption skipped", chart.name);
            body
        }
        None => body,
    };

    let mut panels = Vec::with_capacity(chart.panels.len());
    if !chart.panels.is_empty() {
        let areas = panels_area.split_evenly((chart.panels.len(), 1));
        for (panel, area) in chart.panels.iter().zip(&areas) {
            panels.push(draw_panel(area, panel, &fonts, opts)?);
        }
    }

    Ok(ChartLayout {
        width,
        height,
        panels,
    })
}

fn entries<'a>(series: &'a [Series], opts: &RenderOptions) -> Vec<LegendEntry<'a>> {
    series
        .iter()
        .map(|s| LegendEntry {
            label: s.name.as_str(),
            style: PixelStyle::new(&s.style, opts),
        })
        .collect()
}

/// Where the drawn series sit on the plotting rectangle, in its own pixels.
#[derive(Debug, Default)]
struct Footprint {
    vertices: Vec<(f64, f64)>,
    segments: Vec<((f64, f64), (f64, f64))>,
}

impl Footprint {
    fn add<F>(&mut self, series: &Series, to_px: F, base: (i32, i32))
    where
        F: Fn(&(f64, f64)) -> (i32, i32),
    {
        let px = |c: (f64, f64)| {
            let (x, y) = to_px(&c);
            ((x - base.0) as f64, (y - base.1) as f64)
        };
        let path: Vec<(f64, f64)> = series.points.iter().map(|p| px((p.x(), p.center()))).collect();
        if series.style.line.is_some() {
            self.segments.extend(path.windows(2).map(|w| (w[0], w[1])));
        }
        for p in &series.points {
            if let Sample::Range { x, .. } = *p {
                let (lo, hi) = (p.center() - p.error(), p.center() + p.error());
                self.segments.push((px((x, lo)), px((x, hi))));
            }
        }
        self.vertices.extend(path);
    }
}

fn draw_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    panel: &Panel,
    fonts: &Fonts,
    opts: &RenderOptions,
) -> Result<PanelLayout> {
    let mut layout = axis::resolve_panel(panel);
    let primary = entries(&panel.series, opts);

    let outside = panel.legend.position == LegendPosition::OutsideRight && !primary.is_empty();
    let (axes_area, side_area) = if outside {
        let (aw, _) = area.dim_in_pixel();
        let labels: Vec<&str> = primary.iter().map(|e| e.label).collect();
        let side = side_width(&labels, fonts.legend, aw as i32 * 2 / 5);
        let (axes, side_area) = area.split_horizontally(aw as i32 - side);
        (axes, Some(side_area))
    } else {
        (area.margin(0, 0, 0, 0), None)
    };

    let m = margins(panel, &layout, fonts).fit(axes_area.dim_in_pixel());
    let mut chart = build_chart(&axes_area, &layout, m)?;
    let plot = chart.plotting_area().strip_coord_spec();
    let base = plot.get_base_pixel();

    if let Some(grid) = &panel.grid {
        draw_grid(&mut chart, &layout, grid, opts)?;
    }

    let mut footprint = Footprint::default();
    for s in &panel.series {
        footprint.add(s, |c| chart.backend_coord(c), base);
        draw_series(&mut chart, s, opts)?;
    }

    let secondary = match (&panel.secondary, layout.secondary_y_range) {
        (Some(sec), Some(range)) => {
            let mut twin = add_secondary(chart, &layout, range);
            draw_primary_axes(&mut twin, panel, &layout, fonts)?;
            draw_secondary_axis(&mut twin, sec.label.as_deref(), fonts)?;
            for s in &sec.series {
                footprint.add(s, |c| twin.borrow_secondary().backend_coord(c), base);
                draw_series(&mut SecondaryCanvas(&mut twin), s, opts)?;
            }
            Some(sec)
        }
        _ => {
            draw_primary_axes(&mut chart, panel, &layout, fonts)?;
            None
        }
    };

    let (pw, ph) = plot.dim_in_pixel();
    let plot_size = (pw as i32, ph as i32);
    let inset = (fonts.legend as i32 / 2).max(1);
    let place = |position: LegendPosition, labels: &[&str], columns: usize| match position {
        LegendPosition::Best => best_position(
            measure(labels, columns, fonts.legend),
            plot_size,
            inset,
            &footprint.vertices,
            &footprint.segments,
        ),
        other => other,
    };

    if !primary.is_empty() {
        if let Some(side) = &side_area {
            draw_side(side, &primary, &panel.legend, fonts.legend)?;
            layout.legend = Some(LegendPosition::OutsideRight);
        } else {
            let labels: Vec<&str> = primary.iter().map(|e| e.label).collect();
            let position = place(panel.legend.position, &labels, panel.legend.columns);
            draw_inside(&plot, &primary, &panel.legend, position, fonts.legend)?;
            layout.legend = Some(position);
        }
    }

    if let Some(sec) = secondary {
        let sec_entries = entries(&sec.series, opts);
        if !sec_entries.is_empty() {
            let labels: Vec<&str> = sec_entries.iter().map(|e| e.label).collect();
            // The secondary legend always stays inside the axes.
            let requested = match sec.legend.position {
                LegendPosition::OutsideRight => LegendPosition::UpperRight,
                other => other,
            };
            let position = place(requested, &labels, sec.legend.columns);
            draw_inside(&plot, &sec_entries, &sec.legend, position, fonts.legend)?;
            layout.secondary_legend = Some(position);
        }
    }

    Ok(layout)
}

/// Draw one series: the center line, a vertical error bar per range sample, then markers.
fn draw_series<DB, T>(canvas: &mut T, series: &Series, opts: &RenderOptions) -> Result<()>
where
    DB: DrawingBackend,
    T: Canvas<DB, (f64, f64)>,
{
    let style = PixelStyle::new(&series.style, opts);
    let centers: Vec<(f64, f64)> = series.points.iter().map(|p| (p.x(), p.center())).collect();

    if let Some(dash) = style.line {
        stroke(canvas, centers.clone(), dash, style.stroke())?;
    }

    let whisker = style.stroke();
    canvas.put(series.points.iter().filter_map(|p| match *p {
        Sample::Range { x, .. } => {
            let c = p.center();
            Some(plotters::element::ErrorBar::new_vertical(
                x,
                c - p.error(),
                c,
                c + p.error(),
                whisker,
                0,
            ))
        }
        _ => None,
    }))?;

    if let Some(shape) = style.marker {
        markers(canvas, &centers, shape, &style)?;
    }
    Ok(())
}
