//! Axis ranges and tick placement, resolved from a panel before any drawing.

use log::{debug, warn};

use super::types::{AxisSide, ErrorBar, PanelLayout, SeriesLayout};
use crate::models::{Panel, Sample, Series, Tick};

/// Fraction of the data span added on each side of automatic limits.
pub const AUTO_MARGIN: f64 = 0.05;
/// Upper bound on the number of intervals between automatic ticks.
pub const MAX_TICK_INTERVALS: usize = 8;

const NICE_STEPS: [f64; 5] = [1.0, 2.0, 2.5, 5.0, 10.0];

/// Evenly spaced "round" tick values covering `[lo, hi]`.
///
/// The step is one of 1, 2, 2.5, 5 or 10 times a power of ten, chosen as the
/// smallest that keeps the interval count at or below `max_intervals`.
pub fn nice_ticks(lo: f64, hi: f64, max_intervals: usize) -> Vec<f64> {
    if !lo.is_finite() || !hi.is_finite() {
        return Vec::new();
    }
    let (a, b) = (lo.min(hi), lo.max(hi));
    let span = b - a;
    if span <= 0.0 {
        return vec![a];
    }
    let max_intervals = max_intervals.max(1) as f64;
    let magnitude = 10f64.powf((span / max_intervals).log10().floor());
    let step = NICE_STEPS
        .iter()
        .map(|m| m * magnitude)
        .find(|step| span / step <= max_intervals + 1e-9)
        .unwrap_or(10.0 * magnitude);

    let eps = step * 1e-9;
    let first = (a / step - 1e-9).ceil() as i64;
    let mut out = Vec::new();
    let mut k = first;
    loop {
        let v = k as f64 * step;
        if v > b + eps {
            break;
        }
        // Normalize -0.0 so it prints as "0".
        out.push(if v == 0.0 { 0.0 } else { v });
        k += 1;
    }
    out
}

/// Format tick values with the fewest decimals that still tell them apart.
pub fn format_ticks(values: &[f64]) -> Vec<String> {
    let decimals = (0..=6)
        .find(|&d| {
            let scale = 10f64.powi(d);
            values
                .iter()
                .all(|v| ((v * scale).round() / scale - v).abs() <= 1e-9 * v.abs().max(1.0))
        })
        .unwrap_or(6) as usize;
    values
        .iter()
        .map(|v| {
            let s = format!("{:.*}", decimals, v);
            // "-0" and "-0.00" come from tiny negative rounding noise.
            if s.trim_start_matches('-').chars().all(|c| c == '0' || c == '.') {
                s.trim_start_matches('-').to_string()
            } else {
                s
            }
        })
        .collect()
}

fn auto_ticks(range: (f64, f64)) -> Vec<Tick> {
    let values = nice_ticks(range.0, range.1, MAX_TICK_INTERVALS);
    let labels = format_ticks(&values);
    values
        .into_iter()
        .zip(labels)
        .map(|(value, label)| Tick { value, label })
        .collect()
}

/// Smallest interval containing every value, or `None` when there are none.
fn extent<I: IntoIterator<Item = f64>>(values: I) -> Option<(f64, f64)> {
    values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// Pad a data extent into axis limits.
///
/// No data gives `[0, 1]`; a single value is widened by one unit each side.
pub fn auto_range(extent: Option<(f64, f64)>) -> (f64, f64) {
    match extent {
        None => (0.0, 1.0),
        Some((lo, hi)) if (hi - lo).abs() < f64::EPSILON => (lo - 1.0, hi + 1.0),
        Some((lo, hi)) => {
            let pad = (hi - lo) * AUTO_MARGIN;
            (lo - pad, hi + pad)
        }
    }
}

fn y_extent<'a, I: IntoIterator<Item = &'a Series>>(series: I) -> Option<(f64, f64)> {
    extent(
        series
            .into_iter()
            .flat_map(|s| s.points.iter())
            .flat_map(|p| {
                let (lo, hi) = p.extent();
                [lo, hi]
            }),
    )
}

fn series_layout(series: &Series, axis: AxisSide) -> SeriesLayout {
    SeriesLayout {
        name: series.name.clone(),
        axis,
        vertices: series.points.iter().map(|p| (p.x(), p.center())).collect(),
        error_bars: series
            .points
            .iter()
            .filter_map(|p| match p {
                Sample::Range { x, .. } => Some(ErrorBar {
                    x: *x,
                    low: p.center() - p.error(),
                    high: p.center() + p.error(),
                }),
                Sample::Value { .. } => None,
            })
            .collect(),
    }
}

fn check_orientation(what: &str, range: (f64, f64)) {
    if range.0 >= range.1 {
        warn!("{what} range [{}, {}] is not increasing; drawing it as given", range.0, range.1);
    }
}

/// Resolve limits, ticks and series vertices for one panel.
///
/// Legend placement needs pixel sizes, so the returned layout leaves it unset.
pub fn resolve_panel(panel: &Panel) -> PanelLayout {
    let x_values = panel
        .all_series()
        .flat_map(|s| s.points.iter().map(Sample::x))
        .chain(panel.x_ticks.iter().flatten().map(|t| t.value));
    let x_range = panel.x_range.unwrap_or_else(|| auto_range(extent(x_values)));
    let y_range = panel
        .y_range
        .unwrap_or_else(|| auto_range(y_extent(&panel.series)));
    check_orientation("x", x_range);
    check_orientation("y", y_range);

    let mut x_ticks = match &panel.x_ticks {
        Some(ticks) => ticks.clone(),
        None => auto_ticks(x_range),
    };
    if !panel.x_tick_labels {
        for t in &mut x_ticks {
            t.label.clear();
        }
    }

    let secondary_y_range = panel.secondary.as_ref().map(|sec| {
        let r = sec
            .y_range
            .unwrap_or_else(|| auto_range(y_extent(&sec.series)));
        check_orientation("secondary y", r);
        r
    });

    let mut series: Vec<SeriesLayout> = panel
        .series
        .iter()
        .map(|s| series_layout(s, AxisSide::Primary))
        .collect();
    if let Some(sec) = &panel.secondary {
        series.extend(
            sec.series
                .iter()
                .map(|s| series_layout(s, AxisSide::Secondary)),
        );
    }

    debug!(
        "panel ranges: x={:?} y={:?} secondary={:?}",
        x_range, y_range, secondary_y_range
    );

    PanelLayout {
        x_range,
        y_range,
        secondary_y_range,
        x_ticks,
        y_ticks: auto_ticks(y_range),
        secondary_y_ticks: secondary_y_range.map(auto_ticks).unwrap_or_default(),
        legend: None,
        secondary_legend: None,
        series,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SecondaryAxis, Series};
    use crate::style::SeriesStyle;

    fn close(a: &[f64], b: &[f64]) -> bool {
        a.len() == b.len() && a.iter().zip(b).all(|(x, y)| (x - y).abs() < 1e-9)
    }

    #[test]
    fn nice_ticks_pick_round_steps() {
        assert!(close(
            &nice_ticks(0.0, 30.0, 8),
            &[0.0, 5.0, 10.0, 15.0, 20.0, 25.0, 30.0]
        ));
        assert!(close(
            &nice_ticks(0.0, 100.0, 8),
            &[0.0, 20.0, 40.0, 60.0, 80.0, 100.0]
        ));
        assert!(close(
            &nice_ticks(-0.5, 10.5, 8),
            &[0.0, 2.0, 4.0, 6.0, 8.0, 10.0]
        ));
        let quarter = [0.0, 2.5, 5.0, 7.5, 10.0, 12.5, 15.0, 17.5, 20.0];
        assert!(close(&nice_ticks(0.0, 20.0, 8), &quarter));
    }

    #[test]
    fn nice_ticks_degenerate_inputs() {
        assert_eq!(nice_ticks(3.0, 3.0, 8), vec![3.0]);
        assert!(nice_ticks(f64::NAN, 1.0, 8).is_empty());
        // Reversed limits still produce ascending ticks over the same span.
        assert!(close(&nice_ticks(30.0, 0.0, 8), &nice_ticks(0.0, 30.0, 8)));
    }

    #[test]
    fn nice_ticks_stay_within_interval_budget() {
        for (lo, hi) in [(0.0, 1.0), (0.0, 7.0), (12.3, 98.7), (-5.0, 5.0), (0.0, 606520.0)] {
            let t = nice_ticks(lo, hi, MAX_TICK_INTERVALS);
            assert!(t.len() >= 2 && t.len() <= MAX_TICK_INTERVALS + 1, "{lo}..{hi}: {t:?}");
            assert!(t.iter().all(|v| *v >= lo - 1e-9 && *v <= hi + 1e-9));
        }
    }

    #[test]
    fn tick_labels_share_precision() {
        assert_eq!(format_ticks(&[0.0, 20.0, 40.0]), vec!["0", "20", "40"]);
        assert_eq!(format_ticks(&[0.0, 2.5, 5.0]), vec!["0.0", "2.5", "5.0"]);
        assert_eq!(format_ticks(&[-0.0000000001, 0.25]), vec!["0.00", "0.25"]);
    }

    #[test]
    fn auto_range_pads_and_widens() {
        assert_eq!(auto_range(None), (0.0, 1.0));
        assert_eq!(auto_range(Some((5.0, 5.0))), (4.0, 6.0));
        let (lo, hi) = auto_range(Some((0.0, 10.0)));
        assert!((lo + 0.5).abs() < 1e-12 && (hi - 10.5).abs() < 1e-12);
    }

    #[test]
    fn resolve_panel_uses_explicit_limits_and_hides_labels() {
        let style = SeriesStyle::plot("-o", "coral").unwrap();
        let panel = Panel::new()
            .series(
                Series::new("Throughput", style.clone()).with_values([(4.0, 20.0), (8.0, 15.0)]),
            )
            .y_range(0.0, 30.0)
            .x_ticks(Tick::integers([4, 8]))
            .hide_x_tick_labels()
            .secondary(SecondaryAxis {
                label: None,
                y_range: None,
                series: vec![
                    Series::new("Block Rate", style).with_values([(4.0, 2.0), (8.0, 4.0)]),
                ],
                legend: Default::default(),
            });
        let layout = resolve_panel(&panel);
        assert_eq!(layout.y_range, (0.0, 30.0));
        assert!(layout.x_ticks.iter().all(|t| t.label.is_empty()));
        assert_eq!(layout.x_ticks.len(), 2);
        let (slo, shi) = layout.secondary_y_range.unwrap();
        assert!((slo - 1.9).abs() < 1e-9 && (shi - 4.1).abs() < 1e-9);
        assert_eq!(layout.series.len(), 2);
        assert_eq!(layout.series[1].axis, AxisSide::Secondary);
    }
}
