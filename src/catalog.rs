//! The project's benchmark figures as chart descriptions.
//!
//! Each entry reproduces one published figure with its measured data. Names
//! double as output file stems.

use crate::error::{FigureError, Result};
use crate::models::{
    Chart, FigureSize, GridStyle, LegendPosition, LegendSpec, Panel, SecondaryAxis, Series, Tick,
};
use crate::style::SeriesStyle;

type Builder = fn() -> Result<Chart>;

const FIGURES: &[(&str, Builder)] = &[
    ("front-attack-rate-overload", front_attack_rate_overload),
    ("front-attack-rate-6w", front_attack_rate_6w),
    ("front-attack-rate-tps", front_attack_rate_tps),
    ("evaluation", evaluation),
    ("multi_evaluation", multi_evaluation),
    ("attacked", attacked),
    ("adversarial", adversarial),
    ("adversarial-comparison", adversarial_comparison),
    ("scalability", scalability),
    ("scalability_f1", scalability_f1),
    ("scalability_fmax_latency", scalability_fmax_latency),
    ("proposers", proposers),
    ("proposers_new", proposers_new),
    ("proposers_tps", proposers_tps),
];

/// Names of all figures, in catalog order.
pub fn names() -> Vec<&'static str> {
    FIGURES.iter().map(|(name, _)| *name).collect()
}

/// Build every figure.
pub fn catalog() -> Result<Vec<Chart>> {
    FIGURES.iter().map(|(_, build)| build()).collect()
}

/// Build one figure by name.
pub fn find(name: &str) -> Result<Chart> {
    FIGURES
        .iter()
        .find(|(n, _)| *n == name)
        .ok_or_else(|| FigureError::UnknownFigure(name.to_string()))
        .and_then(|(_, build)| build())
}

const RATE: &str = "Rate (%)";
const BYZANTINE: &str = "Number of Byzantine Nodes.";
const THROUGHPUT_E4: &str = "Throughput (10\u{2074} tx/s)";
const THROUGHPUT_E4_LOWER: &str = "throughput (10\u{2074} tx/s)";
const BLOCKS_PER_COMMIT: &str = "blocks per HS-commit";

fn plot(name: &str, format: &str, color: &str, points: &[(f64, f64)]) -> Result<Series> {
    Ok(Series::new(name, SeriesStyle::plot(format, color)?).with_values(points.iter().copied()))
}

fn line(name: &str, format: &str, color: &str, xs: &[f64], ys: &[f64]) -> Result<Series> {
    Ok(Series::new(name, SeriesStyle::plot(format, color)?).with_ys(xs, ys))
}

fn errorbar(name: &str, format: &str, color: &str, xs: &[f64], ys: &[f64]) -> Result<Series> {
    Ok(Series::new(name, SeriesStyle::errorbar(format, color)?).with_ys(xs, ys))
}

fn errorbar_ranges(
    name: &str,
    format: &str,
    color: &str,
    xs: &[f64],
    pairs: &[(f64, f64)],
) -> Result<Series> {
    Ok(Series::new(name, SeriesStyle::errorbar(format, color)?)
        .with_ranges(xs.iter().copied().zip(pairs.iter().copied())))
}

fn ticks(xs: &[f64]) -> Vec<Tick> {
    Tick::integers(xs.iter().map(|x| *x as i64))
}

fn faint_grid() -> GridStyle {
    GridStyle::default()
}

fn strong_grid() -> GridStyle {
    GridStyle {
        alpha: 0.6,
        width: 1.0,
        ..GridStyle::default()
    }
}

fn frameless(position: LegendPosition) -> LegendSpec {
    LegendSpec::at(position).frameless()
}

/// Four attack-rate lines against the number of Byzantine nodes, legend outside.
fn front_attack_chart(
    name: &str,
    safe: &[f64],
    attacked: &[f64],
    risk: &[f64],
    safe_attacked: &[f64],
) -> Result<Chart> {
    let xs: Vec<f64> = (0..=10).map(f64::from).collect();
    let panel = Panel::new()
        .series(line("Safe-Rate", "-o", "coral", &xs, safe)?)
        .series(line("Front-Attacked-Rate", "-o", "brown", &xs, attacked)?)
        .series(line("Front-Attacked-Rate(Risk)", "-p", "darkseagreen", &xs, risk)?)
        .series(line("Front-Attacked-Rate(Safe)", "-o", "gold", &xs, safe_attacked)?)
        .legend(LegendSpec::at(LegendPosition::OutsideRight))
        .grid(faint_grid())
        .y_range(0.0, 100.0)
        .y_label(RATE)
        .x_label(BYZANTINE);
    Ok(Chart::single(name, FigureSize::inches(8.0, 4.0), panel))
}

fn front_attack_rate_overload() -> Result<Chart> {
    front_attack_chart(
        "front-attack-rate-overload",
        &[
            20.291629, 11.170999, 6.284638, 5.230297, 4.139687, 2.452470, 1.962865, 1.578192,
            2.288075, 2.049046, 2.278843,
        ],
        &[
            0.0, 0.420679, 2.372347, 5.580280, 14.616175, 26.546046, 48.450171, 55.255443,
            61.349011, 61.863760, 67.431887,
        ],
        &[
            0.0, 0.420679, 2.372347, 5.580280, 14.419685, 26.121987, 47.730201, 47.730201,
            60.300310, 60.692098, 65.842583,
        ],
        &[0.0, 0.0, 0.0, 0.0, 0.196490, 0.424058, 0.719970, 0.611316, 1.048701, 1.589304, 1.589304],
    )
}

fn front_attack_rate_6w() -> Result<Chart> {
    front_attack_chart(
        "front-attack-rate-6w",
        &[
            80.53, 67.317767, 48.296150, 26.824851, 16.280314, 10.566827, 7.110083, 8.284638,
            7.230297, 6.139687, 5.245343,
        ],
        &[
            0.0, 0.0, 0.0, 0.0, 1.973371, 3.240367, 9.788574, 19.255443, 40.349011, 61.863760,
            73.116621,
        ],
        &[
            0.0, 0.0, 0.0, 0.0, 1.419685, 3.121987, 9.730201, 19.730201, 39.300310, 57.692098,
            67.220311,
        ],
        &[0.0, 0.0, 0.0, 0.0, 0.196490, 0.424058, 0.557805, 0.611316, 1.048701, 3.589304, 5.896310],
    )
}

fn front_attack_rate_tps() -> Result<Chart> {
    let panel = Panel::new()
        .series(plot(
            "Safe-Rate",
            "-o",
            "coral",
            &[(25.0, 77.133234), (50.0, 43.721234), (75.0, 23.109017), (93.0, 10.527314)],
        )?)
        .legend(frameless(LegendPosition::UpperRight))
        .grid(faint_grid())
        .y_range(0.0, 100.0)
        .y_label(RATE)
        .x_label(THROUGHPUT_E4);
    Ok(Chart::single("front-attack-rate-tps", FigureSize::inches(6.0, 3.0), panel))
}

fn evaluation() -> Result<Chart> {
    let xs: Vec<f64> = (4..=15).map(f64::from).collect();
    let hs1000 = [
        21.2944, 17.3973, 16.6320, 15.5899, 15.5608, 14.9115, 14.9119, 14.4893, 14.0322, 14.1527,
        13.6612, 13.0852,
    ];
    let hs4000 = [
        32.1294, 27.5342, 26.3645, 26.1869, 27.1018, 26.2143, 25.7026, 25.4374, 24.6564, 25.6830,
        24.5260, 23.3333,
    ];
    let phalanx = [
        54.8784, 53.2163, 50.1742, 55.5932, 55.0121, 59.0143, 60.6520, 59.1436, 56.3430, 59.6944,
        56.4608, 54.0189,
    ];
    let panel = Panel::new()
        .series(line("HS1000", "-o", "coral", &xs, &hs1000)?)
        .series(line("HS4000", "-o", "coral", &xs, &hs4000)?)
        .series(line("Phalanx-HS1000", "-p", "darkseagreen", &xs, &phalanx)?)
        .legend(frameless(LegendPosition::UpperCenter).columns(3))
        .grid(faint_grid())
        .y_range(0.0, 70.0)
        .y_label(THROUGHPUT_E4)
        .x_label("Replica Number");
    Ok(Chart::single("evaluation", FigureSize::inches(6.0, 3.0), panel))
}

fn multi_evaluation() -> Result<Chart> {
    let xs = [4.0, 6.0, 8.0, 10.0];
    let rows: [(&str, &str, &str, [f64; 4]); 10] = [
        ("Phalanx-HS", "-o", "coral", [116.31, 112.94, 107.04, 91.3]),
        ("HS", "-o", "brown", [20.1294, 17.3645, 15.1018, 13.7026]),
        ("Phalanx-TCHS", "-p", "darkseagreen", [124.1294, 114.3645, 113.1018, 95.7026]),
        ("TCHS", "-o", "gold", [21.1294, 17.3645, 16.1018, 14.7026]),
        ("Phalanx-SL", "-o", "wheat", [31.1294, 10.3645, 52.1018, 84.7026]),
        ("SL", "-o", "indianred", [15.1294, 6.3645, 8.1018, 12.7026]),
        ("Phalanx-FHS", "-o", "royalblue", [124.1294, 116.3645, 112.1018, 91.7026]),
        ("FHS", "-o", "slateblue", [22.1294, 17.3645, 16.1018, 15.7026]),
        ("Phalanx-LBFT", "-o", "violet", [37.1294, 11.3645, 44.1018, 83.7026]),
        ("LBFT", "-o", "teal", [11.1294, 6.3645, 8.1018, 12.7026]),
    ];
    let mut panel = Panel::new()
        .legend(LegendSpec::at(LegendPosition::OutsideRight))
        .grid(faint_grid())
        .y_range(0.0, 150.0)
        .y_label(THROUGHPUT_E4)
        .x_label("Number of Consensus Nodes.");
    for (name, fmt, color, ys) in rows {
        panel = panel.series(line(name, fmt, color, &xs, &ys)?);
    }
    Ok(Chart::single("multi_evaluation", FigureSize::inches(8.0, 4.0), panel))
}

fn attacked() -> Result<Chart> {
    let xs: Vec<f64> = (0..=10).map(f64::from).collect();
    let safe = [
        80.53, 67.317767, 48.296150, 26.824851, 16.280314, 10.566827, 7.110083, 8.284638, 7.230297,
        6.139687, 5.245343,
    ];
    let attacked = [
        0.0, 0.0, 0.0, 0.0, 1.973371, 3.240367, 9.788574, 19.255443, 40.349011, 61.863760,
        73.116621,
    ];
    let panel = Panel::new()
        .series(line("safe rate", "-d", "peru", &xs, &safe)?)
        .series(line("attacked rate", "-p", "brown", &xs, &attacked)?)
        .legend(frameless(LegendPosition::UpperRight))
        .grid(strong_grid())
        .y_range(0.0, 100.0)
        .y_label(RATE)
        .x_label(BYZANTINE);
    Ok(Chart::single("attacked", FigureSize::inches(6.0, 3.0), panel))
}

fn adversarial() -> Result<Chart> {
    let xs: Vec<f64> = (0..=11).map(f64::from).collect();
    let phalanx = [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.09, 0.16, 0.1, 0.32, 0.59];
    let timestamp = [0.0, 0.4, 4.2, 3.4, 4.8, 5.7, 5.57, 12.0, 20.6, 16.87, 16.7, 21.9];
    let panel = Panel::new()
        .series(line("phalanx reordered rate", "-p", "brown", &xs, &phalanx)?)
        .series(line("timestamp-based reordered rate", "-d", "peru", &xs, &timestamp)?)
        .legend(frameless(LegendPosition::UpperLeft))
        .grid(strong_grid())
        .y_range(0.0, 100.0)
        .y_label(RATE)
        .x_label(BYZANTINE);
    Ok(Chart::single("adversarial", FigureSize::inches(6.0, 4.0), panel))
}

fn adversarial_comparison() -> Result<Chart> {
    let xs: Vec<f64> = (0..=11).map(f64::from).collect();
    #[rustfmt::skip]
    let phalanx = [
        (0.0, 0.0), (0.0, 0.0), (0.0, 0.0), (0.0, 0.0),
        (0.0, 0.028), (0.0, 0.035), (0.0, 0.040), (0.090, 0.030),
        (0.160, 0.310), (0.100, 0.280), (0.320, 0.460), (0.590, 0.780),
    ];
    #[rustfmt::skip]
    let timestamp = [
        (0.0, 0.0), (0.4, 1.9), (4.2, 3.9), (3.4, 5.2),
        (5.8, 7.64), (6.7, 8.28), (7.57, 10.14), (12.0, 14.0),
        (20.6, 18.89), (16.87, 17.87), (16.7, 15.1), (21.9, 19.8),
    ];
    let panel = Panel::new()
        .series(errorbar_ranges("Phalanx strategy", "-^", "coral", &xs, &phalanx)?)
        .series(errorbar_ranges("Timestamp-based strategy", "-s", "steelblue", &xs, &timestamp)?)
        .legend(frameless(LegendPosition::Best))
        .grid(faint_grid())
        .x_ticks(ticks(&xs))
        .y_range(0.0, 30.0)
        .y_label("Reordered Commands Ratio (%)");
    Ok(Chart::single("adversarial-comparison", FigureSize::inches(6.0, 4.0), panel)
        .caption("Number of Byzantine Nodes"))
}

/// Stacked throughput/block-rate over safe-or-attacked-rate figure.
struct Stacked<'a> {
    name: &'a str,
    caption: &'a str,
    xs: &'a [f64],
    throughput: &'a [f64],
    throughput_label: &'a str,
    throughput_max: f64,
    block_rate: &'a [f64],
    block_rate_range: (f64, f64),
    lower_name: &'a str,
    lower: &'a [f64],
    lower_label: &'a str,
    lower_max: f64,
    lower_legend: LegendPosition,
}

fn stacked(s: Stacked<'_>) -> Result<Chart> {
    let top = Panel::new()
        .series(errorbar("Throughput", "-d", "coral", s.xs, s.throughput)?)
        .legend(frameless(LegendPosition::LowerCenter))
        .grid(faint_grid())
        .x_ticks(ticks(s.xs))
        .hide_x_tick_labels()
        .y_range(0.0, s.throughput_max)
        .y_label(s.throughput_label)
        .secondary(SecondaryAxis {
            label: Some(BLOCKS_PER_COMMIT.to_string()),
            y_range: Some(s.block_rate_range),
            series: vec![errorbar("Block Rate", "-o", "burlywood", s.xs, s.block_rate)?],
            legend: frameless(LegendPosition::LowerRight),
        });
    let bottom = Panel::new()
        .series(errorbar(s.lower_name, "-d", "darkseagreen", s.xs, s.lower)?)
        .legend(frameless(s.lower_legend))
        .grid(faint_grid())
        .x_ticks(ticks(s.xs))
        .y_range(0.0, s.lower_max)
        .y_label(s.lower_label);
    Ok(Chart::new(s.name, FigureSize::inches(6.0, 6.0))
        .panel(top)
        .panel(bottom)
        .caption(s.caption))
}

fn scalability() -> Result<Chart> {
    let xs: Vec<f64> = (4..=15).map(f64::from).collect();
    stacked(Stacked {
        name: "scalability",
        caption: "Number of Node",
        xs: &xs,
        throughput: &[
            54.8784, 53.2163, 50.1742, 55.5932, 55.0121, 59.0143, 60.6520, 59.1436, 56.3430,
            59.6944, 56.4608, 54.0189,
        ],
        throughput_label: THROUGHPUT_E4_LOWER,
        throughput_max: 65.0,
        block_rate: &[
            1.7773592195498888,
            2.150943396226415,
            2.285630153121319,
            2.634081551334839,
            2.921107472462042,
            3.5292141396435874,
            3.8232738557020944,
            4.187312186978297,
            4.427184466019417,
            4.787277448071217,
            5.0900932918702795,
            5.635924369747899,
        ],
        block_rate_range: (0.0, 6.0),
        lower_name: "Safe Rate",
        lower: &[
            90.120102, 98.447033, 99.439294, 76.203584, 89.152313, 98.714721, 96.221610, 97.406253,
            98.033933, 95.237310, 95.302763, 95.251208,
        ],
        lower_label: "safe rate (%)",
        lower_max: 100.0,
        lower_legend: LegendPosition::LowerRight,
    })
}

fn scalability_f1() -> Result<Chart> {
    let xs: Vec<f64> = (4..=10).map(f64::from).collect();
    stacked(Stacked {
        name: "scalability_f1",
        caption: "Number of Consensus Nodes.",
        xs: &xs,
        throughput: &[113.8784, 112.2163, 115.1742, 119.5932, 104.0121, 92.0143, 83.6520],
        throughput_label: THROUGHPUT_E4_LOWER,
        throughput_max: 130.0,
        block_rate: &[
            5.7773592195498888,
            8.150943396226415,
            10.285630153121319,
            12.634081551334839,
            14.921107472462042,
            16.5292141396435874,
            17.8232738557020944,
        ],
        block_rate_range: (0.0, 20.0),
        lower_name: "Attacked Rate",
        lower: &[4.120102, 1.947033, 0.639294, 0.803584, 0.552313, 0.314721, 0.421610],
        lower_label: "attacked rate (%)",
        lower_max: 10.0,
        lower_legend: LegendPosition::UpperRight,
    })
}

fn scalability_fmax_latency() -> Result<Chart> {
    let xs: Vec<f64> = (4..=10).map(f64::from).collect();
    let generate = [21.1294, 24.1294, 26.3645, 29.3645, 33.1018, 43.1018, 44.7026];
    let commit_log = [26.1294, 36.1294, 44.3645, 55.3645, 69.1018, 84.1018, 105.7026];
    let commit_info = [18.1294, 23.1294, 26.3645, 27.3645, 39.1018, 59.1018, 62.7026];
    let panel = Panel::new()
        .series(line("Generate-Ordering-Log", "-o", "coral", &xs, &generate)?)
        .series(line("Commit-Ordering-Log", "-o", "brown", &xs, &commit_log)?)
        .series(line("Commit-Command-Info", "-p", "darkseagreen", &xs, &commit_info)?)
        .legend(frameless(LegendPosition::UpperLeft))
        .grid(faint_grid())
        .y_range(0.0, 120.0)
        .y_label("Latency (ms)")
        .x_label("Number of Consensus Nodes");
    Ok(Chart::single("scalability_fmax_latency", FigureSize::inches(6.0, 3.0), panel))
}

fn proposers() -> Result<Chart> {
    let xs = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 10.0, 12.0, 16.0, 24.0, 32.0];
    #[rustfmt::skip]
    let throughput = [
        (22.5672, 22.3672), (39.0164, 39.1564), (48.2321, 48.5491), (55.2511, 55.7511),
        (62.4261, 62.2607), (69.9104, 70.0507), (72.2813, 72.8293), (78.0622, 78.2642),
        (82.4251, 82.3872), (89.4231, 89.6321), (101.2412, 101.0927), (124.4214, 124.2193),
        (125.2141, 125.9091),
    ];
    #[rustfmt::skip]
    let safe = [
        (55.5, 55.5), (98.1, 98.1), (93.4, 93.4), (92.1, 92.1), (91.2, 91.2), (90.7, 90.2),
        (77.2, 77.6), (66.4, 66.2), (52.1, 52.7), (47.9, 47.1), (44.2, 45.2), (54.9, 55.9),
        (31.2, 30.2),
    ];
    let top = Panel::new()
        .series(errorbar_ranges("Throughput", "-o", "coral", &xs, &throughput)?)
        .legend(frameless(LegendPosition::UpperLeft))
        .grid(faint_grid())
        .x_ticks(ticks(&xs))
        .hide_x_tick_labels()
        .y_range(0.0, 150.0)
        .y_label(THROUGHPUT_E4_LOWER);
    let bottom = Panel::new()
        .series(errorbar_ranges("Safe Rate", "-d", "darkseagreen", &xs, &safe)?)
        .legend(frameless(LegendPosition::UpperRight))
        .grid(faint_grid())
        .x_ticks(ticks(&xs))
        .y_range(0.0, 100.0)
        .y_label("safe rate (%)");
    Ok(Chart::new("proposers", FigureSize::inches(6.0, 6.0))
        .panel(top)
        .panel(bottom)
        .caption("Number of Proposer per Node"))
}

const PROPOSER_XS: [f64; 4] = [4.0, 8.0, 12.0, 16.0];
const PROPOSER_THROUGHPUT: [f64; 4] = [23.8784, 26.2163, 28.1742, 29.5932];
const PROPOSER_BLOCK_RATE: [f64; 4] = [
    18.7773592195498888,
    21.150943396226415,
    23.285630153121319,
    26.634081551334839,
];
const THROUGHPUT_E3: &str = "throughput (10\u{00B3} tx/s)";

fn proposer_block_rate() -> Result<SecondaryAxis> {
    Ok(SecondaryAxis {
        label: Some(BLOCKS_PER_COMMIT.to_string()),
        y_range: Some((10.0, 30.0)),
        series: vec![errorbar(
            "Block Rate",
            "-o",
            "burlywood",
            &PROPOSER_XS,
            &PROPOSER_BLOCK_RATE,
        )?],
        legend: frameless(LegendPosition::LowerRight),
    })
}

fn proposer_throughput_panel() -> Result<Panel> {
    Ok(Panel::new()
        .series(errorbar("Throughput", "-d", "coral", &PROPOSER_XS, &PROPOSER_THROUGHPUT)?)
        .legend(frameless(LegendPosition::LowerCenter))
        .grid(faint_grid())
        .x_ticks(ticks(&PROPOSER_XS))
        .y_range(0.0, 40.0)
        .y_label(THROUGHPUT_E3)
        .secondary(proposer_block_rate()?))
}

fn proposers_new() -> Result<Chart> {
    let top = proposer_throughput_panel()?.hide_x_tick_labels();
    let bottom = Panel::new()
        .series(errorbar(
            "Safe Rate",
            "-d",
            "darkseagreen",
            &PROPOSER_XS,
            &[81.120102, 71.447033, 63.439294, 58.203584],
        )?)
        .legend(frameless(LegendPosition::LowerRight))
        .grid(faint_grid())
        .x_ticks(ticks(&PROPOSER_XS))
        .y_range(0.0, 100.0)
        .y_label("safe rate (%)");
    Ok(Chart::new("proposers_new", FigureSize::inches(6.0, 6.0))
        .panel(top)
        .panel(bottom)
        .caption("Number of Proposers"))
}

fn proposers_tps() -> Result<Chart> {
    let panel = proposer_throughput_panel()?;
    let chart = Chart::single("proposers_tps", FigureSize::inches(6.0, 3.0), panel);
    Ok(chart.caption("Number of Proposers"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Sample;

    #[test]
    fn every_name_builds_and_matches_its_chart() {
        for name in names() {
            let chart = find(name).unwrap();
            assert_eq!(chart.name, name);
            assert!(!chart.panels.is_empty());
        }
        assert_eq!(catalog().unwrap().len(), 14);
    }

    #[test]
    fn unknown_names_are_rejected() {
        assert!(matches!(find("nope"), Err(FigureError::UnknownFigure(n)) if n == "nope"));
    }

    #[test]
    fn stacked_figures_hide_upper_tick_labels_only() {
        let chart = find("scalability").unwrap();
        assert_eq!(chart.panels.len(), 2);
        assert!(!chart.panels[0].x_tick_labels);
        assert!(chart.panels[1].x_tick_labels);
        assert_eq!(chart.panels[0].secondary.as_ref().unwrap().y_range, Some((0.0, 6.0)));
    }

    #[test]
    fn proposers_keep_paired_measurements_as_ranges() {
        let chart = find("proposers").unwrap();
        let throughput = &chart.panels[0].series[0];
        assert_eq!(throughput.points.len(), 13);
        assert!(matches!(
            throughput.points[0],
            Sample::Range { x, low, high } if x == 1.0 && low == 22.5672 && high == 22.3672
        ));
    }

    #[test]
    fn multi_evaluation_has_ten_series_outside_legend() {
        let chart = find("multi_evaluation").unwrap();
        assert_eq!(chart.series_count(), 10);
        assert_eq!(chart.panels[0].legend.position, LegendPosition::OutsideRight);
        assert_eq!(chart.sample_count(), 40);
    }
}
