use std::fs;

use phalanx_figures::viz::{self, AxisSide, RenderOptions};
use phalanx_figures::{
    Chart, FigureError, FigureSize, LegendPosition, LegendSpec, Panel, SecondaryAxis, Series,
    SeriesStyle, Tick,
};
use tempfile::tempdir;

fn throughput_chart() -> Chart {
    let series = Series::new("Throughput", SeriesStyle::plot("-o", "coral").unwrap())
        .with_values([(4.0, 20.0), (8.0, 15.0)]);
    Chart::single(
        "throughput",
        FigureSize::inches(6.0, 3.0),
        Panel::new()
            .series(series)
            .y_range(0.0, 30.0)
            .y_label("Throughput")
            .x_label("Replica Number"),
    )
}

#[test]
fn reports_configured_range_and_exact_vertices() {
    let dir = tempdir().unwrap();
    let layout = viz::render_chart(&throughput_chart(), dir.path().join("t.svg")).unwrap();

    assert_eq!(layout.panels.len(), 1);
    let panel = &layout.panels[0];
    assert_eq!(panel.y_range, (0.0, 30.0));
    assert_eq!(panel.series.len(), 1);
    let line = panel.series_named("Throughput").unwrap();
    assert_eq!(line.axis, AxisSide::Primary);
    assert_eq!(line.vertices, vec![(4.0, 20.0), (8.0, 15.0)]);
    assert!(line.error_bars.is_empty());
}

#[test]
fn every_series_renders_to_both_formats() {
    let dir = tempdir().unwrap();
    let mut panel = Panel::new();
    for (i, color) in ["coral", "darkseagreen", "royalblue", "#8a2be2"].iter().enumerate() {
        let y0 = i as f64;
        panel = panel.series(
            Series::new(format!("s{i}"), SeriesStyle::plot("--s", color).unwrap())
                .with_values([(1.0, y0), (2.0, y0 + 1.0), (3.0, y0 + 0.5)]),
        );
    }
    let chart = Chart::single("four", FigureSize::inches(5.0, 3.0), panel);

    for ext in ["svg", "png"] {
        let path = dir.path().join(format!("four.{ext}"));
        let layout = viz::render_chart(&chart, &path).unwrap();
        assert_eq!(layout.panels[0].series.len(), 4);
        assert!(fs::metadata(&path).unwrap().len() > 0);
    }
}

#[test]
fn empty_series_is_not_an_error() {
    let dir = tempdir().unwrap();
    let chart = Chart::single(
        "empty",
        FigureSize::inches(4.0, 3.0),
        Panel::new()
            .series(Series::new("nothing", SeriesStyle::plot("-o", "teal").unwrap()))
            .series(
                Series::new("one", SeriesStyle::plot("-^", "gold").unwrap())
                    .with_values([(1.0, 1.0)]),
            ),
    );
    let layout = viz::render_chart(&chart, dir.path().join("empty.png")).unwrap();
    assert!(layout.panels[0].series_named("nothing").unwrap().vertices.is_empty());
    assert_eq!(layout.panels[0].series_named("one").unwrap().vertices.len(), 1);
}

#[test]
fn rendering_is_deterministic() {
    let chart = phalanx_figures::catalog::find("scalability").unwrap();
    let opts = RenderOptions::default();

    let (a, _) = viz::render_svg_string(&chart, &opts).unwrap();
    let (b, _) = viz::render_svg_string(&chart, &opts).unwrap();
    assert_eq!(a, b);

    let dir = tempdir().unwrap();
    let p1 = dir.path().join("a.png");
    let p2 = dir.path().join("b.png");
    viz::render_chart(&chart, &p1).unwrap();
    viz::render_chart(&chart, &p2).unwrap();
    assert_eq!(fs::read(p1).unwrap(), fs::read(p2).unwrap());
}

#[test]
fn explicit_ticks_and_limits_are_respected() {
    let dir = tempdir().unwrap();
    let xs = [4.0, 8.0, 16.0];
    let series = Series::new("rate", SeriesStyle::plot("-o", "coral").unwrap())
        .with_ys(&xs, &[90.0, 95.0, 99.0]);
    let chart = Chart::single(
        "ticks",
        FigureSize::inches(6.0, 3.0),
        Panel::new()
            .series(series)
            .x_ticks(Tick::integers([4, 8, 16]))
            .x_range(2.0, 18.0)
            .y_range(0.0, 100.0),
    );
    let layout = viz::render_chart(&chart, dir.path().join("ticks.svg")).unwrap();
    let panel = &layout.panels[0];

    assert_eq!(panel.x_range, (2.0, 18.0));
    assert_eq!(panel.y_range, (0.0, 100.0));
    let labels: Vec<&str> = panel.x_ticks.iter().map(|t| t.label.as_str()).collect();
    assert_eq!(labels, ["4", "8", "16"]);
    let first = panel.y_ticks.first().unwrap().value;
    let last = panel.y_ticks.last().unwrap().value;
    assert_eq!((first, last), (0.0, 100.0));
    assert!(panel.y_ticks.len() <= 9);
}

#[test]
fn range_samples_report_center_and_spread() {
    let dir = tempdir().unwrap();
    let series = Series::new("Throughput", SeriesStyle::errorbar("-o", "coral").unwrap())
        .with_ranges([(1.0, (22.0, 24.0)), (2.0, (40.0, 39.0))]);
    let chart = Chart::single(
        "ranges",
        FigureSize::inches(4.0, 3.0),
        Panel::new().series(series),
    );
    let layout = viz::render_chart(&chart, dir.path().join("ranges.svg")).unwrap();
    let s = layout.panels[0].series_named("Throughput").unwrap();

    assert_eq!(s.vertices, vec![(1.0, 23.0), (2.0, 39.5)]);
    assert_eq!(s.error_bars.len(), 2);
    assert_eq!((s.error_bars[0].low, s.error_bars[0].high), (21.0, 25.0));
    assert_eq!((s.error_bars[1].low, s.error_bars[1].high), (38.5, 40.5));
    // The automatic y range covers the error bars too.
    assert!(layout.panels[0].y_range.0 < 21.0 && layout.panels[0].y_range.1 > 40.5);
}

#[test]
fn best_legend_avoids_dense_corner() {
    let dir = tempdir().unwrap();
    let mut dense = Vec::new();
    for i in 0..5 {
        for j in 0..5 {
            dense.push((8.8 + 0.2 * i as f64, 9.0 + 0.2 * j as f64));
        }
    }
    let style = SeriesStyle::plot("o", "royalblue").unwrap();
    let series = Series::new("dense", style).with_values(dense);
    let chart = Chart::single(
        "best",
        FigureSize::inches(6.0, 4.0),
        Panel::new()
            .series(series)
            .x_range(0.0, 10.0)
            .y_range(0.0, 10.0)
            .legend(LegendSpec::at(LegendPosition::Best)),
    );
    let layout = viz::render_chart(&chart, dir.path().join("best.svg")).unwrap();
    assert_eq!(layout.panels[0].legend, Some(LegendPosition::UpperLeft));
}

#[test]
fn secondary_axis_has_its_own_range_and_legend() {
    let dir = tempdir().unwrap();
    let xs = [4.0, 5.0, 6.0];
    let panel = Panel::new()
        .series(
            Series::new("Throughput", SeriesStyle::plot("-o", "coral").unwrap())
                .with_ys(&xs, &[50.0, 52.0, 55.0]),
        )
        .y_range(0.0, 65.0)
        .legend(LegendSpec::at(LegendPosition::UpperLeft))
        .secondary(SecondaryAxis {
            label: Some("blocks per HS-commit".into()),
            y_range: Some((0.0, 6.0)),
            series: vec![
                Series::new("Block Rate", SeriesStyle::plot("--^", "darkseagreen").unwrap())
                    .with_ys(&xs, &[1.7, 2.1, 2.3]),
            ],
            legend: LegendSpec::at(LegendPosition::OutsideRight),
        });
    let chart = Chart::single("twin", FigureSize::inches(6.0, 3.0), panel);
    let layout = viz::render_chart(&chart, dir.path().join("twin.png")).unwrap();
    let p = &layout.panels[0];

    assert_eq!(p.secondary_y_range, Some((0.0, 6.0)));
    assert_eq!(p.legend, Some(LegendPosition::UpperLeft));
    assert_eq!(p.secondary_legend, Some(LegendPosition::UpperRight));
    assert_eq!(p.series_named("Block Rate").unwrap().axis, AxisSide::Secondary);
}

#[test]
fn outside_legend_is_reported() {
    let chart = phalanx_figures::catalog::find("multi_evaluation").unwrap();
    let (_, layout) = viz::render_svg_string(&chart, &RenderOptions::default()).unwrap();
    assert_eq!(layout.panels[0].legend, Some(LegendPosition::OutsideRight));
}

#[test]
fn dpi_scales_pixel_size() {
    let chart = throughput_chart();
    let (_, low) = viz::render_svg_string(&chart, &RenderOptions { dpi: 100.0 }).unwrap();
    let (_, high) = viz::render_svg_string(&chart, &RenderOptions { dpi: 200.0 }).unwrap();
    assert_eq!((low.width, low.height), (600, 300));
    assert_eq!((high.width, high.height), (1200, 600));
}

#[test]
fn unsupported_extension_creates_nothing() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("t.pdf");
    match viz::render_chart(&throughput_chart(), &path) {
        Err(FigureError::UnsupportedFormat(ext)) => assert_eq!(ext, "pdf"),
        other => panic!("expected UnsupportedFormat, got {other:?}"),
    }
    assert!(!path.exists());
}

#[test]
fn missing_directory_is_an_io_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("no").join("such").join("t.svg");
    match viz::render_chart(&throughput_chart(), &path) {
        Err(FigureError::Io { path: p, .. }) => assert_eq!(p, path),
        other => panic!("expected Io error, got {other:?}"),
    }
}

#[test]
fn titled_chart_with_caption_and_no_panels() {
    let dir = tempdir().unwrap();
    let chart = Chart::new("bare", FigureSize::inches(3.0, 2.0))
        .title("Nothing yet")
        .caption("Number of Node");
    let layout = viz::render_chart(&chart, dir.path().join("bare.svg")).unwrap();
    assert!(layout.panels.is_empty());
    let svg = fs::read_to_string(dir.path().join("bare.svg")).unwrap();
    assert!(svg.contains("Nothing yet"));
}

#[test]
fn tiny_figures_render_without_panicking() {
    let dir = tempdir().unwrap();
    let mut charts = Vec::new();
    for inches in [1.0, 0.8] {
        let mut chart = phalanx_figures::catalog::find("multi_evaluation").unwrap();
        chart.size = FigureSize::inches(inches, inches);
        charts.push(chart);
    }
    let mut speck = throughput_chart().title("Throughput").caption("Replica Number");
    speck.size = FigureSize::inches(0.1, 0.1);
    charts.push(speck);

    for (i, chart) in charts.iter().enumerate() {
        for ext in ["svg", "png"] {
            let path = dir.path().join(format!("tiny-{i}.{ext}"));
            let layout = viz::render_chart(chart, &path)
                .unwrap_or_else(|e| panic!("{} at {:?} ({ext}): {e}", chart.name, chart.size));
            assert_eq!(layout.panels.len(), chart.panels.len());
            assert!(fs::metadata(&path).unwrap().len() > 0);
        }
    }
}
