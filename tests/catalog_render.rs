use std::fs;

use phalanx_figures::{catalog, viz};
use tempfile::tempdir;

#[test]
fn every_figure_renders_to_svg_and_png() {
    let dir = tempdir().unwrap();
    let charts = catalog::catalog().unwrap();
    assert_eq!(charts.len(), catalog::names().len());

    for chart in &charts {
        for ext in ["svg", "png"] {
            let path = dir.path().join(format!("{}.{ext}", chart.name));
            let layout = viz::render_chart(chart, &path)
                .unwrap_or_else(|e| panic!("{} ({ext}): {e}", chart.name));
            assert_eq!(layout.panels.len(), chart.panels.len(), "{}", chart.name);
            assert!(fs::metadata(&path).unwrap().len() > 0);
        }
    }
}

#[test]
fn stacked_figures_share_x_and_hide_upper_labels() {
    let chart = catalog::find("scalability").unwrap();
    let (_, layout) = viz::render_svg_string(&chart, &viz::RenderOptions::default()).unwrap();
    assert_eq!(layout.panels.len(), 2);

    let (upper, lower) = (&layout.panels[0], &layout.panels[1]);
    assert_eq!(upper.x_range, lower.x_range);
    assert!(upper.x_ticks.iter().all(|t| t.label.is_empty()));
    assert!(lower.x_ticks.iter().any(|t| !t.label.is_empty()));
    assert_eq!(upper.secondary_y_range, Some((0.0, 6.0)));
}

#[test]
fn figure_names_are_unique() {
    let mut names = catalog::names();
    let n = names.len();
    names.sort_unstable();
    names.dedup();
    assert_eq!(names.len(), n);
}
