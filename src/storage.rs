//! Chart persistence: whole descriptions as JSON, plotted samples as tidy CSV.

use std::fs::{self, File};
use std::path::Path;

use csv::WriterBuilder;
use log::info;

use crate::error::{FigureError, Result};
use crate::models::{Chart, Sample};

/// Save a chart description as pretty JSON.
pub fn save_json<P: AsRef<Path>>(chart: &Chart, path: P) -> Result<()> {
    let path = path.as_ref();
    let s = serde_json::to_string_pretty(chart)?;
    fs::write(path, s).map_err(|e| FigureError::io(path, e))?;
    info!("saved chart `{}` to {}", chart.name, path.display());
    Ok(())
}

/// Load a chart description written by [`save_json`] (or by hand).
pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Chart> {
    let path = path.as_ref();
    let s = fs::read_to_string(path).map_err(|e| FigureError::io(path, e))?;
    Ok(serde_json::from_str(&s)?)
}

/// Prefix cells that a spreadsheet would evaluate as a formula.
fn sanitize_cell(s: &str) -> String {
    match s.chars().next() {
        Some('=' | '+' | '-' | '@') => format!("'{s}"),
        _ => s.to_string(),
    }
}

/// Save every plotted sample as one CSV row with header
/// `chart,panel,axis,series,x,y,y_low,y_high`.
///
/// `y` is the plotted height; range samples also fill `y_low`/`y_high`.
pub fn save_csv<P: AsRef<Path>>(chart: &Chart, path: P) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| FigureError::io(path, e))?;
    let mut wtr = WriterBuilder::new().from_writer(file);
    wtr.write_record(["chart", "panel", "axis", "series", "x", "y", "y_low", "y_high"])?;

    let chart_name = sanitize_cell(&chart.name);
    let mut rows = 0usize;
    for (pi, panel) in chart.panels.iter().enumerate() {
        let primary = panel.series.iter().map(|s| ("primary", s));
        let secondary = panel
            .secondary
            .iter()
            .flat_map(|sec| sec.series.iter().map(|s| ("secondary", s)));
        for (axis, series) in primary.chain(secondary) {
            let name = sanitize_cell(&series.name);
            for p in &series.points {
                let (low, high) = match *p {
                    Sample::Value { .. } => (String::new(), String::new()),
                    Sample::Range { low, high, .. } => (low.to_string(), high.to_string()),
                };
                wtr.write_record([
                    chart_name.as_str(),
                    pi.to_string().as_str(),
                    axis,
                    name.as_str(),
                    p.x().to_string().as_str(),
                    p.center().to_string().as_str(),
                    low.as_str(),
                    high.as_str(),
                ])?;
                rows += 1;
            }
        }
    }
    wtr.flush().map_err(|e| FigureError::io(path, e))?;
    info!("exported {rows} sample(s) of `{}` to {}", chart.name, path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn formula_cells_are_prefixed() {
        assert_eq!(sanitize_cell("=SUM(A1)"), "'=SUM(A1)");
        assert_eq!(sanitize_cell("-o"), "'-o");
        assert_eq!(sanitize_cell("Safe Rate"), "Safe Rate");
        assert_eq!(sanitize_cell(""), "");
    }

    #[test]
    fn load_json_reports_missing_file_path() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        match load_json(&missing) {
            Err(FigureError::Io { path, .. }) => assert_eq!(path, missing),
            other => panic!("expected Io error, got {other:?}"),
        }
    }
}
