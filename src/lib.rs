//! phalanx_figures
//!
//! Benchmark figures of the Phalanx consensus evaluation as data, plus the
//! renderer that turns them into SVG/PNG charts. Pairs with the
//! `phalanx-figures` CLI and the optional `phalanx-figures-gui` viewer.
//!
//! ### Features
//! - Line charts with markers, dashes, and vertical error bars
//! - Stacked panels and a right-hand secondary y axis
//! - Inside/outside legend placement including matplotlib-style `best`
//! - The original figures as a named catalog
//! - JSON chart descriptions and tidy CSV export of plotted samples
//!
//! ### Example
//! ```no_run
//! use phalanx_figures::{Chart, FigureSize, Panel, Series, SeriesStyle, viz};
//!
//! let throughput = Series::new("Throughput", SeriesStyle::plot("-o", "coral")?)
//!     .with_values([(4.0, 20.0), (8.0, 15.0)]);
//! let chart = Chart::single(
//!     "throughput",
//!     FigureSize::inches(6.0, 3.0),
//!     Panel::new().series(throughput).y_range(0.0, 30.0).y_label("Throughput"),
//! );
//! let layout = viz::render_chart(&chart, "throughput.svg")?;
//! assert_eq!(layout.panels[0].y_range, (0.0, 30.0));
//!
//! let fig = phalanx_figures::catalog::find("scalability")?;
//! viz::render_chart(&fig, "scalability.png")?;
//! # Ok::<(), phalanx_figures::FigureError>(())
//! ```

pub mod catalog;
pub mod error;
pub mod models;
pub mod storage;
pub mod style;
pub mod viz;

pub use error::{FigureError, Result};
pub use models::{
    Chart, FigureSize, GridStyle, LegendPosition, LegendSpec, Panel, Sample, SecondaryAxis,
    Series, Tick,
};
pub use style::{Color, LineDash, MarkerFill, MarkerShape, SeriesStyle};
pub use viz::{ChartLayout, RenderOptions};
