use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::fs;
use std::path::{Path, PathBuf};

use phalanx_figures::viz::{self, OutputFormat, RenderOptions};
use phalanx_figures::{Chart, catalog, storage};

#[derive(Parser, Debug)]
#[command(
    name = "phalanx-figures",
    version,
    about = "Render the Phalanx benchmark figures to SVG or PNG"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List catalog figures with their panel and series counts.
    List,
    /// Render catalog figures (all of them when no name is given).
    Render(RenderArgs),
    /// Render a chart description saved as JSON.
    RenderFile(RenderFileArgs),
    /// Export a catalog figure as JSON description or CSV samples.
    Export(ExportArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ImageFormat {
    Svg,
    Png,
}

impl From<ImageFormat> for OutputFormat {
    fn from(f: ImageFormat) -> Self {
        match f {
            ImageFormat::Svg => OutputFormat::Svg,
            ImageFormat::Png => OutputFormat::Png,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum DataFormat {
    Csv,
    Json,
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// Figure names (see `list`). Renders the whole catalog when omitted.
    names: Vec<String>,
    /// Directory for the images; created if missing.
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,
    /// Image format.
    #[arg(short, long, value_enum, default_value_t = ImageFormat::Svg)]
    format: ImageFormat,
    /// Resolution in dots per inch (figure sizes are in inches).
    #[arg(long, default_value_t = viz::DEFAULT_DPI)]
    dpi: f64,
}

#[derive(Args, Debug)]
struct RenderFileArgs {
    /// Chart description (JSON).
    chart: PathBuf,
    /// Output image (.svg or .png). Defaults to `<name>.svg` next to the input.
    #[arg(long)]
    out: Option<PathBuf>,
    #[arg(long, default_value_t = viz::DEFAULT_DPI)]
    dpi: f64,
}

#[derive(Args, Debug)]
struct ExportArgs {
    /// Figure name.
    name: String,
    /// Output file.
    #[arg(long)]
    out: PathBuf,
    /// csv or json. If omitted, inferred from the --out extension.
    #[arg(long, value_enum)]
    format: Option<DataFormat>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.cmd {
        Command::List => cmd_list(),
        Command::Render(args) => cmd_render(args),
        Command::RenderFile(args) => cmd_render_file(args),
        Command::Export(args) => cmd_export(args),
    }
}

fn cmd_list() -> Result<()> {
    for chart in catalog::catalog()? {
        println!(
            "{:<28} panels={} series={} samples={}",
            chart.name,
            chart.panels.len(),
            chart.series_count(),
            chart.sample_count()
        );
    }
    Ok(())
}

fn check_dpi(dpi: f64) -> Result<RenderOptions> {
    if !(dpi.is_finite() && dpi > 0.0 && dpi <= 1200.0) {
        anyhow::bail!("--dpi must be between 0 and 1200, got {dpi}");
    }
    Ok(RenderOptions { dpi })
}

fn render_one(chart: &Chart, path: &Path, opts: &RenderOptions) -> Result<()> {
    viz::render_chart_with(chart, path, opts)
        .with_context(|| format!("rendering `{}`", chart.name))?;
    eprintln!("Wrote plot to {}", path.display());
    Ok(())
}

fn cmd_render(args: RenderArgs) -> Result<()> {
    let opts = check_dpi(args.dpi)?;
    let charts = if args.names.is_empty() {
        catalog::catalog()?
    } else {
        args.names
            .iter()
            .map(|n| catalog::find(n))
            .collect::<phalanx_figures::Result<Vec<_>>>()?
    };

    fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("creating {}", args.out_dir.display()))?;
    let ext = OutputFormat::from(args.format).extension();
    for chart in &charts {
        let path = args.out_dir.join(format!("{}.{ext}", chart.name));
        render_one(chart, &path, &opts)?;
    }
    Ok(())
}

fn cmd_render_file(args: RenderFileArgs) -> Result<()> {
    let opts = check_dpi(args.dpi)?;
    let chart = storage::load_json(&args.chart)
        .with_context(|| format!("loading {}", args.chart.display()))?;
    let out = match args.out {
        Some(p) => p,
        None => args.chart.with_file_name(format!("{}.svg", chart.name)),
    };
    render_one(&chart, &out, &opts)
}

fn cmd_export(args: ExportArgs) -> Result<()> {
    let chart = catalog::find(&args.name)?;
    let fmt = match args.format {
        Some(DataFormat::Csv) => "csv".to_string(),
        Some(DataFormat::Json) => "json".to_string(),
        None => args
            .out
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("csv")
            .to_ascii_lowercase(),
    };
    match fmt.as_str() {
        "csv" => storage::save_csv(&chart, &args.out)?,
        "json" => storage::save_json(&chart, &args.out)?,
        other => anyhow::bail!("unsupported format: {}", other),
    }
    eprintln!(
        "Saved {} samples of `{}` to {}",
        chart.sample_count(),
        chart.name,
        args.out.display()
    );
    Ok(())
}
