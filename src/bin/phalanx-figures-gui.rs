/*!
 * Desktop viewer for the Phalanx benchmark figures
 *
 * - Browse the figure catalog or open a chart description (JSON)
 * - Preview the rendered chart in the window
 * - Save the current chart as SVG/PNG, or export the whole catalog
 */

use eframe::egui;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;

use phalanx_figures::viz::{self, OutputFormat, RenderOptions};
use phalanx_figures::{Chart, catalog, storage};

fn main() -> Result<(), eframe::Error> {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 700.0])
            .with_min_inner_size([640.0, 400.0])
            .with_title("Phalanx figures"),
        ..Default::default()
    };

    eframe::run_native(
        "Phalanx figures",
        options,
        Box::new(|_cc| Ok(Box::new(FiguresApp::new()))),
    )
}

struct FiguresApp {
    charts: Vec<Chart>,
    selected: usize,
    dpi: f64,

    export_format: ImageKind,
    output_path: String,

    preview: Option<egui::TextureHandle>,
    preview_key: Option<(usize, u64)>,

    is_loading: bool,
    status_message: String,
    error_message: String,

    operation_receiver: Option<mpsc::Receiver<OperationResult>>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum ImageKind {
    Svg,
    Png,
}

impl From<ImageKind> for OutputFormat {
    fn from(k: ImageKind) -> Self {
        match k {
            ImageKind::Svg => OutputFormat::Svg,
            ImageKind::Png => OutputFormat::Png,
        }
    }
}

#[derive(Debug)]
enum OperationResult {
    Success(String),
    Error(String),
}

impl FiguresApp {
    fn new() -> Self {
        let home_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .to_string_lossy()
            .to_string();

        let (charts, error_message) = match catalog::catalog() {
            Ok(charts) => (charts, String::new()),
            Err(err) => (Vec::new(), format!("Failed to build catalog: {err}")),
        };

        Self {
            charts,
            selected: 0,
            dpi: viz::DEFAULT_DPI,
            export_format: ImageKind::Svg,
            output_path: home_dir,
            preview: None,
            preview_key: None,
            is_loading: false,
            status_message: String::new(),
            error_message,
            operation_receiver: None,
        }
    }

    fn options(&self) -> RenderOptions {
        RenderOptions { dpi: self.dpi }
    }

    /// Re-render the preview texture when the selection or DPI changed.
    fn refresh_preview(&mut self, ctx: &egui::Context) {
        let key = (self.selected, self.dpi.to_bits());
        if self.preview_key == Some(key) {
            return;
        }
        self.preview_key = Some(key);
        self.preview = None;

        let opts = self.options();
        let Some(chart) = self.charts.get(self.selected) else {
            return;
        };
        match viz::render_rgb(chart, &opts) {
            Ok(frame) => {
                let image = egui::ColorImage::from_rgb(
                    [frame.width as usize, frame.height as usize],
                    &frame.pixels,
                );
                self.preview =
                    Some(ctx.load_texture(chart.name.clone(), image, egui::TextureOptions::LINEAR));
            }
            Err(err) => self.error_message = format!("Failed to render preview: {err}"),
        }
    }

    fn open_chart(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Chart description", &["json"])
            .pick_file()
        else {
            return;
        };
        match storage::load_json(&path) {
            Ok(chart) => {
                self.status_message = format!("Opened `{}` from {}", chart.name, path.display());
                self.error_message.clear();
                self.charts.push(chart);
                self.selected = self.charts.len() - 1;
            }
            Err(err) => self.error_message = format!("Failed to open chart: {err}"),
        }
    }

    fn save_current(&mut self, kind: ImageKind) {
        let opts = self.options();
        let Some(chart) = self.charts.get(self.selected) else {
            return;
        };
        let ext = OutputFormat::from(kind).extension();
        let Some(path) = rfd::FileDialog::new()
            .set_directory(&self.output_path)
            .set_file_name(format!("{}.{ext}", chart.name))
            .save_file()
        else {
            return;
        };
        match viz::render_chart_with(chart, &path, &opts) {
            Ok(_) => {
                self.status_message = format!("Saved {}", path.display());
                self.error_message.clear();
            }
            Err(err) => self.error_message = format!("Failed to save chart: {err}"),
        }
    }

    fn start_export(&mut self) {
        if self.output_path.trim().is_empty() {
            self.error_message = "Please specify an output directory".to_string();
            return;
        }

        self.is_loading = true;
        self.error_message.clear();
        self.status_message = "Rendering figures...".to_string();

        let (sender, receiver) = mpsc::channel();
        self.operation_receiver = Some(receiver);

        let charts = self.charts.clone();
        let output_dir = PathBuf::from(&self.output_path);
        let format = OutputFormat::from(self.export_format);
        let opts = self.options();

        thread::spawn(move || {
            let result = export_all(&charts, &output_dir, format, &opts);
            let _ = sender.send(result);
        });
    }

    fn check_operation_result(&mut self) {
        if let Some(receiver) = &self.operation_receiver
            && let Ok(result) = receiver.try_recv()
        {
            self.is_loading = false;
            self.operation_receiver = None;

            match result {
                OperationResult::Success(message) => {
                    self.status_message = message;
                    self.error_message.clear();
                }
                OperationResult::Error(error) => {
                    self.error_message = error;
                    self.status_message.clear();
                }
            }
        }
    }
}

impl eframe::App for FiguresApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_operation_result();
        if self.is_loading {
            ctx.request_repaint();
        }

        egui::SidePanel::left("figures")
            .resizable(true)
            .default_width(220.0)
            .show(ctx, |ui| {
                ui.heading("Figures");
                ui.add_space(5.0);
                egui::ScrollArea::vertical().show(ui, |ui| {
                    for (i, chart) in self.charts.iter().enumerate() {
                        if ui.selectable_label(i == self.selected, &chart.name).clicked() {
                            self.selected = i;
                        }
                    }
                });
                ui.add_space(10.0);
                if ui.button("Open chart JSON...").clicked() {
                    self.open_chart();
                }
            });

        egui::TopBottomPanel::bottom("actions").show(ctx, |ui| {
            ui.add_space(5.0);
            ui.horizontal(|ui| {
                ui.label("DPI:");
                ui.add(egui::DragValue::new(&mut self.dpi).range(50.0..=300.0));

                ui.separator();
                if ui.button("Save SVG...").clicked() {
                    self.save_current(ImageKind::Svg);
                }
                if ui.button("Save PNG...").clicked() {
                    self.save_current(ImageKind::Png);
                }
            });

            ui.horizontal(|ui| {
                ui.label("Output directory:");
                ui.text_edit_singleline(&mut self.output_path);
                if ui.button("Browse").clicked()
                    && let Some(path) = rfd::FileDialog::new().pick_folder()
                {
                    self.output_path = path.to_string_lossy().to_string();
                }
                ui.radio_value(&mut self.export_format, ImageKind::Svg, "SVG");
                ui.radio_value(&mut self.export_format, ImageKind::Png, "PNG");
                if ui
                    .add_enabled(!self.is_loading, egui::Button::new("Export all"))
                    .clicked()
                {
                    self.start_export();
                }
                if self.is_loading {
                    ui.spinner();
                }
            });

            if !self.status_message.is_empty() {
                ui.colored_label(egui::Color32::DARK_GREEN, &self.status_message);
            }
            if !self.error_message.is_empty() {
                ui.colored_label(egui::Color32::RED, &self.error_message);
            }
            ui.add_space(5.0);
        });

        self.refresh_preview(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::both().show(ui, |ui| match &self.preview {
                Some(texture) => {
                    ui.add(egui::Image::from_texture(
                        egui::load::SizedTexture::from_handle(texture),
                    ));
                }
                None => {
                    ui.label("No figure selected.");
                }
            });
        });
    }
}

fn export_all(
    charts: &[Chart],
    output_dir: &Path,
    format: OutputFormat,
    opts: &RenderOptions,
) -> OperationResult {
    if let Err(err) = std::fs::create_dir_all(output_dir) {
        return OperationResult::Error(format!(
            "Failed to create {}: {}",
            output_dir.display(),
            err
        ));
    }

    let mut output_files = Vec::new();
    for chart in charts {
        let path = output_dir.join(format!("{}.{}", chart.name, format.extension()));
        if let Err(err) = viz::render_chart_with(chart, &path, opts) {
            return OperationResult::Error(format!("Failed to render `{}`: {}", chart.name, err));
        }
        output_files.push(path.to_string_lossy().to_string());
    }

    OperationResult::Success(format!(
        "Rendered {} figures:\n{}",
        output_files.len(),
        output_files.join("\n")
    ))
}
