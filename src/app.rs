/// Main application state and eframe::App implementation
///
/// Ties the chart surface to the menus, file loading, the series dialogs
/// and the activity log.

use std::path::{Path, PathBuf};

use eframe::egui;

use crate::chart::legend::LegendMenuAction;
use crate::chart::ChartSurface;
use crate::config::SimviewConfig;
use crate::data::fidspe;
use crate::data::series::SeriesId;
use crate::data::synth::WaveGenerator;
use crate::gui::chart_canvas::{self, CanvasAction, ChartCanvasState, CHART_HELP};
use crate::gui::series_dialog::{
    self, DisplayModeDialogState, ScaleDialogState, SeriesDialogAction,
};
use crate::gui::theme::{self, AppTheme, ThemeColors};
use crate::gui::toolbar::{self, ToolbarAction, ToolbarState};
use crate::log::activity::ActivityLog;

/// The main application
pub struct SimviewApp {
    chart: ChartSurface,
    canvas_state: ChartCanvasState,

    scale_dialog: ScaleDialogState,
    mode_dialog: DisplayModeDialogState,

    /// Session activity log
    activity: ActivityLog,
    waves: WaveGenerator,

    status_message: String,
    show_log_window: bool,
    show_help: bool,
    show_about: bool,

    current_theme: AppTheme,
    theme_colors: ThemeColors,
    line_width: f32,

    /// Files waiting to be loaded (command line, drag-and-drop)
    pending_files: Vec<PathBuf>,
}

impl SimviewApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        config: SimviewConfig,
        initial_files: Vec<PathBuf>,
    ) -> Self {
        theme::apply_theme(&cc.egui_ctx, config.theme);

        let mut style = (*cc.egui_ctx.style()).clone();
        style.spacing.item_spacing = egui::vec2(8.0, 5.0);
        style.spacing.button_padding = egui::vec2(8.0, 4.0);
        cc.egui_ctx.set_style(style);

        let mut activity = ActivityLog::new();
        activity.record("Session", "SIMPSON-view started");

        Self {
            chart: ChartSurface::new(config.chart),
            canvas_state: ChartCanvasState::default(),
            scale_dialog: ScaleDialogState::default(),
            mode_dialog: DisplayModeDialogState::default(),
            activity,
            waves: WaveGenerator::default(),
            status_message: "Ready. Import a FID/SPE file to begin".to_string(),
            show_log_window: false,
            show_help: false,
            show_about: false,
            current_theme: config.theme,
            theme_colors: ThemeColors::from_theme(config.theme),
            line_width: config.line_width,
            pending_files: initial_files,
        }
    }

    fn series_label(&self, id: SeriesId) -> String {
        self.chart
            .store()
            .get(id)
            .map(|s| s.label().to_string())
            .unwrap_or_else(|| id.to_string())
    }

    /// Put a failure in the status bar and the activity log
    fn report_error(&mut self, operation: &str, message: String) {
        log::warn!("{} failed: {}", operation, message);
        self.activity
            .record(&format!("{} failed", operation), &message);
        self.status_message = format!("❌ {}", message);
    }

    // ---- loading ----

    fn load_files(&mut self, paths: &[PathBuf]) {
        for path in paths {
            self.load_file(path);
        }
    }

    /// Read one FID/SPE file and add it to the chart, labelled by its file name
    fn load_file(&mut self, path: &Path) {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let data = match fidspe::read_fidspe_file(path) {
            Ok(data) => data,
            Err(e) => {
                self.report_error("Load", format!("{}: {}", path.display(), e));
                return;
            }
        };
        for warning in &data.warnings {
            log::warn!("{}: {}", name, warning);
            self.activity
                .record("Format warning", &format!("{}: {}", name, warning));
        }

        match self.chart.add_fidspe(&data, name.as_str()) {
            Ok(id) => {
                self.activity.record(
                    "Load",
                    &format!(
                        "{} ({}, {} points, SW={} Hz) as {}",
                        path.display(),
                        data.kind(),
                        data.header.np,
                        data.header.sw,
                        id
                    ),
                );
                self.status_message = if data.warnings.is_empty() {
                    format!("Loaded {}", name)
                } else {
                    format!("Loaded {} with {} warning(s)", name, data.warnings.len())
                };
            }
            Err(e) => self.report_error("Load", format!("{}: {}", name, e)),
        }
    }

    /// Load the files named on the last `simview:` line of a saved output log
    fn import_from_output_log(&mut self, log_path: &Path) {
        let text = match std::fs::read_to_string(log_path) {
            Ok(text) => text,
            Err(e) => {
                self.report_error("Import", format!("{}: {}", log_path.display(), e));
                return;
            }
        };
        let workdir = log_path.parent().unwrap_or_else(|| Path::new("."));
        let files = fidspe::files_from_output(&text, workdir);
        if files.is_empty() {
            self.status_message = format!(
                "No result files announced in {}",
                log_path.display()
            );
            return;
        }
        log::info!(
            "Output log {} lists {} file(s)",
            log_path.display(),
            files.len()
        );
        self.load_files(&files);
    }

    fn load_wave(&mut self) {
        let wave = self.waves.next_wave();
        let label = wave.label();
        let amplitude = wave.amplitude;
        match self.chart.add_series(wave.t, wave.samples, label.as_str()) {
            Ok(id) => {
                self.activity.record(
                    "Load wave",
                    &format!("f={} A={:.3} as {}", label, amplitude, id),
                );
                self.status_message = format!("Loaded wave {}", label);
            }
            Err(e) => self.report_error("Load wave", e.to_string()),
        }
    }

    fn export_log(&mut self, path: &Path) {
        let is_json = path
            .extension()
            .map(|e| e.eq_ignore_ascii_case("json"))
            .unwrap_or(false);
        let result = if is_json {
            self.activity.save_json(path)
        } else {
            self.activity.save_text(path)
        };
        match result {
            Ok(()) => self.status_message = format!("Log saved: {}", path.display()),
            Err(e) => self.report_error("Export log", format!("{}: {}", path.display(), e)),
        }
    }

    // ---- chart commands ----

    fn delete_selected(&mut self) {
        let Some(id) = self.chart.store().selected() else {
            self.status_message = "No line selected".to_string();
            return;
        };
        self.apply_series_action(id, LegendMenuAction::Delete);
    }

    fn delete_all(&mut self) {
        if self.chart.is_empty() {
            self.status_message = "Nothing to delete".to_string();
            return;
        }
        let count = self.chart.store().len();
        self.chart.remove_all();
        self.activity
            .record("Delete all", &format!("{} line(s) removed", count));
        self.status_message = "Chart cleared".to_string();
    }

    fn toggle_crosshair(&mut self) {
        let on = self.chart.toggle_crosshair();
        let state = if on { "on" } else { "off" };
        self.activity.record("Crosshair", state);
        self.status_message = format!("Crosshair {}", state);
    }

    fn toggle_x_reverse(&mut self) {
        let inverted = !self.chart.viewport().x_inverted();
        self.chart.set_x_inverted(inverted);
        self.activity.record(
            "Reverse x-axis",
            if inverted { "reversed" } else { "normal" },
        );
    }

    fn apply_series_action(&mut self, id: SeriesId, action: LegendMenuAction) {
        let label = self.series_label(id);
        match self.chart.apply_menu_action(id, action) {
            Ok(()) => {
                let (operation, description) = match action {
                    LegendMenuAction::Delete => ("Delete", format!("{} removed", label)),
                    LegendMenuAction::SetScale(factor) => {
                        ("Set scale", format!("{} scaled by {}", label, factor))
                    }
                    LegendMenuAction::SetDisplayMode(mode) => {
                        ("Toggle Re/Im", format!("{} shows {}", label, mode))
                    }
                };
                self.activity.record(operation, &description);
                self.status_message = description;
            }
            Err(e) => self.report_error("Chart", e.to_string()),
        }
    }

    fn handle_toolbar_action(&mut self, ctx: &egui::Context, action: ToolbarAction) {
        match action {
            ToolbarAction::None => {}
            ToolbarAction::ImportFidSpe => {
                if let Some(paths) = toolbar::open_fidspe_dialog() {
                    self.load_files(&paths);
                }
            }
            ToolbarAction::ImportFromOutputLog => {
                if let Some(path) = toolbar::open_output_log_dialog() {
                    self.import_from_output_log(&path);
                }
            }
            ToolbarAction::LoadWave => self.load_wave(),
            ToolbarAction::ExportLog => {
                if let Some(path) = toolbar::save_log_dialog() {
                    self.export_log(&path);
                }
            }
            ToolbarAction::Quit => ctx.send_viewport_cmd(egui::ViewportCommand::Close),
            ToolbarAction::DeleteSelected => self.delete_selected(),
            ToolbarAction::DeleteAll => self.delete_all(),
            ToolbarAction::ToggleCrosshair => self.toggle_crosshair(),
            ToolbarAction::ToggleXReverse => self.toggle_x_reverse(),
            ToolbarAction::ResetView => {
                self.chart.reset_view();
                self.status_message = "View reset".to_string();
            }
            ToolbarAction::ThemeToggle => {
                self.current_theme = self.current_theme.next();
                self.theme_colors = ThemeColors::from_theme(self.current_theme);
                log::info!("Theme: {:?}", self.current_theme);
            }
            ToolbarAction::ShowActivityLog => self.show_log_window = true,
            ToolbarAction::ShowChartHelp => self.show_help = true,
            ToolbarAction::ShowAbout => self.show_about = true,
        }
    }

    fn handle_canvas_action(&mut self, action: CanvasAction) {
        match action {
            CanvasAction::ExportFigure | CanvasAction::EditFigure => {
                self.status_message = "Figure export and editing are not available".to_string();
            }
            CanvasAction::ToggleCrosshair => self.toggle_crosshair(),
            CanvasAction::DeleteSeries(id) => self.apply_series_action(id, LegendMenuAction::Delete),
            CanvasAction::PromptScale(id) => {
                if let Some(series) = self.chart.store().get(id) {
                    self.scale_dialog
                        .open_for(id, series.label(), series.scale());
                }
            }
            CanvasAction::PromptDisplayMode(id) => {
                if let Some(series) = self.chart.store().get(id) {
                    self.mode_dialog
                        .open_for(id, series.label(), series.display_mode());
                }
            }
            CanvasAction::Failed(e) => self.report_error("Chart", e.to_string()),
        }
    }

    fn handle_dialog_action(&mut self, action: SeriesDialogAction) {
        match action {
            SeriesDialogAction::Apply(id, menu_action) => self.apply_series_action(id, menu_action),
            SeriesDialogAction::Cancel | SeriesDialogAction::None => {}
        }
    }
}

impl eframe::App for SimviewApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        theme::apply_theme(ctx, self.current_theme);

        ctx.input(|i| {
            for file in &i.raw.dropped_files {
                if let Some(path) = &file.path {
                    self.pending_files.push(path.clone());
                }
            }
        });
        if !self.pending_files.is_empty() {
            let files = std::mem::take(&mut self.pending_files);
            self.load_files(&files);
        }

        // ── Toolbar & shortcuts ──
        let toolbar_state = ToolbarState {
            theme_label: self.current_theme.label(),
            crosshair_on: self.chart.crosshair().is_some(),
            x_reversed: self.chart.viewport().x_inverted(),
            has_selection: self.chart.store().selected().is_some(),
            has_series: !self.chart.is_empty(),
        };
        let action = toolbar::show_toolbar(ctx, &toolbar_state);
        self.handle_toolbar_action(ctx, action);
        if !ctx.wants_keyboard_input() {
            let shortcut = toolbar::shortcut_action(ctx);
            self.handle_toolbar_action(ctx, shortcut);
        }

        // ── Status bar ──
        let tc = &self.theme_colors;
        egui::TopBottomPanel::bottom("status_bar")
            .frame(
                egui::Frame::new()
                    .fill(tc.status_bar_bg)
                    .inner_margin(egui::Margin::symmetric(12, 4)),
            )
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    if self.chart.crosshair().is_some() {
                        let badge = egui::Button::new(
                            egui::RichText::new("✛ Crosshair")
                                .size(11.5)
                                .strong()
                                .color(tc.accent),
                        )
                        .fill(tc.accent.linear_multiply(0.2))
                        .stroke(egui::Stroke::new(1.0, tc.accent))
                        .corner_radius(10.0);
                        ui.add(badge);
                        ui.separator();
                    }
                    ui.label(
                        egui::RichText::new(&self.status_message)
                            .size(11.5)
                            .color(tc.status_text),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let store = self.chart.store();
                        let kind = self
                            .chart
                            .data_kind()
                            .map(|k| k.to_string())
                            .unwrap_or_else(|| "-".to_string());
                        ui.label(
                            egui::RichText::new(format!(
                                "{} line(s) | {} | {}",
                                store.len(),
                                kind,
                                self.activity.len()
                            ))
                            .size(11.0)
                            .color(tc.text_muted),
                        )
                        .on_hover_text("lines | data kind | log entries");
                        if let Some(selected) = store.selected_series() {
                            ui.separator();
                            ui.label(
                                egui::RichText::new(format!(
                                    "selected: {} ×{} {}",
                                    selected.label(),
                                    selected.scale(),
                                    selected.display_mode()
                                ))
                                .size(11.0)
                                .color(tc.text_muted),
                            );
                        }
                    });
                });
            });

        // ── Chart ──
        let canvas_actions = egui::CentralPanel::default()
            .show(ctx, |ui| {
                chart_canvas::show_chart(
                    ui,
                    &mut self.chart,
                    &mut self.canvas_state,
                    &self.theme_colors,
                    self.line_width,
                )
            })
            .inner;
        for action in canvas_actions {
            self.handle_canvas_action(action);
        }

        // ── Series dialogs ──
        let scale_action = series_dialog::show_scale_dialog(ctx, &mut self.scale_dialog);
        self.handle_dialog_action(scale_action);
        let mode_action = series_dialog::show_display_mode_dialog(ctx, &mut self.mode_dialog);
        self.handle_dialog_action(mode_action);

        // ── Log Window ──
        let mut export_requested = false;
        if self.show_log_window {
            egui::Window::new("📋 Activity Log")
                .open(&mut self.show_log_window)
                .default_size([600.0, 400.0])
                .resizable(true)
                .show(ctx, |ui| {
                    ui.horizontal(|ui| {
                        ui.label(format!("Session {}", self.activity.session_id));
                        if ui.button("💾 Export…").clicked() {
                            export_requested = true;
                        }
                    });
                    ui.separator();
                    egui::ScrollArea::vertical()
                        .stick_to_bottom(true)
                        .show(ui, |ui| {
                            ui.style_mut().override_font_id = Some(egui::FontId::monospace(12.0));
                            ui.label(self.activity.to_text());
                        });
                });
        }
        if export_requested {
            if let Some(path) = toolbar::save_log_dialog() {
                self.export_log(&path);
            }
        }

        // ── Help ──
        if self.show_help {
            egui::Window::new("Using Chart")
                .open(&mut self.show_help)
                .default_width(460.0)
                .resizable(true)
                .show(ctx, |ui| {
                    ui.label(CHART_HELP);
                });
        }

        // ── About Dialog ──
        if self.show_about {
            egui::Window::new("About")
                .open(&mut self.show_about)
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.heading("SIMPSON-view");
                    ui.label(format!("Version {}", env!("CARGO_PKG_VERSION")));
                    ui.add_space(10.0);
                    ui.label("Viewer for SIMPSON FID and SPE result files");
                    ui.label("Built with Rust + egui");
                });
        }
    }
}
