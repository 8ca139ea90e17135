/// Toolbar: top menu bar with file operations and chart commands

use std::path::PathBuf;

/// Actions that can be triggered from the toolbar
#[derive(Debug, Clone, PartialEq)]
pub enum ToolbarAction {
    None,
    ImportFidSpe,
    ImportFromOutputLog,
    LoadWave,
    ExportLog,
    Quit,
    DeleteSelected,
    DeleteAll,
    ToggleCrosshair,
    ToggleXReverse,
    ResetView,
    ThemeToggle,
    ShowActivityLog,
    ShowChartHelp,
    ShowAbout,
}

/// Checkbox state mirrored in the menus
pub struct ToolbarState<'a> {
    pub theme_label: &'a str,
    pub crosshair_on: bool,
    pub x_reversed: bool,
    pub has_selection: bool,
    pub has_series: bool,
}

/// Render the toolbar and return any triggered action
pub fn show_toolbar(ctx: &egui::Context, state: &ToolbarState) -> ToolbarAction {
    let mut action = ToolbarAction::None;

    egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
        egui::menu::bar(ui, |ui| {
            ui.menu_button("📁 File", |ui| {
                if ui.button("📂 Import FID/SPE…  (Ctrl+I)").clicked() {
                    action = ToolbarAction::ImportFidSpe;
                    ui.close_menu();
                }
                if ui.button("📄 Import from Output Log…").clicked() {
                    action = ToolbarAction::ImportFromOutputLog;
                    ui.close_menu();
                }
                if ui.button("〰 Load Wave").clicked() {
                    action = ToolbarAction::LoadWave;
                    ui.close_menu();
                }
                ui.separator();
                if ui.button("📋 Export Activity Log…").clicked() {
                    action = ToolbarAction::ExportLog;
                    ui.close_menu();
                }
                ui.separator();
                if ui.button("Quit").clicked() {
                    action = ToolbarAction::Quit;
                    ui.close_menu();
                }
            });

            ui.menu_button("📈 Chart", |ui| {
                if ui
                    .add_enabled(state.has_selection, egui::Button::new("🗑 Delete Selected  (Ctrl+D)"))
                    .clicked()
                {
                    action = ToolbarAction::DeleteSelected;
                    ui.close_menu();
                }
                if ui
                    .add_enabled(state.has_series, egui::Button::new("🗑 Delete All  (Ctrl+Shift+D)"))
                    .clicked()
                {
                    action = ToolbarAction::DeleteAll;
                    ui.close_menu();
                }
                ui.separator();
                let mut crosshair = state.crosshair_on;
                if ui.checkbox(&mut crosshair, "Crosshair  (Ctrl+Q)").clicked() {
                    action = ToolbarAction::ToggleCrosshair;
                    ui.close_menu();
                }
                let mut reversed = state.x_reversed;
                if ui.checkbox(&mut reversed, "Reverse x-axis").clicked() {
                    action = ToolbarAction::ToggleXReverse;
                    ui.close_menu();
                }
                if ui.button("🔄 Reset View").clicked() {
                    action = ToolbarAction::ResetView;
                    ui.close_menu();
                }
            });

            ui.menu_button("🔍 View", |ui| {
                if ui.button("📋 Activity Log").clicked() {
                    action = ToolbarAction::ShowActivityLog;
                    ui.close_menu();
                }
                if ui.button(format!("🎨 Theme: {}", state.theme_label)).clicked() {
                    action = ToolbarAction::ThemeToggle;
                    ui.close_menu();
                }
            });

            ui.menu_button("❓ Help", |ui| {
                if ui.button("Using Chart").clicked() {
                    action = ToolbarAction::ShowChartHelp;
                    ui.close_menu();
                }
                if ui.button("ℹ About").clicked() {
                    action = ToolbarAction::ShowAbout;
                    ui.close_menu();
                }
            });

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui
                    .add(egui::Button::new(egui::RichText::new(state.theme_label).size(12.0)).corner_radius(12.0))
                    .clicked()
                {
                    action = ToolbarAction::ThemeToggle;
                }
                ui.separator();
                ui.label(
                    egui::RichText::new("SIMPSON-view")
                        .color(egui::Color32::from_rgb(0x70, 0x75, 0x80))
                        .size(12.0),
                );
            });
        });
    });

    action
}

/// Map keyboard shortcuts to toolbar actions
pub fn shortcut_action(ctx: &egui::Context) -> ToolbarAction {
    ctx.input(|i| {
        let command = i.modifiers.command;
        if command && i.modifiers.shift && i.key_pressed(egui::Key::D) {
            ToolbarAction::DeleteAll
        } else if command && i.key_pressed(egui::Key::D) {
            ToolbarAction::DeleteSelected
        } else if command && i.key_pressed(egui::Key::Q) {
            ToolbarAction::ToggleCrosshair
        } else if command && i.key_pressed(egui::Key::I) {
            ToolbarAction::ImportFidSpe
        } else {
            ToolbarAction::None
        }
    })
}

/// File-open dialog for SIMPSON result files
pub fn open_fidspe_dialog() -> Option<Vec<PathBuf>> {
    rfd::FileDialog::new()
        .set_title("Load FID/SPE")
        .add_filter("SIMPSON output", &["fid", "spe"])
        .add_filter("All Files", &["*"])
        .pick_files()
}

/// File-open dialog for a saved simulation output log
pub fn open_output_log_dialog() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_title("Open Simulation Output Log")
        .add_filter("Text / log", &["txt", "log", "out"])
        .add_filter("All Files", &["*"])
        .pick_file()
}

/// Save dialog for the activity log
pub fn save_log_dialog() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_title("Export Activity Log")
        .add_filter("Text File", &["txt"])
        .add_filter("JSON", &["json"])
        .save_file()
}
