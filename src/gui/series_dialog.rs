/// Prompts opened from the legend context menu: Set Scale and Real/Imag

use crate::chart::legend::LegendMenuAction;
use crate::data::series::{DisplayMode, SeriesId};

/// Largest scale factor the prompt accepts
const SCALE_LIMIT: f64 = 1e12;

/// Actions from the series dialogs
#[derive(Debug, Clone, PartialEq)]
pub enum SeriesDialogAction {
    None,
    Apply(SeriesId, LegendMenuAction),
    Cancel,
}

#[derive(Debug, Clone, Default)]
pub struct ScaleDialogState {
    pub open: bool,
    pub target: Option<SeriesId>,
    pub label: String,
    pub input: String,
    pub error: Option<String>,
}

impl ScaleDialogState {
    pub fn open_for(&mut self, id: SeriesId, label: &str, current: f64) {
        self.open = true;
        self.target = Some(id);
        self.label = label.to_string();
        self.input = format!("{}", current);
        self.error = None;
    }

    /// Parse the typed factor; accepts a decimal point only
    pub fn parse_input(&self) -> Result<f64, String> {
        let value: f64 = self
            .input
            .trim()
            .parse()
            .map_err(|_| format!("'{}' is not a number", self.input.trim()))?;
        if !value.is_finite() || value.abs() > SCALE_LIMIT {
            return Err(format!("Scale must be within ±{:e}", SCALE_LIMIT));
        }
        Ok(value)
    }

    fn close(&mut self) {
        self.open = false;
        self.target = None;
        self.error = None;
    }
}

pub fn show_scale_dialog(ctx: &egui::Context, state: &mut ScaleDialogState) -> SeriesDialogAction {
    let mut action = SeriesDialogAction::None;
    let Some(target) = state.target else {
        return action;
    };
    if !state.open {
        return action;
    }

    egui::Window::new("Line scaling")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.label(format!("Enter new scaling factor for {}:", state.label));
            let response = ui.text_edit_singleline(&mut state.input);
            let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            if let Some(err) = &state.error {
                ui.colored_label(egui::Color32::from_rgb(0xD0, 0x30, 0x30), err);
            }
            ui.horizontal(|ui| {
                if ui.button("✅ OK").clicked() || submitted {
                    match state.parse_input() {
                        Ok(value) => {
                            action = SeriesDialogAction::Apply(target, LegendMenuAction::SetScale(value))
                        }
                        Err(e) => state.error = Some(e),
                    }
                }
                if ui.button("✖ Cancel").clicked() {
                    action = SeriesDialogAction::Cancel;
                }
            });
        });

    if action != SeriesDialogAction::None {
        state.close();
    }
    action
}

#[derive(Debug, Clone, Default)]
pub struct DisplayModeDialogState {
    pub open: bool,
    pub target: Option<SeriesId>,
    pub label: String,
    pub choice: DisplayMode,
}

impl DisplayModeDialogState {
    pub fn open_for(&mut self, id: SeriesId, label: &str, current: DisplayMode) {
        self.open = true;
        self.target = Some(id);
        self.label = label.to_string();
        self.choice = current;
    }
}

pub fn show_display_mode_dialog(
    ctx: &egui::Context,
    state: &mut DisplayModeDialogState,
) -> SeriesDialogAction {
    let mut action = SeriesDialogAction::None;
    let Some(target) = state.target else {
        return action;
    };
    if !state.open {
        return action;
    }

    egui::Window::new("Toggle Re/Im")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.label(format!("Real or Imag? ({})", state.label));
            ui.horizontal(|ui| {
                ui.radio_value(&mut state.choice, DisplayMode::Real, "Real");
                ui.radio_value(&mut state.choice, DisplayMode::Imag, "Imag");
            });
            ui.horizontal(|ui| {
                if ui.button("✅ OK").clicked() {
                    action = SeriesDialogAction::Apply(
                        target,
                        LegendMenuAction::SetDisplayMode(state.choice),
                    );
                }
                if ui.button("✖ Cancel").clicked() {
                    action = SeriesDialogAction::Cancel;
                }
            });
        });

    if action != SeriesDialogAction::None {
        state.open = false;
        state.target = None;
    }
    action
}
