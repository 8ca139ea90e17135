/// Theme system: Light and Dark colour sets for the application and chart

/// Available themes
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum AppTheme {
    Light,
    Dark,
}

impl AppTheme {
    pub fn label(&self) -> &'static str {
        match self {
            AppTheme::Light => "☀ Light",
            AppTheme::Dark => "🌙 Dark",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            AppTheme::Light => AppTheme::Dark,
            AppTheme::Dark => AppTheme::Light,
        }
    }
}

/// All colors a theme needs to provide
#[derive(Debug, Clone)]
pub struct ThemeColors {
    // Panels & backgrounds
    pub panel_fill: egui::Color32,
    pub window_fill: egui::Color32,
    pub faint_bg: egui::Color32,

    // Widgets
    pub widget_inactive_bg: egui::Color32,
    pub widget_hovered_stroke: egui::Color32,
    pub widget_active_bg: egui::Color32,

    pub selection_bg: egui::Color32,
    pub selection_stroke: egui::Color32,

    // Text
    pub text_primary: egui::Color32,
    pub text_muted: egui::Color32,

    pub accent: egui::Color32,
    pub success: egui::Color32,
    pub warning: egui::Color32,
    pub error: egui::Color32,

    // Chart
    /// Line colours, cycled by series colour index
    pub series_palette: [egui::Color32; 10],
    pub guide_line: egui::Color32,
    pub zoom_box: egui::Color32,
    pub readout_bg: egui::Color32,
    pub legend_bg: egui::Color32,

    // Status bar
    pub status_bar_bg: egui::Color32,
    pub status_text: egui::Color32,

    pub shadow_color: egui::Color32,

    pub is_dark: bool,
}

impl ThemeColors {
    pub fn from_theme(theme: AppTheme) -> Self {
        match theme {
            AppTheme::Light => Self::light(),
            AppTheme::Dark => Self::dark(),
        }
    }

    /// Colour for a series colour index
    pub fn series_color(&self, index: usize) -> egui::Color32 {
        self.series_palette[index % self.series_palette.len()]
    }

    fn light() -> Self {
        Self {
            panel_fill: egui::Color32::from_rgb(0xF7, 0xF7, 0xF8),
            window_fill: egui::Color32::from_rgb(0xFF, 0xFF, 0xFF),
            faint_bg: egui::Color32::from_rgb(0xF0, 0xF1, 0xF3),

            widget_inactive_bg: egui::Color32::from_rgb(0xE3, 0xE5, 0xE8),
            widget_hovered_stroke: egui::Color32::from_rgb(0x5B, 0x9B, 0xD5),
            widget_active_bg: egui::Color32::from_rgb(0x3B, 0x7D, 0xC0),

            selection_bg: egui::Color32::from_rgba_premultiplied(0x3B, 0x7D, 0xC0, 0x40),
            selection_stroke: egui::Color32::from_rgb(0x3B, 0x7D, 0xC0),

            text_primary: egui::Color32::from_rgb(0x2A, 0x2E, 0x36),
            text_muted: egui::Color32::from_rgb(0x88, 0x8C, 0x94),

            accent: egui::Color32::from_rgb(0x3B, 0x7D, 0xC0),
            success: egui::Color32::from_rgb(0x27, 0x8B, 0x4A),
            warning: egui::Color32::from_rgb(0xB8, 0x8B, 0x00),
            error: egui::Color32::from_rgb(0xD0, 0x30, 0x30),

            // matplotlib "tab10"
            series_palette: [
                egui::Color32::from_rgb(0x1F, 0x77, 0xB4),
                egui::Color32::from_rgb(0xFF, 0x7F, 0x0E),
                egui::Color32::from_rgb(0x2C, 0xA0, 0x2C),
                egui::Color32::from_rgb(0xD6, 0x27, 0x28),
                egui::Color32::from_rgb(0x94, 0x67, 0xBD),
                egui::Color32::from_rgb(0x8C, 0x56, 0x4B),
                egui::Color32::from_rgb(0xE3, 0x77, 0xC2),
                egui::Color32::from_rgb(0x7F, 0x7F, 0x7F),
                egui::Color32::from_rgb(0xBC, 0xBD, 0x22),
                egui::Color32::from_rgb(0x17, 0xBE, 0xCF),
            ],
            guide_line: egui::Color32::BLACK,
            zoom_box: egui::Color32::BLACK,
            readout_bg: egui::Color32::from_rgba_unmultiplied(0xFF, 0x00, 0x00, 0x80),
            legend_bg: egui::Color32::from_rgba_unmultiplied(0xFF, 0xFF, 0xFF, 0xE0),

            status_bar_bg: egui::Color32::from_rgb(0xF0, 0xF1, 0xF3),
            status_text: egui::Color32::from_rgb(0x44, 0x48, 0x52),

            shadow_color: egui::Color32::from_rgba_premultiplied(0, 0, 0, 25),

            is_dark: false,
        }
    }

    fn dark() -> Self {
        Self {
            panel_fill: egui::Color32::from_rgb(0x1B, 0x1D, 0x22),
            window_fill: egui::Color32::from_rgb(0x22, 0x24, 0x2A),
            faint_bg: egui::Color32::from_rgb(0x26, 0x28, 0x2E),

            widget_inactive_bg: egui::Color32::from_rgb(0x2E, 0x31, 0x38),
            widget_hovered_stroke: egui::Color32::from_rgb(0x6C, 0xB6, 0xFF),
            widget_active_bg: egui::Color32::from_rgb(0x2F, 0x6F, 0xB5),

            selection_bg: egui::Color32::from_rgba_premultiplied(0x2F, 0x6F, 0xB5, 0x50),
            selection_stroke: egui::Color32::from_rgb(0x6C, 0xB6, 0xFF),

            text_primary: egui::Color32::from_rgb(0xE0, 0xE2, 0xE6),
            text_muted: egui::Color32::from_rgb(0x80, 0x84, 0x8C),

            accent: egui::Color32::from_rgb(0x6C, 0xB6, 0xFF),
            success: egui::Color32::from_rgb(0x4C, 0xC3, 0x6E),
            warning: egui::Color32::from_rgb(0xE5, 0xB8, 0x2A),
            error: egui::Color32::from_rgb(0xFF, 0x5A, 0x5A),

            series_palette: [
                egui::Color32::from_rgb(0x4E, 0xA5, 0xE8),
                egui::Color32::from_rgb(0xFF, 0x9F, 0x43),
                egui::Color32::from_rgb(0x5C, 0xD6, 0x5C),
                egui::Color32::from_rgb(0xFF, 0x5C, 0x5C),
                egui::Color32::from_rgb(0xB8, 0x8C, 0xE8),
                egui::Color32::from_rgb(0xC9, 0x8B, 0x7E),
                egui::Color32::from_rgb(0xF2, 0x9C, 0xD8),
                egui::Color32::from_rgb(0xB0, 0xB0, 0xB0),
                egui::Color32::from_rgb(0xDB, 0xDC, 0x4A),
                egui::Color32::from_rgb(0x4F, 0xD8, 0xE8),
            ],
            guide_line: egui::Color32::from_rgb(0xE0, 0xE2, 0xE6),
            zoom_box: egui::Color32::from_rgb(0xE0, 0xE2, 0xE6),
            readout_bg: egui::Color32::from_rgba_unmultiplied(0xC0, 0x20, 0x20, 0xA0),
            legend_bg: egui::Color32::from_rgba_unmultiplied(0x22, 0x24, 0x2A, 0xE0),

            status_bar_bg: egui::Color32::from_rgb(0x16, 0x18, 0x1C),
            status_text: egui::Color32::from_rgb(0xA8, 0xAC, 0xB4),

            shadow_color: egui::Color32::from_rgba_premultiplied(0, 0, 0, 60),

            is_dark: true,
        }
    }
}

/// Apply a theme to the egui context
pub fn apply_theme(ctx: &egui::Context, theme: AppTheme) {
    let c = ThemeColors::from_theme(theme);

    let mut visuals = if c.is_dark {
        egui::Visuals::dark()
    } else {
        egui::Visuals::light()
    };

    visuals.panel_fill = c.panel_fill;
    visuals.window_fill = c.window_fill;
    visuals.faint_bg_color = c.faint_bg;

    visuals.widgets.noninteractive.corner_radius = egui::CornerRadius::same(3);
    visuals.widgets.noninteractive.fg_stroke = egui::Stroke::new(1.0, c.text_primary);

    visuals.widgets.inactive.bg_fill = c.widget_inactive_bg;
    visuals.widgets.inactive.corner_radius = egui::CornerRadius::same(4);

    visuals.widgets.hovered.bg_stroke = egui::Stroke::new(1.0, c.widget_hovered_stroke);
    visuals.widgets.active.bg_fill = c.widget_active_bg;

    visuals.selection.bg_fill = c.selection_bg;
    visuals.selection.stroke = egui::Stroke::new(1.5, c.selection_stroke);

    visuals.window_shadow = egui::epaint::Shadow {
        offset: [0, 2],
        blur: 8,
        spread: 0,
        color: c.shadow_color,
    };

    ctx.set_visuals(visuals);
}
