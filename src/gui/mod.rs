pub mod chart_canvas;
pub mod series_dialog;
pub mod theme;
pub mod toolbar;
