/// Declarative output of one chart render. The host paints it verbatim.

use super::legend::LegendEntry;
use super::transform::DataPos;
use super::viewport::Limits;
use crate::data::series::SeriesId;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TextAnchor {
    /// Data coordinates
    Data(DataPos),
    /// Fraction of the plot area, origin bottom-left
    AxesFraction { x: f32, y: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuideRole {
    Crosshair,
    Measurement,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    SeriesLine {
        id: SeriesId,
        points: Vec<[f64; 2]>,
        color_index: usize,
    },
    /// Rubber-band rectangle of a running zoom
    ZoomBox { a: DataPos, b: DataPos },
    HLine { y: f64, role: GuideRole },
    VLine { x: f64, role: GuideRole },
    Text {
        anchor: TextAnchor,
        text: String,
        /// Drawn on a highlighted background
        boxed: bool,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct DrawList {
    pub limits: Limits,
    pub x_inverted: bool,
    pub x_label: &'static str,
    pub commands: Vec<DrawCommand>,
    /// `None` when the chart is empty
    pub legend: Option<Vec<LegendEntry>>,
}

impl DrawList {
    pub fn series_lines(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::SeriesLine { .. }))
    }
}
