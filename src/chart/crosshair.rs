/// Crosshair cursor with optional snapping and two-point measurement

use super::transform::DataPos;
use crate::data::series::Series;

/// Copy of the selected series' plotted data used for snapping
#[derive(Debug, Clone, PartialEq)]
pub struct SnapTrace {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl SnapTrace {
    /// `None` for an empty series
    pub fn from_series(series: &Series) -> Option<Self> {
        if series.is_empty() {
            return None;
        }
        Some(Self {
            x: series.x_axis().to_vec(),
            y: series.display_y(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrosshairMode {
    Free,
    Snapped,
}

/// Index of the sample closest to `x` on a strictly monotonic axis
pub fn nearest_index(xs: &[f64], x: f64) -> Option<usize> {
    if xs.is_empty() {
        return None;
    }
    let ascending = xs.len() < 2 || xs[0] < xs[xs.len() - 1];
    let upper = if ascending {
        xs.partition_point(|v| *v < x)
    } else {
        xs.partition_point(|v| *v > x)
    };
    if upper == 0 {
        return Some(0);
    }
    if upper >= xs.len() {
        return Some(xs.len() - 1);
    }
    let below = upper - 1;
    if (x - xs[below]).abs() <= (xs[upper] - x).abs() {
        Some(below)
    } else {
        Some(upper)
    }
}

#[derive(Debug, Clone, Default)]
pub struct CrosshairCursor {
    trace: Option<SnapTrace>,
    last_index: Option<usize>,
    /// Pointer x of the last move inside the plot
    pointer_x: Option<f64>,
    position: Option<DataPos>,
    visible: bool,
    origin: Option<DataPos>,
}

impl CrosshairCursor {
    pub fn new(trace: Option<SnapTrace>) -> Self {
        Self {
            trace,
            ..Default::default()
        }
    }

    pub fn mode(&self) -> CrosshairMode {
        if self.trace.is_some() {
            CrosshairMode::Snapped
        } else {
            CrosshairMode::Free
        }
    }

    /// Swap the snap target. The glyph moves to the sample of the new trace
    /// nearest the last pointer x, so a rescaled trace keeps its index and a
    /// different trace is resolved afresh.
    pub fn set_trace(&mut self, trace: Option<SnapTrace>) {
        match (&trace, self.pointer_x) {
            (Some(t), Some(x)) => {
                self.last_index = nearest_index(&t.x, x);
                if let Some(i) = self.last_index {
                    self.position = Some(DataPos::new(t.x[i], t.y[i]));
                }
            }
            _ => self.last_index = None,
        }
        self.trace = trace;
    }

    /// Follow the pointer. Returns true when a redraw is needed.
    pub fn on_move(&mut self, pointer: DataPos, inside: bool) -> bool {
        if !inside {
            return self.hide();
        }
        let shown = !self.visible;
        self.visible = true;
        self.pointer_x = Some(pointer.x);

        match &self.trace {
            Some(trace) => {
                let Some(index) = nearest_index(&trace.x, pointer.x) else {
                    return shown;
                };
                if self.last_index == Some(index) {
                    return shown;
                }
                self.last_index = Some(index);
                self.position = Some(DataPos::new(trace.x[index], trace.y[index]));
            }
            None => {
                self.last_index = None;
                self.position = Some(pointer);
            }
        }
        true
    }

    /// Hide the glyphs; snap and measurement state are kept
    pub fn hide(&mut self) -> bool {
        let changed = self.visible;
        self.visible = false;
        changed
    }

    /// Start or clear a measurement. The origin is the snapped sample when
    /// there is one, otherwise the raw pointer.
    pub fn toggle_measurement(&mut self, pointer: DataPos) {
        if self.origin.take().is_some() {
            return;
        }
        let snapped = match (&self.trace, self.last_index) {
            (Some(t), Some(i)) if i < t.x.len() => Some(DataPos::new(t.x[i], t.y[i])),
            _ => None,
        };
        self.origin = Some(snapped.unwrap_or(pointer));
    }

    pub fn position(&self) -> Option<DataPos> {
        self.position
    }

    pub fn origin(&self) -> Option<DataPos> {
        self.origin
    }

    pub fn last_index(&self) -> Option<usize> {
        self.last_index
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    /// `x=…, y=…` at the current position
    pub fn readout(&self, precision: usize) -> Option<String> {
        self.position
            .map(|p| format!("x={:.*}, y={:.*}", precision, p.x, precision, p.y))
    }

    /// ` dx=…, dy=…` from the origin to the current position
    pub fn delta_readout(&self, precision: usize) -> Option<String> {
        let origin = self.origin?;
        let here = self.position.unwrap_or(origin);
        Some(format!(
            " dx={:.*}, dy={:.*}",
            precision,
            here.x - origin.x,
            precision,
            here.y - origin.y
        ))
    }
}
