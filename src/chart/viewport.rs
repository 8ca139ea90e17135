/// View limits and the zoom-box / pan gesture state machine
///
/// Limits are kept as ascending `(min, max)` pairs. X inversion is a
/// rendering flag: it decides which end of the x range sits on the left,
/// and the pair ordering reported by [`ViewportController::default_x_pair`].

use super::transform::DataPos;
use crate::config::ChartConfig;
use crate::data::series::Extent;

/// A closed interval on one axis, `min <= max`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisRange {
    pub min: f64,
    pub max: f64,
}

impl AxisRange {
    /// Build from two values in any order
    pub fn new(a: f64, b: f64) -> Self {
        if a <= b {
            Self { min: a, max: b }
        } else {
            Self { min: b, max: a }
        }
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    pub fn shift(&mut self, delta: f64) {
        self.min += delta;
        self.max += delta;
    }

    /// `min' = pivot - f*(pivot-min)`, `max' = pivot + f*(max-pivot)`
    pub fn scale_about(&mut self, pivot: f64, factor: f64) {
        let min = pivot - factor * (pivot - self.min);
        let max = pivot + factor * (self.max - pivot);
        *self = AxisRange::new(min, max);
    }

    /// Widen to include every value given
    pub fn include(&mut self, values: &[f64]) {
        for v in values {
            self.min = self.min.min(*v);
            self.max = self.max.max(*v);
        }
    }

    /// Pad a data extent to finite, non-degenerate bounds
    pub fn padded(lo: f64, hi: f64, margin: f64) -> Self {
        if !lo.is_finite() || !hi.is_finite() {
            return AxisRange::new(0.0, 1.0);
        }
        let span = hi - lo;
        if span <= 0.0 {
            let pad = if lo == 0.0 { 0.5 } else { lo.abs() * 0.05 };
            return AxisRange::new(lo - pad, hi + pad);
        }
        AxisRange::new(lo - span * margin, hi + span * margin)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Limits {
    pub x: AxisRange,
    pub y: AxisRange,
}

impl Limits {
    /// Limits of a chart with nothing on it
    pub const EMPTY: Limits = Limits {
        x: AxisRange { min: 0.0, max: 1.0 },
        y: AxisRange { min: 0.0, max: 1.0 },
    };
}

/// At most one pointer gesture runs at a time
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Gesture {
    #[default]
    Idle,
    ZoomBox {
        anchor: DataPos,
        /// `None` until the pointer has moved
        current: Option<DataPos>,
    },
    Pan {
        anchor: DataPos,
    },
}

#[derive(Debug, Clone)]
pub struct ViewportController {
    current: Limits,
    default: Limits,
    x_inverted: bool,
    gesture: Gesture,
    zoom_epsilon: f64,
    x_margin: f64,
    y_margin: f64,
}

impl ViewportController {
    pub fn new(config: &ChartConfig) -> Self {
        Self {
            current: Limits::EMPTY,
            default: Limits::EMPTY,
            x_inverted: false,
            gesture: Gesture::Idle,
            zoom_epsilon: config.zoom_epsilon,
            x_margin: config.x_margin,
            y_margin: config.y_margin,
        }
    }

    pub fn current(&self) -> Limits {
        self.current
    }

    pub fn default_limits(&self) -> Limits {
        self.default
    }

    pub fn x_inverted(&self) -> bool {
        self.x_inverted
    }

    pub fn gesture(&self) -> Gesture {
        self.gesture
    }

    /// Default x pair ordered for display: descending when inverted
    pub fn default_x_pair(&self) -> (f64, f64) {
        Self::ordered(self.default.x, self.x_inverted)
    }

    pub fn current_x_pair(&self) -> (f64, f64) {
        Self::ordered(self.current.x, self.x_inverted)
    }

    fn ordered(range: AxisRange, inverted: bool) -> (f64, f64) {
        if inverted {
            (range.max, range.min)
        } else {
            (range.min, range.max)
        }
    }

    pub fn set_current(&mut self, limits: Limits) {
        self.current = limits;
    }

    pub fn set_x_inverted(&mut self, inverted: bool) {
        self.x_inverted = inverted;
    }

    /// Recompute default limits from the visible data extent.
    /// `first` adopts them as the current view as well.
    pub fn autoscale(&mut self, extent: Option<Extent>, first: bool) {
        self.default = match extent {
            Some(e) => Limits {
                x: AxisRange::padded(e.x_min, e.x_max, self.x_margin),
                y: AxisRange::padded(e.y_min, e.y_max, self.y_margin),
            },
            None => Limits::EMPTY,
        };
        if first {
            self.current = self.default;
        }
    }

    /// Back to the state of an empty chart
    pub fn reset_empty(&mut self) {
        self.default = Limits::EMPTY;
        self.current = Limits::EMPTY;
        self.gesture = Gesture::Idle;
    }

    pub fn reset_to_default(&mut self) {
        self.current = self.default;
    }

    pub fn begin_zoom(&mut self, anchor: DataPos) {
        if self.gesture == Gesture::Idle {
            self.gesture = Gesture::ZoomBox {
                anchor,
                current: None,
            };
        }
    }

    pub fn begin_pan(&mut self, anchor: DataPos) {
        if self.gesture == Gesture::Idle {
            self.gesture = Gesture::Pan { anchor };
        }
    }

    /// Track the pointer. Returns true when the view needs a redraw.
    pub fn on_move(&mut self, pointer: DataPos, inside: bool) -> bool {
        match self.gesture {
            Gesture::ZoomBox { anchor, .. } => {
                self.gesture = Gesture::ZoomBox {
                    anchor,
                    current: Some(pointer),
                };
                if !inside {
                    // keep the runaway edge on screen
                    self.current.x.include(&[anchor.x, pointer.x]);
                    self.current.y.include(&[anchor.y, pointer.y]);
                }
                true
            }
            Gesture::Pan { anchor } => {
                self.current.x.shift(anchor.x - pointer.x);
                self.current.y.shift(anchor.y - pointer.y);
                true
            }
            Gesture::Idle => false,
        }
    }

    /// End a zoom-box. Returns true if new limits were committed.
    pub fn finish_zoom(&mut self) -> bool {
        let Gesture::ZoomBox { anchor, current } = self.gesture else {
            return false;
        };
        self.gesture = Gesture::Idle;
        let Some(corner) = current else {
            return false;
        };
        let x = AxisRange::new(anchor.x, corner.x);
        let y = AxisRange::new(anchor.y, corner.y);
        if x.span() > self.zoom_epsilon && y.span() > self.zoom_epsilon {
            log::debug!(
                "Zoom to x=[{}, {}] y=[{}, {}]",
                x.min,
                x.max,
                y.min,
                y.max
            );
            self.current = Limits { x, y };
            true
        } else {
            false
        }
    }

    /// End a pan. Returns true if one was running.
    pub fn end_pan(&mut self) -> bool {
        if matches!(self.gesture, Gesture::Pan { .. }) {
            self.gesture = Gesture::Idle;
            true
        } else {
            false
        }
    }

    pub fn scale_x_about(&mut self, pivot: f64, factor: f64) {
        self.current.x.scale_about(pivot, factor);
    }

    pub fn scale_y_about(&mut self, pivot: f64, factor: f64) {
        self.current.y.scale_about(pivot, factor);
    }
}
