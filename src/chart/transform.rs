/// Screen ↔ data coordinate mapping
///
/// Screen coordinates are device points with y growing downwards, as the
/// host toolkit reports them. Data coordinates are axis units.

use super::viewport::Limits;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScreenPos {
    pub x: f32,
    pub y: f32,
}

impl ScreenPos {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DataPos {
    pub x: f64,
    pub y: f64,
}

impl DataPos {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Plot area on screen
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenRect {
    pub min: ScreenPos,
    pub max: ScreenPos,
}

impl ScreenRect {
    pub fn from_min_max(min: ScreenPos, max: ScreenPos) -> Self {
        Self { min, max }
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    pub fn contains(&self, pos: ScreenPos) -> bool {
        pos.x >= self.min.x && pos.x <= self.max.x && pos.y >= self.min.y && pos.y <= self.max.y
    }
}

/// Host-supplied view of the plot geometry for one event
pub trait CoordinateMapper {
    /// Inverse transform; valid outside the plot area too
    fn screen_to_data(&self, pos: ScreenPos) -> DataPos;
    /// Whether the position lies inside the plot area
    fn contains(&self, pos: ScreenPos) -> bool;
}

/// Linear mapping between a screen rectangle and axis limits
#[derive(Debug, Clone, Copy)]
pub struct PlotTransform {
    frame: ScreenRect,
    limits: Limits,
    x_inverted: bool,
}

impl PlotTransform {
    pub fn new(frame: ScreenRect, limits: Limits, x_inverted: bool) -> Self {
        Self {
            frame,
            limits,
            x_inverted,
        }
    }

    pub fn frame(&self) -> ScreenRect {
        self.frame
    }

    pub fn data_to_screen(&self, pos: DataPos) -> ScreenPos {
        let tx = if self.limits.x.span() > 0.0 {
            (pos.x - self.limits.x.min) / self.limits.x.span()
        } else {
            0.5
        };
        let tx = if self.x_inverted { 1.0 - tx } else { tx };
        let ty = if self.limits.y.span() > 0.0 {
            (pos.y - self.limits.y.min) / self.limits.y.span()
        } else {
            0.5
        };
        ScreenPos {
            x: self.frame.min.x + (tx as f32) * self.frame.width(),
            y: self.frame.max.y - (ty as f32) * self.frame.height(),
        }
    }
}

impl CoordinateMapper for PlotTransform {
    fn screen_to_data(&self, pos: ScreenPos) -> DataPos {
        let width = self.frame.width().max(f32::EPSILON) as f64;
        let height = self.frame.height().max(f32::EPSILON) as f64;
        let tx = (pos.x - self.frame.min.x) as f64 / width;
        let tx = if self.x_inverted { 1.0 - tx } else { tx };
        let ty = (self.frame.max.y - pos.y) as f64 / height;
        DataPos {
            x: self.limits.x.min + tx * self.limits.x.span(),
            y: self.limits.y.min + ty * self.limits.y.span(),
        }
    }

    fn contains(&self, pos: ScreenPos) -> bool {
        self.frame.contains(pos)
    }
}
