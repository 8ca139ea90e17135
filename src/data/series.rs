use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Stable series handle, independent of legend position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SeriesId(pub u64);

impl std::fmt::Display for SeriesId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Which component of the complex samples is plotted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DisplayMode {
    #[default]
    Real,
    Imag,
}

impl DisplayMode {
    pub fn project(&self, value: Complex64) -> f64 {
        match self {
            DisplayMode::Real => value.re,
            DisplayMode::Imag => value.im,
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            DisplayMode::Real => DisplayMode::Imag,
            DisplayMode::Imag => DisplayMode::Real,
        }
    }
}

impl std::fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DisplayMode::Real => write!(f, "Real"),
            DisplayMode::Imag => write!(f, "Imag"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SeriesError {
    #[error("No series with id {0}")]
    NotFound(SeriesId),
    #[error("Scale must be a finite number, got {0}")]
    InvalidScale(f64),
    #[error("x-axis has {x} points but there are {y} samples")]
    LengthMismatch { x: usize, y: usize },
    #[error("x-axis of {0:?} is not strictly monotonic")]
    NonMonotonicAxis(String),
}

/// Bounding box of finite data points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl Extent {
    pub fn union(self, other: Extent) -> Extent {
        Extent {
            x_min: self.x_min.min(other.x_min),
            x_max: self.x_max.max(other.x_max),
            y_min: self.y_min.min(other.y_min),
            y_max: self.y_max.max(other.y_max),
        }
    }
}

/// One plotted line.
///
/// The raw complex samples never change; the plotted y-values are always
/// `scale * project(sample, display_mode)`.
#[derive(Debug, Clone)]
pub struct Series {
    id: SeriesId,
    x_axis: Vec<f64>,
    samples: Vec<Complex64>,
    scale: f64,
    display_mode: DisplayMode,
    visible: bool,
    label: String,
    color_index: usize,
}

impl Series {
    pub fn id(&self) -> SeriesId {
        self.id
    }

    pub fn x_axis(&self) -> &[f64] {
        &self.x_axis
    }

    pub fn samples(&self) -> &[Complex64] {
        &self.samples
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn display_mode(&self) -> DisplayMode {
        self.display_mode
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn color_index(&self) -> usize {
        self.color_index
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Displayed y-value of sample `i`
    pub fn y_at(&self, i: usize) -> Option<f64> {
        self.samples
            .get(i)
            .map(|c| self.scale * self.display_mode.project(*c))
    }

    /// Displayed y-values, recomputed from the raw samples
    pub fn display_y(&self) -> Vec<f64> {
        self.samples
            .iter()
            .map(|c| self.scale * self.display_mode.project(*c))
            .collect()
    }

    /// `[x, y]` pairs ready for plotting
    pub fn points(&self) -> Vec<[f64; 2]> {
        self.x_axis
            .iter()
            .zip(self.samples.iter())
            .map(|(x, c)| [*x, self.scale * self.display_mode.project(*c)])
            .collect()
    }

    pub fn is_ascending(&self) -> bool {
        self.x_axis.len() < 2 || self.x_axis[0] < self.x_axis[self.x_axis.len() - 1]
    }

    /// Extent of the finite displayed points, `None` if there are none
    pub fn extent(&self) -> Option<Extent> {
        let mut extent: Option<Extent> = None;
        for (x, c) in self.x_axis.iter().zip(self.samples.iter()) {
            let y = self.scale * self.display_mode.project(*c);
            if !x.is_finite() || !y.is_finite() {
                continue;
            }
            let point = Extent {
                x_min: *x,
                x_max: *x,
                y_min: y,
                y_max: y,
            };
            extent = Some(match extent {
                Some(e) => e.union(point),
                None => point,
            });
        }
        extent
    }
}

fn is_strictly_monotonic(x: &[f64]) -> bool {
    x.windows(2).all(|w| w[0] < w[1]) || x.windows(2).all(|w| w[0] > w[1])
}

/// Ordered series collection plus the current selection.
/// Order is drawing order and legend order.
#[derive(Debug, Default)]
pub struct SeriesStore {
    series: Vec<Series>,
    selected: Option<SeriesId>,
    next_id: u64,
    next_color: usize,
}

impl SeriesStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(
        &mut self,
        x_axis: Vec<f64>,
        samples: Vec<Complex64>,
        label: impl Into<String>,
    ) -> Result<SeriesId, SeriesError> {
        let label = label.into();
        if x_axis.len() != samples.len() {
            return Err(SeriesError::LengthMismatch {
                x: x_axis.len(),
                y: samples.len(),
            });
        }
        if !is_strictly_monotonic(&x_axis) {
            return Err(SeriesError::NonMonotonicAxis(label));
        }

        let id = SeriesId(self.next_id);
        self.next_id += 1;
        let color_index = self.next_color;
        self.next_color += 1;

        self.series.push(Series {
            id,
            x_axis,
            samples,
            scale: 1.0,
            display_mode: DisplayMode::Real,
            visible: true,
            label,
            color_index,
        });
        Ok(id)
    }

    pub fn remove(&mut self, id: SeriesId) -> Result<Series, SeriesError> {
        let index = self.index_of(id).ok_or(SeriesError::NotFound(id))?;
        if self.selected == Some(id) {
            self.selected = None;
        }
        Ok(self.series.remove(index))
    }

    /// Empty the store; the colour cycle starts over
    pub fn remove_all(&mut self) {
        self.series.clear();
        self.selected = None;
        self.next_color = 0;
    }

    /// Replace the scale factor
    pub fn set_scale(&mut self, id: SeriesId, factor: f64) -> Result<(), SeriesError> {
        if !factor.is_finite() {
            return Err(SeriesError::InvalidScale(factor));
        }
        self.get_mut(id)?.scale = factor;
        Ok(())
    }

    /// Multiply the current scale factor
    pub fn multiply_scale(&mut self, id: SeriesId, factor: f64) -> Result<f64, SeriesError> {
        let series = self.get_mut(id)?;
        let scale = series.scale * factor;
        if !scale.is_finite() {
            return Err(SeriesError::InvalidScale(scale));
        }
        series.scale = scale;
        Ok(scale)
    }

    pub fn set_display_mode(&mut self, id: SeriesId, mode: DisplayMode) -> Result<(), SeriesError> {
        self.get_mut(id)?.display_mode = mode;
        Ok(())
    }

    pub fn set_visible(&mut self, id: SeriesId, visible: bool) -> Result<(), SeriesError> {
        self.get_mut(id)?.visible = visible;
        Ok(())
    }

    /// Select a series, or clear the selection with `None`
    pub fn select(&mut self, id: Option<SeriesId>) -> Result<(), SeriesError> {
        if let Some(id) = id {
            if self.index_of(id).is_none() {
                return Err(SeriesError::NotFound(id));
            }
        }
        self.selected = id;
        Ok(())
    }

    pub fn get(&self, id: SeriesId) -> Option<&Series> {
        self.series.iter().find(|s| s.id == id)
    }

    fn get_mut(&mut self, id: SeriesId) -> Result<&mut Series, SeriesError> {
        self.series
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(SeriesError::NotFound(id))
    }

    /// Every series in display order, hidden ones included
    pub fn list(&self) -> &[Series] {
        &self.series
    }

    pub fn selected(&self) -> Option<SeriesId> {
        self.selected
    }

    pub fn selected_series(&self) -> Option<&Series> {
        self.selected.and_then(|id| self.get(id))
    }

    pub fn index_of(&self, id: SeriesId) -> Option<usize> {
        self.series.iter().position(|s| s.id == id)
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Union of the extents of visible series
    pub fn visible_extent(&self) -> Option<Extent> {
        self.series
            .iter()
            .filter(|s| s.visible)
            .filter_map(|s| s.extent())
            .reduce(Extent::union)
    }
}
