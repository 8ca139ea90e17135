/// Interactive chart core
///
/// [`ChartSurface`] owns the series, the view limits, the legend and the
/// optional crosshair. A host feeds it [`ChartEvent`]s together with a
/// [`CoordinateMapper`] for the current frame, shows the menus it asks for
/// and paints whatever [`ChartSurface::render`] returns. Nothing in here
/// knows about a GUI toolkit.

pub mod crosshair;
pub mod draw;
pub mod event;
pub mod legend;
pub mod transform;
pub mod viewport;

use num_complex::Complex64;
use thiserror::Error;

use crate::config::ChartConfig;
use crate::data::fidspe::{DataKind, FidSpeData};
use crate::data::series::{DisplayMode, SeriesError, SeriesId, SeriesStore};
use crosshair::{CrosshairCursor, SnapTrace};
use draw::{DrawCommand, DrawList, GuideRole, TextAnchor};
use event::{ChartEvent, EventResponse, HostRequest, PointerButton};
use legend::{LegendController, LegendMenuAction, PickOutcome};
use transform::CoordinateMapper;
use viewport::{Gesture, ViewportController};

/// Where the crosshair readout sits, as a fraction of the plot area
const READOUT_ANCHOR: (f32, f32) = (0.02, 0.95);

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChartError {
    #[error(transparent)]
    Series(#[from] SeriesError),
    #[error("Can't display {incoming} and {loaded} together, clear the chart first")]
    IncompatibleData { loaded: DataKind, incoming: DataKind },
}

pub struct ChartSurface {
    config: ChartConfig,
    store: SeriesStore,
    viewport: ViewportController,
    legend: LegendController,
    crosshair: Option<CrosshairCursor>,
    /// Set by a legend pick; swallows the button press that follows it
    pick_lock: bool,
    /// Kind of file data on the chart, `None` when empty or synthetic only
    data_kind: Option<DataKind>,
}

impl ChartSurface {
    pub fn new(config: ChartConfig) -> Self {
        Self {
            viewport: ViewportController::new(&config),
            legend: LegendController::new(&config),
            store: SeriesStore::new(),
            crosshair: None,
            pick_lock: false,
            data_kind: None,
            config,
        }
    }

    pub fn store(&self) -> &SeriesStore {
        &self.store
    }

    pub fn viewport(&self) -> &ViewportController {
        &self.viewport
    }

    pub fn crosshair(&self) -> Option<&CrosshairCursor> {
        self.crosshair.as_ref()
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    pub fn data_kind(&self) -> Option<DataKind> {
        self.data_kind
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn x_axis_label(&self) -> &'static str {
        self.data_kind.map(|k| k.axis_label()).unwrap_or("")
    }

    // ---- series management ----

    pub fn add_series(
        &mut self,
        x_axis: Vec<f64>,
        samples: Vec<Complex64>,
        label: impl Into<String>,
    ) -> Result<SeriesId, ChartError> {
        let first = self.store.is_empty();
        let id = self.store.add(x_axis, samples, label)?;
        self.relimit(first);
        Ok(id)
    }

    /// Add parsed FID/SPE data. FID and SPE never share a chart.
    pub fn add_fidspe(
        &mut self,
        data: &FidSpeData,
        label: impl Into<String>,
    ) -> Result<SeriesId, ChartError> {
        let incoming = data.kind();
        if let Some(loaded) = self.data_kind {
            if loaded != incoming {
                return Err(ChartError::IncompatibleData { loaded, incoming });
            }
        }
        let id = self.add_series(data.x_axis.clone(), data.samples.clone(), label)?;
        self.data_kind = Some(incoming);
        Ok(id)
    }

    pub fn remove_series(&mut self, id: SeriesId) -> Result<(), ChartError> {
        let removed = self.store.remove(id)?;
        log::info!("Removed series {} ({})", removed.label(), id);
        self.relimit(false);
        self.refresh_snap();
        Ok(())
    }

    /// Remove the selected series, if any
    pub fn remove_selected(&mut self) -> Result<Option<SeriesId>, ChartError> {
        match self.store.selected() {
            Some(id) => {
                self.remove_series(id)?;
                Ok(Some(id))
            }
            None => Ok(None),
        }
    }

    pub fn remove_all(&mut self) {
        let count = self.store.len();
        self.store.remove_all();
        self.relimit(false);
        self.refresh_snap();
        log::info!("Removed all {} series", count);
    }

    pub fn set_series_scale(&mut self, id: SeriesId, factor: f64) -> Result<(), ChartError> {
        self.store.set_scale(id, factor)?;
        self.refresh_snap();
        Ok(())
    }

    pub fn set_display_mode(&mut self, id: SeriesId, mode: DisplayMode) -> Result<(), ChartError> {
        self.store.set_display_mode(id, mode)?;
        self.refresh_snap();
        Ok(())
    }

    pub fn set_visible(&mut self, id: SeriesId, visible: bool) -> Result<(), ChartError> {
        self.store.set_visible(id, visible)?;
        self.relimit(false);
        self.refresh_snap();
        Ok(())
    }

    pub fn select(&mut self, id: Option<SeriesId>) -> Result<(), ChartError> {
        self.store.select(id)?;
        self.refresh_snap();
        Ok(())
    }

    /// Apply a choice from the legend context menu
    pub fn apply_menu_action(
        &mut self,
        id: SeriesId,
        action: LegendMenuAction,
    ) -> Result<(), ChartError> {
        match action {
            LegendMenuAction::Delete => self.remove_series(id),
            LegendMenuAction::SetScale(factor) => self.set_series_scale(id, factor),
            LegendMenuAction::SetDisplayMode(mode) => self.set_display_mode(id, mode),
        }
    }

    // ---- view ----

    pub fn set_x_inverted(&mut self, inverted: bool) {
        self.viewport.set_x_inverted(inverted);
        log::info!("x-axis reversed: {}", inverted);
    }

    pub fn reset_view(&mut self) {
        self.viewport.reset_to_default();
    }

    pub fn activate_crosshair(&mut self) {
        if self.crosshair.is_none() {
            self.crosshair = Some(CrosshairCursor::new(self.snap_trace()));
            log::info!("Crosshair on");
        }
    }

    pub fn deactivate_crosshair(&mut self) {
        if self.crosshair.take().is_some() {
            log::info!("Crosshair off");
        }
    }

    /// Returns whether the crosshair is now active
    pub fn toggle_crosshair(&mut self) -> bool {
        if self.crosshair.is_some() {
            self.deactivate_crosshair();
            false
        } else {
            self.activate_crosshair();
            true
        }
    }

    fn relimit(&mut self, first: bool) {
        if self.store.is_empty() {
            self.viewport.reset_empty();
            self.data_kind = None;
        } else {
            self.viewport.autoscale(self.store.visible_extent(), first);
        }
    }

    /// Snap target: the selected series while it is visible
    fn snap_trace(&self) -> Option<SnapTrace> {
        self.store
            .selected_series()
            .filter(|s| s.visible())
            .and_then(SnapTrace::from_series)
    }

    fn refresh_snap(&mut self) {
        let trace = self.snap_trace();
        if let Some(crosshair) = self.crosshair.as_mut() {
            crosshair.set_trace(trace);
        }
    }

    // ---- events ----

    pub fn handle_event(
        &mut self,
        event: &ChartEvent,
        mapper: &dyn CoordinateMapper,
    ) -> Result<EventResponse, ChartError> {
        if let ChartEvent::Pick {
            target,
            button,
            pos,
        } = event
        {
            self.pick_lock = true;
            let outcome = self.legend.handle_pick(&mut self.store, *target, *button)?;
            return Ok(match outcome {
                PickOutcome::VisibilityChanged { id, visible } => {
                    log::debug!("Series {} visible: {}", id, visible);
                    self.relimit(false);
                    self.refresh_snap();
                    EventResponse::redraw()
                }
                PickOutcome::SelectionChanged(selection) => {
                    log::debug!("Selection: {:?}", selection);
                    self.refresh_snap();
                    EventResponse::redraw()
                }
                PickOutcome::OpenMenu(id) => {
                    EventResponse::request(HostRequest::LegendMenu { id, pos: *pos })
                }
                PickOutcome::Ignored => EventResponse::none(),
            });
        }

        let locked = std::mem::take(&mut self.pick_lock);

        match event {
            ChartEvent::Pick { .. } => Ok(EventResponse::none()),
            ChartEvent::PointerDown {
                pos,
                button,
                double_click,
                ..
            } => {
                if locked {
                    return Ok(EventResponse::none());
                }
                let inside = mapper.contains(*pos);
                let data = mapper.screen_to_data(*pos);
                let mut response = EventResponse::none();
                match button {
                    PointerButton::Primary if inside && !double_click => {
                        self.viewport.begin_zoom(data);
                    }
                    PointerButton::Primary if inside => {
                        if let Some(crosshair) = self.crosshair.as_mut() {
                            crosshair.toggle_measurement(data);
                            response.redraw = true;
                        }
                    }
                    PointerButton::Secondary if !inside => {
                        response.request = Some(HostRequest::FigureMenu(*pos));
                    }
                    PointerButton::Secondary if *double_click => {
                        self.viewport.reset_to_default();
                        response.redraw = true;
                    }
                    PointerButton::Secondary => self.viewport.begin_pan(data),
                    _ => {}
                }
                Ok(response)
            }
            ChartEvent::PointerMove { pos } => {
                let inside = mapper.contains(*pos);
                let data = mapper.screen_to_data(*pos);
                let mut redraw = self.viewport.on_move(data, inside);
                if let Some(crosshair) = self.crosshair.as_mut() {
                    redraw |= crosshair.on_move(data, inside);
                }
                Ok(EventResponse {
                    redraw,
                    request: None,
                })
            }
            ChartEvent::PointerUp { button, .. } => {
                let redraw = match button {
                    PointerButton::Primary => {
                        let zooming = matches!(self.viewport.gesture(), Gesture::ZoomBox { .. });
                        self.viewport.finish_zoom();
                        zooming
                    }
                    PointerButton::Secondary => self.viewport.end_pan(),
                    PointerButton::Middle => false,
                };
                Ok(EventResponse {
                    redraw,
                    request: None,
                })
            }
            ChartEvent::Wheel {
                pos,
                steps,
                modifiers,
            } => {
                if !mapper.contains(*pos) {
                    return Ok(EventResponse::none());
                }
                let data = mapper.screen_to_data(*pos);
                let factor = self.config.wheel_base.powf(*steps);
                if modifiers.only(self.config.x_scale_modifier) {
                    self.viewport.scale_x_about(data.x, factor);
                } else if let Some(id) = self.store.selected() {
                    self.store.multiply_scale(id, factor)?;
                    self.refresh_snap();
                } else {
                    self.viewport.scale_y_about(data.y, factor);
                }
                Ok(EventResponse::redraw())
            }
            ChartEvent::PointerLeft => {
                let redraw = self.crosshair.as_mut().map(|c| c.hide()).unwrap_or(false);
                Ok(EventResponse {
                    redraw,
                    request: None,
                })
            }
        }
    }

    // ---- output ----

    pub fn render(&self) -> DrawList {
        let mut commands: Vec<DrawCommand> = self
            .store
            .list()
            .iter()
            .filter(|s| s.visible())
            .map(|s| DrawCommand::SeriesLine {
                id: s.id(),
                points: s.points(),
                color_index: s.color_index(),
            })
            .collect();

        if let Gesture::ZoomBox {
            anchor,
            current: Some(corner),
        } = self.viewport.gesture()
        {
            commands.push(DrawCommand::ZoomBox {
                a: anchor,
                b: corner,
            });
        }

        if let Some(crosshair) = &self.crosshair {
            let precision = self.config.readout_precision;
            if crosshair.visible() {
                if let Some(p) = crosshair.position() {
                    commands.push(DrawCommand::HLine {
                        y: p.y,
                        role: GuideRole::Crosshair,
                    });
                    commands.push(DrawCommand::VLine {
                        x: p.x,
                        role: GuideRole::Crosshair,
                    });
                }
                if let Some(text) = crosshair.readout(precision) {
                    commands.push(DrawCommand::Text {
                        anchor: TextAnchor::AxesFraction {
                            x: READOUT_ANCHOR.0,
                            y: READOUT_ANCHOR.1,
                        },
                        text,
                        boxed: true,
                    });
                }
            }
            if let Some(origin) = crosshair.origin() {
                commands.push(DrawCommand::HLine {
                    y: origin.y,
                    role: GuideRole::Measurement,
                });
                commands.push(DrawCommand::VLine {
                    x: origin.x,
                    role: GuideRole::Measurement,
                });
                if let Some(text) = crosshair.delta_readout(precision) {
                    commands.push(DrawCommand::Text {
                        anchor: TextAnchor::Data(crosshair.position().unwrap_or(origin)),
                        text,
                        boxed: false,
                    });
                }
            }
        }

        DrawList {
            limits: self.viewport.current(),
            x_inverted: self.viewport.x_inverted(),
            x_label: self.x_axis_label(),
            commands,
            legend: self.legend.entries(&self.store),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::crosshair::CrosshairMode;
    use crate::chart::event::Modifiers;
    use crate::chart::legend::PickTarget;
    use crate::chart::transform::{PlotTransform, ScreenPos, ScreenRect};
    use crate::chart::viewport::{AxisRange, Limits};
    use crate::data::fidspe::parse_str;

    fn surface() -> ChartSurface {
        ChartSurface::new(ChartConfig::default())
    }

    fn mapper(chart: &ChartSurface) -> PlotTransform {
        PlotTransform::new(
            ScreenRect::from_min_max(ScreenPos::new(0.0, 0.0), ScreenPos::new(100.0, 100.0)),
            chart.viewport().current(),
            chart.viewport().x_inverted(),
        )
    }

    fn send(chart: &mut ChartSurface, event: ChartEvent) -> EventResponse {
        let m = mapper(chart);
        chart.handle_event(&event, &m).unwrap()
    }

    fn line(x0: f64, x1: f64, n: usize) -> (Vec<f64>, Vec<Complex64>) {
        let x: Vec<f64> = (0..n)
            .map(|i| x0 + (x1 - x0) * i as f64 / (n - 1) as f64)
            .collect();
        let y = x.iter().map(|v| Complex64::new(*v, -*v)).collect();
        (x, y)
    }

    fn down(x: f32, y: f32, button: PointerButton, double_click: bool) -> ChartEvent {
        ChartEvent::PointerDown {
            pos: ScreenPos::new(x, y),
            button,
            double_click,
            modifiers: Modifiers::NONE,
        }
    }

    fn mv(x: f32, y: f32) -> ChartEvent {
        ChartEvent::PointerMove {
            pos: ScreenPos::new(x, y),
        }
    }

    fn up(x: f32, y: f32, button: PointerButton) -> ChartEvent {
        ChartEvent::PointerUp {
            pos: ScreenPos::new(x, y),
            button,
        }
    }

    fn wheel(steps: f64, shift: bool) -> ChartEvent {
        ChartEvent::Wheel {
            pos: ScreenPos::new(50.0, 50.0),
            steps,
            modifiers: Modifiers {
                shift,
                ..Modifiers::NONE
            },
        }
    }

    #[test]
    fn test_hidden_series_excluded_from_default_limits() {
        let mut chart = surface();
        let (x, y) = line(0.0, 10.0, 11);
        chart.add_series(x, y, "A").unwrap();
        let (x, y) = line(-5.0, 20.0, 26);
        let b = chart.add_series(x, y, "B").unwrap();
        chart.set_visible(b, false).unwrap();
        assert_eq!(chart.viewport().default_limits().x, AxisRange::new(0.0, 10.0));

        chart.set_visible(b, true).unwrap();
        assert_eq!(chart.viewport().default_limits().x, AxisRange::new(-5.0, 20.0));
    }

    #[test]
    fn test_first_add_adopts_default_later_adds_keep_view() {
        let mut chart = surface();
        let (x, y) = line(0.0, 10.0, 11);
        chart.add_series(x, y, "A").unwrap();
        assert_eq!(chart.viewport().current(), chart.viewport().default_limits());

        send(&mut chart, wheel(1.0, true));
        let zoomed = chart.viewport().current();
        let (x, y) = line(-5.0, 20.0, 26);
        chart.add_series(x, y, "B").unwrap();
        assert_eq!(chart.viewport().current(), zoomed);
        assert_ne!(chart.viewport().default_limits(), zoomed);
    }

    #[test]
    fn test_empty_chart_resets_limits() {
        let mut chart = surface();
        chart.set_x_inverted(true);
        let (x, y) = line(0.0, 10.0, 11);
        let a = chart.add_series(x, y, "A").unwrap();
        chart.remove_series(a).unwrap();
        assert_eq!(chart.viewport().current(), Limits::EMPTY);
        assert_eq!(chart.viewport().current_x_pair(), (1.0, 0.0));
        assert!(chart.render().legend.is_none());
    }

    #[test]
    fn test_failed_parse_leaves_chart_untouched() {
        let mut chart = surface();
        let (x, y) = line(0.0, 10.0, 11);
        chart.add_series(x, y, "A").unwrap();
        let before = chart.viewport().current();
        let parsed = parse_str("SIMP\nNP=5\nSW=100\nTYPE=SPE\nDATA\n1 0\n2 0\n3 0\n");
        assert!(parsed.is_err());
        assert_eq!(chart.store().len(), 1);
        assert_eq!(chart.viewport().current(), before);
    }

    #[test]
    fn test_fid_and_spe_do_not_mix() {
        let mut chart = surface();
        let spe = parse_str("SIMP\nNP=3\nSW=100\nTYPE=SPE\nDATA\n1 0\n2 0\n3 0\n").unwrap();
        let fid = parse_str("SIMP\nNP=3\nSW=1000\nTYPE=FID\nDATA\n1 0\n2 0\n3 0\n").unwrap();
        chart.add_fidspe(&spe, "a.spe").unwrap();
        assert_eq!(chart.x_axis_label(), "frequency [Hz]");
        let err = chart.add_fidspe(&fid, "b.fid").unwrap_err();
        assert_eq!(
            err,
            ChartError::IncompatibleData {
                loaded: DataKind::Spe,
                incoming: DataKind::Fid
            }
        );
        assert_eq!(chart.store().len(), 1);

        chart.remove_all();
        assert_eq!(chart.x_axis_label(), "");
        chart.add_fidspe(&fid, "b.fid").unwrap();
        assert_eq!(chart.x_axis_label(), "time [ms]");
    }

    #[test]
    fn test_zoom_box_through_events() {
        let mut chart = surface();
        let (x, y) = line(0.0, 10.0, 11);
        chart.add_series(x, y, "A").unwrap();
        let m = mapper(&chart);
        let a = m.screen_to_data(ScreenPos::new(20.0, 20.0));
        let b = m.screen_to_data(ScreenPos::new(60.0, 70.0));

        send(&mut chart, down(20.0, 20.0, PointerButton::Primary, false));
        assert!(send(&mut chart, mv(60.0, 70.0)).redraw);
        assert!(chart
            .render()
            .commands
            .iter()
            .any(|c| matches!(c, DrawCommand::ZoomBox { .. })));
        assert!(send(&mut chart, up(60.0, 70.0, PointerButton::Primary)).redraw);

        let limits = chart.viewport().current();
        assert_eq!(limits.x, AxisRange::new(a.x, b.x));
        assert_eq!(limits.y, AxisRange::new(a.y, b.y));
    }

    #[test]
    fn test_pick_lock_cancels_next_press() {
        let mut chart = surface();
        let (x, y) = line(0.0, 10.0, 11);
        let a = chart.add_series(x, y, "A").unwrap();
        send(
            &mut chart,
            ChartEvent::Pick {
                target: PickTarget::Label(a),
                button: PointerButton::Primary,
                pos: ScreenPos::new(90.0, 10.0),
            },
        );
        assert_eq!(chart.store().selected(), Some(a));
        send(&mut chart, down(90.0, 10.0, PointerButton::Primary, false));
        assert_eq!(chart.viewport().gesture(), Gesture::Idle);

        // lock is gone after one event
        send(&mut chart, down(90.0, 10.0, PointerButton::Primary, false));
        assert!(matches!(chart.viewport().gesture(), Gesture::ZoomBox { .. }));
    }

    #[test]
    fn test_legend_right_click_requests_menu() {
        let mut chart = surface();
        let (x, y) = line(0.0, 10.0, 11);
        let a = chart.add_series(x, y, "A").unwrap();
        let response = send(
            &mut chart,
            ChartEvent::Pick {
                target: PickTarget::Label(a),
                button: PointerButton::Secondary,
                pos: ScreenPos::new(90.0, 10.0),
            },
        );
        assert!(matches!(
            response.request,
            Some(HostRequest::LegendMenu { id, .. }) if id == a
        ));
    }

    #[test]
    fn test_secondary_click_outside_requests_figure_menu() {
        let mut chart = surface();
        let response = send(&mut chart, down(150.0, 50.0, PointerButton::Secondary, false));
        assert_eq!(
            response.request,
            Some(HostRequest::FigureMenu(ScreenPos::new(150.0, 50.0)))
        );
        assert_eq!(chart.viewport().gesture(), Gesture::Idle);
    }

    #[test]
    fn test_pan_and_double_click_reset() {
        let mut chart = surface();
        let (x, y) = line(0.0, 10.0, 11);
        chart.add_series(x, y, "A").unwrap();
        let home = chart.viewport().current();

        send(&mut chart, down(50.0, 50.0, PointerButton::Secondary, false));
        send(&mut chart, mv(40.0, 50.0));
        send(&mut chart, up(40.0, 50.0, PointerButton::Secondary));
        let panned = chart.viewport().current();
        assert!((panned.x.min - (home.x.min + 1.0)).abs() < 1e-6);
        assert!((panned.y.min - home.y.min).abs() < 1e-6);

        send(&mut chart, down(50.0, 50.0, PointerButton::Secondary, true));
        assert_eq!(chart.viewport().current(), home);
    }

    #[test]
    fn test_wheel_paths() {
        let mut chart = surface();
        let (x, y) = line(0.0, 10.0, 11);
        let a = chart.add_series(x, y, "A").unwrap();
        let home = chart.viewport().current();

        // no selection: y view
        send(&mut chart, wheel(1.0, false));
        let after = chart.viewport().current();
        assert_eq!(after.x, home.x);
        assert!((after.y.span() - 0.9 * home.y.span()).abs() < 1e-9);

        // modifier: x view
        send(&mut chart, wheel(-1.0, true));
        let after_x = chart.viewport().current();
        assert!((after_x.x.span() - home.x.span() / 0.9).abs() < 1e-9);

        // selection: series scale, view untouched
        chart.select(Some(a)).unwrap();
        send(&mut chart, wheel(2.0, false));
        assert!((chart.store().get(a).unwrap().scale() - 0.81).abs() < 1e-12);
        assert_eq!(chart.viewport().current(), after_x);

        // outside the plot: ignored
        let m = mapper(&chart);
        let response = chart
            .handle_event(
                &ChartEvent::Wheel {
                    pos: ScreenPos::new(-10.0, 50.0),
                    steps: 1.0,
                    modifiers: Modifiers::NONE,
                },
                &m,
            )
            .unwrap();
        assert!(!response.redraw);
        assert!((chart.store().get(a).unwrap().scale() - 0.81).abs() < 1e-12);
    }

    #[test]
    fn test_x_scaling_needs_the_modifier_alone() {
        let mut chart = surface();
        let (x, y) = line(0.0, 10.0, 11);
        chart.add_series(x, y, "A").unwrap();
        let home = chart.viewport().current();

        send(
            &mut chart,
            ChartEvent::Wheel {
                pos: ScreenPos::new(50.0, 50.0),
                steps: 1.0,
                modifiers: Modifiers {
                    shift: true,
                    ctrl: true,
                    alt: false,
                },
            },
        );
        let after = chart.viewport().current();
        assert_eq!(after.x, home.x);
        assert!((after.y.span() - 0.9 * home.y.span()).abs() < 1e-9);
    }

    #[test]
    fn test_zoom_box_with_reversed_x() {
        let mut chart = surface();
        chart.set_x_inverted(true);
        let (x, y) = line(0.0, 10.0, 11);
        chart.add_series(x, y, "A").unwrap();
        let anchor = mapper(&chart).screen_to_data(ScreenPos::new(20.0, 20.0));
        assert!((anchor.x - 8.0).abs() < 1e-6);

        send(&mut chart, down(20.0, 20.0, PointerButton::Primary, false));
        // past the left edge: with x reversed that is beyond the high end
        send(&mut chart, mv(-30.0, 80.0));
        let grown = chart.viewport().current();
        assert!((grown.x.max - 13.0).abs() < 1e-6);
        assert_eq!(grown.x.min, 0.0);

        let corner = mapper(&chart).screen_to_data(ScreenPos::new(60.0, 70.0));
        send(&mut chart, mv(60.0, 70.0));
        assert!(send(&mut chart, up(60.0, 70.0, PointerButton::Primary)).redraw);

        let limits = chart.viewport().current();
        assert_eq!(limits.x, AxisRange::new(anchor.x, corner.x));
        assert_eq!(limits.y, AxisRange::new(anchor.y, corner.y));
        let (left, right) = chart.viewport().current_x_pair();
        assert!(left > right);
        assert_eq!((left, right), (anchor.x.max(corner.x), anchor.x.min(corner.x)));
    }

    #[test]
    fn test_crosshair_snaps_to_visible_selection() {
        let mut chart = surface();
        let (x, y) = line(0.0, 10.0, 11);
        let a = chart.add_series(x, y, "A").unwrap();
        chart.select(Some(a)).unwrap();
        chart.activate_crosshair();
        assert_eq!(chart.crosshair().unwrap().mode(), CrosshairMode::Snapped);

        chart.set_visible(a, false).unwrap();
        assert_eq!(chart.crosshair().unwrap().mode(), CrosshairMode::Free);
        chart.set_visible(a, true).unwrap();

        let m = mapper(&chart);
        let target = m.data_to_screen(crate::chart::transform::DataPos::new(3.2, 0.0));
        send(&mut chart, mv(target.x, target.y));
        let cursor = chart.crosshair().unwrap();
        assert_eq!(cursor.last_index(), Some(3));
        let readout = chart.render().commands.into_iter().find_map(|c| match c {
            DrawCommand::Text {
                text,
                boxed: true,
                ..
            } => Some(text),
            _ => None,
        });
        assert_eq!(readout.as_deref(), Some("x=3.00, y=3.00"));

        chart.remove_selected().unwrap();
        assert_eq!(chart.store().selected(), None);
        assert_eq!(chart.crosshair().unwrap().mode(), CrosshairMode::Free);
        assert!(!chart.toggle_crosshair());
        assert!(chart.crosshair().is_none());
    }

    #[test]
    fn test_measurement_by_double_click() {
        let mut chart = surface();
        let (x, y) = line(0.0, 10.0, 11);
        chart.add_series(x, y, "A").unwrap();
        chart.activate_crosshair();
        send(&mut chart, mv(50.0, 50.0));
        send(&mut chart, down(50.0, 50.0, PointerButton::Primary, true));
        assert!(chart.crosshair().unwrap().origin().is_some());
        assert_eq!(chart.viewport().gesture(), Gesture::Idle);
        let guides = chart
            .render()
            .commands
            .iter()
            .filter(|c| {
                matches!(
                    c,
                    DrawCommand::HLine {
                        role: GuideRole::Measurement,
                        ..
                    } | DrawCommand::VLine {
                        role: GuideRole::Measurement,
                        ..
                    }
                )
            })
            .count();
        assert_eq!(guides, 2);

        send(&mut chart, down(50.0, 50.0, PointerButton::Primary, true));
        assert!(chart.crosshair().unwrap().origin().is_none());
    }

    #[test]
    fn test_menu_actions() {
        let mut chart = surface();
        let (x, y) = line(0.0, 10.0, 11);
        let a = chart.add_series(x, y, "A").unwrap();
        chart
            .apply_menu_action(a, LegendMenuAction::SetScale(2.0))
            .unwrap();
        chart
            .apply_menu_action(a, LegendMenuAction::SetDisplayMode(DisplayMode::Imag))
            .unwrap();
        assert_eq!(chart.store().get(a).unwrap().y_at(4), Some(-8.0));
        chart.apply_menu_action(a, LegendMenuAction::Delete).unwrap();
        assert!(chart.is_empty());
        assert!(matches!(
            chart.apply_menu_action(a, LegendMenuAction::Delete),
            Err(ChartError::Series(SeriesError::NotFound(_)))
        ));
    }

    #[test]
    fn test_render_skips_hidden_lines() {
        let mut chart = surface();
        let (x, y) = line(0.0, 10.0, 11);
        let a = chart.add_series(x.clone(), y.clone(), "A").unwrap();
        chart.add_series(x, y, "B").unwrap();
        chart.set_visible(a, false).unwrap();
        let list = chart.render();
        assert_eq!(list.series_lines().count(), 1);
        let legend = list.legend.unwrap();
        assert_eq!(legend.len(), 2);
        assert!(legend[0].dimmed);
    }
}
