/// Chart canvas: hosts a [`ChartSurface`] inside an egui_plot widget
///
/// egui_plot is used for painting only. Its own navigation is switched off
/// and the plot bounds are set from the chart core every frame. Raw pointer
/// and wheel events are translated into [`ChartEvent`]s. The legend is
/// painted here rather than by egui_plot so that its entries can be
/// hit-tested into [`PickTarget`]s.
///
/// Reversed x is drawn by negating plot-space x and flipping the sign back
/// in the tick labels.

use egui_plot::{HLine, Line, LineStyle, Plot, PlotBounds, PlotPoint, PlotPoints, PlotResponse, PlotUi, Text, VLine};

use crate::chart::draw::{DrawCommand, DrawList, GuideRole, TextAnchor};
use crate::chart::event::{ChartEvent, HostRequest, Modifiers, PointerButton};
use crate::chart::legend::PickTarget;
use crate::chart::transform::{PlotTransform, ScreenPos, ScreenRect};
use crate::chart::{ChartError, ChartSurface};
use crate::data::series::SeriesId;
use crate::gui::theme::ThemeColors;

const DOUBLE_CLICK_SECONDS: f64 = 0.3;
const DOUBLE_CLICK_DISTANCE: f32 = 6.0;
/// Scroll distance egui reports for one wheel notch
const POINTS_PER_WHEEL_STEP: f32 = 50.0;

pub const CHART_HELP: &str = "\
Zoom: drag with the left button to draw a box. Dragging past the plot edge \
enlarges the view.
Pan: drag with the right button.
Reset view: double-click with the right button inside the plot.
Wheel: scales the y-axis around the pointer, or the selected line when one is \
selected. Hold Shift to scale the x-axis instead.

Legend:
  click a line sample to hide or show that line;
  click a label to select or deselect that line (marked with *);
  right-click a label to delete, rescale or switch Real/Imag.

Crosshair (Ctrl+Q or right-click outside the plot):
  follows the pointer, or snaps to the samples of the selected line;
  double-click inside the plot to set a measuring origin, again to clear it.

Ctrl+D deletes the selected line, Ctrl+Shift+D deletes all lines.";

/// What the host should do after the canvas ran
#[derive(Debug, Clone, PartialEq)]
pub enum CanvasAction {
    ExportFigure,
    EditFigure,
    ToggleCrosshair,
    DeleteSeries(SeriesId),
    PromptScale(SeriesId),
    PromptDisplayMode(SeriesId),
    Failed(ChartError),
}

#[derive(Debug, Clone, PartialEq)]
enum OpenMenu {
    Figure(egui::Pos2),
    Legend {
        id: SeriesId,
        label: String,
        pos: egui::Pos2,
    },
}

/// Host-side state of the canvas between frames
#[derive(Debug, Default)]
pub struct ChartCanvasState {
    legend_hits: Vec<(egui::Rect, PickTarget)>,
    last_press: Option<(PointerButton, f64, egui::Pos2)>,
    menu: Option<OpenMenu>,
    /// Menu opened this frame; the press that opened it must not close it
    menu_fresh: bool,
}

impl ChartCanvasState {
    /// Record a press and report whether it completes a double-click
    fn register_press(&mut self, button: PointerButton, pos: egui::Pos2, time: f64) -> bool {
        let double = matches!(
            self.last_press,
            Some((b, t, p)) if b == button
                && time - t <= DOUBLE_CLICK_SECONDS
                && p.distance(pos) <= DOUBLE_CLICK_DISTANCE
        );
        self.last_press = if double { None } else { Some((button, time, pos)) };
        double
    }

    fn hit_legend(&self, pos: egui::Pos2) -> Option<PickTarget> {
        self.legend_hits
            .iter()
            .find(|(rect, _)| rect.contains(pos))
            .map(|(_, target)| *target)
    }

    fn open(&mut self, request: HostRequest, chart: &ChartSurface) {
        self.menu = Some(match request {
            HostRequest::FigureMenu(pos) => OpenMenu::Figure(to_pos2(pos)),
            HostRequest::LegendMenu { id, pos } => OpenMenu::Legend {
                id,
                label: chart
                    .store()
                    .get(id)
                    .map(|s| s.label().to_string())
                    .unwrap_or_default(),
                pos: to_pos2(pos),
            },
        });
        self.menu_fresh = true;
    }
}

/// Draw the chart, feed this frame's input to it and show its menus
pub fn show_chart(
    ui: &mut egui::Ui,
    chart: &mut ChartSurface,
    state: &mut ChartCanvasState,
    colors: &ThemeColors,
    line_width: f32,
) -> Vec<CanvasAction> {
    let list = chart.render();
    // the plot fills the available space; its response only covers the frame
    let available = ui.available_rect_before_wrap();
    let plot_resp = draw_plot(ui, &list, colors, line_width);
    let frame = *plot_resp.transform.frame();
    let canvas_rect = available.union(plot_resp.response.rect);

    paint_axes_text(ui, frame, &list, colors);
    state.legend_hits = paint_legend(ui, frame, &list, colors, line_width);

    let mut actions = Vec::new();
    for event in collect_events(ui, state, canvas_rect) {
        // limits change while panning, so map with the current ones
        let mapper = PlotTransform::new(
            to_screen_rect(frame),
            chart.viewport().current(),
            chart.viewport().x_inverted(),
        );
        match chart.handle_event(&event, &mapper) {
            Ok(response) => {
                if response.redraw {
                    ui.ctx().request_repaint();
                }
                if let Some(request) = response.request {
                    state.open(request, chart);
                }
            }
            Err(e) => actions.push(CanvasAction::Failed(e)),
        }
    }

    if let Some(action) = show_menu(ui.ctx(), state) {
        actions.push(action);
    }
    actions
}

fn draw_plot(
    ui: &mut egui::Ui,
    list: &DrawList,
    colors: &ThemeColors,
    line_width: f32,
) -> PlotResponse<()> {
    let inverted = list.x_inverted;
    let flip = move |x: f64| if inverted { -x } else { x };
    let limits = list.limits;
    let (x_min, x_max) = if inverted {
        (-limits.x.max, -limits.x.min)
    } else {
        (limits.x.min, limits.x.max)
    };

    let plot = Plot::new("simview_chart")
        .x_axis_label(list.x_label)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .allow_double_click_reset(false)
        .show_x(false)
        .show_y(false)
        .show_grid(false)
        .x_axis_formatter(move |mark, _range| tick_label(flip(mark.value), mark.step_size))
        .y_axis_formatter(|mark, _range| tick_label(mark.value, mark.step_size));

    plot.show(ui, |plot_ui: &mut PlotUi| {
        plot_ui.set_plot_bounds(PlotBounds::from_min_max(
            [x_min, limits.y.min],
            [x_max, limits.y.max],
        ));

        for command in &list.commands {
            match command {
                DrawCommand::SeriesLine {
                    points,
                    color_index,
                    ..
                } => {
                    let pts: PlotPoints = points.iter().map(|p| [flip(p[0]), p[1]]).collect();
                    plot_ui.line(
                        Line::new(pts)
                            .color(colors.series_color(*color_index))
                            .width(line_width),
                    );
                }
                DrawCommand::ZoomBox { a, b } => {
                    let (ax, bx) = (flip(a.x), flip(b.x));
                    let outline = PlotPoints::from(vec![
                        [ax, a.y],
                        [bx, a.y],
                        [bx, b.y],
                        [ax, b.y],
                        [ax, a.y],
                    ]);
                    plot_ui.line(Line::new(outline).color(colors.zoom_box).width(1.0));
                }
                DrawCommand::HLine { y, role } => {
                    plot_ui.hline(
                        HLine::new(*y)
                            .color(colors.guide_line)
                            .width(0.8)
                            .style(guide_style(*role)),
                    );
                }
                DrawCommand::VLine { x, role } => {
                    plot_ui.vline(
                        VLine::new(flip(*x))
                            .color(colors.guide_line)
                            .width(0.8)
                            .style(guide_style(*role)),
                    );
                }
                DrawCommand::Text {
                    anchor: TextAnchor::Data(p),
                    text,
                    ..
                } => {
                    plot_ui.text(
                        Text::new(
                            PlotPoint::new(flip(p.x), p.y),
                            egui::RichText::new(text.as_str())
                                .size(12.0)
                                .color(colors.text_primary),
                        )
                        .anchor(egui::Align2::LEFT_BOTTOM),
                    );
                }
                // painted over the frame afterwards
                DrawCommand::Text {
                    anchor: TextAnchor::AxesFraction { .. },
                    ..
                } => {}
            }
        }
    })
}

fn guide_style(role: GuideRole) -> LineStyle {
    match role {
        GuideRole::Crosshair => LineStyle::dashed_dense(),
        GuideRole::Measurement => LineStyle::dashed_loose(),
    }
}

fn paint_axes_text(ui: &egui::Ui, frame: egui::Rect, list: &DrawList, colors: &ThemeColors) {
    let painter = ui.painter().with_clip_rect(frame);
    for command in &list.commands {
        if let DrawCommand::Text {
            anchor: TextAnchor::AxesFraction { x, y },
            text,
            boxed,
        } = command
        {
            let pos = egui::pos2(
                frame.left() + x * frame.width(),
                frame.bottom() - y * frame.height(),
            );
            let galley = painter.layout_no_wrap(
                text.clone(),
                egui::FontId::monospace(12.0),
                colors.text_primary,
            );
            let rect = egui::Align2::LEFT_CENTER
                .anchor_size(pos, galley.size())
                .expand(3.0);
            if *boxed {
                painter.rect_filled(rect, 3.0, colors.readout_bg);
            }
            painter.galley(rect.min + egui::vec2(3.0, 3.0), galley, colors.text_primary);
        }
    }
}

/// Paint the legend in the top-right corner; returns the hit rectangles
fn paint_legend(
    ui: &egui::Ui,
    frame: egui::Rect,
    list: &DrawList,
    colors: &ThemeColors,
    line_width: f32,
) -> Vec<(egui::Rect, PickTarget)> {
    let Some(entries) = &list.legend else {
        return Vec::new();
    };
    let painter = ui.painter().with_clip_rect(frame);
    let font = egui::FontId::proportional(13.0);
    let galleys: Vec<_> = entries
        .iter()
        .map(|e| painter.layout_no_wrap(e.text.clone(), font.clone(), colors.text_primary))
        .collect();

    let glyph_width = 24.0;
    let pad = 6.0;
    let gap = 6.0;
    let row_height = galleys.iter().map(|g| g.size().y).fold(14.0, f32::max);
    let text_width = galleys.iter().map(|g| g.size().x).fold(0.0, f32::max);
    let size = egui::vec2(
        pad * 2.0 + glyph_width + gap + text_width,
        pad * 2.0 + row_height * entries.len() as f32,
    );
    let origin = egui::pos2(frame.right() - size.x - 8.0, frame.top() + 8.0);
    painter.rect_filled(egui::Rect::from_min_size(origin, size), 4.0, colors.legend_bg);

    let mut hits = Vec::with_capacity(entries.len() * 2);
    for (i, (entry, galley)) in entries.iter().zip(galleys).enumerate() {
        let top = origin.y + pad + row_height * i as f32;
        let glyph = egui::Rect::from_min_size(
            egui::pos2(origin.x + pad, top),
            egui::vec2(glyph_width, row_height),
        );
        let color = colors
            .series_color(entry.color_index)
            .gamma_multiply(entry.alpha);
        painter.line_segment(
            [glyph.left_center(), glyph.right_center()],
            egui::Stroke::new(line_width.max(1.5), color),
        );

        let label = egui::Rect::from_min_size(
            egui::pos2(glyph.right() + gap, top),
            egui::vec2(galley.size().x, row_height),
        );
        painter.galley(
            egui::pos2(label.left(), top + (row_height - galley.size().y) / 2.0),
            galley,
            colors.text_primary,
        );

        hits.push((glyph, PickTarget::Glyph(entry.id)));
        hits.push((label, PickTarget::Label(entry.id)));
    }
    hits
}

/// Translate this frame's raw input into chart events. Presses and wheel
/// turns count when they land on the canvas, axes included; the chart
/// decides whether they are inside the plot frame.
fn collect_events(
    ui: &egui::Ui,
    state: &mut ChartCanvasState,
    canvas_rect: egui::Rect,
) -> Vec<ChartEvent> {
    let ctx = ui.ctx().clone();
    let layer = ui.layer_id();
    let (events, time, hover) = ui.input(|i| (i.events.clone(), i.time, i.pointer.hover_pos()));
    translate_events(state, events, time, hover, |pos| {
        canvas_rect.contains(pos) && ctx.layer_id_at(pos) == Some(layer)
    })
}

fn translate_events(
    state: &mut ChartCanvasState,
    events: Vec<egui::Event>,
    time: f64,
    hover: Option<egui::Pos2>,
    owns: impl Fn(egui::Pos2) -> bool,
) -> Vec<ChartEvent> {
    let mut out = Vec::new();
    for event in events {
        match event {
            egui::Event::PointerButton {
                pos,
                button,
                pressed,
                modifiers,
            } => {
                let Some(button) = map_button(button) else {
                    continue;
                };
                let screen = to_screen_pos(pos);
                if !pressed {
                    out.push(ChartEvent::PointerUp { pos: screen, button });
                    continue;
                }
                // an open menu swallows the press that dismisses it
                if state.menu.is_some() || !owns(pos) {
                    continue;
                }
                let double_click = state.register_press(button, pos, time);
                if let Some(target) = state.hit_legend(pos) {
                    out.push(ChartEvent::Pick {
                        target,
                        button,
                        pos: screen,
                    });
                }
                out.push(ChartEvent::PointerDown {
                    pos: screen,
                    button,
                    double_click,
                    modifiers: map_modifiers(modifiers),
                });
            }
            egui::Event::PointerMoved(pos) => {
                out.push(ChartEvent::PointerMove {
                    pos: to_screen_pos(pos),
                });
            }
            egui::Event::PointerGone => out.push(ChartEvent::PointerLeft),
            egui::Event::MouseWheel {
                unit,
                delta,
                modifiers,
            } => {
                let Some(pos) = hover else {
                    continue;
                };
                if state.menu.is_some() || !owns(pos) {
                    continue;
                }
                // some platforms turn Shift+wheel into horizontal scroll
                let raw = if delta.y != 0.0 { delta.y } else { delta.x };
                let steps = match unit {
                    egui::MouseWheelUnit::Point => raw / POINTS_PER_WHEEL_STEP,
                    egui::MouseWheelUnit::Line => raw,
                    egui::MouseWheelUnit::Page => raw * 3.0,
                };
                if steps != 0.0 {
                    out.push(ChartEvent::Wheel {
                        pos: to_screen_pos(pos),
                        steps: steps as f64,
                        modifiers: map_modifiers(modifiers),
                    });
                }
            }
            _ => {}
        }
    }
    out
}

fn show_menu(ctx: &egui::Context, state: &mut ChartCanvasState) -> Option<CanvasAction> {
    let menu = state.menu.clone()?;
    let pos = match &menu {
        OpenMenu::Figure(pos) => *pos,
        OpenMenu::Legend { pos, .. } => *pos,
    };

    let mut action = None;
    let area = egui::Area::new(egui::Id::new("simview_chart_menu"))
        .order(egui::Order::Foreground)
        .fixed_pos(pos)
        .show(ctx, |ui| {
            egui::Frame::popup(ui.style()).show(ui, |ui| {
                ui.set_min_width(140.0);
                match &menu {
                    OpenMenu::Figure(_) => {
                        if ui.button("Export figure").clicked() {
                            action = Some(CanvasAction::ExportFigure);
                        }
                        if ui.button("Edit figure").clicked() {
                            action = Some(CanvasAction::EditFigure);
                        }
                        if ui.button("Crosshair cursor").clicked() {
                            action = Some(CanvasAction::ToggleCrosshair);
                        }
                    }
                    OpenMenu::Legend { id, label, .. } => {
                        if ui.button(format!("Delete {}?", label)).clicked() {
                            action = Some(CanvasAction::DeleteSeries(*id));
                        }
                        if ui.button("Set scale").clicked() {
                            action = Some(CanvasAction::PromptScale(*id));
                        }
                        if ui.button("Toggle Real/Imag").clicked() {
                            action = Some(CanvasAction::PromptDisplayMode(*id));
                        }
                    }
                }
            });
        });

    let fresh = std::mem::take(&mut state.menu_fresh);
    let dismissed = !fresh
        && ctx.input(|i| {
            i.key_pressed(egui::Key::Escape)
                || (i.pointer.any_pressed() && !area.response.contains_pointer())
        });
    if action.is_some() || dismissed {
        state.menu = None;
    }
    action
}

fn map_button(button: egui::PointerButton) -> Option<PointerButton> {
    match button {
        egui::PointerButton::Primary => Some(PointerButton::Primary),
        egui::PointerButton::Secondary => Some(PointerButton::Secondary),
        egui::PointerButton::Middle => Some(PointerButton::Middle),
        _ => None,
    }
}

fn map_modifiers(m: egui::Modifiers) -> Modifiers {
    Modifiers {
        shift: m.shift,
        ctrl: m.ctrl || m.mac_cmd,
        alt: m.alt,
    }
}

fn to_screen_pos(pos: egui::Pos2) -> ScreenPos {
    ScreenPos::new(pos.x, pos.y)
}

fn to_pos2(pos: ScreenPos) -> egui::Pos2 {
    egui::pos2(pos.x, pos.y)
}

fn to_screen_rect(rect: egui::Rect) -> ScreenRect {
    ScreenRect::from_min_max(to_screen_pos(rect.min), to_screen_pos(rect.max))
}

/// Tick label with just enough decimals for the grid step
pub fn tick_label(value: f64, step: f64) -> String {
    let decimals = if step.is_finite() && step > 0.0 {
        (0..10)
            .find(|d| {
                let scaled = step * 10f64.powi(*d);
                (scaled - scaled.round()).abs() < 1e-6 * scaled.max(1.0)
            })
            .unwrap_or(10) as usize
    } else {
        1
    };
    let text = format!("{:.*}", decimals, value);
    // no "-0" / "-0.00"
    match text.strip_prefix('-') {
        Some(rest) if rest.chars().all(|c| c == '0' || c == '.') => rest.to_string(),
        _ => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_label_decimals() {
        assert_eq!(tick_label(10.0, 5.0), "10");
        assert_eq!(tick_label(0.5, 0.5), "0.5");
        assert_eq!(tick_label(0.25, 0.25), "0.25");
        assert_eq!(tick_label(-150.0, 50.0), "-150");
        assert_eq!(tick_label(-0.0, 1.0), "0");
        assert_eq!(tick_label(-0.001, 0.1), "0.0");
    }

    #[test]
    fn test_double_click_detection() {
        let mut state = ChartCanvasState::default();
        let p = egui::pos2(10.0, 10.0);
        assert!(!state.register_press(PointerButton::Primary, p, 1.0));
        assert!(state.register_press(PointerButton::Primary, p, 1.2));
        // a third press starts over
        assert!(!state.register_press(PointerButton::Primary, p, 1.3));
        // different button or too slow is not a double-click
        assert!(!state.register_press(PointerButton::Secondary, p, 1.35));
        assert!(!state.register_press(PointerButton::Secondary, p, 2.0));
        // too far away
        assert!(!state.register_press(PointerButton::Secondary, egui::pos2(40.0, 10.0), 2.1));
    }

    fn press(pos: egui::Pos2, button: egui::PointerButton) -> egui::Event {
        egui::Event::PointerButton {
            pos,
            button,
            pressed: true,
            modifiers: egui::Modifiers::NONE,
        }
    }

    #[test]
    fn test_press_on_axis_margin_opens_figure_menu() {
        use crate::chart::event::HostRequest;
        use crate::config::ChartConfig;

        // canvas with a 40 px axis margin on the left and bottom
        let canvas = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(240.0, 140.0));
        let frame = egui::Rect::from_min_max(egui::pos2(40.0, 0.0), egui::pos2(240.0, 100.0));
        let on_y_ticks = egui::pos2(20.0, 50.0);

        let mut state = ChartCanvasState::default();
        let events = translate_events(
            &mut state,
            vec![
                press(on_y_ticks, egui::PointerButton::Secondary),
                press(egui::pos2(300.0, 50.0), egui::PointerButton::Secondary),
            ],
            1.0,
            Some(on_y_ticks),
            |pos| canvas.contains(pos),
        );
        assert_eq!(events.len(), 1);

        let mut chart = ChartSurface::new(ChartConfig::default());
        let mapper = PlotTransform::new(
            to_screen_rect(frame),
            chart.viewport().current(),
            chart.viewport().x_inverted(),
        );
        let response = chart.handle_event(&events[0], &mapper).unwrap();
        assert_eq!(
            response.request,
            Some(HostRequest::FigureMenu(ScreenPos::new(20.0, 50.0)))
        );
    }

    #[test]
    fn test_open_menu_swallows_press() {
        let mut state = ChartCanvasState::default();
        state.menu = Some(OpenMenu::Figure(egui::pos2(5.0, 5.0)));
        let events = translate_events(
            &mut state,
            vec![press(egui::pos2(10.0, 10.0), egui::PointerButton::Primary)],
            1.0,
            None,
            |_| true,
        );
        assert!(events.is_empty());
    }

    #[test]
    fn test_legend_hit_testing() {
        let mut state = ChartCanvasState::default();
        state.legend_hits = vec![
            (
                egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(10.0, 10.0)),
                PickTarget::Glyph(SeriesId(1)),
            ),
            (
                egui::Rect::from_min_max(egui::pos2(12.0, 0.0), egui::pos2(40.0, 10.0)),
                PickTarget::Label(SeriesId(1)),
            ),
        ];
        assert_eq!(
            state.hit_legend(egui::pos2(5.0, 5.0)),
            Some(PickTarget::Glyph(SeriesId(1)))
        );
        assert_eq!(
            state.hit_legend(egui::pos2(20.0, 5.0)),
            Some(PickTarget::Label(SeriesId(1)))
        );
        assert_eq!(state.hit_legend(egui::pos2(20.0, 50.0)), None);
    }
}
