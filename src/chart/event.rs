use super::legend::PickTarget;
use super::transform::ScreenPos;
use crate::config::WheelModifier;
use crate::data::series::SeriesId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

/// Keyboard modifier state at the time of the event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
    };

    pub fn held(&self, modifier: WheelModifier) -> bool {
        match modifier {
            WheelModifier::Shift => self.shift,
            WheelModifier::Ctrl => self.ctrl,
            WheelModifier::Alt => self.alt,
        }
    }

    /// `modifier` held and nothing else
    pub fn only(&self, modifier: WheelModifier) -> bool {
        let expected = match modifier {
            WheelModifier::Shift => Modifiers {
                shift: true,
                ..Modifiers::NONE
            },
            WheelModifier::Ctrl => Modifiers {
                ctrl: true,
                ..Modifiers::NONE
            },
            WheelModifier::Alt => Modifiers {
                alt: true,
                ..Modifiers::NONE
            },
        };
        *self == expected
    }
}

/// Input delivered by the host, in device coordinates
#[derive(Debug, Clone, PartialEq)]
pub enum ChartEvent {
    PointerDown {
        pos: ScreenPos,
        button: PointerButton,
        double_click: bool,
        modifiers: Modifiers,
    },
    PointerMove {
        pos: ScreenPos,
    },
    PointerUp {
        pos: ScreenPos,
        button: PointerButton,
    },
    /// Positive steps scroll up
    Wheel {
        pos: ScreenPos,
        steps: f64,
        modifiers: Modifiers,
    },
    /// A legend glyph or label was hit; the host sends this before the
    /// matching `PointerDown`
    Pick {
        target: PickTarget,
        button: PointerButton,
        pos: ScreenPos,
    },
    PointerLeft,
}

/// Something only the host can show
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostRequest {
    /// Export / edit / crosshair menu
    FigureMenu(ScreenPos),
    /// Delete / set scale / real-imag menu for one series
    LegendMenu { id: SeriesId, pos: ScreenPos },
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EventResponse {
    pub redraw: bool,
    pub request: Option<HostRequest>,
}

impl EventResponse {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn redraw() -> Self {
        Self {
            redraw: true,
            request: None,
        }
    }

    pub fn request(request: HostRequest) -> Self {
        Self {
            redraw: false,
            request: Some(request),
        }
    }
}
