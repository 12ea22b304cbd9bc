use serde::{Deserialize, Serialize};

use crate::{PointerState, VisualScales};

/// Discrete look of the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CursorVisual {
    Neutral,
    /// Pointer is over an interactive element. Wins over a held press.
    Expanded,
    /// Button held away from interactive elements.
    Contracted,
}

impl CursorVisual {
    pub fn from_flags(is_hovering_interactive: bool, is_pressed: bool) -> Self {
        if is_hovering_interactive {
            CursorVisual::Expanded
        } else if is_pressed {
            CursorVisual::Contracted
        } else {
            CursorVisual::Neutral
        }
    }

    pub fn scale(self, scales: &VisualScales) -> f64 {
        match self {
            CursorVisual::Neutral => scales.neutral,
            CursorVisual::Expanded => scales.expanded,
            CursorVisual::Contracted => scales.contracted,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CursorVisual::Neutral => "neutral",
            CursorVisual::Expanded => "expanded",
            CursorVisual::Contracted => "contracted",
        }
    }
}

/// Everything a host needs to place the overlay for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverlayFrame {
    /// Center of the overlay in screen space.
    pub x: f64,
    pub y: f64,
    pub visual: CursorVisual,
    pub scale: f64,
}

impl OverlayFrame {
    /// Pure projection of the pointer state onto the overlay.
    pub fn from_state(state: &PointerState, scales: &VisualScales) -> Self {
        let visual = CursorVisual::from_flags(state.is_hovering_interactive, state.is_pressed);
        Self {
            x: state.rendered_x,
            y: state.rendered_y,
            visual,
            scale: visual.scale(scales),
        }
    }

    /// Top-left corner for an overlay of the given size, so that its midpoint
    /// sits on `(x, y)`.
    pub fn origin(&self, width: f64, height: f64) -> (f64, f64) {
        (self.x - width / 2.0, self.y - height / 2.0)
    }

    /// Recenters the element whatever its pixel size, then applies the
    /// visual scale.
    pub fn css_transform(&self) -> String {
        css_transform(self.scale)
    }
}

/// `transform` value centering an element on its own midpoint at `scale`.
pub fn css_transform(scale: f64) -> String {
    format!("translate(-50%, -50%) scale({scale})")
}

/// Destination for overlay writes. Writing the same frame twice must be
/// harmless.
pub trait OverlaySink {
    fn write_position(&mut self, x: f64, y: f64);

    fn write_visual(&mut self, visual: CursorVisual, scale: f64);
}

/// Pushes frames into an [`OverlaySink`], skipping visual writes that would
/// not change anything.
#[derive(Debug, Default, Clone)]
pub struct OverlayPresenter {
    last_visual: Option<CursorVisual>,
}

impl OverlayPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_visual(&self) -> Option<CursorVisual> {
        self.last_visual
    }

    pub fn present<S: OverlaySink + ?Sized>(&mut self, frame: &OverlayFrame, sink: &mut S) {
        sink.write_position(frame.x, frame.y);
        if self.last_visual != Some(frame.visual) {
            sink.write_visual(frame.visual, frame.scale);
            self.last_visual = Some(frame.visual);
        }
    }
}

/// Sink that keeps every write, for tests and headless replay.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RecordingSink {
    pub positions: Vec<(f64, f64)>,
    pub visuals: Vec<CursorVisual>,
}

impl OverlaySink for RecordingSink {
    fn write_position(&mut self, x: f64, y: f64) {
        self.positions.push((x, y));
    }

    fn write_visual(&mut self, visual: CursorVisual, _scale: f64) {
        self.visuals.push(visual);
    }
}
