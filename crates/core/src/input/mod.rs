use serde::{Deserialize, Serialize};

use crate::{classify, InteractivePredicate, InteractiveTarget, NodeDescriptor};

/// Pointer state owned by a single mounted overlay.
///
/// `target_*` follows the raw input, `rendered_*` is the smoothed position
/// written to screen. Both start at the origin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PointerState {
    pub target_x: f64,
    pub target_y: f64,
    pub rendered_x: f64,
    pub rendered_y: f64,
    pub is_pressed: bool,
    pub is_hovering_interactive: bool,
}

impl PointerState {
    /// Applies a single host notification. Move and press events go through
    /// the tracker, enter and leave through the hover classifier.
    pub fn apply<T: InteractiveTarget>(
        self,
        event: &PointerEvent<T>,
        predicate: &InteractivePredicate,
    ) -> Self {
        match event {
            PointerEvent::Move { x, y } => on_move(self, *x, *y),
            PointerEvent::Press => on_press(self),
            PointerEvent::Release => on_release(self),
            PointerEvent::Enter { target } => classify::on_enter(self, target, predicate),
            PointerEvent::Leave { target } => classify::on_leave(self, target, predicate),
        }
    }

    /// Remaining distance between the rendered and the raw position.
    pub fn lag(&self) -> (f64, f64) {
        (
            self.target_x - self.rendered_x,
            self.target_y - self.rendered_y,
        )
    }
}

/// Host notification consumed by the follower.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PointerEvent<T = NodeDescriptor> {
    Move { x: f64, y: f64 },
    Press,
    Release,
    Enter { target: T },
    Leave { target: T },
}

impl<T> PointerEvent<T> {
    pub fn kind(&self) -> EventKind {
        match self {
            PointerEvent::Move { .. } => EventKind::PointerMove,
            PointerEvent::Press => EventKind::PressStart,
            PointerEvent::Release => EventKind::PressEnd,
            PointerEvent::Enter { .. } => EventKind::PointerEnter,
            PointerEvent::Leave { .. } => EventKind::PointerLeave,
        }
    }
}

/// Records the latest raw coordinates. Off-viewport values pass through.
pub fn on_move(state: PointerState, x: f64, y: f64) -> PointerState {
    if !(x.is_finite() && y.is_finite()) {
        return state;
    }
    PointerState {
        target_x: x,
        target_y: y,
        ..state
    }
}

pub fn on_press(state: PointerState) -> PointerState {
    PointerState {
        is_pressed: true,
        ..state
    }
}

pub fn on_release(state: PointerState) -> PointerState {
    PointerState {
        is_pressed: false,
        ..state
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    PointerMove,
    PressStart,
    PressEnd,
    PointerEnter,
    PointerLeave,
}

/// Delivery phase requested for a document-level listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerPhase {
    Bubble,
    Capture,
}

/// One global subscription held for the lifetime of a mounted overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenerSpec {
    pub kind: EventKind,
    pub dom_event: &'static str,
    pub phase: ListenerPhase,
}

/// Every subscription a host must register on mount and release on unmount.
/// Enter and leave do not bubble, so they are captured at the document.
pub const LISTENERS: [ListenerSpec; 5] = [
    ListenerSpec {
        kind: EventKind::PointerMove,
        dom_event: "mousemove",
        phase: ListenerPhase::Bubble,
    },
    ListenerSpec {
        kind: EventKind::PressStart,
        dom_event: "mousedown",
        phase: ListenerPhase::Bubble,
    },
    ListenerSpec {
        kind: EventKind::PressEnd,
        dom_event: "mouseup",
        phase: ListenerPhase::Bubble,
    },
    ListenerSpec {
        kind: EventKind::PointerEnter,
        dom_event: "mouseenter",
        phase: ListenerPhase::Capture,
    },
    ListenerSpec {
        kind: EventKind::PointerLeave,
        dom_event: "mouseleave",
        phase: ListenerPhase::Capture,
    },
];
