//! Core library for the Murasaki pointer follower.
//!
//! The crate holds the host-independent half of the custom cursor: pointer
//! state with pure per-event updates, the exponential follow, hover
//! classification, the overlay's visual states, and the arming/cancellation
//! wrapper around a host's per-frame callback. Host adapters (the browser
//! bindings, the headless replay) only translate events and schedule frames.

pub mod classify;
pub mod config;
pub mod error;
pub mod frame_loop;
pub mod input;
pub mod overlay;
pub mod present;
pub mod replay;
pub mod scroll;
pub mod smoothing;

pub use classify::{AttributeMatch, InteractivePredicate, InteractiveTarget, NodeDescriptor};
pub use config::{FollowerConfig, Timestep, VisualScales};
pub use error::{CursorError, Result};
pub use frame_loop::{CancellationToken, FrameLoop, Tick};
pub use input::{EventKind, ListenerPhase, ListenerSpec, PointerEvent, PointerState, LISTENERS};
pub use overlay::{FrameDisposition, MountSlot, OverlaySession, PointerFollower};
pub use present::{CursorVisual, OverlayFrame, OverlayPresenter, OverlaySink, RecordingSink};
pub use replay::{replay, Replay, ReplayFrame, ReplayReport, ScriptStep};
pub use scroll::{scroll_progress, SectionBounds, SectionTracker};
