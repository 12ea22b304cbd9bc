//! Headless host that replays recorded pointer scripts.
//!
//! The host keeps a single pending-frame slot, the way a browser keeps at
//! most one `requestAnimationFrame` callback per chain, and advances a fake
//! clock by a fixed interval per frame.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{
    CursorVisual, FollowerConfig, FrameDisposition, MountSlot, NodeDescriptor, OverlaySession,
    OverlaySink, PointerEvent, PointerState, Result,
};

/// One line of a replay script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScriptStep {
    Move {
        x: f64,
        y: f64,
    },
    Press,
    Release,
    Enter {
        target: NodeDescriptor,
    },
    Leave {
        target: NodeDescriptor,
    },
    /// Let the host fire `count` display refreshes.
    Frame {
        #[serde(default = "default_frame_count")]
        count: u32,
    },
    /// Tear the overlay down without clearing the host's pending callback.
    Unmount,
    /// Mount a fresh overlay, replacing whatever is there.
    Mount,
}

fn default_frame_count() -> u32 {
    1
}

impl ScriptStep {
    fn as_event(&self) -> Option<PointerEvent> {
        let event = match self {
            ScriptStep::Move { x, y } => PointerEvent::Move { x: *x, y: *y },
            ScriptStep::Press => PointerEvent::Press,
            ScriptStep::Release => PointerEvent::Release,
            ScriptStep::Enter { target } => PointerEvent::Enter {
                target: target.clone(),
            },
            ScriptStep::Leave { target } => PointerEvent::Leave {
                target: target.clone(),
            },
            ScriptStep::Frame { .. } | ScriptStep::Unmount | ScriptStep::Mount => return None,
        };
        Some(event)
    }
}

/// Loads a JSON array of [`ScriptStep`]s.
pub fn load_script(path: &Path) -> Result<Vec<ScriptStep>> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

/// Overlay write observed during a replayed frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReplayFrame {
    pub timestamp_ms: f64,
    pub x: f64,
    pub y: f64,
    pub visual: CursorVisual,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayReport {
    pub frames: Vec<ReplayFrame>,
    /// Events delivered while no overlay was mounted.
    pub dropped_events: usize,
    /// Callbacks that fired but produced no overlay write.
    pub suppressed_callbacks: usize,
    pub final_state: PointerState,
    pub mounted: bool,
}

#[derive(Debug, Default)]
struct FrameCapture {
    position: Option<(f64, f64)>,
    visual: Option<CursorVisual>,
}

impl OverlaySink for FrameCapture {
    fn write_position(&mut self, x: f64, y: f64) {
        self.position = Some((x, y));
    }

    fn write_visual(&mut self, visual: CursorVisual, _scale: f64) {
        self.visual = Some(visual);
    }
}

/// Simulated page hosting one pointer overlay.
#[derive(Debug)]
pub struct Replay {
    config: FollowerConfig,
    slot: MountSlot,
    session: OverlaySession,
    capture: FrameCapture,
    pending_frame: bool,
    clock_ms: f64,
    frame_interval_ms: f64,
    report: ReplayReport,
}

impl Replay {
    pub fn new(config: FollowerConfig) -> Result<Self> {
        Self::with_frame_interval(config, 1000.0 / 60.0)
    }

    pub fn with_frame_interval(config: FollowerConfig, frame_interval_ms: f64) -> Result<Self> {
        let slot = MountSlot::new();
        let session = OverlaySession::mount(config.clone(), &slot)?;
        let pending_frame = session.wants_frame();
        Ok(Self {
            config,
            slot,
            session,
            capture: FrameCapture::default(),
            pending_frame,
            clock_ms: 0.0,
            frame_interval_ms,
            report: ReplayReport {
                frames: Vec::new(),
                dropped_events: 0,
                suppressed_callbacks: 0,
                final_state: PointerState::default(),
                mounted: true,
            },
        })
    }

    pub fn session(&self) -> &OverlaySession {
        &self.session
    }

    pub fn has_pending_frame(&self) -> bool {
        self.pending_frame
    }

    pub fn run(&mut self, steps: &[ScriptStep]) -> Result<()> {
        for step in steps {
            self.step(step)?;
        }
        Ok(())
    }

    pub fn step(&mut self, step: &ScriptStep) -> Result<()> {
        if let Some(event) = step.as_event() {
            if !self.session.dispatch(&event) {
                self.report.dropped_events += 1;
            }
            return Ok(());
        }

        match step {
            ScriptStep::Frame { count } => {
                for _ in 0..*count {
                    self.fire_frame();
                }
            }
            ScriptStep::Unmount => self.session.unmount(),
            ScriptStep::Mount => {
                self.session = OverlaySession::mount(self.config.clone(), &self.slot)?;
                self.capture = FrameCapture::default();
                self.pending_frame = self.session.wants_frame();
            }
            _ => {}
        }
        Ok(())
    }

    fn fire_frame(&mut self) {
        self.clock_ms += self.frame_interval_ms;
        if !std::mem::replace(&mut self.pending_frame, false) {
            return;
        }

        let before = self.session.frames_rendered();
        let disposition = self.session.on_frame(self.clock_ms, &mut self.capture);
        self.pending_frame = disposition == FrameDisposition::Rearm;

        if self.session.frames_rendered() == before {
            self.report.suppressed_callbacks += 1;
            return;
        }
        if let (Some((x, y)), Some(visual)) = (self.capture.position, self.capture.visual) {
            self.report.frames.push(ReplayFrame {
                timestamp_ms: self.clock_ms,
                x,
                y,
                visual,
            });
        }
    }

    pub fn finish(mut self) -> ReplayReport {
        self.report.final_state = *self.session.state();
        self.report.mounted = self.session.is_mounted();
        self.report
    }
}

/// Replays `steps` on a fresh overlay and returns what the host observed.
pub fn replay(config: FollowerConfig, steps: &[ScriptStep]) -> Result<ReplayReport> {
    let mut replay = Replay::new(config)?;
    replay.run(steps)?;
    Ok(replay.finish())
}
