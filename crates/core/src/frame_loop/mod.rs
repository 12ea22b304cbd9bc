//! Arming and cancellation for the self-rescheduling frame chain.
//!
//! Hosts request a callback before the next repaint and, inside that
//! callback, decide whether to request another one. The host's own "cancel
//! frame" primitive only reaches a request that already exists, so the chain
//! also checks a shared [`CancellationToken`] before re-arming.

use std::cell::Cell;
use std::rc::Rc;

/// Shared liveness flag. Clones observe the same cancellation.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Rc<Cell<bool>>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }

    /// True when both handles observe the same flag.
    pub fn same_as(&self, other: &CancellationToken) -> bool {
        Rc::ptr_eq(&self.cancelled, &other.cancelled)
    }
}

/// Timing information for one frame callback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tick {
    pub index: u64,
    pub timestamp_ms: f64,
    /// `None` on the very first frame.
    pub elapsed_ms: Option<f64>,
}

/// Explicit state of the frame chain: at most one request is armed at a
/// time and nothing re-arms once the token is cancelled.
#[derive(Debug)]
pub struct FrameLoop {
    token: CancellationToken,
    armed: bool,
    frames: u64,
    last_timestamp: Option<f64>,
}

impl FrameLoop {
    pub fn new(token: CancellationToken) -> Self {
        Self {
            token,
            armed: false,
            frames: 0,
            last_timestamp: None,
        }
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Marks a frame request as pending. Returns `false` when the host must
    /// not schedule anything: either a request is already pending or the
    /// loop has been cancelled.
    pub fn arm(&mut self) -> bool {
        if self.armed || self.token.is_cancelled() {
            return false;
        }
        self.armed = true;
        true
    }

    /// Consumes the pending request at the start of a frame callback.
    ///
    /// Returns `None` for stray callbacks (nothing armed) and for callbacks
    /// that fire after cancellation; in both cases the host must not run the
    /// frame body.
    pub fn begin(&mut self, timestamp_ms: f64) -> Option<Tick> {
        if !std::mem::replace(&mut self.armed, false) {
            return None;
        }
        if self.token.is_cancelled() {
            return None;
        }

        let elapsed_ms = self
            .last_timestamp
            .map(|last| (timestamp_ms - last).max(0.0));
        self.last_timestamp = Some(timestamp_ms);
        let tick = Tick {
            index: self.frames,
            timestamp_ms,
            elapsed_ms,
        };
        self.frames += 1;
        Some(tick)
    }

    /// Cancels the chain and drops any pending request.
    pub fn cancel(&mut self) {
        self.token.cancel();
        self.armed = false;
    }
}
