//! Mount lifecycle of the pointer follower.
//!
//! [`PointerFollower`] is the engine: pointer state, config and presenter,
//! with no notion of scheduling. [`OverlaySession`] wraps it with the frame
//! chain and the liveness token that a host needs between mount and unmount.

use std::cell::RefCell;

use crate::{
    smoothing, CancellationToken, FollowerConfig, FrameLoop, InteractiveTarget, OverlayFrame,
    OverlayPresenter, OverlaySink, PointerEvent, PointerState, Result, Tick,
};

/// Smoothing engine for a single overlay.
#[derive(Debug, Clone)]
pub struct PointerFollower {
    config: FollowerConfig,
    state: PointerState,
    presenter: OverlayPresenter,
}

impl PointerFollower {
    pub fn new(config: FollowerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            state: PointerState::default(),
            presenter: OverlayPresenter::new(),
        })
    }

    pub fn config(&self) -> &FollowerConfig {
        &self.config
    }

    pub fn state(&self) -> &PointerState {
        &self.state
    }

    pub fn handle<T: InteractiveTarget>(&mut self, event: &PointerEvent<T>) {
        self.state = self.state.apply(event, &self.config.interactive);
    }

    /// Runs one smoothing step for `tick` and returns the resulting frame.
    pub fn advance(&mut self, tick: &Tick) -> OverlayFrame {
        let damping = smoothing::effective_damping(
            self.config.damping,
            self.config.timestep,
            tick.elapsed_ms,
        );
        self.state = smoothing::step(self.state, damping);
        OverlayFrame::from_state(&self.state, &self.config.scales)
    }

    pub fn render<S: OverlaySink + ?Sized>(&mut self, tick: &Tick, sink: &mut S) -> OverlayFrame {
        let frame = self.advance(tick);
        self.presenter.present(&frame, sink);
        frame
    }
}

/// What the host should do once a frame callback returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameDisposition {
    /// Request exactly one more callback.
    Rearm,
    /// The overlay is gone; request nothing.
    Stop,
}

/// A mounted overlay. Dropping the session tears it down.
#[derive(Debug)]
pub struct OverlaySession {
    follower: PointerFollower,
    frame_loop: FrameLoop,
}

impl OverlaySession {
    /// Mounts a new overlay, taking over `slot` from any overlay still alive
    /// there. The first frame is armed; hosts should request it right away.
    pub fn mount(config: FollowerConfig, slot: &MountSlot) -> Result<Self> {
        let follower = PointerFollower::new(config)?;
        let mut frame_loop = FrameLoop::new(slot.claim());
        frame_loop.arm();
        tracing::debug!(damping = follower.config.damping, "pointer overlay mounted");
        Ok(Self {
            follower,
            frame_loop,
        })
    }

    pub fn follower(&self) -> &PointerFollower {
        &self.follower
    }

    pub fn state(&self) -> &PointerState {
        self.follower.state()
    }

    pub fn token(&self) -> &CancellationToken {
        self.frame_loop.token()
    }

    pub fn is_mounted(&self) -> bool {
        !self.frame_loop.is_cancelled()
    }

    /// True while a frame request is outstanding.
    pub fn wants_frame(&self) -> bool {
        self.frame_loop.is_armed()
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frame_loop.frames()
    }

    /// Feeds a host notification to the engine. Returns `false`, leaving the
    /// state untouched, once the overlay has been unmounted.
    pub fn dispatch<T: InteractiveTarget>(&mut self, event: &PointerEvent<T>) -> bool {
        if !self.is_mounted() {
            tracing::trace!(kind = ?event.kind(), "dropping event after unmount");
            return false;
        }
        self.follower.handle(event);
        true
    }

    /// Body of the frame callback: smooth, present, and decide whether the
    /// chain continues.
    pub fn on_frame<S: OverlaySink + ?Sized>(
        &mut self,
        timestamp_ms: f64,
        sink: &mut S,
    ) -> FrameDisposition {
        let Some(tick) = self.frame_loop.begin(timestamp_ms) else {
            tracing::trace!("frame callback ignored");
            return FrameDisposition::Stop;
        };
        self.follower.render(&tick, sink);

        if self.frame_loop.arm() {
            FrameDisposition::Rearm
        } else {
            tracing::debug!(frames = self.frame_loop.frames(), "frame loop stopped");
            FrameDisposition::Stop
        }
    }

    /// Cancels the frame chain. Safe to call more than once.
    pub fn unmount(&mut self) {
        if self.is_mounted() {
            tracing::debug!(
                frames = self.frame_loop.frames(),
                "pointer overlay unmounted"
            );
        }
        self.frame_loop.cancel();
    }
}

impl Drop for OverlaySession {
    fn drop(&mut self) {
        self.unmount();
    }
}

/// Holds the liveness token of the one overlay allowed on a page.
#[derive(Debug, Default)]
pub struct MountSlot {
    active: RefCell<Option<CancellationToken>>,
}

impl MountSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a fresh token and cancels the previous holder, if any.
    pub fn claim(&self) -> CancellationToken {
        let token = CancellationToken::new();
        let previous = self.active.borrow_mut().replace(token.clone());
        if let Some(previous) = previous {
            if !previous.is_cancelled() {
                tracing::debug!("remount replaced a live pointer overlay");
                previous.cancel();
            }
        }
        token
    }

    pub fn is_occupied(&self) -> bool {
        self.active
            .borrow()
            .as_ref()
            .is_some_and(|token| !token.is_cancelled())
    }

    /// True when `token` is the one currently holding the slot.
    pub fn is_held_by(&self, token: &CancellationToken) -> bool {
        self.active
            .borrow()
            .as_ref()
            .is_some_and(|active| active.same_as(token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CursorError, CursorVisual, NodeDescriptor, RecordingSink};

    fn mount(slot: &MountSlot) -> OverlaySession {
        OverlaySession::mount(FollowerConfig::default(), slot).unwrap()
    }

    #[test]
    fn rejects_invalid_config() {
        let config = FollowerConfig {
            damping: 1.0,
            ..Default::default()
        };
        assert!(matches!(
            PointerFollower::new(config),
            Err(CursorError::InvalidConfig(_))
        ));
    }

    #[test]
    fn mount_arms_first_frame_and_rearms_while_live() {
        let slot = MountSlot::new();
        let mut session = mount(&slot);
        let mut sink = RecordingSink::default();

        assert!(session.wants_frame());
        assert_eq!(session.on_frame(0.0, &mut sink), FrameDisposition::Rearm);
        assert_eq!(session.on_frame(16.0, &mut sink), FrameDisposition::Rearm);
        assert_eq!(sink.positions.len(), 2);
        assert!(slot.is_occupied());
        assert!(slot.is_held_by(session.token()));
    }

    #[test]
    fn follows_a_jump() {
        let slot = MountSlot::new();
        let mut session = mount(&slot);
        let mut sink = RecordingSink::default();

        session.dispatch(&PointerEvent::<NodeDescriptor>::Move { x: 100.0, y: 100.0 });
        session.on_frame(0.0, &mut sink);
        session.on_frame(16.0, &mut sink);

        let (x, y) = sink.positions[1];
        assert!((x - 27.75).abs() < 0.01);
        assert!((y - 27.75).abs() < 0.01);
    }

    #[test]
    fn press_cycle_without_hover_goes_through_contracted() {
        let slot = MountSlot::new();
        let mut session = mount(&slot);
        let mut sink = RecordingSink::default();

        session.on_frame(0.0, &mut sink);
        session.dispatch(&PointerEvent::<NodeDescriptor>::Press);
        session.on_frame(16.0, &mut sink);
        session.dispatch(&PointerEvent::<NodeDescriptor>::Release);
        session.on_frame(32.0, &mut sink);

        assert_eq!(
            sink.visuals,
            vec![
                CursorVisual::Neutral,
                CursorVisual::Contracted,
                CursorVisual::Neutral
            ]
        );
    }

    #[test]
    fn unmount_stops_the_chain_and_drops_events() {
        let slot = MountSlot::new();
        let mut session = mount(&slot);
        let mut sink = RecordingSink::default();
        session.on_frame(0.0, &mut sink);

        session.unmount();
        assert!(!session.dispatch(&PointerEvent::<NodeDescriptor>::Move { x: 9.0, y: 9.0 }));
        assert_eq!(session.state().target_x, 0.0);
        assert_eq!(session.on_frame(16.0, &mut sink), FrameDisposition::Stop);
        assert_eq!(sink.positions.len(), 1);
        assert!(!slot.is_occupied());
    }

    #[test]
    fn remount_cancels_previous_overlay() {
        let slot = MountSlot::new();
        let mut first = mount(&slot);
        let mut second = mount(&slot);
        let mut sink = RecordingSink::default();

        assert!(!first.is_mounted());
        assert_eq!(first.on_frame(0.0, &mut sink), FrameDisposition::Stop);
        assert_eq!(second.on_frame(0.0, &mut sink), FrameDisposition::Rearm);
        assert!(slot.is_held_by(second.token()));
        assert!(!slot.is_held_by(first.token()));

        // Late teardown of the replaced overlay must not evict the new one.
        drop(first);
        assert!(slot.is_occupied());
    }

    #[test]
    fn dropping_the_session_releases_the_slot() {
        let slot = MountSlot::new();
        let session = mount(&slot);
        let token = session.token().clone();
        drop(session);
        assert!(token.is_cancelled());
        assert!(!slot.is_occupied());
    }
}
