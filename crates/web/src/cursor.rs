use std::cell::RefCell;
use std::rc::{Rc, Weak};

use gloo::events::{EventListener, EventListenerOptions, EventListenerPhase};
use gloo::render::{request_animation_frame, AnimationFrame};
use js_sys::Reflect;
use murasaki_cursor_core::{
    EventKind, FollowerConfig, FrameDisposition, ListenerPhase, MountSlot, OverlaySession,
    PointerEvent, LISTENERS,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Event, HtmlElement, MouseEvent};

use crate::{DomTarget, StyleSink};

thread_local! {
    static SLOT: MountSlot = MountSlot::new();
}

/// Custom pointer overlay mounted on the current page.
///
/// Only one overlay is live per page: mounting a second one stops the first.
/// Call `unmount` (or `free` from JavaScript) to detach every listener and
/// stop the frame chain.
#[wasm_bindgen]
pub struct CursorOverlay {
    mounted: Rc<Mounted>,
}

#[wasm_bindgen]
impl CursorOverlay {
    /// Mounts the overlay on `element` with the default configuration.
    pub fn mount(element: HtmlElement) -> Result<CursorOverlay, JsValue> {
        Self::mount_with(element, FollowerConfig::default())
    }

    /// Mounts the overlay with a JSON config; missing fields use defaults.
    #[wasm_bindgen(js_name = mountWithConfig)]
    pub fn mount_with_config(element: HtmlElement, config: &str) -> Result<CursorOverlay, JsValue> {
        let config: FollowerConfig =
            serde_json::from_str(config).map_err(|err| JsValue::from_str(&err.to_string()))?;
        Self::mount_with(element, config)
    }

    pub fn unmount(&self) {
        self.mounted.teardown();
    }

    #[wasm_bindgen(getter, js_name = isMounted)]
    pub fn is_mounted(&self) -> bool {
        self.mounted.session.borrow().is_mounted()
    }
}

impl CursorOverlay {
    pub fn mount_with(element: HtmlElement, config: FollowerConfig) -> Result<Self, JsValue> {
        let document = web_sys::window()
            .and_then(|window| window.document())
            .ok_or("should have a document on window")?;

        let sink = StyleSink::new(element);
        sink.prepare(config.size_px)?;
        let session = SLOT
            .with(|slot| OverlaySession::mount(config, slot))
            .map_err(|err| JsValue::from_str(&err.to_string()))?;

        let mounted = Rc::new(Mounted {
            session: RefCell::new(session),
            sink: RefCell::new(sink),
            listeners: RefCell::new(Vec::new()),
            frame: RefCell::new(None),
        });
        mounted.install_listeners(&document);
        if mounted.session.borrow().wants_frame() {
            mounted.schedule_frame();
        }

        Ok(Self { mounted })
    }
}

impl Drop for CursorOverlay {
    fn drop(&mut self) {
        self.mounted.teardown();
    }
}

struct Mounted {
    session: RefCell<OverlaySession>,
    sink: RefCell<StyleSink>,
    listeners: RefCell<Vec<EventListener>>,
    frame: RefCell<Option<AnimationFrame>>,
}

impl Mounted {
    fn install_listeners(self: &Rc<Self>, document: &Document) {
        let mut listeners = Vec::with_capacity(LISTENERS.len());
        for entry in LISTENERS {
            let view: Weak<Self> = Rc::downgrade(self);
            let kind = entry.kind;
            let options = EventListenerOptions {
                phase: match entry.phase {
                    ListenerPhase::Bubble => EventListenerPhase::Bubble,
                    ListenerPhase::Capture => EventListenerPhase::Capture,
                },
                passive: true,
            };
            let listener =
                EventListener::new_with_options(document, entry.dom_event, options, move |event| {
                    let Some(view) = view.upgrade() else {
                        return;
                    };
                    if let Some(event) = translate(kind, event) {
                        view.session.borrow_mut().dispatch(&event);
                    }
                });
            listeners.push(listener);
        }
        *self.listeners.borrow_mut() = listeners;
    }

    fn schedule_frame(self: &Rc<Self>) {
        let view = Rc::downgrade(self);
        let handle = request_animation_frame(move |timestamp| {
            if let Some(view) = view.upgrade() {
                view.on_frame(timestamp);
            }
        });
        *self.frame.borrow_mut() = Some(handle);
    }

    fn on_frame(self: &Rc<Self>, timestamp: f64) {
        let disposition = {
            let mut session = self.session.borrow_mut();
            let mut sink = self.sink.borrow_mut();
            session.on_frame(timestamp, &mut *sink)
        };
        match disposition {
            FrameDisposition::Rearm => self.schedule_frame(),
            // Replaced by a newer mount, or unmounted mid-frame.
            FrameDisposition::Stop => self.teardown(),
        }
    }

    fn teardown(&self) {
        self.session.borrow_mut().unmount();
        self.listeners.borrow_mut().clear();
        self.frame.borrow_mut().take();
    }
}

fn translate(kind: EventKind, event: &Event) -> Option<PointerEvent<DomTarget>> {
    let event = match kind {
        EventKind::PointerMove => {
            let mouse = event.dyn_ref::<MouseEvent>()?;
            PointerEvent::Move {
                x: client_coordinate(mouse, "clientX", mouse.client_x()),
                y: client_coordinate(mouse, "clientY", mouse.client_y()),
            }
        }
        EventKind::PressStart => PointerEvent::Press,
        EventKind::PressEnd => PointerEvent::Release,
        EventKind::PointerEnter => PointerEvent::Enter {
            target: DomTarget::from_event(event)?,
        },
        EventKind::PointerLeave => PointerEvent::Leave {
            target: DomTarget::from_event(event)?,
        },
    };
    Some(event)
}

/// `MouseEvent::client_x` truncates to whole pixels; read the raw property so
/// sub-pixel positions reach the engine.
fn client_coordinate(event: &MouseEvent, key: &str, truncated: i32) -> f64 {
    let raw = Reflect::get(event.as_ref(), &JsValue::from_str(key))
        .ok()
        .and_then(|value| value.as_f64());
    coordinate_or(raw, truncated)
}

fn coordinate_or(raw: Option<f64>, truncated: i32) -> f64 {
    raw.filter(|value| value.is_finite())
        .unwrap_or_else(|| f64::from(truncated))
}
