use std::cell::RefCell;
use std::rc::Rc;

use gloo::events::EventListener;
use murasaki_cursor_core::{scroll_progress, SectionBounds, SectionTracker};
use wasm_bindgen::prelude::*;
use web_sys::{Document, HtmlElement, Window};

/// Keeps a progress bar and the `data-active-section` attribute of the
/// document element in sync with the window scroll position.
#[wasm_bindgen]
pub struct ScrollSync {
    state: Rc<ScrollState>,
    _listener: EventListener,
}

struct ScrollState {
    window: Window,
    document: Document,
    progress_bar: HtmlElement,
    section_ids: Vec<String>,
    tracker: RefCell<SectionTracker>,
}

#[wasm_bindgen]
impl ScrollSync {
    pub fn attach(progress_bar: HtmlElement, section_ids: Vec<String>) -> Result<ScrollSync, JsValue> {
        let window = web_sys::window().ok_or("no global window exists")?;
        let document = window.document().ok_or("should have a document on window")?;
        let tracker = match section_ids.first() {
            Some(first) => SectionTracker::new(first.clone()),
            None => SectionTracker::default(),
        };

        let state = Rc::new(ScrollState {
            window: window.clone(),
            document,
            progress_bar,
            section_ids,
            tracker: RefCell::new(tracker),
        });
        state.refresh(true);

        let view = Rc::downgrade(&state);
        let listener = EventListener::new(&window, "scroll", move |_| {
            if let Some(view) = view.upgrade() {
                view.refresh(false);
            }
        });

        Ok(Self {
            state,
            _listener: listener,
        })
    }

    #[wasm_bindgen(getter, js_name = activeSection)]
    pub fn active_section(&self) -> Option<String> {
        self.state.tracker.borrow().active().map(str::to_owned)
    }
}

impl ScrollState {
    fn refresh(&self, publish: bool) {
        let scroll_y = self.window.scroll_y().unwrap_or(0.0);
        let viewport = self
            .window
            .inner_height()
            .ok()
            .and_then(|height| height.as_f64())
            .unwrap_or(0.0);
        let Some(root) = self.document.document_element() else {
            return;
        };

        let progress = scroll_progress(scroll_y, f64::from(root.scroll_height()), viewport);
        if let Err(err) = self
            .progress_bar
            .style()
            .set_property("width", &format!("{progress}%"))
        {
            tracing::warn!(?err, "failed to update scroll progress");
        }

        let sections: Vec<SectionBounds> = self
            .section_ids
            .iter()
            .filter_map(|id| {
                let rect = self.document.get_element_by_id(id)?.get_bounding_client_rect();
                Some(SectionBounds::new(id.clone(), rect.top(), rect.bottom()))
            })
            .collect();

        let mut tracker = self.tracker.borrow_mut();
        let changed = tracker.update(&sections);
        if let Some(active) = tracker.active().filter(|_| changed || publish) {
            tracing::debug!(section = active, "active section changed");
            if let Err(err) = root.set_attribute("data-active-section", active) {
                tracing::warn!(?err, "failed to publish active section");
            }
        }
    }
}
