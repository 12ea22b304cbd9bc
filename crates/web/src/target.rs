use murasaki_cursor_core::InteractiveTarget;
use wasm_bindgen::JsCast;
use web_sys::{Element, Event};

/// Element that raised an enter/leave notification.
#[derive(Debug, Clone)]
pub struct DomTarget(Element);

impl DomTarget {
    /// Returns `None` when the target is not an element (the document
    /// itself, text nodes).
    pub fn from_event(event: &Event) -> Option<Self> {
        event.target()?.dyn_into::<Element>().ok().map(Self)
    }

    pub fn element(&self) -> &Element {
        &self.0
    }
}

impl InteractiveTarget for DomTarget {
    fn has_tag(&self, tag: &str) -> bool {
        // HTML elements report upper-case tag names, SVG ones lower-case.
        self.0.tag_name().eq_ignore_ascii_case(tag)
    }

    fn has_attribute_value(&self, name: &str, value: &str) -> bool {
        self.0.get_attribute(name).as_deref() == Some(value)
    }
}
