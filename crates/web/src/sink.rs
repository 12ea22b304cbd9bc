use murasaki_cursor_core::{present, CursorVisual, OverlaySink};
use wasm_bindgen::JsValue;
use web_sys::HtmlElement;

/// Writes overlay frames into an element's inline style.
#[derive(Debug, Clone)]
pub struct StyleSink {
    element: HtmlElement,
}

impl StyleSink {
    pub fn new(element: HtmlElement) -> Self {
        Self { element }
    }

    /// Pins the element to the viewport above page content and keeps it out
    /// of hit testing so it never becomes an enter/leave target itself.
    pub fn prepare(&self, size_px: f64) -> Result<(), JsValue> {
        let style = self.element.style();
        for (property, value) in base_style(size_px) {
            style.set_property(property, &value)?;
        }
        Ok(())
    }

    fn set(&self, property: &str, value: &str) {
        if let Err(err) = self.element.style().set_property(property, value) {
            tracing::warn!(property, ?err, "failed to update cursor style");
        }
    }
}

impl OverlaySink for StyleSink {
    fn write_position(&mut self, x: f64, y: f64) {
        self.set("left", &format!("{x}px"));
        self.set("top", &format!("{y}px"));
    }

    fn write_visual(&mut self, visual: CursorVisual, scale: f64) {
        self.set("transform", &present::css_transform(scale));
        if let Err(err) = self.element.set_attribute("data-cursor-state", visual.as_str()) {
            tracing::warn!(?err, "failed to tag cursor state");
        }
    }
}

/// Inline style applied once on mount. Scale changes ease over 200ms.
fn base_style(size_px: f64) -> Vec<(&'static str, String)> {
    vec![
        ("position", "fixed".to_string()),
        ("pointer-events", "none".to_string()),
        ("z-index", "50".to_string()),
        ("width", format!("{size_px}px")),
        ("height", format!("{size_px}px")),
        ("left", "0px".to_string()),
        ("top", "0px".to_string()),
        ("transform", present::css_transform(1.0)),
        ("transition", "transform 200ms".to_string()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value<'a>(style: &'a [(&'static str, String)], property: &str) -> Option<&'a str> {
        style
            .iter()
            .find(|(name, _)| *name == property)
            .map(|(_, value)| value.as_str())
    }

    #[test]
    fn base_style_eases_scale_and_stays_on_top() {
        let style = base_style(24.0);
        assert_eq!(value(&style, "transition"), Some("transform 200ms"));
        assert_eq!(value(&style, "z-index"), Some("50"));
        assert_eq!(value(&style, "pointer-events"), Some("none"));
    }

    #[test]
    fn base_style_sizes_and_centers_overlay() {
        let style = base_style(24.0);
        assert_eq!(value(&style, "width"), Some("24px"));
        assert_eq!(value(&style, "height"), Some("24px"));
        assert_eq!(
            value(&style, "transform"),
            Some("translate(-50%, -50%) scale(1)")
        );
    }
}
