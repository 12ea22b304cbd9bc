//! Scroll progress and active-section detection for the host page.

use serde::{Deserialize, Serialize};

/// Distance from the top of the viewport at which a section becomes active.
pub const SECTION_MARKER_PX: f64 = 100.0;

/// Vertical extent of a section relative to the viewport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionBounds {
    pub id: String,
    pub top: f64,
    pub bottom: f64,
}

impl SectionBounds {
    pub fn new(id: impl Into<String>, top: f64, bottom: f64) -> Self {
        Self {
            id: id.into(),
            top,
            bottom,
        }
    }

    pub fn spans(&self, marker: f64) -> bool {
        self.top <= marker && self.bottom >= marker
    }
}

/// Percentage of the page scrolled, in `[0, 100]`. Pages that do not scroll
/// report 0.
pub fn scroll_progress(scroll_y: f64, scroll_height: f64, viewport_height: f64) -> f64 {
    let scrollable = scroll_height - viewport_height;
    if !(scrollable > 0.0) || !scroll_y.is_finite() {
        return 0.0;
    }
    (scroll_y / scrollable * 100.0).clamp(0.0, 100.0)
}

/// Tracks which section sits under the marker line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionTracker {
    active: Option<String>,
}

impl SectionTracker {
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            active: Some(initial.into()),
        }
    }

    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Updates the active section from fresh bounds. When several sections
    /// span the marker, the last one in document order wins; when none do, the
    /// previous section stays active. Returns true if the section changed.
    pub fn update(&mut self, sections: &[SectionBounds]) -> bool {
        let Some(hit) = sections
            .iter()
            .rev()
            .find(|section| section.spans(SECTION_MARKER_PX))
        else {
            return false;
        };
        if self.active.as_deref() == Some(hit.id.as_str()) {
            return false;
        }
        self.active = Some(hit.id.clone());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_is_clamped_percentage() {
        assert_eq!(scroll_progress(0.0, 3000.0, 1000.0), 0.0);
        assert_eq!(scroll_progress(1000.0, 3000.0, 1000.0), 50.0);
        assert_eq!(scroll_progress(2000.0, 3000.0, 1000.0), 100.0);
        assert_eq!(scroll_progress(2500.0, 3000.0, 1000.0), 100.0);
        assert_eq!(scroll_progress(-40.0, 3000.0, 1000.0), 0.0);
    }

    #[test]
    fn short_pages_report_zero() {
        assert_eq!(scroll_progress(0.0, 800.0, 800.0), 0.0);
        assert_eq!(scroll_progress(10.0, 600.0, 800.0), 0.0);
    }

    #[test]
    fn picks_section_under_marker() {
        let mut tracker = SectionTracker::new("home");
        let sections = [
            SectionBounds::new("home", -900.0, 20.0),
            SectionBounds::new("projects", 20.0, 900.0),
            SectionBounds::new("skills", 900.0, 1800.0),
        ];
        assert!(tracker.update(&sections));
        assert_eq!(tracker.active(), Some("projects"));
        assert!(!tracker.update(&sections));
    }

    #[test]
    fn last_overlapping_section_wins() {
        let mut tracker = SectionTracker::default();
        let sections = [
            SectionBounds::new("skills", 0.0, 100.0),
            SectionBounds::new("contact", 100.0, 800.0),
        ];
        tracker.update(&sections);
        assert_eq!(tracker.active(), Some("contact"));
    }

    #[test]
    fn keeps_previous_section_when_nothing_spans_marker() {
        let mut tracker = SectionTracker::new("skills");
        let sections = [SectionBounds::new("contact", 300.0, 900.0)];
        assert!(!tracker.update(&sections));
        assert_eq!(tracker.active(), Some("skills"));
    }
}
