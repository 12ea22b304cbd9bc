//! Hover classification for pointer enter/leave notifications.
//!
//! Hosts deliver enter/leave for every element the pointer crosses. Only
//! targets that satisfy the [`InteractivePredicate`] are allowed to flip the
//! hover flag, and the last matching event wins.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::PointerState;

/// Read-only view of an event target, implemented by each host's node type.
pub trait InteractiveTarget {
    /// Case-insensitive tag name comparison (`A` and `a` are the same tag).
    fn has_tag(&self, tag: &str) -> bool;

    /// Returns true when the node carries `name` with exactly `value`.
    fn has_attribute_value(&self, name: &str, value: &str) -> bool;
}

impl<T: InteractiveTarget + ?Sized> InteractiveTarget for &T {
    fn has_tag(&self, tag: &str) -> bool {
        (**self).has_tag(tag)
    }

    fn has_attribute_value(&self, name: &str, value: &str) -> bool {
        (**self).has_attribute_value(name, value)
    }
}

/// Plain description of a node, used by replay scripts and tests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeDescriptor {
    pub tag: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
}

impl NodeDescriptor {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: BTreeMap::new(),
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }
}

impl InteractiveTarget for NodeDescriptor {
    fn has_tag(&self, tag: &str) -> bool {
        self.tag.eq_ignore_ascii_case(tag)
    }

    fn has_attribute_value(&self, name: &str, value: &str) -> bool {
        self.attributes.get(name).is_some_and(|found| found == value)
    }
}

/// `[name="value"]` attribute selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeMatch {
    pub name: String,
    pub value: String,
}

/// Decides whether a node counts as clickable for hover purposes.
///
/// The default matches anchors, buttons and anything tagged
/// `data-cursor="pointer"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractivePredicate {
    pub tags: Vec<String>,
    pub attributes: Vec<AttributeMatch>,
}

impl Default for InteractivePredicate {
    fn default() -> Self {
        Self {
            tags: vec!["a".to_string(), "button".to_string()],
            attributes: vec![AttributeMatch {
                name: "data-cursor".to_string(),
                value: "pointer".to_string(),
            }],
        }
    }
}

impl InteractivePredicate {
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty() && self.attributes.is_empty()
    }

    pub fn matches<T: InteractiveTarget + ?Sized>(&self, target: &T) -> bool {
        self.tags.iter().any(|tag| target.has_tag(tag))
            || self
                .attributes
                .iter()
                .any(|attr| target.has_attribute_value(&attr.name, &attr.value))
    }

    /// CSS selector list equivalent to [`InteractivePredicate::matches`], for
    /// hosts that prefer `Element.matches`.
    pub fn selector(&self) -> String {
        let tags = self.tags.iter().map(|tag| tag.to_ascii_lowercase());
        let attributes = self
            .attributes
            .iter()
            .map(|attr| format!("[{}=\"{}\"]", attr.name, attr.value.replace('"', "\\\"")));
        tags.chain(attributes).collect::<Vec<_>>().join(", ")
    }
}

/// Applies a pointer-enter notification to the hover flag.
pub fn on_enter<T: InteractiveTarget + ?Sized>(
    state: PointerState,
    target: &T,
    predicate: &InteractivePredicate,
) -> PointerState {
    if predicate.matches(target) {
        PointerState {
            is_hovering_interactive: true,
            ..state
        }
    } else {
        state
    }
}

/// Applies a pointer-leave notification to the hover flag.
pub fn on_leave<T: InteractiveTarget + ?Sized>(
    state: PointerState,
    target: &T,
    predicate: &InteractivePredicate,
) -> PointerState {
    if predicate.matches(target) {
        PointerState {
            is_hovering_interactive: false,
            ..state
        }
    } else {
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidates() -> Vec<NodeDescriptor> {
        vec![
            NodeDescriptor::new("a"),
            NodeDescriptor::new("BUTTON"),
            NodeDescriptor::new("div").with_attribute("data-cursor", "pointer"),
        ]
    }

    #[test]
    fn matches_links_buttons_and_tagged_nodes() {
        let predicate = InteractivePredicate::default();
        for node in candidates() {
            assert!(predicate.matches(&node), "{node:?} should be interactive");
        }
    }

    #[test]
    fn ignores_plain_and_mistagged_nodes() {
        let predicate = InteractivePredicate::default();
        let plain = [
            NodeDescriptor::new("section"),
            NodeDescriptor::new("div").with_attribute("data-cursor", "text"),
            NodeDescriptor::new("span").with_attribute("data-pointer", "pointer"),
            NodeDescriptor::new("abbr"),
        ];
        for node in plain {
            assert!(!predicate.matches(&node), "{node:?} should not match");
        }
    }

    #[test]
    fn enter_then_leave_toggles_hover() {
        let predicate = InteractivePredicate::default();
        for node in candidates() {
            let entered = on_enter(PointerState::default(), &node, &predicate);
            assert!(entered.is_hovering_interactive);
            let left = on_leave(entered, &node, &predicate);
            assert!(!left.is_hovering_interactive);
        }
    }

    #[test]
    fn non_matching_targets_never_change_the_flag() {
        let predicate = InteractivePredicate::default();
        let node = NodeDescriptor::new("p");

        let idle = on_enter(PointerState::default(), &node, &predicate);
        assert!(!idle.is_hovering_interactive);

        let hovering = PointerState {
            is_hovering_interactive: true,
            ..Default::default()
        };
        assert!(on_leave(hovering, &node, &predicate).is_hovering_interactive);
    }

    #[test]
    fn leaving_a_nested_link_clears_hover_even_inside_a_button() {
        // Last event wins, no reference counting across nested targets.
        let predicate = InteractivePredicate::default();
        let button = NodeDescriptor::new("button");
        let link = NodeDescriptor::new("a");

        let state = on_enter(PointerState::default(), &button, &predicate);
        let state = on_enter(state, &link, &predicate);
        let state = on_leave(state, &link, &predicate);
        assert!(!state.is_hovering_interactive);
    }

    #[test]
    fn selector_lists_every_category() {
        assert_eq!(
            InteractivePredicate::default().selector(),
            r#"a, button, [data-cursor="pointer"]"#
        );
    }
}
