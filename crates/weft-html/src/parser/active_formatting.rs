//! [§ 13.2.4.3 The list of active formatting elements](https://html.spec.whatwg.org/multipage/parsing.html#the-list-of-active-formatting-elements)
//!
//! "Initially, the list of active formatting elements is empty. It is used to
//! handle mis-nested formatting element tags."

use weft_dom::NodeId;

use super::core::HTMLParser;
use crate::tokenizer::Tag;

/// "The list contains elements in the formatting category, and markers."
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActiveFormattingElement {
    /// "The markers are inserted when entering applet, object, marquee,
    /// template, td, th, and caption elements, and are used to prevent
    /// formatting from "leaking" into applet, object, marquee, template, td,
    /// th, and caption elements."
    Marker,
    /// A formatting element, with the token it was created for so that it can
    /// be recreated by reconstruction or the adoption agency.
    Element {
        /// The element in the tree.
        node_id: NodeId,
        /// "the token for which the element was created"
        tag: Tag,
    },
}

impl ActiveFormattingElement {
    /// The element's node, or `None` for a marker.
    #[must_use]
    pub const fn node_id(&self) -> Option<NodeId> {
        match self {
            Self::Marker => None,
            Self::Element { node_id, .. } => Some(*node_id),
        }
    }
}

impl HTMLParser {
    /// [§ 13.2.4.3 Push onto the list of active formatting elements](https://html.spec.whatwg.org/multipage/parsing.html#push-onto-the-list-of-active-formatting-elements)
    pub(super) fn push_active_formatting_element(&mut self, node_id: NodeId, tag: &Tag) {
        // STEP 1: "If there are already three elements in the list of active
        // formatting elements after the last marker, if any, or anywhere in the
        // list if there are no markers, that have the same tag name, namespace,
        // and attributes as element, then remove the earliest such element from
        // the list of active formatting elements. For these purposes, the
        // attributes must be compared as they were when the elements were
        // created by the parser; two elements have the same attributes if all
        // their parsed attributes can be paired such that the two attributes in
        // each pair have identical names, namespaces, and values (the order of
        // the attributes does not matter)."
        if let Some(element) = self.tree.as_element(node_id) {
            let mut matches = Vec::new();
            for (index, entry) in self.active_formatting_elements.iter().enumerate().rev() {
                match entry {
                    ActiveFormattingElement::Marker => break,
                    ActiveFormattingElement::Element { node_id: other, .. } => {
                        if self.tree.as_element(*other) == Some(element) {
                            matches.push(index);
                        }
                    }
                }
            }
            if matches.len() >= 3
                && let Some(&earliest) = matches.last()
            {
                let _ = self.active_formatting_elements.remove(earliest);
            }
        }

        // STEP 2: "Add element to the list of active formatting elements."
        self.active_formatting_elements
            .push(ActiveFormattingElement::Element {
                node_id,
                tag: tag.clone(),
            });
    }

    /// "Insert a marker at the end of the list of active formatting elements."
    pub(super) fn push_active_formatting_marker(&mut self) {
        self.active_formatting_elements
            .push(ActiveFormattingElement::Marker);
    }

    fn is_marker_or_open(&self, entry: &ActiveFormattingElement) -> bool {
        match entry {
            ActiveFormattingElement::Marker => true,
            ActiveFormattingElement::Element { node_id, .. } => {
                self.stack_of_open_elements.contains(node_id)
            }
        }
    }

    /// [§ 13.2.4.3 Reconstruct the active formatting elements](https://html.spec.whatwg.org/multipage/parsing.html#reconstruct-the-active-formatting-elements)
    pub(super) fn reconstruct_active_formatting_elements(&mut self) {
        // STEP 1: "If there are no entries in the list of active formatting
        // elements, then there is nothing to reconstruct; stop this algorithm."
        let Some(last) = self.active_formatting_elements.last() else {
            return;
        };

        // STEP 2: "If the last (most recently added) entry in the list of active
        // formatting elements is a marker, or if it is an element that is in
        // the stack of open elements, then there is nothing to reconstruct;
        // stop this algorithm."
        if self.is_marker_or_open(last) {
            return;
        }

        // STEP 3-6 (Rewind): "If there are no entries before entry in the list
        // of active formatting elements, then jump to the step labeled create.
        // Let entry be the entry one earlier than entry in the list of active
        // formatting elements. If entry is neither a marker nor an element that
        // is also in the stack of open elements, go to the step labeled rewind."
        let mut index = self.active_formatting_elements.len() - 1;
        while index > 0 && !self.is_marker_or_open(&self.active_formatting_elements[index - 1]) {
            index -= 1;
        }

        // STEP 7-10 (Advance / Create): "Insert an HTML element for the token
        // for which the element entry was created, to obtain new element.
        // Replace the entry for entry in the list with an entry for new
        // element. If the entry for new element in the list of active
        // formatting elements is not the last entry in the list, return to the
        // step labeled advance."
        for position in index..self.active_formatting_elements.len() {
            let ActiveFormattingElement::Element { tag, .. } =
                &self.active_formatting_elements[position]
            else {
                continue;
            };
            let tag = tag.clone();
            let node_id = self.insert_html_element(&tag);
            self.active_formatting_elements[position] =
                ActiveFormattingElement::Element { node_id, tag };
        }
    }

    /// [§ 13.2.4.3 Clear the list of active formatting elements up to the last marker](https://html.spec.whatwg.org/multipage/parsing.html#clear-the-list-of-active-formatting-elements-up-to-the-last-marker)
    ///
    /// "1. Let entry be the last (most recently added) entry in the list of
    /// active formatting elements. 2. Remove entry from the list of active
    /// formatting elements. 3. If entry was a marker, then stop the algorithm
    /// at this point. 4. Go to step 1."
    pub(super) fn clear_active_formatting_elements_to_last_marker(&mut self) {
        while let Some(entry) = self.active_formatting_elements.pop() {
            if entry == ActiveFormattingElement::Marker {
                break;
            }
        }
    }

    /// Index of the entry for `node`.
    pub(super) fn active_formatting_position(&self, node: NodeId) -> Option<usize> {
        self.active_formatting_elements
            .iter()
            .position(|entry| entry.node_id() == Some(node))
    }

    /// Remove the entry for `node`, if any.
    pub(super) fn remove_active_formatting_element(&mut self, node: NodeId) {
        if let Some(index) = self.active_formatting_position(node) {
            let _ = self.active_formatting_elements.remove(index);
        }
    }

    /// "the last element in the list of active formatting elements that is
    /// between the end of the list and the last marker in the list, if any, or
    /// the start of the list otherwise, and has the tag name `name`"
    pub(super) fn active_formatting_element_after_last_marker(&self, name: &str) -> Option<NodeId> {
        for entry in self.active_formatting_elements.iter().rev() {
            match entry {
                ActiveFormattingElement::Marker => return None,
                ActiveFormattingElement::Element { node_id, tag } if tag.name == name => {
                    return Some(*node_id);
                }
                ActiveFormattingElement::Element { .. } => {}
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use weft_dom::{AttributesMap, Namespace};

    use super::*;
    use crate::tokenizer::Attribute;

    fn push_formatting(parser: &mut HTMLParser, name: &str, attrs: &[(&str, &str)]) -> NodeId {
        let mut tag = Tag::start(name);
        tag.attributes = attrs
            .iter()
            .map(|(k, v)| Attribute::new((*k).to_string(), (*v).to_string()))
            .collect();
        let map: AttributesMap = attrs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        let node = parser.tree.create_element(name, Namespace::Html, map);
        parser.push_active_formatting_element(node, &tag);
        node
    }

    #[test]
    fn test_noahs_ark_keeps_three_identical_entries() {
        let mut parser = HTMLParser::new("");
        let first = push_formatting(&mut parser, "b", &[]);
        for _ in 0..3 {
            let _ = push_formatting(&mut parser, "b", &[]);
        }
        assert_eq!(parser.active_formatting_elements.len(), 3);
        assert_eq!(parser.active_formatting_position(first), None);
    }

    #[test]
    fn test_noahs_ark_compares_attributes_without_order() {
        let mut parser = HTMLParser::new("");
        let _ = push_formatting(&mut parser, "b", &[("a", "1"), ("c", "2")]);
        let _ = push_formatting(&mut parser, "b", &[("c", "2"), ("a", "1")]);
        let _ = push_formatting(&mut parser, "b", &[("a", "1"), ("c", "2")]);
        let _ = push_formatting(&mut parser, "b", &[("c", "2"), ("a", "1")]);
        assert_eq!(parser.active_formatting_elements.len(), 3);

        let _ = push_formatting(&mut parser, "b", &[("a", "other")]);
        assert_eq!(parser.active_formatting_elements.len(), 4);
    }

    #[test]
    fn test_noahs_ark_stops_at_marker() {
        let mut parser = HTMLParser::new("");
        for _ in 0..3 {
            let _ = push_formatting(&mut parser, "i", &[]);
        }
        parser.push_active_formatting_marker();
        for _ in 0..3 {
            let _ = push_formatting(&mut parser, "i", &[]);
        }
        assert_eq!(parser.active_formatting_elements.len(), 7);

        parser.clear_active_formatting_elements_to_last_marker();
        assert_eq!(parser.active_formatting_elements.len(), 3);
    }

    #[test]
    fn test_lookup_after_last_marker() {
        let mut parser = HTMLParser::new("");
        let a = push_formatting(&mut parser, "a", &[]);
        assert_eq!(parser.active_formatting_element_after_last_marker("a"), Some(a));
        parser.push_active_formatting_marker();
        assert_eq!(parser.active_formatting_element_after_last_marker("a"), None);
    }
}
