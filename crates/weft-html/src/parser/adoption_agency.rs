//! [§ 13.2.6.4.7 Adoption agency algorithm](https://html.spec.whatwg.org/multipage/parsing.html#adoption-agency-algorithm)

use weft_dom::{ElementData, Namespace};

use super::active_formatting::ActiveFormattingElement;
use super::core::HTMLParser;
use crate::error::ParseErrorCode;
use crate::tokenizer::Tag;

/// Outcome of running the adoption agency for an end tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum AdoptionOutcome {
    /// The end tag was fully handled.
    Done,
    /// "act as described in the "any other end tag" entry"
    AnyOtherEndTag,
}

impl HTMLParser {
    /// [§ 13.2.6.4.7 Adoption agency algorithm](https://html.spec.whatwg.org/multipage/parsing.html#adoption-agency-algorithm)
    ///
    /// "The adoption agency algorithm, which takes as its only argument a
    /// token token for which the algorithm is being run, consists of the
    /// following steps:"
    pub(super) fn run_adoption_agency(&mut self, token: &Tag) -> AdoptionOutcome {
        // STEP 1: "Let subject be token's tag name."
        let subject = token.name.as_str();

        // STEP 2: "If the current node is an HTML element whose tag name is
        // subject, and the current node is not in the list of active formatting
        // elements, then pop the current node off the stack of open elements
        // and return."
        if let Some(current) = self.current_node()
            && self.is_html_element(current, subject)
            && self.active_formatting_position(current).is_none()
        {
            let _ = self.pop_current_node();
            return AdoptionOutcome::Done;
        }

        // STEP 3: "Let outerLoopCounter be 0."
        // STEP 4: "While true:"
        for _ in 0..8 {
            // STEP 4.1-4.2: "If outerLoopCounter is greater than or equal to 8,
            // then return. Increment outerLoopCounter by 1."

            // STEP 4.3: "Let formattingElement be the last element in the list
            // of active formatting elements that: is between the end of the
            // list and the last marker in the list, if any, or the start of the
            // list otherwise, and has the tag name subject. If there is no such
            // element, then return and instead act as described in the "any
            // other end tag" entry above."
            let Some(formatting_element) = self.active_formatting_element_after_last_marker(subject)
            else {
                return AdoptionOutcome::AnyOtherEndTag;
            };

            // STEP 4.4: "If formattingElement is not in the stack of open
            // elements, then this is a parse error; remove the element from the
            // list, and return."
            let Some(formatting_index) = self.stack_position(formatting_element) else {
                self.parse_error(ParseErrorCode::MisnestedTag, subject);
                self.remove_active_formatting_element(formatting_element);
                return AdoptionOutcome::Done;
            };

            // STEP 4.5: "If formattingElement is in the stack of open elements,
            // but the element is not in scope, then this is a parse error;
            // return."
            if !self.has_node_in_scope(formatting_element) {
                self.parse_error(ParseErrorCode::UnexpectedEndTag, subject);
                return AdoptionOutcome::Done;
            }

            // STEP 4.6: "If formattingElement is not the current node, this is a
            // parse error. (But do not return.)"
            if self.current_node() != Some(formatting_element) {
                self.parse_error(ParseErrorCode::MisnestedTag, subject);
            }

            // STEP 4.7: "Let furthestBlock be the topmost node in the stack of
            // open elements that is lower in the stack than formattingElement,
            // and is an element in the special category. There might not be
            // one."
            let furthest_block_index = (formatting_index + 1..self.stack_of_open_elements.len())
                .find(|&index| {
                    self.tree
                        .as_element(self.stack_of_open_elements[index])
                        .is_some_and(ElementData::is_special)
                });

            // STEP 4.8: "If there is no furthestBlock, then the UA must first
            // pop all the nodes from the bottom of the stack of open elements,
            // from the current node up to and including formattingElement, then
            // remove formattingElement from the list of active formatting
            // elements, and finally return."
            let Some(furthest_block_index) = furthest_block_index else {
                self.pop_until_node(formatting_element);
                self.remove_active_formatting_element(formatting_element);
                return AdoptionOutcome::Done;
            };
            let furthest_block = self.stack_of_open_elements[furthest_block_index];

            // STEP 4.9: "Let commonAncestor be the element immediately above
            // formattingElement in the stack of open elements."
            let common_ancestor = self.stack_of_open_elements[formatting_index.saturating_sub(1)];

            // STEP 4.10: "Let a bookmark note the position of formattingElement
            // in the list of active formatting elements relative to the
            // elements on either side of it in the list."
            let Some(mut bookmark) = self.active_formatting_position(formatting_element) else {
                return AdoptionOutcome::Done;
            };

            // STEP 4.11: "Let node and lastNode be furthestBlock."
            let mut node_index = furthest_block_index;
            let mut last_node = furthest_block;

            // STEP 4.12: "Let innerLoopCounter be 0."
            let mut inner_loop_counter = 0;

            // STEP 4.13: "While true:"
            loop {
                // STEP 4.13.1: "Increment innerLoopCounter by 1."
                inner_loop_counter += 1;

                // STEP 4.13.2: "Let node be the element immediately above node in
                // the stack of open elements, or if node is no longer in the
                // stack of open elements (e.g. because it got removed by this
                // algorithm), the element that was immediately above node in the
                // stack of open elements before node was removed."
                node_index -= 1;
                let node = self.stack_of_open_elements[node_index];

                // STEP 4.13.3: "If node is formattingElement, then break."
                if node == formatting_element {
                    break;
                }

                // STEP 4.13.4: "If innerLoopCounter is greater than 3 and node is
                // in the list of active formatting elements, then remove node
                // from the list of active formatting elements."
                let mut node_position = self.active_formatting_position(node);
                if inner_loop_counter > 3
                    && let Some(position) = node_position
                {
                    let _ = self.active_formatting_elements.remove(position);
                    if position < bookmark {
                        bookmark -= 1;
                    }
                    node_position = None;
                }

                // STEP 4.13.5: "If node is not in the list of active formatting
                // elements, then remove node from the stack of open elements and
                // continue."
                let Some(node_position) = node_position else {
                    let _ = self.stack_of_open_elements.remove(node_index);
                    continue;
                };

                // STEP 4.13.6: "Create an element for the token for which the
                // element node was created, in the HTML namespace, with
                // commonAncestor as the intended parent; replace the entry for
                // node in the list of active formatting elements with an entry
                // for the new element, replace the entry for node in the stack
                // of open elements with an entry for the new element, and let
                // node be the new element."
                let ActiveFormattingElement::Element { tag, .. } =
                    &self.active_formatting_elements[node_position]
                else {
                    continue;
                };
                let tag = tag.clone();
                let new_element = self.create_element_for_token(&tag, Namespace::Html);
                self.active_formatting_elements[node_position] = ActiveFormattingElement::Element {
                    node_id: new_element,
                    tag,
                };
                self.stack_of_open_elements[node_index] = new_element;

                // STEP 4.13.7: "If lastNode is furthestBlock, then move the
                // aforementioned bookmark to be immediately after the new node
                // in the list of active formatting elements."
                if last_node == furthest_block {
                    bookmark = node_position + 1;
                }

                // STEP 4.13.8: "Append lastNode to node."
                self.tree.append_child(new_element, last_node);

                // STEP 4.13.9: "Set lastNode to node."
                last_node = new_element;
            }

            // STEP 4.14: "Insert whatever lastNode ended up being in the
            // previous step at the appropriate place for inserting a node, but
            // using commonAncestor as the override target."
            let location = self.appropriate_place_for_inserting(Some(common_ancestor));
            self.insert_at(location, last_node);

            // STEP 4.15: "Create an element for the token for which
            // formattingElement was created, in the HTML namespace, with
            // furthestBlock as the intended parent."
            let Some(ActiveFormattingElement::Element { tag, .. }) = self
                .active_formatting_position(formatting_element)
                .map(|position| self.active_formatting_elements[position].clone())
            else {
                return AdoptionOutcome::Done;
            };
            let new_element = self.create_element_for_token(&tag, Namespace::Html);

            // STEP 4.16: "Take all of the child nodes of furthestBlock and
            // append them to the element created in the last step."
            self.tree.move_children(furthest_block, new_element);

            // STEP 4.17: "Append that new element to furthestBlock."
            self.tree.append_child(furthest_block, new_element);

            // STEP 4.18: "Remove formattingElement from the list of active
            // formatting elements, and insert the new element into the list of
            // active formatting elements at the position of the aforementioned
            // bookmark."
            if let Some(position) = self.active_formatting_position(formatting_element) {
                let _ = self.active_formatting_elements.remove(position);
                if position < bookmark {
                    bookmark -= 1;
                }
            }
            let bookmark = bookmark.min(self.active_formatting_elements.len());
            self.active_formatting_elements.insert(
                bookmark,
                ActiveFormattingElement::Element {
                    node_id: new_element,
                    tag,
                },
            );

            // STEP 4.19: "Remove formattingElement from the stack of open
            // elements, and insert the new element into the stack of open
            // elements immediately below the position of furthestBlock in that
            // stack."
            self.remove_from_stack(formatting_element);
            let below_furthest_block = self
                .stack_position(furthest_block)
                .map_or(self.stack_of_open_elements.len(), |index| index + 1);
            self.stack_of_open_elements
                .insert(below_furthest_block, new_element);
        }

        AdoptionOutcome::Done
    }
}
