//! [§ 13.2.4.2 The stack of open elements](https://html.spec.whatwg.org/multipage/parsing.html#the-stack-of-open-elements)
//!
//! "Initially, the stack of open elements is empty. The stack grows downwards;
//! the topmost node on the stack is the first one added to the stack, and the
//! bottommost node of the stack is the most recently added node in the stack."

use weft_dom::{Namespace, NodeId};

use super::core::HTMLParser;

/// [§ 13.2.4.2](https://html.spec.whatwg.org/multipage/parsing.html#has-an-element-in-the-specific-scope)
///
/// Which element types terminate an "in scope" search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Scope {
    /// "has an element in scope"
    Default,
    /// "has an element in list item scope"
    ListItem,
    /// "has an element in button scope"
    Button,
    /// "has an element in table scope"
    Table,
    /// "has an element in select scope"
    Select,
}

impl Scope {
    /// True if an element named `name` in `namespace` ends the search.
    fn is_boundary(self, name: &str, namespace: Namespace) -> bool {
        // "The stack of open elements is said to have an element target node in
        // a specific scope consisting of a list of element types list when the
        // following algorithm terminates in a match state:"
        //
        // "applet, caption, html, table, td, th, marquee, object, template,
        // MathML mi, MathML mo, MathML mn, MathML ms, MathML mtext, MathML
        // annotation-xml, SVG foreignObject, SVG desc, SVG title"
        let default_boundary = || match namespace {
            Namespace::Html => matches!(
                name,
                "applet"
                    | "caption"
                    | "html"
                    | "table"
                    | "td"
                    | "th"
                    | "marquee"
                    | "object"
                    | "template"
            ),
            Namespace::MathMl => matches!(name, "mi" | "mo" | "mn" | "ms" | "mtext" | "annotation-xml"),
            Namespace::Svg => matches!(name, "foreignObject" | "desc" | "title"),
            _ => false,
        };
        let is_html = namespace == Namespace::Html;

        match self {
            Self::Default => default_boundary(),
            // "the list of element types that make up the default scope, plus:
            // ol in the HTML namespace, ul in the HTML namespace"
            Self::ListItem => default_boundary() || (is_html && matches!(name, "ol" | "ul")),
            // "plus: button in the HTML namespace"
            Self::Button => default_boundary() || (is_html && name == "button"),
            // "html in the HTML namespace, table in the HTML namespace,
            // template in the HTML namespace"
            Self::Table => is_html && matches!(name, "html" | "table" | "template"),
            // "all element types except the following: optgroup in the HTML
            // namespace, option in the HTML namespace"
            Self::Select => !(is_html && matches!(name, "optgroup" | "option")),
        }
    }
}

// =============================================================================
// Current node and popping
// =============================================================================

impl HTMLParser {
    /// [§ 13.2.4.2](https://html.spec.whatwg.org/multipage/parsing.html#current-node)
    ///
    /// "The current node is the bottommost node in this stack of open elements."
    pub(super) fn current_node(&self) -> Option<NodeId> {
        self.stack_of_open_elements.last().copied()
    }

    /// [§ 13.2.4.2](https://html.spec.whatwg.org/multipage/parsing.html#adjusted-current-node)
    ///
    /// "The adjusted current node is the context element if the parser was
    /// created as part of the HTML fragment parsing algorithm and the stack of
    /// open elements has only one element in it (fragment case); otherwise,
    /// the adjusted current node is the current node."
    pub(super) fn adjusted_current_node(&self) -> Option<NodeId> {
        match self.context_element {
            Some(context) if self.stack_of_open_elements.len() == 1 => Some(context),
            _ => self.current_node(),
        }
    }

    /// Pop the current node off the stack of open elements and notify the
    /// pop observer.
    pub(super) fn pop_current_node(&mut self) -> Option<NodeId> {
        let popped = self.stack_of_open_elements.pop()?;
        if let Some(observer) = self.pop_observer.as_mut() {
            observer(&self.tree, popped);
        }
        Some(popped)
    }

    /// "Pop elements from the stack of open elements until an HTML element
    /// with the same tag name as the token has been popped from the stack."
    pub(super) fn pop_until_html_element(&mut self, name: &str) {
        while let Some(popped) = self.pop_current_node() {
            if self.is_html_element(popped, name) {
                break;
            }
        }
    }

    /// "Pop elements from the stack of open elements until an h1, h2, h3, h4,
    /// h5, or h6 element has been popped from the stack."
    pub(super) fn pop_until_one_of(&mut self, names: &[&str]) {
        while let Some(popped) = self.pop_current_node() {
            if self.is_html_element_in(popped, names) {
                break;
            }
        }
    }

    /// "Pop all the nodes from the current node up to node, including node,
    /// then stop these steps."
    pub(super) fn pop_until_node(&mut self, node: NodeId) {
        if !self.stack_of_open_elements.contains(&node) {
            return;
        }
        while let Some(popped) = self.pop_current_node() {
            if popped == node {
                break;
            }
        }
    }

    /// Remove `node` from wherever it is in the stack, without the pop
    /// observer seeing it as a pop.
    pub(super) fn remove_from_stack(&mut self, node: NodeId) {
        self.stack_of_open_elements.retain(|&id| id != node);
    }

    /// Index of `node` in the stack of open elements.
    pub(super) fn stack_position(&self, node: NodeId) -> Option<usize> {
        self.stack_of_open_elements.iter().position(|&id| id == node)
    }

    /// True if the stack holds an HTML element called `name` anywhere.
    pub(super) fn stack_contains(&self, name: &str) -> bool {
        self.stack_of_open_elements
            .iter()
            .any(|&id| self.is_html_element(id, name))
    }
}

// =============================================================================
// Scope queries
// =============================================================================

impl HTMLParser {
    /// [§ 13.2.4.2 Has an element in the specific scope](https://html.spec.whatwg.org/multipage/parsing.html#has-an-element-in-the-specific-scope)
    ///
    /// "1. Initialize node to be the current node (the bottommost node of the
    /// stack).
    /// 2. If node is the target node, terminate in a match state.
    /// 3. Otherwise, if node is one of the element types in list, terminate in
    /// a failure state.
    /// 4. Otherwise, set node to the previous entry in the stack of open
    /// elements and return to step 2. (This will never fail, since the loop
    /// will always terminate in the previous step if the top of the stack, an
    /// html element, is reached.)"
    ///
    /// Matches any HTML element whose local name is in `targets`.
    pub(super) fn has_element_in_specific_scope(&self, targets: &[&str], scope: Scope) -> bool {
        for &node in self.stack_of_open_elements.iter().rev() {
            let Some(element) = self.tree.as_element(node) else {
                continue;
            };
            if element.is_html_element_in(targets) {
                return true;
            }
            if scope.is_boundary(&element.tag_name, element.namespace) {
                return false;
            }
        }
        false
    }

    /// "has an element in scope"
    pub(super) fn has_element_in_scope(&self, name: &str) -> bool {
        self.has_element_in_specific_scope(&[name], Scope::Default)
    }

    /// "has an element in scope" for any of several names (h1-h6).
    pub(super) fn has_any_element_in_scope(&self, names: &[&str]) -> bool {
        self.has_element_in_specific_scope(names, Scope::Default)
    }

    /// "has an element in list item scope"
    pub(super) fn has_element_in_list_item_scope(&self, name: &str) -> bool {
        self.has_element_in_specific_scope(&[name], Scope::ListItem)
    }

    /// "has an element in button scope"
    pub(super) fn has_element_in_button_scope(&self, name: &str) -> bool {
        self.has_element_in_specific_scope(&[name], Scope::Button)
    }

    /// "has an element in table scope"
    pub(super) fn has_element_in_table_scope(&self, name: &str) -> bool {
        self.has_element_in_specific_scope(&[name], Scope::Table)
    }

    /// "has an element in table scope" for any of several names.
    pub(super) fn has_any_element_in_table_scope(&self, names: &[&str]) -> bool {
        self.has_element_in_specific_scope(names, Scope::Table)
    }

    /// "has an element in select scope"
    pub(super) fn has_element_in_select_scope(&self, name: &str) -> bool {
        self.has_element_in_specific_scope(&[name], Scope::Select)
    }

    /// "If node is not in the stack of open elements ... has an element in
    /// scope" with a specific node as the target (the form element pointer).
    pub(super) fn has_node_in_scope(&self, target: NodeId) -> bool {
        for &node in self.stack_of_open_elements.iter().rev() {
            if node == target {
                return true;
            }
            if let Some(element) = self.tree.as_element(node)
                && Scope::Default.is_boundary(&element.tag_name, element.namespace)
            {
                return false;
            }
        }
        false
    }
}

// =============================================================================
// Clearing the stack back to a context
// =============================================================================

impl HTMLParser {
    fn clear_stack_back_to(&mut self, names: &[&str]) {
        while let Some(current) = self.current_node() {
            if self.is_html_element_in(current, names) {
                break;
            }
            let _ = self.pop_current_node();
        }
    }

    /// [§ 13.2.6.4.9](https://html.spec.whatwg.org/multipage/parsing.html#clear-the-stack-back-to-a-table-context)
    ///
    /// "When the steps above require the UA to clear the stack back to a table
    /// context, it means that the UA must, while the current node is not a
    /// table, template, or html element, pop elements from the stack of open
    /// elements."
    pub(super) fn clear_stack_back_to_table_context(&mut self) {
        self.clear_stack_back_to(&["table", "template", "html"]);
    }

    /// [§ 13.2.6.4.13](https://html.spec.whatwg.org/multipage/parsing.html#clear-the-stack-back-to-a-table-body-context)
    ///
    /// "while the current node is not a tbody, tfoot, thead, template, or html
    /// element, pop elements from the stack of open elements."
    pub(super) fn clear_stack_back_to_table_body_context(&mut self) {
        self.clear_stack_back_to(&["tbody", "tfoot", "thead", "template", "html"]);
    }

    /// [§ 13.2.6.4.14](https://html.spec.whatwg.org/multipage/parsing.html#clear-the-stack-back-to-a-table-row-context)
    ///
    /// "while the current node is not a tr, template, or html element, pop
    /// elements from the stack of open elements."
    pub(super) fn clear_stack_back_to_table_row_context(&mut self) {
        self.clear_stack_back_to(&["tr", "template", "html"]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_scope_ignores_default_boundaries() {
        assert!(!Scope::Table.is_boundary("td", Namespace::Html));
        assert!(Scope::Table.is_boundary("table", Namespace::Html));
        assert!(Scope::Default.is_boundary("td", Namespace::Html));
    }

    #[test]
    fn test_boundaries_are_namespace_aware() {
        assert!(Scope::Default.is_boundary("foreignObject", Namespace::Svg));
        assert!(!Scope::Default.is_boundary("foreignObject", Namespace::Html));
        assert!(!Scope::Default.is_boundary("title", Namespace::Html));
        assert!(Scope::Default.is_boundary("annotation-xml", Namespace::MathMl));
    }

    #[test]
    fn test_list_item_and_button_scope_extend_default() {
        assert!(Scope::ListItem.is_boundary("ul", Namespace::Html));
        assert!(!Scope::Default.is_boundary("ul", Namespace::Html));
        assert!(Scope::Button.is_boundary("button", Namespace::Html));
        assert!(Scope::Button.is_boundary("marquee", Namespace::Html));
    }

    #[test]
    fn test_select_scope_is_everything_but_options() {
        assert!(!Scope::Select.is_boundary("option", Namespace::Html));
        assert!(!Scope::Select.is_boundary("optgroup", Namespace::Html));
        assert!(Scope::Select.is_boundary("div", Namespace::Html));
        assert!(Scope::Select.is_boundary("option", Namespace::Svg));
    }

    #[test]
    fn test_scope_queries_do_not_mutate() {
        let mut parser = HTMLParser::new("<div><p><b>x");
        let html = parser.tree.create_element("html", Namespace::Html, Default::default());
        let p = parser.tree.create_element("p", Namespace::Html, Default::default());
        parser.stack_of_open_elements = vec![html, p];

        assert!(parser.has_element_in_button_scope("p"));
        assert!(parser.has_element_in_button_scope("p"));
        assert_eq!(parser.stack_of_open_elements, vec![html, p]);
        assert!(!parser.has_element_in_table_scope("td"));
    }
}
