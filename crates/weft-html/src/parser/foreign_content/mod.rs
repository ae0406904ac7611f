//! Foreign content: SVG and MathML subtrees.
//!
//! [§ 13.2.6.3 Creating and inserting nodes](https://html.spec.whatwg.org/multipage/parsing.html#creating-and-inserting-nodes)
//! [§ 13.2.6.5 The rules for parsing tokens in foreign content](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inforeign)

pub mod mathml;
pub mod svg;

pub use mathml::adjust_mathml_attributes;
pub use svg::{adjust_svg_attributes, adjust_svg_tag_name};

use weft_dom::Namespace;

use crate::error::ParseErrorCode;
use crate::parser::core::HTMLParser;
use crate::tokenizer::TagKind::{End, Start};
use crate::tokenizer::{Attribute, Tag, Token};

/// [§ 13.2.6.3 Adjust foreign attributes](https://html.spec.whatwg.org/multipage/parsing.html#adjust-foreign-attributes)
///
/// "if any of the attributes on the token match the strings given in the
/// first column of the following table, let the attribute be a namespaced
/// attribute, with the prefix being the string given in the corresponding
/// cell in the second column, the local name being the string given in the
/// corresponding cell in the third column, and the namespace being the
/// namespace given in the corresponding cell in the fourth column."
///
/// Format: (`attribute_name`, prefix, `local_name`, namespace)
const FOREIGN_ATTRIBUTE_ADJUSTMENTS: &[(&str, Option<&str>, &str, Namespace)] = &[
    ("xlink:actuate", Some("xlink"), "actuate", Namespace::XLink),
    ("xlink:arcrole", Some("xlink"), "arcrole", Namespace::XLink),
    ("xlink:href", Some("xlink"), "href", Namespace::XLink),
    ("xlink:role", Some("xlink"), "role", Namespace::XLink),
    ("xlink:show", Some("xlink"), "show", Namespace::XLink),
    ("xlink:title", Some("xlink"), "title", Namespace::XLink),
    ("xlink:type", Some("xlink"), "type", Namespace::XLink),
    ("xml:lang", Some("xml"), "lang", Namespace::Xml),
    ("xml:space", Some("xml"), "space", Namespace::Xml),
    ("xmlns", None, "xmlns", Namespace::Xmlns),
    ("xmlns:xlink", Some("xmlns"), "xlink", Namespace::Xmlns),
];

/// Split `xlink:href` style attributes into prefix, local name and
/// namespace. Unlisted attributes are left alone.
pub fn adjust_foreign_attributes(attributes: &mut [Attribute]) {
    for attr in attributes {
        let Some(&(_, prefix, local_name, namespace)) = FOREIGN_ATTRIBUTE_ADJUSTMENTS
            .iter()
            .find(|(name, ..)| *name == attr.name)
        else {
            continue;
        };
        attr.prefix = prefix.map(str::to_string);
        attr.name = local_name.to_string();
        attr.namespace = Some(namespace);
    }
}

/// Start tags that break out of foreign content back into HTML.
const BREAKOUT_START_TAGS: &[&str] = &[
    "b",
    "big",
    "blockquote",
    "body",
    "br",
    "center",
    "code",
    "dd",
    "div",
    "dl",
    "dt",
    "em",
    "embed",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "head",
    "hr",
    "i",
    "img",
    "li",
    "listing",
    "menu",
    "meta",
    "nobr",
    "ol",
    "p",
    "pre",
    "ruby",
    "s",
    "small",
    "span",
    "strong",
    "strike",
    "sub",
    "sup",
    "table",
    "tt",
    "u",
    "ul",
    "var",
];

fn is_breakout_tag(tag: &Tag) -> bool {
    match tag.kind {
        Start => {
            BREAKOUT_START_TAGS.contains(&tag.name.as_str())
                || (tag.name == "font"
                    && ["color", "face", "size"]
                        .iter()
                        .any(|name| tag.attribute(name).is_some()))
        }
        End => matches!(tag.name.as_str(), "br" | "p"),
    }
}

impl HTMLParser {
    /// [§ 13.2.6.5 The rules for parsing tokens in foreign content](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inforeign)
    pub(in crate::parser) fn handle_foreign_content(&mut self, token: &Token) {
        match token {
            // "A character token that is U+0000 NULL: Parse error. Insert a
            // U+FFFD REPLACEMENT CHARACTER character."
            Token::Character('\0') => {
                self.token_error(ParseErrorCode::UnexpectedNullCharacter, token);
                self.insert_character('\u{FFFD}');
            }

            // "A character token that is one of U+0009 CHARACTER TABULATION,
            // U+000A LINE FEED (LF), U+000C FORM FEED (FF), U+000D CARRIAGE
            // RETURN (CR), or U+0020 SPACE: Insert the token's character."
            Token::Character(c) if Self::is_whitespace(*c) => self.insert_character(*c),

            // "Any other character token: Insert the token's character. Set
            // the frameset-ok flag to "not ok"."
            Token::Character(c) => {
                self.insert_character(*c);
                self.frameset_ok = false;
            }

            // "A comment token: Insert a comment."
            Token::Comment(data) => self.insert_comment(data),

            // "A DOCTYPE token: Parse error. Ignore the token."
            Token::Doctype(_) => self.token_error(ParseErrorCode::UnexpectedDoctype, token),

            // "While the current node is not a MathML text integration point,
            // an HTML integration point, or an element in the HTML namespace,
            // pop elements from the stack of open elements. Reprocess the
            // token according to the rules given in the section corresponding
            // to the current insertion mode in HTML content."
            Token::Tag(tag) if is_breakout_tag(tag) => {
                self.unexpected_token(token);
                self.pop_until_html_or_integration_point();
                self.process_using_rules_for(self.insertion_mode, token);
            }

            Token::Tag(tag) if tag.is_start() => self.foreign_start_tag(tag),

            // "An end tag whose tag name is "script", if the current node is an
            // SVG script element: Pop the current node off the stack of open
            // elements."
            Token::Tag(tag)
                if tag.name == "script"
                    && self
                        .current_node()
                        .and_then(|id| self.tree.as_element(id))
                        .is_some_and(|element| element.is_svg_element("script")) =>
            {
                let _ = self.pop_current_node();
            }

            Token::Tag(tag) => self.foreign_end_tag(tag, token),

            // The dispatcher never routes end-of-file here.
            Token::EndOfFile => self.process_using_rules_for(self.insertion_mode, token),
        }
    }

    fn pop_until_html_or_integration_point(&mut self) {
        while let Some(current) = self.current_node() {
            let Some(element) = self.tree.as_element(current) else {
                break;
            };
            if element.namespace == Namespace::Html
                || element.is_mathml_text_integration_point()
                || element.is_html_integration_point()
            {
                break;
            }
            let _ = self.pop_current_node();
        }
    }

    /// "Any other start tag"
    fn foreign_start_tag(&mut self, tag: &Tag) {
        let namespace = self
            .adjusted_current_node()
            .and_then(|id| self.tree.as_element(id))
            .map_or(Namespace::Html, |element| element.namespace);

        // "If the adjusted current node is an element in the MathML namespace,
        // adjust MathML attributes for the token. If the adjusted current node
        // is an element in the SVG namespace, and the token's tag name is one
        // of the ones in the first column of the following table, change the
        // tag name ... If the adjusted current node is an element in the SVG
        // namespace, adjust SVG attributes for the token."
        let mut tag = tag.clone();
        match namespace {
            Namespace::MathMl => adjust_mathml_attributes(&mut tag.attributes),
            Namespace::Svg => {
                adjust_svg_tag_name(&mut tag);
                adjust_svg_attributes(&mut tag.attributes);
            }
            _ => {}
        }

        // "Adjust foreign attributes for the token. Insert a foreign element
        // for the token, with adjusted current node's namespace and false."
        adjust_foreign_attributes(&mut tag.attributes);
        let _ = self.insert_foreign_element(&tag, namespace);

        // "If the token has its self-closing flag set, then run the
        // appropriate steps from the following list: If the token's tag name
        // is "script", and the new current node is in the SVG namespace:
        // Acknowledge the token's self-closing flag, and then act as
        // described in the steps for a "script" end tag below. Otherwise: Pop
        // the current node off the stack of open elements and acknowledge the
        // token's self-closing flag."
        if tag.self_closing {
            let _ = self.pop_current_node();
            self.acknowledge_self_closing_flag();
        }
    }

    /// "Any other end tag"
    fn foreign_end_tag(&mut self, tag: &Tag, token: &Token) {
        // STEP 1: "Initialize node to be the current node (the bottommost
        // node of the stack)."
        let Some(mut index) = self.stack_of_open_elements.len().checked_sub(1) else {
            return;
        };

        // STEP 2: "If node's tag name, converted to ASCII lowercase, is not
        // the same as the tag name of the token, then this is a parse error."
        if !self
            .local_name(self.stack_of_open_elements[index])
            .eq_ignore_ascii_case(&tag.name)
        {
            self.token_error(ParseErrorCode::UnexpectedEndTag, token);
        }

        loop {
            // STEP 3: "Loop: If node is the topmost element in the stack of
            // open elements, then return. (fragment case)"
            if index == 0 {
                return;
            }

            // STEP 4: "If node's tag name, converted to ASCII lowercase, is
            // the same as the tag name of the token, pop elements from the
            // stack of open elements until node has been popped from the
            // stack, and then return."
            let node = self.stack_of_open_elements[index];
            if self.local_name(node).eq_ignore_ascii_case(&tag.name) {
                self.pop_until_node(node);
                return;
            }

            // STEP 5: "Set node to the previous entry in the stack of open
            // elements."
            index -= 1;

            // STEP 6: "If node is not an element in the HTML namespace, return
            // to the step labeled loop."
            let is_html = self
                .tree
                .as_element(self.stack_of_open_elements[index])
                .is_some_and(|element| element.namespace == Namespace::Html);
            if !is_html {
                continue;
            }

            // STEP 7: "Otherwise, process the token according to the rules
            // given in the section corresponding to the current insertion
            // mode in HTML content."
            self.process_using_rules_for(self.insertion_mode, token);
            return;
        }
    }

    /// Insert a `<math>` or `<svg>` start tag seen in HTML content.
    ///
    /// "Adjust MathML attributes for the token [or] Adjust SVG attributes for
    /// the token. Adjust foreign attributes for the token. Insert a foreign
    /// element for the token, with [the] namespace. If the token has its
    /// self-closing flag set, pop the current node off the stack of open
    /// elements and acknowledge the token's self-closing flag."
    pub(in crate::parser) fn insert_foreign_start_tag(&mut self, tag: &Tag, namespace: Namespace) {
        let mut tag = tag.clone();
        if namespace == Namespace::Svg {
            adjust_svg_attributes(&mut tag.attributes);
        } else {
            adjust_mathml_attributes(&mut tag.attributes);
        }
        adjust_foreign_attributes(&mut tag.attributes);
        let _ = self.insert_foreign_element(&tag, namespace);
        if tag.self_closing {
            let _ = self.pop_current_node();
            self.acknowledge_self_closing_flag();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xlink_href_is_namespaced() {
        let mut attributes = vec![
            Attribute::new("xlink:href".to_string(), "#a".to_string()),
            Attribute::new("xmlns".to_string(), "http://www.w3.org/2000/svg".to_string()),
            Attribute::new("width".to_string(), "4".to_string()),
        ];
        adjust_foreign_attributes(&mut attributes);

        assert_eq!(attributes[0].name, "href");
        assert_eq!(attributes[0].prefix.as_deref(), Some("xlink"));
        assert_eq!(attributes[0].namespace, Some(Namespace::XLink));
        assert_eq!(attributes[0].qualified_name(), "xlink:href");

        assert_eq!(attributes[1].prefix, None);
        assert_eq!(attributes[1].namespace, Some(Namespace::Xmlns));
        assert_eq!(attributes[1].qualified_name(), "xmlns");

        assert_eq!(attributes[2].namespace, None);
    }

    #[test]
    fn test_font_breaks_out_only_with_presentational_attributes() {
        let mut font = Tag::start("font");
        assert!(!is_breakout_tag(&font));
        font.attributes
            .push(Attribute::new("color".to_string(), "red".to_string()));
        assert!(is_breakout_tag(&font));
        assert!(is_breakout_tag(&Tag::end("p")));
        assert!(!is_breakout_tag(&Tag::end("div")));
    }
}
