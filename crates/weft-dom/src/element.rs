//! Element data, namespaces and the element categories the HTML parser
//! consults during tree construction.

use std::collections::HashMap;

use strum_macros::Display;

/// Map of attribute names to values for an element.
///
/// Namespaced attributes on foreign elements are keyed by their qualified
/// name (`xlink:href`, `xml:lang`, `xmlns`).
pub type AttributesMap = HashMap<String, String>;

/// [§ 2.9 Namespaces](https://infra.spec.whatwg.org/#namespaces)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Namespace {
    /// "The HTML namespace is "http://www.w3.org/1999/xhtml"."
    #[strum(serialize = "html")]
    Html,
    /// "The MathML namespace is "http://www.w3.org/1998/Math/MathML"."
    #[strum(serialize = "math")]
    MathMl,
    /// "The SVG namespace is "http://www.w3.org/2000/svg"."
    #[strum(serialize = "svg")]
    Svg,
    /// "The XLink namespace is "http://www.w3.org/1999/xlink"."
    #[strum(serialize = "xlink")]
    XLink,
    /// "The XML namespace is "http://www.w3.org/XML/1998/namespace"."
    #[strum(serialize = "xml")]
    Xml,
    /// "The XMLNS namespace is "http://www.w3.org/2000/xmlns/"."
    #[strum(serialize = "xmlns")]
    Xmlns,
}

impl Namespace {
    /// The namespace URL.
    #[must_use]
    pub const fn url(self) -> &'static str {
        match self {
            Self::Html => "http://www.w3.org/1999/xhtml",
            Self::MathMl => "http://www.w3.org/1998/Math/MathML",
            Self::Svg => "http://www.w3.org/2000/svg",
            Self::XLink => "http://www.w3.org/1999/xlink",
            Self::Xml => "http://www.w3.org/XML/1998/namespace",
            Self::Xmlns => "http://www.w3.org/2000/xmlns/",
        }
    }
}

/// [§ 13.2.6.1 Creating and inserting nodes: special category](https://html.spec.whatwg.org/multipage/parsing.html#special)
const SPECIAL_HTML_ELEMENTS: &[&str] = &[
    "address",
    "applet",
    "area",
    "article",
    "aside",
    "base",
    "basefont",
    "bgsound",
    "blockquote",
    "body",
    "br",
    "button",
    "caption",
    "center",
    "col",
    "colgroup",
    "dd",
    "details",
    "dir",
    "div",
    "dl",
    "dt",
    "embed",
    "fieldset",
    "figcaption",
    "figure",
    "footer",
    "form",
    "frame",
    "frameset",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "head",
    "header",
    "hgroup",
    "hr",
    "html",
    "iframe",
    "img",
    "input",
    "keygen",
    "li",
    "link",
    "listing",
    "main",
    "marquee",
    "menu",
    "meta",
    "nav",
    "noembed",
    "noframes",
    "noscript",
    "object",
    "ol",
    "p",
    "param",
    "plaintext",
    "pre",
    "script",
    "search",
    "section",
    "select",
    "source",
    "style",
    "summary",
    "table",
    "tbody",
    "td",
    "template",
    "textarea",
    "tfoot",
    "th",
    "thead",
    "title",
    "tr",
    "track",
    "ul",
    "wbr",
    "xmp",
];

/// Element-specific data.
///
/// Per [§ 4.9 Interface Element](https://dom.spec.whatwg.org/#interface-element):
/// - "Elements have an associated namespace, namespace prefix, local name, custom element state,
///    custom element definition, is value."
/// - "When an element is created, its local name is always given."
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementData {
    /// "An element's local name"
    pub tag_name: String,
    /// "An element's namespace"
    pub namespace: Namespace,
    /// "An element has an associated attribute list"
    pub attrs: AttributesMap,
}

impl ElementData {
    /// Create element data for `tag_name` in `namespace`.
    #[must_use]
    pub fn new(tag_name: &str, namespace: Namespace, attrs: AttributesMap) -> Self {
        Self {
            tag_name: tag_name.to_string(),
            namespace,
            attrs,
        }
    }

    /// The element's local name.
    #[must_use]
    pub fn local_name(&self) -> &str {
        &self.tag_name
    }

    /// True if this is an HTML element with the given local name.
    #[must_use]
    pub fn is_html_element(&self, name: &str) -> bool {
        self.namespace == Namespace::Html && self.tag_name == name
    }

    /// True if this is a MathML element with the given local name.
    #[must_use]
    pub fn is_mathml_element(&self, name: &str) -> bool {
        self.namespace == Namespace::MathMl && self.tag_name == name
    }

    /// True if this is an SVG element with the given local name.
    #[must_use]
    pub fn is_svg_element(&self, name: &str) -> bool {
        self.namespace == Namespace::Svg && self.tag_name == name
    }

    /// True if this is an HTML element whose local name is one of `names`.
    #[must_use]
    pub fn is_html_element_in(&self, names: &[&str]) -> bool {
        self.namespace == Namespace::Html && names.contains(&self.tag_name.as_str())
    }

    /// [§ 13.2.4.2 The stack of open elements](https://html.spec.whatwg.org/multipage/parsing.html#special)
    ///
    /// "The following elements have varying levels of special parsing rules:
    /// HTML's address, applet, area, ... ; MathML mi, MathML mo, MathML mn,
    /// MathML ms, MathML mtext, and MathML annotation-xml; and SVG
    /// foreignObject, SVG desc, and SVG title."
    #[must_use]
    pub fn is_special(&self) -> bool {
        match self.namespace {
            Namespace::Html => SPECIAL_HTML_ELEMENTS.contains(&self.tag_name.as_str()),
            Namespace::MathMl => matches!(
                self.tag_name.as_str(),
                "mi" | "mo" | "mn" | "ms" | "mtext" | "annotation-xml"
            ),
            Namespace::Svg => matches!(self.tag_name.as_str(), "foreignObject" | "desc" | "title"),
            _ => false,
        }
    }

    /// [§ 13.2.6 MathML text integration point](https://html.spec.whatwg.org/multipage/parsing.html#mathml-text-integration-point)
    ///
    /// "A node is a MathML text integration point if it is one of the
    /// following elements: A MathML mi element, A MathML mo element, A MathML
    /// mn element, A MathML ms element, A MathML mtext element"
    #[must_use]
    pub fn is_mathml_text_integration_point(&self) -> bool {
        self.namespace == Namespace::MathMl
            && matches!(self.tag_name.as_str(), "mi" | "mo" | "mn" | "ms" | "mtext")
    }

    /// [§ 13.2.6 HTML integration point](https://html.spec.whatwg.org/multipage/parsing.html#html-integration-point)
    ///
    /// "A MathML annotation-xml element whose start tag token had an attribute
    /// with the name "encoding" whose value was an ASCII case-insensitive match
    /// for the string "text/html" [or] "application/xhtml+xml"; An SVG
    /// foreignObject element; An SVG desc element; An SVG title element"
    #[must_use]
    pub fn is_html_integration_point(&self) -> bool {
        match self.namespace {
            Namespace::MathMl if self.tag_name == "annotation-xml" => {
                self.attrs.get("encoding").is_some_and(|encoding| {
                    encoding.eq_ignore_ascii_case("text/html")
                        || encoding.eq_ignore_ascii_case("application/xhtml+xml")
                })
            }
            Namespace::Svg => matches!(self.tag_name.as_str(), "foreignObject" | "desc" | "title"),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(name: &str, namespace: Namespace) -> ElementData {
        ElementData::new(name, namespace, AttributesMap::new())
    }

    #[test]
    fn test_special_depends_on_namespace() {
        assert!(element("p", Namespace::Html).is_special());
        assert!(!element("p", Namespace::Svg).is_special());
        assert!(element("foreignObject", Namespace::Svg).is_special());
        assert!(element("mtext", Namespace::MathMl).is_special());
        assert!(!element("span", Namespace::Html).is_special());
    }

    #[test]
    fn test_annotation_xml_integration_point_needs_encoding() {
        let plain = element("annotation-xml", Namespace::MathMl);
        assert!(!plain.is_html_integration_point());

        let mut attrs = AttributesMap::new();
        let _ = attrs.insert("encoding".to_string(), "Text/HTML".to_string());
        let html = ElementData::new("annotation-xml", Namespace::MathMl, attrs);
        assert!(html.is_html_integration_point());
    }
}
