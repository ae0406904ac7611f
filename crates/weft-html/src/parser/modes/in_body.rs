//! [§ 13.2.6.4.7 The "in body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)

use weft_dom::{Namespace, QuirksMode};

use crate::error::ParseErrorCode;
use crate::parser::adoption_agency::AdoptionOutcome;
use crate::parser::core::{HTMLParser, InsertionMode, is_hidden_input};
use crate::tokenizer::TagKind::Start;
use crate::tokenizer::{Tag, Token, TokenizerState};

/// Start tags that close an open `p` and insert a block element.
const BLOCK_START_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "center", "details", "dialog", "dir", "div", "dl",
    "fieldset", "figcaption", "figure", "footer", "header", "hgroup", "main", "menu", "nav", "ol",
    "p", "search", "section", "summary", "ul",
];

/// End tags that close a block element in scope.
const BLOCK_END_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "button", "center", "details", "dialog", "dir",
    "div", "dl", "fieldset", "figcaption", "figure", "footer", "header", "hgroup", "listing",
    "main", "menu", "nav", "ol", "pre", "search", "section", "summary", "ul",
];

const HEADINGS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6"];

/// "b", "big", "code", "em", "font", "i", "s", "small", "strike", "strong",
/// "tt", "u"
const FORMATTING_START_TAGS: &[&str] = &[
    "b", "big", "code", "em", "font", "i", "s", "small", "strike", "strong", "tt", "u",
];

/// End tags handled by the adoption agency algorithm.
const FORMATTING_END_TAGS: &[&str] = &[
    "a", "b", "big", "code", "em", "font", "i", "nobr", "s", "small", "strike", "strong", "tt",
    "u",
];

/// Elements that may legitimately still be open at the end of the body.
const ALLOWED_OPEN_AT_BODY_END: &[&str] = &[
    "dd", "dt", "li", "optgroup", "option", "p", "rb", "rp", "rt", "rtc", "tbody", "td", "tfoot",
    "th", "thead", "tr", "body", "html",
];

impl HTMLParser {
    /// [§ 13.2.6.4.7 The "in body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
    pub(in crate::parser) fn handle_in_body_mode(&mut self, token: &Token) {
        match token {
            // "A character token that is U+0000 NULL: Parse error. Ignore the
            // token."
            Token::Character('\0') => {
                self.token_error(ParseErrorCode::UnexpectedNullCharacter, token);
            }

            // "A character token that is one of U+0009 CHARACTER TABULATION,
            // ... or U+0020 SPACE: Reconstruct the active formatting elements,
            // if any. Insert the token's character."
            Token::Character(c) if Self::is_whitespace(*c) => {
                self.reconstruct_active_formatting_elements();
                self.insert_character(*c);
            }

            // "Any other character token: Reconstruct the active formatting
            // elements, if any. Insert the token's character. Set the
            // frameset-ok flag to "not ok"."
            Token::Character(c) => {
                self.reconstruct_active_formatting_elements();
                self.insert_character(*c);
                self.frameset_ok = false;
            }

            // "A comment token: Insert a comment."
            Token::Comment(data) => self.insert_comment(data),

            // "A DOCTYPE token: Parse error. Ignore the token."
            Token::Doctype(_) => self.token_error(ParseErrorCode::UnexpectedDoctype, token),

            // "An end-of-file token"
            Token::EndOfFile => self.in_body_end_of_file(token),

            Token::Tag(tag) if tag.kind == Start => self.in_body_start_tag(tag, token),
            Token::Tag(tag) => self.in_body_end_tag(tag, token),
        }
    }

    /// "An end-of-file token: If the stack of template insertion modes is not
    /// empty, then process the token using the rules for the "in template"
    /// insertion mode. Otherwise, follow these steps: If there is a node in the
    /// stack of open elements that is not either a dd element, a dt element,
    /// ... or the html element, then this is a parse error. Stop parsing."
    fn in_body_end_of_file(&mut self, token: &Token) {
        if !self.template_insertion_modes.is_empty() {
            self.process_using_rules_for(InsertionMode::InTemplate, token);
            return;
        }
        self.report_unclosed_elements(token);
        self.stop_parsing();
    }

    /// Parse error if an element other than the ones allowed to stay open at
    /// the end of the body is still on the stack.
    fn report_unclosed_elements(&mut self, token: &Token) {
        let unclosed = self
            .stack_of_open_elements
            .iter()
            .any(|&id| !self.is_html_element_in(id, ALLOWED_OPEN_AT_BODY_END));
        if unclosed {
            self.token_error(ParseErrorCode::EofInElement, token);
        }
    }

    fn in_body_start_tag(&mut self, tag: &Tag, token: &Token) {
        match tag.name.as_str() {
            // "A start tag whose tag name is "html": Parse error. If there is a
            // template element on the stack of open elements, then ignore the
            // token. Otherwise, for each attribute on the token, check to see
            // if the attribute is already present on the top element of the
            // stack of open elements. If it is not, add the attribute and its
            // corresponding value to that element."
            "html" => {
                self.token_error(ParseErrorCode::UnexpectedStartTag, token);
                if self.stack_contains("template") {
                    return;
                }
                if let Some(&html) = self.stack_of_open_elements.first() {
                    self.merge_missing_attributes(html, tag);
                }
            }

            // "A start tag whose tag name is one of: "base", "basefont",
            // "bgsound", "link", "meta", "noframes", "script", "style",
            // "template", "title": Process the token using the rules for the
            // "in head" insertion mode."
            "base" | "basefont" | "bgsound" | "link" | "meta" | "noframes" | "script" | "style"
            | "template" | "title" => self.process_using_rules_for(InsertionMode::InHead, token),

            // "A start tag whose tag name is "body": Parse error. If the second
            // element on the stack of open elements is not a body element, if
            // the stack of open elements has only one node on it, or if there
            // is a template element on the stack of open elements, then ignore
            // the token. (fragment case or there is a template element on the
            // stack) Otherwise, set the frameset-ok flag to "not ok"; then, for
            // each attribute on the token, check to see if the attribute is
            // already present on the body element (the second element) on the
            // stack of open elements, and if it is not, add the attribute and
            // its corresponding value to that element."
            "body" => {
                self.token_error(ParseErrorCode::UnexpectedStartTag, token);
                let Some(&body) = self.stack_of_open_elements.get(1) else {
                    return;
                };
                if !self.is_html_element(body, "body") || self.stack_contains("template") {
                    return;
                }
                self.frameset_ok = false;
                self.merge_missing_attributes(body, tag);
            }

            // "A start tag whose tag name is "frameset""
            "frameset" => {
                // "Parse error."
                self.token_error(ParseErrorCode::UnexpectedStartTag, token);

                // "If the stack of open elements has only one node on it, or if
                // the second element on the stack of open elements is not a
                // body element, then ignore the token. (fragment case or there
                // is a template element on the stack)"
                let Some(&body) = self.stack_of_open_elements.get(1) else {
                    return;
                };
                if !self.is_html_element(body, "body") {
                    return;
                }

                // "If the frameset-ok flag is set to "not ok", ignore the token."
                if !self.frameset_ok {
                    return;
                }

                // "Otherwise, run the following steps:
                // 1. Remove the second element on the stack of open elements
                //    from its parent node, if it has one.
                // 2. Pop all the nodes from the bottom of the stack of open
                //    elements, from the current node up to, but not including,
                //    the root html element.
                // 3. Insert an HTML element for the token.
                // 4. Switch the insertion mode to "in frameset"."
                if let Some(parent) = self.tree.parent(body) {
                    self.tree.remove_child(parent, body);
                }
                while self.stack_of_open_elements.len() > 1 {
                    let _ = self.pop_current_node();
                }
                let _ = self.insert_html_element(tag);
                self.insertion_mode = InsertionMode::InFrameset;
            }

            // "A start tag whose tag name is one of: "address", "article",
            // "aside", ... "ul": If the stack of open elements has a p element
            // in button scope, then close a p element. Insert an HTML element
            // for the token."
            name if BLOCK_START_TAGS.contains(&name) => {
                self.close_p_element_in_button_scope();
                let _ = self.insert_html_element(tag);
            }

            // "A start tag whose tag name is one of: "h1", "h2", "h3", "h4",
            // "h5", "h6": If the stack of open elements has a p element in
            // button scope, then close a p element. If the current node is an
            // HTML element whose tag name is one of "h1", "h2", "h3", "h4",
            // "h5", or "h6", then this is a parse error; pop the current node
            // off the stack of open elements. Insert an HTML element for the
            // token."
            name if HEADINGS.contains(&name) => {
                self.close_p_element_in_button_scope();
                if self.current_node_is_one_of(HEADINGS) {
                    self.token_error(ParseErrorCode::MisnestedTag, token);
                    let _ = self.pop_current_node();
                }
                let _ = self.insert_html_element(tag);
            }

            // "A start tag whose tag name is one of: "pre", "listing": If the
            // stack of open elements has a p element in button scope, then
            // close a p element. Insert an HTML element for the token. If the
            // next token is a U+000A LINE FEED (LF) character token, then
            // ignore that token and move on to the next one. (Newlines at the
            // start of pre blocks are ignored as an authoring convenience.)
            // Set the frameset-ok flag to "not ok"."
            "pre" | "listing" => {
                self.close_p_element_in_button_scope();
                let _ = self.insert_html_element(tag);
                self.skip_next_newline = true;
                self.frameset_ok = false;
            }

            // "A start tag whose tag name is "form": If the form element
            // pointer is not null, and there is no template element on the
            // stack of open elements, then this is a parse error; ignore the
            // token. Otherwise: If the stack of open elements has a p element
            // in button scope, then close a p element. Insert an HTML element
            // for the token, and, if there is no template element on the stack
            // of open elements, set the form element pointer to point to the
            // element created."
            "form" => {
                let has_template = self.stack_contains("template");
                if self.form_element_pointer.is_some() && !has_template {
                    self.token_error(ParseErrorCode::UnexpectedStartTag, token);
                    return;
                }
                self.close_p_element_in_button_scope();
                let form = self.insert_html_element(tag);
                if !has_template {
                    self.form_element_pointer = Some(form);
                }
            }

            // "A start tag whose tag name is "li""
            "li" => {
                self.close_list_item(&["li"], token);
                let _ = self.insert_html_element(tag);
            }

            // "A start tag whose tag name is one of: "dd", "dt""
            "dd" | "dt" => {
                self.close_list_item(&["dd", "dt"], token);
                let _ = self.insert_html_element(tag);
            }

            // "A start tag whose tag name is "plaintext": If the stack of open
            // elements has a p element in button scope, then close a p element.
            // Insert an HTML element for the token. Switch the tokenizer to the
            // PLAINTEXT state."
            "plaintext" => {
                self.close_p_element_in_button_scope();
                let _ = self.insert_html_element(tag);
                self.tokenizer.set_state(TokenizerState::PLAINTEXT);
            }

            // "A start tag whose tag name is "button""
            "button" => {
                // "1. If the stack of open elements has a button element in
                // scope, then run these substeps: Parse error. Generate implied
                // end tags. Pop elements from the stack of open elements until
                // a button element has been popped from the stack."
                if self.has_element_in_scope("button") {
                    self.token_error(ParseErrorCode::UnexpectedStartTag, token);
                    self.generate_implied_end_tags();
                    self.pop_until_html_element("button");
                }
                // "2. Reconstruct the active formatting elements, if any.
                // 3. Insert an HTML element for the token.
                // 4. Set the frameset-ok flag to "not ok"."
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_html_element(tag);
                self.frameset_ok = false;
            }

            // "A start tag whose tag name is "a": If the list of active
            // formatting elements contains an a element between the end of the
            // list and the last marker on the list (or the start of the list if
            // there is no marker on the list), then this is a parse error; run
            // the adoption agency algorithm for the token, then remove that
            // element from the list of active formatting elements and the stack
            // of open elements if the adoption agency algorithm didn't already
            // remove it (it might not have if the element is not in table
            // scope). Reconstruct the active formatting elements, if any.
            // Insert an HTML element for the token. Push onto the list of
            // active formatting elements that element."
            "a" => {
                if let Some(existing) = self.active_formatting_element_after_last_marker("a") {
                    self.token_error(ParseErrorCode::MisnestedTag, token);
                    let _ = self.run_adoption_agency(tag);
                    self.remove_active_formatting_element(existing);
                    self.remove_from_stack(existing);
                }
                self.insert_formatting_element(tag);
            }

            // "A start tag whose tag name is one of: "b", "big", "code", "em",
            // "font", "i", "s", "small", "strike", "strong", "tt", "u":
            // Reconstruct the active formatting elements, if any. Insert an
            // HTML element for the token. Push onto the list of active
            // formatting elements that element."
            name if FORMATTING_START_TAGS.contains(&name) => self.insert_formatting_element(tag),

            // "A start tag whose tag name is "nobr": Reconstruct the active
            // formatting elements, if any. If the stack of open elements has a
            // nobr element in scope, then this is a parse error; run the
            // adoption agency algorithm for the token, then once again
            // reconstruct the active formatting elements, if any. Insert an
            // HTML element for the token. Push onto the list of active
            // formatting elements that element."
            "nobr" => {
                self.reconstruct_active_formatting_elements();
                if self.has_element_in_scope("nobr") {
                    self.token_error(ParseErrorCode::MisnestedTag, token);
                    let _ = self.run_adoption_agency(tag);
                }
                self.insert_formatting_element(tag);
            }

            // "A start tag whose tag name is one of: "applet", "marquee",
            // "object": Reconstruct the active formatting elements, if any.
            // Insert an HTML element for the token. Insert a marker at the end
            // of the list of active formatting elements. Set the frameset-ok
            // flag to "not ok"."
            "applet" | "marquee" | "object" => {
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_html_element(tag);
                self.push_active_formatting_marker();
                self.frameset_ok = false;
            }

            // "A start tag whose tag name is "table": If the Document is not
            // set to quirks mode, and the stack of open elements has a p
            // element in button scope, then close a p element. Insert an HTML
            // element for the token. Set the frameset-ok flag to "not ok".
            // Switch the insertion mode to "in table"."
            "table" => {
                if self.tree.mode() != QuirksMode::Quirks {
                    self.close_p_element_in_button_scope();
                }
                let _ = self.insert_html_element(tag);
                self.frameset_ok = false;
                self.insertion_mode = InsertionMode::InTable;
            }

            // "A start tag whose tag name is one of: "area", "br", "embed",
            // "img", "keygen", "wbr": Reconstruct the active formatting
            // elements, if any. Insert an HTML element for the token.
            // Immediately pop the current node off the stack of open elements.
            // Acknowledge the token's self-closing flag, if it is set. Set the
            // frameset-ok flag to "not ok"."
            "area" | "br" | "embed" | "img" | "keygen" | "wbr" => {
                self.reconstruct_active_formatting_elements();
                self.insert_void_html_element(tag);
                self.frameset_ok = false;
            }

            // "A start tag whose tag name is "input": ... If the token does not
            // have an attribute with the name "type", or if it does, but that
            // attribute's value is not an ASCII case-insensitive match for the
            // string "hidden", then: set the frameset-ok flag to "not ok"."
            "input" => {
                self.reconstruct_active_formatting_elements();
                self.insert_void_html_element(tag);
                if !is_hidden_input(tag) {
                    self.frameset_ok = false;
                }
            }

            // "A start tag whose tag name is one of: "param", "source",
            // "track": Insert an HTML element for the token. Immediately pop
            // the current node off the stack of open elements. Acknowledge the
            // token's self-closing flag, if it is set."
            "param" | "source" | "track" => self.insert_void_html_element(tag),

            // "A start tag whose tag name is "hr": If the stack of open
            // elements has a p element in button scope, then close a p
            // element. Insert an HTML element for the token. Immediately pop
            // the current node off the stack of open elements. Acknowledge the
            // token's self-closing flag, if it is set. Set the frameset-ok flag
            // to "not ok"."
            "hr" => {
                self.close_p_element_in_button_scope();
                self.insert_void_html_element(tag);
                self.frameset_ok = false;
            }

            // "A start tag whose tag name is "image": Parse error. Change the
            // token's tag name to "img" and reprocess it. (Don't ask.)"
            "image" => {
                self.token_error(ParseErrorCode::UnexpectedStartTag, token);
                let mut img = tag.clone();
                img.name = "img".to_string();
                self.process_token(&Token::Tag(img));
            }

            // "A start tag whose tag name is "textarea"
            // 1. Insert an HTML element for the token.
            // 2. If the next token is a U+000A LINE FEED (LF) character token,
            //    then ignore that token and move on to the next one.
            // 3. Switch the tokenizer to the RCDATA state.
            // 4. Let the original insertion mode be the current insertion mode.
            // 5. Set the frameset-ok flag to "not ok".
            // 6. Switch the insertion mode to "text"."
            "textarea" => {
                self.parse_rcdata_element(tag);
                self.skip_next_newline = true;
                self.frameset_ok = false;
            }

            // "A start tag whose tag name is "xmp": If the stack of open
            // elements has a p element in button scope, then close a p element.
            // Reconstruct the active formatting elements, if any. Set the
            // frameset-ok flag to "not ok". Follow the generic raw text element
            // parsing algorithm."
            "xmp" => {
                self.close_p_element_in_button_scope();
                self.reconstruct_active_formatting_elements();
                self.frameset_ok = false;
                self.parse_raw_text_element(tag);
            }

            // "A start tag whose tag name is "iframe": Set the frameset-ok flag
            // to "not ok". Follow the generic raw text element parsing
            // algorithm."
            "iframe" => {
                self.frameset_ok = false;
                self.parse_raw_text_element(tag);
            }

            // "A start tag whose tag name is "noembed"; A start tag whose tag
            // name is "noscript", if the scripting flag is enabled: Follow the
            // generic raw text element parsing algorithm."
            "noembed" => self.parse_raw_text_element(tag),
            "noscript" if self.scripting => self.parse_raw_text_element(tag),

            // "A start tag whose tag name is "select": Reconstruct the active
            // formatting elements, if any. Insert an HTML element for the
            // token. Set the frameset-ok flag to "not ok". If the insertion mode
            // is one of "in table", "in caption", "in table body", "in row", or
            // "in cell", then switch the insertion mode to "in select in
            // table". Otherwise, switch the insertion mode to "in select"."
            "select" => {
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_html_element(tag);
                self.frameset_ok = false;
                self.insertion_mode = match self.insertion_mode {
                    InsertionMode::InTable
                    | InsertionMode::InCaption
                    | InsertionMode::InTableBody
                    | InsertionMode::InRow
                    | InsertionMode::InCell => InsertionMode::InSelectInTable,
                    _ => InsertionMode::InSelect,
                };
            }

            // "A start tag whose tag name is one of: "optgroup", "option": If
            // the current node is an option element, then pop the current node
            // off the stack of open elements. Reconstruct the active formatting
            // elements, if any. Insert an HTML element for the token."
            "optgroup" | "option" => {
                if self.current_node_is("option") {
                    let _ = self.pop_current_node();
                }
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_html_element(tag);
            }

            // "A start tag whose tag name is one of: "rb", "rtc": If the stack
            // of open elements has a ruby element in scope, then generate
            // implied end tags. If the current node is not now a ruby element,
            // this is a parse error. Insert an HTML element for the token."
            "rb" | "rtc" => {
                if self.has_element_in_scope("ruby") {
                    self.generate_implied_end_tags();
                    if !self.current_node_is("ruby") {
                        self.token_error(ParseErrorCode::MisnestedTag, token);
                    }
                }
                let _ = self.insert_html_element(tag);
            }

            // "A start tag whose tag name is one of: "rp", "rt": If the stack
            // of open elements has a ruby element in scope, then generate
            // implied end tags, except for rtc elements. If the current node is
            // not now a rtc element or a ruby element, this is a parse error.
            // Insert an HTML element for the token."
            "rp" | "rt" => {
                if self.has_element_in_scope("ruby") {
                    self.generate_implied_end_tags_excluding(Some("rtc"));
                    if !self.current_node_is_one_of(&["rtc", "ruby"]) {
                        self.token_error(ParseErrorCode::MisnestedTag, token);
                    }
                }
                let _ = self.insert_html_element(tag);
            }

            // "A start tag whose tag name is "math": Reconstruct the active
            // formatting elements, if any. Adjust MathML attributes for the
            // token. Adjust foreign attributes for the token. Insert a foreign
            // element for the token, with MathML namespace. If the token has
            // its self-closing flag set, pop the current node off the stack of
            // open elements and acknowledge the token's self-closing flag."
            "math" => {
                self.reconstruct_active_formatting_elements();
                self.insert_foreign_start_tag(tag, Namespace::MathMl);
            }

            // "A start tag whose tag name is "svg": ... Adjust SVG attributes
            // for the token. ... with SVG namespace."
            "svg" => {
                self.reconstruct_active_formatting_elements();
                self.insert_foreign_start_tag(tag, Namespace::Svg);
            }

            // "A start tag whose tag name is one of: "caption", "col",
            // "colgroup", "frame", "head", "tbody", "td", "tfoot", "th",
            // "thead", "tr": Parse error. Ignore the token."
            "caption" | "col" | "colgroup" | "frame" | "head" | "tbody" | "td" | "tfoot" | "th"
            | "thead" | "tr" => self.token_error(ParseErrorCode::UnexpectedStartTag, token),

            // "Any other start tag: Reconstruct the active formatting elements,
            // if any. Insert an HTML element for the token."
            _ => {
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_html_element(tag);
            }
        }
    }

    /// The `li` / `dd` / `dt` start tag loop.
    ///
    /// "1. Set the frameset-ok flag to "not ok".
    /// 2. Initialize node to be the current node (the bottommost node of the
    ///    stack).
    /// 3. Loop: If node is an li element, then run these substeps: Generate
    ///    implied end tags, except for li elements. If the current node is not
    ///    an li element, then this is a parse error. Pop elements from the
    ///    stack of open elements until an li element has been popped from the
    ///    stack. Jump to the step labeled done below.
    /// 4. If node is in the special category, but is not an address, div, or
    ///    p element, then jump to the step labeled done below.
    /// 5. Otherwise, set node to the previous entry in the stack of open
    ///    elements and return to the step labeled loop.
    /// 6. Done: If the stack of open elements has a p element in button scope,
    ///    then close a p element."
    fn close_list_item(&mut self, names: &[&str], token: &Token) {
        self.frameset_ok = false;

        let mut target = None;
        for &node in self.stack_of_open_elements.iter().rev() {
            let Some(element) = self.tree.as_element(node) else {
                continue;
            };
            if element.is_html_element_in(names) {
                target = Some(element.tag_name.clone());
                break;
            }
            if element.is_special() && !element.is_html_element_in(&["address", "div", "p"]) {
                break;
            }
        }

        if let Some(name) = target {
            self.generate_implied_end_tags_excluding(Some(&name));
            if !self.current_node_is(&name) {
                self.token_error(ParseErrorCode::MisnestedTag, token);
            }
            self.pop_until_html_element(&name);
        }

        self.close_p_element_in_button_scope();
    }

    /// "Reconstruct the active formatting elements, if any. Insert an HTML
    /// element for the token. Push onto the list of active formatting elements
    /// that element."
    fn insert_formatting_element(&mut self, tag: &Tag) {
        self.reconstruct_active_formatting_elements();
        let element = self.insert_html_element(tag);
        self.push_active_formatting_element(element, tag);
    }

    fn in_body_end_tag(&mut self, tag: &Tag, token: &Token) {
        match tag.name.as_str() {
            // "An end tag whose tag name is "template": Process the token using
            // the rules for the "in head" insertion mode."
            "template" => self.process_using_rules_for(InsertionMode::InHead, token),

            // "An end tag whose tag name is "body": If the stack of open
            // elements does not have a body element in scope, this is a parse
            // error; ignore the token. Otherwise, if there is a node in the
            // stack of open elements that is not either a dd element, ... or
            // the html element, then this is a parse error. Switch the
            // insertion mode to "after body"."
            "body" => {
                if !self.has_element_in_scope("body") {
                    self.token_error(ParseErrorCode::UnexpectedEndTag, token);
                    return;
                }
                self.report_unclosed_elements(token);
                self.insertion_mode = InsertionMode::AfterBody;
            }

            // "An end tag whose tag name is "html": ... Switch the insertion
            // mode to "after body". Reprocess the token."
            "html" => {
                if !self.has_element_in_scope("body") {
                    self.token_error(ParseErrorCode::UnexpectedEndTag, token);
                    return;
                }
                self.report_unclosed_elements(token);
                self.insertion_mode = InsertionMode::AfterBody;
                self.process_token(token);
            }

            // "An end tag whose tag name is one of: "address", "article", ...
            // "ul": If the stack of open elements does not have an element in
            // scope that is an HTML element with the same tag name as that of
            // the token, then this is a parse error; ignore the token.
            // Otherwise, run these steps: Generate implied end tags. If the
            // current node is not an HTML element with the same tag name as
            // that of the token, then this is a parse error. Pop elements from
            // the stack of open elements until an HTML element with the same
            // tag name as the token has been popped from the stack."
            name if BLOCK_END_TAGS.contains(&name) => {
                if !self.has_element_in_scope(name) {
                    self.token_error(ParseErrorCode::UnexpectedEndTag, token);
                    return;
                }
                self.generate_implied_end_tags();
                if !self.current_node_is(name) {
                    self.token_error(ParseErrorCode::MisnestedTag, token);
                }
                self.pop_until_html_element(name);
            }

            // "An end tag whose tag name is "form""
            "form" => self.in_body_end_form(token),

            // "An end tag whose tag name is "p": If the stack of open elements
            // does not have a p element in button scope, then this is a parse
            // error; insert an HTML element for a "p" start tag token with no
            // attributes. Close a p element."
            "p" => {
                if !self.has_element_in_button_scope("p") {
                    self.token_error(ParseErrorCode::UnexpectedEndTag, token);
                    let _ = self.insert_html_element(&Tag::start("p"));
                }
                self.close_p_element();
            }

            // "An end tag whose tag name is "li": If the stack of open elements
            // does not have an li element in list item scope, then this is a
            // parse error; ignore the token. Otherwise, run these steps:
            // Generate implied end tags, except for li elements. If the current
            // node is not an li element, then this is a parse error. Pop
            // elements from the stack of open elements until an li element has
            // been popped from the stack."
            "li" => {
                if !self.has_element_in_list_item_scope("li") {
                    self.token_error(ParseErrorCode::UnexpectedEndTag, token);
                    return;
                }
                self.close_element_excluding_implied(&tag.name, token);
            }

            // "An end tag whose tag name is one of: "dd", "dt": If the stack
            // of open elements does not have an element in scope that is an
            // HTML element with the same tag name as that of the token, then
            // this is a parse error; ignore the token. Otherwise, ... generate
            // implied end tags, except for HTML elements with the same tag name
            // as the token."
            "dd" | "dt" => {
                if !self.has_element_in_scope(&tag.name) {
                    self.token_error(ParseErrorCode::UnexpectedEndTag, token);
                    return;
                }
                self.close_element_excluding_implied(&tag.name, token);
            }

            // "An end tag whose tag name is one of: "h1", "h2", "h3", "h4",
            // "h5", "h6": If the stack of open elements does not have an
            // element in scope that is an HTML element and whose tag name is
            // one of "h1", "h2", "h3", "h4", "h5", or "h6", then this is a
            // parse error; ignore the token. Otherwise, run these steps:
            // Generate implied end tags. If the current node is not an HTML
            // element with the same tag name as that of the token, then this
            // is a parse error. Pop elements from the stack of open elements
            // until an HTML element whose tag name is one of "h1", "h2", "h3",
            // "h4", "h5", or "h6" has been popped from the stack."
            name if HEADINGS.contains(&name) => {
                if !self.has_any_element_in_scope(HEADINGS) {
                    self.token_error(ParseErrorCode::UnexpectedEndTag, token);
                    return;
                }
                self.generate_implied_end_tags();
                if !self.current_node_is(name) {
                    self.token_error(ParseErrorCode::MisnestedTag, token);
                }
                self.pop_until_one_of(HEADINGS);
            }

            // "An end tag whose tag name is one of: "a", "b", "big", "code",
            // "em", "font", "i", "nobr", "s", "small", "strike", "strong",
            // "tt", "u": Run the adoption agency algorithm for the token."
            name if FORMATTING_END_TAGS.contains(&name) => {
                if self.run_adoption_agency(tag) == AdoptionOutcome::AnyOtherEndTag {
                    self.any_other_end_tag(tag, token);
                }
            }

            // "An end tag token whose tag name is one of: "applet", "marquee",
            // "object": If the stack of open elements does not have an element
            // in scope that is an HTML element with the same tag name as that
            // of the token, then this is a parse error; ignore the token.
            // Otherwise, run these steps: Generate implied end tags. If the
            // current node is not an HTML element with the same tag name as
            // that of the token, then this is a parse error. Pop elements from
            // the stack of open elements until an HTML element with the same
            // tag name as the token has been popped from the stack. Clear the
            // list of active formatting elements up to the last marker."
            "applet" | "marquee" | "object" => {
                if !self.has_element_in_scope(&tag.name) {
                    self.token_error(ParseErrorCode::UnexpectedEndTag, token);
                    return;
                }
                self.generate_implied_end_tags();
                if !self.current_node_is(&tag.name) {
                    self.token_error(ParseErrorCode::MisnestedTag, token);
                }
                self.pop_until_html_element(&tag.name);
                self.clear_active_formatting_elements_to_last_marker();
            }

            // "An end tag whose tag name is "br": Parse error. Drop the
            // attributes from the token, and act as described in the next
            // entry; i.e. act as if this was a "br" start tag token with no
            // attributes, rather than the end tag token that it actually is."
            "br" => {
                self.token_error(ParseErrorCode::UnexpectedEndTag, token);
                let br = Tag::start("br");
                self.in_body_start_tag(&br, &Token::Tag(br.clone()));
            }

            // "Any other end tag"
            _ => self.any_other_end_tag(tag, token),
        }
    }

    /// "An end tag whose tag name is "form""
    fn in_body_end_form(&mut self, token: &Token) {
        // "If there is no template element on the stack of open elements,
        // then run these substeps:"
        if !self.stack_contains("template") {
            // "1. Let node be the element that the form element pointer is set
            // to, or null if it is not set to an element.
            // 2. Set the form element pointer to null.
            // 3. If node is null or if the stack of open elements does not have
            // node in scope, then this is a parse error; return and ignore the
            // token.
            // 4. Generate implied end tags.
            // 5. If the current node is not node, then this is a parse error.
            // 6. Remove node from the stack of open elements."
            let node = self.form_element_pointer.take();
            let Some(node) = node.filter(|&node| self.has_node_in_scope(node)) else {
                self.token_error(ParseErrorCode::UnexpectedEndTag, token);
                return;
            };
            self.generate_implied_end_tags();
            if self.current_node() != Some(node) {
                self.token_error(ParseErrorCode::MisnestedTag, token);
            }
            self.remove_from_stack(node);
            return;
        }

        // "If there is a template element on the stack of open elements, then
        // run these substeps instead:
        // 1. If the stack of open elements does not have a form element in
        //    scope, then this is a parse error; return and ignore the token.
        // 2. Generate implied end tags.
        // 3. If the current node is not a form element, then this is a parse
        //    error.
        // 4. Pop elements from the stack of open elements until a form element
        //    has been popped from the stack."
        if !self.has_element_in_scope("form") {
            self.token_error(ParseErrorCode::UnexpectedEndTag, token);
            return;
        }
        self.generate_implied_end_tags();
        if !self.current_node_is("form") {
            self.token_error(ParseErrorCode::MisnestedTag, token);
        }
        self.pop_until_html_element("form");
    }

    /// "Generate implied end tags, except for HTML elements with the same tag
    /// name as the token. If the current node is not an HTML element with the
    /// same tag name as that of the token, then this is a parse error. Pop
    /// elements from the stack of open elements until an HTML element with the
    /// same tag name as the token has been popped from the stack."
    fn close_element_excluding_implied(&mut self, name: &str, token: &Token) {
        self.generate_implied_end_tags_excluding(Some(name));
        if !self.current_node_is(name) {
            self.token_error(ParseErrorCode::MisnestedTag, token);
        }
        self.pop_until_html_element(name);
    }

    /// "Any other end tag"
    ///
    /// "1. Initialize node to be the current node (the bottommost node of the
    ///     stack).
    ///  2. Loop: If node is an HTML element with the same tag name as the
    ///     token, then: Generate implied end tags, except for HTML elements
    ///     with the same tag name as the token. If node is not the current
    ///     node, then this is a parse error. Pop all the nodes from the current
    ///     node up to node, including node, then stop these steps.
    ///  3. Otherwise, if node is in the special category, then this is a parse
    ///     error; ignore the token, and return.
    ///  4. Set node to the previous entry in the stack of open elements.
    ///  5. Return to the step labeled loop."
    pub(in crate::parser) fn any_other_end_tag(&mut self, tag: &Tag, token: &Token) {
        let target = self
            .stack_of_open_elements
            .iter()
            .rev()
            .find_map(|&node| {
                let element = self.tree.as_element(node)?;
                if element.is_html_element(&tag.name) {
                    Some(Some(node))
                } else if element.is_special() {
                    Some(None)
                } else {
                    None
                }
            })
            .flatten();

        let Some(node) = target else {
            self.token_error(ParseErrorCode::UnexpectedEndTag, token);
            return;
        };
        self.generate_implied_end_tags_excluding(Some(&tag.name));
        if self.current_node() != Some(node) {
            self.token_error(ParseErrorCode::MisnestedTag, token);
        }
        self.pop_until_node(node);
    }
}
