//! Insertion modes before `<body>`: initial, before html, before head, in head,
//! in head noscript and after head, plus the text mode used by RCDATA and
//! raw text elements.

use weft_dom::{Namespace, NodeId, QuirksMode};

use crate::error::ParseErrorCode;
use crate::parser::core::{HTMLParser, InsertionMode};
use crate::parser::quirks::{is_doctype_parse_error, quirks_mode_for_doctype};
use crate::tokenizer::TagKind::{End, Start};
use crate::tokenizer::{Tag, Token, TokenizerState};

impl HTMLParser {
    /// [§ 13.2.6.4.1 The "initial" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-initial-insertion-mode)
    pub(in crate::parser) fn handle_initial_mode(&mut self, token: &Token) {
        match token {
            // "A character token that is one of U+0009 CHARACTER TABULATION,
            // U+000A LINE FEED (LF), U+000C FORM FEED (FF), U+000D CARRIAGE
            // RETURN (CR), or U+0020 SPACE: Ignore the token."
            _ if token.is_whitespace_character() => {}

            // "A comment token: Insert a comment as the last child of the
            // Document object."
            Token::Comment(data) => self.insert_comment_in(NodeId::ROOT, data),

            // "A DOCTYPE token: If the DOCTYPE token's name is not "html", or
            // the token's public identifier is not missing, or the token's
            // system identifier is neither missing nor "about:legacy-compat",
            // then there is a parse error."
            Token::Doctype(doctype) => {
                if is_doctype_parse_error(doctype) {
                    self.token_error(ParseErrorCode::UnknownDoctype, token);
                }

                // "Append a DocumentType node to the Document node, with its
                // name set to the name given in the DOCTYPE token, or the empty
                // string if the name was missing; its public ID set to the
                // public identifier given in the DOCTYPE token, or the empty
                // string if the public identifier was missing; and its system
                // ID set to the system identifier given in the DOCTYPE token,
                // or the empty string if the system identifier was missing."
                let node = self.tree.new_document_type(
                    doctype.name.as_deref().unwrap_or_default(),
                    doctype.public_identifier.as_deref().unwrap_or_default(),
                    doctype.system_identifier.as_deref().unwrap_or_default(),
                );
                self.tree.append_child(NodeId::ROOT, node);

                // "Then, if the document is not an iframe srcdoc document, and
                // the parser cannot change the mode flag is false, and the
                // DOCTYPE token matches one of the conditions in the following
                // list, then set the Document to quirks mode: ..."
                self.tree.set_mode(quirks_mode_for_doctype(doctype));

                // "Then, switch the insertion mode to "before html"."
                self.insertion_mode = InsertionMode::BeforeHtml;
            }

            // "Anything else: If the document is not an iframe srcdoc
            // document, then this is a parse error; if the parser cannot
            // change the mode flag is false, set the Document to quirks mode.
            // In any case, switch the insertion mode to "before html", then
            // reprocess the token."
            _ => {
                self.token_error(ParseErrorCode::MissingDoctype, token);
                self.tree.set_mode(QuirksMode::Quirks);
                self.insertion_mode = InsertionMode::BeforeHtml;
                self.process_token(token);
            }
        }
    }

    /// [§ 13.2.6.4.2 The "before html" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-html-insertion-mode)
    pub(in crate::parser) fn handle_before_html_mode(&mut self, token: &Token) {
        match token {
            // "A DOCTYPE token: Parse error. Ignore the token."
            Token::Doctype(_) => self.token_error(ParseErrorCode::UnexpectedDoctype, token),

            // "A comment token: Insert a comment as the last child of the
            // Document object."
            Token::Comment(data) => self.insert_comment_in(NodeId::ROOT, data),

            // "A character token that is one of U+0009 CHARACTER TABULATION,
            // ... or U+0020 SPACE: Ignore the token."
            _ if token.is_whitespace_character() => {}

            Token::Tag(tag) => match (tag.kind, tag.name.as_str()) {
                // "A start tag whose tag name is "html": Create an element for
                // the token in the HTML namespace, with the Document as the
                // intended parent. Append it to the Document object. Put this
                // element in the stack of open elements. Switch the insertion
                // mode to "before head"."
                (Start, "html") => {
                    let html = self.create_element_for_token(tag, Namespace::Html);
                    self.tree.append_child(NodeId::ROOT, html);
                    self.stack_of_open_elements.push(html);
                    self.insertion_mode = InsertionMode::BeforeHead;
                }
                // "An end tag whose tag name is one of: "head", "body", "html",
                // "br": Act as described in the "anything else" entry below."
                (End, "head" | "body" | "html" | "br") | (Start, _) => {
                    self.before_html_anything_else(token);
                }
                // "Any other end tag: Parse error. Ignore the token."
                (End, _) => self.token_error(ParseErrorCode::UnexpectedEndTag, token),
            },

            _ => self.before_html_anything_else(token),
        }
    }

    /// "Anything else: Create an html element whose node document is the
    /// Document object. Append it to the Document object. Put this element in
    /// the stack of open elements. Switch the insertion mode to "before head",
    /// then reprocess the token."
    fn before_html_anything_else(&mut self, token: &Token) {
        let html = self.create_element_for_token(&Tag::start("html"), Namespace::Html);
        self.tree.append_child(NodeId::ROOT, html);
        self.stack_of_open_elements.push(html);
        self.insertion_mode = InsertionMode::BeforeHead;
        self.process_token(token);
    }

    /// [§ 13.2.6.4.3 The "before head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-head-insertion-mode)
    pub(in crate::parser) fn handle_before_head_mode(&mut self, token: &Token) {
        match token {
            // "A character token that is one of U+0009 CHARACTER TABULATION,
            // ... or U+0020 SPACE: Ignore the token."
            _ if token.is_whitespace_character() => {}

            // "A comment token: Insert a comment."
            Token::Comment(data) => self.insert_comment(data),

            // "A DOCTYPE token: Parse error. Ignore the token."
            Token::Doctype(_) => self.token_error(ParseErrorCode::UnexpectedDoctype, token),

            Token::Tag(tag) => match (tag.kind, tag.name.as_str()) {
                // "A start tag whose tag name is "html": Process the token
                // using the rules for the "in body" insertion mode."
                (Start, "html") => self.process_using_rules_for(InsertionMode::InBody, token),

                // "A start tag whose tag name is "head": Insert an HTML element
                // for the token. Set the head element pointer to the newly
                // created head element. Switch the insertion mode to "in head"."
                (Start, "head") => {
                    let head = self.insert_html_element(tag);
                    self.head_element_pointer = Some(head);
                    self.insertion_mode = InsertionMode::InHead;
                }

                // "An end tag whose tag name is one of: "head", "body", "html",
                // "br": Act as described in the "anything else" entry below."
                (End, "head" | "body" | "html" | "br") | (Start, _) => {
                    self.before_head_anything_else(token);
                }

                // "Any other end tag: Parse error. Ignore the token."
                (End, _) => self.token_error(ParseErrorCode::UnexpectedEndTag, token),
            },

            _ => self.before_head_anything_else(token),
        }
    }

    /// "Anything else: Insert an HTML element for a "head" start tag token with
    /// no attributes. Set the head element pointer to the newly created head
    /// element. Switch the insertion mode to "in head". Reprocess the current
    /// token."
    fn before_head_anything_else(&mut self, token: &Token) {
        let head = self.insert_html_element(&Tag::start("head"));
        self.head_element_pointer = Some(head);
        self.insertion_mode = InsertionMode::InHead;
        self.process_token(token);
    }

    /// [§ 13.2.6.4.4 The "in head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inhead)
    pub(in crate::parser) fn handle_in_head_mode(&mut self, token: &Token) {
        match token {
            // "A character token that is one of U+0009 CHARACTER TABULATION,
            // ... or U+0020 SPACE: Insert the character."
            Token::Character(c) if Self::is_whitespace(*c) => self.insert_character(*c),

            // "A comment token: Insert a comment."
            Token::Comment(data) => self.insert_comment(data),

            // "A DOCTYPE token: Parse error. Ignore the token."
            Token::Doctype(_) => self.token_error(ParseErrorCode::UnexpectedDoctype, token),

            Token::Tag(tag) => match (tag.kind, tag.name.as_str()) {
                // "A start tag whose tag name is "html": Process the token
                // using the rules for the "in body" insertion mode."
                (Start, "html") => self.process_using_rules_for(InsertionMode::InBody, token),

                // "A start tag whose tag name is one of: "base", "basefont",
                // "bgsound", "link": Insert an HTML element for the token.
                // Immediately pop the current node off the stack of open
                // elements. Acknowledge the token's self-closing flag, if it
                // is set."
                //
                // "A start tag whose tag name is "meta": ... (the encoding
                // sniffing steps do not apply to string input)"
                (Start, "base" | "basefont" | "bgsound" | "link" | "meta") => {
                    self.insert_void_html_element(tag);
                }

                // "A start tag whose tag name is "title": Follow the generic
                // RCDATA element parsing algorithm."
                (Start, "title") => self.parse_rcdata_element(tag),

                // "A start tag whose tag name is "noscript", if the scripting
                // flag is enabled; A start tag whose tag name is one of:
                // "noframes", "style": Follow the generic raw text element
                // parsing algorithm."
                (Start, "noframes" | "style") => self.parse_raw_text_element(tag),
                (Start, "noscript") if self.scripting => self.parse_raw_text_element(tag),

                // "A start tag whose tag name is "noscript", if the scripting
                // flag is disabled: Insert an HTML element for the token.
                // Switch the insertion mode to "in head noscript"."
                (Start, "noscript") => {
                    let _ = self.insert_html_element(tag);
                    self.insertion_mode = InsertionMode::InHeadNoscript;
                }

                // "A start tag whose tag name is "script": ... Switch the
                // tokenizer to the script data state. Let the original
                // insertion mode be the current insertion mode. Switch the
                // insertion mode to "text"."
                (Start, "script") => self.parse_text_element(tag, TokenizerState::ScriptData),

                // "An end tag whose tag name is "head": Pop the current node
                // (which will be the head element) off the stack of open
                // elements. Switch the insertion mode to "after head"."
                (End, "head") => {
                    let _ = self.pop_current_node();
                    self.insertion_mode = InsertionMode::AfterHead;
                }

                // "An end tag whose tag name is one of: "body", "html", "br":
                // Act as described in the "anything else" entry below."
                (End, "body" | "html" | "br") => self.in_head_anything_else(token),

                // "A start tag whose tag name is "template""
                (Start, "template") => self.start_template(tag),

                // "An end tag whose tag name is "template""
                (End, "template") => self.end_template(token),

                // "A start tag whose tag name is "head"; Any other end tag:
                // Parse error. Ignore the token."
                (Start, "head") => self.token_error(ParseErrorCode::UnexpectedStartTag, token),
                (End, _) => self.token_error(ParseErrorCode::UnexpectedEndTag, token),

                (Start, _) => self.in_head_anything_else(token),
            },

            _ => self.in_head_anything_else(token),
        }
    }

    /// "Anything else: Pop the current node (which will be the head element)
    /// off the stack of open elements. Switch the insertion mode to "after
    /// head". Reprocess the token."
    fn in_head_anything_else(&mut self, token: &Token) {
        let _ = self.pop_current_node();
        self.insertion_mode = InsertionMode::AfterHead;
        self.process_token(token);
    }

    /// "A start tag whose tag name is "template": Insert an HTML element for
    /// the token. Insert a marker at the end of the list of active formatting
    /// elements. Set the frameset-ok flag to "not ok". Switch the insertion
    /// mode to "in template". Push "in template" onto the stack of template
    /// insertion modes so that it is the new current template insertion mode."
    fn start_template(&mut self, tag: &Tag) {
        let _ = self.insert_html_element(tag);
        self.push_active_formatting_marker();
        self.frameset_ok = false;
        self.insertion_mode = InsertionMode::InTemplate;
        self.template_insertion_modes.push(InsertionMode::InTemplate);
    }

    /// "An end tag whose tag name is "template""
    fn end_template(&mut self, token: &Token) {
        // "If there is no template element on the stack of open elements,
        // then this is a parse error; ignore the token."
        if !self.stack_contains("template") {
            self.token_error(ParseErrorCode::UnexpectedEndTag, token);
            return;
        }

        // "Otherwise, run these steps:
        // 1. Generate all implied end tags thoroughly.
        // 2. If the current node is not a template element, then this is a
        //    parse error.
        // 3. Pop elements from the stack of open elements until a template
        //    element has been popped from the stack.
        // 4. Clear the list of active formatting elements up to the last
        //    marker.
        // 5. Pop the current template insertion mode off the stack of template
        //    insertion modes.
        // 6. Reset the insertion mode appropriately."
        self.generate_all_implied_end_tags_thoroughly();
        if !self.current_node_is("template") {
            self.token_error(ParseErrorCode::MisnestedTag, token);
        }
        self.pop_until_html_element("template");
        self.clear_active_formatting_elements_to_last_marker();
        let _ = self.template_insertion_modes.pop();
        self.reset_insertion_mode_appropriately();
    }

    /// [§ 13.2.6.4.5 The "in head noscript" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inheadnoscript)
    pub(in crate::parser) fn handle_in_head_noscript_mode(&mut self, token: &Token) {
        match token {
            // "A DOCTYPE token: Parse error. Ignore the token."
            Token::Doctype(_) => self.token_error(ParseErrorCode::UnexpectedDoctype, token),

            // "A character token that is one of U+0009 CHARACTER TABULATION,
            // ... A comment token ... Process the token using the rules for
            // the "in head" insertion mode."
            Token::Comment(_) => self.process_using_rules_for(InsertionMode::InHead, token),
            _ if token.is_whitespace_character() => {
                self.process_using_rules_for(InsertionMode::InHead, token);
            }

            Token::Tag(tag) => match (tag.kind, tag.name.as_str()) {
                // "A start tag whose tag name is "html": Process the token
                // using the rules for the "in body" insertion mode."
                (Start, "html") => self.process_using_rules_for(InsertionMode::InBody, token),

                // "An end tag whose tag name is "noscript": Pop the current
                // node (which will be a noscript element) from the stack of
                // open elements; the new current node will be a head element.
                // Switch the insertion mode to "in head"."
                (End, "noscript") => {
                    let _ = self.pop_current_node();
                    self.insertion_mode = InsertionMode::InHead;
                }

                // "A start tag whose tag name is one of: "basefont",
                // "bgsound", "link", "meta", "noframes", "style": Process the
                // token using the rules for the "in head" insertion mode."
                (Start, "basefont" | "bgsound" | "link" | "meta" | "noframes" | "style") => {
                    self.process_using_rules_for(InsertionMode::InHead, token);
                }

                // "An end tag whose tag name is "br": Act as described in the
                // "anything else" entry below."
                (End, "br") | (Start, _) if !matches!(tag.name.as_str(), "head" | "noscript") => {
                    self.in_head_noscript_anything_else(token);
                }

                // "A start tag whose tag name is one of: "head", "noscript";
                // Any other end tag: Parse error. Ignore the token."
                (Start, _) => self.token_error(ParseErrorCode::UnexpectedStartTag, token),
                (End, _) => self.token_error(ParseErrorCode::UnexpectedEndTag, token),
            },

            _ => self.in_head_noscript_anything_else(token),
        }
    }

    /// "Anything else: Parse error. Pop the current node (which will be a
    /// noscript element) from the stack of open elements; the new current node
    /// will be a head element. Switch the insertion mode to "in head".
    /// Reprocess the token."
    fn in_head_noscript_anything_else(&mut self, token: &Token) {
        self.unexpected_token(token);
        let _ = self.pop_current_node();
        self.insertion_mode = InsertionMode::InHead;
        self.process_token(token);
    }

    /// [§ 13.2.6.4.6 The "after head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-head-insertion-mode)
    pub(in crate::parser) fn handle_after_head_mode(&mut self, token: &Token) {
        match token {
            // "A character token that is one of U+0009 CHARACTER TABULATION,
            // ... or U+0020 SPACE: Insert the character."
            Token::Character(c) if Self::is_whitespace(*c) => self.insert_character(*c),

            // "A comment token: Insert a comment."
            Token::Comment(data) => self.insert_comment(data),

            // "A DOCTYPE token: Parse error. Ignore the token."
            Token::Doctype(_) => self.token_error(ParseErrorCode::UnexpectedDoctype, token),

            Token::Tag(tag) => match (tag.kind, tag.name.as_str()) {
                // "A start tag whose tag name is "html": Process the token
                // using the rules for the "in body" insertion mode."
                (Start, "html") => self.process_using_rules_for(InsertionMode::InBody, token),

                // "A start tag whose tag name is "body": Insert an HTML element
                // for the token. Set the frameset-ok flag to "not ok". Switch
                // the insertion mode to "in body"."
                (Start, "body") => {
                    let _ = self.insert_html_element(tag);
                    self.frameset_ok = false;
                    self.insertion_mode = InsertionMode::InBody;
                }

                // "A start tag whose tag name is "frameset": Insert an HTML
                // element for the token. Switch the insertion mode to "in
                // frameset"."
                (Start, "frameset") => {
                    let _ = self.insert_html_element(tag);
                    self.insertion_mode = InsertionMode::InFrameset;
                }

                // "A start tag whose tag name is one of: "base", "basefont",
                // "bgsound", "link", "meta", "noframes", "script", "style",
                // "template", "title": Parse error. Push the node pointed to
                // by the head element pointer onto the stack of open elements.
                // Process the token using the rules for the "in head"
                // insertion mode. Remove the node pointed to by the head
                // element pointer from the stack of open elements. (It might
                // not be the current node at this point.)"
                (
                    Start,
                    "base" | "basefont" | "bgsound" | "link" | "meta" | "noframes" | "script"
                    | "style" | "template" | "title",
                ) => {
                    self.token_error(ParseErrorCode::UnexpectedStartTag, token);
                    let Some(head) = self.head_element_pointer else {
                        self.process_using_rules_for(InsertionMode::InHead, token);
                        return;
                    };
                    self.stack_of_open_elements.push(head);
                    self.process_using_rules_for(InsertionMode::InHead, token);
                    self.remove_from_stack(head);
                }

                // "An end tag whose tag name is "template": Process the token
                // using the rules for the "in head" insertion mode."
                (End, "template") => self.process_using_rules_for(InsertionMode::InHead, token),

                // "An end tag whose tag name is one of: "body", "html", "br":
                // Act as described in the "anything else" entry below."
                (End, "body" | "html" | "br") => self.after_head_anything_else(token),

                // "A start tag whose tag name is "head"; Any other end tag:
                // Parse error. Ignore the token."
                (Start, "head") => self.token_error(ParseErrorCode::UnexpectedStartTag, token),
                (End, _) => self.token_error(ParseErrorCode::UnexpectedEndTag, token),

                (Start, _) => self.after_head_anything_else(token),
            },

            _ => self.after_head_anything_else(token),
        }
    }

    /// "Anything else: Insert an HTML element for a "body" start tag token
    /// with no attributes. Switch the insertion mode to "in body". Reprocess
    /// the current token."
    fn after_head_anything_else(&mut self, token: &Token) {
        let _ = self.insert_html_element(&Tag::start("body"));
        self.insertion_mode = InsertionMode::InBody;
        self.process_token(token);
    }

    /// [§ 13.2.6.4.8 The "text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incdata)
    pub(in crate::parser) fn handle_text_mode(&mut self, token: &Token) {
        match token {
            // "A character token: Insert the token's character."
            Token::Character(c) => self.insert_character(*c),

            // "An end-of-file token: Parse error. If the current node is a
            // script element, then set its already started to true. Pop the
            // current node off the stack of open elements. Switch the
            // insertion mode to the original insertion mode and reprocess the
            // token."
            Token::EndOfFile => {
                self.token_error(ParseErrorCode::EofInElement, token);
                let _ = self.pop_current_node();
                self.insertion_mode = self
                    .original_insertion_mode
                    .take()
                    .unwrap_or(InsertionMode::InBody);
                self.process_token(token);
            }

            // "An end tag whose tag name is "script": ... Pop the current node
            // off the stack of open elements. Switch the insertion mode to the
            // original insertion mode." Scripts are not run.
            //
            // "Any other end tag: Pop the current node off the stack of open
            // elements. Switch the insertion mode to the original insertion
            // mode."
            Token::Tag(tag) if tag.kind == End => {
                let _ = self.pop_current_node();
                self.insertion_mode = self
                    .original_insertion_mode
                    .take()
                    .unwrap_or(InsertionMode::InBody);
            }

            // The tokenizer only produces characters, end tags and EOF in the
            // text-only states.
            _ => {}
        }
    }
}
