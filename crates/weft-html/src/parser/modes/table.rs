//! Table insertion modes: in table, in table text, in caption, in column
//! group, in table body, in row and in cell.

use crate::error::ParseErrorCode;
use crate::parser::core::{HTMLParser, InsertionMode, is_hidden_input};
use crate::tokenizer::TagKind::{End, Start};
use crate::tokenizer::{Tag, Token};

impl HTMLParser {
    /// [§ 13.2.6.4.9 The "in table" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intable)
    pub(in crate::parser) fn handle_in_table_mode(&mut self, token: &Token) {
        match token {
            // "A character token, if the current node is table, tbody,
            // template, tfoot, thead, or tr element: Let the pending table
            // character tokens be an empty list of tokens. Let the original
            // insertion mode be the current insertion mode. Switch the
            // insertion mode to "in table text" and reprocess the token."
            Token::Character(_)
                if self.current_node_is_one_of(&[
                    "table", "tbody", "template", "tfoot", "thead", "tr",
                ]) =>
            {
                self.pending_table_characters.clear();
                self.original_insertion_mode = Some(self.insertion_mode);
                self.insertion_mode = InsertionMode::InTableText;
                self.process_token(token);
            }

            // "A comment token: Insert a comment."
            Token::Comment(data) => self.insert_comment(data),

            // "A DOCTYPE token: Parse error. Ignore the token."
            Token::Doctype(_) => self.token_error(ParseErrorCode::UnexpectedDoctype, token),

            // "An end-of-file token: Process the token using the rules for the
            // "in body" insertion mode."
            Token::EndOfFile => self.process_using_rules_for(InsertionMode::InBody, token),

            Token::Tag(tag) => match (tag.kind, tag.name.as_str()) {
                // "A start tag whose tag name is "caption": Clear the stack back
                // to a table context. Insert a marker at the end of the list of
                // active formatting elements. Insert an HTML element for the
                // token, then switch the insertion mode to "in caption"."
                (Start, "caption") => {
                    self.clear_stack_back_to_table_context();
                    self.push_active_formatting_marker();
                    let _ = self.insert_html_element(tag);
                    self.insertion_mode = InsertionMode::InCaption;
                }

                // "A start tag whose tag name is "colgroup": Clear the stack back
                // to a table context. Insert an HTML element for the token, then
                // switch the insertion mode to "in column group"."
                (Start, "colgroup") => {
                    self.clear_stack_back_to_table_context();
                    let _ = self.insert_html_element(tag);
                    self.insertion_mode = InsertionMode::InColumnGroup;
                }

                // "A start tag whose tag name is "col": Clear the stack back to
                // a table context. Insert an HTML element for a "colgroup" start
                // tag token with no attributes, then switch the insertion mode
                // to "in column group". Reprocess the current token."
                (Start, "col") => {
                    self.clear_stack_back_to_table_context();
                    let _ = self.insert_html_element(&Tag::start("colgroup"));
                    self.insertion_mode = InsertionMode::InColumnGroup;
                    self.process_token(token);
                }

                // "A start tag whose tag name is one of: "tbody", "tfoot",
                // "thead": Clear the stack back to a table context. Insert an
                // HTML element for the token, then switch the insertion mode to
                // "in table body"."
                (Start, "tbody" | "tfoot" | "thead") => {
                    self.clear_stack_back_to_table_context();
                    let _ = self.insert_html_element(tag);
                    self.insertion_mode = InsertionMode::InTableBody;
                }

                // "A start tag whose tag name is one of: "td", "th", "tr": Clear
                // the stack back to a table context. Insert an HTML element for a
                // "tbody" start tag token with no attributes, then switch the
                // insertion mode to "in table body". Reprocess the current
                // token."
                (Start, "td" | "th" | "tr") => {
                    self.clear_stack_back_to_table_context();
                    let _ = self.insert_html_element(&Tag::start("tbody"));
                    self.insertion_mode = InsertionMode::InTableBody;
                    self.process_token(token);
                }

                // "A start tag whose tag name is "table": Parse error. If the
                // stack of open elements does not have a table element in table
                // scope, ignore the token. Otherwise: Pop elements from this
                // stack until a table element has been popped from the stack.
                // Reset the insertion mode appropriately. Reprocess the token."
                (Start, "table") => {
                    self.token_error(ParseErrorCode::UnexpectedStartTag, token);
                    if self.has_element_in_table_scope("table") {
                        self.pop_until_html_element("table");
                        self.reset_insertion_mode_appropriately();
                        self.process_token(token);
                    }
                }

                // "An end tag whose tag name is "table": If the stack of open
                // elements does not have a table element in table scope, this is
                // a parse error; ignore the token. Otherwise: Pop elements from
                // this stack until a table element has been popped from the
                // stack. Reset the insertion mode appropriately."
                (End, "table") => {
                    if !self.has_element_in_table_scope("table") {
                        self.token_error(ParseErrorCode::UnexpectedEndTag, token);
                        return;
                    }
                    self.pop_until_html_element("table");
                    self.reset_insertion_mode_appropriately();
                }

                // "An end tag whose tag name is one of: "body", "caption",
                // "col", "colgroup", "html", "tbody", "td", "tfoot", "th",
                // "thead", "tr": Parse error. Ignore the token."
                (
                    End,
                    "body" | "caption" | "col" | "colgroup" | "html" | "tbody" | "td" | "tfoot"
                    | "th" | "thead" | "tr",
                ) => self.token_error(ParseErrorCode::UnexpectedEndTag, token),

                // "A start tag whose tag name is one of: "style", "script",
                // "template"; An end tag whose tag name is "template": Process
                // the token using the rules for the "in head" insertion mode."
                (Start, "style" | "script" | "template") | (End, "template") => {
                    self.process_using_rules_for(InsertionMode::InHead, token);
                }

                // "A start tag whose tag name is "input": If the token does not
                // have an attribute with the name "type", or if it does, but
                // that attribute's value is not an ASCII case-insensitive match
                // for the string "hidden", then: act as described in the
                // "anything else" entry below. Otherwise: Parse error. Insert an
                // HTML element for the token. Pop that input element off the
                // stack of open elements. Acknowledge the token's self-closing
                // flag, if it is set."
                (Start, "input") if is_hidden_input(tag) => {
                    self.token_error(ParseErrorCode::UnexpectedStartTag, token);
                    self.insert_void_html_element(tag);
                }

                // "A start tag whose tag name is "form": Parse error. If there
                // is a template element on the stack of open elements, or if the
                // form element pointer is not null, ignore the token. Otherwise:
                // Insert an HTML element for the token, and set the form element
                // pointer to point to the element created. Pop that form element
                // off the stack of open elements."
                (Start, "form") => {
                    self.token_error(ParseErrorCode::UnexpectedStartTag, token);
                    if self.stack_contains("template") || self.form_element_pointer.is_some() {
                        return;
                    }
                    let form = self.insert_html_element(tag);
                    self.form_element_pointer = Some(form);
                    let _ = self.pop_current_node();
                }

                _ => self.in_table_anything_else(token),
            },

            Token::Character(_) => self.in_table_anything_else(token),
        }
    }

    /// "Anything else: Parse error. Enable foster parenting, process the token
    /// using the rules for the "in body" insertion mode, and then disable
    /// foster parenting."
    fn in_table_anything_else(&mut self, token: &Token) {
        self.unexpected_token(token);
        self.foster_parenting = true;
        self.process_using_rules_for(InsertionMode::InBody, token);
        self.foster_parenting = false;
    }

    /// [§ 13.2.6.4.10 The "in table text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intabletext)
    pub(in crate::parser) fn handle_in_table_text_mode(&mut self, token: &Token) {
        match token {
            // "A character token that is U+0000 NULL: Parse error. Ignore the
            // token."
            Token::Character('\0') => {
                self.token_error(ParseErrorCode::UnexpectedNullCharacter, token);
            }

            // "Any other character token: Append the character token to the
            // pending table character tokens list."
            Token::Character(c) => self.pending_table_characters.push(*c),

            // "Anything else: If any of the tokens in the pending table
            // character tokens list are character tokens that are not ASCII
            // whitespace, then this is a parse error: reprocess the character
            // tokens in the pending table character tokens list using the
            // rules given in the "anything else" entry in the "in table"
            // insertion mode. Otherwise, insert the characters given by the
            // pending table character tokens list. Switch the insertion mode to
            // the original insertion mode and reprocess the token."
            _ => {
                let pending = std::mem::take(&mut self.pending_table_characters);
                if pending.chars().any(|c| !Self::is_whitespace(c)) {
                    self.parse_error(ParseErrorCode::UnexpectedCharacter, &pending);
                    self.foster_parenting = true;
                    for c in pending.chars() {
                        self.process_using_rules_for(InsertionMode::InBody, &Token::Character(c));
                    }
                    self.foster_parenting = false;
                } else {
                    for c in pending.chars() {
                        self.insert_character(c);
                    }
                }
                self.insertion_mode = self
                    .original_insertion_mode
                    .take()
                    .unwrap_or(InsertionMode::InTable);
                self.process_token(token);
            }
        }
    }

    /// [§ 13.2.6.4.11 The "in caption" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incaption)
    pub(in crate::parser) fn handle_in_caption_mode(&mut self, token: &Token) {
        let Token::Tag(tag) = token else {
            self.process_using_rules_for(InsertionMode::InBody, token);
            return;
        };
        match (tag.kind, tag.name.as_str()) {
            // "An end tag whose tag name is "caption""
            (End, "caption") => {
                let _ = self.close_caption(token);
            }

            // "A start tag whose tag name is one of: "caption", "col",
            // "colgroup", "tbody", "td", "tfoot", "th", "thead", "tr"; An end
            // tag whose tag name is "table": If the stack of open elements does
            // not have a caption element in table scope, this is a parse error;
            // ignore the token. (fragment case) Otherwise: ... Reprocess the
            // token."
            (
                Start,
                "caption" | "col" | "colgroup" | "tbody" | "td" | "tfoot" | "th" | "thead" | "tr",
            )
            | (End, "table") => {
                if self.close_caption(token) {
                    self.process_token(token);
                }
            }

            // "An end tag whose tag name is one of: "body", "col", "colgroup",
            // "html", "tbody", "td", "tfoot", "th", "thead", "tr": Parse error.
            // Ignore the token."
            (
                End,
                "body" | "col" | "colgroup" | "html" | "tbody" | "td" | "tfoot" | "th" | "thead"
                | "tr",
            ) => self.token_error(ParseErrorCode::UnexpectedEndTag, token),

            // "Anything else: Process the token using the rules for the "in
            // body" insertion mode."
            _ => self.process_using_rules_for(InsertionMode::InBody, token),
        }
    }

    /// "If the stack of open elements does not have a caption element in table
    /// scope, this is a parse error; ignore the token. (fragment case)
    /// Otherwise: Generate implied end tags. Now, if the current node is not a
    /// caption element, then this is a parse error. Pop elements from this
    /// stack until a caption element has been popped from the stack. Clear the
    /// list of active formatting elements up to the last marker. Switch the
    /// insertion mode to "in table"."
    ///
    /// Returns whether the caption was closed.
    fn close_caption(&mut self, token: &Token) -> bool {
        if !self.has_element_in_table_scope("caption") {
            self.token_error(ParseErrorCode::UnexpectedEndTag, token);
            return false;
        }
        self.generate_implied_end_tags();
        if !self.current_node_is("caption") {
            self.token_error(ParseErrorCode::MisnestedTag, token);
        }
        self.pop_until_html_element("caption");
        self.clear_active_formatting_elements_to_last_marker();
        self.insertion_mode = InsertionMode::InTable;
        true
    }

    /// [§ 13.2.6.4.12 The "in column group" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incolgroup)
    pub(in crate::parser) fn handle_in_column_group_mode(&mut self, token: &Token) {
        match token {
            // "A character token that is one of U+0009 CHARACTER TABULATION,
            // ... or U+0020 SPACE: Insert the character."
            Token::Character(c) if Self::is_whitespace(*c) => self.insert_character(*c),

            // "A comment token: Insert a comment."
            Token::Comment(data) => self.insert_comment(data),

            // "A DOCTYPE token: Parse error. Ignore the token."
            Token::Doctype(_) => self.token_error(ParseErrorCode::UnexpectedDoctype, token),

            // "An end-of-file token: Process the token using the rules for the
            // "in body" insertion mode."
            Token::EndOfFile => self.process_using_rules_for(InsertionMode::InBody, token),

            Token::Tag(tag) => match (tag.kind, tag.name.as_str()) {
                // "A start tag whose tag name is "html": Process the token
                // using the rules for the "in body" insertion mode."
                (Start, "html") => self.process_using_rules_for(InsertionMode::InBody, token),

                // "A start tag whose tag name is "col": Insert an HTML element
                // for the token. Immediately pop the current node off the stack
                // of open elements. Acknowledge the token's self-closing flag,
                // if it is set."
                (Start, "col") => self.insert_void_html_element(tag),

                // "An end tag whose tag name is "colgroup": If the current node
                // is not a colgroup element, then this is a parse error; ignore
                // the token. Otherwise, pop the current node (which will be a
                // colgroup element) from the stack of open elements. Switch the
                // insertion mode to "in table"."
                (End, "colgroup") => {
                    if !self.current_node_is("colgroup") {
                        self.token_error(ParseErrorCode::UnexpectedEndTag, token);
                        return;
                    }
                    let _ = self.pop_current_node();
                    self.insertion_mode = InsertionMode::InTable;
                }

                // "An end tag whose tag name is "col": Parse error. Ignore the
                // token."
                (End, "col") => self.token_error(ParseErrorCode::UnexpectedEndTag, token),

                // "A start tag whose tag name is "template"; An end tag whose
                // tag name is "template": Process the token using the rules for
                // the "in head" insertion mode."
                (_, "template") => self.process_using_rules_for(InsertionMode::InHead, token),

                _ => self.in_column_group_anything_else(token),
            },

            Token::Character(_) => self.in_column_group_anything_else(token),
        }
    }

    /// "Anything else: If the current node is not a colgroup element, then
    /// this is a parse error; ignore the token. Otherwise, pop the current
    /// node from the stack of open elements. Switch the insertion mode to "in
    /// table". Reprocess the token."
    fn in_column_group_anything_else(&mut self, token: &Token) {
        if !self.current_node_is("colgroup") {
            self.unexpected_token(token);
            return;
        }
        let _ = self.pop_current_node();
        self.insertion_mode = InsertionMode::InTable;
        self.process_token(token);
    }

    /// [§ 13.2.6.4.13 The "in table body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intbody)
    pub(in crate::parser) fn handle_in_table_body_mode(&mut self, token: &Token) {
        let Token::Tag(tag) = token else {
            self.process_using_rules_for(InsertionMode::InTable, token);
            return;
        };
        match (tag.kind, tag.name.as_str()) {
            // "A start tag whose tag name is "tr": Clear the stack back to a
            // table body context. Insert an HTML element for the token, then
            // switch the insertion mode to "in row"."
            (Start, "tr") => {
                self.clear_stack_back_to_table_body_context();
                let _ = self.insert_html_element(tag);
                self.insertion_mode = InsertionMode::InRow;
            }

            // "A start tag whose tag name is one of: "th", "td": Parse error.
            // Clear the stack back to a table body context. Insert an HTML
            // element for a "tr" start tag token with no attributes, then
            // switch the insertion mode to "in row". Reprocess the current
            // token."
            (Start, "th" | "td") => {
                self.token_error(ParseErrorCode::UnexpectedStartTag, token);
                self.clear_stack_back_to_table_body_context();
                let _ = self.insert_html_element(&Tag::start("tr"));
                self.insertion_mode = InsertionMode::InRow;
                self.process_token(token);
            }

            // "An end tag whose tag name is one of: "tbody", "tfoot", "thead":
            // If the stack of open elements does not have an element in table
            // scope that is an HTML element with the same tag name as the
            // token, this is a parse error; ignore the token. Otherwise: Clear
            // the stack back to a table body context. Pop the current node from
            // the stack of open elements. Switch the insertion mode to "in
            // table"."
            (End, "tbody" | "tfoot" | "thead") => {
                if !self.has_element_in_table_scope(&tag.name) {
                    self.token_error(ParseErrorCode::UnexpectedEndTag, token);
                    return;
                }
                self.clear_stack_back_to_table_body_context();
                let _ = self.pop_current_node();
                self.insertion_mode = InsertionMode::InTable;
            }

            // "A start tag whose tag name is one of: "caption", "col",
            // "colgroup", "tbody", "tfoot", "thead"; An end tag whose tag name
            // is "table": If the stack of open elements does not have a tbody,
            // thead, or tfoot element in table scope, this is a parse error;
            // ignore the token. Otherwise: Clear the stack back to a table body
            // context. Pop the current node from the stack of open elements.
            // Switch the insertion mode to "in table". Reprocess the token."
            (Start, "caption" | "col" | "colgroup" | "tbody" | "tfoot" | "thead")
            | (End, "table") => {
                if !self.has_any_element_in_table_scope(&["tbody", "thead", "tfoot"]) {
                    self.token_error(ParseErrorCode::UnexpectedEndTag, token);
                    return;
                }
                self.clear_stack_back_to_table_body_context();
                let _ = self.pop_current_node();
                self.insertion_mode = InsertionMode::InTable;
                self.process_token(token);
            }

            // "An end tag whose tag name is one of: "body", "caption", "col",
            // "colgroup", "html", "td", "th", "tr": Parse error. Ignore the
            // token."
            (End, "body" | "caption" | "col" | "colgroup" | "html" | "td" | "th" | "tr") => {
                self.token_error(ParseErrorCode::UnexpectedEndTag, token);
            }

            // "Anything else: Process the token using the rules for the "in
            // table" insertion mode."
            _ => self.process_using_rules_for(InsertionMode::InTable, token),
        }
    }

    /// [§ 13.2.6.4.14 The "in row" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intr)
    pub(in crate::parser) fn handle_in_row_mode(&mut self, token: &Token) {
        let Token::Tag(tag) = token else {
            self.process_using_rules_for(InsertionMode::InTable, token);
            return;
        };
        match (tag.kind, tag.name.as_str()) {
            // "A start tag whose tag name is one of: "th", "td": Clear the
            // stack back to a table row context. Insert an HTML element for
            // the token, then switch the insertion mode to "in cell". Insert a
            // marker at the end of the list of active formatting elements."
            (Start, "th" | "td") => {
                self.clear_stack_back_to_table_row_context();
                let _ = self.insert_html_element(tag);
                self.insertion_mode = InsertionMode::InCell;
                self.push_active_formatting_marker();
            }

            // "An end tag whose tag name is "tr": If the stack of open elements
            // does not have a tr element in table scope, this is a parse
            // error; ignore the token. Otherwise: Clear the stack back to a
            // table row context. Pop the current node (which will be a tr
            // element) from the stack of open elements. Switch the insertion
            // mode to "in table body"."
            (End, "tr") => {
                let _ = self.close_row(token);
            }

            // "A start tag whose tag name is one of: "caption", "col",
            // "colgroup", "tbody", "tfoot", "thead", "tr"; An end tag whose tag
            // name is "table": If the stack of open elements does not have a tr
            // element in table scope, this is a parse error; ignore the token.
            // Otherwise: ... Reprocess the token."
            (Start, "caption" | "col" | "colgroup" | "tbody" | "tfoot" | "thead" | "tr")
            | (End, "table") => {
                if self.close_row(token) {
                    self.process_token(token);
                }
            }

            // "An end tag whose tag name is one of: "tbody", "tfoot", "thead":
            // If the stack of open elements does not have an element in table
            // scope that is an HTML element with the same tag name as the
            // token, this is a parse error; ignore the token. If the stack of
            // open elements does not have a tr element in table scope, ignore
            // the token. Otherwise: ... Reprocess the token."
            (End, "tbody" | "tfoot" | "thead") => {
                if !self.has_element_in_table_scope(&tag.name) {
                    self.token_error(ParseErrorCode::UnexpectedEndTag, token);
                    return;
                }
                if self.close_row(token) {
                    self.process_token(token);
                }
            }

            // "An end tag whose tag name is one of: "body", "caption", "col",
            // "colgroup", "html", "td", "th": Parse error. Ignore the token."
            (End, "body" | "caption" | "col" | "colgroup" | "html" | "td" | "th") => {
                self.token_error(ParseErrorCode::UnexpectedEndTag, token);
            }

            // "Anything else: Process the token using the rules for the "in
            // table" insertion mode."
            _ => self.process_using_rules_for(InsertionMode::InTable, token),
        }
    }

    /// Close the current row if a `tr` is in table scope. Returns whether it
    /// was closed.
    fn close_row(&mut self, token: &Token) -> bool {
        if !self.has_element_in_table_scope("tr") {
            self.token_error(ParseErrorCode::UnexpectedEndTag, token);
            return false;
        }
        self.clear_stack_back_to_table_row_context();
        let _ = self.pop_current_node();
        self.insertion_mode = InsertionMode::InTableBody;
        true
    }

    /// [§ 13.2.6.4.15 The "in cell" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intd)
    pub(in crate::parser) fn handle_in_cell_mode(&mut self, token: &Token) {
        let Token::Tag(tag) = token else {
            self.process_using_rules_for(InsertionMode::InBody, token);
            return;
        };
        match (tag.kind, tag.name.as_str()) {
            // "An end tag whose tag name is one of: "td", "th": If the stack of
            // open elements does not have an element in table scope that is an
            // HTML element with the same tag name as that of the token, then
            // this is a parse error; ignore the token. Otherwise: Generate
            // implied end tags. Now, if the current node is not an HTML element
            // with the same tag name as the token, then this is a parse error.
            // Pop elements from the stack of open elements until an HTML
            // element with the same tag name as the token has been popped from
            // the stack. Clear the list of active formatting elements up to
            // the last marker. Switch the insertion mode to "in row"."
            (End, "td" | "th") => {
                if !self.has_element_in_table_scope(&tag.name) {
                    self.token_error(ParseErrorCode::UnexpectedEndTag, token);
                    return;
                }
                self.generate_implied_end_tags();
                if !self.current_node_is(&tag.name) {
                    self.token_error(ParseErrorCode::MisnestedTag, token);
                }
                self.pop_until_html_element(&tag.name);
                self.clear_active_formatting_elements_to_last_marker();
                self.insertion_mode = InsertionMode::InRow;
            }

            // "A start tag whose tag name is one of: "caption", "col",
            // "colgroup", "tbody", "td", "tfoot", "th", "thead", "tr": Assert:
            // The stack of open elements has a td or th element in table scope.
            // Close the cell (see below) and reprocess the token."
            (
                Start,
                "caption" | "col" | "colgroup" | "tbody" | "td" | "tfoot" | "th" | "thead" | "tr",
            ) => {
                if !self.has_any_element_in_table_scope(&["td", "th"]) {
                    self.token_error(ParseErrorCode::UnexpectedStartTag, token);
                    return;
                }
                self.close_the_cell(token);
                self.process_token(token);
            }

            // "An end tag whose tag name is one of: "body", "caption", "col",
            // "colgroup", "html": Parse error. Ignore the token."
            (End, "body" | "caption" | "col" | "colgroup" | "html") => {
                self.token_error(ParseErrorCode::UnexpectedEndTag, token);
            }

            // "An end tag whose tag name is one of: "table", "tbody", "tfoot",
            // "thead", "tr": If the stack of open elements does not have an
            // element in table scope that is an HTML element with the same tag
            // name as that of the token, then this is a parse error; ignore
            // the token. Otherwise, close the cell (see below) and reprocess
            // the token."
            (End, "table" | "tbody" | "tfoot" | "thead" | "tr") => {
                if !self.has_element_in_table_scope(&tag.name) {
                    self.token_error(ParseErrorCode::UnexpectedEndTag, token);
                    return;
                }
                self.close_the_cell(token);
                self.process_token(token);
            }

            // "Anything else: Process the token using the rules for the "in
            // body" insertion mode."
            _ => self.process_using_rules_for(InsertionMode::InBody, token),
        }
    }

    /// "Where the steps above say to close the cell, they mean to run the
    /// following algorithm:
    /// 1. Generate implied end tags.
    /// 2. If the current node is not now a td element or a th element, then
    ///    this is a parse error.
    /// 3. Pop elements from the stack of open elements until a td element or a
    ///    th element has been popped from the stack.
    /// 4. Clear the list of active formatting elements up to the last marker.
    /// 5. Switch the insertion mode to "in row"."
    fn close_the_cell(&mut self, token: &Token) {
        self.generate_implied_end_tags();
        if !self.current_node_is_one_of(&["td", "th"]) {
            self.token_error(ParseErrorCode::MisnestedTag, token);
        }
        self.pop_until_one_of(&["td", "th"]);
        self.clear_active_formatting_elements_to_last_marker();
        self.insertion_mode = InsertionMode::InRow;
    }
}
