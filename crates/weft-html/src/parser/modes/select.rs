//! Select insertion modes: in select and in select in table.

use crate::error::ParseErrorCode;
use crate::parser::core::{HTMLParser, InsertionMode};
use crate::tokenizer::TagKind::{End, Start};
use crate::tokenizer::Token;

const TABLE_PARTS: &[&str] = &["caption", "table", "tbody", "tfoot", "thead", "tr", "td", "th"];

impl HTMLParser {
    /// [§ 13.2.6.4.16 The "in select" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inselect)
    pub(in crate::parser) fn handle_in_select_mode(&mut self, token: &Token) {
        match token {
            // "A character token that is U+0000 NULL: Parse error. Ignore the
            // token."
            Token::Character('\0') => {
                self.token_error(ParseErrorCode::UnexpectedNullCharacter, token);
            }

            // "Any other character token: Insert the token's character."
            Token::Character(c) => self.insert_character(*c),

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

                // "A start tag whose tag name is "option": If the current node
                // is an option element, pop that node from the stack of open
                // elements. Insert an HTML element for the token."
                (Start, "option") => {
                    if self.current_node_is("option") {
                        let _ = self.pop_current_node();
                    }
                    let _ = self.insert_html_element(tag);
                }

                // "A start tag whose tag name is "optgroup": If the current node
                // is an option element, pop that node from the stack of open
                // elements. If the current node is an optgroup element, pop
                // that node from the stack of open elements. Insert an HTML
                // element for the token."
                (Start, "optgroup") => {
                    self.close_option_and_optgroup();
                    let _ = self.insert_html_element(tag);
                }

                // "A start tag whose tag name is "hr": ... Insert an HTML
                // element for the token. Immediately pop the current node off
                // the stack of open elements. Acknowledge the token's
                // self-closing flag, if it is set."
                (Start, "hr") => {
                    self.close_option_and_optgroup();
                    self.insert_void_html_element(tag);
                }

                // "An end tag whose tag name is "optgroup": First, if the
                // current node is an option element, and the node immediately
                // before it in the stack of open elements is an optgroup
                // element, then pop the current node from the stack of open
                // elements. If the current node is an optgroup element, then
                // pop that node from the stack of open elements. Otherwise,
                // this is a parse error; ignore the token."
                (End, "optgroup") => {
                    let len = self.stack_of_open_elements.len();
                    if self.current_node_is("option")
                        && len >= 2
                        && self.is_html_element(self.stack_of_open_elements[len - 2], "optgroup")
                    {
                        let _ = self.pop_current_node();
                    }
                    if self.current_node_is("optgroup") {
                        let _ = self.pop_current_node();
                    } else {
                        self.token_error(ParseErrorCode::UnexpectedEndTag, token);
                    }
                }

                // "An end tag whose tag name is "option": If the current node is
                // an option element, then pop that node from the stack of open
                // elements. Otherwise, this is a parse error; ignore the token."
                (End, "option") => {
                    if self.current_node_is("option") {
                        let _ = self.pop_current_node();
                    } else {
                        self.token_error(ParseErrorCode::UnexpectedEndTag, token);
                    }
                }

                // "An end tag whose tag name is "select": If the stack of open
                // elements does not have a select element in select scope, this
                // is a parse error; ignore the token. (fragment case)
                // Otherwise: Pop elements from the stack of open elements until
                // a select element has been popped from the stack. Reset the
                // insertion mode appropriately."
                (End, "select") => {
                    if !self.has_element_in_select_scope("select") {
                        self.token_error(ParseErrorCode::UnexpectedEndTag, token);
                        return;
                    }
                    self.close_select();
                }

                // "A start tag whose tag name is "select": Parse error. If the
                // stack of open elements does not have a select element in
                // select scope, ignore the token. (fragment case) Otherwise:
                // Pop elements from the stack of open elements until a select
                // element has been popped from the stack. Reset the insertion
                // mode appropriately."
                (Start, "select") => {
                    self.token_error(ParseErrorCode::UnexpectedStartTag, token);
                    if self.has_element_in_select_scope("select") {
                        self.close_select();
                    }
                }

                // "A start tag whose tag name is one of: "input", "keygen",
                // "textarea": Parse error. If the stack of open elements does
                // not have a select element in select scope, ignore the token.
                // (fragment case) Otherwise: ... Reprocess the token."
                (Start, "input" | "keygen" | "textarea") => {
                    self.token_error(ParseErrorCode::UnexpectedStartTag, token);
                    if self.has_element_in_select_scope("select") {
                        self.close_select();
                        self.process_token(token);
                    }
                }

                // "A start tag whose tag name is one of: "script", "template";
                // An end tag whose tag name is "template": Process the token
                // using the rules for the "in head" insertion mode."
                (Start, "script" | "template") | (End, "template") => {
                    self.process_using_rules_for(InsertionMode::InHead, token);
                }

                // "Anything else: Parse error. Ignore the token."
                _ => self.unexpected_token(token),
            },
        }
    }

    fn close_option_and_optgroup(&mut self) {
        if self.current_node_is("option") {
            let _ = self.pop_current_node();
        }
        if self.current_node_is("optgroup") {
            let _ = self.pop_current_node();
        }
    }

    fn close_select(&mut self) {
        self.pop_until_html_element("select");
        self.reset_insertion_mode_appropriately();
    }

    /// [§ 13.2.6.4.17 The "in select in table" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inselectintable)
    pub(in crate::parser) fn handle_in_select_in_table_mode(&mut self, token: &Token) {
        match token {
            // "A start tag whose tag name is one of: "caption", "table",
            // "tbody", "tfoot", "thead", "tr", "td", "th": Parse error. Pop
            // elements from the stack of open elements until a select element
            // has been popped from the stack. Reset the insertion mode
            // appropriately. Reprocess the token."
            Token::Tag(tag) if tag.is_start() && TABLE_PARTS.contains(&tag.name.as_str()) => {
                self.token_error(ParseErrorCode::UnexpectedStartTag, token);
                self.close_select();
                self.process_token(token);
            }

            // "An end tag whose tag name is one of: "caption", "table",
            // "tbody", "tfoot", "thead", "tr", "td", "th": Parse error. If the
            // stack of open elements does not have an element in table scope
            // that is an HTML element with the same tag name as that of the
            // token, then ignore the token. Otherwise: ... Reprocess the token."
            Token::Tag(tag) if TABLE_PARTS.contains(&tag.name.as_str()) => {
                self.token_error(ParseErrorCode::UnexpectedEndTag, token);
                if self.has_element_in_table_scope(&tag.name) {
                    self.close_select();
                    self.process_token(token);
                }
            }

            // "Anything else: Process the token using the rules for the "in
            // select" insertion mode."
            _ => self.process_using_rules_for(InsertionMode::InSelect, token),
        }
    }
}
