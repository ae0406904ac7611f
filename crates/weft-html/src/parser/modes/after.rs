//! Insertion modes after the body or frameset has been closed: after body,
//! in frameset, after frameset, after after body and after after frameset.

use weft_dom::NodeId;

use crate::error::ParseErrorCode;
use crate::parser::core::{HTMLParser, InsertionMode};
use crate::tokenizer::TagKind::{End, Start};
use crate::tokenizer::Token;

impl HTMLParser {
    /// [§ 13.2.6.4.19 The "after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-afterbody)
    pub(in crate::parser) fn handle_after_body_mode(&mut self, token: &Token) {
        match token {
            // "A character token that is one of U+0009 CHARACTER TABULATION,
            // ... or U+0020 SPACE: Process the token using the rules for the
            // "in body" insertion mode."
            _ if token.is_whitespace_character() => {
                self.process_using_rules_for(InsertionMode::InBody, token);
            }

            // "A comment token: Insert a comment as the last child of the first
            // element in the stack of open elements (the html element)."
            Token::Comment(data) => {
                let html = self
                    .stack_of_open_elements
                    .first()
                    .copied()
                    .unwrap_or(NodeId::ROOT);
                self.insert_comment_in(html, data);
            }

            // "A DOCTYPE token: Parse error. Ignore the token."
            Token::Doctype(_) => self.token_error(ParseErrorCode::UnexpectedDoctype, token),

            // "A start tag whose tag name is "html": Process the token using
            // the rules for the "in body" insertion mode."
            Token::Tag(tag) if tag.kind == Start && tag.name == "html" => {
                self.process_using_rules_for(InsertionMode::InBody, token);
            }

            // "An end tag whose tag name is "html": If the parser was created
            // as part of the HTML fragment parsing algorithm, this is a parse
            // error; ignore the token. (fragment case) Otherwise, switch the
            // insertion mode to "after after body"."
            Token::Tag(tag) if tag.kind == End && tag.name == "html" => {
                if self.context_element.is_some() {
                    self.token_error(ParseErrorCode::UnexpectedEndTag, token);
                    return;
                }
                self.insertion_mode = InsertionMode::AfterAfterBody;
            }

            // "An end-of-file token: Stop parsing."
            Token::EndOfFile => self.stop_parsing(),

            // "Anything else: Parse error. Switch the insertion mode to "in
            // body" and reprocess the token."
            _ => {
                self.unexpected_token(token);
                self.insertion_mode = InsertionMode::InBody;
                self.process_token(token);
            }
        }
    }

    /// [§ 13.2.6.4.20 The "in frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inframeset)
    pub(in crate::parser) fn handle_in_frameset_mode(&mut self, token: &Token) {
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

                // "A start tag whose tag name is "frameset": Insert an HTML
                // element for the token."
                (Start, "frameset") => {
                    let _ = self.insert_html_element(tag);
                }

                // "An end tag whose tag name is "frameset": If the current node
                // is the root html element, then this is a parse error; ignore
                // the token. (fragment case) Otherwise, pop the current node
                // from the stack of open elements. If the parser was not
                // created as part of the HTML fragment parsing algorithm
                // (fragment case), and the current node is no longer a
                // frameset element, then switch the insertion mode to "after
                // frameset"."
                (End, "frameset") => {
                    if self.stack_of_open_elements.len() <= 1 {
                        self.token_error(ParseErrorCode::UnexpectedEndTag, token);
                        return;
                    }
                    let _ = self.pop_current_node();
                    if self.context_element.is_none() && !self.current_node_is("frameset") {
                        self.insertion_mode = InsertionMode::AfterFrameset;
                    }
                }

                // "A start tag whose tag name is "frame": Insert an HTML element
                // for the token. Immediately pop the current node off the stack
                // of open elements. Acknowledge the token's self-closing flag,
                // if it is set."
                (Start, "frame") => self.insert_void_html_element(tag),

                // "A start tag whose tag name is "noframes": Process the token
                // using the rules for the "in head" insertion mode."
                (Start, "noframes") => self.process_using_rules_for(InsertionMode::InHead, token),

                // "Anything else: Parse error. Ignore the token."
                _ => self.unexpected_token(token),
            },

            // "An end-of-file token: If the current node is not the root html
            // element, then this is a parse error. Note: The current node can
            // only be the root html element in the fragment case. Stop
            // parsing."
            Token::EndOfFile => {
                if self.stack_of_open_elements.len() > 1 {
                    self.token_error(ParseErrorCode::EofInElement, token);
                }
                self.stop_parsing();
            }

            Token::Character(_) => self.unexpected_token(token),
        }
    }

    /// [§ 13.2.6.4.21 The "after frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-afterframeset)
    pub(in crate::parser) fn handle_after_frameset_mode(&mut self, token: &Token) {
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

                // "An end tag whose tag name is "html": Switch the insertion
                // mode to "after after frameset"."
                (End, "html") => self.insertion_mode = InsertionMode::AfterAfterFrameset,

                // "A start tag whose tag name is "noframes": Process the token
                // using the rules for the "in head" insertion mode."
                (Start, "noframes") => self.process_using_rules_for(InsertionMode::InHead, token),

                // "Anything else: Parse error. Ignore the token."
                _ => self.unexpected_token(token),
            },

            // "An end-of-file token: Stop parsing."
            Token::EndOfFile => self.stop_parsing(),

            Token::Character(_) => self.unexpected_token(token),
        }
    }

    /// [§ 13.2.6.4.22 The "after after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-after-body-insertion-mode)
    pub(in crate::parser) fn handle_after_after_body_mode(&mut self, token: &Token) {
        match token {
            // "A comment token: Insert a comment as the last child of the
            // Document object."
            Token::Comment(data) => self.insert_comment_in(NodeId::ROOT, data),

            // "A DOCTYPE token; A character token that is one of U+0009
            // CHARACTER TABULATION, ... or U+0020 SPACE; A start tag whose tag
            // name is "html": Process the token using the rules for the "in
            // body" insertion mode."
            Token::Doctype(_) => self.process_using_rules_for(InsertionMode::InBody, token),
            _ if token.is_whitespace_character() || token.start_tag_name() == Some("html") => {
                self.process_using_rules_for(InsertionMode::InBody, token);
            }

            // "An end-of-file token: Stop parsing."
            Token::EndOfFile => self.stop_parsing(),

            // "Anything else: Parse error. Switch the insertion mode to "in
            // body" and reprocess the token."
            _ => {
                self.unexpected_token(token);
                self.insertion_mode = InsertionMode::InBody;
                self.process_token(token);
            }
        }
    }

    /// [§ 13.2.6.4.23 The "after after frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-after-frameset-insertion-mode)
    pub(in crate::parser) fn handle_after_after_frameset_mode(&mut self, token: &Token) {
        match token {
            // "A comment token: Insert a comment as the last child of the
            // Document object."
            Token::Comment(data) => self.insert_comment_in(NodeId::ROOT, data),

            // "A DOCTYPE token; A character token that is one of U+0009
            // CHARACTER TABULATION, ... or U+0020 SPACE; A start tag whose tag
            // name is "html": Process the token using the rules for the "in
            // body" insertion mode."
            Token::Doctype(_) => self.process_using_rules_for(InsertionMode::InBody, token),
            _ if token.is_whitespace_character() || token.start_tag_name() == Some("html") => {
                self.process_using_rules_for(InsertionMode::InBody, token);
            }

            // "An end-of-file token: Stop parsing."
            Token::EndOfFile => self.stop_parsing(),

            // "A start tag whose tag name is "noframes": Process the token
            // using the rules for the "in head" insertion mode."
            _ if token.start_tag_name() == Some("noframes") => {
                self.process_using_rules_for(InsertionMode::InHead, token);
            }

            // "Anything else: Parse error. Ignore the token."
            _ => self.unexpected_token(token),
        }
    }
}
