//! [§ 13.2.6.4.18 The "in template" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intemplate)
//!
//! Template contents are kept as ordinary children of the `template`
//! element.

use crate::error::ParseErrorCode;
use crate::parser::core::{HTMLParser, InsertionMode};
use crate::tokenizer::TagKind::{End, Start};
use crate::tokenizer::Token;

impl HTMLParser {
    /// [§ 13.2.6.4.18 The "in template" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intemplate)
    pub(in crate::parser) fn handle_in_template_mode(&mut self, token: &Token) {
        match token {
            // "A character token; A comment token; A DOCTYPE token: Process the
            // token using the rules for the "in body" insertion mode."
            Token::Character(_) | Token::Comment(_) | Token::Doctype(_) => {
                self.process_using_rules_for(InsertionMode::InBody, token);
            }

            Token::Tag(tag) => match (tag.kind, tag.name.as_str()) {
                // "A start tag whose tag name is one of: "base", "basefont",
                // "bgsound", "link", "meta", "noframes", "script", "style",
                // "template", "title"; An end tag whose tag name is "template":
                // Process the token using the rules for the "in head"
                // insertion mode."
                (
                    Start,
                    "base" | "basefont" | "bgsound" | "link" | "meta" | "noframes" | "script"
                    | "style" | "template" | "title",
                )
                | (End, "template") => self.process_using_rules_for(InsertionMode::InHead, token),

                // "A start tag whose tag name is one of: "caption", "colgroup",
                // "tbody", "tfoot", "thead": Pop the current template insertion
                // mode off the stack of template insertion modes. Push "in
                // table" onto the stack of template insertion modes so that it
                // is the new current template insertion mode. Switch the
                // insertion mode to "in table", and reprocess the token."
                (Start, "caption" | "colgroup" | "tbody" | "tfoot" | "thead") => {
                    self.switch_template_mode(InsertionMode::InTable, token);
                }

                // "A start tag whose tag name is "col": ... "in column group""
                (Start, "col") => self.switch_template_mode(InsertionMode::InColumnGroup, token),

                // "A start tag whose tag name is "tr": ... "in table body""
                (Start, "tr") => self.switch_template_mode(InsertionMode::InTableBody, token),

                // "A start tag whose tag name is one of: "td", "th": ... "in row""
                (Start, "td" | "th") => self.switch_template_mode(InsertionMode::InRow, token),

                // "Any other start tag: ... "in body""
                (Start, _) => self.switch_template_mode(InsertionMode::InBody, token),

                // "Any other end tag: Parse error. Ignore the token."
                (End, _) => self.token_error(ParseErrorCode::UnexpectedEndTag, token),
            },

            // "An end-of-file token"
            Token::EndOfFile => {
                // "If there is no template element on the stack of open
                // elements, then stop parsing. (fragment case)"
                if !self.stack_contains("template") {
                    self.stop_parsing();
                    return;
                }

                // "Otherwise, this is a parse error. Pop elements from the stack
                // of open elements until a template element has been popped
                // from the stack. Clear the list of active formatting elements
                // up to the last marker. Pop the current template insertion mode
                // off the stack of template insertion modes. Reset the insertion
                // mode appropriately. Reprocess the token."
                self.token_error(ParseErrorCode::EofInElement, token);
                self.pop_until_html_element("template");
                self.clear_active_formatting_elements_to_last_marker();
                let _ = self.template_insertion_modes.pop();
                self.reset_insertion_mode_appropriately();
                self.process_token(token);
            }
        }
    }

    /// Replace the current template insertion mode with `mode`, switch to it
    /// and reprocess the token.
    fn switch_template_mode(&mut self, mode: InsertionMode, token: &Token) {
        let _ = self.template_insertion_modes.pop();
        self.template_insertion_modes.push(mode);
        self.insertion_mode = mode;
        self.process_token(token);
    }
}
