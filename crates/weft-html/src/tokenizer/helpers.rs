//! Helper functions for the HTML tokenizer.
//!
//! [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
//!
//! This module contains utility functions used throughout the tokenizer:
//! - State transitions ("Switch to", "Reconsume in")
//! - Input/character handling ("Consume the next input character")
//! - Token emission ("Emit the current token")
//! - Attribute helpers for duplicate detection
//! - Parse error reporting

use weft_common::warning::warn_once;

use super::core::{HTMLTokenizer, TokenizerState};
use super::token::{Attribute, TagKind, Token};
use crate::error::{ParseError, ParseErrorCode};

// =============================================================================
// State Transition Helpers
// =============================================================================

impl HTMLTokenizer {
    /// "Switch to the X state"
    ///
    /// Transitions to a new state. The next character will be consumed on the
    /// next iteration of the main loop.
    pub(super) const fn switch_to(&mut self, new_state: TokenizerState) {
        self.state = new_state;
    }

    /// "Reconsume in the X state"
    ///
    /// Transitions to a new state without consuming the current character.
    /// The same character will be processed again in the new state.
    pub(super) const fn reconsume_in(&mut self, new_state: TokenizerState) {
        self.reconsume = true;
        self.state = new_state;
    }
}

// =============================================================================
// Input/Character Helpers
// =============================================================================

impl HTMLTokenizer {
    /// "Consume the next input character"
    ///
    /// Returns the character at the current position and advances the position.
    /// Returns None if we've reached the end of input.
    pub(super) fn consume(&mut self) -> Option<char> {
        let c = self.input[self.current_pos..].chars().next()?;
        self.current_pos += c.len_utf8();
        Some(c)
    }

    /// Peek at a codepoint at the given offset from the current position without
    /// consuming it.
    #[must_use]
    pub(super) fn peek_codepoint(&self, offset: usize) -> Option<char> {
        self.input[self.current_pos..].chars().nth(offset)
    }

    /// "If the next few characters are..."
    ///
    /// Check if the next few characters match the target string exactly.
    #[must_use]
    pub(super) fn next_few_characters_are(&self, target: &str) -> bool {
        self.input[self.current_pos..].starts_with(target)
    }

    /// "ASCII case-insensitive match for the word 'DOCTYPE'"
    #[must_use]
    pub(super) fn next_few_characters_are_case_insensitive(&self, target: &str) -> bool {
        let mut upcoming = self.input[self.current_pos..].chars();
        target
            .chars()
            .all(|expected| upcoming.next().is_some_and(|c| c.eq_ignore_ascii_case(&expected)))
    }

    /// "the six characters starting from the current input character are an
    /// ASCII case-insensitive match for the word ..."
    #[must_use]
    pub(super) fn current_and_next_characters_are_case_insensitive(&self, target: &str) -> bool {
        let mut chars = target.chars();
        let Some(first) = chars.next() else {
            return true;
        };
        self.current_input_character
            .is_some_and(|c| c.eq_ignore_ascii_case(&first))
            && self.next_few_characters_are_case_insensitive(chars.as_str())
    }

    /// Consume as many characters as `target` has.
    /// Caller must have already verified the characters are present.
    pub(super) fn consume_string(&mut self, target: &str) {
        for _ in target.chars() {
            let _ = self.consume();
        }
    }

    /// [§ 12.1.4 ASCII whitespace](https://infra.spec.whatwg.org/#ascii-whitespace)
    ///
    /// NOTE: HTML tokenizer uses a subset excluding CR (which is normalized earlier).
    pub(super) const fn is_whitespace_char(input_char: char) -> bool {
        // "U+0009 CHARACTER TABULATION (tab)"
        // "U+000A LINE FEED (LF)"
        // "U+000C FORM FEED (FF)"
        // "U+0020 SPACE"
        matches!(input_char, ' ' | '\t' | '\n' | '\x0C')
    }
}

// =============================================================================
// Token Emission Helpers
// =============================================================================

impl HTMLTokenizer {
    /// "Emit the current token" - adds the token to the output queue.
    pub(super) fn emit_token(&mut self) {
        self.finish_attribute();
        let Some(token) = self.current_token.take() else {
            return;
        };

        if let Token::Tag(tag) = &token {
            match tag.kind {
                // Track the last start tag name for RCDATA/RAWTEXT end tag detection
                TagKind::Start => self.last_start_tag_name = Some(tag.name.clone()),
                // [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
                // "When an end tag token is emitted with attributes, that is an
                // end-tag-with-attributes parse error. When an end tag token is
                // emitted with its self-closing flag set, that is an
                // end-tag-with-trailing-solidus parse error."
                TagKind::End => {
                    if !tag.attributes.is_empty() {
                        self.parse_error(ParseErrorCode::EndTagWithAttributes);
                    }
                    if tag.self_closing {
                        self.parse_error(ParseErrorCode::EndTagWithTrailingSolidus);
                    }
                }
            }
        }
        self.token_queue.push_back(token);
    }

    /// "Emit the current input character as a character token."
    pub(super) fn emit_character_token(&mut self, c: char) {
        self.token_queue.push_back(Token::Character(c));
    }

    /// "This is an unexpected-null-character parse error. Emit a U+FFFD
    /// REPLACEMENT CHARACTER character token."
    pub(super) fn emit_replacement_character(&mut self) {
        self.parse_error(ParseErrorCode::UnexpectedNullCharacter);
        self.emit_character_token('\u{FFFD}');
    }

    /// "Emit an end-of-file token."
    pub(super) fn emit_eof_token(&mut self) {
        self.token_queue.push_back(Token::EndOfFile);
        self.at_eof = true;
    }

    /// Apply `f` to the current token, if there is one.
    pub(super) fn with_current_token(&mut self, f: impl FnOnce(&mut Token)) {
        if let Some(token) = self.current_token.as_mut() {
            f(token);
        }
    }

    pub(super) fn append_to_tag_name(&mut self, c: char) {
        self.with_current_token(|token| token.append_to_tag_name(c));
    }
}

// =============================================================================
// RCDATA/RAWTEXT Helpers
// =============================================================================

impl HTMLTokenizer {
    /// "An appropriate end tag token is an end tag token whose tag name matches
    /// the tag name of the last start tag to have been emitted from this
    /// tokenizer, if any. If no start tag has been emitted from this tokenizer,
    /// then no end tag token is appropriate."
    pub(super) fn is_appropriate_end_tag_token(&self) -> bool {
        match (&self.last_start_tag_name, &self.current_token) {
            (Some(last_start_tag), Some(token)) => {
                token.end_tag_name() == Some(last_start_tag.as_str())
            }
            _ => false,
        }
    }

    /// [§ 13.2.5.11 RCDATA end tag name state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-end-tag-name-state)
    ///
    /// "Anything else":
    /// "Emit a U+003C LESS-THAN SIGN character token, a U+002F SOLIDUS character
    /// token, and a character token for each of the characters in the temporary
    /// buffer (in the order they were added to the buffer). Reconsume in the
    /// RCDATA state."
    ///
    /// The RAWTEXT, script data and script data escaped end tag name states do
    /// the same with their own `text_state`.
    pub(super) fn emit_end_tag_name_anything_else(&mut self, text_state: TokenizerState) {
        self.emit_character_token('<');
        self.emit_character_token('/');
        let buffer = std::mem::take(&mut self.temporary_buffer);
        for c in buffer.chars() {
            self.emit_character_token(c);
        }
        self.temporary_buffer = buffer;
        self.current_token = None;
        self.reconsume_in(text_state);
    }
}

// =============================================================================
// Attribute Helpers
// =============================================================================

impl HTMLTokenizer {
    /// "Start a new attribute in the current tag token."
    pub(super) fn start_new_attribute(&mut self) {
        self.finish_attribute();
        self.current_attribute = Some(Attribute::new(String::new(), String::new()));
    }

    pub(super) fn append_to_attribute_name(&mut self, c: char) {
        if let Some(attribute) = self.current_attribute.as_mut() {
            attribute.name.push(c);
        }
    }

    pub(super) fn append_to_attribute_value(&mut self, c: char) {
        if let Some(attribute) = self.current_attribute.as_mut() {
            attribute.value.push(c);
        }
    }

    /// [§ 13.2.5.33 Attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-name-state)
    ///
    /// "When the user agent leaves the attribute name state (and before emitting the
    /// tag token, if appropriate), the complete attribute's name must be compared to
    /// the other attributes on the same token; if there is already an attribute on
    /// the token with the exact same name, then this is a duplicate-attribute parse
    /// error and the new attribute must be removed from the token."
    pub(super) fn finish_attribute(&mut self) {
        let Some(attribute) = self.current_attribute.take() else {
            return;
        };
        let Some(Token::Tag(tag)) = self.current_token.as_mut() else {
            return;
        };
        if tag.attributes.iter().any(|existing| existing.name == attribute.name) {
            self.parse_error(ParseErrorCode::DuplicateAttribute);
            return;
        }
        tag.attributes.push(attribute);
    }
}

// =============================================================================
// Error Handling
// =============================================================================

impl HTMLTokenizer {
    /// [§ 13.2.2 Parse errors](https://html.spec.whatwg.org/multipage/parsing.html#parse-errors)
    ///
    /// Records a parse error and logs its code once through the weft-common
    /// warning system. Parse errors in HTML are not fatal - the tokenizer
    /// recovers and continues.
    pub(super) fn parse_error(&mut self, code: ParseErrorCode) {
        warn_once("HTML Tokenizer", code.as_ref());
        self.errors.push(ParseError {
            code,
            position: self.current_pos,
        });
    }
}
