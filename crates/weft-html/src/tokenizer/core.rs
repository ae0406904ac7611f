use std::collections::VecDeque;

use strum_macros::Display;

use super::token::{Attribute, Token};
use crate::error::{ParseError, ParseErrorCode};

/// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
///
/// The tokenizer state machine. Each state corresponds to a section in § 13.2.5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[allow(clippy::upper_case_acronyms)]
pub enum TokenizerState {
    /// [§ 13.2.5.1 Data state](https://html.spec.whatwg.org/multipage/parsing.html#data-state)
    Data,
    /// [§ 13.2.5.2 RCDATA state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-state)
    RCDATA,
    /// [§ 13.2.5.3 RAWTEXT state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-state)
    RAWTEXT,
    /// [§ 13.2.5.4 Script data state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-state)
    ScriptData,
    /// [§ 13.2.5.5 PLAINTEXT state](https://html.spec.whatwg.org/multipage/parsing.html#plaintext-state)
    PLAINTEXT,
    /// [§ 13.2.5.6 Tag open state](https://html.spec.whatwg.org/multipage/parsing.html#tag-open-state)
    TagOpen,
    /// [§ 13.2.5.7 End tag open state](https://html.spec.whatwg.org/multipage/parsing.html#end-tag-open-state)
    EndTagOpen,
    /// [§ 13.2.5.8 Tag name state](https://html.spec.whatwg.org/multipage/parsing.html#tag-name-state)
    TagName,
    /// [§ 13.2.5.9 RCDATA less-than sign state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-less-than-sign-state)
    RCDATALessThanSign,
    /// [§ 13.2.5.10 RCDATA end tag open state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-end-tag-open-state)
    RCDATAEndTagOpen,
    /// [§ 13.2.5.11 RCDATA end tag name state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-end-tag-name-state)
    RCDATAEndTagName,
    /// [§ 13.2.5.12 RAWTEXT less-than sign state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-less-than-sign-state)
    RAWTEXTLessThanSign,
    /// [§ 13.2.5.13 RAWTEXT end tag open state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-end-tag-open-state)
    RAWTEXTEndTagOpen,
    /// [§ 13.2.5.14 RAWTEXT end tag name state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-end-tag-name-state)
    RAWTEXTEndTagName,
    /// [§ 13.2.5.15 Script data less-than sign state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-less-than-sign-state)
    ScriptDataLessThanSign,
    /// [§ 13.2.5.16 Script data end tag open state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-end-tag-open-state)
    ScriptDataEndTagOpen,
    /// [§ 13.2.5.17 Script data end tag name state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-end-tag-name-state)
    ScriptDataEndTagName,
    /// [§ 13.2.5.18 Script data escape start state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escape-start-state)
    ScriptDataEscapeStart,
    /// [§ 13.2.5.19 Script data escape start dash state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escape-start-dash-state)
    ScriptDataEscapeStartDash,
    /// [§ 13.2.5.20 Script data escaped state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escaped-state)
    ScriptDataEscaped,
    /// [§ 13.2.5.21 Script data escaped dash state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escaped-dash-state)
    ScriptDataEscapedDash,
    /// [§ 13.2.5.22 Script data escaped dash dash state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escaped-dash-dash-state)
    ScriptDataEscapedDashDash,
    /// [§ 13.2.5.23 Script data escaped less-than sign state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escaped-less-than-sign-state)
    ScriptDataEscapedLessThanSign,
    /// [§ 13.2.5.24 Script data escaped end tag open state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escaped-end-tag-open-state)
    ScriptDataEscapedEndTagOpen,
    /// [§ 13.2.5.25 Script data escaped end tag name state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escaped-end-tag-name-state)
    ScriptDataEscapedEndTagName,
    /// [§ 13.2.5.26 Script data double escape start state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-double-escape-start-state)
    ScriptDataDoubleEscapeStart,
    /// [§ 13.2.5.27 Script data double escaped state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-double-escaped-state)
    ScriptDataDoubleEscaped,
    /// [§ 13.2.5.28 Script data double escaped dash state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-double-escaped-dash-state)
    ScriptDataDoubleEscapedDash,
    /// [§ 13.2.5.29 Script data double escaped dash dash state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-double-escaped-dash-dash-state)
    ScriptDataDoubleEscapedDashDash,
    /// [§ 13.2.5.30 Script data double escaped less-than sign state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-double-escaped-less-than-sign-state)
    ScriptDataDoubleEscapedLessThanSign,
    /// [§ 13.2.5.31 Script data double escape end state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-double-escape-end-state)
    ScriptDataDoubleEscapeEnd,
    /// [§ 13.2.5.32 Before attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#before-attribute-name-state)
    BeforeAttributeName,
    /// [§ 13.2.5.33 Attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-name-state)
    AttributeName,
    /// [§ 13.2.5.34 After attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#after-attribute-name-state)
    AfterAttributeName,
    /// [§ 13.2.5.35 Before attribute value state](https://html.spec.whatwg.org/multipage/parsing.html#before-attribute-value-state)
    BeforeAttributeValue,
    /// [§ 13.2.5.36 Attribute value (double-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(double-quoted)-state)
    AttributeValueDoubleQuoted,
    /// [§ 13.2.5.37 Attribute value (single-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(single-quoted)-state)
    AttributeValueSingleQuoted,
    /// [§ 13.2.5.38 Attribute value (unquoted) state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(unquoted)-state)
    AttributeValueUnquoted,
    /// [§ 13.2.5.39 After attribute value (quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#after-attribute-value-(quoted)-state)
    AfterAttributeValueQuoted,
    /// [§ 13.2.5.40 Self-closing start tag state](https://html.spec.whatwg.org/multipage/parsing.html#self-closing-start-tag-state)
    SelfClosingStartTag,
    /// [§ 13.2.5.41 Bogus comment state](https://html.spec.whatwg.org/multipage/parsing.html#bogus-comment-state)
    BogusComment,
    /// [§ 13.2.5.42 Markup declaration open state](https://html.spec.whatwg.org/multipage/parsing.html#markup-declaration-open-state)
    MarkupDeclarationOpen,
    /// [§ 13.2.5.43 Comment start state](https://html.spec.whatwg.org/multipage/parsing.html#comment-start-state)
    CommentStart,
    /// [§ 13.2.5.44 Comment start dash state](https://html.spec.whatwg.org/multipage/parsing.html#comment-start-dash-state)
    CommentStartDash,
    /// [§ 13.2.5.45 Comment state](https://html.spec.whatwg.org/multipage/parsing.html#comment-state)
    Comment,
    /// [§ 13.2.5.46 Comment less-than sign state](https://html.spec.whatwg.org/multipage/parsing.html#comment-less-than-sign-state)
    CommentLessThanSign,
    /// [§ 13.2.5.47 Comment less-than sign bang state](https://html.spec.whatwg.org/multipage/parsing.html#comment-less-than-sign-bang-state)
    CommentLessThanSignBang,
    /// [§ 13.2.5.48 Comment less-than sign bang dash state](https://html.spec.whatwg.org/multipage/parsing.html#comment-less-than-sign-bang-dash-state)
    CommentLessThanSignBangDash,
    /// [§ 13.2.5.49 Comment less-than sign bang dash dash state](https://html.spec.whatwg.org/multipage/parsing.html#comment-less-than-sign-bang-dash-dash-state)
    CommentLessThanSignBangDashDash,
    /// [§ 13.2.5.50 Comment end dash state](https://html.spec.whatwg.org/multipage/parsing.html#comment-end-dash-state)
    CommentEndDash,
    /// [§ 13.2.5.51 Comment end state](https://html.spec.whatwg.org/multipage/parsing.html#comment-end-state)
    CommentEnd,
    /// [§ 13.2.5.52 Comment end bang state](https://html.spec.whatwg.org/multipage/parsing.html#comment-end-bang-state)
    CommentEndBang,
    /// [§ 13.2.5.53 DOCTYPE state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-state)
    DOCTYPE,
    /// [§ 13.2.5.54 Before DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#before-doctype-name-state)
    BeforeDOCTYPEName,
    /// [§ 13.2.5.55 DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-name-state)
    DOCTYPEName,
    /// [§ 13.2.5.56 After DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-name-state)
    AfterDOCTYPEName,
    /// [§ 13.2.5.57 After DOCTYPE public keyword state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-public-keyword-state)
    AfterDOCTYPEPublicKeyword,
    /// [§ 13.2.5.58 Before DOCTYPE public identifier state](https://html.spec.whatwg.org/multipage/parsing.html#before-doctype-public-identifier-state)
    BeforeDOCTYPEPublicIdentifier,
    /// [§ 13.2.5.59 DOCTYPE public identifier (double-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-public-identifier-(double-quoted)-state)
    DOCTYPEPublicIdentifierDoubleQuoted,
    /// [§ 13.2.5.60 DOCTYPE public identifier (single-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-public-identifier-(single-quoted)-state)
    DOCTYPEPublicIdentifierSingleQuoted,
    /// [§ 13.2.5.61 After DOCTYPE public identifier state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-public-identifier-state)
    AfterDOCTYPEPublicIdentifier,
    /// [§ 13.2.5.62 Between DOCTYPE public and system identifiers state](https://html.spec.whatwg.org/multipage/parsing.html#between-doctype-public-and-system-identifiers-state)
    BetweenDOCTYPEPublicAndSystemIdentifiers,
    /// [§ 13.2.5.63 After DOCTYPE system keyword state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-system-keyword-state)
    AfterDOCTYPESystemKeyword,
    /// [§ 13.2.5.64 Before DOCTYPE system identifier state](https://html.spec.whatwg.org/multipage/parsing.html#before-doctype-system-identifier-state)
    BeforeDOCTYPESystemIdentifier,
    /// [§ 13.2.5.65 DOCTYPE system identifier (double-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-system-identifier-(double-quoted)-state)
    DOCTYPESystemIdentifierDoubleQuoted,
    /// [§ 13.2.5.66 DOCTYPE system identifier (single-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-system-identifier-(single-quoted)-state)
    DOCTYPESystemIdentifierSingleQuoted,
    /// [§ 13.2.5.67 After DOCTYPE system identifier state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-system-identifier-state)
    AfterDOCTYPESystemIdentifier,
    /// [§ 13.2.5.68 Bogus DOCTYPE state](https://html.spec.whatwg.org/multipage/parsing.html#bogus-doctype-state)
    BogusDOCTYPE,
    /// [§ 13.2.5.69 CDATA section state](https://html.spec.whatwg.org/multipage/parsing.html#cdata-section-state)
    CDATASection,
    /// [§ 13.2.5.70 CDATA section bracket state](https://html.spec.whatwg.org/multipage/parsing.html#cdata-section-bracket-state)
    CDATASectionBracket,
    /// [§ 13.2.5.71 CDATA section end state](https://html.spec.whatwg.org/multipage/parsing.html#cdata-section-end-state)
    CDATASectionEnd,
    /// [§ 13.2.5.72 Character reference state](https://html.spec.whatwg.org/multipage/parsing.html#character-reference-state)
    CharacterReference,
    /// [§ 13.2.5.73 Named character reference state](https://html.spec.whatwg.org/multipage/parsing.html#named-character-reference-state)
    NamedCharacterReference,
    /// [§ 13.2.5.74 Ambiguous ampersand state](https://html.spec.whatwg.org/multipage/parsing.html#ambiguous-ampersand-state)
    AmbiguousAmpersand,
    /// [§ 13.2.5.75 Numeric character reference state](https://html.spec.whatwg.org/multipage/parsing.html#numeric-character-reference-state)
    NumericCharacterReference,
    /// [§ 13.2.5.76 Hexadecimal character reference start state](https://html.spec.whatwg.org/multipage/parsing.html#hexadecimal-character-reference-start-state)
    HexadecimalCharacterReferenceStart,
    /// [§ 13.2.5.77 Decimal character reference start state](https://html.spec.whatwg.org/multipage/parsing.html#decimal-character-reference-start-state)
    DecimalCharacterReferenceStart,
    /// [§ 13.2.5.78 Hexadecimal character reference state](https://html.spec.whatwg.org/multipage/parsing.html#hexadecimal-character-reference-state)
    HexadecimalCharacterReference,
    /// [§ 13.2.5.79 Decimal character reference state](https://html.spec.whatwg.org/multipage/parsing.html#decimal-character-reference-state)
    DecimalCharacterReference,
    /// [§ 13.2.5.80 Numeric character reference end state](https://html.spec.whatwg.org/multipage/parsing.html#numeric-character-reference-end-state)
    NumericCharacterReferenceEnd,
}

/// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
///
/// "Implementations must act as if they used the following state machine to tokenize HTML."
///
/// The tokenizer can be driven two ways: [`HTMLTokenizer::next_token`] runs the
/// machine just far enough to produce one token (this is how the tree builder
/// pulls tokens, so it can switch states between them), and
/// [`HTMLTokenizer::run`] tokenizes the whole input up front.
pub struct HTMLTokenizer {
    pub(super) state: TokenizerState,
    pub(super) return_state: TokenizerState,
    pub(super) input: String,
    pub(super) current_pos: usize,
    pub(super) current_input_character: Option<char>,
    pub(super) current_token: Option<Token>,
    /// The attribute being built. It joins the current tag once it is complete
    /// so that a dropped duplicate never captures later characters.
    pub(super) current_attribute: Option<Attribute>,
    pub(super) at_eof: bool,
    pub(super) token_queue: VecDeque<Token>,
    // When true, the next iteration of the main loop will not consume a new character.
    // "Reconsume in the X state" sets this flag.
    pub(super) reconsume: bool,

    /// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
    /// "The last start tag token emitted is used as part of the tree construction stage
    /// and in the RCDATA, RAWTEXT, and script data states."
    pub(super) last_start_tag_name: Option<String>,

    /// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#temporary-buffer)
    pub(super) temporary_buffer: String,

    /// [§ 13.2.5.75 Numeric character reference state](https://html.spec.whatwg.org/multipage/parsing.html#numeric-character-reference-state)
    /// "Set the character reference code to zero (0)."
    pub(super) character_reference_code: u32,

    /// Whether `<![CDATA[` opens a CDATA section. The tree builder sets this
    /// when the adjusted current node is not an HTML element.
    pub(super) cdata_allowed: bool,

    pub(super) errors: Vec<ParseError>,
}

impl HTMLTokenizer {
    /// Create a new tokenizer for the given input.
    ///
    /// [§ 13.2.3.5 Preprocessing the input stream](https://html.spec.whatwg.org/multipage/parsing.html#preprocessing-the-input-stream)
    ///
    /// "Before the tokenization stage, the input stream must be preprocessed by
    /// normalizing newlines. Thus, newlines in HTML DOMs are represented by
    /// U+000A LF characters, and there are never any U+000D CR characters in the
    /// input to the tokenization stage."
    #[must_use]
    pub fn new(input: &str) -> Self {
        let input = input.replace("\r\n", "\n").replace('\r', "\n");

        // "The tokenizer state machine consists of the states defined in the
        // following subsections. The initial state is the data state."
        Self {
            state: TokenizerState::Data,
            return_state: TokenizerState::Data,
            input,
            current_pos: 0,
            current_input_character: None,
            current_token: None,
            current_attribute: None,
            at_eof: false,
            token_queue: VecDeque::new(),
            reconsume: false,
            last_start_tag_name: None,
            temporary_buffer: String::new(),
            character_reference_code: 0,
            cdata_allowed: false,
            errors: Vec::new(),
        }
    }

    /// The state the machine is currently in.
    #[must_use]
    pub const fn state(&self) -> TokenizerState {
        self.state
    }

    /// Switch the tokenizer to `state` between tokens.
    ///
    /// The tree builder uses this for RCDATA, RAWTEXT, script data and
    /// PLAINTEXT content, e.g. after inserting a `<title>` element.
    pub const fn set_state(&mut self, state: TokenizerState) {
        self.state = state;
    }

    /// Allow or forbid CDATA sections. See [§ 13.2.5.42](https://html.spec.whatwg.org/multipage/parsing.html#markup-declaration-open-state).
    pub const fn set_cdata_allowed(&mut self, allowed: bool) {
        self.cdata_allowed = allowed;
    }

    /// Parse errors reported so far.
    #[must_use]
    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    /// Remove and return the parse errors reported so far.
    pub fn take_errors(&mut self) -> Vec<ParseError> {
        std::mem::take(&mut self.errors)
    }

    /// Produce the next token.
    ///
    /// After the end-of-file token has been returned, every further call
    /// returns another end-of-file token.
    pub fn next_token(&mut self) -> Token {
        loop {
            if let Some(token) = self.token_queue.pop_front() {
                return token;
            }
            if self.at_eof {
                return Token::EndOfFile;
            }
            self.step();
        }
    }

    /// Run the tokenizer to completion.
    ///
    /// Processes the input and queues every token; collect them with
    /// [`HTMLTokenizer::into_tokens`].
    pub fn run(&mut self) {
        while !self.at_eof {
            self.step();
        }
    }

    /// Consume the tokenizer and return the queued tokens.
    /// Call this after [`HTMLTokenizer::run`].
    #[must_use]
    pub fn into_tokens(self) -> Vec<Token> {
        self.token_queue.into()
    }

    /// One iteration of the state machine.
    fn step(&mut self) {
        // Each state begins by consuming the next input character,
        // unless we're reconsuming from a previous state transition.
        if self.reconsume {
            self.reconsume = false;
        } else {
            self.current_input_character = self.consume();
        }

        match self.state {
            TokenizerState::Data => self.handle_data_state(),
            TokenizerState::RCDATA => self.handle_rcdata_state(),
            TokenizerState::RAWTEXT => self.handle_rawtext_state(),
            TokenizerState::ScriptData => self.handle_script_data_state(),
            TokenizerState::PLAINTEXT => self.handle_plaintext_state(),
            TokenizerState::TagOpen => self.handle_tag_open_state(),
            TokenizerState::EndTagOpen => self.handle_end_tag_open_state(),
            TokenizerState::TagName => self.handle_tag_name_state(),
            TokenizerState::RCDATALessThanSign => {
                self.handle_text_less_than_sign_state(TokenizerState::RCDATA);
            }
            TokenizerState::RCDATAEndTagOpen => {
                self.handle_text_end_tag_open_state(TokenizerState::RCDATA);
            }
            TokenizerState::RCDATAEndTagName => {
                self.handle_text_end_tag_name_state(TokenizerState::RCDATA);
            }
            TokenizerState::RAWTEXTLessThanSign => {
                self.handle_text_less_than_sign_state(TokenizerState::RAWTEXT);
            }
            TokenizerState::RAWTEXTEndTagOpen => {
                self.handle_text_end_tag_open_state(TokenizerState::RAWTEXT);
            }
            TokenizerState::RAWTEXTEndTagName => {
                self.handle_text_end_tag_name_state(TokenizerState::RAWTEXT);
            }
            TokenizerState::ScriptDataLessThanSign => {
                self.handle_script_data_less_than_sign_state();
            }
            TokenizerState::ScriptDataEndTagOpen => {
                self.handle_text_end_tag_open_state(TokenizerState::ScriptData);
            }
            TokenizerState::ScriptDataEndTagName => {
                self.handle_text_end_tag_name_state(TokenizerState::ScriptData);
            }
            TokenizerState::ScriptDataEscapeStart => self.handle_script_data_escape_start_state(),
            TokenizerState::ScriptDataEscapeStartDash => {
                self.handle_script_data_escape_start_dash_state();
            }
            TokenizerState::ScriptDataEscaped => self.handle_script_data_escaped_state(),
            TokenizerState::ScriptDataEscapedDash => self.handle_script_data_escaped_dash_state(),
            TokenizerState::ScriptDataEscapedDashDash => {
                self.handle_script_data_escaped_dash_dash_state();
            }
            TokenizerState::ScriptDataEscapedLessThanSign => {
                self.handle_script_data_escaped_less_than_sign_state();
            }
            TokenizerState::ScriptDataEscapedEndTagOpen => {
                self.handle_text_end_tag_open_state(TokenizerState::ScriptDataEscaped);
            }
            TokenizerState::ScriptDataEscapedEndTagName => {
                self.handle_text_end_tag_name_state(TokenizerState::ScriptDataEscaped);
            }
            TokenizerState::ScriptDataDoubleEscapeStart => {
                self.handle_script_data_double_escape_start_state();
            }
            TokenizerState::ScriptDataDoubleEscaped => {
                self.handle_script_data_double_escaped_state();
            }
            TokenizerState::ScriptDataDoubleEscapedDash => {
                self.handle_script_data_double_escaped_dash_state();
            }
            TokenizerState::ScriptDataDoubleEscapedDashDash => {
                self.handle_script_data_double_escaped_dash_dash_state();
            }
            TokenizerState::ScriptDataDoubleEscapedLessThanSign => {
                self.handle_script_data_double_escaped_less_than_sign_state();
            }
            TokenizerState::ScriptDataDoubleEscapeEnd => {
                self.handle_script_data_double_escape_end_state();
            }
            TokenizerState::BeforeAttributeName => self.handle_before_attribute_name_state(),
            TokenizerState::AttributeName => self.handle_attribute_name_state(),
            TokenizerState::AfterAttributeName => self.handle_after_attribute_name_state(),
            TokenizerState::BeforeAttributeValue => self.handle_before_attribute_value_state(),
            TokenizerState::AttributeValueDoubleQuoted => {
                self.handle_attribute_value_quoted_state('"');
            }
            TokenizerState::AttributeValueSingleQuoted => {
                self.handle_attribute_value_quoted_state('\'');
            }
            TokenizerState::AttributeValueUnquoted => self.handle_attribute_value_unquoted_state(),
            TokenizerState::AfterAttributeValueQuoted => {
                self.handle_after_attribute_value_quoted_state();
            }
            TokenizerState::SelfClosingStartTag => self.handle_self_closing_start_tag_state(),
            TokenizerState::BogusComment => self.handle_bogus_comment_state(),
            TokenizerState::MarkupDeclarationOpen => self.handle_markup_declaration_open_state(),
            TokenizerState::CommentStart => self.handle_comment_start_state(),
            TokenizerState::CommentStartDash => self.handle_comment_start_dash_state(),
            TokenizerState::Comment => self.handle_comment_state(),
            TokenizerState::CommentLessThanSign => self.handle_comment_less_than_sign_state(),
            TokenizerState::CommentLessThanSignBang => {
                self.handle_comment_less_than_sign_bang_state();
            }
            TokenizerState::CommentLessThanSignBangDash => {
                self.handle_comment_less_than_sign_bang_dash_state();
            }
            TokenizerState::CommentLessThanSignBangDashDash => {
                self.handle_comment_less_than_sign_bang_dash_dash_state();
            }
            TokenizerState::CommentEndDash => self.handle_comment_end_dash_state(),
            TokenizerState::CommentEnd => self.handle_comment_end_state(),
            TokenizerState::CommentEndBang => self.handle_comment_end_bang_state(),
            TokenizerState::DOCTYPE => self.handle_doctype_state(),
            TokenizerState::BeforeDOCTYPEName => self.handle_before_doctype_name_state(),
            TokenizerState::DOCTYPEName => self.handle_doctype_name_state(),
            TokenizerState::AfterDOCTYPEName => self.handle_after_doctype_name_state(),
            TokenizerState::AfterDOCTYPEPublicKeyword => {
                self.handle_after_doctype_keyword_state(Identifier::Public);
            }
            TokenizerState::BeforeDOCTYPEPublicIdentifier => {
                self.handle_before_doctype_identifier_state(Identifier::Public);
            }
            TokenizerState::DOCTYPEPublicIdentifierDoubleQuoted => {
                self.handle_doctype_identifier_quoted_state(Identifier::Public, '"');
            }
            TokenizerState::DOCTYPEPublicIdentifierSingleQuoted => {
                self.handle_doctype_identifier_quoted_state(Identifier::Public, '\'');
            }
            TokenizerState::AfterDOCTYPEPublicIdentifier => {
                self.handle_after_doctype_public_identifier_state();
            }
            TokenizerState::BetweenDOCTYPEPublicAndSystemIdentifiers => {
                self.handle_between_doctype_public_and_system_identifiers_state();
            }
            TokenizerState::AfterDOCTYPESystemKeyword => {
                self.handle_after_doctype_keyword_state(Identifier::System);
            }
            TokenizerState::BeforeDOCTYPESystemIdentifier => {
                self.handle_before_doctype_identifier_state(Identifier::System);
            }
            TokenizerState::DOCTYPESystemIdentifierDoubleQuoted => {
                self.handle_doctype_identifier_quoted_state(Identifier::System, '"');
            }
            TokenizerState::DOCTYPESystemIdentifierSingleQuoted => {
                self.handle_doctype_identifier_quoted_state(Identifier::System, '\'');
            }
            TokenizerState::AfterDOCTYPESystemIdentifier => {
                self.handle_after_doctype_system_identifier_state();
            }
            TokenizerState::BogusDOCTYPE => self.handle_bogus_doctype_state(),
            TokenizerState::CDATASection => self.handle_cdata_section_state(),
            TokenizerState::CDATASectionBracket => self.handle_cdata_section_bracket_state(),
            TokenizerState::CDATASectionEnd => self.handle_cdata_section_end_state(),
            TokenizerState::CharacterReference => self.handle_character_reference_state(),
            TokenizerState::NamedCharacterReference => {
                self.handle_named_character_reference_state();
            }
            TokenizerState::AmbiguousAmpersand => self.handle_ambiguous_ampersand_state(),
            TokenizerState::NumericCharacterReference => {
                self.handle_numeric_character_reference_state();
            }
            TokenizerState::HexadecimalCharacterReferenceStart => {
                self.handle_hexadecimal_character_reference_start_state();
            }
            TokenizerState::DecimalCharacterReferenceStart => {
                self.handle_decimal_character_reference_start_state();
            }
            TokenizerState::HexadecimalCharacterReference => {
                self.handle_hexadecimal_character_reference_state();
            }
            TokenizerState::DecimalCharacterReference => {
                self.handle_decimal_character_reference_state();
            }
            TokenizerState::NumericCharacterReferenceEnd => {
                self.handle_numeric_character_reference_end_state();
            }
        }
    }
}

/// Which DOCTYPE identifier a shared DOCTYPE state is working on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Identifier {
    Public,
    System,
}

// =============================================================================
// Data, RCDATA, RAWTEXT, script data and PLAINTEXT
// =============================================================================

impl HTMLTokenizer {
    /// [§ 13.2.5.1 Data state](https://html.spec.whatwg.org/multipage/parsing.html#data-state)
    fn handle_data_state(&mut self) {
        match self.current_input_character {
            // "U+0026 AMPERSAND (&) - Set the return state to the data state.
            // Switch to the character reference state."
            Some('&') => {
                self.return_state = TokenizerState::Data;
                self.switch_to(TokenizerState::CharacterReference);
            }
            // "U+003C LESS-THAN SIGN (<) - Switch to the tag open state."
            Some('<') => self.switch_to(TokenizerState::TagOpen),
            // "U+0000 NULL - This is an unexpected-null-character parse error.
            // Emit the current input character as a character token."
            Some('\0') => {
                self.parse_error(ParseErrorCode::UnexpectedNullCharacter);
                self.emit_character_token('\0');
            }
            // "EOF - Emit an end-of-file token."
            None => self.emit_eof_token(),
            // "Anything else - Emit the current input character as a character token."
            Some(c) => self.emit_character_token(c),
        }
    }

    /// [§ 13.2.5.2 RCDATA state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-state)
    fn handle_rcdata_state(&mut self) {
        match self.current_input_character {
            // "Set the return state to the RCDATA state. Switch to the character reference state."
            Some('&') => {
                self.return_state = TokenizerState::RCDATA;
                self.switch_to(TokenizerState::CharacterReference);
            }
            Some('<') => self.switch_to(TokenizerState::RCDATALessThanSign),
            Some('\0') => self.emit_replacement_character(),
            None => self.emit_eof_token(),
            Some(c) => self.emit_character_token(c),
        }
    }

    /// [§ 13.2.5.3 RAWTEXT state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-state)
    fn handle_rawtext_state(&mut self) {
        match self.current_input_character {
            Some('<') => self.switch_to(TokenizerState::RAWTEXTLessThanSign),
            Some('\0') => self.emit_replacement_character(),
            None => self.emit_eof_token(),
            Some(c) => self.emit_character_token(c),
        }
    }

    /// [§ 13.2.5.4 Script data state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-state)
    fn handle_script_data_state(&mut self) {
        match self.current_input_character {
            Some('<') => self.switch_to(TokenizerState::ScriptDataLessThanSign),
            Some('\0') => self.emit_replacement_character(),
            None => self.emit_eof_token(),
            Some(c) => self.emit_character_token(c),
        }
    }

    /// [§ 13.2.5.5 PLAINTEXT state](https://html.spec.whatwg.org/multipage/parsing.html#plaintext-state)
    ///
    /// There is no way out of this state: every character up to EOF is text.
    fn handle_plaintext_state(&mut self) {
        match self.current_input_character {
            Some('\0') => self.emit_replacement_character(),
            None => self.emit_eof_token(),
            Some(c) => self.emit_character_token(c),
        }
    }

    /// [§ 13.2.5.9 RCDATA less-than sign state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-less-than-sign-state)
    /// [§ 13.2.5.12 RAWTEXT less-than sign state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-less-than-sign-state)
    fn handle_text_less_than_sign_state(&mut self, text_state: TokenizerState) {
        match self.current_input_character {
            // "Set the temporary buffer to the empty string. Switch to the
            // RCDATA end tag open state."
            Some('/') => {
                self.temporary_buffer.clear();
                self.switch_to(end_tag_open_state(text_state));
            }
            // "Emit a U+003C LESS-THAN SIGN character token. Reconsume in the RCDATA state."
            _ => {
                self.emit_character_token('<');
                self.reconsume_in(text_state);
            }
        }
    }

    /// [§ 13.2.5.10 RCDATA end tag open state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-end-tag-open-state)
    ///
    /// Shared by the RAWTEXT, script data and script data escaped variants.
    fn handle_text_end_tag_open_state(&mut self, text_state: TokenizerState) {
        match self.current_input_character {
            // "Create a new end tag token, set its tag name to the empty string.
            // Reconsume in the RCDATA end tag name state."
            Some(c) if c.is_ascii_alphabetic() => {
                self.current_token = Some(Token::new_end_tag());
                self.reconsume_in(end_tag_name_state(text_state));
            }
            // "Emit a U+003C LESS-THAN SIGN character token and a U+002F SOLIDUS
            // character token. Reconsume in the RCDATA state."
            _ => {
                self.emit_character_token('<');
                self.emit_character_token('/');
                self.reconsume_in(text_state);
            }
        }
    }

    /// [§ 13.2.5.11 RCDATA end tag name state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-end-tag-name-state)
    ///
    /// Shared by the RAWTEXT, script data and script data escaped variants.
    fn handle_text_end_tag_name_state(&mut self, text_state: TokenizerState) {
        match self.current_input_character {
            // "If the current end tag token is an appropriate end tag token, then
            // switch to the before attribute name state."
            Some(c) if Self::is_whitespace_char(c) && self.is_appropriate_end_tag_token() => {
                self.switch_to(TokenizerState::BeforeAttributeName);
            }
            // "...switch to the self-closing start tag state."
            Some('/') if self.is_appropriate_end_tag_token() => {
                self.switch_to(TokenizerState::SelfClosingStartTag);
            }
            // "...switch to the data state and emit the current tag token."
            Some('>') if self.is_appropriate_end_tag_token() => {
                self.switch_to(TokenizerState::Data);
                self.emit_token();
            }
            // "Append the lowercase version of the current input character to the
            // current tag token's tag name. Append the current input character to
            // the temporary buffer."
            Some(c) if c.is_ascii_alphabetic() => {
                if let Some(token) = self.current_token.as_mut() {
                    token.append_to_tag_name(c.to_ascii_lowercase());
                }
                self.temporary_buffer.push(c);
            }
            // "Anything else"
            _ => self.emit_end_tag_name_anything_else(text_state),
        }
    }

    /// [§ 13.2.5.15 Script data less-than sign state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-less-than-sign-state)
    fn handle_script_data_less_than_sign_state(&mut self) {
        match self.current_input_character {
            Some('/') => {
                self.temporary_buffer.clear();
                self.switch_to(TokenizerState::ScriptDataEndTagOpen);
            }
            // "Switch to the script data escape start state. Emit a U+003C
            // LESS-THAN SIGN character token and a U+0021 EXCLAMATION MARK
            // character token."
            Some('!') => {
                self.switch_to(TokenizerState::ScriptDataEscapeStart);
                self.emit_character_token('<');
                self.emit_character_token('!');
            }
            _ => {
                self.emit_character_token('<');
                self.reconsume_in(TokenizerState::ScriptData);
            }
        }
    }

    /// [§ 13.2.5.18 Script data escape start state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escape-start-state)
    fn handle_script_data_escape_start_state(&mut self) {
        if self.current_input_character == Some('-') {
            self.switch_to(TokenizerState::ScriptDataEscapeStartDash);
            self.emit_character_token('-');
        } else {
            self.reconsume_in(TokenizerState::ScriptData);
        }
    }

    /// [§ 13.2.5.19 Script data escape start dash state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escape-start-dash-state)
    fn handle_script_data_escape_start_dash_state(&mut self) {
        if self.current_input_character == Some('-') {
            self.switch_to(TokenizerState::ScriptDataEscapedDashDash);
            self.emit_character_token('-');
        } else {
            self.reconsume_in(TokenizerState::ScriptData);
        }
    }

    /// [§ 13.2.5.20 Script data escaped state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escaped-state)
    fn handle_script_data_escaped_state(&mut self) {
        match self.current_input_character {
            Some('-') => {
                self.switch_to(TokenizerState::ScriptDataEscapedDash);
                self.emit_character_token('-');
            }
            Some('<') => self.switch_to(TokenizerState::ScriptDataEscapedLessThanSign),
            Some('\0') => self.emit_replacement_character(),
            None => self.eof_in_script_comment_like_text(),
            Some(c) => self.emit_character_token(c),
        }
    }

    /// [§ 13.2.5.21 Script data escaped dash state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escaped-dash-state)
    fn handle_script_data_escaped_dash_state(&mut self) {
        match self.current_input_character {
            Some('-') => {
                self.switch_to(TokenizerState::ScriptDataEscapedDashDash);
                self.emit_character_token('-');
            }
            Some('<') => self.switch_to(TokenizerState::ScriptDataEscapedLessThanSign),
            Some('\0') => {
                self.switch_to(TokenizerState::ScriptDataEscaped);
                self.emit_replacement_character();
            }
            None => self.eof_in_script_comment_like_text(),
            Some(c) => {
                self.switch_to(TokenizerState::ScriptDataEscaped);
                self.emit_character_token(c);
            }
        }
    }

    /// [§ 13.2.5.22 Script data escaped dash dash state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escaped-dash-dash-state)
    fn handle_script_data_escaped_dash_dash_state(&mut self) {
        match self.current_input_character {
            Some('-') => self.emit_character_token('-'),
            Some('<') => self.switch_to(TokenizerState::ScriptDataEscapedLessThanSign),
            // "Switch to the script data state. Emit a U+003E GREATER-THAN SIGN character token."
            Some('>') => {
                self.switch_to(TokenizerState::ScriptData);
                self.emit_character_token('>');
            }
            Some('\0') => {
                self.switch_to(TokenizerState::ScriptDataEscaped);
                self.emit_replacement_character();
            }
            None => self.eof_in_script_comment_like_text(),
            Some(c) => {
                self.switch_to(TokenizerState::ScriptDataEscaped);
                self.emit_character_token(c);
            }
        }
    }

    /// [§ 13.2.5.23 Script data escaped less-than sign state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escaped-less-than-sign-state)
    fn handle_script_data_escaped_less_than_sign_state(&mut self) {
        match self.current_input_character {
            Some('/') => {
                self.temporary_buffer.clear();
                self.switch_to(TokenizerState::ScriptDataEscapedEndTagOpen);
            }
            // "Set the temporary buffer to the empty string. Emit a U+003C LESS-THAN
            // SIGN character token. Reconsume in the script data double escape start state."
            Some(c) if c.is_ascii_alphabetic() => {
                self.temporary_buffer.clear();
                self.emit_character_token('<');
                self.reconsume_in(TokenizerState::ScriptDataDoubleEscapeStart);
            }
            _ => {
                self.emit_character_token('<');
                self.reconsume_in(TokenizerState::ScriptDataEscaped);
            }
        }
    }

    /// [§ 13.2.5.26 Script data double escape start state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-double-escape-start-state)
    fn handle_script_data_double_escape_start_state(&mut self) {
        match self.current_input_character {
            // "If the temporary buffer is the string "script", then switch to the
            // script data double escaped state. Otherwise, switch to the script data
            // escaped state. Emit the current input character as a character token."
            Some(c) if Self::is_whitespace_char(c) || c == '/' || c == '>' => {
                if self.temporary_buffer == "script" {
                    self.switch_to(TokenizerState::ScriptDataDoubleEscaped);
                } else {
                    self.switch_to(TokenizerState::ScriptDataEscaped);
                }
                self.emit_character_token(c);
            }
            Some(c) if c.is_ascii_alphabetic() => {
                self.temporary_buffer.push(c.to_ascii_lowercase());
                self.emit_character_token(c);
            }
            _ => self.reconsume_in(TokenizerState::ScriptDataEscaped),
        }
    }

    /// [§ 13.2.5.27 Script data double escaped state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-double-escaped-state)
    fn handle_script_data_double_escaped_state(&mut self) {
        match self.current_input_character {
            Some('-') => {
                self.switch_to(TokenizerState::ScriptDataDoubleEscapedDash);
                self.emit_character_token('-');
            }
            Some('<') => {
                self.switch_to(TokenizerState::ScriptDataDoubleEscapedLessThanSign);
                self.emit_character_token('<');
            }
            Some('\0') => self.emit_replacement_character(),
            None => self.eof_in_script_comment_like_text(),
            Some(c) => self.emit_character_token(c),
        }
    }

    /// [§ 13.2.5.28 Script data double escaped dash state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-double-escaped-dash-state)
    fn handle_script_data_double_escaped_dash_state(&mut self) {
        match self.current_input_character {
            Some('-') => {
                self.switch_to(TokenizerState::ScriptDataDoubleEscapedDashDash);
                self.emit_character_token('-');
            }
            Some('<') => {
                self.switch_to(TokenizerState::ScriptDataDoubleEscapedLessThanSign);
                self.emit_character_token('<');
            }
            Some('\0') => {
                self.switch_to(TokenizerState::ScriptDataDoubleEscaped);
                self.emit_replacement_character();
            }
            None => self.eof_in_script_comment_like_text(),
            Some(c) => {
                self.switch_to(TokenizerState::ScriptDataDoubleEscaped);
                self.emit_character_token(c);
            }
        }
    }

    /// [§ 13.2.5.29 Script data double escaped dash dash state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-double-escaped-dash-dash-state)
    fn handle_script_data_double_escaped_dash_dash_state(&mut self) {
        match self.current_input_character {
            Some('-') => self.emit_character_token('-'),
            Some('<') => {
                self.switch_to(TokenizerState::ScriptDataDoubleEscapedLessThanSign);
                self.emit_character_token('<');
            }
            Some('>') => {
                self.switch_to(TokenizerState::ScriptData);
                self.emit_character_token('>');
            }
            Some('\0') => {
                self.switch_to(TokenizerState::ScriptDataDoubleEscaped);
                self.emit_replacement_character();
            }
            None => self.eof_in_script_comment_like_text(),
            Some(c) => {
                self.switch_to(TokenizerState::ScriptDataDoubleEscaped);
                self.emit_character_token(c);
            }
        }
    }

    /// [§ 13.2.5.30 Script data double escaped less-than sign state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-double-escaped-less-than-sign-state)
    fn handle_script_data_double_escaped_less_than_sign_state(&mut self) {
        if self.current_input_character == Some('/') {
            self.temporary_buffer.clear();
            self.switch_to(TokenizerState::ScriptDataDoubleEscapeEnd);
            self.emit_character_token('/');
        } else {
            self.reconsume_in(TokenizerState::ScriptDataDoubleEscaped);
        }
    }

    /// [§ 13.2.5.31 Script data double escape end state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-double-escape-end-state)
    fn handle_script_data_double_escape_end_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) || c == '/' || c == '>' => {
                if self.temporary_buffer == "script" {
                    self.switch_to(TokenizerState::ScriptDataEscaped);
                } else {
                    self.switch_to(TokenizerState::ScriptDataDoubleEscaped);
                }
                self.emit_character_token(c);
            }
            Some(c) if c.is_ascii_alphabetic() => {
                self.temporary_buffer.push(c.to_ascii_lowercase());
                self.emit_character_token(c);
            }
            _ => self.reconsume_in(TokenizerState::ScriptDataDoubleEscaped),
        }
    }

    /// "EOF - This is an eof-in-script-html-comment-like-text parse error.
    /// Emit an end-of-file token."
    fn eof_in_script_comment_like_text(&mut self) {
        self.parse_error(ParseErrorCode::EofInScriptHtmlCommentLikeText);
        self.emit_eof_token();
    }
}

/// The end tag open state that belongs to a text state.
const fn end_tag_open_state(text_state: TokenizerState) -> TokenizerState {
    match text_state {
        TokenizerState::RAWTEXT => TokenizerState::RAWTEXTEndTagOpen,
        TokenizerState::ScriptData => TokenizerState::ScriptDataEndTagOpen,
        TokenizerState::ScriptDataEscaped => TokenizerState::ScriptDataEscapedEndTagOpen,
        _ => TokenizerState::RCDATAEndTagOpen,
    }
}

/// The end tag name state that belongs to a text state.
const fn end_tag_name_state(text_state: TokenizerState) -> TokenizerState {
    match text_state {
        TokenizerState::RAWTEXT => TokenizerState::RAWTEXTEndTagName,
        TokenizerState::ScriptData => TokenizerState::ScriptDataEndTagName,
        TokenizerState::ScriptDataEscaped => TokenizerState::ScriptDataEscapedEndTagName,
        _ => TokenizerState::RCDATAEndTagName,
    }
}

// =============================================================================
// Tags and attributes
// =============================================================================

impl HTMLTokenizer {
    /// [§ 13.2.5.6 Tag open state](https://html.spec.whatwg.org/multipage/parsing.html#tag-open-state)
    fn handle_tag_open_state(&mut self) {
        match self.current_input_character {
            // "U+0021 EXCLAMATION MARK (!) - Switch to the markup declaration open state."
            // NOTE: We use reconsume_in here so that MarkupDeclarationOpen can peek ahead
            // without the main loop consuming a character first.
            Some('!') => self.reconsume_in(TokenizerState::MarkupDeclarationOpen),
            // "U+002F SOLIDUS (/) - Switch to the end tag open state."
            Some('/') => self.switch_to(TokenizerState::EndTagOpen),
            // "ASCII alpha - Create a new start tag token, set its tag name to the empty
            // string. Reconsume in the tag name state."
            Some(c) if c.is_ascii_alphabetic() => {
                self.current_token = Some(Token::new_start_tag());
                self.reconsume_in(TokenizerState::TagName);
            }
            // "U+003F QUESTION MARK (?) - This is an unexpected-question-mark-instead-of-tag-name
            // parse error. Create a comment token whose data is the empty string. Reconsume in the
            // bogus comment state."
            Some('?') => {
                self.parse_error(ParseErrorCode::UnexpectedQuestionMarkInsteadOfTagName);
                self.current_token = Some(Token::new_comment());
                self.reconsume_in(TokenizerState::BogusComment);
            }
            // "EOF - This is an eof-before-tag-name parse error. Emit a U+003C LESS-THAN SIGN
            // character token and an end-of-file token."
            None => {
                self.parse_error(ParseErrorCode::EofBeforeTagName);
                self.emit_character_token('<');
                self.emit_eof_token();
            }
            // "Anything else - This is an invalid-first-character-of-tag-name parse error.
            // Emit a U+003C LESS-THAN SIGN character token. Reconsume in the data state."
            Some(_) => {
                self.parse_error(ParseErrorCode::InvalidFirstCharacterOfTagName);
                self.emit_character_token('<');
                self.reconsume_in(TokenizerState::Data);
            }
        }
    }

    /// [§ 13.2.5.7 End tag open state](https://html.spec.whatwg.org/multipage/parsing.html#end-tag-open-state)
    fn handle_end_tag_open_state(&mut self) {
        match self.current_input_character {
            Some(c) if c.is_ascii_alphabetic() => {
                self.current_token = Some(Token::new_end_tag());
                self.reconsume_in(TokenizerState::TagName);
            }
            // "This is a missing-end-tag-name parse error. Switch to the data state."
            Some('>') => {
                self.parse_error(ParseErrorCode::MissingEndTagName);
                self.switch_to(TokenizerState::Data);
            }
            None => {
                self.parse_error(ParseErrorCode::EofBeforeTagName);
                self.emit_character_token('<');
                self.emit_character_token('/');
                self.emit_eof_token();
            }
            // "This is an invalid-first-character-of-tag-name parse error. Create a
            // comment token whose data is the empty string. Reconsume in the bogus
            // comment state."
            Some(_) => {
                self.parse_error(ParseErrorCode::InvalidFirstCharacterOfTagName);
                self.current_token = Some(Token::new_comment());
                self.reconsume_in(TokenizerState::BogusComment);
            }
        }
    }

    /// [§ 13.2.5.8 Tag name state](https://html.spec.whatwg.org/multipage/parsing.html#tag-name-state)
    fn handle_tag_name_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {
                self.switch_to(TokenizerState::BeforeAttributeName);
            }
            Some('/') => self.switch_to(TokenizerState::SelfClosingStartTag),
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_token();
            }
            Some('\0') => {
                self.parse_error(ParseErrorCode::UnexpectedNullCharacter);
                self.append_to_tag_name('\u{FFFD}');
            }
            None => self.eof_in_tag(),
            // "ASCII upper alpha - Append the lowercase version of the current input
            // character (add 0x0020 to the character's code point) to the current tag
            // token's tag name."
            Some(c) => self.append_to_tag_name(c.to_ascii_lowercase()),
        }
    }

    /// [§ 13.2.5.32 Before attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#before-attribute-name-state)
    fn handle_before_attribute_name_state(&mut self) {
        match self.current_input_character {
            // "Ignore the character."
            Some(c) if Self::is_whitespace_char(c) => {}
            // "Reconsume in the after attribute name state."
            Some('/' | '>') | None => self.reconsume_in(TokenizerState::AfterAttributeName),
            // "This is an unexpected-equals-sign-before-attribute-name parse error.
            // Start a new attribute in the current tag token. Set that attribute's name
            // to the current input character, and its value to the empty string. Switch
            // to the attribute name state."
            Some('=') => {
                self.parse_error(ParseErrorCode::UnexpectedEqualsSignBeforeAttributeName);
                self.start_new_attribute();
                self.append_to_attribute_name('=');
                self.switch_to(TokenizerState::AttributeName);
            }
            // "Start a new attribute in the current tag token. Set that attribute name
            // and value to the empty string. Reconsume in the attribute name state."
            Some(_) => {
                self.start_new_attribute();
                self.reconsume_in(TokenizerState::AttributeName);
            }
        }
    }

    /// [§ 13.2.5.33 Attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-name-state)
    fn handle_attribute_name_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {
                self.reconsume_in(TokenizerState::AfterAttributeName);
            }
            Some('/' | '>') | None => self.reconsume_in(TokenizerState::AfterAttributeName),
            Some('=') => self.switch_to(TokenizerState::BeforeAttributeValue),
            Some('\0') => {
                self.parse_error(ParseErrorCode::UnexpectedNullCharacter);
                self.append_to_attribute_name('\u{FFFD}');
            }
            // "This is an unexpected-character-in-attribute-name parse error. Treat it
            // as per the "anything else" entry below."
            Some(c @ ('"' | '\'' | '<')) => {
                self.parse_error(ParseErrorCode::UnexpectedCharacterInAttributeName);
                self.append_to_attribute_name(c);
            }
            Some(c) => self.append_to_attribute_name(c.to_ascii_lowercase()),
        }
    }

    /// [§ 13.2.5.34 After attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#after-attribute-name-state)
    fn handle_after_attribute_name_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {}
            Some('/') => self.switch_to(TokenizerState::SelfClosingStartTag),
            Some('=') => self.switch_to(TokenizerState::BeforeAttributeValue),
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_token();
            }
            None => self.eof_in_tag(),
            Some(_) => {
                self.start_new_attribute();
                self.reconsume_in(TokenizerState::AttributeName);
            }
        }
    }

    /// [§ 13.2.5.35 Before attribute value state](https://html.spec.whatwg.org/multipage/parsing.html#before-attribute-value-state)
    fn handle_before_attribute_value_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {}
            Some('"') => self.switch_to(TokenizerState::AttributeValueDoubleQuoted),
            Some('\'') => self.switch_to(TokenizerState::AttributeValueSingleQuoted),
            // "This is a missing-attribute-value parse error. Switch to the data state.
            // Emit the current tag token."
            Some('>') => {
                self.parse_error(ParseErrorCode::MissingAttributeValue);
                self.switch_to(TokenizerState::Data);
                self.emit_token();
            }
            _ => self.reconsume_in(TokenizerState::AttributeValueUnquoted),
        }
    }

    /// [§ 13.2.5.36 Attribute value (double-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(double-quoted)-state)
    /// [§ 13.2.5.37 Attribute value (single-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(single-quoted)-state)
    fn handle_attribute_value_quoted_state(&mut self, quote: char) {
        match self.current_input_character {
            Some(c) if c == quote => self.switch_to(TokenizerState::AfterAttributeValueQuoted),
            // "Set the return state to the attribute value (double-quoted) state.
            // Switch to the character reference state."
            Some('&') => {
                self.return_state = self.state;
                self.switch_to(TokenizerState::CharacterReference);
            }
            Some('\0') => {
                self.parse_error(ParseErrorCode::UnexpectedNullCharacter);
                self.append_to_attribute_value('\u{FFFD}');
            }
            None => self.eof_in_tag(),
            Some(c) => self.append_to_attribute_value(c),
        }
    }

    /// [§ 13.2.5.38 Attribute value (unquoted) state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(unquoted)-state)
    fn handle_attribute_value_unquoted_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {
                self.switch_to(TokenizerState::BeforeAttributeName);
            }
            Some('&') => {
                self.return_state = TokenizerState::AttributeValueUnquoted;
                self.switch_to(TokenizerState::CharacterReference);
            }
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_token();
            }
            Some('\0') => {
                self.parse_error(ParseErrorCode::UnexpectedNullCharacter);
                self.append_to_attribute_value('\u{FFFD}');
            }
            Some(c @ ('"' | '\'' | '<' | '=' | '`')) => {
                self.parse_error(ParseErrorCode::UnexpectedCharacterInUnquotedAttributeValue);
                self.append_to_attribute_value(c);
            }
            None => self.eof_in_tag(),
            Some(c) => self.append_to_attribute_value(c),
        }
    }

    /// [§ 13.2.5.39 After attribute value (quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#after-attribute-value-(quoted)-state)
    fn handle_after_attribute_value_quoted_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {
                self.switch_to(TokenizerState::BeforeAttributeName);
            }
            Some('/') => self.switch_to(TokenizerState::SelfClosingStartTag),
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_token();
            }
            None => self.eof_in_tag(),
            Some(_) => {
                self.parse_error(ParseErrorCode::MissingWhitespaceBetweenAttributes);
                self.reconsume_in(TokenizerState::BeforeAttributeName);
            }
        }
    }

    /// [§ 13.2.5.40 Self-closing start tag state](https://html.spec.whatwg.org/multipage/parsing.html#self-closing-start-tag-state)
    fn handle_self_closing_start_tag_state(&mut self) {
        match self.current_input_character {
            // "Set the self-closing flag of the current tag token. Switch to the data
            // state. Emit the current tag token."
            Some('>') => {
                if let Some(token) = self.current_token.as_mut() {
                    token.set_self_closing();
                }
                self.switch_to(TokenizerState::Data);
                self.emit_token();
            }
            None => self.eof_in_tag(),
            Some(_) => {
                self.parse_error(ParseErrorCode::UnexpectedSolidusInTag);
                self.reconsume_in(TokenizerState::BeforeAttributeName);
            }
        }
    }

    /// "EOF - This is an eof-in-tag parse error. Emit an end-of-file token."
    ///
    /// The unfinished tag is dropped.
    fn eof_in_tag(&mut self) {
        self.parse_error(ParseErrorCode::EofInTag);
        self.current_token = None;
        self.current_attribute = None;
        self.emit_eof_token();
    }
}

// =============================================================================
// Comments and markup declarations
// =============================================================================

impl HTMLTokenizer {
    /// [§ 13.2.5.41 Bogus comment state](https://html.spec.whatwg.org/multipage/parsing.html#bogus-comment-state)
    fn handle_bogus_comment_state(&mut self) {
        match self.current_input_character {
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_token();
            }
            // "Emit the comment. Emit an end-of-file token."
            None => {
                self.emit_token();
                self.emit_eof_token();
            }
            Some('\0') => {
                self.parse_error(ParseErrorCode::UnexpectedNullCharacter);
                self.append_to_comment('\u{FFFD}');
            }
            Some(c) => self.append_to_comment(c),
        }
    }

    /// [§ 13.2.5.42 Markup declaration open state](https://html.spec.whatwg.org/multipage/parsing.html#markup-declaration-open-state)
    fn handle_markup_declaration_open_state(&mut self) {
        // "If the next two characters are both U+002D HYPHEN-MINUS characters (-),
        // consume those two characters, create a comment token whose data is the empty
        // string, and switch to the comment start state."
        if self.next_few_characters_are("--") {
            self.consume_string("--");
            self.current_token = Some(Token::new_comment());
            self.switch_to(TokenizerState::CommentStart);
        }
        // "Otherwise, if the next seven characters are an ASCII case-insensitive
        // match for the word 'DOCTYPE', consume those characters and switch to the
        // DOCTYPE state."
        else if self.next_few_characters_are_case_insensitive("DOCTYPE") {
            self.consume_string("DOCTYPE");
            self.switch_to(TokenizerState::DOCTYPE);
        }
        // "Otherwise, if there is an adjusted current node and it is not an element
        // in the HTML namespace and the next seven characters are a case-sensitive match
        // for the string '[CDATA[', then consume those characters and switch to the
        // CDATA section state."
        else if self.next_few_characters_are("[CDATA[") {
            self.consume_string("[CDATA[");
            if self.cdata_allowed {
                self.switch_to(TokenizerState::CDATASection);
            } else {
                // "Otherwise, this is a cdata-in-html-content parse error. Create a
                // comment token whose data is the "[CDATA[" string. Switch to the bogus
                // comment state."
                self.parse_error(ParseErrorCode::CdataInHtmlContent);
                self.current_token = Some(Token::Comment("[CDATA[".to_string()));
                self.switch_to(TokenizerState::BogusComment);
            }
        }
        // "Otherwise, this is an incorrectly-opened-comment parse error. Create a
        // comment token whose data is the empty string. Switch to the bogus comment state
        // (don't consume anything in the current state)."
        else {
            self.parse_error(ParseErrorCode::IncorrectlyOpenedComment);
            self.current_token = Some(Token::new_comment());
            self.switch_to(TokenizerState::BogusComment);
        }
    }

    /// [§ 13.2.5.43 Comment start state](https://html.spec.whatwg.org/multipage/parsing.html#comment-start-state)
    fn handle_comment_start_state(&mut self) {
        match self.current_input_character {
            Some('-') => self.switch_to(TokenizerState::CommentStartDash),
            // "This is an abrupt-closing-of-empty-comment parse error. Switch to the
            // data state. Emit the current comment token."
            Some('>') => {
                self.parse_error(ParseErrorCode::AbruptClosingOfEmptyComment);
                self.switch_to(TokenizerState::Data);
                self.emit_token();
            }
            _ => self.reconsume_in(TokenizerState::Comment),
        }
    }

    /// [§ 13.2.5.44 Comment start dash state](https://html.spec.whatwg.org/multipage/parsing.html#comment-start-dash-state)
    fn handle_comment_start_dash_state(&mut self) {
        match self.current_input_character {
            Some('-') => self.switch_to(TokenizerState::CommentEnd),
            Some('>') => {
                self.parse_error(ParseErrorCode::AbruptClosingOfEmptyComment);
                self.switch_to(TokenizerState::Data);
                self.emit_token();
            }
            None => self.eof_in_comment(),
            Some(_) => {
                self.append_to_comment('-');
                self.reconsume_in(TokenizerState::Comment);
            }
        }
    }

    /// [§ 13.2.5.45 Comment state](https://html.spec.whatwg.org/multipage/parsing.html#comment-state)
    fn handle_comment_state(&mut self) {
        match self.current_input_character {
            // "Append the current input character to the comment token's data. Switch
            // to the comment less-than sign state."
            Some('<') => {
                self.append_to_comment('<');
                self.switch_to(TokenizerState::CommentLessThanSign);
            }
            Some('-') => self.switch_to(TokenizerState::CommentEndDash),
            Some('\0') => {
                self.parse_error(ParseErrorCode::UnexpectedNullCharacter);
                self.append_to_comment('\u{FFFD}');
            }
            None => self.eof_in_comment(),
            Some(c) => self.append_to_comment(c),
        }
    }

    /// [§ 13.2.5.46 Comment less-than sign state](https://html.spec.whatwg.org/multipage/parsing.html#comment-less-than-sign-state)
    fn handle_comment_less_than_sign_state(&mut self) {
        match self.current_input_character {
            Some('!') => {
                self.append_to_comment('!');
                self.switch_to(TokenizerState::CommentLessThanSignBang);
            }
            Some('<') => self.append_to_comment('<'),
            _ => self.reconsume_in(TokenizerState::Comment),
        }
    }

    /// [§ 13.2.5.47 Comment less-than sign bang state](https://html.spec.whatwg.org/multipage/parsing.html#comment-less-than-sign-bang-state)
    fn handle_comment_less_than_sign_bang_state(&mut self) {
        if self.current_input_character == Some('-') {
            self.switch_to(TokenizerState::CommentLessThanSignBangDash);
        } else {
            self.reconsume_in(TokenizerState::Comment);
        }
    }

    /// [§ 13.2.5.48 Comment less-than sign bang dash state](https://html.spec.whatwg.org/multipage/parsing.html#comment-less-than-sign-bang-dash-state)
    fn handle_comment_less_than_sign_bang_dash_state(&mut self) {
        if self.current_input_character == Some('-') {
            self.switch_to(TokenizerState::CommentLessThanSignBangDashDash);
        } else {
            self.reconsume_in(TokenizerState::CommentEndDash);
        }
    }

    /// [§ 13.2.5.49 Comment less-than sign bang dash dash state](https://html.spec.whatwg.org/multipage/parsing.html#comment-less-than-sign-bang-dash-dash-state)
    fn handle_comment_less_than_sign_bang_dash_dash_state(&mut self) {
        match self.current_input_character {
            Some('>') | None => self.reconsume_in(TokenizerState::CommentEnd),
            // "This is a nested-comment parse error. Reconsume in the comment end state."
            Some(_) => {
                self.parse_error(ParseErrorCode::NestedComment);
                self.reconsume_in(TokenizerState::CommentEnd);
            }
        }
    }

    /// [§ 13.2.5.50 Comment end dash state](https://html.spec.whatwg.org/multipage/parsing.html#comment-end-dash-state)
    fn handle_comment_end_dash_state(&mut self) {
        match self.current_input_character {
            Some('-') => self.switch_to(TokenizerState::CommentEnd),
            None => self.eof_in_comment(),
            Some(_) => {
                self.append_to_comment('-');
                self.reconsume_in(TokenizerState::Comment);
            }
        }
    }

    /// [§ 13.2.5.51 Comment end state](https://html.spec.whatwg.org/multipage/parsing.html#comment-end-state)
    fn handle_comment_end_state(&mut self) {
        match self.current_input_character {
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_token();
            }
            Some('!') => self.switch_to(TokenizerState::CommentEndBang),
            Some('-') => self.append_to_comment('-'),
            None => self.eof_in_comment(),
            // "Append two U+002D HYPHEN-MINUS characters (-) to the comment token's
            // data. Reconsume in the comment state."
            Some(_) => {
                self.append_to_comment('-');
                self.append_to_comment('-');
                self.reconsume_in(TokenizerState::Comment);
            }
        }
    }

    /// [§ 13.2.5.52 Comment end bang state](https://html.spec.whatwg.org/multipage/parsing.html#comment-end-bang-state)
    fn handle_comment_end_bang_state(&mut self) {
        match self.current_input_character {
            Some('-') => {
                self.append_str_to_comment("--!");
                self.switch_to(TokenizerState::CommentEndDash);
            }
            // "This is an incorrectly-closed-comment parse error. Switch to the data
            // state. Emit the current comment token."
            Some('>') => {
                self.parse_error(ParseErrorCode::IncorrectlyClosedComment);
                self.switch_to(TokenizerState::Data);
                self.emit_token();
            }
            None => self.eof_in_comment(),
            Some(_) => {
                self.append_str_to_comment("--!");
                self.reconsume_in(TokenizerState::Comment);
            }
        }
    }

    /// "EOF - This is an eof-in-comment parse error. Emit the current comment
    /// token. Emit an end-of-file token."
    fn eof_in_comment(&mut self) {
        self.parse_error(ParseErrorCode::EofInComment);
        self.emit_token();
        self.emit_eof_token();
    }

    fn append_to_comment(&mut self, c: char) {
        if let Some(token) = self.current_token.as_mut() {
            token.append_to_comment(c);
        }
    }

    fn append_str_to_comment(&mut self, s: &str) {
        for c in s.chars() {
            self.append_to_comment(c);
        }
    }
}

// =============================================================================
// CDATA sections
// =============================================================================

impl HTMLTokenizer {
    /// [§ 13.2.5.69 CDATA section state](https://html.spec.whatwg.org/multipage/parsing.html#cdata-section-state)
    fn handle_cdata_section_state(&mut self) {
        match self.current_input_character {
            Some(']') => self.switch_to(TokenizerState::CDATASectionBracket),
            None => {
                self.parse_error(ParseErrorCode::EofInCdata);
                self.emit_eof_token();
            }
            // U+0000 NULL characters are handled in the tree construction stage.
            Some(c) => self.emit_character_token(c),
        }
    }

    /// [§ 13.2.5.70 CDATA section bracket state](https://html.spec.whatwg.org/multipage/parsing.html#cdata-section-bracket-state)
    fn handle_cdata_section_bracket_state(&mut self) {
        if self.current_input_character == Some(']') {
            self.switch_to(TokenizerState::CDATASectionEnd);
        } else {
            self.emit_character_token(']');
            self.reconsume_in(TokenizerState::CDATASection);
        }
    }

    /// [§ 13.2.5.71 CDATA section end state](https://html.spec.whatwg.org/multipage/parsing.html#cdata-section-end-state)
    fn handle_cdata_section_end_state(&mut self) {
        match self.current_input_character {
            Some(']') => self.emit_character_token(']'),
            Some('>') => self.switch_to(TokenizerState::Data),
            _ => {
                self.emit_character_token(']');
                self.emit_character_token(']');
                self.reconsume_in(TokenizerState::CDATASection);
            }
        }
    }
}

// =============================================================================
// DOCTYPE
// =============================================================================

impl HTMLTokenizer {
    /// [§ 13.2.5.53 DOCTYPE state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-state)
    fn handle_doctype_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {
                self.switch_to(TokenizerState::BeforeDOCTYPEName);
            }
            Some('>') => self.reconsume_in(TokenizerState::BeforeDOCTYPEName),
            // "This is an eof-in-doctype parse error. Create a new DOCTYPE token. Set
            // its force-quirks flag to on. Emit the current token. Emit an end-of-file token."
            None => {
                self.current_token = Some(Token::new_doctype());
                self.eof_in_doctype();
            }
            Some(_) => {
                self.parse_error(ParseErrorCode::MissingWhitespaceBeforeDoctypeName);
                self.reconsume_in(TokenizerState::BeforeDOCTYPEName);
            }
        }
    }

    /// [§ 13.2.5.54 Before DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#before-doctype-name-state)
    fn handle_before_doctype_name_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {}
            // "This is an unexpected-null-character parse error. Create a new DOCTYPE
            // token. Set the token's name to a U+FFFD REPLACEMENT CHARACTER character.
            // Switch to the DOCTYPE name state."
            Some('\0') => {
                self.parse_error(ParseErrorCode::UnexpectedNullCharacter);
                let mut token = Token::new_doctype();
                token.append_to_doctype_name('\u{FFFD}');
                self.current_token = Some(token);
                self.switch_to(TokenizerState::DOCTYPEName);
            }
            // "This is a missing-doctype-name parse error. Create a new DOCTYPE token.
            // Set its force-quirks flag to on. Switch to the data state. Emit the
            // current token."
            Some('>') => {
                self.parse_error(ParseErrorCode::MissingDoctypeName);
                let mut token = Token::new_doctype();
                token.set_force_quirks();
                self.current_token = Some(token);
                self.switch_to(TokenizerState::Data);
                self.emit_token();
            }
            None => {
                self.current_token = Some(Token::new_doctype());
                self.eof_in_doctype();
            }
            // "ASCII upper alpha - Create a new DOCTYPE token. Set the token's name to
            // the lowercase version of the current input character."
            Some(c) => {
                let mut token = Token::new_doctype();
                token.append_to_doctype_name(c.to_ascii_lowercase());
                self.current_token = Some(token);
                self.switch_to(TokenizerState::DOCTYPEName);
            }
        }
    }

    /// [§ 13.2.5.55 DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-name-state)
    fn handle_doctype_name_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {
                self.switch_to(TokenizerState::AfterDOCTYPEName);
            }
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_token();
            }
            Some('\0') => {
                self.parse_error(ParseErrorCode::UnexpectedNullCharacter);
                self.with_current_token(|token| token.append_to_doctype_name('\u{FFFD}'));
            }
            None => self.eof_in_doctype(),
            Some(c) => {
                self.with_current_token(|token| token.append_to_doctype_name(c.to_ascii_lowercase()));
            }
        }
    }

    /// [§ 13.2.5.56 After DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-name-state)
    fn handle_after_doctype_name_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {}
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_token();
            }
            None => self.eof_in_doctype(),
            Some(_) => {
                // "If the six characters starting from the current input character are
                // an ASCII case-insensitive match for the word "PUBLIC", then consume
                // those characters and switch to the after DOCTYPE public keyword state."
                if self.current_and_next_characters_are_case_insensitive("PUBLIC") {
                    self.consume_string("UBLIC");
                    self.switch_to(TokenizerState::AfterDOCTYPEPublicKeyword);
                } else if self.current_and_next_characters_are_case_insensitive("SYSTEM") {
                    self.consume_string("YSTEM");
                    self.switch_to(TokenizerState::AfterDOCTYPESystemKeyword);
                } else {
                    // "Otherwise, this is an invalid-character-sequence-after-doctype-name
                    // parse error. Set the current DOCTYPE token's force-quirks flag to
                    // on. Reconsume in the bogus DOCTYPE state."
                    self.parse_error(ParseErrorCode::InvalidCharacterSequenceAfterDoctypeName);
                    self.with_current_token(Token::set_force_quirks);
                    self.reconsume_in(TokenizerState::BogusDOCTYPE);
                }
            }
        }
    }

    /// [§ 13.2.5.57 After DOCTYPE public keyword state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-public-keyword-state)
    /// [§ 13.2.5.63 After DOCTYPE system keyword state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-system-keyword-state)
    fn handle_after_doctype_keyword_state(&mut self, identifier: Identifier) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {
                self.switch_to(identifier.before_state());
            }
            // "This is a missing-whitespace-after-doctype-public-keyword parse error.
            // Set the current DOCTYPE token's public identifier to the empty string
            // (not missing), then switch to the DOCTYPE public identifier
            // (double-quoted) state."
            Some(quote @ ('"' | '\'')) => {
                self.parse_error(identifier.missing_whitespace_after_keyword());
                self.start_identifier(identifier);
                self.switch_to(identifier.quoted_state(quote));
            }
            Some('>') => self.missing_doctype_identifier(identifier),
            None => self.eof_in_doctype(),
            Some(_) => self.missing_quote_before_doctype_identifier(identifier),
        }
    }

    /// [§ 13.2.5.58 Before DOCTYPE public identifier state](https://html.spec.whatwg.org/multipage/parsing.html#before-doctype-public-identifier-state)
    /// [§ 13.2.5.64 Before DOCTYPE system identifier state](https://html.spec.whatwg.org/multipage/parsing.html#before-doctype-system-identifier-state)
    fn handle_before_doctype_identifier_state(&mut self, identifier: Identifier) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {}
            Some(quote @ ('"' | '\'')) => {
                self.start_identifier(identifier);
                self.switch_to(identifier.quoted_state(quote));
            }
            Some('>') => self.missing_doctype_identifier(identifier),
            None => self.eof_in_doctype(),
            Some(_) => self.missing_quote_before_doctype_identifier(identifier),
        }
    }

    /// [§ 13.2.5.59 DOCTYPE public identifier (double-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-public-identifier-(double-quoted)-state)
    ///
    /// Shared by both quoting styles of both identifiers.
    fn handle_doctype_identifier_quoted_state(&mut self, identifier: Identifier, quote: char) {
        match self.current_input_character {
            Some(c) if c == quote => self.switch_to(identifier.after_state()),
            Some('\0') => {
                self.parse_error(ParseErrorCode::UnexpectedNullCharacter);
                self.append_to_identifier(identifier, '\u{FFFD}');
            }
            // "This is an abrupt-doctype-public-identifier parse error. Set the current
            // DOCTYPE token's force-quirks flag to on. Switch to the data state. Emit
            // the current DOCTYPE token."
            Some('>') => {
                self.parse_error(identifier.abrupt());
                self.with_current_token(Token::set_force_quirks);
                self.switch_to(TokenizerState::Data);
                self.emit_token();
            }
            None => self.eof_in_doctype(),
            Some(c) => self.append_to_identifier(identifier, c),
        }
    }

    /// [§ 13.2.5.61 After DOCTYPE public identifier state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-public-identifier-state)
    fn handle_after_doctype_public_identifier_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {
                self.switch_to(TokenizerState::BetweenDOCTYPEPublicAndSystemIdentifiers);
            }
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_token();
            }
            Some(quote @ ('"' | '\'')) => {
                self.parse_error(
                    ParseErrorCode::MissingWhitespaceBetweenDoctypePublicAndSystemIdentifiers,
                );
                self.start_identifier(Identifier::System);
                self.switch_to(Identifier::System.quoted_state(quote));
            }
            None => self.eof_in_doctype(),
            Some(_) => self.missing_quote_before_doctype_identifier(Identifier::System),
        }
    }

    /// [§ 13.2.5.62 Between DOCTYPE public and system identifiers state](https://html.spec.whatwg.org/multipage/parsing.html#between-doctype-public-and-system-identifiers-state)
    fn handle_between_doctype_public_and_system_identifiers_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {}
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_token();
            }
            Some(quote @ ('"' | '\'')) => {
                self.start_identifier(Identifier::System);
                self.switch_to(Identifier::System.quoted_state(quote));
            }
            None => self.eof_in_doctype(),
            Some(_) => self.missing_quote_before_doctype_identifier(Identifier::System),
        }
    }

    /// [§ 13.2.5.67 After DOCTYPE system identifier state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-system-identifier-state)
    fn handle_after_doctype_system_identifier_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {}
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_token();
            }
            None => self.eof_in_doctype(),
            // "This is an unexpected-character-after-doctype-system-identifier parse
            // error. Reconsume in the bogus DOCTYPE state. (This does not set the
            // current DOCTYPE token's force-quirks flag to on.)"
            Some(_) => {
                self.parse_error(ParseErrorCode::UnexpectedCharacterAfterDoctypeSystemIdentifier);
                self.reconsume_in(TokenizerState::BogusDOCTYPE);
            }
        }
    }

    /// [§ 13.2.5.68 Bogus DOCTYPE state](https://html.spec.whatwg.org/multipage/parsing.html#bogus-doctype-state)
    fn handle_bogus_doctype_state(&mut self) {
        match self.current_input_character {
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_token();
            }
            Some('\0') => self.parse_error(ParseErrorCode::UnexpectedNullCharacter),
            // "Emit the DOCTYPE token. Emit an end-of-file token."
            None => {
                self.emit_token();
                self.emit_eof_token();
            }
            Some(_) => {}
        }
    }

    /// "This is an eof-in-doctype parse error. Set the current DOCTYPE token's
    /// force-quirks flag to on. Emit the current DOCTYPE token. Emit an
    /// end-of-file token."
    fn eof_in_doctype(&mut self) {
        self.parse_error(ParseErrorCode::EofInDoctype);
        self.with_current_token(Token::set_force_quirks);
        self.emit_token();
        self.emit_eof_token();
    }

    /// "This is a missing-doctype-public-identifier parse error. Set the current
    /// DOCTYPE token's force-quirks flag to on. Switch to the data state. Emit
    /// the current DOCTYPE token."
    fn missing_doctype_identifier(&mut self, identifier: Identifier) {
        self.parse_error(identifier.missing());
        self.with_current_token(Token::set_force_quirks);
        self.switch_to(TokenizerState::Data);
        self.emit_token();
    }

    /// "This is a missing-quote-before-doctype-public-identifier parse error. Set
    /// the current DOCTYPE token's force-quirks flag to on. Reconsume in the
    /// bogus DOCTYPE state."
    fn missing_quote_before_doctype_identifier(&mut self, identifier: Identifier) {
        self.parse_error(identifier.missing_quote());
        self.with_current_token(Token::set_force_quirks);
        self.reconsume_in(TokenizerState::BogusDOCTYPE);
    }

    fn start_identifier(&mut self, identifier: Identifier) {
        match identifier {
            Identifier::Public => self.with_current_token(Token::start_public_identifier),
            Identifier::System => self.with_current_token(Token::start_system_identifier),
        }
    }

    fn append_to_identifier(&mut self, identifier: Identifier, c: char) {
        match identifier {
            Identifier::Public => {
                self.with_current_token(|token| token.append_to_public_identifier(c));
            }
            Identifier::System => {
                self.with_current_token(|token| token.append_to_system_identifier(c));
            }
        }
    }
}

impl Identifier {
    const fn before_state(self) -> TokenizerState {
        match self {
            Self::Public => TokenizerState::BeforeDOCTYPEPublicIdentifier,
            Self::System => TokenizerState::BeforeDOCTYPESystemIdentifier,
        }
    }

    const fn after_state(self) -> TokenizerState {
        match self {
            Self::Public => TokenizerState::AfterDOCTYPEPublicIdentifier,
            Self::System => TokenizerState::AfterDOCTYPESystemIdentifier,
        }
    }

    const fn quoted_state(self, quote: char) -> TokenizerState {
        match (self, quote) {
            (Self::Public, '"') => TokenizerState::DOCTYPEPublicIdentifierDoubleQuoted,
            (Self::Public, _) => TokenizerState::DOCTYPEPublicIdentifierSingleQuoted,
            (Self::System, '"') => TokenizerState::DOCTYPESystemIdentifierDoubleQuoted,
            (Self::System, _) => TokenizerState::DOCTYPESystemIdentifierSingleQuoted,
        }
    }

    const fn missing(self) -> ParseErrorCode {
        match self {
            Self::Public => ParseErrorCode::MissingDoctypePublicIdentifier,
            Self::System => ParseErrorCode::MissingDoctypeSystemIdentifier,
        }
    }

    const fn missing_quote(self) -> ParseErrorCode {
        match self {
            Self::Public => ParseErrorCode::MissingQuoteBeforeDoctypePublicIdentifier,
            Self::System => ParseErrorCode::MissingQuoteBeforeDoctypeSystemIdentifier,
        }
    }

    const fn missing_whitespace_after_keyword(self) -> ParseErrorCode {
        match self {
            Self::Public => ParseErrorCode::MissingWhitespaceAfterDoctypePublicKeyword,
            Self::System => ParseErrorCode::MissingWhitespaceAfterDoctypeSystemKeyword,
        }
    }

    const fn abrupt(self) -> ParseErrorCode {
        match self {
            Self::Public => ParseErrorCode::AbruptDoctypePublicIdentifier,
            Self::System => ParseErrorCode::AbruptDoctypeSystemIdentifier,
        }
    }
}
