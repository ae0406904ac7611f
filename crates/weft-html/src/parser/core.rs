use strum_macros::Display;

use weft_common::warning::warn_once;
use weft_dom::{AttributesMap, DomTree, ElementData, Namespace, NodeId};

use super::active_formatting::ActiveFormattingElement;
use crate::error::{ParseErrorCode, ParseIssue, ParserError};
use crate::tokenizer::{HTMLTokenizer, Tag, Token, TokenizerState};

/// [§ 13.2.4.1 The insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-insertion-mode)
///
/// "The insertion mode is a state variable that controls the primary operation
/// of the tree construction stage."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum InsertionMode {
    /// [§ 13.2.6.4.1 The "initial" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-initial-insertion-mode)
    Initial,
    /// [§ 13.2.6.4.2 The "before html" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-html-insertion-mode)
    BeforeHtml,
    /// [§ 13.2.6.4.3 The "before head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-head-insertion-mode)
    BeforeHead,
    /// [§ 13.2.6.4.4 The "in head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inhead)
    InHead,
    /// [§ 13.2.6.4.5 The "in head noscript" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inheadnoscript)
    InHeadNoscript,
    /// [§ 13.2.6.4.6 The "after head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-head-insertion-mode)
    AfterHead,
    /// [§ 13.2.6.4.7 The "in body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
    InBody,
    /// [§ 13.2.6.4.8 The "text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incdata)
    Text,
    /// [§ 13.2.6.4.9 The "in table" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intable)
    InTable,
    /// [§ 13.2.6.4.10 The "in table text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intabletext)
    InTableText,
    /// [§ 13.2.6.4.11 The "in caption" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incaption)
    InCaption,
    /// [§ 13.2.6.4.12 The "in column group" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incolgroup)
    InColumnGroup,
    /// [§ 13.2.6.4.13 The "in table body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intbody)
    InTableBody,
    /// [§ 13.2.6.4.14 The "in row" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intr)
    InRow,
    /// [§ 13.2.6.4.15 The "in cell" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intd)
    InCell,
    /// [§ 13.2.6.4.16 The "in select" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inselect)
    InSelect,
    /// [§ 13.2.6.4.17 The "in select in table" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inselectintable)
    InSelectInTable,
    /// [§ 13.2.6.4.18 The "in template" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intemplate)
    InTemplate,
    /// [§ 13.2.6.4.19 The "after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-afterbody)
    AfterBody,
    /// [§ 13.2.6.4.20 The "in frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inframeset)
    InFrameset,
    /// [§ 13.2.6.4.21 The "after frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-afterframeset)
    AfterFrameset,
    /// [§ 13.2.6.4.22 The "after after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-after-body-insertion-mode)
    AfterAfterBody,
    /// [§ 13.2.6.4.23 The "after after frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-after-frameset-insertion-mode)
    AfterAfterFrameset,
}

/// Callback invoked with every element popped off the stack of open elements.
pub type PopObserver = Box<dyn FnMut(&DomTree, NodeId)>;

/// Where a node goes: appended to `parent`, or inserted into `parent`
/// immediately before `before`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct InsertionLocation {
    pub(super) parent: NodeId,
    pub(super) before: Option<NodeId>,
}

/// [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction)
///
/// The HTML parser builds a DOM tree from the tokens of an [`HTMLTokenizer`].
/// It owns the tokenizer and pulls one token at a time, so that insertion
/// modes can switch the tokenizer state (RCDATA for `<title>`, RAWTEXT for
/// `<style>`, ...) before the next token is produced.
pub struct HTMLParser {
    pub(super) tokenizer: HTMLTokenizer,

    /// [§ 13.2.4.1 The insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-insertion-mode)
    pub(super) insertion_mode: InsertionMode,

    /// [§ 13.2.4.1](https://html.spec.whatwg.org/multipage/parsing.html#original-insertion-mode)
    /// "the original insertion mode"
    pub(super) original_insertion_mode: Option<InsertionMode>,

    /// [§ 13.2.4.1](https://html.spec.whatwg.org/multipage/parsing.html#stack-of-template-insertion-modes)
    /// "The stack of template insertion modes"
    pub(super) template_insertion_modes: Vec<InsertionMode>,

    /// [§ 13.2.4.2 The stack of open elements](https://html.spec.whatwg.org/multipage/parsing.html#the-stack-of-open-elements)
    pub(super) stack_of_open_elements: Vec<NodeId>,

    /// [§ 13.2.4.3 The list of active formatting elements](https://html.spec.whatwg.org/multipage/parsing.html#the-list-of-active-formatting-elements)
    pub(super) active_formatting_elements: Vec<ActiveFormattingElement>,

    /// [§ 13.2.4.4 The element pointers](https://html.spec.whatwg.org/multipage/parsing.html#the-element-pointers)
    pub(super) head_element_pointer: Option<NodeId>,

    /// "The form element pointer points to the last form element that was
    /// opened and whose end tag has not yet been seen."
    pub(super) form_element_pointer: Option<NodeId>,

    pub(super) tree: DomTree,

    /// Number of tokens processed so far.
    pub(super) token_index: usize,
    pub(super) started: bool,
    pub(super) stopped: bool,
    pub(super) issues: Vec<ParseIssue>,

    /// [§ 13.2.4.5 Other parsing state flags](https://html.spec.whatwg.org/multipage/parsing.html#other-parsing-state-flags)
    /// "The scripting flag is set to "enabled" if scripting was enabled for
    /// the Document with which the parser is associated when the parser was
    /// created, and "disabled" otherwise."
    pub(super) scripting: bool,

    /// "The frameset-ok flag is set to "ok" when the parser is created."
    pub(super) frameset_ok: bool,

    /// [§ 13.2.6.1](https://html.spec.whatwg.org/multipage/parsing.html#foster-parent)
    pub(super) foster_parenting: bool,

    /// [§ 13.2.6.4.10](https://html.spec.whatwg.org/multipage/parsing.html#concept-pending-table-char-tokens)
    /// "the pending table character tokens list"
    pub(super) pending_table_characters: String,

    /// Set after `<pre>`, `<listing>` and `<textarea>`: "If the next token is
    /// a U+000A LINE FEED (LF) character token, then ignore that token."
    pub(super) skip_next_newline: bool,

    /// "Acknowledge the token's self-closing flag". Reset for every token.
    pub(super) self_closing_acknowledged: bool,

    /// [§ 13.4 Parsing HTML fragments](https://html.spec.whatwg.org/multipage/parsing.html#concept-frag-parse-context)
    /// The context element when parsing a fragment.
    pub(super) context_element: Option<NodeId>,

    pub(super) pop_observer: Option<PopObserver>,
}

impl HTMLParser {
    /// Create a parser for `source`.
    #[must_use]
    pub fn new(source: &str) -> Self {
        Self {
            tokenizer: HTMLTokenizer::new(source),
            insertion_mode: InsertionMode::Initial,
            original_insertion_mode: None,
            template_insertion_modes: Vec::new(),
            stack_of_open_elements: Vec::new(),
            active_formatting_elements: Vec::new(),
            head_element_pointer: None,
            form_element_pointer: None,
            tree: DomTree::new(),
            token_index: 0,
            started: false,
            stopped: false,
            issues: Vec::new(),
            scripting: false,
            frameset_ok: true,
            foster_parenting: false,
            pending_table_characters: String::new(),
            skip_next_newline: false,
            self_closing_acknowledged: false,
            context_element: None,
            pop_observer: None,
        }
    }

    /// Enable or disable the scripting flag. It only changes how `<noscript>`
    /// is parsed; scripts are never run.
    #[must_use]
    pub const fn with_scripting(mut self, enabled: bool) -> Self {
        self.scripting = enabled;
        self
    }

    /// Register a callback that sees every element popped off the stack of
    /// open elements, in pop order.
    #[must_use]
    pub fn with_pop_observer(mut self, observer: impl FnMut(&DomTree, NodeId) + 'static) -> Self {
        self.pop_observer = Some(Box::new(observer));
        self
    }

    /// [§ 13.4 Parsing HTML fragments](https://html.spec.whatwg.org/multipage/parsing.html#parsing-html-fragments)
    ///
    /// Parse the input as the contents of a `local_name` element in
    /// `namespace`, like `innerHTML`. The fragment's nodes become the children
    /// of the root `html` element of the returned tree.
    ///
    /// # Errors
    ///
    /// Returns [`ParserError::FragmentContextAfterStart`] once parsing has
    /// begun and [`ParserError::EmptyFragmentContext`] for an empty name.
    pub fn set_fragment_context(
        &mut self,
        local_name: &str,
        namespace: Namespace,
    ) -> Result<(), ParserError> {
        if self.started || self.context_element.is_some() {
            return Err(ParserError::FragmentContextAfterStart);
        }
        if local_name.is_empty() {
            return Err(ParserError::EmptyFragmentContext);
        }

        // "Create a new HTML parser, and associate it with a Document node."
        // "Let context be the context element; if the context element's node
        // document is in quirks mode, set the Document to quirks mode."
        let context = self
            .tree
            .create_element(local_name, namespace, AttributesMap::new());
        self.context_element = Some(context);

        // "Set the state of the HTML parser's tokenization stage as follows,
        // switching on the context element:"
        if namespace == Namespace::Html {
            let state = match local_name {
                "title" | "textarea" => Some(TokenizerState::RCDATA),
                "style" | "xmp" | "iframe" | "noembed" | "noframes" => {
                    Some(TokenizerState::RAWTEXT)
                }
                "noscript" if self.scripting => Some(TokenizerState::RAWTEXT),
                "script" => Some(TokenizerState::ScriptData),
                "plaintext" => Some(TokenizerState::PLAINTEXT),
                _ => None,
            };
            if let Some(state) = state {
                self.tokenizer.set_state(state);
            }
        }

        // "Let root be the result of creating an element given document,
        // "html", and the HTML namespace. Append the element root to the
        // Document node created above. Set up the HTML parser's stack of open
        // elements so that it contains just the single element root."
        let root = self
            .tree
            .create_element("html", Namespace::Html, AttributesMap::new());
        self.tree.append_child(NodeId::ROOT, root);
        self.stack_of_open_elements.push(root);

        // "If context is a template element, then push "in template" onto the
        // stack of template insertion modes so that it is the new current
        // template insertion mode."
        if namespace == Namespace::Html && local_name == "template" {
            self.template_insertion_modes
                .push(InsertionMode::InTemplate);
        }

        // "Reset the parser's insertion mode appropriately."
        self.reset_insertion_mode_appropriately();

        // "Set the HTML parser's form element pointer to the nearest node to
        // the context element that is a form element (going straight up the
        // ancestor chain, and including the element itself, if it is a form
        // element), if any." The detached context has no ancestors.
        if namespace == Namespace::Html && local_name == "form" {
            self.form_element_pointer = Some(context);
        }
        self.update_tokenizer_cdata_flag();
        Ok(())
    }

    /// Run the parser and return the DOM tree.
    #[must_use]
    pub fn run(self) -> DomTree {
        self.run_with_issues().0
    }

    /// Run the parser and return both the `DomTree` and every parse error,
    /// tokenizer errors included, in the order they were found.
    #[must_use]
    pub fn run_with_issues(mut self) -> (DomTree, Vec<ParseIssue>) {
        self.started = true;
        while !self.stopped {
            let token = self.tokenizer.next_token();
            self.collect_tokenizer_errors();

            // "If the next token is a U+000A LINE FEED (LF) character token,
            // then ignore that token and move on to the next one."
            if std::mem::take(&mut self.skip_next_newline) && token == Token::Character('\n') {
                self.token_index += 1;
                continue;
            }

            self.self_closing_acknowledged = false;
            self.process_token(&token);

            // [§ 13.2.5.40](https://html.spec.whatwg.org/multipage/parsing.html#self-closing-start-tag-state)
            // "When a start tag token is emitted with its self-closing flag
            // set, if the flag is not acknowledged when the token is processed
            // by the tree construction stage, that is a
            // non-void-html-element-start-tag-with-trailing-solidus parse error."
            if let Token::Tag(tag) = &token
                && tag.is_start()
                && tag.self_closing
                && !self.self_closing_acknowledged
            {
                self.parse_error(
                    ParseErrorCode::NonVoidHtmlElementStartTagWithTrailingSolidus,
                    &tag.name,
                );
            }

            // EOF always ends the parse.
            if token.is_eof() && !self.stopped {
                self.stop_parsing();
            }
            self.token_index += 1;
            self.update_tokenizer_cdata_flag();
        }
        (self.tree, self.issues)
    }

    fn collect_tokenizer_errors(&mut self) {
        for error in self.tokenizer.take_errors() {
            self.issues.push(ParseIssue {
                code: error.code,
                detail: format!("at byte {}", error.position),
                token_index: self.token_index,
            });
        }
    }

    /// [§ 13.2.5.42](https://html.spec.whatwg.org/multipage/parsing.html#markup-declaration-open-state)
    /// "If there is an adjusted current node and it is not an element in the
    /// HTML namespace, then switch to the CDATA section state."
    fn update_tokenizer_cdata_flag(&mut self) {
        let allowed = self
            .adjusted_current_node()
            .and_then(|id| self.tree.as_element(id))
            .is_some_and(|element| element.namespace != Namespace::Html);
        self.tokenizer.set_cdata_allowed(allowed);
    }

    /// Record a tree construction parse error and keep going.
    pub(super) fn parse_error(&mut self, code: ParseErrorCode, detail: &str) {
        warn_once("HTML Parser", code.as_ref());
        self.issues.push(ParseIssue {
            code,
            detail: detail.to_string(),
            token_index: self.token_index,
        });
    }

    /// Record a parse error about `token`.
    pub(super) fn token_error(&mut self, code: ParseErrorCode, token: &Token) {
        self.parse_error(code, &token.to_string());
    }

    /// "Parse error." for a token a mode has no rule for, with the code
    /// picked from the token's kind.
    pub(super) fn unexpected_token(&mut self, token: &Token) {
        let code = match token {
            Token::Doctype(_) => ParseErrorCode::UnexpectedDoctype,
            Token::Tag(tag) if tag.is_start() => ParseErrorCode::UnexpectedStartTag,
            Token::Tag(_) => ParseErrorCode::UnexpectedEndTag,
            Token::EndOfFile => ParseErrorCode::EofInElement,
            Token::Comment(_) | Token::Character(_) => ParseErrorCode::UnexpectedCharacter,
        };
        self.token_error(code, token);
    }

    /// [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction-dispatcher)
    ///
    /// "As each token is emitted from the tokenizer, the user agent must follow
    /// the appropriate steps from the following list, known as the tree
    /// construction dispatcher:"
    ///
    /// This is also "reprocess the token".
    pub(super) fn process_token(&mut self, token: &Token) {
        if self.should_use_foreign_content_rules(token) {
            self.handle_foreign_content(token);
        } else {
            self.process_using_rules_for(self.insertion_mode, token);
        }
    }

    /// "If the stack of open elements is empty; If the adjusted current node is
    /// an element in the HTML namespace; If the adjusted current node is a
    /// MathML text integration point and the token is a start tag whose tag
    /// name is neither "mglyph" nor "malignmark"; If the adjusted current node
    /// is a MathML text integration point and the token is a character token;
    /// If the adjusted current node is a MathML annotation-xml element and the
    /// token is a start tag whose tag name is "svg"; If the adjusted current
    /// node is an HTML integration point and the token is a start tag; If the
    /// adjusted current node is an HTML integration point and the token is a
    /// character token; If the token is an end-of-file token: Process the token
    /// according to the rules given in the section corresponding to the
    /// current insertion mode in HTML content."
    fn should_use_foreign_content_rules(&self, token: &Token) -> bool {
        let Some(element) = self
            .adjusted_current_node()
            .and_then(|id| self.tree.as_element(id))
        else {
            return false;
        };
        if element.namespace == Namespace::Html {
            return false;
        }
        match token {
            Token::EndOfFile => false,
            Token::Character(_) => {
                !(element.is_mathml_text_integration_point() || element.is_html_integration_point())
            }
            Token::Tag(tag) if tag.is_start() => {
                let in_mathml_text = element.is_mathml_text_integration_point()
                    && !matches!(tag.name.as_str(), "mglyph" | "malignmark");
                let svg_in_annotation =
                    element.is_mathml_element("annotation-xml") && tag.name == "svg";
                !(in_mathml_text || svg_in_annotation || element.is_html_integration_point())
            }
            _ => true,
        }
    }

    /// "Process the token using the rules for the X insertion mode": runs the
    /// handler of `mode` without switching the insertion mode.
    pub(super) fn process_using_rules_for(&mut self, mode: InsertionMode, token: &Token) {
        match mode {
            InsertionMode::Initial => self.handle_initial_mode(token),
            InsertionMode::BeforeHtml => self.handle_before_html_mode(token),
            InsertionMode::BeforeHead => self.handle_before_head_mode(token),
            InsertionMode::InHead => self.handle_in_head_mode(token),
            InsertionMode::InHeadNoscript => self.handle_in_head_noscript_mode(token),
            InsertionMode::AfterHead => self.handle_after_head_mode(token),
            InsertionMode::InBody => self.handle_in_body_mode(token),
            InsertionMode::Text => self.handle_text_mode(token),

            // ===== TABLE PARSING MODES =====
            InsertionMode::InTable => self.handle_in_table_mode(token),
            InsertionMode::InTableText => self.handle_in_table_text_mode(token),
            InsertionMode::InCaption => self.handle_in_caption_mode(token),
            InsertionMode::InColumnGroup => self.handle_in_column_group_mode(token),
            InsertionMode::InTableBody => self.handle_in_table_body_mode(token),
            InsertionMode::InRow => self.handle_in_row_mode(token),
            InsertionMode::InCell => self.handle_in_cell_mode(token),

            // ===== FORM AND TEMPLATE MODES =====
            InsertionMode::InSelect => self.handle_in_select_mode(token),
            InsertionMode::InSelectInTable => self.handle_in_select_in_table_mode(token),
            InsertionMode::InTemplate => self.handle_in_template_mode(token),

            // ===== AFTER BODY AND FRAMESET MODES =====
            InsertionMode::AfterBody => self.handle_after_body_mode(token),
            InsertionMode::InFrameset => self.handle_in_frameset_mode(token),
            InsertionMode::AfterFrameset => self.handle_after_frameset_mode(token),
            InsertionMode::AfterAfterBody => self.handle_after_after_body_mode(token),
            InsertionMode::AfterAfterFrameset => self.handle_after_after_frameset_mode(token),
        }
    }

    /// [§ 13.2.6.5 Stop parsing](https://html.spec.whatwg.org/multipage/parsing.html#stop-parsing)
    ///
    /// "Pop all the nodes off the stack of open elements."
    pub(super) fn stop_parsing(&mut self) {
        while self.pop_current_node().is_some() {}
        self.stopped = true;
    }

    /// [§ 12.1.4 ASCII whitespace](https://infra.spec.whatwg.org/#ascii-whitespace)
    ///
    /// "ASCII whitespace is U+0009 TAB, U+000A LF, U+000C FF, U+000D CR,
    /// or U+0020 SPACE."
    pub(super) const fn is_whitespace(c: char) -> bool {
        matches!(c, '\t' | '\n' | '\x0C' | '\r' | ' ')
    }
}

// =============================================================================
// Element queries
// =============================================================================

impl HTMLParser {
    /// True if `id` is an HTML element called `name`.
    pub(super) fn is_html_element(&self, id: NodeId, name: &str) -> bool {
        self.tree
            .as_element(id)
            .is_some_and(|element| element.is_html_element(name))
    }

    /// True if `id` is an HTML element whose name is one of `names`.
    pub(super) fn is_html_element_in(&self, id: NodeId, names: &[&str]) -> bool {
        self.tree
            .as_element(id)
            .is_some_and(|element| element.is_html_element_in(names))
    }

    pub(super) fn current_node_is(&self, name: &str) -> bool {
        self.current_node()
            .is_some_and(|id| self.is_html_element(id, name))
    }

    pub(super) fn current_node_is_one_of(&self, names: &[&str]) -> bool {
        self.current_node()
            .is_some_and(|id| self.is_html_element_in(id, names))
    }

    /// Local name of the element `id`, or the empty string for other nodes.
    pub(super) fn local_name(&self, id: NodeId) -> &str {
        self.tree.as_element(id).map_or("", ElementData::local_name)
    }
}

// =============================================================================
// Creating and inserting nodes
// =============================================================================

impl HTMLParser {
    /// [§ 13.2.6.1 Creating and inserting nodes](https://html.spec.whatwg.org/multipage/parsing.html#appropriate-place-for-inserting-a-node)
    ///
    /// "The appropriate place for inserting a node, optionally using a
    /// particular override target, is the position in an element returned by
    /// running the following steps:"
    pub(super) fn appropriate_place_for_inserting(
        &self,
        override_target: Option<NodeId>,
    ) -> InsertionLocation {
        // STEP 1: "If there was an override target specified, then let target
        // be the override target. Otherwise, let target be the current node."
        let target = override_target
            .or_else(|| self.current_node())
            .unwrap_or(NodeId::ROOT);

        // STEP 2: "Determine the adjusted insertion location using the first
        // matching steps from the following list:"
        // "If foster parenting is enabled and target is a table, tbody, tfoot,
        // thead, or tr element"
        if self.foster_parenting
            && self.is_html_element_in(target, &["table", "tbody", "tfoot", "thead", "tr"])
        {
            return self.foster_parent_location();
        }

        // "Otherwise: Let adjusted insertion location be inside target, after
        // its last child (if any)."
        InsertionLocation {
            parent: target,
            before: None,
        }
    }

    /// [§ 13.2.6.1](https://html.spec.whatwg.org/multipage/parsing.html#foster-parent)
    fn foster_parent_location(&self) -> InsertionLocation {
        // "Let last template be the last template element in the stack of open
        // elements, if any."
        let last_template = self
            .stack_of_open_elements
            .iter()
            .rposition(|&id| self.is_html_element(id, "template"));
        // "Let last table be the last table element in the stack of open
        // elements, if any."
        let last_table = self
            .stack_of_open_elements
            .iter()
            .rposition(|&id| self.is_html_element(id, "table"));

        match (last_template, last_table) {
            // "If there is a last template and either there is no last table,
            // or there is one, but last template is lower (more recently added)
            // than last table in the stack of open elements, then: let adjusted
            // insertion location be inside last template's template contents,
            // after its last child (if any), and abort these steps."
            (Some(template), table) if table.is_none_or(|table| template > table) => {
                InsertionLocation {
                    parent: self.stack_of_open_elements[template],
                    before: None,
                }
            }
            // "If there is no last table, then let adjusted insertion location
            // be inside the first element in the stack of open elements (the
            // html element), after its last child (if any), and abort these
            // steps. (fragment case)"
            (_, None) => InsertionLocation {
                parent: self
                    .stack_of_open_elements
                    .first()
                    .copied()
                    .unwrap_or(NodeId::ROOT),
                before: None,
            },
            (_, Some(table_index)) => {
                let table = self.stack_of_open_elements[table_index];
                // "If last table has a parent node, then let adjusted insertion
                // location be inside last table's parent node, immediately
                // before last table, and abort these steps."
                if let Some(parent) = self.tree.parent(table) {
                    return InsertionLocation {
                        parent,
                        before: Some(table),
                    };
                }
                // "Let previous element be the element immediately above last
                // table in the stack of open elements. Let adjusted insertion
                // location be inside previous element, after its last child."
                InsertionLocation {
                    parent: self.stack_of_open_elements[table_index.saturating_sub(1)],
                    before: None,
                }
            }
        }
    }

    /// Insert `node` at `location`.
    pub(super) fn insert_at(&mut self, location: InsertionLocation, node: NodeId) {
        match location.before {
            Some(reference) => self.tree.insert_before(location.parent, node, reference),
            None => self.tree.append_child(location.parent, node),
        }
    }

    /// [§ 13.2.6.1 Insert a character](https://html.spec.whatwg.org/multipage/parsing.html#insert-a-character)
    pub(super) fn insert_character(&mut self, c: char) {
        // STEP 1: "Let data be the characters passed to the algorithm"
        // STEP 2: "Let the adjusted insertion location be the appropriate place
        // for inserting a node."
        let location = self.appropriate_place_for_inserting(None);

        // STEP 3: "If the adjusted insertion location is inside a Document
        // node, then return."
        if location.parent == NodeId::ROOT {
            return;
        }

        // STEP 4: "If there is a Text node immediately before the adjusted
        // insertion location, then append data to that Text node's data."
        let previous = match location.before {
            Some(reference) => self.tree.prev_sibling(reference),
            None => self.tree.last_child(location.parent),
        };
        if let Some(text) = previous
            && self.tree.as_text(text).is_some()
        {
            let mut buffer = [0; 4];
            self.tree.append_text(text, c.encode_utf8(&mut buffer));
            return;
        }

        // "Otherwise, create a new Text node whose data is data and whose node
        // document is the same as that of the element in which the adjusted
        // insertion location finds itself, and insert the newly created node
        // at the adjusted insertion location."
        let mut buffer = [0; 4];
        let text = self.tree.new_text(c.encode_utf8(&mut buffer));
        self.insert_at(location, text);
    }

    /// [§ 13.2.6.1 Insert a comment](https://html.spec.whatwg.org/multipage/parsing.html#insert-a-comment)
    ///
    /// "Let data be the data given in the comment token being processed. If
    /// position was specified, then let the adjusted insertion location be
    /// position. Otherwise, let adjusted insertion location be the appropriate
    /// place for inserting a node."
    pub(super) fn insert_comment(&mut self, data: &str) {
        let location = self.appropriate_place_for_inserting(None);
        let comment = self.tree.new_comment(data);
        self.insert_at(location, comment);
    }

    /// Insert a comment as the last child of `parent`.
    /// Used for the Document ("as the last child of the Document object") and
    /// the html element ("as the last child of the first element in the stack
    /// of open elements").
    pub(super) fn insert_comment_in(&mut self, parent: NodeId, data: &str) {
        let comment = self.tree.new_comment(data);
        self.tree.append_child(parent, comment);
    }

    /// [§ 13.2.6.1 Create an element for a token](https://html.spec.whatwg.org/multipage/parsing.html#create-an-element-for-the-token)
    ///
    /// Creates a detached element. Attributes with a namespace prefix keep
    /// their qualified name (`xlink:href`).
    pub(super) fn create_element_for_token(&mut self, tag: &Tag, namespace: Namespace) -> NodeId {
        let mut attrs = AttributesMap::with_capacity(tag.attributes.len());
        for attribute in &tag.attributes {
            let _ = attrs
                .entry(attribute.qualified_name())
                .or_insert_with(|| attribute.value.clone());
        }
        self.tree.create_element(&tag.name, namespace, attrs)
    }

    /// [§ 13.2.6.1 Insert a foreign element](https://html.spec.whatwg.org/multipage/parsing.html#insert-a-foreign-element)
    ///
    /// "1. Let the adjusted insertion location be the appropriate place for
    /// inserting a node. 2. Let element be the result of creating an element
    /// for the token in the given namespace, with the intended parent being
    /// the element in which the adjusted insertion location finds itself.
    /// 3. ... insert element at the adjusted insertion location. 4. Push
    /// element onto the stack of open elements so that it is the new current
    /// node. 5. Return element."
    pub(super) fn insert_foreign_element(&mut self, tag: &Tag, namespace: Namespace) -> NodeId {
        let location = self.appropriate_place_for_inserting(None);
        let element = self.create_element_for_token(tag, namespace);
        self.insert_at(location, element);
        self.stack_of_open_elements.push(element);
        element
    }

    /// [§ 13.2.6.1 Insert an HTML element](https://html.spec.whatwg.org/multipage/parsing.html#insert-an-html-element)
    ///
    /// "When the steps below require the user agent to insert an HTML element
    /// for a token, the user agent must insert a foreign element for the token,
    /// in the HTML namespace."
    pub(super) fn insert_html_element(&mut self, tag: &Tag) -> NodeId {
        self.insert_foreign_element(tag, Namespace::Html)
    }

    /// Insert a void element: insert, then immediately pop it and acknowledge
    /// the self-closing flag.
    pub(super) fn insert_void_html_element(&mut self, tag: &Tag) {
        let _ = self.insert_html_element(tag);
        let _ = self.pop_current_node();
        self.acknowledge_self_closing_flag();
    }

    pub(super) const fn acknowledge_self_closing_flag(&mut self) {
        self.self_closing_acknowledged = true;
    }

    /// Add the token's attributes that `element` does not already have
    /// (`<html>` and `<body>` start tags in "in body").
    pub(super) fn merge_missing_attributes(&mut self, element: NodeId, tag: &Tag) {
        if let Some(data) = self.tree.as_element_mut(element) {
            for attribute in &tag.attributes {
                let _ = data
                    .attrs
                    .entry(attribute.name.clone())
                    .or_insert_with(|| attribute.value.clone());
            }
        }
    }

    /// [§ 13.2.6.2 Parsing elements that contain only text](https://html.spec.whatwg.org/multipage/parsing.html#generic-rcdata-element-parsing-algorithm)
    ///
    /// "The generic raw text element parsing algorithm and the generic RCDATA
    /// element parsing algorithm consist of the following steps:
    /// 1. Insert an HTML element for the token.
    /// 2. If the algorithm that was invoked is the generic raw text element
    ///    parsing algorithm, switch the tokenizer to the RAWTEXT state;
    ///    otherwise the algorithm invoked was the generic RCDATA element
    ///    parsing algorithm, switch the tokenizer to the RCDATA state.
    /// 3. Let the original insertion mode be the current insertion mode.
    /// 4. Then, switch the insertion mode to "text"."
    pub(super) fn parse_text_element(&mut self, tag: &Tag, state: TokenizerState) {
        let _ = self.insert_html_element(tag);
        self.tokenizer.set_state(state);
        self.original_insertion_mode = Some(self.insertion_mode);
        self.insertion_mode = InsertionMode::Text;
    }

    /// "Follow the generic RCDATA element parsing algorithm."
    pub(super) fn parse_rcdata_element(&mut self, tag: &Tag) {
        self.parse_text_element(tag, TokenizerState::RCDATA);
    }

    /// "Follow the generic raw text element parsing algorithm."
    pub(super) fn parse_raw_text_element(&mut self, tag: &Tag) {
        self.parse_text_element(tag, TokenizerState::RAWTEXT);
    }
}

// =============================================================================
// Implied end tags and resetting the insertion mode
// =============================================================================

/// [§ 13.2.6.3 Closing elements that have implied end tags](https://html.spec.whatwg.org/multipage/parsing.html#generate-implied-end-tags)
const IMPLIED_END_TAG_ELEMENTS: &[&str] = &[
    "dd", "dt", "li", "optgroup", "option", "p", "rb", "rp", "rt", "rtc",
];

/// "generate all implied end tags thoroughly"
const THOROUGHLY_IMPLIED_END_TAG_ELEMENTS: &[&str] = &[
    "caption", "colgroup", "dd", "dt", "li", "optgroup", "option", "p", "rb", "rp", "rt", "rtc",
    "tbody", "td", "tfoot", "th", "thead", "tr",
];

impl HTMLParser {
    /// [§ 13.2.6.3 Generate implied end tags](https://html.spec.whatwg.org/multipage/parsing.html#generate-implied-end-tags)
    ///
    /// "When the steps below require the user agent to generate implied end
    /// tags, then, while the current node is a dd element, a dt element, an li
    /// element, an optgroup element, an option element, a p element, an rb
    /// element, an rp element, an rt element, or an rtc element, the user agent
    /// must pop the current node off the stack of open elements."
    pub(super) fn generate_implied_end_tags(&mut self) {
        self.generate_implied_end_tags_excluding(None);
    }

    /// "If a step requires the user agent to generate implied end tags but
    /// lists an element to exclude from the process, then the user agent must
    /// perform the above steps as if that element was not in the above list."
    pub(super) fn generate_implied_end_tags_excluding(&mut self, exclude: Option<&str>) {
        while let Some(current) = self.current_node() {
            let name = self.local_name(current);
            if !self.is_html_element_in(current, IMPLIED_END_TAG_ELEMENTS) || exclude == Some(name)
            {
                break;
            }
            let _ = self.pop_current_node();
        }
    }

    /// "When the steps below require the user agent to generate all implied
    /// end tags thoroughly, then, while the current node is a caption element,
    /// a colgroup element, ... a tr element, the user agent must pop the
    /// current node off the stack of open elements."
    pub(super) fn generate_all_implied_end_tags_thoroughly(&mut self) {
        while self.current_node_is_one_of(THOROUGHLY_IMPLIED_END_TAG_ELEMENTS) {
            let _ = self.pop_current_node();
        }
    }

    /// [§ 13.2.6.4.7](https://html.spec.whatwg.org/multipage/parsing.html#close-a-p-element)
    ///
    /// "When the steps above say the user agent is to close a p element, it
    /// means that the user agent must generate implied end tags, except for p
    /// elements. If the current node is not a p element, then this is a parse
    /// error. Pop elements from the stack of open elements until a p element
    /// has been popped from the stack."
    pub(super) fn close_p_element(&mut self) {
        self.generate_implied_end_tags_excluding(Some("p"));
        if !self.current_node_is("p") {
            self.parse_error(ParseErrorCode::MisnestedTag, "p");
        }
        self.pop_until_html_element("p");
    }

    /// "If the stack of open elements has a p element in button scope, then
    /// close a p element."
    pub(super) fn close_p_element_in_button_scope(&mut self) {
        if self.has_element_in_button_scope("p") {
            self.close_p_element();
        }
    }

    /// [§ 13.2.4.1 Reset the insertion mode appropriately](https://html.spec.whatwg.org/multipage/parsing.html#reset-the-insertion-mode-appropriately)
    pub(super) fn reset_insertion_mode_appropriately(&mut self) {
        self.insertion_mode = self.appropriate_insertion_mode();
    }

    fn appropriate_insertion_mode(&self) -> InsertionMode {
        // STEP 1: "Let last be false."
        // STEP 2: "Let node be the last node in the stack of open elements."
        for (index, &entry) in self.stack_of_open_elements.iter().enumerate().rev() {
            // STEP 3: "Loop: If node is the first node in the stack of open
            // elements, then set last to true, and, if the parser was created
            // as part of the HTML fragment parsing algorithm (fragment case),
            // set node to the context element passed to that algorithm."
            let last = index == 0;
            let node = match self.context_element {
                Some(context) if last => context,
                _ => entry,
            };

            let is_html = self
                .tree
                .as_element(node)
                .is_some_and(|element| element.namespace == Namespace::Html);
            if is_html {
                match self.local_name(node) {
                    // STEP 4: "If node is a select element, run these substeps:"
                    "select" => {
                        // "If last is true, jump to the step below labeled done."
                        if !last {
                            // "Let ancestor be node. Loop: If ancestor is the first node
                            // in the stack of open elements, jump to done. Let ancestor be
                            // the node before ancestor in the stack of open elements."
                            for &ancestor in self.stack_of_open_elements[..index].iter().rev() {
                                // "If ancestor is a template node, jump to done."
                                if self.is_html_element(ancestor, "template") {
                                    break;
                                }
                                // "If ancestor is a table node, switch the insertion mode
                                // to "in select in table" and return."
                                if self.is_html_element(ancestor, "table") {
                                    return InsertionMode::InSelectInTable;
                                }
                            }
                        }
                        // "Done: Switch the insertion mode to "in select" and return."
                        return InsertionMode::InSelect;
                    }
                    // STEP 5: "If node is a td or th element and last is false, then
                    // switch the insertion mode to "in cell" and return."
                    "td" | "th" if !last => return InsertionMode::InCell,
                    // STEP 6: "If node is a tr element, then switch the insertion mode
                    // to "in row" and return."
                    "tr" => return InsertionMode::InRow,
                    // STEP 7: "If node is a tbody, thead, or tfoot element, then switch
                    // the insertion mode to "in table body" and return."
                    "tbody" | "thead" | "tfoot" => return InsertionMode::InTableBody,
                    // STEP 8: "If node is a caption element, then switch the insertion
                    // mode to "in caption" and return."
                    "caption" => return InsertionMode::InCaption,
                    // STEP 9: "If node is a colgroup element, then switch the insertion
                    // mode to "in column group" and return."
                    "colgroup" => return InsertionMode::InColumnGroup,
                    // STEP 10: "If node is a table element, then switch the insertion
                    // mode to "in table" and return."
                    "table" => return InsertionMode::InTable,
                    // STEP 11: "If node is a template element, then switch the insertion
                    // mode to the current template insertion mode and return."
                    "template" => {
                        return self
                            .template_insertion_modes
                            .last()
                            .copied()
                            .unwrap_or(InsertionMode::InTemplate);
                    }
                    // STEP 12: "If node is a head element and last is false, then switch
                    // the insertion mode to "in head" and return."
                    "head" if !last => return InsertionMode::InHead,
                    // STEP 13: "If node is a body element, then switch the insertion
                    // mode to "in body" and return."
                    "body" => return InsertionMode::InBody,
                    // STEP 14: "If node is a frameset element, then switch the insertion
                    // mode to "in frameset" and return. (fragment case)"
                    "frameset" => return InsertionMode::InFrameset,
                    // STEP 15: "If node is an html element, run these substeps: If the
                    // head element pointer is null, switch the insertion mode to
                    // "before head" and return. (fragment case) Otherwise, the head
                    // element pointer is not null, switch the insertion mode to
                    // "after head" and return."
                    "html" => {
                        return if self.head_element_pointer.is_none() {
                            InsertionMode::BeforeHead
                        } else {
                            InsertionMode::AfterHead
                        };
                    }
                    _ => {}
                }
            }

            // STEP 16: "If last is true, then switch the insertion mode to "in
            // body" and return. (fragment case)"
            if last {
                return InsertionMode::InBody;
            }
            // STEP 17: "Let node now be the node before node in the stack of open
            // elements."
        }
        InsertionMode::InBody
    }
}

/// True if the element was created for `<input type=hidden>`.
pub(super) fn is_hidden_input(tag: &Tag) -> bool {
    tag.attribute("type")
        .is_some_and(|value| value.eq_ignore_ascii_case("hidden"))
}

