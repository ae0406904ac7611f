//! Parse errors and API errors.
//!
//! [§ 13.2.2 Parse errors](https://html.spec.whatwg.org/multipage/parsing.html#parse-errors)
//!
//! "This specification defines the parsing rules for HTML documents, whether
//! they are syntactically correct or not. Certain points in the parsing
//! algorithm are said to be parse errors. The error handling for parse errors
//! is well-defined."
//!
//! Parse errors never stop parsing. They are logged through
//! [`weft_common::warning::warn_once`] and collected for callers.

use core::fmt;

use serde::Serialize;
use strum_macros::{AsRefStr, Display, EnumCount};
use thiserror::Error;

/// Error codes from the standard's table of parse errors, plus the codes the
/// tree builder uses for its own (unnamed) parse errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, EnumCount, Serialize)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum ParseErrorCode {
    // ===== Tokenizer =====
    /// `<!-->` or `<!--->`
    AbruptClosingOfEmptyComment,
    /// `>` inside a DOCTYPE public identifier
    AbruptDoctypePublicIdentifier,
    /// `>` inside a DOCTYPE system identifier
    AbruptDoctypeSystemIdentifier,
    /// `&#;` or `&#x;`
    AbsenceOfDigitsInNumericCharacterReference,
    /// `<![CDATA[` outside foreign content
    CdataInHtmlContent,
    /// Numeric reference above U+10FFFF
    CharacterReferenceOutsideUnicodeRange,
    /// Numeric reference to a control character
    ControlCharacterReference,
    /// Same attribute name twice on one tag
    DuplicateAttribute,
    /// End tag carrying attributes
    EndTagWithAttributes,
    /// `</br/>`
    EndTagWithTrailingSolidus,
    /// EOF right after `<` or `</`
    EofBeforeTagName,
    /// EOF inside a CDATA section
    EofInCdata,
    /// EOF inside a comment
    EofInComment,
    /// EOF inside a DOCTYPE
    EofInDoctype,
    /// EOF inside `<!--` in script data
    EofInScriptHtmlCommentLikeText,
    /// EOF inside a tag
    EofInTag,
    /// `--!>`
    IncorrectlyClosedComment,
    /// `<!` not followed by `--`, `DOCTYPE` or `[CDATA[`
    IncorrectlyOpenedComment,
    /// Garbage after the DOCTYPE name
    InvalidCharacterSequenceAfterDoctypeName,
    /// `<` followed by a character that cannot start a tag name
    InvalidFirstCharacterOfTagName,
    /// `<div id=>`
    MissingAttributeValue,
    /// `<!DOCTYPE>`
    MissingDoctypeName,
    /// `PUBLIC` with no identifier
    MissingDoctypePublicIdentifier,
    /// `SYSTEM` with no identifier
    MissingDoctypeSystemIdentifier,
    /// `</>`
    MissingEndTagName,
    /// Public identifier not quoted
    MissingQuoteBeforeDoctypePublicIdentifier,
    /// System identifier not quoted
    MissingQuoteBeforeDoctypeSystemIdentifier,
    /// `&amp` without `;`
    MissingSemicolonAfterCharacterReference,
    /// `PUBLIC"..."`
    MissingWhitespaceAfterDoctypePublicKeyword,
    /// `SYSTEM"..."`
    MissingWhitespaceAfterDoctypeSystemKeyword,
    /// `<!DOCTYPEhtml>`
    MissingWhitespaceBeforeDoctypeName,
    /// `<div a="1"b="2">`
    MissingWhitespaceBetweenAttributes,
    /// `"public""system"`
    MissingWhitespaceBetweenDoctypePublicAndSystemIdentifiers,
    /// `<!--` inside a comment
    NestedComment,
    /// Numeric reference to a noncharacter
    NoncharacterCharacterReference,
    /// `&#0;`
    NullCharacterReference,
    /// Numeric reference to a surrogate
    SurrogateCharacterReference,
    /// Garbage after the DOCTYPE system identifier
    UnexpectedCharacterAfterDoctypeSystemIdentifier,
    /// `"`, `'` or `<` in an attribute name
    UnexpectedCharacterInAttributeName,
    /// `"`, `'`, `<`, `=` or `` ` `` in an unquoted attribute value
    UnexpectedCharacterInUnquotedAttributeValue,
    /// `<div =x>`
    UnexpectedEqualsSignBeforeAttributeName,
    /// U+0000 in the input
    UnexpectedNullCharacter,
    /// `<?`
    UnexpectedQuestionMarkInsteadOfTagName,
    /// `/` inside a tag not followed by `>`
    UnexpectedSolidusInTag,
    /// `&foo;` that names no entity
    UnknownNamedCharacterReference,

    // ===== Tree construction =====
    /// First token of the document is not a DOCTYPE
    MissingDoctype,
    /// DOCTYPE that is not `<!DOCTYPE html>` or an allowed legacy form
    UnknownDoctype,
    /// DOCTYPE after the initial insertion mode
    UnexpectedDoctype,
    /// Start tag not allowed in the current insertion mode
    UnexpectedStartTag,
    /// End tag with no matching open element or not allowed here
    UnexpectedEndTag,
    /// Non-whitespace text where only whitespace is allowed
    UnexpectedCharacter,
    /// End tag that closes elements it did not open
    MisnestedTag,
    /// EOF while elements other than the expected ones are still open
    EofInElement,
    /// `<div/>`
    NonVoidHtmlElementStartTagWithTrailingSolidus,
}

/// A tokenizer parse error: a code and the byte offset in the (normalized)
/// input where it was detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ParseError {
    /// Which parse error.
    pub code: ParseErrorCode,
    /// Byte offset into the input.
    pub position: usize,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at byte {}", self.code, self.position)
    }
}

/// A parse error as seen by the tree builder.
///
/// Collected in token order; tokenizer errors are folded in with the index of
/// the token that was being produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseIssue {
    /// Which parse error.
    pub code: ParseErrorCode,
    /// Human-readable context, e.g. the offending tag.
    pub detail: String,
    /// Index of the token being processed when the error occurred.
    pub token_index: usize,
}

impl fmt::Display for ParseIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[token {}] {}", self.token_index, self.code)?;
        if !self.detail.is_empty() {
            write!(f, ": {}", self.detail)?;
        }
        Ok(())
    }
}

/// Misuse of the parser API. Malformed HTML never produces one of these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParserError {
    /// The fragment context must be set before the first token is processed.
    #[error("fragment context must be set before parsing starts")]
    FragmentContextAfterStart,
    /// The fragment context element needs a local name.
    #[error("fragment context element name is empty")]
    EmptyFragmentContext,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_render_as_standard_names() {
        assert_eq!(
            ParseErrorCode::UnexpectedNullCharacter.to_string(),
            "unexpected-null-character"
        );
        assert_eq!(ParseErrorCode::EofInCdata.as_ref(), "eof-in-cdata");
        assert_eq!(
            ParseErrorCode::NonVoidHtmlElementStartTagWithTrailingSolidus.to_string(),
            "non-void-html-element-start-tag-with-trailing-solidus"
        );
    }

    #[test]
    fn test_issue_display_includes_detail() {
        let issue = ParseIssue {
            code: ParseErrorCode::UnexpectedEndTag,
            detail: "</p>".to_string(),
            token_index: 3,
        };
        assert_eq!(issue.to_string(), "[token 3] unexpected-end-tag: </p>");
    }
}
