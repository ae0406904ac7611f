//! Integration tests for the HTML tokenizer.

use weft_html::error::ParseErrorCode;
use weft_html::tokenizer::{Doctype, TokenizerState};
use weft_html::{HTMLTokenizer, Tag, TagKind, Token};

/// Helper to tokenize a string and return the tokens
fn tokenize(input: &str) -> Vec<Token> {
    let mut tokenizer = HTMLTokenizer::new(input);
    tokenizer.run();
    tokenizer.into_tokens()
}

/// Helper to tokenize a string and return only the error codes
fn error_codes(input: &str) -> Vec<ParseErrorCode> {
    let mut tokenizer = HTMLTokenizer::new(input);
    tokenizer.run();
    tokenizer.errors().iter().map(|error| error.code).collect()
}

/// Concatenate the character tokens
fn text_of(tokens: &[Token]) -> String {
    tokens
        .iter()
        .filter_map(|token| match token {
            Token::Character(c) => Some(*c),
            _ => None,
        })
        .collect()
}

fn tag(token: &Token) -> &Tag {
    match token {
        Token::Tag(tag) => tag,
        other => panic!("Expected tag token, got {other}"),
    }
}

fn doctype(token: &Token) -> &Doctype {
    match token {
        Token::Doctype(doctype) => doctype,
        other => panic!("Expected DOCTYPE token, got {other}"),
    }
}

/// Tokenize `rest` as the contents of `<name>` with the tokenizer switched to
/// `state`, the way the tree builder does.
fn tokenize_text_element(name: &str, state: TokenizerState, rest: &str) -> Vec<Token> {
    let mut tokenizer = HTMLTokenizer::new(&format!("<{name}>{rest}"));
    let start = tokenizer.next_token();
    assert_eq!(tag(&start).name, name);
    tokenizer.set_state(state);
    let mut tokens = Vec::new();
    loop {
        let token = tokenizer.next_token();
        let done = token.is_eof();
        tokens.push(token);
        if done {
            return tokens;
        }
    }
}

#[test]
fn test_plain_text() {
    let tokens = tokenize("Hello");
    assert_eq!(tokens.len(), 6); // 5 chars + EOF
    assert_eq!(tokens[0], Token::Character('H'));
    assert_eq!(tokens[4], Token::Character('o'));
    assert_eq!(tokens[5], Token::EndOfFile);
}

#[test]
fn test_paragraph_with_entity() {
    let tokens = tokenize("<p>A &amp; B</p>");
    assert_eq!(
        tokens,
        vec![
            Token::Tag(Tag::start("p")),
            Token::Character('A'),
            Token::Character(' '),
            Token::Character('&'),
            Token::Character(' '),
            Token::Character('B'),
            Token::Tag(Tag::end("p")),
            Token::EndOfFile,
        ]
    );
}

#[test]
fn test_doctype() {
    let tokens = tokenize("<!DOCTYPE html>");
    assert_eq!(tokens.len(), 2); // DOCTYPE + EOF
    let doctype = doctype(&tokens[0]);
    assert_eq!(doctype.name.as_deref(), Some("html"));
    assert_eq!(doctype.public_identifier, None);
    assert_eq!(doctype.system_identifier, None);
    assert!(!doctype.force_quirks);
}

#[test]
fn test_doctype_identifiers() {
    let tokens = tokenize(
        r#"<!DOCTYPE HTML PUBLIC "-//W3C//DTD HTML 4.01//EN" "http://www.w3.org/TR/html4/strict.dtd">"#,
    );
    let doctype = doctype(&tokens[0]);
    assert_eq!(doctype.name.as_deref(), Some("html"));
    assert_eq!(
        doctype.public_identifier.as_deref(),
        Some("-//W3C//DTD HTML 4.01//EN")
    );
    assert_eq!(
        doctype.system_identifier.as_deref(),
        Some("http://www.w3.org/TR/html4/strict.dtd")
    );
    assert!(!doctype.force_quirks);
}

#[test]
fn test_doctype_without_name_forces_quirks() {
    let tokens = tokenize("<!DOCTYPE>");
    let doctype = doctype(&tokens[0]);
    assert_eq!(doctype.name, None);
    assert!(doctype.force_quirks);
    assert_eq!(error_codes("<!DOCTYPE>"), vec![ParseErrorCode::MissingDoctypeName]);
}

#[test]
fn test_start_tag() {
    let tokens = tokenize("<div>");
    assert_eq!(tokens.len(), 2);
    let tag = tag(&tokens[0]);
    assert_eq!(tag.kind, TagKind::Start);
    assert_eq!(tag.name, "div");
    assert!(!tag.self_closing);
    assert!(tag.attributes.is_empty());
}

#[test]
fn test_tag_names_are_lowercased() {
    let tokens = tokenize("<DiV></DIV>");
    assert_eq!(tag(&tokens[0]).name, "div");
    assert_eq!(tag(&tokens[1]).name, "div");
    assert_eq!(tag(&tokens[1]).kind, TagKind::End);
}

#[test]
fn test_self_closing_tag() {
    let tokens = tokenize("<br/>");
    assert_eq!(tokens.len(), 2);
    let tag = tag(&tokens[0]);
    assert_eq!(tag.name, "br");
    assert!(tag.self_closing);
}

#[test]
fn test_attributes() {
    let tokens = tokenize(r#"<a href="x" title='y' data-z=w checked>"#);
    let tag = tag(&tokens[0]);
    assert_eq!(tag.attribute("href"), Some("x"));
    assert_eq!(tag.attribute("title"), Some("y"));
    assert_eq!(tag.attribute("data-z"), Some("w"));
    assert_eq!(tag.attribute("checked"), Some(""));
    assert_eq!(tag.attributes.len(), 4);
}

#[test]
fn test_duplicate_attribute_keeps_first() {
    let input = r#"<a href="first" href="second">"#;
    let tokens = tokenize(input);
    let tag = tag(&tokens[0]);
    assert_eq!(tag.attributes.len(), 1);
    assert_eq!(tag.attribute("href"), Some("first"));
    assert_eq!(error_codes(input), vec![ParseErrorCode::DuplicateAttribute]);
}

#[test]
fn test_end_tag_with_attributes_is_an_error() {
    assert_eq!(
        error_codes(r#"</p class="x">"#),
        vec![ParseErrorCode::EndTagWithAttributes]
    );
}

#[test]
fn test_comment() {
    let tokens = tokenize("<!-- hello -->");
    assert_eq!(tokens[0], Token::Comment(" hello ".to_string()));
    assert!(error_codes("<!-- hello -->").is_empty());
}

#[test]
fn test_abrupt_empty_comment() {
    let tokens = tokenize("<!-->");
    assert_eq!(tokens[0], Token::Comment(String::new()));
    assert_eq!(
        error_codes("<!-->"),
        vec![ParseErrorCode::AbruptClosingOfEmptyComment]
    );
}

#[test]
fn test_bogus_comment_from_question_mark() {
    let tokens = tokenize("<?xml version?>");
    assert_eq!(tokens[0], Token::Comment("?xml version?".to_string()));
    assert_eq!(
        error_codes("<?xml version?>"),
        vec![ParseErrorCode::UnexpectedQuestionMarkInsteadOfTagName]
    );
}

#[test]
fn test_cdata_in_html_content_is_a_bogus_comment() {
    let tokens = tokenize("<![CDATA[x]]>");
    assert_eq!(tokens[0], Token::Comment("[CDATA[x]]".to_string()));
    assert_eq!(
        error_codes("<![CDATA[x]]>"),
        vec![ParseErrorCode::CdataInHtmlContent]
    );
}

#[test]
fn test_cdata_section_when_allowed() {
    let mut tokenizer = HTMLTokenizer::new("<![CDATA[a<b]]>");
    tokenizer.set_cdata_allowed(true);
    tokenizer.run();
    let tokens = tokenizer.into_tokens();
    assert_eq!(text_of(&tokens), "a<b");
    assert_eq!(tokens.last(), Some(&Token::EndOfFile));
}

#[test]
fn test_eof_in_tag_drops_the_tag() {
    let tokens = tokenize("<div class=");
    assert_eq!(tokens, vec![Token::EndOfFile]);
    assert_eq!(error_codes("<div class="), vec![ParseErrorCode::EofInTag]);
}

#[test]
fn test_eof_in_comment_emits_comment() {
    let tokens = tokenize("<!--abc");
    assert_eq!(tokens, vec![Token::Comment("abc".to_string()), Token::EndOfFile]);
    assert_eq!(error_codes("<!--abc"), vec![ParseErrorCode::EofInComment]);
}

#[test]
fn test_eof_in_doctype_forces_quirks() {
    let input = "<!doctype html public 'a'";
    let tokens = tokenize(input);
    assert_eq!(tokens.len(), 2);
    let doctype = doctype(&tokens[0]);
    assert_eq!(doctype.name.as_deref(), Some("html"));
    assert_eq!(doctype.public_identifier.as_deref(), Some("a"));
    assert_eq!(doctype.system_identifier, None);
    assert!(doctype.force_quirks);
    assert_eq!(tokens[1], Token::EndOfFile);
    assert_eq!(error_codes(input), vec![ParseErrorCode::EofInDoctype]);
}

#[test]
fn test_lone_less_than_is_text() {
    let tokens = tokenize("a < b");
    assert_eq!(text_of(&tokens), "a < b");
    assert_eq!(
        error_codes("a < b"),
        vec![ParseErrorCode::InvalidFirstCharacterOfTagName]
    );
}

#[test]
fn test_null_in_data_is_emitted_with_error() {
    let tokens = tokenize("a\0b");
    assert_eq!(tokens[1], Token::Character('\0'));
    assert_eq!(error_codes("a\0b"), vec![ParseErrorCode::UnexpectedNullCharacter]);
}

#[test]
fn test_newlines_are_normalized() {
    let tokens = tokenize("a\r\nb\rc");
    assert_eq!(text_of(&tokens), "a\nb\nc");
}

// =============================================================================
// Character references
// =============================================================================

#[test]
fn test_numeric_references() {
    assert_eq!(text_of(&tokenize("&#65;&#x42;&#X43;")), "ABC");
}

#[test]
fn test_windows_1252_remapping() {
    assert_eq!(text_of(&tokenize("&#128;")), "\u{20AC}");
    assert_eq!(text_of(&tokenize("&#x99;")), "\u{2122}");
    assert_eq!(
        error_codes("&#128;"),
        vec![ParseErrorCode::ControlCharacterReference]
    );
}

#[test]
fn test_invalid_numeric_references() {
    assert_eq!(text_of(&tokenize("&#0;")), "\u{FFFD}");
    assert_eq!(error_codes("&#0;"), vec![ParseErrorCode::NullCharacterReference]);

    assert_eq!(text_of(&tokenize("&#xD800;")), "\u{FFFD}");
    assert_eq!(
        error_codes("&#xD800;"),
        vec![ParseErrorCode::SurrogateCharacterReference]
    );

    assert_eq!(text_of(&tokenize("&#x110000;")), "\u{FFFD}");
    assert_eq!(
        error_codes("&#x110000;"),
        vec![ParseErrorCode::CharacterReferenceOutsideUnicodeRange]
    );
}

#[test]
fn test_numeric_reference_without_digits() {
    assert_eq!(text_of(&tokenize("&#;")), "&#;");
    assert_eq!(
        error_codes("&#;"),
        vec![ParseErrorCode::AbsenceOfDigitsInNumericCharacterReference]
    );
}

#[test]
fn test_numeric_reference_without_semicolon() {
    assert_eq!(text_of(&tokenize("&#65x")), "Ax");
    assert_eq!(
        error_codes("&#65x"),
        vec![ParseErrorCode::MissingSemicolonAfterCharacterReference]
    );
}

#[test]
fn test_named_reference_longest_legacy_match() {
    assert_eq!(text_of(&tokenize("&notit;")), "\u{00AC}it;");
    assert_eq!(
        error_codes("&notit;"),
        vec![ParseErrorCode::MissingSemicolonAfterCharacterReference]
    );
    assert_eq!(text_of(&tokenize("&notin;")), "\u{2209}");
}

#[test]
fn test_html5_only_named_references() {
    assert_eq!(text_of(&tokenize("a&ThinSpace;b")), "a\u{2009}b");
    assert_eq!(text_of(&tokenize("&NotEqualTilde;")), "\u{2242}\u{0338}");
    assert!(error_codes("&ThinSpace;&NotEqualTilde;").is_empty());
}

#[test]
fn test_unknown_named_reference() {
    assert_eq!(text_of(&tokenize("&bogus;")), "&bogus;");
    assert_eq!(
        error_codes("&bogus;"),
        vec![ParseErrorCode::UnknownNamedCharacterReference]
    );
    assert_eq!(text_of(&tokenize("& x")), "& x");
    assert!(error_codes("& x").is_empty());
}

#[test]
fn test_attribute_historical_rule() {
    // A legacy reference followed by an alphanumeric or "=" stays literal in
    // attribute values.
    let tokens = tokenize(r#"<a href="?x=1&amp2=3&copy=4">"#);
    assert_eq!(tag(&tokens[0]).attribute("href"), Some("?x=1&amp2=3&copy=4"));
    assert!(error_codes(r#"<a href="?x=1&amp2=3&copy=4">"#).is_empty());

    // The same text in content is decoded.
    assert_eq!(text_of(&tokenize("&amp2")), "&2");
}

#[test]
fn test_reference_in_attribute_value() {
    let tokens = tokenize(r#"<a title="&lt;tag&gt;">"#);
    assert_eq!(tag(&tokens[0]).attribute("title"), Some("<tag>"));
}

// =============================================================================
// Text content states
// =============================================================================

#[test]
fn test_rcdata_decodes_references_but_not_tags() {
    let tokens = tokenize_text_element("title", TokenizerState::RCDATA, "a<b>&amp;</title>");
    assert_eq!(text_of(&tokens), "a<b>&");
    assert_eq!(tokens[tokens.len() - 2], Token::Tag(Tag::end("title")));
}

#[test]
fn test_rawtext_ignores_references_and_wrong_end_tags() {
    let tokens = tokenize_text_element("style", TokenizerState::RAWTEXT, "&amp;</p></style>");
    assert_eq!(text_of(&tokens), "&amp;</p>");
    assert_eq!(tokens[tokens.len() - 2], Token::Tag(Tag::end("style")));
}

#[test]
fn test_script_data_double_escape() {
    let tokens = tokenize_text_element(
        "script",
        TokenizerState::ScriptData,
        "<!--<script>x</script>-->y</script>",
    );
    assert_eq!(text_of(&tokens), "<!--<script>x</script>-->y");
    assert_eq!(tokens[tokens.len() - 2], Token::Tag(Tag::end("script")));
}

#[test]
fn test_plaintext_never_ends() {
    let tokens = tokenize_text_element("plaintext", TokenizerState::PLAINTEXT, "</plaintext>x");
    assert_eq!(text_of(&tokens), "</plaintext>x");
}

#[test]
fn test_next_token_after_eof_stays_at_eof() {
    let mut tokenizer = HTMLTokenizer::new("a");
    assert_eq!(tokenizer.next_token(), Token::Character('a'));
    assert_eq!(tokenizer.next_token(), Token::EndOfFile);
    assert_eq!(tokenizer.next_token(), Token::EndOfFile);
}

#[test]
fn test_error_positions_are_byte_offsets() {
    let mut tokenizer = HTMLTokenizer::new("ab\0");
    tokenizer.run();
    let errors = tokenizer.errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].code, ParseErrorCode::UnexpectedNullCharacter);
    assert!(errors[0].position >= 2);
}
