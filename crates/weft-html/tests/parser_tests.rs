//! Integration tests for the HTML parser.

use std::cell::RefCell;
use std::rc::Rc;

use weft_dom::{DomTree, Namespace, NodeId, NodeType, QuirksMode};
use weft_html::error::{ParseErrorCode, ParserError};
use weft_html::{HTMLParser, dump_tree};

/// Helper to parse HTML and return the DOM tree
fn parse(html: &str) -> DomTree {
    HTMLParser::new(html).run()
}

/// Helper to parse HTML and return the html5lib-style dump
fn dump(html: &str) -> String {
    dump_tree(&parse(html))
}

/// Helper to parse HTML and return only the error codes
fn issue_codes(html: &str) -> Vec<ParseErrorCode> {
    let (_, issues) = HTMLParser::new(html).run_with_issues();
    issues.into_iter().map(|issue| issue.code).collect()
}

/// Join expected dump lines
fn lines(expected: &[&str]) -> String {
    let mut out = expected.join("\n");
    out.push('\n');
    out
}

/// Expected dump of a document without DOCTYPE whose body holds `body`
/// (lines already indented for the body's children).
fn body_doc(body: &[&str]) -> String {
    let mut expected = vec!["| <html>", "|   <head>", "|   <body>"];
    expected.extend_from_slice(body);
    lines(&expected)
}

/// Helper to get element by tag name (first match, depth-first)
fn find_element(tree: &DomTree, from: NodeId, tag: &str) -> Option<NodeId> {
    if let Some(data) = tree.as_element(from)
        && data.tag_name == tag
    {
        return Some(from);
    }
    for &child_id in tree.children(from) {
        if let Some(found) = find_element(tree, child_id, tag) {
            return Some(found);
        }
    }
    None
}

// =============================================================================
// Document structure
// =============================================================================

#[test]
fn test_empty_input_is_quirks_with_implied_elements() {
    let tree = parse("");
    assert_eq!(tree.mode(), QuirksMode::Quirks);
    assert_eq!(dump_tree(&tree), body_doc(&[]));
    assert_eq!(issue_codes(""), vec![ParseErrorCode::MissingDoctype]);
}

#[test]
fn test_html5_doctype_is_no_quirks() {
    let tree = parse("<!doctype html>");
    assert_eq!(tree.mode(), QuirksMode::NoQuirks);
    assert_eq!(
        dump_tree(&tree),
        lines(&["| <!DOCTYPE html>", "| <html>", "|   <head>", "|   <body>"])
    );
    assert!(issue_codes("<!doctype html>").is_empty());
}

#[test]
fn test_legacy_doctypes_select_quirks_modes() {
    let transitional = r#"<!DOCTYPE html PUBLIC "-//W3C//DTD HTML 4.01 Transitional//EN">"#;
    assert_eq!(parse(transitional).mode(), QuirksMode::Quirks);

    let with_system = r#"<!DOCTYPE html PUBLIC "-//W3C//DTD HTML 4.01 Transitional//EN" "http://www.w3.org/TR/html4/loose.dtd">"#;
    assert_eq!(parse(with_system).mode(), QuirksMode::LimitedQuirks);

    let xhtml = r#"<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.0 Strict//EN" "http://www.w3.org/TR/xhtml1/DTD/xhtml1-strict.dtd">"#;
    assert_eq!(parse(xhtml).mode(), QuirksMode::NoQuirks);
}

#[test]
fn test_doctype_identifiers_are_kept() {
    let tree = parse(r#"<!DOCTYPE html PUBLIC "-//W3C//DTD HTML 4.01//EN" "http://www.w3.org/TR/html4/strict.dtd">"#);
    let doctype = tree.children(NodeId::ROOT)[0];
    let node = tree.get(doctype).expect("doctype node");
    match &node.node_type {
        NodeType::DocumentType {
            name,
            public_id,
            system_id,
        } => {
            assert_eq!(name, "html");
            assert_eq!(public_id, "-//W3C//DTD HTML 4.01//EN");
            assert_eq!(system_id, "http://www.w3.org/TR/html4/strict.dtd");
        }
        other => panic!("Expected DocumentType, got {other:?}"),
    }
}

#[test]
fn test_paragraph_text() {
    assert_eq!(
        dump("<!doctype html><p>Hello"),
        lines(&[
            "| <!DOCTYPE html>",
            "| <html>",
            "|   <head>",
            "|   <body>",
            "|     <p>",
            "|       \"Hello\"",
        ])
    );
}

#[test]
fn test_adjacent_characters_share_one_text_node() {
    let tree = parse("<p>abc</p>");
    let p = find_element(&tree, NodeId::ROOT, "p").expect("p element");
    assert_eq!(tree.children(p).len(), 1);
    assert_eq!(tree.text_content(p), "abc");
}

#[test]
fn test_head_element_after_head_goes_into_head() {
    assert_eq!(
        dump("<head></head><title>t</title>"),
        lines(&[
            "| <html>",
            "|   <head>",
            "|     <title>",
            "|       \"t\"",
            "|   <body>",
        ])
    );
}

#[test]
fn test_comments_after_body_and_html() {
    assert_eq!(
        dump("<p>x</p></body><!--a--></html><!--b-->"),
        lines(&[
            "| <html>",
            "|   <head>",
            "|   <body>",
            "|     <p>",
            "|       \"x\"",
            "|   <!-- a -->",
            "| <!-- b -->",
        ])
    );
}

#[test]
fn test_second_html_tag_merges_attributes() {
    let tree = parse(r#"<html lang="en"><body><html class="x" lang="fr">"#);
    let html = tree.document_element().expect("html element");
    let data = tree.as_element(html).expect("element data");
    assert_eq!(data.attrs.get("lang").map(String::as_str), Some("en"));
    assert_eq!(data.attrs.get("class").map(String::as_str), Some("x"));
}

// =============================================================================
// In body
// =============================================================================

#[test]
fn test_headings_do_not_nest() {
    assert_eq!(
        dump("<h1><h2>x"),
        body_doc(&["|     <h1>", "|     <h2>", "|       \"x\""])
    );
}

#[test]
fn test_list_items_close_each_other() {
    assert_eq!(
        dump("<ul><li>a<li>b</ul>"),
        body_doc(&[
            "|     <ul>",
            "|       <li>",
            "|         \"a\"",
            "|       <li>",
            "|         \"b\"",
        ])
    );
}

#[test]
fn test_stray_end_p_creates_empty_paragraph() {
    assert_eq!(dump("<body></p>"), body_doc(&["|     <p>"]));
}

#[test]
fn test_pre_skips_leading_newline() {
    assert_eq!(
        dump("<pre>\nx</pre>"),
        body_doc(&["|     <pre>", "|       \"x\""])
    );
}

#[test]
fn test_textarea_is_rcdata() {
    assert_eq!(
        dump("<textarea>\n<b>&amp;</textarea>"),
        body_doc(&["|     <textarea>", "|       \"<b>&\""])
    );
}

#[test]
fn test_nested_form_is_ignored() {
    let tree = parse("<form><form>x");
    let body = tree.body().expect("body");
    let form = find_element(&tree, body, "form").expect("form");
    assert_eq!(tree.children(form).len(), 1);
    assert_eq!(tree.text_content(form), "x");
}

#[test]
fn test_formatting_survives_paragraph() {
    let tree = parse("<b>bold<p>still bold</p></b>");
    let p = find_element(&tree, NodeId::ROOT, "p").expect("p element");
    let inside_b = tree
        .ancestors(p)
        .any(|id| tree.as_element(id).is_some_and(|data| data.tag_name == "b"));
    assert!(inside_b);
    assert_eq!(tree.text_content(p), "still bold");
}

#[test]
fn test_formatting_reconstructed_in_next_block() {
    assert_eq!(
        dump("<p><b>bold<p>still bold"),
        body_doc(&[
            "|     <p>",
            "|       <b>",
            "|         \"bold\"",
            "|     <p>",
            "|       <b>",
            "|         \"still bold\"",
        ])
    );
}

#[test]
fn test_noahs_ark_limits_identical_formatting_elements() {
    let tree = parse("<p><b><b><b><b>x</p><p>y");
    let body = tree.body().expect("body");
    let second_p = tree.children(body)[1];
    // Only three identical <b> elements are reconstructed.
    let mut depth = 0;
    let mut node = second_p;
    while let Some(&child) = tree.children(node).first()
        && tree.as_element(child).is_some_and(|data| data.tag_name == "b")
    {
        depth += 1;
        node = child;
    }
    assert_eq!(depth, 3);
}

// =============================================================================
// Adoption agency
// =============================================================================

#[test]
fn test_adoption_agency_moves_block_out_of_anchor() {
    assert_eq!(
        dump("<a><p></a>"),
        body_doc(&["|     <a>", "|     <p>", "|       <a>"])
    );
}

#[test]
fn test_adoption_agency_misnested_bold_paragraph() {
    assert_eq!(
        dump("<b>1<p>2</b>3</p>"),
        body_doc(&[
            "|     <b>",
            "|       \"1\"",
            "|     <p>",
            "|       <b>",
            "|         \"2\"",
            "|       \"3\"",
        ])
    );
}

#[test]
fn test_misnested_inline_formatting_is_reconstructed() {
    assert_eq!(
        dump("<b><i></b>x"),
        body_doc(&[
            "|     <b>",
            "|       <i>",
            "|     <i>",
            "|       \"x\"",
        ])
    );
}

// =============================================================================
// Tables
// =============================================================================

#[test]
fn test_table_implies_tbody_and_tr() {
    assert_eq!(
        dump("<table><td>x"),
        body_doc(&[
            "|     <table>",
            "|       <tbody>",
            "|         <tr>",
            "|           <td>",
            "|             \"x\"",
        ])
    );
}

#[test]
fn test_text_in_table_is_foster_parented() {
    assert_eq!(
        dump("<table>x<tr><td>y</td></tr></table>"),
        body_doc(&[
            "|     \"x\"",
            "|     <table>",
            "|       <tbody>",
            "|         <tr>",
            "|           <td>",
            "|             \"y\"",
        ])
    );
}

#[test]
fn test_whitespace_in_table_stays_in_table() {
    assert_eq!(
        dump("<table> <tr>"),
        body_doc(&[
            "|     <table>",
            "|       \" \"",
            "|       <tbody>",
            "|         <tr>",
        ])
    );
}

#[test]
fn test_element_in_table_is_foster_parented() {
    assert_eq!(
        dump("<table><div>x</div></table>"),
        body_doc(&["|     <div>", "|       \"x\"", "|     <table>"])
    );
}

// =============================================================================
// Select
// =============================================================================

#[test]
fn test_select_options() {
    assert_eq!(
        dump("<select><option>a<option>b</select>x"),
        body_doc(&[
            "|     <select>",
            "|       <option>",
            "|         \"a\"",
            "|       <option>",
            "|         \"b\"",
            "|     \"x\"",
        ])
    );
}

#[test]
fn test_table_cell_closes_select_in_table() {
    assert_eq!(
        dump("<table><tr><td><select><option>a<td>b"),
        body_doc(&[
            "|     <table>",
            "|       <tbody>",
            "|         <tr>",
            "|           <td>",
            "|             <select>",
            "|               <option>",
            "|                 \"a\"",
            "|           <td>",
            "|             \"b\"",
        ])
    );
}

// =============================================================================
// Templates and framesets
// =============================================================================

#[test]
fn test_template_holds_table_rows() {
    assert_eq!(
        dump("<template><tr><td>x</td></tr></template>"),
        lines(&[
            "| <html>",
            "|   <head>",
            "|     <template>",
            "|       <tr>",
            "|         <td>",
            "|           \"x\"",
            "|   <body>",
        ])
    );
}

#[test]
fn test_unclosed_template_reports_error() {
    let codes = issue_codes("<!doctype html><template><p>x");
    assert!(codes.contains(&ParseErrorCode::EofInElement));
}

#[test]
fn test_frameset_document() {
    assert_eq!(
        dump("<frameset><frame></frameset>"),
        lines(&[
            "| <html>",
            "|   <head>",
            "|   <frameset>",
            "|     <frame>",
        ])
    );
}

#[test]
fn test_frameset_after_text_is_ignored() {
    let tree = parse("<p>x<frameset>");
    assert!(find_element(&tree, NodeId::ROOT, "frameset").is_none());
}

// =============================================================================
// Foreign content
// =============================================================================

#[test]
fn test_svg_names_and_integration_point() {
    assert_eq!(
        dump(r#"<svg viewbox="0 0 1 1"><foreignobject><p>hi</p></foreignobject></svg>"#),
        body_doc(&[
            "|     <svg svg>",
            "|       viewBox=\"0 0 1 1\"",
            "|       <svg foreignObject>",
            "|         <p>",
            "|           \"hi\"",
        ])
    );
}

#[test]
fn test_xlink_attribute_is_namespaced() {
    assert_eq!(
        dump(r##"<svg><use xlink:href="#a"/></svg>"##),
        body_doc(&[
            "|     <svg svg>",
            "|       <svg use>",
            "|         xlink href=\"#a\"",
        ])
    );
}

#[test]
fn test_mathml_text_integration_point() {
    let tree = parse("<math><mi>x</mi></math>");
    let mi = find_element(&tree, NodeId::ROOT, "mi").expect("mi element");
    let data = tree.as_element(mi).expect("element data");
    assert_eq!(data.namespace, Namespace::MathMl);
    assert_eq!(tree.text_content(mi), "x");
}

#[test]
fn test_html_start_tag_breaks_out_of_svg() {
    assert_eq!(
        dump("<svg><p>x"),
        body_doc(&["|     <svg svg>", "|     <p>", "|       \"x\""])
    );
}

#[test]
fn test_cdata_in_svg_is_text() {
    assert_eq!(
        dump("<svg><![CDATA[a<b]]></svg>"),
        body_doc(&["|     <svg svg>", "|       \"a<b\""])
    );
}

#[test]
fn test_self_closing_foreign_element_is_acknowledged() {
    let codes = issue_codes("<!doctype html><svg><circle/></svg>");
    assert!(codes.is_empty(), "unexpected issues: {codes:?}");
}

// =============================================================================
// Fragments
// =============================================================================

#[test]
fn test_fragment_in_body_context() {
    let mut parser = HTMLParser::new("<b>x</b>y");
    parser
        .set_fragment_context("td", Namespace::Html)
        .expect("fresh parser accepts a context");
    assert_eq!(
        dump_tree(&parser.run()),
        lines(&["| <html>", "|   <b>", "|     \"x\"", "|   \"y\""])
    );
}

#[test]
fn test_fragment_in_rcdata_context() {
    let mut parser = HTMLParser::new("<b>&amp;");
    parser
        .set_fragment_context("title", Namespace::Html)
        .expect("fresh parser accepts a context");
    assert_eq!(
        dump_tree(&parser.run()),
        lines(&["| <html>", "|   \"<b>&\""])
    );
}

#[test]
fn test_fragment_context_errors() {
    let mut parser = HTMLParser::new("x");
    assert_eq!(
        parser.set_fragment_context("", Namespace::Html),
        Err(ParserError::EmptyFragmentContext)
    );
    assert_eq!(parser.set_fragment_context("div", Namespace::Html), Ok(()));
    assert_eq!(
        parser.set_fragment_context("div", Namespace::Html),
        Err(ParserError::FragmentContextAfterStart)
    );
}

// =============================================================================
// Parser options and errors
// =============================================================================

#[test]
fn test_scripting_flag_changes_noscript() {
    let input = "<body><noscript><p>x</p></noscript>";
    assert_eq!(
        dump(input),
        body_doc(&["|     <noscript>", "|       <p>", "|         \"x\""])
    );

    let tree = HTMLParser::new(input).with_scripting(true).run();
    assert_eq!(
        dump_tree(&tree),
        body_doc(&["|     <noscript>", "|       \"<p>x</p>\""])
    );
}

#[test]
fn test_pop_observer_sees_elements_in_pop_order() {
    let popped = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&popped);
    let _ = HTMLParser::new("<p><b>x</b></p>")
        .with_pop_observer(move |tree, id| {
            if let Some(data) = tree.as_element(id) {
                sink.borrow_mut().push(data.tag_name.clone());
            }
        })
        .run();
    assert_eq!(*popped.borrow(), vec!["head", "b", "p", "body", "html"]);
}

#[test]
fn test_stray_end_tag_is_reported() {
    let codes = issue_codes("<!doctype html><p></div>");
    assert_eq!(codes, vec![ParseErrorCode::UnexpectedEndTag]);
}

#[test]
fn test_self_closing_non_void_element_is_reported() {
    assert_eq!(
        issue_codes("<!doctype html><p/>"),
        vec![ParseErrorCode::NonVoidHtmlElementStartTagWithTrailingSolidus]
    );
    assert!(issue_codes("<!doctype html><br/>").is_empty());
}

#[test]
fn test_tokenizer_errors_are_included() {
    let (_, issues) = HTMLParser::new("<!doctype html>\0").run_with_issues();
    assert!(
        issues
            .iter()
            .any(|issue| issue.code == ParseErrorCode::UnexpectedNullCharacter)
    );
}

#[test]
fn test_malformed_input_never_panics() {
    for input in [
        "</",
        "<",
        "<a<b>",
        "</html></html><html>",
        "<table><table><tr><caption></td>",
        "<select><select><table>",
        "<svg><math><desc></svg><p>",
        "<template></template></template><col>",
        "<frameset></frameset></frameset><frame>",
        "&#xFFFFFFFF;&#99999999999;",
    ] {
        let (tree, _) = HTMLParser::new(input).run_with_issues();
        assert!(tree.document_element().is_some(), "no html element for {input:?}");
    }
}

#[test]
fn test_deeply_nested_document_dumps_on_a_small_stack() {
    let depth = 4_000;
    let tree = parse(&"<div>".repeat(depth));
    let dump = std::thread::Builder::new()
        .stack_size(128 * 1024)
        .spawn(move || dump_tree(&tree))
        .expect("spawn dump thread")
        .join()
        .expect("dump thread");

    // html, head and body, then one line per div
    assert_eq!(dump.lines().count(), depth + 3);
    assert_eq!(
        dump.lines().last(),
        Some(format!("| {}<div>", "  ".repeat(depth + 1)).as_str())
    );
}

#[test]
fn test_warnings_are_keyed_by_error_code() {
    use strum::EnumCount;
    use weft_common::warning::warning_count;

    // Distinct offsets and tag names, repeated codes.
    let source: String = (0..500).map(|i| format!("&bogus{i};</x{i}>")).collect();
    let (_, issues) = HTMLParser::new(&source).run_with_issues();
    assert!(issues.len() >= 1_000);

    assert!(warning_count() <= 2 * ParseErrorCode::COUNT);
}
