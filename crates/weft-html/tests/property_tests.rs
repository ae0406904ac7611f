//! Property tests: invariants that hold for any input.

use std::cell::RefCell;
use std::rc::Rc;

use quickcheck_macros::quickcheck;
use weft_dom::NodeId;
use weft_html::{HTMLParser, HTMLTokenizer, Token};

/// Markup pieces that exercise formatting, tables and implied end tags.
const PIECES: &[&str] = &[
    "<b>", "</b>", "<i>", "</i>", "<a>", "</a>", "<p>", "</p>", "<div>", "</div>", "<ul>",
    "<li>", "</ul>", "<table>", "</table>", "<tr>", "<td>", "</td>", "x", " ",
];

fn markup_from(indices: Vec<u8>) -> String {
    indices
        .into_iter()
        .map(|i| PIECES[usize::from(i) % PIECES.len()])
        .collect()
}

#[quickcheck]
fn tokenizer_ends_with_single_eof(input: Vec<char>) -> bool {
    let source: String = input.into_iter().collect();
    let mut tokenizer = HTMLTokenizer::new(&source);
    tokenizer.run();
    let tokens = tokenizer.into_tokens();
    tokens.last() == Some(&Token::EndOfFile) && tokens.iter().filter(|t| t.is_eof()).count() == 1
}

#[quickcheck]
fn any_input_yields_html_document_element(input: Vec<char>) -> bool {
    let source: String = input.into_iter().collect();
    let tree = HTMLParser::new(&source).run();
    tree.document_element()
        .and_then(|id| tree.as_element(id))
        .is_some_and(|e| e.is_html_element("html"))
}

#[quickcheck]
fn html_element_is_popped_last(indices: Vec<u8>) -> bool {
    let popped = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&popped);
    let _ = HTMLParser::new(&markup_from(indices))
        .with_pop_observer(move |tree, id| {
            let name = tree
                .as_element(id)
                .map(|e| e.tag_name.clone())
                .unwrap_or_default();
            sink.borrow_mut().push(name);
        })
        .run();

    let popped = popped.borrow();
    popped.last().map(String::as_str) == Some("html")
        && popped.iter().filter(|name| *name == "html").count() == 1
}

#[quickcheck]
fn misnested_markup_keeps_every_character(indices: Vec<u8>) -> bool {
    let source = markup_from(indices);
    let tree = HTMLParser::new(&source).run();
    let text = tree.text_content(NodeId::ROOT);
    text.matches('x').count() == source.matches('x').count()
}
