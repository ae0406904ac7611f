//! Weft CLI
//!
//! Parses an HTML document or fragment and dumps the tree, the token
//! stream or the parse errors. Meant for debugging the parser.

use std::fs;

use anyhow::{Context, Result, bail};
use clap::Parser;
use owo_colors::OwoColorize;
use serde_json::{Map, Value, json};
use weft_dom::{DomTree, Namespace, NodeId, NodeType};
use weft_html::{HTMLParser, HTMLTokenizer, ParseIssue, Token, dump_tree};

#[derive(Parser, Debug)]
#[command(name = "weft")]
#[command(about = "Parse HTML and dump the resulting tree")]
#[command(after_help = r"EXAMPLES:
    # Dump the tree of a file
    weft ./index.html

    # Parse inline HTML
    weft --html '<p>One<p>Two'

    # Show the token stream and the parse errors
    weft --tokens --errors --html '<p>&notit;'

    # Parse as the contents of a <td> (use svg:NAME or math:NAME for foreign contexts)
    weft --fragment td --html '<p>cell'

    # JSON output
    weft --json ./index.html
")]
struct Cli {
    /// Path to an HTML file
    #[arg(value_name = "FILE")]
    path: Option<String>,

    /// Parse HTML string directly instead of a file
    #[arg(long, value_name = "HTML")]
    html: Option<String>,

    /// Print the token stream instead of the tree
    #[arg(short = 't', long)]
    tokens: bool,

    /// Print every parse error after the output
    #[arg(short = 'e', long)]
    errors: bool,

    /// Parse as a fragment inside this context element
    #[arg(short = 'f', long, value_name = "CONTEXT")]
    fragment: Option<String>,

    /// Parse with the scripting flag enabled
    #[arg(long)]
    scripting: bool,

    /// Emit JSON instead of the text dump
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let source = load_source(&cli)?;

    if cli.tokens {
        print_tokens(&source, cli.errors);
        return Ok(());
    }

    let mut parser = HTMLParser::new(&source).with_scripting(cli.scripting);
    if let Some(ref context) = cli.fragment {
        let (namespace, name) = parse_context(context);
        parser
            .set_fragment_context(name, namespace)
            .with_context(|| format!("invalid fragment context '{context}'"))?;
    }
    let (tree, issues) = parser.run_with_issues();

    if cli.json {
        let errors = cli.errors.then_some(issues.as_slice());
        println!("{}", document_json(&tree, errors)?);
        return Ok(());
    }

    print!("{}", dump_tree(&tree));
    if cli.errors {
        print_issues(&issues);
    }
    Ok(())
}

/// Read the document from `--html` or the path argument.
fn load_source(cli: &Cli) -> Result<String> {
    if let Some(ref html) = cli.html {
        Ok(html.clone())
    } else if let Some(ref path) = cli.path {
        fs::read_to_string(path).with_context(|| format!("failed to read '{path}'"))
    } else {
        bail!("expected a file path or --html")
    }
}

/// `svg:circle` and `math:mi` select a foreign context; anything else is HTML.
fn parse_context(context: &str) -> (Namespace, &str) {
    match context.split_once(':') {
        Some(("svg", name)) => (Namespace::Svg, name),
        Some(("math", name)) => (Namespace::MathMl, name),
        _ => (Namespace::Html, context),
    }
}

/// Print one token per line, folding runs of characters into one string.
fn print_tokens(source: &str, show_errors: bool) {
    let mut tokenizer = HTMLTokenizer::new(source);
    tokenizer.run();
    let errors = tokenizer.errors().to_vec();

    let mut text = String::new();
    for token in tokenizer.into_tokens() {
        if let Token::Character(c) = token {
            text.push(c);
            continue;
        }
        if !text.is_empty() {
            println!("{} {:?}", "Characters".green(), std::mem::take(&mut text));
        }
        match token {
            Token::Doctype(doctype) => println!("{} {doctype:?}", "Doctype".cyan()),
            Token::Tag(tag) => println!("{} {tag:?}", "Tag".blue()),
            Token::Comment(data) => println!("{} {data:?}", "Comment".dimmed()),
            Token::EndOfFile => println!("{}", "EOF".dimmed()),
            Token::Character(_) => {}
        }
    }

    if show_errors {
        for error in errors {
            eprintln!("{} {error}", "error:".red().bold());
        }
    }
}

fn print_issues(issues: &[ParseIssue]) {
    if issues.is_empty() {
        eprintln!("{}", "no parse errors".green());
        return;
    }
    for issue in issues {
        eprintln!("{} {issue}", "error:".red().bold());
    }
}

/// Compact JSON for the whole document: `{"mode", "document", "errors"?}`.
fn document_json(tree: &DomTree, errors: Option<&[ParseIssue]>) -> Result<String> {
    let mut out = String::from("{\"mode\":");
    out.push_str(&serde_json::to_string(&tree.mode().to_string())?);
    out.push_str(",\"document\":");
    write_node_json(&mut out, tree, tree.root())?;
    if let Some(errors) = errors {
        out.push_str(",\"errors\":");
        out.push_str(&serde_json::to_string(errors)?);
    }
    out.push('}');
    Ok(out)
}

enum JsonStep {
    Open { id: NodeId, first: bool },
    Close,
}

/// Write the subtree at `id` as nested objects. Documents can nest deeper
/// than the call stack allows, so nodes are streamed from an explicit stack
/// instead of being built into a `Value`.
fn write_node_json(out: &mut String, tree: &DomTree, id: NodeId) -> Result<()> {
    let mut stack = vec![JsonStep::Open { id, first: true }];
    while let Some(step) = stack.pop() {
        let (id, first) = match step {
            JsonStep::Open { id, first } => (id, first),
            JsonStep::Close => {
                out.push_str("]}");
                continue;
            }
        };
        if !first {
            out.push(',');
        }
        let Some(node) = tree.get(id) else {
            out.push_str("null");
            continue;
        };

        out.push('{');
        for (index, (key, value)) in node_fields(&node.node_type).iter().enumerate() {
            if index > 0 {
                out.push(',');
            }
            out.push_str(&serde_json::to_string(key)?);
            out.push(':');
            out.push_str(&serde_json::to_string(value)?);
        }

        let children = tree.children(id);
        if children.is_empty() {
            out.push('}');
            continue;
        }
        out.push_str(",\"children\":[");
        stack.push(JsonStep::Close);
        stack.extend(children.iter().enumerate().rev().map(|(index, &child)| {
            JsonStep::Open {
                id: child,
                first: index == 0,
            }
        }));
    }
    Ok(())
}

fn node_fields(node_type: &NodeType) -> Map<String, Value> {
    let fields = match node_type {
        NodeType::Document => json!({ "type": "document" }),
        NodeType::DocumentType {
            name,
            public_id,
            system_id,
        } => json!({
            "type": "doctype",
            "name": name,
            "publicId": public_id,
            "systemId": system_id,
        }),
        NodeType::Element(data) => {
            let attributes: Map<String, Value> = data
                .attrs
                .iter()
                .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                .collect();
            json!({
                "type": "element",
                "tagName": data.tag_name,
                "namespace": data.namespace.url(),
                "attributes": attributes,
            })
        }
        NodeType::Text(text) => json!({ "type": "text", "content": text }),
        NodeType::Comment(text) => json!({ "type": "comment", "content": text }),
    };
    match fields {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(html: &str) -> (DomTree, Vec<ParseIssue>) {
        HTMLParser::new(html).run_with_issues()
    }

    #[test]
    fn test_document_json_shape() {
        let (tree, issues) = parse("<!doctype html><p class=x>Hi<!--c-->");
        let output: Value =
            serde_json::from_str(&document_json(&tree, Some(&issues)).expect("json"))
                .expect("valid json");

        assert_eq!(output["mode"], "no-quirks");
        assert_eq!(output["document"]["type"], "document");
        assert_eq!(output["document"]["children"][0]["type"], "doctype");
        let body = &output["document"]["children"][1]["children"][1];
        assert_eq!(body["tagName"], "body");
        let p = &body["children"][0];
        assert_eq!(p["attributes"]["class"], "x");
        assert_eq!(p["children"][0], json!({ "type": "text", "content": "Hi" }));
        assert_eq!(p["children"][1]["content"], "c");
        assert!(output["errors"].as_array().is_some_and(Vec::is_empty));
    }

    #[test]
    fn test_errors_are_omitted_unless_requested() {
        let (tree, _) = parse("<p>");
        let output: Value =
            serde_json::from_str(&document_json(&tree, None).expect("json")).expect("valid json");
        assert!(output.get("errors").is_none());
        assert_eq!(output["mode"], "quirks");
    }

    #[test]
    fn test_deeply_nested_document_json() {
        let mut tree = DomTree::new();
        let mut parent = tree.root();
        for _ in 0..100_000 {
            let div = tree.create_element("div", Namespace::Html, weft_dom::AttributesMap::new());
            tree.append_child(parent, div);
            parent = div;
        }

        let json = document_json(&tree, None).expect("json");
        assert_eq!(json.matches("\"tagName\":\"div\"").count(), 100_000);
        assert_eq!(json.matches('[').count(), json.matches(']').count());
        assert!(json.ends_with("}]}]}}"));
    }
}
