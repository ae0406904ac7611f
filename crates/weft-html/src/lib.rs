//! HTML5 tokenizer and tree builder.
//!
//! # Scope
//!
//! This crate implements:
//! - **HTML Tokenizer** ([WHATWG § 13.2.5](https://html.spec.whatwg.org/multipage/parsing.html#tokenization))
//!   - All 80 tokenizer states, including script data escapes and CDATA
//!   - Named and numeric character references, with the attribute
//!     historical rule and the Windows-1252 remapping of `&#128;`-`&#159;`
//!   - Every WHATWG tokenizer parse error, reported with a byte offset
//!
//! - **HTML Parser / Tree Builder** ([WHATWG § 13.2.6](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction))
//!   - All 23 insertion modes plus the rules for foreign content
//!   - The adoption agency algorithm, Noah's Ark clause and foster parenting
//!   - DOCTYPE-driven quirks mode and fragment parsing
//!
//! Parse errors never stop the parse. They are collected as
//! [`ParseIssue`]s next to the finished tree.
//!
//! ```
//! use weft_html::{HTMLParser, dump_tree};
//!
//! let tree = HTMLParser::new("<p>Hello").run();
//! assert!(dump_tree(&tree).contains("\"Hello\""));
//! ```

/// Parse error codes and the parser's error types.
pub mod error;
/// HTML parser and tree construction.
pub mod parser;
/// HTML tokenizer for converting input into tokens.
pub mod tokenizer;

pub use error::{ParseError, ParseErrorCode, ParseIssue, ParserError};
pub use parser::{HTMLParser, InsertionMode, dump_tree, print_tree};
pub use tokenizer::{Attribute, HTMLTokenizer, Tag, TagKind, Token};
