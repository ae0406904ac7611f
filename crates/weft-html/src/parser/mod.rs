//! HTML tree construction.
//!
//! [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction)
//!
//! `core` holds the parser state, the dispatcher and the node-insertion
//! primitives. The stack of open elements, the list of active formatting
//! elements and the adoption agency algorithm each get their own file, and
//! every insertion mode lives under `modes`.

mod active_formatting;
mod adoption_agency;
mod core;
/// SVG and MathML handling.
pub mod foreign_content;
mod modes;
mod open_elements;
/// DOCTYPE to document-mode mapping.
pub mod quirks;
mod tree_dump;

pub use active_formatting::ActiveFormattingElement;
pub use self::core::{HTMLParser, InsertionMode, PopObserver};
pub use quirks::{is_doctype_parse_error, quirks_mode_for_doctype};
pub use tree_dump::{dump_tree, print_tree};
