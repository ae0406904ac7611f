//! Insertion mode handlers, grouped by the part of the document they build.

mod after;
mod document;
mod in_body;
mod select;
mod table;
mod template;
