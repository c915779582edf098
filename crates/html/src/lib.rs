//! Headless document model: a mutable node arena plus a small HTML parser.

pub mod document;
pub mod serialize;

mod dom_builder;
mod entities;
mod tokenizer;
mod types;

pub use crate::document::{Descendants, Document, DomError};
pub use crate::dom_builder::{build_document, parse_document};
pub use crate::serialize::to_html;
pub use crate::tokenizer::tokenize;
pub use crate::types::{Id, NodeId, NodeKind, Token};
