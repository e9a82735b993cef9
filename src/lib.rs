/*
** This file is a part of Xstree (small XML tree parser and compiler)
** Copyright (C) 2000-2025 Gurer Ozen
**
** Xstree is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

//! A small XML 1.0 engine for a restricted dialect without DTDs,
//! namespaces or name prefixes.
//!
//! Text is parsed into a [Document], searched with a [Query], and written
//! back out with a [Compiler] which re-validates every node first.
//!
//! ```
//! use xstree::{Compiler, DocumentParser, Escaping, Query};
//!
//! let doc = DocumentParser::new().parse_str("<a><b>1 &lt; 2</b><b/></a>");
//! assert!(doc.is_success());
//!
//! let found = Query::new().tag_name("b").leading_root(false).find(&doc);
//! assert_eq!(found.len(), 2);
//!
//! let text = Compiler::new().escaping(Escaping::Escape).compile(&doc).unwrap();
//! assert!(text.contains("1 &lt; 2"));
//! ```

mod compiler;
mod document;
pub mod entities;
mod parser;
mod query;

pub use parser::Location;
pub use parser::SaxElement;
pub use parser::SaxError;
pub use parser::SaxHandler;
pub use parser::SaxParser;

pub use document::Attribute;
pub use document::Attributes;
pub use document::CharSource;
pub use document::Children;
pub use document::Cursor;
pub use document::DescendantOrSelf;
pub use document::Document;
pub use document::DocumentBuilder;
pub use document::DocumentParser;
pub use document::MAX_MESSAGE_LENGTH;
pub use document::Node;
pub use document::NodeId;
pub use document::ReaderSource;
pub use document::Status;
pub use document::StrSource;
pub use document::XmlError;

pub use query::Direction;
pub use query::Query;

pub use compiler::Compiler;
pub use compiler::Escaping;
pub use compiler::MAX_INDENTATION;
pub use compiler::MAX_VERTICAL_SPACING;
