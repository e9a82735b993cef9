/*
** This file is a part of Xstree (small XML tree parser and compiler)
** Copyright (C) 2000-2025 Gurer Ozen
**
** Xstree is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

/// # Must not compile tests
///
/// Returned Cursor cannot outlive the Document:
/// ```compile_fail
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use std::str::FromStr;
/// use xstree::Document;
/// use xstree::Cursor;
/// let c: Cursor;
/// {
///     let doc = Document::from_str("<a><b/></a>")?;
///     c = doc.root().find_tag("b");
/// }
/// println!("{}", c);
/// # Ok(())
/// # }
/// ```
///
/// Document cannot be edited while a Cursor is looking at it:
/// ```compile_fail
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use xstree::Document;
/// use xstree::NodeId;
/// let mut doc = Document::new("a");
/// let root = doc.root();
/// doc.insert_tag(NodeId::ROOT, "b")?;
/// println!("{}", root);
/// # Ok(())
/// # }
/// ```
///
/// Node references cannot outlive the Document:
/// ```compile_fail
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use xstree::Document;
/// use xstree::Node;
/// let node: &Node;
/// {
///     let doc = Document::new("a");
///     node = &doc.nodes()[0];
/// }
/// println!("{}", node.name());
/// # Ok(())
/// # }
/// ```
///
#[cfg(doctest)]
struct MustNotCompileTests;
