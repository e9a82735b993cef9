/*
** This file is a part of Xstree (small XML tree parser and compiler)
** Copyright (C) 2000-2025 Gurer Ozen
**
** Xstree is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

mod builder;
mod error;
mod iterators;
mod parser;

use std::fmt::Debug;
use std::str::FromStr;

use crate::entities::escape_fmt;
use crate::parser::description as sax_description;

pub use builder::DocumentBuilder;
pub(crate) use error::description;
pub use error::Status;
pub use error::XmlError;
pub use iterators::Attributes;
pub use iterators::Children;
pub use iterators::DescendantOrSelf;
pub use parser::CharSource;
pub use parser::DocumentParser;
pub use parser::ReaderSource;
pub use parser::StrSource;

/// Messages longer than this many characters are cut.
pub const MAX_MESSAGE_LENGTH: usize = 200;

/// Identifier of a node: its position in the document's node list.
///
/// Nodes are numbered in the order their start tags were seen, so the
/// root element is always `NodeId(0)`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);

    pub fn new(index: usize) -> NodeId {
        NodeId(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Attribute {
    name: String,
    value: String,
}

impl Attribute {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

/// One XML element.
///
/// Text segments are stored separately from child elements. A node with
/// `k` children has its segments interleaved with them: segment `i` comes
/// right before child `i`, and any segments beyond `k` follow the last
/// child.
#[derive(Clone, Debug)]
pub struct Node {
    name: String,
    depth: usize,
    attributes: Vec<Attribute>,
    contents: Vec<String>,
    parent: Option<NodeId>,
    first_child: Option<NodeId>,
    last_child: Option<NodeId>,
    next_sibling: Option<NodeId>,
    previous_sibling: Option<NodeId>,
}

impl Node {
    fn new(name: &str, depth: usize, parent: Option<NodeId>) -> Node {
        Node {
            name: name.to_string(),
            depth,
            attributes: Vec::new(),
            contents: Vec::new(),
            parent,
            first_child: None,
            last_child: None,
            next_sibling: None,
            previous_sibling: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Nesting level, zero for the root element.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attr| attr.name == name)
            .map(|attr| attr.value.as_str())
    }

    pub fn contents(&self) -> &[String] {
        &self.contents
    }

    pub fn content(&self, index: usize) -> Option<&str> {
        self.contents.get(index).map(String::as_str)
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn first_child(&self) -> Option<NodeId> {
        self.first_child
    }

    pub fn last_child(&self) -> Option<NodeId> {
        self.last_child
    }

    pub fn next_sibling(&self) -> Option<NodeId> {
        self.next_sibling
    }

    pub fn previous_sibling(&self) -> Option<NodeId> {
        self.previous_sibling
    }

    /// True when the node is written as a self-closing `<name/>` tag.
    pub fn is_empty_element(&self) -> bool {
        self.first_child.is_none() && self.contents.is_empty()
    }
}

/// A parsed or programmatically built XML tree.
///
/// Nodes live in a flat list and refer to each other by [NodeId]. The
/// list only grows; a document is discarded as a whole.
///
/// # Examples
///
/// ```
/// use std::str::FromStr;
/// use xstree::Document;
///
/// let doc = Document::from_str("<a><b x='1'>text</b><c/></a>").unwrap();
/// assert_eq!(doc.len(), 3);
/// assert_eq!(doc.root().first_child().attribute("x"), Some("1"));
/// assert_eq!(doc.to_string(), "<a><b x=\"1\">text</b><c/></a>");
/// ```
#[derive(Clone, Debug, Default)]
pub struct Document {
    nodes: Vec<Node>,
    status: Status,
    message: String,
}

impl Document {
    /// Creates a document with only a root element.
    pub fn new(root_tag_name: &str) -> Document {
        let mut doc = Document::empty();
        doc.push_node(None, root_tag_name);
        doc
    }

    pub(crate) fn empty() -> Document {
        Document::default()
    }

    pub(crate) fn push_node(&mut self, parent: Option<NodeId>, name: &str) -> NodeId {
        let id = NodeId(self.nodes.len());
        let depth = match parent {
            Some(parent) => self.nodes[parent.0].depth + 1,
            None => 0,
        };
        let mut node = Node::new(name, depth, parent);
        if let Some(parent) = parent {
            let parent_node = &mut self.nodes[parent.0];
            match parent_node.last_child {
                Some(previous) => {
                    node.previous_sibling = Some(previous);
                    parent_node.last_child = Some(id);
                    self.nodes[previous.0].next_sibling = Some(id);
                }
                None => {
                    parent_node.first_child = Some(id);
                    parent_node.last_child = Some(id);
                }
            }
        }
        self.nodes.push(node);
        id
    }

    fn check_node(&self, id: NodeId) -> Result<(), XmlError> {
        if id.0 < self.nodes.len() {
            Ok(())
        } else {
            Err(XmlError::input(description::UNKNOWN_NODE))
        }
    }

    //
    // Edit methods
    //

    /// Appends a new element as the last child of `parent`.
    ///
    /// Names are not checked here; the [Compiler](crate::Compiler) validates
    /// them before writing anything out.
    pub fn insert_tag(&mut self, parent: NodeId, tag_name: &str) -> Result<NodeId, XmlError> {
        self.check_node(parent)?;
        Ok(self.push_node(Some(parent), tag_name))
    }

    /// Adds an attribute, failing if the node already has one with this name.
    pub fn insert_attribute(
        &mut self,
        node: NodeId,
        name: &str,
        value: &str,
    ) -> Result<(), XmlError> {
        self.check_node(node)?;
        let node = &mut self.nodes[node.0];
        if node.attributes.iter().any(|attr| attr.name == name) {
            return Err(XmlError::syntax(sax_description::ATTRIBUTE_DUPLICATE));
        }
        node.attributes.push(Attribute {
            name: name.to_string(),
            value: value.to_string(),
        });
        Ok(())
    }

    /// Appends a text segment after the node's existing segments.
    pub fn insert_content(&mut self, node: NodeId, text: &str) -> Result<(), XmlError> {
        self.check_node(node)?;
        self.nodes[node.0].contents.push(text.to_string());
        Ok(())
    }

    //
    // Status
    //

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }

    pub(crate) fn set_status(&mut self, status: Status, message: &str) {
        self.status = status;
        self.message.clear();
        match message.char_indices().nth(MAX_MESSAGE_LENGTH) {
            Some((cut, _)) => self.message.push_str(&message[..cut]),
            None => self.message.push_str(message),
        }
    }

    pub(crate) fn set_error(&mut self, err: &XmlError) {
        self.set_status(err.status(), err.message());
    }

    /// Converts a failed status into an error.
    pub fn result(&self) -> Result<(), XmlError> {
        match self.status {
            Status::Success => Ok(()),
            Status::InputFailure => Err(XmlError::InputFailure(self.message.clone().into())),
            Status::SyntaxFailure => Err(XmlError::SyntaxFailure(self.message.clone().into())),
        }
    }

    //
    // Node access
    //

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Returns a cursor to the root element, or a null cursor for an empty document.
    pub fn root(&self) -> Cursor<'_> {
        if self.nodes.is_empty() {
            Cursor::new(self, None)
        } else {
            Cursor::new(self, Some(NodeId::ROOT))
        }
    }

    pub fn cursor(&self, id: NodeId) -> Cursor<'_> {
        if id.0 < self.nodes.len() {
            Cursor::new(self, Some(id))
        } else {
            Cursor::new(self, None)
        }
    }

    //
    // Convenience functions to avoid typing .root() all the time
    //

    pub fn first_child(&self) -> Cursor<'_> {
        self.root().first_child()
    }

    pub fn find_tag(&self, name: &str) -> Cursor<'_> {
        self.root().find_tag(name)
    }

    pub(crate) fn visitor(&self, start: NodeId) -> Visitor<'_> {
        Visitor::new(self, start)
    }
}

impl std::fmt::Display for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.root(), f)
    }
}

impl FromStr for Document {
    type Err = XmlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let doc = DocumentParser::new().parse_str(s);
        doc.result()?;
        Ok(doc)
    }
}

struct Frame {
    node: NodeId,
    level: usize,
    opened: bool,
    next_child: Option<NodeId>,
    nr_visited: usize,
    nr_segments: usize,
}

impl Frame {
    fn new(node: &Node, id: NodeId, level: usize) -> Frame {
        Frame {
            node: id,
            level,
            opened: false,
            next_child: node.first_child,
            nr_visited: 0,
            nr_segments: 0,
        }
    }
}

/// Depth first walk over a subtree with an explicit stack.
///
/// Text segments are produced interleaved with the children in the order
/// they are written out.
pub(crate) struct Visitor<'a> {
    doc: &'a Document,
    stack: Vec<Frame>,
}

pub(crate) enum VisitorStep<'a> {
    StartTag(&'a Node, usize),
    Content(&'a str, usize),
    EndTag(&'a Node, usize),
}

impl<'a> Visitor<'a> {
    fn new(doc: &'a Document, start: NodeId) -> Visitor<'a> {
        let mut stack = Vec::new();
        if let Some(node) = doc.node(start) {
            stack.push(Frame::new(node, start, 0));
        }
        Visitor { doc, stack }
    }

    pub(crate) fn next(&mut self) -> Option<VisitorStep<'a>> {
        let doc = self.doc;
        let frame = self.stack.last_mut()?;
        let node = &doc.nodes[frame.node.0];
        let level = frame.level;

        if !frame.opened {
            frame.opened = true;
            return Some(VisitorStep::StartTag(node, level));
        }
        if frame.nr_segments < node.contents.len()
            && (frame.nr_segments <= frame.nr_visited || frame.next_child.is_none())
        {
            let segment = &node.contents[frame.nr_segments];
            frame.nr_segments += 1;
            return Some(VisitorStep::Content(segment, level + 1));
        }
        if let Some(child) = frame.next_child {
            let child_node = &doc.nodes[child.0];
            frame.next_child = child_node.next_sibling;
            frame.nr_visited += 1;
            let mut child_frame = Frame::new(child_node, child, level + 1);
            child_frame.opened = true;
            self.stack.push(child_frame);
            return Some(VisitorStep::StartTag(child_node, level + 1));
        }
        self.stack.pop();
        Some(VisitorStep::EndTag(node, level))
    }
}

/// A position in a [Document], or nowhere.
///
/// Navigation methods never fail: moving from a null cursor, or to a
/// missing node, gives a null cursor. Property methods on a null cursor
/// return empty values.
#[derive(Clone, Copy)]
pub struct Cursor<'a> {
    doc: &'a Document,
    node: Option<NodeId>,
}

impl<'a> Cursor<'a> {
    fn new(doc: &'a Document, node: Option<NodeId>) -> Cursor<'a> {
        Cursor { doc, node }
    }

    fn get(&self) -> Option<&'a Node> {
        let doc = self.doc;
        self.node.and_then(|id| doc.nodes.get(id.0))
    }

    fn step(self, link: impl FnOnce(&Node) -> Option<NodeId>) -> Cursor<'a> {
        let next = self.get().and_then(link);
        Cursor::new(self.doc, next)
    }

    pub(crate) fn clear(&mut self) {
        self.node = None;
    }

    //
    // Navigation methods
    //

    pub fn next(self) -> Cursor<'a> {
        self.step(Node::next_sibling)
    }

    pub fn previous(self) -> Cursor<'a> {
        self.step(Node::previous_sibling)
    }

    pub fn parent(self) -> Cursor<'a> {
        self.step(Node::parent)
    }

    pub fn first_child(self) -> Cursor<'a> {
        self.step(Node::first_child)
    }

    pub fn last_child(self) -> Cursor<'a> {
        self.step(Node::last_child)
    }

    pub fn root(self) -> Cursor<'a> {
        if self.is_null() {
            return self;
        }
        let mut current = self;
        loop {
            let parent = current.parent();
            if parent.is_null() {
                break;
            }
            current = parent;
        }
        current
    }

    /// Returns the first child element with the given name.
    pub fn find_tag(self, name: &str) -> Cursor<'a> {
        let mut child = self.first_child();
        while !child.is_null() {
            if child.name() == name {
                break;
            }
            child = child.next();
        }
        child
    }

    //
    // Iterator methods
    //

    pub fn children(self) -> Children<'a> {
        Children::new(self.first_child())
    }

    pub fn attributes(self) -> Attributes<'a> {
        Attributes::new(self.get())
    }

    pub fn descendant_or_self(self) -> DescendantOrSelf<'a> {
        DescendantOrSelf::new(self)
    }

    //
    // Node property methods
    //

    pub fn is_null(&self) -> bool {
        self.get().is_none()
    }

    pub fn id(&self) -> Option<NodeId> {
        self.get().and(self.node)
    }

    pub fn node(&self) -> Option<&'a Node> {
        self.get()
    }

    pub fn name(&self) -> &'a str {
        self.get().map_or("", |node| node.name.as_str())
    }

    pub fn depth(&self) -> usize {
        self.get().map_or(0, |node| node.depth)
    }

    pub fn attribute(&self, name: &str) -> Option<&'a str> {
        self.get().and_then(|node| node.attribute(name))
    }

    pub fn contents(&self) -> &'a [String] {
        self.get()
            .map(|node| node.contents.as_slice())
            .unwrap_or_default()
    }

    pub fn content(&self, index: usize) -> Option<&'a str> {
        self.get().and_then(|node| node.content(index))
    }
}

impl Debug for Cursor<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Cursor ({:?})", self.id())
    }
}

impl PartialEq for Cursor<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.doc, other.doc) && self.id() == other.id()
    }
}

impl<'a> std::fmt::Display for Cursor<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let Some(id) = self.id() else {
            return Ok(());
        };

        let mut visitor = self.doc.visitor(id);
        while let Some(step) = visitor.next() {
            match step {
                VisitorStep::StartTag(node, _) => {
                    f.write_str("<")?;
                    f.write_str(&node.name)?;
                    for attr in &node.attributes {
                        f.write_str(" ")?;
                        f.write_str(&attr.name)?;
                        f.write_str("=\"")?;
                        escape_fmt(&attr.value, f)?;
                        f.write_str("\"")?;
                    }
                    if node.is_empty_element() {
                        f.write_str("/>")?;
                    } else {
                        f.write_str(">")?;
                    }
                }
                VisitorStep::EndTag(node, _) => {
                    if node.is_empty_element() {
                        // Already handled
                    } else {
                        f.write_str("</")?;
                        f.write_str(&node.name)?;
                        f.write_str(">")?;
                    }
                }
                VisitorStep::Content(text, _) => {
                    escape_fmt(text, f)?;
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;

mod nocompile;
