/*
** This file is a part of Xstree (small XML tree parser and compiler)
** Copyright (C) 2000-2025 Gurer Ozen
**
** Xstree is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

use tracing::trace;

use crate::Document;
use crate::Node;
use crate::NodeId;

/// Scan order of a [Query] over the document's node list.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Direction {
    #[default]
    Forward,
    Backward,
}

/// Occurrence search over the nodes of a [Document].
///
/// All supplied criteria must hold for a node to match. Attribute name and
/// value criteria must be satisfied by the same attribute. The content
/// criterion is a case sensitive substring search over the node's text
/// segments.
///
/// By default the result starts with `NodeId::ROOT` whether or not the
/// root matches; [leading_root(false)](Query::leading_root) turns this off.
///
/// ```
/// use std::str::FromStr;
/// use xstree::{Direction, Document, NodeId, Query};
///
/// let doc = Document::from_str("<a><b k='1'/><b k='2'>x</b></a>").unwrap();
/// let found = Query::new().tag_name("b").attribute_value("2").find(&doc);
/// assert_eq!(found, [NodeId::ROOT, NodeId::new(2)]);
///
/// let found = Query::new()
///     .tag_name("b")
///     .direction(Direction::Backward)
///     .leading_root(false)
///     .find(&doc);
/// assert_eq!(found, [NodeId::new(2), NodeId::new(1)]);
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Query {
    tag_name: Option<String>,
    attribute_name: Option<String>,
    attribute_value: Option<String>,
    content: Option<String>,
    direction: Direction,
    leading_root: bool,
}

impl Query {
    pub fn new() -> Self {
        Query {
            tag_name: None,
            attribute_name: None,
            attribute_value: None,
            content: None,
            direction: Direction::Forward,
            leading_root: true,
        }
    }

    /// Node name must be equal to this.
    pub fn tag_name(mut self, name: impl Into<String>) -> Self {
        self.tag_name = Some(name.into());
        self
    }

    pub fn attribute_name(mut self, name: impl Into<String>) -> Self {
        self.attribute_name = Some(name.into());
        self
    }

    pub fn attribute_value(mut self, value: impl Into<String>) -> Self {
        self.attribute_value = Some(value.into());
        self
    }

    /// One of the text segments must contain this.
    pub fn content(mut self, substring: impl Into<String>) -> Self {
        self.content = Some(substring.into());
        self
    }

    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn leading_root(mut self, enabled: bool) -> Self {
        self.leading_root = enabled;
        self
    }

    pub fn has_criteria(&self) -> bool {
        self.tag_name.is_some()
            || self.attribute_name.is_some()
            || self.attribute_value.is_some()
            || self.content.is_some()
    }

    pub fn matches(&self, node: &Node) -> bool {
        if let Some(tag_name) = &self.tag_name
            && node.name() != tag_name.as_str()
        {
            return false;
        }

        if self.attribute_name.is_some() || self.attribute_value.is_some() {
            let found = node.attributes().iter().any(|attr| {
                self.attribute_name
                    .as_deref()
                    .is_none_or(|name| attr.name() == name)
                    && self
                        .attribute_value
                        .as_deref()
                        .is_none_or(|value| attr.value() == value)
            });
            if !found {
                return false;
            }
        }

        if let Some(content) = &self.content
            && !node
                .contents()
                .iter()
                .any(|segment| segment.contains(content.as_str()))
        {
            return false;
        }

        true
    }

    /// Returns the identifiers of the matching nodes in scan order.
    ///
    /// Without any criteria only the root is returned.
    pub fn find(&self, document: &Document) -> Vec<NodeId> {
        let mut found = Vec::new();
        if document.is_empty() {
            return found;
        }
        if !self.has_criteria() {
            found.push(NodeId::ROOT);
            return found;
        }
        if self.leading_root {
            found.push(NodeId::ROOT);
        }

        let nodes = document.nodes();
        let mut visit = |index: usize| {
            let node = &nodes[index];
            let matched = self.matches(node);
            trace!(index, name = node.name(), matched, "query");
            if matched {
                found.push(NodeId::new(index));
            }
        };
        match self.direction {
            Direction::Forward => (0..nodes.len()).for_each(&mut visit),
            Direction::Backward => (0..nodes.len()).rev().for_each(&mut visit),
        }
        found
    }
}

impl Default for Query {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests;
