/*
** This file is a part of Xstree (small XML tree parser and compiler)
** Copyright (C) 2000-2025 Gurer Ozen
**
** Xstree is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

use crate::SaxElement;
use crate::SaxError;
use crate::SaxHandler;
use crate::parser::description as sax_description;

use super::Document;
use super::NodeId;
use super::error::description;

/// Builds a [Document] from the events of a [SaxParser](crate::SaxParser).
///
/// The builder keeps the chain of currently open elements, so every new
/// element is linked under the innermost open one as its last child.
pub struct DocumentBuilder {
    doc: Document,
    open: Vec<NodeId>,
}

impl DocumentBuilder {
    pub fn new() -> Self {
        DocumentBuilder {
            doc: Document::empty(),
            open: Vec::new(),
        }
    }

    pub fn append_element(&mut self, element: &SaxElement) -> Result<(), SaxError> {
        match element {
            SaxElement::StartTag(name) => {
                let parent = self.open.last().copied();
                if parent.is_none() && !self.doc.is_empty() {
                    return Err(SaxError::bad_xml(sax_description::MULTIPLE_ROOTS));
                }
                let id = self.doc.push_node(parent, name);
                self.open.push(id);
            }
            SaxElement::Attribute(name, value) => {
                let node = self.current()?;
                let node = &mut self.doc.nodes[node.index()];
                if node.attribute(name).is_some() {
                    return Err(SaxError::bad_xml(sax_description::ATTRIBUTE_DUPLICATE));
                }
                node.attributes.push(super::Attribute {
                    name: name.to_string(),
                    value: value.to_string(),
                });
            }
            SaxElement::EmptyElementTag => {
                self.open.pop();
            }
            SaxElement::Text(text) => {
                let node = self.current()?;
                self.doc.nodes[node.index()].contents.push(text.to_string());
            }
            SaxElement::EndTag(name) => {
                let node = self.current()?;
                let start = self.doc.nodes[node.index()].name();
                if name != &start {
                    return Err(SaxError::BadXml(
                        description::tag_mismatch(name, start).into(),
                    ));
                }
                self.open.pop();
            }
        }
        Ok(())
    }

    fn current(&self) -> Result<NodeId, SaxError> {
        match self.open.last() {
            Some(id) => Ok(*id),
            None => Err(SaxError::bad_xml(sax_description::END_TAG_WITHOUT_START)),
        }
    }

    /// Number of elements which are started but not yet ended.
    pub fn depth(&self) -> usize {
        self.open.len()
    }

    pub fn peek(&self) -> &Document {
        &self.doc
    }

    pub fn into_document(self) -> Document {
        self.doc
    }
}

impl SaxHandler for DocumentBuilder {
    fn handle_element(&mut self, element: &SaxElement) -> Result<(), SaxError> {
        self.append_element(element)
    }
}

impl Default for DocumentBuilder {
    fn default() -> Self {
        Self::new()
    }
}
