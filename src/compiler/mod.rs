/*
** This file is a part of Xstree (small XML tree parser and compiler)
** Copyright (C) 2000-2025 Gurer Ozen
**
** Xstree is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

mod description;

use std::ops::Range;

use tracing::debug;
use tracing::instrument;

use crate::Document;
use crate::Node;
use crate::NodeId;
use crate::Status;
use crate::XmlError;
use crate::document::VisitorStep;
use crate::document::description as tree;
use crate::entities;
use crate::parser::description as rules;
use crate::parser::is_name_char;
use crate::parser::is_name_start_char;
use crate::parser::is_reserved_name;
use crate::parser::is_whitespace;

pub const MAX_INDENTATION: usize = 10;
pub const MAX_VERTICAL_SPACING: usize = 10;

const HEADER: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>";
const CDATA_START: &str = "<![CDATA[";
const CDATA_END: &str = "]]>";

/// How special characters in attribute values and text are written.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Escaping {
    /// Text must already be valid markup and is written as given.
    ///
    /// A `<` is only allowed inside a `<![CDATA[ ... ]]>` span of a
    /// content segment, and every `&` outside such spans must start a
    /// resolvable reference.
    #[default]
    Verbatim,
    /// Special characters are replaced with references.
    ///
    /// Use this for trees coming from the parser, which hold decoded text.
    Escape,
}

/// Validates a [Document] and writes it out as indented XML text.
///
/// ```
/// use std::str::FromStr;
/// use xstree::{Compiler, Document};
///
/// let doc = Document::from_str("<a><b x='1'>text</b><c/></a>").unwrap();
/// let text = Compiler::new().indentation(2).compile(&doc).unwrap();
/// assert_eq!(
///     text,
///     "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
///      <a>\n  <b x=\"1\">\n    text\n  </b>\n  <c/>\n</a>\n"
/// );
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Compiler {
    indentation: usize,
    vertical_spacing: usize,
    escaping: Escaping,
    normalize_whitespace: bool,
}

impl Compiler {
    pub fn new() -> Compiler {
        Compiler {
            indentation: 4,
            vertical_spacing: 0,
            escaping: Escaping::Verbatim,
            normalize_whitespace: true,
        }
    }

    /// Number of spaces per nesting level, at most [MAX_INDENTATION].
    pub fn indentation(mut self, spaces: usize) -> Self {
        self.indentation = spaces;
        self
    }

    /// Number of blank lines between output lines, at most [MAX_VERTICAL_SPACING].
    pub fn vertical_spacing(mut self, lines: usize) -> Self {
        self.vertical_spacing = lines;
        self
    }

    pub fn escaping(mut self, escaping: Escaping) -> Self {
        self.escaping = escaping;
        self
    }

    /// Collapses whitespace runs in text outside CDATA spans into single spaces.
    pub fn normalize_whitespace(mut self, normalize: bool) -> Self {
        self.normalize_whitespace = normalize;
        self
    }

    fn check_config(&self) -> Result<(), XmlError> {
        if self.indentation > MAX_INDENTATION {
            return Err(XmlError::InputFailure(description::indentation_limit().into()));
        }
        if self.vertical_spacing > MAX_VERTICAL_SPACING {
            return Err(XmlError::InputFailure(description::spacing_limit().into()));
        }
        Ok(())
    }

    /// Validates every node and renders the whole document.
    ///
    /// Nothing is returned on failure, even if most of the tree was fine.
    #[instrument(level = "debug", skip_all, fields(indentation = self.indentation, spacing = self.vertical_spacing))]
    pub fn compile(&self, document: &Document) -> Result<String, XmlError> {
        self.check_config()?;
        if document.is_empty() {
            return Err(XmlError::input(tree::NO_DOCUMENT));
        }

        let mut output = Output::new(self.indentation, self.vertical_spacing);
        output.line(0, HEADER);

        let mut line = String::new();
        let mut visitor = document.visitor(NodeId::ROOT);
        while let Some(step) = visitor.next() {
            line.clear();
            match step {
                VisitorStep::StartTag(node, level) => {
                    self.start_tag(node, &mut line)?;
                    output.line(level, &line);
                }
                VisitorStep::Content(text, level) => {
                    self.content(text, &mut line)?;
                    if !line.is_empty() {
                        output.line(level, &line);
                    }
                }
                VisitorStep::EndTag(node, level) => {
                    if !node.is_empty_element() {
                        line.push_str("</");
                        line.push_str(node.name());
                        line.push('>');
                        output.line(level, &line);
                    }
                }
            }
        }

        debug!(nodes = document.len(), len = output.text.len(), "document compiled");
        Ok(output.finish())
    }

    fn start_tag(&self, node: &Node, line: &mut String) -> Result<(), XmlError> {
        check_tag_name(node.name())?;
        line.push('<');
        line.push_str(node.name());

        let attributes = node.attributes();
        for (i, attr) in attributes.iter().enumerate() {
            if attributes[..i].iter().any(|other| other.name() == attr.name()) {
                return Err(XmlError::syntax(rules::ATTRIBUTE_DUPLICATE));
            }
            check_attribute_name(attr.name())?;
            line.push(' ');
            line.push_str(attr.name());
            line.push('=');
            match self.escaping {
                Escaping::Verbatim => {
                    let value = attr.value();
                    check_markup(value, rules::ATTRIBUTE_VALUE_LT, rules::ATTRIBUTE_VALUE_AMP)?;
                    let quote = match (value.contains('"'), value.contains('\'')) {
                        (false, _) => '"',
                        (true, false) => '\'',
                        (true, true) => {
                            return Err(XmlError::syntax(description::ATTRIBUTE_VALUE_QUOTES));
                        }
                    };
                    line.push(quote);
                    line.push_str(value);
                    line.push(quote);
                }
                Escaping::Escape => {
                    line.push('"');
                    entities::escape(attr.value(), line);
                    line.push('"');
                }
            }
        }

        if node.is_empty_element() {
            line.push_str("/>");
        } else {
            line.push('>');
        }
        Ok(())
    }

    fn content(&self, text: &str, line: &mut String) -> Result<(), XmlError> {
        match self.escaping {
            Escaping::Verbatim => {
                let spans = cdata_spans(text)?;
                check_content(text, &spans)?;
                if self.normalize_whitespace {
                    normalize(text, &spans, line);
                } else {
                    line.push_str(text);
                }
            }
            Escaping::Escape => {
                if self.normalize_whitespace {
                    let mut normalized = String::with_capacity(text.len());
                    normalize(text, &[], &mut normalized);
                    entities::escape_content(&normalized, line);
                } else {
                    entities::escape_content(text, line);
                }
            }
        }
        Ok(())
    }
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new()
    }
}

struct Output {
    text: String,
    indentation: usize,
    vertical_spacing: usize,
}

impl Output {
    fn new(indentation: usize, vertical_spacing: usize) -> Output {
        Output {
            text: String::new(),
            indentation,
            vertical_spacing,
        }
    }

    fn line(&mut self, level: usize, line: &str) {
        if !self.text.is_empty() {
            for _ in 0..self.vertical_spacing {
                self.text.push('\n');
            }
        }
        for _ in 0..self.indentation * level {
            self.text.push(' ');
        }
        self.text.push_str(line);
        self.text.push('\n');
    }

    fn finish(self) -> String {
        self.text
    }
}

fn check_tag_name(name: &str) -> Result<(), XmlError> {
    if name.chars().any(is_whitespace) {
        return Err(XmlError::syntax(rules::TAG_NAME_WHITESPACE));
    }
    let mut chars = name.chars();
    if !chars.next().is_some_and(is_name_start_char) {
        return Err(XmlError::syntax(rules::TAG_NAME_START));
    }
    if is_reserved_name(name) {
        return Err(XmlError::syntax(rules::TAG_NAME_RESERVED));
    }
    if !chars.all(is_name_char) {
        return Err(XmlError::syntax(rules::TAG_NAME_CHARS));
    }
    Ok(())
}

fn check_attribute_name(name: &str) -> Result<(), XmlError> {
    if name.chars().any(is_whitespace) {
        return Err(XmlError::syntax(description::ATTRIBUTE_NAME_WHITESPACE));
    }
    let mut chars = name.chars();
    if !chars.next().is_some_and(is_name_start_char) {
        return Err(XmlError::syntax(rules::ATTRIBUTE_NAME_START));
    }
    if !chars.all(is_name_char) {
        return Err(XmlError::syntax(rules::ATTRIBUTE_NAME_CHARS));
    }
    Ok(())
}

/// Rejects `<` and any `&` which does not start a valid reference.
fn check_markup(text: &str, lt: &'static str, amp: &'static str) -> Result<(), XmlError> {
    let mut rest = text;
    while let Some(pos) = rest.find(['<', '&']) {
        if rest[pos..].starts_with('<') {
            return Err(XmlError::syntax(lt));
        }
        let after = &rest[pos + 1..];
        let Some(end) = after.find(';') else {
            return Err(XmlError::syntax(amp));
        };
        if after[..end].chars().count() > entities::MAX_REFERENCE_LENGTH {
            return Err(XmlError::syntax(amp));
        }
        entities::decode(&after[..end]).map_err(|_| XmlError::syntax(amp))?;
        rest = &after[end + 1..];
    }
    Ok(())
}

/// Byte ranges of the `<![CDATA[ ... ]]>` spans, markers included.
fn cdata_spans(text: &str) -> Result<Vec<Range<usize>>, XmlError> {
    let mut spans = Vec::new();
    let mut pos = 0;
    while let Some(found) = text[pos..].find(CDATA_START) {
        let start = pos + found;
        let body = start + CDATA_START.len();
        let Some(end) = text[body..].find(CDATA_END) else {
            return Err(XmlError::syntax(rules::CDATA_UNTERMINATED));
        };
        pos = body + end + CDATA_END.len();
        spans.push(start..pos);
    }
    Ok(spans)
}

fn check_content(text: &str, spans: &[Range<usize>]) -> Result<(), XmlError> {
    let mut pos = 0;
    for span in spans.iter().cloned().chain(std::iter::once(text.len()..text.len())) {
        check_markup(&text[pos..span.start], rules::PCDATA_LT, rules::PCDATA_AMP)?;
        pos = span.end;
    }
    Ok(())
}

/// Collapses whitespace outside the spans and trims both ends.
fn normalize(text: &str, spans: &[Range<usize>], out: &mut String) {
    let mut collapsed = String::with_capacity(text.len());
    let mut pos = 0;
    for span in spans.iter().cloned().chain(std::iter::once(text.len()..text.len())) {
        let mut in_space = collapsed.ends_with(' ');
        for c in text[pos..span.start].chars() {
            if is_whitespace(c) {
                if !in_space {
                    collapsed.push(' ');
                    in_space = true;
                }
            } else {
                collapsed.push(c);
                in_space = false;
            }
        }
        collapsed.push_str(&text[span.start..span.end]);
        pos = span.end;
    }
    out.push_str(collapsed.trim_matches(' '));
}

impl Document {
    /// Compiles the document with the given layout and records the outcome.
    ///
    /// Returns empty text on failure; the reason is available from
    /// [status()](Document::status) and [message()](Document::message).
    /// Attribute values and text are written verbatim, see [Escaping]. Parsed
    /// trees hold decoded text, so they usually need a [Compiler] with
    /// [escaping(Escaping::Escape)](Compiler::escaping) instead.
    pub fn compile(&mut self, indentation: usize, vertical_spacing: usize) -> String {
        let compiler = Compiler::new()
            .indentation(indentation)
            .vertical_spacing(vertical_spacing);
        match compiler.compile(self) {
            Ok(text) => {
                self.set_status(Status::Success, description::COMPILED);
                text
            }
            Err(err) => {
                debug!(error = %err, "compile failed");
                self.set_error(&err);
                String::new()
            }
        }
    }
}
