/*
** This file is a part of Xstree (small XML tree parser and compiler)
** Copyright (C) 2000-2025 Gurer Ozen
**
** Xstree is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

mod error;
mod location;

use crate::entities;
pub(crate) use error::description;
pub use error::SaxError;
pub use location::Location;

/// An XML element returned from the parser.
#[derive(Debug, Eq, PartialEq)]
pub enum SaxElement<'a> {
    /// A start tag or empty element tag.
    ///
    /// The argument is the name of the tag. This element is sent to the handler as soon as
    /// the name is parsed, and marks the point where a new element exists.
    StartTag(&'a str),

    /// A tag attribute for the last StartTag.
    ///
    /// First argument is the attribute name and the second argument is the attribute value.
    /// All references in the attribute value are replaced with the actual characters.
    Attribute(&'a str, &'a str),

    /// Indicates that the last StartTag was an empty element tag and will have no content.
    EmptyElementTag,

    /// An end tag element.
    ///
    /// The argument is the name of the end tag.
    EndTag(&'a str),

    /// A text segment of the current element.
    ///
    /// Whitespace runs are collapsed into a single space, leading and trailing
    /// whitespace is dropped, references are replaced, and the contents of
    /// CDATA sections are included verbatim. A segment ends when a tag or an
    /// XML header starts; comments and CDATA sections do not split it.
    Text(&'a str),
}

pub trait SaxHandler {
    fn handle_element(&mut self, element: &SaxElement) -> Result<(), SaxError>;
}

/// SAX (Simple API for XML) based XML parser.
///
/// This struct implements a character driven state machine which processes
/// the incoming characters one at a time and invokes a handler function for
/// each encountered XML element.
///
/// # Examples
///
/// Typical usage:
/// ```
/// use xstree::{SaxElement, SaxError, SaxHandler, SaxParser};
///
/// // Example handler which just prints parsed elements
/// struct Handler { }
/// impl SaxHandler for Handler {
///     fn handle_element(&mut self, element: &SaxElement) -> Result<(), SaxError> {
///         println!("Element parsed: {:?}", element);
///         Ok(())
///     }
/// }
/// let mut handler = Handler {};
///
/// let mut parser = SaxParser::new();
///
/// match parser.parse_str_finish(&mut handler, "<doc>example</doc>") {
///     Ok(()) => (),
///     Err(SaxError::BadXml(description)) => {
///         println!("syntax error at {}: {}",
///             parser.location(),
///             description,
///         );
///         return;
///     }
///     Err(SaxError::HandlerAbort) => {
///         println!("handler returned error");
///         return;
///     }
/// }
/// ```
///
/// Characters can also be fed one by one, which is how the
/// [DocumentParser](crate::DocumentParser) drives it:
/// ```
/// # use xstree::{SaxElement, SaxError, SaxHandler, SaxParser};
/// # fn main() -> Result<(), SaxError> {
/// # struct Handler { }
/// # impl SaxHandler for Handler {
/// #     fn handle_element(&mut self, element: &SaxElement) -> Result<(), SaxError> {
/// #         Ok(())
/// #     }
/// # }
/// # let mut handler = Handler {};
/// let mut parser = SaxParser::new();
/// for c in "<a>b</a>".chars() {
///     parser.parse_char(&mut handler, c)?;
/// }
/// // This is to check if there is any incomplete XML construct at the end
/// parser.parse_finish()?;
/// # Ok(())
/// # }
/// ```
pub struct SaxParser {
    state: State,
    depth: usize,
    seen_root: bool,
    is_end_tag: bool,
    buffer: String,
    value: String,
    text: String,
    text_pending: bool,
    trailing_space: bool,
    reference: String,
    reference_len: usize,
    location: Location,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum State {
    Content,
    Reference,
    TagStart,
    Header,
    HeaderEnd,
    Markup,
    CommentStart,
    CommentBody,
    CommentHyphen,
    CommentDoubleHyphen,
    CDataStart(usize),
    CDataBody,
    CDataBrackets(usize),
    TagName,
    EndTagWhitespace,
    EmptyTagEnd,
    AttributeWhitespace,
    AttributeName,
    AttributeEq,
    AttributeValueStart,
    AttributeValue(char),
    AttributeReference(char),
}

const CDATA_OPENING: [char; 6] = ['C', 'D', 'A', 'T', 'A', '['];

const INITIAL_BUFFER_CAPACITY: usize = 128;

macro_rules! whitespace {
    () => {
        ' ' | '\t' | '\r' | '\n' | '\u{0b}' | '\u{0c}'
    };
}

macro_rules! xml_error {
    ($a:ident) => {
        return Err(SaxError::bad_xml(description::$a))
    };
}

/// Returns true if the character can start a tag or attribute name.
pub(crate) fn is_name_start_char(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

/// Returns true if the character can appear after the first character of a name.
pub(crate) fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')
}

pub(crate) fn is_whitespace(c: char) -> bool {
    matches!(c, whitespace!())
}

/// Returns true if the name starts with `xml` in any letter case.
pub(crate) fn is_reserved_name(name: &str) -> bool {
    name.get(..3)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("xml"))
}

impl SaxParser {
    /// Creates a new SAX parser instance.
    ///
    /// The instance can be reused for multiple documents with the [reset()](SaxParser::reset) method.
    pub fn new() -> SaxParser {
        SaxParser {
            state: State::Content,
            depth: 0,
            seen_root: false,
            is_end_tag: false,
            buffer: String::with_capacity(INITIAL_BUFFER_CAPACITY),
            value: String::with_capacity(INITIAL_BUFFER_CAPACITY),
            text: String::with_capacity(INITIAL_BUFFER_CAPACITY),
            text_pending: false,
            trailing_space: false,
            reference: String::with_capacity(entities::MAX_REFERENCE_LENGTH),
            reference_len: 0,
            location: Location::new(),
        }
    }

    /// Resets the parser into a clean state.
    pub fn reset(&mut self) {
        self.state = State::Content;
        self.depth = 0;
        self.seen_root = false;
        self.is_end_tag = false;
        self.buffer.clear();
        self.value.clear();
        self.text.clear();
        self.text_pending = false;
        self.trailing_space = false;
        self.reference.clear();
        self.reference_len = 0;
        self.location = Location::new();
    }

    /// Current element nesting depth.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn location(&self) -> Location {
        self.location
    }

    fn flush_text(&mut self, handler: &mut impl SaxHandler) -> Result<(), SaxError> {
        if self.text_pending {
            if self.trailing_space {
                self.text.pop();
            }
            if !self.text.is_empty() {
                handler.handle_element(&SaxElement::Text(&self.text))?;
            }
            self.text.clear();
            self.text_pending = false;
            self.trailing_space = false;
        }
        Ok(())
    }

    fn push_text(&mut self, c: char) {
        self.text.push(c);
        self.text_pending = true;
        self.trailing_space = false;
    }

    fn start_reference(&mut self) {
        self.reference.clear();
        self.reference_len = 0;
    }

    fn push_reference(&mut self, c: char, context: &'static str) -> Result<(), SaxError> {
        if self.reference_len >= entities::MAX_REFERENCE_LENGTH {
            return Err(SaxError::BadXml(
                description::reference_too_long(context).into(),
            ));
        }
        self.reference.push(c);
        self.reference_len += 1;
        Ok(())
    }

    fn start_tag(&mut self, handler: &mut impl SaxHandler) -> Result<(), SaxError> {
        if self.depth == 0 && self.seen_root {
            xml_error!(MULTIPLE_ROOTS);
        }
        self.seen_root = true;
        handler.handle_element(&SaxElement::StartTag(&self.buffer))?;
        self.buffer.clear();
        Ok(())
    }

    fn end_tag(&mut self, handler: &mut impl SaxHandler) -> Result<(), SaxError> {
        handler.handle_element(&SaxElement::EndTag(&self.buffer))?;
        self.buffer.clear();
        self.depth -= 1;
        self.state = State::Content;
        Ok(())
    }

    fn open_content(&mut self) {
        self.depth += 1;
        self.state = State::Content;
    }

    /// Parses a single character of the input.
    pub fn parse_char(&mut self, handler: &mut impl SaxHandler, c: char) -> Result<(), SaxError> {
        match self.state {
            State::Content => match c {
                '<' => self.state = State::TagStart,
                '&' => {
                    self.start_reference();
                    self.state = State::Reference;
                }
                whitespace!() => {
                    if self.depth > 0 && self.text_pending && !self.trailing_space {
                        self.text.push(' ');
                        self.trailing_space = true;
                    }
                }
                _ => {
                    if self.depth == 0 {
                        xml_error!(PCDATA_OUTSIDE_ROOT);
                    }
                    self.push_text(c);
                }
            },

            State::Reference => match c {
                ';' => match entities::decode(&self.reference) {
                    Ok(decoded) => {
                        if self.depth == 0 {
                            xml_error!(PCDATA_OUTSIDE_ROOT);
                        }
                        self.push_text(decoded);
                        self.state = State::Content;
                    }
                    Err(_) => {
                        xml_error!(PCDATA_AMP);
                    }
                },
                '<' | whitespace!() => {
                    xml_error!(PCDATA_AMP);
                }
                _ => self.push_reference(c, description::PCDATA_AMP)?,
            },

            State::TagStart => match c {
                '!' => self.state = State::Markup,
                '?' => {
                    self.flush_text(handler)?;
                    self.state = State::Header;
                }
                '/' => {
                    self.flush_text(handler)?;
                    if self.depth == 0 {
                        xml_error!(END_TAG_WITHOUT_START);
                    }
                    self.is_end_tag = true;
                    self.buffer.clear();
                    self.state = State::TagName;
                }
                _ => {
                    if !is_name_start_char(c) {
                        xml_error!(TAG_NAME_START);
                    }
                    self.flush_text(handler)?;
                    self.is_end_tag = false;
                    self.buffer.clear();
                    self.buffer.push(c);
                    self.state = State::TagName;
                }
            },

            State::Header => {
                if c == '?' {
                    self.state = State::HeaderEnd;
                }
            }

            State::HeaderEnd => match c {
                '>' => self.state = State::Content,
                '?' => (),
                _ => self.state = State::Header,
            },

            State::Markup => match c {
                '-' => self.state = State::CommentStart,
                '[' => self.state = State::CDataStart(0),
                _ => {
                    xml_error!(TAG_NAME_START);
                }
            },

            State::CommentStart => {
                if c != '-' {
                    xml_error!(TAG_NAME_START);
                }
                self.state = State::CommentBody;
            }

            State::CommentBody => {
                if c == '-' {
                    self.state = State::CommentHyphen;
                }
            }

            State::CommentHyphen => match c {
                '-' => self.state = State::CommentDoubleHyphen,
                _ => self.state = State::CommentBody,
            },

            State::CommentDoubleHyphen => {
                if c != '>' {
                    xml_error!(COMMENT_DOUBLE_HYPHEN);
                }
                self.state = State::Content;
            }

            State::CDataStart(matched) => {
                if CDATA_OPENING.get(matched) != Some(&c) {
                    xml_error!(TAG_NAME_START);
                }
                if matched + 1 < CDATA_OPENING.len() {
                    self.state = State::CDataStart(matched + 1);
                } else {
                    if self.depth == 0 {
                        xml_error!(PCDATA_OUTSIDE_ROOT);
                    }
                    self.text_pending = true;
                    self.state = State::CDataBody;
                }
            }

            State::CDataBody => match c {
                ']' => self.state = State::CDataBrackets(1),
                _ => self.push_text(c),
            },

            State::CDataBrackets(nr_brackets) => match c {
                ']' => self.state = State::CDataBrackets(nr_brackets + 1),
                '>' if nr_brackets >= 2 => {
                    for _ in 2..nr_brackets {
                        self.push_text(']');
                    }
                    self.state = State::Content;
                }
                _ => {
                    for _ in 0..nr_brackets {
                        self.push_text(']');
                    }
                    self.push_text(c);
                    self.state = State::CDataBody;
                }
            },

            State::TagName => {
                if self.buffer.is_empty() {
                    // Only an end tag can be here without a name character yet
                    if c == '/' {
                        xml_error!(TAG_DOUBLE_SLASH);
                    }
                    if !is_name_start_char(c) {
                        xml_error!(TAG_NAME_START);
                    }
                    self.buffer.push(c);
                    return self.advance(c);
                }
                match c {
                    whitespace!() => {
                        if self.is_end_tag {
                            self.state = State::EndTagWhitespace;
                        } else {
                            self.start_tag(handler)?;
                            self.state = State::AttributeWhitespace;
                        }
                    }
                    '/' => {
                        if self.is_end_tag {
                            xml_error!(TAG_DOUBLE_SLASH);
                        }
                        self.start_tag(handler)?;
                        self.state = State::EmptyTagEnd;
                    }
                    '>' => {
                        if self.is_end_tag {
                            self.end_tag(handler)?;
                        } else {
                            self.start_tag(handler)?;
                            self.open_content();
                        }
                    }
                    _ => {
                        if !is_name_char(c) {
                            xml_error!(TAG_NAME_CHARS);
                        }
                        self.buffer.push(c);
                        if self.buffer.len() == 3 && is_reserved_name(&self.buffer) {
                            xml_error!(TAG_NAME_RESERVED);
                        }
                    }
                }
            }

            State::EndTagWhitespace => match c {
                '>' => self.end_tag(handler)?,
                whitespace!() => (),
                _ => {
                    xml_error!(END_TAG_ATTRIBUTES);
                }
            },

            State::EmptyTagEnd => {
                if c != '>' {
                    xml_error!(TAG_EMPTY_MISSING_END);
                }
                handler.handle_element(&SaxElement::EmptyElementTag)?;
                self.state = State::Content;
            }

            State::AttributeWhitespace => match c {
                whitespace!() => (),
                '/' => self.state = State::EmptyTagEnd,
                '>' => self.open_content(),
                '=' => {
                    xml_error!(ATTRIBUTE_NAME_EMPTY);
                }
                _ => {
                    if !is_name_start_char(c) {
                        xml_error!(ATTRIBUTE_NAME_START);
                    }
                    self.buffer.push(c);
                    self.state = State::AttributeName;
                }
            },

            State::AttributeName => match c {
                '=' => self.state = State::AttributeValueStart,
                whitespace!() => self.state = State::AttributeEq,
                '>' | '/' => {
                    xml_error!(ATTRIBUTE_WITHOUT_VALUE);
                }
                _ => {
                    if !is_name_char(c) {
                        xml_error!(ATTRIBUTE_NAME_CHARS);
                    }
                    self.buffer.push(c);
                }
            },

            State::AttributeEq => match c {
                '=' => self.state = State::AttributeValueStart,
                whitespace!() => (),
                _ => {
                    xml_error!(ATTRIBUTE_WITHOUT_VALUE);
                }
            },

            State::AttributeValueStart => match c {
                '"' | '\'' => {
                    self.value.clear();
                    self.state = State::AttributeValue(c);
                }
                whitespace!() => (),
                _ => {
                    xml_error!(ATTRIBUTE_WITHOUT_QUOTE);
                }
            },

            State::AttributeValue(quote) => match c {
                '<' => {
                    xml_error!(ATTRIBUTE_VALUE_LT);
                }
                '&' => {
                    self.start_reference();
                    self.state = State::AttributeReference(quote);
                }
                _ if c == quote => {
                    handler.handle_element(&SaxElement::Attribute(&self.buffer, &self.value))?;
                    self.buffer.clear();
                    self.value.clear();
                    self.state = State::AttributeWhitespace;
                }
                _ => self.value.push(c),
            },

            State::AttributeReference(quote) => match c {
                ';' => match entities::decode(&self.reference) {
                    Ok(decoded) => {
                        self.value.push(decoded);
                        self.state = State::AttributeValue(quote);
                    }
                    Err(_) => {
                        xml_error!(ATTRIBUTE_VALUE_AMP);
                    }
                },
                '<' => {
                    xml_error!(ATTRIBUTE_VALUE_LT);
                }
                '"' | '\'' | whitespace!() => {
                    xml_error!(ATTRIBUTE_VALUE_AMP);
                }
                _ => self.push_reference(c, description::ATTRIBUTE_VALUE_AMP)?,
            },
        }

        self.advance(c)
    }

    fn advance(&mut self, c: char) -> Result<(), SaxError> {
        self.location.advance(c);
        Ok(())
    }

    /// Parses all characters of the given text.
    pub fn parse_str(&mut self, handler: &mut impl SaxHandler, s: &str) -> Result<(), SaxError> {
        for c in s.chars() {
            self.parse_char(handler, c)?;
        }
        Ok(())
    }

    /// Parses the given text and checks if the document is complete.
    ///
    /// This is a convenience function which calls [parse_str()](SaxParser::parse_str)
    /// and [parse_finish()](SaxParser::parse_finish) methods for you.
    pub fn parse_str_finish(
        &mut self,
        handler: &mut impl SaxHandler,
        s: &str,
    ) -> Result<(), SaxError> {
        self.parse_str(handler, s)?;
        self.parse_finish()
    }

    /// Checks if the document is complete.
    ///
    /// A completed document has exactly one root tag, every start tag is
    /// closed, and no comment, CDATA section, header or tag is left open.
    pub fn parse_finish(&mut self) -> Result<(), SaxError> {
        match self.state {
            State::CDataBody | State::CDataBrackets(_) => {
                xml_error!(CDATA_UNTERMINATED);
            }
            State::CommentBody | State::CommentHyphen | State::CommentDoubleHyphen => {
                xml_error!(COMMENT_UNTERMINATED);
            }
            State::Header | State::HeaderEnd => {
                xml_error!(HEADER_UNTERMINATED);
            }
            _ => (),
        }
        if self.depth > 0 {
            return Err(SaxError::BadXml(description::open_tags(self.depth).into()));
        }
        match self.state {
            State::Content => (),
            State::Reference => {
                xml_error!(PCDATA_AMP);
            }
            _ => {
                xml_error!(TAG_UNTERMINATED);
            }
        }
        if !self.seen_root {
            xml_error!(NO_ROOT);
        }
        Ok(())
    }
}

impl Default for SaxParser {
    fn default() -> Self {
        Self::new()
    }
}
