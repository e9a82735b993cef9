/*
** This file is a part of Xstree (small XML tree parser and compiler)
** Copyright (C) 2000-2025 Gurer Ozen
**
** Xstree is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

use std::borrow::Cow;

use thiserror::Error;

/// Type of the error which happened during the XML SAX parsing.
///
/// Location of the error is available via the
/// [location()](super::SaxParser::location) method.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum SaxError {
    /// A syntax error is encountered in the XML input.
    ///
    /// The argument describes which rule of the XML dialect is violated and
    /// is suitable to be shown to the user.
    #[error("{0}")]
    BadXml(Cow<'static, str>),

    /// Element handler function returned this error.
    ///
    /// This is intended for caller's handler to be able to abort the processing while
    /// signalling to the caller that the interruption is not caused by the parser itself.
    #[error("error from sax handler")]
    HandlerAbort,
}

impl SaxError {
    pub(crate) fn bad_xml(description: &'static str) -> Self {
        SaxError::BadXml(Cow::Borrowed(description))
    }
}

pub(crate) mod description {
    use crate::entities::MAX_REFERENCE_LENGTH;

    pub(crate) const TAG_NAME_START: &str =
        "Tag names must start with an alphabetical character [a-zA-Z] or underscore (_)";
    pub(crate) const TAG_NAME_CHARS: &str = "Tag names may contain letters [a-zA-z], digits [0-9], hyphens (-), underscores (_), and periods (.) only.";
    pub(crate) const TAG_NAME_RESERVED: &str =
        "Tag names cannot start with 'xml' or any of its variants like XML, Xml, etc.";
    pub(crate) const TAG_NAME_WHITESPACE: &str = "Tag names cannot have any space characters.";
    pub(crate) const TAG_DOUBLE_SLASH: &str = "A tag cannot have more than one forward slash.";
    pub(crate) const TAG_EMPTY_MISSING_END: &str =
        "A self-closing tag must end right after the forward slash.";
    pub(crate) const TAG_UNTERMINATED: &str = "A tag does not terminate.";
    pub(crate) const END_TAG_ATTRIBUTES: &str = "End tags cannot have any attributes.";
    pub(crate) const END_TAG_WITHOUT_START: &str =
        "An end tag cannot appear before its start tag.";
    pub(crate) const ATTRIBUTE_NAME_START: &str = "Attribute names must start with an alphabetical character [a-zA-Z] or underscore (_)";
    pub(crate) const ATTRIBUTE_NAME_CHARS: &str = "Attribute names may contain letters [a-zA-z], digits [0-9], hyphens (-), underscores (_), and periods (.) only.";
    pub(crate) const ATTRIBUTE_NAME_EMPTY: &str =
        "Attribute names cannot be empty (i.e. contain a lone equal-to sign (=)).";
    pub(crate) const ATTRIBUTE_WITHOUT_VALUE: &str =
        "If empty, then attribute values must at least contain the double quotes (\"\").";
    pub(crate) const ATTRIBUTE_WITHOUT_QUOTE: &str = "Attribute assignment (=) must be followed either by a single quote (') or a double quote (\").";
    pub(crate) const ATTRIBUTE_VALUE_LT: &str =
        "Attribute values may not contain the less-than (<) characters.";
    pub(crate) const ATTRIBUTE_VALUE_AMP: &str = "Attribute values may contain the ampersand (&) characters only as character entity references.";
    pub(crate) const PCDATA_AMP: &str = "A tag's PCDATA may contain the ampersand (&) characters only as character entity references.";
    pub(crate) const PCDATA_LT: &str = "A tag's PCDATA may not contain the less-than (<) characters.";
    pub(crate) const PCDATA_OUTSIDE_ROOT: &str =
        "Parsed character data (PCDATA or text data) cannot be placed outside the outermost tag.";
    pub(crate) const COMMENT_DOUBLE_HYPHEN: &str =
        "A double hyphen (--) within comments is not allowed.";
    pub(crate) const COMMENT_UNTERMINATED: &str = "A comment does not terminate.";
    pub(crate) const CDATA_UNTERMINATED: &str = "A CDATA entity does not terminate.";
    pub(crate) const HEADER_UNTERMINATED: &str = "An XML header does not terminate.";
    pub(crate) const MULTIPLE_ROOTS: &str = "There cannot be more than one outermost tag.";
    pub(crate) const NO_ROOT: &str = "There must be exactly one outermost tag.";
    pub(crate) const ATTRIBUTE_DUPLICATE: &str =
        "Within a given tag, attributes cannot share the same name.";

    pub(crate) fn reference_too_long(context: &str) -> String {
        format!(
            "{} Character entity references may contain at most {} characters.",
            context, MAX_REFERENCE_LENGTH
        )
    }

    pub(crate) fn open_tags(depth: usize) -> String {
        format!(
            "{} start tag elements do not have their end tag counterparts.",
            depth
        )
    }
}
