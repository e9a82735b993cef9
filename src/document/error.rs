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
use std::fmt::Display;

use thiserror::Error;

use crate::SaxError;

/// Outcome of the last operation recorded on a [Document](super::Document).
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum Status {
    #[default]
    Success,
    /// The input handle, the read mechanism or a configuration value is at fault.
    InputFailure,
    /// The XML text breaks a rule of the supported dialect.
    SyntaxFailure,
}

impl Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::Success => f.write_str("success"),
            Status::InputFailure => f.write_str("input failure"),
            Status::SyntaxFailure => f.write_str("syntax failure"),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum XmlError {
    #[error("input failure: {0}")]
    InputFailure(Cow<'static, str>),
    #[error("syntax failure: {0}")]
    SyntaxFailure(Cow<'static, str>),
}

impl XmlError {
    pub(crate) fn input(description: &'static str) -> Self {
        XmlError::InputFailure(Cow::Borrowed(description))
    }

    pub(crate) fn syntax(description: &'static str) -> Self {
        XmlError::SyntaxFailure(Cow::Borrowed(description))
    }

    pub fn status(&self) -> Status {
        match self {
            XmlError::InputFailure(_) => Status::InputFailure,
            XmlError::SyntaxFailure(_) => Status::SyntaxFailure,
        }
    }

    /// The bare message, without the failure kind prefix.
    pub fn message(&self) -> &str {
        match self {
            XmlError::InputFailure(msg) | XmlError::SyntaxFailure(msg) => msg,
        }
    }
}

impl From<SaxError> for XmlError {
    fn from(err: SaxError) -> Self {
        match err {
            SaxError::BadXml(msg) => XmlError::SyntaxFailure(msg),
            SaxError::HandlerAbort => XmlError::syntax(description::UNEXPECTED_HANDLER_ABORT),
        }
    }
}

pub(crate) mod description {
    pub(crate) const UNEXPECTED_HANDLER_ABORT: &str = "unexpected handler abort";
    pub(crate) const NO_INPUT: &str = "No input provided: the input file path cannot be empty.";
    pub(crate) const NO_DOCUMENT: &str = "The document has no nodes.";
    pub(crate) const UNKNOWN_NODE: &str = "The node does not belong to this document.";

    pub(crate) fn missing_file(path: &str) -> String {
        format!("The file path '{}' does not exist.", path)
    }

    pub(crate) fn read_failure(name: &str) -> String {
        format!("Unable to read the file '{}'.", name)
    }

    pub(crate) fn parsed(name: &str) -> String {
        format!("The input '{}' has been successfully parsed.", name)
    }

    pub(crate) fn tag_mismatch(end: &str, start: &str) -> String {
        format!(
            "The end tag '</{}>' does not match the start tag '<{}>'.",
            end, start
        )
    }
}
