/*
** This file is a part of Xstree (small XML tree parser and compiler)
** Copyright (C) 2000-2025 Gurer Ozen
**
** Xstree is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

use std::fs::File;
use std::io;
use std::io::BufRead;
use std::io::BufReader;
use std::path::Path;
use std::str::Chars;

use tracing::debug;
use tracing::instrument;
use tracing::warn;

use crate::Location;
use crate::SaxParser;

use super::Document;
use super::DocumentBuilder;
use super::error::Status;
use super::error::XmlError;
use super::error::description;

/// A supplier of characters for the [DocumentParser].
pub trait CharSource {
    /// Human readable name of the input, used in status messages.
    fn name(&self) -> &str;

    /// Total number of bytes or characters expected, if known.
    fn len_hint(&self) -> Option<usize> {
        None
    }

    /// Returns the next character, `None` at the end of the input.
    fn next_char(&mut self) -> io::Result<Option<char>>;
}

/// Characters of an in-memory string.
pub struct StrSource<'a> {
    name: String,
    chars: Chars<'a>,
    len: usize,
}

impl<'a> StrSource<'a> {
    pub fn new(text: &'a str) -> Self {
        Self::with_name("string", text)
    }

    pub fn with_name(name: impl Into<String>, text: &'a str) -> Self {
        StrSource {
            name: name.into(),
            chars: text.chars(),
            len: text.len(),
        }
    }
}

impl CharSource for StrSource<'_> {
    fn name(&self) -> &str {
        &self.name
    }

    fn len_hint(&self) -> Option<usize> {
        Some(self.len)
    }

    fn next_char(&mut self) -> io::Result<Option<char>> {
        Ok(self.chars.next())
    }
}

/// Decodes UTF-8 characters from a buffered byte stream.
///
/// Malformed or truncated sequences are reported as read errors.
pub struct ReaderSource<R: BufRead> {
    name: String,
    reader: R,
    len: Option<usize>,
}

impl<R: BufRead> ReaderSource<R> {
    pub fn new(name: impl Into<String>, reader: R) -> Self {
        ReaderSource {
            name: name.into(),
            reader,
            len: None,
        }
    }

    pub fn with_len(mut self, len: usize) -> Self {
        self.len = Some(len);
        self
    }

    fn next_byte(&mut self) -> io::Result<Option<u8>> {
        loop {
            match self.reader.fill_buf() {
                Ok(buf) => {
                    let Some(&byte) = buf.first() else {
                        return Ok(None);
                    };
                    self.reader.consume(1);
                    return Ok(Some(byte));
                }
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(err),
            }
        }
    }
}

fn invalid_utf8() -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, "invalid UTF-8 sequence")
}

impl<R: BufRead> CharSource for ReaderSource<R> {
    fn name(&self) -> &str {
        &self.name
    }

    fn len_hint(&self) -> Option<usize> {
        self.len
    }

    fn next_char(&mut self) -> io::Result<Option<char>> {
        let Some(lead) = self.next_byte()? else {
            return Ok(None);
        };
        let width = match lead {
            0x00..=0x7f => return Ok(Some(char::from(lead))),
            0xc2..=0xdf => 2,
            0xe0..=0xef => 3,
            0xf0..=0xf4 => 4,
            _ => return Err(invalid_utf8()),
        };
        let mut bytes = [lead, 0, 0, 0];
        for slot in bytes.iter_mut().take(width).skip(1) {
            match self.next_byte()? {
                Some(byte) => *slot = byte,
                None => {
                    return Err(io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        "truncated UTF-8 sequence",
                    ));
                }
            }
        }
        let s = std::str::from_utf8(&bytes[..width]).map_err(|_| invalid_utf8())?;
        Ok(s.chars().next())
    }
}

/// Parses character sources into [Document]s.
///
/// The parser never returns an error directly. The resulting document
/// carries a [Status] and a message; on failure it holds the part of the
/// tree which was built before the problem was found.
///
/// ```
/// use xstree::{DocumentParser, Status};
///
/// let mut parser = DocumentParser::new();
/// let doc = parser.parse_str("<a><b/></a>");
/// assert_eq!(doc.status(), Status::Success);
///
/// let doc = parser.parse_str("<a><b></a>");
/// assert_eq!(doc.status(), Status::SyntaxFailure);
/// println!("{} at {}", doc.message(), parser.location());
/// ```
pub struct DocumentParser {
    parser: SaxParser,
}

impl DocumentParser {
    pub fn new() -> DocumentParser {
        DocumentParser {
            parser: SaxParser::new(),
        }
    }

    #[instrument(level = "debug", skip_all, fields(input = source.name(), len = ?source.len_hint()))]
    pub fn parse(&mut self, source: &mut impl CharSource) -> Document {
        self.parser.reset();
        let mut builder = DocumentBuilder::new();
        let result = self.run(source, &mut builder);
        let mut doc = builder.into_document();
        match result {
            Ok(()) => {
                debug!(nodes = doc.len(), "document parsed");
                doc.set_status(Status::Success, &description::parsed(source.name()));
            }
            Err(err) => {
                warn!(location = %self.parser.location(), "{}", err);
                doc.set_error(&err);
            }
        }
        doc
    }

    fn run(
        &mut self,
        source: &mut impl CharSource,
        builder: &mut DocumentBuilder,
    ) -> Result<(), XmlError> {
        loop {
            match source.next_char() {
                Ok(Some(c)) => self.parser.parse_char(builder, c)?,
                Ok(None) => break,
                Err(err) => {
                    debug!(error = %err, "read failed");
                    return Err(XmlError::InputFailure(
                        description::read_failure(source.name()).into(),
                    ));
                }
            }
        }
        self.parser.parse_finish()?;
        Ok(())
    }

    pub fn parse_str(&mut self, text: &str) -> Document {
        self.parse(&mut StrSource::new(text))
    }

    /// Opens and parses a file.
    ///
    /// An empty path, a missing file, and a failing read all give an
    /// [InputFailure](Status::InputFailure) document.
    pub fn parse_file(&mut self, path: impl AsRef<Path>) -> Document {
        let path = path.as_ref();
        let name = path.display().to_string();
        let err = if name.is_empty() {
            XmlError::input(description::NO_INPUT)
        } else if !path.exists() {
            XmlError::InputFailure(description::missing_file(&name).into())
        } else {
            match File::open(path) {
                Ok(file) => {
                    let mut source = ReaderSource::new(name, BufReader::new(file));
                    if let Ok(metadata) = path.metadata() {
                        source = source.with_len(metadata.len() as usize);
                    }
                    return self.parse(&mut source);
                }
                Err(io_err) => {
                    debug!(error = %io_err, "open failed");
                    XmlError::InputFailure(description::read_failure(&name).into())
                }
            }
        };
        warn!("{}", err);
        let mut doc = Document::empty();
        doc.set_error(&err);
        doc
    }

    pub fn location(&self) -> Location {
        self.parser.location()
    }
}

impl Default for DocumentParser {
    fn default() -> Self {
        Self::new()
    }
}
