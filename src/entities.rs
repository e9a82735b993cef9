/*
** This file is a part of Xstree (small XML tree parser and compiler)
** Copyright (C) 2000-2025 Gurer Ozen
**
** Xstree is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

//! Character entity references.
//!
//! Both the parser and the compiler resolve `&...;` tokens through
//! [decode()], so the two sides always agree on what a valid reference is.

use thiserror::Error;

/// Longest reference token (without the `&` and `;`) accepted by the parser.
pub const MAX_REFERENCE_LENGTH: usize = 10;

/// Exclusive upper bound of the code points a numeric reference may name.
pub const MAX_CODE_POINT: u32 = 1_114_112;

pub mod predefined {
    pub const LT: &str = "&lt;";
    pub const GT: &str = "&gt;";
    pub const AMP: &str = "&amp;";
    pub const APOS: &str = "&apos;";
    pub const QUOT: &str = "&quot;";
}

/// Reasons a reference token cannot be turned into a character.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
pub enum ReferenceError {
    #[error("'{0}' is not a predefined entity or a character reference")]
    Unknown(UnknownName),
    #[error("non digit in decimal character reference")]
    InvalidDecimal,
    #[error("non hex digit in hexadecimal character reference")]
    InvalidHex,
    #[error("character reference is out of the valid code point range")]
    OutOfRange,
}

/// Short copy of an unrecognized entity name, kept inline so the error stays `Copy`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct UnknownName {
    bytes: [u8; MAX_REFERENCE_LENGTH],
    len: usize,
}

impl UnknownName {
    fn new(token: &str) -> Self {
        let mut bytes = [0u8; MAX_REFERENCE_LENGTH];
        let mut len = 0;
        for c in token.chars() {
            let size = c.len_utf8();
            if len + size > MAX_REFERENCE_LENGTH {
                break;
            }
            c.encode_utf8(&mut bytes[len..len + size]);
            len += size;
        }
        UnknownName { bytes, len }
    }

    pub fn as_str(&self) -> &str {
        std::str::from_utf8(&self.bytes[..self.len]).unwrap_or_default()
    }
}

impl std::fmt::Display for UnknownName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decodes a single reference token into the character it stands for.
///
/// The token is the text between `&` and `;`. Five predefined entities
/// (`lt`, `gt`, `amp`, `apos`, `quot`) and the numeric forms `#65`,
/// `#x41` and `#X41` are recognized. Leading zeros are fine, hex digits
/// are case insensitive.
///
/// ```
/// use xstree::entities::decode;
///
/// assert_eq!(decode("amp"), Ok('&'));
/// assert_eq!(decode("#65"), Ok('A'));
/// assert_eq!(decode("#x41"), Ok('A'));
/// assert!(decode("nbsp").is_err());
/// ```
pub fn decode(token: &str) -> Result<char, ReferenceError> {
    match token {
        "lt" => return Ok('<'),
        "gt" => return Ok('>'),
        "amp" => return Ok('&'),
        "apos" => return Ok('\''),
        "quot" => return Ok('"'),
        _ => (),
    }

    let Some(number) = token.strip_prefix('#') else {
        return Err(ReferenceError::Unknown(UnknownName::new(token)));
    };

    let value = match number.strip_prefix(['x', 'X']) {
        Some(hex) => parse_number(hex, 16, ReferenceError::InvalidHex)?,
        None => parse_number(number, 10, ReferenceError::InvalidDecimal)?,
    };

    if value >= MAX_CODE_POINT {
        return Err(ReferenceError::OutOfRange);
    }
    char::from_u32(value).ok_or(ReferenceError::OutOfRange)
}

fn parse_number(digits: &str, radix: u32, bad_digit: ReferenceError) -> Result<u32, ReferenceError> {
    if digits.is_empty() {
        return Err(bad_digit);
    }
    let mut value: u32 = 0;
    for c in digits.chars() {
        let digit = c.to_digit(radix).ok_or(bad_digit)?;
        value = value
            .checked_mul(radix)
            .and_then(|v| v.checked_add(digit))
            .ok_or(ReferenceError::OutOfRange)?;
    }
    Ok(value)
}

/// Returns the length of the text after [escape()] is applied.
pub fn escaped_size(s: &str) -> usize {
    let mut size = 0;
    for c in s.chars() {
        match c {
            '<' => size += predefined::LT.len(),
            '>' => size += predefined::GT.len(),
            '&' => size += predefined::AMP.len(),
            '\'' => size += predefined::APOS.len(),
            '"' => size += predefined::QUOT.len(),
            _ => size += c.len_utf8(),
        }
    }

    size
}

/// Appends the text to the buffer with all five special characters replaced.
pub fn escape(s: &str, buf: &mut String) {
    let mut back = 0;
    for (pos, c) in s.char_indices() {
        let entity = match c {
            '<' => predefined::LT,
            '>' => predefined::GT,
            '&' => predefined::AMP,
            '\'' => predefined::APOS,
            '"' => predefined::QUOT,
            _ => continue,
        };
        buf.push_str(&s[back..pos]);
        buf.push_str(entity);
        back = pos + 1;
    }
    buf.push_str(&s[back..]);
}

/// Same as [escape()] but writes into a formatter.
pub fn escape_fmt(s: &str, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let mut back = 0;
    for (pos, c) in s.char_indices() {
        let entity = match c {
            '<' => predefined::LT,
            '>' => predefined::GT,
            '&' => predefined::AMP,
            '\'' => predefined::APOS,
            '"' => predefined::QUOT,
            _ => continue,
        };
        f.write_str(&s[back..pos])?;
        f.write_str(entity)?;
        back = pos + 1;
    }
    f.write_str(&s[back..])
}

/// Escapes only the characters which are markup in element content.
pub fn escape_content(s: &str, buf: &mut String) {
    let mut back = 0;
    for (pos, c) in s.char_indices() {
        let entity = match c {
            '<' => predefined::LT,
            '>' => predefined::GT,
            '&' => predefined::AMP,
            _ => continue,
        };
        buf.push_str(&s[back..pos]);
        buf.push_str(entity);
        back = pos + 1;
    }
    buf.push_str(&s[back..]);
}
