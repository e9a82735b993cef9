/*
** This file is a part of Xstree (small XML tree parser and compiler)
** Copyright (C) 2000-2025 Gurer Ozen
**
** Xstree is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

use super::MAX_INDENTATION;
use super::MAX_VERTICAL_SPACING;

pub(crate) const ATTRIBUTE_NAME_WHITESPACE: &str =
    "Attribute names cannot have any space characters.";
pub(crate) const ATTRIBUTE_VALUE_QUOTES: &str =
    "Attribute values cannot contain both single quotes (') and double quotes (\").";
pub(crate) const COMPILED: &str = "The document has been successfully compiled.";

pub(crate) fn indentation_limit() -> String {
    format!(
        "Invalid indentation: you cannot have more than {} horizontal spaces as indentation.",
        MAX_INDENTATION
    )
}

pub(crate) fn spacing_limit() -> String {
    format!(
        "Invalid vertical spacing: you cannot have more than {} vertical spaces.",
        MAX_VERTICAL_SPACING
    )
}
