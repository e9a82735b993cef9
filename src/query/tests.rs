/*
** This file is a part of Xstree (small XML tree parser and compiler)
** Copyright (C) 2000-2025 Gurer Ozen
**
** Xstree is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

use std::str::FromStr;

use super::*;

const XML: &str = "<a><b><b/></b><d><e>123</e><f>456<b i=\"1\"/>789</f><b>abc</b></d></a>";

fn check_query(document: &Document, query: &Query, expected: &[usize]) {
    let found: Vec<usize> = query.find(document).into_iter().map(NodeId::index).collect();
    assert_eq!(found, expected, "{query:?}");
}

#[test]
fn no_criteria() {
    let doc = Document::from_str(XML).unwrap();
    check_query(&doc, &Query::new(), &[0]);
    check_query(&doc, &Query::new().leading_root(false), &[0]);
    check_query(&doc, &Query::new().direction(Direction::Backward), &[0]);

    let doc = Document::from_str("<lonely/>").unwrap();
    check_query(&doc, &Query::new(), &[0]);
}

#[test]
fn tag_names() {
    let doc = Document::from_str(XML).unwrap();
    check_query(&doc, &Query::new().tag_name("b"), &[0, 1, 2, 6, 7]);
    check_query(&doc, &Query::new().tag_name("b").leading_root(false), &[1, 2, 6, 7]);
    check_query(
        &doc,
        &Query::new().tag_name("b").direction(Direction::Backward),
        &[0, 7, 6, 2, 1],
    );
    check_query(&doc, &Query::new().tag_name("B"), &[0]);
    check_query(&doc, &Query::new().tag_name("zz"), &[0]);
    // the sentinel is kept even when the root itself matches
    check_query(&doc, &Query::new().tag_name("a"), &[0, 0]);
    check_query(&doc, &Query::new().tag_name("a").leading_root(false), &[0]);
}

#[test]
fn attributes() {
    let doc = Document::from_str(XML).unwrap();
    check_query(&doc, &Query::new().attribute_name("i"), &[0, 6]);
    check_query(&doc, &Query::new().attribute_value("1"), &[0, 6]);
    check_query(&doc, &Query::new().attribute_name("i").attribute_value("2"), &[0]);
    check_query(&doc, &Query::new().tag_name("e").attribute_name("i"), &[0]);

    let doc = Document::from_str("<r><x p='1' q='2'/><x q='2'/><y p='2'/></r>").unwrap();
    check_query(&doc, &Query::new().attribute_name("p").attribute_value("2"), &[0, 3]);
    check_query(&doc, &Query::new().attribute_name("q").attribute_value("2"), &[0, 1, 2]);
    check_query(
        &doc,
        &Query::new()
            .tag_name("x")
            .attribute_name("q")
            .attribute_value("2")
            .leading_root(false),
        &[1, 2],
    );
}

#[test]
fn contents() {
    let doc = Document::from_str(XML).unwrap();
    check_query(&doc, &Query::new().content("45"), &[0, 5]);
    check_query(&doc, &Query::new().content("9"), &[0, 5]);
    check_query(&doc, &Query::new().content("ABC"), &[0]);
    check_query(&doc, &Query::new().tag_name("b").content("abc"), &[0, 7]);
    check_query(&doc, &Query::new().tag_name("e").content("abc"), &[0]);
    check_query(&doc, &Query::new().attribute_name("i").content("abc"), &[0]);
}

#[test]
fn empty_document() {
    let doc = Document::default();
    assert!(Query::new().find(&doc).is_empty());
    assert!(Query::new().tag_name("a").find(&doc).is_empty());
}

#[test]
fn builder_defaults() {
    let query = Query::default();
    assert!(!query.has_criteria());
    assert_eq!(query, Query::new());
    assert!(Query::new().content("x").has_criteria());
    assert_eq!(Direction::default(), Direction::Forward);
}
