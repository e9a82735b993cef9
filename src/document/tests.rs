/*
** This file is a part of Xstree (small XML tree parser and compiler)
** Copyright (C) 2000-2025 Gurer Ozen
**
** Xstree is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

use std::io::Cursor as IoCursor;

use super::error::description::*;
use super::*;
use crate::parser::description as sax;

fn check_doc_xml(doc: &Document, expected: &str) {
    let xml = doc.to_string();
    assert_eq!(xml, expected);
    let xml2 = format!("{}", doc);
    assert_eq!(xml2, expected);
}

fn syntax_failure(xml: &str) -> String {
    let doc = DocumentParser::new().parse_str(xml);
    assert_eq!(doc.status(), Status::SyntaxFailure, "{xml}");
    doc.message().to_string()
}

#[test]
fn it_works() {
    let mut doc = Document::new("html");
    let p = doc.insert_tag(NodeId::ROOT, "p").unwrap();
    let b = doc.insert_tag(p, "b").unwrap();
    let blink = doc.insert_tag(b, "blink").unwrap();
    doc.insert_content(blink, "lala").unwrap();
    doc.insert_content(NodeId::ROOT, "foo&").unwrap();
    doc.insert_content(NodeId::ROOT, "bar").unwrap();
    let p2 = doc.insert_tag(NodeId::ROOT, "p2").unwrap();

    assert_eq!(doc.len(), 5);
    assert_eq!(doc.node(p2).unwrap().depth(), 1);
    assert_eq!(doc.node(blink).unwrap().depth(), 3);
    check_doc_xml(
        &doc,
        "<html>foo&amp;<p><b><blink>lala</blink></b></p>bar<p2/></html>",
    );
}

#[test]
fn incremental_builder() {
    let mut parser = crate::SaxParser::new();
    let mut builder = DocumentBuilder::new();
    assert!(builder.peek().is_empty());

    parser.parse_str(&mut builder, "<a><b k='v'>x<c/>").unwrap();
    assert_eq!(builder.depth(), 2);
    check_doc_xml(builder.peek(), "<a><b k=\"v\">x<c/></b></a>");

    parser.parse_str_finish(&mut builder, "y</b></a>").unwrap();
    assert_eq!(builder.depth(), 0);
    let doc = builder.into_document();
    assert_eq!(doc.len(), 3);
    check_doc_xml(&doc, "<a><b k=\"v\">x<c/>y</b></a>");
}

#[test]
fn surplus_segments() {
    let mut doc = Document::new("a");
    doc.insert_content(NodeId::ROOT, "1").unwrap();
    doc.insert_content(NodeId::ROOT, "2").unwrap();
    doc.insert_content(NodeId::ROOT, "3").unwrap();
    doc.insert_tag(NodeId::ROOT, "b").unwrap();
    check_doc_xml(&doc, "<a>1<b/>23</a>");
}

#[test]
fn attributes() {
    let mut doc = Document::new("doc");
    let a = doc.insert_tag(NodeId::ROOT, "a").unwrap();
    assert!(doc.insert_attribute(a, "i", "1").is_ok());
    assert_eq!(
        doc.insert_attribute(a, "i", "1").unwrap_err(),
        XmlError::syntax(sax::ATTRIBUTE_DUPLICATE)
    );
    assert!(doc.insert_attribute(a, "j", "2").is_ok());
    assert_eq!(
        doc.insert_attribute(a, "j", "3").unwrap_err().status(),
        Status::SyntaxFailure
    );
    let b = doc.insert_tag(NodeId::ROOT, "b").unwrap();
    doc.insert_attribute(b, "i", "<\"'>").unwrap();
    check_doc_xml(
        &doc,
        "<doc><a i=\"1\" j=\"2\"/><b i=\"&lt;&quot;&apos;&gt;\"/></doc>",
    );

    let mut iter = doc.first_child().attributes();
    assert_eq!(iter.next(), Some(("i", "1")));
    assert_eq!(iter.next(), Some(("j", "2")));
    assert_eq!(iter.next(), None);

    assert_eq!(doc.find_tag("a").attribute("i"), Some("1"));
    assert_eq!(doc.find_tag("a").attribute("j"), Some("2"));
    assert_eq!(doc.find_tag("a").attribute("k"), None);
    assert_eq!(doc.find_tag("b").attribute("i"), Some("<\"'>"));

    let node = doc.node(a).unwrap();
    assert_eq!(node.attributes().len(), 2);
    assert_eq!(node.attributes()[1].name(), "j");
    assert_eq!(node.attributes()[1].value(), "2");
}

#[test]
fn unknown_nodes() {
    let mut doc = Document::new("a");
    let err = doc.insert_tag(NodeId::new(7), "b").unwrap_err();
    assert_eq!(err, XmlError::input(UNKNOWN_NODE));
    assert!(doc.insert_attribute(NodeId::new(1), "x", "y").is_err());
    assert!(doc.insert_content(NodeId::new(1), "x").is_err());
    assert!(doc.cursor(NodeId::new(1)).is_null());
    assert_eq!(doc.len(), 1);
}

#[test]
fn linking() {
    let doc = Document::from_str("<foo><bar></bar></foo>").unwrap();
    assert_eq!(doc.len(), 2);
    let foo = &doc.nodes()[0];
    let bar = &doc.nodes()[1];
    assert_eq!(foo.name(), "foo");
    assert_eq!(foo.depth(), 0);
    assert_eq!(foo.first_child(), Some(NodeId::new(1)));
    assert!(foo.attributes().is_empty());
    assert!(foo.contents().is_empty());
    assert_eq!(bar.name(), "bar");
    assert_eq!(bar.depth(), 1);
    assert_eq!(bar.parent(), Some(NodeId::ROOT));
    assert!(bar.attributes().is_empty());
    assert!(bar.contents().is_empty());

    // siblings are only linked under the same parent
    let doc = Document::from_str("<r><a><x/></a><b><y/><z/></b></r>").unwrap();
    let names: Vec<&str> = doc.nodes().iter().map(Node::name).collect();
    assert_eq!(names, ["r", "a", "x", "b", "y", "z"]);
    let a = &doc.nodes()[1];
    let x = &doc.nodes()[2];
    let y = &doc.nodes()[4];
    let z = &doc.nodes()[5];
    assert_eq!(a.next_sibling(), Some(NodeId::new(3)));
    assert_eq!(x.next_sibling(), None);
    assert_eq!(x.previous_sibling(), None);
    assert_eq!(y.previous_sibling(), None);
    assert_eq!(y.next_sibling(), Some(NodeId::new(5)));
    assert_eq!(z.previous_sibling(), Some(NodeId::new(4)));
    assert_eq!(z.parent(), Some(NodeId::new(3)));

    for node in doc.nodes() {
        match node.parent() {
            None => assert_eq!(node.depth(), 0),
            Some(parent) => assert_eq!(node.depth(), doc.node(parent).unwrap().depth() + 1),
        }
    }
}

#[test]
fn contents() {
    let doc = Document::from_str("<foo>a&amp;b</foo>").unwrap();
    assert_eq!(doc.root().contents(), ["a&b"]);

    let doc = Document::from_str("<a> x <b>in</b>\n y <c/> z </a>").unwrap();
    assert_eq!(doc.root().contents(), ["x", "y", "z"]);
    assert_eq!(doc.root().content(1), Some("y"));
    assert_eq!(doc.root().content(3), None);
    assert_eq!(doc.find_tag("b").contents(), ["in"]);
    check_doc_xml(&doc, "<a>x<b>in</b>y<c/>z</a>");
}

#[test]
fn navigation() {
    let doc = Document::from_str("<a><b>123<c/>456</b><d/><e x='1' y='2'> lala<f/></e>789</a>")
        .unwrap();
    assert_eq!(doc.root().first_child().first_child().to_string(), "<c/>");
    assert_eq!(doc.root().first_child().next().to_string(), "<d/>");
    assert_eq!(doc.root().first_child().contents(), ["123", "456"]);
    assert_eq!(doc.root().last_child().to_string(), "<e x=\"1\" y=\"2\">lala<f/></e>");
    assert_eq!(doc.root().last_child().previous().previous().name(), "b");
    assert_eq!(doc.root().last_child().first_child().name(), "f");
    assert_eq!(
        doc.first_child()
            .first_child()
            .parent()
            .next()
            .next()
            .find_tag("f")
            .root()
            .find_tag("e")
            .attribute("y"),
        Some("2")
    );
    assert_eq!(doc.find_tag("e").depth(), 1);
    assert_eq!(doc.find_tag("e").first_child().depth(), 2);
    assert_eq!(doc.find_tag("e").id(), Some(NodeId::new(4)));
    assert_eq!(doc.find_tag("e").first_child().root(), doc.root());
}

#[test]
fn serialize_subset() {
    let doc = Document::from_str("<a><b>lala</b><c>bibi</c><d><e>123</e></d></a>").unwrap();
    assert_eq!(doc.first_child().to_string(), "<b>lala</b>");
    assert_eq!(doc.find_tag("c").to_string(), "<c>bibi</c>");
    assert_eq!(doc.find_tag("d").to_string(), "<d><e>123</e></d>");
    assert_eq!(doc.find_tag("d").first_child().to_string(), "<e>123</e>");
}

#[test]
fn escaped_display() {
    let doc = Document::from_str("<a t='&lt;&amp;'>x &gt; y<![CDATA[<&>]]></a>").unwrap();
    check_doc_xml(&doc, "<a t=\"&lt;&amp;\">x &gt; y&lt;&amp;&gt;</a>");
}

#[test]
fn cursor_copy() {
    let doc = Document::from_str("<a><b>lala</b><c>bibi</c><d><e>123</e></d></a>").unwrap();

    let c4: Cursor;
    {
        let c1 = doc.root();
        c4 = c1;
        let c2 = c1.find_tag("d").first_child();
        assert_eq!(c2.contents(), ["123"]);
        let c3 = c1.find_tag("b");
        assert_eq!(c3.contents(), ["lala"]);
    }
    assert_eq!(c4.find_tag("c").contents(), ["bibi"]);
}

#[test]
fn iterators() {
    let doc = Document::from_str("<a>lala<b><c>bibi</c><d><e>123</e></d>456</b>foo</a>").unwrap();

    let names: Vec<&str> = doc
        .find_tag("b")
        .descendant_or_self()
        .map(|c| c.name())
        .collect();
    assert_eq!(names, ["b", "c", "d", "e"]);

    let names: Vec<&str> = doc.root().descendant_or_self().map(|c| c.name()).collect();
    assert_eq!(names, ["a", "b", "c", "d", "e"]);

    let mut iter = doc.find_tag("b").children();
    assert_eq!(iter.next().unwrap().name(), "c");
    assert_eq!(iter.next().unwrap().name(), "d");
    assert!(iter.next().is_none());

    let mut iter = doc.find_tag("b").find_tag("d").descendant_or_self();
    assert_eq!(iter.next().unwrap().name(), "d");
    assert_eq!(iter.next().unwrap().name(), "e");
    assert!(iter.next().is_none());
}

#[test]
fn deep_tree() {
    let depth = 100_000;
    let xml = format!("{}{}", "<n>".repeat(depth), "</n>".repeat(depth));
    let doc = Document::from_str(&xml).unwrap();
    assert_eq!(doc.len(), depth);
    assert_eq!(doc.nodes()[depth - 1].depth(), depth - 1);
    assert_eq!(doc.to_string().len(), depth * 7 - 3);
    assert_eq!(doc.root().descendant_or_self().count(), depth);
}

#[test]
fn null_checks() {
    let doc = Document::new("a");

    // property
    assert!(doc.root().next().is_null());
    assert_eq!(doc.root().next().name(), "");
    assert_eq!(doc.root().next().depth(), 0);
    assert_eq!(doc.root().next().attribute("lala"), None);
    assert!(doc.root().next().contents().is_empty());
    assert_eq!(doc.root().next().content(0), None);
    assert_eq!(doc.root().next().id(), None);
    assert!(doc.root().next().node().is_none());
    assert_eq!(doc.root().next().to_string(), "");
    // navigation
    assert!(doc.root().next().next().is_null());
    assert!(doc.root().next().previous().is_null());
    assert!(doc.root().next().first_child().is_null());
    assert!(doc.root().next().last_child().is_null());
    assert!(doc.root().next().parent().is_null());
    assert!(doc.root().next().root().is_null());
    assert!(doc.root().next().find_tag("lala").is_null());
    // iterators
    assert!(doc.root().next().children().next().is_none());
    assert!(doc.root().next().descendant_or_self().next().is_none());
    assert!(doc.root().next().attributes().next().is_none());

    let empty = Document::empty();
    assert!(empty.root().is_null());
    assert_eq!(empty.to_string(), "");
}

#[test]
fn status_messages() {
    let mut parser = DocumentParser::new();
    let doc = parser.parse(&mut StrSource::with_name("inline.xml", "<a/>"));
    assert!(doc.is_success());
    assert_eq!(doc.message(), "The input 'inline.xml' has been successfully parsed.");
    assert!(doc.result().is_ok());

    let doc = parser.parse_str("<a><b></a>");
    assert_eq!(doc.status(), Status::SyntaxFailure);
    assert_eq!(
        doc.message(),
        "The end tag '</a>' does not match the start tag '<b>'."
    );
    // partial tree stays inspectable
    assert_eq!(doc.len(), 2);
    assert_eq!(parser.location().chars, 9);

    let mut long = String::from("<a>");
    long.push_str(&"&amp;".repeat(10));
    long.push('<');
    let doc = parser.parse_str(&long);
    assert_eq!(doc.status(), Status::SyntaxFailure);

    let mut doc = Document::new("a");
    doc.set_status(Status::InputFailure, &"x".repeat(500));
    assert_eq!(doc.message().chars().count(), MAX_MESSAGE_LENGTH);
    assert_eq!(
        doc.result(),
        Err(XmlError::InputFailure("x".repeat(MAX_MESSAGE_LENGTH).into()))
    );
}

#[test]
fn bad_doc_parser() {
    assert_eq!(
        syntax_failure("<a>lala</b>"),
        "The end tag '</b>' does not match the start tag '<a>'."
    );
    assert_eq!(
        syntax_failure("<a><b><c/></d></a>"),
        tag_mismatch("d", "b")
    );
    assert_eq!(
        syntax_failure("<a><b><c/></b><d></d><e></e2></a>"),
        tag_mismatch("e2", "e")
    );
    assert_eq!(
        syntax_failure("<foo bar=\"1\" bar=\"2\"/>"),
        sax::ATTRIBUTE_DUPLICATE
    );
    assert_eq!(syntax_failure("<a/><b/>"), sax::MULTIPLE_ROOTS);
    assert_eq!(syntax_failure("<xml-root/>"), sax::TAG_NAME_RESERVED);
    assert_eq!(syntax_failure("<Xml/>"), sax::TAG_NAME_RESERVED);
    assert_eq!(syntax_failure("<XML/>"), sax::TAG_NAME_RESERVED);
    assert_eq!(syntax_failure("<xmlfoo/>"), sax::TAG_NAME_RESERVED);
    assert_eq!(syntax_failure("<!-- never closed"), sax::COMMENT_UNTERMINATED);
    assert_eq!(syntax_failure("<a><![CDATA[never closed"), sax::CDATA_UNTERMINATED);
    assert_eq!(syntax_failure("<a>&unknown;</a>"), sax::PCDATA_AMP);
    assert_eq!(syntax_failure("<a>&#1200000;</a>"), sax::PCDATA_AMP);

    assert_eq!(
        Document::from_str("<a><b>").unwrap_err(),
        XmlError::SyntaxFailure(sax::open_tags(2).into())
    );
}

#[test]
fn reader_source() {
    let bytes = "<a>ğü€😀</a>".as_bytes();
    let mut source = ReaderSource::new("bytes", IoCursor::new(bytes)).with_len(bytes.len());
    assert_eq!(source.len_hint(), Some(bytes.len()));
    let doc = DocumentParser::new().parse(&mut source);
    assert!(doc.is_success());
    assert_eq!(doc.root().contents(), ["ğü€😀"]);

    for bad in [
        &b"<test>\xFF</test>"[..],
        b"<test>\xC0\x80</test>",
        b"<test>\xe3\x8fa</test>",
        b"<test>\xed\xa0\x80</test>",
        b"<test>\xe2\x82",
    ] {
        let mut source = ReaderSource::new("bytes", IoCursor::new(bad));
        let doc = DocumentParser::new().parse(&mut source);
        assert_eq!(doc.status(), Status::InputFailure);
        assert_eq!(doc.message(), read_failure("bytes"));
    }
}

#[test]
fn files() {
    let mut parser = DocumentParser::new();

    let doc = parser.parse_file("");
    assert_eq!(doc.status(), Status::InputFailure);
    assert_eq!(doc.message(), NO_INPUT);
    assert!(doc.is_empty());

    let doc = parser.parse_file("/nonexistent/dir/file.xml");
    assert_eq!(doc.status(), Status::InputFailure);
    assert_eq!(
        doc.message(),
        "The file path '/nonexistent/dir/file.xml' does not exist."
    );

    let path = std::env::temp_dir().join(format!("xstree-doc-{}.xml", std::process::id()));
    std::fs::write(&path, "<?xml version='1.0'?>\n<a>\n  <b>text</b>\n</a>\n").unwrap();
    let doc = parser.parse_file(&path);
    std::fs::remove_file(&path).unwrap();
    assert!(doc.is_success(), "{}", doc.message());
    assert_eq!(doc.message(), parsed(&path.display().to_string()));
    assert_eq!(doc.find_tag("b").contents(), ["text"]);
    assert_eq!(parser.location().lines, 4);
}
