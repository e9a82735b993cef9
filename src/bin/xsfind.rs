/*
** This file is a part of Xstree (small XML tree parser and compiler)
** Copyright (C) 2000-2025 Gurer Ozen
**
** Xstree is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

use std::io::stdin;
use std::path::Path;
use std::path::PathBuf;

use anyhow::Context;
use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use xstree::Direction;
use xstree::Document;
use xstree::DocumentParser;
use xstree::Query;
use xstree::ReaderSource;

/// Finds the nodes of an XML document matching all given criteria.
#[derive(Debug, Parser)]
#[command(name = "xsfind", version, after_help = "Reads stdin when no file is given.")]
struct Args {
    /// Tag name of the node
    #[arg(short, long)]
    tag: Option<String>,

    /// Name of an attribute of the node
    #[arg(short, long)]
    attribute: Option<String>,

    /// Value of an attribute of the node
    #[arg(short = 'v', long)]
    value: Option<String>,

    /// Text which appears in the content of the node
    #[arg(short, long)]
    content: Option<String>,

    /// Scan the document from the last node to the first
    #[arg(short, long)]
    backward: bool,

    /// Do not put the root node at the start of the result
    #[arg(short = 'n', long)]
    no_root: bool,

    /// Print each match as XML instead of its index
    #[arg(short = 'x', long)]
    xml: bool,

    /// XML file to search
    #[arg(value_name = "FILE.xml")]
    file: Option<PathBuf>,
}

impl Args {
    fn query(&self) -> Query {
        let mut query = Query::new();
        if let Some(tag) = &self.tag {
            query = query.tag_name(tag);
        }
        if let Some(name) = &self.attribute {
            query = query.attribute_name(name);
        }
        if let Some(value) = &self.value {
            query = query.attribute_value(value);
        }
        if let Some(content) = &self.content {
            query = query.content(content);
        }
        let direction = if self.backward {
            Direction::Backward
        } else {
            Direction::Forward
        };
        query.direction(direction).leading_root(!self.no_root)
    }
}

fn load(file: Option<&Path>) -> Result<Document> {
    let mut parser = DocumentParser::new();
    let doc = match file {
        Some(path) => parser.parse_file(path),
        None => parser.parse(&mut ReaderSource::new("stdin", stdin().lock())),
    };
    doc.result()
        .with_context(|| format!("cannot load document ({})", parser.location()))?;
    Ok(doc)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let doc = load(args.file.as_deref())?;

    for id in args.query().find(&doc) {
        if args.xml {
            println!("{}", doc.cursor(id));
        } else {
            println!("{}", id.index());
        }
    }

    Ok(())
}
