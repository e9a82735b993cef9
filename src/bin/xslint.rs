/*
** This file is a part of Xstree (small XML tree parser and compiler)
** Copyright (C) 2000-2025 Gurer Ozen
**
** Xstree is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

use std::collections::BTreeMap;
use std::io::stdin;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use anyhow::bail;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use xstree::Compiler;
use xstree::Document;
use xstree::DocumentParser;
use xstree::Escaping;
use xstree::MAX_INDENTATION;
use xstree::MAX_VERTICAL_SPACING;
use xstree::ReaderSource;
use xstree::Location;
use xstree::Status;
use xstree::XmlError;

/// Checks the well-formedness of XML documents.
#[derive(Debug, Parser)]
#[command(name = "xslint", version, after_help = "Reads stdin when no file is given.")]
struct Args {
    /// Files to check
    #[arg(value_name = "FILE.xml")]
    files: Vec<PathBuf>,

    /// Overall statistics
    #[arg(short, long)]
    stat: bool,

    /// Tag counts
    #[arg(short, long)]
    count: bool,

    /// Print the compiled document
    #[arg(short = 'p', long)]
    compile: bool,

    /// Spaces per nesting level in the compiled output
    #[arg(short, long, default_value_t = 4)]
    indent: usize,

    /// Blank lines between the lines of the compiled output
    #[arg(short = 'l', long, default_value_t = 0)]
    spacing: usize,

    /// Write attribute values and text verbatim, without escaping
    #[arg(long)]
    verbatim: bool,
}

#[derive(Default)]
struct Stats {
    nr_tags: usize,
    nr_empty_tags: usize,
    max_depth: usize,
    nr_attributes: usize,
    text_size: usize,
    tag_map: BTreeMap<String, usize>,
}

impl Stats {
    fn collect(doc: &Document) -> Stats {
        let mut stats = Stats::default();
        for node in doc.nodes() {
            stats.nr_tags += 1;
            if node.is_empty_element() {
                stats.nr_empty_tags += 1;
            }
            stats.max_depth = stats.max_depth.max(node.depth() + 1);
            stats.nr_attributes += node.attributes().len();
            stats.text_size += node.contents().iter().map(String::len).sum::<usize>();
            *stats.tag_map.entry(node.name().to_string()).or_insert(0) += 1;
        }
        stats
    }

    fn report(&self, do_stats: bool, do_tag_count: bool) {
        if do_stats {
            println!(
                "Tags: {}, empty element tags: {}, attributes: {}, max depth: {}",
                self.nr_tags, self.nr_empty_tags, self.nr_attributes, self.max_depth
            );
            println!("Total size of character data: {} bytes.", self.text_size);
        }
        if do_tag_count {
            println!("Tag counts:");
            for (tag, count) in &self.tag_map {
                println!("  {}: {}", tag, count);
            }
        }
    }
}

/// The parser location only means something for syntax failures.
fn error_report(name: &str, err: &XmlError, location: Location) -> String {
    match err.status() {
        Status::SyntaxFailure => format!(
            "Error in '{}' at line {} column {}: {}",
            name,
            location.lines + 1,
            location.column,
            err
        ),
        _ => format!("Cannot read '{}': {}", name, err),
    }
}

struct Linter {
    parser: DocumentParser,
    compiler: Option<Compiler>,
    do_stats: bool,
    do_tag_count: bool,
}

impl Linter {
    fn new(args: &Args) -> Result<Linter> {
        if args.indent > MAX_INDENTATION {
            bail!("indentation cannot be more than {} spaces", MAX_INDENTATION);
        }
        if args.spacing > MAX_VERTICAL_SPACING {
            bail!("spacing cannot be more than {} lines", MAX_VERTICAL_SPACING);
        }
        let compiler = args.compile.then(|| {
            let escaping = if args.verbatim {
                Escaping::Verbatim
            } else {
                Escaping::Escape
            };
            Compiler::new()
                .indentation(args.indent)
                .vertical_spacing(args.spacing)
                .escaping(escaping)
        });
        Ok(Linter {
            parser: DocumentParser::new(),
            compiler,
            do_stats: args.stat,
            do_tag_count: args.count,
        })
    }

    fn lint(&mut self, name: &str, doc: &Document) -> bool {
        if let Err(err) = doc.result() {
            eprintln!("{}", error_report(name, &err, self.parser.location()));
            return false;
        }

        Stats::collect(doc).report(self.do_stats, self.do_tag_count);

        if let Some(compiler) = &self.compiler {
            match compiler.compile(doc) {
                Ok(text) => print!("{}", text),
                Err(err) => {
                    eprintln!("Cannot compile '{}': {}", name, err);
                    return false;
                }
            }
        }
        true
    }

    fn lint_stdin(&mut self) -> bool {
        let mut source = ReaderSource::new("stdin", stdin().lock());
        let doc = self.parser.parse(&mut source);
        self.lint("stdin", &doc)
    }

    fn lint_file(&mut self, path: &Path) -> bool {
        let doc = self.parser.parse_file(path);
        self.lint(&path.display().to_string(), &doc)
    }
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let mut linter = Linter::new(&args)?;

    if args.files.is_empty() {
        if !linter.lint_stdin() {
            return Ok(ExitCode::FAILURE);
        }
    } else {
        for file in &args.files {
            if !linter.lint_file(file) {
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
