//! `gon` CLI: parse, check, and query GON documents from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # Parse a document (stdin → stdout) and print the tree as JSON
//! echo 'root{ count=3; child; }' | gon parse
//!
//! # Parse every top-level object of a file, compact output to a file
//! gon parse --forest --compact -i app.gon -o app.json
//!
//! # Validate a document
//! gon check -i app.gon
//!
//! # Query the root's children
//! gon query -i app.gon --class Service --attr enabled=true
//! gon query -i app.gon --match 'db[0-9]+' --class Cache --first
//! ```
//!
//! Logging goes to stderr. Set `GON_LOG` (e.g. `GON_LOG=gon_core=trace`) or
//! pass `-v`/`-vv`/`-vvv` to see what the parser is doing.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use gon_core::{Object, ReadSource, Value};
use std::fs::File;
use std::io::{self, Read};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gon", version, about = "GON object notation CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a GON document and print it as JSON
    Parse {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Parse every top-level object instead of exactly one
        #[arg(long)]
        forest: bool,
        /// Print compact JSON instead of pretty-printed JSON
        #[arg(long)]
        compact: bool,
    },
    /// Check that a GON document parses
    Check {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
    /// Filter the children of the root object
    Query {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Look up the child with exactly this name
        #[arg(long)]
        key: Option<String>,
        /// Keep children whose whole name matches this regex
        #[arg(long = "match")]
        pattern: Option<String>,
        /// Keep children with this class tag
        #[arg(long)]
        class: Option<String>,
        /// Keep children with attribute KEY, or with KEY equal to VALUE (KEY=VALUE)
        #[arg(long = "attr")]
        attributes: Vec<String>,
        /// Print only the first match
        #[arg(long, conflicts_with = "position")]
        first: bool,
        /// Print the child at this index if it matches
        #[arg(long)]
        position: Option<usize>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Parse {
            input,
            output,
            forest,
            compact,
        } => {
            let parser = open_parser(input.as_deref())?;
            let json = if forest {
                let objects = parser
                    .run(gon_core::Parser::parse_forest)
                    .context("Failed to parse GON document")?;
                info!(objects = objects.len(), "parsed forest");
                to_json(&objects, compact)?
            } else {
                let object = parser
                    .run(gon_core::Parser::parse_document)
                    .context("Failed to parse GON document")?;
                to_json(&object, compact)?
            };
            write_output(output.as_deref(), &json)?;
        }
        Commands::Check { input } => {
            open_parser(input.as_deref())?
                .run(gon_core::Parser::parse_document)
                .context("Invalid GON document")?;
            println!("ok");
        }
        Commands::Query {
            input,
            key,
            pattern,
            class,
            attributes,
            first,
            position,
        } => {
            let root = open_parser(input.as_deref())?
                .run(gon_core::Parser::parse_document)
                .context("Failed to parse GON document")?;
            let clauses = QueryClauses {
                pattern,
                class,
                attributes,
            };
            let matches = run_query(&root, &clauses, key.as_deref(), first, position)?;
            info!(matches = matches.len(), "query finished");
            println!("{}", to_json(&matches, false)?);
        }
    }

    Ok(())
}

/// Install a stderr subscriber. `GON_LOG` wins over `-v`.
fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_env("GON_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

type InputParser = gon_core::Parser<ReadSource<Box<dyn Read>>>;

fn open_parser(path: Option<&str>) -> Result<InputParser> {
    let reader: Box<dyn Read> = match path {
        Some(path) => {
            debug!(path, "opening input");
            Box::new(File::open(path).with_context(|| format!("Failed to read file: {}", path))?)
        }
        None => Box::new(io::stdin()),
    };
    Ok(gon_core::Parser::from_reader(reader))
}

/// Filter clauses shared by every terminal query operation.
struct QueryClauses {
    pattern: Option<String>,
    class: Option<String>,
    attributes: Vec<String>,
}

fn run_query<'a>(
    root: &'a Object,
    clauses: &QueryClauses,
    key: Option<&str>,
    first: bool,
    position: Option<usize>,
) -> Result<Vec<&'a Object>> {
    let Some(nested) = root.as_nested() else {
        bail!("The root object has no body to query");
    };

    let mut query = nested.query();
    if let Some(pattern) = &clauses.pattern {
        query = query
            .match_key(pattern)
            .with_context(|| format!("Invalid --match pattern: '{}'", pattern))?;
    }
    if let Some(class) = &clauses.class {
        query = query.with_class(class);
    }
    for clause in &clauses.attributes {
        query = match clause.split_once('=') {
            Some((attr, raw)) => {
                let value = parse_attribute_value(raw)?;
                query.with_attribute_value(attr, value)
            }
            None => query.with_attribute(clause),
        };
    }

    let matches = if let Some(key) = key {
        query.by_key(key).into_iter().collect()
    } else if let Some(position) = position {
        query.at_position(position).into_iter().collect()
    } else if first {
        query.first().into_iter().collect()
    } else {
        query.all()
    };
    Ok(matches)
}

fn parse_attribute_value(raw: &str) -> Result<Value> {
    gon_core::parse_value(raw).with_context(|| format!("Invalid attribute value: '{}'", raw))
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T, compact: bool) -> Result<String> {
    let json = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    Ok(json)
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
