//! # gon-core
//!
//! Pure-Rust parser for **GON**, a compact, human-writable object notation.
//!
//! A GON document is a tree of objects. Each object has an optional name, an
//! optional class tag in brackets, any number of attributes and flags, and then
//! either nothing (`;`), a single scalar (`: value;`), or a body of children
//! (`{ ... }`). `#` starts a comment that runs to the end of the line.
//!
//! ```text
//! server[Http] -tls port=8443 {
//!     # bare key=value lines become attributes of the enclosing object
//!     workers=4;
//!     host: "example.org";
//!     debug;
//! }
//! ```
//!
//! ## Quick start
//!
//! ```rust
//! use gon_core::{parse, Value};
//!
//! let root = parse("root{ count=3; child; size:10; }").unwrap();
//! assert_eq!(root.name(), Some("root"));
//! assert_eq!(root.attribute("count"), Some(&Value::Int(3)));
//!
//! let size = root.query().unwrap().by_key("size").unwrap();
//! assert_eq!(size.value(), Some(&Value::Int(10)));
//! ```
//!
//! ## Modules
//!
//! - [`source`]: character sources and the one-slot lookahead reader
//! - [`token`]: structural token classification
//! - [`tokenizer`]: token peeking/consuming, name/literal/string scanning
//! - [`literal`]: classification of unquoted literals into values
//! - [`value`]: the scalar [`Value`] model
//! - [`object`]: the immutable [`Object`] tree
//! - [`parser`]: the recursive-descent [`Parser`]
//! - [`query`]: chainable filters over a nested object's children
//! - [`error`]: error types

pub mod error;
pub mod literal;
pub mod object;
pub mod parser;
pub mod query;
pub mod source;
pub mod token;
pub mod tokenizer;
pub mod value;

pub use error::{GonError, Result};
pub use object::{Attributes, Body, Nested, Object};
pub use parser::Parser;
pub use query::{Combinator, Predicate, Query};
pub use source::{CharSource, Encoding, PeekReader, ReadSource, StrSource};
pub use token::Token;
pub use tokenizer::{Tokenizer, ValueStart};
pub use value::Value;

use std::io::Read;
use std::path::Path;

/// Parse a document consisting of exactly one object.
///
/// Only whitespace and comments may follow the object.
pub fn parse(text: &str) -> Result<Object> {
    Parser::from_text(text).run(Parser::parse_document)
}

/// Parse every top-level object of a document.
pub fn parse_forest(text: &str) -> Result<Vec<Object>> {
    Parser::from_text(text).run(Parser::parse_forest)
}

/// Parse a byte buffer in the given encoding.
pub fn parse_bytes(bytes: &[u8], encoding: Encoding) -> Result<Object> {
    let text = encoding.decode(bytes)?;
    parse(&text)
}

/// Parse a UTF-8 byte stream. The stream is read lazily, one character at
/// a time, and released when parsing ends.
pub fn parse_reader<R: Read>(reader: R) -> Result<Object> {
    Parser::from_reader(reader).run(Parser::parse_document)
}

/// Parse the file at `path`.
pub fn parse_file(path: impl AsRef<Path>) -> Result<Object> {
    Parser::open(path)?.run(Parser::parse_document)
}

/// Parse a standalone value, e.g. `42`, `#F8D1` or `"text"`.
pub fn parse_value(text: &str) -> Result<Value> {
    Parser::from_text(text).run(|parser| {
        let value = parser.next_value()?;
        match parser.tokenizer().peek_char()? {
            None => Ok(value),
            found => Err(GonError::UnexpectedToken {
                expected: Token::EndOfInput.to_string(),
                found,
            }),
        }
    })
}
