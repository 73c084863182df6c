//! Recursive-descent parser for GON objects.
//!
//! ```text
//! object           := NAME class-tag? attr-shorthand? body-or-terminal
//! class-tag        := '[' NAME ']'
//! attr-shorthand   := '=' value
//! body-or-terminal := ';' | '{' object* '}' | ':' value ';'
//!                   | (flag | attribute)* body-or-terminal
//! flag             := '-' '!'? NAME
//! attribute        := NAME '=' value
//! ```
//!
//! Every `next_*` operation is public so the grammar can be driven piecewise
//! when GON is embedded in a larger format. The first error aborts the parse;
//! there is no recovery.

use crate::error::{GonError, Result};
use crate::literal;
use crate::object::{Attributes, Object};
use crate::source::{CharSource, ReadSource, StrSource};
use crate::token::Token;
use crate::tokenizer::{Tokenizer, ValueStart};
use crate::value::Value;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Tokens accepted where an object continues or terminates.
const OBJECT_CONTINUATIONS: &str = "';', '{', ':', '-', attribute name";

/// A GON parser over any [`CharSource`].
#[derive(Debug)]
pub struct Parser<S> {
    tokenizer: Tokenizer<S>,
}

impl<'a> Parser<StrSource<'a>> {
    /// A parser over in-memory text.
    pub fn from_text(text: &'a str) -> Self {
        Self::new(StrSource::new(text))
    }
}

impl<R: Read> Parser<ReadSource<R>> {
    /// A parser over a UTF-8 byte stream.
    pub fn from_reader(reader: R) -> Self {
        Self::new(ReadSource::new(reader))
    }
}

impl Parser<ReadSource<File>> {
    /// A parser over the file at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::from_reader(File::open(path)?))
    }
}

impl<S: CharSource> Parser<S> {
    pub fn new(source: S) -> Self {
        Self {
            tokenizer: Tokenizer::new(source),
        }
    }

    /// Token-level access for manual consumption.
    pub fn tokenizer(&mut self) -> &mut Tokenizer<S> {
        &mut self.tokenizer
    }

    /// Parse one object, recursing into its body.
    pub fn next_object(&mut self) -> Result<Object> {
        // Skip leading whitespace and comments before the name.
        self.tokenizer.peek_token()?;
        let mut name = non_empty(self.tokenizer.next_name()?);
        let mut class_tag = None;
        let mut attributes = Attributes::new();

        match self.tokenizer.peek_token()? {
            Token::ClassOpener => class_tag = non_empty(self.next_class()?),
            Token::AttributeAssigner => {
                // `key=value` shorthand: the name was really an attribute key.
                self.tokenizer.consume_token(Token::AttributeAssigner)?;
                let value = self.next_value()?;
                attributes.insert(name.take().unwrap_or_default(), value);
            }
            _ => {}
        }

        loop {
            match self.tokenizer.peek_token()? {
                Token::Breakpoint => {
                    self.tokenizer.consume_token(Token::Breakpoint)?;
                    return Ok(finish(Object::empty(name, class_tag, attributes)));
                }
                Token::BodyOpener => {
                    let mut children = Vec::new();
                    for child in self.next_body()? {
                        if child.is_bare_attributes() {
                            attributes.extend(child.into_attributes());
                        } else {
                            children.push(child);
                        }
                    }
                    let object = Object::nested(name, class_tag, attributes, children)?;
                    return Ok(finish(object));
                }
                Token::ValueOpener => {
                    self.tokenizer.consume_token(Token::ValueOpener)?;
                    let value = self.next_value()?;
                    self.tokenizer.consume_token(Token::Breakpoint)?;
                    let object = Object::single_value(name, class_tag, attributes, value);
                    return Ok(finish(object));
                }
                Token::FlagStart => {
                    let (key, value) = self.next_flag()?;
                    attributes.insert(key, value);
                }
                Token::Unknown => {
                    let (key, value) = self.next_attribute()?;
                    attributes.insert(key, value);
                }
                _ => {
                    return Err(GonError::UnexpectedToken {
                        expected: OBJECT_CONTINUATIONS.to_string(),
                        found: self.tokenizer.peek_char()?,
                    })
                }
            }
        }
    }

    /// Parse `'{' object* '}'` and return the raw children.
    pub fn next_body(&mut self) -> Result<Vec<Object>> {
        self.tokenizer.consume_token(Token::BodyOpener)?;
        let mut children = Vec::new();
        while self.tokenizer.peek_token()? != Token::BodyCloser {
            children.push(self.next_object()?);
        }
        self.tokenizer.consume_token(Token::BodyCloser)?;
        Ok(children)
    }

    /// Parse `'[' NAME ']'`.
    pub fn next_class(&mut self) -> Result<String> {
        self.tokenizer.consume_token(Token::ClassOpener)?;
        let class_tag = self.tokenizer.next_name()?;
        self.tokenizer.consume_token(Token::ClassCloser)?;
        Ok(class_tag)
    }

    /// Parse `NAME '=' value`.
    pub fn next_attribute(&mut self) -> Result<(String, Value)> {
        self.tokenizer.peek_token()?;
        let key = self.tokenizer.next_name()?;
        self.tokenizer.consume_token(Token::AttributeAssigner)?;
        let value = self.next_value()?;
        Ok((key, value))
    }

    /// Parse `'-' '!'? NAME` into a boolean attribute.
    pub fn next_flag(&mut self) -> Result<(String, Value)> {
        self.tokenizer.consume_token(Token::FlagStart)?;
        let mut value = true;
        if self.tokenizer.peek_token()? == Token::FlagNegator {
            self.tokenizer.consume_token(Token::FlagNegator)?;
            value = false;
        }
        let key = self.tokenizer.next_name()?;
        Ok((key, Value::Bool(value)))
    }

    /// Parse a quoted string or an unquoted literal.
    ///
    /// A `#` directly followed by a hex digit starts a hex literal. Any other
    /// `#` before the value starts a comment.
    pub fn next_value(&mut self) -> Result<Value> {
        let raw = match self.tokenizer.skip_to_value()? {
            ValueStart::Quote => return Ok(Value::String(self.tokenizer.next_string()?)),
            ValueStart::HexMarker => format!("#{}", self.tokenizer.next_value_string()?),
            ValueStart::Bare => self.tokenizer.next_value_string()?,
        };
        literal::classify(&raw)
    }

    /// Parse one object followed by nothing but whitespace and comments.
    pub fn parse_document(&mut self) -> Result<Object> {
        let object = self.next_object()?;
        self.expect_end()?;
        Ok(object)
    }

    /// Parse top-level objects until the end of input.
    pub fn parse_forest(&mut self) -> Result<Vec<Object>> {
        let mut objects = Vec::new();
        while self.tokenizer.peek_token()? != Token::EndOfInput {
            objects.push(self.next_object()?);
        }
        Ok(objects)
    }

    fn expect_end(&mut self) -> Result<()> {
        match self.tokenizer.peek_char()? {
            None => Ok(()),
            found => Err(GonError::UnexpectedToken {
                expected: Token::EndOfInput.to_string(),
                found,
            }),
        }
    }

    /// Close the underlying source. Safe to call more than once.
    pub fn close(&mut self) -> Result<()> {
        self.tokenizer.close()
    }

    /// Run `step` and close the source afterwards, whatever the outcome.
    /// A parse error takes precedence over an error while closing.
    pub fn run<T>(mut self, step: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let result = step(&mut self);
        let closed = self.close();
        let value = result?;
        closed?;
        Ok(value)
    }
}

fn non_empty(s: String) -> Option<String> {
    (!s.is_empty()).then_some(s)
}

fn finish(object: Object) -> Object {
    debug!(
        name = object.name().unwrap_or("<anonymous>"),
        class = object.class_tag(),
        attributes = object.attributes().len(),
        children = object.children().len(),
        "parsed object"
    );
    object
}
