//! Tokenizer: structural tokens plus identifier and literal scanning.
//!
//! Whitespace (anything `char::is_whitespace` accepts) and line comments
//! (`#` up to and including the next `\n`) are skipped transparently before
//! every token. Because skipping only consumes characters it has already
//! classified as insignificant, peeking twice in a row is idempotent.

use crate::error::{GonError, Result};
use crate::source::{CharSource, PeekReader};
use crate::token::Token;
use tracing::trace;

/// How a value begins, as reported by [`Tokenizer::skip_to_value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueStart {
    /// A `"` opens a quoted string. Not consumed.
    Quote,
    /// A `#` followed by a hex digit. The `#` has been consumed.
    HexMarker,
    /// Anything else, end of input included. Nothing consumed.
    Bare,
}

/// Token-level view over a [`PeekReader`].
#[derive(Debug)]
pub struct Tokenizer<S> {
    reader: PeekReader<S>,
}

impl<S: CharSource> Tokenizer<S> {
    pub fn new(source: S) -> Self {
        Self {
            reader: PeekReader::new(source),
        }
    }

    /// Classify the next significant character without consuming it.
    pub fn peek_token(&mut self) -> Result<Token> {
        Ok(Token::classify(self.peek_char()?))
    }

    /// Consume the next significant character and classify it.
    pub fn next_token(&mut self) -> Result<Token> {
        let token = Token::classify(self.next_char()?);
        trace!("token {}", token);
        Ok(token)
    }

    /// The raw character behind [`Tokenizer::peek_token`].
    pub fn peek_char(&mut self) -> Result<Option<char>> {
        self.skip_insignificant()?;
        self.reader.peek()
    }

    fn next_char(&mut self) -> Result<Option<char>> {
        self.skip_insignificant()?;
        self.reader.read()
    }

    /// Consume the next token, failing unless it is `expected`.
    pub fn consume_token(&mut self, expected: Token) -> Result<()> {
        let found = self.next_char()?;
        if Token::classify(found) != expected {
            return Err(GonError::UnexpectedToken {
                expected: expected.to_string(),
                found,
            });
        }
        Ok(())
    }

    /// Skip whitespace but not comments, and peek at what follows.
    pub fn skip_whitespace(&mut self) -> Result<Option<char>> {
        loop {
            match self.reader.peek()? {
                Some(c) if c.is_whitespace() => {
                    self.reader.read()?;
                }
                next => return Ok(next),
            }
        }
    }

    /// Skip whitespace and comments ahead of a value and report how it starts.
    ///
    /// A `#` directly followed by a hex digit opens a hex literal and is
    /// consumed. Any other `#` opens a comment.
    pub fn skip_to_value(&mut self) -> Result<ValueStart> {
        loop {
            match self.skip_whitespace()? {
                Some('"') => return Ok(ValueStart::Quote),
                Some('#') => {
                    self.reader.read()?;
                    match self.reader.peek()? {
                        Some(c) if c.is_ascii_hexdigit() => return Ok(ValueStart::HexMarker),
                        _ => self.skip_line()?,
                    }
                }
                _ => return Ok(ValueStart::Bare),
            }
        }
    }

    fn skip_insignificant(&mut self) -> Result<()> {
        loop {
            match self.reader.peek()? {
                Some(c) if c.is_whitespace() => {
                    self.reader.read()?;
                }
                Some('#') => self.skip_comment()?,
                _ => return Ok(()),
            }
        }
    }

    /// Consume a comment through the end of its line.
    fn skip_comment(&mut self) -> Result<()> {
        self.reader.read()?;
        self.skip_line()
    }

    fn skip_line(&mut self) -> Result<()> {
        while let Some(c) = self.reader.read()? {
            if c == '\n' {
                break;
            }
        }
        Ok(())
    }

    /// Consume characters while `accept` holds for them.
    fn take_while(&mut self, mut accept: impl FnMut(char, &str) -> bool) -> Result<String> {
        let mut out = String::new();
        while let Some(c) = self.reader.peek()? {
            if !accept(c, &out) {
                break;
            }
            out.push(c);
            self.reader.read()?;
        }
        Ok(out)
    }

    /// A maximal run of letters and digits. Empty means anonymous.
    pub fn next_name(&mut self) -> Result<String> {
        let name = self.take_while(|c, _| c.is_alphanumeric())?;
        trace!(%name, "name");
        Ok(name)
    }

    /// A maximal run of letters, digits, `.` and `-`. A leading `+` is
    /// accepted, and so is a `#` that is leading or follows the sign, so
    /// signed and `#`-prefixed hex literals scan whole.
    pub fn next_value_string(&mut self) -> Result<String> {
        let raw = self.take_while(|c, sofar| match c {
            '+' => sofar.is_empty(),
            '#' => matches!(sofar, "" | "-" | "+"),
            _ => c.is_alphanumeric() || c == '.' || c == '-',
        })?;
        trace!(%raw, "value string");
        Ok(raw)
    }

    /// A quoted string. A backslash makes the next character literal.
    pub fn next_string(&mut self) -> Result<String> {
        self.consume_token(Token::StringQuote)?;

        let mut out = String::new();
        loop {
            match self.reader.read()? {
                None => return Err(GonError::UnterminatedString(out)),
                Some('\\') => match self.reader.read()? {
                    Some(escaped) => out.push(escaped),
                    None => return Err(GonError::UnterminatedString(out)),
                },
                Some('"') => break,
                Some(c) => out.push(c),
            }
        }
        trace!(string = %out, "quoted string");
        Ok(out)
    }

    pub fn is_open(&self) -> bool {
        self.reader.is_open()
    }

    /// Close the underlying source. Safe to call more than once.
    pub fn close(&mut self) -> Result<()> {
        self.reader.close()
    }
}
