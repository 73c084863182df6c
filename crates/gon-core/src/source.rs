//! Character sources and the single-slot lookahead reader.
//!
//! The parser consumes text one `char` at a time through the [`CharSource`]
//! trait. [`PeekReader`] adds exactly one slot of pushback on top of any
//! source, which is all the lookahead the grammar needs.
//!
//! Two sources are provided:
//!
//! - [`StrSource`] for in-memory text
//! - [`ReadSource`] for byte streams (files, stdin, sockets), decoded as UTF-8
//!
//! Byte buffers in another encoding are decoded up front with [`Encoding`].

use crate::error::{GonError, Result};
use std::io::{self, BufRead, BufReader, Read};
use std::str::Chars;

/// A pull-based source of characters. `None` marks the end of input.
pub trait CharSource {
    /// Consume and return the next character.
    fn read_char(&mut self) -> io::Result<Option<char>>;

    /// Release the underlying resource. Called at most once by [`PeekReader`].
    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// In-memory text.
#[derive(Debug, Clone)]
pub struct StrSource<'a> {
    chars: Chars<'a>,
}

impl<'a> StrSource<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            chars: text.chars(),
        }
    }
}

impl CharSource for StrSource<'_> {
    fn read_char(&mut self) -> io::Result<Option<char>> {
        Ok(self.chars.next())
    }
}

/// A byte stream decoded as UTF-8 one character at a time.
///
/// Malformed UTF-8 surfaces as an [`io::ErrorKind::InvalidData`] error.
#[derive(Debug)]
pub struct ReadSource<R> {
    inner: BufReader<R>,
}

impl<R: Read> ReadSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            inner: BufReader::new(reader),
        }
    }

    /// Read a single byte, or `None` at end of stream.
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        let byte = match self.inner.fill_buf()?.first() {
            Some(&b) => b,
            None => return Ok(None),
        };
        self.inner.consume(1);
        Ok(Some(byte))
    }
}

impl<R: Read> CharSource for ReadSource<R> {
    fn read_char(&mut self) -> io::Result<Option<char>> {
        let lead = match self.read_byte()? {
            Some(b) => b,
            None => return Ok(None),
        };
        let width = utf8_width(lead).ok_or_else(|| invalid_utf8(&[lead]))?;

        let mut buf = [lead, 0, 0, 0];
        for slot in buf.iter_mut().take(width).skip(1) {
            *slot = self
                .read_byte()?
                .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "truncated UTF-8"))?;
        }

        std::str::from_utf8(&buf[..width])
            .map_err(|_| invalid_utf8(&buf[..width]))
            .map(|s| s.chars().next())
    }
}

/// Encoded length of a UTF-8 sequence from its leading byte.
fn utf8_width(lead: u8) -> Option<usize> {
    match lead {
        0x00..=0x7F => Some(1),
        0xC2..=0xDF => Some(2),
        0xE0..=0xEF => Some(3),
        0xF0..=0xF4 => Some(4),
        _ => None,
    }
}

fn invalid_utf8(bytes: &[u8]) -> io::Error {
    io::Error::new(
        io::ErrorKind::InvalidData,
        format!("invalid UTF-8 sequence {bytes:02x?}"),
    )
}

/// Text encodings accepted for byte buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    #[default]
    Utf8,
    /// ISO-8859-1: every byte maps to the code point of the same value.
    Latin1,
}

impl Encoding {
    /// Decode a byte buffer into text.
    pub fn decode(self, bytes: &[u8]) -> Result<String> {
        match self {
            Encoding::Utf8 => String::from_utf8(bytes.to_vec())
                .map_err(|e| GonError::Io(io::Error::new(io::ErrorKind::InvalidData, e))),
            Encoding::Latin1 => Ok(bytes.iter().map(|&b| char::from(b)).collect()),
        }
    }
}

/// Pushback state of a [`PeekReader`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Empty,
    /// A character (or end of input) that was peeked but not yet read.
    Holding(Option<char>),
}

/// Wraps a [`CharSource`] with one slot of lookahead.
///
/// `peek` is idempotent until the next `read`. After [`PeekReader::close`]
/// every `read`/`peek` fails with [`GonError::UseAfterClose`].
#[derive(Debug)]
pub struct PeekReader<S> {
    source: Option<S>,
    slot: Slot,
}

impl<S: CharSource> PeekReader<S> {
    pub fn new(source: S) -> Self {
        Self {
            source: Some(source),
            slot: Slot::Empty,
        }
    }

    /// Consume and return the next character.
    pub fn read(&mut self) -> Result<Option<char>> {
        let source = self.source.as_mut().ok_or(GonError::UseAfterClose)?;
        match std::mem::replace(&mut self.slot, Slot::Empty) {
            Slot::Holding(c) => Ok(c),
            Slot::Empty => Ok(source.read_char()?),
        }
    }

    /// Return the next character without consuming it.
    pub fn peek(&mut self) -> Result<Option<char>> {
        let source = self.source.as_mut().ok_or(GonError::UseAfterClose)?;
        match self.slot {
            Slot::Holding(c) => Ok(c),
            Slot::Empty => {
                let c = source.read_char()?;
                self.slot = Slot::Holding(c);
                Ok(c)
            }
        }
    }

    pub fn is_open(&self) -> bool {
        self.source.is_some()
    }

    /// Release the underlying source. Closing twice is a no-op.
    pub fn close(&mut self) -> Result<()> {
        self.slot = Slot::Empty;
        match self.source.take() {
            Some(mut source) => Ok(source.close()?),
            None => Ok(()),
        }
    }
}
