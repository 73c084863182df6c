//! Error types for GON parsing and querying.

use thiserror::Error;

/// Errors that can occur while reading, parsing, or querying GON.
///
/// The parser performs no recovery: the first error aborts the whole parse
/// and no partial tree is returned.
#[derive(Error, Debug)]
pub enum GonError {
    /// A structural token other than the expected one was read.
    /// `expected` lists the acceptable tokens, `found` is the offending
    /// character (`None` at end of input).
    #[error("unexpected token: expected {expected}, but was {}", describe_found(.found))]
    UnexpectedToken {
        expected: String,
        found: Option<char>,
    },

    /// An unquoted value that is neither a literal nor a number.
    #[error("unknown value: {0}")]
    UnknownValue(String),

    /// A value position with nothing in it (e.g. `size:;`).
    #[error("empty value")]
    EmptyValue,

    /// End of input inside a quoted string. Carries the text read so far.
    #[error("unterminated string: \"{0}<EOF>")]
    UnterminatedString(String),

    /// A numeric literal with a misplaced sign, too many periods, digits
    /// outside its radix, or a magnitude outside `i64`.
    #[error("malformed number: {0}")]
    MalformedNumber(String),

    /// Two children of one nested object share a name.
    #[error("duplicate child name: there is already a nested object named '{0}'")]
    DuplicateChildName(String),

    /// A read or peek on a character source that was already closed.
    #[error("character source is already closed")]
    UseAfterClose,

    /// Failure of the underlying character source.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A `match_key` pattern that is not a valid regular expression.
    #[error("invalid name pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

fn describe_found(found: &Option<char>) -> String {
    match found {
        Some(c) => format!("'{}'", c.escape_default()),
        None => "end of input".to_string(),
    }
}

/// Convenience alias used throughout gon-core.
pub type Result<T> = std::result::Result<T, GonError>;
