//! Structural tokens of the GON grammar.

use std::fmt;

/// A structural marker, classified from a single character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Token {
    /// `[`
    ClassOpener,
    /// `]`
    ClassCloser,
    /// `{`
    BodyOpener,
    /// `}`
    BodyCloser,
    /// `-`
    FlagStart,
    /// `!`
    FlagNegator,
    /// `:`
    ValueOpener,
    /// `=`
    AttributeAssigner,
    /// `"`
    StringQuote,
    /// `;`
    Breakpoint,
    /// `#`
    CommentMarker,
    EndOfInput,
    /// Any other character; begins an identifier.
    Unknown,
}

impl Token {
    /// Classify a character. `None` is the end of input.
    pub fn classify(c: Option<char>) -> Self {
        match c {
            None => Token::EndOfInput,
            Some('[') => Token::ClassOpener,
            Some(']') => Token::ClassCloser,
            Some('{') => Token::BodyOpener,
            Some('}') => Token::BodyCloser,
            Some('-') => Token::FlagStart,
            Some('!') => Token::FlagNegator,
            Some(':') => Token::ValueOpener,
            Some('=') => Token::AttributeAssigner,
            Some('"') => Token::StringQuote,
            Some(';') => Token::Breakpoint,
            Some('#') => Token::CommentMarker,
            Some(_) => Token::Unknown,
        }
    }

    /// The character this token stands for, if it has a fixed one.
    pub fn symbol(self) -> Option<char> {
        match self {
            Token::ClassOpener => Some('['),
            Token::ClassCloser => Some(']'),
            Token::BodyOpener => Some('{'),
            Token::BodyCloser => Some('}'),
            Token::FlagStart => Some('-'),
            Token::FlagNegator => Some('!'),
            Token::ValueOpener => Some(':'),
            Token::AttributeAssigner => Some('='),
            Token::StringQuote => Some('"'),
            Token::Breakpoint => Some(';'),
            Token::CommentMarker => Some('#'),
            Token::EndOfInput | Token::Unknown => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self, self.symbol()) {
            (_, Some(c)) => write!(f, "'{c}'"),
            (Token::EndOfInput, None) => f.write_str("end of input"),
            _ => f.write_str("attribute name"),
        }
    }
}
