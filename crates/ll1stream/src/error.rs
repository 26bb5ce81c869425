use alloc::string::String;

use thiserror::Error;

/// A failure of a parsing session, tagged with the position of the offending
/// input item.
///
/// `position` counts the items consumed by the session before the failure, so
/// for character input it is the index of the character that could not be
/// accepted.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{source} at position {position}")]
pub struct ParserError {
    pub(crate) source: ErrorSource,
    pub position: usize,
}

impl ParserError {
    pub(crate) fn new(source: ErrorSource, position: usize) -> Self {
        Self { source, position }
    }

    /// The cause of the failure.
    #[must_use]
    pub fn kind(&self) -> &ErrorSource {
        &self.source
    }

    /// The grammar violation, if this error is one.
    #[must_use]
    pub fn syntax(&self) -> Option<&SyntaxError> {
        match &self.source {
            ErrorSource::Syntax(err) => Some(err),
            _ => None,
        }
    }

    /// Returns `true` for defects in grammar code rather than in the input.
    #[must_use]
    pub fn is_internal(&self) -> bool {
        !matches!(self.source, ErrorSource::Syntax(_))
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorSource {
    #[error("syntax error: {0}")]
    Syntax(#[from] SyntaxError),
    /// Grammar code looked at or consumed the lookahead while the buffer was
    /// empty.
    #[error("internal error: lookahead requested on an empty buffer")]
    BufferUnderrun,
    /// A value was returned to a frame that never called a nonterminal.
    #[error("internal error: return value delivered to a frame that made no call")]
    StrayReturn,
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SyntaxError {
    #[error("unexpected {0}")]
    Unexpected(String),
    #[error("invalid escape character '{0}'")]
    InvalidEscape(char),
    #[error("invalid unicode escape sequence at character: '{0}'")]
    InvalidUnicodeEscape(char),
    #[error("invalid unicode escape sequence \\u{0:04X}")]
    InvalidUnicodeEscapeSequence(u32),
    #[error("control character {0:?} in string")]
    ControlCharacterInString(char),
    #[error("invalid number literal \"{0}\"")]
    InvalidNumber(String),
    #[error("unexpected end of input")]
    UnexpectedEndOfInput,
}
