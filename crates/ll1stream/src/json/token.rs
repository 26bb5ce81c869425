use core::fmt;

/// The JSON lexical alphabet.
///
/// Strings and numbers are spelled out one token per source element so that a
/// lexer never has to hold a partial literal across chunks: a string is
/// `StringStart`, one `Character` per decoded character, `StringEnd`; a number
/// is `NumberStart`, its signs, digits, decimal point and exponent marker in
/// source order, `NumberEnd`.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LexToken {
    ObjectStart,
    ObjectEnd,
    ArrayStart,
    ArrayEnd,
    Comma,
    Colon,
    StringStart,
    StringEnd,
    /// One decoded string character; escapes are already resolved.
    Character(char),
    NumberStart,
    NumberEnd,
    /// One of `0`..=`9`.
    Digit(char),
    /// `-` before the integer part, or `+`/`-` after the exponent marker.
    Sign(char),
    DecimalPoint,
    /// `e` or `E`.
    Exponent,
    True,
    False,
    Null,
}

impl LexToken {
    /// Returns `true` for tokens that can only appear inside a string or
    /// number.
    #[must_use]
    pub fn is_fragment(&self) -> bool {
        matches!(
            self,
            Self::Character(_) | Self::Digit(_) | Self::Sign(_) | Self::DecimalPoint | Self::Exponent
        )
    }
}

/// Renders the source spelling of the token; `Character` is written raw,
/// without escaping.
impl fmt::Display for LexToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use fmt::Write;

        match self {
            Self::ObjectStart => f.write_char('{'),
            Self::ObjectEnd => f.write_char('}'),
            Self::ArrayStart => f.write_char('['),
            Self::ArrayEnd => f.write_char(']'),
            Self::Comma => f.write_char(','),
            Self::Colon => f.write_char(':'),
            Self::StringStart | Self::StringEnd => f.write_char('"'),
            Self::Character(c) | Self::Digit(c) | Self::Sign(c) => f.write_char(*c),
            Self::NumberStart | Self::NumberEnd => Ok(()),
            Self::DecimalPoint => f.write_char('.'),
            Self::Exponent => f.write_char('e'),
            Self::True => f.write_str("true"),
            Self::False => f.write_str("false"),
            Self::Null => f.write_str("null"),
        }
    }
}
