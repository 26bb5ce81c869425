//! Decoding of `\uXXXX` escapes one hex digit at a time.
//!
//! [`UnicodeEscape`] is small and `Copy` so the lexer can keep it inside a
//! frame while a chunk boundary splits the escape. A high surrogate is held
//! until the matching `\uDC00`..`\uDFFF` escape completes it.

use crate::error::SyntaxError;

const HIGH_SURROGATES: core::ops::RangeInclusive<u32> = 0xD800..=0xDBFF;
const LOW_SURROGATES: core::ops::RangeInclusive<u32> = 0xDC00..=0xDFFF;

/// What the lexer should do after a hex digit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Decoded {
    /// More digits are needed.
    Pending(UnicodeEscape),
    /// A high surrogate; expect `\u` and a low surrogate next.
    NeedLow(u32),
    Char(char),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct UnicodeEscape {
    acc: u32,
    len: u8,
    /// The high surrogate waiting for this escape to complete it.
    high: Option<u32>,
}

impl UnicodeEscape {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// An escape that must decode to a low surrogate paired with `high`.
    pub(crate) fn low_half_of(high: u32) -> Self {
        Self {
            high: Some(high),
            ..Self::default()
        }
    }

    /// Convert a single ASCII hex digit into its 0..=15 value.
    #[inline]
    fn hex_val(c: char) -> Option<u32> {
        c.to_digit(16)
    }

    /// Feeds one character of the escape.
    pub(crate) fn feed(mut self, c: char) -> Result<Decoded, SyntaxError> {
        let d = Self::hex_val(c).ok_or(SyntaxError::InvalidUnicodeEscape(c))?;
        self.acc = (self.acc << 4) | d;
        self.len += 1;
        if self.len < 4 {
            return Ok(Decoded::Pending(self));
        }

        let code = self.acc;
        match self.high {
            Some(high) if LOW_SURROGATES.contains(&code) => {
                let combined = 0x1_0000 + ((high - 0xD800) << 10) + (code - 0xDC00);
                char::from_u32(combined)
                    .map(Decoded::Char)
                    .ok_or(SyntaxError::InvalidUnicodeEscapeSequence(combined))
            }
            Some(high) => Err(SyntaxError::InvalidUnicodeEscapeSequence(high)),
            None if HIGH_SURROGATES.contains(&code) => Ok(Decoded::NeedLow(code)),
            None => char::from_u32(code)
                .map(Decoded::Char)
                .ok_or(SyntaxError::InvalidUnicodeEscapeSequence(code)),
        }
    }
}
