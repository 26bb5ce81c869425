//! The JSON lexical grammar: characters in, [`LexToken`]s out.
//!
//! Each nonterminal of the RFC 8259 grammar (`element`, `value`, `object`,
//! `members`, `string`, `number`, ...) is a family of frames; a frame exists
//! for every point where the production may have to wait for the next
//! character. Dispatch always looks at exactly one character of lookahead.
#![allow(clippy::enum_glob_use)]

use alloc::vec::Vec;

use super::{
    escape::{Decoded, UnicodeEscape},
    token::LexToken,
};
use crate::{
    ParserOptions,
    engine::{Controller, Flow, Grammar, Input, Session},
    error::{ParserError, SyntaxError},
};

type Cx = Controller<char, LexToken>;
type Next = Result<Flow<Frame, ()>, ParserError>;

/// A suspended activation of the lexical grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LexFrame(Frame);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Frame {
    /// Strict entry: one element, then the end of input.
    Document,
    DocumentEnd,
    /// Streaming entry: elements until the end of input.
    Stream,
    StreamValue,

    Element,
    ElementValue,
    Ws,
    Value,
    /// Remaining characters of `true`, `false` or `null`.
    Literal { rest: &'static str, token: LexToken },

    ObjectBody,
    ObjectMembers,
    Member,
    MemberKey,
    MemberAfterKey,
    MemberColon,
    ArrayBody,
    ArrayItems,

    Str,
    Chars,
    Escape,
    Unicode(UnicodeEscape),
    /// A high surrogate was decoded; `\` of the low half comes next.
    SurrogateBackslash(u32),
    /// `u` of the low half comes next.
    SurrogateU(u32),

    IntegerStart,
    IntegerDigits,
    Fraction,
    FractionFirst,
    FractionDigits,
    Exponent,
    ExponentSign,
    ExponentFirst,
    ExponentDigits,
}

use Frame::*;

fn call(callee: Frame, then: Frame) -> Flow<Frame, ()> {
    Flow::Call { callee, then }
}

fn digit(c: Input<char>) -> Option<char> {
    c.item().filter(char::is_ascii_digit)
}

/// The JSON lexical grammar.
///
/// # Examples
///
/// ```rust
/// use ll1stream::{JsonLexer, LexToken, ParserOptions};
///
/// let mut lexer = JsonLexer::session(ParserOptions::default());
/// let mut tokens = lexer.step("[tr".chars()).into_result().unwrap();
/// tokens.extend(lexer.step("ue]".chars()).into_result().unwrap());
/// tokens.extend(lexer.finish().into_result().unwrap());
/// assert_eq!(
///     tokens,
///     [LexToken::ArrayStart, LexToken::True, LexToken::ArrayEnd]
/// );
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonLexer {
    options: ParserOptions,
}

impl JsonLexer {
    #[must_use]
    pub fn new(options: ParserOptions) -> Self {
        Self { options }
    }

    /// A fresh lexing session.
    #[must_use]
    pub fn session(options: ParserOptions) -> Session<Self> {
        Session::new(Self::new(options))
    }

    fn is_whitespace(&self, c: char) -> bool {
        matches!(c, ' ' | '\n' | '\r' | '\t')
            || (self.options.allow_unicode_whitespace && c.is_whitespace())
    }

    fn step(&self, frame: Frame, cx: &mut Cx) -> Next {
        let c = cx.peek()?;
        match frame {
            Document => Ok(call(Element, DocumentEnd)),
            DocumentEnd | StreamValue if c.is_end() => Ok(Flow::Accept),
            DocumentEnd => Err(cx.unexpected()),
            Stream => Ok(call(Ws, StreamValue)),
            StreamValue => Ok(call(Value, Stream)),

            Element => Ok(call(Ws, ElementValue)),
            ElementValue => Ok(call(Value, Ws)),
            Ws => match c {
                Input::Item(ch) if self.is_whitespace(ch) => {
                    cx.consume()?;
                    Ok(Flow::Goto(Ws))
                }
                _ => Ok(Flow::Return(())),
            },
            Value => Self::value(c, cx),
            Literal { rest, token } => {
                let mut chars = rest.chars();
                if chars.next().map(Input::Item) != Some(c) {
                    return Err(cx.unexpected());
                }
                let rest = chars.as_str();
                if rest.is_empty() {
                    cx.emit(token);
                    cx.consume()?;
                    Ok(Flow::Return(()))
                } else {
                    cx.consume()?;
                    Ok(Flow::Goto(Literal { rest, token }))
                }
            }

            ObjectBody if c == Input::Item('}') => Self::close(LexToken::ObjectEnd, cx),
            // Whitespace after `{` was skipped before `ObjectBody`.
            ObjectBody => Ok(call(MemberKey, ObjectMembers)),
            ObjectMembers => match c {
                Input::Item(',') => {
                    cx.emit(LexToken::Comma);
                    cx.consume()?;
                    Ok(call(Member, ObjectMembers))
                }
                Input::Item('}') => Self::close(LexToken::ObjectEnd, cx),
                _ => Err(cx.unexpected()),
            },
            Member => Ok(call(Ws, MemberKey)),
            MemberKey => Ok(call(Str, MemberAfterKey)),
            MemberAfterKey => Ok(call(Ws, MemberColon)),
            MemberColon => {
                if c != Input::Item(':') {
                    return Err(cx.unexpected());
                }
                cx.emit(LexToken::Colon);
                cx.consume()?;
                Ok(Flow::Goto(Element))
            }
            ArrayBody if c == Input::Item(']') => Self::close(LexToken::ArrayEnd, cx),
            ArrayBody => Ok(call(Element, ArrayItems)),
            ArrayItems => match c {
                Input::Item(',') => {
                    cx.emit(LexToken::Comma);
                    cx.consume()?;
                    Ok(call(Element, ArrayItems))
                }
                Input::Item(']') => Self::close(LexToken::ArrayEnd, cx),
                _ => Err(cx.unexpected()),
            },

            Str => {
                if c != Input::Item('"') {
                    return Err(cx.unexpected());
                }
                cx.emit(LexToken::StringStart);
                cx.consume()?;
                Ok(Flow::Goto(Chars))
            }
            Chars => Self::chars(c, cx),
            Escape => Self::escape(c, cx),
            Unicode(esc) => {
                let Input::Item(ch) = c else {
                    return Err(cx.unexpected());
                };
                let next = match esc.feed(ch).map_err(|err| cx.error(err))? {
                    Decoded::Pending(esc) => Unicode(esc),
                    Decoded::NeedLow(high) => SurrogateBackslash(high),
                    Decoded::Char(decoded) => {
                        cx.emit(LexToken::Character(decoded));
                        Chars
                    }
                };
                cx.consume()?;
                Ok(Flow::Goto(next))
            }
            SurrogateBackslash(high) | SurrogateU(high) => {
                let (expected, next) = match frame {
                    SurrogateBackslash(_) => ('\\', SurrogateU(high)),
                    _ => ('u', Unicode(UnicodeEscape::low_half_of(high))),
                };
                match c {
                    Input::Item(ch) if ch == expected => {
                        cx.consume()?;
                        Ok(Flow::Goto(next))
                    }
                    Input::Item(_) => {
                        Err(cx.error(SyntaxError::InvalidUnicodeEscapeSequence(high)))
                    }
                    Input::End => Err(cx.unexpected()),
                }
            }

            IntegerStart => match digit(c) {
                Some('0') => Self::digit('0', Fraction, cx),
                Some(d) => Self::digit(d, IntegerDigits, cx),
                None => Err(cx.unexpected()),
            },
            IntegerDigits => match digit(c) {
                Some(d) => Self::digit(d, IntegerDigits, cx),
                None => Ok(Flow::Goto(Fraction)),
            },
            Fraction if c == Input::Item('.') => {
                cx.emit(LexToken::DecimalPoint);
                cx.consume()?;
                Ok(Flow::Goto(FractionFirst))
            }
            Fraction => Ok(Flow::Goto(Exponent)),
            FractionFirst | ExponentFirst => {
                let Some(d) = digit(c) else {
                    return Err(cx.unexpected());
                };
                let next = if frame == FractionFirst {
                    FractionDigits
                } else {
                    ExponentDigits
                };
                Self::digit(d, next, cx)
            }
            FractionDigits => match digit(c) {
                Some(d) => Self::digit(d, FractionDigits, cx),
                None => Ok(Flow::Goto(Exponent)),
            },
            Exponent => match c {
                Input::Item('e' | 'E') => {
                    cx.emit(LexToken::Exponent);
                    cx.consume()?;
                    Ok(Flow::Goto(ExponentSign))
                }
                _ => {
                    cx.emit(LexToken::NumberEnd);
                    Ok(Flow::Return(()))
                }
            },
            ExponentSign => match c {
                Input::Item(sign @ ('+' | '-')) => {
                    cx.emit(LexToken::Sign(sign));
                    cx.consume()?;
                    Ok(Flow::Goto(ExponentFirst))
                }
                _ => Ok(Flow::Goto(ExponentFirst)),
            },
            ExponentDigits => match digit(c) {
                Some(d) => Self::digit(d, ExponentDigits, cx),
                None => {
                    cx.emit(LexToken::NumberEnd);
                    Ok(Flow::Return(()))
                }
            },
        }
    }

    fn value(c: Input<char>, cx: &mut Cx) -> Next {
        let Input::Item(ch) = c else {
            return Err(cx.unexpected());
        };
        let literal = |rest: &'static str, token: LexToken| -> Next {
            Ok(Flow::Goto(Literal { rest, token }))
        };
        match ch {
            '{' => {
                cx.emit(LexToken::ObjectStart);
                cx.consume()?;
                Ok(call(Ws, ObjectBody))
            }
            '[' => {
                cx.emit(LexToken::ArrayStart);
                cx.consume()?;
                Ok(call(Ws, ArrayBody))
            }
            '"' => Ok(Flow::Goto(Str)),
            '-' => {
                cx.emit(LexToken::NumberStart);
                cx.emit(LexToken::Sign('-'));
                cx.consume()?;
                Ok(Flow::Goto(IntegerStart))
            }
            '0'..='9' => {
                cx.emit(LexToken::NumberStart);
                Ok(Flow::Goto(IntegerStart))
            }
            // The first letter is matched here; `Literal` checks the rest.
            't' => literal("true", LexToken::True),
            'f' => literal("false", LexToken::False),
            'n' => literal("null", LexToken::Null),
            _ => Err(cx.unexpected()),
        }
    }

    fn chars(c: Input<char>, cx: &mut Cx) -> Next {
        let Input::Item(ch) = c else {
            return Err(cx.unexpected());
        };
        match ch {
            '"' => {
                cx.emit(LexToken::StringEnd);
                cx.consume()?;
                Ok(Flow::Return(()))
            }
            '\\' => {
                cx.consume()?;
                Ok(Flow::Goto(Escape))
            }
            '\u{0}'..='\u{1f}' => Err(cx.error(SyntaxError::ControlCharacterInString(ch))),
            _ => {
                cx.emit(LexToken::Character(ch));
                cx.consume()?;
                Ok(Flow::Goto(Chars))
            }
        }
    }

    fn escape(c: Input<char>, cx: &mut Cx) -> Next {
        let Input::Item(ch) = c else {
            return Err(cx.unexpected());
        };
        let decoded = match ch {
            '"' => '"',
            '\\' => '\\',
            '/' => '/',
            'b' => '\u{8}',
            'f' => '\u{c}',
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            'u' => {
                cx.consume()?;
                return Ok(Flow::Goto(Unicode(UnicodeEscape::new())));
            }
            _ => return Err(cx.error(SyntaxError::InvalidEscape(ch))),
        };
        cx.emit(LexToken::Character(decoded));
        cx.consume()?;
        Ok(Flow::Goto(Chars))
    }

    fn digit(d: char, next: Frame, cx: &mut Cx) -> Next {
        cx.emit(LexToken::Digit(d));
        cx.consume()?;
        Ok(Flow::Goto(next))
    }

    fn close(token: LexToken, cx: &mut Cx) -> Next {
        cx.emit(token);
        cx.consume()?;
        Ok(Flow::Return(()))
    }
}

impl Grammar for JsonLexer {
    type Item = char;
    type Token = LexToken;
    type Frame = LexFrame;
    type Ret = ();

    fn entry(&self) -> LexFrame {
        if self.options.allow_multiple_json_values {
            LexFrame(Stream)
        } else {
            LexFrame(Document)
        }
    }

    fn resume(
        &self,
        LexFrame(frame): LexFrame,
        cx: &mut Cx,
    ) -> Result<Flow<LexFrame, ()>, ParserError> {
        Ok(match self.step(frame, cx)? {
            Flow::Call { callee, then } => Flow::Call {
                callee: LexFrame(callee),
                then: LexFrame(then),
            },
            Flow::Goto(next) => Flow::Goto(LexFrame(next)),
            Flow::Return(()) => Flow::Return(()),
            Flow::Accept => Flow::Accept,
        })
    }

    fn ret(&self, caller: LexFrame, (): (), _cx: &mut Cx) -> Result<LexFrame, ParserError> {
        Ok(caller)
    }
}

/// Lexes a complete document held in memory.
///
/// # Errors
///
/// The first lexical error in `text`.
pub fn tokenize(text: &str, options: ParserOptions) -> Result<Vec<LexToken>, ParserError> {
    let mut session = JsonLexer::session(options);
    let mut tokens = session.step(text.chars()).into_result()?;
    tokens.extend(session.finish().into_result()?);
    Ok(tokens)
}
