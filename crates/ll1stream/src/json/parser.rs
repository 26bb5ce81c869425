//! The JSON syntactic grammar: [`LexToken`]s in, [`Value`]s out.
//!
//! Containers under construction live inside their frames, so a suspended
//! parse holds exactly the partial values of the open containers and nothing
//! else. A nested value reaches its parent through [`Grammar::ret`], and a
//! top-level value is emitted there too, in the step that completed it.
#![allow(clippy::enum_glob_use)]

use alloc::{string::String, vec::Vec};

use super::token::LexToken;
use crate::{
    ParserOptions,
    engine::{Controller, Flow, Grammar, Input, Session},
    error::{ErrorSource, ParserError, SyntaxError},
    value::{Array, Map, Value},
};

type Cx = Controller<LexToken, Value>;
type Next = Result<Flow<Frame, Value>, ParserError>;

/// A suspended activation of the syntactic grammar.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseFrame(Frame);

#[derive(Debug, Clone, PartialEq)]
enum Frame {
    Document,
    /// Waiting for the top-level value.
    Root,
    DocumentEnd,
    Stream,

    /// Any value, dispatched on its first token.
    Any,
    ObjectBody(Map),
    ObjectKey(Map),
    Key { map: Map, key: String },
    Colon { map: Map, key: String },
    /// Waiting for the value of `key`.
    Member { map: Map, key: String },
    AfterMember(Map),
    ArrayBody(Array),
    /// Waiting for the next element.
    Element(Array),
    AfterElement(Array),
    Chars(String),
    Number(String),
}

use Frame::*;

fn call(callee: Frame, then: Frame) -> Flow<Frame, Value> {
    Flow::Call { callee, then }
}

/// The JSON syntactic grammar.
///
/// # Examples
///
/// ```rust
/// use ll1stream::{JsonParser, LexToken, ParserOptions, Value};
///
/// let mut parser = JsonParser::session(ParserOptions::default());
/// let tokens = [
///     LexToken::ArrayStart,
///     LexToken::False,
///     LexToken::Comma,
///     LexToken::Null,
///     LexToken::ArrayEnd,
/// ];
/// assert_eq!(
///     parser.step(tokens).into_result().unwrap(),
///     [Value::Array(vec![Value::Boolean(false), Value::Null])]
/// );
/// assert!(parser.finish().into_result().unwrap().is_empty());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonParser {
    options: ParserOptions,
}

impl JsonParser {
    #[must_use]
    pub fn new(options: ParserOptions) -> Self {
        Self { options }
    }

    /// A fresh parsing session.
    #[must_use]
    pub fn session(options: ParserOptions) -> Session<Self> {
        Session::new(Self::new(options))
    }

    fn step(&self, frame: Frame, cx: &mut Cx) -> Next {
        let tok = cx.peek()?;
        match frame {
            Document => Ok(call(Any, Root)),
            Root => Err(stray_return(cx)),
            DocumentEnd | Stream if tok.is_end() => Ok(Flow::Accept),
            DocumentEnd => Err(cx.unexpected()),
            Stream => Ok(call(Any, Root)),

            Any => Self::value(tok, cx),
            ObjectBody(map) if tok == Input::Item(LexToken::ObjectEnd) => {
                cx.consume()?;
                Ok(Flow::Return(Value::Object(map)))
            }
            ObjectBody(map) => Ok(Flow::Goto(ObjectKey(map))),
            ObjectKey(map) => {
                if tok != Input::Item(LexToken::StringStart) {
                    return Err(cx.unexpected());
                }
                cx.consume()?;
                Ok(Flow::Goto(Key {
                    map,
                    key: String::new(),
                }))
            }
            Key { map, mut key } => match tok {
                Input::Item(LexToken::Character(c)) => {
                    key.push(c);
                    cx.consume()?;
                    Ok(Flow::Goto(Key { map, key }))
                }
                Input::Item(LexToken::StringEnd) => {
                    cx.consume()?;
                    Ok(Flow::Goto(Colon { map, key }))
                }
                _ => Err(cx.unexpected()),
            },
            Colon { map, key } => {
                if tok != Input::Item(LexToken::Colon) {
                    return Err(cx.unexpected());
                }
                cx.consume()?;
                Ok(call(Any, Member { map, key }))
            }
            Member { .. } | Element(_) => Err(stray_return(cx)),
            AfterMember(map) => match tok {
                Input::Item(LexToken::Comma) => {
                    cx.consume()?;
                    Ok(Flow::Goto(ObjectKey(map)))
                }
                Input::Item(LexToken::ObjectEnd) => {
                    cx.consume()?;
                    Ok(Flow::Return(Value::Object(map)))
                }
                _ => Err(cx.unexpected()),
            },
            ArrayBody(items) if tok == Input::Item(LexToken::ArrayEnd) => {
                cx.consume()?;
                Ok(Flow::Return(Value::Array(items)))
            }
            ArrayBody(items) => Ok(call(Any, Element(items))),
            AfterElement(items) => match tok {
                Input::Item(LexToken::Comma) => {
                    cx.consume()?;
                    Ok(call(Any, Element(items)))
                }
                Input::Item(LexToken::ArrayEnd) => {
                    cx.consume()?;
                    Ok(Flow::Return(Value::Array(items)))
                }
                _ => Err(cx.unexpected()),
            },
            Chars(mut text) => match tok {
                Input::Item(LexToken::Character(c)) => {
                    text.push(c);
                    cx.consume()?;
                    Ok(Flow::Goto(Chars(text)))
                }
                Input::Item(LexToken::StringEnd) => {
                    cx.consume()?;
                    Ok(Flow::Return(Value::String(text)))
                }
                _ => Err(cx.unexpected()),
            },
            Number(mut text) => {
                match tok {
                    Input::Item(LexToken::Sign(c) | LexToken::Digit(c)) => text.push(c),
                    Input::Item(LexToken::DecimalPoint) => text.push('.'),
                    Input::Item(LexToken::Exponent) => text.push('e'),
                    Input::Item(LexToken::NumberEnd) => {
                        let n = text
                            .parse::<f64>()
                            .map_err(|_| cx.error(SyntaxError::InvalidNumber(text)))?;
                        cx.consume()?;
                        return Ok(Flow::Return(Value::Number(n)));
                    }
                    _ => return Err(cx.unexpected()),
                }
                cx.consume()?;
                Ok(Flow::Goto(Number(text)))
            }
        }
    }

    fn value(tok: Input<LexToken>, cx: &mut Cx) -> Next {
        let Input::Item(tok) = tok else {
            return Err(cx.unexpected());
        };
        let next = match tok {
            LexToken::ObjectStart => Flow::Goto(ObjectBody(Map::new())),
            LexToken::ArrayStart => Flow::Goto(ArrayBody(Array::new())),
            LexToken::StringStart => Flow::Goto(Chars(String::new())),
            LexToken::NumberStart => Flow::Goto(Number(String::new())),
            LexToken::True => Flow::Return(Value::Boolean(true)),
            LexToken::False => Flow::Return(Value::Boolean(false)),
            LexToken::Null => Flow::Return(Value::Null),
            _ => return Err(cx.unexpected()),
        };
        cx.consume()?;
        Ok(next)
    }
}

/// A frame that only exists to receive a return value was resumed directly.
fn stray_return(cx: &Cx) -> ParserError {
    ParserError::new(ErrorSource::StrayReturn, cx.position())
}

impl Grammar for JsonParser {
    type Item = LexToken;
    type Token = Value;
    type Frame = ParseFrame;
    type Ret = Value;

    fn entry(&self) -> ParseFrame {
        if self.options.allow_multiple_json_values {
            ParseFrame(Stream)
        } else {
            ParseFrame(Document)
        }
    }

    fn resume(
        &self,
        ParseFrame(frame): ParseFrame,
        cx: &mut Cx,
    ) -> Result<Flow<ParseFrame, Value>, ParserError> {
        Ok(match self.step(frame, cx)? {
            Flow::Call { callee, then } => Flow::Call {
                callee: ParseFrame(callee),
                then: ParseFrame(then),
            },
            Flow::Goto(next) => Flow::Goto(ParseFrame(next)),
            Flow::Return(value) => Flow::Return(value),
            Flow::Accept => Flow::Accept,
        })
    }

    fn ret(
        &self,
        ParseFrame(caller): ParseFrame,
        value: Value,
        cx: &mut Cx,
    ) -> Result<ParseFrame, ParserError> {
        let frame = match caller {
            Root => {
                cx.emit(value);
                if self.options.allow_multiple_json_values {
                    Stream
                } else {
                    DocumentEnd
                }
            }
            Member { mut map, key } => {
                map.insert(key, value);
                AfterMember(map)
            }
            Element(mut items) => {
                items.push(value);
                AfterElement(items)
            }
            _ => return Err(stray_return(cx)),
        };
        Ok(ParseFrame(frame))
    }
}

/// Parses a token sequence held in memory.
///
/// # Errors
///
/// The first syntactic error in `tokens`.
pub fn parse_tokens(
    tokens: impl IntoIterator<Item = LexToken>,
    options: ParserOptions,
) -> Result<Vec<Value>, ParserError> {
    let mut session = JsonParser::session(options);
    let mut values = session.step(tokens).into_result()?;
    values.extend(session.finish().into_result()?);
    Ok(values)
}
