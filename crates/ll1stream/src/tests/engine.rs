//! Session behavior, exercised with small grammars that are easy to reason
//! about.
use alloc::{string::ToString, vec, vec::Vec};
use core::cell::Cell;

use crate::{
    ErrorSource, ParserError, SyntaxError,
    engine::{Controller, Flow, Grammar, Input, Session, SessionState},
};

/// Balanced parentheses. Emits, for every closed group, the number of groups
/// directly inside it, and at the end the number of top-level groups.
struct Parens;

#[derive(Debug, Clone, Copy, PartialEq)]
enum P {
    Root,
    RootEnd,
    Done(usize),
    List { count: usize },
    Close { count: usize },
    Closing { count: usize, inner: usize },
}

impl Grammar for Parens {
    type Item = char;
    type Token = usize;
    type Frame = P;
    type Ret = usize;

    fn entry(&self) -> P {
        P::Root
    }

    fn resume(&self, frame: P, cx: &mut Controller<char, usize>) -> Result<Flow<P, usize>, ParserError> {
        let c = cx.peek()?;
        match frame {
            P::Root => Ok(Flow::Call {
                callee: P::List { count: 0 },
                then: P::RootEnd,
            }),
            P::Done(n) if c.is_end() => {
                cx.emit(n);
                Ok(Flow::Accept)
            }
            P::Done(_) => Err(cx.unexpected()),
            P::List { count } if c == Input::Item('(') => {
                cx.consume()?;
                Ok(Flow::Call {
                    callee: P::List { count: 0 },
                    then: P::Close { count },
                })
            }
            P::List { count } => Ok(Flow::Return(count)),
            P::Closing { count, inner } if c == Input::Item(')') => {
                cx.emit(inner);
                cx.consume()?;
                Ok(Flow::Goto(P::List { count: count + 1 }))
            }
            P::Closing { .. } => Err(cx.unexpected()),
            P::RootEnd | P::Close { .. } => Err(ParserError::new(ErrorSource::StrayReturn, cx.position())),
        }
    }

    fn ret(&self, caller: P, inner: usize, cx: &mut Controller<char, usize>) -> Result<P, ParserError> {
        match caller {
            P::RootEnd => Ok(P::Done(inner)),
            P::Close { count } => Ok(P::Closing { count, inner }),
            _ => Err(ParserError::new(ErrorSource::StrayReturn, cx.position())),
        }
    }
}

fn run(chunks: &[&str]) -> (Vec<usize>, Option<ParserError>) {
    let mut session = Session::new(Parens);
    let mut out = Vec::new();
    for chunk in chunks {
        let batch = session.step(chunk.chars());
        out.extend(batch.tokens);
        if batch.error.is_some() {
            return (out, batch.error);
        }
    }
    let done = session.finish();
    out.extend(done.tokens);
    (out, done.error)
}

#[test]
fn nested_calls_return_values() {
    assert_eq!(run(&["(()())"]), (vec![0, 0, 2, 1], None));
    assert_eq!(run(&["()()"]), (vec![0, 0, 2], None));
    assert_eq!(run(&[""]), (vec![0], None));
}

#[test]
fn output_is_independent_of_chunking() {
    let whole = run(&["((())())()"]);
    assert_eq!(run(&["(", "(", "(", ")", ")", "(", ")", ")", "(", ")"]), whole);
    assert_eq!(run(&["((", "", "())(", ")", "", ")()"]), whole);
    assert_eq!(whole, (vec![0, 1, 0, 2, 0, 2], None));
}

#[test]
fn errors_carry_position() {
    let (tokens, err) = run(&["(()", "x"]);
    assert_eq!(tokens, vec![0]);
    let err = err.unwrap();
    assert_eq!(err.syntax(), Some(&SyntaxError::Unexpected("'x'".into())));
    assert_eq!(err.position, 3);
}

#[test]
fn missing_close_is_unexpected_end() {
    let (_, err) = run(&["(("]);
    assert_eq!(err.unwrap().syntax(), Some(&SyntaxError::UnexpectedEndOfInput));
}

#[test]
fn states_follow_the_lifecycle() {
    let mut session = Session::new(Parens);
    assert_eq!(session.state(), SessionState::Uninitialized);
    assert!(session.step("(".chars()).tokens.is_empty());
    assert_eq!(session.state(), SessionState::Suspended);
    assert_eq!(session.step(")".chars()).tokens, vec![0]);
    assert_eq!(session.state(), SessionState::Suspended);

    let done = session.finish();
    assert_eq!(done.tokens, vec![1]);
    assert!(done.trailing.is_empty());
    assert_eq!(done.error, None);

    let mut failed = Session::new(Parens);
    assert!(failed.step(")".chars()).is_err());
    assert_eq!(failed.state(), SessionState::Failed);
}

/// Counts how often grammar code runs.
struct Counting<'a> {
    resumes: &'a Cell<usize>,
}

impl Grammar for Counting<'_> {
    type Item = char;
    type Token = char;
    type Frame = ();
    type Ret = ();

    fn entry(&self) {}

    fn resume(&self, (): (), cx: &mut Controller<char, char>) -> Result<Flow<(), ()>, ParserError> {
        self.resumes.set(self.resumes.get() + 1);
        match cx.peek()? {
            Input::Item(c) => {
                cx.emit(c);
                cx.consume()?;
                Ok(Flow::Goto(()))
            }
            Input::End => Ok(Flow::Accept),
        }
    }

    fn ret(&self, (): (), (): (), _cx: &mut Controller<char, char>) -> Result<(), ParserError> {
        Ok(())
    }
}

#[test]
fn empty_first_chunk_runs_no_grammar_code() {
    let resumes = Cell::new(0);
    let mut session = Session::new(Counting { resumes: &resumes });
    let batch = session.step("".chars());
    assert_eq!(batch, crate::engine::Batch { tokens: vec![], error: None });
    assert_eq!(session.state(), SessionState::Suspended);
    assert_eq!(resumes.get(), 0);

    assert_eq!(session.step("ab".chars()).tokens, vec!['a', 'b']);
    assert_eq!(resumes.get(), 2);
    assert!(session.step("".chars()).tokens.is_empty());
    assert_eq!(resumes.get(), 2);
}

#[test]
fn end_marker_can_arrive_alone_or_after_input() {
    let resumes = Cell::new(0);
    let mut session = Session::new(Counting { resumes: &resumes });
    assert_eq!(session.step("xy".chars()).tokens, vec!['x', 'y']);
    let done = session.finish();
    assert_eq!(done.tokens, vec![]);
    assert_eq!(done.error, None);

    let finished_without_input = Session::new(Counting { resumes: &resumes }).finish();
    assert_eq!(finished_without_input.into_result(), Ok(vec![]));
}

/// Accepts a single `x` without waiting for the end of input.
struct One;

impl Grammar for One {
    type Item = char;
    type Token = char;
    type Frame = ();
    type Ret = ();

    fn entry(&self) {}

    fn resume(&self, (): (), cx: &mut Controller<char, char>) -> Result<Flow<(), ()>, ParserError> {
        match cx.peek()? {
            Input::Item('x') => {
                cx.emit('x');
                cx.consume()?;
                Ok(Flow::Accept)
            }
            _ => Err(cx.unexpected()),
        }
    }

    fn ret(&self, (): (), (): (), _cx: &mut Controller<char, char>) -> Result<(), ParserError> {
        Ok(())
    }
}

#[test]
fn completed_session_ignores_further_input() {
    let mut session = Session::new(One);
    assert_eq!(session.step("xy".chars()).tokens, vec!['x']);
    assert_eq!(session.state(), SessionState::Completed);
    assert_eq!(session.step("zzz".chars()), crate::engine::Batch { tokens: vec![], error: None });

    let done = session.finish();
    assert_eq!(done.trailing, vec!['y']);
    assert!(done.tokens.is_empty());
    assert_eq!(done.error, None);
}

#[test]
fn failed_session_resurfaces_its_error() {
    let mut session = Session::new(One);
    let first = session.step("q".chars()).into_result().unwrap_err();
    assert_eq!(first.syntax(), Some(&SyntaxError::Unexpected("'q'".into())));

    let again = session.step("x".chars());
    assert!(again.tokens.is_empty());
    assert_eq!(again.error, Some(first.clone()));
    assert_eq!(session.finish().error, Some(first));
}

/// Breaks the protocol by peeking after a consume.
struct Greedy;

impl Grammar for Greedy {
    type Item = char;
    type Token = ();
    type Frame = ();
    type Ret = ();

    fn entry(&self) {}

    fn resume(&self, (): (), cx: &mut Controller<char, ()>) -> Result<Flow<(), ()>, ParserError> {
        cx.consume()?;
        cx.peek()?;
        Ok(Flow::Goto(()))
    }

    fn ret(&self, (): (), (): (), _cx: &mut Controller<char, ()>) -> Result<(), ParserError> {
        Ok(())
    }
}

#[test]
fn peek_after_draining_consume_is_underrun() {
    let mut session = Session::new(Greedy);
    let err = session.step("a".chars()).into_result().unwrap_err();
    assert_eq!(err.kind(), &ErrorSource::BufferUnderrun);
    assert!(err.is_internal());
    assert_eq!(err.position, 1);
    assert_eq!(session.state(), SessionState::Failed);
}

/// Returns a value to a frame that never made a call.
struct Stray;

impl Grammar for Stray {
    type Item = char;
    type Token = ();
    type Frame = bool;
    type Ret = ();

    fn entry(&self) -> bool {
        true
    }

    fn resume(&self, first: bool, _cx: &mut Controller<char, ()>) -> Result<Flow<bool, ()>, ParserError> {
        if first {
            Ok(Flow::Call {
                callee: false,
                then: false,
            })
        } else {
            Ok(Flow::Return(()))
        }
    }

    fn ret(&self, caller: bool, (): (), cx: &mut Controller<char, ()>) -> Result<bool, ParserError> {
        if caller {
            Ok(caller)
        } else {
            Err(ParserError::new(ErrorSource::StrayReturn, cx.position()))
        }
    }
}

#[test]
fn return_to_a_non_calling_frame_is_internal_error() {
    let mut session = Session::new(Stray);
    let err = session.step("a".chars()).into_result().unwrap_err();
    assert_eq!(err.kind(), &ErrorSource::StrayReturn);
    assert!(err.is_internal());
    assert_eq!(
        err.to_string(),
        "internal error: return value delivered to a frame that made no call at position 0"
    );
}
