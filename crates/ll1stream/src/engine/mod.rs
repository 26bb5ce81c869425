//! Suspendable LL(1) recursive descent.
//!
//! A grammar is written as a set of nonterminals that inspect one item of
//! lookahead through a [`Controller`], consume it, and emit output. Instead of
//! recursing on the native call stack, each nonterminal activation is a
//! *frame* value kept on an explicit continuation stack owned by the
//! [`Session`]. That makes the whole parse state a plain value: the session can
//! stop in the middle of any production when the buffer runs dry, hand back
//! the output produced so far, and pick up at the same frame once the next
//! chunk arrives.
//!
//! Grammar code only ever stops at one place: right after a `consume()` that
//! emptied the buffer. The item has already been removed at that point, so a
//! resumed frame never re-decides anything.
//!
//! ```rust
//! use ll1stream::engine::{Controller, Flow, Grammar, Input, Session};
//! use ll1stream::{ParserError, SyntaxError};
//!
//! /// Counts `a`s up to the end of input.
//! struct Count;
//!
//! impl Grammar for Count {
//!     type Item = char;
//!     type Token = usize;
//!     type Frame = usize;
//!     type Ret = ();
//!
//!     fn entry(&self) -> usize {
//!         0
//!     }
//!
//!     fn resume(
//!         &self,
//!         seen: usize,
//!         cx: &mut Controller<char, usize>,
//!     ) -> Result<Flow<usize, ()>, ParserError> {
//!         match cx.peek()? {
//!             Input::Item('a') => {
//!                 cx.consume()?;
//!                 Ok(Flow::Goto(seen + 1))
//!             }
//!             Input::End => {
//!                 cx.emit(seen);
//!                 Ok(Flow::Accept)
//!             }
//!             Input::Item(_) => Err(cx.unexpected()),
//!         }
//!     }
//!
//!     fn ret(
//!         &self,
//!         _caller: usize,
//!         (): (),
//!         _cx: &mut Controller<char, usize>,
//!     ) -> Result<usize, ParserError> {
//!         unreachable!("no calls")
//!     }
//! }
//!
//! let mut session = Session::new(Count);
//! assert!(session.step("aa".chars()).tokens.is_empty());
//! assert!(session.step("a".chars()).tokens.is_empty());
//! assert_eq!(session.finish().tokens, vec![3]);
//! ```
use core::fmt;

mod controller;
mod session;

pub use controller::Controller;
pub use session::{Batch, Finished, Session, SessionState};

use crate::error::ParserError;

/// One item of a session's input alphabet, or the end-of-input marker.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input<I> {
    Item(I),
    /// No further chunks will arrive.
    End,
}

impl<I> Input<I> {
    /// Returns `true` if this is the end-of-input marker.
    #[must_use]
    pub fn is_end(&self) -> bool {
        matches!(self, Self::End)
    }

    /// The wrapped item, unless this is the end marker.
    #[must_use]
    pub fn item(self) -> Option<I> {
        match self {
            Self::Item(item) => Some(item),
            Self::End => None,
        }
    }
}

impl<I: fmt::Debug> fmt::Display for Input<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Item(item) => write!(f, "{item:?}"),
            Self::End => f.write_str("end of input"),
        }
    }
}

/// What a frame asks the session to do next.
#[derive(Debug)]
pub enum Flow<F, R> {
    /// Run `callee` to completion, then deliver its return value to `then`
    /// through [`Grammar::ret`].
    Call { callee: F, then: F },
    /// Continue with another frame of the same activation.
    Goto(F),
    /// Finish this activation and hand `R` to the caller.
    Return(R),
    /// The entry procedure is done; the session completes.
    Accept,
}

/// A grammar that a [`Session`] can drive chunk by chunk.
///
/// Frames must capture everything a nonterminal needs to continue, including
/// partially built results. A frame calls [`Controller::consume`] at most once
/// and as its last interaction with the controller: once the buffer is empty
/// the session stops before the next frame runs.
pub trait Grammar {
    /// Input alphabet, without the end marker.
    type Item: Clone + fmt::Debug;
    /// Output alphabet.
    type Token;
    /// A suspended nonterminal activation.
    type Frame;
    /// Value passed from a nonterminal back to its caller.
    type Ret;

    /// The frame that starts a parse.
    fn entry(&self) -> Self::Frame;

    /// Runs `frame` against the current lookahead.
    ///
    /// # Errors
    ///
    /// Any error aborts the session.
    fn resume(
        &self,
        frame: Self::Frame,
        cx: &mut Controller<Self::Item, Self::Token>,
    ) -> Result<Flow<Self::Frame, Self::Ret>, ParserError>;

    /// Folds a callee's return value into the caller's continuation.
    ///
    /// Runs right after the callee returned, before the session checks for
    /// starvation, so output emitted here is delivered in the same step. The
    /// buffer may be empty: `ret` must not peek or consume.
    ///
    /// # Errors
    ///
    /// [`ErrorSource::StrayReturn`](crate::ErrorSource::StrayReturn) when
    /// `caller` is not waiting for a value.
    fn ret(
        &self,
        caller: Self::Frame,
        value: Self::Ret,
        cx: &mut Controller<Self::Item, Self::Token>,
    ) -> Result<Self::Frame, ParserError>;
}
