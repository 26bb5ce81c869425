use alloc::{vec, vec::Vec};
use core::mem;

use super::{Controller, Flow, Grammar};
use crate::error::{ParserError, SyntaxError};

/// The output of one [`Session::step`]: every token emitted during the step,
/// and the error that ended it, if any.
///
/// Tokens emitted before a failure are kept; they were valid when produced.
#[must_use]
#[derive(Debug, Clone, PartialEq)]
pub struct Batch<T> {
    pub tokens: Vec<T>,
    pub error: Option<ParserError>,
}

impl<T> Batch<T> {
    pub(crate) fn ok(tokens: Vec<T>) -> Self {
        Self { tokens, error: None }
    }

    pub(crate) fn failed(tokens: Vec<T>, error: ParserError) -> Self {
        Self {
            tokens,
            error: Some(error),
        }
    }

    /// Returns `true` if the step ended in an error.
    #[must_use]
    pub fn is_err(&self) -> bool {
        self.error.is_some()
    }

    /// Converts into a `Result`, dropping any tokens that preceded an error.
    ///
    /// # Errors
    ///
    /// The error that ended the step.
    pub fn into_result(self) -> Result<Vec<T>, ParserError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.tokens),
        }
    }
}

/// The output of [`Session::finish`].
#[must_use]
#[derive(Debug, Clone, PartialEq)]
pub struct Finished<I, T> {
    /// Items the grammar never consumed (the end marker excluded).
    pub trailing: Vec<I>,
    pub tokens: Vec<T>,
    pub error: Option<ParserError>,
}

impl<I, T> Finished<I, T> {
    /// Converts into a `Result` over the final tokens.
    ///
    /// # Errors
    ///
    /// The error that ended the session.
    pub fn into_result(self) -> Result<Vec<T>, ParserError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.tokens),
        }
    }

    pub(crate) fn into_batch(self) -> Batch<T> {
        Batch {
            tokens: self.tokens,
            error: self.error,
        }
    }
}

/// The externally observable state of a [`Session`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No chunk has been delivered yet.
    Uninitialized,
    /// Waiting for the next chunk.
    Suspended,
    /// The grammar accepted its input.
    Completed,
    /// The grammar rejected its input.
    Failed,
}

/// Parse machinery that only exists while the session is live.
struct Machine<G: Grammar> {
    cx: Controller<G::Item, G::Token>,
    stack: Vec<G::Frame>,
}

enum State<G: Grammar> {
    Uninitialized,
    Live(Machine<G>),
    Completed { trailing: Vec<G::Item> },
    Failed(ParserError),
}

/// Where a run of frames stopped.
enum Halt {
    Suspended,
    Completed,
    Failed(ParserError),
}

/// One resumable run of a grammar's entry procedure.
///
/// Feed chunks with [`step`](Self::step), then signal the end of input with
/// [`finish`](Self::finish). The grammar runs synchronously inside each call
/// and stops whenever it consumes the last buffered item.
pub struct Session<G: Grammar> {
    grammar: G,
    state: State<G>,
}

impl<G: Grammar> Session<G> {
    /// Creates a session. Nothing runs until the first chunk arrives.
    #[must_use]
    pub fn new(grammar: G) -> Self {
        Self {
            grammar,
            state: State::Uninitialized,
        }
    }

    #[must_use]
    pub fn grammar(&self) -> &G {
        &self.grammar
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        match self.state {
            State::Uninitialized => SessionState::Uninitialized,
            State::Live(_) => SessionState::Suspended,
            State::Completed { .. } => SessionState::Completed,
            State::Failed(_) => SessionState::Failed,
        }
    }

    /// Delivers the next chunk and runs the grammar until it needs more input.
    ///
    /// A completed session ignores the chunk and returns nothing. A failed
    /// session returns its error again.
    pub fn step(&mut self, chunk: impl IntoIterator<Item = G::Item>) -> Batch<G::Token> {
        self.start();
        match &mut self.state {
            State::Live(machine) => machine.cx.refill(chunk),
            State::Completed { .. } => return Batch::ok(Vec::new()),
            State::Failed(err) => return Batch::failed(Vec::new(), err.clone()),
            State::Uninitialized => unreachable!("started above"),
        }
        self.run()
    }

    /// Signals the end of input.
    ///
    /// If the grammar has not accepted once the end marker is processed, the
    /// result carries [`SyntaxError::UnexpectedEndOfInput`].
    pub fn finish(mut self) -> Finished<G::Item, G::Token> {
        self.start();
        match &mut self.state {
            State::Live(machine) => machine.cx.close(),
            State::Completed { trailing } => {
                return Finished {
                    trailing: mem::take(trailing),
                    tokens: Vec::new(),
                    error: None,
                };
            }
            State::Failed(err) => {
                return Finished {
                    trailing: Vec::new(),
                    tokens: Vec::new(),
                    error: Some(err.clone()),
                };
            }
            State::Uninitialized => unreachable!("started above"),
        }

        let batch = self.run();
        match self.state {
            State::Completed { trailing } => Finished {
                trailing,
                tokens: batch.tokens,
                error: None,
            },
            State::Failed(err) => Finished {
                trailing: Vec::new(),
                tokens: batch.tokens,
                error: Some(err),
            },
            State::Live(machine) => {
                let err = machine.cx.error(SyntaxError::UnexpectedEndOfInput);
                log::debug!("input ended with {} frames open", machine.stack.len());
                Finished {
                    trailing: Vec::new(),
                    tokens: batch.tokens,
                    error: Some(err),
                }
            }
            State::Uninitialized => unreachable!("finish always starts the machine"),
        }
    }

    /// Creates the controller and continuation stack on first delivery.
    fn start(&mut self) {
        if matches!(self.state, State::Uninitialized) {
            self.state = State::Live(Machine {
                cx: Controller::new(),
                stack: vec![self.grammar.entry()],
            });
        }
    }

    /// Runs frames until the session suspends, completes or fails, then moves
    /// the output queue out.
    fn run(&mut self) -> Batch<G::Token> {
        let State::Live(machine) = &mut self.state else {
            return Batch::ok(Vec::new());
        };

        if machine.cx.is_empty() {
            log::trace!("empty chunk; still suspended at {}", machine.cx.position());
            return Batch::ok(machine.cx.take_output());
        }

        let halt = Self::drive(&self.grammar, machine);
        let tokens = machine.cx.take_output();

        match halt {
            Halt::Suspended => {
                log::trace!(
                    "suspended at {} with {} frames",
                    machine.cx.position(),
                    machine.stack.len()
                );
                Batch::ok(tokens)
            }
            Halt::Completed => {
                let State::Live(machine) = mem::replace(&mut self.state, State::Uninitialized) else {
                    unreachable!()
                };
                log::debug!("completed after {} items", machine.cx.position());
                self.state = State::Completed {
                    trailing: machine.cx.into_trailing(),
                };
                Batch::ok(tokens)
            }
            Halt::Failed(err) => {
                log::debug!("failed: {err}");
                self.state = State::Failed(err.clone());
                Batch::failed(tokens, err)
            }
        }
    }

    fn drive(grammar: &G, machine: &mut Machine<G>) -> Halt {
        loop {
            let Some(frame) = machine.stack.pop() else {
                return Halt::Completed;
            };

            match grammar.resume(frame, &mut machine.cx) {
                Ok(Flow::Call { callee, then }) => {
                    machine.stack.push(then);
                    machine.stack.push(callee);
                }
                Ok(Flow::Goto(next)) => machine.stack.push(next),
                Ok(Flow::Return(value)) => {
                    let Some(caller) = machine.stack.pop() else {
                        return Halt::Completed;
                    };
                    match grammar.ret(caller, value, &mut machine.cx) {
                        Ok(caller) => machine.stack.push(caller),
                        Err(err) => return Halt::Failed(err),
                    }
                }
                Ok(Flow::Accept) => {
                    machine.stack.clear();
                    return Halt::Completed;
                }
                Err(err) => return Halt::Failed(err),
            }

            if machine.cx.starved() {
                return Halt::Suspended;
            }
        }
    }
}

impl<G: Grammar> core::fmt::Debug for Session<G> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Session")
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}
