use alloc::{collections::VecDeque, format, vec::Vec};
use core::{fmt, mem};

use super::Input;
use crate::error::{ErrorSource, ParserError, SyntaxError};

/// The unconsumed input and the undelivered output of one session.
///
/// Grammar frames see the session only through this type: `peek` to look at
/// the lookahead, `consume` to remove it, `emit` to produce output.
#[derive(Debug)]
pub struct Controller<I, T> {
    buffer: VecDeque<Input<I>>,
    output: Vec<T>,
    position: usize,
    starved: bool,
}

impl<I, T> Controller<I, T> {
    pub(crate) fn new() -> Self {
        Self {
            buffer: VecDeque::new(),
            output: Vec::new(),
            position: 0,
            starved: false,
        }
    }

    /// Removes the lookahead.
    ///
    /// When this empties the buffer, the session suspends as soon as the
    /// calling frame hands control back, so `consume` must be the frame's last
    /// use of the controller.
    ///
    /// # Errors
    ///
    /// [`ErrorSource::BufferUnderrun`] if the buffer is already empty.
    pub fn consume(&mut self) -> Result<(), ParserError> {
        if self.buffer.pop_front().is_none() {
            return Err(self.underrun());
        }
        self.position += 1;
        self.starved = self.buffer.is_empty();
        Ok(())
    }

    /// Queues one output token.
    pub fn emit(&mut self, token: T) {
        self.output.push(token);
    }

    /// Number of items consumed since the session started.
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    /// An error at the current position.
    #[must_use]
    pub fn error(&self, err: SyntaxError) -> ParserError {
        ParserError::new(ErrorSource::Syntax(err), self.position)
    }

    fn underrun(&self) -> ParserError {
        ParserError::new(ErrorSource::BufferUnderrun, self.position)
    }

    /// Replaces the buffer with a freshly delivered chunk.
    pub(crate) fn refill(&mut self, chunk: impl IntoIterator<Item = I>) {
        self.buffer.clear();
        self.buffer.extend(chunk.into_iter().map(Input::Item));
        self.starved = false;
    }

    /// Appends the end marker after whatever is still buffered.
    pub(crate) fn close(&mut self) {
        self.buffer.push_back(Input::End);
        self.starved = false;
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Whether the last `consume` emptied the buffer.
    pub(crate) fn starved(&self) -> bool {
        self.starved
    }

    pub(crate) fn take_output(&mut self) -> Vec<T> {
        mem::take(&mut self.output)
    }

    /// The items the grammar never consumed, without the end marker.
    pub(crate) fn into_trailing(self) -> Vec<I> {
        self.buffer.into_iter().filter_map(Input::item).collect()
    }
}

impl<I: Clone + fmt::Debug, T> Controller<I, T> {
    /// The lookahead, left in place.
    ///
    /// # Errors
    ///
    /// [`ErrorSource::BufferUnderrun`] if the buffer is empty, which only
    /// happens when a frame keeps going after a `consume` that drained it.
    pub fn peek(&self) -> Result<Input<I>, ParserError> {
        self.buffer.front().cloned().ok_or_else(|| self.underrun())
    }

    /// The error for a lookahead that no production accepts.
    ///
    /// The end marker turns into [`SyntaxError::UnexpectedEndOfInput`]; any
    /// other item into [`SyntaxError::Unexpected`] naming it.
    #[must_use]
    pub fn unexpected(&self) -> ParserError {
        match self.buffer.front() {
            Some(Input::Item(item)) => self.error(SyntaxError::Unexpected(format!("{item:?}"))),
            Some(Input::End) => self.error(SyntaxError::UnexpectedEndOfInput),
            None => self.underrun(),
        }
    }
}
