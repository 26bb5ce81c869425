//! Composition of sessions into a character-to-value pipeline.
//!
//! Each chunk handed to a [`Chain`] runs through the upstream session, and the
//! tokens it produced run through the downstream session in the same call, so
//! a chain holds no more buffered output between calls than its sessions do.
use alloc::{collections::VecDeque, vec::Vec};

use crate::{
    JsonLexer, JsonParser, ParserError, ParserOptions, Value,
    engine::{Batch, Grammar, Session},
};

/// Something that turns chunks of `Input` into batches of `Output`.
pub trait Stage {
    type Input;
    type Output;

    /// Runs one chunk through the stage.
    fn step<C>(&mut self, chunk: C) -> Batch<Self::Output>
    where
        C: IntoIterator<Item = Self::Input>;

    /// Signals the end of input and returns the final output.
    fn finish(self) -> Batch<Self::Output>;
}

impl<G: Grammar> Stage for Session<G> {
    type Input = G::Item;
    type Output = G::Token;

    fn step<C>(&mut self, chunk: C) -> Batch<G::Token>
    where
        C: IntoIterator<Item = G::Item>,
    {
        Session::step(self, chunk)
    }

    fn finish(self) -> Batch<G::Token> {
        Session::finish(self).into_batch()
    }
}

/// Two stages in sequence: the output of `U` is the input of `D`.
///
/// When both stages fail in the same call, the downstream error is reported:
/// it concerns input the upstream stage had already accepted.
#[derive(Debug)]
pub struct Chain<U, D> {
    upstream: U,
    downstream: D,
}

impl<U, D> Chain<U, D> {
    #[must_use]
    pub fn new(upstream: U, downstream: D) -> Self {
        Self {
            upstream,
            downstream,
        }
    }

    pub fn upstream(&self) -> &U {
        &self.upstream
    }

    pub fn downstream(&self) -> &D {
        &self.downstream
    }
}

impl<U, D> Stage for Chain<U, D>
where
    U: Stage,
    D: Stage<Input = U::Output>,
{
    type Input = U::Input;
    type Output = D::Output;

    fn step<C>(&mut self, chunk: C) -> Batch<D::Output>
    where
        C: IntoIterator<Item = U::Input>,
    {
        let up = self.upstream.step(chunk);
        let mut down = self.downstream.step(up.tokens);
        if down.error.is_none() {
            down.error = up.error;
        }
        down
    }

    fn finish(self) -> Batch<D::Output> {
        let Self {
            upstream,
            mut downstream,
        } = self;

        let up = upstream.finish();
        let mut out = downstream.step(up.tokens);
        if let Some(err) = up.error {
            // The downstream stage saw only a prefix; ending it would report
            // a misleading end of input.
            log::debug!("upstream failed, downstream left unfinished: {err}");
            if out.error.is_none() {
                out.error = Some(err);
            }
            return out;
        }

        let last = downstream.finish();
        out.tokens.extend(last.tokens);
        out.error = out.error.or(last.error);
        out
    }
}

/// The complete JSON pipeline: characters in, [`Value`]s out.
///
/// # Examples
///
/// ```rust
/// use ll1stream::{ParserOptions, Pipeline, Value};
///
/// let mut pipeline = Pipeline::new(ParserOptions {
///     allow_multiple_json_values: true,
///     ..Default::default()
/// });
/// let mut values = pipeline.feed("{\"a\": [1, tr").into_result().unwrap();
/// values.extend(pipeline.feed("ue]} 7 ").into_result().unwrap());
/// values.extend(pipeline.finish().into_result().unwrap());
/// assert_eq!(values.len(), 2);
/// assert_eq!(values[0].to_string(), r#"{"a":[1,true]}"#);
/// assert_eq!(values[1], Value::Number(7.0));
/// ```
#[derive(Debug)]
pub struct Pipeline {
    chain: Chain<Session<JsonLexer>, Session<JsonParser>>,
}

impl Pipeline {
    #[must_use]
    pub fn new(options: ParserOptions) -> Self {
        Self {
            chain: Chain::new(JsonLexer::session(options), JsonParser::session(options)),
        }
    }

    /// The lexical and syntactic sessions.
    pub fn sessions(&self) -> (&Session<JsonLexer>, &Session<JsonParser>) {
        (self.chain.upstream(), self.chain.downstream())
    }

    /// Runs one chunk of text through both grammars.
    pub fn feed(&mut self, chunk: &str) -> Batch<Value> {
        self.chain.step(chunk.chars())
    }

    /// Signals the end of the text.
    pub fn finish(self) -> Batch<Value> {
        self.chain.finish()
    }
}

impl Stage for Pipeline {
    type Input = char;
    type Output = Value;

    fn step<C>(&mut self, chunk: C) -> Batch<Value>
    where
        C: IntoIterator<Item = char>,
    {
        self.chain.step(chunk)
    }

    fn finish(self) -> Batch<Value> {
        self.chain.finish()
    }
}

/// Values parsed from a source of text chunks, pulled on demand.
///
/// The next chunk is only taken from the source once every value produced by
/// the previous one has been handed out. The pipeline is finished when the
/// source runs out. After an error, the iterator yields the error once and
/// then ends.
///
/// # Examples
///
/// ```rust
/// use ll1stream::{ParserOptions, Value, Values};
///
/// let options = ParserOptions {
///     allow_multiple_json_values: true,
///     ..Default::default()
/// };
/// let values: Result<Vec<Value>, _> = Values::new(["1 [", "] 2"], options).collect();
/// assert_eq!(
///     values.unwrap(),
///     [Value::Number(1.0), Value::Array(vec![]), Value::Number(2.0)]
/// );
/// ```
#[derive(Debug)]
pub struct Values<S> {
    source: S,
    pipeline: Option<Pipeline>,
    pending: VecDeque<Value>,
    error: Option<ParserError>,
}

impl<S: Iterator> Values<S> {
    pub fn new(source: impl IntoIterator<IntoIter = S>, options: ParserOptions) -> Self {
        Self {
            source: source.into_iter(),
            pipeline: Some(Pipeline::new(options)),
            pending: VecDeque::new(),
            error: None,
        }
    }
}

impl<S> Iterator for Values<S>
where
    S: Iterator,
    S::Item: AsRef<str>,
{
    type Item = Result<Value, ParserError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(value) = self.pending.pop_front() {
                return Some(Ok(value));
            }
            if let Some(err) = self.error.take() {
                return Some(Err(err));
            }
            if self.pipeline.is_none() {
                return None;
            }

            let batch = match self.source.next() {
                Some(chunk) => self.pipeline.as_mut()?.feed(chunk.as_ref()),
                None => self.pipeline.take()?.finish(),
            };
            self.pending.extend(batch.tokens);
            if let Some(err) = batch.error {
                self.error = Some(err);
                self.pipeline = None;
            }
        }
    }
}

/// Parses `text` as a single chunk.
///
/// # Errors
///
/// The first lexical or syntactic error in `text`.
///
/// # Examples
///
/// ```rust
/// use ll1stream::{ParserOptions, parse_str};
///
/// let values = parse_str(r#"{"k": [null, -1.5e2]}"#, ParserOptions::default()).unwrap();
/// assert_eq!(values[0].to_string(), r#"{"k":[null,-150]}"#);
///
/// let err = parse_str(r#"{"a":}"#, ParserOptions::default()).unwrap_err();
/// assert_eq!(err.to_string(), "syntax error: unexpected '}' at position 5");
/// ```
pub fn parse_str(text: &str, options: ParserOptions) -> Result<Vec<Value>, ParserError> {
    let mut pipeline = Pipeline::new(options);
    let mut values = pipeline.feed(text).into_result()?;
    values.extend(pipeline.finish().into_result()?);
    Ok(values)
}
