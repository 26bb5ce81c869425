//! Suspendable LL(1) recursive descent over chunked input.
//!
//! The [`engine`] drives any [`Grammar`](engine::Grammar) one chunk at a time:
//! a parse stops exactly where it runs out of input and resumes there when the
//! next chunk arrives, without re-reading anything. The [`json`] grammars are
//! the reference instantiation, and [`Pipeline`] chains them into a streaming
//! JSON parser.
//!
//! ```rust
//! use ll1stream::{ParserOptions, Pipeline, Value};
//!
//! let mut pipeline = Pipeline::new(ParserOptions::default());
//! assert!(pipeline.feed("[1, \"tw").into_result().unwrap().is_empty());
//! assert_eq!(
//!     pipeline.feed("o\"]").into_result().unwrap(),
//!     [Value::Array(vec![Value::Number(1.0), Value::from("two")])]
//! );
//! assert!(pipeline.finish().into_result().unwrap().is_empty());
//! ```

#![no_std]
#![allow(missing_docs)]
extern crate alloc;

#[cfg(test)]
extern crate std;

mod chunk_utils;
pub mod engine;
mod error;
pub mod json;
mod options;
mod pipeline;
mod value;

#[cfg(test)]
mod tests;

pub use error::{ErrorSource, ParserError, SyntaxError};
pub use json::{JsonLexer, JsonParser, LexToken, parse_tokens, tokenize};
pub use options::ParserOptions;
pub use pipeline::{Chain, Pipeline, Stage, Values, parse_str};
pub use value::{Array, Map, Value};

#[doc(hidden)]
pub use chunk_utils::{partition_chars, produce_chunks};
