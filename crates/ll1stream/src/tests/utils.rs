//! Helpers shared by the unit tests.
use alloc::{string::String, vec::Vec};

use crate::{
    JsonLexer, LexToken, Map, ParserError, ParserOptions, Pipeline, Value,
    engine::Session,
};

pub fn streaming() -> ParserOptions {
    ParserOptions {
        allow_multiple_json_values: true,
        ..Default::default()
    }
}

/// Lexes `chunks` one after the other and returns every token, plus the
/// error that ended the session, if any.
pub fn lex_chunks(chunks: &[&str], options: ParserOptions) -> (Vec<LexToken>, Option<ParserError>) {
    let mut session: Session<JsonLexer> = JsonLexer::session(options);
    let mut tokens = Vec::new();
    for chunk in chunks {
        let batch = session.step(chunk.chars());
        tokens.extend(batch.tokens);
        if batch.error.is_some() {
            return (tokens, batch.error);
        }
    }
    let done = session.finish();
    tokens.extend(done.tokens);
    (tokens, done.error)
}

/// Parses `chunks` through the full pipeline.
pub fn parse_chunks(chunks: &[&str], options: ParserOptions) -> (Vec<Value>, Option<ParserError>) {
    let mut pipeline = Pipeline::new(options);
    let mut values = Vec::new();
    for chunk in chunks {
        let batch = pipeline.feed(chunk);
        values.extend(batch.tokens);
        if batch.error.is_some() {
            return (values, batch.error);
        }
    }
    let done = pipeline.finish();
    values.extend(done.tokens);
    (values, done.error)
}

/// Every character of `text` as its own chunk.
pub fn char_chunks(text: &str) -> Vec<String> {
    text.chars().map(String::from).collect()
}

pub fn from_serde(v: serde_json::Value) -> Value {
    match v {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Boolean(b),
        serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
        serde_json::Value::String(s) => Value::String(s),
        serde_json::Value::Array(items) => Value::Array(items.into_iter().map(from_serde).collect()),
        serde_json::Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (k, from_serde(v)))
                .collect::<Map>(),
        ),
    }
}
