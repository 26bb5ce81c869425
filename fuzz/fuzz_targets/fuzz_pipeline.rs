#![no_main]
use std::cell::RefCell;

use arbitrary::Arbitrary;
use libfuzzer_sys::{fuzz_mutator, fuzz_target, fuzzer_mutate};
use ll1stream::{Map, ParserError, ParserOptions, Pipeline, Value};
use rand::rngs::SmallRng;
use rand::{Rng, RngCore, SeedableRng};

/// 1 flag byte + 4-byte split seed.
const HEADER: usize = 5;

thread_local! {
    static RNG: RefCell<SmallRng> = RefCell::new(SmallRng::from_os_rng());
}

/// JSON whitespace first, then a few characters only accepted with
/// `allow_unicode_whitespace`.
static WS_TABLE: &[&str] = &[" ", "\t", "\n", "\r", "\u{a0}", "\u{2003}", "\u{2028}", "\u{3000}"];

fn with_rng<F, R>(f: F) -> R
where
    F: FnOnce(&mut SmallRng) -> R,
{
    RNG.with(|cell| f(&mut cell.borrow_mut()))
}

/// Mostly defers to libFuzzer; one time in ten, writes a fresh header and a
/// whitespace-separated run of valid documents.
fn mutator(data: &mut [u8], size: usize, max_size: usize, seed: u32) -> usize {
    if size >= HEADER && !seed.is_multiple_of(10) {
        return fuzzer_mutate(data, size, max_size);
    }

    data[0] = with_rng(|rng| rng.next_u32() as u8 & 0x3);
    data[1..HEADER].copy_from_slice(&with_rng(|rng| rng.next_u32().to_le_bytes()));

    let mut len = HEADER;
    while len < size.max(HEADER + 1) && len < max_size {
        len += append_whitespace(&mut data[len..max_size]);
        len += append_document(&mut data[len..max_size], size);
        len += append_whitespace(&mut data[len..max_size]);
    }
    len
}

fn append_whitespace(buf: &mut [u8]) -> usize {
    with_rng(|rng| {
        let mut written = 0;
        for _ in 0..rng.random_range(1..=4) {
            let ws = WS_TABLE[rng.random_range(0..WS_TABLE.len())].as_bytes();
            if written + ws.len() > buf.len() {
                break;
            }
            buf[written..written + ws.len()].copy_from_slice(ws);
            written += ws.len();
        }
        written
    })
}

fn append_document(buf: &mut [u8], size: usize) -> usize {
    let doc = loop {
        let n = with_rng(|rng| rng.random_range(1..=size.max(2) * 2));
        let bytes: Vec<u8> = with_rng(|rng| (0..n).map(|_| rng.random::<u8>()).collect());
        if let Ok(doc) = Document::arbitrary(&mut arbitrary::Unstructured::new(&bytes)) {
            break doc;
        }
    };

    let Ok(text) = serde_json::to_vec(&doc.0) else {
        return 0;
    };
    let len = text.len().min(buf.len());
    buf[..len].copy_from_slice(&text[..len]);
    len
}

fuzz_mutator!(|data: &mut [u8], size: usize, max_size: usize, seed: u32| {
    mutator(data, size, max_size, seed)
});

/// A random JSON document, built as a `serde_json::Value` so that it can be
/// serialized by an independent implementation.
#[derive(Debug)]
struct Document(serde_json::Value);

impl<'a> Arbitrary<'a> for Document {
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        use serde_json::Value as J;

        let value = match u.choose_index(16)? {
            0 => J::Null,
            1 => J::Bool(u.arbitrary()?),
            2 | 3 => {
                let n: f64 = u.arbitrary()?;
                J::Number(serde_json::Number::from_f64(n).ok_or(arbitrary::Error::IncorrectFormat)?)
            }
            4..=8 => J::String(u.arbitrary()?),
            9..=12 => {
                let items: Vec<Document> = u.arbitrary()?;
                J::Array(items.into_iter().map(|d| d.0).collect())
            }
            _ => {
                let members: Vec<(String, Document)> = u.arbitrary()?;
                J::Object(members.into_iter().map(|(k, d)| (k, d.0)).collect())
            }
        };
        Ok(Document(value))
    }
}

/// Split `text` into chunks of pseudo-random character counts derived from
/// `seed`. Every chunk is non-empty and ends on a character boundary.
fn split_chunks(text: &str, mut seed: u64) -> Vec<&str> {
    let mut chunks = Vec::new();
    let mut rest = text;
    while !rest.is_empty() {
        let count = rest.chars().count();
        let take = (seed % count as u64) as usize + 1;
        seed = seed.rotate_left(7) ^ 0x9e37_79b9;
        let end = rest.char_indices().nth(take).map_or(rest.len(), |(i, _)| i);
        chunks.push(&rest[..end]);
        rest = &rest[end..];
    }
    chunks
}

fn run(chunks: &[&str], options: ParserOptions) -> (Vec<Value>, Option<ParserError>) {
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

fn from_serde(v: serde_json::Value) -> Value {
    match v {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Boolean(b),
        serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
        serde_json::Value::String(s) => Value::String(s),
        serde_json::Value::Array(items) => Value::Array(items.into_iter().map(from_serde).collect()),
        serde_json::Value::Object(map) => {
            Value::Object(map.into_iter().map(|(k, v)| (k, from_serde(v))).collect::<Map>())
        }
    }
}

fn check(data: &[u8]) {
    if data.len() < HEADER {
        return;
    }

    let flags = data[0];
    let seed = u64::from(u32::from_le_bytes([data[1], data[2], data[3], data[4]]));
    let text = String::from_utf8_lossy(&data[HEADER..]).into_owned();
    let options = ParserOptions {
        allow_multiple_json_values: flags & 1 != 0,
        allow_unicode_whitespace: flags & 2 != 0,
    };

    let whole = run(&[text.as_str()], options);
    let chunked = run(&split_chunks(&text, seed), options);
    assert_eq!(whole, chunked, "chunking changed the outcome for {text:?}");

    if options.allow_multiple_json_values {
        return;
    }
    if let Ok(reference) = serde_json::from_str::<serde_json::Value>(&text) {
        assert_eq!(
            whole,
            (vec![from_serde(reference)], None),
            "serde_json accepts {text:?}"
        );
    }
}

fuzz_target!(|data: &[u8]| check(data));
