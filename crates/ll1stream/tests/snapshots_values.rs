#![allow(missing_docs)]

use core::fmt::Write;

use ll1stream::{ParserOptions, Pipeline, Value, engine::Batch, parse_str};

fn show(batch: &Batch<Value>) -> String {
    let mut parts: Vec<String> = batch.tokens.iter().map(ToString::to_string).collect();
    if let Some(err) = &batch.error {
        parts.push(format!("error: {err}"));
    }
    if parts.is_empty() {
        return "-".to_owned();
    }
    parts.join(" ")
}

fn render_values(chunks: &[&str], options: ParserOptions) -> String {
    let mut pipeline = Pipeline::new(options);
    let mut out = String::new();
    for chunk in chunks {
        writeln!(out, "{chunk:?} => {}", show(&pipeline.feed(chunk))).unwrap();
    }
    writeln!(out, "<end> => {}", show(&pipeline.finish())).unwrap();
    out
}

#[test]
fn snapshot_streaming_values() {
    let options = ParserOptions {
        allow_multiple_json_values: true,
        ..Default::default()
    };
    let chunks = ["1 [tr", r#"ue] {"a""#, ":null}\n\"x"];

    insta::assert_snapshot!(render_values(&chunks, options), @r##"
    "1 [tr" => 1
    "ue] {\"a\"" => [true]
    ":null}\n\"x" => {"a":null}
    <end> => error: syntax error: unexpected end of input at position 22
    "##);
}

#[test]
fn snapshot_strict_values() {
    let chunks = ["[1, 2", "] ", "3"];

    insta::assert_snapshot!(render_values(&chunks, ParserOptions::default()), @r##"
    "[1, 2" => -
    "] " => [1,2]
    "3" => error: syntax error: unexpected '3' at position 7
    <end> => error: syntax error: unexpected '3' at position 7
    "##);
}

#[test]
fn snapshot_errors() {
    let inputs = [
        r#"{"a":}"#,
        "[1,]",
        r#""\x""#,
        r#""\u12G4""#,
        r#""\ud83d""#,
        "\"\u{1}\"",
        r#"{"a":1"#,
    ];
    let mut out = String::new();
    for input in inputs {
        let err = parse_str(input, ParserOptions::default()).unwrap_err();
        writeln!(out, "{input:?} => {err}").unwrap();
    }

    insta::assert_snapshot!(out, @r##"
    "{\"a\":}" => syntax error: unexpected '}' at position 5
    "[1,]" => syntax error: unexpected ']' at position 3
    "\"\\x\"" => syntax error: invalid escape character 'x' at position 2
    "\"\\u12G4\"" => syntax error: invalid unicode escape sequence at character: 'G' at position 5
    "\"\\ud83d\"" => syntax error: invalid unicode escape sequence \uD83D at position 7
    "\"\u{1}\"" => syntax error: control character '\u{1}' in string at position 1
    "{\"a\":1" => syntax error: unexpected end of input at position 6
    "##);
}
