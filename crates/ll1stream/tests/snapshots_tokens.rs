#![allow(missing_docs)]

use core::fmt::Write;

use ll1stream::{JsonLexer, LexToken, ParserOptions};

/// One line per step: the tokens it produced.
fn render_steps(chunks: &[&str]) -> (String, Vec<LexToken>) {
    let mut lexer = JsonLexer::session(ParserOptions::default());
    let mut out = String::new();
    let mut all = Vec::new();
    for chunk in chunks {
        let tokens = lexer.step(chunk.chars()).into_result().expect("lexing failed");
        writeln!(out, "{tokens:?}").unwrap();
        all.extend(tokens);
    }
    let tokens = lexer.finish().into_result().expect("lexing failed");
    writeln!(out, "{tokens:?}").unwrap();
    all.extend(tokens);
    (out, all)
}

#[test]
fn snapshot_tokens_per_step() {
    let (steps, tokens) = render_steps(&[r#"{"k":[1"#, ",tr", r#"ue],"s":"a\"#, r#"u00e9"}"#]);

    insta::assert_snapshot!(steps, @r##"
    [ObjectStart, StringStart, Character('k'), StringEnd, Colon, ArrayStart, NumberStart, Digit('1')]
    [NumberEnd, Comma]
    [True, ArrayEnd, Comma, StringStart, Character('s'), StringEnd, Colon, StringStart, Character('a')]
    [Character('é'), StringEnd, ObjectEnd]
    []
    "##);

    let spelled: String = tokens.iter().map(ToString::to_string).collect();
    insta::assert_snapshot!(spelled, @r#"{"k":[1,true],"s":"aé"}"#);
}
