//! The reference grammars: RFC 8259 JSON, split into a lexical grammar over
//! characters and a syntactic grammar over [`LexToken`]s.

mod escape;
mod lexer;
mod parser;
mod token;

pub use lexer::{JsonLexer, LexFrame, tokenize};
pub use parser::{JsonParser, ParseFrame, parse_tokens};
pub use token::LexToken;
