#![forbid(unsafe_code)]
#![deny(unused_must_use)]
#![warn(clippy::dbg_macro, clippy::todo, clippy::unimplemented)]

mod error;
mod lexer;
mod parser;

pub use error::{Error, LexError, SyntaxError};
pub use lexer::{keyword, tokenize, tokenize_with, LexOptions, Lexer, UnknownCharPolicy};
pub use parser::{parse, parse_str, parse_str_with, MAX_NESTING_DEPTH};
