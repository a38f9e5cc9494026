mod ast;
mod combinators;
mod error;
mod grammar;
mod locations;
pub mod tokenizer;

pub use ast::*;
pub use error::{Expected, LexError, ParseError};
pub use grammar::parse;
pub use locations::{Locatable, Location, Span};
pub use tokenizer::{tokenize, Token, TokenType};

#[cfg(test)]
mod test;
