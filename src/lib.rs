//! A small embedded scripting language: tokenizer, recursive-descent parser
//! and a tree-walking evaluator with lexical scopes and nominal record types.
//!
//! ```
//! let value = simp::run("type Point = { x; y; }; Point(Point);").unwrap();
//! assert_eq!(value.to_string(), "Point { x: 12, y: 12 }");
//! ```

mod parser;
pub use parser::{
    parse, tokenize, BinaryOperator, ComparisonOperator, Expected, Expression, LexError,
    Locatable, Location, Name, ParseError, Program, PropertyDeclaration, Span, Statement, Token,
    TokenType, TypeDeclaration,
};

mod interpreter;
pub use interpreter::{
    evaluate, Environment, Evaluate, Interpreter, ObjectValue, RuntimeError, RuntimeValue,
    ScopeId, TypeValue,
};

pub mod logging;
mod stack;

/// Any failure of the tokenize, parse, evaluate pipeline.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("lex error: {0}")]
    Lex(#[from] LexError),
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
    #[error("runtime error: {0}")]
    Runtime(#[from] RuntimeError),
}

/// Runs `source` as one unit over a fresh global scope.
pub fn run(source: &str) -> Result<RuntimeValue, Error> {
    Interpreter::new().run(source)
}
