use super::locations::{Locatable, Location};
use super::tokenizer::{Token, TokenType};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("unexpected character '{character}' at {location}")]
    UnexpectedCharacter { character: char, location: Location },
}

/// What the parser was looking for when it gave up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expected {
    Token(TokenType),
    Lexeme(&'static str),
    Expression,
}

impl std::fmt::Display for Expected {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Token(typ) => write!(f, "{typ}"),
            Self::Lexeme(lexeme) => write!(f, "'{lexeme}'"),
            Self::Expression => f.write_str("expression"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("expected {expected} but found {actual} in {context} at {location}")]
    UnexpectedToken {
        expected: Expected,
        actual: Token,
        context: &'static str,
        location: Location,
    },
    #[error("numeric literal {literal} does not fit a 64-bit integer at {location}")]
    InvalidNumericLiteral { literal: String, location: Location },
}

impl ParseError {
    pub(super) fn unexpected(expected: Expected, actual: &Token) -> Self {
        Self::UnexpectedToken {
            expected,
            actual: actual.clone(),
            context: "",
            location: actual.span().start(),
        }
    }

    pub(super) fn within(self, rule: &'static str) -> Self {
        match self {
            Self::UnexpectedToken {
                expected,
                actual,
                context: "",
                location,
            } => Self::UnexpectedToken {
                expected,
                actual,
                context: rule,
                location,
            },
            other => other,
        }
    }

    pub(super) fn invalid_number(token: &Token) -> Self {
        Self::InvalidNumericLiteral {
            literal: token.lexeme.clone(),
            location: token.span().start(),
        }
    }
}
