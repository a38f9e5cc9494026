use super::locations::{Locatable, Span};
use super::tokenizer::{Token, TokenType as TT};
use derivative::Derivative;

/// A parsed unit: top-level statements in source order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Program {
    pub body: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    VariableDeclaration(Name, Option<Expression>),
    TypeDeclaration(TypeDeclaration),
    Expression(Expression),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDeclaration {
    pub name: Name,
    pub properties: Vec<PropertyDeclaration>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDeclaration(pub Name);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expression {
    Assignment(Box<Expression>, Box<Expression>),
    BinaryOperation(BinaryOperator, Box<(Expression, Expression)>),
    Comparison(ComparisonOperator, Box<(Expression, Expression)>),
    Member(Box<Expression>, Name),
    Call(Box<Expression>, Vec<Expression>),
    Identifier(Name),
    NumericLiteral(i64),
    NullLiteral,
}

/// An identifier together with where it was written. Equality ignores the
/// location so trees built from different sources compare structurally.
#[derive(Clone, Derivative)]
#[derivative(PartialEq, Eq)]
pub struct Name {
    pub(crate) name: String,
    #[derivative(PartialEq = "ignore")]
    pub(crate) span: Span,
}

impl Name {
    pub fn as_str(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Debug for Name {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Name(\"{}\")", self.name)
    }
}

impl std::fmt::Display for Name {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

impl From<Token> for Name {
    fn from(value: Token) -> Self {
        debug_assert_eq!(value.typ, TT::Identifier);
        Self {
            name: value.lexeme,
            span: value.span,
        }
    }
}

impl Locatable for Name {
    fn span(&self) -> Span {
        self.span
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Plus,
    Minus,
    Times,
    Divide,
    Modulo,
}

impl BinaryOperator {
    pub(super) fn from_lexeme(lexeme: &str) -> Option<Self> {
        match lexeme {
            "+" => Some(Self::Plus),
            "-" => Some(Self::Minus),
            "*" => Some(Self::Times),
            "/" => Some(Self::Divide),
            "%" => Some(Self::Modulo),
            _ => None,
        }
    }

    pub(super) fn is_additive(self) -> bool {
        matches!(self, Self::Plus | Self::Minus)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOperator {
    Equal,
    NotEqual,
    GreaterThan,
    GreaterThanEqual,
    LessThan,
    LessThanEqual,
}

impl ComparisonOperator {
    pub(super) fn from_lexeme(lexeme: &str) -> Option<Self> {
        match lexeme {
            "==" => Some(Self::Equal),
            "!=" => Some(Self::NotEqual),
            ">" => Some(Self::GreaterThan),
            ">=" => Some(Self::GreaterThanEqual),
            "<" => Some(Self::LessThan),
            "<=" => Some(Self::LessThanEqual),
            _ => None,
        }
    }
}
