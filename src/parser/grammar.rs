// Grammar notation used in the rule comments below:
//
// * Strings with single quotes (') denote punctuation or keywords
// * Upper case names (IDENTIFIER) denote token types
// * e1 e2 matches e1, then e2; e1 | e2 matches either
// * e* repeats zero or more times, [e] is optional
//
// Every choice is made on the next token alone and the parser never
// backtracks: the first mismatch is reported and parsing stops.

use super::ast::*;
use super::combinators::*;
use super::error::{Expected, ParseError};
use super::tokenizer::{Token, TokenType as TT};
use crate::stack::ensure_sufficient_stack;
use tracing::debug;

/// Builds the tree for one unit. The token sequence is expected to end with
/// the end-of-input sentinel; a missing sentinel is treated as present.
#[tracing::instrument(level = "debug", skip_all, fields(tokens = input.len()))]
pub fn parse(input: &[Token]) -> Result<Program, ParseError> {
    let (program, _) = file_.parse(ParserInput::new(input))?;
    debug!(statements = program.body.len(), "parsed program");
    Ok(program)
}

// file: statement* ENDOFFILE
fn file_(input: ParserInput) -> ParseResult<Program> {
    in_context(
        "program",
        left(
            zero_or_more_until(TT::EndOfFile, statement),
            tok(TT::EndOfFile),
        ),
    )
    .map(|body| Program { body })
    .parse(input)
}

// statement: var_decl | type_decl | expression_stmt
fn statement(input: ParserInput) -> ParseResult<Statement> {
    match input.peek().typ {
        TT::Let => var_decl(input),
        TT::Type => type_decl(input),
        _ => expression_stmt(input),
    }
}

// var_decl: 'var' IDENTIFIER (';' | '=' expression ';')
fn var_decl(input: ParserInput) -> ParseResult<Statement> {
    in_context(
        "variable declaration",
        pair(right(tok(TT::Let), name), initializer),
    )
    .map(|(name, value)| Statement::VariableDeclaration(name, value))
    .parse(input)
}

fn initializer(input: ParserInput) -> ParseResult<Option<Expression>> {
    if input.at(TT::Semicolon) {
        return tok(TT::Semicolon).map(|_| None).parse(input);
    }
    left(right(tok(TT::Assignment), expression), tok(TT::Semicolon))
        .map(Some)
        .parse(input)
}

// type_decl: 'type' IDENTIFIER '=' '{' property_decl* '}' [';']
fn type_decl(input: ParserInput) -> ParseResult<Statement> {
    in_context(
        "type declaration",
        left(
            pair(
                right(
                    tok(TT::Type),
                    left(name, pair(tok(TT::Assignment), tok(TT::OpenBrace))),
                ),
                left(
                    zero_or_more_until(TT::CloseBrace, property_decl),
                    tok(TT::CloseBrace),
                ),
            ),
            optional_semicolon,
        ),
    )
    .map(|(name, properties)| Statement::TypeDeclaration(TypeDeclaration { name, properties }))
    .parse(input)
}

// property_decl: IDENTIFIER ';'
fn property_decl(input: ParserInput) -> ParseResult<PropertyDeclaration> {
    left(name, tok(TT::Semicolon))
        .map(PropertyDeclaration)
        .parse(input)
}

// expression_stmt: expression [';']
fn expression_stmt(input: ParserInput) -> ParseResult<Statement> {
    left(expression, optional_semicolon)
        .map(Statement::Expression)
        .parse(input)
}

fn optional_semicolon(input: ParserInput) -> ParseResult<()> {
    when(TT::Semicolon, tok(TT::Semicolon))
        .map(|_| ())
        .parse(input)
}

// Every nesting level passes through here, so this is where the stack grows.
fn expression(input: ParserInput) -> ParseResult<Expression> {
    ensure_sufficient_stack(|| assignment(input))
}

// assignment: comparison ['=' comparison ';']
//
// Only the assignment form owns a terminating ';'.
fn assignment(input: ParserInput) -> ParseResult<Expression> {
    pair(
        comparison,
        when(
            TT::Assignment,
            in_context(
                "assignment",
                right(tok(TT::Assignment), left(comparison, tok(TT::Semicolon))),
            ),
        ),
    )
    .map(|(assignee, value)| match value {
        Some(value) => Expression::Assignment(Box::new(assignee), Box::new(value)),
        None => assignee,
    })
    .parse(input)
}

// comparison: additive (('==' | '!=' | '>' | '>=' | '<' | '<=') additive)*
fn comparison(input: ParserInput) -> ParseResult<Expression> {
    pair(
        additive,
        zero_or_more_while(
            |t| t.typ == TT::ComparisonOperator,
            pair(
                operator(
                    TT::ComparisonOperator,
                    ComparisonOperator::from_lexeme,
                    "comparison operator",
                ),
                additive,
            ),
        ),
    )
    .map(|(first, rest)| {
        rest.into_iter().fold(first, |lhs, (op, rhs)| {
            Expression::Comparison(op, Box::new((lhs, rhs)))
        })
    })
    .parse(input)
}

// additive: multiplicative (('+' | '-') multiplicative)*
fn additive(input: ParserInput) -> ParseResult<Expression> {
    binary_chain(input, additive_operator, "'+' or '-'", multiplicative)
}

// multiplicative: call_member (('*' | '/' | '%') call_member)*
fn multiplicative(input: ParserInput) -> ParseResult<Expression> {
    binary_chain(input, multiplicative_operator, "'*', '/' or '%'", call_member)
}

fn additive_operator(lexeme: &str) -> Option<BinaryOperator> {
    BinaryOperator::from_lexeme(lexeme).filter(|op| op.is_additive())
}

fn multiplicative_operator(lexeme: &str) -> Option<BinaryOperator> {
    BinaryOperator::from_lexeme(lexeme).filter(|op| !op.is_additive())
}

fn binary_chain<'a>(
    input: ParserInput<'a>,
    operators: fn(&str) -> Option<BinaryOperator>,
    expected: &'static str,
    operand: fn(ParserInput<'a>) -> ParseResult<'a, Expression>,
) -> ParseResult<'a, Expression> {
    pair(
        operand,
        zero_or_more_while(
            move |t| t.typ == TT::BinaryOperator && operators(&t.lexeme).is_some(),
            pair(operator(TT::BinaryOperator, operators, expected), operand),
        ),
    )
    .map(|(first, rest)| {
        rest.into_iter().fold(first, |lhs, (op, rhs)| {
            Expression::BinaryOperation(op, Box::new((lhs, rhs)))
        })
    })
    .parse(input)
}

// call_member: member ('(' [arguments] ')')*
fn call_member(input: ParserInput) -> ParseResult<Expression> {
    pair(member, zero_or_more_while(|t| t.typ == TT::OpenParen, arguments))
        .map(|(callee, calls)| {
            calls
                .into_iter()
                .fold(callee, |callee, args| Expression::Call(Box::new(callee), args))
        })
        .parse(input)
}

// arguments: expression (',' expression)*
fn arguments(input: ParserInput) -> ParseResult<Vec<Expression>> {
    in_context(
        "argument list",
        right(tok(TT::OpenParen), left(argument_list, tok(TT::CloseParen))),
    )
    .parse(input)
}

fn argument_list(input: ParserInput) -> ParseResult<Vec<Expression>> {
    if input.at(TT::CloseParen) {
        return Ok((vec![], input));
    }
    sep_by(expression, TT::Comma).parse(input)
}

// member: primary ('.' IDENTIFIER)*
fn member(input: ParserInput) -> ParseResult<Expression> {
    pair(
        primary,
        zero_or_more_while(
            |t| t.typ == TT::Dot,
            in_context("member access", right(tok(TT::Dot), name)),
        ),
    )
    .map(|(object, properties)| {
        properties
            .into_iter()
            .fold(object, |object, property| Expression::Member(Box::new(object), property))
    })
    .parse(input)
}

// primary: IDENTIFIER | NUMBER | 'null' | '(' expression ')'
fn primary(input: ParserInput) -> ParseResult<Expression> {
    match input.peek().typ {
        TT::Identifier => name.map(Expression::Identifier).parse(input),
        TT::Number => number(input),
        TT::Null => tok(TT::Null)
            .map(|_| Expression::NullLiteral)
            .parse(input),
        TT::OpenParen => in_context(
            "parenthesized expression",
            right(tok(TT::OpenParen), left(expression, tok(TT::CloseParen))),
        )
        .parse(input),
        _ => Err(input.unexpected(Expected::Expression)),
    }
}

fn number(input: ParserInput) -> ParseResult<Expression> {
    let (token, rest) = tok(TT::Number).parse(input)?;
    let value = token
        .lexeme
        .parse::<i64>()
        .map_err(|_| ParseError::invalid_number(&token))?;
    Ok((Expression::NumericLiteral(value), rest))
}

fn name(input: ParserInput) -> ParseResult<Name> {
    tok(TT::Identifier).map(Name::from).parse(input)
}
