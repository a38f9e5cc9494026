use super::error::{Expected, ParseError};
use super::locations::Span;
use super::tokenizer::{Token, TokenType};

pub type ParseResult<'a, Output> = Result<(Output, ParserInput<'a>), ParseError>;

// Stands in for the sentinel when a caller hands over a sequence without one.
static END_OF_INPUT: Token = Token {
    typ: TokenType::EndOfFile,
    lexeme: String::new(),
    span: Span::EMPTY,
};

#[derive(Debug, Clone, Copy)]
pub struct ParserInput<'a>(&'a [Token]);

impl<'a> ParserInput<'a> {
    pub fn new(input: &'a [Token]) -> Self {
        Self(input)
    }

    pub(super) fn peek(&self) -> &'a Token {
        self.0.first().unwrap_or(&END_OF_INPUT)
    }

    pub(super) fn at(&self, typ: TokenType) -> bool {
        self.peek().typ == typ
    }

    fn advance(&self) -> (Token, Self) {
        match self.0.split_first() {
            Some((token, rest)) => (token.clone(), Self(rest)),
            None => (END_OF_INPUT.clone(), *self),
        }
    }

    pub(super) fn unexpected(&self, expected: Expected) -> ParseError {
        ParseError::unexpected(expected, self.peek())
    }
}

pub(super) trait Parser<'a, Output> {
    fn parse(&self, input: ParserInput<'a>) -> ParseResult<'a, Output>;
    fn map<F, MappedOutput>(self, map_fn: F) -> BoxedParser<'a, MappedOutput>
    where
        Self: Sized + 'a,
        Output: 'a,
        MappedOutput: 'a,
        F: Fn(Output) -> MappedOutput + 'a,
    {
        BoxedParser::new(map(self, map_fn))
    }
}

impl<'a, F, Output> Parser<'a, Output> for F
where
    F: Fn(ParserInput<'a>) -> ParseResult<'a, Output>,
{
    fn parse(&self, input: ParserInput<'a>) -> ParseResult<'a, Output> {
        self(input)
    }
}

pub(super) struct BoxedParser<'a, Output> {
    parser: Box<dyn Parser<'a, Output> + 'a>,
}

impl<'a, Output> BoxedParser<'a, Output> {
    fn new(parser: impl Parser<'a, Output> + 'a) -> Self {
        Self {
            parser: Box::new(parser),
        }
    }
}

impl<'a, Output> Parser<'a, Output> for BoxedParser<'a, Output> {
    fn parse(&self, input: ParserInput<'a>) -> ParseResult<'a, Output> {
        self.parser.parse(input)
    }
}

pub(super) fn pair<'a, R1, R2>(
    parser1: impl Parser<'a, R1>,
    parser2: impl Parser<'a, R2>,
) -> impl Parser<'a, (R1, R2)> {
    move |input: ParserInput<'a>| -> ParseResult<'a, (R1, R2)> {
        let (result1, next_input) = parser1.parse(input)?;
        let (result2, rest) = parser2.parse(next_input)?;
        Ok(((result1, result2), rest))
    }
}

pub(super) fn map<'a, F, A, B>(parser: impl Parser<'a, A>, map_fn: F) -> impl Parser<'a, B>
where
    F: Fn(A) -> B,
{
    move |input: ParserInput<'a>| {
        parser
            .parse(input)
            .map(|(result, rest)| (map_fn(result), rest))
    }
}

pub(super) fn left<'a, A, B>(
    left_parser: impl Parser<'a, A>,
    right_parser: impl Parser<'a, B>,
) -> impl Parser<'a, A> {
    map(pair(left_parser, right_parser), |(left, _right)| left)
}

pub(super) fn right<'a, A, B>(
    left_parser: impl Parser<'a, A>,
    right_parser: impl Parser<'a, B>,
) -> impl Parser<'a, B> {
    map(pair(left_parser, right_parser), |(_left, right)| right)
}

/// Runs `parser` only when the next token has type `lookahead`. The choice is
/// made on that one token; once `parser` starts, its errors are final.
pub(super) fn when<'a, R>(
    lookahead: TokenType,
    parser: impl Parser<'a, R>,
) -> impl Parser<'a, Option<R>> {
    move |input: ParserInput<'a>| -> ParseResult<'a, Option<R>> {
        if input.at(lookahead) {
            let (result, rest) = parser.parse(input)?;
            Ok((Some(result), rest))
        } else {
            Ok((None, input))
        }
    }
}

/// Repeats `parser` for as long as the next token satisfies `lookahead`.
pub(super) fn zero_or_more_while<'a, R>(
    lookahead: impl Fn(&Token) -> bool,
    parser: impl Parser<'a, R>,
) -> impl Parser<'a, Vec<R>> {
    move |input: ParserInput<'a>| -> ParseResult<'a, Vec<R>> {
        let mut result = Vec::new();
        let mut tmp_input = input;
        while lookahead(tmp_input.peek()) {
            let (next, rest) = parser.parse(tmp_input)?;
            tmp_input = rest;
            result.push(next);
        }
        Ok((result, tmp_input))
    }
}

/// Repeats `parser` until the next token has type `stop` or input runs out.
/// The stop token itself is left in place.
pub(super) fn zero_or_more_until<'a, R>(
    stop: TokenType,
    parser: impl Parser<'a, R>,
) -> impl Parser<'a, Vec<R>> {
    zero_or_more_while(
        move |token: &Token| token.typ != stop && token.typ != TokenType::EndOfFile,
        parser,
    )
}

pub(super) fn sep_by<'a, R>(parser: impl Parser<'a, R>, sep: TokenType) -> impl Parser<'a, Vec<R>> {
    move |input: ParserInput<'a>| -> ParseResult<'a, Vec<R>> {
        let (first, mut tmp_input) = parser.parse(input)?;
        let mut result = vec![first];
        while tmp_input.at(sep) {
            let (_, after_sep) = tok(sep).parse(tmp_input)?;
            let (next, rest) = parser.parse(after_sep)?;
            tmp_input = rest;
            result.push(next);
        }
        Ok((result, tmp_input))
    }
}

pub(super) fn tok<'a>(expected_type: TokenType) -> impl Parser<'a, Token> {
    move |input: ParserInput<'a>| {
        if input.at(expected_type) {
            Ok(input.advance())
        } else {
            Err(input.unexpected(Expected::Token(expected_type)))
        }
    }
}

/// Matches a token of type `typ` whose lexeme `from_lexeme` accepts.
pub(super) fn operator<'a, O>(
    typ: TokenType,
    from_lexeme: impl Fn(&str) -> Option<O>,
    expected: &'static str,
) -> impl Parser<'a, O> {
    move |input: ParserInput<'a>| {
        let token = input.peek();
        match from_lexeme(&token.lexeme) {
            Some(op) if token.typ == typ => Ok((op, input.advance().1)),
            _ => Err(input.unexpected(Expected::Lexeme(expected))),
        }
    }
}

/// Names the grammar rule that was active when a nested rule failed. The
/// innermost named rule wins.
pub(super) fn in_context<'a, R>(
    context: &'static str,
    parser: impl Parser<'a, R>,
) -> impl Parser<'a, R> {
    move |input: ParserInput<'a>| parser.parse(input).map_err(|err| err.within(context))
}
