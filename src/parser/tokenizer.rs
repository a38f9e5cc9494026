use super::error::LexError;
use super::locations::{Location, Span};
use const_format::concatcp;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, trace};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub(crate) typ: TokenType,
    pub(crate) lexeme: String,
    pub(crate) span: Span,
}

impl Token {
    pub fn typ(&self) -> TokenType {
        self.typ
    }

    pub fn lexeme(&self) -> &str {
        &self.lexeme
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}('{}')", self.typ, self.lexeme)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TokenType {
    Number,
    Identifier,
    // keywords
    Let,
    Type,
    Null,
    ComparisonOperator,
    BinaryOperator,
    Assignment,
    Semicolon,
    OpenParen,
    CloseParen,
    OpenBrace,
    CloseBrace,
    Comma,
    Dot,
    EndOfFile,
}

impl std::fmt::Display for TokenType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Number => "number",
            Self::Identifier => "identifier",
            Self::Let => "'var'",
            Self::Type => "'type'",
            Self::Null => "'null'",
            Self::ComparisonOperator => "comparison operator",
            Self::BinaryOperator => "arithmetic operator",
            Self::Assignment => "'='",
            Self::Semicolon => "';'",
            Self::OpenParen => "'('",
            Self::CloseParen => "')'",
            Self::OpenBrace => "'{'",
            Self::CloseBrace => "'}'",
            Self::Comma => "','",
            Self::Dot => "'.'",
            Self::EndOfFile => "end of input",
        };
        f.write_str(name)
    }
}

const KEYWORDS: [(&str, TokenType); 3] = [
    ("type", TokenType::Type),
    ("var", TokenType::Let),
    ("null", TokenType::Null),
];

// Two-character operators come first so that matching is greedy.
const SIMPLE_TOKENS: [(&str, TokenType); 19] = [
    ("==", TokenType::ComparisonOperator),
    ("!=", TokenType::ComparisonOperator),
    (">=", TokenType::ComparisonOperator),
    ("<=", TokenType::ComparisonOperator),
    ("=", TokenType::Assignment),
    (">", TokenType::ComparisonOperator),
    ("<", TokenType::ComparisonOperator),
    ("+", TokenType::BinaryOperator),
    ("-", TokenType::BinaryOperator),
    ("*", TokenType::BinaryOperator),
    ("/", TokenType::BinaryOperator),
    ("%", TokenType::BinaryOperator),
    ("(", TokenType::OpenParen),
    (")", TokenType::CloseParen),
    ("{", TokenType::OpenBrace),
    ("}", TokenType::CloseBrace),
    (",", TokenType::Comma),
    (".", TokenType::Dot),
    (";", TokenType::Semicolon),
];

const EXCLAMATION: &str = "!";

const S_LETTERS: &str = r"\p{L}+";
const S_DIGITS: &str = r"[0-9]+";
const S_WHITESPACE: &str = r"^[ \t\r]+";
const S_NAME: &str = concatcp!("^", S_LETTERS);
const S_NUMBER: &str = concatcp!("^", S_DIGITS);

static WHITESPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(S_WHITESPACE).expect("Error compiling regex."));
static NAME: Lazy<Regex> = Lazy::new(|| Regex::new(S_NAME).expect("Error compiling regex."));
static NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(S_NUMBER).expect("Error compiling regex."));

// `start` indexes bytes of the current line, `column` counts its characters.
#[derive(Default)]
pub struct Tokenizer {
    tokens: Vec<Token>,
    start: usize,
    column: usize,
    last_location: Location,
}

impl Tokenizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds the tokenizer one line at a time. Stops at the first character
    /// that cannot start a token.
    pub fn tokenize<'a>(&mut self, input: impl Iterator<Item = &'a str>) -> Result<(), LexError> {
        for (lineno, line) in input.enumerate() {
            self.tokenize_line(line, lineno)?;
        }
        Ok(())
    }

    /// Appends the end-of-input sentinel and hands out the token sequence.
    pub fn finalize(mut self) -> Vec<Token> {
        let loc = self.last_location;
        self.tokens.push(Token {
            typ: TokenType::EndOfFile,
            lexeme: String::new(),
            span: Span::new(loc.line, loc.column, loc.line, loc.column),
        });
        self.tokens
    }

    fn tokenize_line(&mut self, line: &str, lineno: usize) -> Result<(), LexError> {
        self.start = 0;
        self.column = 0;

        'line: while self.start < line.len() {
            let rest = &line[self.start..];

            if let Some(m) = WHITESPACE.find(rest) {
                self.skip(m.as_str());
                continue;
            }
            if let Some(m) = NAME.find(rest) {
                let typ = KEYWORDS
                    .iter()
                    .find(|(keyword, _)| *keyword == m.as_str())
                    .map_or(TokenType::Identifier, |(_, typ)| *typ);
                self.push(typ, m.as_str(), lineno);
                continue;
            }
            if let Some(m) = NUMBER.find(rest) {
                self.push(TokenType::Number, m.as_str(), lineno);
                continue;
            }
            for (lexeme, tok_type) in SIMPLE_TOKENS {
                if rest.starts_with(lexeme) {
                    self.push(tok_type, lexeme, lineno);
                    continue 'line;
                }
            }
            if rest.starts_with(EXCLAMATION) {
                // Negation has no token yet; the character is dropped.
                trace!(line = lineno, column = self.column, "skipping unsupported '!'");
                self.skip(EXCLAMATION);
                continue;
            }

            let character = rest.chars().next().unwrap_or_default();
            return Err(LexError::UnexpectedCharacter {
                character,
                location: Location::new(lineno, self.column),
            });
        }
        self.last_location = Location::new(lineno, self.column);
        Ok(())
    }

    fn push(&mut self, typ: TokenType, lexeme: &str, lineno: usize) {
        let start = self.column;
        self.skip(lexeme);
        self.tokens.push(Token {
            typ,
            lexeme: lexeme.to_string(),
            span: Span::new(lineno, start, lineno, self.column),
        });
    }

    fn skip(&mut self, text: &str) {
        self.start += text.len();
        self.column += text.chars().count();
    }
}

/// Converts source text into a token sequence terminated by
/// [`TokenType::EndOfFile`].
#[tracing::instrument(level = "debug", skip_all)]
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    let mut tokenizer = Tokenizer::new();
    tokenizer.tokenize(source.split('\n'))?;
    let tokens = tokenizer.finalize();
    debug!(count = tokens.len(), "tokenized source");
    Ok(tokens)
}
