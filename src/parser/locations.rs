use super::tokenizer::Token;

/// Zero-based line and column in the source text. Columns count characters,
/// not bytes.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
pub struct Location {
    pub(crate) line: usize,
    pub(crate) column: usize,
}

impl Location {
    pub(crate) fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}, column {}", self.line + 1, self.column + 1)
    }
}

pub trait Locatable {
    fn span(&self) -> Span;
}

#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
pub struct Span {
    pub(crate) start: Location,
    pub(crate) end: Location,
}

impl Span {
    pub(crate) const EMPTY: Self = Self {
        start: Location { line: 0, column: 0 },
        end: Location { line: 0, column: 0 },
    };

    pub(super) fn new(start_line: usize, start_col: usize, end_line: usize, end_col: usize) -> Self {
        Self {
            start: Location::new(start_line, start_col),
            end: Location::new(end_line, end_col),
        }
    }

    pub fn start(&self) -> Location {
        self.start
    }

    pub fn end(&self) -> Location {
        self.end
    }
}

impl Locatable for Token {
    fn span(&self) -> Span {
        self.span
    }
}
