use string_interner::symbol::SymbolUsize;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Keyword {
    Fn,
    Let,
    If,
    Else,
    Return,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Punctuation {
    OpenParen,
    CloseParen,
    OpenBrace,
    CloseBrace,
    OpenBracket,
    CloseBracket,
    Comma,
    Colon,
    Semicolon,
    Hash,
    Bang,

    Plus,
    PlusPlus,
    Minus, // Binop and Unary
    MinusMinus,
    Star,
    Slash,
    Percent,
    Eq,
    EqEq,
    NotEq,
    LessThan,
    LessThanOrEq,
    GreaterThan,
    GreaterThanOrEq,
    ShiftLeft,
    ShiftRight,

    Amp,
    AmpAmp,
    Pipe,
    PipePipe,
    Caret,

    PlusEq,
    MinusEq,
    StarEq,
    SlashEq,
    PercentEq,
    AmpEq,
    PipeEq,
    CaretEq,
    ShiftLeftEq,
    ShiftRightEq,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveTypes {
    I32,
    I64,
    F32,
    F64,
    Bool,
    /// a deferred graph value
    Symbolic,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TokenKind {
    IntLiteral(i64),
    FloatLiteral(f64),
    BoolLiteral(bool),
    StringLiteral(SymbolUsize),
    Keyword(Keyword),
    TypeLiteral(PrimitiveTypes),
    Punctuation(Punctuation),
    Identifier(SymbolUsize),
    Eof,
}

/// A span of text in a file. Start and end are inclusive.
#[derive(Debug, Clone, PartialEq, Eq, Copy)]
pub struct Span {
    pub file: SymbolUsize,
    pub start: (usize, usize),
    pub end: (usize, usize),
}

#[derive(Debug, Clone, PartialEq, Copy)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}

impl Span {
    pub fn new(file: SymbolUsize, start_line: usize, start_col: usize, end_line: usize, end_col: usize) -> Self {
        Self {
            file,
            start: (start_line, start_col),
            end: (end_line, end_col),
        }
    }

    fn connect(&self, other: &Self) -> ((usize, usize), (usize, usize)) {
        let start = self.start.min(other.start);
        let end = self.end.max(other.end);
        (start, end)
    }

    pub fn connect_mut(&mut self, other: &Self) -> &mut Self {
        let (start, end) = self.connect(other);
        self.start = start;
        self.end = end;
        self
    }

    pub fn connect_new(&self, other: &Self) -> Self {
        let (start, end) = self.connect(other);
        Self {
            file: self.file,
            start,
            end,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplaySpan {
    pub file: String,
    pub start: (usize, usize),
    pub end: (usize, usize),
}
