use crate::builtin::MathFn;

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Eof,

    // Identifiers and Literals
    Identifier,
    Float,

    // Keywords
    Math(MathFn),
    Pi,

    // Operators
    Equals,
    Plus,
    Minus,
    Mul,
    Div,
    Mod,
    Pow,
    And,
    Tilde,
    Or,
    Period,
    Not,

    // Delimiters
    Comma,
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        #[rustfmt::skip]
        let pretty = match self {
            TokenKind::Math(function) => return write!(f, "{}", function),
            TokenKind::Eof        => "EOF",
            TokenKind::Identifier => "identifier",
            TokenKind::Float      => "number",
            TokenKind::Pi         => "pi",
            TokenKind::Equals     => "=",
            TokenKind::Plus       => "+",
            TokenKind::Minus      => "-",
            TokenKind::Mul        => "*",
            TokenKind::Div        => "/",
            TokenKind::Mod        => "%",
            TokenKind::Pow        => "^",
            TokenKind::And        => "&",
            TokenKind::Tilde      => "~",
            TokenKind::Or         => "|",
            TokenKind::Period     => ".",
            TokenKind::Not        => "!",
            TokenKind::Comma      => ",",
            TokenKind::LParen     => "(",
            TokenKind::RParen     => ")",
            TokenKind::LBracket   => "[",
            TokenKind::RBracket   => "]",
            TokenKind::LBrace     => "{",
            TokenKind::RBrace     => "}",
        };

        write!(f, "{}", pretty)
    }
}

impl TokenKind {
    /// Opening bracket of a grouping literal.
    pub fn is_group_open(&self) -> bool {
        matches!(self, TokenKind::LBrace | TokenKind::LBracket)
    }

    pub fn closes(&self, open: TokenKind) -> bool {
        matches!(
            (open, self),
            (TokenKind::LParen, TokenKind::RParen)
                | (TokenKind::LBrace, TokenKind::RBrace)
                | (TokenKind::LBracket, TokenKind::RBracket)
        )
    }

    /// Keywords that may be followed by an argument list.
    pub fn math(&self) -> Option<MathFn> {
        match self {
            TokenKind::Math(function) => Some(*function),
            _ => None,
        }
    }
}

/// One lexeme. `index` points into the scanner's string table for
/// identifiers and into its real table for numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub index: Option<usize>,
    pub line: usize,
}

impl Token {
    pub fn new(kind: TokenKind, line: usize) -> Token {
        Token {
            kind,
            index: None,
            line,
        }
    }

    pub fn with_index(kind: TokenKind, index: usize, line: usize) -> Token {
        Token {
            kind,
            index: Some(index),
            line,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)
    }
}

#[rustfmt::skip]
pub const KEYWORDS: [(&str, TokenKind); 22] = [
    ("abs",   TokenKind::Math(MathFn::Abs)),
    ("acos",  TokenKind::Math(MathFn::Acos)),
    ("asin",  TokenKind::Math(MathFn::Asin)),
    ("atan",  TokenKind::Math(MathFn::Atan)),
    ("atan2", TokenKind::Math(MathFn::Atan2)),
    ("ceil",  TokenKind::Math(MathFn::Ceil)),
    ("cosh",  TokenKind::Math(MathFn::Cosh)),
    ("fabs",  TokenKind::Math(MathFn::Fabs)),
    ("floor", TokenKind::Math(MathFn::Floor)),
    ("fmod",  TokenKind::Math(MathFn::Fmod)),
    ("log10", TokenKind::Math(MathFn::Log10)),
    ("sinh",  TokenKind::Math(MathFn::Sinh)),
    ("sqrt",  TokenKind::Math(MathFn::Sqrt)),
    ("tanh",  TokenKind::Math(MathFn::Tanh)),
    ("cos",   TokenKind::Math(MathFn::Cos)),
    ("exp",   TokenKind::Math(MathFn::Exp)),
    ("log",   TokenKind::Math(MathFn::Log)),
    ("mod",   TokenKind::Math(MathFn::Fmod)),
    ("pow",   TokenKind::Math(MathFn::Pow)),
    ("sin",   TokenKind::Math(MathFn::Sin)),
    ("tan",   TokenKind::Math(MathFn::Tan)),
    ("pi",    TokenKind::Pi),
];

/// Case-sensitive keyword lookup by exact spelling.
pub fn lookup_keyword(word: &[u8]) -> Option<TokenKind> {
    KEYWORDS
        .iter()
        .find(|(keyword, _)| keyword.as_bytes() == word)
        .map(|(_, kind)| *kind)
}
