use crate::error::{EqError, Result};
use crate::scanner::intern::{RealTable, StringTable};
use crate::scanner::source::Source;
use crate::scanner::token::{lookup_keyword, Token, TokenKind};
use crate::vm::Real;

use std::str;

/// Turns a character source into tokens, one lexeme per call to [`Scanner::scan`].
///
/// Identifier spellings and numeric values are not carried by the token
/// itself; they are interned into side tables and the token holds the index.
#[derive(Debug, Default)]
pub struct Scanner {
    source: Source,
    line: usize,
    strings: StringTable,
    reals: RealTable,
    buffer: Vec<u8>,
}

impl Scanner {
    pub fn new() -> Scanner {
        Scanner {
            line: 1,
            ..Scanner::default()
        }
    }

    /// Attaches a new input and discards the side tables of the previous one.
    pub fn attach<B>(&mut self, input: B)
    where
        B: Into<Vec<u8>>,
    {
        self.source = Source::new(input);
        self.line = 1;
        self.cleanup();
    }

    pub fn cleanup(&mut self) {
        self.strings.clear();
        self.reals.clear();
        self.buffer.clear();
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn string(&self, index: usize) -> Option<&str> {
        self.strings.get(index).map(String::as_str)
    }

    pub fn real(&self, index: usize, default: Real) -> Real {
        self.reals.get(index).copied().unwrap_or(default)
    }

    pub fn scan(&mut self) -> Result<Token> {
        while let Some(ch) = self.source.get() {
            let kind = match ch {
                b'a'..=b'z' | b'A'..=b'Z' => {
                    self.source.putback();
                    return self.scan_identifier();
                }
                b'0'..=b'9' => {
                    self.source.putback();
                    return self.scan_number();
                }
                b'=' => TokenKind::Equals,
                b'{' => TokenKind::LBrace,
                b'}' => TokenKind::RBrace,
                b'[' => TokenKind::LBracket,
                b']' => TokenKind::RBracket,
                b'(' => TokenKind::LParen,
                b')' => TokenKind::RParen,
                b'+' => TokenKind::Plus,
                b'-' => TokenKind::Minus,
                b'*' => TokenKind::Mul,
                b'/' => TokenKind::Div,
                b'^' => TokenKind::Pow,
                b'.' => TokenKind::Period,
                b'!' => TokenKind::Not,
                b',' => TokenKind::Comma,
                // recognized, but they never end a lexeme
                b'%' | b'&' | b'~' | b'|' => continue,
                b'\n' => {
                    self.line += 1;
                    continue;
                }
                b'\r' | b'\t' | b' ' => continue,
                b'#' => {
                    self.skip_line_comment();
                    continue;
                }
                _ => return Err(EqError::unknown_character(self.line, ch)),
            };

            return Ok(Token::new(kind, self.line));
        }

        Ok(Token::new(TokenKind::Eof, self.line))
    }

    // <letter>(<letter>|<digit>)*
    fn scan_identifier(&mut self) -> Result<Token> {
        self.read_while(|ch| ch.is_ascii_alphanumeric());

        if let Some(kind) = lookup_keyword(&self.buffer) {
            return Ok(Token::new(kind, self.line));
        }

        let text = str::from_utf8(&self.buffer)
            .map_err(|_| EqError::scan_error(self.line, "invalid identifier"))?
            .to_string();
        let index = self.strings.insert(text);

        Ok(Token::with_index(TokenKind::Identifier, index, self.line))
    }

    // <digit>+ ((.|E|e) (<digit>|+|-|.|F|f)*)?
    fn scan_number(&mut self) -> Result<Token> {
        let mut exponent = false;

        self.read_while(|ch| {
            let accepted = ch.is_ascii_digit()
                || (!exponent && matches!(ch, b'.' | b'E' | b'e'))
                || (exponent && matches!(ch, b'+' | b'-' | b'.' | b'F' | b'f'));

            if ch == b'E' || ch == b'e' {
                exponent = true;
            }

            accepted
        });

        if self.buffer.is_empty() {
            return Err(EqError::scan_error(self.line, "expected to parse a double"));
        }

        let value = self.to_real()?;
        let index = self.reals.insert(value);

        Ok(Token::with_index(TokenKind::Float, index, self.line))
    }

    /// Converts the longest valid prefix of the buffer, the way `strtod` does.
    fn to_real(&self) -> Result<Real> {
        let text = str::from_utf8(&self.buffer)
            .map_err(|_| EqError::scan_error(self.line, "invalid number"))?;

        let value = (1..=text.len())
            .rev()
            .find_map(|end| text[..end].parse::<Real>().ok());

        match value {
            Some(value) => Ok(value),
            None => Ok(text.parse::<Real>()?),
        }
    }

    /// Fills the scratch buffer with the maximal run of accepted characters
    /// and puts back the first one that was rejected.
    fn read_while<P>(&mut self, mut predicate: P)
    where
        P: FnMut(u8) -> bool,
    {
        self.buffer.clear();

        while let Some(ch) = self.source.get() {
            if predicate(ch) {
                self.buffer.push(ch);
            } else {
                self.source.putback();
                break;
            }
        }
    }

    fn skip_line_comment(&mut self) {
        while let Some(ch) = self.source.peek() {
            if ch == b'\n' {
                break;
            }
            self.source.get();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::builtin::MathFn;

    use test_case::test_case;

    fn kinds(input: &str) -> Vec<TokenKind> {
        let mut scanner = Scanner::new();
        scanner.attach(input);

        let mut kinds = vec![];
        loop {
            let token = scanner.scan().unwrap();
            if token.kind == TokenKind::Eof {
                break;
            }
            kinds.push(token.kind);
        }

        kinds
    }

    #[test]
    fn scan_numbers() {
        let mut scanner = Scanner::new();
        scanner.attach("123 * 987");

        let token = scanner.scan().unwrap();
        assert_eq!(token.kind, TokenKind::Float);
        assert_eq!(scanner.real(token.index.unwrap(), 0.0), 123.0);

        assert_eq!(scanner.scan().unwrap().kind, TokenKind::Mul);

        let token = scanner.scan().unwrap();
        assert_eq!(token.kind, TokenKind::Float);
        assert_eq!(scanner.real(token.index.unwrap(), 0.0), 987.0);

        assert_eq!(scanner.scan().unwrap().kind, TokenKind::Eof);
        assert_eq!(scanner.scan().unwrap().kind, TokenKind::Eof);
    }

    #[test]
    fn scan_operators() {
        let expected = vec![
            TokenKind::Mul,
            TokenKind::Div,
            TokenKind::Plus,
            TokenKind::Minus,
            TokenKind::LParen,
            TokenKind::RParen,
            TokenKind::LBrace,
            TokenKind::RBrace,
            TokenKind::LBracket,
            TokenKind::RBracket,
            TokenKind::Comma,
            TokenKind::Period,
            TokenKind::Equals,
            TokenKind::Pow,
            TokenKind::Not,
        ];

        assert_eq!(kinds("*/+-(){}[],.=^!"), expected)
    }

    #[test]
    fn scan_keywords() {
        let input = "abs acos asin atan atan2 ceil cosh fabs floor fmod log10 \
                     sinh sqrt tanh cos exp log mod pow sin tan pi";

        let tokens = kinds(input);

        assert_eq!(tokens.len(), 22);
        assert!(tokens
            .iter()
            .all(|kind| kind.math().is_some() || *kind == TokenKind::Pi));
        assert_eq!(tokens[17], TokenKind::Math(MathFn::Fmod));
    }

    #[test_case("1.5",     1.5      ; "fraction")]
    #[test_case("2e3",     2000.0   ; "exponent")]
    #[test_case("2E+2",    200.0    ; "signed exponent")]
    #[test_case("25e-1",   2.5      ; "negative exponent")]
    #[test_case("1.5e2f",  150.0    ; "float suffix")]
    #[test_case("1.2.3",   1.2      ; "strtod prefix")]
    #[test_case("7e",      7.0      ; "dangling exponent")]
    #[test_case("4.",      4.0      ; "trailing period")]
    fn test_scan_real(input: &str, expected: Real) {
        let mut scanner = Scanner::new();
        scanner.attach(input);

        let token = scanner.scan().unwrap();

        assert_eq!(token.kind, TokenKind::Float);
        assert_eq!(scanner.real(token.index.unwrap(), Real::NAN), expected);
        assert_eq!(scanner.scan().unwrap().kind, TokenKind::Eof);
    }

    #[test]
    fn float_suffix_requires_exponent() {
        assert_eq!(kinds("1.5f"), vec![TokenKind::Float, TokenKind::Identifier]);
    }

    #[test]
    fn second_exponent_marker_ends_number() {
        assert_eq!(kinds("1e2e3"), vec![TokenKind::Float, TokenKind::Identifier]);
    }

    #[test]
    fn identifiers_are_interned() {
        let mut scanner = Scanner::new();
        scanner.attach("x1 + y + x1");

        let x = scanner.scan().unwrap();
        scanner.scan().unwrap();
        let y = scanner.scan().unwrap();
        scanner.scan().unwrap();
        let x_again = scanner.scan().unwrap();

        assert_eq!(x.kind, TokenKind::Identifier);
        assert_eq!(x.index, x_again.index);
        assert_ne!(x.index, y.index);
        assert_eq!(scanner.string(x.index.unwrap()), Some("x1"));
        assert_eq!(scanner.string(y.index.unwrap()), Some("y"));
    }

    #[test]
    fn comments_and_lines() {
        let mut scanner = Scanner::new();
        scanner.attach("# a comment = 1\n\n  x # trailing\r\n y");

        let x = scanner.scan().unwrap();
        let y = scanner.scan().unwrap();

        assert_eq!(x.kind, TokenKind::Identifier);
        assert_eq!(x.line, 3);
        assert_eq!(y.line, 4);
        assert_eq!(scanner.scan().unwrap().kind, TokenKind::Eof);
    }

    #[test]
    fn skipped_operators() {
        assert_eq!(
            kinds("7 % 3 & | ~"),
            vec![TokenKind::Float, TokenKind::Float]
        );
    }

    #[test_case("1 @ 2", 1 ; "at sign")]
    #[test_case("\n\nx $", 3 ; "dollar on line three")]
    #[test_case("x_y", 1 ; "underscore")]
    fn test_unknown_character(input: &str, line: usize) {
        let mut scanner = Scanner::new();
        scanner.attach(input);

        let error = loop {
            match scanner.scan() {
                Ok(token) if token.kind == TokenKind::Eof => panic!("expected a scan error"),
                Ok(_) => continue,
                Err(error) => break error,
            }
        };

        match error {
            EqError::ScanError(msg) => assert!(msg.starts_with(&format!("line {}:", line))),
            error => panic!("unexpected error {}", error),
        }
    }

    #[test]
    fn attach_resets_tables() {
        let mut scanner = Scanner::new();
        scanner.attach("alpha 2.5");
        scanner.scan().unwrap();
        scanner.scan().unwrap();

        scanner.attach("beta");
        let token = scanner.scan().unwrap();

        assert_eq!(token.index, Some(0));
        assert_eq!(scanner.string(0), Some("beta"));
        assert_eq!(scanner.real(0, -1.0), -1.0);
        assert_eq!(scanner.line(), 1);
    }
}
