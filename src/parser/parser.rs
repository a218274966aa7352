use crate::error::{EqError, Result};
use crate::parser::state::CallState;
use crate::scanner::{Scanner, Token, TokenKind};
use crate::symbol::{Program, Symbol};
use crate::vm::Real;

use std::collections::VecDeque;
use std::f64::consts::PI;
use std::io::Read;

use tracing::{debug, trace};

pub const DEFAULT_MAX_DEPTH: usize = 0x80;
pub const MIN_DEPTH: usize = 0x10;
pub const MAX_DEPTH: usize = 0x800;

/*
   Invariant:
   (1) A rule is only entered with `token(0)` on the first token of its
     production, or on the token it has to report as unexpected.

   (2) If a rule returns Ok(()), `token(0)` is the first token after the
     production and every symbol of the production has been appended.

   Rules never build a tree. Each one appends the symbols of its operands
   first and its own symbol last, so `symbols` is a postfix program.

   Same-precedence chains re-enter the same rule for their right operand,
   which makes `8 - 4 - 2` evaluate as `8 - (4 - 2)`.
*/
#[derive(Debug)]
pub struct Parser {
    scanner: Scanner,
    window: VecDeque<Token>,
    cursor: usize,
    symbols: Vec<Symbol>,
    max_depth: usize,
}

impl Default for Parser {
    fn default() -> Self {
        Parser::new()
    }
}

impl Parser {
    pub fn new() -> Parser {
        Parser::with_max_depth(DEFAULT_MAX_DEPTH)
    }

    /// `max_depth` bounds the rule entries of a single statement and is
    /// clamped to `[MIN_DEPTH, MAX_DEPTH]`.
    pub fn with_max_depth(max_depth: usize) -> Parser {
        Parser {
            scanner: Scanner::new(),
            window: VecDeque::new(),
            cursor: 0,
            symbols: vec![],
            max_depth: max_depth.clamp(MIN_DEPTH, MAX_DEPTH),
        }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Replaces the current program with the one parsed from `input`.
    ///
    /// On error the program is left empty.
    pub fn read(&mut self, input: &str) -> Result<()> {
        self.parse(input)
    }

    pub fn read_from<R>(&mut self, mut reader: R) -> Result<()>
    where
        R: Read,
    {
        let mut input = vec![];
        reader.read_to_end(&mut input)?;

        self.parse(input)
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    pub fn program(&self) -> Program<'_> {
        Program(&self.symbols)
    }

    fn parse<B>(&mut self, input: B) -> Result<()>
    where
        B: Into<Vec<u8>>,
    {
        self.symbols.clear();
        self.window.clear();
        self.cursor = 0;
        self.scanner.attach(input);

        let result = self.parse_statements();

        self.window.clear();
        self.scanner.cleanup();

        match result {
            Ok(()) => {
                debug!(symbols = self.symbols.len(), "parsed program");
                Ok(())
            }
            Err(err) => {
                debug!(error = %err, "parse fault, program discarded");
                self.symbols.clear();
                Err(err)
            }
        }
    }

    // <eq>*
    fn parse_statements(&mut self) -> Result<()> {
        let mut state = CallState::new(self.max_depth);

        loop {
            let token = self.token(0)?;
            if token.kind == TokenKind::Eof {
                break;
            }

            trace!(line = token.line, "statement");

            let start = self.cursor;
            self.parse_eq(&mut state)?;

            if self.cursor == start {
                self.advance(1)?; // advance over a token no rule consumed
            }
        }

        Ok(())
    }

    /// Token `n` positions past the cursor. Once the input is exhausted every
    /// lookahead is `Eof`.
    fn token(&mut self, n: usize) -> Result<Token> {
        while self.window.len() <= n {
            let token = match self.window.back() {
                Some(last) if last.kind == TokenKind::Eof => *last,
                _ => self.scanner.scan()?,
            };
            self.window.push_back(token);
        }

        Ok(self.window[n])
    }

    fn advance(&mut self, n: usize) -> Result<()> {
        for _ in 0..n {
            if self.token(0)?.kind == TokenKind::Eof {
                break;
            }
            self.window.pop_front();
            self.cursor += 1;
        }

        Ok(())
    }

    fn advance_if(&mut self, kind: TokenKind) -> Result<()> {
        let token = self.token(0)?;

        if token.kind == kind {
            self.advance(1)
        } else {
            Err(EqError::parser_error(kind.to_string(), token.to_string()))
        }
    }

    fn name(&self, token: &Token) -> Result<String> {
        token
            .index
            .and_then(|index| self.scanner.string(index))
            .map(str::to_string)
            .ok_or_else(|| EqError::parser_error("identifier", token.to_string()))
    }

    fn value(&self, token: &Token) -> Real {
        token
            .index
            .map_or(0.0, |index| self.scanner.real(index, 0.0))
    }

    fn emit(&mut self, symbol: Symbol) {
        self.symbols.push(symbol);
    }

    // <asn>(<,><asn>)* | <op>
    fn parse_eq(&mut self, state: &mut CallState) -> Result<()> {
        state.reset();

        if self.token(1)?.kind == TokenKind::Equals {
            self.parse_csv(state, Parser::parse_asn)
        } else {
            self.parse_op(state)
        }
    }

    // <f>(<,><f>)*
    fn parse_csv<F>(&mut self, state: &mut CallState, f: F) -> Result<()>
    where
        F: Fn(&mut Parser, &mut CallState) -> Result<()>,
    {
        state.guard()?;

        let mut comma = 0;
        f(self, state)?;

        while self.token(0)?.kind == TokenKind::Comma {
            self.advance(1)?; // advance over `TokenKind::Comma`
            comma += 1;
            f(self, state)?;
        }

        state.set_comma_count(comma);

        Ok(())
    }

    // <id><=><open><op>(<,><op>)*<close> | <id><=><asn> | <op>
    fn parse_asn(&mut self, state: &mut CallState) -> Result<()> {
        state.guard()?;

        let target = self.token(0)?;
        if target.kind != TokenKind::Identifier || self.token(1)?.kind != TokenKind::Equals {
            return self.parse_op(state);
        }

        let open = self.token(2)?;
        let name = self.name(&target)?;
        self.emit(Symbol::Identifier(name));

        if open.kind.is_group_open() {
            self.advance(3)?; // advance over `<id> = <open>`

            self.parse_csv(state, Parser::parse_op)?;

            let close = self.token(0)?;
            if !close.kind.closes(open.kind) {
                return Err(EqError::unmatched_bracket(open.kind, close.kind));
            }
            self.advance(1)?; // advance over `<close>`

            let comma = state.comma_count();
            if comma > 0 {
                self.emit(Symbol::Numerical((comma + 1) as Real));
                self.emit(Symbol::Grouping);
            }
        } else {
            self.advance(2)?; // advance over `<id> =`

            self.parse_asn(state)?;
        }

        self.emit(Symbol::Assignment);

        Ok(())
    }

    // <-><op> | <!><op> | <op1>
    fn parse_op(&mut self, state: &mut CallState) -> Result<()> {
        state.guard()?;

        let symbol = match self.token(0)?.kind {
            TokenKind::Minus => Symbol::Neg,
            TokenKind::Not => Symbol::Not,
            _ => return self.parse_op1(state),
        };

        self.advance(1)?; // advance over the prefix operator
        self.parse_op(state)?;
        self.emit(symbol);

        Ok(())
    }

    // <op2>((<+>|<->)<op1>)?
    fn parse_op1(&mut self, state: &mut CallState) -> Result<()> {
        state.guard()?;

        self.parse_op2(state)?;

        let symbol = match self.token(0)?.kind {
            TokenKind::Plus => Symbol::Add,
            TokenKind::Minus => Symbol::Sub,
            _ => return Ok(()),
        };

        self.advance(1)?; // advance over `operator`
        self.parse_op1(state)?;
        self.emit(symbol);

        Ok(())
    }

    // <op3>((<*>|</>|<%>|<^>)<op2>)?
    fn parse_op2(&mut self, state: &mut CallState) -> Result<()> {
        state.guard()?;

        self.parse_op3(state)?;

        let symbol = match self.token(0)?.kind {
            TokenKind::Mul => Symbol::Mul,
            TokenKind::Div => Symbol::Div,
            TokenKind::Mod => Symbol::Mod,
            TokenKind::Pow => Symbol::Pow,
            _ => return Ok(()),
        };

        self.advance(1)?; // advance over `operator`
        self.parse_op2(state)?;
        self.emit(symbol);

        Ok(())
    }

    // <fnc> | <(><op><)> | <id> | <num> | <pi>
    fn parse_op3(&mut self, state: &mut CallState) -> Result<()> {
        state.guard()?;

        let t0 = self.token(0)?;
        let t1 = self.token(1)?;

        let callable = t0.kind == TokenKind::Identifier || t0.kind.math().is_some();
        if callable && t1.kind == TokenKind::LParen {
            return self.parse_fnc(state);
        }

        match t0.kind {
            TokenKind::LParen => {
                self.advance(1)?; // advance over `TokenKind::LParen`
                self.parse_op(state)?;
                self.advance_if(TokenKind::RParen)?; // advance over `TokenKind::RParen`
            }
            TokenKind::Identifier => {
                let name = self.name(&t0)?;
                self.emit(Symbol::Identifier(name));
                self.advance(1)?; // advance over `TokenKind::Identifier`
            }
            TokenKind::Float => {
                let value = self.value(&t0);
                self.emit(Symbol::Numerical(value));
                self.advance(1)?; // advance over `TokenKind::Float`
            }
            TokenKind::Pi => {
                self.emit(Symbol::Numerical(PI));
                self.advance(1)?; // advance over `TokenKind::Pi`
            }
            _ => {
                return Err(EqError::unexpected(
                    "unable to deduce a rule from the tokens",
                    vec![t0.kind, t1.kind],
                ));
            }
        }

        Ok(())
    }

    // (<math>|<id>)<(><op>(<,><op>)*<)>
    fn parse_fnc(&mut self, state: &mut CallState) -> Result<()> {
        state.guard()?;

        let callee = self.token(0)?;
        self.advance(1)?; // advance over the callee

        self.advance_if(TokenKind::LParen)?; // advance over `TokenKind::LParen`
        self.parse_csv(state, Parser::parse_op)?;
        self.advance_if(TokenKind::RParen)?; // advance over `TokenKind::RParen`

        let count = state.comma_count() + 1;

        match callee.kind.math() {
            Some(function) => {
                self.emit(Symbol::Numerical(count as Real));
                self.emit(Symbol::Math(function));
            }
            None => {
                let name = self.name(&callee)?;
                if count < 2 {
                    return Err(EqError::unexpected(
                        "user functions take at least two arguments",
                        vec![name],
                    ));
                }

                self.emit(Symbol::Numerical(count as Real));
                self.emit(Symbol::UserFunction(name));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::builtin::MathFn;

    use test_case::test_case;

    fn listing(input: &str) -> String {
        let mut parser = Parser::new();
        parser.read(input).unwrap();
        parser.program().to_string()
    }

    #[test_case("1"                    , "1"                        ; "literal")]
    #[test_case("y = 7+2*2"            , "y 7 2 2 MUL ADD EQ"       ; "assignment")]
    #[test_case("8 - 4 - 2"            , "8 4 2 SUB SUB"            ; "right recursive sum")]
    #[test_case("2 ^ 3 / 4"            , "2 3 4 DIV POW"            ; "right recursive product")]
    #[test_case("-1 + 2"               , "1 2 ADD NEG"              ; "negation spans the sum")]
    #[test_case("!x"                   , "x NOT"                    ; "not")]
    #[test_case("2 * pi"               , "2 3.141592653589793 MUL"  ; "pi is a number")]
    #[test_case("x=(1+2)*3"            , "x 1 2 ADD 3 MUL EQ"       ; "parenthesis after assignment")]
    #[test_case("a=b=c=d=e=f=1"        , "a b c d e f 1 EQ EQ EQ EQ EQ EQ" ; "chained assignment")]
    #[test_case("y = [0,1,2,3]"        , "y 0 1 2 3 4 GR EQ"        ; "grouping")]
    #[test_case("y = {5}"              , "y 5 EQ"                   ; "single element grouping")]
    #[test_case("x = {1, 2}, y = x"    , "x 1 2 2 GR EQ y x EQ"     ; "assignment list")]
    #[test_case("mod(cos(x), 3)"       , "x 1 cos 3 2 fmod"         ; "nested math functions")]
    #[test_case("atan2(y, x)"          , "y x 2 atan2"              ; "binary math function")]
    #[test_case("f(1, 2)"              , "1 2 2 f()"                ; "user function")]
    #[test_case("1 2"                  , "1 2"                      ; "two statements")]
    #[test_case("# nothing\n"          , ""                         ; "comment only")]
    fn test_program(input: &str, expected: &str) {
        assert_eq!(listing(input), expected)
    }

    #[test]
    fn symbols() {
        let mut parser = Parser::new();
        parser.read("y = 7+2*2").unwrap();

        assert_eq!(
            parser.symbols(),
            &[
                Symbol::identifier("y"),
                Symbol::numerical(7),
                Symbol::numerical(2),
                Symbol::numerical(2),
                Symbol::Mul,
                Symbol::Add,
                Symbol::Assignment,
            ]
        );

        parser.read("sin(x)").unwrap();
        assert_eq!(
            parser.symbols(),
            &[
                Symbol::identifier("x"),
                Symbol::numerical(1),
                Symbol::Math(MathFn::Sin),
            ]
        );
    }

    #[test_case("f(1)"       , EqError::unexpected("user functions take at least two arguments", vec!["f"]) ; "user function with one argument")]
    #[test_case("x = {1, 2]" , EqError::unmatched_bracket(TokenKind::LBrace, TokenKind::RBracket) ; "mismatched brackets")]
    #[test_case("x = [1, 2"  , EqError::unmatched_bracket(TokenKind::LBracket, TokenKind::Eof) ; "unterminated grouping")]
    #[test_case("(1+2"       , EqError::parser_error(")", "EOF") ; "unterminated parenthesis")]
    #[test_case("sin(1"      , EqError::parser_error(")", "EOF") ; "unterminated call")]
    #[test_case("1 @ 2"      , EqError::unknown_character(1, b'@') ; "unknown character")]
    #[test_case("1\n\n@"     , EqError::unknown_character(3, b'@') ; "unknown character line")]
    #[test_case("sin 1"      , EqError::unexpected("unable to deduce a rule from the tokens", vec!["sin", "number"]) ; "keyword without call")]
    #[test_case("2 *"        , EqError::unexpected("unable to deduce a rule from the tokens", vec!["EOF", "EOF"]) ; "missing operand")]
    #[test_case(")"          , EqError::unexpected("unable to deduce a rule from the tokens", vec![")", "EOF"]) ; "stray close")]
    fn test_error(input: &str, expected: EqError) {
        let mut parser = Parser::new();

        assert_eq!(parser.read(input), Err(expected));
        assert!(parser.symbols().is_empty());
    }

    #[test]
    fn nesting_is_bounded() {
        let deep = format!("{}1{}", "(".repeat(40), ")".repeat(40));
        let mut parser = Parser::new();

        assert_eq!(
            parser.read(&deep),
            Err(EqError::RecursionDepthExceeded(DEFAULT_MAX_DEPTH))
        );
        assert!(parser.symbols().is_empty());

        let mut shallow = Parser::with_max_depth(MIN_DEPTH);
        assert_eq!(
            shallow.read("((((1))))"),
            Err(EqError::RecursionDepthExceeded(MIN_DEPTH))
        );
        assert_eq!(Parser::new().read("((((1))))"), Ok(()));
    }

    #[test]
    fn entries_accumulate_per_statement() {
        let long = vec!["1"; 50].join("+");
        let mut parser = Parser::new();

        assert_eq!(
            parser.read(&long),
            Err(EqError::RecursionDepthExceeded(DEFAULT_MAX_DEPTH))
        );

        let many = vec!["1+1+1"; 100].join("\n");
        assert_eq!(parser.read(&many), Ok(()));
        assert_eq!(parser.symbols().len(), 500);
    }

    #[test_case(0      , MIN_DEPTH ; "below minimum")]
    #[test_case(100    , 100       ; "in range")]
    #[test_case(1 << 20, MAX_DEPTH ; "above maximum")]
    fn test_clamp(requested: usize, expected: usize) {
        assert_eq!(Parser::with_max_depth(requested).max_depth(), expected)
    }

    #[test]
    fn reusable_after_fault() {
        let mut parser = Parser::new();
        parser.read("1 + 2").unwrap();
        assert_eq!(parser.symbols().len(), 3);

        assert!(parser.read("(1").is_err());
        assert!(parser.symbols().is_empty());

        parser.read("3").unwrap();
        assert_eq!(parser.symbols(), &[Symbol::numerical(3)]);
    }

    #[test]
    fn read_from_stream() {
        let mut parser = Parser::new();
        parser.read_from("x = 1\ny = x".as_bytes()).unwrap();

        assert_eq!(parser.program().to_string(), "x 1 EQ y x EQ");
    }
}
