use crate::vm::RuntimeError;

use std::error::Error;
use std::{fmt, io, num};

use itertools::Itertools;

pub type Result<T> = std::result::Result<T, EqError>;

#[derive(Debug, PartialEq, Eq)]
pub enum EqError {
    ScanError(String),
    ParserError(String),
    RecursionDepthExceeded(usize),
    RuntimeError(String),
}

impl EqError {
    pub fn unknown_character(line: usize, ch: u8) -> EqError {
        EqError::ScanError(format!(
            "line {}: unknown character parsed 0x{:02x} `{}`",
            line,
            ch,
            (ch as char).escape_default()
        ))
    }

    pub fn scan_error<S>(line: usize, msg: S) -> EqError
    where
        S: Into<String>,
    {
        EqError::ScanError(format!("line {}: {}", line, msg.into()))
    }

    pub fn parser_error<S, T>(expected: S, got: T) -> EqError
    where
        S: Into<String>,
        T: Into<String>,
    {
        EqError::ParserError(format!(
            "Expected `{}`, got `{}` instead.",
            expected.into(),
            got.into()
        ))
    }

    pub fn unexpected<S, I, T>(msg: S, got: I) -> EqError
    where
        S: Into<String>,
        I: IntoIterator<Item = T>,
        T: fmt::Display,
    {
        EqError::ParserError(format!(
            "{}, got `{}`",
            msg.into(),
            got.into_iter().join("` `")
        ))
    }

    pub fn unmatched_bracket<S, T>(open: S, got: T) -> EqError
    where
        S: fmt::Display,
        T: fmt::Display,
    {
        EqError::ParserError(format!(
            "invalid matching close token for `{}`, got `{}`",
            open, got
        ))
    }
}

impl fmt::Display for EqError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EqError::ScanError(msg) => write!(f, "scan error: {}", msg),
            EqError::ParserError(msg) => write!(f, "parser error: {}", msg),
            EqError::RecursionDepthExceeded(max) => {
                write!(f, "maximum recursion depth exceeded: limit is `{}`", max)
            }
            EqError::RuntimeError(msg) => write!(f, "runtime error: {}", msg),
        }
    }
}

impl Error for EqError {}

impl From<num::ParseFloatError> for EqError {
    fn from(error: num::ParseFloatError) -> Self {
        EqError::ScanError(error.to_string())
    }
}

impl From<io::Error> for EqError {
    fn from(error: io::Error) -> Self {
        EqError::ScanError(error.to_string())
    }
}

impl From<RuntimeError> for EqError {
    fn from(error: RuntimeError) -> Self {
        EqError::RuntimeError(error.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_case::test_case;

    #[test_case(
        EqError::unknown_character(3, b'@'),
        "scan error: line 3: unknown character parsed 0x40 `@`" ;
        "unknown character"
    )]
    #[test_case(
        EqError::parser_error(")", "EOF"),
        "parser error: Expected `)`, got `EOF` instead." ;
        "expected token"
    )]
    #[test_case(
        EqError::unexpected("unable to deduce a rule from the tokens", vec!["*", "2"]),
        "parser error: unable to deduce a rule from the tokens, got `*` `2`" ;
        "no rule"
    )]
    #[test_case(
        EqError::RecursionDepthExceeded(16),
        "maximum recursion depth exceeded: limit is `16`" ;
        "recursion"
    )]
    #[test_case(
        EqError::from(RuntimeError::not_enough_arguments("add")),
        "runtime error: not enough arguments supplied to the `add` operation" ;
        "runtime"
    )]
    fn test_display(error: EqError, expected: &str) {
        assert_eq!(error.to_string(), expected)
    }
}
