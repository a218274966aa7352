use crate::builtin::MathFn;
use crate::vm::Real;

use std::fmt;

use itertools::Itertools;

/// One instruction of a postfix program.
///
/// `Numerical` doubles as the argument-count marker that precedes `Grouping`,
/// `UserFunction` and every `Math` symbol.
#[derive(Debug, Clone, PartialEq)]
pub enum Symbol {
    Numerical(Real),
    Identifier(String),
    UserFunction(String),
    Assignment,
    Grouping,

    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Pow,
    Mod,
    Neg,
    Not,
    BitwiseNot,

    // Math
    Math(MathFn),
    Pi,
    E,
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::Numerical(value) => write!(f, "{}", value),
            Symbol::Identifier(name) => write!(f, "{}", name),
            Symbol::UserFunction(name) => write!(f, "{}()", name),
            Symbol::Assignment => write!(f, "EQ"),
            Symbol::Grouping => write!(f, "GR"),
            Symbol::Add => write!(f, "ADD"),
            Symbol::Sub => write!(f, "SUB"),
            Symbol::Mul => write!(f, "MUL"),
            Symbol::Div => write!(f, "DIV"),
            Symbol::Pow => write!(f, "POW"),
            Symbol::Mod => write!(f, "MOD"),
            Symbol::Neg => write!(f, "NEG"),
            Symbol::Not => write!(f, "NOT"),
            Symbol::BitwiseNot => write!(f, "BNOT"),
            Symbol::Math(function) => write!(f, "{}", function),
            Symbol::Pi => write!(f, "pi"),
            Symbol::E => write!(f, "e"),
        }
    }
}

impl Symbol {
    pub fn identifier<S>(name: S) -> Symbol
    where
        S: Into<String>,
    {
        Symbol::Identifier(name.into())
    }

    pub fn numerical<N>(value: N) -> Symbol
    where
        N: Into<Real>,
    {
        Symbol::Numerical(value.into())
    }
}

/// Borrowed view of a parsed program, for listing it.
#[derive(Debug, Clone, Copy)]
pub struct Program<'a>(pub &'a [Symbol]);

impl<'a> fmt::Display for Program<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.iter().join(" "))
    }
}
