use crate::vm::Real;

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MathFn {
    Abs,
    Acos,
    Asin,
    Atan,
    Atan2,
    Ceil,
    Cos,
    Cosh,
    Exp,
    Fabs,
    Floor,
    Fmod,
    Log,
    Log10,
    Pow,
    Sin,
    Sinh,
    Sqrt,
    Tan,
    Tanh,
}

/// A pure function reference together with the number of operands it takes.
#[derive(Clone, Copy)]
pub enum Apply {
    Unary(fn(Real) -> Real),
    Binary(fn(Real, Real) -> Real),
}

impl Apply {
    pub fn arity(&self) -> usize {
        match self {
            Apply::Unary(_) => 1,
            Apply::Binary(_) => 2,
        }
    }
}

impl fmt::Display for MathFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl MathFn {
    pub fn builtins() -> Vec<MathFn> {
        vec![
            MathFn::Abs,
            MathFn::Acos,
            MathFn::Asin,
            MathFn::Atan,
            MathFn::Atan2,
            MathFn::Ceil,
            MathFn::Cos,
            MathFn::Cosh,
            MathFn::Exp,
            MathFn::Fabs,
            MathFn::Floor,
            MathFn::Fmod,
            MathFn::Log,
            MathFn::Log10,
            MathFn::Pow,
            MathFn::Sin,
            MathFn::Sinh,
            MathFn::Sqrt,
            MathFn::Tan,
            MathFn::Tanh,
        ]
    }

    pub fn name(&self) -> &'static str {
        #[rustfmt::skip]
        let name = match self {
            MathFn::Abs   => "abs",
            MathFn::Acos  => "acos",
            MathFn::Asin  => "asin",
            MathFn::Atan  => "atan",
            MathFn::Atan2 => "atan2",
            MathFn::Ceil  => "ceil",
            MathFn::Cos   => "cos",
            MathFn::Cosh  => "cosh",
            MathFn::Exp   => "exp",
            MathFn::Fabs  => "fabs",
            MathFn::Floor => "floor",
            MathFn::Fmod  => "fmod",
            MathFn::Log   => "log",
            MathFn::Log10 => "log10",
            MathFn::Pow   => "pow",
            MathFn::Sin   => "sin",
            MathFn::Sinh  => "sinh",
            MathFn::Sqrt  => "sqrt",
            MathFn::Tan   => "tan",
            MathFn::Tanh  => "tanh",
        };

        name
    }

    pub fn function(&self) -> Apply {
        #[rustfmt::skip]
        let apply = match self {
            MathFn::Abs   => Apply::Unary(Real::abs),
            MathFn::Acos  => Apply::Unary(Real::acos),
            MathFn::Asin  => Apply::Unary(Real::asin),
            MathFn::Atan  => Apply::Unary(Real::atan),
            MathFn::Atan2 => Apply::Binary(Real::atan2),
            MathFn::Ceil  => Apply::Unary(Real::ceil),
            MathFn::Cos   => Apply::Unary(Real::cos),
            MathFn::Cosh  => Apply::Unary(Real::cosh),
            MathFn::Exp   => Apply::Unary(Real::exp),
            MathFn::Fabs  => Apply::Unary(Real::abs),
            MathFn::Floor => Apply::Unary(Real::floor),
            MathFn::Fmod  => Apply::Binary(floored_mod),
            MathFn::Log   => Apply::Unary(Real::ln),
            MathFn::Log10 => Apply::Unary(Real::log10),
            MathFn::Pow   => Apply::Binary(Real::powf),
            MathFn::Sin   => Apply::Unary(Real::sin),
            MathFn::Sinh  => Apply::Unary(Real::sinh),
            MathFn::Sqrt  => Apply::Unary(Real::sqrt),
            MathFn::Tan   => Apply::Unary(Real::tan),
            MathFn::Tanh  => Apply::Unary(Real::tanh),
        };

        apply
    }

    pub fn arity(&self) -> usize {
        self.function().arity()
    }
}

/// Remainder whose sign follows the divisor, unlike `%` which follows the
/// dividend.
pub fn floored_mod(a: Real, b: Real) -> Real {
    let r = a % b;
    if r != 0.0 && (r < 0.0) != (b < 0.0) {
        r + b
    } else {
        r
    }
}
