use std::error::Error;
use std::fmt;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, PartialEq, Eq)]
pub struct RuntimeError(pub String);

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Error for RuntimeError {}

impl RuntimeError {
    pub fn not_enough_arguments<S>(op: S) -> RuntimeError
    where
        S: Into<String>,
    {
        RuntimeError(format!(
            "not enough arguments supplied to the `{}` operation",
            op.into()
        ))
    }

    pub fn wrong_number_of_args<S>(function: S, expected: usize, got: i32) -> RuntimeError
    where
        S: Into<String>,
    {
        RuntimeError(format!(
            "wrong number of arguments to `{}`: expected `{}`, got `{}`",
            function.into(),
            expected,
            got
        ))
    }

    pub fn invalid_grouping(count: i32, available: usize) -> RuntimeError {
        RuntimeError(format!(
            "invalid grouping: `{}` elements requested, `{}` on the stack",
            count, available
        ))
    }
}
