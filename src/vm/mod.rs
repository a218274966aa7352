mod error;
mod value;
mod vm;

pub use error::{Result, RuntimeError};
pub use value::{Flag, Groups, Handle, Real, StackValue, VariableTable, INITIAL_HANDLE};
pub use vm::Evaluator;
