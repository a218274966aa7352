pub mod builtin;
pub mod error;
pub mod parser;
pub mod repl;
pub mod scanner;
pub mod symbol;
pub mod vm;
