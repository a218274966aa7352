mod parser;
mod state;

pub use parser::{Parser, DEFAULT_MAX_DEPTH, MAX_DEPTH, MIN_DEPTH};
pub use state::CallState;
