mod intern;
mod scanner;
mod source;
mod token;

pub use intern::{Internable, Interner, RealTable, StringTable};
pub use scanner::Scanner;
pub use source::Source;
pub use token::{lookup_keyword, Token, TokenKind, KEYWORDS};
