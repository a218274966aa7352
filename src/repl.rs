use crate::error::Result;
use crate::parser::Parser;
use crate::vm::{Evaluator, Real};

use std::io::{self, Write};

const PROMPT: &str = ">> ";
const QUIT: &str = "quit";

/// Parses `line` and runs it against `eval`. Parse faults propagate,
/// evaluation faults yield `0`.
pub fn eval_line(parser: &mut Parser, eval: &mut Evaluator, line: &str) -> Result<Real> {
    parser.read(line)?;

    Ok(eval.execute(parser.symbols()))
}

/// Reads statements from stdin until `quit` or end of input. Variables and
/// grouping handles carry over from one line to the next.
pub fn repl(parser: &mut Parser, eval: &mut Evaluator, listing: bool) -> io::Result<()> {
    let mut buffer = String::new();

    loop {
        print!("{}", PROMPT);
        io::stdout().flush()?;

        if io::stdin().read_line(&mut buffer)? == 0 {
            return Ok(());
        }

        match buffer.as_str().trim() {
            QUIT => return Ok(()),
            "" => {}
            line => match eval_line(parser, eval, line) {
                Ok(value) => {
                    if listing {
                        println!("{}", parser.program());
                    }
                    println!("{}", value);
                }
                Err(err) => println!("{}", err),
            },
        }

        buffer.clear();
    }
}
