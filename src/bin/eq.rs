use clap::Parser as _;
use eq_lang::error::Result;
use eq_lang::parser::{Parser, DEFAULT_MAX_DEPTH};
use eq_lang::repl::repl;
use eq_lang::vm::{Evaluator, Real};
use itertools::Itertools;
use tracing::Level;

use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(clap::Parser)]
#[command(name = "eq")]
#[command(about = "Evaluate arithmetic statements, or start a prompt when no input is given")]
struct Args {
    /// Statements to evaluate
    #[arg(short, long, conflicts_with = "file")]
    expression: Option<String>,

    /// File of statements to evaluate
    file: Option<PathBuf>,

    /// Bind a variable before evaluation
    #[arg(short, long, value_name = "NAME=VALUE", value_parser = parse_binding)]
    set: Vec<(String, Real)>,

    /// Rule entries allowed per statement
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Print the postfix program before its value
    #[arg(long)]
    symbols: bool,

    /// Print the grouping bound to NAME after evaluation
    #[arg(short, long, value_name = "NAME")]
    lists: Vec<String>,

    /// Raise the log level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn parse_binding(arg: &str) -> std::result::Result<(String, Real), String> {
    let (name, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got `{}`", arg))?;
    let value = value.trim().parse::<Real>().map_err(|err| err.to_string())?;

    Ok((name.trim().to_string(), value))
}

fn run(args: &Args, parser: &mut Parser, eval: &mut Evaluator) -> Result<()> {
    match (&args.expression, &args.file) {
        (Some(expression), _) => parser.read(expression)?,
        (None, Some(path)) => parser.read_from(File::open(path)?)?,
        (None, None) => {
            println!("Evaluate statements like `y = 7 + 2 * 2` or `x = {{1, 2, 3}}`.");
            println!("Type `quit` to leave.");

            repl(parser, eval, args.symbols)?;
            return Ok(());
        }
    }

    if args.symbols {
        println!("{}", parser.program());
    }

    println!("{}", eval.execute(parser.symbols()));

    for name in &args.lists {
        println!("{} = {{{}}}", name, eval.get_list(name).iter().join(", "));
    }

    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    let level = match args.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();

    let mut parser = Parser::with_max_depth(args.max_depth);
    let mut eval = Evaluator::new();
    for (name, value) in &args.set {
        eval.set(name, *value);
    }

    match run(&args, &mut parser, &mut eval) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", err);
            ExitCode::FAILURE
        }
    }
}
