use std::io::{self, IsTerminal};

use clap::Parser;
use clap::Subcommand;
use memcalc::Interpreter;
use memcalc::Lexer;
use memcalc::repl::{self, Config};
use tracing_subscriber::EnvFilter;

/// A calculator that evaluates one operation per line and keeps a memory
/// register.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Don't print the banner and help text on start.
    #[arg(short, long)]
    quiet: bool,

    /// Print errors as a single line, without the source snippet.
    #[arg(long)]
    plain: bool,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the words of a line with their byte ranges.
    Tokenize { line: String },
    /// Evaluate lines in order within one session and exit.
    Eval {
        #[arg(required = true)]
        lines: Vec<String>,
    },
}

fn main() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let diagnostics = !args.plain;

    match args.command {
        Some(Commands::Tokenize { line }) => {
            for token in Lexer::new(&line) {
                println!("{token}");
            }
        }
        Some(Commands::Eval { lines }) => {
            let input = lines.join("\n");
            let config = Config {
                banner: false,
                prompt: false,
                diagnostics,
            };
            repl::run(&mut Interpreter::new(), input.as_bytes(), io::stdout(), config)?;
        }
        None => {
            let stdin = io::stdin();
            let config = Config {
                banner: !args.quiet,
                prompt: stdin.is_terminal(),
                diagnostics,
            };
            repl::run(&mut Interpreter::new(), stdin.lock(), io::stdout(), config)?;
        }
    }
    Ok(())
}
