use std::io::{BufRead, Write};

use miette::{IntoDiagnostic, Report, WrapErr};
use tracing::debug;

use crate::Interpreter;

pub const BANNER: &str = "=== Calculator ===";

pub const HELP: &str = "\
Supported operations:
Binary:    a + b   a - b   a * b   a / b   a % b
Unary:     sqrt x   sqr x   inv x
Memory:    M+ [x]   M- [x]   MR   MC
Variables: ans is the last result,  mem is the memory value
Quit:      q
";

#[derive(Debug, Clone, Copy)]
pub struct Config {
    /// Print the banner and help text before the first prompt.
    pub banner: bool,
    pub prompt: bool,
    /// Render errors as full diagnostics with the offending line underlined,
    /// rather than a one-line message.
    pub diagnostics: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            banner: true,
            prompt: true,
            diagnostics: true,
        }
    }
}

/// Words that end the session. They never reach the interpreter.
pub fn is_quit(line: &str) -> bool {
    matches!(
        line.to_lowercase().as_str(),
        "q" | ":q" | ":quit" | ":exit"
    )
}

fn is_help(line: &str) -> bool {
    line == "?" || line.eq_ignore_ascii_case("help")
}

/// Reads lines from `input` until end of input or a quit word, writing each
/// result or error to `out`. Only I/O failures end the loop early.
pub fn run(
    interpreter: &mut Interpreter,
    input: impl BufRead,
    mut out: impl Write,
    config: Config,
) -> miette::Result<()> {
    if config.banner {
        writeln!(out, "{BANNER}").into_diagnostic()?;
        writeln!(out, "{HELP}").into_diagnostic()?;
    }

    let mut lines = input.lines();
    loop {
        if config.prompt {
            write!(out, "> ").into_diagnostic()?;
            out.flush().into_diagnostic()?;
        }
        let Some(line) = lines.next() else {
            break;
        };
        let line = line.into_diagnostic().wrap_err("reading input failed")?;

        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if is_quit(line) {
            debug!("quit requested");
            break;
        }
        if is_help(line) {
            writeln!(out, "{HELP}").into_diagnostic()?;
            continue;
        }

        let written = match interpreter.eval_line(line) {
            Ok(outcome) => writeln!(out, "{outcome}"),
            Err(e) => {
                debug!(error = %e, "line rejected");
                if config.diagnostics {
                    writeln!(out, "{:?}", Report::new(e))
                } else {
                    writeln!(out, "error: {e}")
                }
            }
        };
        written.into_diagnostic().wrap_err("writing output failed")?;
    }

    out.flush().into_diagnostic()
}
