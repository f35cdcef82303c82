//! Memory register commands: `MR`, `MC`, `M+ [x]` and `M- [x]`.

use std::fmt::Display;

use crate::{CalcError, Lexer, eval::Registers, parse::Operand};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryCommand {
    Recall,
    Clear,
    Add,
    Subtract,
}

impl MemoryCommand {
    pub fn from_word(word: &str) -> Option<MemoryCommand> {
        [
            ("MR", MemoryCommand::Recall),
            ("MC", MemoryCommand::Clear),
            ("M+", MemoryCommand::Add),
            ("M-", MemoryCommand::Subtract),
        ]
        .into_iter()
        .find_map(|(name, command)| name.eq_ignore_ascii_case(word).then_some(command))
    }
}

/// What a memory command did, for display.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MemoryReport {
    /// `mem` was copied into `ans`.
    Recalled(f64),
    Cleared,
    /// `mem` after adding or subtracting.
    Updated(f64),
}

impl Display for MemoryReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MemoryReport::Recalled(mem) => write!(f, "MR -> {mem}\nans = {mem}"),
            MemoryReport::Cleared => write!(f, "memory cleared (mem = 0)"),
            MemoryReport::Updated(mem) => write!(f, "mem = {mem}"),
        }
    }
}

/// Runs `line` as a memory command if its first word names one.
///
/// `Ok(None)` means the line is not a memory command and should be evaluated
/// instead. An error still counts as handled: the line never reaches the
/// evaluator, and the registers are left as they were.
pub fn try_handle(
    line: &str,
    registers: &mut Registers,
) -> Result<Option<MemoryReport>, CalcError> {
    let mut tokens = Lexer::new(line);
    let Some(command) = tokens
        .next()
        .and_then(|token| MemoryCommand::from_word(token.literal))
    else {
        return Ok(None);
    };

    let report = match command {
        MemoryCommand::Recall => {
            registers.ans = registers.mem;
            MemoryReport::Recalled(registers.mem)
        }
        MemoryCommand::Clear => {
            registers.mem = 0.0;
            MemoryReport::Cleared
        }
        MemoryCommand::Add | MemoryCommand::Subtract => {
            let delta = match tokens.next() {
                Some(token) => Operand::parse(&token, line)?.value(registers),
                None => registers.ans,
            };
            registers.mem += match command {
                MemoryCommand::Subtract => -delta,
                _ => delta,
            };
            MemoryReport::Updated(registers.mem)
        }
    };
    Ok(Some(report))
}
