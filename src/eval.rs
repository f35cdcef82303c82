use std::fmt::Display;

use miette::SourceSpan;
use tracing::debug;

use crate::{
    CalcError, Parser,
    error::source,
    memory::{self, MemoryReport},
    parse::{BinaryOp, Expr, UnaryOp},
};

/// Session state: the last result and the memory register.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Registers {
    pub ans: f64,
    pub mem: f64,
}

/// An arithmetic failure, before it is tied to a place in the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    DivisionByZero,
    NegativeSquareRoot,
}

impl Fault {
    pub fn at(self, whole: &str, span: SourceSpan) -> CalcError {
        match self {
            Fault::DivisionByZero => CalcError::DivisionByZero {
                src: source(whole),
                span,
            },
            Fault::NegativeSquareRoot => CalcError::NegativeSquareRoot {
                src: source(whole),
                span,
            },
        }
    }
}

impl BinaryOp {
    pub fn apply(self, a: f64, b: f64) -> Result<f64, Fault> {
        match self {
            BinaryOp::Add => Ok(a + b),
            BinaryOp::Sub => Ok(a - b),
            BinaryOp::Mul => Ok(a * b),
            BinaryOp::Div | BinaryOp::Rem if b == 0.0 => Err(Fault::DivisionByZero),
            BinaryOp::Div => Ok(a / b),
            // truncated remainder: the sign follows `a`
            BinaryOp::Rem => Ok(a % b),
        }
    }
}

impl UnaryOp {
    pub fn apply(self, x: f64) -> Result<f64, Fault> {
        match self {
            UnaryOp::Sqrt if x < 0.0 => Err(Fault::NegativeSquareRoot),
            UnaryOp::Sqrt => Ok(x.sqrt()),
            UnaryOp::Sqr => Ok(x * x),
            UnaryOp::Inv if x == 0.0 => Err(Fault::DivisionByZero),
            UnaryOp::Inv => Ok(1.0 / x),
        }
    }
}

/// Evaluates the one operation on `line`. The registers are only read.
pub fn evaluate(line: &str, registers: &Registers) -> Result<f64, CalcError> {
    match Parser::new(line).parse_expr()? {
        Expr::Unary { op, operand } => op
            .apply(operand.value(registers))
            .map_err(|fault| fault.at(line, operand.span)),
        Expr::Binary { lhs, op, rhs } => op
            .apply(lhs.value(registers), rhs.value(registers))
            .map_err(|fault| fault.at(line, rhs.span)),
    }
}

/// What a successfully processed line produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outcome {
    Value(f64),
    Memory(MemoryReport),
}

impl Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Value(n) => write!(f, "= {n}"),
            Outcome::Memory(report) => write!(f, "{report}"),
        }
    }
}

#[derive(Debug, Default)]
pub struct Interpreter {
    registers: Registers,
}

impl Interpreter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn registers(&self) -> &Registers {
        &self.registers
    }

    /// Memory commands take priority; anything else is evaluated and, on
    /// success, becomes the new `ans`.
    pub fn eval_line(&mut self, line: &str) -> Result<Outcome, CalcError> {
        if let Some(report) = memory::try_handle(line, &mut self.registers)? {
            debug!(?report, mem = self.registers.mem, "memory command");
            return Ok(Outcome::Memory(report));
        }

        let value = evaluate(line, &self.registers)?;
        debug!(line, value, "evaluated");
        self.registers.ans = value;
        Ok(Outcome::Value(value))
    }
}
