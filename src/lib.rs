pub mod error;
pub mod eval;
pub mod lex;
pub mod memory;
pub mod parse;
pub mod repl;

pub use error::CalcError;
pub use eval::{Interpreter, Outcome, Registers, evaluate};
pub use lex::Lexer;
pub use parse::{Parser, resolve};
