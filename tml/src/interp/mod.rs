//! Tape machine interpreter

mod config;
mod env;
mod error;
mod eval;
mod tape;

pub use config::{Configuration, Status};
pub use env::{Environment, Frame};
pub use error::{InterpResult, RuntimeError};
pub use eval::{derive, evaluate, holds};
pub use tape::Tape;

use crate::ast::Stm;

/// Run `program` on a fresh machine holding `tape`
pub fn run(program: &Stm, tape: Tape) -> InterpResult<Configuration> {
    evaluate(program, Configuration::new(tape))
}
