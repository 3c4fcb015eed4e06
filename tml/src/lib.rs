//! TML Interpreter Library
//!
//! A small tape language for Turing-machine programs. Source is checked
//! against a scoped symbol table while it is parsed, then evaluated as a
//! chain of configuration transformers over an unbounded tape.

pub mod ast;
pub mod error;
pub mod interp;
pub mod lexer;
pub mod parser;
pub mod repl;
pub mod resolver;
pub mod types;
pub mod util;

pub use ast::Span;
pub use error::{CompileError, Result};

use ast::Stm;
use types::SymbolTable;

/// Tokenize and parse `source` against `table`
pub fn parse_source(source: &str, table: SymbolTable) -> Result<(Stm, SymbolTable)> {
    parse_source_at(source, 0, table)
}

/// Parse `source` as if it started at byte `base` of a larger text
///
/// Spans in the tree are offset by `base`, so trees parsed from several
/// files can be told apart when a runtime error points back at them.
/// Compile errors keep spans relative to `source`.
pub fn parse_source_at(
    source: &str,
    base: usize,
    table: SymbolTable,
) -> Result<(Stm, SymbolTable)> {
    let tokens = lexer::tokenize(source)?
        .into_iter()
        .map(|(tok, span)| (tok, span.shift(base)))
        .collect();
    parser::parse(tokens, table).map_err(|e| e.unshift(base))
}
