//! Compile-time symbol table
//!
//! The parser threads one [`SymbolTable`] through a whole program (or through
//! several files, see [`crate::resolver`]) and consults it for every
//! identifier it meets. Scopes form a stack: `if`/`while` bodies and function
//! bodies push a scope on entry and pop it on exit, which throws away
//! everything declared inside and leaves the enclosing scopes exactly as they
//! were.

use std::collections::HashMap;
use std::fmt;

use crate::ast::{FuncId, Span};
use crate::error::{CompileError, Result};
use crate::util::find_similar_name;

/// Type of a name as seen by the checker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    /// A single tape symbol: variables, parameters, `read`, literals
    Symbol,
    /// A function name. Never the type of a value; only appears in errors
    Function,
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Symbol => write!(f, "symbol"),
            Type::Function => write!(f, "function"),
        }
    }
}

/// What a name was declared as
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Declaration {
    Var(Type),
    /// Function with its parameter types, in order
    Func { params: Vec<Type>, id: FuncId },
}

impl Declaration {
    /// The type a reference to this name has
    pub fn ty(&self) -> Type {
        match self {
            Declaration::Var(ty) => *ty,
            Declaration::Func { .. } => Type::Function,
        }
    }
}

/// Maximum edit distance for "did you mean" suggestions
const SUGGESTION_THRESHOLD: usize = 2;

/// Stack of scopes mapping names to declarations
#[derive(Debug, Clone)]
pub struct SymbolTable {
    /// Index 0 is the top-level scope
    scopes: Vec<HashMap<String, Declaration>>,
    /// Next [`FuncId`] to hand out; never reused, even after a scope exits
    next_func: u32,
}

impl SymbolTable {
    /// Create a table holding only an empty top-level scope
    pub fn new() -> Self {
        SymbolTable {
            scopes: vec![HashMap::new()],
            next_func: 0,
        }
    }

    /// Push a new innermost scope
    pub fn enter_scope(&mut self) {
        self.scopes.push(HashMap::new());
        log::trace!("enter scope (depth {})", self.scopes.len());
    }

    /// Pop the innermost scope and everything declared in it.
    /// The top-level scope is never popped.
    pub fn exit_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
        log::trace!("exit scope (depth {})", self.scopes.len());
    }

    /// Number of scopes currently on the stack
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    pub fn declare_var(&mut self, name: &str, ty: Type, span: Span) -> Result<()> {
        self.declare(name, Declaration::Var(ty), span)
    }

    /// Declare a function and return the id calls to it will carry
    pub fn declare_func(
        &mut self,
        name: &str,
        param_types: Vec<Type>,
        span: Span,
    ) -> Result<FuncId> {
        let id = FuncId(self.next_func);
        self.declare(
            name,
            Declaration::Func {
                params: param_types,
                id,
            },
            span,
        )?;
        self.next_func += 1;
        Ok(id)
    }

    fn declare(&mut self, name: &str, decl: Declaration, span: Span) -> Result<()> {
        if self.scopes.last().is_some_and(|scope| scope.contains_key(name)) {
            return Err(CompileError::DuplicateDeclaration {
                name: name.to_string(),
                span,
            });
        }
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.to_string(), decl);
        }
        Ok(())
    }

    /// Resolve `name`, innermost scope first
    pub fn lookup(&self, name: &str, span: Span) -> Result<&Declaration> {
        self.get(name).ok_or_else(|| {
            let visible = self.visible_names();
            let suggestion = find_similar_name(name, &visible, SUGGESTION_THRESHOLD);
            CompileError::UndeclaredIdentifier {
                name: name.to_string(),
                span,
                suggestion: suggestion.map(str::to_string),
            }
        })
    }

    /// Resolve `name` without producing an error
    pub fn get(&self, name: &str) -> Option<&Declaration> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }

    /// Every name reachable from the innermost scope
    pub fn visible_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .scopes
            .iter()
            .flat_map(|scope| scope.keys().map(String::as_str))
            .collect();
        names.sort_unstable();
        names.dedup();
        names
    }
}

// Tables are equal when they hold the same declarations in the same scopes
impl PartialEq for SymbolTable {
    fn eq(&self, other: &Self) -> bool {
        self.scopes == other.scopes
    }
}

impl Eq for SymbolTable {}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}
