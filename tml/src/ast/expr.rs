//! Symbol and boolean expressions

use super::Span;
use serde::Serialize;

/// The symbol stored in an unwritten tape cell, spelled `space` in source.
pub const BLANK: char = ' ';

/// An expression that yields a single tape symbol
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum DerivedSymbol {
    /// The symbol under the head
    Read,
    /// A quoted symbol such as `'a'`, or `space`
    Literal(char),
    /// A variable bound with `let` or a function parameter
    Var { name: String, span: Span },
}

impl DerivedSymbol {
    pub fn var(name: impl Into<String>) -> Self {
        DerivedSymbol::Var {
            name: name.into(),
            span: Span::default(),
        }
    }
}

/// Boolean expression over derived symbols
///
/// `And` and `Or` have no relative precedence; the parser builds them
/// left-associatively in source order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Bexp {
    True,
    False,
    Not(Box<Bexp>),
    And(Box<Bexp>, Box<Bexp>),
    Or(Box<Bexp>, Box<Bexp>),
    Eq(DerivedSymbol, DerivedSymbol),
    Le(DerivedSymbol, DerivedSymbol),
}

impl Bexp {
    #[allow(clippy::should_implement_trait)]
    pub fn not(inner: Bexp) -> Self {
        Bexp::Not(Box::new(inner))
    }

    pub fn and(lhs: Bexp, rhs: Bexp) -> Self {
        Bexp::And(Box::new(lhs), Box::new(rhs))
    }

    pub fn or(lhs: Bexp, rhs: Bexp) -> Self {
        Bexp::Or(Box::new(lhs), Box::new(rhs))
    }

    /// Move sub-expressions into `out`, leaving constants behind
    fn detach_children(&mut self, out: &mut Vec<Bexp>) {
        match self {
            Bexp::Not(inner) => out.push(std::mem::replace(inner.as_mut(), Bexp::True)),
            Bexp::And(lhs, rhs) | Bexp::Or(lhs, rhs) => {
                out.push(std::mem::replace(lhs.as_mut(), Bexp::True));
                out.push(std::mem::replace(rhs.as_mut(), Bexp::True));
            }
            _ => {}
        }
    }
}

// Long `not`/`and` chains would otherwise be freed recursively
impl Drop for Bexp {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        self.detach_children(&mut pending);
        while let Some(mut next) = pending.pop() {
            next.detach_children(&mut pending);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deep_not_chain_drops() {
        let mut cond = Bexp::True;
        for _ in 0..200_000 {
            cond = Bexp::not(cond);
        }
        drop(cond);
    }

    #[test]
    fn test_long_and_chain_drops() {
        let mut cond = Bexp::True;
        for _ in 0..200_000 {
            cond = Bexp::and(cond, Bexp::False);
        }
        drop(cond);
    }
}
