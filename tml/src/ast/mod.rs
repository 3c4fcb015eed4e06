//! Abstract Syntax Tree definitions

mod expr;
mod span;

pub use expr::*;
pub use span::*;

use serde::Serialize;
use std::rc::Rc;

/// Identity of one function declaration, assigned by the parser
///
/// Two declarations of the same name in different scopes get different ids,
/// which lets a call find the declaration it was checked against even when
/// a later one shadows it by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct FuncId(pub u32);

/// A function declared with `func` (or `proc`)
///
/// Shared behind an `Rc` so that the runtime environment can bind it without
/// copying the body every time the declaration executes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FuncDef {
    /// `None` for trees built without the parser
    pub id: Option<FuncId>,
    pub name: String,
    pub params: Vec<String>,
    pub body: Stm,
    pub span: Span,
}

/// Statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Stm {
    MoveLeft,
    MoveRight,
    Write(DerivedSymbol),
    Accept,
    Reject,
    If {
        cond: Bexp,
        then: Box<Stm>,
        elifs: Vec<(Bexp, Stm)>,
        els: Option<Box<Stm>>,
    },
    While {
        cond: Bexp,
        body: Box<Stm>,
    },
    VarDecl {
        name: String,
        value: DerivedSymbol,
        span: Span,
    },
    FuncDecl(Rc<FuncDef>),
    Call {
        name: String,
        args: Vec<DerivedSymbol>,
        /// Declaration the parser resolved `name` to
        target: Option<FuncId>,
        /// From the name through the closing `)`
        span: Span,
    },
    /// `s1` followed by `s2`
    Comp(Box<Stm>, Box<Stm>),
    /// `print` with no argument: prints the symbol under the head
    PrintRead,
    PrintStr(String),
}

impl Stm {
    pub fn comp(first: Stm, second: Stm) -> Self {
        Stm::Comp(Box::new(first), Box::new(second))
    }

    /// Right-nested sequence of `stms`, `None` when empty
    pub fn seq(stms: impl IntoIterator<Item = Stm>) -> Option<Stm> {
        let mut stms: Vec<Stm> = stms.into_iter().collect();
        let mut acc = stms.pop()?;
        while let Some(prev) = stms.pop() {
            acc = Stm::comp(prev, acc);
        }
        Some(acc)
    }

    pub fn write(value: DerivedSymbol) -> Self {
        Stm::Write(value)
    }

    pub fn let_var(name: impl Into<String>, value: DerivedSymbol) -> Self {
        Stm::VarDecl {
            name: name.into(),
            value,
            span: Span::default(),
        }
    }

    pub fn func(name: impl Into<String>, params: Vec<String>, body: Stm) -> Self {
        Stm::FuncDecl(Rc::new(FuncDef {
            id: None,
            name: name.into(),
            params,
            body,
            span: Span::default(),
        }))
    }

    pub fn call(name: impl Into<String>, args: Vec<DerivedSymbol>) -> Self {
        Stm::Call {
            name: name.into(),
            args,
            target: None,
            span: Span::default(),
        }
    }

    pub fn if_else(cond: Bexp, then: Stm, els: Option<Stm>) -> Self {
        Stm::If {
            cond,
            then: Box::new(then),
            elifs: Vec::new(),
            els: els.map(Box::new),
        }
    }

    pub fn while_loop(cond: Bexp, body: Stm) -> Self {
        Stm::While {
            cond,
            body: Box::new(body),
        }
    }

    /// Move nested statements into `out`, leaving leaves behind
    fn detach_children(&mut self, out: &mut Vec<Stm>) {
        match self {
            Stm::Comp(first, second) => {
                out.push(take(first));
                out.push(take(second));
            }
            Stm::If {
                then, elifs, els, ..
            } => {
                out.push(take(then));
                out.extend(elifs.drain(..).map(|(_, body)| body));
                if let Some(els) = els {
                    out.push(take(els));
                }
            }
            Stm::While { body, .. } => out.push(take(body)),
            Stm::FuncDecl(def) => {
                if let Some(def) = Rc::get_mut(def) {
                    out.push(std::mem::replace(&mut def.body, Stm::Accept));
                }
            }
            _ => {}
        }
    }
}

fn take(stm: &mut Stm) -> Stm {
    std::mem::replace(stm, Stm::Accept)
}

// Sequences are right-nested boxes; free them with an explicit worklist
impl Drop for Stm {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        self.detach_children(&mut pending);
        while let Some(mut next) = pending.pop() {
            next.detach_children(&mut pending);
        }
    }
}
