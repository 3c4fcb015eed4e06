//! Statement evaluator
//!
//! Every statement denotes a transformer from one [`Configuration`] to the
//! next. [`evaluate`] applies that transformer directly: sequencing feeds the
//! result of the first statement into the second, an error aborts the rest
//! of the chain through `?`, and a halted configuration passes through every
//! later statement untouched.

use super::config::{Configuration, Status};
use super::env::Frame;
use super::error::{InterpResult, RuntimeError};
use crate::ast::{Bexp, DerivedSymbol, FuncId, Span, Stm};
use crate::util::with_stack;
use std::rc::Rc;

/// Apply the transformer denoted by `stm` to `config`
pub fn evaluate(stm: &Stm, config: Configuration) -> InterpResult<Configuration> {
    with_stack(|| evaluate_inner(stm, config))
}

fn evaluate_inner(stm: &Stm, mut config: Configuration) -> InterpResult<Configuration> {
    // Walk the right spine of a sequence iteratively
    let mut current = stm;
    loop {
        if config.is_halted() {
            return Ok(config);
        }
        match current {
            Stm::Comp(first, second) => {
                config = evaluate(first, config)?;
                current = second;
            }
            other => return execute(other, config),
        }
    }
}

/// Single non-sequence statement on a running configuration
fn execute(stm: &Stm, mut config: Configuration) -> InterpResult<Configuration> {
    log::trace!("execute {:?} at head {}", StmKind(stm), config.tape.head());

    match stm {
        Stm::MoveLeft => {
            config.tape = config.tape.move_left();
        }
        Stm::MoveRight => {
            config.tape = config.tape.move_right();
        }
        Stm::Write(value) => {
            let symbol = derive(value, &config)?;
            config.tape = config.tape.write(symbol);
        }
        Stm::Accept => {
            log::debug!("machine accepts at head {}", config.tape.head());
            config.status = Status::Accepted;
        }
        Stm::Reject => {
            log::debug!("machine rejects at head {}", config.tape.head());
            config.status = Status::Rejected;
        }
        Stm::If {
            cond,
            then,
            elifs,
            els,
        } => {
            if let Some(body) = choose_branch(cond, then, elifs, els.as_deref(), &config)? {
                config = config.with_overlay(Frame::new(), |c| evaluate(body, c))?;
            }
        }
        Stm::While { cond, body } => {
            // No iteration limit: a loop whose condition stays true runs forever
            while !config.is_halted() && holds(cond, &config)? {
                config = config.with_overlay(Frame::new(), |c| evaluate(body, c))?;
            }
        }
        Stm::VarDecl { name, value, .. } => {
            let symbol = derive(value, &config)?;
            config.env.add_var(name.as_str(), symbol);
        }
        Stm::FuncDecl(def) => {
            config.env.add_func(def.name.as_str(), Rc::clone(def));
        }
        Stm::Call {
            name,
            args,
            target,
            span,
        } => {
            config = call(name, args, *target, *span, config)?;
        }
        Stm::Comp(..) => return evaluate(stm, config),
        Stm::PrintRead => {
            let symbol = config.tape.read();
            config.emit(symbol.to_string());
        }
        Stm::PrintStr(text) => {
            config.emit(text.as_str());
        }
    }

    Ok(config)
}

/// First clause whose condition holds; `else` acts as a final `True` clause
fn choose_branch<'a>(
    cond: &Bexp,
    then: &'a Stm,
    elifs: &'a [(Bexp, Stm)],
    els: Option<&'a Stm>,
    config: &Configuration,
) -> InterpResult<Option<&'a Stm>> {
    if holds(cond, config)? {
        return Ok(Some(then));
    }
    for (cond, body) in elifs {
        if holds(cond, config)? {
            return Ok(Some(body));
        }
    }
    Ok(els)
}

/// Run the function `name` resolved to when parsed (`target`), or the
/// newest one of that name for trees built by hand
fn call(
    name: &str,
    args: &[DerivedSymbol],
    target: Option<FuncId>,
    span: Span,
    config: Configuration,
) -> InterpResult<Configuration> {
    let def = config
        .env
        .resolve_func(name, target)
        .ok_or_else(|| RuntimeError::undefined_function(name, span))?;

    if def.params.len() != args.len() {
        return Err(RuntimeError::arity_mismatch(
            name,
            def.params.len(),
            args.len(),
            span,
        ));
    }

    // Arguments see the caller's bindings, not the overlay
    let values = args
        .iter()
        .map(|arg| derive(arg, &config))
        .collect::<InterpResult<Vec<char>>>()?;

    log::debug!("call {name}({})", values.iter().collect::<String>());
    let frame = Frame::with_vars(def.params.iter().cloned().zip(values));
    config.with_overlay(frame, |c| evaluate(&def.body, c))
}

/// Concrete symbol denoted by a derived symbol
pub fn derive(value: &DerivedSymbol, config: &Configuration) -> InterpResult<char> {
    match value {
        DerivedSymbol::Read => Ok(config.tape.read()),
        DerivedSymbol::Literal(c) => Ok(*c),
        DerivedSymbol::Var { name, span } => config
            .env
            .lookup_var(name)
            .ok_or_else(|| RuntimeError::undefined_variable(name, *span)),
    }
}

/// Truth value of a boolean expression; `and`/`or` short-circuit
pub fn holds(cond: &Bexp, config: &Configuration) -> InterpResult<bool> {
    with_stack(|| {
        Ok(match cond {
            Bexp::True => true,
            Bexp::False => false,
            Bexp::Not(inner) => !holds(inner, config)?,
            Bexp::And(lhs, rhs) => holds(lhs, config)? && holds(rhs, config)?,
            Bexp::Or(lhs, rhs) => holds(lhs, config)? || holds(rhs, config)?,
            Bexp::Eq(lhs, rhs) => derive(lhs, config)? == derive(rhs, config)?,
            Bexp::Le(lhs, rhs) => derive(lhs, config)? <= derive(rhs, config)?,
        })
    })
}

/// Statement name for trace logging without dumping whole bodies
struct StmKind<'a>(&'a Stm);

impl std::fmt::Debug for StmKind<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            Stm::MoveLeft => write!(f, "left"),
            Stm::MoveRight => write!(f, "right"),
            Stm::Write(value) => write!(f, "write {value:?}"),
            Stm::Accept => write!(f, "accept"),
            Stm::Reject => write!(f, "reject"),
            Stm::If { .. } => write!(f, "if"),
            Stm::While { .. } => write!(f, "while"),
            Stm::VarDecl { name, .. } => write!(f, "let {name}"),
            Stm::FuncDecl(def) => write!(f, "func {}", def.name),
            Stm::Call { name, .. } => write!(f, "call {name}"),
            Stm::Comp(..) => write!(f, "seq"),
            Stm::PrintRead => write!(f, "print"),
            Stm::PrintStr(_) => write!(f, "print \"..\""),
        }
    }
}
