//! Scope-checked recursive-descent parser
//!
//! The parser owns the [`SymbolTable`] for the duration of a parse and checks
//! every identifier as it is read: `let`/`func` declare into the current
//! scope, references must resolve, and calls must match the callee's arity
//! and parameter types. Any failure aborts the parse; no partial tree is
//! returned.

use crate::ast::{Bexp, DerivedSymbol, FuncDef, Span, Stm, BLANK};
use crate::error::{CompileError, Result};
use crate::lexer::Token;
use crate::types::{Declaration, SymbolTable, Type};
use crate::util::with_stack;
use std::rc::Rc;


/// Parse a token stream into a statement tree.
///
/// `table` holds the declarations visible to the program (for instance
/// those of previously loaded files); the returned table additionally holds
/// this program's top-level declarations.
pub fn parse(tokens: Vec<(Token, Span)>, table: SymbolTable) -> Result<(Stm, SymbolTable)> {
    let mut parser = Parser::new(tokens, table);
    let program = parser.program()?;
    log::debug!(
        "parsed program, {} top-level name(s) visible",
        parser.table.visible_names().len()
    );
    Ok((program, parser.table))
}

/// What ends a statement list
#[derive(Clone, Copy, PartialEq, Eq)]
enum Terminator {
    Eof,
    RBrace,
}

struct Parser {
    tokens: Vec<(Token, Span)>,
    pos: usize,
    table: SymbolTable,
    /// Zero-width span just past the last token
    eof: Span,
}

impl Parser {
    fn new(tokens: Vec<(Token, Span)>, table: SymbolTable) -> Self {
        let eof = tokens.last().map(|(_, span)| span.after()).unwrap_or_default();
        Parser {
            tokens,
            pos: 0,
            table,
            eof,
        }
    }

    // ------------------------------------------------------------------
    // Token cursor
    // ------------------------------------------------------------------

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(tok, _)| tok)
    }

    fn span(&self) -> Span {
        self.tokens.get(self.pos).map(|(_, span)| *span).unwrap_or(self.eof)
    }

    fn check(&self, expected: &Token) -> bool {
        self.peek() == Some(expected)
    }

    fn eat(&mut self, expected: &Token) -> bool {
        if self.check(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: &Token) -> Result<Span> {
        if self.check(expected) {
            let span = self.span();
            self.pos += 1;
            Ok(span)
        } else {
            Err(self.unexpected(&expected.to_string()))
        }
    }

    fn skip_newlines(&mut self) {
        while self.eat(&Token::Newline) {}
    }

    /// Token after any run of newlines, without consuming them
    fn peek_past_newlines(&self) -> Option<&Token> {
        self.tokens[self.pos..]
            .iter()
            .map(|(tok, _)| tok)
            .find(|tok| **tok != Token::Newline)
    }

    fn at_terminator(&self, terminator: Terminator) -> bool {
        match terminator {
            Terminator::Eof => self.peek().is_none(),
            Terminator::RBrace => self.check(&Token::RBrace),
        }
    }

    fn unexpected(&self, expected: &str) -> CompileError {
        let found = match self.peek() {
            Some(tok) => tok.to_string(),
            None => "end of input".to_string(),
        };
        CompileError::syntax(format!("expected {expected}, found {found}"), self.span())
    }

    /// Consume an identifier, rejecting reserved keywords by name
    fn ident(&mut self, what: &str) -> Result<(String, Span)> {
        let span = self.span();
        match self.peek() {
            Some(Token::Ident(name)) => {
                let name = name.clone();
                self.pos += 1;
                Ok((name, span))
            }
            Some(tok) if tok.keyword().is_some() => Err(CompileError::syntax(
                format!("{tok} is a reserved keyword and cannot be used as a {what} name"),
                span,
            )),
            _ => Err(self.unexpected(&format!("{what} name"))),
        }
    }

    // ------------------------------------------------------------------
    // Statements
    // ------------------------------------------------------------------

    fn program(&mut self) -> Result<Stm> {
        self.skip_newlines();
        let body = self.statements(Terminator::Eof)?;
        if let Some(tok) = self.peek() {
            return Err(CompileError::syntax(
                format!("unexpected {tok} at top level"),
                self.span(),
            ));
        }
        Ok(body)
    }

    /// One or more statements separated by newlines, up to `terminator`
    fn statements(&mut self, terminator: Terminator) -> Result<Stm> {
        if self.at_terminator(terminator) {
            return Err(self.unexpected("a statement"));
        }

        let mut stms = vec![self.statement()?];
        loop {
            if self.check(&Token::Newline) {
                self.skip_newlines();
                if self.at_terminator(terminator) {
                    break;
                }
                stms.push(self.statement()?);
            } else if self.at_terminator(terminator) {
                break;
            } else {
                return Err(self.unexpected("a newline after statement"));
            }
        }

        Stm::seq(stms).ok_or_else(|| self.unexpected("a statement"))
    }

    /// `{ statements }` without touching the symbol table
    fn braced(&mut self) -> Result<Stm> {
        self.expect(&Token::LBrace)?;
        self.skip_newlines();
        let body = self.statements(Terminator::RBrace)?;
        self.expect(&Token::RBrace)?;
        Ok(body)
    }

    /// `{ statements }` in a fresh scope
    fn scoped_block(&mut self) -> Result<Stm> {
        self.table.enter_scope();
        let body = self.braced()?;
        self.table.exit_scope();
        Ok(body)
    }

    /// Blocks nest through here, so it is where the stack may need to grow
    fn statement(&mut self) -> Result<Stm> {
        with_stack(|| self.statement_inner())
    }

    fn statement_inner(&mut self) -> Result<Stm> {
        let span = self.span();
        let Some(tok) = self.peek().cloned() else {
            return Err(self.unexpected("a statement"));
        };

        match tok {
            Token::Left => {
                self.pos += 1;
                Ok(Stm::MoveLeft)
            }
            Token::Right => {
                self.pos += 1;
                Ok(Stm::MoveRight)
            }
            Token::Accept => {
                self.pos += 1;
                Ok(Stm::Accept)
            }
            Token::Reject => {
                self.pos += 1;
                Ok(Stm::Reject)
            }
            Token::Write => {
                self.pos += 1;
                Ok(Stm::Write(self.symbol_operand()?))
            }
            Token::Print => {
                self.pos += 1;
                if let Some(Token::StringLit(text)) = self.peek() {
                    let text = text.clone();
                    self.pos += 1;
                    Ok(Stm::PrintStr(text))
                } else {
                    Ok(Stm::PrintRead)
                }
            }
            Token::Let => {
                self.pos += 1;
                self.var_decl()
            }
            Token::Func | Token::Proc => {
                self.pos += 1;
                self.func_decl()
            }
            Token::If => {
                self.pos += 1;
                self.if_stm()
            }
            Token::While => {
                self.pos += 1;
                let cond = self.bexp()?;
                let body = self.scoped_block()?;
                Ok(Stm::while_loop(cond, body))
            }
            Token::Call => {
                self.pos += 1;
                let (name, name_span) = self.ident("function")?;
                self.call(name, name_span)
            }
            Token::Ident(name) => {
                self.pos += 1;
                self.call(name, span)
            }
            _ => Err(self.unexpected("a statement")),
        }
    }

    fn var_decl(&mut self) -> Result<Stm> {
        let (name, span) = self.ident("variable")?;
        self.expect(&Token::Eq)?;
        // Resolve the value before declaring, so `let x = x` reads an outer x
        let value = self.symbol_operand()?;
        self.table.declare_var(&name, Type::Symbol, span)?;
        Ok(Stm::VarDecl { name, value, span })
    }

    fn func_decl(&mut self) -> Result<Stm> {
        let (name, span) = self.ident("function")?;

        let mut params = Vec::new();
        if self.eat(&Token::LParen) {
            if !self.check(&Token::RParen) {
                loop {
                    params.push(self.ident("parameter")?);
                    if !self.eat(&Token::Comma) {
                        break;
                    }
                }
            }
            self.expect(&Token::RParen)?;
        }

        // Declared before the body so the body may call itself
        let id = self
            .table
            .declare_func(&name, vec![Type::Symbol; params.len()], span)?;

        // Parameters and body share one scope
        self.table.enter_scope();
        for (param, param_span) in &params {
            self.table.declare_var(param, Type::Symbol, *param_span)?;
        }
        let body = self.braced()?;
        self.table.exit_scope();

        Ok(Stm::FuncDecl(Rc::new(FuncDef {
            id: Some(id),
            name,
            params: params.into_iter().map(|(param, _)| param).collect(),
            body,
            span,
        })))
    }

    fn if_stm(&mut self) -> Result<Stm> {
        let cond = self.bexp()?;
        let then = self.scoped_block()?;
        let mut elifs = Vec::new();
        let mut els = None;

        while self.peek_past_newlines() == Some(&Token::Else) {
            self.skip_newlines();
            self.expect(&Token::Else)?;
            if self.eat(&Token::If) {
                let cond = self.bexp()?;
                let body = self.scoped_block()?;
                elifs.push((cond, body));
            } else {
                els = Some(Box::new(self.scoped_block()?));
                break;
            }
        }

        Ok(Stm::If {
            cond,
            then: Box::new(then),
            elifs,
            els,
        })
    }

    /// Call statement after its name: `f`, `f()` or `f(a, 'b', read)`
    fn call(&mut self, name: String, name_span: Span) -> Result<Stm> {
        let (param_types, target) = match self.table.lookup(&name, name_span)? {
            Declaration::Func { params, id } => (params.clone(), *id),
            decl => {
                return Err(CompileError::TypeMismatch {
                    expected: Type::Function,
                    found: decl.ty(),
                    span: name_span,
                });
            }
        };

        let mut args = Vec::new();
        let mut call_span = name_span;
        if self.eat(&Token::LParen) {
            if !self.check(&Token::RParen) {
                loop {
                    args.push(self.derived()?);
                    if !self.eat(&Token::Comma) {
                        break;
                    }
                }
            }
            call_span = call_span.merge(self.expect(&Token::RParen)?);
        }

        if args.len() != param_types.len() {
            return Err(CompileError::WrongNumArgs {
                name,
                declared: param_types.len(),
                supplied: args.len(),
                span: call_span,
            });
        }
        for ((_, found, span), expected) in args.iter().zip(&param_types) {
            if found != expected {
                return Err(CompileError::TypeMismatch {
                    expected: *expected,
                    found: *found,
                    span: *span,
                });
            }
        }

        log::trace!("call `{name}` with {} argument(s)", args.len());
        Ok(Stm::Call {
            name,
            args: args.into_iter().map(|(arg, _, _)| arg).collect(),
            target: Some(target),
            span: call_span,
        })
    }

    // ------------------------------------------------------------------
    // Expressions
    // ------------------------------------------------------------------

    /// Derived symbol with its checked type
    fn derived(&mut self) -> Result<(DerivedSymbol, Type, Span)> {
        let span = self.span();
        let derived = match self.peek() {
            Some(Token::Read) => DerivedSymbol::Read,
            Some(Token::Space) => DerivedSymbol::Literal(BLANK),
            Some(Token::SymbolLit(c)) => DerivedSymbol::Literal(*c),
            Some(Token::Ident(name)) => {
                let name = name.clone();
                let ty = self.table.lookup(&name, span)?.ty();
                self.pos += 1;
                return Ok((DerivedSymbol::Var { name, span }, ty, span));
            }
            _ => return Err(self.unexpected("a symbol, `read`, `space` or a variable")),
        };
        self.pos += 1;
        Ok((derived, Type::Symbol, span))
    }

    /// Derived symbol that must denote a tape symbol
    fn symbol_operand(&mut self) -> Result<DerivedSymbol> {
        let (derived, ty, span) = self.derived()?;
        if ty != Type::Symbol {
            return Err(CompileError::TypeMismatch {
                expected: Type::Symbol,
                found: ty,
                span,
            });
        }
        Ok(derived)
    }

    /// `and`/`or` chain, left-associative, no relative precedence
    fn bexp(&mut self) -> Result<Bexp> {
        let mut lhs = self.bexp_unary()?;
        loop {
            if self.eat(&Token::And) {
                let rhs = self.bexp_unary()?;
                lhs = Bexp::and(lhs, rhs);
            } else if self.eat(&Token::Or) {
                let rhs = self.bexp_unary()?;
                lhs = Bexp::or(lhs, rhs);
            } else {
                return Ok(lhs);
            }
        }
    }

    fn bexp_unary(&mut self) -> Result<Bexp> {
        with_stack(|| {
            if self.eat(&Token::Not) {
                Ok(Bexp::not(self.bexp_unary()?))
            } else {
                self.bexp_atom()
            }
        })
    }

    fn bexp_atom(&mut self) -> Result<Bexp> {
        match self.peek() {
            Some(Token::True) => {
                self.pos += 1;
                Ok(Bexp::True)
            }
            Some(Token::False) => {
                self.pos += 1;
                Ok(Bexp::False)
            }
            Some(Token::LParen) => {
                self.pos += 1;
                let inner = self.bexp()?;
                self.expect(&Token::RParen)?;
                Ok(inner)
            }
            Some(Token::Read | Token::Space | Token::SymbolLit(_) | Token::Ident(_)) => {
                let lhs = self.symbol_operand()?;
                let compare: fn(DerivedSymbol, DerivedSymbol) -> Bexp = match self.peek() {
                    Some(Token::EqEq) => Bexp::Eq,
                    Some(Token::LtEq) => Bexp::Le,
                    _ => return Err(self.unexpected("`==` or `<=`")),
                };
                self.pos += 1;
                let rhs = self.symbol_operand()?;
                Ok(compare(lhs, rhs))
            }
            _ => Err(self.unexpected("a boolean expression")),
        }
    }
}
