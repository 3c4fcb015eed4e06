//! Token definitions

use logos::Logos;
use std::fmt;

/// TML token
///
/// Newlines are significant (they separate statements); all other whitespace
/// and both comment styles are skipped.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\f]+")]
#[logos(skip r"//[^\n]*")]
#[logos(skip r"/\*([^*]|\*+[^*/])*\*+/")]
pub enum Token {
    // Keywords
    #[token("space")]
    Space,
    #[token("read")]
    Read,
    #[token("True")]
    True,
    #[token("False")]
    False,
    #[token("not")]
    Not,
    #[token("and")]
    And,
    #[token("or")]
    Or,
    #[token("left")]
    Left,
    #[token("right")]
    Right,
    #[token("write")]
    Write,
    #[token("reject")]
    Reject,
    #[token("accept")]
    Accept,
    #[token("let")]
    Let,
    #[token("if")]
    If,
    #[token("else")]
    Else,
    #[token("while")]
    While,
    #[token("call")]
    Call,
    #[token("print")]
    Print,
    #[token("func")]
    Func,
    #[token("proc")]
    Proc,

    // Literals
    #[regex(r"'[^\n]'", |lex| lex.slice().chars().nth(1))]
    SymbolLit(char),
    #[regex(r#""[^"\n]*""#, |lex| {
        let s = lex.slice();
        s[1..s.len() - 1].to_string()
    })]
    StringLit(String),

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Ident(String),

    // Operators and delimiters
    #[token("==")]
    EqEq,
    #[token("<=")]
    LtEq,
    #[token("=")]
    Eq,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(",")]
    Comma,
    #[token("\n")]
    Newline,
}

impl Token {
    /// Source spelling if this token is a reserved keyword
    pub fn keyword(&self) -> Option<&'static str> {
        let kw = match self {
            Token::Space => "space",
            Token::Read => "read",
            Token::True => "True",
            Token::False => "False",
            Token::Not => "not",
            Token::And => "and",
            Token::Or => "or",
            Token::Left => "left",
            Token::Right => "right",
            Token::Write => "write",
            Token::Reject => "reject",
            Token::Accept => "accept",
            Token::Let => "let",
            Token::If => "if",
            Token::Else => "else",
            Token::While => "while",
            Token::Call => "call",
            Token::Print => "print",
            Token::Func => "func",
            Token::Proc => "proc",
            _ => return None,
        };
        Some(kw)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(kw) = self.keyword() {
            return write!(f, "`{kw}`");
        }
        match self {
            Token::SymbolLit(c) => write!(f, "symbol '{c}'"),
            Token::StringLit(s) => write!(f, "string \"{s}\""),
            Token::Ident(name) => write!(f, "identifier `{name}`"),
            Token::EqEq => write!(f, "`==`"),
            Token::LtEq => write!(f, "`<=`"),
            Token::Eq => write!(f, "`=`"),
            Token::LParen => write!(f, "`(`"),
            Token::RParen => write!(f, "`)`"),
            Token::LBrace => write!(f, "`{{`"),
            Token::RBrace => write!(f, "`}}`"),
            Token::Comma => write!(f, "`,`"),
            Token::Newline => write!(f, "newline"),
            _ => write!(f, "{self:?}"),
        }
    }
}
