//! Lexer implementation using logos

mod token;

pub use token::Token;

use crate::ast::Span;
use crate::error::{CompileError, Result};
use logos::Logos;

/// Tokenize source code
pub fn tokenize(source: &str) -> Result<Vec<(Token, Span)>> {
    let mut tokens = Vec::new();
    let mut lexer = Token::lexer(source);

    while let Some(result) = lexer.next() {
        let span = Span::new(lexer.span().start, lexer.span().end);
        match result {
            Ok(token) => tokens.push((token, span)),
            Err(_) => {
                return Err(CompileError::lexer(
                    format!("unexpected character: {:?}", lexer.slice()),
                    span,
                ));
            }
        }
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<Token> {
        tokenize(source)
            .unwrap()
            .into_iter()
            .map(|(t, _)| t)
            .collect()
    }

    #[test]
    fn test_tokenize_empty() {
        assert!(tokenize("").unwrap().is_empty());
    }

    #[test]
    fn test_tokenize_movement_keywords() {
        assert_eq!(
            kinds("left right write accept reject"),
            vec![Token::Left, Token::Right, Token::Write, Token::Accept, Token::Reject]
        );
    }

    #[test]
    fn test_tokenize_boolean_keywords() {
        assert_eq!(
            kinds("True False not and or"),
            vec![Token::True, Token::False, Token::Not, Token::And, Token::Or]
        );
    }

    #[test]
    fn test_keywords_are_case_sensitive() {
        assert_eq!(
            kinds("true"),
            vec![Token::Ident("true".to_string())]
        );
    }

    #[test]
    fn test_keyword_as_substring_is_identifier() {
        assert_eq!(
            kinds("reader leftover x_if"),
            vec![
                Token::Ident("reader".to_string()),
                Token::Ident("leftover".to_string()),
                Token::Ident("x_if".to_string()),
            ]
        );
    }

    #[test]
    fn test_tokenize_symbol_literals() {
        assert_eq!(
            kinds("'a' '#' ' ' '''"),
            vec![
                Token::SymbolLit('a'),
                Token::SymbolLit('#'),
                Token::SymbolLit(' '),
                Token::SymbolLit('\''),
            ]
        );
    }

    #[test]
    fn test_tokenize_string_literal() {
        assert_eq!(
            kinds(r#"print "hello world""#),
            vec![Token::Print, Token::StringLit("hello world".to_string())]
        );
    }

    #[test]
    fn test_tokenize_operators() {
        assert_eq!(
            kinds("== <= = ( ) { } ,"),
            vec![
                Token::EqEq,
                Token::LtEq,
                Token::Eq,
                Token::LParen,
                Token::RParen,
                Token::LBrace,
                Token::RBrace,
                Token::Comma,
            ]
        );
    }

    #[test]
    fn test_newlines_are_tokens() {
        assert_eq!(
            kinds("left\n\nright"),
            vec![Token::Left, Token::Newline, Token::Newline, Token::Right]
        );
    }

    #[test]
    fn test_line_comment_keeps_newline() {
        assert_eq!(
            kinds("left // move\nright"),
            vec![Token::Left, Token::Newline, Token::Right]
        );
    }

    #[test]
    fn test_block_comment_skipped() {
        assert_eq!(
            kinds("left /* a\n * b **/ right"),
            vec![Token::Left, Token::Right]
        );
    }

    #[test]
    fn test_tokenize_spans() {
        let tokens = tokenize("let x").unwrap();
        assert_eq!(tokens[0].1, Span::new(0, 3));
        assert_eq!(tokens[1].1, Span::new(4, 5));
    }

    #[test]
    fn test_unexpected_character() {
        let err = tokenize("left $").unwrap_err();
        assert_eq!(err.span(), Some(Span::new(5, 6)));
        assert!(err.message().contains("unexpected character"));
    }

    #[test]
    fn test_token_display() {
        assert_eq!(Token::Read.to_string(), "`read`");
        assert_eq!(Token::LBrace.to_string(), "`{`");
        assert_eq!(Token::Ident("f".to_string()).to_string(), "identifier `f`");
    }
}
