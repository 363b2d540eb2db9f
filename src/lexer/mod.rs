pub mod token;

use logos::Logos;
use crate::span::{Span, Spanned};
use crate::diagnostics::MigrateError;
use token::Token;

pub fn lex(source: &str) -> Result<Vec<Spanned<Token>>, MigrateError> {
    let mut tokens = Vec::new();
    let mut lexer = Token::lexer(source);

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        match result {
            Ok(tok) => tokens.push(Spanned::new(tok, Span::new(span.start, span.end))),
            Err(()) => {
                return Err(MigrateError::syntax(
                    format!("unexpected character '{}'", &source[span.start..span.end]),
                    Span::new(span.start, span.end),
                ));
            }
        }
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<Token> {
        lex(src).unwrap().into_iter().map(|t| t.node).collect()
    }

    #[test]
    fn lex_local_variable_declaration() {
        let src = "DateTime dt = new DateTime();";
        let tokens = lex(src).unwrap();
        assert_eq!(tokens.len(), 8);
        assert!(matches!(tokens[0].node, Token::Ident));
        assert!(matches!(tokens[1].node, Token::Ident));
        assert!(matches!(tokens[2].node, Token::Eq));
        assert!(matches!(tokens[3].node, Token::New));
        assert!(matches!(tokens[4].node, Token::Ident));
        assert!(matches!(tokens[5].node, Token::LParen));
        assert!(matches!(tokens[6].node, Token::RParen));
        assert!(matches!(tokens[7].node, Token::Semi));
        assert_eq!(&src[tokens[1].span.start..tokens[1].span.end], "dt");
    }

    #[test]
    fn lex_numeric_literals_keep_text() {
        let src = "1L 1_000_000 0x1F 2.5 3d 4f";
        let tokens = lex(src).unwrap();
        let texts: Vec<&str> = tokens.iter().map(|t| &src[t.span.start..t.span.end]).collect();
        assert_eq!(texts, vec!["1L", "1_000_000", "0x1F", "2.5", "3d", "4f"]);
        assert!(matches!(tokens[0].node, Token::IntLit));
        assert!(matches!(tokens[1].node, Token::IntLit));
        assert!(matches!(tokens[2].node, Token::IntLit));
        assert!(matches!(tokens[3].node, Token::FloatLit));
        assert!(matches!(tokens[4].node, Token::FloatLit));
        assert!(matches!(tokens[5].node, Token::FloatLit));
    }

    #[test]
    fn lex_placeholders() {
        let toks = kinds("#{any(long)} * #{any()}");
        assert_eq!(toks[0], Token::Placeholder("long".to_string()));
        assert_eq!(toks[1], Token::Star);
        assert_eq!(toks[2], Token::Placeholder(String::new()));
    }

    #[test]
    fn lex_qualified_placeholder_type() {
        let toks = kinds("#{any(java.time.ZonedDateTime)}.toInstant()");
        assert_eq!(toks[0], Token::Placeholder("java.time.ZonedDateTime".to_string()));
        assert_eq!(toks[1], Token::Dot);
    }

    #[test]
    fn lex_comments_skipped() {
        let toks = kinds("a // line\n /* block\n comment */ b");
        assert_eq!(toks, vec![Token::Ident, Token::Ident]);
    }

    #[test]
    fn lex_keywords_and_modifiers() {
        let toks = kinds("public static final long x;");
        assert_eq!(toks[0].modifier(), Some("public"));
        assert_eq!(toks[1].modifier(), Some("static"));
        assert_eq!(toks[2].modifier(), Some("final"));
        assert_eq!(toks[3].primitive(), Some("long"));
    }

    #[test]
    fn lex_string_and_char_literals() {
        let toks = kinds(r#""yyyy-MM-dd" 'x' "a\"b""#);
        assert_eq!(toks, vec![Token::StringLit, Token::CharLit, Token::StringLit]);
    }

    #[test]
    fn lex_compound_operators() {
        let toks = kinds("a += b <= c && !d");
        assert_eq!(
            toks,
            vec![Token::Ident, Token::PlusEq, Token::Ident, Token::LtEq, Token::Ident, Token::AmpAmp, Token::Bang, Token::Ident]
        );
    }

    #[test]
    fn lex_unexpected_character_error() {
        let err = lex("int x = 1 \\ 2;").unwrap_err();
        match err {
            MigrateError::Syntax { msg, span } => {
                assert!(msg.contains("unexpected character"));
                assert_eq!(span.start, 10);
            }
            other => panic!("expected syntax error, got {other:?}"),
        }
    }

    #[test]
    fn lex_empty_source() {
        assert!(lex("").unwrap().is_empty());
        assert!(lex("   \n\t ").unwrap().is_empty());
    }
}
