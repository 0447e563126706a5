//! Hand-rolled scanner for filter expressions

use crate::error::{EngineError, Result};

use super::token::{Token, TokenKind};

pub struct Lexer {
    source: Vec<char>,
    current: usize,
}

impl Lexer {
    pub fn new(source: &str) -> Self {
        Self {
            source: source.chars().collect(),
            current: 0,
        }
    }

    pub fn tokenize(&mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        Ok(tokens)
    }

    fn next_token(&mut self) -> Result<Token> {
        self.skip_whitespace();

        if self.is_at_end() {
            return Ok(Token::new(TokenKind::Eof, "", self.current));
        }

        let start = self.current;
        let c = self.advance();

        match c {
            '(' => Ok(Token::new(TokenKind::LParen, "(", start)),
            ')' => Ok(Token::new(TokenKind::RParen, ")", start)),
            '=' => {
                if self.match_char('=') {
                    Ok(Token::new(TokenKind::EqualEqual, "==", start))
                } else {
                    Err(EngineError::InvalidExpression(format!(
                        "unexpected '=' at position {start}; use '==' for equality"
                    )))
                }
            }
            '!' => {
                if self.match_char('=') {
                    Ok(Token::new(TokenKind::BangEqual, "!=", start))
                } else {
                    Err(EngineError::InvalidExpression(format!(
                        "unexpected '!' at position {start}; use '!=' or 'not'"
                    )))
                }
            }
            '<' => {
                if self.match_char('=') {
                    Ok(Token::new(TokenKind::LessEqual, "<=", start))
                } else {
                    Ok(Token::new(TokenKind::Less, "<", start))
                }
            }
            '>' => {
                if self.match_char('=') {
                    Ok(Token::new(TokenKind::GreaterEqual, ">=", start))
                } else {
                    Ok(Token::new(TokenKind::Greater, ">", start))
                }
            }
            '"' | '\'' => self.string(c, start),
            '-' if self.peek().is_ascii_digit() => self.number(start),
            c if c.is_ascii_digit() => self.number(start),
            c if is_identifier_start(c) => Ok(self.identifier(start)),
            other => Err(EngineError::InvalidExpression(format!(
                "unexpected character '{other}' at position {start}"
            ))),
        }
    }

    /// A quoted string; the opening quote decides the closing one.
    fn string(&mut self, quote: char, start: usize) -> Result<Token> {
        let mut value = String::new();
        while !self.is_at_end() && self.peek() != quote {
            value.push(self.advance());
        }
        if self.is_at_end() {
            return Err(EngineError::InvalidExpression(format!(
                "unterminated string starting at position {start}"
            )));
        }
        self.advance(); // closing quote
        Ok(Token::new(TokenKind::String, value, start))
    }

    /// A number: optional leading '-', digits, optional fraction.
    fn number(&mut self, start: usize) -> Result<Token> {
        while self.peek().is_ascii_digit() {
            self.advance();
        }
        if self.peek() == '.' && self.peek_next().is_ascii_digit() {
            self.advance();
            while self.peek().is_ascii_digit() {
                self.advance();
            }
        }
        let lexeme: String = self.source[start..self.current].iter().collect();
        Ok(Token::new(TokenKind::Number, lexeme, start))
    }

    /// An identifier or keyword; keywords are matched case-insensitively.
    fn identifier(&mut self, start: usize) -> Token {
        while is_identifier_continue(self.peek()) {
            self.advance();
        }
        let lexeme: String = self.source[start..self.current].iter().collect();
        let kind = match lexeme.to_lowercase().as_str() {
            "and" => TokenKind::And,
            "or" => TokenKind::Or,
            "not" => TokenKind::Not,
            "contains" => TokenKind::Contains,
            _ => TokenKind::Identifier,
        };
        Token::new(kind, lexeme, start)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_whitespace() {
            self.advance();
        }
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }

    fn advance(&mut self) -> char {
        let c = self.source[self.current];
        self.current += 1;
        c
    }

    fn match_char(&mut self, expected: char) -> bool {
        if self.peek() == expected {
            self.current += 1;
            true
        } else {
            false
        }
    }

    fn peek(&self) -> char {
        self.source.get(self.current).copied().unwrap_or('\0')
    }

    fn peek_next(&self) -> char {
        self.source.get(self.current + 1).copied().unwrap_or('\0')
    }
}

fn is_identifier_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_identifier_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        Lexer::new(input)
            .tokenize()
            .unwrap()
            .iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_tokenize_comparison() {
        assert_eq!(
            kinds("Age >= 21"),
            vec![
                TokenKind::Identifier,
                TokenKind::GreaterEqual,
                TokenKind::Number,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_tokenize_keywords_case_insensitively() {
        assert_eq!(
            kinds("a == 1 AND NOT (b == 2 or c contains x)"),
            vec![
                TokenKind::Identifier,
                TokenKind::EqualEqual,
                TokenKind::Number,
                TokenKind::And,
                TokenKind::Not,
                TokenKind::LParen,
                TokenKind::Identifier,
                TokenKind::EqualEqual,
                TokenKind::Number,
                TokenKind::Or,
                TokenKind::Identifier,
                TokenKind::Contains,
                TokenKind::Identifier,
                TokenKind::RParen,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_tokenize_strings_and_numbers() {
        let tokens = Lexer::new(r#"Name == "Ann B" and Score < -2.5"#)
            .tokenize()
            .unwrap();
        assert_eq!(tokens[2].kind, TokenKind::String);
        assert_eq!(tokens[2].lexeme, "Ann B");
        assert_eq!(tokens[6].kind, TokenKind::Number);
        assert_eq!(tokens[6].lexeme, "-2.5");
    }

    #[test]
    fn test_tokenize_rejects_stray_characters() {
        assert!(matches!(
            Lexer::new("a = 1").tokenize(),
            Err(EngineError::InvalidExpression(_))
        ));
        assert!(matches!(
            Lexer::new("a == \"open").tokenize(),
            Err(EngineError::InvalidExpression(_))
        ));
        assert!(matches!(
            Lexer::new("a @ 1").tokenize(),
            Err(EngineError::InvalidExpression(_))
        ));
    }
}
