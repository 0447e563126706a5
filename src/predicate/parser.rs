//! Recursive descent parser for filter expressions
//!
//! Grammar, loosest binding first:
//!
//! ```text
//! expression := and_expr ( "or" and_expr )*
//! and_expr   := unary ( "and" unary )*
//! unary      := "not" unary | "(" expression ")" | comparison
//! comparison := column operator literal
//! ```

use crate::error::{EngineError, Result};

use super::token::{Token, TokenKind};
use super::{CompareOp, Literal, Predicate};

pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, current: 0 }
    }

    pub fn parse(&mut self) -> Result<Predicate> {
        let expression = self.or_expression()?;
        if !self.check(TokenKind::Eof) {
            let token = self.peek();
            return Err(EngineError::InvalidExpression(format!(
                "unexpected '{}' at position {}",
                token.lexeme, token.position
            )));
        }
        Ok(expression)
    }

    fn or_expression(&mut self) -> Result<Predicate> {
        let mut expression = self.and_expression()?;
        while self.match_token(TokenKind::Or) {
            let right = self.and_expression()?;
            expression = Predicate::Or(Box::new(expression), Box::new(right));
        }
        Ok(expression)
    }

    fn and_expression(&mut self) -> Result<Predicate> {
        let mut expression = self.unary()?;
        while self.match_token(TokenKind::And) {
            let right = self.unary()?;
            expression = Predicate::And(Box::new(expression), Box::new(right));
        }
        Ok(expression)
    }

    fn unary(&mut self) -> Result<Predicate> {
        if self.match_token(TokenKind::Not) {
            return Ok(Predicate::Not(Box::new(self.unary()?)));
        }
        if self.match_token(TokenKind::LParen) {
            let expression = self.or_expression()?;
            self.consume(TokenKind::RParen, "expected ')'")?;
            return Ok(expression);
        }
        self.comparison()
    }

    fn comparison(&mut self) -> Result<Predicate> {
        let column = match self.peek().kind {
            // Quoted names allow columns with spaces.
            TokenKind::Identifier | TokenKind::String => self.advance().lexeme.clone(),
            _ => {
                let token = self.peek();
                return Err(EngineError::InvalidExpression(format!(
                    "expected a column name at position {}, found '{}'",
                    token.position, token.lexeme
                )));
            }
        };
        let op = self.comparison_operator()?;
        let value = self.literal()?;
        Ok(Predicate::Compare { column, op, value })
    }

    fn comparison_operator(&mut self) -> Result<CompareOp> {
        let token = self.advance();
        match token.kind {
            TokenKind::EqualEqual => Ok(CompareOp::Eq),
            TokenKind::BangEqual => Ok(CompareOp::Ne),
            TokenKind::Less => Ok(CompareOp::Lt),
            TokenKind::LessEqual => Ok(CompareOp::Le),
            TokenKind::Greater => Ok(CompareOp::Gt),
            TokenKind::GreaterEqual => Ok(CompareOp::Ge),
            TokenKind::Contains => Ok(CompareOp::Contains),
            _ => Err(EngineError::InvalidExpression(format!(
                "expected a comparison operator at position {}, found '{}'",
                token.position, token.lexeme
            ))),
        }
    }

    fn literal(&mut self) -> Result<Literal> {
        let token = self.advance();
        match token.kind {
            TokenKind::Number => {
                let lexeme = token.lexeme.clone();
                lexeme.parse::<f64>().map(Literal::Number).map_err(|_| {
                    EngineError::InvalidExpression(format!("invalid number '{lexeme}'"))
                })
            }
            // Unquoted single words are accepted as text values.
            TokenKind::String | TokenKind::Identifier => Ok(Literal::Text(token.lexeme.clone())),
            _ => Err(EngineError::InvalidExpression(format!(
                "expected a value at position {}, found '{}'",
                token.position, token.lexeme
            ))),
        }
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    fn is_at_end(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    fn match_token(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn advance(&mut self) -> &Token {
        if self.is_at_end() {
            return &self.tokens[self.current];
        }
        self.current += 1;
        &self.tokens[self.current - 1]
    }

    fn consume(&mut self, kind: TokenKind, message: &str) -> Result<&Token> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            let token = self.peek();
            Err(EngineError::InvalidExpression(format!(
                "{message} at position {}, found '{}'",
                token.position, token.lexeme
            )))
        }
    }
}
