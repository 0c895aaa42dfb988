//expressions, parsed by precedence climbing and evaluated the moment each node is built

use crate::ast::{Call, Expr, ExprKind, Operator};
use crate::lexer_tokenizer::{Token, TokenKind};
use crate::parser::{parser_error::ParseFailure, parser_kernel::Parser};
use crate::semantic::{Value, semantic_eval};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Assoc {
    Left,
    NonAssoc,
}

impl<'src, 'ctx> Parser<'src, 'ctx> {
    pub fn parse_expr(&mut self) -> Result<Expr, ParseFailure> {
        self.parse_binary_op(0)
    }

    fn parse_binary_op(&mut self, min_precedence: u8) -> Result<Expr, ParseFailure> {
        let mut result = self.parse_term()?;
        let mut chained: Option<u8> = None;

        while let Some(op) = self.current_kind().and_then(token_to_operator) {
            let (prec, assoc) = operator_precedence(op);
            if prec < min_precedence {
                break;
            }
            if assoc == Assoc::NonAssoc && chained == Some(prec) {
                return Err(self.unexpected());
            }
            let line = self.line();
            self.advance();
            let right = self.parse_binary_op(prec + 1)?;

            let value = match semantic_eval::eval_binary(op, result.value.as_ref(), right.value.as_ref()) {
                Ok(value) => Some(value),
                Err(error) => {
                    self.record_semantic(line, error);
                    None
                }
            };
            result = Expr::new(
                ExprKind::Binary {
                    op,
                    left: Box::new(result),
                    right: Box::new(right),
                },
                line,
                value,
            );
            chained = (assoc == Assoc::NonAssoc).then_some(prec);
        }
        Ok(result)
    }

    pub fn parse_term(&mut self) -> Result<Expr, ParseFailure> {
        let Some(token) = self.current().cloned() else {
            return Err(self.unexpected());
        };
        match token.kind {
            TokenKind::Number => {
                self.advance();
                let n = token.number().unwrap_or_default();
                Ok(Expr::new(ExprKind::Number(n), token.line, Some(Value::Integer(n))))
            }
            TokenKind::True | TokenKind::False => {
                self.advance();
                let b = token.kind == TokenKind::True;
                Ok(Expr::new(ExprKind::Boolean(b), token.line, Some(Value::Boolean(b))))
            }
            TokenKind::Identifier if self.peek_kind(1) == Some(TokenKind::LParen) => {
                self.advance();
                let (call, value) = self.parse_call(token.clone())?;
                Ok(Expr::new(ExprKind::Call(call), token.line, value))
            }
            TokenKind::Identifier => {
                self.advance();
                let value = match self.ctx.lookup(token.text) {
                    Ok(value) => value,
                    Err(error) => {
                        self.record_semantic(token.line, error);
                        None
                    }
                };
                Ok(Expr::new(ExprKind::Identifier(token.text.to_string()), token.line, value))
            }
            TokenKind::LParen => {
                self.advance();
                self.enter()?;
                let inner = self.parse_expr();
                self.leave();
                let inner = inner?;
                self.expect(TokenKind::RParen)?;
                let value = match semantic_eval::eval_grouping(inner.value.as_ref()) {
                    Ok(value) => Some(value),
                    Err(error) => {
                        self.record_semantic(token.line, error);
                        None
                    }
                };
                Ok(Expr::new(ExprKind::Grouping(Box::new(inner)), token.line, value))
            }
            _ => Err(self.unexpected()),
        }
    }

    /// `( args )` after an already consumed callee name. The callee must be
    /// registered with a matching arity, otherwise the whole parse stops.
    pub fn parse_call(&mut self, name: Token<'src>) -> Result<(Call, Option<Value>), ParseFailure> {
        self.expect(TokenKind::LParen)?;
        let mut args = Vec::new();
        if !self.check(TokenKind::RParen) {
            loop {
                args.push(self.parse_expr()?);
                if !self.match_token(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen)?;

        let value = self.ctx.resolve_call(name.text, args.len(), name.line)?;
        let call = Call {
            name: name.text.to_string(),
            args,
            line: name.line,
        };
        Ok((call, value))
    }
}

fn token_to_operator(kind: TokenKind) -> Option<Operator> {
    match kind {
        TokenKind::Plus => Some(Operator::Plus),
        TokenKind::Minus => Some(Operator::Minus),
        TokenKind::Star => Some(Operator::Multiply),
        TokenKind::Slash => Some(Operator::Divide),
        TokenKind::Mod => Some(Operator::Modulo),
        TokenKind::Less => Some(Operator::Less),
        TokenKind::LessEqual => Some(Operator::LessEqual),
        TokenKind::Greater => Some(Operator::Greater),
        TokenKind::GreaterEqual => Some(Operator::GreaterEqual),
        TokenKind::Equal => Some(Operator::Equal),
        TokenKind::NotEqual => Some(Operator::NotEqual),
        _ => None,
    }
}

// lowest binds loosest: additive < multiplicative < relational < equality
fn operator_precedence(op: Operator) -> (u8, Assoc) {
    match op {
        Operator::Plus | Operator::Minus => (1, Assoc::Left),
        Operator::Multiply | Operator::Divide | Operator::Modulo => (2, Assoc::Left),
        Operator::Less | Operator::LessEqual | Operator::Greater | Operator::GreaterEqual => {
            (3, Assoc::NonAssoc)
        }
        Operator::Equal | Operator::NotEqual => (4, Assoc::NonAssoc),
    }
}
