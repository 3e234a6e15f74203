use super::*;
use crate::ast::{Expr, LitKind};
use lexer::TokenKind;

const UNARY_OPS: &[&str] = &["-", "+", "!", "^", "*", "&"];

impl Parser<'_> {
    pub(super) fn parse_expr(&mut self) -> PResult<Expr> {
        self.parse_binary(1)
    }

    pub(super) fn parse_expr_list(&mut self) -> PResult<Vec<Expr>> {
        let mut exprs = vec![self.parse_expr()?];
        while self.eat(&TokenKind::Comma) {
            exprs.push(self.parse_expr()?);
        }
        Ok(exprs)
    }

    fn parse_binary(&mut self, min_prec: u8) -> PResult<Expr> {
        let mut lhs = self.parse_unary()?;
        loop {
            let op = match self.current_kind() {
                TokenKind::Op(op) => op.clone(),
                _ => break,
            };
            let prec = Expr::precedence(&op);
            if prec == 0 || prec < min_prec {
                break;
            }
            self.bump();
            let rhs = self.parse_binary(prec + 1)?;
            let span = lhs.span().cover(&rhs.span());
            lhs = Expr::Binary {
                op,
                x: Box::new(lhs),
                y: Box::new(rhs),
                span,
            };
        }
        Ok(lhs)
    }

    fn parse_unary(&mut self) -> PResult<Expr> {
        if let TokenKind::Op(op) = self.current_kind() {
            if op == "<-" {
                return Err(self.error("channel operations are not supported"));
            }
            if UNARY_OPS.contains(&op.as_str()) {
                let op = op.clone();
                let start = self.bump().span.start;
                let x = self.parse_unary()?;
                let span = Span::new(start, x.span().end);
                return Ok(Expr::Unary {
                    op,
                    x: Box::new(x),
                    span,
                });
            }
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> PResult<Expr> {
        let mut expr = self.parse_operand()?;
        loop {
            match self.current_kind() {
                TokenKind::Dot => {
                    self.bump();
                    let sel = self.parse_ident("selector")?;
                    let span = Span::new(expr.span().start, sel.span.end);
                    expr = Expr::Selector {
                        x: Box::new(expr),
                        sel,
                        span,
                    };
                }
                TokenKind::LParen => {
                    self.bump();
                    let mut args = Vec::new();
                    while !self.at(&TokenKind::RParen) && !self.is_eof() {
                        args.push(self.parse_expr()?);
                        if !self.eat(&TokenKind::Comma) {
                            break;
                        }
                    }
                    let end = self.expect(TokenKind::RParen, "`)` to close call")?.span.end;
                    let span = Span::new(expr.span().start, end);
                    expr = Expr::Call {
                        id: self.ids.fresh(),
                        fun: Box::new(expr),
                        args,
                        span,
                    };
                }
                TokenKind::LBracket => {
                    self.bump();
                    let index = self.parse_expr()?;
                    let end = self
                        .expect(TokenKind::RBracket, "`]` to close index")?
                        .span
                        .end;
                    let span = Span::new(expr.span().start, end);
                    expr = Expr::Index {
                        x: Box::new(expr),
                        index: Box::new(index),
                        span,
                    };
                }
                _ => break,
            }
        }
        Ok(expr)
    }

    fn parse_operand(&mut self) -> PResult<Expr> {
        let (kind, value) = match self.current_kind().clone() {
            TokenKind::Ident(_) => return Ok(Expr::Ident(self.parse_ident("operand")?)),
            TokenKind::LParen => {
                let start = self.bump().span.start;
                let x = self.parse_expr()?;
                let end = self.expect(TokenKind::RParen, "`)`")?.span.end;
                return Ok(Expr::Paren {
                    x: Box::new(x),
                    span: Span::new(start, end),
                });
            }
            TokenKind::Int(v) => (LitKind::Int, v),
            TokenKind::Float(v) => (LitKind::Float, v),
            TokenKind::Char(v) => (LitKind::Char, v),
            TokenKind::Str(v) => (LitKind::String, v),
            TokenKind::KwFunc => {
                return Err(self.error("function literals are not supported"));
            }
            _ => return Err(self.error_expected("expression")),
        };
        let span = self.bump().span;
        Ok(Expr::Lit { kind, value, span })
    }
}
