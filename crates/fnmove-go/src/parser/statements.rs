use super::*;
use crate::ast::{Block, Expr, Stmt};
use lexer::TokenKind;

impl Parser<'_> {
    pub(super) fn parse_block(&mut self) -> PResult<Block> {
        let start = self.expect(TokenKind::LBrace, "`{`")?.span.start;
        let mut stmts = Vec::new();
        while !self.at(&TokenKind::RBrace) && !self.is_eof() {
            if self.eat(&TokenKind::Semicolon) {
                continue;
            }
            stmts.push(self.parse_stmt()?);
            self.expect_semi("statement")?;
        }
        let end = self.expect(TokenKind::RBrace, "`}` to close block")?.span.end;
        Ok(Block {
            stmts,
            span: Span::new(start, end),
        })
    }

    fn parse_stmt(&mut self) -> PResult<Stmt> {
        match self.current_kind().clone() {
            TokenKind::KwVar | TokenKind::KwConst | TokenKind::KwType => {
                Ok(Stmt::Decl(self.parse_gen_decl()?))
            }
            TokenKind::KwReturn => {
                let start = self.bump().span.start;
                let results = if matches!(
                    self.current_kind(),
                    TokenKind::Semicolon | TokenKind::RBrace
                ) {
                    Vec::new()
                } else {
                    self.parse_expr_list()?
                };
                Ok(Stmt::Return {
                    results,
                    span: Span::new(start, self.previous_end()),
                })
            }
            TokenKind::KwIf => self.parse_if(),
            TokenKind::KwFor => self.parse_for(),
            TokenKind::LBrace => Ok(Stmt::Block(self.parse_block()?)),
            TokenKind::KwBreak | TokenKind::KwContinue => {
                let token = self.bump();
                let keyword = if token.kind == TokenKind::KwBreak {
                    "break"
                } else {
                    "continue"
                };
                Ok(Stmt::Branch {
                    keyword: keyword.to_string(),
                    span: token.span,
                })
            }
            TokenKind::Unsupported(kw) => {
                Err(self.error(format!("`{}` statements are not supported", kw)))
            }
            _ => self.parse_simple_stmt(),
        }
    }

    /// Expression, assignment, short variable declaration or inc/dec.
    fn parse_simple_stmt(&mut self) -> PResult<Stmt> {
        let start = self.current_span().start;
        let mut lhs = self.parse_expr_list()?;

        match self.current_kind().clone() {
            TokenKind::Define => {
                self.bump();
                let mut names = Vec::with_capacity(lhs.len());
                for expr in lhs {
                    match expr {
                        Expr::Ident(ident) => names.push(ident),
                        _ => return Err(self.error("non-name on left side of :=")),
                    }
                }
                let rhs = self.parse_expr_list()?;
                Ok(Stmt::Define {
                    lhs: names,
                    rhs,
                    span: Span::new(start, self.previous_end()),
                })
            }
            TokenKind::Assign | TokenKind::OpAssign(_) => {
                let op = match self.bump().kind {
                    TokenKind::OpAssign(op) => format!("{}=", op),
                    _ => "=".to_string(),
                };
                let rhs = self.parse_expr_list()?;
                Ok(Stmt::Assign {
                    lhs,
                    op,
                    rhs,
                    span: Span::new(start, self.previous_end()),
                })
            }
            TokenKind::Inc | TokenKind::Dec => {
                let inc = self.bump().kind == TokenKind::Inc;
                if lhs.len() != 1 {
                    return Err(self.error("expected single operand for ++/--"));
                }
                let x = lhs.remove(0);
                Ok(Stmt::IncDec {
                    x,
                    inc,
                    span: Span::new(start, self.previous_end()),
                })
            }
            _ => {
                if lhs.len() != 1 {
                    return Err(self.error_expected("`=` or `:=`"));
                }
                Ok(Stmt::Expr(lhs.remove(0)))
            }
        }
    }

    fn parse_if(&mut self) -> PResult<Stmt> {
        let start = self.expect(TokenKind::KwIf, "`if`")?.span.start;
        let first = self.parse_simple_stmt()?;
        let (init, cond) = if self.eat(&TokenKind::Semicolon) {
            (Some(Box::new(first)), self.parse_expr()?)
        } else {
            match first {
                Stmt::Expr(cond) => (None, cond),
                _ => return Err(self.error("expected condition in if statement")),
            }
        };
        let then = self.parse_block()?;

        let els = if self.eat(&TokenKind::KwElse) {
            match self.current_kind() {
                TokenKind::KwIf => Some(Box::new(self.parse_if()?)),
                TokenKind::LBrace => Some(Box::new(Stmt::Block(self.parse_block()?))),
                _ => return Err(self.error_expected("`if` or `{` after else")),
            }
        } else {
            None
        };

        Ok(Stmt::If {
            init,
            cond,
            then,
            els,
            span: Span::new(start, self.previous_end()),
        })
    }

    fn parse_for(&mut self) -> PResult<Stmt> {
        let start = self.expect(TokenKind::KwFor, "`for`")?.span.start;
        let mut init = None;
        let mut cond = None;
        let mut post = None;

        if !self.at(&TokenKind::LBrace) {
            let first = if self.at(&TokenKind::Semicolon) {
                None
            } else {
                Some(self.parse_simple_stmt()?)
            };
            if self.eat(&TokenKind::Semicolon) {
                init = first.map(Box::new);
                if !self.at(&TokenKind::Semicolon) {
                    cond = Some(self.parse_expr()?);
                }
                self.expect(TokenKind::Semicolon, "`;` in for clause")?;
                if !self.at(&TokenKind::LBrace) {
                    post = Some(Box::new(self.parse_simple_stmt()?));
                }
            } else {
                match first {
                    Some(Stmt::Expr(expr)) => cond = Some(expr),
                    _ => return Err(self.error("expected for loop condition")),
                }
            }
        }

        let body = self.parse_block()?;
        Ok(Stmt::For {
            init,
            cond,
            post,
            body,
            span: Span::new(start, self.previous_end()),
        })
    }
}
