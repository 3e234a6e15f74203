use super::*;
use crate::ast::{Field, TypeExpr};
use lexer::TokenKind;

impl Parser<'_> {
    pub(super) fn at_type_start(&self) -> bool {
        match self.current_kind() {
            TokenKind::Ident(_)
            | TokenKind::LBracket
            | TokenKind::KwMap
            | TokenKind::KwStruct
            | TokenKind::LParen => true,
            TokenKind::Op(op) => op == "*",
            _ => false,
        }
    }

    pub(super) fn parse_type(&mut self) -> PResult<TypeExpr> {
        match self.current_kind().clone() {
            TokenKind::Ident(_) => {
                let name = self.parse_ident("type")?;
                if self.eat(&TokenKind::Dot) {
                    let sel = self.parse_ident("qualified type")?;
                    Ok(TypeExpr::Qualified { pkg: name, sel })
                } else {
                    Ok(TypeExpr::Named(name))
                }
            }
            TokenKind::Op(op) if op == "*" => {
                self.bump();
                Ok(TypeExpr::Pointer(Box::new(self.parse_type()?)))
            }
            TokenKind::LBracket => {
                self.bump();
                if !self.at(&TokenKind::RBracket) {
                    return Err(self.error("array types are not supported"));
                }
                self.bump();
                Ok(TypeExpr::Slice(Box::new(self.parse_type()?)))
            }
            TokenKind::KwMap => {
                self.bump();
                self.expect(TokenKind::LBracket, "`[` after map")?;
                let key = self.parse_type()?;
                self.expect(TokenKind::RBracket, "`]` after map key")?;
                let value = self.parse_type()?;
                Ok(TypeExpr::Map {
                    key: Box::new(key),
                    value: Box::new(value),
                })
            }
            TokenKind::KwStruct => {
                self.bump();
                self.parse_struct_fields()
            }
            TokenKind::LParen => {
                self.bump();
                let ty = self.parse_type()?;
                self.expect(TokenKind::RParen, "`)` to close type")?;
                Ok(ty)
            }
            TokenKind::KwFunc | TokenKind::Unsupported(_) => {
                Err(self.error(format!(
                    "{} types are not supported",
                    self.current_kind().describe()
                )))
            }
            _ => Err(self.error_expected("type")),
        }
    }

    fn parse_struct_fields(&mut self) -> PResult<TypeExpr> {
        self.expect(TokenKind::LBrace, "`{` after struct")?;
        let mut fields = Vec::new();
        while !self.at(&TokenKind::RBrace) && !self.is_eof() {
            if self.eat(&TokenKind::Semicolon) {
                continue;
            }
            let first = self.parse_ident("field")?;
            let field = match self.current_kind() {
                // Embedded `pkg.T`.
                TokenKind::Dot => {
                    self.bump();
                    let sel = self.parse_ident("embedded type")?;
                    Field {
                        names: Vec::new(),
                        ty: TypeExpr::Qualified { pkg: first, sel },
                    }
                }
                // Embedded `T`.
                TokenKind::Semicolon | TokenKind::RBrace => Field {
                    names: Vec::new(),
                    ty: TypeExpr::Named(first),
                },
                _ => {
                    let mut names = vec![first];
                    while self.eat(&TokenKind::Comma) {
                        names.push(self.parse_ident("field")?);
                    }
                    let ty = self.parse_type()?;
                    Field { names, ty }
                }
            };
            fields.push(field);
            self.expect_semi("field")?;
        }
        self.expect(TokenKind::RBrace, "`}` to close struct")?;
        Ok(TypeExpr::Struct { fields })
    }
}
