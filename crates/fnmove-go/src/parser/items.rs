use super::*;
use crate::ast::{
    Field, FuncDecl, GenDecl, GenKind, Ident, ImportName, ImportSpec, Spec, TypeExpr, TypeSpec,
    ValueSpec,
};
use lexer::TokenKind;

/// One entry of a parameter list before names and types are grouped.
enum ParamEntry {
    /// A lone identifier: a name or a type, decided by the whole list.
    Bare(Ident),
    Named(Ident, TypeExpr),
    Type(TypeExpr),
}

impl Parser<'_> {
    pub(super) fn parse_source_file(&mut self, end: usize) -> PResult<SourceFile> {
        self.expect(TokenKind::KwPackage, "package clause")?;
        let package = self.parse_ident("package name")?;
        self.expect_semi("package clause")?;

        let mut imports = Vec::new();
        while self.at(&TokenKind::KwImport) {
            self.bump();
            if self.eat(&TokenKind::LParen) {
                while !self.at(&TokenKind::RParen) && !self.is_eof() {
                    imports.push(self.parse_import_spec()?);
                    self.expect_semi("import")?;
                }
                self.expect(TokenKind::RParen, "`)` to close imports")?;
            } else {
                imports.push(self.parse_import_spec()?);
            }
            self.expect_semi("import declaration")?;
        }

        let mut decls = Vec::new();
        while !self.is_eof() {
            let decl = match self.current_kind() {
                TokenKind::Semicolon => {
                    self.bump();
                    continue;
                }
                TokenKind::KwFunc => Decl::Func(self.parse_func_decl()?),
                TokenKind::KwVar | TokenKind::KwConst | TokenKind::KwType => {
                    Decl::Gen(self.parse_gen_decl()?)
                }
                TokenKind::KwImport => {
                    return Err(self.error("imports must appear before other declarations"));
                }
                _ => return Err(self.error_expected("declaration")),
            };
            decls.push(decl);
            self.expect_semi("declaration")?;
        }

        Ok(SourceFile {
            doc: None,
            package,
            imports,
            decls,
            comments: Vec::new(),
            end,
        })
    }

    fn parse_import_spec(&mut self) -> PResult<ImportSpec> {
        let start = self.current_span().start;
        let name = match self.current_kind().clone() {
            TokenKind::Ident(n) if n == "_" => {
                self.bump();
                ImportName::Blank
            }
            TokenKind::Ident(n) => {
                self.bump();
                ImportName::Alias(n)
            }
            TokenKind::Dot => {
                self.bump();
                ImportName::Dot
            }
            _ => ImportName::Default,
        };
        let TokenKind::Str(raw) = self.current_kind().clone() else {
            return Err(self.error_expected("import path"));
        };
        let path = unquote(&raw);
        if path.is_empty() {
            return Err(self.error("invalid import path \"\""));
        }
        let end = self.bump().span.end;
        Ok(ImportSpec::new(name, path, Span::new(start, end)))
    }

    pub(super) fn parse_func_decl(&mut self) -> PResult<FuncDecl> {
        let start = self.expect(TokenKind::KwFunc, "`func`")?.span.start;

        let recv = if self.at(&TokenKind::LParen) {
            let mut fields = self.parse_params()?;
            if fields.len() != 1 || fields[0].names.len() > 1 {
                return Err(self.error("method must have exactly one receiver"));
            }
            fields.pop()
        } else {
            None
        };

        let name = self.parse_ident("function name")?;
        let params = self.parse_params()?;
        let results = self.parse_results()?;
        if !self.at(&TokenKind::LBrace) {
            return Err(self.error_expected("function body"));
        }
        let body = self.parse_block()?;
        let span = Span::new(start, body.span.end);

        Ok(FuncDecl {
            doc: None,
            recv,
            name,
            params,
            results,
            body,
            span,
        })
    }

    /// `( ... )` parameter list, grouping names with their types.
    pub(super) fn parse_params(&mut self) -> PResult<Vec<Field>> {
        self.expect(TokenKind::LParen, "`(`")?;
        let mut entries = Vec::new();
        while !self.at(&TokenKind::RParen) && !self.is_eof() {
            let entry = if matches!(self.current_kind(), TokenKind::Ident(_)) {
                let ident = self.parse_ident("parameter")?;
                match self.current_kind() {
                    TokenKind::Dot => {
                        self.bump();
                        let sel = self.parse_ident("qualified type")?;
                        ParamEntry::Type(TypeExpr::Qualified { pkg: ident, sel })
                    }
                    TokenKind::Comma | TokenKind::RParen => ParamEntry::Bare(ident),
                    TokenKind::Ellipsis => {
                        return Err(self.error("variadic parameters are not supported"));
                    }
                    _ => ParamEntry::Named(ident, self.parse_type()?),
                }
            } else {
                ParamEntry::Type(self.parse_type()?)
            };
            entries.push(entry);
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RParen, "`)` to close parameters")?;
        self.group_params(entries)
    }

    fn group_params(&self, entries: Vec<ParamEntry>) -> PResult<Vec<Field>> {
        let named = entries.iter().any(|e| matches!(e, ParamEntry::Named(..)));
        if !named {
            return Ok(entries
                .into_iter()
                .map(|entry| {
                    let ty = match entry {
                        ParamEntry::Bare(ident) => TypeExpr::Named(ident),
                        ParamEntry::Type(ty) | ParamEntry::Named(_, ty) => ty,
                    };
                    Field {
                        names: Vec::new(),
                        ty,
                    }
                })
                .collect());
        }

        let mut fields = Vec::new();
        let mut pending = Vec::new();
        for entry in entries {
            match entry {
                ParamEntry::Bare(ident) => pending.push(ident),
                ParamEntry::Named(ident, ty) => {
                    pending.push(ident);
                    fields.push(Field {
                        names: std::mem::take(&mut pending),
                        ty,
                    });
                }
                ParamEntry::Type(_) => {
                    return Err(self.error("mixed named and unnamed parameters"));
                }
            }
        }
        if !pending.is_empty() {
            return Err(self.error("mixed named and unnamed parameters"));
        }
        Ok(fields)
    }

    fn parse_results(&mut self) -> PResult<Vec<Field>> {
        if self.at(&TokenKind::LParen) {
            return self.parse_params();
        }
        if self.at_type_start() {
            let ty = self.parse_type()?;
            return Ok(vec![Field {
                names: Vec::new(),
                ty,
            }]);
        }
        Ok(Vec::new())
    }

    /// `var`, `const` or `type`, single or parenthesized.
    pub(super) fn parse_gen_decl(&mut self) -> PResult<GenDecl> {
        let start = self.current_span().start;
        let kind = match self.bump().kind {
            TokenKind::KwVar => GenKind::Var,
            TokenKind::KwConst => GenKind::Const,
            _ => GenKind::Type,
        };

        let mut specs = Vec::new();
        let grouped = self.eat(&TokenKind::LParen);
        if grouped {
            while !self.at(&TokenKind::RParen) && !self.is_eof() {
                if self.eat(&TokenKind::Semicolon) {
                    continue;
                }
                specs.push(self.parse_spec(kind)?);
                self.expect_semi("declaration")?;
            }
            self.expect(TokenKind::RParen, "`)` to close declaration group")?;
        } else {
            specs.push(self.parse_spec(kind)?);
        }

        Ok(GenDecl {
            doc: None,
            kind,
            specs,
            grouped,
            span: Span::new(start, self.previous_end()),
        })
    }

    fn parse_spec(&mut self, kind: GenKind) -> PResult<Spec> {
        let start = self.current_span().start;
        if kind == GenKind::Type {
            let name = self.parse_ident("type name")?;
            if self.at(&TokenKind::Assign) {
                return Err(self.error("type aliases are not supported"));
            }
            let ty = self.parse_type()?;
            return Ok(Spec::Type(TypeSpec {
                name,
                ty,
                span: Span::new(start, self.previous_end()),
            }));
        }

        let mut names = vec![self.parse_ident("declared name")?];
        while self.eat(&TokenKind::Comma) {
            names.push(self.parse_ident("declared name")?);
        }
        let ty = if self.at_type_start() {
            Some(self.parse_type()?)
        } else {
            None
        };
        let values = if self.eat(&TokenKind::Assign) {
            self.parse_expr_list()?
        } else {
            Vec::new()
        };
        Ok(Spec::Value(ValueSpec {
            names,
            ty,
            values,
            span: Span::new(start, self.previous_end()),
        }))
    }
}

/// Strip the quotes of an import path literal.
fn unquote(raw: &str) -> String {
    raw.trim_start_matches(['"', '`'])
        .trim_end_matches(['"', '`'])
        .to_string()
}
