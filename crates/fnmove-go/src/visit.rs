//! Visitor infrastructure for syntax tree traversal.
//!
//! [`Visitor`] provides read-only traversal and [`VisitorMut`] in-place
//! mutation. Both are depth-first and pre-order, visiting children in
//! source order. Override a `visit_*` method to observe a node kind and
//! call the matching `walk_*` function to continue into its children.

use crate::ast::{
    Block, CommentGroup, Decl, Expr, Field, FuncDecl, GenDecl, Ident, SourceFile, Spec, Stmt,
    TypeExpr,
};

// ============================================================================
// Read-only
// ============================================================================

pub trait Visitor<'ast> {
    fn visit_decl(&mut self, decl: &'ast Decl) {
        walk_decl(self, decl);
    }

    fn visit_func(&mut self, func: &'ast FuncDecl) {
        walk_func(self, func);
    }

    fn visit_gen_decl(&mut self, decl: &'ast GenDecl) {
        walk_gen_decl(self, decl);
    }

    fn visit_field(&mut self, field: &'ast Field) {
        walk_field(self, field);
    }

    fn visit_type(&mut self, ty: &'ast TypeExpr) {
        walk_type(self, ty);
    }

    fn visit_block(&mut self, block: &'ast Block) {
        walk_block(self, block);
    }

    fn visit_stmt(&mut self, stmt: &'ast Stmt) {
        walk_stmt(self, stmt);
    }

    fn visit_expr(&mut self, expr: &'ast Expr) {
        walk_expr(self, expr);
    }

    fn visit_ident(&mut self, _ident: &'ast Ident) {}
}

pub fn walk_file<'ast, V: Visitor<'ast> + ?Sized>(v: &mut V, file: &'ast SourceFile) {
    v.visit_ident(&file.package);
    for decl in &file.decls {
        v.visit_decl(decl);
    }
}

pub fn walk_decl<'ast, V: Visitor<'ast> + ?Sized>(v: &mut V, decl: &'ast Decl) {
    match decl {
        Decl::Func(func) => v.visit_func(func),
        Decl::Gen(g) => v.visit_gen_decl(g),
    }
}

pub fn walk_func<'ast, V: Visitor<'ast> + ?Sized>(v: &mut V, func: &'ast FuncDecl) {
    if let Some(recv) = &func.recv {
        v.visit_field(recv);
    }
    v.visit_ident(&func.name);
    for field in func.params.iter().chain(&func.results) {
        v.visit_field(field);
    }
    v.visit_block(&func.body);
}

pub fn walk_gen_decl<'ast, V: Visitor<'ast> + ?Sized>(v: &mut V, decl: &'ast GenDecl) {
    for spec in &decl.specs {
        match spec {
            Spec::Value(value) => {
                for name in &value.names {
                    v.visit_ident(name);
                }
                if let Some(ty) = &value.ty {
                    v.visit_type(ty);
                }
                for expr in &value.values {
                    v.visit_expr(expr);
                }
            }
            Spec::Type(ty) => {
                v.visit_ident(&ty.name);
                v.visit_type(&ty.ty);
            }
        }
    }
}

pub fn walk_field<'ast, V: Visitor<'ast> + ?Sized>(v: &mut V, field: &'ast Field) {
    for name in &field.names {
        v.visit_ident(name);
    }
    v.visit_type(&field.ty);
}

pub fn walk_type<'ast, V: Visitor<'ast> + ?Sized>(v: &mut V, ty: &'ast TypeExpr) {
    match ty {
        TypeExpr::Named(name) => v.visit_ident(name),
        TypeExpr::Qualified { pkg, sel } => {
            v.visit_ident(pkg);
            v.visit_ident(sel);
        }
        TypeExpr::Pointer(inner) | TypeExpr::Slice(inner) => v.visit_type(inner),
        TypeExpr::Map { key, value } => {
            v.visit_type(key);
            v.visit_type(value);
        }
        TypeExpr::Struct { fields } => {
            for field in fields {
                v.visit_field(field);
            }
        }
    }
}

pub fn walk_block<'ast, V: Visitor<'ast> + ?Sized>(v: &mut V, block: &'ast Block) {
    for stmt in &block.stmts {
        v.visit_stmt(stmt);
    }
}

pub fn walk_stmt<'ast, V: Visitor<'ast> + ?Sized>(v: &mut V, stmt: &'ast Stmt) {
    match stmt {
        Stmt::Expr(expr) => v.visit_expr(expr),
        Stmt::Return { results, .. } => {
            for expr in results {
                v.visit_expr(expr);
            }
        }
        Stmt::Define { lhs, rhs, .. } => {
            for name in lhs {
                v.visit_ident(name);
            }
            for expr in rhs {
                v.visit_expr(expr);
            }
        }
        Stmt::Assign { lhs, rhs, .. } => {
            for expr in lhs.iter().chain(rhs) {
                v.visit_expr(expr);
            }
        }
        Stmt::IncDec { x, .. } => v.visit_expr(x),
        Stmt::Decl(decl) => v.visit_gen_decl(decl),
        Stmt::If {
            init,
            cond,
            then,
            els,
            ..
        } => {
            if let Some(init) = init {
                v.visit_stmt(init);
            }
            v.visit_expr(cond);
            v.visit_block(then);
            if let Some(els) = els {
                v.visit_stmt(els);
            }
        }
        Stmt::For {
            init,
            cond,
            post,
            body,
            ..
        } => {
            if let Some(init) = init {
                v.visit_stmt(init);
            }
            if let Some(cond) = cond {
                v.visit_expr(cond);
            }
            if let Some(post) = post {
                v.visit_stmt(post);
            }
            v.visit_block(body);
        }
        Stmt::Branch { .. } => {}
        Stmt::Block(block) => v.visit_block(block),
    }
}

pub fn walk_expr<'ast, V: Visitor<'ast> + ?Sized>(v: &mut V, expr: &'ast Expr) {
    match expr {
        Expr::Ident(ident) => v.visit_ident(ident),
        Expr::Selector { x, sel, .. } => {
            v.visit_expr(x);
            v.visit_ident(sel);
        }
        Expr::Call { fun, args, .. } => {
            v.visit_expr(fun);
            for arg in args {
                v.visit_expr(arg);
            }
        }
        Expr::Index { x, index, .. } => {
            v.visit_expr(x);
            v.visit_expr(index);
        }
        Expr::Unary { x, .. } | Expr::Paren { x, .. } => v.visit_expr(x),
        Expr::Binary { x, y, .. } => {
            v.visit_expr(x);
            v.visit_expr(y);
        }
        Expr::Lit { .. } => {}
    }
}

// ============================================================================
// Mutable
// ============================================================================

pub trait VisitorMut {
    fn visit_func_mut(&mut self, func: &mut FuncDecl) {
        walk_func_mut(self, func);
    }

    fn visit_gen_decl_mut(&mut self, decl: &mut GenDecl) {
        walk_gen_decl_mut(self, decl);
    }

    fn visit_field_mut(&mut self, field: &mut Field) {
        walk_field_mut(self, field);
    }

    fn visit_type_mut(&mut self, ty: &mut TypeExpr) {
        walk_type_mut(self, ty);
    }

    fn visit_block_mut(&mut self, block: &mut Block) {
        walk_block_mut(self, block);
    }

    fn visit_stmt_mut(&mut self, stmt: &mut Stmt) {
        walk_stmt_mut(self, stmt);
    }

    fn visit_expr_mut(&mut self, expr: &mut Expr) {
        walk_expr_mut(self, expr);
    }

    fn visit_ident_mut(&mut self, _ident: &mut Ident) {}

    fn visit_comment_mut(&mut self, _group: &mut CommentGroup) {}
}

pub fn walk_decl_mut<V: VisitorMut + ?Sized>(v: &mut V, decl: &mut Decl) {
    match decl {
        Decl::Func(func) => v.visit_func_mut(func),
        Decl::Gen(g) => v.visit_gen_decl_mut(g),
    }
}

pub fn walk_func_mut<V: VisitorMut + ?Sized>(v: &mut V, func: &mut FuncDecl) {
    if let Some(doc) = &mut func.doc {
        v.visit_comment_mut(doc);
    }
    if let Some(recv) = &mut func.recv {
        v.visit_field_mut(recv);
    }
    v.visit_ident_mut(&mut func.name);
    for field in func.params.iter_mut().chain(func.results.iter_mut()) {
        v.visit_field_mut(field);
    }
    v.visit_block_mut(&mut func.body);
}

pub fn walk_gen_decl_mut<V: VisitorMut + ?Sized>(v: &mut V, decl: &mut GenDecl) {
    if let Some(doc) = &mut decl.doc {
        v.visit_comment_mut(doc);
    }
    for spec in &mut decl.specs {
        match spec {
            Spec::Value(value) => {
                for name in &mut value.names {
                    v.visit_ident_mut(name);
                }
                if let Some(ty) = &mut value.ty {
                    v.visit_type_mut(ty);
                }
                for expr in &mut value.values {
                    v.visit_expr_mut(expr);
                }
            }
            Spec::Type(ty) => {
                v.visit_ident_mut(&mut ty.name);
                v.visit_type_mut(&mut ty.ty);
            }
        }
    }
}

pub fn walk_field_mut<V: VisitorMut + ?Sized>(v: &mut V, field: &mut Field) {
    for name in &mut field.names {
        v.visit_ident_mut(name);
    }
    v.visit_type_mut(&mut field.ty);
}

pub fn walk_type_mut<V: VisitorMut + ?Sized>(v: &mut V, ty: &mut TypeExpr) {
    match ty {
        TypeExpr::Named(name) => v.visit_ident_mut(name),
        TypeExpr::Qualified { pkg, sel } => {
            v.visit_ident_mut(pkg);
            v.visit_ident_mut(sel);
        }
        TypeExpr::Pointer(inner) | TypeExpr::Slice(inner) => v.visit_type_mut(inner),
        TypeExpr::Map { key, value } => {
            v.visit_type_mut(key);
            v.visit_type_mut(value);
        }
        TypeExpr::Struct { fields } => {
            for field in fields {
                v.visit_field_mut(field);
            }
        }
    }
}

pub fn walk_block_mut<V: VisitorMut + ?Sized>(v: &mut V, block: &mut Block) {
    for stmt in &mut block.stmts {
        v.visit_stmt_mut(stmt);
    }
}

pub fn walk_stmt_mut<V: VisitorMut + ?Sized>(v: &mut V, stmt: &mut Stmt) {
    match stmt {
        Stmt::Expr(expr) => v.visit_expr_mut(expr),
        Stmt::Return { results, .. } => {
            for expr in results {
                v.visit_expr_mut(expr);
            }
        }
        Stmt::Define { lhs, rhs, .. } => {
            for name in lhs {
                v.visit_ident_mut(name);
            }
            for expr in rhs {
                v.visit_expr_mut(expr);
            }
        }
        Stmt::Assign { lhs, rhs, .. } => {
            for expr in lhs.iter_mut().chain(rhs.iter_mut()) {
                v.visit_expr_mut(expr);
            }
        }
        Stmt::IncDec { x, .. } => v.visit_expr_mut(x),
        Stmt::Decl(decl) => v.visit_gen_decl_mut(decl),
        Stmt::If {
            init,
            cond,
            then,
            els,
            ..
        } => {
            if let Some(init) = init {
                v.visit_stmt_mut(init);
            }
            v.visit_expr_mut(cond);
            v.visit_block_mut(then);
            if let Some(els) = els {
                v.visit_stmt_mut(els);
            }
        }
        Stmt::For {
            init,
            cond,
            post,
            body,
            ..
        } => {
            if let Some(init) = init {
                v.visit_stmt_mut(init);
            }
            if let Some(cond) = cond {
                v.visit_expr_mut(cond);
            }
            if let Some(post) = post {
                v.visit_stmt_mut(post);
            }
            v.visit_block_mut(body);
        }
        Stmt::Branch { .. } => {}
        Stmt::Block(block) => v.visit_block_mut(block),
    }
}

pub fn walk_expr_mut<V: VisitorMut + ?Sized>(v: &mut V, expr: &mut Expr) {
    match expr {
        Expr::Ident(ident) => v.visit_ident_mut(ident),
        Expr::Selector { x, sel, .. } => {
            v.visit_expr_mut(x);
            v.visit_ident_mut(sel);
        }
        Expr::Call { fun, args, .. } => {
            v.visit_expr_mut(fun);
            for arg in args {
                v.visit_expr_mut(arg);
            }
        }
        Expr::Index { x, index, .. } => {
            v.visit_expr_mut(x);
            v.visit_expr_mut(index);
        }
        Expr::Unary { x, .. } | Expr::Paren { x, .. } => v.visit_expr_mut(x),
        Expr::Binary { x, y, .. } => {
            v.visit_expr_mut(x);
            v.visit_expr_mut(y);
        }
        Expr::Lit { .. } => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::NodeIdGen;
    use crate::parser::parse_file;

    #[derive(Default)]
    struct IdentCollector(Vec<String>);

    impl<'ast> Visitor<'ast> for IdentCollector {
        fn visit_ident(&mut self, ident: &'ast Ident) {
            self.0.push(ident.name.clone());
        }
    }

    struct Upper;

    impl VisitorMut for Upper {
        fn visit_ident_mut(&mut self, ident: &mut Ident) {
            ident.name = ident.name.to_uppercase();
        }
    }

    const SRC: &str = "package a\n\nfunc f(x int) int {\n\tif y := g(x); y > 0 {\n\t\treturn m.h(y)\n\t}\n\treturn x\n}\n";

    #[test]
    fn visits_identifiers_in_source_order() {
        let file = parse_file("a.go", SRC, &mut NodeIdGen::new()).unwrap();
        let mut collector = IdentCollector::default();
        walk_file(&mut collector, &file);
        assert_eq!(
            collector.0,
            vec!["a", "f", "x", "int", "int", "y", "g", "x", "y", "m", "h", "y", "x"]
        );
    }

    #[test]
    fn mutable_walk_reaches_every_identifier() {
        let mut file = parse_file("a.go", SRC, &mut NodeIdGen::new()).unwrap();
        for decl in &mut file.decls {
            walk_decl_mut(&mut Upper, decl);
        }
        let mut collector = IdentCollector::default();
        for decl in &file.decls {
            collector.visit_decl(decl);
        }
        assert!(collector.0.iter().all(|n| n == &n.to_uppercase()));
        assert_eq!(collector.0.len(), 12);
    }
}
