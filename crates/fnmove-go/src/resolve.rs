//! Name resolution.
//!
//! Fills the program's `defs` and `uses` tables. Lookup walks scopes from
//! innermost to outermost: block and function scopes, the package scope
//! (top-level names of every unit in the package), the unit's file scope
//! (import bindings, then wildcard imports) and finally the universe.
//! Methods are not entered into the package scope. Identifiers that do not
//! resolve (struct fields, method selectors, unknown packages) are left out
//! of the tables.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::ast::{
    Block, Decl, Expr, Field, GenDecl, GenKind, Ident, ImportName, NodeId, Spec, Stmt, TypeExpr,
};
use crate::program::{PackageId, Program, Symbol, SymbolId, SymbolKind, UnitId};

/// Predeclared identifiers.
const BUILTINS: &[&str] = &[
    "any", "bool", "byte", "comparable", "complex64", "complex128", "error", "float32", "float64",
    "int", "int8", "int16", "int32", "int64", "rune", "string", "uint", "uint8", "uint16",
    "uint32", "uint64", "uintptr", "true", "false", "iota", "nil", "append", "cap", "clear",
    "close", "complex", "copy", "delete", "imag", "len", "make", "max", "min", "new", "panic",
    "print", "println", "real", "recover",
];

/// Resolve every unit of `program`.
pub fn resolve_program(program: &mut Program) {
    declare_universe(program);
    for package in program.package_ids().collect::<Vec<_>>() {
        declare_package(program, package);
    }
    for unit in program.unit_ids().collect::<Vec<_>>() {
        declare_imports(program, unit);
    }
    for unit in program.unit_ids().collect::<Vec<_>>() {
        let resolved = {
            let mut resolver = Resolver::new(program, unit);
            resolver.resolve_unit();
            resolver.finish()
        };
        resolved.apply(program);
    }
}

fn declare_universe(program: &mut Program) {
    for name in BUILTINS {
        let id = program.add_symbol(Symbol {
            name: (*name).to_string(),
            kind: SymbolKind::Builtin,
            package: None,
            unit: None,
        });
        program.universe.insert((*name).to_string(), id);
    }
}

fn declare_package(program: &mut Program, package: PackageId) {
    let units = program.package(package).units.clone();
    for unit in units {
        let mut declared: Vec<(NodeId, String, SymbolKind)> = Vec::new();
        for decl in &program.unit(unit).file.decls {
            match decl {
                Decl::Func(f) => {
                    let kind = if f.recv.is_some() {
                        SymbolKind::Method
                    } else {
                        SymbolKind::Func
                    };
                    declared.push((f.name.id, f.name.name.clone(), kind));
                }
                Decl::Gen(g) => {
                    let kind = match g.kind {
                        GenKind::Var => SymbolKind::Var,
                        GenKind::Const => SymbolKind::Const,
                        GenKind::Type => SymbolKind::Type,
                    };
                    for spec in &g.specs {
                        for name in spec.names() {
                            declared.push((name.id, name.name.clone(), kind.clone()));
                        }
                    }
                }
            }
        }

        for (node, name, kind) in declared {
            let in_scope = kind != SymbolKind::Method && name != "_";
            let symbol = program.add_symbol(Symbol {
                name: name.clone(),
                kind,
                package: Some(package),
                unit: Some(unit),
            });
            program.define(node, symbol);
            if !in_scope {
                continue;
            }
            let pkg = program.package_mut(package);
            if pkg.scope.contains_key(&name) {
                warn!(package = %pkg.name, name = %name, "duplicate top-level declaration");
            } else {
                pkg.scope.insert(name, symbol);
            }
        }
    }
}

fn declare_imports(program: &mut Program, unit: UnitId) {
    let package = program.unit(unit).package;
    let bindings: Vec<(String, String)> = program
        .unit(unit)
        .file
        .imports
        .iter()
        .filter_map(|spec| {
            program
                .import_binding(spec)
                .map(|name| (name, spec.path.clone()))
        })
        .collect();

    for (name, path) in bindings {
        let symbol = program.add_symbol(Symbol {
            name: name.clone(),
            kind: SymbolKind::PkgName { path },
            package: Some(package),
            unit: Some(unit),
        });
        program.unit_mut(unit).imports.insert(name, symbol);
    }
}

/// Resolution results for one unit, applied after the walk.
struct Resolved {
    symbols: Vec<Symbol>,
    defs: Vec<(NodeId, SymbolId)>,
    uses: Vec<(NodeId, SymbolId)>,
}

impl Resolved {
    fn apply(self, program: &mut Program) {
        for symbol in self.symbols {
            program.add_symbol(symbol);
        }
        for (node, symbol) in self.defs {
            program.define(node, symbol);
        }
        for (node, symbol) in self.uses {
            program.record_use(node, symbol);
        }
    }
}

struct Resolver<'p> {
    program: &'p Program,
    unit: UnitId,
    package: PackageId,
    scopes: Vec<HashMap<String, SymbolId>>,
    locals: Vec<Symbol>,
    defs: Vec<(NodeId, SymbolId)>,
    uses: Vec<(NodeId, SymbolId)>,
    unresolved: usize,
}

impl<'p> Resolver<'p> {
    fn new(program: &'p Program, unit: UnitId) -> Self {
        Resolver {
            program,
            unit,
            package: program.unit(unit).package,
            scopes: Vec::new(),
            locals: Vec::new(),
            defs: Vec::new(),
            uses: Vec::new(),
            unresolved: 0,
        }
    }

    fn finish(self) -> Resolved {
        debug!(
            unit = %self.program.unit(self.unit).rel_path,
            uses = self.uses.len(),
            unresolved = self.unresolved,
            "resolved unit"
        );
        Resolved {
            symbols: self.locals,
            defs: self.defs,
            uses: self.uses,
        }
    }

    fn resolve_unit(&mut self) {
        let program = self.program;
        for decl in &program.unit(self.unit).file.decls {
            match decl {
                Decl::Func(f) => {
                    self.scopes.push(HashMap::new());
                    if let Some(recv) = &f.recv {
                        self.declare_field(recv);
                    }
                    for field in f.params.iter().chain(&f.results) {
                        self.declare_field(field);
                    }
                    for stmt in &f.body.stmts {
                        self.resolve_stmt(stmt);
                    }
                    self.scopes.pop();
                }
                Decl::Gen(g) => self.resolve_gen_decl(g, false),
            }
        }
    }

    // ------------------------------------------------------------------
    // Scopes
    // ------------------------------------------------------------------

    fn kind_of(&self, symbol: SymbolId) -> &SymbolKind {
        let base = self.program.symbols.len();
        if symbol.0 < base {
            &self.program.symbol(symbol).kind
        } else {
            &self.locals[symbol.0 - base].kind
        }
    }

    fn declare_local(&mut self, ident: &Ident) {
        if ident.name == "_" {
            return;
        }
        let id = SymbolId(self.program.symbols.len() + self.locals.len());
        self.locals.push(Symbol {
            name: ident.name.clone(),
            kind: SymbolKind::Local,
            package: Some(self.package),
            unit: Some(self.unit),
        });
        self.defs.push((ident.id, id));
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(ident.name.clone(), id);
        }
    }

    fn lookup(&self, name: &str) -> Option<SymbolId> {
        if name == "_" {
            return None;
        }
        for scope in self.scopes.iter().rev() {
            if let Some(id) = scope.get(name) {
                return Some(*id);
            }
        }
        if let Some(id) = self.program.package(self.package).scope.get(name) {
            return Some(*id);
        }
        let unit = self.program.unit(self.unit);
        if let Some(id) = unit.imports.get(name) {
            return Some(*id);
        }
        for spec in &unit.file.imports {
            if spec.name != ImportName::Dot {
                continue;
            }
            let found = self
                .program
                .package_by_import_path(&spec.path)
                .and_then(|pkg| self.program.package(pkg).scope.get(name))
                .filter(|_| crate::ast::is_exported(name));
            if let Some(id) = found {
                return Some(*id);
            }
        }
        self.program.universe.get(name).copied()
    }

    fn resolve_ident(&mut self, ident: &Ident) {
        match self.lookup(&ident.name) {
            Some(symbol) => self.uses.push((ident.id, symbol)),
            None if ident.name == "_" => {}
            None => {
                debug!(name = %ident.name, "unresolved identifier");
                self.unresolved += 1;
            }
        }
    }

    /// Resolve `sel` inside the package `qualifier` names, if it names one.
    fn resolve_qualified(&mut self, qualifier: &Ident, sel: &Ident) {
        let Some(symbol) = self.lookup(&qualifier.name) else {
            return;
        };
        let SymbolKind::PkgName { path } = self.kind_of(symbol) else {
            return;
        };
        let target = self
            .program
            .package_by_import_path(path)
            .and_then(|pkg| self.program.package(pkg).scope.get(&sel.name).copied());
        if let Some(target) = target {
            self.uses.push((sel.id, target));
        }
    }

    // ------------------------------------------------------------------
    // Declarations and types
    // ------------------------------------------------------------------

    fn declare_field(&mut self, field: &Field) {
        self.resolve_type(&field.ty);
        for name in &field.names {
            self.declare_local(name);
        }
    }

    fn resolve_gen_decl(&mut self, decl: &GenDecl, local: bool) {
        for spec in &decl.specs {
            match spec {
                Spec::Value(value) => {
                    if let Some(ty) = &value.ty {
                        self.resolve_type(ty);
                    }
                    for expr in &value.values {
                        self.resolve_expr(expr);
                    }
                    if local {
                        for name in &value.names {
                            self.declare_local(name);
                        }
                    }
                }
                Spec::Type(ty) => {
                    if local {
                        self.declare_local(&ty.name);
                    }
                    self.resolve_type(&ty.ty);
                }
            }
        }
    }

    fn resolve_type(&mut self, ty: &TypeExpr) {
        match ty {
            TypeExpr::Named(name) => self.resolve_ident(name),
            TypeExpr::Qualified { pkg, sel } => {
                self.resolve_ident(pkg);
                self.resolve_qualified(pkg, sel);
            }
            TypeExpr::Pointer(inner) | TypeExpr::Slice(inner) => self.resolve_type(inner),
            TypeExpr::Map { key, value } => {
                self.resolve_type(key);
                self.resolve_type(value);
            }
            TypeExpr::Struct { fields } => {
                for field in fields {
                    self.resolve_type(&field.ty);
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // Statements
    // ------------------------------------------------------------------

    fn resolve_block(&mut self, block: &Block) {
        self.scopes.push(HashMap::new());
        for stmt in &block.stmts {
            self.resolve_stmt(stmt);
        }
        self.scopes.pop();
    }

    fn resolve_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Expr(expr) => self.resolve_expr(expr),
            Stmt::Return { results, .. } => {
                for expr in results {
                    self.resolve_expr(expr);
                }
            }
            Stmt::Define { lhs, rhs, .. } => {
                for expr in rhs {
                    self.resolve_expr(expr);
                }
                for name in lhs {
                    let existing = self
                        .scopes
                        .last()
                        .and_then(|scope| scope.get(&name.name).copied());
                    match existing {
                        Some(symbol) => self.uses.push((name.id, symbol)),
                        None => self.declare_local(name),
                    }
                }
            }
            Stmt::Assign { lhs, rhs, .. } => {
                for expr in lhs.iter().chain(rhs) {
                    self.resolve_expr(expr);
                }
            }
            Stmt::IncDec { x, .. } => self.resolve_expr(x),
            Stmt::Decl(decl) => self.resolve_gen_decl(decl, true),
            Stmt::If {
                init,
                cond,
                then,
                els,
                ..
            } => {
                self.scopes.push(HashMap::new());
                if let Some(init) = init {
                    self.resolve_stmt(init);
                }
                self.resolve_expr(cond);
                self.resolve_block(then);
                if let Some(els) = els {
                    self.resolve_stmt(els);
                }
                self.scopes.pop();
            }
            Stmt::For {
                init,
                cond,
                post,
                body,
                ..
            } => {
                self.scopes.push(HashMap::new());
                if let Some(init) = init {
                    self.resolve_stmt(init);
                }
                if let Some(cond) = cond {
                    self.resolve_expr(cond);
                }
                if let Some(post) = post {
                    self.resolve_stmt(post);
                }
                self.resolve_block(body);
                self.scopes.pop();
            }
            Stmt::Branch { .. } => {}
            Stmt::Block(block) => self.resolve_block(block),
        }
    }

    // ------------------------------------------------------------------
    // Expressions
    // ------------------------------------------------------------------

    fn resolve_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Ident(ident) => self.resolve_ident(ident),
            Expr::Selector { x, sel, .. } => {
                self.resolve_expr(x);
                if let Expr::Ident(qualifier) = x.unparen() {
                    self.resolve_qualified(qualifier, sel);
                }
            }
            Expr::Call { fun, args, .. } => {
                self.resolve_expr(fun);
                for arg in args {
                    self.resolve_expr(arg);
                }
            }
            Expr::Index { x, index, .. } => {
                self.resolve_expr(x);
                self.resolve_expr(index);
            }
            Expr::Unary { x, .. } | Expr::Paren { x, .. } => self.resolve_expr(x),
            Expr::Binary { x, y, .. } => {
                self.resolve_expr(x);
                self.resolve_expr(y);
            }
            Expr::Lit { .. } => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{find_calls, program_from};
    use std::path::Path;

    fn callee_symbol(program: &Program, unit: UnitId, callee: &str) -> Vec<Option<SymbolId>> {
        find_calls(&program.unit(unit).file, callee)
            .into_iter()
            .map(|call| program.resolve(call))
            .collect()
    }

    #[test]
    fn package_scope_spans_units() {
        let program = program_from(&[
            ("p/a.go", "package p\n\nfunc helper() int {\n\treturn 1\n}\n"),
            ("p/b.go", "package p\n\nfunc use() int {\n\treturn helper()\n}\n"),
        ]);
        let a = program.unit_by_path(Path::new("p/a.go")).unwrap();
        let b = program.unit_by_path(Path::new("p/b.go")).unwrap();
        let helper = program.unit(a).func(0).unwrap().name.id;
        assert_eq!(
            callee_symbol(&program, b, "helper"),
            vec![program.def_of(helper)]
        );
    }

    #[test]
    fn local_shadows_package_function() {
        let program = program_from(&[(
            "p/a.go",
            "package p\n\nfunc sum(a, b int) int {\n\treturn a + b\n}\n\nfunc f(sum int) int {\n\treturn sum\n}\n\nfunc g() int {\n\treturn sum(1, 2)\n}\n",
        )]);
        let unit = program.unit_by_path(Path::new("p/a.go")).unwrap();
        let sum = program.package(program.unit_package(unit)).scope["sum"];

        let f = program.unit(unit).func(1).unwrap();
        let Stmt::Return { results, .. } = &f.body.stmts[0] else {
            panic!("expected return");
        };
        let Expr::Ident(param_use) = &results[0] else {
            panic!("expected ident");
        };
        let local = program.use_of(param_use.id).unwrap();
        assert_ne!(local, sum);
        assert_eq!(program.symbol(local).kind, SymbolKind::Local);

        assert_eq!(callee_symbol(&program, unit, "sum"), vec![Some(sum)]);
    }

    #[test]
    fn qualified_calls_resolve_across_packages() {
        let program = program_from(&[
            ("go.mod", "module example.com/m\n"),
            ("mathutil/ops.go", "package mathutil\n\nfunc Sum(a, b int) int {\n\treturn a + b\n}\n"),
            (
                "app/main.go",
                "package main\n\nimport mu \"example.com/m/mathutil\"\n\nfunc main() {\n\tmu.Sum(1, 2)\n}\n",
            ),
        ]);
        let ops = program.unit_by_path(Path::new("mathutil/ops.go")).unwrap();
        let main = program.unit_by_path(Path::new("app/main.go")).unwrap();
        let sum = program.package(program.unit_package(ops)).scope["Sum"];
        assert_eq!(callee_symbol(&program, main, "Sum"), vec![Some(sum)]);
    }

    #[test]
    fn wildcard_import_exposes_exported_names() {
        let program = program_from(&[
            ("go.mod", "module m\n"),
            ("lib/lib.go", "package lib\n\nfunc Exported() {}\n\nfunc hidden() {}\n"),
            (
                "app/main.go",
                "package main\n\nimport . \"m/lib\"\n\nfunc main() {\n\tExported()\n\thidden()\n}\n",
            ),
        ]);
        let main = program.unit_by_path(Path::new("app/main.go")).unwrap();
        assert!(callee_symbol(&program, main, "Exported")[0].is_some());
        assert!(callee_symbol(&program, main, "hidden")[0].is_none());
    }

    #[test]
    fn methods_stay_out_of_package_scope() {
        let program = program_from(&[(
            "p/a.go",
            "package p\n\ntype C struct {\n\tn int\n}\n\nfunc (c *C) Inc() {\n\tc.n++\n}\n",
        )]);
        let unit = program.unit_by_path(Path::new("p/a.go")).unwrap();
        let pkg = program.package(program.unit_package(unit));
        assert!(pkg.scope.contains_key("C"));
        assert!(!pkg.scope.contains_key("Inc"));
    }

    #[test]
    fn redeclaration_in_same_scope_reuses_symbol() {
        let program = program_from(&[(
            "p/a.go",
            "package p\n\nfunc f() int {\n\tx := 1\n\tx, y := 2, 3\n\treturn x + y\n}\n",
        )]);
        let unit = program.unit_by_path(Path::new("p/a.go")).unwrap();
        let f = program.unit(unit).func(0).unwrap();
        let Stmt::Define { lhs: first, .. } = &f.body.stmts[0] else {
            panic!("expected define");
        };
        let Stmt::Define { lhs: second, .. } = &f.body.stmts[1] else {
            panic!("expected define");
        };
        assert_eq!(program.def_of(first[0].id), program.use_of(second[0].id));
        assert!(program.def_of(second[1].id).is_some());
    }
}
