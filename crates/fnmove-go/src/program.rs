//! Arena-indexed program model.
//!
//! A [`Program`] owns every package, compilation unit and symbol by index.
//! Units refer to their package by [`PackageId`]; symbols record their
//! package and unit by id. Nothing holds a back-pointer, so a program can
//! be cloned as a whole and restored after a failed operation.
//!
//! Resolution is stored in two tables keyed by identifier [`NodeId`]:
//! `defs` for declaring identifiers and `uses` for referring ones. Symbol
//! identity is the [`SymbolId`], never the name, so renaming a symbol does
//! not change what its references resolve to.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use fnmove_core::types::Span;
use serde::Serialize;

use crate::ast::{Decl, Expr, FuncDecl, ImportName, ImportSpec, NodeId, NodeIdGen, SourceFile};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct PackageId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct UnitId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SymbolId(pub usize);

/// What a symbol denotes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SymbolKind {
    Func,
    Method,
    Var,
    Const,
    Type,
    /// Parameter, result or block-scoped variable.
    Local,
    /// Name bound by an import in one unit.
    PkgName { path: String },
    /// Predeclared identifier.
    Builtin,
}

/// Resolved identity of a declared name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
    pub package: Option<PackageId>,
    pub unit: Option<UnitId>,
}

impl Symbol {
    /// Whether the symbol is a package-level declaration.
    pub fn is_top_level(&self) -> bool {
        matches!(
            self.kind,
            SymbolKind::Func | SymbolKind::Var | SymbolKind::Const | SymbolKind::Type
        )
    }
}

/// Directory of units sharing one package clause.
#[derive(Debug, Clone)]
pub struct Package {
    pub name: String,
    pub import_path: String,
    /// Directory relative to the program root.
    pub dir: PathBuf,
    pub units: Vec<UnitId>,
    /// Top-level names of all units.
    pub scope: BTreeMap<String, SymbolId>,
}

/// One source file.
#[derive(Debug, Clone)]
pub struct CompilationUnit {
    /// Filesystem path.
    pub path: PathBuf,
    /// Path relative to the program root with `/` separators.
    pub rel_path: String,
    pub package: PackageId,
    /// Text every span in `file` indexes into. Starts out as the loaded
    /// file; relocation appends the text of moved declarations.
    pub source: String,
    /// File contents as last loaded or committed.
    pub contents: String,
    pub file: SourceFile,
    /// Names bound by this unit's imports.
    pub imports: BTreeMap<String, SymbolId>,
}

impl CompilationUnit {
    /// Index of the top-level function named `name`, methods included.
    pub fn find_func(&self, name: &str) -> Option<usize> {
        self.file
            .decls
            .iter()
            .position(|d| matches!(d, Decl::Func(f) if f.name.name == name))
    }

    pub fn func(&self, index: usize) -> Option<&FuncDecl> {
        match self.file.decls.get(index) {
            Some(Decl::Func(f)) => Some(f),
            _ => None,
        }
    }

    /// Import spec for `path`, if any.
    pub fn import_for_path(&self, path: &str) -> Option<&ImportSpec> {
        self.file.imports.iter().find(|i| i.path == path)
    }
}

/// A fully loaded and resolved program.
#[derive(Debug, Clone)]
pub struct Program {
    pub root: PathBuf,
    /// Module path from `go.mod`.
    pub module: String,
    pub packages: Vec<Package>,
    pub units: Vec<CompilationUnit>,
    pub symbols: Vec<Symbol>,
    pub universe: BTreeMap<String, SymbolId>,
    defs: HashMap<NodeId, SymbolId>,
    uses: HashMap<NodeId, SymbolId>,
    ids: NodeIdGen,
}

impl Program {
    pub fn new(root: impl Into<PathBuf>, module: impl Into<String>, ids: NodeIdGen) -> Self {
        Program {
            root: root.into(),
            module: module.into(),
            packages: Vec::new(),
            units: Vec::new(),
            symbols: Vec::new(),
            universe: BTreeMap::new(),
            defs: HashMap::new(),
            uses: HashMap::new(),
            ids,
        }
    }

    // ------------------------------------------------------------------
    // Arena access
    // ------------------------------------------------------------------

    pub fn package(&self, id: PackageId) -> &Package {
        &self.packages[id.0]
    }

    pub fn package_mut(&mut self, id: PackageId) -> &mut Package {
        &mut self.packages[id.0]
    }

    pub fn unit(&self, id: UnitId) -> &CompilationUnit {
        &self.units[id.0]
    }

    pub fn unit_mut(&mut self, id: UnitId) -> &mut CompilationUnit {
        &mut self.units[id.0]
    }

    pub fn symbol(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id.0]
    }

    pub fn symbol_mut(&mut self, id: SymbolId) -> &mut Symbol {
        &mut self.symbols[id.0]
    }

    pub fn unit_ids(&self) -> impl Iterator<Item = UnitId> {
        (0..self.units.len()).map(UnitId)
    }

    pub fn package_ids(&self) -> impl Iterator<Item = PackageId> {
        (0..self.packages.len()).map(PackageId)
    }

    pub fn add_package(&mut self, package: Package) -> PackageId {
        self.packages.push(package);
        PackageId(self.packages.len() - 1)
    }

    pub fn add_unit(&mut self, unit: CompilationUnit) -> UnitId {
        let package = unit.package;
        self.units.push(unit);
        let id = UnitId(self.units.len() - 1);
        self.packages[package.0].units.push(id);
        id
    }

    pub fn add_symbol(&mut self, symbol: Symbol) -> SymbolId {
        self.symbols.push(symbol);
        SymbolId(self.symbols.len() - 1)
    }

    pub fn fresh_node_id(&mut self) -> NodeId {
        self.ids.fresh()
    }

    // ------------------------------------------------------------------
    // Lookup
    // ------------------------------------------------------------------

    /// Packages with the given name, in load order.
    pub fn packages_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = PackageId> + 'a {
        self.package_ids()
            .filter(move |id| self.package(*id).name == name)
    }

    pub fn package_by_import_path(&self, path: &str) -> Option<PackageId> {
        self.package_ids()
            .find(|id| self.package(*id).import_path == path)
    }

    /// Unit at `path`, given absolute or relative to the root.
    pub fn unit_by_path(&self, path: &Path) -> Option<UnitId> {
        let joined = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        };
        let rel = path
            .to_string_lossy()
            .replace('\\', "/")
            .trim_start_matches("./")
            .to_string();
        self.unit_ids().find(|id| {
            let unit = self.unit(*id);
            unit.path == joined || unit.rel_path == rel
        })
    }

    pub fn unit_package(&self, unit: UnitId) -> PackageId {
        self.unit(unit).package
    }

    // ------------------------------------------------------------------
    // Resolution tables
    // ------------------------------------------------------------------

    pub fn define(&mut self, node: NodeId, symbol: SymbolId) {
        self.defs.insert(node, symbol);
    }

    pub fn record_use(&mut self, node: NodeId, symbol: SymbolId) {
        self.uses.insert(node, symbol);
    }

    pub fn forget_use(&mut self, node: NodeId) {
        self.uses.remove(&node);
    }

    pub fn def_of(&self, node: NodeId) -> Option<SymbolId> {
        self.defs.get(&node).copied()
    }

    pub fn use_of(&self, node: NodeId) -> Option<SymbolId> {
        self.uses.get(&node).copied()
    }

    /// Symbol a call expression's callee resolves to.
    ///
    /// A bare callee resolves through its identifier, a qualified callee
    /// through its selected identifier and a parenthesized callee through
    /// its inner expression.
    pub fn resolve(&self, call: &Expr) -> Option<SymbolId> {
        match call {
            Expr::Call { fun, .. } => self.resolve_callee(fun),
            _ => None,
        }
    }

    /// Symbol a callee or value expression refers to.
    pub fn resolve_callee(&self, expr: &Expr) -> Option<SymbolId> {
        match expr.unparen() {
            Expr::Ident(ident) => self.use_of(ident.id),
            Expr::Selector { sel, .. } => self.use_of(sel.id),
            _ => None,
        }
    }

    /// Name an import binds in its unit, if usable as a qualifier.
    pub fn import_binding(&self, spec: &ImportSpec) -> Option<String> {
        let package_name = self
            .package_by_import_path(&spec.path)
            .map(|id| self.package(id).name.as_str());
        spec.binding(package_name)
    }

    // ------------------------------------------------------------------
    // Import mutation
    // ------------------------------------------------------------------

    /// Add an import to `unit` and bind its name. Returns the bound name.
    pub fn add_import(&mut self, unit: UnitId, name: ImportName, path: &str) -> Option<String> {
        let anchor = self.unit(unit).file.package.span.end;
        let spec = ImportSpec::new(name, path, Span::new(anchor, anchor));
        let binding = self.import_binding(&spec);
        let package = self.unit(unit).package;

        if let Some(binding) = &binding {
            let symbol = self.add_symbol(Symbol {
                name: binding.clone(),
                kind: SymbolKind::PkgName {
                    path: path.to_string(),
                },
                package: Some(package),
                unit: Some(unit),
            });
            self.unit_mut(unit).imports.insert(binding.clone(), symbol);
        }
        self.unit_mut(unit).file.imports.push(spec);
        binding
    }

    /// Remove `unit`'s import at `index` and unbind its name.
    pub fn remove_import(&mut self, unit: UnitId, index: usize) -> ImportSpec {
        let spec = self.unit_mut(unit).file.imports.remove(index);
        if let Some(binding) = self.import_binding(&spec) {
            let bound_here = self
                .unit(unit)
                .imports
                .get(&binding)
                .map(|sym| self.symbol(*sym).kind == SymbolKind::PkgName { path: spec.path.clone() })
                .unwrap_or(false);
            if bound_here {
                self.unit_mut(unit).imports.remove(&binding);
            }
        }
        spec
    }

    /// The symbol `unit` binds for an import of `path`.
    pub fn pkg_name_symbol(&self, unit: UnitId, path: &str) -> Option<SymbolId> {
        self.unit(unit).imports.values().copied().find(|sym| {
            matches!(&self.symbol(*sym).kind, SymbolKind::PkgName { path: p } if p == path)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::program_from;

    #[test]
    fn resolve_follows_bare_qualified_and_paren_callees() {
        let program = program_from(&[
            ("go.mod", "module example.com/demo\n"),
            (
                "mathutil/ops.go",
                "package mathutil\n\nfunc sum(a, b int) int {\n\treturn a + b\n}\n\nfunc twice(a int) int {\n\treturn (sum)(a, a) + sum(a, 0)\n}\n",
            ),
        ]);
        let unit = program.unit_by_path(Path::new("mathutil/ops.go")).unwrap();
        let sum = program.package(program.unit_package(unit)).scope["sum"];

        let Decl::Func(twice) = &program.unit(unit).file.decls[1] else {
            panic!("expected twice");
        };
        let crate::ast::Stmt::Return { results, .. } = &twice.body.stmts[0] else {
            panic!("expected return");
        };
        let Expr::Binary { x, y, .. } = &results[0] else {
            panic!("expected binary");
        };
        assert_eq!(program.resolve(x), Some(sum));
        assert_eq!(program.resolve(y), Some(sum));
    }

    #[test]
    fn unit_lookup_accepts_relative_and_absolute_paths() {
        let program = program_from(&[("a/a.go", "package a\n")]);
        let rel = program.unit_by_path(Path::new("a/a.go"));
        let dotted = program.unit_by_path(Path::new("./a/a.go"));
        let abs = program.unit_by_path(&program.root.join("a/a.go"));
        assert!(rel.is_some());
        assert_eq!(rel, dotted);
        assert_eq!(rel, abs);
        assert!(program.unit_by_path(Path::new("missing.go")).is_none());
    }

    #[test]
    fn add_and_remove_import_updates_bindings() {
        let mut program = program_from(&[
            ("go.mod", "module example.com/demo\n"),
            ("lib/lib.go", "package util\n"),
            ("app/main.go", "package main\n"),
        ]);
        let unit = program.unit_by_path(Path::new("app/main.go")).unwrap();

        let bound = program.add_import(unit, ImportName::Default, "example.com/demo/lib");
        assert_eq!(bound.as_deref(), Some("util"));
        assert!(program.pkg_name_symbol(unit, "example.com/demo/lib").is_some());

        let removed = program.remove_import(unit, 0);
        assert_eq!(removed.path, "example.com/demo/lib");
        assert!(program.unit(unit).imports.is_empty());
    }
}
