//! The relocation mutation sequence.
//!
//! [`Relocator::run`] detaches the declaration from its unit, renames it
//! when it crosses packages, appends it to the destination unit and then
//! rewrites every reference. All of it happens on the in-memory program;
//! rendering and committing are left to the caller.

use std::collections::{BTreeMap, BTreeSet};

use fnmove_core::error::{FnMoveError, FnMoveResult};
use fnmove_core::types::Span;
use regex::{NoExpand, Regex};
use tracing::{debug, info, warn};

use crate::ast::{
    is_exported, Block, CommentGroup, Decl, Expr, FuncDecl, GenDecl, Ident, ImportName,
    ImportSpec, NodeId, Spec, Stmt, TypeExpr,
};
use crate::ops::imports::{prune, transplant, used_imports, Transplant};
use crate::ops::locate::Located;
use crate::ops::references::Reference;
use crate::ops::scope::{visible_locals, visible_locals_any};
use crate::program::{PackageId, Program, SymbolId, SymbolKind, UnitId};
use crate::visit::{
    walk_block_mut, walk_decl, walk_decl_mut, walk_expr, walk_expr_mut, walk_func_mut,
    walk_gen_decl_mut, walk_stmt_mut, walk_type, walk_type_mut, Visitor, VisitorMut,
};

/// The name a function gets when it must be visible outside its package.
pub fn export_name(name: &str) -> FnMoveResult<String> {
    let mut chars = name.chars();
    let not_exportable = || FnMoveError::NotExportable {
        name: name.to_string(),
    };
    let first = chars.next().ok_or_else(not_exportable)?;
    if first.is_uppercase() {
        return Ok(name.to_string());
    }
    let upper: String = first.to_uppercase().collect();
    if upper.chars().eq(std::iter::once(first)) || !upper.chars().all(char::is_uppercase) {
        return Err(not_exportable());
    }
    Ok(upper + chars.as_str())
}

/// What a relocation changed.
#[derive(Debug, Clone, Default)]
pub struct Relocation {
    pub renamed_to: Option<String>,
    /// Units whose trees were mutated.
    pub touched: BTreeSet<UnitId>,
    pub references_rewritten: usize,
    /// `unit: path` entries.
    pub imports_added: Vec<String>,
    pub imports_removed: Vec<String>,
    pub warnings: Vec<String>,
}

/// Moves one located function into a destination unit.
pub struct Relocator<'p> {
    program: &'p mut Program,
    located: Located,
    dest: UnitId,
    dest_package: PackageId,
    new_name: String,
    /// Per unit, import paths that may have lost their last use.
    prune_candidates: BTreeMap<UnitId, BTreeSet<String>>,
    relocation: Relocation,
}

impl<'p> Relocator<'p> {
    pub fn new(
        program: &'p mut Program,
        located: Located,
        dest: UnitId,
        new_name: impl Into<String>,
    ) -> Self {
        let dest_package = program.unit_package(dest);
        Relocator {
            program,
            located,
            dest,
            dest_package,
            new_name: new_name.into(),
            prune_candidates: BTreeMap::new(),
            relocation: Relocation::default(),
        }
    }

    /// Perform the move and rewrite `references`, which must have been
    /// collected from the unmutated program.
    pub fn run(mut self, references: &[Reference]) -> FnMoveResult<Relocation> {
        let source = self.located.unit;
        let symbol = self.located.symbol;
        let cross = self.located.package != self.dest_package;

        let decl_span = self
            .program
            .unit(source)
            .file
            .decls
            .get(self.located.index)
            .map(Decl::span)
            .ok_or_else(|| FnMoveError::internal("located declaration index out of range"))?;
        let used = used_imports(
            self.program,
            source,
            &self.program.unit(source).file.decls[self.located.index],
        );
        let dependencies = if cross {
            self.source_dependencies()
        } else {
            Vec::new()
        };
        let body_locals = visible_locals_any(
            self.program,
            source,
            dependencies.iter().map(|(ident, _)| *ident),
        );
        let visible: Vec<BTreeSet<String>> = references
            .iter()
            .map(|r| visible_locals(self.program, r.unit, r.target))
            .collect();

        let (mut decl, comments, text) = self.detach(decl_span);
        self.rename(&mut decl)?;
        let comments = self.rebase(&mut decl, comments, decl_span, &text);
        self.claim_symbols(&decl);
        self.transplant_imports(&used);
        self.rebind_qualifiers(&mut decl);
        if cross {
            self.qualify_dependencies(&mut decl, &dependencies, &body_locals)?;
        }

        let dest = self.program.unit_mut(self.dest);
        dest.file.decls.push(decl);
        dest.file.comments.extend(comments);
        self.relocation.touched.insert(source);
        self.relocation.touched.insert(self.dest);
        info!(
            function = %self.program.symbol(symbol).name,
            from = %self.program.unit(source).rel_path,
            to = %self.program.unit(self.dest).rel_path,
            "declaration moved"
        );

        for (reference, visible) in references.iter().zip(&visible) {
            let in_moved = reference.unit == source && decl_span.contains(&reference.span);
            let unit = if in_moved { self.dest } else { reference.unit };
            self.rewrite_reference(unit, reference, visible)?;
        }

        let candidates = std::mem::take(&mut self.prune_candidates);
        for (unit, paths) in candidates {
            for path in prune(self.program, unit, &paths) {
                self.relocation
                    .imports_removed
                    .push(format!("{}: {}", self.program.unit(unit).rel_path, path));
            }
        }
        Ok(self.relocation)
    }

    // ------------------------------------------------------------------
    // Declaration
    // ------------------------------------------------------------------

    /// Remove the declaration, the comment groups inside it and its text.
    fn detach(&mut self, span: Span) -> (Decl, Vec<CommentGroup>, String) {
        let unit = self.program.unit_mut(self.located.unit);
        let decl = unit.file.decls.remove(self.located.index);
        let (moved, kept): (Vec<CommentGroup>, Vec<CommentGroup>) = unit
            .file
            .comments
            .drain(..)
            .partition(|group| span.contains(&group.span));
        unit.file.comments = kept;
        let text = unit
            .source
            .get(span.start..span.end)
            .unwrap_or_default()
            .to_string();
        debug!(comments = moved.len(), "detached declaration");
        (decl, moved, text)
    }

    fn rename(&mut self, decl: &mut Decl) -> FnMoveResult<()> {
        let symbol = self.located.symbol;
        let old = self.program.symbol(symbol).name.clone();
        if old == self.new_name {
            return Ok(());
        }
        let Decl::Func(func) = decl else {
            return Err(FnMoveError::internal("relocated declaration is not a function"));
        };
        func.name.name = self.new_name.clone();
        self.program.symbol_mut(symbol).name = self.new_name.clone();

        if let Some(doc) = &mut func.doc {
            let mention = Regex::new(&format!(r"\b{}\b", regex::escape(&old)))
                .map_err(|e| FnMoveError::internal(e.to_string()))?;
            for line in &mut doc.lines {
                *line = mention
                    .replace_all(line, NoExpand(&self.new_name))
                    .into_owned();
            }
        }
        debug!(from = %old, to = %self.new_name, "renamed for export");
        self.relocation.renamed_to = Some(self.new_name.clone());
        Ok(())
    }

    /// Append the declaration's text to the destination's source and shift
    /// every span so it indexes into the appended copy.
    fn rebase(
        &mut self,
        decl: &mut Decl,
        mut comments: Vec<CommentGroup>,
        span: Span,
        text: &str,
    ) -> Vec<CommentGroup> {
        let dest = self.program.unit_mut(self.dest);
        dest.source.push_str("\n\n");
        let base = dest.source.len();
        dest.source.push_str(text);
        dest.file.end = dest.source.len();

        let delta = base as isize - span.start as isize;
        let mut rebase = Rebase { delta };
        walk_decl_mut(&mut rebase, decl);
        for group in &mut comments {
            rebase.visit_comment_mut(group);
        }
        comments
    }

    /// Move every symbol declared inside `decl` to the destination.
    fn claim_symbols(&mut self, decl: &Decl) {
        let mut idents = IdentIds::default();
        walk_decl(&mut idents, decl);
        for id in idents.ids {
            if let Some(symbol) = self.program.def_of(id) {
                let symbol = self.program.symbol_mut(symbol);
                symbol.unit = Some(self.dest);
                symbol.package = Some(self.dest_package);
            }
        }

        let symbol = self.located.symbol;
        let old_scope = &mut self.program.package_mut(self.located.package).scope;
        old_scope.retain(|_, s| *s != symbol);
        let name = self.new_name.clone();
        self.program
            .package_mut(self.dest_package)
            .scope
            .insert(name, symbol);
    }

    // ------------------------------------------------------------------
    // Imports of the moved body
    // ------------------------------------------------------------------

    fn transplant_imports(&mut self, used: &[ImportSpec]) {
        let dest_path = self.program.package(self.dest_package).import_path.clone();
        let source = self.located.unit;
        for spec in used {
            self.prune_candidates
                .entry(source)
                .or_default()
                .insert(spec.path.clone());
            if spec.path == dest_path {
                continue;
            }
            if transplant(self.program, self.dest, spec) != Transplant::Present {
                self.relocation.imports_added.push(format!(
                    "{}: {}",
                    self.program.unit(self.dest).rel_path,
                    spec.path
                ));
            }
        }
    }

    /// Point qualifiers in the moved body at the destination's imports.
    /// Qualified uses of the destination package itself become bare.
    fn rebind_qualifiers(&mut self, decl: &mut Decl) {
        let dest_path = self.program.package(self.dest_package).import_path.clone();
        let mut rebind = Rebind {
            program: &mut *self.program,
            dest: self.dest,
            dest_path,
        };
        walk_decl_mut(&mut rebind, decl);
    }

    /// Top-level symbols of the source package used by the declaration.
    fn source_dependencies(&self) -> Vec<(NodeId, SymbolId)> {
        let decl = &self.program.unit(self.located.unit).file.decls[self.located.index];
        let mut deps = Dependencies {
            program: &*self.program,
            package: self.located.package,
            moved: self.located.symbol,
            found: Vec::new(),
        };
        walk_decl(&mut deps, decl);
        deps.found
    }

    /// Qualify exported source-package dependencies, warn about the rest.
    /// `body_locals` are the locals visible where a qualifier is inserted.
    fn qualify_dependencies(
        &mut self,
        decl: &mut Decl,
        dependencies: &[(NodeId, SymbolId)],
        body_locals: &BTreeSet<String>,
    ) -> FnMoveResult<()> {
        let package = self.located.package;
        let package_name = self.program.package(package).name.clone();
        let function = self.new_name.clone();
        let blocked = if package_name == "main" {
            Some("package main can not be imported".to_string())
        } else if self.package_imports(package, self.dest_package) {
            Some("importing it would create a cycle".to_string())
        } else {
            None
        };

        let mut qualify: BTreeSet<NodeId> = BTreeSet::new();
        let mut reported: BTreeSet<SymbolId> = BTreeSet::new();
        for (ident, symbol) in dependencies {
            let name = self.program.symbol(*symbol).name.clone();
            if is_exported(&name) && blocked.is_none() {
                qualify.insert(*ident);
                continue;
            }
            if !reported.insert(*symbol) {
                continue;
            }
            let message = match &blocked {
                Some(reason) if is_exported(&name) => format!(
                    "{function} refers to {name} of package {package_name}, but {reason}"
                ),
                _ => format!("{function} refers to unexported {name} of package {package_name}"),
            };
            warn!("{}", message);
            self.relocation.warnings.push(message);
        }
        if qualify.is_empty() {
            return Ok(());
        }

        let Some((qualifier, pkg_symbol)) = self.ensure_import(self.dest, package, body_locals)?
        else {
            return Ok(());
        };
        let mut qualifiers = Qualify {
            program: &mut *self.program,
            targets: qualify,
            qualifier,
            pkg_symbol,
        };
        walk_decl_mut(&mut qualifiers, decl);
        Ok(())
    }

    // ------------------------------------------------------------------
    // References
    // ------------------------------------------------------------------

    /// Rewrite one reference in `unit`. `visible` holds the locals in scope
    /// at the reference, which the new spelling must not collide with.
    fn rewrite_reference(
        &mut self,
        unit: UnitId,
        reference: &Reference,
        visible: &BTreeSet<String>,
    ) -> FnMoveResult<()> {
        let local = self.program.unit_package(unit) == self.dest_package;
        let qualifier = if local {
            None
        } else {
            let ref_package = self.program.unit_package(unit);
            let dest = self.program.package(self.dest_package);
            let problem = if dest.name == "main" {
                Some("package main can not be imported")
            } else if self.package_imports(self.dest_package, ref_package) {
                Some("this may create an import cycle")
            } else {
                None
            };
            if let Some(problem) = problem {
                let message = format!(
                    "{} now imports {}, but {}",
                    self.program.unit(unit).rel_path,
                    dest.import_path,
                    problem
                );
                warn!("{}", message);
                self.relocation.warnings.push(message);
            }
            self.ensure_import(unit, self.dest_package, visible)?
        };
        if qualifier.is_none() && visible.contains(&self.new_name) {
            return Err(FnMoveError::Collision {
                name: self.new_name.clone(),
                package: self.program.package(self.dest_package).name.clone(),
                path: self.program.unit(unit).rel_path.clone(),
            });
        }
        let qualifier = match qualifier {
            Some((name, symbol)) => {
                let id = self.program.fresh_node_id();
                self.program.record_use(id, symbol);
                Some((id, name))
            }
            None => None,
        };

        let mut replace = Replace {
            target: reference.target,
            name: self.new_name.clone(),
            qualifier,
            old: None,
        };
        for decl in &mut self.program.unit_mut(unit).file.decls {
            walk_decl_mut(&mut replace, decl);
            if replace.old.is_some() {
                break;
            }
        }
        let Some(old) = replace.old else {
            return Err(FnMoveError::internal(format!(
                "reference to {} not found in {}",
                self.new_name,
                self.program.unit(unit).rel_path
            )));
        };

        if let Expr::Selector { x, .. } = &old {
            if let Expr::Ident(q) = x.unparen() {
                if let Some(symbol) = self.program.use_of(q.id) {
                    if let SymbolKind::PkgName { path } = &self.program.symbol(symbol).kind {
                        self.prune_candidates
                            .entry(unit)
                            .or_default()
                            .insert(path.clone());
                    }
                }
                self.program.forget_use(q.id);
            }
        }
        self.relocation.touched.insert(unit);
        self.relocation.references_rewritten += 1;
        Ok(())
    }

    /// Qualifier `unit` uses for `package`, adding or upgrading its import.
    /// `None` means the package is wildcard-imported and needs no qualifier.
    ///
    /// An existing binding is reused unless it is in `avoid`. A new import
    /// is aliased when the package name is taken in the unit.
    fn ensure_import(
        &mut self,
        unit: UnitId,
        package: PackageId,
        avoid: &BTreeSet<String>,
    ) -> FnMoveResult<Option<(String, SymbolId)>> {
        let path = self.program.package(package).import_path.clone();
        let name = self.program.package(package).name.clone();
        let current = &self.program.unit(unit).file.imports;
        if current
            .iter()
            .any(|spec| spec.path == path && spec.name == ImportName::Dot)
        {
            return Ok(None);
        }
        let reusable = current
            .iter()
            .filter(|spec| spec.path == path)
            .filter_map(|spec| self.program.import_binding(spec))
            .find(|binding| !avoid.contains(binding));
        if let Some(binding) = reusable {
            return self.bound(unit, &binding, &path).map(Some);
        }

        let wanted = if self.name_taken(unit, &name, avoid) {
            ImportName::Alias(self.fresh_alias(unit, &name, avoid))
        } else if path.rsplit('/').next() == Some(name.as_str()) {
            ImportName::Default
        } else {
            ImportName::Alias(name.clone())
        };
        let blank = current
            .iter()
            .position(|spec| spec.path == path && spec.name == ImportName::Blank);
        if let Some(index) = blank {
            self.program.remove_import(unit, index);
        }
        let binding = self.program.add_import(unit, wanted, &path).ok_or_else(|| {
            FnMoveError::internal(format!("import of {path} binds no name"))
        })?;
        self.record_added(unit, &path);
        self.bound(unit, &binding, &path).map(Some)
    }

    fn bound(&self, unit: UnitId, binding: &str, path: &str) -> FnMoveResult<(String, SymbolId)> {
        self.program
            .unit(unit)
            .imports
            .get(binding)
            .map(|symbol| (binding.to_string(), *symbol))
            .ok_or_else(|| FnMoveError::internal(format!("import of {path} binds no name")))
    }

    /// Whether `name` can not be bound by a new import of `unit`.
    fn name_taken(&self, unit: UnitId, name: &str, avoid: &BTreeSet<String>) -> bool {
        let package = self.program.unit_package(unit);
        avoid.contains(name)
            || self.program.unit(unit).imports.contains_key(name)
            || self.program.package(package).scope.contains_key(name)
    }

    fn fresh_alias(&self, unit: UnitId, base: &str, avoid: &BTreeSet<String>) -> String {
        (2..)
            .map(|n| format!("{base}{n}"))
            .find(|candidate| !self.name_taken(unit, candidate, avoid))
            .unwrap_or_else(|| base.to_string())
    }

    fn record_added(&mut self, unit: UnitId, path: &str) {
        debug!(unit = %self.program.unit(unit).rel_path, path, "added import");
        self.relocation
            .imports_added
            .push(format!("{}: {}", self.program.unit(unit).rel_path, path));
    }

    /// Whether some unit of `importer` imports `imported`.
    fn package_imports(&self, importer: PackageId, imported: PackageId) -> bool {
        let path = &self.program.package(imported).import_path;
        self.program
            .package(importer)
            .units
            .iter()
            .any(|u| self.program.unit(*u).import_for_path(path).is_some())
    }
}

// ============================================================================
// Visitors
// ============================================================================

/// Shifts every span by `delta`.
struct Rebase {
    delta: isize,
}

impl Rebase {
    fn shift(&self, span: &mut Span) {
        *span = span.shifted(self.delta);
    }
}

impl VisitorMut for Rebase {
    fn visit_func_mut(&mut self, func: &mut FuncDecl) {
        self.shift(&mut func.span);
        walk_func_mut(self, func);
    }

    fn visit_gen_decl_mut(&mut self, decl: &mut GenDecl) {
        self.shift(&mut decl.span);
        for spec in &mut decl.specs {
            match spec {
                Spec::Value(value) => self.shift(&mut value.span),
                Spec::Type(ty) => self.shift(&mut ty.span),
            }
        }
        walk_gen_decl_mut(self, decl);
    }

    fn visit_block_mut(&mut self, block: &mut Block) {
        self.shift(&mut block.span);
        walk_block_mut(self, block);
    }

    fn visit_stmt_mut(&mut self, stmt: &mut Stmt) {
        match stmt {
            Stmt::Return { span, .. }
            | Stmt::Define { span, .. }
            | Stmt::Assign { span, .. }
            | Stmt::IncDec { span, .. }
            | Stmt::If { span, .. }
            | Stmt::For { span, .. }
            | Stmt::Branch { span, .. } => self.shift(span),
            Stmt::Expr(_) | Stmt::Decl(_) | Stmt::Block(_) => {}
        }
        walk_stmt_mut(self, stmt);
    }

    fn visit_expr_mut(&mut self, expr: &mut Expr) {
        match expr {
            Expr::Ident(_) => {}
            Expr::Selector { span, .. }
            | Expr::Call { span, .. }
            | Expr::Index { span, .. }
            | Expr::Unary { span, .. }
            | Expr::Binary { span, .. }
            | Expr::Lit { span, .. }
            | Expr::Paren { span, .. } => self.shift(span),
        }
        walk_expr_mut(self, expr);
    }

    fn visit_ident_mut(&mut self, ident: &mut Ident) {
        self.shift(&mut ident.span);
    }

    fn visit_comment_mut(&mut self, group: &mut CommentGroup) {
        self.shift(&mut group.span);
    }
}

#[derive(Default)]
struct IdentIds {
    ids: Vec<NodeId>,
}

impl<'ast> Visitor<'ast> for IdentIds {
    fn visit_ident(&mut self, ident: &'ast Ident) {
        self.ids.push(ident.id);
    }
}

/// Uses of top-level symbols of `package` other than `moved`.
struct Dependencies<'p> {
    program: &'p Program,
    package: PackageId,
    moved: SymbolId,
    found: Vec<(NodeId, SymbolId)>,
}

impl Dependencies<'_> {
    fn check(&mut self, ident: &Ident) {
        let Some(symbol) = self.program.use_of(ident.id) else {
            return;
        };
        let sym = self.program.symbol(symbol);
        if symbol != self.moved && sym.is_top_level() && sym.package == Some(self.package) {
            self.found.push((ident.id, symbol));
        }
    }
}

impl<'ast> Visitor<'ast> for Dependencies<'_> {
    fn visit_expr(&mut self, expr: &'ast Expr) {
        if let Expr::Ident(ident) = expr {
            self.check(ident);
        }
        walk_expr(self, expr);
    }

    fn visit_type(&mut self, ty: &'ast TypeExpr) {
        if let TypeExpr::Named(ident) = ty {
            self.check(ident);
        }
        walk_type(self, ty);
    }
}

/// Path of the package `ident` names, if it is an import binding.
fn qualifier_path(program: &Program, ident: &Ident) -> Option<String> {
    let symbol = program.use_of(ident.id)?;
    match &program.symbol(symbol).kind {
        SymbolKind::PkgName { path } => Some(path.clone()),
        _ => None,
    }
}

struct Rebind<'p> {
    program: &'p mut Program,
    dest: UnitId,
    dest_path: String,
}

impl Rebind<'_> {
    /// Rebind `qualifier`; returns whether it names the destination package.
    fn rebind(&mut self, qualifier: &mut Ident) -> bool {
        let Some(path) = qualifier_path(self.program, qualifier) else {
            return false;
        };
        if path == self.dest_path {
            self.program.forget_use(qualifier.id);
            return true;
        }
        if let Some(symbol) = self.program.pkg_name_symbol(self.dest, &path) {
            qualifier.name = self.program.symbol(symbol).name.clone();
            self.program.record_use(qualifier.id, symbol);
        }
        false
    }
}

impl VisitorMut for Rebind<'_> {
    fn visit_expr_mut(&mut self, expr: &mut Expr) {
        if let Expr::Selector { x, sel, .. } = expr {
            if let Expr::Ident(qualifier) = x.as_mut() {
                if self.rebind(qualifier) {
                    *expr = Expr::Ident(sel.clone());
                    return;
                }
            }
        }
        walk_expr_mut(self, expr);
    }

    fn visit_type_mut(&mut self, ty: &mut TypeExpr) {
        if let TypeExpr::Qualified { pkg, sel } = ty {
            if self.rebind(pkg) {
                *ty = TypeExpr::Named(sel.clone());
                return;
            }
        }
        walk_type_mut(self, ty);
    }
}

/// Qualifies the identifiers in `targets` with `qualifier`.
struct Qualify<'p> {
    program: &'p mut Program,
    targets: BTreeSet<NodeId>,
    qualifier: String,
    pkg_symbol: SymbolId,
}

impl Qualify<'_> {
    fn qualifier_ident(&mut self, span: Span) -> Ident {
        let id = self.program.fresh_node_id();
        self.program.record_use(id, self.pkg_symbol);
        Ident::new(id, self.qualifier.clone(), Span::new(span.start, span.start))
    }
}

impl VisitorMut for Qualify<'_> {
    fn visit_expr_mut(&mut self, expr: &mut Expr) {
        if let Expr::Ident(ident) = expr {
            if self.targets.contains(&ident.id) {
                let sel = ident.clone();
                let q = self.qualifier_ident(sel.span);
                *expr = Expr::Selector {
                    x: Box::new(Expr::Ident(q)),
                    span: sel.span,
                    sel,
                };
            }
            return;
        }
        walk_expr_mut(self, expr);
    }

    fn visit_type_mut(&mut self, ty: &mut TypeExpr) {
        if let TypeExpr::Named(ident) = ty {
            if self.targets.contains(&ident.id) {
                let sel = ident.clone();
                let pkg = self.qualifier_ident(sel.span);
                *ty = TypeExpr::Qualified { pkg, sel };
            }
            return;
        }
        walk_type_mut(self, ty);
    }
}

/// Replaces the expression naming `target` with a bare or qualified name.
struct Replace {
    target: NodeId,
    name: String,
    qualifier: Option<(NodeId, String)>,
    old: Option<Expr>,
}

impl Replace {
    fn names_target(&self, expr: &Expr) -> bool {
        match expr {
            Expr::Ident(id) => id.id == self.target,
            Expr::Selector { sel, .. } => sel.id == self.target,
            _ => false,
        }
    }
}

impl VisitorMut for Replace {
    fn visit_expr_mut(&mut self, expr: &mut Expr) {
        if self.old.is_some() {
            return;
        }
        if !self.names_target(expr) {
            walk_expr_mut(self, expr);
            return;
        }
        let span = expr.span();
        let sel = Ident::new(self.target, self.name.clone(), span);
        let new = match &self.qualifier {
            Some((id, q)) => Expr::Selector {
                x: Box::new(Expr::Ident(Ident::new(
                    *id,
                    q.clone(),
                    Span::new(span.start, span.start),
                ))),
                sel,
                span,
            },
            None => Expr::Ident(sel),
        };
        self.old = Some(std::mem::replace(expr, new));
    }
}
