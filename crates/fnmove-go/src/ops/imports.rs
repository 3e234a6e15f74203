//! Import usage, transplantation and pruning.
//!
//! Usage is textual: an import is used by a declaration when some
//! qualified expression or type in it names the import's bound name.
//! Anonymous and wildcard imports bind no name and always count as used.

use std::collections::BTreeSet;

use tracing::debug;

use crate::ast::{Decl, Expr, ImportName, ImportSpec, SourceFile, TypeExpr};
use crate::program::{Program, UnitId};
use crate::visit::{walk_expr, walk_file, walk_type, Visitor};

/// Names used as qualifiers anywhere under the visited nodes.
#[derive(Default)]
struct Qualifiers {
    names: BTreeSet<String>,
}

impl<'ast> Visitor<'ast> for Qualifiers {
    fn visit_expr(&mut self, expr: &'ast Expr) {
        if let Expr::Selector { x, .. } = expr {
            if let Expr::Ident(q) = x.unparen() {
                self.names.insert(q.name.clone());
            }
        }
        walk_expr(self, expr);
    }

    fn visit_type(&mut self, ty: &'ast TypeExpr) {
        if let TypeExpr::Qualified { pkg, .. } = ty {
            self.names.insert(pkg.name.clone());
        }
        walk_type(self, ty);
    }
}

/// Qualifier names used in `decl`.
pub fn decl_qualifiers(decl: &Decl) -> BTreeSet<String> {
    let mut q = Qualifiers::default();
    q.visit_decl(decl);
    q.names
}

/// Qualifier names used anywhere in `file`.
pub fn file_qualifiers(file: &SourceFile) -> BTreeSet<String> {
    let mut q = Qualifiers::default();
    walk_file(&mut q, file);
    q.names
}

/// Imports of `unit` that `decl` uses.
pub fn used_imports(program: &Program, unit: UnitId, decl: &Decl) -> Vec<ImportSpec> {
    let qualifiers = decl_qualifiers(decl);
    program
        .unit(unit)
        .file
        .imports
        .iter()
        .filter(|spec| match program.import_binding(spec) {
            Some(name) => qualifiers.contains(&name),
            None => true,
        })
        .cloned()
        .collect()
}

/// Outcome of transplanting one import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transplant {
    /// A new import was added.
    Added,
    /// An anonymous import of the same path was given a usable name.
    Upgraded,
    /// The unit already imports the path.
    Present,
}

/// Ensure `unit` imports `spec.path` under a name the moved code can use.
pub fn transplant(program: &mut Program, unit: UnitId, spec: &ImportSpec) -> Transplant {
    let existing = program
        .unit(unit)
        .file
        .imports
        .iter()
        .position(|i| i.path == spec.path);
    match existing {
        Some(index) => {
            let current = &program.unit(unit).file.imports[index];
            if current.name == ImportName::Blank && spec.name != ImportName::Blank {
                program.remove_import(unit, index);
                program.add_import(unit, spec.name.clone(), &spec.path);
                debug!(path = %spec.path, "upgraded anonymous import");
                Transplant::Upgraded
            } else {
                Transplant::Present
            }
        }
        None => {
            program.add_import(unit, spec.name.clone(), &spec.path);
            debug!(path = %spec.path, unit = %program.unit(unit).rel_path, "transplanted import");
            Transplant::Added
        }
    }
}

/// Remove imports of `paths` from `unit` that nothing qualifies any more.
/// Anonymous and wildcard imports are kept. Returns the removed paths.
pub fn prune(program: &mut Program, unit: UnitId, paths: &BTreeSet<String>) -> Vec<String> {
    let used = file_qualifiers(&program.unit(unit).file);
    let mut removed = Vec::new();
    let mut index = 0;
    while index < program.unit(unit).file.imports.len() {
        let spec = &program.unit(unit).file.imports[index];
        let candidate = paths.contains(&spec.path);
        let unused = match program.import_binding(spec) {
            Some(name) => !used.contains(&name),
            None => false,
        };
        if candidate && unused {
            let spec = program.remove_import(unit, index);
            debug!(path = %spec.path, unit = %program.unit(unit).rel_path, "pruned import");
            removed.push(spec.path);
        } else {
            index += 1;
        }
    }
    removed
}
