//! Local names visible at a point in a unit.
//!
//! Relocation introduces new spellings (a bare name, or a qualifier) at
//! reference sites. A local declared in an enclosing scope before the site
//! would capture that spelling, so the rewriter asks here first.

use std::collections::BTreeSet;

use crate::ast::{Block, FuncDecl, Ident, NodeId, Stmt};
use crate::program::{Program, SymbolKind, UnitId};
use crate::visit::{walk_block, walk_func, walk_stmt, Visitor};

/// Local names in scope where the identifier `node` of `unit` appears.
///
/// Returns an empty set when `node` is not found. A local counts once its
/// declaring identifier has been passed, so `x := x` treats the right-hand
/// `x` as shadowed.
pub fn visible_locals(program: &Program, unit: UnitId, node: NodeId) -> BTreeSet<String> {
    let mut finder = VisibleAt {
        program,
        target: node,
        scopes: Vec::new(),
        found: None,
    };
    for decl in &program.unit(unit).file.decls {
        finder.visit_decl(decl);
        if let Some(names) = finder.found.take() {
            return names;
        }
    }
    BTreeSet::new()
}

/// Union of [`visible_locals`] over several identifiers of one unit.
pub fn visible_locals_any<I>(program: &Program, unit: UnitId, nodes: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = NodeId>,
{
    nodes
        .into_iter()
        .flat_map(|node| visible_locals(program, unit, node))
        .collect()
}

struct VisibleAt<'p> {
    program: &'p Program,
    target: NodeId,
    scopes: Vec<Vec<String>>,
    found: Option<BTreeSet<String>>,
}

impl VisibleAt<'_> {
    fn scoped(&mut self, f: impl FnOnce(&mut Self)) {
        self.scopes.push(Vec::new());
        f(self);
        self.scopes.pop();
    }
}

impl<'ast> Visitor<'ast> for VisibleAt<'_> {
    fn visit_func(&mut self, func: &'ast FuncDecl) {
        if self.found.is_none() {
            self.scoped(|v| walk_func(v, func));
        }
    }

    fn visit_block(&mut self, block: &'ast Block) {
        if self.found.is_none() {
            self.scoped(|v| walk_block(v, block));
        }
    }

    fn visit_stmt(&mut self, stmt: &'ast Stmt) {
        if self.found.is_some() {
            return;
        }
        match stmt {
            Stmt::If { .. } | Stmt::For { .. } => self.scoped(|v| walk_stmt(v, stmt)),
            _ => walk_stmt(self, stmt),
        }
    }

    fn visit_ident(&mut self, ident: &'ast Ident) {
        if self.found.is_some() {
            return;
        }
        if ident.id == self.target {
            self.found = Some(self.scopes.iter().flatten().cloned().collect());
            return;
        }
        let Some(symbol) = self.program.def_of(ident.id) else {
            return;
        };
        if self.program.symbol(symbol).kind == SymbolKind::Local {
            if let Some(scope) = self.scopes.last_mut() {
                scope.push(ident.name.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::references::find_references;
    use crate::test_helpers::program_from;
    use std::path::Path;

    fn names_at_calls(source: &str) -> Vec<BTreeSet<String>> {
        let program = program_from(&[("p/p.go", source)]);
        let unit = program.unit_by_path(Path::new("p/p.go")).unwrap();
        let target = program.package(program.unit_package(unit)).scope["f"];
        find_references(&program, target)
            .iter()
            .map(|r| visible_locals(&program, r.unit, r.target))
            .collect()
    }

    fn set(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn params_and_earlier_locals_are_visible() {
        let visible = names_at_calls(
            "package p\n\nfunc f(x int) int {\n\treturn x\n}\n\nfunc g(a int) int {\n\tb := 1\n\treturn f(a + b)\n}\n",
        );
        assert_eq!(visible, vec![set(&["a", "b"])]);
    }

    #[test]
    fn later_and_sibling_block_locals_are_not() {
        let visible = names_at_calls(
            "package p\n\nfunc f() {}\n\nfunc g() {\n\tif true {\n\t\tinner := 1\n\t\tinner++\n\t}\n\tf()\n\tlate := 2\n\tlate++\n}\n",
        );
        assert_eq!(visible, vec![BTreeSet::new()]);
    }

    #[test]
    fn nested_blocks_see_outer_locals() {
        let visible = names_at_calls(
            "package p\n\nfunc f() {}\n\nfunc g() {\n\touter := 1\n\tfor outer > 0 {\n\t\tf()\n\t\touter--\n\t}\n}\n",
        );
        assert_eq!(visible, vec![set(&["outer"])]);
    }
}
