//! Finding references to a symbol by identity.
//!
//! A reference is recorded by the identifier that resolves to the symbol:
//! the bare identifier of `f(x)` or the selected identifier of `pkg.F(x)`.
//! Same-named symbols, shadowing locals and renamed imports never match
//! because only resolved identity is compared.

use std::collections::HashSet;

use fnmove_core::types::Span;

use crate::ast::{Expr, NodeId};
use crate::program::{PackageId, Program, SymbolId, UnitId};
use crate::visit::{walk_expr, walk_file, Visitor};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    /// Callee of a call expression.
    Call,
    /// Any other use, such as `f := sum`.
    Value,
}

/// One resolved use of a symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub unit: UnitId,
    pub package: PackageId,
    /// Identifier resolving to the symbol.
    pub target: NodeId,
    /// Enclosing call for [`ReferenceKind::Call`].
    pub call: Option<NodeId>,
    pub kind: ReferenceKind,
    pub symbol: SymbolId,
    /// Span of the bare or qualified expression naming the symbol.
    pub span: Span,
}

/// Every call site whose callee resolves to `symbol`, in unit and source order.
pub fn find_references(program: &Program, symbol: SymbolId) -> Vec<Reference> {
    scan(program, symbol)
        .into_iter()
        .filter(|r| r.kind == ReferenceKind::Call)
        .collect()
}

/// Every non-call use of `symbol`.
pub fn find_value_references(program: &Program, symbol: SymbolId) -> Vec<Reference> {
    scan(program, symbol)
        .into_iter()
        .filter(|r| r.kind == ReferenceKind::Value)
        .collect()
}

fn scan(program: &Program, symbol: SymbolId) -> Vec<Reference> {
    let mut found = Vec::new();
    for unit in program.unit_ids() {
        let mut finder = Finder {
            program,
            unit,
            package: program.unit_package(unit),
            symbol,
            callees: HashSet::new(),
            found: Vec::new(),
        };
        walk_file(&mut finder, &program.unit(unit).file);
        found.extend(finder.found);
    }
    found
}

struct Finder<'p> {
    program: &'p Program,
    unit: UnitId,
    package: PackageId,
    symbol: SymbolId,
    /// Targets already recorded as callees.
    callees: HashSet<NodeId>,
    found: Vec<Reference>,
}

impl Finder<'_> {
    fn record(&mut self, named: &Expr, call: Option<NodeId>) {
        let target = match named {
            Expr::Ident(id) => id.id,
            Expr::Selector { sel, .. } => sel.id,
            _ => return,
        };
        let kind = if call.is_some() {
            self.callees.insert(target);
            ReferenceKind::Call
        } else if self.callees.contains(&target) {
            return;
        } else {
            ReferenceKind::Value
        };
        self.found.push(Reference {
            unit: self.unit,
            package: self.package,
            target,
            call,
            kind,
            symbol: self.symbol,
            span: named.span(),
        });
    }
}

impl<'ast> Visitor<'ast> for Finder<'_> {
    fn visit_expr(&mut self, expr: &'ast Expr) {
        match expr {
            Expr::Call { id, fun, .. } => {
                if self.program.resolve(expr) == Some(self.symbol) {
                    self.record(fun.unparen(), Some(*id));
                }
            }
            Expr::Ident(_) | Expr::Selector { .. } => {
                if self.program.resolve_callee(expr) == Some(self.symbol) {
                    self.record(expr, None);
                }
            }
            _ => {}
        }
        walk_expr(self, expr);
    }
}
