//! Helpers for building programs in unit tests.

use std::fs;

use tempfile::TempDir;

use crate::ast::{Expr, SourceFile};
use crate::loader::{GoLoader, SemanticModel};
use crate::program::Program;
use crate::visit::{walk_expr, walk_file, Visitor};

/// Write `files` into a fresh directory and load it.
///
/// A `go.mod` declaring module `example.com/demo` is added when `files`
/// does not contain one.
pub fn workspace(files: &[(&str, &str)]) -> (TempDir, Program) {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    if !files.iter().any(|(path, _)| *path == "go.mod") {
        fs::write(dir.path().join("go.mod"), "module example.com/demo\n")
            .expect("failed to write go.mod");
    }
    for (path, content) in files {
        let full = dir.path().join(path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).expect("failed to create dirs");
        }
        fs::write(&full, content).expect("failed to write file");
    }
    let program = GoLoader::default()
        .load(dir.path())
        .expect("failed to load program");
    (dir, program)
}

/// Like [`workspace`] for tests that only need the loaded program.
pub fn program_from(files: &[(&str, &str)]) -> Program {
    workspace(files).1
}

/// Call expressions in `file` whose callee is named `callee`, bare or
/// qualified.
pub fn find_calls<'a>(file: &'a SourceFile, callee: &str) -> Vec<&'a Expr> {
    struct Calls<'a, 'n> {
        callee: &'n str,
        found: Vec<&'a Expr>,
    }

    impl<'a> Visitor<'a> for Calls<'a, '_> {
        fn visit_expr(&mut self, expr: &'a Expr) {
            if let Expr::Call { fun, .. } = expr {
                let name = match fun.unparen() {
                    Expr::Ident(id) => Some(&id.name),
                    Expr::Selector { sel, .. } => Some(&sel.name),
                    _ => None,
                };
                if name.is_some_and(|n| n == self.callee) {
                    self.found.push(expr);
                }
            }
            walk_expr(self, expr);
        }
    }

    let mut calls = Calls {
        callee,
        found: Vec::new(),
    };
    walk_file(&mut calls, file);
    calls.found
}
