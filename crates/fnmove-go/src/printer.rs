//! Canonical printer.
//!
//! Renders a unit as gofmt-style text: tab indentation, one blank line
//! between top-level declarations, imports sorted by path and spaced binary
//! operators. Comment groups are interleaved by source position, which
//! requires every span in the unit to index into the unit's source text.
//! Single blank lines between statements are kept.
//!
//! Printing also validates the tree and fails with [`PrintError`] instead
//! of producing text that would not parse back.

use std::collections::BTreeMap;

use fnmove_core::types::Span;
use thiserror::Error;

use crate::ast::{
    Block, CommentGroup, Decl, Expr, Field, FuncDecl, GenDecl, Ident, ImportName, ImportSpec,
    SourceFile, Spec, Stmt, TypeExpr,
};
use crate::program::CompilationUnit;

/// Structural problems found while rendering.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PrintError {
    #[error("invalid identifier {name:?}")]
    InvalidIdent { name: String },

    #[error("empty import path")]
    EmptyImportPath,

    #[error("imports {first:?} and {second:?} both bind {name}")]
    DuplicateBinding {
        name: String,
        first: String,
        second: String,
    },
}

type PrintResult = Result<(), PrintError>;

/// Renders a unit's tree back to source text.
pub trait Printer {
    fn print(&self, unit: &CompilationUnit) -> Result<String, PrintError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CanonicalPrinter;

impl Printer for CanonicalPrinter {
    fn print(&self, unit: &CompilationUnit) -> Result<String, PrintError> {
        check_imports(&unit.file.imports)?;
        let mut emitter = Emitter::new(&unit.source, &unit.file.comments);
        emitter.file(&unit.file)?;
        Ok(emitter.out)
    }
}

const KEYWORDS: &[&str] = &[
    "break", "case", "chan", "const", "continue", "default", "defer", "else", "fallthrough",
    "for", "func", "go", "goto", "if", "import", "interface", "map", "package", "range", "return",
    "select", "struct", "switch", "type", "var",
];

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_alphabetic() || first == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_')
        && !KEYWORDS.contains(&name)
}

/// Bindings are taken from aliases and last path segments.
fn check_imports(imports: &[ImportSpec]) -> PrintResult {
    let mut bound: BTreeMap<String, &str> = BTreeMap::new();
    for spec in imports {
        if spec.path.is_empty() {
            return Err(PrintError::EmptyImportPath);
        }
        if let ImportName::Alias(alias) = &spec.name {
            if !is_identifier(alias) {
                return Err(PrintError::InvalidIdent {
                    name: alias.clone(),
                });
            }
        }
        let Some(name) = spec.binding(None) else {
            continue;
        };
        match bound.get(&name) {
            Some(first) if *first != spec.path => {
                return Err(PrintError::DuplicateBinding {
                    name,
                    first: (*first).to_string(),
                    second: spec.path.clone(),
                });
            }
            _ => {
                bound.insert(name, &spec.path);
            }
        }
    }
    Ok(())
}

fn quote(path: &str) -> String {
    let mut quoted = String::with_capacity(path.len() + 2);
    quoted.push('"');
    for c in path.chars() {
        if c == '"' || c == '\\' {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}

/// Approximate extent of a type, from its first to its last identifier.
fn type_span(ty: &TypeExpr) -> Option<Span> {
    match ty {
        TypeExpr::Named(id) => Some(id.span),
        TypeExpr::Qualified { pkg, sel } => Some(pkg.span.cover(&sel.span)),
        TypeExpr::Pointer(inner) | TypeExpr::Slice(inner) => type_span(inner),
        TypeExpr::Map { key, value } => match (type_span(key), type_span(value)) {
            (Some(k), Some(v)) => Some(k.cover(&v)),
            (k, v) => k.or(v),
        },
        TypeExpr::Struct { fields } => {
            let first = fields.first().and_then(field_span)?;
            let last = fields.last().and_then(field_span)?;
            Some(first.cover(&last))
        }
    }
}

fn field_span(field: &Field) -> Option<Span> {
    let ty = type_span(&field.ty);
    match (field.names.first(), ty) {
        (Some(name), Some(ty)) => Some(name.span.cover(&ty)),
        (Some(name), None) => Some(name.span),
        (None, ty) => ty,
    }
}

struct Emitter<'a> {
    source: &'a str,
    comments: Vec<&'a CommentGroup>,
    emitted: Vec<bool>,
    indent: usize,
    out: String,
}

impl<'a> Emitter<'a> {
    fn new(source: &'a str, comments: &'a [CommentGroup]) -> Self {
        let mut comments: Vec<&CommentGroup> = comments.iter().collect();
        comments.sort_by_key(|c| c.span.start);
        Emitter {
            source,
            emitted: vec![false; comments.len()],
            comments,
            indent: 0,
            out: String::new(),
        }
    }

    // ------------------------------------------------------------------
    // Comment pool
    // ------------------------------------------------------------------

    /// Unemitted comment groups starting before `pos`, marked emitted.
    fn take_leading(&mut self, pos: usize) -> Vec<&'a CommentGroup> {
        let mut taken = Vec::new();
        for (idx, group) in self.comments.iter().enumerate() {
            if group.span.start >= pos {
                break;
            }
            if !self.emitted[idx] {
                self.emitted[idx] = true;
                taken.push(*group);
            }
        }
        taken
    }

    /// Whether an unemitted comment starts inside `span`.
    fn has_comments_within(&self, span: Span) -> bool {
        self.comments
            .iter()
            .zip(&self.emitted)
            .any(|(group, done)| !done && span.contains(&group.span))
    }

    /// Append a trailing comment that sits on the same source line after `after`.
    fn trailing(&mut self, after: usize) {
        let found = self
            .comments
            .iter()
            .enumerate()
            .find(|(idx, group)| !self.emitted[*idx] && group.span.start >= after)
            .map(|(idx, group)| (idx, *group));
        let Some((idx, group)) = found else {
            return;
        };
        let same_line = self
            .source
            .get(after..group.span.start)
            .is_some_and(|gap| !gap.contains('\n'));
        if !group.trailing || !same_line {
            return;
        }
        self.emitted[idx] = true;
        let mut lines = group.lines.iter();
        if let Some(first) = lines.next() {
            self.out.push(' ');
            self.out.push_str(first);
        }
        for line in lines {
            self.out.push('\n');
            self.write_indent();
            self.out.push_str(line);
        }
    }

    /// Whether the source has an empty line between `from` and `to`.
    fn blank_between(&self, from: usize, to: usize) -> bool {
        if from >= to {
            return false;
        }
        let Some(gap) = self.source.get(from..to) else {
            return false;
        };
        let pieces: Vec<&str> = gap.split('\n').collect();
        pieces.len() >= 3 && pieces[1..pieces.len() - 1].iter().any(|p| p.trim().is_empty())
    }

    fn comment_group(&mut self, group: &CommentGroup) {
        for line in &group.lines {
            self.write_indent();
            self.out.push_str(line);
            self.out.push('\n');
        }
    }

    // ------------------------------------------------------------------
    // Output
    // ------------------------------------------------------------------

    fn write_indent(&mut self) {
        for _ in 0..self.indent {
            self.out.push('\t');
        }
    }

    fn ident(&mut self, ident: &Ident) -> PrintResult {
        if !is_identifier(&ident.name) {
            return Err(PrintError::InvalidIdent {
                name: ident.name.clone(),
            });
        }
        self.out.push_str(&ident.name);
        Ok(())
    }

    fn join<T>(
        &mut self,
        items: &'a [T],
        mut each: impl FnMut(&mut Self, &'a T) -> PrintResult,
    ) -> PrintResult {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.out.push_str(", ");
            }
            each(self, item)?;
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // File
    // ------------------------------------------------------------------

    fn file(&mut self, file: &'a SourceFile) -> PrintResult {
        let clause_start = file
            .doc
            .as_ref()
            .map_or(file.package.span.start, |doc| doc.span.start);
        for group in self.take_leading(clause_start) {
            self.comment_group(group);
            self.out.push('\n');
        }
        if let Some(doc) = &file.doc {
            self.comment_group(doc);
        }
        self.out.push_str("package ");
        self.ident(&file.package)?;
        self.trailing(file.package.span.end);
        self.out.push('\n');

        if !file.imports.is_empty() {
            self.out.push('\n');
            self.imports(&file.imports);
        }

        for decl in &file.decls {
            self.out.push('\n');
            for group in self.take_leading(decl.span().start) {
                self.comment_group(group);
                self.out.push('\n');
            }
            self.decl(decl)?;
            self.trailing(decl.span().end);
            self.out.push('\n');
        }

        let rest = self.take_leading(usize::MAX);
        if !rest.is_empty() {
            self.out.push('\n');
            for (i, group) in rest.into_iter().enumerate() {
                if i > 0 {
                    self.out.push('\n');
                }
                self.comment_group(group);
            }
        }
        Ok(())
    }

    fn imports(&mut self, imports: &'a [ImportSpec]) {
        let mut sorted: Vec<&ImportSpec> = imports.iter().collect();
        sorted.sort_by(|a, b| a.path.cmp(&b.path));
        let first_real = imports
            .iter()
            .filter(|spec| !spec.span.is_empty())
            .map(|spec| spec.span.start)
            .min();
        let region_end = imports.iter().map(|spec| spec.span.end).max().unwrap_or(0);

        if let Some(start) = first_real {
            for group in self.take_leading(start) {
                self.comment_group(group);
                self.out.push('\n');
            }
        }

        if let [only] = sorted.as_slice() {
            let others = self.take_leading(region_end);
            for group in others {
                self.comment_group(group);
            }
            self.out.push_str("import ");
            self.import_spec(only);
            self.out.push('\n');
            return;
        }

        self.out.push_str("import (\n");
        self.indent += 1;
        for spec in sorted {
            if !spec.span.is_empty() {
                for group in self.take_leading(spec.span.start) {
                    self.comment_group(group);
                }
            }
            self.write_indent();
            self.import_spec(spec);
            if !spec.span.is_empty() {
                self.trailing(spec.span.end);
            }
            self.out.push('\n');
        }
        for group in self.take_leading(region_end) {
            self.comment_group(group);
        }
        self.indent -= 1;
        self.out.push_str(")\n");
    }

    fn import_spec(&mut self, spec: &ImportSpec) {
        match &spec.name {
            ImportName::Default => {}
            ImportName::Alias(alias) => {
                self.out.push_str(alias);
                self.out.push(' ');
            }
            ImportName::Blank => self.out.push_str("_ "),
            ImportName::Dot => self.out.push_str(". "),
        }
        self.out.push_str(&quote(&spec.path));
    }

    // ------------------------------------------------------------------
    // Declarations
    // ------------------------------------------------------------------

    fn decl(&mut self, decl: &'a Decl) -> PrintResult {
        match decl {
            Decl::Func(func) => self.func(func),
            Decl::Gen(g) => self.gen_decl(g),
        }
    }

    fn func(&mut self, func: &'a FuncDecl) -> PrintResult {
        if let Some(doc) = &func.doc {
            self.comment_group(doc);
        }
        self.out.push_str("func ");
        if let Some(recv) = &func.recv {
            self.out.push('(');
            self.field(recv)?;
            self.out.push_str(") ");
        }
        self.ident(&func.name)?;
        self.out.push('(');
        self.join(&func.params, |e, f| e.field(f))?;
        self.out.push(')');
        match func.results.as_slice() {
            [] => {}
            [single] if single.names.is_empty() => {
                self.out.push(' ');
                self.ty(&single.ty)?;
            }
            results => {
                self.out.push_str(" (");
                self.join(results, |e, f| e.field(f))?;
                self.out.push(')');
            }
        }
        self.out.push(' ');
        self.block(&func.body)
    }

    fn field(&mut self, field: &'a Field) -> PrintResult {
        if !field.names.is_empty() {
            self.join(&field.names, |e, n| e.ident(n))?;
            self.out.push(' ');
        }
        self.ty(&field.ty)
    }

    fn gen_decl(&mut self, decl: &'a GenDecl) -> PrintResult {
        if let Some(doc) = &decl.doc {
            self.comment_group(doc);
        }
        self.out.push_str(decl.kind.keyword());
        if !decl.grouped {
            self.out.push(' ');
            for spec in &decl.specs {
                self.spec(spec)?;
            }
            return Ok(());
        }

        self.out.push_str(" (\n");
        self.indent += 1;
        let mut last: Option<usize> = None;
        for spec in &decl.specs {
            let start = spec.span().start;
            for group in self.take_leading(start) {
                self.separate(&mut last, group.span.start);
                self.comment_group(group);
                last = Some(group.span.end);
            }
            self.separate(&mut last, start);
            self.write_indent();
            self.spec(spec)?;
            self.trailing(spec.span().end);
            self.out.push('\n');
            last = Some(spec.span().end);
        }
        for group in self.take_leading(decl.span.end) {
            self.comment_group(group);
        }
        self.indent -= 1;
        self.write_indent();
        self.out.push(')');
        Ok(())
    }

    fn spec(&mut self, spec: &'a Spec) -> PrintResult {
        match spec {
            Spec::Value(value) => {
                self.join(&value.names, |e, n| e.ident(n))?;
                if let Some(ty) = &value.ty {
                    self.out.push(' ');
                    self.ty(ty)?;
                }
                if !value.values.is_empty() {
                    self.out.push_str(" = ");
                    self.join(&value.values, |e, x| e.expr(x))?;
                }
                Ok(())
            }
            Spec::Type(ty) => {
                self.ident(&ty.name)?;
                self.out.push(' ');
                self.ty(&ty.ty)
            }
        }
    }

    fn ty(&mut self, ty: &'a TypeExpr) -> PrintResult {
        match ty {
            TypeExpr::Named(id) => self.ident(id),
            TypeExpr::Qualified { pkg, sel } => {
                self.ident(pkg)?;
                self.out.push('.');
                self.ident(sel)
            }
            TypeExpr::Pointer(inner) => {
                self.out.push('*');
                self.ty(inner)
            }
            TypeExpr::Slice(inner) => {
                self.out.push_str("[]");
                self.ty(inner)
            }
            TypeExpr::Map { key, value } => {
                self.out.push_str("map[");
                self.ty(key)?;
                self.out.push(']');
                self.ty(value)
            }
            TypeExpr::Struct { fields } if fields.is_empty() => {
                self.out.push_str("struct{}");
                Ok(())
            }
            TypeExpr::Struct { fields } => {
                self.out.push_str("struct {\n");
                self.indent += 1;
                for field in fields {
                    let span = field_span(field);
                    if let Some(span) = span {
                        for group in self.take_leading(span.start) {
                            self.comment_group(group);
                        }
                    }
                    self.write_indent();
                    self.field(field)?;
                    if let Some(span) = span {
                        self.trailing(span.end);
                    }
                    self.out.push('\n');
                }
                self.indent -= 1;
                self.write_indent();
                self.out.push('}');
                Ok(())
            }
        }
    }

    // ------------------------------------------------------------------
    // Statements
    // ------------------------------------------------------------------

    /// Keep one blank line between items separated by one in the source.
    fn separate(&mut self, last: &mut Option<usize>, next: usize) {
        if let Some(prev) = *last {
            if self.blank_between(prev, next) {
                self.out.push('\n');
            }
        }
        *last = Some(next);
    }

    fn block(&mut self, block: &'a Block) -> PrintResult {
        self.out.push('{');
        let inner = Span::new(
            block.span.start + 1,
            block.span.end.saturating_sub(1).max(block.span.start + 1),
        );
        if block.stmts.is_empty() && !self.has_comments_within(inner) {
            self.out.push('}');
            return Ok(());
        }
        self.trailing(inner.start);
        self.out.push('\n');
        self.indent += 1;

        let mut last: Option<usize> = None;
        for stmt in &block.stmts {
            let start = stmt.span().start;
            for group in self.take_leading(start) {
                self.separate(&mut last, group.span.start);
                self.comment_group(group);
                last = Some(group.span.end);
            }
            self.separate(&mut last, start);
            self.write_indent();
            self.stmt(stmt)?;
            self.trailing(stmt.span().end);
            self.out.push('\n');
            last = Some(stmt.span().end);
        }
        for group in self.take_leading(inner.end) {
            self.separate(&mut last, group.span.start);
            self.comment_group(group);
            last = Some(group.span.end);
        }

        self.indent -= 1;
        self.write_indent();
        self.out.push('}');
        Ok(())
    }

    fn stmt(&mut self, stmt: &'a Stmt) -> PrintResult {
        match stmt {
            Stmt::Expr(expr) => self.expr(expr),
            Stmt::Return { results, .. } => {
                self.out.push_str("return");
                if !results.is_empty() {
                    self.out.push(' ');
                    self.join(results, |e, x| e.expr(x))?;
                }
                Ok(())
            }
            Stmt::Define { lhs, rhs, .. } => {
                self.join(lhs, |e, n| e.ident(n))?;
                self.out.push_str(" := ");
                self.join(rhs, |e, x| e.expr(x))
            }
            Stmt::Assign { lhs, op, rhs, .. } => {
                self.join(lhs, |e, x| e.expr(x))?;
                self.out.push(' ');
                self.out.push_str(op);
                self.out.push(' ');
                self.join(rhs, |e, x| e.expr(x))
            }
            Stmt::IncDec { x, inc, .. } => {
                self.expr(x)?;
                self.out.push_str(if *inc { "++" } else { "--" });
                Ok(())
            }
            Stmt::Decl(g) => self.gen_decl(g),
            Stmt::If {
                init,
                cond,
                then,
                els,
                ..
            } => {
                self.out.push_str("if ");
                if let Some(init) = init {
                    self.stmt(init)?;
                    self.out.push_str("; ");
                }
                self.expr(cond)?;
                self.out.push(' ');
                self.block(then)?;
                if let Some(els) = els {
                    self.out.push_str(" else ");
                    self.stmt(els)?;
                }
                Ok(())
            }
            Stmt::For {
                init,
                cond,
                post,
                body,
                ..
            } => {
                self.out.push_str("for ");
                if init.is_some() || post.is_some() {
                    if let Some(init) = init {
                        self.stmt(init)?;
                    }
                    self.out.push_str("; ");
                    if let Some(cond) = cond {
                        self.expr(cond)?;
                    }
                    self.out.push_str("; ");
                    if let Some(post) = post {
                        self.stmt(post)?;
                    }
                    self.out.push(' ');
                } else if let Some(cond) = cond {
                    self.expr(cond)?;
                    self.out.push(' ');
                }
                self.block(body)
            }
            Stmt::Branch { keyword, .. } => {
                self.out.push_str(keyword);
                Ok(())
            }
            Stmt::Block(block) => self.block(block),
        }
    }

    // ------------------------------------------------------------------
    // Expressions
    // ------------------------------------------------------------------

    fn expr(&mut self, expr: &'a Expr) -> PrintResult {
        match expr {
            Expr::Ident(id) => self.ident(id),
            Expr::Selector { x, sel, .. } => {
                self.expr(x)?;
                self.out.push('.');
                self.ident(sel)
            }
            Expr::Call { fun, args, .. } => {
                self.expr(fun)?;
                self.out.push('(');
                self.join(args, |e, x| e.expr(x))?;
                self.out.push(')');
                Ok(())
            }
            Expr::Index { x, index, .. } => {
                self.expr(x)?;
                self.out.push('[');
                self.expr(index)?;
                self.out.push(']');
                Ok(())
            }
            Expr::Unary { op, x, .. } => {
                self.out.push_str(op);
                self.expr(x)
            }
            Expr::Binary { op, x, y, .. } => {
                self.expr(x)?;
                self.out.push(' ');
                self.out.push_str(op);
                self.out.push(' ');
                self.expr(y)
            }
            Expr::Lit { value, .. } => {
                self.out.push_str(value);
                Ok(())
            }
            Expr::Paren { x, .. } => {
                self.out.push('(');
                self.expr(x)?;
                self.out.push(')');
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::NodeIdGen;
    use crate::parser::parse_file;
    use crate::program::PackageId;
    use std::collections::BTreeMap;

    fn unit(source: &str) -> CompilationUnit {
        let mut ids = NodeIdGen::new();
        let file = parse_file("a.go", source, &mut ids).unwrap();
        CompilationUnit {
            path: "a.go".into(),
            rel_path: "a.go".to_string(),
            package: PackageId(0),
            source: source.to_string(),
            contents: source.to_string(),
            file,
            imports: BTreeMap::new(),
        }
    }

    fn render(source: &str) -> String {
        CanonicalPrinter.print(&unit(source)).unwrap()
    }

    mod layout {
        use super::*;

        #[test]
        fn canonical_source_is_reproduced() {
            let source = r#"// Package demo is a demo.
package demo

import (
	"fmt"
	str "strings"
)

// Limit caps values.
const Limit = 10

var (
	count int

	// names holds names.
	names map[string]int
)

type Pair struct {
	a int // first
	b string
}

// Sum adds two numbers.
func Sum(a, b int) int {
	// add them
	total := a + b // inline

	if total > Limit {
		return Limit
	} else if total < 0 {
		return 0
	}
	for i := 0; i < 3; i++ {
		total += i
	}
	for total > 100 {
		total--
	}
	fmt.Println(str.ToUpper("x"), -count, (a + b) * 2)
	return total
}

func (p *Pair) Reset() {}

func split(s string) (head string, rest []string) {
	return
}

// trailing notes
"#;
            assert_eq!(render(source), source);
        }

        #[test]
        fn spacing_is_normalized() {
            let source = "package p\nimport \"b\"\nfunc f(x int)int{\nif x>1{return x*2}\n\n\n\nreturn x}\n";
            let expected = "package p\n\nimport \"b\"\n\nfunc f(x int) int {\n\tif x > 1 {\n\t\treturn x * 2\n\t}\n\n\treturn x\n}\n";
            assert_eq!(render(source), expected);
        }

        #[test]
        fn imports_are_sorted_and_grouped() {
            let source = "package p\n\nimport \"z\"\nimport _ \"a/side\"\nimport . \"m\"\n\nfunc f() {}\n";
            let expected =
                "package p\n\nimport (\n\t_ \"a/side\"\n\t. \"m\"\n\t\"z\"\n)\n\nfunc f() {}\n";
            assert_eq!(render(source), expected);
        }

        #[test]
        fn floating_comments_keep_their_position() {
            let source = "// Copyright notice.\n\npackage p\n\n// Section one.\n\nfunc a() {}\n\nfunc b() {\n\tx := 1\n\t// dangling\n}\n";
            assert_eq!(render(source), source);
        }
    }

    mod validation {
        use super::*;
        use crate::ast::{Decl, ImportName, ImportSpec};

        #[test]
        fn empty_identifier_is_rejected() {
            let mut unit = unit("package p\n\nfunc f() {}\n");
            let Decl::Func(f) = &mut unit.file.decls[0] else {
                panic!("expected func");
            };
            f.name.name.clear();
            assert_eq!(
                CanonicalPrinter.print(&unit),
                Err(PrintError::InvalidIdent {
                    name: String::new()
                })
            );
        }

        #[test]
        fn keyword_identifier_is_rejected() {
            let mut unit = unit("package p\n\nfunc f() {}\n");
            unit.file.package.name = "func".to_string();
            assert!(matches!(
                CanonicalPrinter.print(&unit),
                Err(PrintError::InvalidIdent { .. })
            ));
        }

        #[test]
        fn empty_import_path_is_rejected() {
            let mut unit = unit("package p\n");
            unit.file
                .imports
                .push(ImportSpec::new(ImportName::Default, "", Span::new(9, 9)));
            assert_eq!(
                CanonicalPrinter.print(&unit),
                Err(PrintError::EmptyImportPath)
            );
        }

        #[test]
        fn conflicting_bindings_are_rejected() {
            let mut unit = unit("package p\n\nimport \"a/util\"\n");
            unit.file.imports.push(ImportSpec::new(
                ImportName::Alias("util".to_string()),
                "b/other",
                Span::new(9, 9),
            ));
            assert!(matches!(
                CanonicalPrinter.print(&unit),
                Err(PrintError::DuplicateBinding { .. })
            ));
        }

        #[test]
        fn blank_and_dot_imports_never_conflict() {
            let source = "package p\n\nimport (\n\t_ \"a/x\"\n\t_ \"b/y\"\n)\n";
            assert_eq!(render(source), source);
        }
    }
}
