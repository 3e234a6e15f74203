//! Go-subset front-end.
//!
//! A hand-written recursive-descent parser over the token stream produced
//! by [`lexer`]. Parsing stops at the first syntax error, which is reported
//! with the file, line and column it occurred at. Comments are grouped by
//! adjacency after parsing; a group ending on the line directly above a
//! top-level declaration (or the package clause) becomes its doc comment.

pub mod lexer;

mod expressions;
mod items;
mod statements;
mod support;
mod types;

use fnmove_core::text::location_of;
use fnmove_core::types::{Location, Span};
use thiserror::Error;

use crate::ast::{CommentGroup, Decl, NodeIdGen, SourceFile};
use lexer::{Comment, Lexer, Token};

/// A syntax error with its source location.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{location}: {message}")]
pub struct ParseError {
    pub location: Location,
    pub message: String,
}

/// Syntax error before it is mapped to a location.
#[derive(Debug, Clone)]
struct SyntaxError {
    message: String,
    offset: usize,
}

type PResult<T> = Result<T, SyntaxError>;

/// Parse one file. `path` is only used for diagnostics.
pub fn parse_file(path: &str, source: &str, ids: &mut NodeIdGen) -> Result<SourceFile, ParseError> {
    let to_error = |message: String, offset: usize| ParseError {
        location: location_of(path, source, offset),
        message,
    };

    let (tokens, comments) = Lexer::new(source)
        .tokenize()
        .map_err(|e| to_error(e.message, e.span.start))?;

    let mut parser = Parser::new(tokens, ids);
    let mut file = parser
        .parse_source_file(source.len())
        .map_err(|e| to_error(e.message, e.offset))?;

    attach_comments(&mut file, comments, &LineIndex::new(source));
    Ok(file)
}

struct Parser<'a> {
    tokens: Vec<Token>,
    cursor: usize,
    ids: &'a mut NodeIdGen,
}

impl<'a> Parser<'a> {
    fn new(tokens: Vec<Token>, ids: &'a mut NodeIdGen) -> Self {
        Self {
            tokens,
            cursor: 0,
            ids,
        }
    }
}

// ============================================================================
// Comments
// ============================================================================

/// Byte offset to 1-based line lookup.
struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    fn new(source: &str) -> Self {
        let mut starts = vec![0];
        starts.extend(
            source
                .bytes()
                .enumerate()
                .filter(|(_, b)| *b == b'\n')
                .map(|(i, _)| i + 1),
        );
        LineIndex { starts }
    }

    fn line_of(&self, offset: usize) -> usize {
        self.starts.partition_point(|&s| s <= offset)
    }

    /// Line of the last byte of `span`.
    fn end_line(&self, span: Span) -> usize {
        self.line_of(span.end.saturating_sub(1).max(span.start))
    }
}

fn group_comments(comments: Vec<Comment>, lines: &LineIndex) -> Vec<CommentGroup> {
    let mut groups: Vec<CommentGroup> = Vec::new();
    for comment in comments {
        if let Some(last) = groups.last_mut() {
            let adjacent = lines.line_of(comment.span.start) <= lines.end_line(last.span) + 1;
            if adjacent && !last.trailing && !comment.trailing {
                last.lines.push(comment.text);
                last.span = last.span.cover(&comment.span);
                continue;
            }
        }
        groups.push(CommentGroup {
            lines: vec![comment.text],
            span: comment.span,
            trailing: comment.trailing,
        });
    }
    groups
}

/// Remove and return the group that ends on the line directly above `start`.
fn take_doc(groups: &mut Vec<CommentGroup>, start: usize, lines: &LineIndex) -> Option<CommentGroup> {
    let target = lines.line_of(start);
    let index = groups.iter().rposition(|g| g.span.end <= start)?;
    let group = &groups[index];
    if group.trailing || lines.end_line(group.span) + 1 != target {
        return None;
    }
    Some(groups.remove(index))
}

fn attach_comments(file: &mut SourceFile, comments: Vec<Comment>, lines: &LineIndex) {
    let mut groups = group_comments(comments, lines);

    file.doc = take_doc(&mut groups, file.package.span.start, lines);

    for decl in &mut file.decls {
        let start = decl.span().start;
        let Some(doc) = take_doc(&mut groups, start, lines) else {
            continue;
        };
        match decl {
            Decl::Func(f) => {
                f.span = Span::new(doc.span.start, f.span.end);
                f.doc = Some(doc);
            }
            Decl::Gen(g) => {
                g.span = Span::new(doc.span.start, g.span.end);
                g.doc = Some(doc);
            }
        }
    }

    file.comments = groups;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Expr, ImportName, Spec, Stmt, TypeExpr};

    fn parse(src: &str) -> SourceFile {
        parse_file("test.go", src, &mut NodeIdGen::new()).unwrap()
    }

    fn parse_err(src: &str) -> ParseError {
        parse_file("test.go", src, &mut NodeIdGen::new()).unwrap_err()
    }

    fn func(file: &SourceFile, index: usize) -> &crate::ast::FuncDecl {
        match &file.decls[index] {
            Decl::Func(f) => f,
            other => panic!("expected func, got {:?}", other),
        }
    }

    mod files {
        use super::*;

        #[test]
        fn package_and_imports() {
            let file = parse(
                "package app\n\nimport \"fmt\"\nimport (\n\tm \"example.com/mathutil\"\n\t_ \"embed\"\n\t. \"strings\"\n)\n",
            );
            assert_eq!(file.package.name, "app");
            assert_eq!(file.imports.len(), 4);
            assert_eq!(file.imports[0].name, ImportName::Default);
            assert_eq!(file.imports[0].path, "fmt");
            assert_eq!(file.imports[1].name, ImportName::Alias("m".into()));
            assert_eq!(file.imports[2].name, ImportName::Blank);
            assert_eq!(file.imports[3].name, ImportName::Dot);
        }

        #[test]
        fn missing_package_clause() {
            let err = parse_err("func f() {}\n");
            assert_eq!(err.location.line, 1);
            assert!(err.message.contains("package"));
        }

        #[test]
        fn error_reports_line_and_column() {
            let err = parse_err("package a\n\nfunc f() {\n\tx := )\n}\n");
            assert_eq!(err.location.file, "test.go");
            assert_eq!(err.location.line, 4);
            assert!(err.to_string().starts_with("test.go:4:"));
        }

        #[test]
        fn unsupported_statement_is_rejected() {
            let err = parse_err("package a\n\nfunc f() {\n\tswitch {\n\t}\n}\n");
            assert!(err.message.contains("switch"));
        }

        #[test]
        fn import_after_decl_is_rejected() {
            let err = parse_err("package a\n\nvar x = 1\n\nimport \"fmt\"\n");
            assert!(err.message.contains("import"));
        }
    }

    mod functions {
        use super::*;

        #[test]
        fn grouped_parameters() {
            let file = parse("package a\n\nfunc sum(a, b int, s string) (int, error) {\n\treturn a + b, nil\n}\n");
            let f = func(&file, 0);
            assert_eq!(f.name.name, "sum");
            assert_eq!(f.params.len(), 2);
            assert_eq!(f.params[0].names.len(), 2);
            assert_eq!(f.params[1].names[0].name, "s");
            assert_eq!(f.results.len(), 2);
            assert!(f.results.iter().all(|r| r.names.is_empty()));
        }

        #[test]
        fn unnamed_parameters() {
            let file = parse("package a\n\nfunc f(int, io.Reader) {}\n");
            let f = func(&file, 0);
            assert_eq!(f.params.len(), 2);
            assert!(matches!(f.params[1].ty, TypeExpr::Qualified { .. }));
        }

        #[test]
        fn mixed_named_and_unnamed_rejected() {
            let err = parse_err("package a\n\nfunc f(a int, string) {}\n");
            assert!(err.message.contains("mixed"));
        }

        #[test]
        fn method_receiver() {
            let file = parse("package a\n\nfunc (c *Counter) Inc() {\n\tc.n++\n}\n");
            let f = func(&file, 0);
            assert_eq!(f.receiver_type().as_deref(), Some("*Counter"));
        }

        #[test]
        fn single_result_type() {
            let file = parse("package a\n\nfunc f() *int {\n\treturn nil\n}\n");
            assert_eq!(func(&file, 0).results.len(), 1);
        }

        #[test]
        fn statements_parse() {
            let file = parse(concat!(
                "package a\n\n",
                "func f(n int) int {\n",
                "\tvar total int\n",
                "\tfor i := 0; i < n; i++ {\n",
                "\t\tif err := check(i); err != nil {\n",
                "\t\t\tcontinue\n",
                "\t\t} else if i == 3 {\n",
                "\t\t\tbreak\n",
                "\t\t} else {\n",
                "\t\t\ttotal += items[i]\n",
                "\t\t}\n",
                "\t}\n",
                "\tfor total > 10 {\n",
                "\t\ttotal = total - 1\n",
                "\t}\n",
                "\t{\n",
                "\t\tx, y := -total, !ok\n",
                "\t\t_ = (x)\n",
                "\t}\n",
                "\treturn total\n",
                "}\n",
            ));
            let body = &func(&file, 0).body;
            assert_eq!(body.stmts.len(), 5);
            assert!(matches!(body.stmts[1], Stmt::For { init: Some(_), .. }));
            assert!(matches!(body.stmts[2], Stmt::For { init: None, cond: Some(_), .. }));
        }

        #[test]
        fn call_and_selector_expressions() {
            let file = parse("package a\n\nfunc f() {\n\tmathutil.sum(1, g(2))\n}\n");
            let Stmt::Expr(Expr::Call { fun, args, .. }) = &func(&file, 0).body.stmts[0] else {
                panic!("expected call statement");
            };
            assert!(matches!(**fun, Expr::Selector { .. }));
            assert_eq!(args.len(), 2);
        }

        #[test]
        fn binary_precedence() {
            let file = parse("package a\n\nvar x = 1 + 2*3 == 7 && ok\n");
            let Decl::Gen(g) = &file.decls[0] else {
                panic!("expected var");
            };
            let Spec::Value(v) = &g.specs[0] else {
                panic!("expected value spec");
            };
            let Expr::Binary { op, .. } = &v.values[0] else {
                panic!("expected binary");
            };
            assert_eq!(op, "&&");
        }
    }

    mod declarations {
        use super::*;

        #[test]
        fn grouped_var_and_types() {
            let file = parse(concat!(
                "package a\n\n",
                "const (\n\tA = 1\n\tB\n)\n\n",
                "type Point struct {\n\tX, Y int\n\tlabel string\n}\n\n",
                "type Index map[string][]*Point\n\n",
                "var p, q *Point\n",
            ));
            assert_eq!(file.decls.len(), 4);
            let names: Vec<_> = file
                .decls
                .iter()
                .flat_map(|d| d.declared_names())
                .map(|i| i.name.clone())
                .collect();
            assert_eq!(names, vec!["A", "B", "Point", "Index", "p", "q"]);
        }
    }

    mod comments {
        use super::*;

        #[test]
        fn doc_comment_attached_to_func() {
            let src = "package a\n\n// sum adds\n// two ints.\nfunc sum(a, b int) int {\n\treturn a + b\n}\n";
            let file = parse(src);
            let f = func(&file, 0);
            let doc = f.doc.as_ref().unwrap();
            assert_eq!(doc.lines, vec!["// sum adds", "// two ints."]);
            assert_eq!(f.span.start, src.find("// sum").unwrap());
            assert!(file.comments.is_empty());
        }

        #[test]
        fn separated_comment_is_not_doc() {
            let file = parse("package a\n\n// floating\n\nfunc f() {}\n");
            assert!(func(&file, 0).doc.is_none());
            assert_eq!(file.comments.len(), 1);
        }

        #[test]
        fn package_doc_and_trailing_comments() {
            let file = parse(
                "// Package a does things.\npackage a\n\nfunc f() {\n\tg() // call g\n\t// inner\n}\n",
            );
            assert!(file.doc.is_some());
            assert_eq!(file.comments.len(), 2);
            assert!(file.comments[0].trailing);
            assert!(!file.comments[1].trailing);
        }
    }
}
