//! Closed syntax tree for the supported Go subset.
//!
//! Every node kind is a variant of a closed enum, so traversal code matches
//! exhaustively. Identifiers and call expressions carry a program-unique
//! [`NodeId`] used as the key of the resolution tables. Spans are byte
//! offsets into the unit's source text, except inside declarations that were
//! moved into another unit, whose spans are rebased past that unit's end.

use fnmove_core::types::Span;

/// Program-unique id of a resolvable node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

/// Allocator for [`NodeId`]s, shared by every unit of one program.
#[derive(Debug, Clone, Default)]
pub struct NodeIdGen {
    next: u32,
}

impl NodeIdGen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fresh(&mut self) -> NodeId {
        let id = NodeId(self.next);
        self.next += 1;
        id
    }
}

/// An identifier occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    pub id: NodeId,
    pub name: String,
    pub span: Span,
}

impl Ident {
    pub fn new(id: NodeId, name: impl Into<String>, span: Span) -> Self {
        Ident {
            id,
            name: name.into(),
            span,
        }
    }

    /// Whether the name is visible outside its package.
    pub fn is_exported(&self) -> bool {
        is_exported(&self.name)
    }
}

/// Whether `name` starts with an upper-case letter.
pub fn is_exported(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_uppercase)
}

/// Adjacent comments, printed as a unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentGroup {
    /// Raw comment texts including their `//` or `/* */` markers.
    pub lines: Vec<String>,
    pub span: Span,
    /// Follows code on the same line.
    pub trailing: bool,
}

impl CommentGroup {
    /// The comment text with markers stripped, one entry per line.
    pub fn text_lines(&self) -> Vec<String> {
        self.lines
            .iter()
            .flat_map(|raw| {
                if let Some(rest) = raw.strip_prefix("//") {
                    vec![rest.strip_prefix(' ').unwrap_or(rest).to_string()]
                } else {
                    let inner = raw
                        .strip_prefix("/*")
                        .and_then(|s| s.strip_suffix("*/"))
                        .unwrap_or(raw);
                    inner.lines().map(|l| l.trim().to_string()).collect()
                }
            })
            .collect()
    }
}

// ============================================================================
// File
// ============================================================================

/// One parsed source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Comment directly above the package clause.
    pub doc: Option<CommentGroup>,
    pub package: Ident,
    pub imports: Vec<ImportSpec>,
    pub decls: Vec<Decl>,
    /// Every comment group that is not a doc comment.
    pub comments: Vec<CommentGroup>,
    /// End offset of the file.
    pub end: usize,
}

/// Binding of an import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportName {
    /// `import "path"`: bound to the imported package's name.
    Default,
    /// `import alias "path"`.
    Alias(String),
    /// `import _ "path"`.
    Blank,
    /// `import . "path"`.
    Dot,
}

/// One import spec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSpec {
    pub name: ImportName,
    /// Unquoted import path.
    pub path: String,
    pub span: Span,
}

impl ImportSpec {
    pub fn new(name: ImportName, path: impl Into<String>, span: Span) -> Self {
        ImportSpec {
            name,
            path: path.into(),
            span,
        }
    }

    /// Last path segment, the conventional package name.
    pub fn last_segment(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }

    /// Name this import binds in the file, resolving unaliased imports
    /// with `package_name` when the imported package is known.
    pub fn binding(&self, package_name: Option<&str>) -> Option<String> {
        match &self.name {
            ImportName::Alias(alias) => Some(alias.clone()),
            ImportName::Default => Some(
                package_name
                    .map(str::to_string)
                    .unwrap_or_else(|| self.last_segment().to_string()),
            ),
            ImportName::Blank | ImportName::Dot => None,
        }
    }
}

// ============================================================================
// Declarations
// ============================================================================

/// A top-level declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decl {
    Func(FuncDecl),
    Gen(GenDecl),
}

impl Decl {
    /// Span including the doc comment.
    pub fn span(&self) -> Span {
        match self {
            Decl::Func(f) => f.span,
            Decl::Gen(g) => g.span,
        }
    }

    /// Names this declaration adds to the package scope.
    pub fn declared_names(&self) -> Vec<&Ident> {
        match self {
            Decl::Func(f) if f.recv.is_none() => vec![&f.name],
            Decl::Func(_) => Vec::new(),
            Decl::Gen(g) => g.specs.iter().flat_map(Spec::names).collect(),
        }
    }
}

/// `func (recv) name(params) results { body }`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuncDecl {
    pub doc: Option<CommentGroup>,
    pub recv: Option<Field>,
    pub name: Ident,
    pub params: Vec<Field>,
    pub results: Vec<Field>,
    pub body: Block,
    /// From the doc comment (or `func`) to the closing brace.
    pub span: Span,
}

impl FuncDecl {
    /// Printable receiver type, for diagnostics.
    pub fn receiver_type(&self) -> Option<String> {
        self.recv.as_ref().map(|r| r.ty.to_string())
    }
}

/// A parameter, result, receiver or struct field group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub names: Vec<Ident>,
    pub ty: TypeExpr,
}

/// Keyword of a general declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenKind {
    Var,
    Const,
    Type,
}

impl GenKind {
    pub fn keyword(self) -> &'static str {
        match self {
            GenKind::Var => "var",
            GenKind::Const => "const",
            GenKind::Type => "type",
        }
    }
}

/// `var`, `const` or `type`, single or parenthesized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenDecl {
    pub doc: Option<CommentGroup>,
    pub kind: GenKind,
    pub specs: Vec<Spec>,
    pub grouped: bool,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Spec {
    Value(ValueSpec),
    Type(TypeSpec),
}

impl Spec {
    pub fn names(&self) -> Vec<&Ident> {
        match self {
            Spec::Value(v) => v.names.iter().collect(),
            Spec::Type(t) => vec![&t.name],
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Spec::Value(v) => v.span,
            Spec::Type(t) => t.span,
        }
    }
}

/// `a, b T = x, y`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueSpec {
    pub names: Vec<Ident>,
    pub ty: Option<TypeExpr>,
    pub values: Vec<Expr>,
    pub span: Span,
}

/// `Name T`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeSpec {
    pub name: Ident,
    pub ty: TypeExpr,
    pub span: Span,
}

// ============================================================================
// Types
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExpr {
    /// `T`
    Named(Ident),
    /// `pkg.T`
    Qualified { pkg: Ident, sel: Ident },
    /// `*T`
    Pointer(Box<TypeExpr>),
    /// `[]T`
    Slice(Box<TypeExpr>),
    /// `map[K]V`
    Map {
        key: Box<TypeExpr>,
        value: Box<TypeExpr>,
    },
    /// `struct { ... }`
    Struct { fields: Vec<Field> },
}

impl std::fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TypeExpr::Named(id) => write!(f, "{}", id.name),
            TypeExpr::Qualified { pkg, sel } => write!(f, "{}.{}", pkg.name, sel.name),
            TypeExpr::Pointer(inner) => write!(f, "*{}", inner),
            TypeExpr::Slice(inner) => write!(f, "[]{}", inner),
            TypeExpr::Map { key, value } => write!(f, "map[{}]{}", key, value),
            TypeExpr::Struct { fields } if fields.is_empty() => write!(f, "struct{{}}"),
            TypeExpr::Struct { .. } => write!(f, "struct{{...}}"),
        }
    }
}

// ============================================================================
// Statements
// ============================================================================

/// `{ stmts }`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub stmts: Vec<Stmt>,
    /// From `{` to `}` inclusive.
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stmt {
    Expr(Expr),
    Return {
        results: Vec<Expr>,
        span: Span,
    },
    /// `a, b := x, y`
    Define {
        lhs: Vec<Ident>,
        rhs: Vec<Expr>,
        span: Span,
    },
    /// `a = x` and `a += x`
    Assign {
        lhs: Vec<Expr>,
        op: String,
        rhs: Vec<Expr>,
        span: Span,
    },
    /// `x++` / `x--`
    IncDec {
        x: Expr,
        inc: bool,
        span: Span,
    },
    /// Local `var`, `const` or `type`.
    Decl(GenDecl),
    If {
        init: Option<Box<Stmt>>,
        cond: Expr,
        then: Block,
        /// Either another `If` or a `Block`.
        els: Option<Box<Stmt>>,
        span: Span,
    },
    For {
        init: Option<Box<Stmt>>,
        cond: Option<Expr>,
        post: Option<Box<Stmt>>,
        body: Block,
        span: Span,
    },
    /// `break` / `continue`
    Branch {
        keyword: String,
        span: Span,
    },
    Block(Block),
}

impl Stmt {
    pub fn span(&self) -> Span {
        match self {
            Stmt::Expr(e) => e.span(),
            Stmt::Return { span, .. }
            | Stmt::Define { span, .. }
            | Stmt::Assign { span, .. }
            | Stmt::IncDec { span, .. }
            | Stmt::If { span, .. }
            | Stmt::For { span, .. }
            | Stmt::Branch { span, .. } => *span,
            Stmt::Decl(g) => g.span,
            Stmt::Block(b) => b.span,
        }
    }
}

// ============================================================================
// Expressions
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LitKind {
    Int,
    Float,
    Char,
    String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Ident(Ident),
    /// `x.sel`
    Selector {
        x: Box<Expr>,
        sel: Ident,
        span: Span,
    },
    /// `fun(args)`
    Call {
        id: NodeId,
        fun: Box<Expr>,
        args: Vec<Expr>,
        span: Span,
    },
    /// `x[index]`
    Index {
        x: Box<Expr>,
        index: Box<Expr>,
        span: Span,
    },
    Unary {
        op: String,
        x: Box<Expr>,
        span: Span,
    },
    Binary {
        op: String,
        x: Box<Expr>,
        y: Box<Expr>,
        span: Span,
    },
    /// Literal kept in its source spelling.
    Lit {
        kind: LitKind,
        value: String,
        span: Span,
    },
    Paren {
        x: Box<Expr>,
        span: Span,
    },
}

impl Expr {
    pub fn span(&self) -> Span {
        match self {
            Expr::Ident(id) => id.span,
            Expr::Selector { span, .. }
            | Expr::Call { span, .. }
            | Expr::Index { span, .. }
            | Expr::Unary { span, .. }
            | Expr::Binary { span, .. }
            | Expr::Lit { span, .. }
            | Expr::Paren { span, .. } => *span,
        }
    }

    /// The expression with any enclosing parentheses removed.
    pub fn unparen(&self) -> &Expr {
        match self {
            Expr::Paren { x, .. } => x.unparen(),
            other => other,
        }
    }

    /// Binding precedence of a binary operator (higher binds tighter).
    pub fn precedence(op: &str) -> u8 {
        match op {
            "||" => 1,
            "&&" => 2,
            "==" | "!=" | "<" | "<=" | ">" | ">=" => 3,
            "+" | "-" | "|" | "^" => 4,
            "*" | "/" | "%" | "<<" | ">>" | "&" | "&^" => 5,
            _ => 0,
        }
    }
}
