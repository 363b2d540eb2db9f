use crate::span::Spanned;
use crate::typeck::types::{JavaType, MethodType, Prim, VarBinding};

#[derive(Debug, Clone, PartialEq)]
pub struct CompilationUnit {
    pub package: Option<Spanned<String>>,
    pub imports: Vec<Spanned<ImportDecl>>,
    pub classes: Vec<Spanned<ClassDecl>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportDecl {
    /// Dotted path without the trailing `.*`.
    pub path: String,
    pub is_static: bool,
    pub is_star: bool,
}

impl ImportDecl {
    pub fn single(path: impl Into<String>) -> Self {
        Self { path: path.into(), is_static: false, is_star: false }
    }

    /// Simple name this import binds, if it is a single-type import.
    pub fn binding_name(&self) -> Option<&str> {
        if self.is_star || self.is_static {
            None
        } else {
            Some(crate::typeck::types::simple_name(&self.path))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassKind {
    Class,
    Interface,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassDecl {
    pub modifiers: Vec<String>,
    pub kind: ClassKind,
    pub name: Spanned<String>,
    pub extends: Vec<Spanned<TypeExpr>>,
    pub implements: Vec<Spanned<TypeExpr>>,
    pub members: Vec<Member>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Member {
    Field(Spanned<VarDecls>),
    Method(Spanned<MethodDecl>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodDecl {
    pub modifiers: Vec<String>,
    /// `None` for constructors.
    pub return_type: Option<Spanned<TypeExpr>>,
    pub name: Spanned<String>,
    pub params: Vec<Param>,
    /// `None` for abstract and interface methods.
    pub body: Option<Spanned<Block>>,
    pub method: Option<MethodType>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub modifiers: Vec<String>,
    pub ty: Spanned<TypeExpr>,
    pub name: Spanned<String>,
    pub varargs: bool,
}

impl Param {
    pub fn resolved(&self) -> JavaType {
        let ty = self.ty.node.resolved();
        if self.varargs { JavaType::array_of(ty) } else { ty }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub stmts: Vec<Spanned<Stmt>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    LocalVar(VarDecls),
    Expr(Spanned<Expr>),
    Return(Option<Spanned<Expr>>),
    If {
        cond: Spanned<Expr>,
        then_branch: Box<Spanned<Stmt>>,
        else_branch: Option<Box<Spanned<Stmt>>>,
    },
    While {
        cond: Spanned<Expr>,
        body: Box<Spanned<Stmt>>,
    },
    Block(Spanned<Block>),
    Empty,
}

/// A declaration group: `final DateTime a = x, b[] = y;`.
#[derive(Debug, Clone, PartialEq)]
pub struct VarDecls {
    pub modifiers: Vec<String>,
    pub ty: Spanned<TypeExpr>,
    pub vars: Vec<NamedVar>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NamedVar {
    pub name: Spanned<String>,
    /// Extra `[]` written after the name.
    pub dims: usize,
    pub init: Option<Spanned<Expr>>,
    pub ty: JavaType,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeExpr {
    /// A class type as written (simple or qualified), with its resolved type.
    Named {
        name: String,
        args: Vec<Spanned<TypeExpr>>,
        ty: JavaType,
    },
    Primitive(Prim),
    Void,
    Array(Box<Spanned<TypeExpr>>),
}

impl TypeExpr {
    pub fn named(name: impl Into<String>) -> Self {
        TypeExpr::Named { name: name.into(), args: Vec::new(), ty: JavaType::Unknown }
    }

    pub fn resolved(&self) -> JavaType {
        match self {
            TypeExpr::Named { ty, .. } => ty.clone(),
            TypeExpr::Primitive(p) => JavaType::Primitive(*p),
            TypeExpr::Void => JavaType::Void,
            TypeExpr::Array(inner) => JavaType::array_of(inner.node.resolved()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub ty: JavaType,
}

impl Expr {
    pub fn new(kind: ExprKind) -> Self {
        Self { kind, ty: JavaType::Unknown }
    }

    pub fn typed(kind: ExprKind, ty: JavaType) -> Self {
        Self { kind, ty }
    }

    pub fn method_type(&self) -> Option<&MethodType> {
        match &self.kind {
            ExprKind::MethodCall { method, .. } | ExprKind::New { method, .. } => method.as_ref(),
            _ => None,
        }
    }

    pub fn binding(&self) -> Option<&VarBinding> {
        match &self.kind {
            ExprKind::Ident { binding, .. } | ExprKind::FieldAccess { binding, .. } => binding.as_ref(),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Literal {
        kind: LitKind,
        text: String,
    },
    This,
    /// A simple name. `binding` is `None` for type and package names.
    Ident {
        name: String,
        binding: Option<VarBinding>,
    },
    FieldAccess {
        target: Box<Spanned<Expr>>,
        name: Spanned<String>,
        binding: Option<VarBinding>,
    },
    MethodCall {
        select: Option<Box<Spanned<Expr>>>,
        name: Spanned<String>,
        args: Vec<Spanned<Expr>>,
        method: Option<MethodType>,
    },
    New {
        class: Spanned<TypeExpr>,
        args: Vec<Spanned<Expr>>,
        method: Option<MethodType>,
    },
    NewArray {
        elem: Spanned<TypeExpr>,
        dims: Vec<Spanned<Expr>>,
        extra_dims: usize,
        init: Option<Vec<Spanned<Expr>>>,
    },
    ArrayInit(Vec<Spanned<Expr>>),
    ArrayAccess {
        array: Box<Spanned<Expr>>,
        index: Box<Spanned<Expr>>,
    },
    Assign {
        op: AssignOp,
        target: Box<Spanned<Expr>>,
        value: Box<Spanned<Expr>>,
    },
    Binary {
        op: BinOp,
        lhs: Box<Spanned<Expr>>,
        rhs: Box<Spanned<Expr>>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Spanned<Expr>>,
    },
    Cast {
        ty: Spanned<TypeExpr>,
        expr: Box<Spanned<Expr>>,
    },
    Paren(Box<Spanned<Expr>>),
    Conditional {
        cond: Box<Spanned<Expr>>,
        then_expr: Box<Spanned<Expr>>,
        else_expr: Box<Spanned<Expr>>,
    },
    /// Template slot, numbered by occurrence.
    Placeholder {
        index: usize,
        ty: JavaType,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LitKind {
    Int,
    Float,
    String,
    Char,
    Bool,
    Null,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    Assign,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Or,
    And,
    Eq,
    Neq,
    Lt,
    Gt,
    LtEq,
    GtEq,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Plus,
    Not,
    PreInc,
    PreDec,
    PostInc,
    PostDec,
}
