//! AST visitor pattern infrastructure
//!
//! This module provides two traversal traits and corresponding walk functions for the
//! Java host tree:
//!
//! - `Visitor`: immutable reference traversal (for analysis/collection passes)
//! - `Fold`: ownership-based rewriting: every `fold_*` method takes a node by value and
//!   returns the node that replaces it in its parent's slot. Nothing is mutated in place;
//!   untouched subtrees are moved through unchanged.
//!
//! ## Usage
//!
//! Implement the trait for your pass, overriding only the methods you need.
//! Call the corresponding `walk_*` / `walk_fold_*` function inside your override to get
//! default recursion.
//!
//! ```ignore
//! use chronoport::visit::{Visitor, walk_expr};
//! use chronoport::parser::ast::{Expr, ExprKind};
//! use chronoport::span::Spanned;
//! use std::collections::HashSet;
//!
//! struct IdentCollector {
//!     names: HashSet<String>,
//! }
//!
//! impl Visitor for IdentCollector {
//!     fn visit_expr(&mut self, expr: &Spanned<Expr>) {
//!         if let ExprKind::Ident { name, .. } = &expr.node.kind {
//!             self.names.insert(name.clone());
//!         }
//!         walk_expr(self, expr); // Continue recursion
//!     }
//! }
//! ```
//!
//! Folds recurse bottom-up when the override calls `walk_fold_expr` first and inspects the
//! result afterwards; that is how the migration visitor sees already-rewritten arguments.

pub mod composers;

use crate::parser::ast::*;
use crate::span::Spanned;

// ============================================================================
// Visitor Trait (Read-Only)
// ============================================================================

/// Read-only AST visitor. Default implementations recurse into all children.
/// Override specific methods to intercept nodes of interest.
///
/// Call the corresponding `walk_*` function inside your override to continue
/// the default recursion after your custom logic. Omit the walk call to prune
/// traversal at that node.
pub trait Visitor: Sized {
    fn visit_unit(&mut self, unit: &CompilationUnit) {
        walk_unit(self, unit);
    }

    fn visit_import(&mut self, _import: &Spanned<ImportDecl>) {}

    fn visit_class(&mut self, class: &Spanned<ClassDecl>) {
        walk_class(self, class);
    }

    fn visit_method(&mut self, method: &Spanned<MethodDecl>) {
        walk_method(self, method);
    }

    fn visit_var_decls(&mut self, decls: &VarDecls) {
        walk_var_decls(self, decls);
    }

    fn visit_block(&mut self, block: &Spanned<Block>) {
        walk_block(self, block);
    }

    fn visit_stmt(&mut self, stmt: &Spanned<Stmt>) {
        walk_stmt(self, stmt);
    }

    fn visit_expr(&mut self, expr: &Spanned<Expr>) {
        walk_expr(self, expr);
    }

    fn visit_type_expr(&mut self, te: &Spanned<TypeExpr>) {
        walk_type_expr(self, te);
    }
}

// ============================================================================
// Walk Functions (Read-Only)
// ============================================================================

pub fn walk_unit<V: Visitor>(v: &mut V, unit: &CompilationUnit) {
    for imp in &unit.imports {
        v.visit_import(imp);
    }
    for class in &unit.classes {
        v.visit_class(class);
    }
}

pub fn walk_class<V: Visitor>(v: &mut V, class: &Spanned<ClassDecl>) {
    for t in class.node.extends.iter().chain(&class.node.implements) {
        v.visit_type_expr(t);
    }
    for member in &class.node.members {
        match member {
            Member::Field(decls) => v.visit_var_decls(&decls.node),
            Member::Method(method) => v.visit_method(method),
        }
    }
}

pub fn walk_method<V: Visitor>(v: &mut V, method: &Spanned<MethodDecl>) {
    if let Some(ret) = &method.node.return_type {
        v.visit_type_expr(ret);
    }
    for p in &method.node.params {
        v.visit_type_expr(&p.ty);
    }
    if let Some(body) = &method.node.body {
        v.visit_block(body);
    }
}

pub fn walk_var_decls<V: Visitor>(v: &mut V, decls: &VarDecls) {
    v.visit_type_expr(&decls.ty);
    for var in &decls.vars {
        if let Some(init) = &var.init {
            v.visit_expr(init);
        }
    }
}

pub fn walk_block<V: Visitor>(v: &mut V, block: &Spanned<Block>) {
    for stmt in &block.node.stmts {
        v.visit_stmt(stmt);
    }
}

pub fn walk_stmt<V: Visitor>(v: &mut V, stmt: &Spanned<Stmt>) {
    match &stmt.node {
        Stmt::LocalVar(decls) => v.visit_var_decls(decls),
        Stmt::Expr(expr) => v.visit_expr(expr),
        Stmt::Return(value) => {
            if let Some(value) = value {
                v.visit_expr(value);
            }
        }
        Stmt::If { cond, then_branch, else_branch } => {
            v.visit_expr(cond);
            v.visit_stmt(then_branch);
            if let Some(else_branch) = else_branch {
                v.visit_stmt(else_branch);
            }
        }
        Stmt::While { cond, body } => {
            v.visit_expr(cond);
            v.visit_stmt(body);
        }
        Stmt::Block(block) => v.visit_block(block),
        Stmt::Empty => {}
    }
}

pub fn walk_expr<V: Visitor>(v: &mut V, expr: &Spanned<Expr>) {
    match &expr.node.kind {
        ExprKind::Literal { .. } | ExprKind::This | ExprKind::Ident { .. } | ExprKind::Placeholder { .. } => {}
        ExprKind::FieldAccess { target, .. } => v.visit_expr(target),
        ExprKind::MethodCall { select, args, .. } => {
            if let Some(select) = select {
                v.visit_expr(select);
            }
            for arg in args {
                v.visit_expr(arg);
            }
        }
        ExprKind::New { class, args, .. } => {
            v.visit_type_expr(class);
            for arg in args {
                v.visit_expr(arg);
            }
        }
        ExprKind::NewArray { elem, dims, init, .. } => {
            v.visit_type_expr(elem);
            for d in dims {
                v.visit_expr(d);
            }
            for e in init.iter().flatten() {
                v.visit_expr(e);
            }
        }
        ExprKind::ArrayInit(elems) => {
            for e in elems {
                v.visit_expr(e);
            }
        }
        ExprKind::ArrayAccess { array, index } => {
            v.visit_expr(array);
            v.visit_expr(index);
        }
        ExprKind::Assign { target, value, .. } => {
            v.visit_expr(target);
            v.visit_expr(value);
        }
        ExprKind::Binary { lhs, rhs, .. } => {
            v.visit_expr(lhs);
            v.visit_expr(rhs);
        }
        ExprKind::Unary { operand, .. } => v.visit_expr(operand),
        ExprKind::Cast { ty, expr } => {
            v.visit_type_expr(ty);
            v.visit_expr(expr);
        }
        ExprKind::Paren(inner) => v.visit_expr(inner),
        ExprKind::Conditional { cond, then_expr, else_expr } => {
            v.visit_expr(cond);
            v.visit_expr(then_expr);
            v.visit_expr(else_expr);
        }
    }
}

pub fn walk_type_expr<V: Visitor>(v: &mut V, te: &Spanned<TypeExpr>) {
    match &te.node {
        TypeExpr::Named { args, .. } => {
            for a in args {
                v.visit_type_expr(a);
            }
        }
        TypeExpr::Array(inner) => v.visit_type_expr(inner),
        TypeExpr::Primitive(_) | TypeExpr::Void => {}
    }
}

// ============================================================================
// Fold Trait (Ownership-Based Rewriting)
// ============================================================================

/// Rewriting traversal. Each method consumes a node and returns its replacement.
/// Default implementations rebuild the node from folded children.
pub trait Fold: Sized {
    fn fold_unit(&mut self, unit: CompilationUnit) -> CompilationUnit {
        walk_fold_unit(self, unit)
    }

    fn fold_class(&mut self, class: Spanned<ClassDecl>) -> Spanned<ClassDecl> {
        walk_fold_class(self, class)
    }

    fn fold_method(&mut self, method: Spanned<MethodDecl>) -> Spanned<MethodDecl> {
        walk_fold_method(self, method)
    }

    fn fold_var_decls(&mut self, decls: VarDecls) -> VarDecls {
        walk_fold_var_decls(self, decls)
    }

    fn fold_block(&mut self, block: Spanned<Block>) -> Spanned<Block> {
        walk_fold_block(self, block)
    }

    fn fold_stmt(&mut self, stmt: Spanned<Stmt>) -> Spanned<Stmt> {
        walk_fold_stmt(self, stmt)
    }

    fn fold_expr(&mut self, expr: Spanned<Expr>) -> Spanned<Expr> {
        walk_fold_expr(self, expr)
    }

    fn fold_type_expr(&mut self, te: Spanned<TypeExpr>) -> Spanned<TypeExpr> {
        walk_fold_type_expr(self, te)
    }
}

// ============================================================================
// Walk Functions (Fold)
// ============================================================================

pub fn walk_fold_unit<F: Fold>(f: &mut F, unit: CompilationUnit) -> CompilationUnit {
    CompilationUnit {
        package: unit.package,
        imports: unit.imports,
        classes: unit.classes.into_iter().map(|c| f.fold_class(c)).collect(),
    }
}

pub fn walk_fold_class<F: Fold>(f: &mut F, class: Spanned<ClassDecl>) -> Spanned<ClassDecl> {
    let Spanned { node, span } = class;
    let members = node
        .members
        .into_iter()
        .map(|m| match m {
            Member::Field(decls) => Member::Field(decls.map(|d| f.fold_var_decls(d))),
            Member::Method(method) => Member::Method(f.fold_method(method)),
        })
        .collect();
    Spanned::new(
        ClassDecl {
            extends: node.extends.into_iter().map(|t| f.fold_type_expr(t)).collect(),
            implements: node.implements.into_iter().map(|t| f.fold_type_expr(t)).collect(),
            members,
            ..node
        },
        span,
    )
}

pub fn walk_fold_method<F: Fold>(f: &mut F, method: Spanned<MethodDecl>) -> Spanned<MethodDecl> {
    let Spanned { node, span } = method;
    let params = node
        .params
        .into_iter()
        .map(|p| Param { ty: f.fold_type_expr(p.ty), ..p })
        .collect();
    Spanned::new(
        MethodDecl {
            return_type: node.return_type.map(|t| f.fold_type_expr(t)),
            params,
            body: node.body.map(|b| f.fold_block(b)),
            ..node
        },
        span,
    )
}

pub fn walk_fold_var_decls<F: Fold>(f: &mut F, decls: VarDecls) -> VarDecls {
    VarDecls {
        modifiers: decls.modifiers,
        ty: f.fold_type_expr(decls.ty),
        vars: decls
            .vars
            .into_iter()
            .map(|v| NamedVar { init: v.init.map(|e| f.fold_expr(e)), ..v })
            .collect(),
    }
}

pub fn walk_fold_block<F: Fold>(f: &mut F, block: Spanned<Block>) -> Spanned<Block> {
    block.map(|b| Block { stmts: b.stmts.into_iter().map(|s| f.fold_stmt(s)).collect() })
}

pub fn walk_fold_stmt<F: Fold>(f: &mut F, stmt: Spanned<Stmt>) -> Spanned<Stmt> {
    stmt.map(|s| match s {
        Stmt::LocalVar(decls) => Stmt::LocalVar(f.fold_var_decls(decls)),
        Stmt::Expr(expr) => Stmt::Expr(f.fold_expr(expr)),
        Stmt::Return(value) => Stmt::Return(value.map(|v| f.fold_expr(v))),
        Stmt::If { cond, then_branch, else_branch } => Stmt::If {
            cond: f.fold_expr(cond),
            then_branch: Box::new(f.fold_stmt(*then_branch)),
            else_branch: else_branch.map(|e| Box::new(f.fold_stmt(*e))),
        },
        Stmt::While { cond, body } => Stmt::While {
            cond: f.fold_expr(cond),
            body: Box::new(f.fold_stmt(*body)),
        },
        Stmt::Block(block) => Stmt::Block(f.fold_block(block)),
        Stmt::Empty => Stmt::Empty,
    })
}

fn fold_boxed<F: Fold>(f: &mut F, expr: Box<Spanned<Expr>>) -> Box<Spanned<Expr>> {
    Box::new(f.fold_expr(*expr))
}

pub fn walk_fold_expr<F: Fold>(f: &mut F, expr: Spanned<Expr>) -> Spanned<Expr> {
    let Spanned { node: Expr { kind, ty }, span } = expr;
    let kind = match kind {
        k @ (ExprKind::Literal { .. } | ExprKind::This | ExprKind::Ident { .. } | ExprKind::Placeholder { .. }) => k,
        ExprKind::FieldAccess { target, name, binding } => ExprKind::FieldAccess {
            target: fold_boxed(f, target),
            name,
            binding,
        },
        ExprKind::MethodCall { select, name, args, method } => ExprKind::MethodCall {
            select: select.map(|s| fold_boxed(f, s)),
            name,
            args: args.into_iter().map(|a| f.fold_expr(a)).collect(),
            method,
        },
        ExprKind::New { class, args, method } => ExprKind::New {
            class: f.fold_type_expr(class),
            args: args.into_iter().map(|a| f.fold_expr(a)).collect(),
            method,
        },
        ExprKind::NewArray { elem, dims, extra_dims, init } => ExprKind::NewArray {
            elem: f.fold_type_expr(elem),
            dims: dims.into_iter().map(|d| f.fold_expr(d)).collect(),
            extra_dims,
            init: init.map(|es| es.into_iter().map(|e| f.fold_expr(e)).collect()),
        },
        ExprKind::ArrayInit(elems) => ExprKind::ArrayInit(elems.into_iter().map(|e| f.fold_expr(e)).collect()),
        ExprKind::ArrayAccess { array, index } => ExprKind::ArrayAccess {
            array: fold_boxed(f, array),
            index: fold_boxed(f, index),
        },
        ExprKind::Assign { op, target, value } => ExprKind::Assign {
            op,
            target: fold_boxed(f, target),
            value: fold_boxed(f, value),
        },
        ExprKind::Binary { op, lhs, rhs } => ExprKind::Binary {
            op,
            lhs: fold_boxed(f, lhs),
            rhs: fold_boxed(f, rhs),
        },
        ExprKind::Unary { op, operand } => ExprKind::Unary { op, operand: fold_boxed(f, operand) },
        ExprKind::Cast { ty: cast_ty, expr } => ExprKind::Cast {
            ty: f.fold_type_expr(cast_ty),
            expr: fold_boxed(f, expr),
        },
        ExprKind::Paren(inner) => ExprKind::Paren(fold_boxed(f, inner)),
        ExprKind::Conditional { cond, then_expr, else_expr } => ExprKind::Conditional {
            cond: fold_boxed(f, cond),
            then_expr: fold_boxed(f, then_expr),
            else_expr: fold_boxed(f, else_expr),
        },
    };
    Spanned::new(Expr { kind, ty }, span)
}

pub fn walk_fold_type_expr<F: Fold>(f: &mut F, te: Spanned<TypeExpr>) -> Spanned<TypeExpr> {
    te.map(|t| match t {
        TypeExpr::Named { name, args, ty } => TypeExpr::Named {
            name,
            args: args.into_iter().map(|a| f.fold_type_expr(a)).collect(),
            ty,
        },
        TypeExpr::Array(inner) => TypeExpr::Array(Box::new(f.fold_type_expr(*inner))),
        other => other,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use crate::pretty::print_unit;

    struct CallCounter {
        calls: usize,
    }

    impl Visitor for CallCounter {
        fn visit_expr(&mut self, expr: &Spanned<Expr>) {
            if matches!(expr.node.kind, ExprKind::MethodCall { .. }) {
                self.calls += 1;
            }
            walk_expr(self, expr);
        }
    }

    #[test]
    fn visitor_counts_nested_calls() {
        let unit = parse("class A { void f() { a.b(c.d(), e()); if (x) { g(); } } }").unwrap();
        let mut counter = CallCounter { calls: 0 };
        counter.visit_unit(&unit);
        assert_eq!(counter.calls, 4);
    }

    struct Renamer;

    impl Fold for Renamer {
        fn fold_expr(&mut self, expr: Spanned<Expr>) -> Spanned<Expr> {
            let expr = walk_fold_expr(self, expr);
            match expr.node.kind {
                ExprKind::Ident { name, binding } if name == "old" => Spanned::new(
                    Expr { kind: ExprKind::Ident { name: "renamed".to_string(), binding }, ty: expr.node.ty },
                    expr.span,
                ),
                kind => Spanned::new(Expr { kind, ty: expr.node.ty }, expr.span),
            }
        }
    }

    #[test]
    fn fold_rebuilds_bottom_up() {
        let unit = parse("class A {\n    int f() {\n        return g(old, h(old)) + old;\n    }\n}\n").unwrap();
        let folded = Renamer.fold_unit(unit.clone());
        assert_eq!(
            print_unit(&folded),
            "class A {\n    int f() {\n        return g(renamed, h(renamed)) + renamed;\n    }\n}\n"
        );
        // The input value is untouched.
        assert!(print_unit(&unit).contains("g(old, h(old))"));
    }

    #[test]
    fn default_fold_is_identity() {
        struct Id;
        impl Fold for Id {}
        let unit = parse("class A {\n    DateTime[] xs = {a, b};\n\n    void f(long x) {\n        while (x > 0) x--;\n    }\n}\n").unwrap();
        assert_eq!(Id.fold_unit(unit.clone()), unit);
    }
}
