/// Composition utilities for common visitor patterns.
///
/// Helpers for detecting nodes and collecting the types a compilation unit
/// mentions. The type collectors back rule preconditions and import maintenance.
///
/// # Examples
///
/// ```ignore
/// use chronoport::visit::composers::*;
///
/// // Does this unit still mention any Joda type?
/// let legacy = uses_type(&unit, |fqn| fqn.starts_with("org.joda.time."));
/// ```

use crate::parser::ast::*;
use crate::span::Spanned;
use crate::typeck::types::{simple_name, JavaType, MethodType};
use crate::visit::{walk_expr, walk_type_expr, walk_var_decls, walk_method, Visitor};
use std::collections::BTreeSet;

// ============================================================================
// Detection
// ============================================================================

/// Check if an expression tree contains any expression matching a predicate.
///
/// Short-circuits on first match.
pub fn contains_expr<F>(expr: &Spanned<Expr>, predicate: F) -> bool
where
    F: Fn(&Expr) -> bool,
{
    struct Detector<F> {
        predicate: F,
        found: bool,
    }

    impl<F> Visitor for Detector<F>
    where
        F: Fn(&Expr) -> bool,
    {
        fn visit_expr(&mut self, expr: &Spanned<Expr>) {
            if self.found {
                return;
            }
            if (self.predicate)(&expr.node) {
                self.found = true;
                return; // Short-circuit
            }
            walk_expr(self, expr);
        }
    }

    let mut detector = Detector {
        predicate,
        found: false,
    };
    detector.visit_expr(expr);
    detector.found
}

// ============================================================================
// Type Usage
// ============================================================================

/// Collects every class name the unit mentions: node types, bindings, method
/// signatures, declared types and single-type imports.
#[derive(Default)]
struct TypeCollector {
    types: BTreeSet<String>,
}

impl TypeCollector {
    fn add(&mut self, ty: &JavaType) {
        if let Some(fqn) = ty.element().fqn() {
            self.types.insert(fqn.to_string());
        }
    }

    fn add_method(&mut self, m: &MethodType) {
        self.types.insert(m.declaring.clone());
        for p in &m.params {
            self.add(p);
        }
        self.add(&m.ret);
    }
}

impl Visitor for TypeCollector {
    fn visit_import(&mut self, import: &Spanned<ImportDecl>) {
        if !import.node.is_star && !import.node.is_static {
            self.types.insert(import.node.path.clone());
        }
    }

    fn visit_method(&mut self, method: &Spanned<MethodDecl>) {
        if let Some(m) = &method.node.method {
            self.add_method(m);
        }
        walk_method(self, method);
    }

    fn visit_var_decls(&mut self, decls: &VarDecls) {
        for var in &decls.vars {
            self.add(&var.ty);
        }
        walk_var_decls(self, decls);
    }

    fn visit_expr(&mut self, expr: &Spanned<Expr>) {
        self.add(&expr.node.ty);
        if let Some(m) = expr.node.method_type() {
            self.add_method(m);
        }
        if let Some(b) = expr.node.binding() {
            self.add(&b.ty);
        }
        walk_expr(self, expr);
    }

    fn visit_type_expr(&mut self, te: &Spanned<TypeExpr>) {
        self.add(&te.node.resolved());
        walk_type_expr(self, te);
    }
}

/// All fully-qualified class names the unit mentions, printed or not.
pub fn types_in_use(unit: &CompilationUnit) -> BTreeSet<String> {
    let mut collector = TypeCollector::default();
    collector.visit_unit(unit);
    collector.types
}

/// Whether any type the unit mentions satisfies the predicate.
pub fn uses_type(unit: &CompilationUnit, predicate: impl Fn(&str) -> bool) -> bool {
    types_in_use(unit).iter().any(|fqn| predicate(fqn))
}

/// Class names that appear in the printed source under their simple name and therefore
/// need an import (or same-package / `java.lang` visibility).
pub fn printed_type_names(unit: &CompilationUnit) -> BTreeSet<String> {
    #[derive(Default)]
    struct Printed {
        types: BTreeSet<String>,
    }

    impl Printed {
        fn add_if_simple(&mut self, written: &str, ty: &JavaType) {
            if let Some(fqn) = ty.element().fqn() {
                if !written.contains('.') && simple_name(fqn) == written {
                    self.types.insert(fqn.to_string());
                }
            }
        }
    }

    impl Visitor for Printed {
        fn visit_type_expr(&mut self, te: &Spanned<TypeExpr>) {
            if let TypeExpr::Named { name, ty, .. } = &te.node {
                self.add_if_simple(name, ty);
            }
            walk_type_expr(self, te);
        }

        fn visit_expr(&mut self, expr: &Spanned<Expr>) {
            // A bare type qualifier such as `Duration` in `Duration.ofDays(1)`.
            if let ExprKind::Ident { name, binding: None } = &expr.node.kind {
                self.add_if_simple(name, &expr.node.ty);
            }
            walk_expr(self, expr);
        }
    }

    let mut printed = Printed::default();
    printed.visit_unit(unit);
    printed.types
}
