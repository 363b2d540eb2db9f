//! The per-family rewrite pass.
//!
//! One `MigrationVisitor` walks a whole compilation unit bottom-up for a single structural
//! family. Calls whose declaring type belongs to the family are resolved against the catalog
//! and replaced by an instantiated template; everything that mentions one of the family's
//! legacy types (declarations, bindings, signatures, field constants) is retyped so the unit
//! stays consistent. Calls the catalog cannot handle are left as written and reported, and a
//! family call on top of such a leftover is kept as written too.

use std::collections::{BTreeSet, HashSet};

use tracing::{debug, info, warn};

use crate::parser::ast::*;
use crate::pretty::print_expr;
use crate::span::{Span, Spanned};
use crate::template::{ArgBinding, BindingSource, Template};
use crate::typeck::is_type_ref;
use crate::typeck::types::{simple_name, JavaType, MethodType, VarBinding, VarOwner};
use crate::visit::{walk_fold_expr, walk_fold_method, walk_fold_type_expr, walk_fold_unit, walk_fold_var_decls, Fold};

use super::catalog::{Catalog, Family, Resolution};
use super::events::{
    EventSink, MappingEvent, MAPPING_MISSING, MULTIPLE_MAPPINGS_POSSIBLE, NO_AUTOMATIC_MAPPING, TEMPLATE_FAILED,
};
use super::imports;
use super::type_map::{TypeMap, TypeTarget};

pub struct MigrationVisitor<'a> {
    catalog: &'a Catalog,
    family: &'a Family,
    sink: &'a mut dyn EventSink,
    /// Target-side imports requested by applied templates and retyped declarations.
    imports: BTreeSet<String>,
    changed: bool,
    /// Whether the expression folded last was itself replaced by a template.
    rewrote: bool,
    left: &'a mut LeftInPlace,
}

/// Legacy nodes a structural pass reported or kept, by source span. Shared by every pass over
/// one unit so a later family does not rewrite on top of an earlier family's leftovers.
#[derive(Debug, Default)]
pub struct LeftInPlace {
    spans: HashSet<Span>,
}

impl LeftInPlace {
    /// Template-made nodes share the dummy span and are never recorded.
    pub fn insert(&mut self, span: Span) {
        if !span.is_dummy() {
            self.spans.insert(span);
        }
    }

    pub fn contains(&self, span: Span) -> bool {
        self.spans.contains(&span)
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }
}

impl<'a> MigrationVisitor<'a> {
    pub fn new(catalog: &'a Catalog, family: &'a Family, sink: &'a mut dyn EventSink, left: &'a mut LeftInPlace) -> Self {
        Self { catalog, family, sink, imports: BTreeSet::new(), changed: false, rewrote: false, left }
    }

    fn type_map(&self) -> &'a TypeMap {
        self.catalog.type_map()
    }

    /// Retarget the family's own legacy types inside `ty`; other families' types are left for their pass.
    fn retype(&self, ty: &JavaType) -> JavaType {
        let family = self.family;
        self.type_map().retarget_where(ty, &|fqn| family.owns(fqn))
    }

    fn owned_target(&self, ty: &JavaType) -> Option<&'a TypeTarget> {
        let JavaType::Class(fqn) = ty else { return None };
        if !self.family.owns(fqn) {
            return None;
        }
        self.type_map().target(fqn)
    }

    fn retype_method(&self, method: &mut MethodType) {
        method.ret = self.retype(&method.ret);
        method.params = method.params.iter().map(|p| self.retype(p)).collect();
    }

    // ========================================================================
    // Calls
    // ========================================================================

    fn fold_call(&mut self, expr: Spanned<Expr>) -> Spanned<Expr> {
        if let Some((fused, rewrote)) = self.try_fusion(&expr) {
            self.rewrote = rewrote;
            return fused;
        }
        let original = expr.clone();
        let (folded, residue) = self.fold_call_children(expr);
        let declaring = folded.node.method_type().map(|m| m.declaring.as_str());
        if residue && declaring.is_some_and(|d| self.type_map().is_legacy_name(d)) {
            // The value still depends on the leftover, whichever family owns this call.
            self.left.insert(original.span);
            let catalog = self.catalog;
            if declaring.and_then(|d| catalog.group_for(d)).is_some_and(|g| self.family.owns(&g.legacy)) {
                debug!(family = %self.family.name, snippet = %print_expr(&original.node), "operand was left in place, keeping the enclosing call");
                self.rewrote = false;
                return original;
            }
        }
        self.rewrite_call(folded, original)
    }

    /// Fold one operand. The flag is set when the operand is a legacy value some pass reported
    /// or kept, which no template may be applied on top of.
    fn fold_operand(&mut self, expr: Spanned<Expr>) -> (Spanned<Expr>, bool) {
        let folded = self.fold_expr(expr);
        let residue = self.is_left_in_place(&folded);
        (folded, residue)
    }

    fn is_left_in_place(&self, expr: &Spanned<Expr>) -> bool {
        match &expr.node.kind {
            ExprKind::Paren(inner) => self.is_left_in_place(inner),
            _ => self.left.contains(expr.span) && self.type_map().is_legacy(&expr.node.ty),
        }
    }

    fn fold_call_children(&mut self, expr: Spanned<Expr>) -> (Spanned<Expr>, bool) {
        let Spanned { node: Expr { kind, ty }, span } = expr;
        let mut residue = false;
        let kind = match kind {
            ExprKind::MethodCall { select, name, args, method } => {
                let select = select.map(|s| {
                    let (s, kept) = self.fold_operand(*s);
                    residue |= kept;
                    Box::new(s)
                });
                let args = self.fold_args(args, method.as_ref(), &mut residue);
                ExprKind::MethodCall { select, name, args, method }
            }
            ExprKind::New { class, args, method } => {
                let args = self.fold_args(args, method.as_ref(), &mut residue);
                ExprKind::New { class, args, method }
            }
            other => other,
        };
        (Spanned::new(Expr { kind, ty }, span), residue)
    }

    fn fold_args(
        &mut self,
        args: Vec<Spanned<Expr>>,
        parent: Option<&MethodType>,
        residue: &mut bool,
    ) -> Vec<Spanned<Expr>> {
        let type_map = self.type_map();
        let mut out = Vec::with_capacity(args.len());
        for (pos, arg) in args.into_iter().enumerate() {
            if boundary_allows(type_map, parent, pos) {
                let (folded, leftover) = self.fold_operand(arg);
                *residue |= leftover;
                out.push(folded);
                continue;
            }
            let kept = arg.clone();
            let (folded, leftover) = self.fold_operand(arg);
            *residue |= leftover;
            if self.rewrote {
                debug!(position = pos, "rewritten argument has no fixed parameter slot, keeping original");
                self.rewrote = false;
                out.push(kept);
            } else {
                out.push(folded);
            }
        }
        out
    }

    /// `inner(..).outer(..)` on one legacy type, rewritten as a single expression. The flag
    /// tells whether the returned node is a rewrite or the chain kept as written.
    fn try_fusion(&mut self, expr: &Spanned<Expr>) -> Option<(Spanned<Expr>, bool)> {
        let ExprKind::MethodCall { select: Some(select), args, method: Some(outer), .. } = &expr.node.kind else {
            return None;
        };
        let ExprKind::MethodCall { select: inner_select, args: inner_args, method: Some(inner), .. } = &select.node.kind
        else {
            return None;
        };
        let catalog = self.catalog;
        let fusion = catalog.fusion_for(outer, inner)?;
        let group = catalog.group_for(&outer.declaring)?;
        if !self.family.owns(&group.legacy) {
            return None;
        }
        let inner_receiver = inner_select.as_deref().filter(|s| !is_type_ref(&s.node));
        let raw = BindingSource { receiver: None, args, inner_receiver, inner_args };
        if fusion.binding.bind(raw).is_err() {
            return None;
        }

        let outer = outer.clone();
        let mut residue = false;
        let mut operand = |this: &mut Self, e: Spanned<Expr>| {
            let (folded, kept) = this.fold_operand(e);
            residue |= kept;
            folded
        };
        let inner_receiver = inner_receiver.cloned().map(|r| operand(self, r));
        let inner_args: Vec<_> = inner_args.iter().cloned().map(|a| operand(self, a)).collect();
        let args: Vec<_> = args.iter().cloned().map(|a| operand(self, a)).collect();
        if residue {
            debug!(family = %self.family.name, "operand was left in place, keeping the chain");
            self.left.insert(expr.span);
            return Some((expr.clone(), false));
        }
        let src = BindingSource { receiver: None, args: &args, inner_receiver: inner_receiver.as_ref(), inner_args: &inner_args };
        match fusion.binding.bind(src).and_then(|bound| fusion.template.instantiate(bound)) {
            Ok(mut fused) => {
                debug!(family = %self.family.name, outer = %fusion.outer, inner = %fusion.inner, "fused call chain");
                fused.span = expr.span;
                self.imports.extend(fusion.template.imports().iter().cloned());
                self.changed = true;
                Some((fused, true))
            }
            Err(err) => {
                warn!(%err, template = fusion.template.code(), "fusion template could not be applied");
                Some((self.flag(&outer, expr.clone(), TEMPLATE_FAILED), false))
            }
        }
    }

    fn rewrite_call(&mut self, expr: Spanned<Expr>, original: Spanned<Expr>) -> Spanned<Expr> {
        self.rewrote = false;
        let Some(method) = expr.node.method_type().cloned() else { return expr };
        if !self.type_map().is_legacy_name(&method.declaring) {
            return self.retype_foreign_call(expr);
        }
        let catalog = self.catalog;
        let Some(group) = catalog.group_for(&method.declaring) else { return expr };
        if !self.family.owns(&group.legacy) {
            return expr;
        }

        let receiver = receiver_type(&original.node);
        match catalog.resolve(group, &method, receiver.as_ref()) {
            Resolution::Matched(template, binding) => self.apply(expr, original, &method, template, binding),
            Resolution::Retained => {
                let mut expr = expr;
                expr.node.ty = self.retype(&expr.node.ty);
                expr
            }
            Resolution::Ambiguous => self.flag(&method, original, MULTIPLE_MAPPINGS_POSSIBLE),
            Resolution::Unsupported => self.flag(&method, original, NO_AUTOMATIC_MAPPING),
            Resolution::NoMatch => self.flag(&method, original, MAPPING_MISSING),
        }
    }

    fn apply(
        &mut self,
        expr: Spanned<Expr>,
        original: Spanned<Expr>,
        method: &MethodType,
        template: &Template,
        binding: &ArgBinding,
    ) -> Spanned<Expr> {
        let (receiver, args) = match &expr.node.kind {
            ExprKind::MethodCall { select, args, .. } => {
                (select.as_deref().filter(|s| !is_type_ref(&s.node)), args.as_slice())
            }
            ExprKind::New { args, .. } => (None, args.as_slice()),
            _ => (None, &[][..]),
        };
        let src = BindingSource { receiver, args, ..BindingSource::default() };
        match binding.bind(src).and_then(|bound| template.instantiate(bound)) {
            Ok(mut rewritten) => {
                debug!(family = %self.family.name, call = %method.signature(), template = template.code(), "applied template");
                rewritten.span = original.span;
                self.imports.extend(template.imports().iter().cloned());
                self.changed = true;
                self.rewrote = true;
                rewritten
            }
            Err(err) => {
                warn!(%err, call = %method.signature(), "template could not be applied");
                self.flag(method, original, TEMPLATE_FAILED)
            }
        }
    }

    /// A call on user code whose signature mentions a legacy type keeps its shape but not its types.
    fn retype_foreign_call(&self, mut expr: Spanned<Expr>) -> Spanned<Expr> {
        expr.node.ty = self.retype(&expr.node.ty);
        if let ExprKind::MethodCall { method: Some(m), .. } | ExprKind::New { method: Some(m), .. } = &mut expr.node.kind {
            self.retype_method(m);
        }
        expr
    }

    fn flag(&mut self, method: &MethodType, original: Spanned<Expr>, message: &str) -> Spanned<Expr> {
        let event = MappingEvent::informational(method.declaring.clone(), print_expr(&original.node), message);
        info!(declaring = %event.declaring_type, snippet = %event.snippet, "{message}");
        self.sink.record(event);
        self.left.insert(original.span);
        self.rewrote = false;
        original
    }

    // ========================================================================
    // Type propagation
    // ========================================================================

    fn retype_expr(&mut self, expr: Spanned<Expr>) -> Spanned<Expr> {
        let Spanned { node: Expr { kind, ty }, span } = expr;
        let kind = match kind {
            // Type and package names are retargeted by the call that uses them, or by the final phase.
            kind @ (ExprKind::Ident { binding: None, .. } | ExprKind::FieldAccess { binding: None, .. }) => {
                return Spanned::new(Expr { kind, ty }, span);
            }
            ExprKind::Ident { name, binding: Some(mut binding) } => {
                binding.ty = self.retype(&binding.ty);
                ExprKind::Ident { name, binding: Some(binding) }
            }
            ExprKind::FieldAccess { target, name, binding: Some(binding) } => {
                if let Some(constant) = self.replace_constant(&target, &name, &binding, &ty) {
                    return Spanned::new(constant, span);
                }
                let binding = VarBinding { ty: self.retype(&binding.ty), ..binding };
                ExprKind::FieldAccess { target, name, binding: Some(binding) }
            }
            other => other,
        };
        let ty = self.retype(&ty);
        Spanned::new(Expr { kind, ty }, span)
    }

    /// A named constant with a field rule, rewritten to the target constant.
    fn replace_constant(
        &mut self,
        target: &Spanned<Expr>,
        name: &Spanned<String>,
        binding: &VarBinding,
        ty: &JavaType,
    ) -> Option<Expr> {
        let VarOwner::Field(declaring) = &binding.owner else { return None };
        let (group, rule) = self.catalog.field_rule(declaring, &name.node)?;
        if !self.family.owns(&group.legacy) {
            return None;
        }
        debug!(family = %self.family.name, field = %rule.pattern, target = %rule.target, "replaced named constant");

        let qualifier = Expr::typed(
            ExprKind::Ident { name: simple_name(&rule.target).to_string(), binding: None },
            JavaType::class(rule.target.clone()),
        );
        let ty = self.retype(ty);
        let binding = VarBinding { name: rule.name.clone(), ty: ty.clone(), owner: VarOwner::Field(rule.target.clone()) };
        self.imports.insert(rule.target.clone());
        self.changed = true;
        self.rewrote = true;
        let kind = ExprKind::FieldAccess {
            target: Box::new(Spanned::new(qualifier, target.span)),
            name: Spanned::new(rule.name.clone(), name.span),
            binding: Some(binding),
        };
        Some(Expr { kind, ty })
    }
}

/// Static type of the call's receiver, if it has a value receiver.
fn receiver_type(call: &Expr) -> Option<JavaType> {
    match &call.kind {
        ExprKind::MethodCall { select: Some(select), .. } if !is_type_ref(&select.node) => Some(select.node.ty.clone()),
        _ => None,
    }
}

/// Whether a rewritten argument at `pos` may replace the original inside `parent`.
///
/// Legacy parents are themselves about to be rewritten and always accept. Otherwise only a
/// position past the declared parameter list is in doubt, and it is accepted only when the
/// last parameter is an array (a variable-arity tail).
fn boundary_allows(type_map: &TypeMap, parent: Option<&MethodType>, pos: usize) -> bool {
    let Some(parent) = parent else { return true };
    if type_map.is_legacy_name(&parent.declaring) {
        return true;
    }
    if pos > parent.params.len() {
        return parent.params.last().is_some_and(JavaType::is_array);
    }
    true
}

impl Fold for MigrationVisitor<'_> {
    fn fold_unit(&mut self, unit: CompilationUnit) -> CompilationUnit {
        let unit = walk_fold_unit(self, unit);
        if !self.changed {
            return unit;
        }
        let type_map = self.type_map();
        imports::maintain(unit, &self.imports, |fqn| type_map.is_legacy_name(fqn))
    }

    fn fold_method(&mut self, method: Spanned<MethodDecl>) -> Spanned<MethodDecl> {
        let mut method = walk_fold_method(self, method);
        if let Some(m) = &mut method.node.method {
            let before = m.clone();
            self.retype_method(m);
            self.changed |= *m != before;
        }
        method
    }

    fn fold_var_decls(&mut self, decls: VarDecls) -> VarDecls {
        let mut decls = walk_fold_var_decls(self, decls);
        for var in &mut decls.vars {
            var.ty = self.retype(&var.ty);
        }
        decls
    }

    fn fold_expr(&mut self, expr: Spanned<Expr>) -> Spanned<Expr> {
        if matches!(expr.node.kind, ExprKind::MethodCall { .. } | ExprKind::New { .. }) {
            return self.fold_call(expr);
        }
        let expr = walk_fold_expr(self, expr);
        self.rewrote = false;
        self.retype_expr(expr)
    }

    fn fold_type_expr(&mut self, te: Spanned<TypeExpr>) -> Spanned<TypeExpr> {
        let te = walk_fold_type_expr(self, te);
        te.map(|t| match t {
            TypeExpr::Named { name, args, ty } => match self.owned_target(&ty) {
                Some(target) => {
                    let written = if name.contains('.') {
                        target.fqn.clone()
                    } else {
                        self.imports.insert(target.fqn.clone());
                        target.short_name.clone()
                    };
                    self.changed = true;
                    TypeExpr::Named { name: written, args, ty: JavaType::class(target.fqn.clone()) }
                }
                None => TypeExpr::Named { name, args, ty },
            },
            other => other,
        })
    }
}
