//! The three-phase rule pipeline: member renames, per-family structural rewrites, and the
//! final blanket type substitution.
//!
//! Order matters. Structural patterns are written against renamed members, and the type
//! substitution erases the legacy names every structural pattern keys on.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::parser::ast::*;
use crate::span::Spanned;
use crate::typeck::types::{JavaType, MethodType, VarBinding, VarOwner};
use crate::typeck::ClassLookup;
use crate::visit::composers::uses_type;
use crate::visit::{walk_fold_expr, walk_fold_method, walk_fold_type_expr, walk_fold_var_decls, Fold};

use super::catalog::{Catalog, Rename};
use super::events::EventSink;
use super::imports;
use super::type_map::TypeMap;
use super::visitor::{LeftInPlace, MigrationVisitor};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Rename,
    Structural,
    TypeSubstitution,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Phase::Rename => "rename",
            Phase::Structural => "structural",
            Phase::TypeSubstitution => "type-substitution",
        })
    }
}

/// One unit of work in the pipeline.
pub trait Rule: Send + Sync {
    fn name(&self) -> String;

    /// Whether the unit still contains anything this rule could act on.
    fn precondition(&self, unit: &CompilationUnit) -> bool;

    /// `left` carries the nodes earlier rules reported or kept in this unit.
    fn transform(&self, unit: CompilationUnit, sink: &mut dyn EventSink, left: &mut LeftInPlace) -> CompilationUnit;
}

// ============================================================================
// Phase 1: renames
// ============================================================================

pub struct RenameRule {
    catalog: Arc<Catalog>,
    rename: Rename,
}

impl RenameRule {
    pub fn new(catalog: Arc<Catalog>, rename: Rename) -> Self {
        Self { catalog, rename }
    }
}

impl Rule for RenameRule {
    fn name(&self) -> String {
        format!("rename {} -> {}", self.rename.pattern, self.rename.new_name)
    }

    fn precondition(&self, unit: &CompilationUnit) -> bool {
        let pattern = &self.rename.pattern;
        let classes = self.catalog.classpath();
        uses_type(unit, |fqn| {
            fqn == pattern.declaring || (pattern.match_overrides && classes.is_subclass(fqn, &pattern.declaring))
        })
    }

    fn transform(&self, unit: CompilationUnit, _sink: &mut dyn EventSink, _left: &mut LeftInPlace) -> CompilationUnit {
        let mut renamer = Renamer { rule: self, renamed: 0 };
        let unit = renamer.fold_unit(unit);
        if renamer.renamed > 0 {
            debug!(rule = %self.name(), calls = renamer.renamed, "renamed calls");
        }
        unit
    }
}

struct Renamer<'r> {
    rule: &'r RenameRule,
    renamed: usize,
}

impl Fold for Renamer<'_> {
    fn fold_expr(&mut self, expr: Spanned<Expr>) -> Spanned<Expr> {
        let mut expr = walk_fold_expr(self, expr);
        if let ExprKind::MethodCall { name, method: Some(method), .. } = &mut expr.node.kind {
            if self.rule.rename.pattern.matches_call(method, self.rule.catalog.classpath()) {
                name.node = self.rule.rename.new_name.clone();
                method.name = self.rule.rename.new_name.clone();
                self.renamed += 1;
            }
        }
        expr
    }
}

// ============================================================================
// Phase 2: structural families
// ============================================================================

pub struct StructuralRule {
    catalog: Arc<Catalog>,
    family: String,
}

impl StructuralRule {
    pub fn new(catalog: Arc<Catalog>, family: impl Into<String>) -> Self {
        Self { catalog, family: family.into() }
    }

    pub fn family(&self) -> &str {
        &self.family
    }
}

impl Rule for StructuralRule {
    fn name(&self) -> String {
        format!("structural {}", self.family)
    }

    fn precondition(&self, unit: &CompilationUnit) -> bool {
        self.catalog
            .family(&self.family)
            .is_some_and(|family| uses_type(unit, |fqn| family.precondition_matches(fqn)))
    }

    fn transform(&self, unit: CompilationUnit, sink: &mut dyn EventSink, left: &mut LeftInPlace) -> CompilationUnit {
        let Some(family) = self.catalog.family(&self.family) else { return unit };
        MigrationVisitor::new(&self.catalog, family, sink, left).fold_unit(unit)
    }
}

// ============================================================================
// Phase 3: type substitution
// ============================================================================

pub struct ChangeTypeRule {
    catalog: Arc<Catalog>,
}

impl ChangeTypeRule {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }
}

impl Rule for ChangeTypeRule {
    fn name(&self) -> String {
        "change legacy types".to_string()
    }

    fn precondition(&self, unit: &CompilationUnit) -> bool {
        let map = self.catalog.type_map();
        uses_type(unit, |fqn| map.target(fqn).is_some())
    }

    fn transform(&self, unit: CompilationUnit, _sink: &mut dyn EventSink, _left: &mut LeftInPlace) -> CompilationUnit {
        let map = self.catalog.type_map();
        let unit = ChangeTypes { map }.fold_unit(unit);
        imports::change_type(unit, map)
    }
}

/// Retargets every mapped type everywhere, including type names written in source.
struct ChangeTypes<'m> {
    map: &'m TypeMap,
}

impl ChangeTypes<'_> {
    fn retarget(&self, ty: &JavaType) -> JavaType {
        self.map.retarget(ty)
    }

    fn retarget_name(&self, fqn: &str) -> String {
        self.map.target(fqn).map_or_else(|| fqn.to_string(), |t| t.fqn.clone())
    }

    fn retarget_method(&self, method: &mut MethodType) {
        method.declaring = self.retarget_name(&method.declaring);
        method.ret = self.retarget(&method.ret);
        method.params = method.params.iter().map(|p| self.retarget(p)).collect();
    }

    fn retarget_binding(&self, binding: VarBinding) -> VarBinding {
        let owner = match binding.owner {
            VarOwner::Field(declaring) => VarOwner::Field(self.retarget_name(&declaring)),
            VarOwner::Local => VarOwner::Local,
        };
        VarBinding { ty: self.retarget(&binding.ty), owner, ..binding }
    }

    /// Written form of a retargeted type name: short when the legacy name was written short.
    fn written(&self, written: &str, legacy: &str) -> Option<String> {
        let target = self.map.target(legacy)?;
        Some(if written.contains('.') { target.fqn.clone() } else { target.short_name.clone() })
    }
}

impl Fold for ChangeTypes<'_> {
    fn fold_method(&mut self, method: Spanned<MethodDecl>) -> Spanned<MethodDecl> {
        let mut method = walk_fold_method(self, method);
        if let Some(m) = &mut method.node.method {
            self.retarget_method(m);
        }
        method
    }

    fn fold_var_decls(&mut self, decls: VarDecls) -> VarDecls {
        let mut decls = walk_fold_var_decls(self, decls);
        for var in &mut decls.vars {
            var.ty = self.retarget(&var.ty);
        }
        decls
    }

    fn fold_expr(&mut self, expr: Spanned<Expr>) -> Spanned<Expr> {
        let Spanned { node: Expr { kind, ty }, span } = walk_fold_expr(self, expr);
        let kind = match kind {
            // Type reference: `DateTimeZone` in `DateTimeZone.forOffsetHours(1)`.
            ExprKind::Ident { name, binding: None } => match ty.fqn().and_then(|fqn| self.written(&name, fqn)) {
                Some(written) => ExprKind::Ident { name: written, binding: None },
                None => ExprKind::Ident { name, binding: None },
            },
            // Qualified type reference: `org.joda.time.DateTime` in `org.joda.time.DateTime.now()`.
            ExprKind::FieldAccess { target, name, binding: None } => match ty.fqn().and_then(|fqn| self.map.target(fqn)) {
                Some(t) => ExprKind::Ident { name: t.fqn.clone(), binding: None },
                None => ExprKind::FieldAccess { target, name, binding: None },
            },
            ExprKind::Ident { name, binding: Some(b) } => ExprKind::Ident { name, binding: Some(self.retarget_binding(b)) },
            ExprKind::FieldAccess { target, name, binding: Some(b) } => {
                ExprKind::FieldAccess { target, name, binding: Some(self.retarget_binding(b)) }
            }
            ExprKind::MethodCall { select, name, args, mut method } => {
                if let Some(m) = &mut method {
                    self.retarget_method(m);
                }
                ExprKind::MethodCall { select, name, args, method }
            }
            ExprKind::New { class, args, mut method } => {
                if let Some(m) = &mut method {
                    self.retarget_method(m);
                }
                ExprKind::New { class, args, method }
            }
            other => other,
        };
        Spanned::new(Expr { kind, ty: self.retarget(&ty) }, span)
    }

    fn fold_type_expr(&mut self, te: Spanned<TypeExpr>) -> Spanned<TypeExpr> {
        walk_fold_type_expr(self, te).map(|t| match t {
            TypeExpr::Named { name, args, ty } => match ty.fqn().and_then(|fqn| self.written(&name, fqn)) {
                Some(written) => TypeExpr::Named { name: written, args, ty: self.retarget(&ty) },
                None => TypeExpr::Named { name, args, ty },
            },
            other => other,
        })
    }
}

// ============================================================================
// Pipeline
// ============================================================================

type Stage = (Phase, Box<dyn Rule>);

pub struct Pipeline {
    stages: Vec<Stage>,
}

impl Pipeline {
    /// Every rename, then every family in catalog order, then type substitution.
    pub fn joda(catalog: Arc<Catalog>) -> Self {
        let mut stages: Vec<Stage> = Vec::new();
        for rename in catalog.renames() {
            stages.push((Phase::Rename, Box::new(RenameRule::new(catalog.clone(), rename.clone()))));
        }
        for family in catalog.families() {
            stages.push((Phase::Structural, Box::new(StructuralRule::new(catalog.clone(), family.name.clone()))));
        }
        stages.push((Phase::TypeSubstitution, Box::new(ChangeTypeRule::new(catalog))));
        Self { stages }
    }

    pub fn from_stages(stages: Vec<(Phase, Box<dyn Rule>)>) -> Self {
        Self { stages }
    }

    /// Drop every rule of `phase`.
    pub fn without(mut self, phase: Phase) -> Self {
        self.stages.retain(|(p, _)| *p != phase);
        self
    }

    /// Keep only the structural families named in `families`.
    pub fn only_families(mut self, families: &[String]) -> Self {
        self.stages.retain(|(phase, rule)| {
            *phase != Phase::Structural || families.iter().any(|f| rule.name() == format!("structural {f}"))
        });
        self
    }

    /// Run phases in the given order; phases not listed are dropped. Rules keep their
    /// relative order within a phase.
    pub fn with_phases(self, order: &[Phase]) -> Self {
        let mut stages = self.stages;
        let mut ordered = Vec::with_capacity(stages.len());
        for phase in order {
            let (take, keep): (Vec<Stage>, Vec<Stage>) = stages.into_iter().partition(|(p, _)| p == phase);
            ordered.extend(take);
            stages = keep;
        }
        Self { stages: ordered }
    }

    pub fn rule_names(&self) -> Vec<(Phase, String)> {
        self.stages.iter().map(|(phase, rule)| (*phase, rule.name())).collect()
    }

    /// Run every rule whose precondition holds, in order. Never fails: unmapped constructs are
    /// left in place and reported to `sink`.
    pub fn run(&self, mut unit: CompilationUnit, sink: &mut dyn EventSink) -> CompilationUnit {
        let mut left = LeftInPlace::default();
        for (phase, rule) in &self.stages {
            if !rule.precondition(&unit) {
                trace!(%phase, rule = %rule.name(), "precondition not met");
                continue;
            }
            debug!(%phase, rule = %rule.name(), "running rule");
            unit = rule.transform(unit, sink, &mut left);
        }
        unit
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.rule_names()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migrate::catalog::joda;
    use crate::migrate::events::{Discard, MappingLog};
    use crate::parser::parse;
    use crate::pretty::print_unit;
    use crate::typeck::attribute;

    fn catalog() -> Arc<Catalog> {
        Arc::new(joda::catalog().unwrap())
    }

    fn run(pipeline: &Pipeline, catalog: &Catalog, source: &str) -> String {
        let unit = attribute(parse(source).unwrap(), catalog.classpath());
        print_unit(&pipeline.run(unit, &mut Discard))
    }

    #[test]
    fn joda_pipeline_orders_phases() {
        let pipeline = Pipeline::joda(catalog());
        let phases: Vec<Phase> = pipeline.rule_names().into_iter().map(|(p, _)| p).collect();
        let first_structural = phases.iter().position(|p| *p == Phase::Structural).unwrap();
        assert!(phases[..first_structural].iter().all(|p| *p == Phase::Rename));
        assert_eq!(phases.last(), Some(&Phase::TypeSubstitution));
        assert_eq!(phases.iter().filter(|p| **p == Phase::Structural).count(), 10);
    }

    #[test]
    fn with_phases_reorders_and_drops() {
        let pipeline = Pipeline::joda(catalog()).with_phases(&[Phase::Structural, Phase::Rename]);
        let phases: Vec<Phase> = pipeline.rule_names().into_iter().map(|(p, _)| p).collect();
        assert_eq!(phases.first(), Some(&Phase::Structural));
        assert_eq!(phases.last(), Some(&Phase::Rename));
        assert!(!phases.contains(&Phase::TypeSubstitution));
    }

    #[test]
    fn rename_rule_updates_name_and_signature() {
        let catalog = catalog();
        let pipeline = Pipeline::joda(catalog.clone()).with_phases(&[Phase::Rename]);
        let out = run(
            &pipeline,
            &catalog,
            "import org.joda.time.DateTime;\n\nclass A {\n    int f(DateTime d) {\n        return d.getHourOfDay();\n    }\n}\n",
        );
        assert!(out.contains("return d.getHour();"), "{out}");
    }

    #[test]
    fn change_type_retargets_remaining_names() {
        let catalog = catalog();
        let pipeline = Pipeline::joda(catalog.clone()).with_phases(&[Phase::TypeSubstitution]);
        let out = run(
            &pipeline,
            &catalog,
            "import org.joda.time.*;\n\nclass A {\n    DateTime[] all;\n\n    Duration f(DateTime d) {\n        return null;\n    }\n}\n",
        );
        assert_eq!(
            out,
            "import java.time.Duration;\nimport java.time.ZonedDateTime;\n\nclass A {\n    ZonedDateTime[] all;\n\n    Duration f(ZonedDateTime d) {\n        return null;\n    }\n}\n"
        );
    }

    #[test]
    fn structural_rule_is_gated_on_its_family_types() {
        let catalog = catalog();
        let rule = StructuralRule::new(catalog.clone(), "interval");
        let unit = attribute(parse("import org.joda.time.Duration;\n\nclass A {\n    Duration d;\n}\n").unwrap(), catalog.classpath());
        assert!(!rule.precondition(&unit));
        let unit = attribute(parse("import org.joda.time.Interval;\n\nclass A {\n    Interval i;\n}\n").unwrap(), catalog.classpath());
        assert!(rule.precondition(&unit));
        let mut log = MappingLog::new();
        let out = print_unit(&rule.transform(unit, &mut log, &mut LeftInPlace::default()));
        assert!(out.contains("import org.threeten.extra.Interval;"), "{out}");
    }
}
