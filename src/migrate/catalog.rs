//! The rule catalog: per-legacy-type template groups, member renames and the structural
//! families that drive them. Built once, validated, then shared read-only.

pub mod joda;

use std::collections::HashSet;

use tracing::debug;

use super::pattern::{FieldPattern, MethodPattern};
use super::type_map::TypeMap;
use crate::diagnostics::MigrateError;
use crate::template::{ArgBinding, Slot, Template};
use crate::typeck::types::{JavaType, MethodType};
use crate::typeck::{ClassLookup, Classpath};

#[derive(Debug, Clone)]
pub enum RuleAction {
    Rewrite(Template, ArgBinding),
    /// The target type has the same member; keep the call, the type substitution retargets it.
    Retain,
    Ambiguous,
    Unsupported,
}

#[derive(Debug, Clone)]
pub struct MigrationRule {
    pub pattern: MethodPattern,
    pub action: RuleAction,
    /// Receiver bound consulted when several rules match one call.
    pub parent_bound: Option<String>,
}

/// Rewrites `inner(..).outer(..)` as one expression.
#[derive(Debug, Clone)]
pub struct FusionRule {
    pub outer: MethodPattern,
    pub inner: MethodPattern,
    pub template: Template,
    pub binding: ArgBinding,
}

/// Replaces a named constant with a target constant.
#[derive(Debug, Clone)]
pub struct FieldRule {
    pub pattern: FieldPattern,
    pub target: String,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct TemplateGroup {
    pub legacy: String,
    pub rules: Vec<MigrationRule>,
    pub fusions: Vec<FusionRule>,
    pub fields: Vec<FieldRule>,
    /// Groups whose legacy type has no target type of its own (the single-field periods)
    /// are only ever rewritten away, never retyped.
    pub requires_type_mapping: bool,
}

impl TemplateGroup {
    pub fn new(legacy: impl Into<String>) -> Self {
        Self {
            legacy: legacy.into(),
            rules: Vec::new(),
            fusions: Vec::new(),
            fields: Vec::new(),
            requires_type_mapping: true,
        }
    }
}

/// A structural rewrite unit: one type family, gated on the unit still using its types.
#[derive(Debug, Clone)]
pub struct Family {
    pub name: String,
    /// Type names (or `pkg.*` wildcards) whose presence enables the family.
    pub preconditions: Vec<String>,
    /// Legacy types whose groups this family rewrites and whose mentions it retypes.
    pub groups: Vec<String>,
}

impl Family {
    pub fn owns(&self, legacy: &str) -> bool {
        self.groups.iter().any(|g| g == legacy)
    }

    pub fn precondition_matches(&self, fqn: &str) -> bool {
        self.preconditions.iter().any(|p| match p.strip_suffix(".*") {
            Some(pkg) => fqn.strip_prefix(pkg).is_some_and(|rest| rest.starts_with('.')),
            None => p == fqn,
        })
    }
}

/// Member rename applied before any structural rule.
#[derive(Debug, Clone)]
pub struct Rename {
    pub pattern: MethodPattern,
    pub new_name: String,
}

/// Outcome of looking a call up in the catalog.
#[derive(Debug, Clone, Copy)]
pub enum Resolution<'c> {
    Matched(&'c Template, &'c ArgBinding),
    Retained,
    Ambiguous,
    Unsupported,
    NoMatch,
}

#[derive(Debug)]
pub struct Catalog {
    classpath: Classpath,
    type_map: TypeMap,
    groups: Vec<TemplateGroup>,
    renames: Vec<Rename>,
    families: Vec<Family>,
}

impl Catalog {
    /// Assemble and validate a catalog.
    pub fn new(
        classpath: Classpath,
        type_map: TypeMap,
        groups: Vec<TemplateGroup>,
        renames: Vec<Rename>,
        families: Vec<Family>,
    ) -> Result<Self, MigrateError> {
        let catalog = Self { classpath, type_map, groups, renames, families };
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn classpath(&self) -> &Classpath {
        &self.classpath
    }

    pub fn type_map(&self) -> &TypeMap {
        &self.type_map
    }

    pub fn groups(&self) -> &[TemplateGroup] {
        &self.groups
    }

    pub fn renames(&self) -> &[Rename] {
        &self.renames
    }

    pub fn families(&self) -> &[Family] {
        &self.families
    }

    pub fn family(&self, name: &str) -> Option<&Family> {
        self.families.iter().find(|f| f.name == name)
    }

    /// The group for `declaring`, or for its nearest supertype that has one.
    pub fn group_for(&self, declaring: &str) -> Option<&TemplateGroup> {
        self.classpath
            .supertypes_closure(declaring)
            .iter()
            .find_map(|ty| self.groups.iter().find(|g| &g.legacy == ty))
    }

    pub fn family_of(&self, group: &TemplateGroup) -> Option<&Family> {
        self.families.iter().find(|f| f.owns(&group.legacy))
    }

    /// Resolve a call against `group`. When several rules match, the first whose receiver bound
    /// accepts `receiver` wins; constructor calls accept any candidate.
    pub fn resolve<'c>(&'c self, group: &'c TemplateGroup, call: &MethodType, receiver: Option<&JavaType>) -> Resolution<'c> {
        let candidates: Vec<&MigrationRule> =
            group.rules.iter().filter(|r| r.pattern.matches_call(call, &self.classpath)).collect();
        let chosen = match candidates.as_slice() {
            [] => None,
            [only] => Some(*only),
            many => {
                debug!(call = %call.signature(), candidates = many.len(), "disambiguating by receiver type");
                many.iter().copied().find(|r| self.accepts_receiver(r, call, receiver))
            }
        };
        match chosen.map(|r| &r.action) {
            Some(RuleAction::Rewrite(template, binding)) => Resolution::Matched(template, binding),
            Some(RuleAction::Retain) => Resolution::Retained,
            Some(RuleAction::Ambiguous) => Resolution::Ambiguous,
            Some(RuleAction::Unsupported) => Resolution::Unsupported,
            None => Resolution::NoMatch,
        }
    }

    /// A receiver satisfies a bound stated in legacy terms either directly or, when an
    /// earlier family already retyped it, through the bound's target type.
    fn accepts_receiver(&self, rule: &MigrationRule, call: &MethodType, receiver: Option<&JavaType>) -> bool {
        if call.is_constructor() {
            return true;
        }
        let (Some(bound), Some(receiver)) = (&rule.parent_bound, receiver) else { return true };
        let bound = JavaType::class(bound.clone());
        self.classpath.is_assignable(receiver, &bound)
            || self.classpath.is_assignable(receiver, &self.type_map.retarget(&bound))
    }

    /// The fusion rule for `inner(..).outer(..)`, if both calls share a declaring type with one.
    pub fn fusion_for(&self, outer: &MethodType, inner: &MethodType) -> Option<&FusionRule> {
        if outer.declaring != inner.declaring {
            return None;
        }
        let group = self.group_for(&outer.declaring)?;
        group.fusions.iter().find(|f| {
            f.outer.matches_call(outer, &self.classpath) && f.inner.matches_call(inner, &self.classpath)
        })
    }

    pub fn field_rule(&self, declaring: &str, name: &str) -> Option<(&TemplateGroup, &FieldRule)> {
        let group = self.group_for(declaring)?;
        group.fields.iter().find(|f| f.pattern.matches_field(declaring, name)).map(|f| (group, f))
    }

    /// Catalog invariants: bindings fill their templates exactly, every group's legacy type
    /// is mapped (unless exempt) and owned by one family, and rename targets exist.
    pub fn validate(&self) -> Result<(), MigrateError> {
        let mut owned = HashSet::new();
        for family in &self.families {
            for legacy in &family.groups {
                if !owned.insert(legacy.as_str()) {
                    return Err(MigrateError::template(format!("`{legacy}` is owned by more than one family")));
                }
                if !self.groups.iter().any(|g| &g.legacy == legacy) {
                    return Err(MigrateError::template(format!(
                        "family `{}` names `{legacy}`, which has no template group",
                        family.name
                    )));
                }
            }
        }

        for group in &self.groups {
            if group.requires_type_mapping && self.type_map.target(&group.legacy).is_none() {
                return Err(MigrateError::template(format!("`{}` has templates but no type mapping", group.legacy)));
            }
            if !owned.contains(group.legacy.as_str()) {
                return Err(MigrateError::template(format!("`{}` belongs to no family", group.legacy)));
            }
            for rule in &group.rules {
                if let RuleAction::Rewrite(template, binding) = &rule.action {
                    check_binding(&rule.pattern, template, binding)?;
                    check_slots(&rule.pattern, binding, false)?;
                }
            }
            for fusion in &group.fusions {
                check_binding(&fusion.outer, &fusion.template, &fusion.binding)?;
                check_slots(&fusion.inner, &fusion.binding, true)?;
            }
        }
        Ok(())
    }
}

fn check_binding(pattern: &MethodPattern, template: &Template, binding: &ArgBinding) -> Result<(), MigrateError> {
    if binding.len() != template.slots() {
        return Err(MigrateError::template(format!(
            "`{pattern}` binds {} expression(s) into `{}`, which has {} slot(s)",
            binding.len(),
            template.code(),
            template.slots()
        )));
    }
    Ok(())
}

/// Argument slots must exist in the matched signature.
fn check_slots(pattern: &MethodPattern, binding: &ArgBinding, inner: bool) -> Result<(), MigrateError> {
    let Some(params) = &pattern.params else { return Ok(()) };
    for slot in binding.slots() {
        let index = match (slot, inner) {
            (Slot::Arg(i), false) | (Slot::InnerArg(i), true) => *i,
            _ => continue,
        };
        if index >= params.len() {
            return Err(MigrateError::template(format!("`{pattern}` has no argument {index}")));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::typeck::standard_classpath;

    fn is_after_long(receiver_first: bool) -> Catalog {
        let cp = standard_classpath();
        let zdt = MigrationRule {
            pattern: MethodPattern::parse("org.joda.time.base.AbstractInstant isAfter(long)").unwrap(),
            action: RuleAction::Rewrite(
                Template::compile(
                    "#{any(java.time.ZonedDateTime)}.isAfter(Instant.ofEpochMilli(#{any(long)}).atZone(ZoneId.systemDefault()))",
                    &["java.time.Instant", "java.time.ZoneId"],
                    &cp,
                )
                .unwrap(),
                ArgBinding::receiver_then_args(true, 1),
            ),
            parent_bound: Some("org.joda.time.ReadableDateTime".to_string()),
        };
        let instant = MigrationRule {
            pattern: MethodPattern::parse("org.joda.time.base.AbstractInstant isAfter(long)").unwrap(),
            action: RuleAction::Rewrite(
                Template::compile("#{any(java.time.Instant)}.isAfter(Instant.ofEpochMilli(#{any(long)}))", &["java.time.Instant"], &cp)
                    .unwrap(),
                ArgBinding::receiver_then_args(true, 1),
            ),
            parent_bound: Some("org.joda.time.Instant".to_string()),
        };
        let mut group = TemplateGroup::new("org.joda.time.base.AbstractInstant");
        group.rules = if receiver_first { vec![zdt, instant] } else { vec![instant, zdt] };
        let mut map = TypeMap::new("org.joda.time.");
        map.insert("org.joda.time.base.AbstractInstant", "java.time.Instant");
        map.insert("org.joda.time.Instant", "java.time.Instant");
        map.insert_with_short("org.joda.time.ReadableDateTime", "java.time.ZonedDateTime", "ZonedDateTime");
        let family = Family {
            name: "abstract-instant".to_string(),
            preconditions: vec!["org.joda.time.*".to_string()],
            groups: vec!["org.joda.time.base.AbstractInstant".to_string()],
        };
        Catalog::new(cp, map, vec![group], Vec::new(), vec![family]).unwrap()
    }

    fn is_after_call() -> MethodType {
        MethodType {
            declaring: "org.joda.time.base.AbstractInstant".to_string(),
            name: "isAfter".to_string(),
            params: vec![JavaType::parse("long")],
            ret: JavaType::parse("boolean"),
            is_static: false,
            varargs: false,
        }
    }

    fn chosen_code(catalog: &Catalog, receiver: &str) -> String {
        let group = catalog.group_for("org.joda.time.base.AbstractInstant").unwrap();
        match catalog.resolve(group, &is_after_call(), Some(&JavaType::class(receiver))) {
            Resolution::Matched(t, _) => t.code().to_string(),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn disambiguation_ignores_insertion_order() {
        for first in [true, false] {
            let catalog = is_after_long(first);
            assert!(chosen_code(&catalog, "org.joda.time.DateTime").contains("atZone"));
            assert!(chosen_code(&catalog, "org.joda.time.Instant").starts_with("#{any(java.time.Instant)}"));
            // Receivers already retyped by an earlier family still meet their bound.
            assert!(chosen_code(&catalog, "java.time.ZonedDateTime").contains("atZone"));
            assert!(!chosen_code(&catalog, "java.time.Instant").contains("atZone"));
        }
    }

    #[test]
    fn group_lookup_walks_supertypes() {
        let catalog = is_after_long(true);
        assert_eq!(catalog.group_for("org.joda.time.DateTime").unwrap().legacy, "org.joda.time.base.AbstractInstant");
        assert!(catalog.group_for("java.lang.String").is_none());
    }

    #[test]
    fn validate_rejects_binding_arity_mismatch() {
        let cp = standard_classpath();
        let mut group = TemplateGroup::new("org.joda.time.Duration");
        group.rules.push(MigrationRule {
            pattern: MethodPattern::parse("org.joda.time.Duration plus(long)").unwrap(),
            action: RuleAction::Rewrite(
                Template::compile("#{any(java.time.Duration)}.plusMillis(#{any(long)})", &[], &cp).unwrap(),
                ArgBinding::new([Slot::Receiver]),
            ),
            parent_bound: None,
        });
        let mut map = TypeMap::new("org.joda.time.");
        map.insert("org.joda.time.Duration", "java.time.Duration");
        let family = Family {
            name: "duration".to_string(),
            preconditions: vec!["org.joda.time.Duration".to_string()],
            groups: vec!["org.joda.time.Duration".to_string()],
        };
        let err = Catalog::new(cp, map, vec![group], Vec::new(), vec![family]).unwrap_err();
        assert!(err.to_string().contains("1 expression(s)"));
    }

    #[test]
    fn validate_requires_type_mapping_unless_exempt() {
        let cp = standard_classpath();
        let family = Family {
            name: "period".to_string(),
            preconditions: vec!["org.joda.time.Days".to_string()],
            groups: vec!["org.joda.time.Days".to_string()],
        };
        let map = TypeMap::new("org.joda.time.");
        let group = TemplateGroup::new("org.joda.time.Days");
        assert!(Catalog::new(cp.clone(), map.clone(), vec![group.clone()], Vec::new(), vec![family.clone()]).is_err());
        let exempt = TemplateGroup { requires_type_mapping: false, ..group };
        assert!(Catalog::new(cp, map, vec![exempt], Vec::new(), vec![family]).is_ok());
    }

    #[test]
    fn family_preconditions() {
        let family = Family {
            name: "formatter".to_string(),
            preconditions: vec!["org.joda.time.format.*".to_string(), "org.joda.time.Interval".to_string()],
            groups: Vec::new(),
        };
        assert!(family.precondition_matches("org.joda.time.format.DateTimeFormat"));
        assert!(family.precondition_matches("org.joda.time.Interval"));
        assert!(!family.precondition_matches("org.joda.time.formatX"));
        assert!(!family.precondition_matches("org.joda.time.DateTime"));
    }
}
