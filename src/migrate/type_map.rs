use std::collections::BTreeMap;

use crate::typeck::types::{simple_name, JavaType};

/// Where a legacy type goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeTarget {
    pub fqn: String,
    /// Name written in source for the target, normally its simple name.
    pub short_name: String,
}

/// Legacy type -> target type association.
#[derive(Debug, Clone, Default)]
pub struct TypeMap {
    legacy_prefix: String,
    entries: BTreeMap<String, TypeTarget>,
}

impl TypeMap {
    /// `legacy_prefix` is the package prefix that puts a type in the legacy domain.
    pub fn new(legacy_prefix: impl Into<String>) -> Self {
        Self { legacy_prefix: legacy_prefix.into(), entries: BTreeMap::new() }
    }

    pub fn insert(&mut self, legacy: &str, target: &str) {
        self.insert_with_short(legacy, target, simple_name(target));
    }

    pub fn insert_with_short(&mut self, legacy: &str, target: &str, short_name: &str) {
        self.entries.insert(
            legacy.to_string(),
            TypeTarget { fqn: target.to_string(), short_name: short_name.to_string() },
        );
    }

    pub fn target(&self, legacy: &str) -> Option<&TypeTarget> {
        self.entries.get(legacy)
    }

    /// Display name for the target of `legacy`; the legacy simple name when unmapped.
    pub fn short_name(&self, legacy: &str) -> String {
        match self.entries.get(legacy) {
            Some(t) => t.short_name.clone(),
            None => simple_name(legacy).to_string(),
        }
    }

    pub fn is_legacy_name(&self, fqn: &str) -> bool {
        fqn.starts_with(&self.legacy_prefix)
    }

    /// The type, or any array element type, is a legacy class.
    pub fn is_legacy(&self, ty: &JavaType) -> bool {
        ty.any_class(&|fqn| self.is_legacy_name(fqn))
    }

    /// Whether `ty` mentions a legacy class that has a mapping.
    pub fn is_mapped(&self, ty: &JavaType) -> bool {
        ty.any_class(&|fqn| self.entries.contains_key(fqn))
    }

    /// Swap every mapped class in `ty` for its target; arrays are retargeted by element.
    pub fn retarget(&self, ty: &JavaType) -> JavaType {
        ty.map_classes(&|fqn| self.entries.get(fqn).map(|t| t.fqn.clone()))
    }

    /// Like `retarget`, restricted to legacy classes accepted by `only`.
    pub fn retarget_where(&self, ty: &JavaType, only: &impl Fn(&str) -> bool) -> JavaType {
        ty.map_classes(&|fqn| if only(fqn) { self.entries.get(fqn).map(|t| t.fqn.clone()) } else { None })
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &TypeTarget)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
