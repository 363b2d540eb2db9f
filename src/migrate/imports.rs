//! Import list maintenance, decided once per compilation unit after a rewrite pass.

use std::collections::BTreeSet;

use crate::parser::ast::{CompilationUnit, ImportDecl};
use crate::span::Spanned;
use crate::typeck::types::{package_of, simple_name};
use crate::visit::composers::printed_type_names;

use super::type_map::TypeMap;

/// Add a single-type import for `fqn` at its sorted position. Returns `false` when nothing
/// was added: the type is already visible (`java.lang`, same package, covering star import)
/// or another import already binds its simple name.
pub fn add_import(unit: &mut CompilationUnit, fqn: &str) -> bool {
    let package = package_of(fqn);
    if package == "java.lang" || unit.package.as_ref().is_some_and(|p| p.node == package) {
        return false;
    }
    let name = simple_name(fqn);
    let visible = unit.imports.iter().any(|imp| {
        let imp = &imp.node;
        !imp.is_static && ((imp.is_star && imp.path == package) || imp.binding_name() == Some(name))
    });
    if visible {
        return false;
    }

    let at = unit
        .imports
        .iter()
        .position(|imp| !imp.node.is_static && imp.node.path.as_str() > fqn)
        .unwrap_or_else(|| {
            // After the last non-static import, ahead of any trailing static ones.
            unit.imports.iter().rposition(|imp| !imp.node.is_static).map_or(0, |i| i + 1)
        });
    unit.imports.insert(at, Spanned::dummy(ImportDecl::single(fqn)));
    true
}

/// Drop legacy imports nothing prints any more, then add each of `wanted` that the unit now
/// prints by simple name. Removal runs first so a target can take over a freed simple name.
pub fn maintain(mut unit: CompilationUnit, wanted: &BTreeSet<String>, is_legacy: impl Fn(&str) -> bool) -> CompilationUnit {
    let printed = printed_type_names(&unit);
    unit.imports.retain(|imp| {
        let imp = &imp.node;
        if imp.is_static {
            return true;
        }
        if imp.is_star {
            let prefix = format!("{}.", imp.path);
            return !is_legacy(&prefix) || printed.iter().any(|fqn| package_of(fqn) == imp.path);
        }
        !is_legacy(&imp.path) || printed.contains(&imp.path)
    });
    for fqn in wanted {
        if printed.contains(fqn) {
            add_import(&mut unit, fqn);
        }
    }
    unit
}

/// Import side of the type-substitution phase: legacy imports give way to the targets the
/// retyped unit prints.
pub fn change_type(unit: CompilationUnit, type_map: &TypeMap) -> CompilationUnit {
    let targets: BTreeSet<String> = type_map.entries().map(|(_, t)| t.fqn.clone()).collect();
    maintain(unit, &targets, |fqn| type_map.is_legacy_name(fqn))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use crate::pretty::print_unit;

    fn paths(unit: &CompilationUnit) -> Vec<&str> {
        unit.imports.iter().map(|i| i.node.path.as_str()).collect()
    }

    #[test]
    fn adds_in_sorted_position_once() {
        let mut unit = parse("import a.B;\nimport c.D;\nclass X { }").unwrap();
        assert!(add_import(&mut unit, "b.C"));
        assert!(!add_import(&mut unit, "b.C"));
        assert!(add_import(&mut unit, "z.Z"));
        assert_eq!(paths(&unit), vec!["a.B", "b.C", "c.D", "z.Z"]);
    }

    #[test]
    fn skips_visible_and_conflicting_names() {
        let mut unit = parse("package p;\nimport java.time.*;\nimport my.Duration;\nclass X { }").unwrap();
        assert!(!add_import(&mut unit, "java.lang.String"));
        assert!(!add_import(&mut unit, "p.Local"));
        assert!(!add_import(&mut unit, "java.time.Instant"));
        assert!(!add_import(&mut unit, "other.Duration"));
        assert_eq!(unit.imports.len(), 2);
    }

    #[test]
    fn maintain_drops_unprinted_legacy_imports_only() {
        let unit = parse("import java.util.List;\nimport org.joda.time.DateTime;\nimport org.joda.time.format.*;\nclass X { }")
            .unwrap();
        let unit = maintain(unit, &BTreeSet::new(), |fqn| fqn.starts_with("org.joda.time."));
        assert_eq!(print_unit(&unit), "import java.util.List;\n\nclass X {\n}\n");
    }
}
