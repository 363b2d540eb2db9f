//! Pipeline-level properties: phase order, idempotence, type consistency and configuration.

mod common;

use chronoport::config::MigrateConfig;
use chronoport::migrate::catalog::joda;
use chronoport::migrate::events::{Discard, MAPPING_MISSING};
use chronoport::migrate::pipeline::Phase;
use chronoport::migrate::Engine;
use chronoport::parser::parse;
use chronoport::pretty::print_unit;
use chronoport::visit::composers::{types_in_use, uses_type};
use common::{migrate, migrate_text, migrate_with_phases};

const RENAMED: &str =
    "import org.joda.time.Duration;\n\nclass A {\n    Duration f() {\n        return Duration.standardDays(1L);\n    }\n}\n";

const MIXED: &str = r#"
import org.joda.time.DateTime;
import org.joda.time.DateTimeZone;
import org.joda.time.Duration;

class A {
    private DateTime created;
    private Duration ttl = Duration.ZERO;

    DateTime expiry(DateTimeZone zone) {
        DateTime start = created.withZone(zone);
        long millis = start.getMillis() + ttl.getMillis();
        return new DateTime(millis, zone).plusDays(1);
    }

    int hour() {
        return created.getHourOfDay();
    }
}
"#;

#[test]
fn structural_before_rename_misses_renamed_members() {
    let (out, log) = migrate_with_phases(RENAMED, &[Phase::Structural, Phase::Rename]);
    assert_eq!(log.len(), 1);
    assert_eq!(log.events()[0].message, MAPPING_MISSING);
    assert_eq!(log.events()[0].snippet, "Duration.standardDays(1L)");
    assert!(out.contains("import org.joda.time.Duration;"), "{out}");

    let (_, log) = migrate(RENAMED);
    assert!(log.is_empty());
}

#[test]
fn migrated_output_is_a_fixpoint() {
    let (once, _) = migrate(MIXED);
    let (twice, log) = migrate(&once);
    assert_eq!(once, twice);
    assert!(log.is_empty());
}

#[test]
fn mixed_unit_ends_on_target_types_only() {
    let engine = Engine::joda().unwrap();
    let unit = parse(MIXED).unwrap();
    let unit = engine.migrate_unit(unit, &mut Discard);
    let map = engine.catalog().type_map();
    let leftover: Vec<String> = types_in_use(&unit).into_iter().filter(|fqn| map.target(fqn).is_some()).collect();
    assert!(leftover.is_empty(), "legacy types left: {leftover:?}");

    let out = print_unit(&unit);
    assert!(!out.contains("org.joda"), "{out}");
    assert!(out.contains("private ZonedDateTime created;"), "{out}");
    assert!(out.contains("private Duration ttl = Duration.ZERO;"), "{out}");
    assert!(out.contains("ZonedDateTime start = created.withZoneSameInstant(zone);"), "{out}");
    assert!(out.contains("long millis = start.toInstant().toEpochMilli() + ttl.toMillis();"), "{out}");
    assert!(
        out.contains("return ZonedDateTime.ofInstant(Instant.ofEpochMilli(millis), zone).plusDays(1);"),
        "{out}"
    );
    assert!(out.contains("return created.getHour();"), "{out}");
}

#[test]
fn retained_members_wait_for_type_substitution() {
    let src = r#"
import org.joda.time.DateTime;

class A {
    int f(DateTime d) {
        DateTime next = d.plusYears(1);
        return next.getHourOfDay();
    }
}
"#;
    let catalog = std::sync::Arc::new(joda::catalog().unwrap());
    let pipeline = chronoport::migrate::pipeline::Pipeline::joda(catalog.clone());
    let structural_only = Engine::new(catalog.clone(), pipeline.without(Phase::TypeSubstitution));
    let unit = structural_only.migrate_unit(parse(src).unwrap(), &mut Discard);
    assert!(uses_type(&unit, |fqn| fqn == "org.joda.time.DateTime"));

    let out = migrate_text(src);
    assert!(out.contains("ZonedDateTime next = d.plusYears(1);"), "{out}");
    assert!(out.contains("return next.getHour();"), "{out}");
    assert!(!out.contains("org.joda"), "{out}");
}

#[test]
fn configured_families_limit_structural_rewrites() {
    let src = "import org.joda.time.DateTime;\nimport org.joda.time.Duration;\n\nclass A {\n    void f() {\n        DateTime d = new DateTime();\n        Duration x = new Duration(1000L);\n    }\n}\n";
    let config = MigrateConfig {
        families: Some(vec!["duration".to_string()]),
        skip_type_substitution: true,
        source: None,
    };
    let engine = Engine::from_config(&config).unwrap();
    let (out, _) = chronoport::migrate_source(src, &engine).unwrap();
    assert!(out.contains("DateTime d = new DateTime();"), "{out}");
    assert!(out.contains("import org.joda.time.DateTime;"), "{out}");
    assert!(out.contains("Duration x = Duration.ofMillis(1000L);"), "{out}");
}

#[test]
fn unknown_family_is_a_config_error() {
    let config = MigrateConfig { families: Some(vec!["calendar".to_string()]), ..MigrateConfig::default() };
    let err = Engine::from_config(&config).unwrap_err();
    assert!(err.to_string().contains("unknown family `calendar`"), "{err}");
}

#[test]
fn syntax_errors_carry_a_span() {
    let engine = Engine::joda().unwrap();
    let err = chronoport::migrate_source("class A { void f( }", &engine).unwrap_err();
    assert!(err.span().is_some(), "{err}");
}
