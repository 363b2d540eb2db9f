// Property tests for the migration pipeline:
// 1. Idempotence: migrating migrated output changes nothing
// 2. No legacy imports survive a mapped migration
// 3. Parse/print is a fixpoint on canonical text

use proptest::prelude::*;

use chronoport::migrate::Engine;
use chronoport::parser::parse;
use chronoport::pretty::print_unit;

// Strategy: one mapped Joda expression returning `long`, with its expected java.time text.
fn arb_long_expr() -> impl Strategy<Value = (String, String)> {
    prop_oneof![
        (1..10_000i64).prop_map(|n| (
            format!("Duration.standardDays({n}L).getMillis()"),
            format!("Duration.ofDays({n}L).toMillis()"),
        )),
        (1..10_000i64, 1..10_000i64).prop_map(|(a, b)| (
            format!("new Duration({a}L).plus({b}L).getMillis()"),
            format!("Duration.ofMillis({a}L).plusMillis({b}L).toMillis()"),
        )),
        (1..10_000i64, 1..365i32).prop_map(|(ms, d)| (
            format!("new DateTime({ms}L).plusDays({d}).getMillis()"),
            format!("ZonedDateTime.ofInstant(Instant.ofEpochMilli({ms}L), ZoneId.systemDefault()).plusDays({d}).toInstant().toEpochMilli()"),
        )),
        (1..10_000i64).prop_map(|ms| (
            format!("new Instant({ms}L).getMillis()"),
            format!("Instant.ofEpochMilli({ms}L).toEpochMilli()"),
        )),
    ]
}

fn unit_with(exprs: &[String]) -> String {
    let mut src = String::from(
        "import org.joda.time.DateTime;\nimport org.joda.time.Duration;\nimport org.joda.time.Instant;\n\nclass A {\n    long f() {\n        long total = 0L;\n",
    );
    for e in exprs {
        src.push_str(&format!("        total += {e};\n"));
    }
    src.push_str("        return total;\n    }\n}\n");
    src
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn mapped_expressions_migrate_exactly(pairs in prop::collection::vec(arb_long_expr(), 1..5)) {
        let engine = Engine::joda().unwrap();
        let (legacy, expected): (Vec<String>, Vec<String>) = pairs.into_iter().unzip();
        let (out, log) = chronoport::migrate_source(&unit_with(&legacy), &engine).unwrap();

        prop_assert!(log.is_empty());
        prop_assert!(!out.contains("org.joda"), "{}", out);
        for e in &expected {
            let line = format!("total += {e};");
            prop_assert!(out.contains(&line), "missing `{}` in\n{}", line, out);
        }
    }

    #[test]
    fn migration_is_idempotent(pairs in prop::collection::vec(arb_long_expr(), 1..5)) {
        let engine = Engine::joda().unwrap();
        let legacy: Vec<String> = pairs.into_iter().map(|(l, _)| l).collect();
        let (once, _) = chronoport::migrate_source(&unit_with(&legacy), &engine).unwrap();
        let (twice, log) = chronoport::migrate_source(&once, &engine).unwrap();
        prop_assert_eq!(once, twice);
        prop_assert!(log.is_empty());
    }

    #[test]
    fn print_parse_is_a_fixpoint(pairs in prop::collection::vec(arb_long_expr(), 1..5)) {
        let (legacy, migrated): (Vec<String>, Vec<String>) = pairs.into_iter().unzip();
        for src in [unit_with(&legacy), unit_with(&migrated)] {
            let printed = print_unit(&parse(&src).unwrap());
            prop_assert_eq!(&printed, &src);
            let reprinted = print_unit(&parse(&printed).unwrap());
            prop_assert_eq!(reprinted, printed);
        }
    }
}
