//! End-to-end migrations of the canonical Joda-Time usages.
//!
//! Snapshots are inline; run `cargo insta review` after an intended output change.

mod common;

use chronoport::migrate::events::{MAPPING_MISSING, MULTIPLE_MAPPINGS_POSSIBLE, NO_AUTOMATIC_MAPPING};
use chronoport::migrate::Severity;
use common::migrate;
use insta::assert_snapshot;

#[test]
fn renamed_static_factory() {
    let (out, log) = migrate(
        "import org.joda.time.Duration;\n\nclass A {\n    Duration f() {\n        return Duration.standardDays(1L);\n    }\n}\n",
    );
    assert!(log.is_empty());
    assert_snapshot!(out, @r"
import java.time.Duration;

class A {
    Duration f() {
        return Duration.ofDays(1L);
    }
}
");
}

#[test]
fn constructor_then_instance_call() {
    let (out, log) = migrate(
        "import org.joda.time.Duration;\n\nclass A {\n    Duration f() {\n        return new Duration(1000L).plus(550L);\n    }\n}\n",
    );
    assert!(log.is_empty());
    assert_snapshot!(out, @r"
import java.time.Duration;

class A {
    Duration f() {
        return Duration.ofMillis(1000L).plusMillis(550L);
    }
}
");
}

#[test]
fn period_chain_is_fused() {
    let src = r#"
import org.joda.time.DateTime;
import org.joda.time.Days;

class A {
    int f(DateTime start, DateTime end) {
        return Days.daysBetween(start, end).getDays();
    }
}
"#;
    let (out, log) = migrate(src);
    assert!(log.is_empty());
    assert!(!out.contains("Days.daysBetween"), "{out}");
    assert_snapshot!(out, @r"
import java.time.ZonedDateTime;
import java.time.temporal.ChronoUnit;

class A {
    int f(ZonedDateTime start, ZonedDateTime end) {
        return (int) ChronoUnit.DAYS.between(start, end);
    }
}
");
}

#[test]
fn unmapped_call_is_left_and_reported_once() {
    let src = "import org.joda.time.DateTime;\n\nclass A {\n    int f(DateTime dt) {\n        return dt.getMillisOfDay();\n    }\n}\n";
    let (out, log) = migrate(src);
    assert_snapshot!(out, @r"
import java.time.ZonedDateTime;

class A {
    int f(ZonedDateTime dt) {
        return dt.getMillisOfDay();
    }
}
");
    assert_eq!(log.len(), 1);
    let event = &log.events()[0];
    assert_eq!(event.severity, Severity::Informational);
    assert_eq!(event.message, MAPPING_MISSING);
    assert_eq!(event.snippet, "dt.getMillisOfDay()");
    assert_eq!(event.declaring_type, "org.joda.time.base.AbstractDateTime");
}

#[test]
fn declaration_and_accessor_retarget_together() {
    let src = r#"
import org.joda.time.DateTime;

class A {
    long f() {
        DateTime x = new DateTime();
        long v = x.getMillis();
        return v;
    }
}
"#;
    let (out, log) = migrate(src);
    assert!(log.is_empty());
    assert_snapshot!(out, @r"
import java.time.ZonedDateTime;

class A {
    long f() {
        ZonedDateTime x = ZonedDateTime.now();
        long v = x.toInstant().toEpochMilli();
        return v;
    }
}
");
}

#[test]
fn receiver_type_picks_between_bounded_rules() {
    let src = r#"
import org.joda.time.DateTime;
import org.joda.time.Instant;

class A {
    boolean f(DateTime dt, Instant i) {
        return dt.isAfter(5L) && i.isAfter(6L);
    }
}
"#;
    let (out, log) = migrate(src);
    assert!(log.is_empty());
    assert_snapshot!(out, @r"
import java.time.Instant;
import java.time.ZoneId;
import java.time.ZonedDateTime;

class A {
    boolean f(ZonedDateTime dt, Instant i) {
        return dt.isAfter(Instant.ofEpochMilli(5L).atZone(ZoneId.systemDefault())) && i.isAfter(Instant.ofEpochMilli(6L));
    }
}
");
}

#[test]
fn ambiguous_member_is_reported_and_kept() {
    let src = "import org.joda.time.Interval;\n\nclass A {\n    boolean f(Interval i, long t) {\n        return i.isBefore(t);\n    }\n}\n";
    let (out, log) = migrate(src);
    assert!(out.contains("return i.isBefore(t);"), "{out}");
    assert!(out.contains("boolean f(Interval i, long t)"), "{out}");
    assert!(out.contains("import org.threeten.extra.Interval;"), "{out}");
    assert_eq!(log.len(), 1);
    assert_eq!(log.events()[0].message, MULTIPLE_MAPPINGS_POSSIBLE);
}

#[test]
fn unrelated_code_is_untouched() {
    let src = "package app;\n\nimport java.util.List;\n\nclass A {\n    int n;\n\n    int size(List<String> xs) {\n        return xs.size() + n;\n    }\n}\n";
    let (out, log) = migrate(src);
    assert_eq!(out, src);
    assert!(log.is_empty());
}

#[test]
fn call_on_unmigrated_receiver_is_kept_whole() {
    let src = "import org.joda.time.DateTimeZone;\nimport org.joda.time.Interval;\n\nclass A {\n    long f(DateTimeZone z) {\n        return new Interval(1L, 2L, z).getStartMillis();\n    }\n}\n";
    let (out, log) = migrate(src);
    assert!(out.contains("return new Interval(1L, 2L, z).getStartMillis();"), "{out}");
    assert!(out.contains("long f(ZoneId z)"), "{out}");
    assert_eq!(log.len(), 1);
    assert_eq!(log.events()[0].message, NO_AUTOMATIC_MAPPING);
    assert_eq!(log.events()[0].snippet, "new Interval(1L, 2L, z)");
}

#[test]
fn call_on_unmigrated_argument_is_kept_across_families() {
    let src = r#"
import org.joda.time.DateTime;
import org.joda.time.Duration;

class A {
    boolean f(Duration d, DateTime t) {
        return new Duration(5L).isLongerThan(d.toIntervalFrom(t).toDuration());
    }
}
"#;
    let (out, log) = migrate(src);
    assert!(out.contains("return new Duration(5L).isLongerThan(d.toIntervalFrom(t).toDuration());"), "{out}");
    assert!(!out.contains("compareTo"), "{out}");
    assert!(out.contains("boolean f(Duration d, ZonedDateTime t)"), "{out}");
    assert_eq!(log.len(), 1);
    assert_eq!(log.events()[0].message, NO_AUTOMATIC_MAPPING);
    assert_eq!(log.events()[0].snippet, "d.toIntervalFrom(t)");
}
