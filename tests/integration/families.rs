//! One migration per structural family, through the full pipeline.

mod common;

use chronoport::migrate::events::{MAPPING_MISSING, NO_AUTOMATIC_MAPPING};
use common::{migrate, migrate_text};
use insta::assert_snapshot;

#[test]
fn datetime_field_constructor_and_arithmetic() {
    let src = r#"
import org.joda.time.DateTime;

class A {
    DateTime f(int year) {
        DateTime d = new DateTime(year, 1, 2, 3, 4);
        return d.plusMillis(250).withMillisOfSecond(7);
    }
}
"#;
    assert_snapshot!(migrate_text(src), @r"
import java.time.Duration;
import java.time.ZoneId;
import java.time.ZonedDateTime;

class A {
    ZonedDateTime f(int year) {
        ZonedDateTime d = ZonedDateTime.of(year, 1, 2, 3, 4, 0, 0, ZoneId.systemDefault());
        return d.plus(Duration.ofMillis(250)).withNano(7 * 1_000_000);
    }
}
");
}

#[test]
fn interval_construction_and_accessors() {
    let src = r#"
import org.joda.time.DateTime;
import org.joda.time.Interval;

class A {
    long f(DateTime a, DateTime b) {
        Interval i = new Interval(a, b);
        return i.toDurationMillis();
    }
}
"#;
    assert_snapshot!(migrate_text(src), @r"
import java.time.ZonedDateTime;
import org.threeten.extra.Interval;

class A {
    long f(ZonedDateTime a, ZonedDateTime b) {
        Interval i = Interval.of(a.toInstant(), b.toInstant());
        return i.toDuration().toMillis();
    }
}
");
}

#[test]
fn interval_with_zone_has_no_automatic_mapping() {
    let src = r#"
import org.joda.time.DateTimeZone;
import org.joda.time.Interval;

class A {
    Interval f(DateTimeZone zone) {
        return new Interval(1L, 2L, zone);
    }
}
"#;
    let (out, log) = migrate(src);
    assert!(out.contains("return new Interval(1L, 2L, zone);"), "{out}");
    assert_eq!(log.len(), 1);
    assert_eq!(log.events()[0].message, NO_AUTOMATIC_MAPPING);
    assert_eq!(log.events()[0].declaring_type, "org.joda.time.Interval");
}

#[test]
fn formatter_pattern_and_print() {
    let src = r#"
import org.joda.time.format.DateTimeFormat;
import org.joda.time.format.DateTimeFormatter;

class A {
    String f(long millis) {
        DateTimeFormatter fmt = DateTimeFormat.forPattern("yyyy-MM-dd");
        return fmt.print(millis);
    }
}
"#;
    assert_snapshot!(migrate_text(src), @r#"
import java.time.Instant;
import java.time.ZoneId;
import java.time.ZonedDateTime;
import java.time.format.DateTimeFormatter;

class A {
    String f(long millis) {
        DateTimeFormatter fmt = DateTimeFormatter.ofPattern("yyyy-MM-dd");
        return ZonedDateTime.ofInstant(Instant.ofEpochMilli(millis), ZoneId.systemDefault()).format(fmt);
    }
}
"#);
}

#[test]
fn zone_factories_and_constants() {
    let src = r#"
import org.joda.time.DateTime;
import org.joda.time.DateTimeZone;

class A {
    DateTime f() {
        DateTimeZone zone = DateTimeZone.forID("Europe/Paris");
        return DateTime.now(zone).withZone(DateTimeZone.UTC);
    }
}
"#;
    assert_snapshot!(migrate_text(src), @r#"
import java.time.ZoneId;
import java.time.ZoneOffset;
import java.time.ZonedDateTime;

class A {
    ZonedDateTime f() {
        ZoneId zone = ZoneId.of("Europe/Paris");
        return ZonedDateTime.now(zone).withZoneSameInstant(ZoneOffset.UTC);
    }
}
"#);
}

#[test]
fn duration_getters_are_renamed_and_retained() {
    let src = r#"
import org.joda.time.Duration;

class A {
    long f(Duration d) {
        return d.getStandardHours() + d.getMillis();
    }
}
"#;
    assert_snapshot!(migrate_text(src), @r"
import java.time.Duration;

class A {
    long f(Duration d) {
        return d.toHours() + d.toMillis();
    }
}
");
}

#[test]
fn local_date_constructor_and_getters() {
    let src = r#"
import org.joda.time.LocalDate;

class A {
    int f() {
        LocalDate d = new LocalDate(2024, 2, 29);
        return d.getMonthOfYear() + d.getDayOfMonth();
    }
}
"#;
    assert_snapshot!(migrate_text(src), @r"
import java.time.LocalDate;

class A {
    int f() {
        LocalDate d = LocalDate.of(2024, 2, 29);
        return d.getMonthValue() + d.getDayOfMonth();
    }
}
");
}

#[test]
fn instant_millis_arithmetic() {
    let src = r#"
import org.joda.time.Instant;

class A {
    long f() {
        Instant i = new Instant(10L).plus(5L);
        return i.getMillis();
    }
}
"#;
    assert_snapshot!(migrate_text(src), @r"
import java.time.Instant;

class A {
    long f() {
        Instant i = Instant.ofEpochMilli(10L).plusMillis(5L);
        return i.toEpochMilli();
    }
}
");
}

#[test]
fn period_between_to_standard_duration_is_fused() {
    let src = r#"
import org.joda.time.DateTime;
import org.joda.time.Duration;
import org.joda.time.Hours;

class A {
    Duration f(DateTime a, DateTime b) {
        return Hours.hoursBetween(a, b).toStandardDuration();
    }
}
"#;
    let (out, log) = migrate(src);
    assert!(log.is_empty());
    assert!(out.contains("return Duration.ofHours(ChronoUnit.HOURS.between(a, b));"), "{out}");
    assert!(out.contains("import java.time.temporal.ChronoUnit;"), "{out}");
    assert!(!out.contains("org.joda"), "{out}");
}

#[test]
fn period_factory_to_standard_duration_is_fused() {
    let src = r#"
import org.joda.time.Days;
import org.joda.time.Duration;

class A {
    Duration f() {
        return Days.days(3).toStandardDuration();
    }
}
"#;
    let (out, log) = migrate(src);
    assert!(log.is_empty());
    assert!(out.contains("return Duration.ofDays(3);"), "{out}");
    assert!(!out.contains("ChronoUnit"), "{out}");
}

#[test]
fn days_in_interval_uses_the_interval_twice() {
    let src = r#"
import org.joda.time.Days;
import org.joda.time.Interval;

class A {
    int f(Interval i) {
        return Days.daysIn(i).getDays();
    }
}
"#;
    let (out, log) = migrate(src);
    assert!(log.is_empty());
    assert!(out.contains("return (int) ChronoUnit.DAYS.between(i.getStart(), i.getEnd());"), "{out}");
    assert!(out.contains("int f(Interval i)"), "{out}");
    assert!(out.contains("import org.threeten.extra.Interval;"), "{out}");
}

#[test]
fn chain_across_declaring_types_is_not_fused() {
    let src = r#"
import org.joda.time.Duration;

class A {
    int f(Duration d) {
        return d.toStandardDays().getDays();
    }
}
"#;
    let (out, log) = migrate(src);
    assert!(out.contains("return d.toStandardDays().getDays();"), "{out}");
    assert!(out.contains("int f(Duration d)"), "{out}");
    assert_eq!(log.len(), 1);
    assert_eq!(log.events()[0].message, MAPPING_MISSING);
    assert_eq!(log.events()[0].snippet, "d.toStandardDays()");
}
