//! Built-in Joda-Time -> java.time catalog.

use super::{Catalog, Family, FieldRule, FusionRule, MigrationRule, Rename, RuleAction, TemplateGroup};
use crate::diagnostics::MigrateError;
use crate::migrate::pattern::{FieldPattern, MethodPattern};
use crate::migrate::type_map::TypeMap;
use crate::template::Slot::{Arg, InnerArg, Receiver};
use crate::template::{ArgBinding, Slot, Template};
use crate::typeck::{standard_classpath, ClassLookup, Classpath};

pub const LEGACY_PREFIX: &str = "org.joda.time.";

const DATE_TIME: &str = "org.joda.time.DateTime";
const BASE_DATE_TIME: &str = "org.joda.time.base.BaseDateTime";
const ABSTRACT_DATE_TIME: &str = "org.joda.time.base.AbstractDateTime";
const READABLE_DATE_TIME: &str = "org.joda.time.ReadableDateTime";
const ABSTRACT_INSTANT: &str = "org.joda.time.base.AbstractInstant";
const READABLE_INSTANT: &str = "org.joda.time.ReadableInstant";
const INSTANT: &str = "org.joda.time.Instant";
const DURATION: &str = "org.joda.time.Duration";
const BASE_DURATION: &str = "org.joda.time.base.BaseDuration";
const ABSTRACT_DURATION: &str = "org.joda.time.base.AbstractDuration";
const READABLE_DURATION: &str = "org.joda.time.ReadableDuration";
const INTERVAL: &str = "org.joda.time.Interval";
const BASE_INTERVAL: &str = "org.joda.time.base.BaseInterval";
const ABSTRACT_INTERVAL: &str = "org.joda.time.base.AbstractInterval";
const READABLE_INTERVAL: &str = "org.joda.time.ReadableInterval";
const FORMATTER: &str = "org.joda.time.format.DateTimeFormatter";
const FORMAT: &str = "org.joda.time.format.DateTimeFormat";
const ZONE: &str = "org.joda.time.DateTimeZone";
const DATE_MIDNIGHT: &str = "org.joda.time.DateMidnight";
const LOCAL_DATE: &str = "org.joda.time.LocalDate";
const LOCAL_TIME: &str = "org.joda.time.LocalTime";
const LOCAL_DATE_TIME: &str = "org.joda.time.LocalDateTime";
const ABSTRACT_PARTIAL: &str = "org.joda.time.base.AbstractPartial";
const READABLE_PARTIAL: &str = "org.joda.time.ReadablePartial";
const SINGLE_FIELD_PERIOD: &str = "org.joda.time.base.BaseSingleFieldPeriod";

const J_ZDT: &str = "java.time.ZonedDateTime";
const J_ZONE_ID: &str = "java.time.ZoneId";
const J_ZONE_OFFSET: &str = "java.time.ZoneOffset";
const J_INSTANT: &str = "java.time.Instant";
const J_DURATION: &str = "java.time.Duration";
const J_LOCAL_DATE: &str = "java.time.LocalDate";
const J_LOCAL_TIME: &str = "java.time.LocalTime";
const J_LOCAL_DATE_TIME: &str = "java.time.LocalDateTime";
const J_FORMATTER: &str = "java.time.format.DateTimeFormatter";
const J_FORMAT_STYLE: &str = "java.time.format.FormatStyle";
const J_CHRONO_UNIT: &str = "java.time.temporal.ChronoUnit";
const J_CHRONO_FIELD: &str = "java.time.temporal.ChronoField";
const J_ISO_FIELDS: &str = "java.time.temporal.IsoFields";
const J_DATE: &str = "java.util.Date";
const J_TIME_ZONE: &str = "java.util.TimeZone";
const EXTRA_INTERVAL: &str = "org.threeten.extra.Interval";

/// The complete catalog, validated.
pub fn catalog() -> Result<Catalog, MigrateError> {
    let classpath = standard_classpath();
    let renames = renames()?;
    let mut groups = Vec::new();
    {
        let mut b = Builder { classpath: &classpath, renames: &renames, groups: &mut groups };
        date_time(&mut b)?;
        abstract_instant(&mut b)?;
        duration(&mut b)?;
        periods(&mut b)?;
        interval(&mut b)?;
        formatter(&mut b)?;
        zone(&mut b)?;
        date_midnight(&mut b)?;
        instant(&mut b)?;
        local_date(&mut b)?;
    }
    Catalog::new(classpath, type_map(), groups, renames, families())
}

pub fn type_map() -> TypeMap {
    let mut map = TypeMap::new(LEGACY_PREFIX);
    for legacy in [DATE_TIME, BASE_DATE_TIME, ABSTRACT_DATE_TIME, READABLE_DATE_TIME, DATE_MIDNIGHT] {
        map.insert_with_short(legacy, J_ZDT, "ZonedDateTime");
    }
    map.insert_with_short(ZONE, J_ZONE_ID, "ZoneId");
    map.insert(FORMATTER, J_FORMATTER);
    map.insert(FORMAT, J_FORMATTER);
    for legacy in [DURATION, READABLE_DURATION, BASE_DURATION, ABSTRACT_DURATION] {
        map.insert(legacy, J_DURATION);
    }
    for legacy in [INSTANT, ABSTRACT_INSTANT, READABLE_INSTANT] {
        map.insert(legacy, J_INSTANT);
    }
    for legacy in [INTERVAL, BASE_INTERVAL, ABSTRACT_INTERVAL, READABLE_INTERVAL] {
        map.insert(legacy, EXTRA_INTERVAL);
    }
    map.insert(LOCAL_DATE, J_LOCAL_DATE);
    map.insert(LOCAL_TIME, J_LOCAL_TIME);
    map.insert(LOCAL_DATE_TIME, J_LOCAL_DATE_TIME);
    map
}

/// Structural families in execution order.
pub fn families() -> Vec<Family> {
    let family = |name: &str, preconditions: &[&str], groups: &[&str]| Family {
        name: name.to_string(),
        preconditions: preconditions.iter().map(|s| s.to_string()).collect(),
        groups: groups.iter().map(|s| s.to_string()).collect(),
    };
    vec![
        family("datetime", &[DATE_TIME], &[DATE_TIME, BASE_DATE_TIME, ABSTRACT_DATE_TIME, READABLE_DATE_TIME]),
        family("abstract-instant", &["org.joda.time.*"], &[ABSTRACT_INSTANT, READABLE_INSTANT]),
        family("duration", &[DURATION], &[DURATION, BASE_DURATION, ABSTRACT_DURATION, READABLE_DURATION]),
        family(
            "period",
            &["org.joda.time.Days", "org.joda.time.Hours", "org.joda.time.Minutes", "org.joda.time.Seconds"],
            &["org.joda.time.Days", "org.joda.time.Hours", "org.joda.time.Minutes", "org.joda.time.Seconds", SINGLE_FIELD_PERIOD],
        ),
        family(
            "interval",
            &[INTERVAL, BASE_INTERVAL, ABSTRACT_INTERVAL, READABLE_INTERVAL],
            &[INTERVAL, BASE_INTERVAL, ABSTRACT_INTERVAL, READABLE_INTERVAL],
        ),
        family("formatter", &["org.joda.time.format.*"], &[FORMATTER, FORMAT]),
        family("zone", &[ZONE], &[ZONE]),
        family("date-midnight", &[DATE_MIDNIGHT], &[DATE_MIDNIGHT]),
        family("instant", &[INSTANT], &[INSTANT]),
        family(
            "local-date",
            &[LOCAL_DATE, LOCAL_TIME, LOCAL_DATE_TIME],
            &[LOCAL_DATE, LOCAL_TIME, LOCAL_DATE_TIME, ABSTRACT_PARTIAL, READABLE_PARTIAL],
        ),
    ]
}

fn renames() -> Result<Vec<Rename>, MigrateError> {
    let table: &[(&str, &str, bool)] = &[
        ("org.joda.time.base.AbstractDateTime getHourOfDay()", "getHour", true),
        ("org.joda.time.base.AbstractDateTime getMinuteOfHour()", "getMinute", true),
        ("org.joda.time.base.AbstractDateTime getSecondOfMinute()", "getSecond", true),
        ("org.joda.time.base.AbstractDateTime getMonthOfYear()", "getMonthValue", true),
        ("org.joda.time.DateTime withZone(org.joda.time.DateTimeZone)", "withZoneSameInstant", false),
        ("org.joda.time.DateTime withZoneRetainFields(org.joda.time.DateTimeZone)", "withZoneSameLocal", false),
        ("org.joda.time.DateTime withMonthOfYear(int)", "withMonth", false),
        ("org.joda.time.DateTime withHourOfDay(int)", "withHour", false),
        ("org.joda.time.DateTime withMinuteOfHour(int)", "withMinute", false),
        ("org.joda.time.DateTime withSecondOfMinute(int)", "withSecond", false),
        ("org.joda.time.Duration standardDays(long)", "ofDays", false),
        ("org.joda.time.Duration standardHours(long)", "ofHours", false),
        ("org.joda.time.Duration standardMinutes(long)", "ofMinutes", false),
        ("org.joda.time.Duration standardSeconds(long)", "ofSeconds", false),
        ("org.joda.time.Duration millis(long)", "ofMillis", false),
        ("org.joda.time.Duration getStandardDays()", "toDays", false),
        ("org.joda.time.Duration getStandardHours()", "toHours", false),
        ("org.joda.time.Duration getStandardMinutes()", "toMinutes", false),
        ("org.joda.time.Duration getStandardSeconds()", "getSeconds", false),
        ("org.joda.time.Duration toStandardDays()", "toDays", false),
        ("org.joda.time.Duration toStandardHours()", "toHours", false),
        ("org.joda.time.Duration toStandardMinutes()", "toMinutes", false),
        ("org.joda.time.Duration toStandardSeconds()", "getSeconds", false),
        ("org.joda.time.DateTimeZone forID(String)", "of", false),
        ("org.joda.time.format.DateTimeFormat forPattern(String)", "ofPattern", false),
        ("org.joda.time.Instant getMillis()", "toEpochMilli", false),
        ("org.joda.time.base.BaseDuration getMillis()", "toMillis", true),
    ];
    table
        .iter()
        .map(|&(pattern, new_name, overrides)| {
            let pattern = MethodPattern::parse(pattern)?;
            let pattern = if overrides { pattern.match_overrides() } else { pattern };
            Ok(Rename { pattern, new_name: new_name.to_string() })
        })
        .collect()
}

// ============================================================================
// Group builder
// ============================================================================

struct Builder<'a> {
    classpath: &'a Classpath,
    renames: &'a [Rename],
    groups: &'a mut Vec<TemplateGroup>,
}

impl Builder<'_> {
    fn group(&mut self, legacy: &str, build: impl FnOnce(&mut GroupBuilder<'_>) -> Result<(), MigrateError>) -> Result<(), MigrateError> {
        let mut g = GroupBuilder { classpath: self.classpath, renames: self.renames, group: TemplateGroup::new(legacy) };
        build(&mut g)?;
        self.groups.push(g.group);
        Ok(())
    }
}

struct GroupBuilder<'a> {
    classpath: &'a Classpath,
    renames: &'a [Rename],
    group: TemplateGroup,
}

impl GroupBuilder<'_> {
    fn pattern(&self, signature: &str) -> Result<MethodPattern, MigrateError> {
        MethodPattern::parse(&format!("{} {signature}", self.group.legacy))
    }

    fn push(&mut self, pattern: MethodPattern, action: RuleAction, parent_bound: Option<&str>) {
        self.group.rules.push(MigrationRule { pattern, action, parent_bound: parent_bound.map(str::to_string) });
    }

    /// Rewrite with the receiver (for instance members) followed by every argument.
    fn rewrite(&mut self, signature: &str, code: &str, imports: &[&str]) -> Result<(), MigrateError> {
        self.rewrite_bounded(signature, None, code, imports)
    }

    fn rewrite_bounded(&mut self, signature: &str, bound: Option<&str>, code: &str, imports: &[&str]) -> Result<(), MigrateError> {
        let pattern = self.pattern(signature)?;
        let binding = self.default_binding(&pattern)?;
        let template = Template::compile(code, imports, self.classpath)?;
        self.push(pattern, RuleAction::Rewrite(template, binding), bound);
        Ok(())
    }

    fn rewrite_with(&mut self, signature: &str, code: &str, imports: &[&str], slots: &[Slot]) -> Result<(), MigrateError> {
        let pattern = self.pattern(signature)?;
        let template = Template::compile(code, imports, self.classpath)?;
        self.push(pattern, RuleAction::Rewrite(template, ArgBinding::new(slots)), None);
        Ok(())
    }

    fn retain(&mut self, signatures: &[&str]) -> Result<(), MigrateError> {
        for sig in signatures {
            let pattern = self.pattern(sig)?;
            self.push(pattern, RuleAction::Retain, None);
        }
        Ok(())
    }

    fn unsupported(&mut self, signature: &str) -> Result<(), MigrateError> {
        let pattern = self.pattern(signature)?;
        self.push(pattern, RuleAction::Unsupported, None);
        Ok(())
    }

    fn ambiguous(&mut self, signature: &str) -> Result<(), MigrateError> {
        let pattern = self.pattern(signature)?;
        self.push(pattern, RuleAction::Ambiguous, None);
        Ok(())
    }

    fn fuse(&mut self, outer: &str, inner: &str, code: &str, imports: &[&str], slots: &[Slot]) -> Result<(), MigrateError> {
        let fusion = FusionRule {
            outer: self.pattern(outer)?,
            inner: self.pattern(inner)?,
            template: Template::compile(code, imports, self.classpath)?,
            binding: ArgBinding::new(slots),
        };
        self.group.fusions.push(fusion);
        Ok(())
    }

    fn field(&mut self, name: &str, target: &str, target_name: &str) -> Result<(), MigrateError> {
        let pattern = FieldPattern::parse(&format!("{} {name}", self.group.legacy))?;
        self.group.fields.push(FieldRule { pattern, target: target.to_string(), name: target_name.to_string() });
        Ok(())
    }

    fn without_type_mapping(&mut self) {
        self.group.requires_type_mapping = false;
    }

    fn default_binding(&self, pattern: &MethodPattern) -> Result<ArgBinding, MigrateError> {
        let arity = pattern
            .params
            .as_ref()
            .map(Vec::len)
            .ok_or_else(|| MigrateError::template(format!("`{pattern}` matches any arity and needs an explicit binding")))?;
        if pattern.is_constructor() {
            return Ok(ArgBinding::receiver_then_args(false, arity));
        }
        let is_static = self
            .member_is_static(pattern)
            .ok_or_else(|| MigrateError::template(format!("`{pattern}` names no known member")))?;
        Ok(ArgBinding::receiver_then_args(!is_static, arity))
    }

    /// Renamed members are looked up under their original name.
    fn member_is_static(&self, pattern: &MethodPattern) -> Option<bool> {
        let lookup = |name: &str| {
            let info = self.classpath.class_info(&pattern.declaring)?;
            info.methods
                .iter()
                .find(|m| m.name == name && Some(&m.params) == pattern.params.as_ref())
                .map(|m| m.is_static)
        };
        lookup(&pattern.name).or_else(|| {
            self.renames
                .iter()
                .filter(|r| {
                    r.new_name == pattern.name
                        && r.pattern.declaring == pattern.declaring
                        && r.pattern.params == pattern.params
                })
                .find_map(|r| lookup(&r.pattern.name))
        })
    }
}

// ============================================================================
// Families
// ============================================================================

fn date_time(b: &mut Builder<'_>) -> Result<(), MigrateError> {
    const ZDT: &str = "#{any(java.time.ZonedDateTime)}";
    let ints = |n: usize| vec!["#{any(int)}"; n].join(", ");

    b.group(DATE_TIME, |g| {
        g.rewrite("<constructor>()", "ZonedDateTime.now()", &[J_ZDT])?;
        g.rewrite("<constructor>(org.joda.time.DateTimeZone)", "ZonedDateTime.now(#{any(java.time.ZoneId)})", &[J_ZDT])?;
        g.rewrite(
            "<constructor>(long)",
            "ZonedDateTime.ofInstant(Instant.ofEpochMilli(#{any(long)}), ZoneId.systemDefault())",
            &[J_ZDT, J_INSTANT, J_ZONE_ID],
        )?;
        g.rewrite(
            "<constructor>(long, org.joda.time.DateTimeZone)",
            "ZonedDateTime.ofInstant(Instant.ofEpochMilli(#{any(long)}), #{any(java.time.ZoneId)})",
            &[J_ZDT, J_INSTANT],
        )?;
        // Field constructors: missing seconds and nanos are zero, millis scale to nanos.
        for (fields, tail) in [(5, "0, 0"), (6, "0"), (7, "")] {
            let params = vec!["int"; fields].join(", ");
            let head = if fields == 7 { format!("{}, #{{any(int)}} * 1_000_000", ints(6)) } else { ints(fields) };
            let head = if tail.is_empty() { head } else { format!("{head}, {tail}") };
            g.rewrite(
                &format!("<constructor>({params})"),
                &format!("ZonedDateTime.of({head}, ZoneId.systemDefault())"),
                &[J_ZDT, J_ZONE_ID],
            )?;
            g.rewrite(
                &format!("<constructor>({params}, org.joda.time.DateTimeZone)"),
                &format!("ZonedDateTime.of({head}, #{{any(java.time.ZoneId)}})"),
                &[J_ZDT],
            )?;
        }

        g.rewrite("now()", "ZonedDateTime.now()", &[J_ZDT])?;
        g.rewrite("now(org.joda.time.DateTimeZone)", "ZonedDateTime.now(#{any(java.time.ZoneId)})", &[J_ZDT])?;
        g.rewrite("parse(String)", "ZonedDateTime.parse(#{any(String)})", &[J_ZDT])?;
        g.rewrite(
            "parse(String, org.joda.time.format.DateTimeFormatter)",
            "ZonedDateTime.parse(#{any(String)}, #{any(java.time.format.DateTimeFormatter)})",
            &[J_ZDT],
        )?;

        g.rewrite("toDateTime()", ZDT, &[])?;
        g.rewrite(
            "toDateTime(org.joda.time.DateTimeZone)",
            &format!("{ZDT}.withZoneSameInstant(#{{any(java.time.ZoneId)}})"),
            &[],
        )?;
        g.rewrite("toDateMidnight()", &format!("{ZDT}.toLocalDate().atStartOfDay(ZoneId.systemDefault())"), &[J_ZONE_ID])?;
        g.rewrite_with(
            "withMillis(long)",
            &format!("ZonedDateTime.ofInstant(Instant.ofEpochMilli(#{{any(long)}}), {ZDT}.getZone())"),
            &[J_ZDT, J_INSTANT],
            &[Arg(0), Receiver],
        )?;
        g.rewrite(
            "withDate(int, int, int)",
            &format!("{ZDT}.withYear(#{{any(int)}}).withMonth(#{{any(int)}}).withDayOfMonth(#{{any(int)}})"),
            &[],
        )?;
        g.rewrite(
            "withDate(org.joda.time.LocalDate)",
            &format!("{ZDT}.with(#{{any(java.time.temporal.TemporalAdjuster)}})"),
            &[],
        )?;
        g.rewrite(
            "withTime(int, int, int, int)",
            &format!(
                "{ZDT}.withHour(#{{any(int)}}).withMinute(#{{any(int)}}).withSecond(#{{any(int)}}).withNano(#{{any(int)}} * 1_000_000)"
            ),
            &[],
        )?;
        g.rewrite(
            "withTime(org.joda.time.LocalTime)",
            &format!("{ZDT}.with(#{{any(java.time.temporal.TemporalAdjuster)}})"),
            &[],
        )?;
        g.rewrite_with(
            "withTimeAtStartOfDay()",
            &format!("{ZDT}.toLocalDate().atStartOfDay({ZDT}.getZone())"),
            &[],
            &[Receiver, Receiver],
        )?;
        g.rewrite(
            "withDurationAdded(long, int)",
            &format!("{ZDT}.plus(Duration.ofMillis(#{{any(long)}}).multipliedBy(#{{any(int)}}))"),
            &[J_DURATION],
        )?;
        g.rewrite(
            "withDurationAdded(org.joda.time.ReadableDuration, int)",
            &format!("{ZDT}.plus(#{{any(java.time.Duration)}}.multipliedBy(#{{any(int)}}))"),
            &[],
        )?;
        for (name, ty) in [("plus", "long"), ("plusMillis", "int")] {
            g.rewrite(&format!("{name}({ty})"), &format!("{ZDT}.plus(Duration.ofMillis(#{{any({ty})}}))"), &[J_DURATION])?;
        }
        for (name, ty) in [("minus", "long"), ("minusMillis", "int")] {
            g.rewrite(&format!("{name}({ty})"), &format!("{ZDT}.minus(Duration.ofMillis(#{{any({ty})}}))"), &[J_DURATION])?;
        }
        g.rewrite("withWeekyear(int)", &format!("{ZDT}.with(IsoFields.WEEK_BASED_YEAR, #{{any(int)}})"), &[J_ISO_FIELDS])?;
        for (name, field) in [
            ("withWeekOfWeekyear", "ALIGNED_WEEK_OF_YEAR"),
            ("withDayOfWeek", "DAY_OF_WEEK"),
            ("withMillisOfDay", "MILLI_OF_DAY"),
        ] {
            g.rewrite(&format!("{name}(int)"), &format!("{ZDT}.with(ChronoField.{field}, #{{any(int)}})"), &[J_CHRONO_FIELD])?;
        }
        g.rewrite("withMillisOfSecond(int)", &format!("{ZDT}.withNano(#{{any(int)}} * 1_000_000)"), &[])?;

        g.retain(&[
            "plusYears(int)",
            "plusMonths(int)",
            "plusWeeks(int)",
            "plusDays(int)",
            "plusHours(int)",
            "plusMinutes(int)",
            "plusSeconds(int)",
            "minusYears(int)",
            "minusMonths(int)",
            "minusWeeks(int)",
            "minusDays(int)",
            "minusHours(int)",
            "minusMinutes(int)",
            "minusSeconds(int)",
            "plus(org.joda.time.ReadableDuration)",
            "minus(org.joda.time.ReadableDuration)",
            "withYear(int)",
            "withMonth(int)",
            "withDayOfYear(int)",
            "withDayOfMonth(int)",
            "withHour(int)",
            "withMinute(int)",
            "withSecond(int)",
            "withZoneSameInstant(org.joda.time.DateTimeZone)",
            "withZoneSameLocal(org.joda.time.DateTimeZone)",
            "toLocalDate()",
            "toLocalTime()",
            "toLocalDateTime()",
        ])
    })?;

    b.group(ABSTRACT_DATE_TIME, |g| {
        g.rewrite("getDayOfWeek()", &format!("{ZDT}.getDayOfWeek().getValue()"), &[])?;
        for (name, field) in [
            ("getMillisOfSecond", "MILLI_OF_SECOND"),
            ("getMinuteOfDay", "MINUTE_OF_DAY"),
            ("getSecondOfDay", "SECOND_OF_DAY"),
            ("getWeekOfWeekyear", "ALIGNED_WEEK_OF_YEAR"),
        ] {
            g.rewrite(&format!("{name}()"), &format!("{ZDT}.get(ChronoField.{field})"), &[J_CHRONO_FIELD])?;
        }
        g.rewrite("getWeekyear()", &format!("{ZDT}.get(IsoFields.WEEK_BASED_YEAR)"), &[J_ISO_FIELDS])?;
        g.retain(&[
            "getYear()",
            "getDayOfMonth()",
            "getDayOfYear()",
            "getHour()",
            "getMinute()",
            "getSecond()",
            "getMonthValue()",
        ])
    })?;

    b.group(BASE_DATE_TIME, |g| {
        g.rewrite("getMillis()", &format!("{ZDT}.toInstant().toEpochMilli()"), &[])?;
        g.retain(&["getZone()"])
    })?;

    b.group(READABLE_DATE_TIME, |g| {
        g.rewrite("toDateTime()", ZDT, &[])?;
        g.retain(&["getYear()", "getDayOfMonth()"])
    })
}

fn abstract_instant(b: &mut Builder<'_>) -> Result<(), MigrateError> {
    const ZDT: &str = "#{any(java.time.ZonedDateTime)}";
    const INST: &str = "#{any(java.time.Instant)}";
    let dated = Some(READABLE_DATE_TIME);
    let instant = Some(INSTANT);

    b.group(ABSTRACT_INSTANT, |g| {
        for op in ["isAfter", "isBefore", "isEqual"] {
            g.rewrite_bounded(
                &format!("{op}(long)"),
                dated,
                &format!("{ZDT}.{op}(Instant.ofEpochMilli(#{{any(long)}}).atZone(ZoneId.systemDefault()))"),
                &[J_INSTANT, J_ZONE_ID],
            )?;
        }
        for op in ["isAfter", "isBefore"] {
            g.rewrite_bounded(
                &format!("{op}(long)"),
                instant,
                &format!("{INST}.{op}(Instant.ofEpochMilli(#{{any(long)}}))"),
                &[J_INSTANT],
            )?;
        }
        g.rewrite_bounded("isBeforeNow()", dated, &format!("{ZDT}.isBefore(ZonedDateTime.now())"), &[J_ZDT])?;
        g.rewrite_bounded("isAfterNow()", dated, &format!("{ZDT}.isAfter(ZonedDateTime.now())"), &[J_ZDT])?;
        g.rewrite_bounded("isBeforeNow()", instant, &format!("{INST}.isBefore(Instant.now())"), &[J_INSTANT])?;
        g.rewrite_bounded("isAfterNow()", instant, &format!("{INST}.isAfter(Instant.now())"), &[J_INSTANT])?;
        g.rewrite_bounded("toDate()", dated, &format!("Date.from({ZDT}.toInstant())"), &[J_DATE])?;
        g.rewrite_bounded("toDate()", instant, &format!("Date.from({INST})"), &[J_DATE])?;
        g.rewrite(
            "toString(org.joda.time.format.DateTimeFormatter)",
            &format!("{ZDT}.format(#{{any(java.time.format.DateTimeFormatter)}})"),
            &[],
        )?;
        g.rewrite_bounded("toInstant()", dated, &format!("{ZDT}.toInstant()"), &[])?;
        g.rewrite_bounded("toInstant()", instant, INST, &[])?;
        g.rewrite_bounded("toDateTime()", instant, &format!("{INST}.atZone(ZoneId.systemDefault())"), &[J_ZONE_ID])?;
        g.retain(&[
            "isAfter(org.joda.time.ReadableInstant)",
            "isBefore(org.joda.time.ReadableInstant)",
            "isEqual(org.joda.time.ReadableInstant)",
            "getZone()",
        ])
    })?;

    b.group(READABLE_INSTANT, |g| {
        g.rewrite_bounded("getMillis()", dated, &format!("{ZDT}.toInstant().toEpochMilli()"), &[])?;
        g.rewrite_bounded("getMillis()", instant, &format!("{INST}.toEpochMilli()"), &[])?;
        g.retain(&[
            "isAfter(org.joda.time.ReadableInstant)",
            "isBefore(org.joda.time.ReadableInstant)",
            "isEqual(org.joda.time.ReadableInstant)",
        ])
    })
}

fn duration(b: &mut Builder<'_>) -> Result<(), MigrateError> {
    const DUR: &str = "#{any(java.time.Duration)}";

    b.group(DURATION, |g| {
        g.rewrite("<constructor>(long)", "Duration.ofMillis(#{any(long)})", &[J_DURATION])?;
        g.rewrite(
            "<constructor>(long, long)",
            "Duration.between(Instant.ofEpochMilli(#{any(long)}), Instant.ofEpochMilli(#{any(long)}))",
            &[J_DURATION, J_INSTANT],
        )?;
        g.rewrite(
            "<constructor>(org.joda.time.ReadableInstant, org.joda.time.ReadableInstant)",
            "Duration.between(#{any()}, #{any()})",
            &[J_DURATION],
        )?;
        for unit in ["Days", "Hours", "Minutes", "Seconds", "Millis"] {
            g.rewrite(&format!("of{unit}(long)"), &format!("Duration.of{unit}(#{{any(long)}})"), &[J_DURATION])?;
        }
        g.rewrite("toDuration()", DUR, &[])?;
        g.rewrite_with("withMillis(long)", "Duration.ofMillis(#{any(long)})", &[J_DURATION], &[Arg(0)])?;
        g.rewrite("withDurationAdded(long, int)", &format!("{DUR}.plusMillis(#{{any(long)}} * #{{any(int)}})"), &[])?;
        g.rewrite(
            "withDurationAdded(org.joda.time.ReadableDuration, int)",
            &format!("{DUR}.plus({DUR}.multipliedBy(#{{any(int)}}))"),
            &[],
        )?;
        g.rewrite("plus(long)", &format!("{DUR}.plusMillis(#{{any(long)}})"), &[])?;
        g.rewrite("minus(long)", &format!("{DUR}.minusMillis(#{{any(long)}})"), &[])?;
        g.retain(&[
            "parse(String)",
            "toDays()",
            "toHours()",
            "toMinutes()",
            "getSeconds()",
            "plus(org.joda.time.ReadableDuration)",
            "minus(org.joda.time.ReadableDuration)",
            "multipliedBy(long)",
            "dividedBy(long)",
            "negated()",
            "abs()",
        ])?;
        g.field("ZERO", J_DURATION, "ZERO")
    })?;

    b.group(BASE_DURATION, |g| {
        g.retain(&["toMillis()"])?;
        g.unsupported("toIntervalFrom(org.joda.time.ReadableInstant)")
    })?;

    b.group(ABSTRACT_DURATION, |g| {
        g.rewrite("toDuration()", DUR, &[])?;
        g.rewrite("isLongerThan(org.joda.time.ReadableDuration)", &format!("{DUR}.compareTo({DUR}) > 0"), &[])?;
        g.rewrite("isShorterThan(org.joda.time.ReadableDuration)", &format!("{DUR}.compareTo({DUR}) < 0"), &[])?;
        g.rewrite("isEqual(org.joda.time.ReadableDuration)", &format!("{DUR}.equals({DUR})"), &[])
    })?;

    b.group(READABLE_DURATION, |g| {
        g.rewrite("getMillis()", &format!("{DUR}.toMillis()"), &[])?;
        g.rewrite("toDuration()", DUR, &[])
    })
}

fn periods(b: &mut Builder<'_>) -> Result<(), MigrateError> {
    for (class, unit, chrono) in [("Days", "days", "DAYS"), ("Hours", "hours", "HOURS"), ("Minutes", "minutes", "MINUTES"), ("Seconds", "seconds", "SECONDS")] {
        b.group(&format!("org.joda.time.{class}"), |g| {
            g.without_type_mapping();
            let between = format!("{unit}Between(..)");
            g.fuse(
                &format!("get{class}()"),
                &between,
                &format!("(int) ChronoUnit.{chrono}.between(#{{any()}}, #{{any()}})"),
                &[J_CHRONO_UNIT],
                &[InnerArg(0), InnerArg(1)],
            )?;
            g.fuse(
                "toStandardDuration()",
                &between,
                &format!("Duration.of{class}(ChronoUnit.{chrono}.between(#{{any()}}, #{{any()}}))"),
                &[J_DURATION, J_CHRONO_UNIT],
                &[InnerArg(0), InnerArg(1)],
            )?;
            g.fuse(
                "toStandardDuration()",
                &format!("{unit}(int)"),
                &format!("Duration.of{class}(#{{any(int)}})"),
                &[J_DURATION],
                &[InnerArg(0)],
            )?;
            if class == "Days" {
                g.fuse(
                    "getDays()",
                    "daysIn(org.joda.time.ReadableInterval)",
                    "(int) ChronoUnit.DAYS.between(#{any()}.getStart(), #{any()}.getEnd())",
                    &[J_CHRONO_UNIT],
                    &[InnerArg(0), InnerArg(0)],
                )?;
            }
            g.rewrite(&format!("{unit}(int)"), &format!("Duration.of{class}(#{{any(int)}})"), &[J_DURATION])
        })?;
    }
    b.group(SINGLE_FIELD_PERIOD, |g| {
        g.without_type_mapping();
        Ok(())
    })
}

fn interval(b: &mut Builder<'_>) -> Result<(), MigrateError> {
    const IV: &str = "#{any(org.threeten.extra.Interval)}";
    const ZDT: &str = "#{any(java.time.ZonedDateTime)}";

    b.group(INTERVAL, |g| {
        g.rewrite(
            "<constructor>(long, long)",
            "Interval.of(Instant.ofEpochMilli(#{any(long)}), Instant.ofEpochMilli(#{any(long)}))",
            &[EXTRA_INTERVAL, J_INSTANT],
        )?;
        g.rewrite(
            "<constructor>(org.joda.time.ReadableInstant, org.joda.time.ReadableInstant)",
            &format!("Interval.of({ZDT}.toInstant(), {ZDT}.toInstant())"),
            &[EXTRA_INTERVAL],
        )?;
        g.rewrite(
            "<constructor>(org.joda.time.ReadableInstant, org.joda.time.ReadableDuration)",
            &format!("Interval.of({ZDT}.toInstant(), #{{any(java.time.Duration)}})"),
            &[EXTRA_INTERVAL],
        )?;
        g.unsupported("<constructor>(long, long, org.joda.time.DateTimeZone)")?;
        g.rewrite("withStart(org.joda.time.ReadableInstant)", &format!("{IV}.withStart({ZDT}.toInstant())"), &[])?;
        g.rewrite("withEnd(org.joda.time.ReadableInstant)", &format!("{IV}.withEnd({ZDT}.toInstant())"), &[])
    })?;

    for legacy in [ABSTRACT_INTERVAL, READABLE_INTERVAL] {
        b.group(legacy, |g| {
            g.rewrite("getStart()", &format!("{IV}.getStart().atZone(ZoneId.systemDefault())"), &[J_ZONE_ID])?;
            g.rewrite("getEnd()", &format!("{IV}.getEnd().atZone(ZoneId.systemDefault())"), &[J_ZONE_ID])?;
            g.rewrite("toDurationMillis()", &format!("{IV}.toDuration().toMillis()"), &[])?;
            g.retain(&["toDuration()"])?;
            if legacy == ABSTRACT_INTERVAL {
                g.rewrite("contains(long)", &format!("{IV}.contains(Instant.ofEpochMilli(#{{any(long)}}))"), &[J_INSTANT])?;
                g.rewrite("contains(org.joda.time.ReadableInstant)", &format!("{IV}.contains({ZDT}.toInstant())"), &[])?;
                g.retain(&["overlaps(org.joda.time.ReadableInterval)"])?;
                // Joda compares against the half-open interval, threeten-extra against an instant.
                g.ambiguous("isBefore(long)")?;
                g.ambiguous("isAfter(long)")?;
            }
            Ok(())
        })?;
    }

    b.group(BASE_INTERVAL, |g| {
        g.rewrite("getStartMillis()", &format!("{IV}.getStart().toEpochMilli()"), &[])?;
        g.rewrite("getEndMillis()", &format!("{IV}.getEnd().toEpochMilli()"), &[])
    })
}

fn formatter(b: &mut Builder<'_>) -> Result<(), MigrateError> {
    const FMT: &str = "#{any(java.time.format.DateTimeFormatter)}";

    b.group(FORMATTER, |g| {
        g.rewrite_with("parseDateTime(String)", &format!("ZonedDateTime.parse(#{{any(String)}}, {FMT})"), &[J_ZDT], &[Arg(0), Receiver])?;
        g.rewrite_with(
            "parseMillis(String)",
            &format!("ZonedDateTime.parse(#{{any(String)}}, {FMT}).toInstant().toEpochMilli()"),
            &[J_ZDT],
            &[Arg(0), Receiver],
        )?;
        g.rewrite_with("parseLocalDate(String)", &format!("LocalDate.parse(#{{any(String)}}, {FMT})"), &[J_LOCAL_DATE], &[Arg(0), Receiver])?;
        g.rewrite_with(
            "print(long)",
            &format!("ZonedDateTime.ofInstant(Instant.ofEpochMilli(#{{any(long)}}), ZoneId.systemDefault()).format({FMT})"),
            &[J_ZDT, J_INSTANT, J_ZONE_ID],
            &[Arg(0), Receiver],
        )?;
        g.rewrite_with(
            "print(org.joda.time.ReadableInstant)",
            &format!("#{{any(java.time.ZonedDateTime)}}.format({FMT})"),
            &[],
            &[Arg(0), Receiver],
        )?;
        g.rewrite("print(org.joda.time.ReadablePartial)", &format!("{FMT}.format(#{{any()}})"), &[])?;
        g.rewrite("withZoneUTC()", &format!("{FMT}.withZone(ZoneOffset.UTC)"), &[J_ZONE_OFFSET])?;
        g.retain(&["withZone(org.joda.time.DateTimeZone)", "withLocale(java.util.Locale)"])
    })?;

    b.group(FORMAT, |g| {
        g.rewrite("ofPattern(String)", "DateTimeFormatter.ofPattern(#{any(String)})", &[J_FORMATTER])?;
        for (length, style) in [("short", "SHORT"), ("medium", "MEDIUM"), ("long", "LONG"), ("full", "FULL")] {
            g.rewrite(
                &format!("{length}Date()"),
                &format!("DateTimeFormatter.ofLocalizedDate(FormatStyle.{style})"),
                &[J_FORMATTER, J_FORMAT_STYLE],
            )?;
            g.rewrite(
                &format!("{length}Time()"),
                &format!("DateTimeFormatter.ofLocalizedTime(FormatStyle.{style})"),
                &[J_FORMATTER, J_FORMAT_STYLE],
            )?;
            g.rewrite(
                &format!("{length}DateTime()"),
                &format!("DateTimeFormatter.ofLocalizedDateTime(FormatStyle.{style}, FormatStyle.{style})"),
                &[J_FORMATTER, J_FORMAT_STYLE],
            )?;
        }
        g.unsupported("forStyle(String)")
    })
}

fn zone(b: &mut Builder<'_>) -> Result<(), MigrateError> {
    b.group(ZONE, |g| {
        g.rewrite("of(String)", "ZoneId.of(#{any(String)})", &[J_ZONE_ID])?;
        g.rewrite("forOffsetHours(int)", "ZoneOffset.ofHours(#{any(int)})", &[J_ZONE_OFFSET])?;
        g.rewrite("forOffsetHoursMinutes(int, int)", "ZoneOffset.ofHoursMinutes(#{any(int)}, #{any(int)})", &[J_ZONE_OFFSET])?;
        g.rewrite("forTimeZone(java.util.TimeZone)", "#{any(java.util.TimeZone)}.toZoneId()", &[])?;
        g.rewrite("getDefault()", "ZoneId.systemDefault()", &[J_ZONE_ID])?;
        g.rewrite("getID()", "#{any(java.time.ZoneId)}.getId()", &[])?;
        g.rewrite("toTimeZone()", "TimeZone.getTimeZone(#{any(java.time.ZoneId)})", &[J_TIME_ZONE])?;
        g.field("UTC", J_ZONE_OFFSET, "UTC")
    })
}

fn date_midnight(b: &mut Builder<'_>) -> Result<(), MigrateError> {
    const SYSTEM_MIDNIGHT: &str = "LocalDate.now().atStartOfDay(ZoneId.systemDefault())";

    b.group(DATE_MIDNIGHT, |g| {
        g.rewrite("<constructor>()", SYSTEM_MIDNIGHT, &[J_LOCAL_DATE, J_ZONE_ID])?;
        g.rewrite("now()", SYSTEM_MIDNIGHT, &[J_LOCAL_DATE, J_ZONE_ID])?;
        for sig in ["<constructor>(org.joda.time.DateTimeZone)", "now(org.joda.time.DateTimeZone)"] {
            g.rewrite_with(
                sig,
                "LocalDate.now(#{any(java.time.ZoneId)}).atStartOfDay(#{any(java.time.ZoneId)})",
                &[J_LOCAL_DATE],
                &[Arg(0), Arg(0)],
            )?;
        }
        g.rewrite(
            "<constructor>(long)",
            "Instant.ofEpochMilli(#{any(long)}).atZone(ZoneId.systemDefault()).toLocalDate().atStartOfDay(ZoneId.systemDefault())",
            &[J_INSTANT, J_ZONE_ID],
        )?;
        g.rewrite(
            "<constructor>(int, int, int)",
            "LocalDate.of(#{any(int)}, #{any(int)}, #{any(int)}).atStartOfDay(ZoneId.systemDefault())",
            &[J_LOCAL_DATE, J_ZONE_ID],
        )?;
        g.retain(&["plusDays(int)"])
    })
}

fn instant(b: &mut Builder<'_>) -> Result<(), MigrateError> {
    const INST: &str = "#{any(java.time.Instant)}";

    b.group(INSTANT, |g| {
        g.rewrite("<constructor>()", "Instant.now()", &[J_INSTANT])?;
        g.rewrite("<constructor>(long)", "Instant.ofEpochMilli(#{any(long)})", &[J_INSTANT])?;
        g.rewrite("plus(long)", &format!("{INST}.plusMillis(#{{any(long)}})"), &[])?;
        g.rewrite("minus(long)", &format!("{INST}.minusMillis(#{{any(long)}})"), &[])?;
        g.rewrite_with("withMillis(long)", "Instant.ofEpochMilli(#{any(long)})", &[J_INSTANT], &[Arg(0)])?;
        g.retain(&[
            "now()",
            "ofEpochMilli(long)",
            "parse(String)",
            "toEpochMilli()",
            "plus(org.joda.time.ReadableDuration)",
            "minus(org.joda.time.ReadableDuration)",
        ])
    })
}

fn local_date(b: &mut Builder<'_>) -> Result<(), MigrateError> {
    const LD: &str = "#{any(java.time.LocalDate)}";

    b.group(LOCAL_DATE, |g| {
        g.rewrite("<constructor>()", "LocalDate.now()", &[J_LOCAL_DATE])?;
        g.rewrite("<constructor>(org.joda.time.DateTimeZone)", "LocalDate.now(#{any(java.time.ZoneId)})", &[J_LOCAL_DATE])?;
        g.rewrite("<constructor>(int, int, int)", "LocalDate.of(#{any(int)}, #{any(int)}, #{any(int)})", &[J_LOCAL_DATE])?;
        g.rewrite(
            "<constructor>(long)",
            "Instant.ofEpochMilli(#{any(long)}).atZone(ZoneId.systemDefault()).toLocalDate()",
            &[J_INSTANT, J_ZONE_ID],
        )?;
        g.rewrite(
            "<constructor>(long, org.joda.time.DateTimeZone)",
            "Instant.ofEpochMilli(#{any(long)}).atZone(#{any(java.time.ZoneId)}).toLocalDate()",
            &[J_INSTANT],
        )?;
        g.rewrite("getMonthOfYear()", &format!("{LD}.getMonthValue()"), &[])?;
        g.rewrite("getDayOfWeek()", &format!("{LD}.getDayOfWeek().getValue()"), &[])?;
        g.rewrite("toDateTimeAtStartOfDay()", &format!("{LD}.atStartOfDay(ZoneId.systemDefault())"), &[J_ZONE_ID])?;
        g.rewrite(
            "toDateTimeAtStartOfDay(org.joda.time.DateTimeZone)",
            &format!("{LD}.atStartOfDay(#{{any(java.time.ZoneId)}})"),
            &[],
        )?;
        g.rewrite(
            "toLocalDateTime(org.joda.time.LocalTime)",
            &format!("{LD}.atTime(#{{any(java.time.LocalTime)}})"),
            &[],
        )?;
        g.retain(&[
            "now()",
            "getYear()",
            "getDayOfMonth()",
            "plusDays(int)",
            "minusDays(int)",
            "isAfter(org.joda.time.ReadablePartial)",
            "isBefore(org.joda.time.ReadablePartial)",
        ])
    })?;

    b.group(LOCAL_TIME, |g| {
        g.rewrite("<constructor>()", "LocalTime.now()", &[J_LOCAL_TIME])?;
        g.rewrite("<constructor>(int, int)", "LocalTime.of(#{any(int)}, #{any(int)})", &[J_LOCAL_TIME])?;
        g.rewrite("<constructor>(int, int, int)", "LocalTime.of(#{any(int)}, #{any(int)}, #{any(int)})", &[J_LOCAL_TIME])?;
        g.rewrite("getHourOfDay()", "#{any(java.time.LocalTime)}.getHour()", &[])?;
        g.rewrite("getMinuteOfHour()", "#{any(java.time.LocalTime)}.getMinute()", &[])?;
        g.retain(&["now()"])?;
        g.field("MIDNIGHT", J_LOCAL_TIME, "MIDNIGHT")
    })?;

    b.group(LOCAL_DATE_TIME, |g| {
        g.rewrite("<constructor>()", "LocalDateTime.now()", &[J_LOCAL_DATE_TIME])?;
        g.retain(&["now()"])
    })?;

    b.group(ABSTRACT_PARTIAL, |g| {
        g.without_type_mapping();
        g.rewrite_with(
            "toString(org.joda.time.format.DateTimeFormatter)",
            "#{any(java.time.format.DateTimeFormatter)}.format(#{any()})",
            &[],
            &[Arg(0), Receiver],
        )
    })?;

    b.group(READABLE_PARTIAL, |g| {
        g.without_type_mapping();
        Ok(())
    })
}
