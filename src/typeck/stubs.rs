//! Class declarations for the libraries migrated code talks to: Joda-Time, `java.time`,
//! threeten-extra, and the slice of `java.lang` / `java.util` those APIs mention.
//!
//! Only members that appear in the migration catalog, its templates, or ordinary call sites
//! around them are declared. Anything missing simply attributes as `Unknown`.

use super::classpath::Classpath;

const JODA: &[&str] = &[
    "org.joda.time.DateTime",
    "org.joda.time.DateMidnight",
    "org.joda.time.DateTimeZone",
    "org.joda.time.Duration",
    "org.joda.time.Instant",
    "org.joda.time.Interval",
    "org.joda.time.LocalDate",
    "org.joda.time.LocalTime",
    "org.joda.time.LocalDateTime",
    "org.joda.time.ReadableInstant",
    "org.joda.time.ReadableDateTime",
    "org.joda.time.ReadableDuration",
    "org.joda.time.ReadableInterval",
    "org.joda.time.ReadablePartial",
    "org.joda.time.Days",
    "org.joda.time.Hours",
    "org.joda.time.Minutes",
    "org.joda.time.Seconds",
    "org.joda.time.base.AbstractInstant",
    "org.joda.time.base.AbstractDateTime",
    "org.joda.time.base.BaseDateTime",
    "org.joda.time.base.AbstractDuration",
    "org.joda.time.base.BaseDuration",
    "org.joda.time.base.AbstractInterval",
    "org.joda.time.base.BaseInterval",
    "org.joda.time.base.AbstractPartial",
    "org.joda.time.base.BaseSingleFieldPeriod",
    "org.joda.time.format.DateTimeFormat",
    "org.joda.time.format.DateTimeFormatter",
    "java.util.Date",
    "java.util.Locale",
    "java.util.TimeZone",
];

const JAVA_TIME: &[&str] = &[
    "java.time.Instant",
    "java.time.Duration",
    "java.time.ZonedDateTime",
    "java.time.LocalDate",
    "java.time.LocalDateTime",
    "java.time.LocalTime",
    "java.time.ZoneId",
    "java.time.ZoneOffset",
    "java.time.DayOfWeek",
    "java.time.format.DateTimeFormatter",
    "java.time.format.FormatStyle",
    "java.time.temporal.ChronoUnit",
    "java.time.temporal.ChronoField",
    "java.time.temporal.IsoFields",
    "java.time.temporal.Temporal",
    "java.time.temporal.TemporalAccessor",
    "java.time.temporal.TemporalAdjuster",
    "java.time.temporal.TemporalAmount",
    "java.time.temporal.TemporalField",
    "java.time.temporal.TemporalUnit",
    "java.util.Date",
    "java.util.Locale",
    "java.util.TimeZone",
];

/// The classpath every engine instance shares.
pub fn standard_classpath() -> Classpath {
    let mut cp = Classpath::new();
    java_lang(&mut cp);
    java_util(&mut cp);
    java_time(&mut cp);
    threeten_extra(&mut cp);
    joda_instants(&mut cp);
    joda_date_time(&mut cp);
    joda_durations(&mut cp);
    joda_periods(&mut cp);
    joda_intervals(&mut cp);
    joda_misc(&mut cp);
    cp
}

fn java_lang(cp: &mut Classpath) {
    cp.stub("java.lang.Object", &[], |c| {
        c.methods(&["String toString()", "boolean equals(Object)", "int hashCode()"]);
    });
    cp.stub("java.lang.CharSequence", &[], |c| {
        c.interface().methods(&["int length()"]);
    });
    cp.stub("java.lang.Comparable", &[], |c| {
        c.interface();
    });
    cp.stub("java.lang.String", &[], |c| {
        c.extends(&["CharSequence", "Comparable"]).methods(&[
            "static String format(String, Object...)",
            "static String valueOf(Object)",
            "static String valueOf(long)",
            "int length()",
            "boolean isEmpty()",
            "String trim()",
            "String substring(int)",
            "String substring(int, int)",
        ]);
    });
    cp.stub("java.lang.Number", &[], |c| {
        c.methods(&["int intValue()", "long longValue()"]);
    });
    cp.stub("java.lang.Double", &[], |c| {
        c.extends(&["Number", "Comparable"]);
    });
    cp.stub("java.lang.Long", &[], |c| {
        c.extends(&["Number", "Comparable"]).methods(&["static long parseLong(String)", "static Long valueOf(long)"]);
    });
    cp.stub("java.lang.Integer", &[], |c| {
        c.extends(&["Number", "Comparable"]).methods(&["static int parseInt(String)", "static Integer valueOf(int)"]);
    });
    cp.stub("java.lang.Boolean", &[], |_| {});
    cp.stub("java.lang.System", &[], |c| {
        c.methods(&["static long currentTimeMillis()", "static long nanoTime()"]);
    });
    cp.stub("java.lang.Math", &[], |c| {
        c.methods(&[
            "static long abs(long)",
            "static int abs(int)",
            "static long max(long, long)",
            "static long min(long, long)",
            "static int toIntExact(long)",
        ]);
    });
}

fn java_util(cp: &mut Classpath) {
    cp.stub("java.util.Date", JAVA_TIME, |c| {
        c.extends(&["Comparable"])
            .ctors(&["", "long"])
            .methods(&["static Date from(Instant)", "long getTime()", "Instant toInstant()", "boolean after(Date)", "boolean before(Date)"]);
    });
    cp.stub("java.util.TimeZone", JAVA_TIME, |c| {
        c.methods(&[
            "static TimeZone getDefault()",
            "static TimeZone getTimeZone(String)",
            "static TimeZone getTimeZone(ZoneId)",
            "String getID()",
            "ZoneId toZoneId()",
        ]);
    });
    cp.stub("java.util.Locale", &[], |c| {
        c.ctors(&["String"])
            .methods(&["static Locale getDefault()", "static Locale forLanguageTag(String)"])
            .fields(&["static Locale US", "static Locale ENGLISH", "static Locale ROOT"]);
    });
}

fn java_time(cp: &mut Classpath) {
    cp.stub("java.time.temporal.TemporalAccessor", JAVA_TIME, |c| {
        c.interface().methods(&["int get(TemporalField)", "long getLong(TemporalField)"]);
    });
    cp.stub("java.time.temporal.Temporal", JAVA_TIME, |c| {
        c.interface().extends(&["TemporalAccessor"]);
    });
    cp.stub("java.time.temporal.TemporalAdjuster", JAVA_TIME, |c| {
        c.interface();
    });
    cp.stub("java.time.temporal.TemporalAmount", JAVA_TIME, |c| {
        c.interface();
    });
    cp.stub("java.time.temporal.TemporalField", JAVA_TIME, |c| {
        c.interface();
    });
    cp.stub("java.time.temporal.TemporalUnit", JAVA_TIME, |c| {
        c.interface().methods(&["long between(Temporal, Temporal)"]);
    });
    cp.stub("java.time.temporal.ChronoUnit", JAVA_TIME, |c| {
        c.extends(&["TemporalUnit"])
            .methods(&["long between(Temporal, Temporal)", "Duration getDuration()"])
            .fields(&[
                "static ChronoUnit NANOS",
                "static ChronoUnit MILLIS",
                "static ChronoUnit SECONDS",
                "static ChronoUnit MINUTES",
                "static ChronoUnit HOURS",
                "static ChronoUnit DAYS",
                "static ChronoUnit WEEKS",
                "static ChronoUnit MONTHS",
                "static ChronoUnit YEARS",
            ]);
    });
    cp.stub("java.time.temporal.ChronoField", JAVA_TIME, |c| {
        c.extends(&["TemporalField"]).fields(&[
            "static ChronoField MILLI_OF_SECOND",
            "static ChronoField MILLI_OF_DAY",
            "static ChronoField SECOND_OF_DAY",
            "static ChronoField MINUTE_OF_DAY",
            "static ChronoField DAY_OF_WEEK",
            "static ChronoField ALIGNED_WEEK_OF_YEAR",
        ]);
    });
    cp.stub("java.time.temporal.IsoFields", JAVA_TIME, |c| {
        c.fields(&["static TemporalField WEEK_BASED_YEAR", "static TemporalField WEEK_OF_WEEK_BASED_YEAR"]);
    });
    cp.stub("java.time.DayOfWeek", JAVA_TIME, |c| {
        c.extends(&["TemporalAccessor", "TemporalAdjuster"])
            .methods(&["int getValue()", "static DayOfWeek of(int)"]);
    });
    cp.stub("java.time.ZoneId", JAVA_TIME, |c| {
        c.methods(&["static ZoneId of(String)", "static ZoneId systemDefault()", "String getId()"]);
    });
    cp.stub("java.time.ZoneOffset", JAVA_TIME, |c| {
        c.extends(&["ZoneId", "TemporalAccessor", "TemporalAdjuster", "Comparable"])
            .methods(&[
                "static ZoneOffset of(String)",
                "static ZoneOffset ofHours(int)",
                "static ZoneOffset ofHoursMinutes(int, int)",
                "int getTotalSeconds()",
            ])
            .fields(&["static ZoneOffset UTC"]);
    });
    cp.stub("java.time.Instant", JAVA_TIME, |c| {
        c.extends(&["Temporal", "TemporalAdjuster", "Comparable"])
            .methods(&[
                "static Instant now()",
                "static Instant ofEpochMilli(long)",
                "static Instant ofEpochSecond(long)",
                "static Instant parse(CharSequence)",
                "long toEpochMilli()",
                "long getEpochSecond()",
                "ZonedDateTime atZone(ZoneId)",
                "Instant plus(TemporalAmount)",
                "Instant minus(TemporalAmount)",
                "Instant plusMillis(long)",
                "Instant minusMillis(long)",
                "Instant plusSeconds(long)",
                "Instant minusSeconds(long)",
                "boolean isAfter(Instant)",
                "boolean isBefore(Instant)",
                "int compareTo(Instant)",
            ]);
    });
    cp.stub("java.time.Duration", JAVA_TIME, |c| {
        c.extends(&["TemporalAmount", "Comparable"])
            .methods(&[
                "static Duration ofDays(long)",
                "static Duration ofHours(long)",
                "static Duration ofMinutes(long)",
                "static Duration ofSeconds(long)",
                "static Duration ofMillis(long)",
                "static Duration ofNanos(long)",
                "static Duration between(Temporal, Temporal)",
                "long toDays()",
                "long toHours()",
                "long toMinutes()",
                "long getSeconds()",
                "long toMillis()",
                "long toNanos()",
                "Duration plus(Duration)",
                "Duration minus(Duration)",
                "Duration plusDays(long)",
                "Duration plusHours(long)",
                "Duration plusMinutes(long)",
                "Duration plusSeconds(long)",
                "Duration plusMillis(long)",
                "Duration minusMillis(long)",
                "Duration multipliedBy(long)",
                "Duration dividedBy(long)",
                "Duration negated()",
                "Duration abs()",
                "boolean isNegative()",
                "boolean isZero()",
                "int compareTo(Duration)",
            ])
            .fields(&["static Duration ZERO"]);
    });
    cp.stub("java.time.LocalTime", JAVA_TIME, |c| {
        c.extends(&["Temporal", "TemporalAdjuster", "Comparable"])
            .methods(&["static LocalTime now()", "static LocalTime of(int, int)", "static LocalTime of(int, int, int)", "int getHour()", "int getMinute()"])
            .fields(&["static LocalTime MIDNIGHT", "static LocalTime NOON"]);
    });
    cp.stub("java.time.LocalDateTime", JAVA_TIME, |c| {
        c.extends(&["Temporal", "TemporalAdjuster", "Comparable"])
            .methods(&[
                "static LocalDateTime now()",
                "static LocalDateTime of(int, int, int, int, int)",
                "ZonedDateTime atZone(ZoneId)",
                "Instant toInstant(ZoneOffset)",
                "LocalDate toLocalDate()",
                "LocalTime toLocalTime()",
            ]);
    });
    cp.stub("java.time.LocalDate", JAVA_TIME, |c| {
        c.extends(&["Temporal", "TemporalAdjuster", "Comparable"])
            .methods(&[
                "static LocalDate now()",
                "static LocalDate now(ZoneId)",
                "static LocalDate of(int, int, int)",
                "static LocalDate parse(CharSequence)",
                "ZonedDateTime atStartOfDay(ZoneId)",
                "LocalDateTime atStartOfDay()",
                "LocalDateTime atTime(LocalTime)",
                "DayOfWeek getDayOfWeek()",
                "int getYear()",
                "int getMonthValue()",
                "int getDayOfMonth()",
                "int getDayOfYear()",
                "LocalDate plusDays(long)",
                "LocalDate minusDays(long)",
                "LocalDate plusMonths(long)",
                "LocalDate plusYears(long)",
                "boolean isAfter(LocalDate)",
                "boolean isBefore(LocalDate)",
                "String format(DateTimeFormatter)",
            ]);
    });
    cp.stub("java.time.ZonedDateTime", JAVA_TIME, |c| {
        c.extends(&["Temporal", "Comparable"])
            .methods(&[
                "static ZonedDateTime now()",
                "static ZonedDateTime now(ZoneId)",
                "static ZonedDateTime of(int, int, int, int, int, int, int, ZoneId)",
                "static ZonedDateTime of(LocalDate, LocalTime, ZoneId)",
                "static ZonedDateTime ofInstant(Instant, ZoneId)",
                "static ZonedDateTime parse(CharSequence)",
                "static ZonedDateTime parse(CharSequence, DateTimeFormatter)",
                "Instant toInstant()",
                "long toEpochSecond()",
                "ZoneId getZone()",
                "ZonedDateTime withZoneSameInstant(ZoneId)",
                "ZonedDateTime withZoneSameLocal(ZoneId)",
                "LocalDate toLocalDate()",
                "LocalDateTime toLocalDateTime()",
                "LocalTime toLocalTime()",
                "int getYear()",
                "int getMonthValue()",
                "int getDayOfMonth()",
                "int getDayOfYear()",
                "DayOfWeek getDayOfWeek()",
                "int getHour()",
                "int getMinute()",
                "int getSecond()",
                "int getNano()",
                "ZonedDateTime with(TemporalAdjuster)",
                "ZonedDateTime with(TemporalField, long)",
                "ZonedDateTime withYear(int)",
                "ZonedDateTime withMonth(int)",
                "ZonedDateTime withDayOfMonth(int)",
                "ZonedDateTime withDayOfYear(int)",
                "ZonedDateTime withHour(int)",
                "ZonedDateTime withMinute(int)",
                "ZonedDateTime withSecond(int)",
                "ZonedDateTime withNano(int)",
                "ZonedDateTime plus(TemporalAmount)",
                "ZonedDateTime plus(long, TemporalUnit)",
                "ZonedDateTime minus(TemporalAmount)",
                "ZonedDateTime minus(long, TemporalUnit)",
                "ZonedDateTime plusYears(long)",
                "ZonedDateTime plusMonths(long)",
                "ZonedDateTime plusWeeks(long)",
                "ZonedDateTime plusDays(long)",
                "ZonedDateTime plusHours(long)",
                "ZonedDateTime plusMinutes(long)",
                "ZonedDateTime plusSeconds(long)",
                "ZonedDateTime plusNanos(long)",
                "ZonedDateTime minusYears(long)",
                "ZonedDateTime minusMonths(long)",
                "ZonedDateTime minusWeeks(long)",
                "ZonedDateTime minusDays(long)",
                "ZonedDateTime minusHours(long)",
                "ZonedDateTime minusMinutes(long)",
                "ZonedDateTime minusSeconds(long)",
                "ZonedDateTime minusNanos(long)",
                "ZonedDateTime truncatedTo(TemporalUnit)",
                "boolean isAfter(ZonedDateTime)",
                "boolean isBefore(ZonedDateTime)",
                "boolean isEqual(ZonedDateTime)",
                "String format(DateTimeFormatter)",
            ]);
    });
    cp.stub("java.time.format.FormatStyle", JAVA_TIME, |c| {
        c.fields(&[
            "static FormatStyle SHORT",
            "static FormatStyle MEDIUM",
            "static FormatStyle LONG",
            "static FormatStyle FULL",
        ]);
    });
    cp.stub("java.time.format.DateTimeFormatter", JAVA_TIME, |c| {
        c.methods(&[
            "static DateTimeFormatter ofPattern(String)",
            "static DateTimeFormatter ofPattern(String, Locale)",
            "static DateTimeFormatter ofLocalizedDate(FormatStyle)",
            "static DateTimeFormatter ofLocalizedTime(FormatStyle)",
            "static DateTimeFormatter ofLocalizedDateTime(FormatStyle)",
            "static DateTimeFormatter ofLocalizedDateTime(FormatStyle, FormatStyle)",
            "DateTimeFormatter withZone(ZoneId)",
            "DateTimeFormatter withLocale(Locale)",
            "String format(TemporalAccessor)",
            "TemporalAccessor parse(CharSequence)",
        ])
        .fields(&[
            "static DateTimeFormatter ISO_INSTANT",
            "static DateTimeFormatter ISO_LOCAL_DATE",
            "static DateTimeFormatter ISO_OFFSET_DATE_TIME",
            "static DateTimeFormatter ISO_ZONED_DATE_TIME",
        ]);
    });
}

fn threeten_extra(cp: &mut Classpath) {
    cp.stub("org.threeten.extra.Interval", JAVA_TIME, |c| {
        c.methods(&[
            "static Interval of(Instant, Instant)",
            "static Interval of(Instant, Duration)",
            "Instant getStart()",
            "Instant getEnd()",
            "Duration toDuration()",
            "boolean contains(Instant)",
            "boolean overlaps(Interval)",
            "boolean isBefore(Instant)",
            "boolean isAfter(Instant)",
        ]);
    });
}

fn joda_instants(cp: &mut Classpath) {
    cp.stub("org.joda.time.ReadableInstant", JODA, |c| {
        c.interface().extends(&["Comparable"]).methods(&[
            "long getMillis()",
            "DateTimeZone getZone()",
            "boolean isAfter(ReadableInstant)",
            "boolean isBefore(ReadableInstant)",
            "boolean isEqual(ReadableInstant)",
            "Instant toInstant()",
        ]);
    });
    cp.stub("org.joda.time.ReadableDateTime", JODA, |c| {
        c.interface().extends(&["ReadableInstant"]).methods(&[
            "int getYear()",
            "int getDayOfMonth()",
            "DateTime toDateTime()",
        ]);
    });
    cp.stub("org.joda.time.base.AbstractInstant", JODA, |c| {
        c.extends(&["ReadableInstant"]).methods(&[
            "boolean isAfter(long)",
            "boolean isAfter(ReadableInstant)",
            "boolean isAfterNow()",
            "boolean isBefore(long)",
            "boolean isBefore(ReadableInstant)",
            "boolean isBeforeNow()",
            "boolean isEqual(long)",
            "boolean isEqual(ReadableInstant)",
            "boolean isEqualNow()",
            "Date toDate()",
            "Instant toInstant()",
            "DateTime toDateTime()",
            "DateTime toDateTime(DateTimeZone)",
            "DateTimeZone getZone()",
            "String toString()",
            "String toString(DateTimeFormatter)",
        ]);
    });
    cp.stub("org.joda.time.Instant", JODA, |c| {
        c.extends(&["AbstractInstant"])
            .ctors(&["", "long", "Object"])
            .methods(&[
                "static Instant now()",
                "static Instant ofEpochMilli(long)",
                "static Instant parse(String)",
                "long getMillis()",
                "Instant plus(long)",
                "Instant plus(ReadableDuration)",
                "Instant minus(long)",
                "Instant minus(ReadableDuration)",
                "Instant withMillis(long)",
            ]);
    });
}

fn joda_date_time(cp: &mut Classpath) {
    cp.stub("org.joda.time.base.AbstractDateTime", JODA, |c| {
        c.extends(&["AbstractInstant", "ReadableDateTime"]).methods(&[
            "int getYear()",
            "int getMonthOfYear()",
            "int getDayOfMonth()",
            "int getDayOfYear()",
            "int getDayOfWeek()",
            "int getHourOfDay()",
            "int getMinuteOfHour()",
            "int getSecondOfMinute()",
            "int getMillisOfSecond()",
            "int getMinuteOfDay()",
            "int getSecondOfDay()",
            "int getMillisOfDay()",
            "int getWeekOfWeekyear()",
            "int getWeekyear()",
            "String toString(String)",
        ]);
    });
    cp.stub("org.joda.time.base.BaseDateTime", JODA, |c| {
        c.extends(&["AbstractDateTime"]).methods(&["long getMillis()", "DateTimeZone getZone()"]);
    });
    cp.stub("org.joda.time.DateTime", JODA, |c| {
        c.extends(&["BaseDateTime"])
            .ctors(&[
                "",
                "DateTimeZone",
                "long",
                "long, DateTimeZone",
                "Object",
                "int, int, int, int, int",
                "int, int, int, int, int, DateTimeZone",
                "int, int, int, int, int, int",
                "int, int, int, int, int, int, DateTimeZone",
                "int, int, int, int, int, int, int",
                "int, int, int, int, int, int, int, DateTimeZone",
            ])
            .methods(&[
                "static DateTime now()",
                "static DateTime now(DateTimeZone)",
                "static DateTime parse(String)",
                "static DateTime parse(String, DateTimeFormatter)",
                "DateTime toDateTime()",
                "DateTime toDateTime(DateTimeZone)",
                "DateMidnight toDateMidnight()",
                "LocalDate toLocalDate()",
                "LocalTime toLocalTime()",
                "LocalDateTime toLocalDateTime()",
                "DateTime withMillis(long)",
                "DateTime withZone(DateTimeZone)",
                "DateTime withZoneRetainFields(DateTimeZone)",
                "DateTime withDate(int, int, int)",
                "DateTime withDate(LocalDate)",
                "DateTime withTime(int, int, int, int)",
                "DateTime withTime(LocalTime)",
                "DateTime withTimeAtStartOfDay()",
                "DateTime withDurationAdded(long, int)",
                "DateTime withDurationAdded(ReadableDuration, int)",
                "DateTime plus(long)",
                "DateTime plus(ReadableDuration)",
                "DateTime plusYears(int)",
                "DateTime plusMonths(int)",
                "DateTime plusWeeks(int)",
                "DateTime plusDays(int)",
                "DateTime plusHours(int)",
                "DateTime plusMinutes(int)",
                "DateTime plusSeconds(int)",
                "DateTime plusMillis(int)",
                "DateTime minus(long)",
                "DateTime minus(ReadableDuration)",
                "DateTime minusYears(int)",
                "DateTime minusMonths(int)",
                "DateTime minusWeeks(int)",
                "DateTime minusDays(int)",
                "DateTime minusHours(int)",
                "DateTime minusMinutes(int)",
                "DateTime minusSeconds(int)",
                "DateTime minusMillis(int)",
                "DateTime withYear(int)",
                "DateTime withWeekyear(int)",
                "DateTime withMonthOfYear(int)",
                "DateTime withWeekOfWeekyear(int)",
                "DateTime withDayOfYear(int)",
                "DateTime withDayOfMonth(int)",
                "DateTime withDayOfWeek(int)",
                "DateTime withHourOfDay(int)",
                "DateTime withMinuteOfHour(int)",
                "DateTime withSecondOfMinute(int)",
                "DateTime withMillisOfSecond(int)",
                "DateTime withMillisOfDay(int)",
            ]);
    });
    cp.stub("org.joda.time.DateMidnight", JODA, |c| {
        c.extends(&["BaseDateTime"])
            .ctors(&["", "DateTimeZone", "long", "int, int, int"])
            .methods(&["static DateMidnight now()", "static DateMidnight now(DateTimeZone)", "DateMidnight plusDays(int)"]);
    });
}

fn joda_durations(cp: &mut Classpath) {
    cp.stub("org.joda.time.ReadableDuration", JODA, |c| {
        c.interface().extends(&["Comparable"]).methods(&[
            "long getMillis()",
            "Duration toDuration()",
            "boolean isLongerThan(ReadableDuration)",
            "boolean isShorterThan(ReadableDuration)",
            "boolean isEqual(ReadableDuration)",
        ]);
    });
    cp.stub("org.joda.time.base.AbstractDuration", JODA, |c| {
        c.extends(&["ReadableDuration"]).methods(&[
            "Duration toDuration()",
            "boolean isLongerThan(ReadableDuration)",
            "boolean isShorterThan(ReadableDuration)",
            "boolean isEqual(ReadableDuration)",
            "String toString()",
        ]);
    });
    cp.stub("org.joda.time.base.BaseDuration", JODA, |c| {
        c.extends(&["AbstractDuration"]).methods(&["long getMillis()", "Interval toIntervalFrom(ReadableInstant)"]);
    });
    cp.stub("org.joda.time.Duration", JODA, |c| {
        c.extends(&["BaseDuration"])
            .ctors(&["long", "long, long", "ReadableInstant, ReadableInstant", "Object"])
            .methods(&[
                "static Duration standardDays(long)",
                "static Duration standardHours(long)",
                "static Duration standardMinutes(long)",
                "static Duration standardSeconds(long)",
                "static Duration millis(long)",
                "static Duration parse(String)",
                "long getStandardDays()",
                "long getStandardHours()",
                "long getStandardMinutes()",
                "long getStandardSeconds()",
                "Days toStandardDays()",
                "Hours toStandardHours()",
                "Minutes toStandardMinutes()",
                "Seconds toStandardSeconds()",
                "Duration toDuration()",
                "Duration withMillis(long)",
                "Duration withDurationAdded(long, int)",
                "Duration withDurationAdded(ReadableDuration, int)",
                "Duration plus(long)",
                "Duration plus(ReadableDuration)",
                "Duration minus(long)",
                "Duration minus(ReadableDuration)",
                "Duration multipliedBy(long)",
                "Duration dividedBy(long)",
                "Duration negated()",
                "Duration abs()",
            ])
            .fields(&["static Duration ZERO"]);
    });
}

fn joda_periods(cp: &mut Classpath) {
    cp.stub("org.joda.time.base.BaseSingleFieldPeriod", JODA, |c| {
        c.extends(&["Comparable"]).methods(&["int size()"]);
    });
    for (class, unit) in [("Days", "days"), ("Hours", "hours"), ("Minutes", "minutes"), ("Seconds", "seconds")] {
        let factory = format!("static {class} {unit}(int)");
        let between = format!("static {class} {unit}Between(ReadableInstant, ReadableInstant)");
        let between_partial = format!("static {class} {unit}Between(ReadablePartial, ReadablePartial)");
        let getter = format!("int get{class}()");
        let plus = format!("{class} plus(int)");
        cp.stub(&format!("org.joda.time.{class}"), JODA, |c| {
            c.extends(&["BaseSingleFieldPeriod"]).methods(&[
                factory.as_str(),
                between.as_str(),
                between_partial.as_str(),
                getter.as_str(),
                plus.as_str(),
                "Duration toStandardDuration()",
            ]);
            if class == "Days" {
                c.methods(&["static Days daysIn(ReadableInterval)"]);
            }
        });
    }
}

fn joda_intervals(cp: &mut Classpath) {
    cp.stub("org.joda.time.ReadableInterval", JODA, |c| {
        c.interface().methods(&[
            "DateTime getStart()",
            "DateTime getEnd()",
            "long getStartMillis()",
            "long getEndMillis()",
            "Duration toDuration()",
            "long toDurationMillis()",
        ]);
    });
    cp.stub("org.joda.time.base.AbstractInterval", JODA, |c| {
        c.extends(&["ReadableInterval"]).methods(&[
            "DateTime getStart()",
            "DateTime getEnd()",
            "Duration toDuration()",
            "long toDurationMillis()",
            "boolean contains(long)",
            "boolean contains(ReadableInstant)",
            "boolean overlaps(ReadableInterval)",
            "boolean isBefore(long)",
            "boolean isAfter(long)",
        ]);
    });
    cp.stub("org.joda.time.base.BaseInterval", JODA, |c| {
        c.extends(&["AbstractInterval"]).methods(&["long getStartMillis()", "long getEndMillis()"]);
    });
    cp.stub("org.joda.time.Interval", JODA, |c| {
        c.extends(&["BaseInterval"])
            .ctors(&[
                "long, long",
                "long, long, DateTimeZone",
                "ReadableInstant, ReadableInstant",
                "ReadableInstant, ReadableDuration",
            ])
            .methods(&["Interval withStart(ReadableInstant)", "Interval withEnd(ReadableInstant)"]);
    });
}

fn joda_misc(cp: &mut Classpath) {
    cp.stub("org.joda.time.DateTimeZone", JODA, |c| {
        c.methods(&[
            "static DateTimeZone forID(String)",
            "static DateTimeZone forOffsetHours(int)",
            "static DateTimeZone forOffsetHoursMinutes(int, int)",
            "static DateTimeZone forTimeZone(TimeZone)",
            "static DateTimeZone getDefault()",
            "String getID()",
            "TimeZone toTimeZone()",
        ])
        .fields(&["static DateTimeZone UTC"]);
    });
    cp.stub("org.joda.time.ReadablePartial", JODA, |c| {
        c.interface();
    });
    cp.stub("org.joda.time.base.AbstractPartial", JODA, |c| {
        c.extends(&["ReadablePartial", "Comparable"]).methods(&["String toString(DateTimeFormatter)"]);
    });
    cp.stub("org.joda.time.LocalDate", JODA, |c| {
        c.extends(&["AbstractPartial"])
            .ctors(&["", "DateTimeZone", "int, int, int", "long", "long, DateTimeZone"])
            .methods(&[
                "static LocalDate now()",
                "int getYear()",
                "int getMonthOfYear()",
                "int getDayOfMonth()",
                "int getDayOfWeek()",
                "DateTime toDateTimeAtStartOfDay()",
                "DateTime toDateTimeAtStartOfDay(DateTimeZone)",
                "LocalDateTime toLocalDateTime(LocalTime)",
                "LocalDate plusDays(int)",
                "LocalDate minusDays(int)",
                "boolean isAfter(ReadablePartial)",
                "boolean isBefore(ReadablePartial)",
            ]);
    });
    cp.stub("org.joda.time.LocalTime", JODA, |c| {
        c.extends(&["AbstractPartial"])
            .ctors(&["", "int, int", "int, int, int"])
            .methods(&["static LocalTime now()", "int getHourOfDay()", "int getMinuteOfHour()"])
            .fields(&["static LocalTime MIDNIGHT"]);
    });
    cp.stub("org.joda.time.LocalDateTime", JODA, |c| {
        c.extends(&["AbstractPartial"]).ctors(&[""]).methods(&["static LocalDateTime now()"]);
    });
    cp.stub("org.joda.time.format.DateTimeFormatter", JODA, |c| {
        c.methods(&[
            "DateTime parseDateTime(String)",
            "long parseMillis(String)",
            "LocalDate parseLocalDate(String)",
            "String print(long)",
            "String print(ReadableInstant)",
            "String print(ReadablePartial)",
            "DateTimeFormatter withZone(DateTimeZone)",
            "DateTimeFormatter withZoneUTC()",
            "DateTimeFormatter withLocale(Locale)",
        ]);
    });
    cp.stub("org.joda.time.format.DateTimeFormat", JODA, |c| {
        c.methods(&[
            "static DateTimeFormatter forPattern(String)",
            "static DateTimeFormatter forStyle(String)",
            "static DateTimeFormatter shortDate()",
            "static DateTimeFormatter mediumDate()",
            "static DateTimeFormatter longDate()",
            "static DateTimeFormatter fullDate()",
            "static DateTimeFormatter shortTime()",
            "static DateTimeFormatter mediumTime()",
            "static DateTimeFormatter longTime()",
            "static DateTimeFormatter fullTime()",
            "static DateTimeFormatter shortDateTime()",
            "static DateTimeFormatter mediumDateTime()",
            "static DateTimeFormatter longDateTime()",
            "static DateTimeFormatter fullDateTime()",
        ]);
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::typeck::classpath::ClassLookup;
    use crate::typeck::types::{JavaType, Prim};

    #[test]
    fn joda_hierarchy_is_connected() {
        let cp = standard_classpath();
        assert!(cp.is_subclass("org.joda.time.DateTime", "org.joda.time.base.AbstractInstant"));
        assert!(cp.is_subclass("org.joda.time.DateTime", "org.joda.time.ReadableDateTime"));
        assert!(cp.is_subclass("org.joda.time.Instant", "org.joda.time.ReadableInstant"));
        assert!(!cp.is_subclass("org.joda.time.Instant", "org.joda.time.ReadableDateTime"));
        assert!(cp.is_subclass("java.time.ZoneOffset", "java.time.ZoneId"));
    }

    #[test]
    fn inherited_getter_reports_base_declaring_type() {
        let cp = standard_classpath();
        let m = cp.find_method("org.joda.time.DateTime", "getMillis", &[]).unwrap();
        assert_eq!(m.declaring, "org.joda.time.base.BaseDateTime");
        let m = cp.find_method("org.joda.time.Duration", "getMillis", &[]).unwrap();
        assert_eq!(m.declaring, "org.joda.time.base.BaseDuration");
    }

    #[test]
    fn period_stubs_are_generated_per_unit() {
        let cp = standard_classpath();
        let m = cp
            .find_method(
                "org.joda.time.Hours",
                "hoursBetween",
                &[JavaType::class("org.joda.time.DateTime"), JavaType::class("org.joda.time.DateTime")],
            )
            .unwrap();
        assert!(m.is_static);
        assert_eq!(m.ret, JavaType::class("org.joda.time.Hours"));
        assert!(cp.find_method("org.joda.time.Days", "daysIn", &[JavaType::Unknown]).is_some());
        assert!(cp.find_method("org.joda.time.Hours", "daysIn", &[JavaType::Unknown]).is_none());
    }

    #[test]
    fn java_time_overloads() {
        let cp = standard_classpath();
        let m = cp
            .find_method("java.time.ZonedDateTime", "plusYears", &[JavaType::Primitive(Prim::Int)])
            .unwrap();
        assert_eq!(m.ret, JavaType::class("java.time.ZonedDateTime"));
        let f = cp.find_field("java.time.ZoneOffset", "UTC").unwrap();
        assert_eq!(f.1.ty, JavaType::class("java.time.ZoneOffset"));
    }
}
