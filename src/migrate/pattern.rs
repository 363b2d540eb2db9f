use std::fmt;

use crate::diagnostics::MigrateError;
use crate::typeck::types::{simple_name, JavaType, MethodType, CONSTRUCTOR};
use crate::typeck::ClassLookup;

/// Matches resolved calls by declaring type, selector and parameter signature.
///
/// Text form: `org.joda.time.Duration plus(long)`, `org.joda.time.DateTime <constructor>(long, org.joda.time.DateTimeZone)`,
/// or `org.joda.time.Days daysBetween(..)` for any parameter list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodPattern {
    pub declaring: String,
    pub name: String,
    /// `None` matches any parameter list.
    pub params: Option<Vec<JavaType>>,
    /// Exact parameter types instead of assignability.
    pub strict: bool,
    /// Accept calls whose declaring type is a subtype of `declaring`.
    pub match_overrides: bool,
}

impl MethodPattern {
    pub fn parse(text: &str) -> Result<Self, MigrateError> {
        let bad = || MigrateError::template(format!("malformed method pattern `{text}`"));
        let (declaring, rest) = text.trim().split_once(char::is_whitespace).ok_or_else(bad)?;
        let rest = rest.trim();
        let (name, params) = rest.split_once('(').ok_or_else(bad)?;
        let params = params.strip_suffix(')').ok_or_else(bad)?.trim();
        let name = name.trim();
        if name.is_empty() || declaring.is_empty() {
            return Err(bad());
        }

        let params = match params {
            ".." => None,
            "" => Some(Vec::new()),
            list => Some(list.split(',').map(|p| pattern_type(p.trim())).collect()),
        };
        Ok(Self {
            declaring: declaring.to_string(),
            name: name.to_string(),
            params,
            strict: false,
            match_overrides: false,
        })
    }

    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    pub fn match_overrides(mut self) -> Self {
        self.match_overrides = true;
        self
    }

    pub fn is_constructor(&self) -> bool {
        self.name == CONSTRUCTOR
    }

    /// Whether `method` is a call this pattern describes. Never fails; a non-match is `false`.
    pub fn matches_call(&self, method: &MethodType, classes: &impl ClassLookup) -> bool {
        if method.name != self.name {
            return false;
        }
        let declaring_ok = method.declaring == self.declaring
            || (self.match_overrides && classes.is_subclass(&method.declaring, &self.declaring));
        if !declaring_ok {
            return false;
        }
        let Some(params) = &self.params else { return true };
        params.len() == method.params.len()
            && params.iter().zip(&method.params).all(|(want, have)| {
                if self.strict { want == have } else { classes.is_assignable(have, want) }
            })
    }
}

impl fmt::Display for MethodPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}(", self.declaring, self.name)?;
        match &self.params {
            None => write!(f, "..")?,
            Some(params) => {
                let params: Vec<String> = params.iter().map(|p| p.to_string()).collect();
                write!(f, "{}", params.join(", "))?;
            }
        }
        write!(f, ")")
    }
}

/// Pattern parameters may name `java.lang` classes by simple name.
fn pattern_type(text: &str) -> JavaType {
    match JavaType::parse(text) {
        JavaType::Class(name) if !name.contains('.') => JavaType::Class(format!("java.lang.{name}")),
        JavaType::Array(inner) => JavaType::array_of(pattern_type(&inner.to_string())),
        other => other,
    }
}

/// A named static field, such as `org.joda.time.DateTimeZone UTC`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPattern {
    pub declaring: String,
    pub name: String,
}

impl FieldPattern {
    pub fn parse(text: &str) -> Result<Self, MigrateError> {
        let (declaring, name) = text
            .trim()
            .split_once(char::is_whitespace)
            .ok_or_else(|| MigrateError::template(format!("malformed field pattern `{text}`")))?;
        Ok(Self { declaring: declaring.to_string(), name: name.trim().to_string() })
    }

    pub fn matches_field(&self, declaring: &str, name: &str) -> bool {
        self.declaring == declaring && self.name == name
    }
}

impl fmt::Display for FieldPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", simple_name(&self.declaring), self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::typeck::types::Prim;
    use crate::typeck::standard_classpath;

    fn call(declaring: &str, name: &str, params: &[&str]) -> MethodType {
        MethodType {
            declaring: declaring.to_string(),
            name: name.to_string(),
            params: params.iter().map(|p| JavaType::parse(p)).collect(),
            ret: JavaType::Unknown,
            is_static: false,
            varargs: false,
        }
    }

    #[test]
    fn parses_signatures() {
        let p = MethodPattern::parse("org.joda.time.DateTime <constructor>(int, int, org.joda.time.DateTimeZone)").unwrap();
        assert!(p.is_constructor());
        assert_eq!(
            p.params.as_deref(),
            Some(
                &[
                    JavaType::Primitive(Prim::Int),
                    JavaType::Primitive(Prim::Int),
                    JavaType::class("org.joda.time.DateTimeZone"),
                ][..]
            )
        );
        let p = MethodPattern::parse("org.joda.time.DateTime parse(String)").unwrap();
        assert_eq!(p.params, Some(vec![JavaType::string()]));
        assert_eq!(MethodPattern::parse("org.joda.time.Days daysBetween(..)").unwrap().params, None);
        assert!(MethodPattern::parse("plus(long)").is_err());
        assert!(MethodPattern::parse("org.joda.time.Duration plus long").is_err());
    }

    #[test]
    fn assignable_versus_strict_parameters() {
        let cp = standard_classpath();
        let by_instant = call("org.joda.time.DateTime", "isAfter", &["org.joda.time.DateTime"]);
        let loose = MethodPattern::parse("org.joda.time.DateTime isAfter(org.joda.time.ReadableInstant)").unwrap();
        assert!(loose.matches_call(&by_instant, &cp));
        assert!(!loose.clone().strict().matches_call(&by_instant, &cp));

        let by_long = call("org.joda.time.DateTime", "isAfter", &["long"]);
        assert!(!loose.matches_call(&by_long, &cp));
    }

    #[test]
    fn declaring_type_is_exact_unless_overrides_match() {
        let cp = standard_classpath();
        let on_duration = call("org.joda.time.Duration", "getMillis", &[]);
        let base = MethodPattern::parse("org.joda.time.base.BaseDuration getMillis()").unwrap();
        assert!(!base.matches_call(&on_duration, &cp));
        assert!(base.clone().match_overrides().matches_call(&on_duration, &cp));
        let other = call("org.joda.time.DateTime", "getMillis", &[]);
        assert!(!base.match_overrides().matches_call(&other, &cp));
    }

    #[test]
    fn field_patterns() {
        let f = FieldPattern::parse("org.joda.time.DateTimeZone UTC").unwrap();
        assert!(f.matches_field("org.joda.time.DateTimeZone", "UTC"));
        assert!(!f.matches_field("org.joda.time.DateTimeZone", "UTC2"));
        assert_eq!(f.to_string(), "DateTimeZone.UTC");
    }
}
