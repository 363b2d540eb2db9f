use serde::{Serialize, Deserialize};

/// Reserved selector name carried by constructor method types and patterns.
pub const CONSTRUCTOR: &str = "<constructor>";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Prim {
    Boolean,
    Byte,
    Short,
    Char,
    Int,
    Long,
    Float,
    Double,
}

impl Prim {
    pub fn from_name(name: &str) -> Option<Prim> {
        Some(match name {
            "boolean" => Prim::Boolean,
            "byte" => Prim::Byte,
            "short" => Prim::Short,
            "char" => Prim::Char,
            "int" => Prim::Int,
            "long" => Prim::Long,
            "float" => Prim::Float,
            "double" => Prim::Double,
            _ => return None,
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            Prim::Boolean => "boolean",
            Prim::Byte => "byte",
            Prim::Short => "short",
            Prim::Char => "char",
            Prim::Int => "int",
            Prim::Long => "long",
            Prim::Float => "float",
            Prim::Double => "double",
        }
    }

    /// Widening primitive conversion (JLS 5.1.2), including identity.
    pub fn widens_to(self, to: Prim) -> bool {
        use Prim::*;
        if self == to {
            return true;
        }
        match self {
            Byte => matches!(to, Short | Int | Long | Float | Double),
            Short | Char => matches!(to, Int | Long | Float | Double),
            Int => matches!(to, Long | Float | Double),
            Long => matches!(to, Float | Double),
            Float => matches!(to, Double),
            Boolean | Double => false,
        }
    }

    pub fn is_numeric(self) -> bool {
        !matches!(self, Prim::Boolean)
    }

    /// Binary numeric promotion (JLS 5.6.2).
    pub fn promote(a: Prim, b: Prim) -> Prim {
        use Prim::*;
        if a == Double || b == Double {
            Double
        } else if a == Float || b == Float {
            Float
        } else if a == Long || b == Long {
            Long
        } else {
            Int
        }
    }
}

/// Static type of a host-tree node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JavaType {
    Primitive(Prim),
    /// A class or interface by fully-qualified name.
    Class(String),
    Array(Box<JavaType>),
    Null,
    Void,
    /// Attribution could not determine a type. Treated as "not in the legacy domain".
    Unknown,
}

impl JavaType {
    pub fn class(fqn: impl Into<String>) -> JavaType {
        JavaType::Class(fqn.into())
    }

    pub fn array_of(elem: JavaType) -> JavaType {
        JavaType::Array(Box::new(elem))
    }

    pub fn string() -> JavaType {
        JavaType::Class("java.lang.String".to_string())
    }

    /// Parse a type written in a signature: `long`, `int[]`, `java.lang.String`,
    /// `org.joda.time.ReadableInstant...` (varargs become arrays).
    pub fn parse(text: &str) -> JavaType {
        let text = text.trim();
        if let Some(inner) = text.strip_suffix("...") {
            return JavaType::array_of(JavaType::parse(inner));
        }
        if let Some(inner) = text.strip_suffix("[]") {
            return JavaType::array_of(JavaType::parse(inner));
        }
        if let Some(p) = Prim::from_name(text) {
            return JavaType::Primitive(p);
        }
        match text {
            "void" => JavaType::Void,
            "" | "?" => JavaType::Unknown,
            _ => JavaType::Class(text.to_string()),
        }
    }

    pub fn fqn(&self) -> Option<&str> {
        match self {
            JavaType::Class(fqn) => Some(fqn),
            _ => None,
        }
    }

    pub fn is_array(&self) -> bool {
        matches!(self, JavaType::Array(_))
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, JavaType::Unknown)
    }

    /// Innermost element type of an array, or `self` for non-arrays.
    pub fn element(&self) -> &JavaType {
        match self {
            JavaType::Array(inner) => inner.element(),
            other => other,
        }
    }

    /// Display form: simple class name, primitive keyword, `T[]`.
    pub fn simple_name(&self) -> String {
        match self {
            JavaType::Primitive(p) => p.name().to_string(),
            JavaType::Class(fqn) => simple_name(fqn).to_string(),
            JavaType::Array(inner) => format!("{}[]", inner.simple_name()),
            JavaType::Null => "null".to_string(),
            JavaType::Void => "void".to_string(),
            JavaType::Unknown => "?".to_string(),
        }
    }

    /// Rebuild the type with every class name passed through `f`.
    pub fn map_classes(&self, f: &impl Fn(&str) -> Option<String>) -> JavaType {
        match self {
            JavaType::Class(fqn) => match f(fqn) {
                Some(new) => JavaType::Class(new),
                None => self.clone(),
            },
            JavaType::Array(inner) => JavaType::Array(Box::new(inner.map_classes(f))),
            _ => self.clone(),
        }
    }

    /// Returns true if this type, or an array element type, satisfies the predicate.
    pub fn any_class(&self, pred: &impl Fn(&str) -> bool) -> bool {
        match self {
            JavaType::Class(fqn) => pred(fqn),
            JavaType::Array(inner) => inner.any_class(pred),
            _ => false,
        }
    }
}

impl std::fmt::Display for JavaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JavaType::Class(fqn) => write!(f, "{fqn}"),
            JavaType::Array(inner) => write!(f, "{inner}[]"),
            other => write!(f, "{}", other.simple_name()),
        }
    }
}

/// Last path segment of a dotted name.
pub fn simple_name(fqn: &str) -> &str {
    fqn.rsplit('.').next().unwrap_or(fqn)
}

/// Package part of a dotted name (empty for the default package).
pub fn package_of(fqn: &str) -> &str {
    fqn.rsplit_once('.').map(|(pkg, _)| pkg).unwrap_or("")
}

/// Resolved signature of an invoked method or constructor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodType {
    /// Class that declares the member (may be a supertype of the receiver).
    pub declaring: String,
    pub name: String,
    pub params: Vec<JavaType>,
    pub ret: JavaType,
    pub is_static: bool,
    pub varargs: bool,
}

impl MethodType {
    pub fn is_constructor(&self) -> bool {
        self.name == CONSTRUCTOR
    }

    /// Signature in pattern notation: `org.joda.time.Duration plus(long)`.
    pub fn signature(&self) -> String {
        let params: Vec<String> = self.params.iter().map(|p| p.to_string()).collect();
        format!("{} {}({})", self.declaring, self.name, params.join(", "))
    }
}

/// Where a referenced variable lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum VarOwner {
    Local,
    Field(String),
}

/// Backing variable of an identifier or field access (absent for type and package names).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VarBinding {
    pub name: String,
    pub ty: JavaType,
    pub owner: VarOwner,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_signature_types() {
        assert_eq!(JavaType::parse("long"), JavaType::Primitive(Prim::Long));
        assert_eq!(JavaType::parse("int[]"), JavaType::array_of(JavaType::Primitive(Prim::Int)));
        assert_eq!(
            JavaType::parse("java.lang.Object..."),
            JavaType::array_of(JavaType::class("java.lang.Object"))
        );
        assert_eq!(JavaType::parse("void"), JavaType::Void);
    }

    #[test]
    fn simple_names() {
        assert_eq!(JavaType::class("org.joda.time.DateTime").simple_name(), "DateTime");
        assert_eq!(
            JavaType::array_of(JavaType::class("java.time.Instant")).simple_name(),
            "Instant[]"
        );
        assert_eq!(simple_name("Local"), "Local");
        assert_eq!(package_of("java.time.Duration"), "java.time");
        assert_eq!(package_of("Local"), "");
    }

    #[test]
    fn map_classes_reaches_array_elements() {
        let ty = JavaType::array_of(JavaType::class("org.joda.time.DateTime"));
        let mapped = ty.map_classes(&|fqn| {
            (fqn == "org.joda.time.DateTime").then(|| "java.time.ZonedDateTime".to_string())
        });
        assert_eq!(mapped, JavaType::array_of(JavaType::class("java.time.ZonedDateTime")));
        assert!(mapped.any_class(&|f| f.starts_with("java.time.")));
        assert_eq!(mapped.element(), &JavaType::class("java.time.ZonedDateTime"));
    }

    #[test]
    fn primitive_widening_and_promotion() {
        assert!(Prim::Int.widens_to(Prim::Long));
        assert!(!Prim::Long.widens_to(Prim::Int));
        assert!(!Prim::Boolean.widens_to(Prim::Int));
        assert_eq!(Prim::promote(Prim::Int, Prim::Long), Prim::Long);
        assert_eq!(Prim::promote(Prim::Short, Prim::Char), Prim::Int);
    }

    #[test]
    fn method_signature_text() {
        let m = MethodType {
            declaring: "org.joda.time.Duration".to_string(),
            name: "plus".to_string(),
            params: vec![JavaType::Primitive(Prim::Long)],
            ret: JavaType::class("org.joda.time.Duration"),
            is_static: false,
            varargs: false,
        };
        assert_eq!(m.signature(), "org.joda.time.Duration plus(long)");
        assert!(!m.is_constructor());
    }
}
