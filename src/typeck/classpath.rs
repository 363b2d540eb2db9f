use std::collections::HashMap;

use super::types::{package_of, JavaType, MethodType, Prim, CONSTRUCTOR};

pub const OBJECT: &str = "java.lang.Object";

#[derive(Debug, Clone, PartialEq)]
pub struct FieldInfo {
    pub name: String,
    pub ty: JavaType,
    pub is_static: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodInfo {
    pub name: String,
    pub params: Vec<JavaType>,
    pub ret: JavaType,
    pub is_static: bool,
    pub varargs: bool,
}

impl MethodInfo {
    fn to_method_type(&self, declaring: &str) -> MethodType {
        MethodType {
            declaring: declaring.to_string(),
            name: self.name.clone(),
            params: self.params.clone(),
            ret: self.ret.clone(),
            is_static: self.is_static,
            varargs: self.varargs,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ClassInfo {
    pub fqn: String,
    pub is_interface: bool,
    /// Direct superclass and interfaces, in declaration order.
    pub supertypes: Vec<String>,
    pub fields: Vec<FieldInfo>,
    pub methods: Vec<MethodInfo>,
    pub constructors: Vec<MethodInfo>,
}

/// Read access to class declarations. Lookup algorithms are provided on top of `class_info`
/// so the shared classpath and a unit's own declarations resolve the same way.
pub trait ClassLookup {
    fn class_info(&self, fqn: &str) -> Option<&ClassInfo>;

    fn has_class(&self, fqn: &str) -> bool {
        self.class_info(fqn).is_some()
    }

    /// `fqn` followed by all transitive supertypes, breadth-first, ending in `java.lang.Object`.
    fn supertypes_closure(&self, fqn: &str) -> Vec<String> {
        let mut out = vec![fqn.to_string()];
        let mut i = 0;
        while i < out.len() {
            if let Some(info) = self.class_info(&out[i]) {
                for sup in &info.supertypes {
                    if !out.contains(sup) {
                        out.push(sup.clone());
                    }
                }
            }
            i += 1;
        }
        if !out.iter().any(|s| s == OBJECT) {
            out.push(OBJECT.to_string());
        }
        out
    }

    fn is_subclass(&self, sub: &str, sup: &str) -> bool {
        sub == sup || sup == OBJECT || self.supertypes_closure(sub).iter().any(|s| s == sup)
    }

    /// Assignment compatibility. `Unknown` is compatible with everything so that
    /// partially resolved code still finds overloads.
    fn is_assignable(&self, from: &JavaType, to: &JavaType) -> bool {
        match (from, to) {
            (JavaType::Unknown, _) | (_, JavaType::Unknown) => true,
            (a, b) if a == b => true,
            (JavaType::Primitive(a), JavaType::Primitive(b)) => a.widens_to(*b),
            (JavaType::Primitive(p), JavaType::Class(c)) => c == OBJECT || boxed(*p) == Some(c.as_str()),
            (JavaType::Class(c), JavaType::Primitive(p)) => boxed(*p) == Some(c.as_str()),
            (JavaType::Null, JavaType::Class(_) | JavaType::Array(_)) => true,
            (JavaType::Class(a), JavaType::Class(b)) => self.is_subclass(a, b),
            (JavaType::Array(_), JavaType::Class(c)) => c == OBJECT,
            (JavaType::Array(a), JavaType::Array(b)) => match (a.as_ref(), b.as_ref()) {
                (JavaType::Primitive(x), JavaType::Primitive(y)) => x == y,
                (x, y) => self.is_assignable(x, y),
            },
            _ => false,
        }
    }

    fn find_field(&self, owner: &str, name: &str) -> Option<(String, FieldInfo)> {
        self.supertypes_closure(owner).into_iter().find_map(|cls| {
            let info = self.class_info(&cls)?;
            let field = info.fields.iter().find(|f| f.name == name)?.clone();
            Some((cls, field))
        })
    }

    /// Resolve a method by name and argument types across the hierarchy of `owner`.
    /// Overrides in subclasses hide the supertype declaration with the same parameters.
    fn find_method(&self, owner: &str, name: &str, args: &[JavaType]) -> Option<MethodType> {
        let mut candidates: Vec<(String, &MethodInfo)> = Vec::new();
        for cls in self.supertypes_closure(owner) {
            let Some(info) = self.class_info(&cls) else { continue };
            for m in info.methods.iter().filter(|m| m.name == name) {
                if !candidates.iter().any(|(_, c)| c.params == m.params) {
                    candidates.push((cls.clone(), m));
                }
            }
        }
        let chosen = self.most_specific(&candidates, args)?;
        Some(chosen.1.to_method_type(&chosen.0))
    }

    fn find_constructor(&self, class: &str, args: &[JavaType]) -> Option<MethodType> {
        let info = self.class_info(class)?;
        if info.constructors.is_empty() && args.is_empty() {
            return Some(MethodType {
                declaring: class.to_string(),
                name: CONSTRUCTOR.to_string(),
                params: Vec::new(),
                ret: JavaType::class(class),
                is_static: false,
                varargs: false,
            });
        }
        let candidates: Vec<(String, &MethodInfo)> =
            info.constructors.iter().map(|c| (class.to_string(), c)).collect();
        let chosen = self.most_specific(&candidates, args)?;
        Some(chosen.1.to_method_type(&chosen.0))
    }

    /// Fixed-arity applicability first, then variable arity; among applicable candidates
    /// prefer one whose parameters are assignable to every other candidate's.
    fn most_specific<'m>(
        &self,
        candidates: &[(String, &'m MethodInfo)],
        args: &[JavaType],
    ) -> Option<(String, &'m MethodInfo)> {
        let fixed: Vec<&(String, &MethodInfo)> = candidates
            .iter()
            .filter(|(_, m)| {
                m.params.len() == args.len()
                    && m.params.iter().zip(args).all(|(p, a)| self.is_assignable(a, p))
            })
            .collect();
        let applicable = if fixed.is_empty() {
            candidates
                .iter()
                .filter(|(_, m)| m.varargs && self.varargs_applicable(m, args))
                .collect()
        } else {
            fixed
        };
        let best = applicable.iter().find(|(_, m)| {
            applicable.iter().all(|(_, other)| {
                m.params.len() != other.params.len()
                    || m.params.iter().zip(&other.params).all(|(p, q)| self.is_assignable(p, q))
            })
        });
        best.or(applicable.first()).map(|(cls, m)| (cls.clone(), *m))
    }

    fn varargs_applicable(&self, m: &MethodInfo, args: &[JavaType]) -> bool {
        let Some((last, fixed)) = m.params.split_last() else { return false };
        if args.len() < fixed.len() {
            return false;
        }
        let elem = match last {
            JavaType::Array(inner) => inner.as_ref(),
            other => other,
        };
        fixed.iter().zip(args).all(|(p, a)| self.is_assignable(a, p))
            && args[fixed.len()..].iter().all(|a| self.is_assignable(a, elem))
    }
}

fn boxed(p: Prim) -> Option<&'static str> {
    Some(match p {
        Prim::Boolean => "java.lang.Boolean",
        Prim::Int => "java.lang.Integer",
        Prim::Long => "java.lang.Long",
        Prim::Double => "java.lang.Double",
        _ => return None,
    })
}

/// The shared, immutable class table that attribution and templates resolve against.
#[derive(Debug, Clone, Default)]
pub struct Classpath {
    classes: HashMap<String, ClassInfo>,
}

impl ClassLookup for Classpath {
    fn class_info(&self, fqn: &str) -> Option<&ClassInfo> {
        self.classes.get(fqn)
    }
}

impl Classpath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, info: ClassInfo) {
        self.classes.insert(info.fqn.clone(), info);
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Declare a class with the signature DSL. Simple type names inside signatures resolve
    /// against `imports`, then `java.lang`, then the class's own package.
    pub fn stub(&mut self, fqn: &str, imports: &[&str], build: impl FnOnce(&mut ClassDef)) {
        let mut def = ClassDef {
            info: ClassInfo { fqn: fqn.to_string(), ..ClassInfo::default() },
            package: package_of(fqn).to_string(),
            imports: imports.iter().map(|s| s.to_string()).collect(),
        };
        build(&mut def);
        self.insert(def.info);
    }
}

/// Builder handed to `Classpath::stub`.
pub struct ClassDef {
    info: ClassInfo,
    package: String,
    imports: Vec<String>,
}

const JAVA_LANG: &[&str] = &[
    "Object", "String", "CharSequence", "Comparable", "Integer", "Long", "Boolean", "Double",
    "Number", "System", "Math",
];

impl ClassDef {
    fn resolve(&self, text: &str) -> JavaType {
        let text = text.trim();
        if let Some(inner) = text.strip_suffix("...").or_else(|| text.strip_suffix("[]")) {
            return JavaType::array_of(self.resolve(inner));
        }
        match JavaType::parse(text) {
            JavaType::Class(name) if !name.contains('.') => {
                if let Some(imp) = self.imports.iter().find(|i| super::types::simple_name(i) == name) {
                    JavaType::Class(imp.clone())
                } else if JAVA_LANG.contains(&name.as_str()) {
                    JavaType::Class(format!("java.lang.{name}"))
                } else if self.package.is_empty() {
                    JavaType::Class(name)
                } else {
                    JavaType::Class(format!("{}.{name}", self.package))
                }
            }
            other => other,
        }
    }

    fn resolve_fqn(&self, text: &str) -> String {
        match self.resolve(text) {
            JavaType::Class(fqn) => fqn,
            other => other.to_string(),
        }
    }

    fn parse_params(&self, text: &str) -> (Vec<JavaType>, bool) {
        let text = text.trim();
        if text.is_empty() {
            return (Vec::new(), false);
        }
        let varargs = text.ends_with("...");
        (text.split(',').map(|p| self.resolve(p)).collect(), varargs)
    }

    pub fn interface(&mut self) -> &mut Self {
        self.info.is_interface = true;
        self
    }

    pub fn extends(&mut self, supertypes: &[&str]) -> &mut Self {
        for s in supertypes {
            let fqn = self.resolve_fqn(s);
            self.info.supertypes.push(fqn);
        }
        self
    }

    /// Constructor parameter lists: `""`, `"long"`, `"int, int, DateTimeZone"`.
    pub fn ctors(&mut self, param_lists: &[&str]) -> &mut Self {
        for params in param_lists {
            let (params, varargs) = self.parse_params(params);
            self.info.constructors.push(MethodInfo {
                name: CONSTRUCTOR.to_string(),
                params,
                ret: JavaType::class(self.info.fqn.clone()),
                is_static: false,
                varargs,
            });
        }
        self
    }

    /// Method signatures: `"static Duration standardDays(long)"`, `"long getMillis()"`.
    pub fn methods(&mut self, sigs: &[&str]) -> &mut Self {
        for &sig in sigs {
            let (head, rest) = sig.split_once('(').unwrap_or((sig, ")"));
            let params = rest.trim_end().trim_end_matches(')');
            let mut words: Vec<&str> = head.split_whitespace().collect();
            let is_static = words.first() == Some(&"static");
            if is_static {
                words.remove(0);
            }
            let (ret, name) = match words.as_slice() {
                [ret, name] => (self.resolve(ret), name.to_string()),
                [name] => (JavaType::Void, name.to_string()),
                _ => continue,
            };
            let (params, varargs) = self.parse_params(params);
            self.info.methods.push(MethodInfo { name, params, ret, is_static, varargs });
        }
        self
    }

    /// Field declarations: `"static DateTimeZone UTC"`.
    pub fn fields(&mut self, decls: &[&str]) -> &mut Self {
        for decl in decls {
            let mut words: Vec<&str> = decl.split_whitespace().collect();
            let is_static = words.first() == Some(&"static");
            if is_static {
                words.remove(0);
            }
            if let [ty, name] = words.as_slice() {
                let ty = self.resolve(ty);
                self.info.fields.push(FieldInfo { name: name.to_string(), ty, is_static });
            }
        }
        self
    }
}

/// A unit's own classes layered over the shared classpath.
pub struct Overlay<'a> {
    pub base: &'a Classpath,
    pub local: HashMap<String, ClassInfo>,
}

impl<'a> Overlay<'a> {
    pub fn new(base: &'a Classpath) -> Self {
        Self { base, local: HashMap::new() }
    }
}

impl ClassLookup for Overlay<'_> {
    fn class_info(&self, fqn: &str) -> Option<&ClassInfo> {
        self.local.get(fqn).or_else(|| self.base.class_info(fqn))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Classpath {
        let mut cp = Classpath::new();
        cp.stub("a.Base", &[], |c| {
            c.methods(&["long getMillis()", "boolean isAfter(long)", "boolean isAfter(Base)"]);
        });
        cp.stub("a.Child", &[], |c| {
            c.extends(&["Base"])
                .ctors(&["", "long", "long, long"])
                .methods(&["static Child of(String...)", "Child plus(long)", "Child plus(Child)"])
                .fields(&["static Child ZERO"]);
        });
        cp
    }

    #[test]
    fn stub_resolves_simple_names_in_package() {
        let cp = sample();
        let child = cp.class_info("a.Child").unwrap();
        assert_eq!(child.supertypes, vec!["a.Base".to_string()]);
        assert_eq!(child.methods[0].params, vec![JavaType::array_of(JavaType::string())]);
        assert!(child.methods[0].varargs);
        assert_eq!(child.fields[0].ty, JavaType::class("a.Child"));
    }

    #[test]
    fn method_lookup_reports_declaring_supertype() {
        let cp = sample();
        let m = cp.find_method("a.Child", "getMillis", &[]).unwrap();
        assert_eq!(m.declaring, "a.Base");
        assert_eq!(m.ret, JavaType::Primitive(Prim::Long));
    }

    #[test]
    fn overloads_pick_by_argument_type() {
        let cp = sample();
        let by_long = cp.find_method("a.Child", "plus", &[JavaType::Primitive(Prim::Int)]).unwrap();
        assert_eq!(by_long.params, vec![JavaType::Primitive(Prim::Long)]);
        let by_obj = cp.find_method("a.Child", "isAfter", &[JavaType::class("a.Child")]).unwrap();
        assert_eq!(by_obj.params, vec![JavaType::class("a.Base")]);
        assert!(cp.find_method("a.Child", "plus", &[JavaType::string()]).is_none());
    }

    #[test]
    fn varargs_applicability() {
        let cp = sample();
        let m = cp.find_method("a.Child", "of", &[JavaType::string(), JavaType::string(), JavaType::string()]);
        assert!(m.is_some_and(|m| m.is_static && m.varargs));
    }

    #[test]
    fn constructors_by_arity() {
        let cp = sample();
        let two = cp.find_constructor("a.Child", &[JavaType::Primitive(Prim::Long), JavaType::Primitive(Prim::Int)]).unwrap();
        assert_eq!(two.params.len(), 2);
        assert!(two.is_constructor());
        assert!(cp.find_constructor("a.Child", &[JavaType::string()]).is_none());
    }

    #[test]
    fn assignability_rules() {
        let cp = sample();
        assert!(cp.is_assignable(&JavaType::class("a.Child"), &JavaType::class("a.Base")));
        assert!(!cp.is_assignable(&JavaType::class("a.Base"), &JavaType::class("a.Child")));
        assert!(cp.is_assignable(&JavaType::Null, &JavaType::class("a.Base")));
        assert!(cp.is_assignable(&JavaType::Primitive(Prim::Long), &JavaType::class(OBJECT)));
        assert!(cp.is_assignable(&JavaType::Unknown, &JavaType::Primitive(Prim::Int)));
        assert!(!cp.is_assignable(&JavaType::Primitive(Prim::Long), &JavaType::Primitive(Prim::Int)));
    }

    #[test]
    fn overlay_shadows_base() {
        let cp = sample();
        let mut overlay = Overlay::new(&cp);
        overlay.local.insert(
            "b.User".to_string(),
            ClassInfo { fqn: "b.User".to_string(), supertypes: vec!["a.Child".to_string()], ..ClassInfo::default() },
        );
        assert!(overlay.is_subclass("b.User", "a.Base"));
        assert_eq!(overlay.find_field("b.User", "ZERO").unwrap().0, "a.Child");
    }
}
