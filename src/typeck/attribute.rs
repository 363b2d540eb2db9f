use std::collections::HashMap;

use super::classpath::{ClassInfo, ClassLookup, Classpath, FieldInfo, MethodInfo, Overlay, OBJECT};
use super::types::{JavaType, MethodType, Prim, VarBinding, VarOwner, CONSTRUCTOR};
use crate::parser::ast::*;
use crate::span::Spanned;
use crate::visit::{walk_fold_block, walk_fold_class, walk_fold_expr, walk_fold_method, walk_fold_type_expr, Fold};

/// Attribute a parsed unit: every expression gets its static type, every call its resolved
/// `MethodType`, every variable reference its binding. Names that cannot be resolved end up
/// `Unknown`; attribution never fails.
pub fn attribute(unit: CompilationUnit, classpath: &Classpath) -> CompilationUnit {
    let package = unit.package.as_ref().map(|p| p.node.clone()).unwrap_or_default();
    let mut attr = Attributor::new(classpath, package);
    for import in &unit.imports {
        attr.add_import(&import.node);
    }
    attr.declare_classes(&unit);
    attr.fold_unit(unit)
}

/// Attribute a free-standing expression (a template body) against single-type `imports`.
pub fn attribute_fragment(expr: Spanned<Expr>, imports: &[String], classpath: &Classpath) -> Spanned<Expr> {
    let mut attr = Attributor::new(classpath, String::new());
    for path in imports {
        attr.add_import(&ImportDecl::single(path.clone()));
    }
    attr.fold_expr(expr)
}

struct Attributor<'a> {
    classes: Overlay<'a>,
    package: String,
    single: HashMap<String, String>,
    star: Vec<String>,
    /// Simple name -> fqn for classes declared in this unit.
    local_classes: HashMap<String, String>,
    current_class: Option<String>,
    scopes: Vec<HashMap<String, JavaType>>,
}

fn qualify(package: &str, name: &str) -> String {
    if package.is_empty() { name.to_string() } else { format!("{package}.{name}") }
}

fn with_dims(mut ty: JavaType, dims: usize) -> JavaType {
    for _ in 0..dims {
        ty = JavaType::array_of(ty);
    }
    ty
}

/// An identifier or qualified name that denotes a class rather than a value.
pub fn is_type_ref(expr: &Expr) -> bool {
    matches!(
        &expr.kind,
        ExprKind::Ident { binding: None, .. } | ExprKind::FieldAccess { binding: None, .. }
    ) && matches!(expr.ty, JavaType::Class(_))
}

/// Dotted text of a name that resolved to nothing (a package prefix such as `org.joda`).
fn package_path(expr: &Expr) -> Option<String> {
    if !expr.ty.is_unknown() {
        return None;
    }
    match &expr.kind {
        ExprKind::Ident { name, binding: None } => Some(name.clone()),
        ExprKind::FieldAccess { target, name, binding: None } => {
            package_path(&target.node).map(|p| format!("{p}.{}", name.node))
        }
        _ => None,
    }
}

impl<'a> Attributor<'a> {
    fn new(classpath: &'a Classpath, package: String) -> Self {
        Self {
            classes: Overlay::new(classpath),
            package,
            single: HashMap::new(),
            star: Vec::new(),
            local_classes: HashMap::new(),
            current_class: None,
            scopes: Vec::new(),
        }
    }

    fn add_import(&mut self, import: &ImportDecl) {
        if import.is_static {
            return;
        }
        if import.is_star {
            self.star.push(import.path.clone());
        } else if let Some(name) = import.binding_name() {
            self.single.insert(name.to_string(), import.path.clone());
        }
    }

    fn resolve_type_name(&self, name: &str) -> JavaType {
        if name.contains('.') {
            return JavaType::class(name);
        }
        if let Some(fqn) = self.single.get(name).or_else(|| self.local_classes.get(name)) {
            return JavaType::class(fqn.clone());
        }
        let same_package = qualify(&self.package, name);
        if self.classes.has_class(&same_package) {
            return JavaType::Class(same_package);
        }
        let candidates = self.star.iter().map(|pkg| format!("{pkg}.{name}")).chain([format!("java.lang.{name}")]);
        for fqn in candidates {
            if self.classes.has_class(&fqn) {
                return JavaType::Class(fqn);
            }
        }
        JavaType::Unknown
    }

    fn resolve_type_expr(&self, te: &TypeExpr) -> JavaType {
        match te {
            TypeExpr::Named { name, .. } => self.resolve_type_name(name),
            TypeExpr::Primitive(p) => JavaType::Primitive(*p),
            TypeExpr::Void => JavaType::Void,
            TypeExpr::Array(inner) => JavaType::array_of(self.resolve_type_expr(&inner.node)),
        }
    }

    fn param_types(&self, params: &[Param]) -> Vec<JavaType> {
        params
            .iter()
            .map(|p| {
                let ty = self.resolve_type_expr(&p.ty.node);
                if p.varargs { JavaType::array_of(ty) } else { ty }
            })
            .collect()
    }

    /// Register the unit's own classes so calls between them resolve like library calls.
    fn declare_classes(&mut self, unit: &CompilationUnit) {
        for class in &unit.classes {
            let name = &class.node.name.node;
            self.local_classes.insert(name.clone(), qualify(&self.package, name));
        }
        for class in &unit.classes {
            let decl = &class.node;
            let fqn = qualify(&self.package, &decl.name.node);
            let mut info = ClassInfo {
                fqn: fqn.clone(),
                is_interface: decl.kind == ClassKind::Interface,
                ..ClassInfo::default()
            };
            for sup in decl.extends.iter().chain(&decl.implements) {
                if let JavaType::Class(s) = self.resolve_type_expr(&sup.node) {
                    info.supertypes.push(s);
                }
            }
            for member in &decl.members {
                match member {
                    Member::Field(decls) => {
                        let ty = self.resolve_type_expr(&decls.node.ty.node);
                        let is_static = decls.node.modifiers.iter().any(|m| m == "static");
                        for var in &decls.node.vars {
                            info.fields.push(FieldInfo {
                                name: var.name.node.clone(),
                                ty: with_dims(ty.clone(), var.dims),
                                is_static,
                            });
                        }
                    }
                    Member::Method(method) => {
                        let m = &method.node;
                        let params = self.param_types(&m.params);
                        let varargs = m.params.last().is_some_and(|p| p.varargs);
                        match &m.return_type {
                            Some(ret) => info.methods.push(MethodInfo {
                                name: m.name.node.clone(),
                                params,
                                ret: self.resolve_type_expr(&ret.node),
                                is_static: m.modifiers.iter().any(|s| s == "static"),
                                varargs,
                            }),
                            None => info.constructors.push(MethodInfo {
                                name: CONSTRUCTOR.to_string(),
                                params,
                                ret: JavaType::class(fqn.clone()),
                                is_static: false,
                                varargs,
                            }),
                        }
                    }
                }
            }
            self.classes.local.insert(fqn, info);
        }
    }

    fn define(&mut self, name: &str, ty: JavaType) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.to_string(), ty);
        }
    }

    fn lookup_var(&self, name: &str) -> Option<VarBinding> {
        for scope in self.scopes.iter().rev() {
            if let Some(ty) = scope.get(name) {
                return Some(VarBinding { name: name.to_string(), ty: ty.clone(), owner: VarOwner::Local });
            }
        }
        let class = self.current_class.as_ref()?;
        let (declaring, field) = self.classes.find_field(class, name)?;
        Some(VarBinding { name: name.to_string(), ty: field.ty, owner: VarOwner::Field(declaring) })
    }

    fn type_expr(&mut self, kind: ExprKind) -> Expr {
        match kind {
            ExprKind::Literal { kind: lit, text } => {
                let ty = literal_type(lit, &text);
                Expr::typed(ExprKind::Literal { kind: lit, text }, ty)
            }
            ExprKind::This => {
                let ty = self.current_class.clone().map(JavaType::Class).unwrap_or(JavaType::Unknown);
                Expr::typed(ExprKind::This, ty)
            }
            ExprKind::Ident { name, .. } => match self.lookup_var(&name) {
                Some(binding) => {
                    let ty = binding.ty.clone();
                    Expr::typed(ExprKind::Ident { name, binding: Some(binding) }, ty)
                }
                None => {
                    let ty = self.resolve_type_name(&name);
                    Expr::typed(ExprKind::Ident { name, binding: None }, ty)
                }
            },
            ExprKind::FieldAccess { target, name, .. } => {
                let (binding, ty) = self.field_access(&target.node, &name.node);
                Expr::typed(ExprKind::FieldAccess { target, name, binding }, ty)
            }
            ExprKind::MethodCall { select, name, args, .. } => {
                let owner = match &select {
                    None => self.current_class.clone(),
                    Some(s) => match &s.node.ty {
                        JavaType::Class(c) => Some(c.clone()),
                        JavaType::Array(_) => Some(OBJECT.to_string()),
                        _ => None,
                    },
                };
                let arg_types: Vec<JavaType> = args.iter().map(|a| a.node.ty.clone()).collect();
                let method = owner.and_then(|o| self.classes.find_method(&o, &name.node, &arg_types));
                let ty = method.as_ref().map(|m| m.ret.clone()).unwrap_or(JavaType::Unknown);
                Expr::typed(ExprKind::MethodCall { select, name, args, method }, ty)
            }
            ExprKind::New { class, args, .. } => {
                let ty = class.node.resolved();
                let arg_types: Vec<JavaType> = args.iter().map(|a| a.node.ty.clone()).collect();
                let method: Option<MethodType> = match &ty {
                    JavaType::Class(c) => self.classes.find_constructor(c, &arg_types),
                    _ => None,
                };
                Expr::typed(ExprKind::New { class, args, method }, ty)
            }
            ExprKind::NewArray { elem, dims, extra_dims, init } => {
                let ty = with_dims(elem.node.resolved(), dims.len() + extra_dims);
                Expr::typed(ExprKind::NewArray { elem, dims, extra_dims, init }, ty)
            }
            ExprKind::ArrayAccess { array, index } => {
                let ty = match &array.node.ty {
                    JavaType::Array(inner) => inner.as_ref().clone(),
                    _ => JavaType::Unknown,
                };
                Expr::typed(ExprKind::ArrayAccess { array, index }, ty)
            }
            ExprKind::Assign { op, target, value } => {
                let ty = target.node.ty.clone();
                Expr::typed(ExprKind::Assign { op, target, value }, ty)
            }
            ExprKind::Binary { op, lhs, rhs } => {
                let ty = binary_type(op, &lhs.node.ty, &rhs.node.ty);
                Expr::typed(ExprKind::Binary { op, lhs, rhs }, ty)
            }
            ExprKind::Unary { op, operand } => {
                let ty = match op {
                    UnaryOp::Not => JavaType::Primitive(Prim::Boolean),
                    _ => operand.node.ty.clone(),
                };
                Expr::typed(ExprKind::Unary { op, operand }, ty)
            }
            ExprKind::Cast { ty: cast, expr } => {
                let ty = cast.node.resolved();
                Expr::typed(ExprKind::Cast { ty: cast, expr }, ty)
            }
            ExprKind::Paren(inner) => {
                let ty = inner.node.ty.clone();
                Expr::typed(ExprKind::Paren(inner), ty)
            }
            ExprKind::Conditional { cond, then_expr, else_expr } => {
                let ty = match &then_expr.node.ty {
                    JavaType::Null => else_expr.node.ty.clone(),
                    other => other.clone(),
                };
                Expr::typed(ExprKind::Conditional { cond, then_expr, else_expr }, ty)
            }
            ExprKind::Placeholder { index, ty } => {
                let ty = ty.map_classes(&|name: &str| match self.resolve_type_name(name) {
                    JavaType::Class(fqn) => Some(fqn),
                    _ => None,
                });
                Expr::typed(ExprKind::Placeholder { index, ty: ty.clone() }, ty)
            }
            kind @ ExprKind::ArrayInit(_) => Expr::new(kind),
        }
    }

    fn field_access(&self, target: &Expr, name: &str) -> (Option<VarBinding>, JavaType) {
        if let Some(path) = package_path(target) {
            let fqn = format!("{path}.{name}");
            return if self.classes.has_class(&fqn) { (None, JavaType::Class(fqn)) } else { (None, JavaType::Unknown) };
        }
        match &target.ty {
            JavaType::Array(_) if name == "length" => (None, JavaType::Primitive(Prim::Int)),
            JavaType::Class(owner) => match self.classes.find_field(owner, name) {
                Some((declaring, field)) => {
                    let binding = VarBinding { name: name.to_string(), ty: field.ty.clone(), owner: VarOwner::Field(declaring) };
                    (Some(binding), field.ty)
                }
                None => (None, JavaType::Unknown),
            },
            _ => (None, JavaType::Unknown),
        }
    }
}

fn literal_type(kind: LitKind, text: &str) -> JavaType {
    match kind {
        LitKind::Int if text.ends_with(['l', 'L']) => JavaType::Primitive(Prim::Long),
        LitKind::Int => JavaType::Primitive(Prim::Int),
        LitKind::Float if text.ends_with(['f', 'F']) => JavaType::Primitive(Prim::Float),
        LitKind::Float => JavaType::Primitive(Prim::Double),
        LitKind::String => JavaType::string(),
        LitKind::Char => JavaType::Primitive(Prim::Char),
        LitKind::Bool => JavaType::Primitive(Prim::Boolean),
        LitKind::Null => JavaType::Null,
    }
}

fn binary_type(op: BinOp, lhs: &JavaType, rhs: &JavaType) -> JavaType {
    use BinOp::*;
    match op {
        Or | And | Eq | Neq | Lt | Gt | LtEq | GtEq => JavaType::Primitive(Prim::Boolean),
        Add if *lhs == JavaType::string() || *rhs == JavaType::string() => JavaType::string(),
        _ => match (lhs, rhs) {
            (JavaType::Primitive(a), JavaType::Primitive(b)) if a.is_numeric() && b.is_numeric() => {
                JavaType::Primitive(Prim::promote(*a, *b))
            }
            _ => JavaType::Unknown,
        },
    }
}

impl Fold for Attributor<'_> {
    fn fold_class(&mut self, class: Spanned<ClassDecl>) -> Spanned<ClassDecl> {
        let fqn = qualify(&self.package, &class.node.name.node);
        let outer = self.current_class.replace(fqn);
        let class = walk_fold_class(self, class);
        self.current_class = outer;
        class
    }

    fn fold_method(&mut self, method: Spanned<MethodDecl>) -> Spanned<MethodDecl> {
        let params = self.param_types(&method.node.params);
        self.scopes.push(HashMap::new());
        for (p, ty) in method.node.params.iter().zip(&params) {
            self.define(&p.name.node, ty.clone());
        }
        let method = walk_fold_method(self, method);
        self.scopes.pop();

        let declaring = self.current_class.clone().unwrap_or_default();
        method.map(|m| {
            let (name, ret) = match &m.return_type {
                Some(ret) => (m.name.node.clone(), ret.node.resolved()),
                None => (CONSTRUCTOR.to_string(), JavaType::class(declaring.clone())),
            };
            let resolved = MethodType {
                declaring,
                name,
                params: m.params.iter().map(Param::resolved).collect(),
                ret,
                is_static: m.modifiers.iter().any(|s| s == "static"),
                varargs: m.params.last().is_some_and(|p| p.varargs),
            };
            MethodDecl { method: Some(resolved), ..m }
        })
    }

    fn fold_block(&mut self, block: Spanned<Block>) -> Spanned<Block> {
        self.scopes.push(HashMap::new());
        let block = walk_fold_block(self, block);
        self.scopes.pop();
        block
    }

    fn fold_var_decls(&mut self, decls: VarDecls) -> VarDecls {
        let ty = self.fold_type_expr(decls.ty);
        let declared = ty.node.resolved();
        let mut vars = Vec::with_capacity(decls.vars.len());
        for var in decls.vars {
            let var_ty = with_dims(declared.clone(), var.dims);
            let init = var.init.map(|e| {
                let mut e = self.fold_expr(e);
                if matches!(e.node.kind, ExprKind::ArrayInit(_)) {
                    e.node.ty = var_ty.clone();
                }
                e
            });
            // Fields were registered with their class; only locals enter a scope.
            self.define(&var.name.node, var_ty.clone());
            vars.push(NamedVar { init, ty: var_ty, ..var });
        }
        VarDecls { modifiers: decls.modifiers, ty, vars }
    }

    fn fold_expr(&mut self, expr: Spanned<Expr>) -> Spanned<Expr> {
        let Spanned { node, span } = walk_fold_expr(self, expr);
        Spanned::new(self.type_expr(node.kind), span)
    }

    fn fold_type_expr(&mut self, te: Spanned<TypeExpr>) -> Spanned<TypeExpr> {
        let te = walk_fold_type_expr(self, te);
        te.map(|t| match t {
            TypeExpr::Named { name, args, .. } => {
                let ty = self.resolve_type_name(&name);
                TypeExpr::Named { name, args, ty }
            }
            other => other,
        })
    }
}
