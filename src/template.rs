//! Code templates: target-side expression shapes with `#{any(T)}` placeholders.
//!
//! A template is compiled once, when the catalog is built: the code is parsed as an
//! expression, attributed against its declared imports, and its placeholders counted.
//! Instantiation substitutes call-site expressions positionally; the printer's
//! precedence handling keeps substituted arguments intact.

use crate::diagnostics::MigrateError;
use crate::parser::ast::{Expr, ExprKind};
use crate::parser::parse_expression;
use crate::span::{Span, Spanned};
use crate::typeck::{attribute_fragment, Classpath, JavaType};
use crate::visit::{walk_expr, walk_fold_expr, Fold, Visitor};

#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    code: String,
    body: Spanned<Expr>,
    slots: usize,
    imports: Vec<String>,
}

impl Template {
    pub fn compile(code: &str, imports: &[&str], classpath: &Classpath) -> Result<Self, MigrateError> {
        let body = parse_expression(code)
            .map_err(|e| MigrateError::template(format!("invalid template `{code}`: {e}")))?;
        let imports: Vec<String> = imports.iter().map(|s| s.to_string()).collect();
        let body = attribute_fragment(body, &imports, classpath);
        let body = SpanEraser.fold_expr(body);

        let mut counter = PlaceholderCounter::default();
        counter.visit_expr(&body);
        if counter.indices.iter().enumerate().any(|(i, idx)| i != *idx) {
            return Err(MigrateError::template(format!("placeholders of `{code}` are not numbered by occurrence")));
        }

        Ok(Self { code: code.to_string(), body, slots: counter.indices.len(), imports })
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn slots(&self) -> usize {
        self.slots
    }

    /// Fully-qualified names the instantiated code needs imported.
    pub fn imports(&self) -> &[String] {
        &self.imports
    }

    pub fn result_type(&self) -> &JavaType {
        &self.body.node.ty
    }

    /// Substitute `args` for the placeholders, in order.
    pub fn instantiate(&self, args: Vec<Spanned<Expr>>) -> Result<Spanned<Expr>, MigrateError> {
        if args.len() != self.slots {
            return Err(MigrateError::template(format!(
                "template `{}` has {} slot(s) but was given {} argument(s)",
                self.code,
                self.slots,
                args.len()
            )));
        }
        if args.is_empty() {
            return Ok(self.body.clone());
        }
        let mut subst = Substitute { args: args.into_iter().map(Some).collect() };
        Ok(subst.fold_expr(self.body.clone()))
    }
}

/// One entry of an argument-binding function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Receiver,
    Arg(usize),
    /// Receiver of the inner call of a fused chain.
    InnerReceiver,
    InnerArg(usize),
}

/// Maps a matched call's receiver and arguments to placeholder fill order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgBinding(Vec<Slot>);

/// The expressions a binding draws from.
#[derive(Debug, Clone, Copy, Default)]
pub struct BindingSource<'e> {
    pub receiver: Option<&'e Spanned<Expr>>,
    pub args: &'e [Spanned<Expr>],
    pub inner_receiver: Option<&'e Spanned<Expr>>,
    pub inner_args: &'e [Spanned<Expr>],
}

impl ArgBinding {
    pub fn new(slots: impl Into<Vec<Slot>>) -> Self {
        Self(slots.into())
    }

    /// Receiver first for instance calls, then every argument.
    pub fn receiver_then_args(has_receiver: bool, arity: usize) -> Self {
        let receiver = has_receiver.then_some(Slot::Receiver);
        Self(receiver.into_iter().chain((0..arity).map(Slot::Arg)).collect())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn slots(&self) -> &[Slot] {
        &self.0
    }

    pub fn bind(&self, src: BindingSource<'_>) -> Result<Vec<Spanned<Expr>>, MigrateError> {
        self.0
            .iter()
            .map(|slot| {
                let found = match *slot {
                    Slot::Receiver => src.receiver,
                    Slot::Arg(i) => src.args.get(i),
                    Slot::InnerReceiver => src.inner_receiver,
                    Slot::InnerArg(i) => src.inner_args.get(i),
                };
                found.cloned().ok_or_else(|| MigrateError::template(format!("binding slot {slot:?} is absent at the call site")))
            })
            .collect()
    }
}

#[derive(Default)]
struct PlaceholderCounter {
    indices: Vec<usize>,
}

impl Visitor for PlaceholderCounter {
    fn visit_expr(&mut self, expr: &Spanned<Expr>) {
        if let ExprKind::Placeholder { index, .. } = expr.node.kind {
            self.indices.push(index);
        }
        walk_expr(self, expr);
    }
}

/// Template-produced nodes carry dummy spans.
struct SpanEraser;

impl Fold for SpanEraser {
    fn fold_expr(&mut self, expr: Spanned<Expr>) -> Spanned<Expr> {
        let mut expr = walk_fold_expr(self, expr);
        match &mut expr.node.kind {
            ExprKind::MethodCall { name, .. } | ExprKind::FieldAccess { name, .. } => name.span = Span::dummy(),
            _ => {}
        }
        expr.span = Span::dummy();
        expr
    }
}

struct Substitute {
    args: Vec<Option<Spanned<Expr>>>,
}

impl Fold for Substitute {
    fn fold_expr(&mut self, expr: Spanned<Expr>) -> Spanned<Expr> {
        if let ExprKind::Placeholder { index, .. } = expr.node.kind {
            if let Some(arg) = self.args.get_mut(index).and_then(Option::take) {
                return arg;
            }
            return expr;
        }
        walk_fold_expr(self, expr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pretty::print_expr;
    use crate::typeck::standard_classpath;

    fn expr(src: &str) -> Spanned<Expr> {
        parse_expression(src).unwrap()
    }

    #[test]
    fn compile_counts_slots_and_types_result() {
        let cp = standard_classpath();
        let t = Template::compile("Duration.ofMillis(#{any(long)})", &["java.time.Duration"], &cp).unwrap();
        assert_eq!(t.slots(), 1);
        assert_eq!(t.result_type(), &JavaType::class("java.time.Duration"));
        assert_eq!(t.imports(), &["java.time.Duration".to_string()]);
    }

    #[test]
    fn instantiate_substitutes_in_order() {
        let cp = standard_classpath();
        let t = Template::compile("#{any(java.time.Duration)}.plusMillis(#{any(long)})", &[], &cp).unwrap();
        let out = t.instantiate(vec![expr("d"), expr("a + b")]).unwrap();
        assert_eq!(print_expr(&out.node), "d.plusMillis(a + b)");
    }

    #[test]
    fn substituted_arguments_keep_their_grouping() {
        let cp = standard_classpath();
        let t = Template::compile("#{any(java.time.ZonedDateTime)}.withNano(#{any(int)} * 1_000_000)", &[], &cp).unwrap();
        let out = t.instantiate(vec![expr("dt"), expr("a + b")]).unwrap();
        assert_eq!(print_expr(&out.node), "dt.withNano((a + b) * 1_000_000)");
    }

    #[test]
    fn arity_mismatch_is_a_template_error() {
        let cp = standard_classpath();
        let t = Template::compile("ZonedDateTime.now()", &["java.time.ZonedDateTime"], &cp).unwrap();
        assert_eq!(t.slots(), 0);
        assert!(t.instantiate(vec![]).is_ok());
        let err = t.instantiate(vec![expr("x")]).unwrap_err();
        assert!(matches!(err, MigrateError::Template { .. }));
    }

    #[test]
    fn invalid_code_is_rejected() {
        let cp = standard_classpath();
        assert!(Template::compile("Duration.ofMillis(", &[], &cp).is_err());
    }

    #[test]
    fn binding_reorders_duplicates_and_omits() {
        let receiver = expr("dt");
        let args = vec![expr("1"), expr("2")];
        let src = BindingSource { receiver: Some(&receiver), args: &args, ..BindingSource::default() };
        let bound = ArgBinding::new([Slot::Arg(1), Slot::Receiver, Slot::Receiver]).bind(src).unwrap();
        let printed: Vec<String> = bound.iter().map(|e| print_expr(&e.node)).collect();
        assert_eq!(printed, vec!["2", "dt", "dt"]);
        assert!(ArgBinding::new([Slot::InnerArg(0)]).bind(src).is_err());
        assert_eq!(ArgBinding::receiver_then_args(true, 2).slots(), &[Slot::Receiver, Slot::Arg(0), Slot::Arg(1)]);
        assert_eq!(ArgBinding::receiver_then_args(false, 1).len(), 1);
    }
}
