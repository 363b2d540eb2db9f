use crate::parser::ast::*;

/// Pretty-print a `CompilationUnit` back into canonical Java source text.
pub fn print_unit(unit: &CompilationUnit) -> String {
    let mut pp = PrettyPrinter::new();
    pp.emit_unit(unit);
    pp.buf
}

/// Print a single expression; used for diagnostic snippets and tests.
pub fn print_expr(expr: &Expr) -> String {
    let mut pp = PrettyPrinter::new();
    pp.emit_expr(expr, 0);
    pp.buf
}

pub fn print_type(ty: &TypeExpr) -> String {
    let mut pp = PrettyPrinter::new();
    pp.emit_type(ty);
    pp.buf
}

struct PrettyPrinter {
    buf: String,
    indent: usize,
}

impl PrettyPrinter {
    fn new() -> Self {
        Self {
            buf: String::new(),
            indent: 0,
        }
    }

    fn write(&mut self, s: &str) {
        self.buf.push_str(s);
    }

    fn newline(&mut self) {
        self.buf.push('\n');
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent {
            self.buf.push_str("    ");
        }
    }

    fn indent(&mut self) {
        self.indent += 1;
    }

    fn dedent(&mut self) {
        self.indent -= 1;
    }

    fn emit_modifiers(&mut self, modifiers: &[String]) {
        for m in modifiers {
            self.write(m);
            self.write(" ");
        }
    }

    // ── Compilation unit ─────────────────────────────────────────────

    fn emit_unit(&mut self, unit: &CompilationUnit) {
        let mut has_output = false;

        if let Some(pkg) = &unit.package {
            self.write("package ");
            self.write(&pkg.node);
            self.write(";");
            self.newline();
            has_output = true;
        }

        if !unit.imports.is_empty() {
            if has_output {
                self.newline();
            }
            for imp in &unit.imports {
                self.emit_import(&imp.node);
                self.newline();
            }
            has_output = true;
        }

        for class in &unit.classes {
            if has_output {
                self.newline();
            }
            self.emit_class(&class.node);
            self.newline();
            has_output = true;
        }
    }

    fn emit_import(&mut self, imp: &ImportDecl) {
        self.write("import ");
        if imp.is_static {
            self.write("static ");
        }
        self.write(&imp.path);
        if imp.is_star {
            self.write(".*");
        }
        self.write(";");
    }

    fn emit_class(&mut self, class: &ClassDecl) {
        self.emit_modifiers(&class.modifiers);
        self.write(match class.kind {
            ClassKind::Class => "class ",
            ClassKind::Interface => "interface ",
        });
        self.write(&class.name.node);
        if !class.extends.is_empty() {
            self.write(" extends ");
            self.emit_type_list(&class.extends);
        }
        if !class.implements.is_empty() {
            self.write(" implements ");
            self.emit_type_list(&class.implements);
        }
        self.write(" {");
        self.newline();
        self.indent();

        // Consecutive fields stay together; methods are separated by a blank line.
        let mut prev_was_method = false;
        for (i, member) in class.members.iter().enumerate() {
            let is_method = matches!(member, Member::Method(_));
            if i > 0 && (is_method || prev_was_method) {
                self.newline();
            }
            match member {
                Member::Field(decls) => {
                    self.write_indent();
                    self.emit_var_decls(&decls.node);
                    self.write(";");
                    self.newline();
                }
                Member::Method(method) => self.emit_method(&method.node),
            }
            prev_was_method = is_method;
        }

        self.dedent();
        self.write_indent();
        self.write("}");
    }

    fn emit_type_list(&mut self, types: &[crate::span::Spanned<TypeExpr>]) {
        for (i, t) in types.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.emit_type(&t.node);
        }
    }

    fn emit_method(&mut self, method: &MethodDecl) {
        self.write_indent();
        self.emit_modifiers(&method.modifiers);
        if let Some(ret) = &method.return_type {
            self.emit_type(&ret.node);
            self.write(" ");
        }
        self.write(&method.name.node);
        self.write("(");
        for (i, p) in method.params.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.emit_modifiers(&p.modifiers);
            self.emit_type(&p.ty.node);
            if p.varargs {
                self.write("...");
            }
            self.write(" ");
            self.write(&p.name.node);
        }
        self.write(")");
        match &method.body {
            Some(body) => {
                self.write(" ");
                self.emit_block(&body.node);
                self.newline();
            }
            None => {
                self.write(";");
                self.newline();
            }
        }
    }

    // ── Types ────────────────────────────────────────────────────────

    fn emit_type(&mut self, ty: &TypeExpr) {
        match ty {
            TypeExpr::Named { name, args, .. } => {
                self.write(name);
                if name == "?" {
                    if let Some(bound) = args.first() {
                        self.write(" extends ");
                        self.emit_type(&bound.node);
                    }
                    return;
                }
                if !args.is_empty() {
                    self.write("<");
                    self.emit_type_list(args);
                    self.write(">");
                }
            }
            TypeExpr::Primitive(p) => self.write(p.name()),
            TypeExpr::Void => self.write("void"),
            TypeExpr::Array(inner) => {
                self.emit_type(&inner.node);
                self.write("[]");
            }
        }
    }

    // ── Statements ───────────────────────────────────────────────────

    fn emit_block(&mut self, block: &Block) {
        self.write("{");
        self.newline();
        self.indent();
        for stmt in &block.stmts {
            self.write_indent();
            self.emit_stmt(&stmt.node);
            self.newline();
        }
        self.dedent();
        self.write_indent();
        self.write("}");
    }

    fn emit_var_decls(&mut self, decls: &VarDecls) {
        self.emit_modifiers(&decls.modifiers);
        self.emit_type(&decls.ty.node);
        self.write(" ");
        for (i, var) in decls.vars.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.write(&var.name.node);
            for _ in 0..var.dims {
                self.write("[]");
            }
            if let Some(init) = &var.init {
                self.write(" = ");
                self.emit_expr(&init.node, 0);
            }
        }
    }

    fn emit_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::LocalVar(decls) => {
                self.emit_var_decls(decls);
                self.write(";");
            }
            Stmt::Expr(expr) => {
                self.emit_expr(&expr.node, 0);
                self.write(";");
            }
            Stmt::Return(value) => {
                self.write("return");
                if let Some(v) = value {
                    self.write(" ");
                    self.emit_expr(&v.node, 0);
                }
                self.write(";");
            }
            Stmt::If { cond, then_branch, else_branch } => {
                self.write("if (");
                self.emit_expr(&cond.node, 0);
                self.write(") ");
                self.emit_stmt(&then_branch.node);
                if let Some(else_branch) = else_branch {
                    self.write(" else ");
                    self.emit_stmt(&else_branch.node);
                }
            }
            Stmt::While { cond, body } => {
                self.write("while (");
                self.emit_expr(&cond.node, 0);
                self.write(") ");
                self.emit_stmt(&body.node);
            }
            Stmt::Block(block) => self.emit_block(&block.node),
            Stmt::Empty => self.write(";"),
        }
    }

    // ── Expressions ──────────────────────────────────────────────────

    fn emit_args(&mut self, args: &[crate::span::Spanned<Expr>]) {
        self.write("(");
        for (i, arg) in args.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.emit_expr(&arg.node, 0);
        }
        self.write(")");
    }

    fn emit_expr(&mut self, expr: &Expr, parent_prec: u8) {
        match &expr.kind {
            ExprKind::Literal { text, .. } => self.write(text),
            ExprKind::This => self.write("this"),
            ExprKind::Ident { name, .. } => self.write(name),
            ExprKind::FieldAccess { target, name, .. } => {
                self.emit_expr(&target.node, POSTFIX_PREC);
                self.write(".");
                self.write(&name.node);
            }
            ExprKind::MethodCall { select, name, args, .. } => {
                if let Some(select) = select {
                    self.emit_expr(&select.node, POSTFIX_PREC);
                    self.write(".");
                }
                self.write(&name.node);
                self.emit_args(args);
            }
            ExprKind::New { class, args, .. } => {
                self.write("new ");
                self.emit_type(&class.node);
                self.emit_args(args);
            }
            ExprKind::NewArray { elem, dims, extra_dims, init } => {
                self.write("new ");
                self.emit_type(&elem.node);
                for d in dims {
                    self.write("[");
                    self.emit_expr(&d.node, 0);
                    self.write("]");
                }
                for _ in 0..*extra_dims {
                    self.write("[]");
                }
                if let Some(init) = init {
                    self.write(" ");
                    self.emit_array_init(init);
                }
            }
            ExprKind::ArrayInit(elems) => self.emit_array_init(elems),
            ExprKind::ArrayAccess { array, index } => {
                self.emit_expr(&array.node, POSTFIX_PREC);
                self.write("[");
                self.emit_expr(&index.node, 0);
                self.write("]");
            }
            ExprKind::Assign { op, target, value } => {
                let need_parens = parent_prec > ASSIGN_PREC;
                if need_parens {
                    self.write("(");
                }
                self.emit_expr(&target.node, ASSIGN_PREC + 1);
                self.write(" ");
                self.write(assign_op_str(*op));
                self.write(" ");
                self.emit_expr(&value.node, ASSIGN_PREC);
                if need_parens {
                    self.write(")");
                }
            }
            ExprKind::Binary { op, lhs, rhs } => {
                let prec = binop_prec(*op);
                let need_parens = prec < parent_prec;
                if need_parens {
                    self.write("(");
                }
                // Left child: same precedence (left-associative, no parens needed)
                self.emit_expr(&lhs.node, prec);
                self.write(" ");
                self.write(binop_str(*op));
                self.write(" ");
                // Right child: prec + 1 (forces parens for same-prec on right)
                self.emit_expr(&rhs.node, prec + 1);
                if need_parens {
                    self.write(")");
                }
            }
            ExprKind::Unary { op, operand } => {
                let need_parens = parent_prec > UNARY_PREC;
                if need_parens {
                    self.write("(");
                }
                match op {
                    UnaryOp::PostInc | UnaryOp::PostDec => {
                        self.emit_expr(&operand.node, POSTFIX_PREC);
                        self.write(if *op == UnaryOp::PostInc { "++" } else { "--" });
                    }
                    _ => {
                        self.write(match op {
                            UnaryOp::Neg => "-",
                            UnaryOp::Plus => "+",
                            UnaryOp::Not => "!",
                            UnaryOp::PreInc => "++",
                            _ => "--",
                        });
                        self.emit_expr(&operand.node, UNARY_PREC);
                    }
                }
                if need_parens {
                    self.write(")");
                }
            }
            ExprKind::Cast { ty, expr } => {
                let need_parens = parent_prec > UNARY_PREC;
                if need_parens {
                    self.write("(");
                }
                self.write("(");
                self.emit_type(&ty.node);
                self.write(") ");
                self.emit_expr(&expr.node, UNARY_PREC);
                if need_parens {
                    self.write(")");
                }
            }
            ExprKind::Paren(inner) => {
                self.write("(");
                self.emit_expr(&inner.node, 0);
                self.write(")");
            }
            ExprKind::Conditional { cond, then_expr, else_expr } => {
                let need_parens = parent_prec > COND_PREC;
                if need_parens {
                    self.write("(");
                }
                self.emit_expr(&cond.node, COND_PREC + 1);
                self.write(" ? ");
                self.emit_expr(&then_expr.node, 0);
                self.write(" : ");
                self.emit_expr(&else_expr.node, COND_PREC);
                if need_parens {
                    self.write(")");
                }
            }
            ExprKind::Placeholder { ty, .. } => {
                self.write("#{any(");
                if !ty.is_unknown() {
                    self.write(&ty.to_string());
                }
                self.write(")}");
            }
        }
    }

    fn emit_array_init(&mut self, elems: &[crate::span::Spanned<Expr>]) {
        self.write("{");
        for (i, e) in elems.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.emit_expr(&e.node, 0);
        }
        self.write("}");
    }
}

const ASSIGN_PREC: u8 = 1;
const COND_PREC: u8 = 2;
const UNARY_PREC: u8 = 20;
const POSTFIX_PREC: u8 = 30;

fn binop_prec(op: BinOp) -> u8 {
    match op {
        BinOp::Or => 3,
        BinOp::And => 4,
        BinOp::Eq | BinOp::Neq => 5,
        BinOp::Lt | BinOp::Gt | BinOp::LtEq | BinOp::GtEq => 6,
        BinOp::Add | BinOp::Sub => 7,
        BinOp::Mul | BinOp::Div | BinOp::Mod => 8,
    }
}

fn binop_str(op: BinOp) -> &'static str {
    match op {
        BinOp::Or => "||",
        BinOp::And => "&&",
        BinOp::Eq => "==",
        BinOp::Neq => "!=",
        BinOp::Lt => "<",
        BinOp::Gt => ">",
        BinOp::LtEq => "<=",
        BinOp::GtEq => ">=",
        BinOp::Add => "+",
        BinOp::Sub => "-",
        BinOp::Mul => "*",
        BinOp::Div => "/",
        BinOp::Mod => "%",
    }
}

fn assign_op_str(op: AssignOp) -> &'static str {
    match op {
        AssignOp::Assign => "=",
        AssignOp::Add => "+=",
        AssignOp::Sub => "-=",
        AssignOp::Mul => "*=",
        AssignOp::Div => "/=",
        AssignOp::Mod => "%=",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse, parse_expression};
    use crate::span::Spanned;

    fn pp(source: &str) -> String {
        print_unit(&parse(source).unwrap())
    }

    fn pe(source: &str) -> String {
        print_expr(&parse_expression(source).unwrap().node)
    }

    #[test]
    fn canonical_unit_is_a_fixpoint() {
        let src = "package a;\n\nimport java.time.Duration;\n\nclass A {\n    private Duration d;\n    private int n;\n\n    Duration get(long x) {\n        Duration d = Duration.ofMillis(x);\n        if (x > 0) {\n            return d;\n        } else {\n            return null;\n        }\n    }\n}\n";
        assert_eq!(pp(src), src);
    }

    #[test]
    fn normalizes_whitespace() {
        assert_eq!(
            pp("class A{void f(){int x=1+2;x++;}}"),
            "class A {\n    void f() {\n        int x = 1 + 2;\n        x++;\n    }\n}\n"
        );
    }

    #[test]
    fn expressions_roundtrip() {
        assert_eq!(pe("(int) ChronoUnit.DAYS.between(a, b)"), "(int) ChronoUnit.DAYS.between(a, b)");
        assert_eq!(pe("a ? b : c"), "a ? b : c");
        assert_eq!(pe("new DateTime[] {x, y}"), "new DateTime[] {x, y}");
        assert_eq!(pe("xs[0].getMillis()"), "xs[0].getMillis()");
        assert_eq!(pe("-a * (b - c)"), "-a * (b - c)");
    }

    #[test]
    fn substituted_operands_get_parentheses() {
        let template = parse_expression("#{any(int)} * 1_000_000").unwrap();
        let arg = parse_expression("a + b").unwrap();
        let ExprKind::Binary { op, rhs, .. } = template.node.kind else { panic!() };
        let rebuilt = Expr::new(ExprKind::Binary { op, lhs: Box::new(arg), rhs });
        assert_eq!(print_expr(&rebuilt), "(a + b) * 1_000_000");
    }

    #[test]
    fn binary_receiver_is_parenthesized() {
        let sum = parse_expression("a + b").unwrap();
        let call = Expr::new(ExprKind::MethodCall {
            select: Some(Box::new(sum)),
            name: Spanned::dummy("toString".to_string()),
            args: vec![],
            method: None,
        });
        assert_eq!(print_expr(&call), "(a + b).toString()");
    }

    #[test]
    fn cast_operand_of_call_is_parenthesized() {
        let cast = parse_expression("(long) x").unwrap();
        let call = Expr::new(ExprKind::MethodCall {
            select: Some(Box::new(cast)),
            name: Spanned::dummy("hashCode".to_string()),
            args: vec![],
            method: None,
        });
        assert_eq!(print_expr(&call), "((long) x).hashCode()");
    }

    #[test]
    fn placeholders_print_with_type() {
        assert_eq!(pe("#{any(long)}.foo(#{any()})"), "#{any(long)}.foo(#{any()})");
    }
}
