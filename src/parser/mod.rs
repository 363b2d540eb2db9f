pub mod ast;

use crate::diagnostics::MigrateError;
use crate::lexer::{self, token::Token};
use crate::span::{Span, Spanned};
use crate::typeck::types::{JavaType, Prim};
use ast::*;

/// Lex and parse a whole compilation unit.
pub fn parse(source: &str) -> Result<CompilationUnit, MigrateError> {
    let tokens = lexer::lex(source)?;
    let mut parser = Parser::new(&tokens, source);
    let unit = parser.parse_compilation_unit()?;
    parser.expect_eof()?;
    Ok(unit)
}

/// Lex and parse a single expression (template shapes, tests).
pub fn parse_expression(source: &str) -> Result<Spanned<Expr>, MigrateError> {
    let tokens = lexer::lex(source)?;
    let mut parser = Parser::new(&tokens, source);
    let expr = parser.parse_expr()?;
    parser.expect_eof()?;
    Ok(expr)
}

pub struct Parser<'a> {
    tokens: &'a [Spanned<Token>],
    source: &'a str,
    pos: usize,
    placeholders: usize,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Spanned<Token>], source: &'a str) -> Self {
        Self { tokens, source, pos: 0, placeholders: 0 }
    }

    fn peek(&self) -> Option<&'a Spanned<Token>> {
        self.tokens.get(self.pos)
    }

    fn peek_at(&self, offset: usize) -> Option<&'a Spanned<Token>> {
        self.tokens.get(self.pos + offset)
    }

    fn at(&self, tok: &Token) -> bool {
        self.peek().is_some_and(|t| std::mem::discriminant(&t.node) == std::mem::discriminant(tok))
    }

    fn advance(&mut self) -> Option<&'a Spanned<Token>> {
        let tok = self.tokens.get(self.pos)?;
        self.pos += 1;
        Some(tok)
    }

    fn eat(&mut self, tok: &Token) -> bool {
        if self.at(tok) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn text(&self, tok: &Spanned<Token>) -> &'a str {
        &self.source[tok.span.start..tok.span.end]
    }

    fn expect(&mut self, expected: &Token) -> Result<&'a Spanned<Token>, MigrateError> {
        match self.peek() {
            Some(tok) if std::mem::discriminant(&tok.node) == std::mem::discriminant(expected) => {
                self.pos += 1;
                Ok(tok)
            }
            Some(tok) => Err(MigrateError::syntax(
                format!("expected {expected}, found {}", tok.node),
                tok.span,
            )),
            None => Err(MigrateError::syntax(
                format!("expected {expected}, found end of file"),
                self.eof_span(),
            )),
        }
    }

    fn expect_ident(&mut self) -> Result<Spanned<String>, MigrateError> {
        match self.peek() {
            Some(tok) if matches!(tok.node, Token::Ident) => {
                self.pos += 1;
                Ok(Spanned::new(self.text(tok).to_string(), tok.span))
            }
            Some(tok) => Err(MigrateError::syntax(
                format!("expected identifier, found {}", tok.node),
                tok.span,
            )),
            None => Err(MigrateError::syntax(
                "expected identifier, found end of file",
                self.eof_span(),
            )),
        }
    }

    fn expect_eof(&self) -> Result<(), MigrateError> {
        match self.peek() {
            None => Ok(()),
            Some(tok) => Err(MigrateError::syntax(
                format!("unexpected {} after end of input", tok.node),
                tok.span,
            )),
        }
    }

    fn eof_span(&self) -> Span {
        if let Some(last) = self.tokens.last() {
            Span::new(last.span.end, last.span.end)
        } else {
            Span::dummy()
        }
    }

    fn prev_end(&self) -> usize {
        self.pos
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .map(|t| t.span.end)
            .unwrap_or(0)
    }

    fn span_from(&self, start: usize) -> Span {
        Span::new(start, self.prev_end())
    }

    fn start_offset(&self) -> usize {
        self.peek().map(|t| t.span.start).unwrap_or_else(|| self.eof_span().start)
    }

    // ── Compilation unit ─────────────────────────────────────────────

    pub fn parse_compilation_unit(&mut self) -> Result<CompilationUnit, MigrateError> {
        let package = if self.at(&Token::Package) {
            let start = self.start_offset();
            self.advance();
            let name = self.parse_dotted_name()?;
            self.expect(&Token::Semi)?;
            Some(Spanned::new(name, self.span_from(start)))
        } else {
            None
        };

        let mut imports = Vec::new();
        while self.at(&Token::Import) {
            imports.push(self.parse_import()?);
        }

        let mut classes = Vec::new();
        while self.peek().is_some() {
            if self.eat(&Token::Semi) {
                continue;
            }
            classes.push(self.parse_class()?);
        }

        Ok(CompilationUnit { package, imports, classes })
    }

    fn parse_dotted_name(&mut self) -> Result<String, MigrateError> {
        let mut name = self.expect_ident()?.node;
        while self.at(&Token::Dot) && self.peek_at(1).is_some_and(|t| matches!(t.node, Token::Ident)) {
            self.advance();
            name.push('.');
            name.push_str(&self.expect_ident()?.node);
        }
        Ok(name)
    }

    fn parse_import(&mut self) -> Result<Spanned<ImportDecl>, MigrateError> {
        let start = self.start_offset();
        self.expect(&Token::Import)?;
        let is_static = self.eat(&Token::Static);
        let path = self.parse_dotted_name()?;
        let is_star = if self.eat(&Token::Dot) {
            self.expect(&Token::Star)?;
            true
        } else {
            false
        };
        self.expect(&Token::Semi)?;
        Ok(Spanned::new(ImportDecl { path, is_static, is_star }, self.span_from(start)))
    }

    fn parse_modifiers(&mut self) -> Result<Vec<String>, MigrateError> {
        let mut modifiers = Vec::new();
        loop {
            if self.at(&Token::At) {
                self.advance();
                let name = self.parse_dotted_name()?;
                modifiers.push(format!("@{name}"));
                continue;
            }
            match self.peek().and_then(|t| t.node.modifier()) {
                Some(m) => {
                    self.advance();
                    modifiers.push(m.to_string());
                }
                None => return Ok(modifiers),
            }
        }
    }

    fn parse_class(&mut self) -> Result<Spanned<ClassDecl>, MigrateError> {
        let start = self.start_offset();
        let modifiers = self.parse_modifiers()?;
        let kind = if self.eat(&Token::Class) {
            ClassKind::Class
        } else if self.eat(&Token::Interface) {
            ClassKind::Interface
        } else {
            let tok = self.peek();
            return Err(MigrateError::syntax(
                format!(
                    "expected class or interface declaration, found {}",
                    tok.map(|t| t.node.to_string()).unwrap_or_else(|| "end of file".to_string())
                ),
                tok.map(|t| t.span).unwrap_or_else(|| self.eof_span()),
            ));
        };
        let name = self.expect_ident()?;

        let mut extends = Vec::new();
        if self.eat(&Token::Extends) {
            extends = self.parse_type_list()?;
        }
        let mut implements = Vec::new();
        if self.eat(&Token::Implements) {
            implements = self.parse_type_list()?;
        }

        self.expect(&Token::LBrace)?;
        let mut members = Vec::new();
        while !self.at(&Token::RBrace) {
            if self.peek().is_none() {
                return Err(MigrateError::syntax("unterminated class body", self.eof_span()));
            }
            if self.eat(&Token::Semi) {
                continue;
            }
            members.push(self.parse_member(&name.node)?);
        }
        self.expect(&Token::RBrace)?;

        Ok(Spanned::new(
            ClassDecl { modifiers, kind, name, extends, implements, members },
            self.span_from(start),
        ))
    }

    fn parse_type_list(&mut self) -> Result<Vec<Spanned<TypeExpr>>, MigrateError> {
        let mut types = vec![self.parse_type()?];
        while self.eat(&Token::Comma) {
            types.push(self.parse_type()?);
        }
        Ok(types)
    }

    fn parse_member(&mut self, class_name: &str) -> Result<Member, MigrateError> {
        let start = self.start_offset();
        let modifiers = self.parse_modifiers()?;

        // Constructor: `Name(`
        let is_ctor = self.peek().is_some_and(|t| matches!(t.node, Token::Ident) && self.text(t) == class_name)
            && self.peek_at(1).is_some_and(|t| matches!(t.node, Token::LParen));
        if is_ctor {
            let name = self.expect_ident()?;
            return self.parse_method_rest(start, modifiers, None, name);
        }

        let ty = if self.at(&Token::Void) {
            let tok = self.expect(&Token::Void)?;
            Spanned::new(TypeExpr::Void, tok.span)
        } else {
            self.parse_type()?
        };
        let name = self.expect_ident()?;
        if self.at(&Token::LParen) {
            return self.parse_method_rest(start, modifiers, Some(ty), name);
        }

        let vars = self.parse_var_declarators(name)?;
        self.expect(&Token::Semi)?;
        Ok(Member::Field(Spanned::new(VarDecls { modifiers, ty, vars }, self.span_from(start))))
    }

    fn parse_method_rest(
        &mut self,
        start: usize,
        modifiers: Vec<String>,
        return_type: Option<Spanned<TypeExpr>>,
        name: Spanned<String>,
    ) -> Result<Member, MigrateError> {
        self.expect(&Token::LParen)?;
        let mut params = Vec::new();
        while !self.at(&Token::RParen) {
            if !params.is_empty() {
                self.expect(&Token::Comma)?;
            }
            params.push(self.parse_param()?);
        }
        self.expect(&Token::RParen)?;

        let body = if self.eat(&Token::Semi) {
            None
        } else {
            Some(self.parse_block()?)
        };

        Ok(Member::Method(Spanned::new(
            MethodDecl { modifiers, return_type, name, params, body, method: None },
            self.span_from(start),
        )))
    }

    fn parse_param(&mut self) -> Result<Param, MigrateError> {
        let modifiers = self.parse_modifiers()?;
        let mut ty = self.parse_type()?;
        let varargs = if self.at(&Token::Dot) {
            self.expect(&Token::Dot)?;
            self.expect(&Token::Dot)?;
            self.expect(&Token::Dot)?;
            true
        } else {
            false
        };
        let name = self.expect_ident()?;
        while self.at(&Token::LBracket) {
            self.advance();
            self.expect(&Token::RBracket)?;
            let span = ty.span.to(self.span_from(ty.span.start));
            ty = Spanned::new(TypeExpr::Array(Box::new(ty)), span);
        }
        Ok(Param { modifiers, ty, name, varargs })
    }

    // ── Types ────────────────────────────────────────────────────────

    pub fn parse_type(&mut self) -> Result<Spanned<TypeExpr>, MigrateError> {
        let start = self.start_offset();
        let base = if let Some(p) = self.peek().and_then(|t| t.node.primitive()) {
            self.advance();
            let prim = Prim::from_name(p).ok_or_else(|| {
                MigrateError::syntax(format!("unknown primitive type {p}"), self.span_from(start))
            })?;
            TypeExpr::Primitive(prim)
        } else if self.eat(&Token::Question) {
            // Wildcard type argument; bounds are kept only as text.
            if self.eat(&Token::Extends) {
                let bound = self.parse_type()?;
                return Ok(Spanned::new(
                    TypeExpr::Named { name: "?".to_string(), args: vec![bound], ty: JavaType::Unknown },
                    self.span_from(start),
                ));
            }
            TypeExpr::named("?")
        } else {
            let name = self.parse_dotted_name()?;
            let mut args = Vec::new();
            if self.eat(&Token::Lt) {
                while !self.at(&Token::Gt) {
                    if !args.is_empty() {
                        self.expect(&Token::Comma)?;
                    }
                    args.push(self.parse_type()?);
                }
                self.expect(&Token::Gt)?;
            }
            TypeExpr::Named { name, args, ty: JavaType::Unknown }
        };

        let mut ty = Spanned::new(base, self.span_from(start));
        while self.at(&Token::LBracket) && self.peek_at(1).is_some_and(|t| matches!(t.node, Token::RBracket)) {
            self.advance();
            self.advance();
            ty = Spanned::new(TypeExpr::Array(Box::new(ty)), self.span_from(start));
        }
        Ok(ty)
    }

    /// Try to read `Type ident` at the current position without consuming anything on failure.
    fn looks_like_declaration(&mut self) -> bool {
        let saved = self.pos;
        let _ = self.parse_modifiers();
        let ok = self.parse_type().is_ok() && self.at(&Token::Ident);
        self.pos = saved;
        ok
    }

    fn parse_var_declarators(&mut self, first: Spanned<String>) -> Result<Vec<NamedVar>, MigrateError> {
        let mut vars = vec![self.parse_var_rest(first)?];
        while self.eat(&Token::Comma) {
            let name = self.expect_ident()?;
            vars.push(self.parse_var_rest(name)?);
        }
        Ok(vars)
    }

    fn parse_var_rest(&mut self, name: Spanned<String>) -> Result<NamedVar, MigrateError> {
        let mut dims = 0;
        while self.eat(&Token::LBracket) {
            self.expect(&Token::RBracket)?;
            dims += 1;
        }
        let init = if self.eat(&Token::Eq) {
            if self.at(&Token::LBrace) {
                Some(self.parse_array_init()?)
            } else {
                Some(self.parse_expr()?)
            }
        } else {
            None
        };
        Ok(NamedVar { name, dims, init, ty: JavaType::Unknown })
    }

    fn parse_array_init(&mut self) -> Result<Spanned<Expr>, MigrateError> {
        let start = self.start_offset();
        self.expect(&Token::LBrace)?;
        let mut elems = Vec::new();
        while !self.at(&Token::RBrace) {
            if !elems.is_empty() {
                self.expect(&Token::Comma)?;
                if self.at(&Token::RBrace) {
                    break;
                }
            }
            if self.at(&Token::LBrace) {
                elems.push(self.parse_array_init()?);
            } else {
                elems.push(self.parse_expr()?);
            }
        }
        self.expect(&Token::RBrace)?;
        Ok(Spanned::new(Expr::new(ExprKind::ArrayInit(elems)), self.span_from(start)))
    }

    // ── Statements ───────────────────────────────────────────────────

    fn parse_block(&mut self) -> Result<Spanned<Block>, MigrateError> {
        let start = self.start_offset();
        self.expect(&Token::LBrace)?;
        let mut stmts = Vec::new();
        while !self.at(&Token::RBrace) {
            if self.peek().is_none() {
                return Err(MigrateError::syntax("unterminated block", self.eof_span()));
            }
            stmts.push(self.parse_stmt()?);
        }
        self.expect(&Token::RBrace)?;
        Ok(Spanned::new(Block { stmts }, self.span_from(start)))
    }

    fn parse_stmt(&mut self) -> Result<Spanned<Stmt>, MigrateError> {
        let start = self.start_offset();
        let tok = self.peek().ok_or_else(|| {
            MigrateError::syntax("unexpected end of file in statement", self.eof_span())
        })?;

        let stmt = match &tok.node {
            Token::LBrace => Stmt::Block(self.parse_block()?),
            Token::Semi => {
                self.advance();
                Stmt::Empty
            }
            Token::Return => {
                self.advance();
                let value = if self.at(&Token::Semi) { None } else { Some(self.parse_expr()?) };
                self.expect(&Token::Semi)?;
                Stmt::Return(value)
            }
            Token::If => {
                self.advance();
                self.expect(&Token::LParen)?;
                let cond = self.parse_expr()?;
                self.expect(&Token::RParen)?;
                let then_branch = Box::new(self.parse_stmt()?);
                let else_branch = if self.eat(&Token::Else) {
                    Some(Box::new(self.parse_stmt()?))
                } else {
                    None
                };
                Stmt::If { cond, then_branch, else_branch }
            }
            Token::While => {
                self.advance();
                self.expect(&Token::LParen)?;
                let cond = self.parse_expr()?;
                self.expect(&Token::RParen)?;
                let body = Box::new(self.parse_stmt()?);
                Stmt::While { cond, body }
            }
            _ if self.looks_like_declaration() => {
                let modifiers = self.parse_modifiers()?;
                let ty = self.parse_type()?;
                let name = self.expect_ident()?;
                let vars = self.parse_var_declarators(name)?;
                self.expect(&Token::Semi)?;
                Stmt::LocalVar(VarDecls { modifiers, ty, vars })
            }
            _ => {
                let expr = self.parse_expr()?;
                self.expect(&Token::Semi)?;
                Stmt::Expr(expr)
            }
        };
        Ok(Spanned::new(stmt, self.span_from(start)))
    }

    // ── Expressions ──────────────────────────────────────────────────

    pub fn parse_expr(&mut self) -> Result<Spanned<Expr>, MigrateError> {
        let lhs = self.parse_conditional()?;
        let op = match self.peek().map(|t| &t.node) {
            Some(Token::Eq) => AssignOp::Assign,
            Some(Token::PlusEq) => AssignOp::Add,
            Some(Token::MinusEq) => AssignOp::Sub,
            Some(Token::StarEq) => AssignOp::Mul,
            Some(Token::SlashEq) => AssignOp::Div,
            Some(Token::PercentEq) => AssignOp::Mod,
            _ => return Ok(lhs),
        };
        self.advance();
        // Right-associative
        let value = self.parse_expr()?;
        let span = lhs.span.to(value.span);
        Ok(Spanned::new(
            Expr::new(ExprKind::Assign { op, target: Box::new(lhs), value: Box::new(value) }),
            span,
        ))
    }

    fn parse_conditional(&mut self) -> Result<Spanned<Expr>, MigrateError> {
        let cond = self.parse_binary(0)?;
        if !self.eat(&Token::Question) {
            return Ok(cond);
        }
        let then_expr = self.parse_expr()?;
        self.expect(&Token::Colon)?;
        let else_expr = self.parse_conditional()?;
        let span = cond.span.to(else_expr.span);
        Ok(Spanned::new(
            Expr::new(ExprKind::Conditional {
                cond: Box::new(cond),
                then_expr: Box::new(then_expr),
                else_expr: Box::new(else_expr),
            }),
            span,
        ))
    }

    fn parse_binary(&mut self, min_bp: u8) -> Result<Spanned<Expr>, MigrateError> {
        let mut lhs = self.parse_unary()?;

        loop {
            let Some(tok) = self.peek() else { break };
            let op = match &tok.node {
                Token::Plus => BinOp::Add,
                Token::Minus => BinOp::Sub,
                Token::Star => BinOp::Mul,
                Token::Slash => BinOp::Div,
                Token::Percent => BinOp::Mod,
                Token::EqEq => BinOp::Eq,
                Token::BangEq => BinOp::Neq,
                Token::Lt => BinOp::Lt,
                Token::Gt => BinOp::Gt,
                Token::LtEq => BinOp::LtEq,
                Token::GtEq => BinOp::GtEq,
                Token::AmpAmp => BinOp::And,
                Token::PipePipe => BinOp::Or,
                _ => break,
            };

            let (lbp, rbp) = infix_binding_power(op);
            if lbp < min_bp {
                break;
            }
            self.advance(); // consume operator

            let rhs = self.parse_binary(rbp)?;
            let span = lhs.span.to(rhs.span);
            lhs = Spanned::new(
                Expr::new(ExprKind::Binary { op, lhs: Box::new(lhs), rhs: Box::new(rhs) }),
                span,
            );
        }

        Ok(lhs)
    }

    fn parse_unary(&mut self) -> Result<Spanned<Expr>, MigrateError> {
        let start = self.start_offset();
        let op = match self.peek().map(|t| &t.node) {
            Some(Token::Minus) => Some(UnaryOp::Neg),
            Some(Token::Plus) => Some(UnaryOp::Plus),
            Some(Token::Bang) => Some(UnaryOp::Not),
            Some(Token::PlusPlus) => Some(UnaryOp::PreInc),
            Some(Token::MinusMinus) => Some(UnaryOp::PreDec),
            _ => None,
        };
        if let Some(op) = op {
            self.advance();
            let operand = self.parse_unary()?;
            return Ok(Spanned::new(
                Expr::new(ExprKind::Unary { op, operand: Box::new(operand) }),
                self.span_from(start),
            ));
        }

        if self.at(&Token::LParen) && self.is_cast_ahead() {
            self.advance();
            let ty = self.parse_type()?;
            self.expect(&Token::RParen)?;
            let expr = self.parse_unary()?;
            return Ok(Spanned::new(
                Expr::new(ExprKind::Cast { ty, expr: Box::new(expr) }),
                self.span_from(start),
            ));
        }

        self.parse_postfix()
    }

    /// `(int) x`, `(long) (a + b)`, `(Duration) obj` all start a cast; `(a) + b` does not.
    fn is_cast_ahead(&mut self) -> bool {
        let saved = self.pos;
        self.pos += 1; // '('
        let primitive = self.peek().is_some_and(|t| t.node.primitive().is_some());
        let is_cast = self.parse_type().is_ok()
            && self.eat(&Token::RParen)
            && match self.peek().map(|t| &t.node) {
                _ if primitive => true,
                Some(
                    Token::Ident
                    | Token::IntLit
                    | Token::FloatLit
                    | Token::StringLit
                    | Token::CharLit
                    | Token::This
                    | Token::New
                    | Token::Null
                    | Token::True
                    | Token::False
                    | Token::LParen
                    | Token::Bang
                    | Token::Placeholder(_),
                ) => true,
                _ => false,
            };
        self.pos = saved;
        is_cast
    }

    fn parse_postfix(&mut self) -> Result<Spanned<Expr>, MigrateError> {
        let mut lhs = self.parse_primary()?;

        loop {
            if self.at(&Token::Dot) {
                self.advance(); // consume '.'
                let name = self.expect_ident()?;
                if self.at(&Token::LParen) {
                    let args = self.parse_args()?;
                    let span = self.span_from(lhs.span.start);
                    lhs = Spanned::new(
                        Expr::new(ExprKind::MethodCall {
                            select: Some(Box::new(lhs)),
                            name,
                            args,
                            method: None,
                        }),
                        span,
                    );
                } else {
                    let span = lhs.span.to(name.span);
                    lhs = Spanned::new(
                        Expr::new(ExprKind::FieldAccess { target: Box::new(lhs), name, binding: None }),
                        span,
                    );
                }
            } else if self.at(&Token::LBracket) {
                self.advance();
                let index = self.parse_expr()?;
                self.expect(&Token::RBracket)?;
                let span = self.span_from(lhs.span.start);
                lhs = Spanned::new(
                    Expr::new(ExprKind::ArrayAccess { array: Box::new(lhs), index: Box::new(index) }),
                    span,
                );
            } else if self.at(&Token::PlusPlus) || self.at(&Token::MinusMinus) {
                let op = if self.at(&Token::PlusPlus) { UnaryOp::PostInc } else { UnaryOp::PostDec };
                self.advance();
                let span = self.span_from(lhs.span.start);
                lhs = Spanned::new(Expr::new(ExprKind::Unary { op, operand: Box::new(lhs) }), span);
            } else {
                break;
            }
        }

        Ok(lhs)
    }

    fn parse_args(&mut self) -> Result<Vec<Spanned<Expr>>, MigrateError> {
        self.expect(&Token::LParen)?;
        let mut args = Vec::new();
        while !self.at(&Token::RParen) {
            if !args.is_empty() {
                self.expect(&Token::Comma)?;
            }
            args.push(self.parse_expr()?);
        }
        self.expect(&Token::RParen)?;
        Ok(args)
    }

    fn parse_primary(&mut self) -> Result<Spanned<Expr>, MigrateError> {
        let tok = self.peek().ok_or_else(|| {
            MigrateError::syntax("unexpected end of file in expression", self.eof_span())
        })?;
        let span = tok.span;

        let literal = |kind: LitKind, text: &str| {
            Spanned::new(Expr::new(ExprKind::Literal { kind, text: text.to_string() }), span)
        };

        match &tok.node {
            Token::IntLit => {
                self.advance();
                Ok(literal(LitKind::Int, self.text(tok)))
            }
            Token::FloatLit => {
                self.advance();
                Ok(literal(LitKind::Float, self.text(tok)))
            }
            Token::StringLit => {
                self.advance();
                Ok(literal(LitKind::String, self.text(tok)))
            }
            Token::CharLit => {
                self.advance();
                Ok(literal(LitKind::Char, self.text(tok)))
            }
            Token::True | Token::False => {
                self.advance();
                Ok(literal(LitKind::Bool, self.text(tok)))
            }
            Token::Null => {
                self.advance();
                Ok(literal(LitKind::Null, "null"))
            }
            Token::This => {
                self.advance();
                Ok(Spanned::new(Expr::new(ExprKind::This), span))
            }
            Token::Placeholder(ty) => {
                self.advance();
                let index = self.placeholders;
                self.placeholders += 1;
                Ok(Spanned::new(
                    Expr::new(ExprKind::Placeholder { index, ty: JavaType::parse(ty) }),
                    span,
                ))
            }
            Token::Ident => {
                let name = self.expect_ident()?;
                if self.at(&Token::LParen) {
                    let args = self.parse_args()?;
                    return Ok(Spanned::new(
                        Expr::new(ExprKind::MethodCall { select: None, name, args, method: None }),
                        self.span_from(span.start),
                    ));
                }
                Ok(Spanned::new(Expr::new(ExprKind::Ident { name: name.node, binding: None }), span))
            }
            Token::LParen => {
                self.advance();
                let inner = self.parse_expr()?;
                self.expect(&Token::RParen)?;
                Ok(Spanned::new(Expr::new(ExprKind::Paren(Box::new(inner))), self.span_from(span.start)))
            }
            Token::New => self.parse_new(),
            other => Err(MigrateError::syntax(format!("unexpected {other} in expression"), span)),
        }
    }

    fn parse_new(&mut self) -> Result<Spanned<Expr>, MigrateError> {
        let start = self.start_offset();
        self.expect(&Token::New)?;

        // Element or class type without array suffixes.
        let type_start = self.start_offset();
        let class = if let Some(p) = self.peek().and_then(|t| t.node.primitive()) {
            self.advance();
            let prim = Prim::from_name(p)
                .ok_or_else(|| MigrateError::syntax(format!("unknown primitive type {p}"), self.span_from(type_start)))?;
            Spanned::new(TypeExpr::Primitive(prim), self.span_from(type_start))
        } else {
            let name = self.parse_dotted_name()?;
            let mut args = Vec::new();
            if self.eat(&Token::Lt) {
                while !self.at(&Token::Gt) {
                    if !args.is_empty() {
                        self.expect(&Token::Comma)?;
                    }
                    args.push(self.parse_type()?);
                }
                self.expect(&Token::Gt)?;
            }
            Spanned::new(TypeExpr::Named { name, args, ty: JavaType::Unknown }, self.span_from(type_start))
        };

        if self.at(&Token::LBracket) {
            let mut dims = Vec::new();
            let mut extra_dims = 0;
            while self.eat(&Token::LBracket) {
                if self.eat(&Token::RBracket) {
                    extra_dims += 1;
                } else {
                    if extra_dims > 0 {
                        return Err(MigrateError::syntax("array dimension after []", self.span_from(start)));
                    }
                    dims.push(self.parse_expr()?);
                    self.expect(&Token::RBracket)?;
                }
            }
            let init = if self.at(&Token::LBrace) {
                match self.parse_array_init()?.node.kind {
                    ExprKind::ArrayInit(elems) => Some(elems),
                    _ => None,
                }
            } else {
                None
            };
            return Ok(Spanned::new(
                Expr::new(ExprKind::NewArray { elem: class, dims, extra_dims, init }),
                self.span_from(start),
            ));
        }

        let args = self.parse_args()?;
        Ok(Spanned::new(
            Expr::new(ExprKind::New { class, args, method: None }),
            self.span_from(start),
        ))
    }
}

fn infix_binding_power(op: BinOp) -> (u8, u8) {
    match op {
        BinOp::Or => (1, 2),
        BinOp::And => (3, 4),
        BinOp::Eq | BinOp::Neq => (5, 6),
        BinOp::Lt | BinOp::Gt | BinOp::LtEq | BinOp::GtEq => (7, 8),
        BinOp::Add | BinOp::Sub => (9, 10),
        BinOp::Mul | BinOp::Div | BinOp::Mod => (11, 12),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expr(src: &str) -> Expr {
        parse_expression(src).unwrap().node
    }

    #[test]
    fn parse_package_imports_and_class() {
        let unit = parse(
            "package com.acme;\nimport org.joda.time.DateTime;\nimport static java.lang.Math.*;\nclass A { }",
        )
        .unwrap();
        assert_eq!(unit.package.as_ref().unwrap().node, "com.acme");
        assert_eq!(unit.imports.len(), 2);
        assert_eq!(unit.imports[0].node.path, "org.joda.time.DateTime");
        assert_eq!(unit.imports[0].node.binding_name(), Some("DateTime"));
        assert!(unit.imports[1].node.is_static);
        assert!(unit.imports[1].node.is_star);
        assert_eq!(unit.classes[0].node.name.node, "A");
    }

    #[test]
    fn parse_members() {
        let unit = parse(
            "public class A {\n    private DateTime created, updated;\n    A(long x) { }\n    public abstract Duration span(ReadableDuration d, int... rest);\n}",
        )
        .unwrap();
        let members = &unit.classes[0].node.members;
        assert_eq!(members.len(), 3);
        match &members[0] {
            Member::Field(f) => {
                assert_eq!(f.node.vars.len(), 2);
                assert_eq!(f.node.modifiers, vec!["private".to_string()]);
            }
            _ => panic!("expected field"),
        }
        match &members[1] {
            Member::Method(m) => assert!(m.node.return_type.is_none()),
            _ => panic!("expected constructor"),
        }
        match &members[2] {
            Member::Method(m) => {
                assert!(m.node.body.is_none());
                assert!(m.node.params[1].varargs);
            }
            _ => panic!("expected method"),
        }
    }

    #[test]
    fn parse_local_declaration_vs_expression() {
        let unit = parse("class A { void f() { DateTime[] xs = {a, b}; x.y = 3; foo(1); List<String> l = null; } }").unwrap();
        let Member::Method(m) = &unit.classes[0].node.members[0] else { panic!() };
        let stmts = &m.node.body.as_ref().unwrap().node.stmts;
        assert!(matches!(stmts[0].node, Stmt::LocalVar(_)));
        assert!(matches!(stmts[1].node, Stmt::Expr(_)));
        assert!(matches!(stmts[2].node, Stmt::Expr(_)));
        match &stmts[3].node {
            Stmt::LocalVar(decl) => match &decl.ty.node {
                TypeExpr::Named { name, args, .. } => {
                    assert_eq!(name, "List");
                    assert_eq!(args.len(), 1);
                }
                other => panic!("unexpected {other:?}"),
            },
            _ => panic!("expected declaration"),
        }
    }

    #[test]
    fn parse_method_chain() {
        match expr("Days.daysBetween(start, end).getDays()").kind {
            ExprKind::MethodCall { select: Some(select), name, args, .. } => {
                assert_eq!(name.node, "getDays");
                assert!(args.is_empty());
                match &select.node.kind {
                    ExprKind::MethodCall { name, args, .. } => {
                        assert_eq!(name.node, "daysBetween");
                        assert_eq!(args.len(), 2);
                    }
                    other => panic!("unexpected {other:?}"),
                }
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn parse_operator_precedence() {
        match expr("a + b * c").kind {
            ExprKind::Binary { op: BinOp::Add, rhs, .. } => {
                assert!(matches!(rhs.node.kind, ExprKind::Binary { op: BinOp::Mul, .. }));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn parse_casts() {
        assert!(matches!(expr("(int) ChronoUnit.DAYS.between(a, b)").kind, ExprKind::Cast { .. }));
        assert!(matches!(expr("(Duration) o").kind, ExprKind::Cast { .. }));
        assert!(matches!(expr("(a) + b").kind, ExprKind::Binary { .. }));
        assert!(matches!(expr("(a + b)").kind, ExprKind::Paren(_)));
    }

    #[test]
    fn parse_placeholders_numbered_by_occurrence() {
        match expr("#{any(long)} * #{any(int)}").kind {
            ExprKind::Binary { lhs, rhs, .. } => {
                assert!(matches!(lhs.node.kind, ExprKind::Placeholder { index: 0, .. }));
                assert!(matches!(rhs.node.kind, ExprKind::Placeholder { index: 1, .. }));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn parse_new_forms() {
        assert!(matches!(expr("new Duration(1000L)").kind, ExprKind::New { .. }));
        assert!(matches!(expr("new DateTime[3]").kind, ExprKind::NewArray { .. }));
        match expr("new long[] {1L, 2L}").kind {
            ExprKind::NewArray { extra_dims, init, .. } => {
                assert_eq!(extra_dims, 1);
                assert_eq!(init.unwrap().len(), 2);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn parse_assignment_is_right_associative() {
        match expr("a = b = c").kind {
            ExprKind::Assign { value, .. } => assert!(matches!(value.node.kind, ExprKind::Assign { .. })),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn parse_error_reports_span() {
        let err = parse("class A { void f() { int x = ; } }").unwrap_err();
        match err {
            MigrateError::Syntax { msg, span } => {
                assert!(msg.contains("unexpected ;"), "{msg}");
                assert_eq!(span.start, 29);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn parse_trailing_tokens_rejected() {
        assert!(parse_expression("a b").is_err());
    }
}
