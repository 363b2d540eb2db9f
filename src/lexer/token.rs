use logos::Logos;

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(skip r"//[^\n]*")]
#[logos(skip r"/\*([^*]|\*+[^*/])*\*+/")]
pub enum Token {
    // Declarations
    #[token("package")]
    Package,
    #[token("import")]
    Import,
    #[token("class")]
    Class,
    #[token("interface")]
    Interface,
    #[token("extends")]
    Extends,
    #[token("implements")]
    Implements,

    // Modifiers
    #[token("public")]
    Public,
    #[token("private")]
    Private,
    #[token("protected")]
    Protected,
    #[token("static")]
    Static,
    #[token("final")]
    Final,
    #[token("abstract")]
    Abstract,

    // Statements and expressions
    #[token("return")]
    Return,
    #[token("if")]
    If,
    #[token("else")]
    Else,
    #[token("while")]
    While,
    #[token("new")]
    New,
    #[token("null")]
    Null,
    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("this")]
    This,
    #[token("void")]
    Void,

    // Primitive type names
    #[token("boolean")]
    Boolean,
    #[token("byte")]
    Byte,
    #[token("short")]
    Short,
    #[token("int")]
    Int,
    #[token("long")]
    Long,
    #[token("char")]
    Char,
    #[token("float")]
    Float,
    #[token("double")]
    Double,

    // Literals keep their source text; `1_000_000` and `1L` must print back verbatim.
    #[regex(r"0[xX][0-9a-fA-F_]+[lL]?|[0-9][0-9_]*[lL]?")]
    IntLit,
    #[regex(r"[0-9][0-9_]*\.[0-9][0-9_]*([eE][+-]?[0-9]+)?[fFdD]?|[0-9][0-9_]*[fFdD]")]
    FloatLit,
    #[regex(r#""([^"\\\n]|\\.)*""#)]
    StringLit,
    #[regex(r"'([^'\\\n]|\\.)'")]
    CharLit,

    /// Template placeholder `#{any(T)}`; carries the declared type text (empty for `#{any()}`).
    #[regex(r"#\{any\([^)]*\)\}", |lex| {
        let s = lex.slice();
        s[6..s.len() - 2].trim().to_string()
    })]
    Placeholder(String),

    // Identifiers
    #[regex(r"[a-zA-Z_$][a-zA-Z0-9_$]*")]
    Ident,

    // Operators
    #[token("++")]
    PlusPlus,
    #[token("+")]
    Plus,
    #[token("--")]
    MinusMinus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("+=")]
    PlusEq,
    #[token("-=")]
    MinusEq,
    #[token("*=")]
    StarEq,
    #[token("/=")]
    SlashEq,
    #[token("%=")]
    PercentEq,
    #[token("=")]
    Eq,
    #[token("==")]
    EqEq,
    #[token("!=")]
    BangEq,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,
    #[token("&&")]
    AmpAmp,
    #[token("||")]
    PipePipe,
    #[token("!")]
    Bang,
    #[token("?")]
    Question,
    #[token(":")]
    Colon,

    // Punctuation
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(";")]
    Semi,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token("@")]
    At,
}

impl Token {
    /// Source spelling of a modifier keyword, if this token is one.
    pub fn modifier(&self) -> Option<&'static str> {
        match self {
            Token::Public => Some("public"),
            Token::Private => Some("private"),
            Token::Protected => Some("protected"),
            Token::Static => Some("static"),
            Token::Final => Some("final"),
            Token::Abstract => Some("abstract"),
            _ => None,
        }
    }

    /// Source spelling of a primitive type keyword, if this token is one.
    pub fn primitive(&self) -> Option<&'static str> {
        match self {
            Token::Boolean => Some("boolean"),
            Token::Byte => Some("byte"),
            Token::Short => Some("short"),
            Token::Int => Some("int"),
            Token::Long => Some("long"),
            Token::Char => Some("char"),
            Token::Float => Some("float"),
            Token::Double => Some("double"),
            _ => None,
        }
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(m) = self.modifier() {
            return write!(f, "{m}");
        }
        if let Some(p) = self.primitive() {
            return write!(f, "{p}");
        }
        match self {
            Token::Package => write!(f, "package"),
            Token::Import => write!(f, "import"),
            Token::Class => write!(f, "class"),
            Token::Interface => write!(f, "interface"),
            Token::Extends => write!(f, "extends"),
            Token::Implements => write!(f, "implements"),
            Token::Return => write!(f, "return"),
            Token::If => write!(f, "if"),
            Token::Else => write!(f, "else"),
            Token::While => write!(f, "while"),
            Token::New => write!(f, "new"),
            Token::Null => write!(f, "null"),
            Token::True => write!(f, "true"),
            Token::False => write!(f, "false"),
            Token::This => write!(f, "this"),
            Token::Void => write!(f, "void"),
            Token::IntLit => write!(f, "integer literal"),
            Token::FloatLit => write!(f, "floating-point literal"),
            Token::StringLit => write!(f, "string literal"),
            Token::CharLit => write!(f, "character literal"),
            Token::Placeholder(ty) => write!(f, "#{{any({ty})}}"),
            Token::Ident => write!(f, "identifier"),
            Token::PlusPlus => write!(f, "++"),
            Token::Plus => write!(f, "+"),
            Token::MinusMinus => write!(f, "--"),
            Token::Minus => write!(f, "-"),
            Token::Star => write!(f, "*"),
            Token::Slash => write!(f, "/"),
            Token::Percent => write!(f, "%"),
            Token::PlusEq => write!(f, "+="),
            Token::MinusEq => write!(f, "-="),
            Token::StarEq => write!(f, "*="),
            Token::SlashEq => write!(f, "/="),
            Token::PercentEq => write!(f, "%="),
            Token::Eq => write!(f, "="),
            Token::EqEq => write!(f, "=="),
            Token::BangEq => write!(f, "!="),
            Token::Lt => write!(f, "<"),
            Token::Gt => write!(f, ">"),
            Token::LtEq => write!(f, "<="),
            Token::GtEq => write!(f, ">="),
            Token::AmpAmp => write!(f, "&&"),
            Token::PipePipe => write!(f, "||"),
            Token::Bang => write!(f, "!"),
            Token::Question => write!(f, "?"),
            Token::Colon => write!(f, ":"),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::LBrace => write!(f, "{{"),
            Token::RBrace => write!(f, "}}"),
            Token::LBracket => write!(f, "["),
            Token::RBracket => write!(f, "]"),
            Token::Semi => write!(f, ";"),
            Token::Comma => write!(f, ","),
            Token::Dot => write!(f, "."),
            Token::At => write!(f, "@"),
            // Modifiers and primitives are handled above.
            _ => write!(f, "{self:?}"),
        }
    }
}
