use std::fmt;

/// Kinds of tokens produced by the tokenizer.
///
/// Ordered by priority - operand kinds first. Kinds representing fixed
/// source text (operators, delimiters) know their own characters via
/// [`TokenKind::chars`]; the remaining kinds carry a payload on the token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// 32-bit integer literal
    ///
    /// # Examples
    /// ```text
    /// 42
    /// 0
    /// ```
    LiteralInt,

    /// 64-bit integer literal (`L` suffix)
    ///
    /// # Examples
    /// ```text
    /// 42L
    /// 3l
    /// ```
    LiteralLong,

    /// Hexadecimal 32-bit integer literal (payload excludes the `0x` prefix)
    LiteralHexInt,

    /// Hexadecimal 64-bit integer literal (`0x...L`)
    LiteralHexLong,

    /// String literal in single or double quotes
    ///
    /// The payload keeps the surrounding quotes; embedded quotes are
    /// escaped by doubling, SQL style.
    ///
    /// # Examples
    /// ```text
    /// 'hello'
    /// "item ""one"""
    /// ```
    LiteralString,

    /// Floating-point literal (double precision; `d`/`D` suffix consumed)
    ///
    /// # Examples
    /// ```text
    /// 3.14
    /// 6.02e23
    /// 1d
    /// ```
    LiteralReal,

    /// Floating-point literal with `f`/`F` suffix (single precision)
    LiteralRealFloat,

    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `,`
    Comma,

    /// Identifier: letters, digits, `_` and `$`, starting with a letter,
    /// `_` or `$`
    ///
    /// # Examples
    /// ```text
    /// name
    /// place_of_birth
    /// $total
    /// ```
    Identifier,

    /// `:`
    Colon,
    /// `#` prefix for variables and function references
    Hash,
    /// `]`
    RSquare,
    /// `[`
    LSquare,
    /// `{`
    LCurly,
    /// `}`
    RCurly,
    /// `.`
    Dot,
    /// `+`
    Plus,
    /// `*`
    Star,
    /// `-`
    Minus,
    /// `^[` select-first
    SelectFirst,
    /// `$[` select-last
    SelectLast,
    /// `?` ternary marker
    QMark,
    /// `![` projection
    Project,
    /// `/` (textual form `div` reclassifies to this kind)
    Div,
    /// `>=`
    Ge,
    /// `>`
    Gt,
    /// `<=`
    Le,
    /// `<`
    Lt,
    /// `==`
    Eq,
    /// `!=`
    Ne,
    /// `%` (textual form `mod` reclassifies to this kind)
    Mod,
    /// `!`
    Not,
    /// `=`
    Assign,
    /// `instanceof` (recognized contextually by the parser)
    Instanceof,
    /// `matches` (recognized contextually by the parser)
    Matches,
    /// `between`
    Between,
    /// `?[` selection
    Select,
    /// `^` exponentiation
    Power,
    /// `?:` elvis
    Elvis,
    /// `?.` null-safe navigation
    SafeNavi,
    /// `@` bean reference
    BeanRef,
    /// `&` factory-bean reference
    FactoryBeanRef,
    /// `||`
    SymbolicOr,
    /// `&&`
    SymbolicAnd,
    /// `++`
    Inc,
    /// `--`
    Dec,
}

impl TokenKind {
    /// The fixed source text for this kind, if it has one.
    pub fn chars(&self) -> Option<&'static str> {
        use TokenKind::*;
        match self {
            LParen => Some("("),
            RParen => Some(")"),
            Comma => Some(","),
            Colon => Some(":"),
            Hash => Some("#"),
            RSquare => Some("]"),
            LSquare => Some("["),
            LCurly => Some("{"),
            RCurly => Some("}"),
            Dot => Some("."),
            Plus => Some("+"),
            Star => Some("*"),
            Minus => Some("-"),
            SelectFirst => Some("^["),
            SelectLast => Some("$["),
            QMark => Some("?"),
            Project => Some("!["),
            Div => Some("/"),
            Ge => Some(">="),
            Gt => Some(">"),
            Le => Some("<="),
            Lt => Some("<"),
            Eq => Some("=="),
            Ne => Some("!="),
            Mod => Some("%"),
            Not => Some("!"),
            Assign => Some("="),
            Instanceof => Some("instanceof"),
            Matches => Some("matches"),
            Between => Some("between"),
            Select => Some("?["),
            Power => Some("^"),
            Elvis => Some("?:"),
            SafeNavi => Some("?."),
            BeanRef => Some("@"),
            FactoryBeanRef => Some("&"),
            SymbolicOr => Some("||"),
            SymbolicAnd => Some("&&"),
            Inc => Some("++"),
            Dec => Some("--"),
            LiteralInt | LiteralLong | LiteralHexInt | LiteralHexLong | LiteralString
            | LiteralReal | LiteralRealFloat | Identifier => None,
        }
    }

    /// True when tokens of this kind carry data beyond the kind itself.
    pub fn has_payload(&self) -> bool {
        self.chars().is_none()
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.chars() {
            Some(chars) => write!(f, "{:?}({})", self, chars),
            None => write!(f, "{:?}", self),
        }
    }
}

/// A single token with its half-open source offsets.
///
/// `data` is `Some` exactly when the kind has a payload (literals and
/// identifiers); fixed-text tokens carry only their kind and offsets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub data: Option<String>,
    pub start: usize,
    pub end: usize,
}

impl Token {
    pub fn new(kind: TokenKind, start: usize, end: usize) -> Self {
        Token {
            kind,
            data: None,
            start,
            end,
        }
    }

    pub fn with_data(kind: TokenKind, data: impl Into<String>, start: usize, end: usize) -> Self {
        Token {
            kind,
            data: Some(data.into()),
            start,
            end,
        }
    }

    /// The payload, or the kind's fixed text for payload-free tokens.
    pub fn text(&self) -> &str {
        match &self.data {
            Some(data) => data,
            None => self.kind.chars().unwrap_or(""),
        }
    }

    pub fn is_kind(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }

    /// Case-insensitive check against an identifier payload.
    pub fn is_identifier_ignore_case(&self, name: &str) -> bool {
        self.kind == TokenKind::Identifier && self.text().eq_ignore_ascii_case(name)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.data {
            Some(data) => write!(f, "[{:?}:{}]({},{})", self.kind, data, self.start, self.end),
            None => write!(f, "[{}]({},{})", self.kind, self.start, self.end),
        }
    }
}
