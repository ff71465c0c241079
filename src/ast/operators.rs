/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    // Arithmetic
    /// Addition or string concatenation (`+`)
    Add,
    /// Subtraction (`-`)
    Subtract,
    /// Multiplication (`*`)
    Multiply,
    /// Division (`/` or `div`)
    Divide,
    /// Modulo (`%` or `mod`)
    Modulo,
    /// Exponentiation (`^`)
    Power,

    // Comparison
    /// Equal (`==` or `eq`)
    Equal,
    /// Not equal (`!=` or `ne`)
    NotEqual,
    /// Greater than (`>` or `gt`)
    GreaterThan,
    /// Greater than or equal (`>=` or `ge`)
    GreaterEqual,
    /// Less than (`<` or `lt`)
    LessThan,
    /// Less than or equal (`<=` or `le`)
    LessEqual,

    // Logical
    /// Logical AND (`&&` or `and`), short-circuiting
    And,
    /// Logical OR (`||` or `or`), short-circuiting
    Or,

    // Textual
    /// Regular expression match (`matches`)
    Matches,
    /// Inclusive range membership (`between`)
    Between,
}

impl BinOp {
    /// Canonical source text, used when rendering expression trees.
    pub fn symbol(&self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Subtract => "-",
            BinOp::Multiply => "*",
            BinOp::Divide => "/",
            BinOp::Modulo => "%",
            BinOp::Power => "^",
            BinOp::Equal => "==",
            BinOp::NotEqual => "!=",
            BinOp::GreaterThan => ">",
            BinOp::GreaterEqual => ">=",
            BinOp::LessThan => "<",
            BinOp::LessEqual => "<=",
            BinOp::And => "and",
            BinOp::Or => "or",
            BinOp::Matches => "matches",
            BinOp::Between => "between",
        }
    }
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// Logical negation (`!` or `not`)
    Not,
    /// Arithmetic negation (`-`)
    Minus,
}

impl UnaryOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            UnaryOp::Not => "!",
            UnaryOp::Minus => "-",
        }
    }
}
