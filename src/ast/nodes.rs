use std::fmt;

use super::operators::{BinOp, UnaryOp};

/// Half-open range of source character offsets covered by a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Span { start, end }
    }
}

/// Literal payload carried by [`Node::Literal`].
///
/// One literal node kind with a value tag; the tag records what the source
/// spelled (`42` vs `42L` vs `4.2`) without one node type per spelling.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    /// 32-bit integer (`42`, `0x2A`)
    Int(i32),
    /// 64-bit integer (`42L`, `0x2AL`)
    Long(i64),
    /// Floating-point (`3.14`, `1e2`, `2.5f`, `1d`)
    Real(f64),
    /// String with quotes stripped and doubled quotes collapsed
    String(String),
    /// `true` / `false`
    Boolean(bool),
    /// `null`
    Null,
}

/// Which element(s) a selection keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionKind {
    /// `?[...]` - every matching element
    All,
    /// `^[...]` - first matching element
    First,
    /// `$[...]` - last matching element
    Last,
}

impl SelectionKind {
    fn opening(&self) -> &'static str {
        match self {
            SelectionKind::All => "?[",
            SelectionKind::First => "^[",
            SelectionKind::Last => "$[",
        }
    }
}

/// A node in a parsed expression tree.
///
/// The tree is a closed set of variants matched exhaustively by the
/// evaluator and renderer. Nodes are immutable once built; every variant
/// carries the [`Span`] of source text it was parsed from.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Literal value (`42`, `'hi'`, `true`, `null`, ...)
    Literal { value: LiteralValue, span: Span },

    /// Property or field reference
    ///
    /// `direct` marks a reference at the head of an expression (`name`),
    /// which renders without a navigation prefix; chained references
    /// render with `.` or `?.`.
    PropertyOrField {
        name: String,
        null_safe: bool,
        direct: bool,
        span: Span,
    },

    /// Variable reference (`#name`)
    Variable { name: String, span: Span },

    /// Bean reference (`@name` or `&name`)
    BeanRef { name: String, span: Span },

    /// Type reference (`T(a.b.C)`); the child is a [`Node::QualifiedId`]
    TypeRef { qualifier: Box<Node>, span: Span },

    /// Function reference with arguments (`#fn(a, b)`)
    FunctionRef {
        name: String,
        args: Vec<Node>,
        span: Span,
    },

    /// Dotted name (`a.b.C`), decomposed into child identifiers
    QualifiedId { parts: Vec<Node>, span: Span },

    /// Plain identifier, used inside qualified names
    Identifier { name: String, span: Span },

    /// Navigation chain: a start node followed by one or more trailers
    Compound { children: Vec<Node>, span: Span },

    /// Index access (`[i]`), optionally null-safe (`?.[i]`)
    Indexer {
        index: Box<Node>,
        null_safe: bool,
        span: Span,
    },

    /// Assignment (`target = value`)
    Assign {
        target: Box<Node>,
        value: Box<Node>,
        span: Span,
    },

    /// Method call (`name(args)`), optionally null-safe (`?.name(args)`)
    MethodRef {
        name: String,
        null_safe: bool,
        args: Vec<Node>,
        span: Span,
    },

    /// Constructor invocation (`new T(args)`) or array construction
    /// (`new T[]{...}`, `new T[n]`)
    ///
    /// For the array-initializer form the single argument is an
    /// [`Node::InlineList`]. Sized-array dimensions are parsed but not
    /// retained; `display` keeps their source rendering.
    ConstructorRef {
        type_name: String,
        args: Vec<Node>,
        display: Option<String>,
        span: Span,
    },

    /// Inline list (`{1, 2, 3}` or `{}`)
    InlineList { elements: Vec<Node>, span: Span },

    /// Inline map (`{a: 1, b: 2}` or `{:}`)
    InlineMap {
        entries: Vec<(Node, Node)>,
        span: Span,
    },

    /// Selection over a sequence (`?[c]`, `^[c]`, `$[c]`)
    Selection {
        kind: SelectionKind,
        null_safe: bool,
        criteria: Box<Node>,
        span: Span,
    },

    /// Projection over a sequence (`![e]`)
    Projection { expr: Box<Node>, span: Span },

    /// Ternary conditional (`c ? t : f`)
    Ternary {
        condition: Box<Node>,
        when_true: Box<Node>,
        when_false: Box<Node>,
        span: Span,
    },

    /// Elvis (`value ?: default`)
    Elvis {
        value: Box<Node>,
        default: Box<Node>,
        span: Span,
    },

    /// Binary operator application
    Binary {
        op: BinOp,
        left: Box<Node>,
        right: Box<Node>,
        span: Span,
    },

    /// Unary operator application (`!x`, `-x`)
    Unary {
        op: UnaryOp,
        operand: Box<Node>,
        span: Span,
    },

    /// Template with mixed literal and expression parts
    Template { parts: Vec<Node>, span: Span },
}

impl Node {
    pub fn span(&self) -> Span {
        use Node::*;
        match self {
            Literal { span, .. }
            | PropertyOrField { span, .. }
            | Variable { span, .. }
            | BeanRef { span, .. }
            | TypeRef { span, .. }
            | FunctionRef { span, .. }
            | QualifiedId { span, .. }
            | Identifier { span, .. }
            | Compound { span, .. }
            | Indexer { span, .. }
            | Assign { span, .. }
            | MethodRef { span, .. }
            | ConstructorRef { span, .. }
            | InlineList { span, .. }
            | InlineMap { span, .. }
            | Selection { span, .. }
            | Projection { span, .. }
            | Ternary { span, .. }
            | Elvis { span, .. }
            | Binary { span, .. }
            | Unary { span, .. }
            | Template { span, .. } => *span,
        }
    }

    /// Short variant name, used by AST dumps.
    pub fn kind_name(&self) -> &'static str {
        use Node::*;
        match self {
            Literal { .. } => "Literal",
            PropertyOrField { .. } => "PropertyOrField",
            Variable { .. } => "Variable",
            BeanRef { .. } => "BeanRef",
            TypeRef { .. } => "TypeRef",
            FunctionRef { .. } => "FunctionRef",
            QualifiedId { .. } => "QualifiedId",
            Identifier { .. } => "Identifier",
            Compound { .. } => "Compound",
            Indexer { .. } => "Indexer",
            Assign { .. } => "Assign",
            MethodRef { .. } => "MethodRef",
            ConstructorRef { .. } => "ConstructorRef",
            InlineList { .. } => "InlineList",
            InlineMap { .. } => "InlineMap",
            Selection { .. } => "Selection",
            Projection { .. } => "Projection",
            Ternary { .. } => "Ternary",
            Elvis { .. } => "Elvis",
            Binary { .. } => "Binary",
            Unary { .. } => "Unary",
            Template { .. } => "Template",
        }
    }

    /// Child nodes in source order.
    pub fn children(&self) -> Vec<&Node> {
        use Node::*;
        match self {
            Literal { .. }
            | PropertyOrField { .. }
            | Variable { .. }
            | BeanRef { .. }
            | Identifier { .. } => Vec::new(),
            TypeRef { qualifier, .. } => vec![qualifier.as_ref()],
            FunctionRef { args, .. } => args.iter().collect(),
            QualifiedId { parts, .. } => parts.iter().collect(),
            Compound { children, .. } => children.iter().collect(),
            Indexer { index, .. } => vec![index.as_ref()],
            Assign { target, value, .. } => vec![target.as_ref(), value.as_ref()],
            MethodRef { args, .. } => args.iter().collect(),
            ConstructorRef { args, .. } => args.iter().collect(),
            InlineList { elements, .. } => elements.iter().collect(),
            InlineMap { entries, .. } => entries
                .iter()
                .flat_map(|(k, v)| [k, v])
                .collect(),
            Selection { criteria, .. } => vec![criteria.as_ref()],
            Projection { expr, .. } => vec![expr.as_ref()],
            Ternary {
                condition,
                when_true,
                when_false,
                ..
            } => vec![condition.as_ref(), when_true.as_ref(), when_false.as_ref()],
            Elvis { value, default, .. } => vec![value.as_ref(), default.as_ref()],
            Binary { left, right, .. } => vec![left.as_ref(), right.as_ref()],
            Unary { operand, .. } => vec![operand.as_ref()],
            Template { parts, .. } => parts.iter().collect(),
        }
    }

    /// Canonical source text for this subtree.
    ///
    /// Pure function of the tree: no evaluation, always succeeds. For
    /// non-template trees the output reparses to a structurally identical
    /// tree (binary operators come back fully parenthesized).
    pub fn render(&self) -> String {
        use Node::*;
        match self {
            Literal { value, .. } => render_literal(value),

            PropertyOrField {
                name,
                null_safe,
                direct,
                ..
            } => {
                if *direct {
                    name.clone()
                } else if *null_safe {
                    format!("?.{}", name)
                } else {
                    format!(".{}", name)
                }
            }

            Variable { name, .. } => format!("#{}", name),
            BeanRef { name, .. } => format!("@{}", name),
            TypeRef { qualifier, .. } => format!("T({})", qualifier.render()),

            FunctionRef { name, args, .. } => {
                format!("#{}({})", name, render_list(args, ", "))
            }

            QualifiedId { parts, .. } => render_list(parts, "."),
            Identifier { name, .. } => name.clone(),

            Compound { children, .. } => {
                let mut out = String::new();
                for (i, child) in children.iter().enumerate() {
                    let text = child.render();
                    // Trailers that don't carry their own connector get a dot.
                    if i > 0
                        && !text.starts_with('[')
                        && !text.starts_with('.')
                        && !text.starts_with("?.")
                    {
                        out.push('.');
                    }
                    out.push_str(&text);
                }
                out
            }

            Indexer {
                index, null_safe, ..
            } => {
                if *null_safe {
                    format!("?.[{}]", index.render())
                } else {
                    format!("[{}]", index.render())
                }
            }

            Assign { target, value, .. } => {
                format!("{} = {}", target.render(), value.render())
            }

            MethodRef {
                name,
                null_safe,
                args,
                ..
            } => {
                if *null_safe {
                    format!("?.{}({})", name, render_list(args, ", "))
                } else {
                    format!("{}({})", name, render_list(args, ", "))
                }
            }

            ConstructorRef {
                type_name,
                args,
                display,
                ..
            } => {
                if let Some(display) = display {
                    return display.clone();
                }
                if let [list @ InlineList { .. }] = args.as_slice()
                    && type_name.ends_with("[]")
                {
                    let base = &type_name[..type_name.len() - 2];
                    return format!("new {}[] {}", base, list.render());
                }
                format!("new {}({})", type_name, render_list(args, ", "))
            }

            InlineList { elements, .. } => format!("{{{}}}", render_list(elements, ",")),

            InlineMap { entries, .. } => {
                if entries.is_empty() {
                    return "{:}".to_string();
                }
                let rendered: Vec<String> = entries
                    .iter()
                    .map(|(k, v)| format!("{}:{}", k.render(), v.render()))
                    .collect();
                format!("{{{}}}", rendered.join(","))
            }

            Selection {
                kind,
                null_safe,
                criteria,
                ..
            } => {
                let prefix = if *null_safe { "?." } else { "" };
                format!("{}{}{}]", prefix, kind.opening(), criteria.render())
            }

            Projection { expr, .. } => format!("![{}]", expr.render()),

            Ternary {
                condition,
                when_true,
                when_false,
                ..
            } => format!(
                "({} ? {} : {})",
                condition.render(),
                when_true.render(),
                when_false.render()
            ),

            Elvis { value, default, .. } => {
                format!("({} ?: {})", value.render(), default.render())
            }

            Binary {
                op, left, right, ..
            } => format!("({} {} {})", left.render(), op.symbol(), right.render()),

            Unary { op, operand, .. } => format!("{}{}", op.symbol(), operand.render()),

            Template { parts, .. } => render_list(parts, " + "),
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render())
    }
}

fn render_list(nodes: &[Node], separator: &str) -> String {
    let rendered: Vec<String> = nodes.iter().map(Node::render).collect();
    rendered.join(separator)
}

fn render_literal(value: &LiteralValue) -> String {
    match value {
        LiteralValue::Int(n) => n.to_string(),
        LiteralValue::Long(n) => n.to_string(),
        LiteralValue::Real(n) => {
            // Keep a decimal point so the text reparses as a real.
            if n.is_finite() && n.fract() == 0.0 {
                format!("{:.1}", n)
            } else {
                n.to_string()
            }
        }
        LiteralValue::String(s) => format!("'{}'", s.replace('\'', "''")),
        LiteralValue::Boolean(b) => b.to_string(),
        LiteralValue::Null => "null".to_string(),
    }
}
