use crate::ast::{BinOp, LiteralValue, Node, SelectionKind, Span, Token, TokenKind, UnaryOp};
use crate::lexer::LexError;

/// Errors raised while parsing a token stream into a tree.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    /// Tokenization failed before parsing started
    Lex(LexError),
    /// Empty or blank source, rejected before tokenization
    EmptyExpression,
    /// Source longer than the configured maximum
    ExpressionTooLong { length: usize, maximum: usize },
    /// A token no grammar rule could start or continue with
    UnexpectedToken { found: String, position: usize },
    /// A specific token was required and something else was found
    ExpectedToken {
        expected: &'static str,
        position: usize,
    },
    /// An operator the grammar recognizes but does not support
    UnsupportedOperator { operator: String, position: usize },
    /// A numeric literal that does not fit its type
    NotANumber { text: String, position: usize },
    /// Leftover tokens after a complete expression
    TrailingTokens { position: usize },
    /// A template expression with no closing suffix
    NonTerminatingTemplate { suffix: String, position: usize },
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::Lex(e) => write!(f, "{}", e),
            ParseError::EmptyExpression => write!(f, "expression must not be empty or blank"),
            ParseError::ExpressionTooLong { length, maximum } => write!(
                f,
                "expression is {} characters long, exceeding the maximum of {}",
                length, maximum
            ),
            ParseError::UnexpectedToken { found, position } => {
                write!(f, "unexpected token {} at position {}", found, position)
            }
            ParseError::ExpectedToken { expected, position } => {
                write!(f, "expected '{}' at position {}", expected, position)
            }
            ParseError::UnsupportedOperator { operator, position } => {
                write!(f, "unsupported operator '{}' at position {}", operator, position)
            }
            ParseError::NotANumber { text, position } => {
                write!(f, "'{}' is not a valid number at position {}", text, position)
            }
            ParseError::TrailingTokens { position } => {
                write!(f, "unexpected tokens after expression at position {}", position)
            }
            ParseError::NonTerminatingTemplate { suffix, position } => write!(
                f,
                "no closing '{}' for template expression starting at position {}",
                suffix, position
            ),
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseError::Lex(e) => Some(e),
            _ => None,
        }
    }
}

impl From<LexError> for ParseError {
    fn from(e: LexError) -> Self {
        ParseError::Lex(e)
    }
}

/// Recursive-descent parser over a token vector.
///
/// Precedence is encoded as one method per level, from ternary/elvis at the
/// top down to primary expressions. Speculative rules save the cursor and
/// restore it on failure; there is no exception-driven backtracking.
pub struct Parser {
    tokens: Vec<Token>,
    cursor: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Parser { tokens, cursor: 0 }
    }

    /// Parse the whole token stream into a single tree.
    ///
    /// Accepts one optional trailing `= value` (building an assignment);
    /// any tokens left after that are an error.
    pub fn parse_tree(mut self) -> Result<Node, ParseError> {
        let mut ast = self.eat_expression()?;

        if self.take_if(TokenKind::Assign).is_some() {
            let value = self.eat_expression()?;
            let span = Span::new(ast.span().start, value.span().end);
            ast = Node::Assign {
                target: Box::new(ast),
                value: Box::new(value),
                span,
            };
        }

        if let Some(token) = self.peek() {
            return Err(ParseError::TrailingTokens {
                position: token.start,
            });
        }

        Ok(ast)
    }

    // ---- precedence levels ----

    fn eat_expression(&mut self) -> Result<Node, ParseError> {
        self.eat_ternary_expression()
    }

    fn eat_ternary_expression(&mut self) -> Result<Node, ParseError> {
        let expr = self.eat_logical_or_expression()?;

        if self.take_if(TokenKind::Elvis).is_some() {
            let default = self.eat_logical_or_expression()?;
            let span = Span::new(expr.span().start, default.span().end);
            return Ok(Node::Elvis {
                value: Box::new(expr),
                default: Box::new(default),
                span,
            });
        }

        if self.take_if(TokenKind::QMark).is_some() {
            let when_true = self.eat_logical_or_expression()?;
            self.expect(TokenKind::Colon, ":")?;
            let when_false = self.eat_logical_or_expression()?;
            let span = Span::new(expr.span().start, when_false.span().end);
            return Ok(Node::Ternary {
                condition: Box::new(expr),
                when_true: Box::new(when_true),
                when_false: Box::new(when_false),
                span,
            });
        }

        Ok(expr)
    }

    fn eat_logical_or_expression(&mut self) -> Result<Node, ParseError> {
        let mut expr = self.eat_logical_and_expression()?;

        while self.peek_kind(TokenKind::SymbolicOr) || self.peek_identifier("or") {
            self.cursor += 1;
            let right = self.eat_logical_and_expression()?;
            expr = binary(BinOp::Or, expr, right);
        }

        Ok(expr)
    }

    fn eat_logical_and_expression(&mut self) -> Result<Node, ParseError> {
        let mut expr = self.eat_relational_expression()?;

        while self.peek_kind(TokenKind::SymbolicAnd) || self.peek_identifier("and") {
            self.cursor += 1;
            let right = self.eat_relational_expression()?;
            expr = binary(BinOp::And, expr, right);
        }

        Ok(expr)
    }

    /// Relational operators do not chain: at most one application.
    fn eat_relational_expression(&mut self) -> Result<Node, ParseError> {
        let expr = self.eat_sum_expression()?;

        let Some((kind, position)) = self.maybe_eat_relational_operator() else {
            return Ok(expr);
        };

        let op = match kind {
            TokenKind::Eq => BinOp::Equal,
            TokenKind::Ne => BinOp::NotEqual,
            TokenKind::Gt => BinOp::GreaterThan,
            TokenKind::Ge => BinOp::GreaterEqual,
            TokenKind::Lt => BinOp::LessThan,
            TokenKind::Le => BinOp::LessEqual,
            TokenKind::Matches => BinOp::Matches,
            TokenKind::Between => BinOp::Between,
            _ => {
                return Err(ParseError::UnsupportedOperator {
                    operator: "instanceof".to_string(),
                    position,
                });
            }
        };

        let right = self.eat_sum_expression()?;
        Ok(binary(op, expr, right))
    }

    fn eat_sum_expression(&mut self) -> Result<Node, ParseError> {
        let mut expr = self.eat_product_expression()?;

        loop {
            let op = if self.peek_kind(TokenKind::Plus) {
                BinOp::Add
            } else if self.peek_kind(TokenKind::Minus) {
                BinOp::Subtract
            } else {
                break;
            };
            self.cursor += 1;
            let right = self.eat_product_expression()?;
            expr = binary(op, expr, right);
        }

        Ok(expr)
    }

    fn eat_product_expression(&mut self) -> Result<Node, ParseError> {
        let mut expr = self.eat_power_expression()?;

        loop {
            let op = if self.peek_kind(TokenKind::Star) {
                BinOp::Multiply
            } else if self.peek_kind(TokenKind::Div) {
                BinOp::Divide
            } else if self.peek_kind(TokenKind::Mod) {
                BinOp::Modulo
            } else {
                break;
            };
            self.cursor += 1;
            let right = self.eat_power_expression()?;
            expr = binary(op, expr, right);
        }

        Ok(expr)
    }

    fn eat_power_expression(&mut self) -> Result<Node, ParseError> {
        let expr = self.eat_unary_expression()?;

        if self.take_if(TokenKind::Power).is_some() {
            let right = self.eat_unary_expression()?;
            return Ok(binary(BinOp::Power, expr, right));
        }

        Ok(expr)
    }

    fn eat_unary_expression(&mut self) -> Result<Node, ParseError> {
        let op = match self.peek().map(|t| t.kind) {
            Some(TokenKind::Not) => Some(UnaryOp::Not),
            Some(TokenKind::Minus) => Some(UnaryOp::Minus),
            Some(TokenKind::Plus) => None,
            _ => return self.eat_primary_expression(),
        };

        let token_start = self.tokens[self.cursor].start;
        self.cursor += 1;
        let operand = self.eat_unary_expression()?;

        match op {
            // Unary plus is a no-op
            None => Ok(operand),
            Some(op) => {
                let span = Span::new(token_start, operand.span().end);
                Ok(Node::Unary {
                    op,
                    operand: Box::new(operand),
                    span,
                })
            }
        }
    }

    // ---- primaries and trailers ----

    fn eat_primary_expression(&mut self) -> Result<Node, ParseError> {
        let start = self.eat_start_node()?;
        let mut nodes = vec![start];

        while let Some(node) = self.eat_node()? {
            nodes.push(node);
        }

        if nodes.len() == 1 {
            return Ok(nodes.remove(0));
        }

        let span = Span::new(
            nodes[0].span().start,
            nodes[nodes.len() - 1].span().end,
        );
        Ok(Node::Compound {
            children: nodes,
            span,
        })
    }

    fn eat_start_node(&mut self) -> Result<Node, ParseError> {
        if let Some(node) = self.maybe_eat_literal()? {
            return Ok(node);
        }
        if let Some(node) = self.maybe_eat_paren_expression()? {
            return Ok(node);
        }
        if let Some(node) = self.maybe_eat_bean_reference() {
            return Ok(node);
        }
        if let Some(node) = self.maybe_eat_variable_or_function()? {
            return Ok(node);
        }
        if let Some(node) = self.maybe_eat_null_reference() {
            return Ok(node);
        }
        if let Some(node) = self.maybe_eat_type_reference()? {
            return Ok(node);
        }
        if let Some(node) = self.maybe_eat_constructor_expression()? {
            return Ok(node);
        }
        if let Some(node) = self.maybe_eat_inline_collection()? {
            return Ok(node);
        }
        if let Some(node) = self.maybe_eat_method_call()? {
            return Ok(node);
        }
        if let Some(node) = self.maybe_eat_identifier() {
            return Ok(node);
        }

        Err(self.unexpected_token())
    }

    /// One navigation trailer, or None when the chain ends.
    fn eat_node(&mut self) -> Result<Option<Node>, ParseError> {
        match self.peek().map(|t| t.kind) {
            Some(TokenKind::Dot) | Some(TokenKind::SafeNavi) => self.eat_dotted_node().map(Some),
            Some(TokenKind::LSquare) => {
                let open = self.take_unchecked();
                let index = self.eat_expression()?;
                let close = self.expect(TokenKind::RSquare, "]")?;
                Ok(Some(Node::Indexer {
                    index: Box::new(index),
                    null_safe: false,
                    span: Span::new(open.start, close.end),
                }))
            }
            _ => Ok(None),
        }
    }

    fn eat_dotted_node(&mut self) -> Result<Node, ParseError> {
        let nav = self.take_unchecked();
        let null_safe = nav.kind == TokenKind::SafeNavi;

        let selection_kind = match self.peek().map(|t| t.kind) {
            Some(TokenKind::Select) => Some(SelectionKind::All),
            Some(TokenKind::SelectFirst) => Some(SelectionKind::First),
            Some(TokenKind::SelectLast) => Some(SelectionKind::Last),
            _ => None,
        };
        if let Some(kind) = selection_kind {
            self.cursor += 1;
            let criteria = self.eat_expression()?;
            let close = self.expect(TokenKind::RSquare, "]")?;
            return Ok(Node::Selection {
                kind,
                null_safe,
                criteria: Box::new(criteria),
                span: Span::new(nav.start, close.end),
            });
        }

        if self.take_if(TokenKind::Project).is_some() {
            let expr = self.eat_expression()?;
            let close = self.expect(TokenKind::RSquare, "]")?;
            return Ok(Node::Projection {
                expr: Box::new(expr),
                span: Span::new(nav.start, close.end),
            });
        }

        // ?.[index]
        if self.take_if(TokenKind::LSquare).is_some() {
            let index = self.eat_expression()?;
            let close = self.expect(TokenKind::RSquare, "]")?;
            return Ok(Node::Indexer {
                index: Box::new(index),
                null_safe,
                span: Span::new(nav.start, close.end),
            });
        }

        if self.peek_kind(TokenKind::Identifier) {
            let ident = self.take_unchecked();
            let name = ident.text().to_string();

            if self.take_if(TokenKind::LParen).is_some() {
                let (args, end) = self.eat_arguments()?;
                return Ok(Node::MethodRef {
                    name,
                    null_safe,
                    args,
                    span: Span::new(nav.start, end),
                });
            }

            return Ok(Node::PropertyOrField {
                name,
                null_safe,
                direct: false,
                span: Span::new(nav.start, ident.end),
            });
        }

        Err(ParseError::ExpectedToken {
            expected: "identifier",
            position: self.next_position(),
        })
    }

    // ---- start-node alternatives ----

    fn maybe_eat_literal(&mut self) -> Result<Option<Node>, ParseError> {
        let Some(token) = self.peek().cloned() else {
            return Ok(None);
        };

        let value = match token.kind {
            TokenKind::LiteralInt => LiteralValue::Int(parse_int(&token, 10)?),
            TokenKind::LiteralHexInt => LiteralValue::Int(parse_int(&token, 16)?),
            TokenKind::LiteralLong => LiteralValue::Long(parse_long(&token, 10)?),
            TokenKind::LiteralHexLong => LiteralValue::Long(parse_long(&token, 16)?),
            TokenKind::LiteralReal => LiteralValue::Real(parse_real(&token)?),
            TokenKind::LiteralRealFloat => LiteralValue::Real(parse_float(&token)?),
            TokenKind::LiteralString => LiteralValue::String(unquote(token.text())),
            TokenKind::Identifier => {
                if token.is_identifier_ignore_case("true") {
                    LiteralValue::Boolean(true)
                } else if token.is_identifier_ignore_case("false") {
                    LiteralValue::Boolean(false)
                } else {
                    return Ok(None);
                }
            }
            _ => return Ok(None),
        };

        self.cursor += 1;
        Ok(Some(Node::Literal {
            value,
            span: Span::new(token.start, token.end),
        }))
    }

    fn maybe_eat_paren_expression(&mut self) -> Result<Option<Node>, ParseError> {
        if self.take_if(TokenKind::LParen).is_none() {
            return Ok(None);
        }
        let expr = self.eat_expression()?;
        self.expect(TokenKind::RParen, ")")?;
        Ok(Some(expr))
    }

    fn maybe_eat_bean_reference(&mut self) -> Option<Node> {
        if !self.peek_kind(TokenKind::BeanRef) && !self.peek_kind(TokenKind::FactoryBeanRef) {
            return None;
        }

        let saved = self.cursor;
        let prefix = self.take_unchecked();

        let name = match self.peek().map(|t| t.kind) {
            Some(TokenKind::Identifier) => {
                let token = self.take_unchecked();
                (token.text().to_string(), token.end)
            }
            Some(TokenKind::LiteralString) => {
                let token = self.take_unchecked();
                (unquote(token.text()), token.end)
            }
            _ => {
                self.cursor = saved;
                return None;
            }
        };

        Some(Node::BeanRef {
            name: name.0,
            span: Span::new(prefix.start, name.1),
        })
    }

    fn maybe_eat_variable_or_function(&mut self) -> Result<Option<Node>, ParseError> {
        if !self.peek_kind(TokenKind::Hash) {
            return Ok(None);
        }

        let saved = self.cursor;
        let hash = self.take_unchecked();

        if !self.peek_kind(TokenKind::Identifier) {
            self.cursor = saved;
            return Ok(None);
        }
        let ident = self.take_unchecked();
        let name = ident.text().to_string();

        if self.take_if(TokenKind::LParen).is_some() {
            let (args, end) = self.eat_arguments()?;
            return Ok(Some(Node::FunctionRef {
                name,
                args,
                span: Span::new(hash.start, end),
            }));
        }

        Ok(Some(Node::Variable {
            name,
            span: Span::new(hash.start, ident.end),
        }))
    }

    fn maybe_eat_null_reference(&mut self) -> Option<Node> {
        if self.peek_identifier("null") {
            let token = self.take_unchecked();
            return Some(Node::Literal {
                value: LiteralValue::Null,
                span: Span::new(token.start, token.end),
            });
        }
        None
    }

    fn maybe_eat_type_reference(&mut self) -> Result<Option<Node>, ParseError> {
        if !self.peek_identifier("T") {
            return Ok(None);
        }

        let saved = self.cursor;
        let t_token = self.take_unchecked();

        if self.take_if(TokenKind::LParen).is_none() || !self.peek_kind(TokenKind::Identifier) {
            self.cursor = saved;
            return Ok(None);
        }

        let qualifier = self.eat_qualified_identifier();
        let Some(close) = self.take_if(TokenKind::RParen) else {
            self.cursor = saved;
            return Ok(None);
        };

        Ok(Some(Node::TypeRef {
            qualifier: Box::new(qualifier),
            span: Span::new(t_token.start, close.end),
        }))
    }

    /// Dotted identifier chain; the cursor must sit on an identifier.
    fn eat_qualified_identifier(&mut self) -> Node {
        let mut parts = Vec::new();
        while self.peek_kind(TokenKind::Identifier) {
            let token = self.take_unchecked();
            parts.push(Node::Identifier {
                name: token.text().to_string(),
                span: Span::new(token.start, token.end),
            });
            if !self.peek_kind(TokenKind::Dot) {
                break;
            }
            self.cursor += 1;
        }

        let span = Span::new(
            parts[0].span().start,
            parts[parts.len() - 1].span().end,
        );
        Node::QualifiedId { parts, span }
    }

    fn maybe_eat_constructor_expression(&mut self) -> Result<Option<Node>, ParseError> {
        if !self.peek_identifier("new") {
            return Ok(None);
        }

        let saved = self.cursor;
        let new_token = self.take_unchecked();

        // Type name parts: identifiers, and numeric literals for the odd
        // type names a resolver may accept, separated by dots.
        let mut type_parts: Vec<String> = Vec::new();
        loop {
            match self.peek().map(|t| t.kind) {
                Some(TokenKind::Identifier)
                | Some(TokenKind::LiteralInt)
                | Some(TokenKind::LiteralLong)
                | Some(TokenKind::LiteralHexInt)
                | Some(TokenKind::LiteralHexLong) => {
                    let token = self.take_unchecked();
                    type_parts.push(token.text().to_string());
                }
                _ => break,
            }
            if self.peek_kind(TokenKind::Dot) {
                self.cursor += 1;
                continue;
            }
            break;
        }

        if type_parts.is_empty() {
            self.cursor = saved;
            return Ok(None);
        }
        let type_name = type_parts.join(".");

        if self.peek_kind(TokenKind::LSquare) {
            match self.eat_array_constructor(new_token.start, &type_name)? {
                Some(node) => return Ok(Some(node)),
                None => {
                    self.cursor = saved;
                    return Ok(None);
                }
            }
        }

        if self.take_if(TokenKind::LParen).is_none() {
            self.cursor = saved;
            return Ok(None);
        }

        let (args, end) = self.eat_arguments()?;
        Ok(Some(Node::ConstructorRef {
            type_name,
            args,
            display: None,
            span: Span::new(new_token.start, end),
        }))
    }

    /// Array construction: `new T[]{...}`, `new T[][]{...}` or the sized
    /// form `new T[n]`/`new T[n]{...}` whose dimensions are parsed, then
    /// dropped in favor of a pre-rendered display string.
    fn eat_array_constructor(
        &mut self,
        new_start: usize,
        type_name: &str,
    ) -> Result<Option<Node>, ParseError> {
        if let Some(node) = self.try_sized_array_constructor(new_start, type_name)? {
            return Ok(Some(node));
        }

        let saved = self.cursor;
        let mut dimensions = 0;
        while self.take_if(TokenKind::LSquare).is_some() {
            if self.take_if(TokenKind::RSquare).is_none() {
                self.cursor = saved;
                return Ok(None);
            }
            dimensions += 1;
        }

        if dimensions == 0 || !self.peek_kind(TokenKind::LCurly) {
            self.cursor = saved;
            return Ok(None);
        }

        let list = self.eat_inline_list()?;
        let mut array_type = type_name.to_string();
        for _ in 0..dimensions {
            array_type.push_str("[]");
        }

        let span = Span::new(new_start, list.span().end);
        Ok(Some(Node::ConstructorRef {
            type_name: array_type,
            args: vec![list],
            display: None,
            span,
        }))
    }

    fn try_sized_array_constructor(
        &mut self,
        new_start: usize,
        type_name: &str,
    ) -> Result<Option<Node>, ParseError> {
        let saved = self.cursor;
        let mut dimension_texts: Vec<String> = Vec::new();

        while self.peek_kind(TokenKind::LSquare) {
            self.cursor += 1;
            if self.peek_kind(TokenKind::RSquare) {
                // Empty brackets belong to the initializer-list form.
                self.cursor = saved;
                return Ok(None);
            }

            let Ok(size) = self.eat_expression() else {
                self.cursor = saved;
                return Ok(None);
            };
            if self.take_if(TokenKind::RSquare).is_none() {
                self.cursor = saved;
                return Ok(None);
            }
            dimension_texts.push(format!("[{}]", size.render()));
        }

        if dimension_texts.is_empty() {
            self.cursor = saved;
            return Ok(None);
        }

        let mut args = Vec::new();
        let mut end = self.previous_end();
        let mut display = format!("new {}{}", type_name, dimension_texts.join(""));

        if self.peek_kind(TokenKind::LCurly) {
            let Ok(list) = self.eat_inline_list() else {
                self.cursor = saved;
                return Ok(None);
            };
            end = list.span().end;
            display = format!("new {}[] {}", type_name, list.render());
            args.push(list);
        }

        Ok(Some(Node::ConstructorRef {
            type_name: type_name.to_string(),
            args,
            display: Some(display),
            span: Span::new(new_start, end),
        }))
    }

    fn maybe_eat_inline_collection(&mut self) -> Result<Option<Node>, ParseError> {
        if !self.peek_kind(TokenKind::LCurly) {
            return Ok(None);
        }
        let open = self.take_unchecked();

        // {}
        if let Some(close) = self.take_if(TokenKind::RCurly) {
            return Ok(Some(Node::InlineList {
                elements: Vec::new(),
                span: Span::new(open.start, close.end),
            }));
        }

        // {:}
        if self.take_if(TokenKind::Colon).is_some() {
            let close = self.expect(TokenKind::RCurly, "}")?;
            return Ok(Some(Node::InlineMap {
                entries: Vec::new(),
                span: Span::new(open.start, close.end),
            }));
        }

        // First element decides between list and map.
        let first = self.eat_expression()?;

        if self.take_if(TokenKind::Colon).is_some() {
            let first_value = self.eat_expression()?;
            let mut entries = vec![(first, first_value)];

            while self.take_if(TokenKind::Comma).is_some() {
                let key = self.eat_expression()?;
                self.expect(TokenKind::Colon, ":")?;
                let value = self.eat_expression()?;
                entries.push((key, value));
            }

            let close = self.expect(TokenKind::RCurly, "}")?;
            return Ok(Some(Node::InlineMap {
                entries,
                span: Span::new(open.start, close.end),
            }));
        }

        let mut elements = vec![first];
        while self.take_if(TokenKind::Comma).is_some() {
            elements.push(self.eat_expression()?);
        }

        let close = self.expect(TokenKind::RCurly, "}")?;
        Ok(Some(Node::InlineList {
            elements,
            span: Span::new(open.start, close.end),
        }))
    }

    /// `{...}` holding list elements only, used by array constructors.
    fn eat_inline_list(&mut self) -> Result<Node, ParseError> {
        let open = self.expect(TokenKind::LCurly, "{")?;

        if let Some(close) = self.take_if(TokenKind::RCurly) {
            return Ok(Node::InlineList {
                elements: Vec::new(),
                span: Span::new(open.start, close.end),
            });
        }

        let mut elements = vec![self.eat_expression()?];
        while self.take_if(TokenKind::Comma).is_some() {
            elements.push(self.eat_expression()?);
        }

        let close = self.expect(TokenKind::RCurly, "}")?;
        Ok(Node::InlineList {
            elements,
            span: Span::new(open.start, close.end),
        })
    }

    /// Bare call at the head of a chain: identifier directly followed by `(`.
    fn maybe_eat_method_call(&mut self) -> Result<Option<Node>, ParseError> {
        if !self.peek_kind(TokenKind::Identifier) || self.peek_identifier("new") {
            return Ok(None);
        }
        if self.tokens.get(self.cursor + 1).map(|t| t.kind) != Some(TokenKind::LParen) {
            return Ok(None);
        }

        let name_token = self.take_unchecked();
        self.cursor += 1; // consume '('
        let (args, end) = self.eat_arguments()?;

        Ok(Some(Node::MethodRef {
            name: name_token.text().to_string(),
            null_safe: false,
            args,
            span: Span::new(name_token.start, end),
        }))
    }

    fn maybe_eat_identifier(&mut self) -> Option<Node> {
        if !self.peek_kind(TokenKind::Identifier) || self.peek_identifier("new") {
            return None;
        }

        let token = self.take_unchecked();
        Some(Node::PropertyOrField {
            name: token.text().to_string(),
            null_safe: false,
            direct: true,
            span: Span::new(token.start, token.end),
        })
    }

    /// Comma-separated arguments after a consumed `(`; returns the closing
    /// paren's end offset.
    fn eat_arguments(&mut self) -> Result<(Vec<Node>, usize), ParseError> {
        if let Some(close) = self.take_if(TokenKind::RParen) {
            return Ok((Vec::new(), close.end));
        }

        let mut args = vec![self.eat_expression()?];
        while self.take_if(TokenKind::Comma).is_some() {
            args.push(self.eat_expression()?);
        }

        let close = self.expect(TokenKind::RParen, ")")?;
        Ok((args, close.end))
    }

    fn maybe_eat_relational_operator(&mut self) -> Option<(TokenKind, usize)> {
        let token = self.peek()?;
        let position = token.start;

        match token.kind {
            TokenKind::Eq
            | TokenKind::Ne
            | TokenKind::Gt
            | TokenKind::Ge
            | TokenKind::Lt
            | TokenKind::Le
            | TokenKind::Between
            | TokenKind::Matches
            | TokenKind::Instanceof => {
                let kind = token.kind;
                self.cursor += 1;
                Some((kind, position))
            }
            TokenKind::Identifier => {
                let kind = if token.is_identifier_ignore_case("matches") {
                    TokenKind::Matches
                } else if token.is_identifier_ignore_case("instanceof") {
                    TokenKind::Instanceof
                } else if token.is_identifier_ignore_case("between") {
                    TokenKind::Between
                } else {
                    return None;
                };
                self.cursor += 1;
                Some((kind, position))
            }
            _ => None,
        }
    }

    // ---- token cursor ----

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.cursor)
    }

    fn peek_kind(&self, kind: TokenKind) -> bool {
        self.peek().is_some_and(|t| t.kind == kind)
    }

    fn peek_identifier(&self, name: &str) -> bool {
        self.peek().is_some_and(|t| t.is_identifier_ignore_case(name))
    }

    /// Take the current token; callers must have peeked first.
    fn take_unchecked(&mut self) -> Token {
        let token = self.tokens[self.cursor].clone();
        self.cursor += 1;
        token
    }

    fn take_if(&mut self, kind: TokenKind) -> Option<Token> {
        if self.peek_kind(kind) {
            return Some(self.take_unchecked());
        }
        None
    }

    fn expect(&mut self, kind: TokenKind, expected: &'static str) -> Result<Token, ParseError> {
        self.take_if(kind).ok_or(ParseError::ExpectedToken {
            expected,
            position: self.next_position(),
        })
    }

    fn previous_end(&self) -> usize {
        if self.cursor == 0 {
            return 0;
        }
        self.tokens[self.cursor - 1].end
    }

    fn next_position(&self) -> usize {
        match self.peek() {
            Some(token) => token.start,
            None => self.previous_end(),
        }
    }

    fn unexpected_token(&self) -> ParseError {
        match self.peek() {
            Some(token) => ParseError::UnexpectedToken {
                found: match &token.data {
                    Some(data) => format!("'{}'", data),
                    None => format!("{}", token.kind),
                },
                position: token.start,
            },
            None => ParseError::UnexpectedToken {
                found: "end of expression".to_string(),
                position: self.previous_end(),
            },
        }
    }
}

fn binary(op: BinOp, left: Node, right: Node) -> Node {
    let span = Span::new(left.span().start, right.span().end);
    Node::Binary {
        op,
        left: Box::new(left),
        right: Box::new(right),
        span,
    }
}

fn parse_int(token: &Token, radix: u32) -> Result<i32, ParseError> {
    i32::from_str_radix(token.text(), radix).map_err(|_| not_a_number(token))
}

fn parse_long(token: &Token, radix: u32) -> Result<i64, ParseError> {
    i64::from_str_radix(token.text(), radix).map_err(|_| not_a_number(token))
}

fn parse_real(token: &Token) -> Result<f64, ParseError> {
    token.text().parse::<f64>().map_err(|_| not_a_number(token))
}

/// `f`-suffixed literals go through f32, matching their declared precision.
fn parse_float(token: &Token) -> Result<f64, ParseError> {
    token
        .text()
        .parse::<f32>()
        .map(f64::from)
        .map_err(|_| not_a_number(token))
}

fn not_a_number(token: &Token) -> ParseError {
    ParseError::NotANumber {
        text: token.text().to_string(),
        position: token.start,
    }
}

/// Strip surrounding quotes and collapse doubled quotes of that style.
fn unquote(text: &str) -> String {
    if text.len() < 2 {
        return text.to_string();
    }
    let quote = match text.as_bytes()[0] {
        b'\'' => '\'',
        b'"' => '"',
        _ => return text.to_string(),
    };
    let inner = &text[1..text.len() - 1];
    match quote {
        '\'' => inner.replace("''", "'"),
        _ => inner.replace("\"\"", "\""),
    }
}
