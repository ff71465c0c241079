use crate::{
    ast::{LiteralValue, Node, Span, Token},
    evaluator::{EvalError, Evaluator, ExpressionState, NoopResolver, Resolver},
    lexer::Tokenizer,
    parser::{ParseError, Parser},
    value::Value,
};

/// Parser configuration.
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Sources longer than this are rejected before tokenization.
    pub maximum_expression_length: usize,
    /// Reserved for resolvers that support assignment into collections.
    pub auto_grow_collections: bool,
    /// Reserved for resolvers that support assignment through null links.
    pub auto_grow_null_references: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        ParserConfig {
            maximum_expression_length: 10_000,
            auto_grow_collections: false,
            auto_grow_null_references: false,
        }
    }
}

/// Delimiters marking embedded expressions inside template text.
#[derive(Debug, Clone)]
pub struct TemplateContext {
    pub prefix: String,
    pub suffix: String,
}

impl Default for TemplateContext {
    fn default() -> Self {
        TemplateContext {
            prefix: "#{".to_string(),
            suffix: "}".to_string(),
        }
    }
}

/// The parsing facade: source text in, reusable [`ParsedExpression`] out.
#[derive(Debug, Clone, Default)]
pub struct ExpressionParser {
    config: ParserConfig,
}

impl ExpressionParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ParserConfig) -> Self {
        ExpressionParser { config }
    }

    /// Parse a plain (non-template) expression.
    pub fn parse(&self, source: &str) -> Result<ParsedExpression, ParseError> {
        let root = self.parse_root(source)?;
        Ok(self.wrap(source, root))
    }

    /// Parse a plain expression, also returning the token stream.
    pub fn parse_debug(
        &self,
        source: &str,
    ) -> Result<(ParsedExpression, Vec<Token>), ParseError> {
        self.check_source(source)?;
        let tokens = Tokenizer::new(source).tokenize()?;
        let root = Parser::new(tokens.clone()).parse_tree()?;
        Ok((self.wrap(source, root), tokens))
    }

    /// Parse template text: literal stretches interleaved with embedded
    /// expressions between the context's delimiters.
    ///
    /// Text with no embedded expression collapses to a single string
    /// literal; a prefix with no matching suffix is an error.
    pub fn parse_template(
        &self,
        source: &str,
        context: &TemplateContext,
    ) -> Result<ParsedExpression, ParseError> {
        if source.len() > self.config.maximum_expression_length {
            return Err(ParseError::ExpressionTooLong {
                length: source.len(),
                maximum: self.config.maximum_expression_length,
            });
        }

        let mut parts: Vec<Node> = Vec::new();
        let mut rest = source;
        // Offsets are tracked in chars so part spans line up with lexer
        // token spans.
        let mut offset = 0;

        while let Some(prefix_at) = rest.find(&context.prefix) {
            if prefix_at > 0 {
                parts.push(string_literal(&rest[..prefix_at], offset));
            }

            let expr_start = prefix_at + context.prefix.len();
            let Some(suffix_at) = rest[expr_start..].find(&context.suffix) else {
                return Err(ParseError::NonTerminatingTemplate {
                    suffix: context.suffix.clone(),
                    position: offset + rest[..prefix_at].chars().count(),
                });
            };

            let expr_source = &rest[expr_start..expr_start + suffix_at];
            parts.push(self.parse_root(expr_source)?);

            let consumed = expr_start + suffix_at + context.suffix.len();
            offset += rest[..consumed].chars().count();
            rest = &rest[consumed..];
        }

        if !rest.is_empty() || parts.is_empty() {
            parts.push(string_literal(rest, offset));
        }

        if parts.len() == 1 {
            let root = parts.remove(0);
            return Ok(self.wrap(source, root));
        }

        let span = Span::new(0, source.chars().count());
        Ok(self.wrap(source, Node::Template { parts, span }))
    }

    fn parse_root(&self, source: &str) -> Result<Node, ParseError> {
        self.check_source(source)?;
        let tokens = Tokenizer::new(source).tokenize()?;
        Parser::new(tokens).parse_tree()
    }

    fn check_source(&self, source: &str) -> Result<(), ParseError> {
        if source.trim().is_empty() {
            return Err(ParseError::EmptyExpression);
        }
        if source.len() > self.config.maximum_expression_length {
            return Err(ParseError::ExpressionTooLong {
                length: source.len(),
                maximum: self.config.maximum_expression_length,
            });
        }
        Ok(())
    }

    fn wrap(&self, source: &str, root: Node) -> ParsedExpression {
        ParsedExpression {
            source: source.to_string(),
            root,
            config: self.config.clone(),
        }
    }
}

/// A parsed expression, immutable and reusable across evaluations.
#[derive(Debug, Clone)]
pub struct ParsedExpression {
    source: String,
    root: Node,
    config: ParserConfig,
}

impl ParsedExpression {
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Canonical rendering of the parsed tree.
    pub fn render(&self) -> String {
        self.root.render()
    }

    /// Evaluate with a null root and no resolver.
    pub fn evaluate(&self) -> Result<Value, EvalError> {
        self.evaluate_with(Value::Null, &NoopResolver)
    }

    /// Evaluate against a root value with no resolver.
    pub fn evaluate_with_root(&self, root: Value) -> Result<Value, EvalError> {
        self.evaluate_with(root, &NoopResolver)
    }

    /// Evaluate against a root value, resolving names through `resolver`.
    pub fn evaluate_with(
        &self,
        root: Value,
        resolver: &dyn Resolver,
    ) -> Result<Value, EvalError> {
        let state = ExpressionState::new(root);
        Evaluator::new(resolver).eval(&self.root, &state)
    }
}

fn string_literal(text: &str, offset: usize) -> Node {
    Node::Literal {
        value: LiteralValue::String(text.to_string()),
        span: Span::new(offset, offset + text.chars().count()),
    }
}
