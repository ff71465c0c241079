// tests/template_tests.rs

use sorrel_lang::{
    ExpressionParser, Node, ParseError, ParserConfig, Resolver, TemplateContext, Value,
};

struct Greeter;

impl Resolver for Greeter {
    fn resolve_variable(&self, name: &str) -> Option<Value> {
        match name {
            "name" => Some(Value::String("World".to_string())),
            _ => None,
        }
    }
}

fn parse_template(source: &str) -> Result<sorrel_lang::ParsedExpression, ParseError> {
    ExpressionParser::new().parse_template(source, &TemplateContext::default())
}

// ============================================================================
// Template Splitting
// ============================================================================

#[test]
fn test_literal_only_template_collapses_to_a_string() {
    let expr = parse_template("just text").unwrap();
    assert!(matches!(expr.root(), Node::Literal { .. }));
    assert_eq!(
        expr.evaluate().unwrap(),
        Value::String("just text".to_string())
    );
}

#[test]
fn test_single_expression_template() {
    let expr = parse_template("#{2+2}").unwrap();
    assert!(matches!(expr.root(), Node::Binary { .. }));
    assert_eq!(expr.evaluate().unwrap(), Value::Integer(4));
}

#[test]
fn test_mixed_template() {
    let expr = parse_template("Hello #{#name}!").unwrap();
    let Node::Template { parts, .. } = expr.root() else {
        panic!("expected a template, got {:?}", expr.root());
    };
    assert_eq!(parts.len(), 3);

    assert_eq!(
        expr.evaluate_with(Value::Null, &Greeter).unwrap(),
        Value::String("Hello World!".to_string())
    );
}

#[test]
fn test_multiple_embedded_expressions() {
    let expr = parse_template("#{1+1} and #{2*2}").unwrap();
    assert_eq!(
        expr.evaluate().unwrap(),
        Value::String("2 and 4".to_string())
    );
}

#[test]
fn test_literal_part_spans_count_chars() {
    // Multi-byte text: spans must count chars like token spans do
    let expr = parse_template("héllo #{1+1}!").unwrap();
    let Node::Template { parts, .. } = expr.root() else {
        panic!("expected a template, got {:?}", expr.root());
    };
    let Node::Literal { span, .. } = &parts[0] else {
        panic!("expected a literal part");
    };
    assert_eq!((span.start, span.end), (0, 6));
    let Node::Literal { span, .. } = &parts[2] else {
        panic!("expected a literal part");
    };
    assert_eq!((span.start, span.end), (12, 13));
}

#[test]
fn test_template_rendering() {
    let expr = parse_template("Hi #{#name}!").unwrap();
    assert_eq!(expr.render(), "'Hi ' + #name + '!'");
}

#[test]
fn test_custom_delimiters() {
    let context = TemplateContext {
        prefix: "${".to_string(),
        suffix: "}".to_string(),
    };
    let expr = ExpressionParser::new()
        .parse_template("sum: ${1+2}", &context)
        .unwrap();
    assert_eq!(
        expr.evaluate().unwrap(),
        Value::String("sum: 3".to_string())
    );
}

#[test]
fn test_missing_suffix_is_an_error() {
    assert!(matches!(
        parse_template("oops #{1+1"),
        Err(ParseError::NonTerminatingTemplate { .. })
    ));
}

#[test]
fn test_empty_embedded_expression_is_an_error() {
    assert!(matches!(
        parse_template("#{}"),
        Err(ParseError::EmptyExpression)
    ));
}

// ============================================================================
// Facade Behavior
// ============================================================================

#[test]
fn test_parse_debug_returns_tokens() {
    let (expr, tokens) = ExpressionParser::new().parse_debug("1 + 2").unwrap();
    assert_eq!(tokens.len(), 3);
    assert_eq!(expr.render(), "(1 + 2)");
}

#[test]
fn test_parsed_expression_is_reusable() {
    let expr = ExpressionParser::new().parse("#name ?: 'nobody'").unwrap();
    assert_eq!(
        expr.evaluate_with(Value::Null, &Greeter).unwrap(),
        Value::String("World".to_string())
    );
    // No resolver: the variable is unresolvable, not empty
    assert!(expr.evaluate().is_err());
}

#[test]
fn test_configured_maximum_length() {
    let parser = ExpressionParser::with_config(ParserConfig {
        maximum_expression_length: 5,
        ..ParserConfig::default()
    });
    assert!(parser.parse("1+1").is_ok());
    assert!(matches!(
        parser.parse("1 + 1 + 1"),
        Err(ParseError::ExpressionTooLong {
            length: 9,
            maximum: 5
        })
    ));
}

#[test]
fn test_source_is_kept() {
    let expr = ExpressionParser::new().parse("1+2").unwrap();
    assert_eq!(expr.source(), "1+2");
}
