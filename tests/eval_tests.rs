// tests/eval_tests.rs

use sorrel_lang::{EvalError, ExpressionParser, Resolver, Value};
use std::collections::HashMap;

/// Resolver used across the evaluation tests: `self` resolves to the
/// current target, other property names are object key lookups, and a
/// handful of fixed variables, beans, types, methods and constructors
/// are available.
struct TestResolver;

impl Resolver for TestResolver {
    fn resolve_property(&self, name: &str, target: &Value) -> Option<Value> {
        if name == "self" {
            return Some(target.clone());
        }
        match target {
            Value::Object(fields) => fields.get(name).cloned(),
            _ => None,
        }
    }

    fn resolve_variable(&self, name: &str) -> Option<Value> {
        match name {
            "name" => Some(Value::String("World".to_string())),
            "factor" => Some(Value::Integer(3)),
            _ => None,
        }
    }

    fn resolve_bean(&self, name: &str) -> Option<Value> {
        match name {
            "registry" => Some(Value::String("registry bean".to_string())),
            _ => None,
        }
    }

    fn resolve_type(&self, type_name: &str) -> Option<Value> {
        match type_name {
            "java.lang.String" => Some(Value::String("java.lang.String".to_string())),
            _ => None,
        }
    }

    fn invoke_method(&self, name: &str, target: &Value, _args: &[Value]) -> Option<Value> {
        match (name, target) {
            ("size", Value::Array(elements)) => Some(Value::Integer(elements.len() as i64)),
            ("size", Value::String(s)) => Some(Value::Integer(s.len() as i64)),
            _ => None,
        }
    }

    fn invoke_function(&self, name: &str, args: &[Value]) -> Option<Value> {
        match (name, args) {
            ("max", [Value::Integer(a), Value::Integer(b)]) => {
                Some(Value::Integer(*a.max(b)))
            }
            _ => None,
        }
    }

    fn construct(&self, type_name: &str, args: &[Value]) -> Option<Value> {
        match (type_name, args) {
            ("String", [arg]) => Some(arg.clone()),
            _ => None,
        }
    }
}

fn eval(source: &str) -> Result<Value, String> {
    eval_with_root(source, Value::Null)
}

fn eval_with_root(source: &str, root: Value) -> Result<Value, String> {
    let expr = ExpressionParser::new()
        .parse(source)
        .map_err(|e| format!("{}", e))?;
    expr.evaluate_with(root, &TestResolver)
        .map_err(|e| format!("{}", e))
}

fn eval_err(source: &str) -> EvalError {
    let expr = ExpressionParser::new().parse(source).unwrap();
    expr.evaluate_with(Value::Null, &TestResolver).unwrap_err()
}

fn json_object(pairs: Vec<(&str, Value)>) -> Value {
    let mut map = HashMap::new();
    for (k, v) in pairs {
        map.insert(k.to_string(), v);
    }
    Value::Object(map)
}

fn items() -> Value {
    Value::Array(vec![
        json_object(vec![
            ("name", Value::String("pen".into())),
            ("price", Value::Integer(5)),
        ]),
        json_object(vec![
            ("name", Value::String("phone".into())),
            ("price", Value::Integer(400)),
        ]),
        json_object(vec![
            ("name", Value::String("laptop".into())),
            ("price", Value::Integer(1200)),
        ]),
    ])
}

// ============================================================================
// Arithmetic
// ============================================================================

#[test]
fn test_arithmetic() {
    let test_cases = vec![
        ("2+3*4", Value::Integer(14)),
        ("1 - 5", Value::Integer(-4)),
        ("10%3", Value::Integer(1)),
        ("7/2", Value::Float(3.5)),
        ("10 - 2.5", Value::Float(7.5)),
        ("2^10", Value::Integer(1024)),
        ("-2^4", Value::Integer(16)),
        ("0x2A + 0", Value::Integer(42)),
        ("6 div 2", Value::Integer(3)),
        ("6 mod 4", Value::Integer(2)),
    ];

    for (input, expected) in test_cases {
        assert_eq!(eval(input).unwrap(), expected, "input {:?}", input);
    }
}

#[test]
fn test_whole_results_narrow_back_to_integers() {
    let test_cases = vec![
        ("1.0 + 1", Value::Integer(2)),
        ("2.5 + 2.5", Value::Integer(5)),
        ("5.0 * 2", Value::Integer(10)),
        ("7.5 - 0.5", Value::Integer(7)),
    ];

    for (input, expected) in test_cases {
        assert_eq!(eval(input).unwrap(), expected, "input {:?}", input);
    }
}

#[test]
fn test_division_by_zero_yields_zero() {
    assert_eq!(eval("6/0").unwrap(), Value::Integer(0));
    assert_eq!(eval("7%0").unwrap(), Value::Integer(0));
    assert_eq!(eval("6/0.0").unwrap(), Value::Integer(0));
}

#[test]
fn test_string_concatenation() {
    let test_cases = vec![
        ("'a'+'b'", Value::String("ab".into())),
        ("1+'a'", Value::String("1a".into())),
        ("'n: '+42", Value::String("n: 42".into())),
        ("'v: '+null", Value::String("v: null".into())),
        ("'v: '+true", Value::String("v: true".into())),
    ];

    for (input, expected) in test_cases {
        assert_eq!(eval(input).unwrap(), expected, "input {:?}", input);
    }
}

#[test]
fn test_arithmetic_type_errors() {
    assert!(matches!(eval_err("'a'-'b'"), EvalError::TypeError(_)));
    assert!(matches!(eval_err("'a'*2"), EvalError::TypeError(_)));
    assert!(matches!(eval_err("-'a'"), EvalError::TypeError(_)));
}

// ============================================================================
// Comparison and Equality
// ============================================================================

#[test]
fn test_relational_operators() {
    let test_cases = vec![
        ("3 > 6", false),
        ("6 > 3", true),
        ("3 >= 3", true),
        ("3 ge 4", false),
        ("2 < 3", true),
        ("2 <= 1", false),
        ("2.5 > 2", true),
    ];

    for (input, expected) in test_cases {
        assert_eq!(
            eval(input).unwrap(),
            Value::Boolean(expected),
            "input {:?}",
            input
        );
    }
}

#[test]
fn test_equality() {
    let test_cases = vec![
        ("1 == 1", true),
        ("1 == 1.0", true),
        ("1 != 2", true),
        ("'a' == 'a'", true),
        ("'a' == 'b'", false),
        ("'123''4' == '123''4'", true),
        ("null == null", true),
        ("{1,2} == {1,2}", true),
        ("true != false", true),
    ];

    for (input, expected) in test_cases {
        assert_eq!(
            eval(input).unwrap(),
            Value::Boolean(expected),
            "input {:?}",
            input
        );
    }
}

#[test]
fn test_doubled_quotes_undouble_in_both_quote_styles() {
    assert_eq!(
        eval("'Tony''s Pizza'").unwrap(),
        Value::String("Tony's Pizza".into())
    );
    assert_eq!(
        eval("\"big \"\"pizza\"\" parlor\"").unwrap(),
        Value::String("big \"pizza\" parlor".into())
    );
    assert_eq!(
        eval("\"a\"\"b\" + ''").unwrap(),
        Value::String("a\"b".into())
    );
}

#[test]
fn test_matches() {
    let test_cases = vec![
        ("'abc' matches 'b'", true),
        ("'abc' matches '^b$'", false),
        ("'5.0067' matches '^-?\\d+(\\.\\d{2})?$'", false),
        ("27 matches '^.*2.*$'", true),
    ];

    for (input, expected) in test_cases {
        assert_eq!(
            eval(input).unwrap(),
            Value::Boolean(expected),
            "input {:?}",
            input
        );
    }

    assert!(matches!(
        eval_err("'x' matches '['"),
        EvalError::InvalidPattern(_)
    ));
    assert!(matches!(eval_err("'x' matches 1"), EvalError::TypeError(_)));
}

#[test]
fn test_between_is_inclusive() {
    let test_cases = vec![
        ("5 between {1,10}", true),
        ("1 between {1,5}", true),
        ("5 between {1,5}", true),
        ("0 between {1,5}", false),
        ("6 between {1,5}", false),
        ("'b' between {'a','c'}", true),
        ("'d' between {'a','c'}", false),
    ];

    for (input, expected) in test_cases {
        assert_eq!(
            eval(input).unwrap(),
            Value::Boolean(expected),
            "input {:?}",
            input
        );
    }

    assert!(matches!(eval_err("5 between {1}"), EvalError::TypeError(_)));
    assert!(matches!(eval_err("5 between 4"), EvalError::TypeError(_)));
}

// ============================================================================
// Logical Operators
// ============================================================================

#[test]
fn test_logical_operators() {
    let test_cases = vec![
        ("true and true", true),
        ("true and false", false),
        ("false or true", true),
        ("false or false", false),
        ("1 and 2", true),
        ("0 or ''", false),
        ("!true", false),
        ("!0", true),
        ("!''", true),
        ("!'x'", false),
        ("not true", false),
    ];

    for (input, expected) in test_cases {
        assert_eq!(
            eval(input).unwrap(),
            Value::Boolean(expected),
            "input {:?}",
            input
        );
    }
}

#[test]
fn test_logical_operators_short_circuit() {
    // The unresolvable right operand is never evaluated
    assert_eq!(eval("true or nosuch").unwrap(), Value::Boolean(true));
    assert_eq!(eval("false and nosuch").unwrap(), Value::Boolean(false));
    assert!(matches!(
        eval_err("false or nosuch"),
        EvalError::UnresolvedReference(_)
    ));
}

// ============================================================================
// Ternary and Elvis
// ============================================================================

#[test]
fn test_ternary() {
    assert_eq!(eval("true ? 'a' : 'b'").unwrap(), Value::String("a".into()));
    assert_eq!(eval("false ? 'a' : 'b'").unwrap(), Value::String("b".into()));
    assert_eq!(eval("3>2 ? 1 : 2").unwrap(), Value::Integer(1));
    assert!(matches!(eval_err("null ? 1 : 2"), EvalError::NullCondition));
}

#[test]
fn test_elvis() {
    let test_cases = vec![
        ("'Andy'?:'Dave'", Value::String("Andy".into())),
        ("''?:'Dave'", Value::String("Dave".into())),
        ("null?:42", Value::Integer(42)),
        ("0?:5", Value::Integer(5)),
        ("false?:true", Value::Boolean(true)),
        ("(2*3)?:1*10", Value::Integer(6)),
        ("(null ?: 1) * 10", Value::Integer(10)),
    ];

    for (input, expected) in test_cases {
        assert_eq!(eval(input).unwrap(), expected, "input {:?}", input);
    }
}

// ============================================================================
// Collections
// ============================================================================

#[test]
fn test_inline_collections() {
    assert_eq!(
        eval("{1,2,3}").unwrap(),
        Value::Array(vec![
            Value::Integer(1),
            Value::Integer(2),
            Value::Integer(3)
        ])
    );
    assert_eq!(eval("{}").unwrap(), Value::Array(vec![]));
    assert_eq!(eval("{:}").unwrap(), Value::Object(HashMap::new()));
    assert_eq!(
        eval("{name:'Andy',age:3}").unwrap(),
        json_object(vec![
            ("name", Value::String("Andy".into())),
            ("age", Value::Integer(3)),
        ])
    );
}

#[test]
fn test_selection() {
    let cheap = eval_with_root("self.?[price < 100]", items()).unwrap();
    let Value::Array(elements) = cheap else {
        panic!("expected an array");
    };
    assert_eq!(elements.len(), 1);

    let first = eval_with_root("self.^[price > 100]", items()).unwrap();
    let Value::Object(fields) = &first else {
        panic!("expected an object");
    };
    assert_eq!(fields.get("name"), Some(&Value::String("phone".into())));

    let last = eval_with_root("self.$[price > 100]", items()).unwrap();
    let Value::Object(fields) = &last else {
        panic!("expected an object");
    };
    assert_eq!(fields.get("name"), Some(&Value::String("laptop".into())));
}

#[test]
fn test_selection_with_no_matches() {
    assert_eq!(
        eval_with_root("self.?[price > 9999]", items()).unwrap(),
        Value::Array(vec![])
    );
    assert_eq!(
        eval_with_root("self.^[price > 9999]", items()).unwrap(),
        Value::Null
    );
    assert_eq!(
        eval_with_root("self.$[price > 9999]", items()).unwrap(),
        Value::Null
    );
}

#[test]
fn test_selection_type_errors() {
    let err = eval_with_root("self.?[price > 1]", Value::Integer(3)).unwrap_err();
    assert!(err.contains("Type error"), "got {}", err);
}

#[test]
fn test_projection() {
    assert_eq!(
        eval_with_root("self.![price]", items()).unwrap(),
        Value::Array(vec![
            Value::Integer(5),
            Value::Integer(400),
            Value::Integer(1200)
        ])
    );
    assert_eq!(
        eval_with_root("self.![price * 2]", items()).unwrap(),
        Value::Array(vec![
            Value::Integer(10),
            Value::Integer(800),
            Value::Integer(2400)
        ])
    );
}

#[test]
fn test_indexer() {
    let array = Value::Array(vec![
        Value::Integer(10),
        Value::Integer(20),
        Value::Integer(30),
    ]);
    assert_eq!(
        eval_with_root("self[1]", array.clone()).unwrap(),
        Value::Integer(20)
    );

    // A whole-numbered float index is fine; a fractional one is not
    assert_eq!(
        eval_with_root("self[1.0]", array.clone()).unwrap(),
        Value::Integer(20)
    );
    let err = eval_with_root("self[1.5]", array.clone()).unwrap_err();
    assert!(err.contains("Type error"), "got {}", err);

    let err = eval_with_root("self[5]", array).unwrap_err();
    assert!(err.contains("Access error"), "got {}", err);

    let object = json_object(vec![("a", Value::Integer(1))]);
    assert_eq!(
        eval_with_root("self['a']", object.clone()).unwrap(),
        Value::Integer(1)
    );
    let err = eval_with_root("self['b']", object).unwrap_err();
    assert!(err.contains("Access error"), "got {}", err);

    let err = eval_with_root("self[0]", Value::Integer(7)).unwrap_err();
    assert!(err.contains("Type error"), "got {}", err);
}

// ============================================================================
// Null-Safe Navigation
// ============================================================================

#[test]
fn test_null_safe_navigation() {
    assert_eq!(eval("self?.foo").unwrap(), Value::Null);
    assert_eq!(eval("self?.size()").unwrap(), Value::Null);
    assert_eq!(eval("self?.[0]").unwrap(), Value::Null);
    assert_eq!(eval("self?.?[price > 1]").unwrap(), Value::Null);

    assert!(matches!(
        eval_err("self.foo"),
        EvalError::UnresolvedReference(_)
    ));
    let err = eval_with_root("self[0]", Value::Null).unwrap_err();
    assert!(err.contains("Access error"), "got {}", err);
}

// ============================================================================
// References Through the Resolver
// ============================================================================

#[test]
fn test_resolver_references() {
    assert_eq!(eval("#name").unwrap(), Value::String("World".into()));
    assert_eq!(
        eval("'Hello ' + #name").unwrap(),
        Value::String("Hello World".into())
    );
    assert_eq!(eval("#factor * 2").unwrap(), Value::Integer(6));
    assert_eq!(eval("#max(3, 7)").unwrap(), Value::Integer(7));
    assert_eq!(eval("@registry").unwrap(), Value::String("registry bean".into()));
    assert_eq!(
        eval("T(java.lang.String)").unwrap(),
        Value::String("java.lang.String".into())
    );
    assert_eq!(
        eval("new String('wibble')").unwrap(),
        Value::String("wibble".into())
    );
}

#[test]
fn test_unresolved_references() {
    assert!(matches!(eval_err("#missing"), EvalError::UnresolvedReference(_)));
    assert!(matches!(eval_err("@missing"), EvalError::UnresolvedReference(_)));
    assert!(matches!(eval_err("T(a.b.C)"), EvalError::UnresolvedReference(_)));
    assert!(matches!(eval_err("#nope(1)"), EvalError::UnresolvedReference(_)));
    assert!(matches!(
        eval_err("new Widget(1)"),
        EvalError::UnresolvedReference(_)
    ));
}

#[test]
fn test_method_invocation() {
    assert_eq!(
        eval_with_root("self.size()", items()).unwrap(),
        Value::Integer(3)
    );
    assert_eq!(
        eval_with_root("self.size()", Value::String("four".into())).unwrap(),
        Value::Integer(4)
    );
    let err = eval_with_root("self.explode()", items()).unwrap_err();
    assert!(err.contains("Unresolved reference"), "got {}", err);
}

#[test]
fn test_array_constructor_without_resolver() {
    assert_eq!(
        eval("new int[]{1,2,3}").unwrap(),
        Value::Array(vec![
            Value::Integer(1),
            Value::Integer(2),
            Value::Integer(3)
        ])
    );
}

// ============================================================================
// Miscellaneous
// ============================================================================

#[test]
fn test_assignment_is_not_evaluable() {
    let err = eval_err("a = 1");
    assert!(matches!(err, EvalError::TypeError(_)));
    assert!(format!("{}", err).contains("not assignable"));
}

#[test]
fn test_property_lookup_on_object_root() {
    let root = json_object(vec![("price", Value::Integer(100))]);
    assert_eq!(
        eval_with_root("price > 50", root).unwrap(),
        Value::Boolean(true)
    );
}

#[test]
fn test_long_and_real_literals() {
    assert_eq!(eval("42L").unwrap(), Value::Integer(42));
    assert_eq!(eval("0x2AL").unwrap(), Value::Integer(42));
    assert_eq!(eval("3.14").unwrap(), Value::Float(3.14));
    assert_eq!(eval("2.5f").unwrap(), Value::Float(2.5));
    assert_eq!(eval("1e2").unwrap(), Value::Float(100.0));
}
