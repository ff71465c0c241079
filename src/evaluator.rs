use regex::Regex;
use rust_decimal::{Decimal, prelude::FromPrimitive, prelude::ToPrimitive};

use crate::{
    ast::{BinOp, LiteralValue, Node, SelectionKind, UnaryOp},
    value::Value,
};

/// Evaluation state for one expression evaluation.
#[derive(Debug, Clone)]
pub struct ExpressionState {
    /// The value navigation and references resolve against
    pub root: Value,
}

impl ExpressionState {
    pub fn new(root: Value) -> Self {
        ExpressionState { root }
    }

    /// Derived state with a collection element as the root, used while
    /// evaluating selection criteria and projection expressions.
    pub fn for_element(&self, element: Value) -> Self {
        ExpressionState { root: element }
    }
}

/// The pluggable name-resolution seam.
///
/// Identifier-shaped nodes (properties, variables, beans, types, methods,
/// functions, constructors) carry names the core cannot resolve by itself;
/// an embedder supplies a `Resolver` to give them meaning. Every method
/// defaults to `None`, which surfaces as an unresolved-reference error at
/// the call site.
pub trait Resolver {
    fn resolve_property(&self, name: &str, target: &Value) -> Option<Value> {
        let _ = (name, target);
        None
    }

    fn resolve_variable(&self, name: &str) -> Option<Value> {
        let _ = name;
        None
    }

    fn resolve_bean(&self, name: &str) -> Option<Value> {
        let _ = name;
        None
    }

    fn resolve_type(&self, type_name: &str) -> Option<Value> {
        let _ = type_name;
        None
    }

    fn invoke_method(&self, name: &str, target: &Value, args: &[Value]) -> Option<Value> {
        let _ = (name, target, args);
        None
    }

    fn invoke_function(&self, name: &str, args: &[Value]) -> Option<Value> {
        let _ = (name, args);
        None
    }

    fn construct(&self, type_name: &str, args: &[Value]) -> Option<Value> {
        let _ = (type_name, args);
        None
    }
}

/// A resolver that resolves nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopResolver;

impl Resolver for NoopResolver {}

/// Errors that can occur during expression evaluation.
#[derive(Debug, Clone)]
pub enum EvalError {
    /// Type mismatch or invalid operation for the given types
    TypeError(String),

    /// Invalid array index or missing object key
    AccessError(String),

    /// A name no resolver could give a value for
    UnresolvedReference(String),

    /// Right operand of `matches` is not a valid regular expression
    InvalidPattern(String),

    /// Ternary condition evaluated to null
    NullCondition,
}

impl std::fmt::Display for EvalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EvalError::TypeError(msg) => write!(f, "Type error: {}", msg),
            EvalError::AccessError(msg) => write!(f, "Access error: {}", msg),
            EvalError::UnresolvedReference(msg) => write!(f, "Unresolved reference: {}", msg),
            EvalError::InvalidPattern(msg) => write!(f, "Invalid pattern: {}", msg),
            EvalError::NullCondition => write!(f, "Ternary condition must not be null"),
        }
    }
}

impl std::error::Error for EvalError {}

/// Returns a human-readable type name for a Value
fn type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Boolean(_) => "boolean",
        Value::Integer(_) => "integer",
        Value::Float(_) => "float",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// The expression evaluator.
///
/// Walks a parsed tree in one exhaustive match per node kind, resolving
/// names through the injected [`Resolver`].
pub struct Evaluator<'a> {
    resolver: &'a dyn Resolver,
}

impl<'a> Evaluator<'a> {
    pub fn new(resolver: &'a dyn Resolver) -> Self {
        Evaluator { resolver }
    }

    pub fn eval(&self, node: &Node, state: &ExpressionState) -> Result<Value, EvalError> {
        match node {
            Node::Literal { value, .. } => Ok(literal_value(value)),

            Node::PropertyOrField {
                name, null_safe, ..
            } => {
                if *null_safe && state.root == Value::Null {
                    return Ok(Value::Null);
                }
                self.resolver
                    .resolve_property(name, &state.root)
                    .ok_or_else(|| {
                        EvalError::UnresolvedReference(format!(
                            "property or field '{}' cannot be resolved",
                            name
                        ))
                    })
            }

            Node::Variable { name, .. } => {
                self.resolver.resolve_variable(name).ok_or_else(|| {
                    EvalError::UnresolvedReference(format!("variable '#{}' is not defined", name))
                })
            }

            Node::BeanRef { name, .. } => {
                self.resolver.resolve_bean(name).ok_or_else(|| {
                    EvalError::UnresolvedReference(format!("bean '@{}' is not defined", name))
                })
            }

            Node::TypeRef { qualifier, .. } => {
                let name = qualifier.render();
                self.resolver.resolve_type(&name).ok_or_else(|| {
                    EvalError::UnresolvedReference(format!("type '{}' cannot be resolved", name))
                })
            }

            Node::FunctionRef { name, args, .. } => {
                let values = self.eval_all(args, state)?;
                self.resolver
                    .invoke_function(name, &values)
                    .ok_or_else(|| {
                        EvalError::UnresolvedReference(format!(
                            "function '#{}' is not defined",
                            name
                        ))
                    })
            }

            Node::MethodRef {
                name,
                null_safe,
                args,
                ..
            } => {
                if *null_safe && state.root == Value::Null {
                    return Ok(Value::Null);
                }
                let values = self.eval_all(args, state)?;
                self.resolver
                    .invoke_method(name, &state.root, &values)
                    .ok_or_else(|| {
                        EvalError::UnresolvedReference(format!(
                            "method '{}' cannot be resolved",
                            name
                        ))
                    })
            }

            Node::ConstructorRef {
                type_name: ty,
                args,
                ..
            } => {
                let values = self.eval_all(args, state)?;
                if let Some(value) = self.resolver.construct(ty, &values) {
                    return Ok(value);
                }
                // Array-initializer form evaluates to its element list
                // without resolver help.
                if let [Node::InlineList { .. }] = args.as_slice()
                    && let [list] = values.as_slice()
                {
                    return Ok(list.clone());
                }
                Err(EvalError::UnresolvedReference(format!(
                    "constructor for type '{}' cannot be resolved",
                    ty
                )))
            }

            Node::QualifiedId { .. } => Ok(Value::String(node.render())),

            Node::Identifier { name, .. } => Ok(Value::String(name.clone())),

            Node::Compound { children, .. } => {
                let mut last = Value::Null;
                for child in children {
                    last = self.eval(child, state)?;
                }
                Ok(last)
            }

            Node::Indexer {
                index, null_safe, ..
            } => {
                if state.root == Value::Null {
                    if *null_safe {
                        return Ok(Value::Null);
                    }
                    return Err(EvalError::AccessError("cannot index into null".to_string()));
                }
                let key = self.eval(index, state)?;
                index_value(&state.root, &key)
            }

            Node::Assign { .. } => Err(EvalError::TypeError(
                "expression is not assignable".to_string(),
            )),

            Node::InlineList { elements, .. } => {
                Ok(Value::Array(self.eval_all(elements, state)?))
            }

            Node::InlineMap { entries, .. } => {
                let mut object = std::collections::HashMap::new();
                for (key_node, value_node) in entries {
                    let key = self.map_key(key_node, state)?;
                    let value = self.eval(value_node, state)?;
                    object.insert(key, value);
                }
                Ok(Value::Object(object))
            }

            Node::Selection {
                kind,
                null_safe,
                criteria,
                ..
            } => {
                if state.root == Value::Null {
                    if *null_safe {
                        return Ok(Value::Null);
                    }
                    return Err(EvalError::AccessError(
                        "cannot select from null".to_string(),
                    ));
                }
                let Value::Array(elements) = &state.root else {
                    return Err(EvalError::TypeError(format!(
                        "selection requires an array, got {}",
                        type_name(&state.root)
                    )));
                };

                let mut matches = Vec::new();
                for element in elements {
                    let element_state = state.for_element(element.clone());
                    if self.eval(criteria, &element_state)?.is_truthy() {
                        matches.push(element.clone());
                    }
                }

                Ok(match kind {
                    SelectionKind::All => Value::Array(matches),
                    SelectionKind::First => matches.into_iter().next().unwrap_or(Value::Null),
                    SelectionKind::Last => matches.into_iter().next_back().unwrap_or(Value::Null),
                })
            }

            Node::Projection { expr, .. } => {
                let Value::Array(elements) = &state.root else {
                    return Err(EvalError::TypeError(format!(
                        "projection requires an array, got {}",
                        type_name(&state.root)
                    )));
                };

                let mut projected = Vec::with_capacity(elements.len());
                for element in elements {
                    let element_state = state.for_element(element.clone());
                    projected.push(self.eval(expr, &element_state)?);
                }
                Ok(Value::Array(projected))
            }

            Node::Ternary {
                condition,
                when_true,
                when_false,
                ..
            } => {
                let test = self.eval(condition, state)?;
                if test == Value::Null {
                    return Err(EvalError::NullCondition);
                }
                if test.is_truthy() {
                    self.eval(when_true, state)
                } else {
                    self.eval(when_false, state)
                }
            }

            Node::Elvis { value, default, .. } => {
                let test = self.eval(value, state)?;
                if is_elvis_empty(&test) {
                    self.eval(default, state)
                } else {
                    Ok(test)
                }
            }

            Node::Binary {
                op, left, right, ..
            } => self.eval_binary(*op, left, right, state),

            Node::Unary { op, operand, .. } => {
                let value = self.eval(operand, state)?;
                match op {
                    UnaryOp::Not => Ok(Value::Boolean(!value.is_truthy())),
                    UnaryOp::Minus => match value {
                        Value::Integer(n) => Ok(Value::Integer(-n)),
                        Value::Float(n) => Ok(Value::Float(-n)),
                        other => Err(EvalError::TypeError(format!(
                            "cannot negate {}",
                            type_name(&other)
                        ))),
                    },
                }
            }

            Node::Template { parts, .. } => {
                let mut out = String::new();
                for part in parts {
                    out.push_str(&self.eval(part, state)?.as_string());
                }
                Ok(Value::String(out))
            }
        }
    }

    fn eval_all(
        &self,
        nodes: &[Node],
        state: &ExpressionState,
    ) -> Result<Vec<Value>, EvalError> {
        let mut values = Vec::with_capacity(nodes.len());
        for node in nodes {
            values.push(self.eval(node, state)?);
        }
        Ok(values)
    }

    /// Inline-map keys written as bare identifiers are taken literally;
    /// anything else is evaluated and stringified.
    fn map_key(&self, node: &Node, state: &ExpressionState) -> Result<String, EvalError> {
        match node {
            Node::PropertyOrField {
                name, direct: true, ..
            } => Ok(name.clone()),
            Node::Identifier { name, .. } => Ok(name.clone()),
            _ => Ok(self.eval(node, state)?.as_string()),
        }
    }

    fn eval_binary(
        &self,
        op: BinOp,
        left: &Node,
        right: &Node,
        state: &ExpressionState,
    ) -> Result<Value, EvalError> {
        // Logical operators short-circuit, so they evaluate their own
        // operands.
        match op {
            BinOp::And => {
                if !self.eval(left, state)?.is_truthy() {
                    return Ok(Value::Boolean(false));
                }
                let right = self.eval(right, state)?;
                return Ok(Value::Boolean(right.is_truthy()));
            }
            BinOp::Or => {
                if self.eval(left, state)?.is_truthy() {
                    return Ok(Value::Boolean(true));
                }
                let right = self.eval(right, state)?;
                return Ok(Value::Boolean(right.is_truthy()));
            }
            _ => {}
        }

        let left = self.eval(left, state)?;
        let right = self.eval(right, state)?;
        apply_binop(op, &left, &right)
    }
}

fn literal_value(value: &LiteralValue) -> Value {
    match value {
        LiteralValue::Int(n) => Value::Integer(i64::from(*n)),
        LiteralValue::Long(n) => Value::Integer(*n),
        LiteralValue::Real(n) => Value::Float(*n),
        LiteralValue::String(s) => Value::String(s.clone()),
        LiteralValue::Boolean(b) => Value::Boolean(*b),
        LiteralValue::Null => Value::Null,
    }
}

/// The elvis operator substitutes its default for "empty" values, a wider
/// net than plain truthiness would suggest by name: null, the empty
/// string, false and numeric zero all count.
fn is_elvis_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Boolean(b) => !b,
        Value::Integer(n) => *n == 0,
        Value::Float(n) => *n == 0.0,
        _ => false,
    }
}

fn index_value(target: &Value, key: &Value) -> Result<Value, EvalError> {
    match (target, key) {
        (Value::Array(elements), _) => {
            let index = match key {
                Value::Integer(n) => *n,
                Value::Float(f) if f.fract() == 0.0 => *f as i64,
                _ => {
                    return Err(EvalError::TypeError(format!(
                        "array index must be an integer, got {}",
                        type_name(key)
                    )));
                }
            };
            if index < 0 || index as usize >= elements.len() {
                return Err(EvalError::AccessError(format!(
                    "index {} out of bounds for array of length {}",
                    index,
                    elements.len()
                )));
            }
            Ok(elements[index as usize].clone())
        }
        (Value::Object(fields), _) => {
            let name = key.as_string();
            fields.get(&name).cloned().ok_or_else(|| {
                EvalError::AccessError(format!("object has no key '{}'", name))
            })
        }
        _ => Err(EvalError::TypeError(format!(
            "cannot index into {}",
            type_name(target)
        ))),
    }
}

fn apply_binop(op: BinOp, left: &Value, right: &Value) -> Result<Value, EvalError> {
    match op {
        BinOp::Add => {
            // Either side being a string turns + into concatenation.
            if matches!(left, Value::String(_)) || matches!(right, Value::String(_)) {
                return Ok(Value::String(format!(
                    "{}{}",
                    left.as_string(),
                    right.as_string()
                )));
            }
            numeric_binop(op, left, right)
        }

        BinOp::Subtract | BinOp::Multiply | BinOp::Divide | BinOp::Modulo | BinOp::Power => {
            numeric_binop(op, left, right)
        }

        BinOp::GreaterThan | BinOp::GreaterEqual | BinOp::LessThan | BinOp::LessEqual => {
            let (Some(a), Some(b)) = (left.as_number(), right.as_number()) else {
                return Err(EvalError::TypeError(format!(
                    "cannot compare {} and {}",
                    type_name(left),
                    type_name(right)
                )));
            };
            let result = match op {
                BinOp::GreaterThan => a > b,
                BinOp::GreaterEqual => a >= b,
                BinOp::LessThan => a < b,
                _ => a <= b,
            };
            Ok(Value::Boolean(result))
        }

        BinOp::Equal => Ok(Value::Boolean(values_equal(left, right))),
        BinOp::NotEqual => Ok(Value::Boolean(!values_equal(left, right))),

        BinOp::Matches => {
            let Value::String(pattern) = right else {
                return Err(EvalError::TypeError(format!(
                    "matches requires a string pattern, got {}",
                    type_name(right)
                )));
            };
            let regex = Regex::new(pattern)
                .map_err(|e| EvalError::InvalidPattern(e.to_string()))?;
            Ok(Value::Boolean(regex.is_match(&left.as_string())))
        }

        BinOp::Between => {
            let Value::Array(bounds) = right else {
                return Err(EvalError::TypeError(format!(
                    "between requires a two-element list, got {}",
                    type_name(right)
                )));
            };
            let [low, high] = bounds.as_slice() else {
                return Err(EvalError::TypeError(format!(
                    "between requires a two-element list, got {} elements",
                    bounds.len()
                )));
            };
            let result = compare_values(left, low) != std::cmp::Ordering::Less
                && compare_values(left, high) != std::cmp::Ordering::Greater;
            Ok(Value::Boolean(result))
        }

        // Handled by the short-circuit path in eval_binary.
        BinOp::And | BinOp::Or => Err(EvalError::TypeError(
            "logical operator outside boolean context".to_string(),
        )),
    }
}

/// Float-coerce both operands, apply, then narrow whole results back to
/// integers through decimal arithmetic so `1.0 + 1` stays an integer.
fn numeric_binop(op: BinOp, left: &Value, right: &Value) -> Result<Value, EvalError> {
    let (Some(a), Some(b)) = (left.as_number(), right.as_number()) else {
        return Err(EvalError::TypeError(format!(
            "cannot apply '{}' to {} and {}",
            op.symbol(),
            type_name(left),
            type_name(right)
        )));
    };

    let result = match op {
        BinOp::Add => a + b,
        BinOp::Subtract => a - b,
        BinOp::Multiply => a * b,
        BinOp::Divide => {
            if b == 0.0 {
                return Ok(Value::Integer(0));
            }
            a / b
        }
        BinOp::Modulo => {
            if b == 0.0 {
                return Ok(Value::Integer(0));
            }
            a % b
        }
        BinOp::Power => a.powf(b),
        _ => {
            return Err(EvalError::TypeError(format!(
                "'{}' is not an arithmetic operator",
                op.symbol()
            )));
        }
    };

    Ok(narrow_numeric(result))
}

fn narrow_numeric(result: f64) -> Value {
    if let Some(d) = Decimal::from_f64(result)
        && d.is_integer()
        && let Some(n) = d.to_i64()
    {
        return Value::Integer(n);
    }
    Value::Float(result)
}

fn values_equal(left: &Value, right: &Value) -> bool {
    if let (Some(a), Some(b)) = (left.as_number(), right.as_number()) {
        return a == b;
    }
    left == right
}

/// Ordering for `between`: numeric when both sides are numbers, then
/// lexicographic over strings, then over the stringified values.
fn compare_values(left: &Value, right: &Value) -> std::cmp::Ordering {
    if let (Some(a), Some(b)) = (left.as_number(), right.as_number()) {
        return a.partial_cmp(&b).unwrap_or(std::cmp::Ordering::Equal);
    }
    if let (Value::String(a), Value::String(b)) = (left, right) {
        return a.cmp(b);
    }
    left.as_string().cmp(&right.as_string())
}
