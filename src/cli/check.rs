//! Evaluate sorrel expressions against JSON input

use super::CliError;
use crate::{ExpressionParser, Resolver, Value, from_json, to_json};

/// Options for the eval command
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// The expression to evaluate
    pub expression: String,
    /// JSON input string, used as the root value
    pub input: Option<String>,
    /// Pretty-print the output
    pub pretty: bool,
    /// Only validate syntax, don't evaluate
    pub syntax_only: bool,
}

/// Result of an eval operation
#[derive(Debug)]
pub enum CheckResult {
    /// Syntax validation passed
    SyntaxValid,
    /// Expression evaluated successfully with JSON output
    Success(serde_json::Value),
}

/// Resolves property references as key lookups on JSON objects, so that
/// `price > 50` works against `{"price": 100}` without custom code.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonResolver;

impl Resolver for JsonResolver {
    fn resolve_property(&self, name: &str, target: &Value) -> Option<Value> {
        match target {
            Value::Object(fields) => fields.get(name).cloned(),
            _ => None,
        }
    }
}

/// Execute a sorrel eval operation
pub fn execute_check(options: &CheckOptions) -> Result<CheckResult, CliError> {
    let parser = ExpressionParser::new();
    let expression = parser.parse(&options.expression)?;

    if options.syntax_only {
        return Ok(CheckResult::SyntaxValid);
    }

    let root = match &options.input {
        Some(json_str) => {
            let json_value: serde_json::Value = serde_json::from_str(json_str)?;
            from_json(json_value)
        }
        None => Value::Null,
    };

    let result = expression.evaluate_with(root, &JsonResolver)?;
    Ok(CheckResult::Success(to_json(result)))
}
