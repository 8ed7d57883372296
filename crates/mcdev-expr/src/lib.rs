//! Expression evaluation for configuration rules.
//!
//! Rules are JEXL boolean expressions over the parsed configuration sources,
//! e.g. `bukkit["spawn-limits"].monsters >= 70 && server_properties["view-distance"] > 8`.
//!
//! The analyzer only depends on [`ExpressionEvaluator`]; [`JexlEvaluator`]
//! adapts the `jexl-eval` engine to it.

pub mod error;

use futures::future::BoxFuture;
use futures::FutureExt;
use jexl_eval::Evaluator;
use serde_json::{Map, Value};

pub use error::ExprError;

/// Variables visible to an expression: source name -> parsed config tree
pub type Context = Map<String, Value>;

/// Longest accepted expression, in chars
pub const MAX_EXPRESSION_LEN: usize = 512;
/// Deepest accepted bracket nesting
pub const MAX_NESTING: usize = 64;

/// Capability for evaluating a single rule expression.
///
/// Evaluation may suspend (an implementation may call out to another process
/// or service), so the result is a future. Implementations must be shareable
/// across concurrently running analyses.
pub trait ExpressionEvaluator: Send + Sync {
    fn evaluate<'a>(
        &'a self,
        expression: &'a str,
        context: &'a Context,
    ) -> BoxFuture<'a, Result<Value, ExprError>>;
}

/// JEXL truthiness: `false`, `0`, `""` and `null` are falsy
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(false),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Reject input the recursive engine could not handle safely.
///
/// Length bounds the depth of operator chains, the bracket count bounds
/// explicit nesting.
fn check_shape(expression: &str) -> Result<(), ExprError> {
    let len = expression.chars().count();
    if len > MAX_EXPRESSION_LEN {
        return Err(ExprError::TooLong {
            limit: MAX_EXPRESSION_LEN,
            actual: len,
        });
    }

    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    for (position, c) in expression.chars().enumerate() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' => quote = Some(c),
            '(' | '[' | '{' => {
                depth += 1;
                if depth > MAX_NESTING {
                    return Err(ExprError::TooDeep {
                        limit: MAX_NESTING,
                        position,
                    });
                }
            }
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    Ok(())
}

/// Copy of `value` with every number stored as a double, so `1` in a config
/// compares equal to the literal `1` in an expression
fn to_doubles(value: &Value) -> Value {
    match value {
        Value::Number(n) => n
            .as_f64()
            .and_then(serde_json::Number::from_f64)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        Value::Array(items) => Value::Array(items.iter().map(to_doubles).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), to_doubles(v)))
                .collect(),
        ),
        other => other.clone(),
    }
}

/// Default evaluator backed by `jexl-eval`
#[derive(Debug, Clone, Copy, Default)]
pub struct JexlEvaluator;

impl JexlEvaluator {
    pub fn new() -> Self {
        Self
    }

    pub fn eval_sync(&self, expression: &str, context: &Context) -> Result<Value, ExprError> {
        check_shape(expression)?;
        // Evaluator holds boxed transforms and is not Sync, build one per call
        let scope: Map<String, Value> = context
            .iter()
            .map(|(k, v)| (k.clone(), to_doubles(v)))
            .collect();
        Evaluator::new()
            .eval_in_context(expression, &scope)
            .map_err(|e| ExprError::Eval(e.to_string()))
    }
}

impl ExpressionEvaluator for JexlEvaluator {
    fn evaluate<'a>(
        &'a self,
        expression: &'a str,
        context: &'a Context,
    ) -> BoxFuture<'a, Result<Value, ExprError>> {
        async move {
            let result = self.eval_sync(expression, context);
            if let Err(e) = &result {
                log::trace!("expression `{}` failed: {}", expression, e);
            }
            result
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn context(value: Value) -> Context {
        match value {
            Value::Object(map) => map,
            _ => panic!("context must be an object"),
        }
    }

    #[tokio::test]
    async fn test_evaluate_async() {
        let ctx = context(json!({"bukkit": {"spawn-limits": {"monsters": 70}}}));
        let result = JexlEvaluator::new()
            .evaluate(r#"bukkit["spawn-limits"].monsters >= 70"#, &ctx)
            .await
            .unwrap();
        assert!(is_truthy(&result));
    }

    #[tokio::test]
    async fn test_syntax_error_is_returned() {
        let err = JexlEvaluator::new()
            .evaluate("a >=", &Context::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ExprError::Eval(_)));
        assert!(!err.to_string().is_empty());
    }

    #[test]
    fn test_dyn_evaluator() {
        let evaluator: Box<dyn ExpressionEvaluator> = Box::new(JexlEvaluator);
        let ctx = context(json!({"x": 1}));
        let result = futures::executor::block_on(evaluator.evaluate("x == 1", &ctx)).unwrap();
        assert_eq!(result, json!(true));
    }

    #[test]
    fn test_rule_shaped_expressions() {
        let ctx = context(json!({
            "server_properties": {"view-distance": 10, "online-mode": false},
            "spigot": {"world-settings": {"default": {"view-distance": "default"}}}
        }));
        let eval = |src: &str| JexlEvaluator.eval_sync(src, &ctx).unwrap();

        assert!(is_truthy(&eval(r#"server_properties["view-distance"] >= 10"#)));
        assert!(is_truthy(&eval(r#"server_properties["online-mode"] == false"#)));
        assert!(is_truthy(&eval(
            r#"spigot["world-settings"].default["view-distance"] == "default""#
        )));
        assert!(!is_truthy(&eval(r#"server_properties["view-distance"] < 10"#)));
        assert!(is_truthy(&eval("!bukkit")));
    }

    #[test]
    fn test_deep_nesting_is_error() {
        let deep = format!("{}true{}", "(".repeat(10_000), ")".repeat(10_000));
        let err = JexlEvaluator.eval_sync(&deep, &Context::new()).unwrap_err();
        assert!(matches!(err, ExprError::TooLong { .. }));

        let nested = format!("{}true{}", "(".repeat(100), ")".repeat(100));
        let err = JexlEvaluator.eval_sync(&nested, &Context::new()).unwrap_err();
        assert_eq!(
            err,
            ExprError::TooDeep {
                limit: MAX_NESTING,
                position: MAX_NESTING
            }
        );
    }

    #[test]
    fn test_long_operator_chain_is_error() {
        let chain = format!("{}true", "!".repeat(5_000));
        let err = JexlEvaluator.eval_sync(&chain, &Context::new()).unwrap_err();
        assert!(matches!(err, ExprError::TooLong { actual: 5004, .. }));
    }

    #[test]
    fn test_brackets_inside_strings_are_ignored() {
        let src = format!("\"{}\" == \"{}\"", "(".repeat(100), "(".repeat(100));
        assert_eq!(JexlEvaluator.eval_sync(&src, &Context::new()).unwrap(), json!(true));
    }

    #[test]
    fn test_integers_compare_with_literals() {
        let ctx = context(json!({"bukkit": {"ticks-per": {"monster-spawns": 1}}}));
        let result = JexlEvaluator
            .eval_sync(r#"bukkit["ticks-per"]["monster-spawns"] == 1"#, &ctx)
            .unwrap();
        assert_eq!(result, json!(true));
    }

    #[test]
    fn test_truthiness() {
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&Value::Null));
        assert!(is_truthy(&json!([])));
        assert!(is_truthy(&json!("false")));
    }
}
