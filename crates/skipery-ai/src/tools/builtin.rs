//! Built-in capabilities that need nothing from the host.

use async_trait::async_trait;
use serde_json::{json, Map, Value};

use super::{ToolCapability, ToolDefinition, ToolError};

/// `sum` and `subtract` over two numbers.
#[derive(Debug, Default, Clone, Copy)]
pub struct MathTool;

fn two_numbers_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "a": { "type": "number", "description": "First operand" },
            "b": { "type": "number", "description": "Second operand" }
        },
        "required": ["a", "b"]
    })
}

fn result_schema() -> Value {
    json!({
        "type": "object",
        "properties": { "result": { "type": "number" } }
    })
}

fn number_arg(function: &str, args: &Map<String, Value>, key: &str) -> Result<f64, ToolError> {
    args.get(key)
        .and_then(Value::as_f64)
        .ok_or_else(|| ToolError::failed(function, format!("argument '{key}' must be a number")))
}

#[async_trait]
impl ToolCapability for MathTool {
    fn functions(&self) -> Vec<ToolDefinition> {
        vec![
            ToolDefinition::new("sum", "Sum", "Add two numbers: a + b", two_numbers_schema())
                .with_response(result_schema()),
            ToolDefinition::new(
                "subtract",
                "Subtract",
                "Subtract two numbers: a - b",
                two_numbers_schema(),
            )
            .with_response(result_schema()),
        ]
    }

    async fn call(&self, function: &str, args: &Map<String, Value>) -> Result<Value, ToolError> {
        let a = number_arg(function, args, "a")?;
        let b = number_arg(function, args, "b")?;
        let result = match function {
            "sum" => a + b,
            "subtract" => a - b,
            other => return Err(ToolError::NotFound(other.to_string())),
        };
        Ok(json!({ "result": result }))
    }
}

/// `user_name`: the login name of the user running the process.
#[derive(Debug, Default, Clone, Copy)]
pub struct UserNameTool;

#[async_trait]
impl ToolCapability for UserNameTool {
    fn functions(&self) -> Vec<ToolDefinition> {
        vec![ToolDefinition::new(
            "user_name",
            "User name",
            "Get the name of the current user",
            json!({ "type": "object", "properties": {} }),
        )
        .with_response(json!({
            "type": "object",
            "properties": { "name": { "type": "string" } }
        }))]
    }

    async fn call(&self, function: &str, _args: &Map<String, Value>) -> Result<Value, ToolError> {
        if function != "user_name" {
            return Err(ToolError::NotFound(function.to_string()));
        }
        let name = std::env::var("USER")
            .or_else(|_| std::env::var("USERNAME"))
            .map_err(|_| ToolError::failed(function, "no USER or USERNAME in environment"))?;
        Ok(json!({ "name": name }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(a: Value, b: Value) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("a".into(), a);
        map.insert("b".into(), b);
        map
    }

    #[tokio::test]
    async fn sum_and_subtract() {
        let out = MathTool.call("sum", &args(json!(2), json!(2))).await.unwrap();
        assert_eq!(out["result"].as_f64(), Some(4.0));

        let out = MathTool.call("subtract", &args(json!(10), json!(3.5))).await.unwrap();
        assert_eq!(out["result"].as_f64(), Some(6.5));
    }

    #[tokio::test]
    async fn non_numeric_argument_fails() {
        let err = MathTool
            .call("sum", &args(json!("two"), json!(2)))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ToolError::failed("sum", "argument 'a' must be a number")
        );
    }

    #[tokio::test]
    async fn missing_argument_fails() {
        let mut only_a = Map::new();
        only_a.insert("a".into(), json!(1));
        let err = MathTool.call("subtract", &only_a).await.unwrap_err();
        assert!(err.to_string().contains("'b'"));
    }

    #[test]
    fn math_exposes_two_functions() {
        let names: Vec<_> = MathTool.functions().into_iter().map(|d| d.name).collect();
        assert_eq!(names, ["sum", "subtract"]);
    }

    #[tokio::test]
    async fn user_name_reads_environment() {
        let expected = std::env::var("USER").or_else(|_| std::env::var("USERNAME"));
        let out = UserNameTool.call("user_name", &Map::new()).await;
        match expected {
            Ok(name) => assert_eq!(out.unwrap()["name"], name),
            Err(_) => assert!(out.is_err()),
        }
    }
}
