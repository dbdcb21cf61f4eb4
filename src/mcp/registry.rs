use jsonschema::{Draft, JSONSchema};
use serde_json::{json, Map, Value};
use std::future::Future;
use std::pin::Pin;

use super::types::McpTool;
use crate::error::{Result, StandardBotsError};

pub type ToolFuture = Pin<Box<dyn Future<Output = Result<Value>> + Send>>;
pub type ToolHandler = Box<dyn Fn(Value) -> ToolFuture + Send + Sync>;

pub struct Tool {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
    /// Compiled once at registration; a schema that fails to compile is
    /// reported on every call instead.
    validator: std::result::Result<JSONSchema, String>,
    handler: ToolHandler,
}

impl Tool {
    pub fn definition(&self) -> McpTool {
        McpTool {
            name: self.name.clone(),
            description: Some(self.description.clone()),
            input_schema: self.input_schema.clone(),
        }
    }
}

/// Name -> {description, schema, handler}. Filled once at startup and only
/// read afterwards; share it behind an `Arc`.
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<Tool>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool. A second registration under the same name replaces
    /// the first but keeps its position.
    pub fn register<F, Fut>(
        &mut self,
        name: &str,
        description: &str,
        input_schema: Value,
        handler: F,
    ) where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value>> + Send + 'static,
    {
        let validator = JSONSchema::options()
            .with_draft(Draft::Draft7)
            .compile(&input_schema)
            .map_err(|e| format!("Invalid tool schema: {}", e));
        if let Err(e) = &validator {
            tracing::warn!("Tool {}: {}", name, e);
        }

        let tool = Tool {
            name: name.to_string(),
            description: description.to_string(),
            input_schema,
            validator,
            handler: Box::new(move |args| -> ToolFuture { Box::pin(handler(args)) }),
        };

        match self.tools.iter_mut().find(|t| t.name == name) {
            Some(existing) => *existing = tool,
            None => self.tools.push(tool),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Tool> {
        self.tools.iter().find(|t| t.name == name)
    }

    pub fn list(&self) -> Vec<&Tool> {
        self.tools.iter().collect()
    }

    pub fn definitions(&self) -> Vec<McpTool> {
        self.tools.iter().map(Tool::definition).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn validate_arguments(
        &self,
        tool_name: &str,
        arguments: &Value,
    ) -> std::result::Result<(), String> {
        let tool = self
            .get(tool_name)
            .ok_or_else(|| format!("Tool '{}' not found", tool_name))?;

        let schema = tool.validator.as_ref().map_err(Clone::clone)?;

        if let Err(errors) = schema.validate(arguments) {
            let error_messages: Vec<String> = errors
                .map(|e| {
                    let path = e.instance_path.to_string();
                    if path.is_empty() {
                        e.to_string()
                    } else {
                        format!("{}: {}", path, e)
                    }
                })
                .collect();
            return Err(error_messages.join("; "));
        }

        Ok(())
    }

    /// Coerce, validate, then run the tool's handler. Nothing reaches the
    /// handler unless the arguments match the declared schema.
    pub async fn call(&self, name: &str, arguments: Value) -> Result<Value> {
        let tool = self
            .get(name)
            .ok_or_else(|| StandardBotsError::ToolNotFound(name.to_string()))?;

        let mut arguments = match arguments {
            Value::Null => Value::Object(Map::new()),
            other => other,
        };
        coerce_arguments(&tool.input_schema, &mut arguments);

        self.validate_arguments(name, &arguments)
            .map_err(StandardBotsError::ValidationError)?;

        (tool.handler)(arguments).await
    }
}

/// Convert string values into the scalar type their property declares, so
/// `"5"` satisfies an integer parameter and `"true"` a boolean one.
pub fn coerce_arguments(schema: &Value, arguments: &mut Value) {
    let Some(properties) = schema.get("properties").and_then(Value::as_object) else {
        return;
    };
    let Some(args) = arguments.as_object_mut() else {
        return;
    };

    for (name, value) in args.iter_mut() {
        let (Some(raw), Some(property)) = (value.as_str(), properties.get(name)) else {
            continue;
        };
        if declares_type(property, "string") {
            continue;
        }
        if let Some(coerced) = coerce_scalar(property, raw) {
            *value = coerced;
        }
    }
}

fn declares_type(property: &Value, expected: &str) -> bool {
    match property.get("type") {
        Some(Value::String(t)) => t == expected,
        Some(Value::Array(types)) => types.iter().any(|t| t.as_str() == Some(expected)),
        _ => false,
    }
}

fn coerce_scalar(property: &Value, raw: &str) -> Option<Value> {
    let raw = raw.trim();

    if declares_type(property, "integer") {
        if let Ok(n) = raw.parse::<i64>() {
            return Some(json!(n));
        }
    }
    if declares_type(property, "number") {
        if let Some(n) = raw.parse::<f64>().ok().and_then(serde_json::Number::from_f64) {
            return Some(Value::Number(n));
        }
    }
    if declares_type(property, "boolean") {
        match raw.to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => return Some(Value::Bool(true)),
            "false" | "0" | "no" => return Some(Value::Bool(false)),
            _ => {}
        }
    }
    if declares_type(property, "null") && raw.eq_ignore_ascii_case("null") {
        return Some(Value::Null);
    }

    None
}
