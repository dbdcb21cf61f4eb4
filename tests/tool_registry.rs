use serde_json::{json, Value};
use standard_bots_mcp::error::StandardBotsError;
use standard_bots_mcp::mcp::registry::coerce_arguments;
use standard_bots_mcp::mcp::ToolRegistry;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn echo_registry(calls: Arc<AtomicUsize>) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(
        "echo",
        "Echo the arguments back",
        json!({
            "type": "object",
            "properties": {
                "text": { "type": "string" },
                "times": { "type": ["integer", "null"] }
            },
            "required": ["text"]
        }),
        move |args| {
            let calls = calls.clone();
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(args)
            }
        },
    );
    registry
}

#[tokio::test]
async fn test_call_runs_handler_with_coerced_arguments() {
    let calls = Arc::new(AtomicUsize::new(0));
    let registry = echo_registry(calls.clone());

    let result = registry
        .call("echo", json!({"text": "hi", "times": "2"}))
        .await
        .unwrap();

    assert_eq!(result, json!({"text": "hi", "times": 2}));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_invalid_arguments_never_reach_handler() {
    let calls = Arc::new(AtomicUsize::new(0));
    let registry = echo_registry(calls.clone());

    let missing = registry.call("echo", Value::Null).await;
    assert!(matches!(missing, Err(StandardBotsError::ValidationError(_))));

    let wrong_type = registry.call("echo", json!({"text": 5})).await;
    assert!(matches!(wrong_type, Err(StandardBotsError::ValidationError(_))));

    let not_a_number = registry
        .call("echo", json!({"text": "hi", "times": "many"}))
        .await;
    assert!(matches!(not_a_number, Err(StandardBotsError::ValidationError(_))));

    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_unknown_tool() {
    let registry = echo_registry(Arc::new(AtomicUsize::new(0)));

    let result = registry.call("missing", json!({})).await;
    assert!(matches!(result, Err(StandardBotsError::ToolNotFound(name)) if name == "missing"));
}

#[tokio::test]
async fn test_uncompilable_schema_fails_every_call() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let mut registry = ToolRegistry::new();
    registry.register("broken", "Broken schema", json!({"type": 5}), move |_| {
        let counter = counter.clone();
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Value::Null)
        }
    });

    for _ in 0..2 {
        let result = registry.call("broken", json!({})).await;
        assert!(
            matches!(&result, Err(StandardBotsError::ValidationError(msg)) if msg.contains("Invalid tool schema")),
            "{:?}",
            result
        );
    }
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_reregistering_replaces_in_place() {
    let mut registry = echo_registry(Arc::new(AtomicUsize::new(0)));
    registry.register("other", "Other", json!({"type": "object"}), |_| async {
        Ok(Value::Null)
    });
    registry.register("echo", "Echo v2", json!({"type": "object"}), |_| async {
        Ok(Value::Null)
    });

    let names: Vec<&str> = registry.list().iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["echo", "other"]);
    assert_eq!(registry.get("echo").unwrap().description, "Echo v2");
    assert_eq!(registry.len(), 2);
}

#[test]
fn test_coerce_arguments_leaves_strings_and_unknowns_alone() {
    let schema = json!({
        "type": "object",
        "properties": {
            "id": { "type": "string" },
            "flag": { "type": ["boolean", "null"] },
            "ratio": { "type": "number" }
        }
    });
    let mut args = json!({
        "id": "42",
        "flag": "FALSE",
        "ratio": "0.5",
        "extra": "7"
    });

    coerce_arguments(&schema, &mut args);

    assert_eq!(
        args,
        json!({"id": "42", "flag": false, "ratio": 0.5, "extra": "7"})
    );
}
