use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;

use super::registry::ToolRegistry;
use crate::api::RobotClient;
use crate::config::{default_list_limit, default_list_offset};
use crate::error::{Result, StandardBotsError};

#[derive(Debug, Deserialize)]
struct RoutineArgs {
    routine_id: String,
}

#[derive(Debug, Deserialize)]
struct PlayRoutineArgs {
    routine_id: String,
    #[serde(default)]
    variables: Option<HashMap<String, String>>,
}

#[derive(Debug, Deserialize)]
struct ListRoutinesArgs {
    #[serde(default)]
    limit: Option<u32>,
    #[serde(default)]
    offset: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct StepVariablesArgs {
    routine_id: String,
    #[serde(default)]
    step_id_map: Option<bool>,
}

fn parse_args<T: DeserializeOwned>(arguments: Value) -> Result<T> {
    serde_json::from_value(arguments).map_err(|e| StandardBotsError::ValidationError(e.to_string()))
}

fn routine_id_schema() -> Value {
    json!({
        "type": "string",
        "description": "ID of the routine"
    })
}

/// Bind every Routine Editor operation to a named tool.
pub fn build_registry(client: Arc<RobotClient>) -> ToolRegistry {
    let mut registry = ToolRegistry::new();

    let c = client.clone();
    registry.register(
        "play_routine",
        "Play a routine with optional initial variable states",
        json!({
            "type": "object",
            "properties": {
                "routine_id": routine_id_schema(),
                "variables": {
                    "type": ["object", "null"],
                    "description": "Initial values for routine variables, by name",
                    "additionalProperties": { "type": "string" }
                }
            },
            "required": ["routine_id"]
        }),
        move |args| {
            let client = c.clone();
            async move {
                let args: PlayRoutineArgs = parse_args(args)?;
                client.play_routine(&args.routine_id, args.variables).await
            }
        },
    );

    let c = client.clone();
    registry.register(
        "pause_routine",
        "Pause a running routine",
        json!({
            "type": "object",
            "properties": {
                "routine_id": routine_id_schema()
            },
            "required": ["routine_id"]
        }),
        move |args| {
            let client = c.clone();
            async move {
                let args: RoutineArgs = parse_args(args)?;
                client.pause_routine(&args.routine_id).await
            }
        },
    );

    let c = client.clone();
    registry.register(
        "stop_routine",
        "Stop running routine and all ongoing motions",
        json!({
            "type": "object",
            "properties": {}
        }),
        move |_args| {
            let client = c.clone();
            async move { client.stop_routine().await }
        },
    );

    let c = client.clone();
    registry.register(
        "list_routines",
        "List routines defined in Routine Editor UI",
        json!({
            "type": "object",
            "properties": {
                "limit": {
                    "type": ["integer", "null"],
                    "minimum": 0,
                    "default": default_list_limit(),
                    "description": "Maximum number of routines to return"
                },
                "offset": {
                    "type": ["integer", "null"],
                    "minimum": 0,
                    "default": default_list_offset(),
                    "description": "Number of routines to skip"
                }
            }
        }),
        move |args| {
            let client = c.clone();
            async move {
                let args: ListRoutinesArgs = parse_args(args)?;
                client
                    .list_routines(
                        args.limit.unwrap_or_else(default_list_limit),
                        args.offset.unwrap_or_else(default_list_offset),
                    )
                    .await
            }
        },
    );

    let c = client.clone();
    registry.register(
        "get_routine",
        "Get routine data by ID",
        json!({
            "type": "object",
            "properties": {
                "routine_id": routine_id_schema()
            },
            "required": ["routine_id"]
        }),
        move |args| {
            let client = c.clone();
            async move {
                let args: RoutineArgs = parse_args(args)?;
                client.get_routine(&args.routine_id).await
            }
        },
    );

    let c = client.clone();
    registry.register(
        "get_routine_state",
        "Get the state from a running routine",
        json!({
            "type": "object",
            "properties": {
                "routine_id": routine_id_schema()
            },
            "required": ["routine_id"]
        }),
        move |args| {
            let client = c.clone();
            async move {
                let args: RoutineArgs = parse_args(args)?;
                client.get_routine_state(&args.routine_id).await
            }
        },
    );

    let c = client;
    registry.register(
        "get_step_variables",
        "Get all step variables from a running routine",
        json!({
            "type": "object",
            "properties": {
                "routine_id": routine_id_schema(),
                "step_id_map": {
                    "type": ["boolean", "null"],
                    "default": false,
                    "description": "Include which step last set each variable"
                }
            },
            "required": ["routine_id"]
        }),
        move |args| {
            let client = c.clone();
            async move {
                let args: StepVariablesArgs = parse_args(args)?;
                client
                    .get_step_variables(&args.routine_id, args.step_id_map.unwrap_or(false))
                    .await
            }
        },
    );

    registry
}
