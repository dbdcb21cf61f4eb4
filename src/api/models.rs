use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Operational mode reported by the robot controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum RobotStatus {
    Idle,
    RunningAdHocCommand,
    RoutineRunning,
    Antigravity,
    AntigravitySlow,
    Failure,
    Recovering,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct PlayRoutineRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variables: Option<HashMap<String, String>>,
}

impl PlayRoutineRequest {
    /// An empty variable map is sent as `{}`, same as no map at all.
    pub fn new(variables: Option<HashMap<String, String>>) -> Self {
        Self {
            variables: variables.filter(|v| !v.is_empty()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ListRoutinesQuery {
    pub limit: u32,
    pub offset: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct StepVariablesQuery {
    pub step_id_map: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Routine {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub steps: Vec<HashMap<String, Value>>,
    #[serde(default = "default_routine_version")]
    pub version: String,
    #[serde(default)]
    pub author: Option<String>,
}

fn default_routine_version() -> String {
    "1.0.0".to_string()
}

/// Snapshot of a running routine. Only valid at the instant it was fetched.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RoutineState {
    pub is_paused: bool,
    pub current_step_id: String,
    pub start_time: String,
    pub run_time_seconds: f64,
    pub cycle_count: u64,
    pub total_expected_cycles: u64,
    pub should_next_arm_move_be_guided_mode: bool,
    pub is_preflight_test_run: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StepVariables {
    pub variables: HashMap<String, String>,
    /// Variable name -> id of the step that last set it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step_id_map: Option<HashMap<String, String>>,
}
