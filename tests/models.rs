use serde_json::json;
use standard_bots_mcp::api::{PlayRoutineRequest, RobotStatus, Routine, RoutineState, StepVariables};
use std::collections::HashMap;

#[test]
fn test_routine_defaults() {
    let routine: Routine = serde_json::from_value(json!({
        "id": "r1",
        "name": "Palletize"
    }))
    .unwrap();

    assert_eq!(routine.version, "1.0.0");
    assert!(routine.steps.is_empty());
    assert_eq!(routine.description, None);
    assert_eq!(routine.author, None);
}

#[test]
fn test_routine_keeps_step_order() {
    let routine: Routine = serde_json::from_value(json!({
        "id": "r1",
        "name": "Palletize",
        "steps": [{"kind": "move"}, {"kind": "grip"}, {"kind": "release"}],
        "version": "2.1.0",
        "author": "ops"
    }))
    .unwrap();

    let kinds: Vec<_> = routine.steps.iter().map(|s| s["kind"].clone()).collect();
    assert_eq!(kinds, vec![json!("move"), json!("grip"), json!("release")]);
    assert_eq!(routine.version, "2.1.0");
}

#[test]
fn test_routine_state() {
    let state: RoutineState = serde_json::from_value(json!({
        "is_paused": false,
        "current_step_id": "step-3",
        "start_time": "2024-05-01T12:00:00Z",
        "run_time_seconds": 12.5,
        "cycle_count": 2,
        "total_expected_cycles": 10,
        "should_next_arm_move_be_guided_mode": false,
        "is_preflight_test_run": true
    }))
    .unwrap();

    assert_eq!(state.current_step_id, "step-3");
    assert_eq!(state.cycle_count, 2);
    assert!(state.is_preflight_test_run);
}

#[test]
fn test_step_variables_with_and_without_map() {
    let plain: StepVariables =
        serde_json::from_value(json!({"variables": {"count": "3"}})).unwrap();
    assert_eq!(plain.variables["count"], "3");
    assert_eq!(plain.step_id_map, None);

    let mapped: StepVariables = serde_json::from_value(json!({
        "variables": {"count": "3"},
        "step_id_map": {"count": "step-1"}
    }))
    .unwrap();
    assert_eq!(mapped.step_id_map.unwrap()["count"], "step-1");
}

#[test]
fn test_robot_status_names() {
    let status: RobotStatus = serde_json::from_value(json!("RunningAdHocCommand")).unwrap();
    assert_eq!(status, RobotStatus::RunningAdHocCommand);
    assert_eq!(
        serde_json::to_value(RobotStatus::AntigravitySlow).unwrap(),
        json!("AntigravitySlow")
    );
}

#[test]
fn test_play_request_body() {
    let mut variables = HashMap::new();
    variables.insert("speed".to_string(), "slow".to_string());

    assert_eq!(
        serde_json::to_value(PlayRoutineRequest::new(Some(variables))).unwrap(),
        json!({"variables": {"speed": "slow"}})
    );
    assert_eq!(
        serde_json::to_value(PlayRoutineRequest::new(None)).unwrap(),
        json!({})
    );
}
