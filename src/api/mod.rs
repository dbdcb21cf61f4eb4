pub mod client;
pub mod models;

pub use client::{RobotClient, API_PREFIX};
pub use models::{PlayRoutineRequest, RobotStatus, Routine, RoutineState, StepVariables};
