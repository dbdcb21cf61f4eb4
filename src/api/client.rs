use crate::api::models::{ListRoutinesQuery, PlayRoutineRequest, StepVariablesQuery};
use crate::error::{Result, StandardBotsError};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use serde_json::Value;
use std::collections::HashMap;

pub const API_PREFIX: &str = "/api/v1/routine-editor";

const ROBOT_KIND_HEADER: &str = "robot_kind";
const ROBOT_KIND_LIVE: &str = "live";

/// Async client for the Routine Editor API of one robot controller.
///
/// Cloning is cheap and shares the underlying connection pool.
#[derive(Clone)]
pub struct RobotClient {
    base_url: String,
    http: reqwest::Client,
}

impl RobotClient {
    pub fn new(url: &str, api_key: &str) -> Result<Self> {
        let base_url = url.trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(StandardBotsError::ConfigError(
                "Standard Bots URL must not be empty".to_string(),
            ));
        }

        let mut auth = HeaderValue::from_str(&format!("Bearer {}", api_key)).map_err(|e| {
            StandardBotsError::ConfigError(format!("Invalid authorization header: {}", e))
        })?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        // Target a real robot, not the simulator
        headers.insert(
            HeaderName::from_static(ROBOT_KIND_HEADER),
            HeaderValue::from_static(ROBOT_KIND_LIVE),
        );

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self { base_url, http })
    }

    /// Start executing a routine, optionally seeding its variables.
    pub async fn play_routine(
        &self,
        routine_id: &str,
        variables: Option<HashMap<String, String>>,
    ) -> Result<Value> {
        let body = PlayRoutineRequest::new(variables);
        let request = self
            .http
            .post(self.routine_url(routine_id, Some("play")))
            .json(&body);
        self.send(request).await
    }

    pub async fn pause_routine(&self, routine_id: &str) -> Result<Value> {
        let request = self.http.post(self.routine_url(routine_id, Some("pause")));
        self.send(request).await
    }

    /// Stop whatever routine is running and halt all motion. The controller
    /// exposes this globally, so there is no routine id.
    pub async fn stop_routine(&self) -> Result<Value> {
        let request = self.http.post(self.endpoint("/stop"));
        self.send(request).await
    }

    pub async fn list_routines(&self, limit: u32, offset: u32) -> Result<Value> {
        let request = self
            .http
            .get(self.endpoint("/routines"))
            .query(&ListRoutinesQuery { limit, offset });
        self.send(request).await
    }

    pub async fn get_routine(&self, routine_id: &str) -> Result<Value> {
        let request = self.http.get(self.routine_url(routine_id, None));
        self.send(request).await
    }

    pub async fn get_routine_state(&self, routine_id: &str) -> Result<Value> {
        let request = self.http.get(self.routine_url(routine_id, Some("state")));
        self.send(request).await
    }

    pub async fn get_step_variables(&self, routine_id: &str, step_id_map: bool) -> Result<Value> {
        let request = self
            .http
            .get(self.routine_url(routine_id, Some("step-variables")))
            .query(&StepVariablesQuery { step_id_map });
        self.send(request).await
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}{}", self.base_url, API_PREFIX, path)
    }

    fn routine_url(&self, routine_id: &str, action: Option<&str>) -> String {
        let id = urlencoding::encode(routine_id);
        match action {
            Some(action) => self.endpoint(&format!("/routines/{}/{}", id, action)),
            None => self.endpoint(&format!("/routines/{}", id)),
        }
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<Value> {
        let response = request.send().await?;
        let status = response.status();
        let url = response.url().clone();

        if !status.is_success() {
            tracing::warn!("Robot API {} returned {}", url.path(), status);
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    tracing::warn!("Failed to read error body from {}: {}", url.path(), e);
                    format!("<unreadable response body: {}>", e)
                }
            };
            return Err(StandardBotsError::ApiError {
                status: status.as_u16(),
                body,
            });
        }

        tracing::debug!("Robot API {} returned {}", url.path(), status);

        let bytes = response.bytes().await?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }

        Ok(serde_json::from_slice(&bytes)?)
    }
}
