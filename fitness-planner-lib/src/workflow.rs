use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::config::ApiConfig;
use crate::form::{FormValues, ValidationErrors};

pub const WORKFLOW_RUN_PATH: &str = "/workflows/run";

/// Why a plan could not be produced. The page shows the same message for
/// every variant; the tag exists for logs and tests.
#[derive(Error, Debug)]
pub enum PlanError {
    #[error("Form input is invalid: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("Failed to reach the workflow API: {0}")]
    Network(String),
    #[error("Workflow API returned status {status}")]
    Server { status: u16 },
    #[error("Failed to parse workflow response: {0}")]
    Parse(String),
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ResponseMode {
    Blocking,
}

#[derive(Serialize, Debug, Clone)]
pub struct WorkflowRunRequest<'a> {
    pub inputs: &'a FormValues,
    pub response_mode: ResponseMode,
    pub user: &'a str,
}

#[derive(Deserialize, Debug, Clone)]
pub struct WorkflowRunResponse {
    pub data: WorkflowRunData,
}

#[derive(Deserialize, Debug, Clone)]
pub struct WorkflowRunData {
    pub outputs: WorkflowOutputs,
}

#[derive(Deserialize, Debug, Clone)]
pub struct WorkflowOutputs {
    pub text: String,
}

/// Anything that can turn validated form values into a training menu.
pub trait WorkflowApi {
    fn run_workflow(
        &self,
        inputs: &FormValues,
    ) -> impl Future<Output = Result<String, PlanError>> + Send;
}

pub struct WorkflowClient {
    http_client: Client,
    base_url: String,
    api_key: String,
    user: String,
    timeout: Option<Duration>,
}

impl WorkflowClient {
    pub fn new(config: &ApiConfig) -> Self {
        let api_key = match config.api_key.as_deref() {
            Some(key) => key.to_string(),
            None => {
                // Sent anyway; the remote service answers with 401.
                warn!("No API key configured; workflow requests will be rejected.");
                String::new()
            }
        };
        Self {
            http_client: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            user: config.user.clone(),
            timeout: config.timeout(),
        }
    }

    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, WORKFLOW_RUN_PATH)
    }

    /// Runs the workflow in blocking mode and returns `data.outputs.text`.
    ///
    /// # Errors
    ///
    /// - `PlanError::Network` if the request cannot be sent or the body cannot be read.
    /// - `PlanError::Server` for any non-2xx status. The body is not interpreted.
    /// - `PlanError::Parse` if the body is not the expected JSON shape.
    pub async fn run(&self, inputs: &FormValues) -> Result<String, PlanError> {
        let url = self.endpoint();
        let payload = WorkflowRunRequest {
            inputs,
            response_mode: ResponseMode::Blocking,
            user: &self.user,
        };
        info!("Sending POST to {} for user {}", url, self.user);
        debug!("Workflow payload: {:?}", payload);

        let mut request = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&payload);
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await.map_err(|e| {
            error!("Workflow POST to {} failed: {}", url, e);
            PlanError::Network(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error body".to_string());
            error!("Workflow POST failed with status: {}", status);
            debug!("Workflow error body: {}", error_body);
            return Err(PlanError::Server {
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| PlanError::Network(e.to_string()))?;
        let parsed: WorkflowRunResponse = serde_json::from_slice(&body).map_err(|e| {
            error!("Workflow response did not match data.outputs.text: {}", e);
            PlanError::Parse(e.to_string())
        })?;

        info!(
            "Received training menu ({} characters)",
            parsed.data.outputs.text.chars().count()
        );
        Ok(parsed.data.outputs.text)
    }
}

impl WorkflowApi for WorkflowClient {
    async fn run_workflow(&self, inputs: &FormValues) -> Result<String, PlanError> {
        self.run(inputs).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_has_the_documented_shape() {
        let values = FormValues::default();
        let request = WorkflowRunRequest {
            inputs: &values,
            response_mode: ResponseMode::Blocking,
            user: "user-123",
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["response_mode"], "blocking");
        assert_eq!(json["user"], "user-123");
        assert_eq!(json["inputs"]["age"], 30);
        assert_eq!(json["inputs"]["exercise_frequency"], "週2-3回");
    }

    #[test]
    fn endpoint_tolerates_trailing_slash() {
        let client = WorkflowClient::new(&ApiConfig {
            base_url: "http://localhost:5001/v1/".into(),
            api_key: Some("k".into()),
            ..Default::default()
        });
        assert_eq!(client.endpoint(), "http://localhost:5001/v1/workflows/run");
    }

    #[test]
    fn response_text_is_extracted_from_nested_path() {
        let body = r#"{"workflow_run_id":"r1","data":{"id":"r1","status":"succeeded","outputs":{"text":"スクワット 15回"}}}"#;
        let parsed: WorkflowRunResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.data.outputs.text, "スクワット 15回");
    }
}
