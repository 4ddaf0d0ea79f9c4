use crate::generation::Outcome;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    /// Template filename inside the workflow directory.
    #[serde(default = "default_workflow")]
    pub workflow: String,
    #[serde(default)]
    pub subfolder: Option<String>,
    /// Either a plain prompt string or `{"events": [...]}`; anything
    /// else is a 400.
    #[serde(default)]
    pub prompt: Value,
}

fn default_workflow() -> String {
    "default.json".to_string()
}

#[derive(Debug, Serialize)]
pub struct WorkflowsResponse {
    pub workflows: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct SingleResponse {
    pub image_url: Outcome,
}

#[derive(Debug, Serialize)]
pub struct BatchResponse {
    pub image_urls: Vec<Outcome>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            detail: None,
        }
    }

    pub fn with_detail(error: impl Into<String>, detail: impl ToString) -> Self {
        Self {
            error: error.into(),
            detail: Some(detail.to_string()),
        }
    }
}
