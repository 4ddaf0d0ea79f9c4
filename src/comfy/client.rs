use super::types::{HistoryResponse, SubmitResponse};
use crate::{Error, Result};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// Seam between the orchestrator and the real ComfyUI instance; tests
/// substitute a double here.
#[async_trait]
pub trait ComfyClient: Send + Sync {
    /// Queue a workflow for execution and return the server-assigned
    /// prompt id. Submission is not retried.
    async fn submit(&self, workflow: &serde_json::Value) -> Result<String>;

    /// Fetch the execution history for a prompt. The entry is absent
    /// until the job has run.
    async fn history(&self, prompt_id: &str) -> Result<HistoryResponse>;
}

/// ComfyUI REST client over a shared connection pool.
pub struct HttpComfyClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpComfyClient {
    pub fn new(base_url: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(Error::Backend {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl ComfyClient for HttpComfyClient {
    async fn submit(&self, workflow: &serde_json::Value) -> Result<String> {
        let body = serde_json::json!({
            "prompt": workflow,
            "client_id": uuid::Uuid::new_v4().to_string(),
        });

        debug!("Submitting workflow to {}/prompt", self.base_url);

        let response = self
            .client
            .post(format!("{}/prompt", self.base_url))
            .json(&body)
            .send()
            .await?;

        let response = Self::ensure_success(response).await?;
        let submit: SubmitResponse = response.json().await?;

        Ok(submit.prompt_id)
    }

    async fn history(&self, prompt_id: &str) -> Result<HistoryResponse> {
        let response = self
            .client
            .get(format!("{}/history/{}", self.base_url, prompt_id))
            .send()
            .await?;

        let response = Self::ensure_success(response).await?;
        Ok(response.json().await?)
    }
}
